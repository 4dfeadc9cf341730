//! Command handlers, one module per subcommand.

pub mod chart;
pub mod find;
pub mod serve;
pub mod whos_out;
