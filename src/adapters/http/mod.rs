//! HTTP adapter for the remote directory API.

pub mod client;

pub use client::HttpDirectory;
