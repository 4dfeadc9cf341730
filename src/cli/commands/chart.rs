//! `rolodex chart`: print the org chart.

use crate::adapters::http::HttpDirectory;
use crate::services::DirectoryService;

pub async fn execute(service: &DirectoryService<HttpDirectory>) -> anyhow::Result<()> {
    println!("{}", service.org_chart().await?);
    Ok(())
}
