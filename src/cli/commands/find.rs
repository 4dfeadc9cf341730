//! `rolodex find`: look up employees by name or email.

use crate::adapters::http::HttpDirectory;
use crate::services::DirectoryService;

pub async fn execute(service: &DirectoryService<HttpDirectory>, query: &str) -> anyhow::Result<()> {
    println!("{}", service.find_employee(query).await?);
    Ok(())
}
