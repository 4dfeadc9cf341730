//! `rolodex whos-out`: list who is out of office.

use chrono::NaiveDate;

use crate::adapters::http::HttpDirectory;
use crate::services::DirectoryService;

pub async fn execute(
    service: &DirectoryService<HttpDirectory>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> anyhow::Result<()> {
    println!("{}", service.whos_out(from, to).await?);
    Ok(())
}
