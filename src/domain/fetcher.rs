use crate::domain::Record;

/// Retrieves the current record list for a resource.
#[async_trait::async_trait]
pub trait Fetcher {
    type Error: std::error::Error + Send;

    async fn fetch(&self, resource: &str) -> Result<Vec<Record>, Self::Error>;
}
