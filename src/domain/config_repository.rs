use crate::domain::Settings;

#[async_trait::async_trait]
pub trait ConfigRepository {
    type Error: std::error::Error + Send;

    async fn get(&mut self) -> Result<Settings, Self::Error>;
}
