pub mod api_key;
pub mod record;
pub mod timestamp;
pub mod url;

pub use self::api_key::ApiKey;
pub use self::record::Record;
pub use self::timestamp::Timestamp;
pub use self::url::BaseUrl;

use serde_derive::Serialize;

/// What the presentation layer sees of the poller.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub active: bool,
    pub data: Vec<Record>,
    pub last_updated: Option<Timestamp>,
}
