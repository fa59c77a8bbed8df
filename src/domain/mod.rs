pub mod config_repository;
pub mod fetcher;
pub mod models;
pub mod settings;

pub use self::config_repository::*;
pub use self::fetcher::*;
pub use self::models::*;
pub use self::settings::*;
