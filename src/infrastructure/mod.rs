pub mod config_repository;
pub mod fetcher;
pub mod presentation;

pub use self::config_repository::*;
pub use self::fetcher::*;
