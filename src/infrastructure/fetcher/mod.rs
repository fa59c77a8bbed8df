pub mod http_fetcher;

pub use self::http_fetcher::HttpFetcher;
