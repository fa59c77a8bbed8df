use std::fmt::Display;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use reqwest::Client;

use crate::domain::models::url::UrlParseError;
use crate::domain::{BaseUrl, ConnectionConfig, Fetcher, Record};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Fetcher backed by one pre-configured HTTP client: fixed base address, fixed
/// timeout, and the API key sent on every request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: BaseUrl,
}

impl HttpFetcher {
    pub fn new(config: &ConnectionConfig) -> Result<Self, Error> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose())?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(Error::RequestError)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    type Error = Error;

    async fn fetch(&self, resource: &str) -> Result<Vec<Record>, Self::Error> {
        let url = self.base_url.join(resource)?;

        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let records = response.json::<Vec<Record>>().await?;

        Ok(records)
    }
}

#[derive(Debug)]
pub enum Error {
    InvalidApiKey(InvalidHeaderValue),
    UrlParseError(UrlParseError),
    RequestError(reqwest::Error),
}
impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidApiKey(_) => {
                f.write_str("the API key cannot be sent as an HTTP header value.")
            }
            Error::UrlParseError(e) => f.write_fmt(format_args!("invalid resource path: {e}")),
            Error::RequestError(e) if e.is_timeout() => {
                f.write_fmt(format_args!("request timed out: {e}"))
            }
            Error::RequestError(e) if e.is_status() => {
                f.write_fmt(format_args!("unexpected response status: {e}"))
            }
            Error::RequestError(e) if e.is_decode() => {
                f.write_fmt(format_args!("response is not a list of records: {e}"))
            }
            Error::RequestError(e) => f.write_fmt(format_args!("failed to fetch: {e}")),
        }
    }
}
impl std::error::Error for Error {}
impl From<InvalidHeaderValue> for Error {
    fn from(e: InvalidHeaderValue) -> Self {
        Error::InvalidApiKey(e)
    }
}
impl From<UrlParseError> for Error {
    fn from(e: UrlParseError) -> Self {
        Error::UrlParseError(e)
    }
}
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::RequestError(e)
    }
}
