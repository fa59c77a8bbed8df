use std::fmt::Display;

/// Base address of the frame API.
///
/// The path always ends with `/`, so resources are resolved beneath it the way
/// an HTTP client's base URL is: `https://host/prod` + `enrichedframe` gives
/// `https://host/prod/enrichedframe`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUrl(url::Url);
impl BaseUrl {
    pub fn new(url: &str) -> Result<Self, UrlParseError> {
        let mut url = url::Url::parse(url.trim()).map_err(|_| UrlParseError)?;
        if url.cannot_be_a_base() {
            return Err(UrlParseError);
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self(url))
    }

    /// Resolves `resource` beneath the base address.
    pub fn join(&self, resource: &str) -> Result<url::Url, UrlParseError> {
        self.0
            .join(resource.trim_start_matches('/'))
            .map_err(|_| UrlParseError)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
impl From<BaseUrl> for String {
    fn from(url: BaseUrl) -> Self {
        url.0.into()
    }
}
impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
impl Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UrlParseError;
impl Display for UrlParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("failed to parse the URL.")
    }
}
impl std::error::Error for UrlParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_keeps_the_stage_path() {
        let base = BaseUrl::new("https://abc.execute-api.us-east-1.amazonaws.com/prod").unwrap();
        let url = base.join("enrichedframe").unwrap();
        assert_eq!(
            url.as_str(),
            "https://abc.execute-api.us-east-1.amazonaws.com/prod/enrichedframe"
        );
    }

    #[test]
    fn join_ignores_leading_slash_and_trailing_base_slash() {
        let base = BaseUrl::new("http://localhost:3000/api/").unwrap();
        let url = base.join("/enrichedframe").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/enrichedframe");
    }

    #[test]
    fn rejects_relative_and_opaque_urls() {
        assert_eq!(BaseUrl::new("enrichedframe"), Err(UrlParseError));
        assert_eq!(BaseUrl::new("mailto:ops@example.com"), Err(UrlParseError));
    }
}
