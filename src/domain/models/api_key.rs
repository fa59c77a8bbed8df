use std::fmt::{Debug, Display};

/// Static key sent with every request.
///
/// `Display` and `Debug` never print the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);
impl ApiKey {
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}
impl TryFrom<String> for ApiKey {
    type Error = EmptyApiKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() {
            Err(EmptyApiKeyError {})
        } else {
            Ok(Self(value.to_owned()))
        }
    }
}

impl Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.0.chars().count();
        if count > 8 {
            let tail: String = self.0.chars().skip(count - 4).collect();
            write!(f, "****{tail}")
        } else {
            f.write_str("****")
        }
    }
}
impl Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey({self})")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyApiKeyError {}
impl Display for EmptyApiKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("API key must not be empty.")
    }
}

impl std::error::Error for EmptyApiKeyError {}
