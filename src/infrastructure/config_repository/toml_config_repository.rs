use std::{fmt::Display, io::ErrorKind, path::PathBuf};

use log::{debug, info};

use crate::domain::{ConfigRepository, Settings};

/// Settings read from a TOML file. A missing file is the same as an empty one;
/// the file is read again on every `get`.
pub struct TomlConfigRepository {
    path: PathBuf,
}
impl TomlConfigRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl ConfigRepository for TomlConfigRepository {
    type Error = Error;

    async fn get(&mut self) -> Result<Settings, Self::Error> {
        let toml = match tokio::fs::read_to_string(&self.path).await {
            Ok(x) => x,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found, using no file settings.", self.path.display());
                return Ok(Settings::default());
            }
            Err(e) => return Err(e.into()),
        };

        let settings = toml::from_str(&toml)?;
        info!("loaded settings from {}", self.path.display());

        Ok(settings)
    }
}

#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    TomlError(toml::de::Error),
}
impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(e) => f.write_fmt(format_args!("IO error: {e}")),
            Error::TomlError(e) => f.write_fmt(format_args!("Toml error: {e}")),
        }
    }
}
impl std::error::Error for Error {}
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e)
    }
}
impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::TomlError(e)
    }
}
