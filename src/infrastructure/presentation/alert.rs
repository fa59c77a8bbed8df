use ansi_term::Color;
use log::{debug, error};
use notify_rust::Notification;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::domain::{ConfigError, ConnectionConfig, Settings};

/// Where a blocking warning is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    desktop: bool,
}
impl Alert {
    /// Terminal prompt plus a best-effort desktop notification.
    pub fn new() -> Self {
        Self { desktop: true }
    }

    pub fn terminal_only() -> Self {
        Self { desktop: false }
    }

    /// Warns the user and waits until they press Enter or `input` closes.
    pub async fn blocking_warning<R>(&self, message: &str, input: R)
    where
        R: AsyncBufRead + Unpin,
    {
        error!("{message}");

        if self.desktop {
            if let Err(why) = Notification::new()
                .summary("framewatch")
                .body(message)
                .show()
            {
                debug!("desktop notification unavailable: {why}");
            }
        }

        eprintln!("{} {message}", Color::Red.bold().paint("warning:"));
        eprintln!("press Enter to exit.");

        let mut input = input;
        let mut line = String::new();
        let _ = input.read_line(&mut line).await;
    }

    /// Builds the connection, or shows the blocking warning when required keys
    /// are absent and returns `Ok(None)`. Other config errors are returned.
    pub async fn require_connection<R>(
        &self,
        settings: &Settings,
        input: R,
    ) -> Result<Option<ConnectionConfig>, ConfigError>
    where
        R: AsyncBufRead + Unpin,
    {
        match settings.connection() {
            Ok(x) => Ok(Some(x)),
            Err(why @ ConfigError::Missing(_)) => {
                self.blocking_warning(&why.to_string(), input).await;
                Ok(None)
            }
            Err(why) => Err(why),
        }
    }
}
impl Default for Alert {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(api_key: Option<&str>) -> Settings {
        Settings {
            base_url: Some("https://example.com/prod".to_owned()),
            api_key: api_key.map(str::to_owned),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_api_key_warns_and_returns_on_eof() {
        let input: &[u8] = b"";
        let result = Alert::terminal_only()
            .require_connection(&settings(None), input)
            .await;

        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn missing_api_key_warns_and_returns_on_enter() {
        let input: &[u8] = b"\nleft over\n";
        let result = Alert::terminal_only()
            .require_connection(&settings(Some("  ")), input)
            .await;

        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn complete_settings_do_not_wait_for_input() {
        // Input that never resolves would hang the test if it were read.
        let (_writer, reader) = tokio::io::duplex(64);
        let reader = tokio::io::BufReader::new(reader);

        let connection = Alert::terminal_only()
            .require_connection(&settings(Some("secret")), reader)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(connection.api_key.expose(), "secret");
    }

    #[tokio::test]
    async fn other_config_errors_are_returned() {
        let input: &[u8] = b"";
        let invalid = Settings {
            base_url: Some("not a url".to_owned()),
            ..settings(Some("secret"))
        };
        let result = Alert::terminal_only()
            .require_connection(&invalid, input)
            .await;
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl(_))));

        let zero_timeout = Settings {
            timeout_ms: Some(0),
            ..settings(Some("secret"))
        };
        let result = Alert::terminal_only()
            .require_connection(&zero_timeout, input)
            .await;
        assert_eq!(result, Err(ConfigError::ZeroDuration("timeout_ms")));
    }
}
