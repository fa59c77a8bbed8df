use std::{fmt::Display, str::FromStr, sync::Arc};

use log::{debug, info, warn};
use tokio::io::AsyncBufReadExt;
use tokio::sync::Mutex;

use crate::application::Poller;
use crate::domain;

/// One line typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle,
    FetchOnce,
    Quit,
}
impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "t" | "toggle" => Ok(Command::Toggle),
            "f" | "fetch" => Ok(Command::FetchOnce),
            "q" | "quit" => Ok(Command::Quit),
            other => Err(UnknownCommand(other.to_owned())),
        }
    }
}

/// Reads commands until `q`. When stdin closes, commands stop but the caller
/// keeps running.
pub async fn run<Fetcher>(poller: Arc<Mutex<Poller<Fetcher>>>)
where
    Fetcher: domain::Fetcher + Send + Sync + 'static,
{
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(x)) => x,
            Ok(None) => {
                debug!("stdin closed, console commands disabled.");
                std::future::pending::<()>().await;
                return;
            }
            Err(why) => {
                warn!("failed to read stdin: {why}");
                std::future::pending::<()>().await;
                return;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Toggle) => {
                let _ = poller.lock().await.toggle();
            }
            Ok(Command::FetchOnce) => {
                let _ = poller.lock().await.fetch_once();
            }
            Ok(Command::Quit) => break,
            Err(why) => info!("{why}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(String);
impl Display for UnknownCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "unknown command '{}'. use t (toggle), f (fetch once) or q (quit).",
            self.0
        ))
    }
}
impl std::error::Error for UnknownCommand {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!("t".parse(), Ok(Command::Toggle));
        assert_eq!(" toggle \n".parse(), Ok(Command::Toggle));
        assert_eq!("f".parse(), Ok(Command::FetchOnce));
        assert_eq!("quit".parse(), Ok(Command::Quit));
    }

    #[test]
    fn unknown_commands_are_reported() {
        let err = "x".parse::<Command>().unwrap_err();
        assert_eq!(err, UnknownCommand("x".to_owned()));
        assert!(err.to_string().contains("t (toggle)"));
    }
}
