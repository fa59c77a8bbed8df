use chrono::{DateTime, Local, Utc};
use serde_derive::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);
impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

/// Local wall-clock time, for humans.
impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let local: DateTime<Local> = self.0.into();
        f.write_fmt(format_args!("{}", local.format("%Y-%m-%d %H:%M:%S")))
    }
}
