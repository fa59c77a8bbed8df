use std::fmt::Display;

use ansi_term::Color;
use log::debug;
use prettytable::{format, Cell, Row, Table};
use serde_json::Value;
use tokio::sync::watch;

use crate::application::Poller;
use crate::domain::{self, DashboardState, Record};

const MAX_CELL_CHARS: usize = 48;

/// Prints the dashboard every time the state changes. Returns once the poller
/// is gone.
pub async fn run(mut state: watch::Receiver<DashboardState>) {
    loop {
        let snapshot = state.borrow_and_update().clone();
        println!("{}", render(&snapshot));

        if state.changed().await.is_err() {
            debug!("terminal view stopped.");
            break;
        }
    }
}

/// Fetches once and renders the result. Fails when the fetch did not replace
/// `data`.
pub async fn render_once<Fetcher>(poller: &Poller<Fetcher>) -> Result<String, NothingFetched>
where
    Fetcher: domain::Fetcher + Send + Sync + 'static,
{
    match poller.fetch_once().await {
        Ok(true) => Ok(render(&poller.state())),
        Ok(false) => Err(NothingFetched),
        Err(why) => {
            debug!("fetch task failed: {why}");
            Err(NothingFetched)
        }
    }
}

pub fn render(state: &DashboardState) -> String {
    format!("{}\n{}", status_line(state), records_table(&state.data))
}

fn status_line(state: &DashboardState) -> String {
    let mode = if state.active {
        Color::Green.bold().paint("● polling")
    } else {
        Color::Fixed(8).normal().paint("○ idle")
    };
    let last_updated = match state.last_updated {
        Some(x) => x.to_string(),
        None => "never".to_owned(),
    };

    format!(
        "{mode}  {} records  last updated: {last_updated}",
        state.data.len()
    )
}

/// Columns are the union of object keys, in the order they first appear.
/// Records that are not objects show their value in the first column.
fn records_table(records: &[Record]) -> Table {
    let mut columns: Vec<&str> = Vec::new();
    for name in records.iter().flat_map(|x| x.field_names()) {
        if !columns.contains(&name) {
            columns.push(name);
        }
    }
    if columns.is_empty() {
        columns.push("value");
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(columns.iter().map(|x| Cell::new(x)).collect()));

    for record in records {
        let cells = if record.as_value().is_object() {
            columns
                .iter()
                .map(|x| Cell::new(&record.field(x).map(cell_text).unwrap_or_default()))
                .collect()
        } else {
            let mut cells = vec![Cell::new(&cell_text(record.as_value()))];
            cells.resize_with(columns.len(), || Cell::new(""));
            cells
        };
        table.add_row(Row::new(cells));
    }

    table
}

fn cell_text(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(x) => x.clone(),
        x => x.to_string(),
    };

    if text.chars().count() <= MAX_CELL_CHARS {
        text
    } else {
        let mut truncated: String = text.chars().take(MAX_CELL_CHARS - 1).collect();
        truncated.push('…');
        truncated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NothingFetched;
impl Display for NothingFetched {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("no data was fetched; see the log for the cause.")
    }
}
impl std::error::Error for NothingFetched {}
