//! Boundary between loosely-typed stored data and the engine's typed models.

pub mod coerce;
mod debts_csv;
mod snapshot;

pub use debts_csv::{parse_debts, read_debts};
pub use snapshot::{from_json, load, save, to_json};

/// Expand a leading `~/` to `$HOME`.
pub fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
