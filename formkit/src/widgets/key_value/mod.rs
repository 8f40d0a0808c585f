//! Key-value editor widget - an editable table of `{key, value}` rows.

mod config;
mod events;
mod row;
mod state;

pub use config::KeyValueConfig;
pub use events::KeyValueMsg;
pub use row::Row;
pub use state::{KeyValue, KeyValueId};
