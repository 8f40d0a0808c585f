//! Tags input widget - free-form tag entry with suggestions and reordering.

mod config;
mod events;
mod state;

pub use config::{SortDirection, TagsConfig};
pub use events::TagsMsg;
pub use state::{TagsId, TagsInput};
