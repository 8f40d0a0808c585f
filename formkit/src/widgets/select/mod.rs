//! Select widget - single or multiple choice with optional search.

mod events;
mod filter;
mod state;

pub use events::SelectMsg;
pub use filter::{FilterMatch, SearchMode, contains, fuzzy_filter};
pub use state::{Select, SelectConfig, SelectId, SelectOption, Selection};
