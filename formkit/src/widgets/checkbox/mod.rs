//! Checkbox and checkbox group widgets.

mod group;
mod state;

pub use group::{CheckboxGroup, CheckboxGroupConfig, CheckboxGroupId, CheckboxGroupMsg};
pub use state::{Checkbox, CheckboxConfig, CheckboxId, CheckboxMsg};
