//! Local widget state entangled with an externally owned model.
//!
//! A widget resolves a [`Binding`] from its host attributes, wraps it with an
//! injected [`ModelBridge`] into a [`ModelLink`], and keeps its working value in
//! an [`Entangled`] store. Every local `set` is pushed through the link, either
//! immediately (live) or at the next sync point (deferred).

pub mod attrs;
pub mod binding;
pub mod bridge;
pub mod disclosure;
pub mod drag;
pub mod error;
pub mod list;
pub mod store;
pub mod validation;

pub use attrs::HostAttributes;
pub use binding::{Binding, SyncMode};
pub use bridge::{ModelBridge, ModelLink, Property};
pub use disclosure::{Disclosure, DisclosureState, DismissReason};
pub use drag::DragTracker;
pub use error::{BindingError, ConfigError, MismatchError};
pub use list::{Bounds, ListMessages, ListState, Uniqueness};
pub use store::{Entangled, Seed};
pub use validation::{DEFAULT_FLASH_DURATION, Flash, Rules, ValidationResult};
