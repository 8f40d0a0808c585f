//! Validation for widget mutations.
//!
//! Structured multi-value widgets run every mutating interaction through the
//! same pipeline: a capacity precondition, per-item [`Rules`], then commit.
//! Failures never propagate as errors; they produce a
//! [`ValidationResult::Invalid`] and a transient [`Flash`] message.
//!
//! # Example
//!
//! ```ignore
//! use entangle::validation::Rules;
//!
//! let rules = Rules::new()
//!     .length(1, 50, "Invalid tag format")
//!     .pattern("^[a-z]+$", "Invalid tag format")?
//!     .blocked(["admin"], "Invalid tag format");
//!
//! assert!(rules.check(&"rust".to_string()).ok());
//! ```

mod flash;
mod result;
mod rules;

pub use flash::{DEFAULT_FLASH_DURATION, Flash};
pub use result::ValidationResult;
pub use rules::Rules;
