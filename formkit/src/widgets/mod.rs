//! Form controls and interactive widgets.
//!
//! Larger widgets are split into `config`, `state` and `events` modules; the
//! rest live in a single file.

pub mod accordion;
pub mod checkbox;
pub mod dropdown;
pub mod key_value;
pub mod otp;
pub mod popover;
pub mod radio;
pub mod select;
pub mod slider;
pub mod switch;
pub mod tabs;
pub mod tags;
