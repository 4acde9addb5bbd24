//! Foundation types for finterm.
//!
//! This crate holds the types shared by every finterm crate: the error enum
//! and the feature-flag settings that the dispatcher and menus consult.

pub mod error;
pub mod settings;

pub use error::{FintermError, Result};
pub use settings::Settings;
