//! Core types shared across gitkit.
//!
//! Currently this is the error taxonomy ([`GitkitError`]) and the user-facing
//! error presentation layer ([`ErrorContext`], [`user_friendly_error`]).

pub mod error;

pub use error::{ErrorContext, GitkitError, user_friendly_error};
