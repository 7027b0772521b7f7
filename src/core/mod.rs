//! Core types for Rafters
//!
//! This module holds the error taxonomy shared by every command. Detection
//! helpers return `Option` values and never fail; registry, configuration and
//! file operations return [`RaftersError`], which the command boundary turns
//! into an [`ErrorContext`] through [`user_friendly_error`].

pub mod error;

pub use error::{ErrorContext, RaftersError, user_friendly_error};
