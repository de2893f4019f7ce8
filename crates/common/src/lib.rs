//! Shared error definitions and context machinery used across all snipbot
//! crates.

pub mod error;

pub use error::{Error, FromMessage, Result, SnipbotError};
