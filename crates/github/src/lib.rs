//! GitHub repository content provider.
//!
//! One concern: given a [`FileRequest`], return the raw text of the file via
//! the repository contents API. No retry, no backoff — a failed fetch is
//! terminal for the request that triggered it.

pub mod client;
pub mod error;

pub use {
    client::{ContentClient, DEFAULT_REF},
    error::FetchError,
};
