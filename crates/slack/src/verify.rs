//! Inbound request verification.

use secrecy::{ExposeSecret, Secret};

/// Compare the payload's `token` field against the configured verification
/// token. Callers ignore the request entirely on a mismatch — no reply.
#[must_use]
pub fn verify_token(expected: &Secret<String>, provided: &str) -> bool {
    constant_time_eq(expected.expose_secret(), provided)
}

/// Constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}
