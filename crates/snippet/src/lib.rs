//! The snippet pipeline: slash-command parsing, line slicing, indentation
//! normalization, message formatting, and message chunking.
//!
//! Everything in this crate is pure — no I/O, no clocks, no shared state.
//! The gateway wires these functions between the Slack inbound payload and
//! the GitHub content fetch; this crate never sees either side.

pub mod chunk;
pub mod command;
pub mod format;
pub mod indent;
pub mod slice;

pub use {
    chunk::{CHUNK_LIMIT, chunk_message},
    command::{FileRequest, LineRange, ParseError, parse},
    format::build_message,
    indent::normalize,
    slice::{CodeSlice, extract},
};

/// Run the formatting half of the pipeline: slice the file content, normalize
/// indentation, and build the outbound message (header + fenced block).
///
/// The returned message is not yet chunked; pass it through
/// [`chunk_message`] before sending.
#[must_use]
pub fn render(request: &FileRequest, content: &str) -> String {
    let slice = extract(content, request.range);
    let code = normalize(&slice.text());
    build_message(request, slice.display_range, &code)
}
