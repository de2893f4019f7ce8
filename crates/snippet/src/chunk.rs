//! Message chunking against the platform size limit.
//!
//! A formatted message opens a code fence in its header and closes it at the
//! end. Splitting it naively would leave fragments with dangling fences, so
//! every fragment is made self-contained: the first keeps the message's own
//! opening fence and gains a closing one, middle fragments are fenced on
//! both sides, and the last opens a fence that the message's own trailing
//! fence closes.
//!
//! All of the fence-overhead arithmetic lives in [`chunk_message`]; callers
//! never do offset math themselves.

/// Message-size ceiling for a single fragment, below Slack's hard limit to
/// leave headroom for gateway-added metadata.
pub const CHUNK_LIMIT: usize = 3000;

/// One fence plus its separating newline.
const FENCE_OVERHEAD: usize = 4;

/// Split `message` into fragments of at most `limit` bytes.
///
/// A message within the limit is returned unchanged as the only fragment.
/// Otherwise the first fragment carries `limit - 4` bytes of payload plus a
/// closing fence, middle fragments carry `limit - 8` between their own
/// fences, and the last carries the remainder (at most `limit - 8`) behind
/// an opening fence. Concatenating the payloads with the added fences
/// stripped reproduces the message exactly.
///
/// `limit` must exceed twice the fence overhead.
#[must_use]
pub fn chunk_message(message: &str, limit: usize) -> Vec<String> {
    debug_assert!(limit > 2 * FENCE_OVERHEAD);

    if message.len() <= limit {
        return vec![message.to_string()];
    }

    let mut fragments = Vec::new();

    // The header already opened a fence; only the closing one is added.
    let (head, mut remaining) = split_payload(message, limit - FENCE_OVERHEAD);
    fragments.push(format!("{head}\n```"));

    while remaining.len() > limit - 2 * FENCE_OVERHEAD {
        let (mid, rest) = split_payload(remaining, limit - 2 * FENCE_OVERHEAD);
        fragments.push(format!("```\n{mid}\n```"));
        remaining = rest;
    }

    // The message's own trailing fence closes this block.
    fragments.push(format!("```\n{remaining}"));

    fragments
}

/// Split at `width`, backed off to a char boundary so multi-byte characters
/// are never cut. Always consumes at least one character.
fn split_payload(text: &str, width: usize) -> (&str, &str) {
    let mut at = text.floor_char_boundary(width);
    if at == 0 {
        at = text
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(text.len());
    }
    text.split_at(at)
}
