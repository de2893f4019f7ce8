//! Line-range extraction from raw file content.

use crate::command::LineRange;

/// The lines extracted for one request, plus the range to show in the
/// message header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSlice {
    pub lines: Vec<String>,
    /// `(start, end)` as requested, with the end-of-file sentinel resolved
    /// to the actual last line. `None` when the whole file was requested.
    /// Clamping is not reflected here — the header echoes what was asked.
    pub display_range: Option<(usize, usize)>,
}

impl CodeSlice {
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Take the inclusive 1-based `[start, end]` range out of `content`.
///
/// `start` is clamped to 1 and `end` to the line count. An inverted or
/// fully out-of-bounds range yields an empty slice, not an error — the
/// requester gets an empty code block instead of a rejection.
#[must_use]
pub fn extract(content: &str, range: Option<LineRange>) -> CodeSlice {
    let lines: Vec<&str> = content.split('\n').collect();

    let Some(range) = range else {
        return CodeSlice {
            lines: lines.iter().map(ToString::to_string).collect(),
            display_range: None,
        };
    };

    let last = lines.len();
    let end = range.end.unwrap_or(last);

    let lo = range.start.max(1);
    let hi = end.min(last);
    let selected = if lo > hi {
        Vec::new()
    } else {
        lines[lo - 1..hi].iter().map(ToString::to_string).collect()
    };

    CodeSlice {
        lines: selected,
        display_range: Some((range.start, end)),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "one\ntwo\nthree\nfour\nfive";

    fn span(start: usize, end: usize) -> Option<LineRange> {
        Some(LineRange {
            start,
            end: Some(end),
        })
    }

    #[test]
    fn whole_file_when_range_absent() {
        let slice = extract(FILE, None);
        assert_eq!(slice.lines.len(), 5);
        assert_eq!(slice.display_range, None);
        assert_eq!(slice.text(), FILE);
    }

    #[test]
    fn inclusive_one_based_span() {
        let slice = extract(FILE, span(2, 4));
        assert_eq!(slice.text(), "two\nthree\nfour");
        assert_eq!(slice.display_range, Some((2, 4)));
    }

    #[test]
    fn sentinel_resolves_to_last_line() {
        let slice = extract(FILE, Some(LineRange {
            start: 3,
            end: None
        }));
        assert_eq!(slice.text(), "three\nfour\nfive");
        assert_eq!(slice.display_range, Some((3, 5)));
    }

    #[test]
    fn end_clamps_to_file_length() {
        let slice = extract(FILE, span(4, 400));
        assert_eq!(slice.text(), "four\nfive");
        // The header still echoes the requested end.
        assert_eq!(slice.display_range, Some((4, 400)));
    }

    #[test]
    fn zero_start_clamps_to_one() {
        let slice = extract(FILE, span(0, 2));
        assert_eq!(slice.text(), "one\ntwo");
    }

    #[test]
    fn inverted_range_is_empty_not_an_error() {
        let slice = extract(FILE, span(4, 2));
        assert!(slice.lines.is_empty());
    }

    #[test]
    fn start_past_end_of_file_is_empty() {
        let slice = extract(FILE, span(9, 12));
        assert!(slice.lines.is_empty());
    }

    #[test]
    fn single_line_file() {
        let slice = extract("only", span(1, 1));
        assert_eq!(slice.text(), "only");
    }
}
