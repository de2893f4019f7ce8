//! Indentation normalization for extracted code slices.
//!
//! A slice pulled out of the middle of a file usually carries the nesting
//! depth of its surroundings, often with tabs and spaces mixed. This module
//! re-indents it to read naturally on its own: tabs become spaces, blank
//! lines get filled so they don't break the visual indent guide, and the
//! common leading-whitespace prefix is stripped.

/// Tab expansion width. Fixed, not configurable.
const TAB_WIDTH: usize = 4;

/// Normalize the indentation of a code slice.
///
/// 1. Expand every tab to [`TAB_WIDTH`] spaces.
/// 2. Replace each empty line with synthetic indentation copied from its
///    nearest usable neighbor (next line for the first line, previous line
///    otherwise; zero if there is no neighbor).
/// 3. Strip the minimum leading-whitespace width from every line.
///
/// Idempotent on any real code slice.
#[must_use]
pub fn normalize(code: &str) -> String {
    let expanded: Vec<String> = code
        .split('\n')
        .map(|line| line.replace('\t', &" ".repeat(TAB_WIDTH)))
        .collect();

    let filled = fill_blank_lines(expanded);

    let baseline = filled.iter().map(|l| indent_width(l)).min().unwrap_or(0);

    filled
        .iter()
        .map(|line| outdent(line, baseline))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Give empty lines a plausible indentation so they don't visually collapse
/// when rendered.
fn fill_blank_lines(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if !line.is_empty() {
            out.push(line.clone());
            continue;
        }
        let width = if i == 0 {
            lines.get(1).map_or(0, |next| indent_width(next))
        } else {
            indent_width(&out[i - 1])
        };
        out.push(" ".repeat(width));
    }
    out
}

/// Leading-space count. A whitespace-only line counts its full length.
fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count()
}

/// Strip exactly `width` leading characters, floored at the line length so a
/// line shorter than the computed baseline never underflows.
fn outdent(line: &str, width: usize) -> String {
    line.get(width.min(line.len())..).unwrap_or("").to_string()
}
