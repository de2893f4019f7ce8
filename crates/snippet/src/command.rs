//! Slash-command text parsing.
//!
//! The inbound command text has the shape
//! `"<owner>/<repo>[/<ref>]:<path>[:<range>]"` where `<range>` is one of
//! `a-b`, `a-` (to end of file), or `-b` (from line 1).

use thiserror::Error;

/// A parsed request for a slice of one file in one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRequest {
    pub owner: String,
    pub repo: String,
    /// Branch, tag, or commit. `None` means the provider default (`master`);
    /// the header only names a branch when one was explicitly requested.
    pub git_ref: Option<String>,
    pub path: String,
    pub range: Option<LineRange>,
}

/// An inclusive, 1-based line range. `end: None` is the end-of-file
/// sentinel.
///
/// `end >= start` is deliberately not enforced here — the slicer treats an
/// inverted or out-of-bounds range as an empty slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: Option<usize>,
}

/// User-input errors. Each renders as the corrective help text sent back as
/// an ephemeral reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Insufficient or too much data.\nExample command: `/snip octocat/hello-world:index.js:1-5`, where `octocat/hello-world` is a GitHub repository, `index.js` is the path of the requested file, and `1-5` is lines 1 to 5 (optional)."
    )]
    MalformedCommand,

    #[error(
        "Invalid specification of repository owner and repository name (and branch name, optional). (ex. \"octocat/hello-world\", \"octocat/hello-world/master\")"
    )]
    MalformedRepoSpec,

    #[error("Invalid specification of line range. (ex. \"5-10\", \"5-\", \"-10\")")]
    MalformedLineRange,
}

/// Parse raw slash-command text into a [`FileRequest`]. Pure.
pub fn parse(raw: &str) -> Result<FileRequest, ParseError> {
    let fields: Vec<&str> = raw.split(':').collect();
    if fields.len() < 2 || fields.len() > 3 {
        return Err(ParseError::MalformedCommand);
    }

    let (owner, repo, git_ref) = parse_repo_spec(fields[0])?;

    let range = match fields.get(2) {
        Some(spec) => Some(parse_range(spec)?),
        None => None,
    };

    Ok(FileRequest {
        owner: owner.to_string(),
        repo: repo.to_string(),
        git_ref: git_ref.map(str::to_string),
        path: fields[1].to_string(),
        range,
    })
}

fn parse_repo_spec(spec: &str) -> Result<(&str, &str, Option<&str>), ParseError> {
    let parts: Vec<&str> = spec.split('/').collect();
    let (owner, repo, git_ref) = match parts.as_slice() {
        [owner, repo] => (*owner, *repo, None),
        [owner, repo, git_ref] => (*owner, *repo, Some(*git_ref)),
        _ => return Err(ParseError::MalformedRepoSpec),
    };
    if owner.is_empty() || repo.is_empty() || git_ref.is_some_and(str::is_empty) {
        return Err(ParseError::MalformedRepoSpec);
    }
    Ok((owner, repo, git_ref))
}

/// Match `a-b`, `a-`, then `-b`, in that order. Numbers are non-negative;
/// no upper bound — out-of-range values are clamped against the actual file
/// later.
fn parse_range(spec: &str) -> Result<LineRange, ParseError> {
    let (start, end) = spec.split_once('-').ok_or(ParseError::MalformedLineRange)?;
    let number =
        |s: &str| s.parse::<usize>().map_err(|_| ParseError::MalformedLineRange);

    match (start.is_empty(), end.is_empty()) {
        (false, false) => Ok(LineRange {
            start: number(start)?,
            end: Some(number(end)?),
        }),
        (false, true) => Ok(LineRange {
            start: number(start)?,
            end: None,
        }),
        (true, false) => Ok(LineRange {
            start: 1,
            end: Some(number(end)?),
        }),
        (true, true) => Err(ParseError::MalformedLineRange),
    }
}
