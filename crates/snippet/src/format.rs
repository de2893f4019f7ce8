//! Outbound message construction.

use crate::command::FileRequest;

/// Build the reply message: a header line naming the range, path, and
/// repository, followed by the code in a triple-backtick fence.
///
/// The branch clause appears only when a ref was explicitly requested; the
/// provider-side default is not echoed back.
#[must_use]
pub fn build_message(request: &FileRequest, range: Option<(usize, usize)>, code: &str) -> String {
    let mut message = String::new();

    if let Some((start, end)) = range {
        message.push_str(&format!("Lines {start} to {end} from "));
    }

    message.push_str(&request.path);
    message.push_str(" in ");

    if let Some(ref git_ref) = request.git_ref {
        message.push_str(&format!("the {git_ref} branch of "));
    }

    message.push_str(&format!("{}/{}:\n", request.owner, request.repo));
    message.push_str(&format!("```\n{code}\n```"));

    message
}
