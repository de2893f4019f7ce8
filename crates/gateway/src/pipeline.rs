//! The per-command pipeline: parse → fetch → slice/normalize/format → chunk.
//!
//! One logical flow per invocation, no shared state. Everything the handler
//! needs back is in [`CommandOutcome`]; follow-up delivery is separate so
//! the direct reply is never held up by it.

use tracing::{debug, warn};

use {
    snipbot_github::ContentClient,
    snipbot_slack::{CommandReply, ReplyDispatcher, SlashCommand, send_followups},
    snipbot_snippet::{CHUNK_LIMIT, chunk_message, parse, render},
};

use crate::telemetry::{ErrorContext, TelemetrySink};

/// What came out of one slash-command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A single reply and nothing else — every error path lands here.
    Reply(CommandReply),
    /// A rendered snippet. Fragment 0 is the direct reply; the rest are
    /// posted to the response URL afterwards.
    Snippet { fragments: Vec<String> },
}

impl CommandOutcome {
    #[must_use]
    pub fn direct_reply(&self) -> CommandReply {
        match self {
            Self::Reply(reply) => reply.clone(),
            Self::Snippet { fragments } => {
                CommandReply::public(fragments.first().cloned().unwrap_or_default())
            },
        }
    }

    /// The full fragment list when there is anything to follow up with.
    #[must_use]
    pub fn fragments(&self) -> &[String] {
        match self {
            Self::Reply(_) => &[],
            Self::Snippet { fragments } => fragments,
        }
    }
}

/// Run one command through the pipeline.
///
/// Parse errors reply ephemerally with the corrective help text and are not
/// reported — they are user mistakes. Fetch errors reply ephemerally with
/// the provider's message and are reported with the command context, except
/// not-found, which stays out of telemetry.
pub async fn run_command(
    github: &ContentClient,
    telemetry: &dyn TelemetrySink,
    payload: &SlashCommand,
) -> CommandOutcome {
    let request = match parse(&payload.text) {
        Ok(request) => request,
        Err(e) => {
            debug!(text = %payload.text, "rejected malformed command");
            return CommandOutcome::Reply(CommandReply::ephemeral(e.to_string()));
        },
    };

    let content = match github.fetch(&request).await {
        Ok(content) => content,
        Err(e) => {
            if !e.is_not_found() {
                telemetry
                    .capture(&e.to_string(), &error_context(payload))
                    .await;
            }
            return CommandOutcome::Reply(CommandReply::ephemeral(e.to_string()));
        },
    };

    let message = render(&request, &content);
    CommandOutcome::Snippet {
        fragments: chunk_message(&message, CHUNK_LIMIT),
    }
}

/// Drain the follow-up chain for a snippet outcome. A failed post ends the
/// chain and is reported, never propagated — the direct reply already went
/// out.
pub async fn deliver_followups(
    dispatcher: &dyn ReplyDispatcher,
    telemetry: &dyn TelemetrySink,
    payload: &SlashCommand,
    fragments: &[String],
) {
    if let Err(e) = send_followups(dispatcher, &payload.response_url, fragments).await {
        warn!(error = %e, response_url = %payload.response_url, "follow-up delivery failed");
        telemetry
            .capture(
                &format!("follow-up delivery failed: {e}"),
                &error_context(payload),
            )
            .await;
    }
}

fn error_context(payload: &SlashCommand) -> ErrorContext {
    ErrorContext {
        command: payload.command.clone(),
        raw_text: payload.text.clone(),
        team_id: payload.team_id.clone(),
        channel_id: payload.channel_id.clone(),
        user_id: payload.user_id.clone(),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use {async_trait::async_trait, base64::Engine, snipbot_slack::ResponseType};

    use super::*;

    #[derive(Default, Clone)]
    struct RecordingSink {
        reports: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl TelemetrySink for RecordingSink {
        async fn capture(&self, message: &str, context: &ErrorContext) {
            self.reports
                .lock()
                .unwrap()
                .push((message.to_string(), context.raw_text.clone()));
        }
    }

    fn payload(text: &str) -> SlashCommand {
        SlashCommand {
            token: "tok".into(),
            command: "/snip".into(),
            text: text.into(),
            team_id: "T1".into(),
            channel_id: "C1".into(),
            user_id: "U1".into(),
            response_url: "https://hooks.example/1".into(),
        }
    }

    fn contents_body(text: &str) -> String {
        serde_json::json!({
            "type": "file",
            "encoding": "base64",
            "content": base64::engine::general_purpose::STANDARD.encode(text),
        })
        .to_string()
    }

    async fn mock_contents(server: &mut mockito::Server, status: usize, body: String) {
        server
            .mock("GET", "/repos/acme/widgets/contents/src/main.c")
            .match_query(mockito::Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
    }

    #[tokio::test]
    async fn happy_path_yields_public_snippet() {
        let mut server = mockito::Server::new_async().await;
        mock_contents(&mut server, 200, contents_body("\tone\n\ttwo\n\tthree\n")).await;

        let github = ContentClient::with_api_base(server.url(), None);
        let sink = RecordingSink::default();
        let outcome = run_command(&github, &sink, &payload("acme/widgets:src/main.c:1-2")).await;

        let reply = outcome.direct_reply();
        assert_eq!(reply.response_type, ResponseType::InChannel);
        assert_eq!(
            reply.text,
            "Lines 1 to 2 from src/main.c in acme/widgets:\n```\none\ntwo\n```"
        );
        assert_eq!(outcome.fragments().len(), 1);
        assert!(sink.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn parse_error_is_ephemeral_and_unreported() {
        let github = ContentClient::with_api_base("http://127.0.0.1:9", None);
        let sink = RecordingSink::default();
        let outcome = run_command(&github, &sink, &payload("nonsense")).await;

        let reply = outcome.direct_reply();
        assert_eq!(reply.response_type, ResponseType::Ephemeral);
        assert!(reply.text.contains("Example command"));
        assert!(outcome.fragments().is_empty());
        assert!(sink.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn not_found_is_ephemeral_and_stays_out_of_telemetry() {
        let mut server = mockito::Server::new_async().await;
        mock_contents(&mut server, 404, r#"{"message":"Not Found"}"#.to_string()).await;

        let github = ContentClient::with_api_base(server.url(), None);
        let sink = RecordingSink::default();
        let outcome = run_command(&github, &sink, &payload("acme/widgets:src/main.c")).await;

        let reply = outcome.direct_reply();
        assert_eq!(reply.response_type, ResponseType::Ephemeral);
        assert_eq!(reply.text, "Not Found");
        assert!(sink.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_reported_with_context() {
        let mut server = mockito::Server::new_async().await;
        mock_contents(&mut server, 500, r#"{"message":"boom"}"#.to_string()).await;

        let github = ContentClient::with_api_base(server.url(), None);
        let sink = RecordingSink::default();
        let outcome = run_command(&github, &sink, &payload("acme/widgets:src/main.c")).await;

        assert_eq!(outcome.direct_reply().response_type, ResponseType::Ephemeral);
        let reports = sink.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].0.contains("500"));
        assert_eq!(reports[0].1, "acme/widgets:src/main.c");
    }

    #[tokio::test]
    async fn long_file_chunks_into_followups() {
        let mut server = mockito::Server::new_async().await;
        let big_line = "x".repeat(80);
        let file: String = (0..200).map(|_| format!("{big_line}\n")).collect();
        mock_contents(&mut server, 200, contents_body(&file)).await;

        let github = ContentClient::with_api_base(server.url(), None);
        let sink = RecordingSink::default();
        let outcome = run_command(&github, &sink, &payload("acme/widgets:src/main.c")).await;

        let fragments = outcome.fragments();
        assert!(fragments.len() > 1);
        for fragment in fragments {
            assert!(fragment.len() <= CHUNK_LIMIT);
        }
        assert_eq!(outcome.direct_reply().text, fragments[0]);
    }

    #[tokio::test]
    async fn failed_followup_is_reported_not_propagated() {
        #[derive(Default)]
        struct FailingDispatcher;

        #[async_trait]
        impl ReplyDispatcher for FailingDispatcher {
            async fn send_followup(
                &self,
                _url: &str,
                _reply: &CommandReply,
            ) -> snipbot_slack::Result<()> {
                Err(snipbot_slack::Error::Api("gone".into()))
            }
        }

        let sink = RecordingSink::default();
        let fragments = vec!["first".to_string(), "second".to_string()];
        deliver_followups(&FailingDispatcher, &sink, &payload("a/b:c"), &fragments).await;

        let reports = sink.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].0.contains("follow-up delivery failed"));
    }
}
