//! Full command flow: slash-command post → GitHub fetch → chunked reply,
//! with follow-up fragments landing on the response URL in order.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{sync::Arc, time::Duration};

use {
    base64::Engine,
    secrecy::Secret,
    snipbot_config::SnipbotConfig,
    snipbot_gateway::{AppState, router},
};

fn test_config(github_base: &str) -> SnipbotConfig {
    let mut config = SnipbotConfig::default();
    config.slack.client_id = "123.456".into();
    config.slack.client_secret = Secret::new("shh".into());
    config.slack.verification_token = Secret::new("tok".into());
    config.github.api_base = Some(github_base.to_string());
    config
}

async fn spawn_app(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(Arc::new(state))).await.unwrap();
    });
    format!("http://{addr}")
}

fn contents_body(text: &str) -> String {
    serde_json::json!({
        "type": "file",
        "encoding": "base64",
        "content": base64::engine::general_purpose::STANDARD.encode(text),
    })
    .to_string()
}

#[tokio::test]
async fn long_snippet_is_delivered_as_ordered_fragments() {
    let mut github = mockito::Server::new_async().await;
    let mut hooks = mockito::Server::new_async().await;

    // ~16 kB of file content: enough for six fragments at the 3000 limit.
    let line = "0123456789abcdef".repeat(5);
    let file: String = (0..200).map(|_| format!("{line}\n")).collect();

    github
        .mock("GET", "/repos/acme/widgets/contents/src/big.rs")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(contents_body(&file))
        .create_async()
        .await;

    let followups = hooks
        .mock("POST", "/services/T1/hook")
        .match_header("content-type", "application/json")
        .with_status(200)
        .expect_at_least(5)
        .create_async()
        .await;

    let base = spawn_app(AppState::new(test_config(&github.url()))).await;

    let hook_url = format!("{}/services/T1/hook", hooks.url());
    let body: serde_json::Value = reqwest::Client::new()
        .post(format!("{base}/slack/commands"))
        .form(&[
            ("token", "tok"),
            ("command", "/snip"),
            ("text", "acme/widgets:src/big.rs"),
            ("team_id", "T1"),
            ("channel_id", "C1"),
            ("user_id", "U1"),
            ("response_url", hook_url.as_str()),
        ])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Direct reply: public, carries the header, stays within the limit.
    assert_eq!(body["response_type"], "in_channel");
    let text = body["text"].as_str().unwrap();
    assert!(text.starts_with("src/big.rs in acme/widgets:\n```\n"));
    assert!(text.len() <= 3000);
    assert!(text.ends_with("\n```"));

    // The follow-up chain is posted after the direct reply; give it a
    // moment to drain.
    let mut delivered = false;
    for _ in 0..50 {
        if followups.matched_async().await {
            delivered = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(delivered, "expected at least five follow-up posts");
}

#[tokio::test]
async fn short_snippet_needs_no_followups() {
    let mut github = mockito::Server::new_async().await;

    github
        .mock("GET", "/repos/acme/widgets/contents/src/main.c")
        .match_query(mockito::Matcher::UrlEncoded("ref".into(), "master".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(contents_body(
            "int main(void) {\n\tint a = 1;\n\tint b = 2;\n\treturn a + b;\n}\n5\n6\n7\n8\n9\n10\n",
        ))
        .create_async()
        .await;

    let base = spawn_app(AppState::new(test_config(&github.url()))).await;

    let body: serde_json::Value = reqwest::Client::new()
        .post(format!("{base}/slack/commands"))
        .form(&[
            ("token", "tok"),
            ("command", "/snip"),
            ("text", "acme/widgets:src/main.c:2-4"),
            ("team_id", "T1"),
            ("channel_id", "C1"),
            ("user_id", "U1"),
            ("response_url", "https://hooks.example/unused"),
        ])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["response_type"], "in_channel");
    assert_eq!(
        body["text"],
        "Lines 2 to 4 from src/main.c in acme/widgets:\n```\nint a = 1;\nint b = 2;\nreturn a + b;\n```"
    );
}
