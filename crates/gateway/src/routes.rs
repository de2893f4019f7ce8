use std::sync::Arc;

use {
    axum::{
        Json, Router,
        extract::{Form, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    serde::Deserialize,
    tracing::warn,
};

use snipbot_slack::{CommandReply, SlashCommand, verify_token};

use crate::{
    pipeline::{self, CommandOutcome},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/slack/commands", post(slash_command))
        .route("/slack/oauth", get(oauth_redirect))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Slash-command entry point. The direct reply rides back on this response;
/// any remaining fragments are delivered to the response URL afterwards.
async fn slash_command(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<SlashCommand>,
) -> Response {
    if !verify_token(&state.config.slack.verification_token, &payload.token) {
        warn!(team_id = %payload.team_id, "incorrect verification token, ignoring request");
        return StatusCode::OK.into_response();
    }

    if payload.command != state.config.slack.command {
        return Json(CommandReply::public(format!(
            "I'm afraid I don't know how to {} yet.",
            payload.command
        )))
        .into_response();
    }

    let outcome =
        pipeline::run_command(&state.github, state.telemetry.as_ref(), &payload).await;
    let reply = outcome.direct_reply();

    if let CommandOutcome::Snippet { fragments } = outcome
        && fragments.len() > 1
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            pipeline::deliver_followups(
                state.dispatcher.as_ref(),
                state.telemetry.as_ref(),
                &payload,
                &fragments,
            )
            .await;
        });
    }

    Json(reply).into_response()
}

#[derive(Debug, Deserialize)]
struct OAuthQuery {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth v2 redirect target: exchange the code and persist the workspace
/// token.
async fn oauth_redirect(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OAuthQuery>,
) -> Response {
    if let Some(error) = query.error {
        warn!(%error, "oauth redirect carried an error");
        return (StatusCode::BAD_REQUEST, format!("ERROR: {error}")).into_response();
    }

    let Some(code) = query.code else {
        return (StatusCode::BAD_REQUEST, "ERROR: missing code".to_string()).into_response();
    };

    let token = match state.oauth.exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => {
            warn!(error = %e, "oauth code exchange failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("ERROR: {e}")).into_response();
        },
    };

    if let Err(e) = state.tokens.save(&token) {
        warn!(error = %e, team_id = %token.team_id, "failed to persist workspace token");
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("ERROR: {e}")).into_response();
    }

    (StatusCode::OK, "Success!".to_string()).into_response()
}
