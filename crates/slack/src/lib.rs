//! Slack plumbing: slash-command payload types, verification-token check,
//! reply dispatch over `response_url`, the OAuth v2 code exchange, and the
//! per-workspace token store.
//!
//! Nothing in here understands the snippet pipeline; it moves strings in and
//! out of Slack.

pub mod error;
pub mod oauth;
pub mod reply;
pub mod store;
pub mod types;
pub mod verify;

pub use {
    error::{Error, Result},
    oauth::OAuthClient,
    reply::{HttpReplyDispatcher, ReplyDispatcher, send_followups},
    store::{TokenStore, WorkspaceToken},
    types::{CommandReply, ResponseType, SlashCommand},
    verify::verify_token,
};
