//! Immutable startup configuration.
//!
//! Configuration is resolved once at startup — file, then `${ENV_VAR}`
//! substitution, then `SNIPBOT_*` environment overrides — and handed to the
//! pipeline components as a plain struct. Nothing below the CLI reads the
//! process environment.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config},
    schema::{ConfigError, GitHubConfig, ServerConfig, SlackConfig, SnipbotConfig, TelemetryConfig},
};
