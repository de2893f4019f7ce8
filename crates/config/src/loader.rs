use std::path::{Path, PathBuf};

use {secrecy::Secret, tracing::{debug, warn}};

use crate::{
    env_subst::substitute_env,
    schema::{ConfigError, SnipbotConfig},
};

const CONFIG_FILENAME: &str = "snipbot.toml";

/// Load config from an explicit path, with `${ENV_VAR}` substitution.
pub fn load_config(path: &Path) -> Result<SnipbotConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let raw = substitute_env(&raw);
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Discover and load config from standard locations, then apply `SNIPBOT_*`
/// environment overrides.
///
/// Search order:
/// 1. `./snipbot.toml` (project-local)
/// 2. `~/.config/snipbot/snipbot.toml` (user-global)
///
/// Falls back to defaults when no file is found; a file that fails to load
/// is reported and skipped rather than aborting discovery.
#[must_use]
pub fn discover_and_load() -> SnipbotConfig {
    let mut config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            match load_config(&path) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                    SnipbotConfig::default()
                },
            }
        },
        None => {
            debug!("no config file found, using defaults");
            SnipbotConfig::default()
        },
    };
    overlay_env(&mut config);
    config
}

/// Returns the user-global config directory (`~/.config/snipbot/`).
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "snipbot").map(|d| d.config_dir().to_path_buf())
}

fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }

    let global = config_dir()?.join(CONFIG_FILENAME);
    global.exists().then_some(global)
}

fn overlay_env(config: &mut SnipbotConfig) {
    overlay_with(config, |name| std::env::var(name).ok());
}

/// Apply `SNIPBOT_*` overrides from an injectable lookup.
fn overlay_with(config: &mut SnipbotConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(bind) = lookup("SNIPBOT_BIND") {
        config.server.bind = bind;
    }
    if let Some(port) = lookup("SNIPBOT_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(port = %port, "ignoring non-numeric SNIPBOT_PORT"),
        }
    }
    if let Some(id) = lookup("SNIPBOT_SLACK_CLIENT_ID") {
        config.slack.client_id = id;
    }
    if let Some(secret) = lookup("SNIPBOT_SLACK_CLIENT_SECRET") {
        config.slack.client_secret = Secret::new(secret);
    }
    if let Some(token) = lookup("SNIPBOT_SLACK_VERIFICATION_TOKEN") {
        config.slack.verification_token = Secret::new(token);
    }
    if let Some(url) = lookup("SNIPBOT_SLACK_REDIRECT_URL") {
        config.slack.redirect_url = Some(url);
    }
    if let Some(token) = lookup("SNIPBOT_GITHUB_TOKEN") {
        config.github.token = Some(Secret::new(token));
    }
    if let Some(base) = lookup("SNIPBOT_GITHUB_API_BASE") {
        config.github.api_base = Some(base);
    }
    if let Some(url) = lookup("SNIPBOT_TELEMETRY_WEBHOOK") {
        config.telemetry.webhook_url = Some(url);
    }
}
