//! Per-workspace OAuth credential storage.

use std::{collections::HashMap, path::PathBuf};

use {
    serde::{Deserialize, Serialize},
    tracing::{debug, info, warn},
};

use crate::error::{Context, Result};

/// Credentials for one installing workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceToken {
    pub team_id: String,
    #[serde(default)]
    pub team_name: Option<String>,
    pub access_token: String,
    /// Unix seconds at install time.
    #[serde(default)]
    pub installed_at: u64,
}

/// File-based token storage, a JSON map keyed by team id at
/// `~/.config/snipbot/workspace_tokens.json`.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    #[must_use]
    pub fn new() -> Self {
        let path = directories::ProjectDirs::from("", "", "snipbot")
            .map(|d| d.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("workspace_tokens.json");
        Self { path }
    }

    /// Create a token store at a specific path (useful for testing).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn load(&self, team_id: &str) -> Option<WorkspaceToken> {
        let path = self.path.display().to_string();
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path, team_id, "token file not found");
                return None;
            },
            Err(e) => {
                warn!(path = %path, team_id, error = %e, "token file read failed");
                return None;
            },
        };

        let map: HashMap<String, WorkspaceToken> = match serde_json::from_str(&data) {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %path, team_id, error = %e, "token file parse failed");
                return None;
            },
        };

        map.get(team_id).cloned()
    }

    pub fn save(&self, token: &WorkspaceToken) -> Result<()> {
        let path = self.path.display().to_string();
        info!(path = %path, team_id = %token.team_id, "saving workspace token");

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut map: HashMap<String, WorkspaceToken> = std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|d| serde_json::from_str(&d).ok())
            .unwrap_or_default();

        map.insert(token.team_id.clone(), token.clone());

        let data = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, &data).with_context(|| format!("failed to write {path}"))?;

        // Tokens are credentials; keep the file private.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn delete(&self, team_id: &str) -> Result<()> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(_) => return Ok(()),
        };

        let mut map: HashMap<String, WorkspaceToken> = serde_json::from_str(&data)?;
        map.remove(team_id);

        let data = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, &data)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    #[must_use]
    pub fn list(&self) -> Vec<String> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|d| serde_json::from_str::<HashMap<String, WorkspaceToken>>(&d).ok())
            .map(|m| m.into_keys().collect())
            .unwrap_or_default()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn token(team_id: &str) -> WorkspaceToken {
        WorkspaceToken {
            team_id: team_id.to_string(),
            team_name: Some("Acme".to_string()),
            access_token: "xoxb-1".to_string(),
            installed_at: 1_700_000_000,
        }
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::with_path(dir.path().join("tokens.json"));

        store.save(&token("T123")).unwrap();
        let loaded = store.load("T123").unwrap();

        assert_eq!(loaded.access_token, "xoxb-1");
        assert_eq!(loaded.team_name.as_deref(), Some("Acme"));
    }

    #[test]
    fn load_unknown_team_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::with_path(dir.path().join("tokens.json"));
        store.save(&token("T123")).unwrap();
        assert!(store.load("T999").is_none());
    }

    #[test]
    fn save_preserves_other_teams() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::with_path(dir.path().join("tokens.json"));

        store.save(&token("T1")).unwrap();
        store.save(&token("T2")).unwrap();

        let mut teams = store.list();
        teams.sort();
        assert_eq!(teams, vec!["T1", "T2"]);
    }

    #[test]
    fn delete_removes_only_the_named_team() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::with_path(dir.path().join("tokens.json"));

        store.save(&token("T1")).unwrap();
        store.save(&token("T2")).unwrap();
        store.delete("T1").unwrap();

        assert!(store.load("T1").is_none());
        assert!(store.load("T2").is_some());
    }

    #[test]
    fn delete_on_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::with_path(dir.path().join("tokens.json"));
        store.delete("T1").unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let store = TokenStore::with_path(path.clone());
        store.save(&token("T1")).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
