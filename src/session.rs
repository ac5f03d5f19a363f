use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::SessionUser;

const SESSION_DIR: &str = "wk_poule";
const SESSION_FILE: &str = "current_user.json";
const SESSION_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    saved_at: String,
    current_user: SessionUser,
}

/// Keeps the logged-in user between runs in one well-known file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn from_override(path: Option<PathBuf>) -> Self {
        Self {
            path: path.or_else(default_session_path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load(&self) -> Option<SessionUser> {
        let path = self.path.as_ref()?;
        let raw = fs::read_to_string(path).ok()?;
        let file = serde_json::from_str::<SessionFile>(&raw).ok()?;
        if file.version != SESSION_VERSION || !file.current_user.id.is_present() {
            return None;
        }
        Some(file.current_user)
    }

    pub fn save(&self, user: &SessionUser) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("create session dir")?;
        }
        let file = SessionFile {
            version: SESSION_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            current_user: user.clone(),
        };
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&file).context("serialize session")?;
        fs::write(&tmp, json).context("write session")?;
        fs::rename(&tmp, path).context("swap session")?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).context("remove session"),
        }
    }
}

fn default_session_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CONFIG_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(SESSION_DIR).join(SESSION_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(SESSION_DIR)
            .join(SESSION_FILE),
    )
}
