use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::gateway::GatewayError;
use crate::schema::SchemaVersion;

pub const MISSING_CONFIG_MESSAGE: &str =
    "Missing Supabase config. Set SUPABASE_URL and SUPABASE_ANON_KEY.";

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_LEADERBOARD_POLL_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub url: String,
    pub anon_key: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(url: &str, anon_key: &str) -> Self {
        Self {
            url: url.trim().trim_end_matches('/').to_string(),
            anon_key: anon_key.trim().to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self, GatewayError> {
        let url = non_empty_env("SUPABASE_URL").or_else(|| non_empty_env("SUPABASE_DATABASE_URL"));
        let anon_key = non_empty_env("SUPABASE_ANON_KEY");
        let (Some(url), Some(anon_key)) = (url, anon_key) else {
            return Err(GatewayError::Config(MISSING_CONFIG_MESSAGE.to_string()));
        };
        let timeout_secs = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 300);

        let mut cfg = Self::new(&url, &anon_key);
        cfg.timeout = Duration::from_secs(timeout_secs);
        Ok(cfg)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gateway: Result<GatewayConfig, GatewayError>,
    pub schema: SchemaVersion,
    pub leaderboard_poll: Duration,
    pub session_file: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `.env.local` and `.env` (first one wins per key), then the process env.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        let leaderboard_poll = env::var("LEADERBOARD_POLL_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_LEADERBOARD_POLL_SECS)
            .max(5);
        Self {
            gateway: GatewayConfig::from_env(),
            schema: SchemaVersion::from_env(),
            leaderboard_poll: Duration::from_secs(leaderboard_poll),
            session_file: non_empty_env("WK_POULE_SESSION_FILE").map(PathBuf::from),
        }
    }

    pub fn config_warning(&self) -> Option<String> {
        self.gateway.as_ref().err().map(|err| err.to_string())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
