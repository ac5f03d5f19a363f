use std::env;

pub const COUNTRIES: &str = "landen";
pub const MATCHES: &str = "wedstrijden_poulfase";
pub const TOURNAMENT_PREDICTIONS: &str = "voorspellingen_toernooi";
pub const USERS: &str = "users";
pub const LEADERBOARD: &str = "leaderboard";

pub const MATCH_COLUMNS: &str =
    "*, home:landen!home_team_id(land, groep), away:landen!away_team_id(land)";

pub const MATCH_PREDICTION_KEY: [&str; 2] = ["user_id", "match_id"];
pub const TOURNAMENT_PREDICTION_KEY: [&str; 2] = ["user_id", "land_id"];

pub const RPC_LOGIN: &str = "login_user";
pub const RPC_CHECK_ADMIN: &str = "check_is_admin";
pub const RPC_CHANGE_PASSWORD: &str = "secure_change_password";
pub const RPC_SAVE_ADMIN: &str = "save_admin_data";
pub const RPC_PROFILE: &str = "get_user_profile";

/// Each version is one migration step of the match-prediction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaVersion {
    V1,
    #[default]
    V2,
    V3,
}

impl SchemaVersion {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().trim_start_matches(['v', 'V']) {
            "1" => Some(Self::V1),
            "2" => Some(Self::V2),
            "3" => Some(Self::V3),
            _ => None,
        }
    }

    pub fn from_env() -> Self {
        env::var("SCHEMA_VERSION")
            .ok()
            .and_then(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    pub fn contract(self) -> Schema {
        match self {
            Self::V1 => Schema {
                version: self,
                match_predictions: "voorspellingen",
                predicted_home: "goals_home",
                predicted_away: "goals_away",
            },
            Self::V2 => Schema {
                version: self,
                match_predictions: "voorspellingen_wedstrijden",
                predicted_home: "goals_home",
                predicted_away: "goals_away",
            },
            Self::V3 => Schema {
                version: self,
                match_predictions: "voorspellingen_wedstrijden",
                predicted_home: "voorspeld_thuis",
                predicted_away: "voordspeld_uit",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub version: SchemaVersion,
    pub match_predictions: &'static str,
    pub predicted_home: &'static str,
    pub predicted_away: &'static str,
}

impl Default for Schema {
    fn default() -> Self {
        SchemaVersion::default().contract()
    }
}
