use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::schema::Schema;

pub type CountryId = i64;
pub type MatchId = i64;

/// Backend user ids are sent back exactly as received (number or uuid string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Value);

impl UserId {
    pub fn is_present(&self) -> bool {
        match &self.0 {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(Value::from(id))
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(Value::from(id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundFlags {
    #[serde(default, deserialize_with = "null_as_false")]
    pub laatste_32: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub laatste_16: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub kwartfinale: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub halvefinale: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub finale: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub winnaar: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub land: String,
    #[serde(default)]
    pub groep: Option<String>,
    #[serde(flatten)]
    pub flags: RoundFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamRef {
    #[serde(default)]
    pub land: Option<String>,
    #[serde(default)]
    pub groep: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRow {
    pub match_id: MatchId,
    #[serde(default)]
    pub home_team_id: Option<CountryId>,
    #[serde(default)]
    pub away_team_id: Option<CountryId>,
    #[serde(default)]
    pub home: Option<TeamRef>,
    #[serde(default)]
    pub away: Option<TeamRef>,
    #[serde(default)]
    pub goals_home: Option<i64>,
    #[serde(default)]
    pub goals_against: Option<i64>,
}

impl MatchRow {
    pub fn group_label(&self) -> String {
        self.home
            .as_ref()
            .and_then(|team| team.groep.clone())
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| "KO".to_string())
    }

    pub fn home_name(&self) -> String {
        team_name(self.home.as_ref()).unwrap_or_else(|| "Thuis".to_string())
    }

    pub fn away_name(&self) -> String {
        team_name(self.away.as_ref()).unwrap_or_else(|| "Uit".to_string())
    }
}

fn team_name(team: Option<&TeamRef>) -> Option<String> {
    team.and_then(|t| t.land.clone()).filter(|n| !n.trim().is_empty())
}

/// A stored score prediction, read through the active schema contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPrediction {
    pub match_id: MatchId,
    pub home: Option<u16>,
    pub away: Option<u16>,
}

impl MatchPrediction {
    pub fn from_row(row: &Value, schema: &Schema) -> Option<Self> {
        let match_id = row.get("match_id")?.as_i64()?;
        Some(Self {
            match_id,
            home: score_field(row, schema.predicted_home),
            away: score_field(row, schema.predicted_away),
        })
    }
}

fn score_field(row: &Value, column: &str) -> Option<u16> {
    row.get(column)
        .and_then(Value::as_u64)
        .and_then(|n| u16::try_from(n).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentPrediction {
    pub land_id: CountryId,
    #[serde(flatten)]
    pub flags: RoundFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub speler_naam: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub totaal_punten: i64,
}

/// The user record returned by `login_user`, cached between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionUser {
    pub fn from_value(value: Value) -> Option<Self> {
        let user: SessionUser = serde_json::from_value(value).ok()?;
        user.id.is_present().then_some(user)
    }

    pub fn email(&self) -> Option<&str> {
        self.text_field(&["email", "login_email"])
    }

    pub fn display_name(&self) -> Option<&str> {
        self.text_field(&["full_name", "display_name", "name"])
    }

    /// Embedded admin flag. Only a hint for the UI; access is decided by the backend.
    pub fn admin_hint(&self) -> bool {
        self.extra
            .get("is_admin")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn text_field(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.extra.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(|v| v.round() as i64).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Country, LeaderboardEntry, MatchPrediction, MatchRow, SessionUser};
    use crate::schema::SchemaVersion;

    #[test]
    fn country_null_flags_read_as_false() {
        let country: Country = serde_json::from_value(json!({
            "id": 7,
            "land": "Nederland",
            "groep": "A",
            "laatste_32": true,
            "finale": null
        }))
        .expect("country row");
        assert!(country.flags.laatste_32);
        assert!(!country.flags.finale);
        assert!(!country.flags.winnaar);
    }

    #[test]
    fn match_without_home_group_lands_in_ko() {
        let row: MatchRow = serde_json::from_value(json!({
            "match_id": 60,
            "home": null,
            "away": {"land": "Brazilië"}
        }))
        .expect("match row");
        assert_eq!(row.group_label(), "KO");
        assert_eq!(row.home_name(), "Thuis");
        assert_eq!(row.away_name(), "Brazilië");
    }

    #[test]
    fn prediction_columns_follow_schema() {
        let row = json!({"match_id": 3, "voorspeld_thuis": 1, "voordspeld_uit": 0});
        let v3 = SchemaVersion::V3.contract();
        let v2 = SchemaVersion::V2.contract();
        let pred = MatchPrediction::from_row(&row, &v3).expect("v3 row");
        assert_eq!((pred.home, pred.away), (Some(1), Some(0)));
        let pred = MatchPrediction::from_row(&row, &v2).expect("v2 row");
        assert_eq!((pred.home, pred.away), (None, None));
    }

    #[test]
    fn leaderboard_tolerates_null_points() {
        let entry: LeaderboardEntry =
            serde_json::from_value(json!({"speler_naam": null, "totaal_punten": null}))
                .expect("entry");
        assert_eq!(entry.totaal_punten, 0);
    }

    #[test]
    fn session_user_reads_alternate_keys() {
        let user = SessionUser::from_value(json!({
            "id": "b7d1",
            "login_email": "ans@example.com",
            "display_name": "Ans",
            "is_admin": true
        }))
        .expect("user");
        assert_eq!(user.email(), Some("ans@example.com"));
        assert_eq!(user.display_name(), Some("Ans"));
        assert!(user.admin_hint());
        assert_eq!(user.id.to_string(), "b7d1");
        assert!(SessionUser::from_value(json!({"id": ""})).is_none());
    }
}
