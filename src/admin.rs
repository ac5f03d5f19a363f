use std::sync::Arc;

use serde_json::{Value, json};

use crate::controller::degrade;
use crate::form::{PredictionForm, parse_score};
use crate::gateway::{Gateway, Select, is_truthy, select_as};
use crate::model::{Country, MatchRow, SessionUser};
use crate::rounds::Round;
use crate::schema;

pub const NOT_ADMIN: &str = "Geen admin toegang.";
pub const ADMIN_SAVED: &str = "✅ Alles succesvol opgeslagen!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAccess {
    Granted,
    Denied(String),
}

/// Ground-truth editing for administrators.
#[derive(Clone)]
pub struct AdminController {
    gateway: Arc<dyn Gateway>,
}

impl AdminController {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Asks the backend every time; the cached `is_admin` hint is not consulted.
    pub fn check_access(&self, user: &SessionUser) -> AdminAccess {
        match self
            .gateway
            .rpc(schema::RPC_CHECK_ADMIN, json!({ "check_user_id": user.id }))
        {
            Ok(answer) if is_truthy(&answer) => AdminAccess::Granted,
            Ok(_) => AdminAccess::Denied(NOT_ADMIN.to_string()),
            Err(err) => AdminAccess::Denied(format!("Error checking admin status: {err}")),
        }
    }

    pub fn load(&self) -> (PredictionForm, Vec<String>) {
        let gateway = self.gateway.as_ref();
        let mut warnings = Vec::new();
        let matches: Vec<MatchRow> = degrade(
            select_as(
                gateway,
                &Select::from(schema::MATCHES)
                    .columns(schema::MATCH_COLUMNS)
                    .order("match_id"),
            ),
            "matches",
            &mut warnings,
        );
        let countries: Vec<Country> = degrade(
            select_as(gateway, &Select::from(schema::COUNTRIES).order("land")),
            "countries",
            &mut warnings,
        );
        (PredictionForm::for_ground_truth(&matches, &countries), warnings)
    }

    /// Sends every listed match and country in one `save_admin_data` call.
    pub fn save(&self, user: &SessionUser, form: &PredictionForm) -> Result<String, String> {
        let args = json!({
            "p_user_id": user.id,
            "p_match_updates": match_updates(form),
            "p_country_updates": country_updates(form),
        });
        match self.gateway.rpc(schema::RPC_SAVE_ADMIN, args) {
            Ok(_) => Ok(ADMIN_SAVED.to_string()),
            Err(err) => Err(format!("❌ Fout: {err}")),
        }
    }
}

/// Blank or unreadable scores are sent as `null` so a result can be cleared.
pub fn match_updates(form: &PredictionForm) -> Vec<Value> {
    form.match_lines()
        .map(|line| {
            json!({
                "match_id": line.match_id,
                "goals_home": parse_score(&line.score.home),
                "goals_against": parse_score(&line.score.away),
            })
        })
        .collect()
}

pub fn country_updates(form: &PredictionForm) -> Vec<Value> {
    form.countries
        .iter()
        .map(|country| {
            let mut row = serde_json::Map::new();
            row.insert("id".to_string(), Value::from(country.id));
            for round in Round::ALL {
                row.insert(
                    round.column().to_string(),
                    Value::Bool(form.is_flagged(country.id, round)),
                );
            }
            Value::Object(row)
        })
        .collect()
}
