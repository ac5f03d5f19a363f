use std::sync::Arc;

use serde_json::Value;

use crate::form::PredictionForm;
use crate::gateway::{Gateway, GatewayError, Select, select_as};
use crate::model::{Country, MatchPrediction, MatchRow, SessionUser, TournamentPrediction};
use crate::schema::{self, Schema};

pub const LOGIN_PROMPT: &str = "⚠️ Log in om je voorspellingen op te slaan.";
pub const LOGIN_REQUIRED: &str = "Log eerst in!";
pub const SAVE_SUCCEEDED: &str = "Voorspellingen succesvol opgeslagen!";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    LoginRequired,
    Loaded {
        form: PredictionForm,
        warnings: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Saved { matches: usize, countries: usize },
    Failed(String),
    LoginRequired,
}

impl SubmitStatus {
    pub fn message(&self) -> String {
        match self {
            SubmitStatus::Saved { .. } => SAVE_SUCCEEDED.to_string(),
            SubmitStatus::Failed(reason) => format!("Fout bij opslaan: {reason}"),
            SubmitStatus::LoginRequired => LOGIN_REQUIRED.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmitStatus::Saved { .. })
    }
}

/// Loads a user's predictions into a form and writes the edited form back.
#[derive(Clone)]
pub struct PredictionController {
    gateway: Arc<dyn Gateway>,
    schema: Schema,
}

impl PredictionController {
    pub fn new(gateway: Arc<dyn Gateway>, schema: Schema) -> Self {
        Self { gateway, schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn load(&self, user: Option<&SessionUser>) -> LoadOutcome {
        let Some(user) = user else {
            return LoadOutcome::LoginRequired;
        };
        let gateway = self.gateway.as_ref();
        let mut warnings = Vec::new();

        let countries: Vec<Country> = degrade(
            select_as(gateway, &Select::from(schema::COUNTRIES).order("land")),
            "countries",
            &mut warnings,
        );
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
        let match_predictions: Vec<MatchPrediction> = degrade(
            gateway
                .select(&Select::from(self.schema.match_predictions).eq("user_id", &user.id))
                .map(|rows| {
                    rows.iter()
                        .filter_map(|row| MatchPrediction::from_row(row, &self.schema))
                        .collect()
                }),
            "match predictions",
            &mut warnings,
        );
        let tournament_predictions: Vec<TournamentPrediction> = degrade(
            select_as(
                gateway,
                &Select::from(schema::TOURNAMENT_PREDICTIONS).eq("user_id", &user.id),
            ),
            "tournament predictions",
            &mut warnings,
        );

        LoadOutcome::Loaded {
            form: PredictionForm::for_predictions(
                &matches,
                &countries,
                &match_predictions,
                &tournament_predictions,
            ),
            warnings,
        }
    }

    /// Upserts both batches side by side. A failure in one does not undo the other.
    pub fn submit(&self, user: Option<&SessionUser>, form: &PredictionForm) -> SubmitStatus {
        let Some(user) = user else {
            return SubmitStatus::LoginRequired;
        };

        let match_rows: Vec<Value> = form
            .match_records()
            .iter()
            .map(|record| record.to_row(&user.id, &self.schema))
            .collect();
        let tournament_rows: Vec<Value> = match form
            .tournament_records(&user.id)
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()
        {
            Ok(rows) => rows,
            Err(err) => return SubmitStatus::Failed(err.to_string()),
        };

        let gateway = self.gateway.as_ref();
        let (match_result, tournament_result) = rayon::join(
            || {
                upsert_batch(
                    gateway,
                    self.schema.match_predictions,
                    &match_rows,
                    &schema::MATCH_PREDICTION_KEY,
                )
            },
            || {
                upsert_batch(
                    gateway,
                    schema::TOURNAMENT_PREDICTIONS,
                    &tournament_rows,
                    &schema::TOURNAMENT_PREDICTION_KEY,
                )
            },
        );

        match (match_result, tournament_result) {
            (Ok(()), Ok(())) => SubmitStatus::Saved {
                matches: match_rows.len(),
                countries: tournament_rows.len(),
            },
            (Err(err), _) | (_, Err(err)) => SubmitStatus::Failed(err.to_string()),
        }
    }
}

fn upsert_batch(
    gateway: &dyn Gateway,
    table: &str,
    rows: &[Value],
    on_conflict: &[&str],
) -> Result<(), GatewayError> {
    if rows.is_empty() {
        return Ok(());
    }
    gateway.upsert(table, rows, on_conflict)
}

/// Failed fetches render as empty lists; the reason goes to the console.
pub(crate) fn degrade<T>(
    result: Result<Vec<T>, GatewayError>,
    what: &str,
    warnings: &mut Vec<String>,
) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(err) => {
            warnings.push(format!("[WARN] Loading {what} failed: {err}"));
            Vec::new()
        }
    }
}
