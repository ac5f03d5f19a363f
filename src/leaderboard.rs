use crate::gateway::{Gateway, GatewayError, Select, select_as};
use crate::model::LeaderboardEntry;
use crate::schema;

pub const EMPTY_LEADERBOARD: &str = "Nog geen scores bekend.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRow {
    pub rank: usize,
    pub name: String,
    pub points: i64,
}

/// Rows come pre-sorted from the `leaderboard` view.
pub fn fetch_leaderboard(gateway: &dyn Gateway) -> Result<Vec<LeaderboardEntry>, GatewayError> {
    select_as(gateway, &Select::from(schema::LEADERBOARD))
}

pub fn ranked_rows(entries: &[LeaderboardEntry]) -> Vec<RankedRow> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| RankedRow {
            rank: idx + 1,
            name: entry
                .speler_naam
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or("Anoniem")
                .to_string(),
            points: entry.totaal_punten,
        })
        .collect()
}
