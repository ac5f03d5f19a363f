use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{
    Country, CountryId, MatchId, MatchPrediction, MatchRow, RoundFlags, TournamentPrediction,
    UserId,
};
use crate::rounds::{KnockoutBoard, Round, ToggleOutcome};
use crate::schema::Schema;

const MAX_SCORE_DIGITS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreInput {
    pub home: String,
    pub away: String,
}

impl ScoreInput {
    fn seeded(home: Option<i64>, away: Option<i64>) -> Self {
        Self {
            home: home.map(|v| v.to_string()).unwrap_or_default(),
            away: away.map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    pub fn side(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut String {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchLine {
    pub match_id: MatchId,
    pub home: String,
    pub away: String,
    pub score: ScoreInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCard {
    pub label: String,
    pub matches: Vec<MatchLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryLine {
    pub id: CountryId,
    pub name: String,
    pub group: Option<String>,
}

/// Editable rows for one screen: score inputs grouped per group card and a
/// knockout board over the listed countries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionForm {
    pub groups: Vec<GroupCard>,
    pub countries: Vec<CountryLine>,
    pub board: KnockoutBoard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPredictionRecord {
    pub match_id: MatchId,
    pub home: u16,
    pub away: u16,
}

impl MatchPredictionRecord {
    pub fn to_row(&self, user_id: &UserId, schema: &Schema) -> Value {
        let mut row = Map::new();
        row.insert("user_id".to_string(), user_id.0.clone());
        row.insert("match_id".to_string(), Value::from(self.match_id));
        row.insert(schema.predicted_home.to_string(), Value::from(self.home));
        row.insert(schema.predicted_away.to_string(), Value::from(self.away));
        Value::Object(row)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentRecord {
    pub user_id: UserId,
    pub land_id: CountryId,
    #[serde(flatten)]
    pub flags: RoundFlags,
}

impl PredictionForm {
    /// A user's form: matches and countries seeded with that user's stored
    /// predictions, blank or unchecked where nothing is stored.
    pub fn for_predictions(
        matches: &[MatchRow],
        countries: &[Country],
        match_predictions: &[MatchPrediction],
        tournament_predictions: &[TournamentPrediction],
    ) -> Self {
        let by_match: HashMap<MatchId, &MatchPrediction> =
            match_predictions.iter().map(|p| (p.match_id, p)).collect();
        let by_country: HashMap<CountryId, RoundFlags> = tournament_predictions
            .iter()
            .map(|p| (p.land_id, p.flags))
            .collect();

        let groups = group_cards(matches, |m| {
            by_match
                .get(&m.match_id)
                .map(|p| {
                    ScoreInput::seeded(p.home.map(i64::from), p.away.map(i64::from))
                })
                .unwrap_or_default()
        });
        let (countries, board) = country_lines(countries, |c| {
            by_country.get(&c.id).copied().unwrap_or_default()
        });
        Self {
            groups,
            countries,
            board,
        }
    }

    /// The admin form: actual scores and ground-truth flags from the rows themselves.
    pub fn for_ground_truth(matches: &[MatchRow], countries: &[Country]) -> Self {
        let groups = group_cards(matches, |m| ScoreInput::seeded(m.goals_home, m.goals_against));
        let (countries, board) = country_lines(countries, |c| c.flags);
        Self {
            groups,
            countries,
            board,
        }
    }

    pub fn match_lines(&self) -> impl Iterator<Item = &MatchLine> {
        self.groups.iter().flat_map(|g| g.matches.iter())
    }

    pub fn match_count(&self) -> usize {
        self.groups.iter().map(|g| g.matches.len()).sum()
    }

    pub fn match_line(&self, match_id: MatchId) -> Option<&MatchLine> {
        self.match_lines().find(|m| m.match_id == match_id)
    }

    fn match_line_mut(&mut self, match_id: MatchId) -> Option<&mut MatchLine> {
        self.groups
            .iter_mut()
            .flat_map(|g| g.matches.iter_mut())
            .find(|m| m.match_id == match_id)
    }

    pub fn set_score(&mut self, match_id: MatchId, side: Side, text: &str) {
        if let Some(line) = self.match_line_mut(match_id) {
            *line.score.side_mut(side) = text.trim().to_string();
        }
    }

    /// Appends a digit; anything else, or a third digit, is refused.
    pub fn push_digit(&mut self, match_id: MatchId, side: Side, ch: char) -> bool {
        if !ch.is_ascii_digit() {
            return false;
        }
        let Some(line) = self.match_line_mut(match_id) else {
            return false;
        };
        let input = line.score.side_mut(side);
        if input.len() >= MAX_SCORE_DIGITS {
            return false;
        }
        input.push(ch);
        true
    }

    pub fn pop_digit(&mut self, match_id: MatchId, side: Side) {
        if let Some(line) = self.match_line_mut(match_id) {
            line.score.side_mut(side).pop();
        }
    }

    pub fn toggle(&mut self, country: CountryId, round: &str) -> ToggleOutcome {
        self.board.toggle(country, round)
    }

    /// Matches with both scores filled in; half-filled matches are left out.
    pub fn match_records(&self) -> Vec<MatchPredictionRecord> {
        self.match_lines()
            .filter_map(|line| {
                let home = parse_score(&line.score.home)?;
                let away = parse_score(&line.score.away)?;
                Some(MatchPredictionRecord {
                    match_id: line.match_id,
                    home,
                    away,
                })
            })
            .collect()
    }

    /// One record per listed country so cleared flags are written as `false`.
    pub fn tournament_records(&self, user_id: &UserId) -> Vec<TournamentRecord> {
        let winner = self.board.winner();
        self.countries
            .iter()
            .map(|country| {
                let mut flags = self.board.flags_for(country.id);
                flags.winnaar = winner == Some(country.id);
                TournamentRecord {
                    user_id: user_id.clone(),
                    land_id: country.id,
                    flags,
                }
            })
            .collect()
    }

    pub fn is_flagged(&self, country: CountryId, round: Round) -> bool {
        self.board.is_set(country, round.column())
    }
}

pub fn parse_score(raw: &str) -> Option<u16> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<u16>().ok()
}

fn group_cards(matches: &[MatchRow], seed: impl Fn(&MatchRow) -> ScoreInput) -> Vec<GroupCard> {
    let mut grouped: BTreeMap<String, Vec<&MatchRow>> = BTreeMap::new();
    for m in matches {
        grouped.entry(m.group_label()).or_default().push(m);
    }
    grouped
        .into_iter()
        .map(|(label, mut rows)| {
            rows.sort_by_key(|m| m.match_id);
            let matches = rows
                .into_iter()
                .map(|m| MatchLine {
                    match_id: m.match_id,
                    home: m.home_name(),
                    away: m.away_name(),
                    score: seed(m),
                })
                .collect();
            GroupCard { label, matches }
        })
        .collect()
}

fn country_lines(
    countries: &[Country],
    seed: impl Fn(&Country) -> RoundFlags,
) -> (Vec<CountryLine>, KnockoutBoard) {
    let mut sorted: Vec<&Country> = countries.iter().collect();
    sorted.sort_by(|a, b| a.land.cmp(&b.land).then(a.id.cmp(&b.id)));
    sorted.dedup_by_key(|c| c.id);

    let lines = sorted
        .iter()
        .map(|c| CountryLine {
            id: c.id,
            name: c.land.clone(),
            group: c.groep.clone(),
        })
        .collect();
    let board = KnockoutBoard::seeded(sorted.iter().map(|c| (c.id, seed(c))));
    (lines, board)
}

#[cfg(test)]
mod tests {
    use super::{Side, parse_score};
    use crate::form::PredictionForm;
    use crate::model::{MatchRow, TeamRef};

    fn row(id: i64, group: &str) -> MatchRow {
        MatchRow {
            match_id: id,
            home_team_id: None,
            away_team_id: None,
            home: Some(TeamRef {
                land: Some(format!("H{id}")),
                groep: Some(group.to_string()),
            }),
            away: Some(TeamRef {
                land: Some(format!("A{id}")),
                groep: None,
            }),
            goals_home: None,
            goals_against: None,
        }
    }

    #[test]
    fn parse_score_rejects_blank_and_text() {
        assert_eq!(parse_score(" 3 "), Some(3));
        assert_eq!(parse_score(""), None);
        assert_eq!(parse_score("x"), None);
        assert_eq!(parse_score("-1"), None);
    }

    #[test]
    fn digits_are_capped_at_two() {
        let mut form = PredictionForm::for_ground_truth(&[row(1, "A")], &[]);
        assert!(form.push_digit(1, Side::Home, '1'));
        assert!(form.push_digit(1, Side::Home, '0'));
        assert!(!form.push_digit(1, Side::Home, '4'));
        assert!(!form.push_digit(1, Side::Away, 'x'));
        assert_eq!(form.match_line(1).map(|l| l.score.home.as_str()), Some("10"));
        form.pop_digit(1, Side::Home);
        assert_eq!(form.match_line(1).map(|l| l.score.home.as_str()), Some("1"));
    }

    #[test]
    fn groups_sort_by_label_then_match_id() {
        let form = PredictionForm::for_ground_truth(
            &[row(9, "B"), row(4, "A"), row(2, "B"), row(1, "A")],
            &[],
        );
        let labels: Vec<&str> = form.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);
        let ids: Vec<i64> = form.match_lines().map(|l| l.match_id).collect();
        assert_eq!(ids, vec![1, 4, 2, 9]);
    }
}
