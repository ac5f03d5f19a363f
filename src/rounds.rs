use std::collections::{BTreeMap, BTreeSet};

use crate::model::{CountryId, RoundFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Round {
    Last32,
    Last16,
    QuarterFinal,
    SemiFinal,
    Final,
    Winner,
}

impl Round {
    pub const ALL: [Round; 6] = [
        Round::Last32,
        Round::Last16,
        Round::QuarterFinal,
        Round::SemiFinal,
        Round::Final,
        Round::Winner,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Round::Last32 => "laatste_32",
            Round::Last16 => "laatste_16",
            Round::QuarterFinal => "kwartfinale",
            Round::SemiFinal => "halvefinale",
            Round::Final => "finale",
            Round::Winner => "winnaar",
        }
    }

    pub fn capacity(self) -> usize {
        match self {
            Round::Last32 => 32,
            Round::Last16 => 16,
            Round::QuarterFinal => 8,
            Round::SemiFinal => 4,
            Round::Final => 2,
            Round::Winner => 1,
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Round::Last32 => "32",
            Round::Last16 => "16",
            Round::QuarterFinal => "KF",
            Round::SemiFinal => "HF",
            Round::Final => "F",
            Round::Winner => "W",
        }
    }

    /// Single-select group: setting it for one country clears it for the rest.
    pub fn is_exclusive(self) -> bool {
        self == Round::Winner
    }

    pub fn from_column(column: &str) -> Option<Round> {
        Round::ALL.into_iter().find(|r| r.column() == column)
    }

    pub fn flag(self, flags: &RoundFlags) -> bool {
        match self {
            Round::Last32 => flags.laatste_32,
            Round::Last16 => flags.laatste_16,
            Round::QuarterFinal => flags.kwartfinale,
            Round::SemiFinal => flags.halvefinale,
            Round::Final => flags.finale,
            Round::Winner => flags.winnaar,
        }
    }

    fn set_flag(self, flags: &mut RoundFlags, value: bool) {
        match self {
            Round::Last32 => flags.laatste_32 = value,
            Round::Last16 => flags.laatste_16 = value,
            Round::QuarterFinal => flags.kwartfinale = value,
            Round::SemiFinal => flags.halvefinale = value,
            Round::Final => flags.finale = value,
            Round::Winner => flags.winnaar = value,
        }
    }
}

pub fn capacity_for(round: &str) -> Option<usize> {
    Round::from_column(round).map(Round::capacity)
}

pub fn capacity_warning(round: &str, capacity: usize) -> String {
    format!("⚠️ Let op: Maximaal {capacity} landen toegestaan voor {round}.")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject { round: String, capacity: usize },
}

impl Verdict {
    pub fn warning(&self) -> Option<String> {
        match self {
            Verdict::Accept => None,
            Verdict::Reject { round, capacity } => Some(capacity_warning(round, *capacity)),
        }
    }
}

/// Decides a single flag change. `count_after` is the number of countries
/// flagged for `round` once the change is applied. Clearing is always
/// accepted and rounds without a capacity pass through.
pub fn validate(round: &str, count_after: usize, setting: bool) -> Verdict {
    if !setting {
        return Verdict::Accept;
    }
    match capacity_for(round) {
        Some(capacity) if count_after > capacity => Verdict::Reject {
            round: round.to_string(),
            capacity,
        },
        _ => Verdict::Accept,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied,
    Reverted { warning: String },
    Ignored,
}

/// Per-round selections for the countries on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnockoutBoard {
    countries: Vec<CountryId>,
    selections: BTreeMap<String, BTreeSet<CountryId>>,
}

impl KnockoutBoard {
    pub fn new(countries: impl IntoIterator<Item = CountryId>) -> Self {
        Self::seeded(countries.into_iter().map(|id| (id, RoundFlags::default())))
    }

    /// Seeds come from stored rows in display order. Capacities are not
    /// enforced here, but an exclusive round keeps only the last flagged row.
    pub fn seeded(rows: impl IntoIterator<Item = (CountryId, RoundFlags)>) -> Self {
        let mut board = Self::default();
        for (id, flags) in rows {
            if board.countries.contains(&id) {
                continue;
            }
            board.countries.push(id);
            for round in Round::ALL {
                if !round.flag(&flags) {
                    continue;
                }
                let selected = board
                    .selections
                    .entry(round.column().to_string())
                    .or_default();
                if round.is_exclusive() {
                    selected.clear();
                }
                selected.insert(id);
            }
        }
        board
    }

    pub fn countries(&self) -> &[CountryId] {
        &self.countries
    }

    pub fn is_set(&self, country: CountryId, round: &str) -> bool {
        self.selections
            .get(round)
            .is_some_and(|set| set.contains(&country))
    }

    pub fn count(&self, round: &str) -> usize {
        self.selections.get(round).map_or(0, BTreeSet::len)
    }

    pub fn winner(&self) -> Option<CountryId> {
        self.selections
            .get(Round::Winner.column())
            .and_then(|set| set.iter().next().copied())
    }

    pub fn toggle(&mut self, country: CountryId, round: &str) -> ToggleOutcome {
        let exclusive = Round::from_column(round).is_some_and(Round::is_exclusive);
        let value = exclusive || !self.is_set(country, round);
        self.set(country, round, value)
    }

    pub fn set(&mut self, country: CountryId, round: &str, value: bool) -> ToggleOutcome {
        if !self.countries.contains(&country) {
            return ToggleOutcome::Ignored;
        }
        let exclusive = Round::from_column(round).is_some_and(Round::is_exclusive);
        let selected = self.selections.entry(round.to_string()).or_default();

        if !value {
            selected.remove(&country);
            return ToggleOutcome::Applied;
        }

        let previous = if exclusive {
            Some(std::mem::take(selected))
        } else {
            None
        };
        let newly_set = selected.insert(country);
        match validate(round, selected.len(), true) {
            Verdict::Accept => ToggleOutcome::Applied,
            verdict => {
                if newly_set {
                    selected.remove(&country);
                }
                if let Some(previous) = previous {
                    *selected = previous;
                }
                ToggleOutcome::Reverted {
                    warning: verdict.warning().unwrap_or_default(),
                }
            }
        }
    }

    pub fn flags_for(&self, country: CountryId) -> RoundFlags {
        let mut flags = RoundFlags::default();
        for round in Round::ALL {
            round.set_flag(&mut flags, self.is_set(country, round.column()));
        }
        flags
    }
}
