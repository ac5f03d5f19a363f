use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use serde_json::json;
use wk_poule::form::{PredictionForm, Side};
use wk_poule::model::{Country, MatchRow, UserId};
use wk_poule::rounds::{KnockoutBoard, Round, validate};
use wk_poule::schema::SchemaVersion;

const GROUPS: [&str; 12] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"];

fn sample_countries() -> Vec<Country> {
    (1..=48)
        .map(|id| {
            serde_json::from_value(json!({
                "id": id,
                "land": format!("Land {id:02}"),
                "groep": GROUPS[(id as usize - 1) / 4],
            }))
            .expect("valid fixture json")
        })
        .collect()
}

fn sample_matches() -> Vec<MatchRow> {
    (1..=72)
        .map(|id| {
            let group = GROUPS[(id as usize - 1) / 6];
            serde_json::from_value(json!({
                "match_id": id,
                "home": {"land": format!("Home {id}"), "groep": group},
                "away": {"land": format!("Away {id}")},
            }))
            .expect("valid fixture json")
        })
        .collect()
}

fn filled_form() -> PredictionForm {
    let mut form =
        PredictionForm::for_predictions(&sample_matches(), &sample_countries(), &[], &[]);
    for id in 1..=72 {
        form.set_score(id, Side::Home, &(id % 4).to_string());
        if id % 3 != 0 {
            form.set_score(id, Side::Away, &(id % 3).to_string());
        }
    }
    for (round, take) in [
        (Round::Last32, 32),
        (Round::Last16, 16),
        (Round::QuarterFinal, 8),
        (Round::SemiFinal, 4),
        (Round::Final, 2),
        (Round::Winner, 1),
    ] {
        for id in 1..=take {
            form.toggle(id, round.column());
        }
    }
    form
}

fn bench_validator(c: &mut Criterion) {
    c.bench_function("validate_round_change", |b| {
        b.iter(|| {
            let mut rejected = 0usize;
            for round in Round::ALL {
                for count in 0..40 {
                    if validate(black_box(round.column()), count, true).warning().is_some() {
                        rejected += 1;
                    }
                }
            }
            black_box(rejected)
        })
    });

    c.bench_function("knockout_toggle_sweep", |b| {
        b.iter(|| {
            let mut board = KnockoutBoard::new(1..=48);
            for round in Round::ALL {
                for id in 1..=48 {
                    black_box(board.toggle(id, round.column()));
                }
            }
            black_box(board.count("laatste_32"))
        })
    });
}

fn bench_batches(c: &mut Criterion) {
    let form = filled_form();
    let schema = SchemaVersion::V2.contract();
    let user = UserId::from(7);

    c.bench_function("build_submit_batches", |b| {
        b.iter(|| {
            let matches: Vec<_> = form
                .match_records()
                .iter()
                .map(|record| record.to_row(&user, &schema))
                .collect();
            let countries = form.tournament_records(&user);
            black_box((matches.len(), countries.len()))
        })
    });

    c.bench_function("load_prediction_form", |b| {
        let matches = sample_matches();
        let countries = sample_countries();
        b.iter(|| {
            black_box(PredictionForm::for_predictions(
                black_box(&matches),
                black_box(&countries),
                &[],
                &[],
            ))
        })
    });
}

criterion_group!(benches, bench_validator, bench_batches);
criterion_main!(benches);
