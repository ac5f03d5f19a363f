use std::sync::Arc;

use serde_json::{Value, json};
use wk_poule::controller::{LOGIN_REQUIRED, LoadOutcome, PredictionController, SubmitStatus};
use wk_poule::form::{PredictionForm, Side};
use wk_poule::gateway::GatewayError;
use wk_poule::memory_gateway::{Call, MemoryGateway};
use wk_poule::model::SessionUser;
use wk_poule::rounds::ToggleOutcome;
use wk_poule::schema::{self, SchemaVersion};

fn user() -> SessionUser {
    SessionUser::from_value(json!({"id": 7, "email": "piet@example.nl", "full_name": "Piet"}))
        .expect("user")
}

fn countries() -> Vec<Value> {
    vec![
        json!({"id": 1, "land": "Nederland", "groep": "A", "finale": true}),
        json!({"id": 2, "land": "Argentinië", "groep": "B"}),
        json!({"id": 3, "land": "Japan", "groep": "A", "winnaar": null}),
    ]
}

fn matches() -> Vec<Value> {
    vec![
        json!({
            "match_id": 13,
            "home_team_id": 3,
            "away_team_id": 1,
            "home": {"land": "Japan", "groep": "A"},
            "away": {"land": "Nederland"},
            "goals_home": null,
            "goals_against": null
        }),
        json!({
            "match_id": 12,
            "home_team_id": 1,
            "away_team_id": 3,
            "home": {"land": "Nederland", "groep": "A"},
            "away": {"land": "Japan"},
            "goals_home": 1,
            "goals_against": 1
        }),
        json!({
            "match_id": 20,
            "home_team_id": 2,
            "away_team_id": 1,
            "home": {"land": "Argentinië", "groep": "B"},
            "away": {"land": "Nederland"}
        }),
    ]
}

fn seeded_gateway() -> MemoryGateway {
    MemoryGateway::new()
        .with_rows(schema::COUNTRIES, countries())
        .with_rows(schema::MATCHES, matches())
        .with_rows(
            "voorspellingen_wedstrijden",
            vec![
                json!({"user_id": 7, "match_id": 13, "goals_home": 2, "goals_away": 1}),
                json!({"user_id": 8, "match_id": 12, "goals_home": 5, "goals_away": 0}),
            ],
        )
        .with_rows(
            schema::TOURNAMENT_PREDICTIONS,
            vec![json!({"user_id": 7, "land_id": 2, "laatste_32": true, "winnaar": true})],
        )
}

fn load_form(controller: &PredictionController) -> PredictionForm {
    match controller.load(Some(&user())) {
        LoadOutcome::Loaded { form, warnings } => {
            assert!(warnings.is_empty(), "{warnings:?}");
            form
        }
        LoadOutcome::LoginRequired => panic!("expected a loaded form"),
    }
}

fn controller_for(gateway: Arc<MemoryGateway>) -> PredictionController {
    PredictionController::new(gateway, SchemaVersion::V2.contract())
}

#[test]
fn load_seeds_only_the_users_own_predictions() {
    let gateway = Arc::new(seeded_gateway());
    let form = load_form(&controller_for(gateway));

    let twelve = form.match_line(12).expect("match 12");
    assert_eq!(twelve.score.home, "");
    assert_eq!(twelve.score.away, "");
    let thirteen = form.match_line(13).expect("match 13");
    assert_eq!(thirteen.score.home, "2");
    assert_eq!(thirteen.score.away, "1");

    let labels: Vec<&str> = form.groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["A", "B"]);

    let names: Vec<&str> = form.countries.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Argentinië", "Japan", "Nederland"]);
    assert_eq!(form.board.winner(), Some(2));
    // Ground-truth flags on `landen` never leak into a user's form.
    assert_eq!(form.board.count("finale"), 0);
}

#[test]
fn missing_session_makes_no_backend_calls() {
    let gateway = Arc::new(seeded_gateway());
    let controller = controller_for(gateway.clone());

    assert_eq!(controller.load(None), LoadOutcome::LoginRequired);
    let status = controller.submit(None, &PredictionForm::default());
    assert_eq!(status, SubmitStatus::LoginRequired);
    assert_eq!(status.message(), LOGIN_REQUIRED);
    assert!(gateway.calls().is_empty());
}

#[test]
fn failed_fetch_degrades_to_empty_list_with_warning() {
    let gateway = Arc::new(seeded_gateway().failing(
        schema::COUNTRIES,
        GatewayError::Transport("connection reset".to_string()),
    ));
    let controller = controller_for(gateway);
    let LoadOutcome::Loaded { form, warnings } = controller.load(Some(&user())) else {
        panic!("expected a loaded form");
    };
    assert!(form.countries.is_empty());
    assert_eq!(form.match_count(), 3);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("countries"));
}

#[test]
fn submit_drops_half_filled_scores_and_writes_every_country() {
    let gateway = Arc::new(seeded_gateway());
    let controller = controller_for(gateway.clone());
    let mut form = load_form(&controller);

    form.push_digit(12, Side::Home, '3');
    form.set_score(20, Side::Home, "0");
    form.set_score(20, Side::Away, "4");
    assert_eq!(form.toggle(3, "winnaar"), ToggleOutcome::Applied);
    assert_eq!(form.toggle(1, "halvefinale"), ToggleOutcome::Applied);

    let status = controller.submit(Some(&user()), &form);
    assert_eq!(
        status,
        SubmitStatus::Saved {
            matches: 2,
            countries: 3
        }
    );
    assert!(status.is_success());

    let stored = gateway.rows("voorspellingen_wedstrijden");
    let mine: Vec<&Value> = stored.iter().filter(|r| r["user_id"] == 7).collect();
    assert_eq!(mine.len(), 2);
    assert!(!mine.iter().any(|r| r["match_id"] == 12));
    let twenty = mine.iter().find(|r| r["match_id"] == 20).expect("match 20");
    assert_eq!(twenty["goals_home"], 0);
    assert_eq!(twenty["goals_away"], 4);

    let tournament = gateway.rows(schema::TOURNAMENT_PREDICTIONS);
    assert_eq!(tournament.len(), 3);
    let winners: Vec<&Value> = tournament.iter().filter(|r| r["winnaar"] == true).collect();
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0]["land_id"], 3);
    let argentina = tournament.iter().find(|r| r["land_id"] == 2).expect("row 2");
    assert_eq!(argentina["laatste_32"], true);
    assert_eq!(argentina["winnaar"], false);
}

#[test]
fn resubmitting_merges_on_the_conflict_key() {
    let gateway = Arc::new(seeded_gateway());
    let controller = controller_for(gateway.clone());
    let mut form = load_form(&controller);

    form.set_score(13, Side::Home, "0");
    controller.submit(Some(&user()), &form);
    form.set_score(13, Side::Away, "3");
    controller.submit(Some(&user()), &form);

    let stored = gateway.rows("voorspellingen_wedstrijden");
    let thirteen: Vec<&Value> = stored
        .iter()
        .filter(|r| r["user_id"] == 7 && r["match_id"] == 13)
        .collect();
    assert_eq!(thirteen.len(), 1);
    assert_eq!(thirteen[0]["goals_home"], 0);
    assert_eq!(thirteen[0]["goals_away"], 3);
}

#[test]
fn empty_match_batch_skips_its_upsert() {
    let gateway = Arc::new(
        MemoryGateway::new()
            .with_rows(schema::COUNTRIES, countries())
            .with_rows(schema::MATCHES, matches()),
    );
    let controller = controller_for(gateway.clone());
    let form = load_form(&controller);

    let status = controller.submit(Some(&user()), &form);
    assert_eq!(
        status,
        SubmitStatus::Saved {
            matches: 0,
            countries: 3
        }
    );
    let upserts: Vec<Call> = gateway
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Upsert { .. }))
        .collect();
    assert_eq!(
        upserts,
        vec![Call::Upsert {
            table: schema::TOURNAMENT_PREDICTIONS.to_string(),
            rows: 3
        }]
    );
}

#[test]
fn one_failing_batch_reports_failure_but_keeps_the_other() {
    let base = seeded_gateway();
    let form = load_form(&controller_for(Arc::new(base)));

    let gateway = Arc::new(seeded_gateway().failing(
        schema::TOURNAMENT_PREDICTIONS,
        GatewayError::Backend {
            status: 409,
            message: "permission denied for table voorspellingen_toernooi".to_string(),
        },
    ));
    let controller = controller_for(gateway.clone());
    let status = controller.submit(Some(&user()), &form);
    assert!(!status.is_success());
    assert_eq!(
        status.message(),
        "Fout bij opslaan: permission denied for table voorspellingen_toernooi"
    );

    let stored = gateway.rows("voorspellingen_wedstrijden");
    assert!(
        stored
            .iter()
            .any(|r| r["user_id"] == 7 && r["match_id"] == 13 && r["goals_home"] == 2)
    );
}

#[test]
fn schema_v3_reads_and_writes_renamed_columns() {
    let gateway = Arc::new(
        MemoryGateway::new()
            .with_rows(schema::MATCHES, matches())
            .with_rows(
                "voorspellingen_wedstrijden",
                vec![json!({
                    "user_id": 7,
                    "match_id": 12,
                    "voorspeld_thuis": 4,
                    "voordspeld_uit": 2
                })],
            ),
    );
    let controller = PredictionController::new(gateway.clone(), SchemaVersion::V3.contract());
    let mut form = load_form(&controller);
    assert_eq!(form.match_line(12).map(|l| l.score.home.as_str()), Some("4"));

    form.set_score(12, Side::Away, "3");
    controller.submit(Some(&user()), &form);
    let stored = gateway.rows("voorspellingen_wedstrijden");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["voordspeld_uit"], 3);
    assert!(stored[0].get("goals_away").is_none());
}

#[test]
fn schema_v1_targets_the_legacy_table() {
    let gateway = Arc::new(MemoryGateway::new().with_rows(schema::MATCHES, matches()));
    let controller = PredictionController::new(gateway.clone(), SchemaVersion::V1.contract());
    let mut form = load_form(&controller);
    form.set_score(20, Side::Home, "1");
    form.set_score(20, Side::Away, "1");
    controller.submit(Some(&user()), &form);
    assert_eq!(gateway.rows("voorspellingen").len(), 1);
    assert!(gateway.rows("voorspellingen_wedstrijden").is_empty());
}
