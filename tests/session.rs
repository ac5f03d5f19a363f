use std::fs;
use std::path::PathBuf;

use serde_json::json;
use wk_poule::model::SessionUser;
use wk_poule::session::SessionStore;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("wk_poule_test_{}_{name}", std::process::id()))
        .join("current_user.json")
}

#[test]
fn session_survives_a_restart() {
    let path = temp_path("roundtrip");
    let store = SessionStore::at(&path);
    let user = SessionUser::from_value(json!({
        "id": "3f6c2a",
        "email": "jan@example.nl",
        "is_admin": false
    }))
    .expect("user");

    store.save(&user).expect("save");
    assert!(!path.with_extension("json.tmp").exists());

    let reopened = SessionStore::at(&path);
    assert_eq!(reopened.load(), Some(user));

    reopened.clear().expect("clear");
    assert_eq!(reopened.load(), None);
    // Clearing twice is fine.
    reopened.clear().expect("clear again");

    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[test]
fn unreadable_or_foreign_files_load_as_no_session() {
    let path = temp_path("garbage");
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).expect("dir");
    }
    let store = SessionStore::at(&path);

    fs::write(&path, "not json").expect("write");
    assert_eq!(store.load(), None);

    fs::write(
        &path,
        json!({"version": 99, "saved_at": "x", "current_user": {"id": 1}}).to_string(),
    )
    .expect("write");
    assert_eq!(store.load(), None);

    fs::write(
        &path,
        json!({"version": 1, "saved_at": "x", "current_user": {"id": null}}).to_string(),
    )
    .expect("write");
    assert_eq!(store.load(), None);

    if let Some(dir) = path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[test]
fn missing_file_means_logged_out() {
    let store = SessionStore::at(temp_path("absent"));
    assert_eq!(store.load(), None);
}
