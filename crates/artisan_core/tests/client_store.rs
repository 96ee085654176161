use artisan_core::db::migrations::latest_version;
use artisan_core::db::open_db_in_memory;
use artisan_core::{
    ClientStore, ModelValidationError, NewClient, RepoError, SqliteClientStore, UserId,
};
use log::{Level, LevelFilter, Log, Metadata, Record};
use rusqlite::Connection;
use serde_json::json;
use std::sync::Mutex;

/// Collects formatted log lines so tests can assert on emitted events.
struct CapturingLogger {
    lines: Mutex<Vec<String>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(format!("{} {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    lines: Mutex::new(Vec::new()),
};

fn captured_lines() -> Vec<String> {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Trace);
    LOGGER.lines.lock().unwrap().clone()
}

#[test]
fn create_and_find_by_user_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteClientStore::try_new(&conn).unwrap();

    let created = store
        .create_client(
            &NewClient::for_user("u1")
                .with_attribute("company", "Atelier Lune")
                .with_attribute("vat_number", "FR123"),
        )
        .unwrap();

    let found = store
        .find_one_by_user(&UserId::from("u1"))
        .unwrap()
        .unwrap();
    assert_eq!(found, created);
    assert_eq!(found.attribute("company"), Some(&json!("Atelier Lune")));
}

#[test]
fn resolved_client_serializes_exactly_like_created_client() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteClientStore::try_new(&conn).unwrap();

    let text_link = store
        .create_client(&NewClient::for_user("42").with_attribute("company", "Atelier Lune"))
        .unwrap();
    let int_link = store.create_client(&NewClient::for_user(7_i64)).unwrap();

    let found_text = store
        .find_one_by_user(&UserId::from("42"))
        .unwrap()
        .unwrap();
    let found_int = store.find_one_by_user(&UserId::Int(7)).unwrap().unwrap();

    assert_eq!(
        serde_json::to_value(&found_text).unwrap(),
        serde_json::to_value(&text_link).unwrap()
    );
    assert_eq!(
        serde_json::to_value(&found_text).unwrap()["users_permissions_user"],
        json!("42")
    );
    assert_eq!(
        serde_json::to_value(&found_int).unwrap(),
        serde_json::to_value(&int_link).unwrap()
    );
    assert!(matches!(found_int.users_permissions_user, Some(UserId::Int(7))));
}

#[test]
fn unknown_user_kind_tag_surfaces_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO clients (users_permissions_user, users_permissions_user_kind)
         VALUES ('u1', 'int');",
        [],
    )
    .unwrap();
    let store = SqliteClientStore::try_new(&conn).unwrap();

    let err = store.find_one_by_user(&UserId::from("u1")).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("kind")));
}

#[test]
fn find_by_user_returns_none_for_unlinked_user() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteClientStore::try_new(&conn).unwrap();
    store.create_client(&NewClient::for_user("u1")).unwrap();
    store.create_client(&NewClient::default()).unwrap();

    assert!(store
        .find_one_by_user(&UserId::from("u9"))
        .unwrap()
        .is_none());
}

#[test]
fn numeric_user_ids_match_their_text_form() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteClientStore::try_new(&conn).unwrap();
    let created = store.create_client(&NewClient::for_user(42_i64)).unwrap();

    let by_int = store.find_one_by_user(&UserId::Int(42)).unwrap().unwrap();
    let by_text = store
        .find_one_by_user(&UserId::from("42"))
        .unwrap()
        .unwrap();
    assert_eq!(by_int.id, created.id);
    assert_eq!(by_text.id, created.id);
    assert!(matches!(by_int.users_permissions_user, Some(UserId::Int(42))));
}

#[test]
fn duplicate_links_resolve_to_lowest_client_id() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteClientStore::try_new(&conn).unwrap();

    let first = store
        .create_client(&NewClient::for_user("u1").with_attribute("company", "first"))
        .unwrap();
    let second = store
        .create_client(&NewClient::for_user("u1").with_attribute("company", "second"))
        .unwrap();
    assert!(first.id < second.id);

    let found = store
        .find_one_by_user(&UserId::from("u1"))
        .unwrap()
        .unwrap();
    assert_eq!(found.id, first.id);
}

#[test]
fn duplicate_links_emit_integrity_warning() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteClientStore::try_new(&conn).unwrap();
    captured_lines();

    let kept = store.create_client(&NewClient::for_user("dup-user")).unwrap();
    let extra = store.create_client(&NewClient::for_user("dup-user")).unwrap();
    store.find_one_by_user(&UserId::from("dup-user")).unwrap();

    let expected = format!(
        "{} event=client_integrity_anomaly module=repo status=first_match user_id=dup-user kept_client_id={} extra_client_id={}",
        Level::Warn,
        kept.id,
        extra.id
    );
    assert!(captured_lines().contains(&expected));
}

#[test]
fn single_link_emits_no_integrity_warning() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteClientStore::try_new(&conn).unwrap();
    captured_lines();

    store.create_client(&NewClient::for_user("solo-user")).unwrap();
    store.find_one_by_user(&UserId::from("solo-user")).unwrap();

    assert!(!captured_lines()
        .iter()
        .any(|line| line.contains("user_id=solo-user ")
            && line.contains("client_integrity_anomaly")));
}

#[test]
fn get_client_reads_by_id() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteClientStore::try_new(&conn).unwrap();
    let created = store.create_client(&NewClient::for_user("u1")).unwrap();

    assert_eq!(store.get_client(created.id).unwrap(), Some(created));
    assert_eq!(store.get_client(9_999).unwrap(), None);
}

#[test]
fn create_rejects_invalid_client() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteClientStore::try_new(&conn).unwrap();

    let err = store
        .create_client(&NewClient::for_user("u1").with_attribute("users_permissions_user", "u2"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ModelValidationError::ReservedAttribute(_))
    ));

    let err = store.create_client(&NewClient::for_user("")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ModelValidationError::BlankUserLink)
    ));
}

#[test]
fn corrupted_attributes_surface_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO clients (users_permissions_user, attributes) VALUES ('u1', '[1, 2]');",
        [],
    )
    .unwrap();
    let store = SqliteClientStore::try_new(&conn).unwrap();

    let err = store.find_one_by_user(&UserId::from("u1")).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("not an object")));
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteClientStore::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_clients_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteClientStore::try_new(&conn),
        Err(RepoError::MissingRequiredTable("clients"))
    ));
}

#[test]
fn store_rejects_clients_table_missing_attributes_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE clients (
            id INTEGER PRIMARY KEY,
            users_permissions_user TEXT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteClientStore::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "clients",
            column: "attributes"
        })
    ));
}
