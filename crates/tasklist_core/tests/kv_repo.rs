use tasklist_core::{KvRepository, SqliteKvRepository};

#[test]
fn sqlite_read_of_missing_key_is_none() {
    let repo = SqliteKvRepository::open_in_memory().unwrap();
    assert_eq!(repo.read("tasks").unwrap(), None);
}

#[test]
fn sqlite_write_upserts_single_row() {
    let repo = SqliteKvRepository::open_in_memory().unwrap();

    repo.write("tasks", "[]").unwrap();
    repo.write("tasks", r#"[{"id":1,"text":"a","completed":false}]"#)
        .unwrap();

    assert_eq!(
        repo.read("tasks").unwrap().as_deref(),
        Some(r#"[{"id":1,"text":"a","completed":false}]"#)
    );
    let rows: i64 = repo
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn sqlite_keys_are_independent() {
    let repo = SqliteKvRepository::open_in_memory().unwrap();
    repo.write("tasks", "[]").unwrap();
    repo.write("other", "null").unwrap();

    assert_eq!(repo.read("tasks").unwrap().as_deref(), Some("[]"));
    assert_eq!(repo.read("other").unwrap().as_deref(), Some("null"));
}

#[test]
fn sqlite_values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.sqlite3");

    SqliteKvRepository::open(&path)
        .unwrap()
        .write("tasks", "[]")
        .unwrap();

    let reopened = SqliteKvRepository::open(&path).unwrap();
    assert_eq!(reopened.read("tasks").unwrap().as_deref(), Some("[]"));
}
