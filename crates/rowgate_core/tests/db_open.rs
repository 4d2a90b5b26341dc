use rowgate_core::db::{open_db, open_db_in_memory};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_enables_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(foreign_keys(&conn), 1);
}

#[test]
fn in_memory_databases_are_independent() {
    let first = open_db_in_memory().unwrap();
    first.execute_batch("CREATE TABLE Cases (CaseID, Owner);").unwrap();

    let second = open_db_in_memory().unwrap();
    assert!(!table_exists(&second, "Cases"));
}

#[test]
fn reopening_file_database_keeps_tables_and_does_not_create_any() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rowgate.db");

    let conn = open_db(&path).unwrap();
    assert!(!table_exists(&conn, "Cases"));
    conn.execute_batch("CREATE TABLE Cases (CaseID PRIMARY KEY, Owner NOT NULL);")
        .unwrap();
    drop(conn);

    let reopened = open_db(&path).unwrap();
    assert!(table_exists(&reopened, "Cases"));
    assert_eq!(foreign_keys(&reopened), 1);
}

fn foreign_keys(conn: &Connection) -> i64 {
    conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap()
}

fn table_exists(conn: &Connection, table_name: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table_name],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}
