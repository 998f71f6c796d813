use qrganize_core::db::migrations::latest_version;
use qrganize_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

const INVENTORY_TABLES: [&str; 6] = [
    "tags",
    "locations",
    "boxes",
    "items",
    "box_tags",
    "item_tags",
];

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in INVENTORY_TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn foreign_keys_are_enforced_on_opened_connections() {
    let conn = open_db_in_memory().unwrap();
    let err = conn
        .execute(
            "INSERT INTO boxes (name, location_id) VALUES ('orphan', 42);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
}

#[test]
fn unique_indexes_back_every_uniqueness_invariant() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO tags (name) VALUES ('fragile');
         INSERT INTO locations (name) VALUES ('Garage');
         INSERT INTO boxes (name, location_id) VALUES ('Bin A', 1);
         INSERT INTO items (name, box_id) VALUES ('Drill', 1);
         INSERT INTO box_tags (box_id, tag_id) VALUES (1, 1);
         INSERT INTO item_tags (item_id, tag_id) VALUES (1, 1);",
    )
    .unwrap();

    for duplicate in [
        "INSERT INTO tags (name) VALUES ('fragile');",
        "INSERT INTO locations (name) VALUES ('Garage');",
        "INSERT INTO boxes (name, location_id) VALUES ('Bin A', 1);",
        "INSERT INTO items (name, box_id) VALUES ('Drill', 1);",
        "INSERT INTO box_tags (box_id, tag_id) VALUES (1, 1);",
        "INSERT INTO item_tags (item_id, tag_id) VALUES (1, 1);",
    ] {
        let err = conn.execute(duplicate, []).unwrap_err();
        assert!(
            err.to_string().contains("UNIQUE"),
            "expected unique failure for `{duplicate}`, got {err}"
        );
    }
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute("INSERT INTO locations (name) VALUES ('Attic');", [])
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM locations;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
