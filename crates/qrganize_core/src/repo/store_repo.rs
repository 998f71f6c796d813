//! Inventory repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide find-by-key, find-by-id, insert and list APIs over the six
//!   inventory tables.
//! - Own the atomic "entity + tag associations" write used by box/item
//!   creation.
//!
//! # Invariants
//! - `insert_box`/`insert_item` commit the entity row and all association
//!   rows in one transaction, or nothing.
//! - UNIQUE constraint failures surface as `RepoError::UniqueViolation`, never
//!   as a generic DB error.
//! - List reads are ordered by ascending id; nested tag lists by tag id.

use crate::db::DbError;
use crate::model::inventory::{
    BoxId, BoxRecord, BoxTagAssociation, Item, ItemId, ItemRecord, ItemTagAssociation, Location,
    LocationId, StorageBox, Tag, TagId,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const REQUIRED_TABLES: [&str; 6] = [
    "tags",
    "locations",
    "boxes",
    "items",
    "box_tags",
    "item_tags",
];

const BOX_RECORD_SELECT_SQL: &str = "SELECT
    b.id AS box_id,
    b.name AS box_name,
    l.id AS location_id,
    l.name AS location_name
FROM boxes b
INNER JOIN locations l ON l.id = b.location_id";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for inventory persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Transport/engine failure.
    Db(DbError),
    /// A write hit a unique index; carries the engine message for diagnostics.
    UniqueViolation(String),
    /// Persisted state could not be mapped onto the domain model.
    InvalidData(String),
    /// Connection is not migrated for inventory use.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UniqueViolation(message) => write!(f, "unique constraint violated: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted inventory data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        if value.is_unique_violation() {
            return Self::UniqueViolation(value.to_string());
        }
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::from(DbError::Sqlite(value))
    }
}

/// Store operations required by the storage manager.
pub trait StoreRepository {
    /// Finds one tag by exact name.
    fn find_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>>;
    /// Finds one location by exact name.
    fn find_location_by_name(&self, name: &str) -> RepoResult<Option<Location>>;
    /// Finds one location by id.
    fn find_location(&self, id: LocationId) -> RepoResult<Option<Location>>;
    /// Finds one box row by id.
    fn find_box(&self, id: BoxId) -> RepoResult<Option<StorageBox>>;
    /// Finds the box with `name` under `location_id`.
    fn find_box_by_name(&self, name: &str, location_id: LocationId)
        -> RepoResult<Option<StorageBox>>;
    /// Finds the item with `name` inside `box_id`.
    fn find_item_by_name(&self, name: &str, box_id: BoxId) -> RepoResult<Option<Item>>;
    /// Returns the tags whose id is in `ids`; unknown ids are absent from the result.
    fn find_tags_by_ids(&self, ids: &[TagId]) -> RepoResult<Vec<Tag>>;
    /// Returns the tags whose name is in `names`.
    fn find_tags_by_names(&self, names: &[String]) -> RepoResult<Vec<Tag>>;

    /// Inserts one tag and returns its id.
    fn insert_tag(&mut self, name: &str) -> RepoResult<TagId>;
    /// Inserts one location and returns its id.
    fn insert_location(&mut self, name: &str) -> RepoResult<LocationId>;
    /// Inserts one box plus one association per tag id in a single commit.
    fn insert_box(
        &mut self,
        name: &str,
        location_id: LocationId,
        tag_ids: &[TagId],
    ) -> RepoResult<BoxId>;
    /// Inserts one item plus one association per tag id in a single commit.
    fn insert_item(&mut self, name: &str, box_id: BoxId, tag_ids: &[TagId])
        -> RepoResult<ItemId>;

    /// Returns all tags.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
    /// Returns all locations.
    fn list_locations(&self) -> RepoResult<Vec<Location>>;
    /// Returns all boxes with location and tags attached.
    fn list_boxes(&self) -> RepoResult<Vec<BoxRecord>>;
    /// Returns all items with box (expanded) and tags attached.
    fn list_items(&self) -> RepoResult<Vec<ItemRecord>>;
}

/// SQLite-backed inventory repository.
pub struct SqliteStoreRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteStoreRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }

    /// Returns the raw association rows of one box, in insertion order.
    pub fn box_tag_associations(&self, box_id: BoxId) -> RepoResult<Vec<BoxTagAssociation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, box_id, tag_id FROM box_tags WHERE box_id = ?1 ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([box_id])?;
        let mut associations = Vec::new();
        while let Some(row) = rows.next()? {
            associations.push(BoxTagAssociation {
                id: row.get("id")?,
                box_id: row.get("box_id")?,
                tag_id: row.get("tag_id")?,
            });
        }
        Ok(associations)
    }

    /// Returns the raw association rows of one item, in insertion order.
    pub fn item_tag_associations(&self, item_id: ItemId) -> RepoResult<Vec<ItemTagAssociation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, item_id, tag_id FROM item_tags WHERE item_id = ?1 ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([item_id])?;
        let mut associations = Vec::new();
        while let Some(row) = rows.next()? {
            associations.push(ItemTagAssociation {
                id: row.get("id")?,
                item_id: row.get("item_id")?,
                tag_id: row.get("tag_id")?,
            });
        }
        Ok(associations)
    }
}

impl StoreRepository for SqliteStoreRepository<'_> {
    fn find_tag_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM tags WHERE name = ?1;")?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_tag_row(row)?));
        }
        Ok(None)
    }

    fn find_location_by_name(&self, name: &str) -> RepoResult<Option<Location>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM locations WHERE name = ?1;")?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_location_row(row)?));
        }
        Ok(None)
    }

    fn find_location(&self, id: LocationId) -> RepoResult<Option<Location>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM locations WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_location_row(row)?));
        }
        Ok(None)
    }

    fn find_box(&self, id: BoxId) -> RepoResult<Option<StorageBox>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, location_id FROM boxes WHERE id = ?1;")?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_box_row(row)?));
        }
        Ok(None)
    }

    fn find_box_by_name(
        &self,
        name: &str,
        location_id: LocationId,
    ) -> RepoResult<Option<StorageBox>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, location_id
             FROM boxes
             WHERE name = ?1 AND location_id = ?2;",
        )?;
        let mut rows = stmt.query(params![name, location_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_box_row(row)?));
        }
        Ok(None)
    }

    fn find_item_by_name(&self, name: &str, box_id: BoxId) -> RepoResult<Option<Item>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, box_id
             FROM items
             WHERE name = ?1 AND box_id = ?2;",
        )?;
        let mut rows = stmt.query(params![name, box_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(Item {
                id: row.get("id")?,
                name: row.get("name")?,
                box_id: row.get("box_id")?,
            }));
        }
        Ok(None)
    }

    fn find_tags_by_ids(&self, ids: &[TagId]) -> RepoResult<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, name FROM tags WHERE id IN ({}) ORDER BY id ASC;",
            placeholders(ids.len())
        );
        let bind_values = ids.iter().map(|id| Value::Integer(*id));
        query_tags(self.conn, &sql, bind_values)
    }

    fn find_tags_by_names(&self, names: &[String]) -> RepoResult<Vec<Tag>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, name FROM tags WHERE name IN ({}) ORDER BY id ASC;",
            placeholders(names.len())
        );
        let bind_values = names.iter().map(|name| Value::Text(name.clone()));
        query_tags(self.conn, &sql, bind_values)
    }

    fn insert_tag(&mut self, name: &str) -> RepoResult<TagId> {
        self.conn
            .execute("INSERT INTO tags (name) VALUES (?1);", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_location(&mut self, name: &str) -> RepoResult<LocationId> {
        self.conn
            .execute("INSERT INTO locations (name) VALUES (?1);", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_box(
        &mut self,
        name: &str,
        location_id: LocationId,
        tag_ids: &[TagId],
    ) -> RepoResult<BoxId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO boxes (name, location_id) VALUES (?1, ?2);",
            params![name, location_id],
        )?;
        let box_id = tx.last_insert_rowid();

        for tag_id in tag_ids {
            tx.execute(
                "INSERT INTO box_tags (box_id, tag_id) VALUES (?1, ?2);",
                params![box_id, tag_id],
            )?;
        }

        tx.commit()?;
        Ok(box_id)
    }

    fn insert_item(
        &mut self,
        name: &str,
        box_id: BoxId,
        tag_ids: &[TagId],
    ) -> RepoResult<ItemId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO items (name, box_id) VALUES (?1, ?2);",
            params![name, box_id],
        )?;
        let item_id = tx.last_insert_rowid();

        for tag_id in tag_ids {
            tx.execute(
                "INSERT INTO item_tags (item_id, tag_id) VALUES (?1, ?2);",
                params![item_id, tag_id],
            )?;
        }

        tx.commit()?;
        Ok(item_id)
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        query_tags(
            self.conn,
            "SELECT id, name FROM tags ORDER BY id ASC;",
            std::iter::empty(),
        )
    }

    fn list_locations(&self) -> RepoResult<Vec<Location>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM locations ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut locations = Vec::new();
        while let Some(row) = rows.next()? {
            locations.push(parse_location_row(row)?);
        }
        Ok(locations)
    }

    fn list_boxes(&self) -> RepoResult<Vec<BoxRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOX_RECORD_SELECT_SQL} ORDER BY b.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut boxes = Vec::new();
        while let Some(row) = rows.next()? {
            boxes.push(parse_box_record_row(row)?);
        }

        let mut tags_by_box = load_box_tags(self.conn)?;
        for record in &mut boxes {
            record.tags = tags_by_box.remove(&record.id).unwrap_or_default();
        }
        Ok(boxes)
    }

    fn list_items(&self) -> RepoResult<Vec<ItemRecord>> {
        let boxes: HashMap<BoxId, BoxRecord> = self
            .list_boxes()?
            .into_iter()
            .map(|record| (record.id, record))
            .collect();

        let mut stmt = self
            .conn
            .prepare("SELECT id, name, box_id FROM items ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut item_tags = load_item_tags(self.conn)?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let id: ItemId = row.get("id")?;
            let box_id: BoxId = row.get("box_id")?;
            let parent = boxes.get(&box_id).cloned().ok_or_else(|| {
                RepoError::InvalidData(format!("item {id} references missing box {box_id}"))
            })?;
            items.push(ItemRecord {
                id,
                name: row.get("name")?,
                parent,
                tags: item_tags.remove(&id).unwrap_or_default(),
            });
        }
        Ok(items)
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn query_tags(
    conn: &Connection,
    sql: &str,
    bind_values: impl IntoIterator<Item = Value>,
) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(parse_tag_row(row)?);
    }
    Ok(tags)
}

fn load_box_tags(conn: &Connection) -> RepoResult<HashMap<BoxId, Vec<Tag>>> {
    load_association_tags(
        conn,
        "SELECT bt.box_id AS parent_id, t.id, t.name
         FROM box_tags bt
         INNER JOIN tags t ON t.id = bt.tag_id
         ORDER BY bt.box_id ASC, t.id ASC;",
    )
}

fn load_item_tags(conn: &Connection) -> RepoResult<HashMap<ItemId, Vec<Tag>>> {
    load_association_tags(
        conn,
        "SELECT it.item_id AS parent_id, t.id, t.name
         FROM item_tags it
         INNER JOIN tags t ON t.id = it.tag_id
         ORDER BY it.item_id ASC, t.id ASC;",
    )
}

fn load_association_tags(conn: &Connection, sql: &str) -> RepoResult<HashMap<i64, Vec<Tag>>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut grouped: HashMap<i64, Vec<Tag>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let parent_id: i64 = row.get("parent_id")?;
        grouped
            .entry(parent_id)
            .or_default()
            .push(parse_tag_row(row)?);
    }
    Ok(grouped)
}

fn parse_tag_row(row: &Row<'_>) -> RepoResult<Tag> {
    Ok(Tag {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn parse_location_row(row: &Row<'_>) -> RepoResult<Location> {
    Ok(Location {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn parse_box_row(row: &Row<'_>) -> RepoResult<StorageBox> {
    Ok(StorageBox {
        id: row.get("id")?,
        name: row.get("name")?,
        location_id: row.get("location_id")?,
    })
}

fn parse_box_record_row(row: &Row<'_>) -> RepoResult<BoxRecord> {
    Ok(BoxRecord {
        id: row.get("box_id")?,
        name: row.get("box_name")?,
        location: Location {
            id: row.get("location_id")?,
            name: row.get("location_name")?,
        },
        tags: Vec::new(),
    })
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::{placeholders, RepoError};
    use crate::db::DbError;

    #[test]
    fn placeholders_joins_one_marker_per_value() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }

    #[test]
    fn non_constraint_db_errors_stay_db_errors() {
        let err = RepoError::from(DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 1,
        });
        assert!(matches!(err, RepoError::Db(_)));
    }
}
