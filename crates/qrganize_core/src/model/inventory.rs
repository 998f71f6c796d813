//! Inventory entities and their read models.
//!
//! # Responsibility
//! - Define `Tag`, `Location`, `Box` and `Item` records plus association rows.
//! - Provide expanded read models (`BoxRecord`, `ItemRecord`) for list use-cases.
//!
//! # Invariants
//! - `Tag.name` and `Location.name` are globally unique.
//! - `(Box.name, Box.location_id)` and `(Item.name, Item.box_id)` are unique.
//! - A `(parent, tag)` pair appears at most once per association table.

use serde::{Deserialize, Serialize};

/// Store-assigned tag id.
pub type TagId = i64;
/// Store-assigned location id.
pub type LocationId = i64;
/// Store-assigned box id.
pub type BoxId = i64;
/// Store-assigned item id.
pub type ItemId = i64;

/// Shared label attachable to boxes and items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Named place that holds boxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
}

/// Stored box row. The owning location is held by id only.
///
/// Named `StorageBox` to avoid shadowing `std::boxed::Box`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageBox {
    pub id: BoxId,
    pub name: String,
    pub location_id: LocationId,
}

/// Stored item row. The owning box is held by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub box_id: BoxId,
}

/// Join row linking one box to one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxTagAssociation {
    pub id: i64,
    pub box_id: BoxId,
    pub tag_id: TagId,
}

/// Join row linking one item to one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTagAssociation {
    pub id: i64,
    pub item_id: ItemId,
    pub tag_id: TagId,
}

/// Box read model with its location and tags resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxRecord {
    pub id: BoxId,
    pub name: String,
    pub location: Location,
    /// Ordered by tag id.
    pub tags: Vec<Tag>,
}

/// Item read model with its box (expanded) and own tags resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    #[serde(rename = "box")]
    pub parent: BoxRecord,
    /// Ordered by tag id.
    pub tags: Vec<Tag>,
}

#[cfg(test)]
mod tests {
    use super::{BoxRecord, ItemRecord, Location};

    #[test]
    fn item_record_serializes_parent_as_box() {
        let item = ItemRecord {
            id: 3,
            name: "Drill".to_string(),
            parent: BoxRecord {
                id: 2,
                name: "Bin A".to_string(),
                location: Location {
                    id: 1,
                    name: "Garage".to_string(),
                },
                tags: Vec::new(),
            },
            tags: Vec::new(),
        };

        let json = serde_json::to_value(&item).expect("item should serialize");
        assert_eq!(json["box"]["location"]["name"], "Garage");
        assert!(json.get("parent").is_none());
    }
}
