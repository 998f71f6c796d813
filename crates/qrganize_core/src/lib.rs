//! Core domain logic for QR-Ganize inventory storage.
//! This crate is the single source of truth for creation invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::inventory::{
    BoxId, BoxRecord, BoxTagAssociation, Item, ItemId, ItemRecord, ItemTagAssociation, Location,
    LocationId, StorageBox, Tag, TagId,
};
pub use repo::store_repo::{RepoError, RepoResult, SqliteStoreRepository, StoreRepository};
pub use service::storage_manager::{CreationError, CreationResult, StorageApi, StorageManager};
