//! Storage manager: creation invariants and inventory reads.
//!
//! # Responsibility
//! - Enforce uniqueness and parent-existence before every creation.
//! - Link boxes/items to the subset of requested tags that exist.
//! - Report business outcomes as a closed `CreationError` set.
//!
//! # Invariants
//! - Existence checks run before any mutation; parent-not-found wins over
//!   sibling uniqueness.
//! - A commit-time unique violation is reported exactly like a pre-check hit
//!   (`AlreadyExists`).
//! - The outer `RepoResult` error is reserved for infrastructure failures.

use crate::model::inventory::{BoxId, BoxRecord, ItemRecord, Location, LocationId, Tag, TagId};
use crate::repo::store_repo::{RepoError, RepoResult, StoreRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failed precondition of a creation operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreationError {
    /// A uniqueness invariant would be violated.
    AlreadyExists,
    /// Item creation referenced a box that does not exist.
    BoxNotFound,
    /// Box creation referenced a location that does not exist.
    LocationNotFound,
}

impl CreationError {
    /// Stable snake_case label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyExists => "already_exists",
            Self::BoxNotFound => "box_not_found",
            Self::LocationNotFound => "location_not_found",
        }
    }
}

impl Display for CreationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error for CreationError {}

/// Business outcome of one creation: no payload on success.
pub type CreationResult = Result<(), CreationError>;

/// Storage operations exposed to the service boundary.
pub trait StorageApi {
    /// Creates one tag with a globally unique name.
    fn create_tag(&mut self, name: &str) -> RepoResult<CreationResult>;
    /// Creates one location with a globally unique name.
    fn create_location(&mut self, name: &str) -> RepoResult<CreationResult>;
    /// Creates one box under `location_id`, tagged with the existing subset of `tag_ids`.
    fn create_box(
        &mut self,
        name: &str,
        tag_ids: &[TagId],
        location_id: LocationId,
    ) -> RepoResult<CreationResult>;
    /// Creates one item inside `box_id`, tagged with the existing subset of `tag_ids`.
    fn create_item(
        &mut self,
        name: &str,
        tag_ids: &[TagId],
        box_id: BoxId,
    ) -> RepoResult<CreationResult>;
    /// Returns all tags when `names` is empty, otherwise tags named in `names`.
    fn get_tags(&self, names: &[String]) -> RepoResult<Vec<Tag>>;
    /// Returns all locations.
    fn get_locations(&self) -> RepoResult<Vec<Location>>;
    /// Returns all boxes with location and tags attached.
    fn get_boxes(&self) -> RepoResult<Vec<BoxRecord>>;
    /// Returns all items with box and tags attached.
    fn get_items(&self) -> RepoResult<Vec<ItemRecord>>;
}

/// Storage manager over an explicitly provided repository.
pub struct StorageManager<R: StoreRepository> {
    repo: R,
}

impl<R: StoreRepository> StorageManager<R> {
    /// Creates a manager using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

impl<R: StoreRepository> StorageApi for StorageManager<R> {
    fn create_tag(&mut self, name: &str) -> RepoResult<CreationResult> {
        if self.repo.find_tag_by_name(name)?.is_some() {
            return Ok(rejected("create_tag", CreationError::AlreadyExists));
        }

        let inserted = self.repo.insert_tag(name);
        settle("create_tag", inserted)
    }

    fn create_location(&mut self, name: &str) -> RepoResult<CreationResult> {
        if self.repo.find_location_by_name(name)?.is_some() {
            return Ok(rejected("create_location", CreationError::AlreadyExists));
        }

        let inserted = self.repo.insert_location(name);
        settle("create_location", inserted)
    }

    fn create_box(
        &mut self,
        name: &str,
        tag_ids: &[TagId],
        location_id: LocationId,
    ) -> RepoResult<CreationResult> {
        if self.repo.find_location(location_id)?.is_none() {
            return Ok(rejected("create_box", CreationError::LocationNotFound));
        }
        if self.repo.find_box_by_name(name, location_id)?.is_some() {
            return Ok(rejected("create_box", CreationError::AlreadyExists));
        }

        let resolved = self.resolve_tag_ids(tag_ids)?;
        let inserted = self.repo.insert_box(name, location_id, &resolved);
        settle("create_box", inserted)
    }

    fn create_item(
        &mut self,
        name: &str,
        tag_ids: &[TagId],
        box_id: BoxId,
    ) -> RepoResult<CreationResult> {
        if self.repo.find_box(box_id)?.is_none() {
            return Ok(rejected("create_item", CreationError::BoxNotFound));
        }
        if self.repo.find_item_by_name(name, box_id)?.is_some() {
            return Ok(rejected("create_item", CreationError::AlreadyExists));
        }

        let resolved = self.resolve_tag_ids(tag_ids)?;
        let inserted = self.repo.insert_item(name, box_id, &resolved);
        settle("create_item", inserted)
    }

    fn get_tags(&self, names: &[String]) -> RepoResult<Vec<Tag>> {
        if names.is_empty() {
            return self.repo.list_tags();
        }
        self.repo.find_tags_by_names(names)
    }

    fn get_locations(&self) -> RepoResult<Vec<Location>> {
        self.repo.list_locations()
    }

    fn get_boxes(&self) -> RepoResult<Vec<BoxRecord>> {
        self.repo.list_boxes()
    }

    fn get_items(&self) -> RepoResult<Vec<ItemRecord>> {
        self.repo.list_items()
    }
}

impl<R: StoreRepository> StorageManager<R> {
    /// Keeps only ids that name an existing tag; unknown ids are dropped.
    fn resolve_tag_ids(&self, tag_ids: &[TagId]) -> RepoResult<Vec<TagId>> {
        let resolved: Vec<TagId> = self
            .repo
            .find_tags_by_ids(tag_ids)?
            .into_iter()
            .map(|tag| tag.id)
            .collect();

        let dropped = tag_ids.iter().filter(|id| !resolved.contains(id)).count();
        if dropped > 0 {
            warn!("event=resolve_tags module=manager status=partial dropped_ids={dropped}");
        }
        Ok(resolved)
    }
}

fn rejected(event: &str, error: CreationError) -> CreationResult {
    info!("event={event} module=manager status=rejected reason={error}");
    Err(error)
}

fn settle<T>(event: &str, inserted: RepoResult<T>) -> RepoResult<CreationResult> {
    match inserted {
        Ok(_) => {
            info!("event={event} module=manager status=ok");
            Ok(Ok(()))
        }
        Err(RepoError::UniqueViolation(message)) => {
            warn!("event={event} module=manager status=rejected reason=commit_unique_violation detail={message}");
            Ok(Err(CreationError::AlreadyExists))
        }
        Err(err) => Err(err),
    }
}
