//! Store RPC service: translates storage outcomes into transport statuses.
//!
//! # Responsibility
//! - Delegate every RPC to the storage manager.
//! - Map each declared `CreationError` onto a fixed status + message.
//!
//! # Invariants
//! - No business logic lives here; names reach the manager unchanged.
//! - A `CreationError` that is not declared for the calling operation is a
//!   contract violation and panics; it is never coerced into a valid status.
//! - Storage failures become an opaque `Internal` status; the raw storage
//!   error is only logged.

use crate::messages::{
    CreateBoxRequest, CreateItemRequest, CreateLocationRequest, CreateTagRequest, Empty,
    GetBoxesReply, GetItemsReply, GetLocationsReply, GetTagsReply, GetTagsRequest,
};
use crate::status::Status;
use log::{debug, error};
use qrganize_core::{CreationError, RepoError, StorageApi};

pub const TAG_ALREADY_EXISTS: &str = "Tag with given name already exists";
pub const LOCATION_ALREADY_EXISTS: &str = "Location with given name already exists";
pub const BOX_ALREADY_EXISTS: &str = "Box with given name and location already exists";
pub const ITEM_ALREADY_EXISTS: &str = "Item with given name and box already exists";
pub const LOCATION_NOT_FOUND: &str = "Given location was not found";
pub const BOX_NOT_FOUND: &str = "Given box was not found";
pub const INTERNAL_STORAGE_ERROR: &str = "internal storage error";

/// RPC-facing facade over a storage manager.
pub struct StoreService<M: StorageApi> {
    manager: M,
}

impl<M: StorageApi> StoreService<M> {
    /// Creates a service that delegates to `manager`.
    pub fn new(manager: M) -> Self {
        Self { manager }
    }

    pub fn create_tag(&mut self, request: CreateTagRequest) -> Result<Empty, Status> {
        const METHOD: &str = "CreateTag";
        let outcome = self
            .manager
            .create_tag(&request.name)
            .map_err(|err| storage_failure(METHOD, err))?;

        match outcome {
            Ok(()) => created(METHOD),
            Err(CreationError::AlreadyExists) => Err(Status::already_exists(TAG_ALREADY_EXISTS)),
            Err(other) => contract_violation(METHOD, other),
        }
    }

    pub fn create_location(&mut self, request: CreateLocationRequest) -> Result<Empty, Status> {
        const METHOD: &str = "CreateLocation";
        let outcome = self
            .manager
            .create_location(&request.name)
            .map_err(|err| storage_failure(METHOD, err))?;

        match outcome {
            Ok(()) => created(METHOD),
            Err(CreationError::AlreadyExists) => {
                Err(Status::already_exists(LOCATION_ALREADY_EXISTS))
            }
            Err(other) => contract_violation(METHOD, other),
        }
    }

    pub fn create_box(&mut self, request: CreateBoxRequest) -> Result<Empty, Status> {
        const METHOD: &str = "CreateBox";
        let outcome = self
            .manager
            .create_box(&request.name, &request.tag_ids, request.location_id)
            .map_err(|err| storage_failure(METHOD, err))?;

        match outcome {
            Ok(()) => created(METHOD),
            Err(CreationError::AlreadyExists) => Err(Status::already_exists(BOX_ALREADY_EXISTS)),
            Err(CreationError::LocationNotFound) => Err(Status::not_found(LOCATION_NOT_FOUND)),
            Err(other) => contract_violation(METHOD, other),
        }
    }

    pub fn create_item(&mut self, request: CreateItemRequest) -> Result<Empty, Status> {
        const METHOD: &str = "CreateItem";
        let outcome = self
            .manager
            .create_item(&request.name, &request.tag_ids, request.box_id)
            .map_err(|err| storage_failure(METHOD, err))?;

        match outcome {
            Ok(()) => created(METHOD),
            Err(CreationError::AlreadyExists) => Err(Status::already_exists(ITEM_ALREADY_EXISTS)),
            Err(CreationError::BoxNotFound) => Err(Status::not_found(BOX_NOT_FOUND)),
            Err(other) => contract_violation(METHOD, other),
        }
    }

    pub fn get_tags(&self, request: GetTagsRequest) -> Result<GetTagsReply, Status> {
        let tags = self
            .manager
            .get_tags(&request.tag_names)
            .map_err(|err| storage_failure("GetTags", err))?;
        Ok(GetTagsReply { tags })
    }

    pub fn get_locations(&self, _request: Empty) -> Result<GetLocationsReply, Status> {
        let locations = self
            .manager
            .get_locations()
            .map_err(|err| storage_failure("GetLocations", err))?;
        Ok(GetLocationsReply { locations })
    }

    pub fn get_boxes(&self, _request: Empty) -> Result<GetBoxesReply, Status> {
        let boxes = self
            .manager
            .get_boxes()
            .map_err(|err| storage_failure("GetBoxes", err))?;
        Ok(GetBoxesReply { boxes })
    }

    pub fn get_items(&self, _request: Empty) -> Result<GetItemsReply, Status> {
        let items = self
            .manager
            .get_items()
            .map_err(|err| storage_failure("GetItems", err))?;
        Ok(GetItemsReply { items })
    }
}

fn created(method: &str) -> Result<Empty, Status> {
    debug!("event=rpc_call module=rpc status=ok method={method}");
    Ok(Empty {})
}

fn storage_failure(method: &str, err: RepoError) -> Status {
    error!("event=rpc_call module=rpc status=error method={method} error_code=storage_failure error={err}");
    Status::internal(INTERNAL_STORAGE_ERROR)
}

fn contract_violation(method: &str, error: CreationError) -> ! {
    error!("event=rpc_call module=rpc status=fatal method={method} error_code=undeclared_creation_error reason={error}");
    panic!("{method} received undeclared creation error `{error}`");
}
