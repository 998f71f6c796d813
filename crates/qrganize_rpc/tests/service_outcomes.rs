use qrganize_core::{
    BoxId, BoxRecord, CreationError, CreationResult, ItemRecord, Location, LocationId, RepoError,
    RepoResult, StorageApi, Tag, TagId,
};
use qrganize_rpc::messages::{
    CreateBoxRequest, CreateItemRequest, CreateLocationRequest, CreateTagRequest, Empty,
};
use qrganize_rpc::service::{
    BOX_ALREADY_EXISTS, BOX_NOT_FOUND, INTERNAL_STORAGE_ERROR, ITEM_ALREADY_EXISTS,
    LOCATION_ALREADY_EXISTS, LOCATION_NOT_FOUND, TAG_ALREADY_EXISTS,
};
use qrganize_rpc::{Code, StoreService};

/// Manager stub returning one canned creation outcome, or a storage failure.
struct CannedManager {
    outcome: Option<CreationResult>,
}

impl CannedManager {
    fn returning(outcome: CreationResult) -> Self {
        Self {
            outcome: Some(outcome),
        }
    }

    /// Every call fails with an infrastructure error.
    fn broken() -> Self {
        Self { outcome: None }
    }

    fn answer(&self) -> RepoResult<CreationResult> {
        self.outcome
            .ok_or_else(|| RepoError::InvalidData("disk on fire at /var/db".to_string()))
    }
}

impl StorageApi for CannedManager {
    fn create_tag(&mut self, _name: &str) -> RepoResult<CreationResult> {
        self.answer()
    }

    fn create_location(&mut self, _name: &str) -> RepoResult<CreationResult> {
        self.answer()
    }

    fn create_box(
        &mut self,
        _name: &str,
        _tag_ids: &[TagId],
        _location_id: LocationId,
    ) -> RepoResult<CreationResult> {
        self.answer()
    }

    fn create_item(
        &mut self,
        _name: &str,
        _tag_ids: &[TagId],
        _box_id: BoxId,
    ) -> RepoResult<CreationResult> {
        self.answer()
    }

    fn get_tags(&self, names: &[String]) -> RepoResult<Vec<Tag>> {
        self.answer()?;
        Ok(names
            .iter()
            .enumerate()
            .map(|(idx, name)| Tag {
                id: idx as i64 + 1,
                name: name.clone(),
            })
            .collect())
    }

    fn get_locations(&self) -> RepoResult<Vec<Location>> {
        self.answer()?;
        Ok(Vec::new())
    }

    fn get_boxes(&self) -> RepoResult<Vec<BoxRecord>> {
        self.answer()?;
        Ok(Vec::new())
    }

    fn get_items(&self) -> RepoResult<Vec<ItemRecord>> {
        self.answer()?;
        Ok(Vec::new())
    }
}

fn box_request() -> CreateBoxRequest {
    CreateBoxRequest {
        name: "Test Box Name".to_string(),
        tag_ids: vec![1, 2],
        location_id: 1,
    }
}

fn item_request() -> CreateItemRequest {
    CreateItemRequest {
        name: "Test Item Name".to_string(),
        tag_ids: vec![1, 2],
        box_id: 1,
    }
}

fn tag_request() -> CreateTagRequest {
    CreateTagRequest {
        name: "TagName".to_string(),
    }
}

fn location_request() -> CreateLocationRequest {
    CreateLocationRequest {
        name: "LocationName".to_string(),
    }
}

#[test]
fn successful_creations_return_empty_reply() {
    let mut service = StoreService::new(CannedManager::returning(Ok(())));

    assert_eq!(service.create_tag(tag_request()), Ok(Empty {}));
    assert_eq!(service.create_location(location_request()), Ok(Empty {}));
    assert_eq!(service.create_box(box_request()), Ok(Empty {}));
    assert_eq!(service.create_item(item_request()), Ok(Empty {}));
}

#[test]
fn create_item_maps_declared_errors() {
    let cases = [
        (
            CreationError::AlreadyExists,
            Code::AlreadyExists,
            ITEM_ALREADY_EXISTS,
        ),
        (CreationError::BoxNotFound, Code::NotFound, BOX_NOT_FOUND),
    ];

    for (error, code, message) in cases {
        let mut service = StoreService::new(CannedManager::returning(Err(error)));
        let status = service.create_item(item_request()).unwrap_err();
        assert_eq!(status.code(), code);
        assert_eq!(status.message(), message);
    }
}

#[test]
fn create_box_maps_declared_errors() {
    let cases = [
        (
            CreationError::AlreadyExists,
            Code::AlreadyExists,
            BOX_ALREADY_EXISTS,
        ),
        (
            CreationError::LocationNotFound,
            Code::NotFound,
            LOCATION_NOT_FOUND,
        ),
    ];

    for (error, code, message) in cases {
        let mut service = StoreService::new(CannedManager::returning(Err(error)));
        let status = service.create_box(box_request()).unwrap_err();
        assert_eq!(status.code(), code);
        assert_eq!(status.message(), message);
    }
}

#[test]
fn create_tag_and_location_map_already_exists() {
    let mut service = StoreService::new(CannedManager::returning(Err(
        CreationError::AlreadyExists,
    )));

    let tag_status = service.create_tag(tag_request()).unwrap_err();
    assert_eq!(tag_status.code(), Code::AlreadyExists);
    assert_eq!(tag_status.message(), TAG_ALREADY_EXISTS);

    let location_status = service.create_location(location_request()).unwrap_err();
    assert_eq!(location_status.code(), Code::AlreadyExists);
    assert_eq!(location_status.message(), LOCATION_ALREADY_EXISTS);
}

#[test]
#[should_panic(expected = "CreateItem received undeclared creation error `location_not_found`")]
fn create_item_panics_on_location_not_found() {
    let mut service = StoreService::new(CannedManager::returning(Err(
        CreationError::LocationNotFound,
    )));
    let _ = service.create_item(item_request());
}

#[test]
#[should_panic(expected = "CreateBox received undeclared creation error `box_not_found`")]
fn create_box_panics_on_box_not_found() {
    let mut service = StoreService::new(CannedManager::returning(Err(
        CreationError::BoxNotFound,
    )));
    let _ = service.create_box(box_request());
}

#[test]
#[should_panic(expected = "CreateTag received undeclared creation error")]
fn create_tag_panics_on_not_found_kinds() {
    let mut service = StoreService::new(CannedManager::returning(Err(
        CreationError::LocationNotFound,
    )));
    let _ = service.create_tag(tag_request());
}

#[test]
#[should_panic(expected = "CreateLocation received undeclared creation error")]
fn create_location_panics_on_not_found_kinds() {
    let mut service = StoreService::new(CannedManager::returning(Err(
        CreationError::BoxNotFound,
    )));
    let _ = service.create_location(location_request());
}

#[test]
fn storage_failures_become_opaque_internal_status() {
    let mut service = StoreService::new(CannedManager::broken());

    let create_status = service.create_box(box_request()).unwrap_err();
    assert_eq!(create_status.code(), Code::Internal);
    assert_eq!(create_status.message(), INTERNAL_STORAGE_ERROR);
    assert!(!create_status.to_string().contains("/var/db"));

    let read_status = service.get_boxes(Empty {}).unwrap_err();
    assert_eq!(read_status.code(), Code::Internal);
}
