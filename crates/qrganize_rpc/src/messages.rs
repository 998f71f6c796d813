//! Request and reply payloads of the store RPC surface.
//!
//! Field names are camelCase on the wire (`tagIds`, `locationId`, `boxId`,
//! `tagNames`).

use qrganize_core::{BoxId, BoxRecord, ItemRecord, Location, LocationId, Tag, TagId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoxRequest {
    pub name: String,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    pub location_id: LocationId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    pub box_id: BoxId,
}

/// Empty `tag_names` means "all tags".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTagsRequest {
    #[serde(default)]
    pub tag_names: Vec<String>,
}

/// Parameterless request and payload-free reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTagsReply {
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLocationsReply {
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBoxesReply {
    pub boxes: Vec<BoxRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetItemsReply {
    pub items: Vec<ItemRecord>,
}
