//! Method routing from JSON-RPC requests onto `StoreService` calls.

use crate::messages::{
    CreateBoxRequest, CreateItemRequest, CreateLocationRequest, CreateTagRequest, Empty,
    GetTagsRequest,
};
use crate::protocol::{
    Request, Response, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION, METHOD_NOT_FOUND,
    PARSE_ERROR,
};
use crate::service::{StoreService, INTERNAL_STORAGE_ERROR};
use crate::status::Status;
use log::{debug, warn};
use qrganize_core::StorageApi;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

enum CallError {
    InvalidParams(String),
    Failed(Status),
}

/// Parses one request line and dispatches it.
pub fn dispatch_line<M: StorageApi>(service: &mut StoreService<M>, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => dispatch(service, request),
        Err(err) => {
            warn!("event=rpc_parse module=rpc status=error error={err}");
            Response::error(None, PARSE_ERROR, format!("parse error: {err}"))
        }
    }
}

/// Dispatches one parsed request to the matching service method.
pub fn dispatch<M: StorageApi>(service: &mut StoreService<M>, request: Request) -> Response {
    let Request {
        jsonrpc,
        id,
        method,
        params,
    } = request;

    if jsonrpc != JSONRPC_VERSION {
        return Response::error(
            id,
            INVALID_REQUEST,
            format!("unsupported jsonrpc version `{jsonrpc}`"),
        );
    }

    debug!("event=rpc_dispatch module=rpc status=start method={method}");
    let outcome = match method.as_str() {
        "CreateTag" => call(params, |req: CreateTagRequest| service.create_tag(req)),
        "CreateLocation" => call(params, |req: CreateLocationRequest| {
            service.create_location(req)
        }),
        "CreateBox" => call(params, |req: CreateBoxRequest| service.create_box(req)),
        "CreateItem" => call(params, |req: CreateItemRequest| service.create_item(req)),
        "GetTags" => call(params, |req: GetTagsRequest| service.get_tags(req)),
        "GetLocations" => call(params, |req: Empty| service.get_locations(req)),
        "GetBoxes" => call(params, |req: Empty| service.get_boxes(req)),
        "GetItems" => call(params, |req: Empty| service.get_items(req)),
        other => {
            return Response::error(id, METHOD_NOT_FOUND, format!("method not found: {other}"));
        }
    };

    match outcome {
        Ok(result) => Response::success(id, result),
        Err(CallError::InvalidParams(message)) => Response::error(id, INVALID_PARAMS, message),
        Err(CallError::Failed(status)) => Response::from_status(id, &status),
    }
}

fn call<P, R>(
    params: Value,
    handler: impl FnOnce(P) -> Result<R, Status>,
) -> Result<Value, CallError>
where
    P: DeserializeOwned,
    R: Serialize,
{
    let params = if params.is_null() {
        Value::Object(Map::new())
    } else {
        params
    };
    let request: P = serde_json::from_value(params)
        .map_err(|err| CallError::InvalidParams(format!("invalid params: {err}")))?;
    let reply = handler(request).map_err(CallError::Failed)?;
    serde_json::to_value(reply).map_err(|err| {
        warn!("event=rpc_encode module=rpc status=error error={err}");
        CallError::Failed(Status::internal(INTERNAL_STORAGE_ERROR))
    })
}
