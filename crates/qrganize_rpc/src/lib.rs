//! RPC boundary for the QR-Ganize inventory store.
//!
//! # Responsibility
//! - Translate storage manager outcomes into transport statuses.
//! - Expose the service over line-delimited JSON-RPC 2.0.

pub mod dispatch;
pub mod messages;
pub mod protocol;
pub mod server;
pub mod service;
pub mod status;

pub use dispatch::{dispatch, dispatch_line};
pub use server::serve;
pub use service::StoreService;
pub use status::{Code, Status};
