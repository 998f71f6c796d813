//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into creation/read use-cases.
//! - Keep the RPC boundary decoupled from storage details.

pub mod storage_manager;
