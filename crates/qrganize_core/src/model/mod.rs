//! Inventory domain model: locations, boxes, items and shared tags.
//!
//! # Responsibility
//! - Define the entity records and read models used by core business logic.
//! - Keep parent links as foreign-key ids, resolved explicitly on read.
//!
//! # Invariants
//! - Every entity is identified by a store-assigned integer id.
//! - Entities are created once and never updated or deleted by core.

pub mod inventory;
