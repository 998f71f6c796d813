//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the store contract the storage manager depends on.
//! - Isolate SQLite query details from creation/business orchestration.
//!
//! # Invariants
//! - Repository APIs perform no business checks; uniqueness is enforced by
//!   schema indexes and reported as `RepoError::UniqueViolation`.

pub mod store_repo;
