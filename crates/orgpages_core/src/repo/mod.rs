//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts used by the fetch collaborator.
//! - Isolate SQLite query details from resolution and rendering.
//!
//! # Invariants
//! - Repository writes enforce `Organization::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod organization_repo;
