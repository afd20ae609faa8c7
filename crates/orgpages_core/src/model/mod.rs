//! Domain model shared by state, resolution and persistence.
//!
//! # Responsibility
//! - Define organizations and the extension descriptors they own.
//! - Keep registration invariants next to the data they guard.
//!
//! # Invariants
//! - Descriptors live and die with their owning organization.

pub mod organization;
