//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define one data access contract per entity.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate payloads before persistence.
//! - Every write is a single SQL statement, so it either fully applies or
//!   has no effect.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.

pub mod course_repo;
pub mod enrollment_repo;
pub mod error;
mod schema;
pub mod student_repo;
