//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Translate repository results into the boundary error taxonomy.
//! - Keep boundary layers decoupled from storage details.

pub mod course_service;
pub mod enrollment_service;
pub mod error;
pub mod student_service;
