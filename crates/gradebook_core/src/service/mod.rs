//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, in-memory mutation and persistence.
//! - Keep shell layers decoupled from storage details.

pub mod student_manager;
