//! Domain model for the student roster.
//!
//! # Responsibility
//! - Define the canonical student record used by core business logic.
//! - Keep field validation next to the data it guards.
//!
//! # Invariants
//! - Every student is identified by a caller-provided, immutable string ID.
//! - Scores stored on a student are always finite and within `[0, 100]`.

pub mod student;
