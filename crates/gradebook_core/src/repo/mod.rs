//! Store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the whole-roster load/save contract used by the service layer.
//! - Isolate file format and I/O details from business orchestration.
//!
//! # Invariants
//! - A save always replaces the full previous contents, never merges.
//! - Loaded records pass `Student` validation; invalid persisted state is
//!   reported as `RepoError::InvalidData` instead of being masked.

pub mod memory_store;
pub mod store;
