//! In-process store for tests and ephemeral sessions.
//!
//! Holds the same JSON blob a `JsonFileStore` would write, so encode/decode
//! behavior is exercised identically.

use super::store::{decode_students, encode_students, RepoError, RepoResult, StudentStore};
use crate::model::student::Student;
use std::io;

const MEMORY_LOCATION: &str = "<memory>";

/// Store backed by an in-memory JSON string.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Option<String>,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStore {
    /// Creates an empty store (loads as "absent").
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with raw contents, valid or not.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
            ..Self::default()
        }
    }

    /// Makes subsequent `save` calls fail with an I/O error.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Raw persisted contents, if any save has happened.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Number of successful saves.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl StudentStore for MemoryStore {
    fn load(&self) -> RepoResult<Option<Vec<Student>>> {
        match &self.contents {
            Some(raw) => decode_students(raw).map(Some),
            None => Ok(None),
        }
    }

    fn save(&mut self, students: &[Student]) -> RepoResult<()> {
        if self.fail_writes {
            return Err(RepoError::io(
                MEMORY_LOCATION,
                io::Error::new(io::ErrorKind::Other, "write failure injected"),
            ));
        }
        self.contents = Some(encode_students(students)?);
        self.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        MEMORY_LOCATION.to_string()
    }
}
