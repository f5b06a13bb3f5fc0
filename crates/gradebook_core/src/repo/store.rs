//! Store contract and JSON file implementation.
//!
//! # Responsibility
//! - Provide stable load/save APIs over the persisted student roster.
//! - Keep the JSON encoding inside the core persistence boundary.
//!
//! # Invariants
//! - `save` writes a sibling temp file and renames it over the target, so
//!   readers see either the old or the new roster, never a partial one.
//! - A missing file loads as `Ok(None)`, not as an error.

use crate::model::student::{Student, StudentValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for roster persistence and manager operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(StudentValidationError),
    DuplicateId(String),
    NotFound(String),
    Io { path: PathBuf, source: io::Error },
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "student id already exists: {id}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::DuplicateId(_) | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Whole-roster persistence contract.
pub trait StudentStore {
    /// Reads the persisted roster. `Ok(None)` means nothing was stored yet.
    fn load(&self) -> RepoResult<Option<Vec<Student>>>;
    /// Replaces the persisted roster with `students`, in order.
    fn save(&mut self, students: &[Student]) -> RepoResult<()>;
    /// Human-readable location used in log lines.
    fn location(&self) -> String;
}

/// JSON file store using 2-space indented output.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "students.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StudentStore for JsonFileStore {
    fn load(&self) -> RepoResult<Option<Vec<Student>>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(RepoError::io(&self.path, err)),
        };
        decode_students(&raw).map(Some)
    }

    fn save(&mut self, students: &[Student]) -> RepoResult<()> {
        let payload = encode_students(students)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| RepoError::io(parent, err))?;
            }
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, payload).map_err(|err| RepoError::io(&temp_path, err))?;
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(RepoError::io(&self.path, err));
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

pub(crate) fn encode_students(students: &[Student]) -> RepoResult<String> {
    serde_json::to_string_pretty(students)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode roster: {err}")))
}

pub(crate) fn decode_students(raw: &str) -> RepoResult<Vec<Student>> {
    serde_json::from_str(raw).map_err(|err| RepoError::InvalidData(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{decode_students, JsonFileStore, RepoError};
    use std::path::PathBuf;

    #[test]
    fn temp_path_is_a_sibling_of_the_target() {
        let store = JsonFileStore::new(PathBuf::from("data").join("students.json"));
        assert_eq!(
            store.temp_path(),
            PathBuf::from("data").join("students.json.tmp")
        );
    }

    #[test]
    fn decode_rejects_non_array_payload() {
        let err = decode_students(r#"{"id": "1"}"#).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }

    #[test]
    fn decode_reports_blank_name_as_invalid_data() {
        let err =
            decode_students(r#"[{"id": "1", "name": " ", "className": "10A"}]"#).unwrap_err();
        match err {
            RepoError::InvalidData(message) => {
                assert!(message.contains("student name must not be empty"), "{message}")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
