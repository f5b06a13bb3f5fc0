//! Core domain logic for the gradebook roster.
//! This crate is the single source of truth for record invariants and
//! roster persistence; shells call into it and never the other way round.

pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::student::{
    is_valid_score, GradeStatus, Student, StudentValidationError, MAX_SCORE, MIN_SCORE,
    PASSING_AVERAGE,
};
pub use report::{format_average, render_report, render_student_block};
pub use repo::memory_store::MemoryStore;
pub use repo::store::{JsonFileStore, RepoError, RepoResult, StudentStore};
pub use service::student_manager::{StudentManager, StudentPatch, DEFAULT_TOP_N};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
