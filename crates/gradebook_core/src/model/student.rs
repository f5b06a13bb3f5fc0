//! Student domain model.
//!
//! # Responsibility
//! - Define the canonical record for one student and its subject scores.
//! - Derive average and pass/fail status on demand.
//! - Apply the lenient grade import policy for bulk and legacy data.
//!
//! # Invariants
//! - `id`, `name` and `class_name` are non-empty after trimming.
//! - `name` and `class_name` are stored trimmed; `id` is stored verbatim.
//! - Every stored score is finite and within `[MIN_SCORE, MAX_SCORE]`.
//! - Subjects keep the order they were first recorded in; overwriting a
//!   score keeps the subject's position.
//! - Imported subject keys are stored as given; `add_grade` trims them.
//! - A student without grades has average `0.0` and is not passing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use indexmap::IndexMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest accepted score.
pub const MIN_SCORE: f64 = 0.0;
/// Highest accepted score.
pub const MAX_SCORE: f64 = 100.0;
/// Averages at or above this value are passing.
pub const PASSING_AVERAGE: f64 = 75.0;

/// Pass/fail classification derived from a student's average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeStatus {
    /// Average is at least `PASSING_AVERAGE`.
    Passing,
    /// Average is below `PASSING_AVERAGE`, or no grades exist.
    NotPassing,
}

impl GradeStatus {
    /// Classifies an average score. The threshold itself is passing.
    pub fn from_average(average: f64) -> Self {
        if average >= PASSING_AVERAGE {
            Self::Passing
        } else {
            Self::NotPassing
        }
    }

    /// Stable machine-facing name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passing => "passing",
            Self::NotPassing => "not passing",
        }
    }

    /// Label printed in text reports.
    pub fn report_label(self) -> &'static str {
        match self {
            Self::Passing => "Lulus",
            Self::NotPassing => "Tidak Lulus",
        }
    }
}

impl Display for GradeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation errors for student records.
#[derive(Debug, Clone, PartialEq)]
pub enum StudentValidationError {
    EmptyId,
    EmptyName,
    EmptyClassName,
    EmptySubject,
    InvalidScore(f64),
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "student id must not be empty"),
            Self::EmptyName => write!(f, "student name must not be empty"),
            Self::EmptyClassName => write!(f, "class name must not be empty"),
            Self::EmptySubject => write!(f, "subject must not be empty"),
            Self::InvalidScore(score) => write!(
                f,
                "score must be a number between {MIN_SCORE} and {MAX_SCORE}, got {score}"
            ),
        }
    }
}

impl Error for StudentValidationError {}

/// Returns whether `score` can be stored as a grade.
pub fn is_valid_score(score: f64) -> bool {
    score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// Canonical student record.
///
/// Fields are private so every mutation goes through a validating method.
/// Serialized with the store's wire names `id`, `name`, `className`, `grades`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StudentWire")]
pub struct Student {
    id: String,
    name: String,
    class_name: String,
    grades: IndexMap<String, f64>,
}

impl Student {
    /// Creates a student without grades.
    ///
    /// # Errors
    /// - `EmptyId`, `EmptyName` or `EmptyClassName` for blank fields.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Result<Self, StudentValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(StudentValidationError::EmptyId);
        }
        let name = required_field(name.into(), StudentValidationError::EmptyName)?;
        let class_name = required_field(class_name.into(), StudentValidationError::EmptyClassName)?;

        Ok(Self {
            id,
            name,
            class_name,
            grades: IndexMap::new(),
        })
    }

    /// Creates a student with initial grades.
    ///
    /// Grade entries with a blank subject or an invalid score are dropped
    /// instead of failing the whole construction. Subject keys are kept
    /// verbatim so imported data round-trips unchanged.
    pub fn with_grades<S>(
        id: impl Into<String>,
        name: impl Into<String>,
        class_name: impl Into<String>,
        grades: impl IntoIterator<Item = (S, f64)>,
    ) -> Result<Self, StudentValidationError>
    where
        S: Into<String>,
    {
        let mut student = Self::new(id, name, class_name)?;
        for (subject, score) in grades {
            let subject: String = subject.into();
            if !subject.trim().is_empty() && is_valid_score(score) {
                student.grades.insert(subject, score);
            }
        }
        Ok(student)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns a snapshot of the subject -> score map in recorded order.
    pub fn grades(&self) -> IndexMap<String, f64> {
        self.grades.clone()
    }

    /// Returns one subject's score, if recorded under exactly `subject`.
    pub fn grade(&self, subject: &str) -> Option<f64> {
        self.grades.get(subject).copied()
    }

    pub fn grade_count(&self) -> usize {
        self.grades.len()
    }

    /// Replaces the name with its trimmed form.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), StudentValidationError> {
        self.name = required_field(name.into(), StudentValidationError::EmptyName)?;
        Ok(())
    }

    /// Replaces the class name with its trimmed form.
    pub fn set_class_name(
        &mut self,
        class_name: impl Into<String>,
    ) -> Result<(), StudentValidationError> {
        self.class_name = required_field(class_name.into(), StudentValidationError::EmptyClassName)?;
        Ok(())
    }

    /// Inserts or overwrites the score for `subject`.
    ///
    /// # Errors
    /// - `EmptySubject` when `subject` is blank.
    /// - `InvalidScore` when `score` is non-finite or outside `[0, 100]`.
    pub fn add_grade(
        &mut self,
        subject: impl AsRef<str>,
        score: f64,
    ) -> Result<(), StudentValidationError> {
        let subject = subject.as_ref().trim();
        if subject.is_empty() {
            return Err(StudentValidationError::EmptySubject);
        }
        if !is_valid_score(score) {
            return Err(StudentValidationError::InvalidScore(score));
        }
        self.grades.insert(subject.to_string(), score);
        Ok(())
    }

    /// Applies grade entries with `add_grade` semantics, skipping invalid ones.
    ///
    /// Returns how many entries were skipped.
    pub fn merge_grades_lenient<S>(&mut self, grades: impl IntoIterator<Item = (S, f64)>) -> usize
    where
        S: Into<String>,
    {
        let mut skipped = 0;
        for (subject, score) in grades {
            if self.add_grade(subject.into(), score).is_err() {
                skipped += 1;
            }
        }
        skipped
    }

    /// Arithmetic mean of all scores, `0.0` without grades.
    pub fn average(&self) -> f64 {
        if self.grades.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.grades.values().sum();
        sum / self.grades.len() as f64
    }

    pub fn status(&self) -> GradeStatus {
        GradeStatus::from_average(self.average())
    }
}

fn required_field(
    value: String,
    error: StudentValidationError,
) -> Result<String, StudentValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_string())
}

/// Persisted shape accepted on read.
///
/// Legacy files may carry numeric IDs or numeric strings as scores, so both
/// are loosened here before the strict constructor runs.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentWire {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    class_name: Option<String>,
    #[serde(default)]
    grades: Option<Value>,
}

impl TryFrom<StudentWire> for Student {
    type Error = StudentValidationError;

    fn try_from(wire: StudentWire) -> Result<Self, Self::Error> {
        let id = match wire.id {
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(StudentValidationError::EmptyId),
        };
        let grades = match wire.grades {
            Some(Value::Object(entries)) => entries
                .into_iter()
                .filter_map(|(subject, raw)| wire_score(&raw).map(|score| (subject, score)))
                .collect::<Vec<_>>(),
            _ => Vec::new(),
        };

        Student::with_grades(
            id,
            wire.name.unwrap_or_default(),
            wire.class_name.unwrap_or_default(),
            grades,
        )
    }
}

fn wire_score(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_score, GradeStatus, Student, StudentValidationError};

    #[test]
    fn score_range_is_inclusive() {
        assert!(is_valid_score(0.0));
        assert!(is_valid_score(100.0));
        assert!(!is_valid_score(-0.5));
        assert!(!is_valid_score(100.01));
        assert!(!is_valid_score(f64::NAN));
        assert!(!is_valid_score(f64::INFINITY));
    }

    #[test]
    fn status_threshold_is_inclusive() {
        assert_eq!(GradeStatus::from_average(75.0), GradeStatus::Passing);
        assert_eq!(GradeStatus::from_average(74.999), GradeStatus::NotPassing);
        assert_eq!(GradeStatus::Passing.report_label(), "Lulus");
        assert_eq!(GradeStatus::NotPassing.to_string(), "not passing");
    }

    #[test]
    fn new_trims_display_fields_but_keeps_id() {
        let student = Student::new(" 7 ", "  Budi ", " 10A ").unwrap();
        assert_eq!(student.id(), " 7 ");
        assert_eq!(student.name(), "Budi");
        assert_eq!(student.class_name(), "10A");
    }

    #[test]
    fn failed_setter_leaves_field_untouched() {
        let mut student = Student::new("1", "Ani", "10A").unwrap();
        assert_eq!(
            student.set_class_name("   ").unwrap_err(),
            StudentValidationError::EmptyClassName
        );
        assert_eq!(student.class_name(), "10A");
    }
}
