//! Student roster use-case service.
//!
//! # Responsibility
//! - Own the ordered in-memory roster and enforce ID uniqueness.
//! - Persist the whole roster after every mutation.
//! - Provide ranking, filtering and report export over the roster.
//!
//! # Invariants
//! - Roster order is insertion order; removals keep the relative order.
//! - IDs are compared as strings, so `7` and `"7"` address the same student.
//! - Mutations are applied to a working copy and committed only after the
//!   store accepted it; a failed persist leaves the roster unchanged.
//! - Readers always receive owned snapshots, never internal references.
//!
//! A manager is only reachable through `open`, which loads the store first.
//! Callers sharing one manager across threads must wrap it in a single mutex
//! so check-then-write sequences stay atomic.

use crate::model::student::Student;
use crate::report::render_report;
use crate::repo::store::{RepoError, RepoResult, StudentStore};
use indexmap::IndexMap;
use log::{debug, error, info, warn};
use std::fmt::Display;
use std::fs;
use std::path::Path;

/// Default size of the ranking returned by `top_n`.
pub const DEFAULT_TOP_N: usize = 3;

/// Partial update applied by `StudentManager::update`.
///
/// Absent fields are left untouched. Grades merge per subject with
/// insert-or-replace semantics in patch order; invalid entries are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub grades: Option<IndexMap<String, f64>>,
}

impl StudentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn grade(mut self, subject: impl Into<String>, score: f64) -> Self {
        self.grades
            .get_or_insert_with(IndexMap::new)
            .insert(subject.into(), score);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.class_name.is_none() && self.grades.is_none()
    }
}

/// Roster aggregate bound to one store.
pub struct StudentManager<S: StudentStore> {
    store: S,
    students: Vec<Student>,
}

impl<S: StudentStore> StudentManager<S> {
    /// Creates a manager and loads the roster from `store`.
    ///
    /// Never fails: an absent or unreadable store yields an empty roster.
    pub fn open(store: S) -> Self {
        let mut manager = Self {
            store,
            students: Vec::new(),
        };
        manager.load();
        manager
    }

    /// Replaces the in-memory roster with the store contents.
    ///
    /// Read or decode failures are logged and recovered as an empty roster.
    pub fn load(&mut self) {
        let location = self.store.location();
        self.students = match self.store.load() {
            Ok(Some(students)) => {
                info!(
                    "event=roster_load module=service status=ok store={} count={}",
                    location,
                    students.len()
                );
                students
            }
            Ok(None) => {
                info!(
                    "event=roster_load module=service status=empty store={}",
                    location
                );
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=roster_load module=service status=recovered store={} error={}",
                    location, err
                );
                Vec::new()
            }
        };
    }

    /// Writes the full roster to the store.
    pub fn save(&mut self) -> RepoResult<()> {
        let result = self.store.save(&self.students);
        self.log_persist("roster_save", self.students.len(), &result);
        result
    }

    /// Appends a student and persists.
    ///
    /// # Errors
    /// - `DuplicateId` when a student with the same ID exists.
    /// - `Io` when the store write fails; the roster stays unchanged.
    pub fn add(&mut self, student: Student) -> RepoResult<()> {
        if self.position(student.id()).is_some() {
            return Err(RepoError::DuplicateId(student.id().to_string()));
        }

        let id = student.id().to_string();
        let mut next = self.students.clone();
        next.push(student);
        self.commit(next)?;

        info!("event=student_add module=service status=ok id={}", id);
        Ok(())
    }

    /// Removes the student with `id` and persists. Returns the removed record.
    ///
    /// # Errors
    /// - `NotFound` when no student has that ID.
    /// - `Io` when the store write fails; the roster stays unchanged.
    pub fn remove(&mut self, id: impl Display) -> RepoResult<Student> {
        let key = id.to_string();
        let index = self.require_position(&key)?;

        let mut next = self.students.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        info!("event=student_remove module=service status=ok id={}", key);
        Ok(removed)
    }

    /// Looks up a student by string-equal ID.
    pub fn find(&self, id: impl Display) -> Option<Student> {
        let key = id.to_string();
        self.position(&key).map(|index| self.students[index].clone())
    }

    /// Applies `patch` to the student with `id` and persists once.
    ///
    /// Name and class changes are validated strictly; invalid grade entries
    /// are skipped. Returns the updated record.
    ///
    /// # Errors
    /// - `NotFound` when no student has that ID.
    /// - `Validation` when a provided name or class is blank.
    /// - `Io` when the store write fails; the roster stays unchanged.
    pub fn update(&mut self, id: impl Display, patch: &StudentPatch) -> RepoResult<Student> {
        let key = id.to_string();
        let index = self.require_position(&key)?;

        let mut updated = self.students[index].clone();
        if let Some(name) = &patch.name {
            updated.set_name(name.as_str())?;
        }
        if let Some(class_name) = &patch.class_name {
            updated.set_class_name(class_name.as_str())?;
        }
        if let Some(grades) = &patch.grades {
            let skipped = updated.merge_grades_lenient(
                grades
                    .iter()
                    .map(|(subject, score)| (subject.as_str(), *score)),
            );
            if skipped > 0 {
                debug!(
                    "event=student_update module=service status=grades_skipped id={} skipped={}",
                    key, skipped
                );
            }
        }

        let mut next = self.students.clone();
        next[index] = updated.clone();
        self.commit(next)?;

        info!("event=student_update module=service status=ok id={}", key);
        Ok(updated)
    }

    /// Inserts or replaces one grade on the student with `id` and persists.
    ///
    /// Unlike `update`, an invalid subject or score is an error.
    pub fn add_grade(
        &mut self,
        id: impl Display,
        subject: impl AsRef<str>,
        score: f64,
    ) -> RepoResult<Student> {
        let key = id.to_string();
        let index = self.require_position(&key)?;

        let mut updated = self.students[index].clone();
        updated.add_grade(subject, score)?;

        let mut next = self.students.clone();
        next[index] = updated.clone();
        self.commit(next)?;

        info!("event=grade_add module=service status=ok id={}", key);
        Ok(updated)
    }

    /// Snapshot of the roster in insertion order.
    pub fn list_all(&self) -> Vec<Student> {
        self.students.clone()
    }

    /// Up to `n` students by descending average; ties keep roster order.
    pub fn top_n(&self, n: usize) -> Vec<Student> {
        let mut ranked = self.students.clone();
        // `sort_by` is stable, which keeps equal averages in insertion order.
        ranked.sort_by(|a, b| b.average().total_cmp(&a.average()));
        ranked.truncate(n);
        ranked
    }

    /// Students whose class name equals `class_name` exactly.
    pub fn filter_by_class(&self, class_name: &str) -> Vec<Student> {
        self.students
            .iter()
            .filter(|student| student.class_name() == class_name)
            .cloned()
            .collect()
    }

    /// Writes the text report for the whole roster to `destination`.
    ///
    /// The primary store is never touched.
    pub fn export_report(&self, destination: impl AsRef<Path>) -> RepoResult<()> {
        let destination = destination.as_ref();
        let report = render_report(&self.students);
        match fs::write(destination, report) {
            Ok(()) => {
                info!(
                    "event=report_export module=service status=ok count={} path={}",
                    self.students.len(),
                    destination.display()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=report_export module=service status=error path={} error={}",
                    destination.display(),
                    err
                );
                Err(RepoError::io(destination, err))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.students.iter().position(|student| student.id() == id)
    }

    fn require_position(&self, id: &str) -> RepoResult<usize> {
        self.position(id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    fn commit(&mut self, next: Vec<Student>) -> RepoResult<()> {
        let result = self.store.save(&next);
        self.log_persist("roster_commit", next.len(), &result);
        result?;
        self.students = next;
        Ok(())
    }

    fn log_persist(&self, event: &str, count: usize, result: &RepoResult<()>) {
        match result {
            Ok(()) => debug!(
                "event={} module=service status=ok store={} count={}",
                event,
                self.store.location(),
                count
            ),
            Err(err) => error!(
                "event={} module=service status=error store={} error={}",
                event,
                self.store.location(),
                err
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StudentManager, StudentPatch, DEFAULT_TOP_N};
    use crate::model::student::Student;
    use crate::repo::memory_store::MemoryStore;

    fn student(id: &str, average: f64) -> Student {
        Student::with_grades(id, format!("Student {id}"), "10A", [("Math", average)]).unwrap()
    }

    #[test]
    fn patch_builder_collects_fields() {
        let patch = StudentPatch::new().name("Ani").grade("Math", 90.0);
        assert_eq!(patch.name.as_deref(), Some("Ani"));
        assert_eq!(patch.class_name, None);
        assert_eq!(patch.grades.unwrap().get("Math"), Some(&90.0));
        assert!(StudentPatch::new().is_empty());
    }

    #[test]
    fn top_n_defaults_and_truncates() {
        let mut manager = StudentManager::open(MemoryStore::new());
        for (id, avg) in [("a", 10.0), ("b", 20.0), ("c", 30.0), ("d", 40.0)] {
            manager.add(student(id, avg)).unwrap();
        }
        let top = manager.top_n(DEFAULT_TOP_N);
        let ids: Vec<_> = top.iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids, ["d", "c", "b"]);
        assert!(manager.top_n(0).is_empty());
        assert_eq!(manager.top_n(10).len(), 4);
    }

    #[test]
    fn every_successful_mutation_persists_once() {
        let mut manager = StudentManager::open(MemoryStore::new());
        manager.add(student("a", 80.0)).unwrap();
        manager
            .update("a", &StudentPatch::new().name("Ana").grade("Art", 70.0))
            .unwrap();
        manager.add_grade("a", "Music", 60.0).unwrap();
        manager.remove("a").unwrap();
        assert_eq!(manager.store().write_count(), 4);
    }
}
