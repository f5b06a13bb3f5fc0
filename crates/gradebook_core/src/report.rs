//! Plain-text roster report rendering.
//!
//! # Invariants
//! - Output is deterministic: roster order, then subjects in recorded order.
//! - Averages print with 2 decimals, halfway cases rounded away from zero.
//! - Lines are joined with `\n` and the report has no trailing newline.

use crate::model::student::Student;

/// Line printed when a student has no grades yet.
pub const NO_GRADES_PLACEHOLDER: &str = "  - (Belum ada nilai)";
/// Line closing every student block.
pub const BLOCK_SEPARATOR: &str = "------------------------";

/// Renders one student as report lines.
pub fn render_student_block(student: &Student) -> Vec<String> {
    let grades = student.grades();
    let mut lines = Vec::with_capacity(grades.len() + 7);
    lines.push(format!("ID: {}", student.id()));
    lines.push(format!("Nama: {}", student.name()));
    lines.push(format!("Kelas: {}", student.class_name()));
    lines.push("Mata Pelajaran:".to_string());
    if grades.is_empty() {
        lines.push(NO_GRADES_PLACEHOLDER.to_string());
    } else {
        for (subject, score) in &grades {
            lines.push(format!("  - {subject}: {score}"));
        }
    }
    lines.push(format!("Rata-rata: {}", format_average(student.average())));
    lines.push(format!("Status: {}", student.status().report_label()));
    lines.push(BLOCK_SEPARATOR.to_string());
    lines
}

/// Formats an average with 2 decimals, rounding `.xx5` ties up.
///
/// `{:.2}` alone rounds exact ties to even (`80.125` -> `80.12`).
pub fn format_average(average: f64) -> String {
    let rounded = (average * 100.0).round() / 100.0;
    format!("{rounded:.2}")
}

/// Renders every student, in order, as one report string.
pub fn render_report(students: &[Student]) -> String {
    students
        .iter()
        .flat_map(render_student_block)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{format_average, render_report, render_student_block, NO_GRADES_PLACEHOLDER};
    use crate::model::student::Student;

    #[test]
    fn block_without_grades_uses_placeholder() {
        let student = Student::new("1", "Ani", "10A").unwrap();
        let lines = render_student_block(&student);
        assert_eq!(lines[4], NO_GRADES_PLACEHOLDER);
        assert_eq!(lines[5], "Rata-rata: 0.00");
        assert_eq!(lines[6], "Status: Tidak Lulus");
    }

    #[test]
    fn scores_print_in_shortest_form_and_recorded_order() {
        let student =
            Student::with_grades("2", "Budi", "10B", [("Math", 90.0), ("Art", 87.5)]).unwrap();
        let report = render_report(&[student]);
        assert!(report.contains("  - Math: 90\n  - Art: 87.5\n"), "{report}");
        assert!(report.contains("Rata-rata: 88.75"));
    }

    #[test]
    fn overwritten_grade_keeps_its_position() {
        let mut student =
            Student::with_grades("3", "Citra", "10A", [("Math", 60.0), ("Art", 70.0)]).unwrap();
        student.add_grade("Math", 95.0).unwrap();
        student.add_grade("Music", 80.0).unwrap();

        let lines = render_student_block(&student);
        assert_eq!(lines[4..7], ["  - Math: 95", "  - Art: 70", "  - Music: 80"]);
    }

    #[test]
    fn halfway_average_rounds_up() {
        let student =
            Student::with_grades("4", "Dewi", "10A", [("Math", 80.25), ("Art", 80.0)]).unwrap();
        assert_eq!(student.average(), 80.125);
        assert!(render_report(&[student]).contains("Rata-rata: 80.13"));
        assert_eq!(format_average(0.0), "0.00");
        assert_eq!(format_average(74.994), "74.99");
        assert_eq!(format_average(100.0), "100.00");
    }

    #[test]
    fn empty_roster_renders_empty_report() {
        assert_eq!(render_report(&[]), "");
    }
}
