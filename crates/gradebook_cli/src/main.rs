//! Command-line shell over `gradebook_core`.
//!
//! # Responsibility
//! - Map subcommands onto the roster operation surface.
//! - Resolve store/logging configuration from flags and environment.
//! - Keep all formatting here; the core only returns records.

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gradebook_core::{
    default_log_level, init_logging, render_student_block, JsonFileStore, Student,
    StudentManager, StudentPatch, DEFAULT_TOP_N,
};
use log::info;

#[derive(Parser)]
#[command(name = "gradebook", version, about = "Student roster and grade book")]
struct Cli {
    /// JSON file holding the roster
    #[arg(long, env = "GRADEBOOK_DATA_FILE", default_value = "students.json")]
    data_file: PathBuf,

    /// Absolute directory for rolling log files (logging is off when unset)
    #[arg(long, env = "GRADEBOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = "GRADEBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every student
    List,

    /// Show one student by ID
    Show { id: String },

    /// Add a new student
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long = "class")]
        class_name: String,
        /// Initial grade as SUBJECT=SCORE (repeatable)
        #[arg(long = "grade", value_parser = parse_grade)]
        grades: Vec<(String, f64)>,
    },

    /// Update name, class and/or grades of a student
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "class")]
        class_name: Option<String>,
        /// Grade to insert or replace as SUBJECT=SCORE (repeatable)
        #[arg(long = "grade", value_parser = parse_grade)]
        grades: Vec<(String, f64)>,
    },

    /// Remove a student
    Remove { id: String },

    /// Add or replace one grade
    Grade {
        id: String,
        subject: String,
        score: f64,
    },

    /// Show the best students by average
    Top {
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        n: usize,
    },

    /// Show students of one class (exact match)
    Filter { class_name: String },

    /// Write the text report to a file
    Export { path: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }
    info!(
        "event=cli_start module=cli status=ok data_file={}",
        cli.data_file.display()
    );

    let mut manager = StudentManager::open(JsonFileStore::new(&cli.data_file));

    match cli.command {
        Commands::List => {
            let students = manager.list_all();
            if students.is_empty() {
                println!("Belum ada data siswa.");
            } else {
                println!("=== DAFTAR SISWA ===");
                print_students(&students);
            }
        }
        Commands::Show { id } => match manager.find(id.trim()) {
            Some(student) => print_students(&[student]),
            None => bail!("Siswa tidak ditemukan: {}", id.trim()),
        },
        Commands::Add {
            id,
            name,
            class_name,
            grades,
        } => {
            let student = Student::with_grades(id.trim(), name, class_name, grades)
                .context("invalid student")?;
            manager.add(student).context("failed to add student")?;
            println!("Siswa berhasil ditambahkan.");
        }
        Commands::Update {
            id,
            name,
            class_name,
            grades,
        } => {
            let patch = StudentPatch {
                name,
                class_name,
                grades: (!grades.is_empty()).then(|| grades.into_iter().collect()),
            };
            if patch.is_empty() {
                bail!("nothing to update; pass --name, --class or --grade");
            }
            let updated = manager
                .update(id.trim(), &patch)
                .context("failed to update student")?;
            println!("Data siswa berhasil diupdate.");
            print_students(&[updated]);
        }
        Commands::Remove { id } => {
            manager
                .remove(id.trim())
                .context("failed to remove student")?;
            println!("Siswa berhasil dihapus.");
        }
        Commands::Grade { id, subject, score } => {
            manager
                .add_grade(id.trim(), &subject, score)
                .context("failed to add grade")?;
            println!("Nilai berhasil ditambahkan.");
        }
        Commands::Top { n } => {
            let top = manager.top_n(n);
            println!("=== TOP {n} SISWA ===");
            if top.is_empty() {
                println!("Belum ada data siswa");
            } else {
                print_students(&top);
            }
        }
        Commands::Filter { class_name } => {
            let students = manager.filter_by_class(&class_name);
            if students.is_empty() {
                println!("Tidak ada siswa di kelas {class_name}");
            } else {
                println!("== Daftar siswa di kelas {class_name} ==");
                print_students(&students);
            }
        }
        Commands::Export { path } => {
            manager
                .export_report(&path)
                .context("failed to export report")?;
            println!("Laporan berhasil diexport ke {}", path.display());
        }
    }

    Ok(())
}

fn print_students(students: &[Student]) {
    for student in students {
        for line in render_student_block(student) {
            println!("{line}");
        }
    }
}

/// Parses `SUBJECT=SCORE`. Range checks are left to the core.
fn parse_grade(raw: &str) -> Result<(String, f64), String> {
    let (subject, score) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SUBJECT=SCORE, got `{raw}`"))?;
    let score = score
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("score for `{}` is not a number", subject.trim()))?;
    Ok((subject.trim().to_string(), score))
}

#[cfg(test)]
mod tests {
    use super::parse_grade;

    #[test]
    fn parse_grade_splits_subject_and_score() {
        assert_eq!(parse_grade(" Math = 87.5").unwrap(), ("Math".to_string(), 87.5));
        assert!(parse_grade("Math").is_err());
        assert!(parse_grade("Math=abc").is_err());
    }
}
