//! The `bokigrade validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(exam_path: PathBuf) -> Result<()> {
    let exams = if exam_path.is_dir() {
        bokigrade_core::parser::load_exam_directory(&exam_path)?
    } else {
        vec![bokigrade_core::parser::parse_exam(&exam_path)?]
    };

    let mut total_warnings = 0;

    for exam in &exams {
        println!(
            "Exam: {} ({} questions, {} points)",
            exam.title,
            exam.questions.len(),
            exam.max_points()
        );

        let warnings = bokigrade_core::parser::validate_exam(exam);
        for w in &warnings {
            let prefix = w
                .question_index
                .map(|i| format!("  [question {}]", i + 1))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All exams valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
