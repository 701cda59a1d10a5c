//! The `bokigrade list` command.

use std::path::PathBuf;

use anyhow::Result;

use bokigrade_core::catalog::ExamCatalog;

pub fn execute(exams_dir: PathBuf) -> Result<()> {
    use comfy_table::{Cell, Table};

    let catalog = ExamCatalog::load_dir(&exams_dir)?;

    if catalog.is_empty() {
        println!("No exams found in {}", exams_dir.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Title", "Questions", "Points", "Time limit"]);
    for exam in catalog.iter() {
        table.add_row(vec![
            Cell::new(&exam.id),
            Cell::new(&exam.title),
            Cell::new(exam.questions.len()),
            Cell::new(exam.max_points()),
            Cell::new(format!("{} min", exam.time_limit_minutes)),
        ]);
    }
    println!("{table}");
    println!("{} exam(s)", catalog.len());

    Ok(())
}
