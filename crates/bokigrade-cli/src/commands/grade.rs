//! The `bokigrade grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use bokigrade_core::grader::evaluate;
use bokigrade_core::model::SubmittedAnswers;
use bokigrade_core::parser::parse_exam;
use bokigrade_core::report::GradeReport;

pub fn execute(
    exam_path: PathBuf,
    answers_path: PathBuf,
    pass_mark: u32,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let exam = parse_exam(&exam_path)?;

    let answers_content = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers file: {}", answers_path.display()))?;
    let answers: SubmittedAnswers = serde_json::from_str(&answers_content)
        .with_context(|| format!("failed to parse answers JSON: {}", answers_path.display()))?;

    let result = evaluate(&exam, &answers);
    let report = GradeReport::new(&exam, &result);

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "markdown" | "md" => {
            println!("{}", report.to_markdown(pass_mark));
        }
        _ => {
            print_breakdown(&report, pass_mark);
        }
    }

    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report written to {}", path.display());
    }

    Ok(())
}

fn print_breakdown(report: &GradeReport, pass_mark: u32) {
    use comfy_table::{Cell, Table};

    println!("{}", report.exam_title);

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Points", "Awarded"]);
    for q in &report.questions {
        table.add_row(vec![
            Cell::new(q.index + 1),
            Cell::new(q.kind),
            Cell::new(q.points),
            Cell::new(format!("{:.1}", q.awarded)),
        ]);
    }
    println!("{table}");

    println!(
        "Total: {}/{} — {} (pass mark: {pass_mark})",
        report.total_score,
        report.max_score,
        if report.passed(pass_mark) {
            "PASS"
        } else {
            "FAIL"
        }
    );
}
