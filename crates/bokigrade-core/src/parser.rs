//! TOML exam definition parser.
//!
//! Loads authored exams from TOML files and directories, and validates them
//! for the authoring inconsistencies the grader deliberately does not mask.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Exam, JournalEntry, Materials, Question};

/// Intermediate TOML structure for parsing exam files.
#[derive(Debug, Deserialize)]
struct TomlExamFile {
    exam: TomlExamHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlExamHeader {
    id: String,
    title: String,
    time_limit_minutes: u32,
}

/// One question as authored. Flat on purpose: which fields are required
/// depends on `type`, checked during conversion so the author gets a
/// message naming the field instead of a serde enum error.
#[derive(Debug, Deserialize)]
struct TomlQuestion {
    #[serde(rename = "type")]
    kind: String,
    points: f64,
    #[serde(default)]
    expected_entries: Vec<TomlJournalEntry>,
    #[serde(default)]
    allowed_accounts: Vec<String>,
    #[serde(default)]
    expected_summary: Option<String>,
    #[serde(default)]
    expected_amounts: Option<Vec<f64>>,
    #[serde(default)]
    materials: Option<TomlMaterials>,
    #[serde(default)]
    expected_cogs: Option<f64>,
    #[serde(default)]
    expected_gross_profit: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TomlJournalEntry {
    debit_account: String,
    debit_amount: f64,
    credit_account: String,
    credit_amount: f64,
}

#[derive(Debug, Deserialize)]
struct TomlMaterials {
    begin_inventory: f64,
    purchases: f64,
    ending_inventory: f64,
}

/// Parse a single TOML file into an [`Exam`].
pub fn parse_exam(path: &Path) -> Result<Exam> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam file: {}", path.display()))?;

    parse_exam_str(&content, path)
}

/// Parse a TOML string into an [`Exam`] (useful for testing).
pub fn parse_exam_str(content: &str, source_path: &Path) -> Result<Exam> {
    let parsed: TomlExamFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(index, q)| {
            convert_question(q).with_context(|| {
                format!(
                    "invalid question {} in {}",
                    index + 1,
                    source_path.display()
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Exam {
        id: parsed.exam.id,
        title: parsed.exam.title,
        time_limit_minutes: parsed.exam.time_limit_minutes,
        questions,
    })
}

fn convert_question(q: TomlQuestion) -> Result<Question> {
    match q.kind.as_str() {
        "journal" => Ok(Question::Journal {
            points: q.points,
            expected_entries: q
                .expected_entries
                .into_iter()
                .map(|e| JournalEntry {
                    debit_account: e.debit_account,
                    debit_amount: e.debit_amount,
                    credit_account: e.credit_account,
                    credit_amount: e.credit_amount,
                })
                .collect(),
            allowed_accounts: q.allowed_accounts,
        }),
        "posting" => Ok(Question::Posting {
            points: q.points,
            expected_summary: q
                .expected_summary
                .context("posting question requires expected_summary")?,
            expected_amounts: q
                .expected_amounts
                .context("posting question requires expected_amounts")?,
        }),
        "pnl_balance" => {
            let materials = q
                .materials
                .context("pnl_balance question requires materials")?;
            Ok(Question::PnlBalance {
                points: q.points,
                materials: Materials {
                    begin_inventory: materials.begin_inventory,
                    purchases: materials.purchases,
                    ending_inventory: materials.ending_inventory,
                },
                expected_cogs: q
                    .expected_cogs
                    .context("pnl_balance question requires expected_cogs")?,
                expected_gross_profit: q
                    .expected_gross_profit
                    .context("pnl_balance question requires expected_gross_profit")?,
            })
        }
        other => anyhow::bail!("unknown question type: {other}"),
    }
}

/// Recursively load all `.toml` exam files from a directory.
///
/// Files that fail to parse are skipped with a warning rather than failing
/// the whole load, so one broken authored file cannot take down the catalog.
pub fn load_exam_directory(dir: &Path) -> Result<Vec<Exam>> {
    let mut exams = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            exams.extend(load_exam_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_exam(&path) {
                Ok(exam) => exams.push(exam),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(exams)
}

/// A warning from exam validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Index of the offending question (if applicable).
    pub question_index: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate an exam for authoring inconsistencies.
///
/// The grader is total and grades whatever it is given; every defect below
/// is an authoring concern surfaced here instead of being masked at grading
/// time.
pub fn validate_exam(exam: &Exam) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if exam.time_limit_minutes == 0 {
        warnings.push(ValidationWarning {
            question_index: None,
            message: "time_limit_minutes must be greater than zero".into(),
        });
    }

    if exam.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_index: None,
            message: "exam has no questions".into(),
        });
    } else if exam.max_points() != 100.0 {
        // Not clamped at grading time, so surface it to the author.
        warnings.push(ValidationWarning {
            question_index: None,
            message: format!(
                "question points sum to {}, expected 100",
                exam.max_points()
            ),
        });
    }

    for (index, question) in exam.questions.iter().enumerate() {
        if question.points() < 0.0 {
            warnings.push(ValidationWarning {
                question_index: Some(index),
                message: format!("negative points: {}", question.points()),
            });
        }

        match question {
            Question::Journal {
                expected_entries,
                allowed_accounts,
                ..
            } => {
                if expected_entries.is_empty() {
                    warnings.push(ValidationWarning {
                        question_index: Some(index),
                        message: "journal question has no expected entries".into(),
                    });
                }
                if !allowed_accounts.is_empty() {
                    for entry in expected_entries {
                        for account in [&entry.debit_account, &entry.credit_account] {
                            if !allowed_accounts.contains(account) {
                                warnings.push(ValidationWarning {
                                    question_index: Some(index),
                                    message: format!(
                                        "expected entry uses account '{account}' \
                                         not in allowed_accounts"
                                    ),
                                });
                            }
                        }
                    }
                }
            }
            Question::Posting {
                expected_summary,
                expected_amounts,
                ..
            } => {
                if expected_summary.chars().count() < 5 {
                    warnings.push(ValidationWarning {
                        question_index: Some(index),
                        message: format!(
                            "expected_summary '{expected_summary}' is shorter than the \
                             5-character prefix used for summary credit"
                        ),
                    });
                }
                if expected_amounts.is_empty() {
                    warnings.push(ValidationWarning {
                        question_index: Some(index),
                        message: "posting question has no expected amounts".into(),
                    });
                }
            }
            Question::PnlBalance {
                materials,
                expected_cogs,
                ..
            } => {
                if *expected_cogs != materials.cogs() {
                    warnings.push(ValidationWarning {
                        question_index: Some(index),
                        message: format!(
                            "stored expected_cogs {} disagrees with the value {} \
                             recomputed from materials; grading uses the recomputed value",
                            expected_cogs,
                            materials.cogs()
                        ),
                    });
                }
            }
        }
    }

    warnings
}
