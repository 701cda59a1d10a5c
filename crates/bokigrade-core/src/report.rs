//! Grade report types with JSON persistence.
//!
//! A [`GradeReport`] wraps one grading outcome with enough metadata to be
//! read on its own later. Pass/fail is a presentation policy, not a grading
//! rule, so the threshold lives here and is taken as a parameter.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grader::ScoreResult;
use crate::model::{Exam, QuestionKind};

/// Score required to pass, out of 100.
pub const DEFAULT_PASS_MARK: u32 = 70;

/// One graded submission, ready for presentation or persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Id of the graded exam.
    pub exam_id: String,
    /// Title of the graded exam.
    pub exam_title: String,
    /// Rounded aggregate score.
    pub total_score: u32,
    /// Maximum achievable score (rounded sum of question points).
    pub max_score: u32,
    /// Per-question breakdown, in question order.
    pub questions: Vec<QuestionScore>,
}

/// Breakdown line for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionScore {
    /// Position in the exam's question list.
    pub index: usize,
    /// The question's kind tag.
    pub kind: QuestionKind,
    /// Maximum credit for this question.
    pub points: f64,
    /// Unrounded credit awarded.
    pub awarded: f64,
}

impl GradeReport {
    /// Assemble a report from an exam and its grading outcome.
    pub fn new(exam: &Exam, result: &ScoreResult) -> Self {
        let questions = exam
            .questions
            .iter()
            .enumerate()
            .map(|(index, q)| QuestionScore {
                index,
                kind: q.kind(),
                points: q.points(),
                awarded: result.per_question.get(&index).copied().unwrap_or(0.0),
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            exam_id: exam.id.clone(),
            exam_title: exam.title.clone(),
            total_score: result.total_score,
            max_score: exam.max_points().round() as u32,
            questions,
        }
    }

    /// Whether the score meets the given pass mark.
    pub fn passed(&self, pass_mark: u32) -> bool {
        self.total_score >= pass_mark
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradeReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as a markdown result sheet.
    pub fn to_markdown(&self, pass_mark: u32) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {}\n\n", self.exam_title));
        md.push_str(&format!(
            "**Score:** {}/{} — **{}** (pass mark: {})\n\n",
            self.total_score,
            self.max_score,
            if self.passed(pass_mark) {
                "PASS"
            } else {
                "FAIL"
            },
            pass_mark
        ));

        md.push_str("| # | Question | Points | Awarded |\n");
        md.push_str("|---|----------|--------|---------|\n");
        for q in &self.questions {
            md.push_str(&format!(
                "| {} | {} | {} | {:.1} |\n",
                q.index + 1,
                q.kind,
                q.points,
                q.awarded
            ));
        }

        md
    }
}
