//! Core data model types for bokigrade.
//!
//! These are the fundamental types the whole system uses to represent
//! authored exams, graded questions, and learner submissions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An authored exam: a time budget and an ordered list of graded questions.
///
/// Question order is significant for display only; grading is per-question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    /// Unique identifier for this exam.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Advisory time budget in minutes. Enforced by the submission surface
    /// (a countdown that forces early submission), never by the grader.
    pub time_limit_minutes: u32,
    /// The graded questions, in display order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Exam {
    /// Sum of the `points` weights across all questions.
    pub fn max_points(&self) -> f64 {
        self.questions.iter().map(|q| q.points()).sum()
    }
}

/// A graded question. The variant decides which comparison rules apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Question {
    /// Double-entry journal lines, graded row by row against expected entries.
    Journal {
        /// Maximum achievable credit for this question.
        points: f64,
        /// The correct entries, in the order the learner must supply them.
        expected_entries: Vec<JournalEntry>,
        /// Closed vocabulary of valid account names. Constrains the input
        /// form; the grader itself only compares strings.
        #[serde(default)]
        allowed_accounts: Vec<String>,
    },
    /// A transaction summary plus ledger amounts.
    Posting {
        points: f64,
        /// Expected summary text. Credit uses a loose prefix match, see the
        /// grader for the exact rule.
        expected_summary: String,
        /// Expected amounts, positionally matched.
        expected_amounts: Vec<f64>,
    },
    /// Cost of goods sold and gross profit from given inventory figures.
    PnlBalance {
        points: f64,
        /// Inventory figures the COGS target is derived from.
        materials: Materials,
        /// Authored COGS value. Kept for authoring reference; the grader
        /// always recomputes the target from `materials`.
        expected_cogs: f64,
        /// Expected gross profit, compared as stored.
        expected_gross_profit: f64,
    },
}

impl Question {
    /// Maximum achievable credit for this question.
    pub fn points(&self) -> f64 {
        match self {
            Question::Journal { points, .. }
            | Question::Posting { points, .. }
            | Question::PnlBalance { points, .. } => *points,
        }
    }

    /// The question's kind tag.
    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::Journal { .. } => QuestionKind::Journal,
            Question::Posting { .. } => QuestionKind::Posting,
            Question::PnlBalance { .. } => QuestionKind::PnlBalance,
        }
    }
}

/// One double-entry bookkeeping line.
///
/// Debit and credit amounts are compared independently; the domain does not
/// require them to be equal within a single line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub debit_account: String,
    pub debit_amount: f64,
    pub credit_account: String,
    pub credit_amount: f64,
}

/// Inventory figures given to the learner for a P&L question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Materials {
    pub begin_inventory: f64,
    pub purchases: f64,
    pub ending_inventory: f64,
}

impl Materials {
    /// Cost of goods sold: beginning inventory plus purchases minus ending
    /// inventory. This is the grading target for the COGS sub-answer.
    pub fn cogs(&self) -> f64 {
        self.begin_inventory + self.purchases - self.ending_inventory
    }
}

/// Question kind tags, mirroring the variants of [`Question`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Journal,
    Posting,
    PnlBalance,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Journal => write!(f, "journal"),
            QuestionKind::Posting => write!(f, "posting"),
            QuestionKind::PnlBalance => write!(f, "pnl_balance"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "journal" => Ok(QuestionKind::Journal),
            "posting" => Ok(QuestionKind::Posting),
            "pnl_balance" => Ok(QuestionKind::PnlBalance),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A learner's submission, mirroring the exam's question shapes.
///
/// Amounts are kept as the raw text the learner typed; the grader parses
/// them and treats anything unparseable as `0`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmittedAnswers {
    /// Journal rows, positionally matched against the expected entries.
    #[serde(default)]
    pub journal_rows: Vec<JournalRow>,
    /// Answer to the posting question.
    #[serde(default)]
    pub posting: PostingAnswer,
    /// Answer to the P&L question.
    #[serde(default)]
    pub pnl: PnlAnswer,
}

/// One submitted journal line, as typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalRow {
    #[serde(default)]
    pub debit_account: String,
    #[serde(default)]
    pub debit_amount: String,
    #[serde(default)]
    pub credit_account: String,
    #[serde(default)]
    pub credit_amount: String,
}

/// Submitted posting answer: free-text summary plus amounts as typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostingAnswer {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub amounts: Vec<String>,
}

/// Submitted P&L answer, both fields as typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PnlAnswer {
    #[serde(default)]
    pub cogs: String,
    #[serde(default)]
    pub gross_profit: String,
}
