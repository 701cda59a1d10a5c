//! The answer evaluator: deterministic scoring of a learner submission
//! against an authored exam.
//!
//! `evaluate` is a total, pure function. It never fails: unparseable numeric
//! text compares as `0` and simply scores as incorrect, missing rows are
//! incorrect rather than fatal, and the worst possible outcome is a score
//! of zero. Amount comparisons use exact floating-point equality, matching
//! the authored exam data; no tolerance is applied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{
    Exam, JournalEntry, JournalRow, Materials, PnlAnswer, PostingAnswer, Question,
    SubmittedAnswers,
};

/// Number of leading characters of the expected summary used for the loose
/// posting-summary match.
const SUMMARY_PREFIX_CHARS: usize = 5;

/// Share of a posting question's points granted for the summary text, the
/// remainder being split evenly across the expected amounts.
const POSTING_QUALITATIVE_SHARE: f64 = 0.5;

/// The outcome of grading one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Aggregate score, rounded to the nearest integer at the very end.
    /// Not re-clamped to 100: if the exam's question points sum past 100,
    /// that is an authoring inconsistency surfaced by validation, not
    /// something the grader masks.
    pub total_score: u32,
    /// Unrounded contribution per question index.
    pub per_question: BTreeMap<usize, f64>,
}

/// Grade a submission against an exam.
///
/// Each question is scored with its variant's comparison rules and weighted
/// by its own `points`; contributions stay unrounded until the final sum.
/// Inputs are borrowed and never mutated, and identical inputs always
/// produce an identical result.
pub fn evaluate(exam: &Exam, answers: &SubmittedAnswers) -> ScoreResult {
    let mut per_question = BTreeMap::new();
    let mut total = 0.0;

    for (index, question) in exam.questions.iter().enumerate() {
        let awarded = match question {
            Question::Journal {
                points,
                expected_entries,
                ..
            } => score_journal(*points, expected_entries, &answers.journal_rows),
            Question::Posting {
                points,
                expected_summary,
                expected_amounts,
            } => score_posting(*points, expected_summary, expected_amounts, &answers.posting),
            Question::PnlBalance {
                points,
                materials,
                expected_gross_profit,
                ..
            } => score_pnl_balance(*points, materials, *expected_gross_profit, &answers.pnl),
        };
        per_question.insert(index, awarded);
        total += awarded;
    }

    ScoreResult {
        total_score: total.round() as u32,
        per_question,
    }
}

/// Parse a submitted amount. Anything that is not a complete number after
/// trimming compares as `0`, so it can never match a nonzero target.
fn parse_amount(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

/// Journal rows are matched positionally: the submitted row at index `i` is
/// compared against the expected entry at index `i`, all four fields exact.
/// Missing rows count as incorrect. Credit is `points * correct / expected`.
fn score_journal(points: f64, expected: &[JournalEntry], rows: &[JournalRow]) -> f64 {
    if expected.is_empty() {
        return 0.0;
    }

    // Extra submitted rows beyond the expected list are ignored.
    let correct = expected
        .iter()
        .enumerate()
        .filter(|(i, entry)| rows.get(*i).is_some_and(|row| row_matches(entry, row)))
        .count();

    points * correct as f64 / expected.len() as f64
}

fn row_matches(expected: &JournalEntry, row: &JournalRow) -> bool {
    row.debit_account == expected.debit_account
        && parse_amount(&row.debit_amount) == expected.debit_amount
        && row.credit_account == expected.credit_account
        && parse_amount(&row.credit_amount) == expected.credit_amount
}

/// Posting questions split their points 50% qualitative / 50% quantitative.
///
/// Qualitative: the submitted summary earns its half if it contains, case-
/// insensitively, the first [`SUMMARY_PREFIX_CHARS`] characters of the
/// expected summary. This is a deliberately loose prefix heuristic carried
/// over from the authored grading rules; see DESIGN.md before changing it.
///
/// Quantitative: each expected amount position that matches exactly earns an
/// even share of the other half. The question's total is capped at `points`.
fn score_posting(
    points: f64,
    expected_summary: &str,
    expected_amounts: &[f64],
    answer: &PostingAnswer,
) -> f64 {
    let qualitative = points * POSTING_QUALITATIVE_SHARE;
    let quantitative = points - qualitative;

    let mut score = 0.0;

    if summary_matches(expected_summary, &answer.summary) {
        score += qualitative;
    }

    if !expected_amounts.is_empty() {
        let per_amount = quantitative / expected_amounts.len() as f64;
        for (i, expected) in expected_amounts.iter().enumerate() {
            let submitted = answer.amounts.get(i).map_or(0.0, |raw| parse_amount(raw));
            if submitted == *expected {
                score += per_amount;
            }
        }
    }

    score.min(points)
}

fn summary_matches(expected: &str, submitted: &str) -> bool {
    let prefix: String = expected
        .to_lowercase()
        .chars()
        .take(SUMMARY_PREFIX_CHARS)
        .collect();
    submitted.to_lowercase().contains(&prefix)
}

/// P&L questions have two independently graded halves: COGS and gross
/// profit, each worth half the points on exact equality.
///
/// The COGS target is always recomputed from `materials` rather than read
/// from the stored `expected_cogs`, so a stale authored value can never
/// change what counts as correct. Gross profit is compared as stored.
fn score_pnl_balance(
    points: f64,
    materials: &Materials,
    expected_gross_profit: f64,
    answer: &PnlAnswer,
) -> f64 {
    let half = points / 2.0;
    let mut score = 0.0;

    if parse_amount(&answer.cogs) == materials.cogs() {
        score += half;
    }
    if parse_amount(&answer.gross_profit) == expected_gross_profit {
        score += half;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn journal_question(points: f64, entries: Vec<JournalEntry>) -> Question {
        Question::Journal {
            points,
            expected_entries: entries,
            allowed_accounts: vec![],
        }
    }

    fn entry(debit: &str, debit_amount: f64, credit: &str, credit_amount: f64) -> JournalEntry {
        JournalEntry {
            debit_account: debit.into(),
            debit_amount,
            credit_account: credit.into(),
            credit_amount,
        }
    }

    fn row(debit: &str, debit_amount: &str, credit: &str, credit_amount: &str) -> JournalRow {
        JournalRow {
            debit_account: debit.into(),
            debit_amount: debit_amount.into(),
            credit_account: credit.into(),
            credit_amount: credit_amount.into(),
        }
    }

    /// The lesson-1 exam from the course catalog: 45/20/35 points.
    fn sample_exam() -> Exam {
        Exam {
            id: "boki3-bai-1".into(),
            title: "Bài 1: Định khoản cơ bản".into(),
            time_limit_minutes: 60,
            questions: vec![
                journal_question(
                    45.0,
                    vec![entry(
                        "Tiền mặt (Cash)",
                        1_000_000.0,
                        "Doanh thu (Sales)",
                        1_000_000.0,
                    )],
                ),
                Question::Posting {
                    points: 20.0,
                    expected_summary: "Ghi sổ doanh thu tháng 1".into(),
                    expected_amounts: vec![1_000_000.0],
                },
                Question::PnlBalance {
                    points: 35.0,
                    materials: Materials {
                        begin_inventory: 0.0,
                        purchases: 800_000.0,
                        ending_inventory: 200_000.0,
                    },
                    expected_cogs: 600_000.0,
                    expected_gross_profit: 900_000.0,
                },
            ],
        }
    }

    fn perfect_answers() -> SubmittedAnswers {
        SubmittedAnswers {
            journal_rows: vec![row(
                "Tiền mặt (Cash)",
                "1000000",
                "Doanh thu (Sales)",
                "1000000",
            )],
            posting: PostingAnswer {
                summary: "Ghi sổ doanh thu tháng 1".into(),
                amounts: vec!["1000000".into()],
            },
            pnl: PnlAnswer {
                cogs: "600000".into(),
                gross_profit: "900000".into(),
            },
        }
    }

    #[test]
    fn blank_submission_scores_zero() {
        let result = evaluate(&sample_exam(), &SubmittedAnswers::default());
        assert_eq!(result.total_score, 0);
        assert!(result.per_question.values().all(|&v| v == 0.0));
    }

    #[test]
    fn perfect_submission_scores_full_points() {
        let result = evaluate(&sample_exam(), &perfect_answers());
        assert_eq!(result.total_score, 100);
        assert_eq!(result.per_question[&0], 45.0);
        assert_eq!(result.per_question[&1], 20.0);
        assert_eq!(result.per_question[&2], 35.0);
    }

    #[test]
    fn repeated_evaluation_is_deterministic() {
        let exam = sample_exam();
        let answers = perfect_answers();
        let first = evaluate(&exam, &answers);
        for _ in 0..10 {
            assert_eq!(evaluate(&exam, &answers), first);
        }
    }

    #[test]
    fn journal_partial_credit_is_per_row_and_unrounded() {
        let exam = Exam {
            id: "partial".into(),
            title: "Partial".into(),
            time_limit_minutes: 60,
            questions: vec![journal_question(
                45.0,
                vec![
                    entry("Tiền mặt (Cash)", 100.0, "Doanh thu (Sales)", 100.0),
                    entry("Tiền mặt (Cash)", 200.0, "Doanh thu (Sales)", 200.0),
                    entry("Tiền mặt (Cash)", 300.0, "Doanh thu (Sales)", 300.0),
                    entry("Tiền mặt (Cash)", 400.0, "Doanh thu (Sales)", 400.0),
                ],
            )],
        };
        let answers = SubmittedAnswers {
            journal_rows: vec![
                row("Tiền mặt (Cash)", "100", "Doanh thu (Sales)", "100"),
                row("Tiền mặt (Cash)", "200", "Doanh thu (Sales)", "200"),
                row("", "", "", ""),
                row("Tiền mặt (Cash)", "999", "Doanh thu (Sales)", "400"),
            ],
            ..Default::default()
        };
        let result = evaluate(&exam, &answers);
        // 45 * 2/4 = 22.5, kept unrounded per question, rounded once at the end.
        assert_eq!(result.per_question[&0], 22.5);
        assert_eq!(result.total_score, 23);
    }

    #[test]
    fn journal_matching_is_positional_not_set_based() {
        let expected = vec![
            entry("Tiền mặt (Cash)", 100.0, "Doanh thu (Sales)", 100.0),
            entry("Hàng tồn kho (Inventory)", 200.0, "Tiền mặt (Cash)", 200.0),
        ];
        let exam = Exam {
            id: "swap".into(),
            title: "Swap".into(),
            time_limit_minutes: 60,
            questions: vec![journal_question(50.0, expected)],
        };
        // Both rows correct in content but swapped in order.
        let answers = SubmittedAnswers {
            journal_rows: vec![
                row("Hàng tồn kho (Inventory)", "200", "Tiền mặt (Cash)", "200"),
                row("Tiền mặt (Cash)", "100", "Doanh thu (Sales)", "100"),
            ],
            ..Default::default()
        };
        let result = evaluate(&exam, &answers);
        assert_eq!(result.per_question[&0], 0.0);
    }

    #[test]
    fn fewer_submitted_rows_than_expected_is_not_an_error() {
        let exam = Exam {
            id: "ragged".into(),
            title: "Ragged".into(),
            time_limit_minutes: 60,
            questions: vec![journal_question(
                40.0,
                vec![
                    entry("Tiền mặt (Cash)", 100.0, "Doanh thu (Sales)", 100.0),
                    entry("Tiền mặt (Cash)", 200.0, "Doanh thu (Sales)", 200.0),
                ],
            )],
        };
        let answers = SubmittedAnswers {
            journal_rows: vec![row("Tiền mặt (Cash)", "100", "Doanh thu (Sales)", "100")],
            ..Default::default()
        };
        let result = evaluate(&exam, &answers);
        assert_eq!(result.per_question[&0], 20.0);
    }

    #[test]
    fn unparseable_amount_never_matches_nonzero_and_never_panics() {
        let exam = Exam {
            id: "garbled".into(),
            title: "Garbled".into(),
            time_limit_minutes: 60,
            questions: vec![journal_question(
                45.0,
                vec![entry("Tiền mặt (Cash)", 100.0, "Doanh thu (Sales)", 100.0)],
            )],
        };
        let answers = SubmittedAnswers {
            journal_rows: vec![row("Tiền mặt (Cash)", "abc", "Doanh thu (Sales)", "100")],
            ..Default::default()
        };
        assert_eq!(evaluate(&exam, &answers).total_score, 0);
    }

    #[test]
    fn unparseable_amount_matches_an_expected_zero() {
        // Failed parses compare as 0, so an expected amount of 0 matches.
        let exam = Exam {
            id: "zero".into(),
            title: "Zero".into(),
            time_limit_minutes: 60,
            questions: vec![journal_question(
                10.0,
                vec![entry("Tiền mặt (Cash)", 0.0, "Doanh thu (Sales)", 0.0)],
            )],
        };
        let answers = SubmittedAnswers {
            journal_rows: vec![row("Tiền mặt (Cash)", "", "Doanh thu (Sales)", "n/a")],
            ..Default::default()
        };
        assert_eq!(evaluate(&exam, &answers).total_score, 10);
    }

    #[test]
    fn posting_summary_prefix_heuristic_is_loose() {
        // Same first five characters "ghi s", case-insensitive, rest differs.
        let exam = Exam {
            id: "prefix".into(),
            title: "Prefix".into(),
            time_limit_minutes: 60,
            questions: vec![Question::Posting {
                points: 20.0,
                expected_summary: "Ghi sổ doanh thu tháng 1".into(),
                expected_amounts: vec![1_000_000.0],
            }],
        };
        let answers = SubmittedAnswers {
            posting: PostingAnswer {
                summary: "ghi sổ doanh thu của công ty".into(),
                amounts: vec![],
            },
            ..Default::default()
        };
        let result = evaluate(&exam, &answers);
        assert_eq!(result.per_question[&0], 10.0);
    }

    #[test]
    fn posting_summary_without_prefix_earns_nothing() {
        let exam = Exam {
            id: "noprefix".into(),
            title: "No prefix".into(),
            time_limit_minutes: 60,
            questions: vec![Question::Posting {
                points: 20.0,
                expected_summary: "Ghi sổ doanh thu tháng 1".into(),
                expected_amounts: vec![],
            }],
        };
        let answers = SubmittedAnswers {
            posting: PostingAnswer {
                summary: "Bút toán doanh thu".into(),
                amounts: vec![],
            },
            ..Default::default()
        };
        assert_eq!(evaluate(&exam, &answers).total_score, 0);
    }

    #[test]
    fn posting_amounts_split_evenly_and_match_positionally() {
        let exam = Exam {
            id: "amounts".into(),
            title: "Amounts".into(),
            time_limit_minutes: 60,
            questions: vec![Question::Posting {
                points: 20.0,
                expected_summary: "Trả nợ và lãi vay".into(),
                expected_amounts: vec![100_000.0, 1_000_000.0],
            }],
        };
        let answers = SubmittedAnswers {
            posting: PostingAnswer {
                summary: String::new(),
                // First amount right, second wrong: half the quantitative share.
                amounts: vec!["100000".into(), "999".into()],
            },
            ..Default::default()
        };
        let result = evaluate(&exam, &answers);
        assert_eq!(result.per_question[&0], 5.0);
    }

    #[test]
    fn posting_contribution_is_capped_at_points() {
        let exam = Exam {
            id: "cap".into(),
            title: "Cap".into(),
            time_limit_minutes: 60,
            questions: vec![Question::Posting {
                points: 20.0,
                expected_summary: "Ghi sổ doanh thu".into(),
                expected_amounts: vec![1_000_000.0],
            }],
        };
        let answers = SubmittedAnswers {
            posting: PostingAnswer {
                summary: "Ghi sổ doanh thu".into(),
                amounts: vec!["1000000".into()],
            },
            ..Default::default()
        };
        let result = evaluate(&exam, &answers);
        assert!(result.per_question[&0] <= 20.0);
        assert_eq!(result.total_score, 20);
    }

    #[test]
    fn pnl_cogs_target_is_recomputed_from_materials() {
        // Stored expected_cogs deliberately disagrees with the materials.
        let exam = Exam {
            id: "stale".into(),
            title: "Stale COGS".into(),
            time_limit_minutes: 60,
            questions: vec![Question::PnlBalance {
                points: 35.0,
                materials: Materials {
                    begin_inventory: 0.0,
                    purchases: 800_000.0,
                    ending_inventory: 200_000.0,
                },
                expected_cogs: 123_456.0,
                expected_gross_profit: 900_000.0,
            }],
        };
        let answers = SubmittedAnswers {
            pnl: PnlAnswer {
                cogs: "600000".into(),
                gross_profit: String::new(),
            },
            ..Default::default()
        };
        let result = evaluate(&exam, &answers);
        assert_eq!(result.per_question[&0], 17.5);
        assert_eq!(result.total_score, 18);
    }

    #[test]
    fn pnl_gross_profit_uses_the_stored_value() {
        let exam = Exam {
            id: "gross".into(),
            title: "Gross".into(),
            time_limit_minutes: 60,
            questions: vec![Question::PnlBalance {
                points: 35.0,
                materials: Materials {
                    begin_inventory: 200_000.0,
                    purchases: 1_000_000.0,
                    ending_inventory: 300_000.0,
                },
                expected_cogs: 900_000.0,
                expected_gross_profit: 100_000.0,
            }],
        };
        let answers = SubmittedAnswers {
            pnl: PnlAnswer {
                cogs: "900000".into(),
                gross_profit: "100000".into(),
            },
            ..Default::default()
        };
        assert_eq!(evaluate(&exam, &answers).total_score, 35);
    }

    #[test]
    fn empty_question_list_grades_zero() {
        let exam = Exam {
            id: "empty".into(),
            title: "Empty".into(),
            time_limit_minutes: 60,
            questions: vec![],
        };
        let result = evaluate(&exam, &perfect_answers());
        assert_eq!(result.total_score, 0);
        assert!(result.per_question.is_empty());
    }

    #[test]
    fn journal_with_no_expected_entries_contributes_zero() {
        let exam = Exam {
            id: "noentries".into(),
            title: "No entries".into(),
            time_limit_minutes: 60,
            questions: vec![journal_question(45.0, vec![])],
        };
        let result = evaluate(&exam, &perfect_answers());
        assert_eq!(result.per_question[&0], 0.0);
    }

    #[test]
    fn total_is_not_clamped_when_points_exceed_100() {
        // Two full-credit questions summing past 100 surface as-is.
        let exam = Exam {
            id: "over".into(),
            title: "Over".into(),
            time_limit_minutes: 60,
            questions: vec![
                journal_question(
                    80.0,
                    vec![entry("Tiền mặt (Cash)", 100.0, "Doanh thu (Sales)", 100.0)],
                ),
                Question::Posting {
                    points: 40.0,
                    expected_summary: "Ghi sổ doanh thu".into(),
                    expected_amounts: vec![100.0],
                },
            ],
        };
        let answers = SubmittedAnswers {
            journal_rows: vec![row("Tiền mặt (Cash)", "100", "Doanh thu (Sales)", "100")],
            posting: PostingAnswer {
                summary: "Ghi sổ doanh thu".into(),
                amounts: vec!["100".into()],
            },
            ..Default::default()
        };
        assert_eq!(evaluate(&exam, &answers).total_score, 120);
    }

    #[test]
    fn parse_amount_accepts_decimals_and_whitespace() {
        assert_eq!(parse_amount(" 1000000 "), 1_000_000.0);
        assert_eq!(parse_amount("22.5"), 22.5);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("1,000"), 0.0);
    }

    #[test]
    fn sample_exam_kinds_cover_all_variants() {
        let kinds: Vec<QuestionKind> =
            sample_exam().questions.iter().map(|q| q.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                QuestionKind::Journal,
                QuestionKind::Posting,
                QuestionKind::PnlBalance
            ]
        );
    }
}
