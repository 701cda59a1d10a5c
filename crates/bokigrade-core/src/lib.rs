//! bokigrade-core — Exam data model, answer evaluator, and grading reports.
//!
//! This crate defines the exam and submission data model, the pure grading
//! function, TOML exam parsing and validation, and the report types the
//! rest of the bokigrade system builds on.

pub mod catalog;
pub mod error;
pub mod grader;
pub mod model;
pub mod parser;
pub mod report;
