//! formcraft-core — grading and analytics engine for FormCraft quiz forms.
//!
//! This crate defines the form/question data model, the submission
//! validator, the per-question graders, score aggregation, and the
//! analytics aggregator that the rest of the FormCraft system builds on.

pub mod analytics;
pub mod error;
pub mod grade;
pub mod model;
pub mod parser;
pub mod report;
pub mod response;
pub mod service;
pub mod submission;
pub mod traits;
pub mod validate;
