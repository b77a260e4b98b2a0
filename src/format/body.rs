//! Success and error body payloads.

use super::{CourseEntry, CourseView};
use crate::search::{SearchOutcome, Terms};
use serde::{Deserialize, Serialize};

/// Body of a successful search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBody {
    pub courses_found: usize,
    pub courses: Vec<CourseEntry>,
    pub search_terms: Vec<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traces: Option<Vec<String>>,
}

impl SearchBody {
    pub fn new(outcome: SearchOutcome, view: CourseView, include_traces: bool) -> Self {
        let courses: Vec<CourseEntry> = outcome.courses.iter().map(|c| view.entry(c)).collect();
        Self {
            courses_found: courses.len(),
            message: summary_message(&outcome.terms, courses.len()),
            courses,
            search_terms: outcome.terms.as_slice().to_vec(),
            traces: include_traces.then_some(outcome.trace),
        }
    }
}

/// Human-readable summary of a search.
pub fn summary_message(terms: &Terms, found: usize) -> String {
    if terms.is_empty() {
        return "No search terms were provided, so no courses were searched.".to_string();
    }
    let noun = if found == 1 { "course" } else { "courses" };
    format!("Found {} {} matching '{}'.", found, noun, terms.joined())
}

/// Body of any failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}
