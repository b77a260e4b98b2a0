//! Relevance scoring and ranking of candidate records.

use crate::search::tokenize::Terms;
use crate::types::{CourseRecord, ScoredRecord};

/// Score contributed by a term found in the course title.
pub const TITLE_WEIGHT: u32 = 10;

/// Score contributed by a term found in the course description.
pub const DESCRIPTION_WEIGHT: u32 = 5;

/// Calculate the relevance of a record for the given terms.
///
/// Each term in the sequence contributes independently:
/// - [`TITLE_WEIGHT`] when its lower-cased form occurs in the lower-cased title
/// - [`DESCRIPTION_WEIGHT`] when it occurs in the lower-cased description
///
/// Presence counts once per term and field; repeated occurrences in the text do not.
/// A term repeated in the query is counted again.
pub fn score_record(record: &CourseRecord, terms: &Terms) -> u32 {
    let title = record.name.to_lowercase();
    let description = record.description.to_lowercase();

    terms
        .iter()
        .map(|term| {
            let term = term.to_lowercase();
            let mut score = 0;
            if title.contains(&term) {
                score += TITLE_WEIGHT;
            }
            if description.contains(&term) {
                score += DESCRIPTION_WEIGHT;
            }
            score
        })
        .sum()
}

/// Score, order and truncate candidates.
///
/// Inactive candidates are dropped even if the store returned them. Sorting is
/// descending by score and stable, so ties keep the store's return order.
/// At most `cap` records are returned.
pub fn rank(candidates: Vec<CourseRecord>, terms: &Terms, cap: usize) -> Vec<ScoredRecord> {
    let mut scored: Vec<ScoredRecord> = candidates
        .into_iter()
        .filter(CourseRecord::is_active)
        .map(|record| {
            let score = score_record(&record, terms);
            ScoredRecord { record, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(cap);
    scored
}
