//! Response body payloads.
//!
//! Bodies are JSON documents serialized to a string and carried inside the
//! envelope of whichever shape the event used.

mod body;
mod course;

pub use body::{ErrorBody, SearchBody, summary_message};
pub use course::{CourseEntry, FullCourse, PublicCourse, truncate_description};

/// How much of each course record a response exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseView {
    /// Every stored field plus `relevance_score`.
    Full,
    /// Public subset, description cut to `description_budget` characters.
    Public { description_budget: usize },
}

impl CourseView {
    pub fn entry(self, scored: &crate::types::ScoredRecord) -> CourseEntry {
        match self {
            Self::Full => CourseEntry::Full(FullCourse::from(scored)),
            Self::Public { description_budget } => {
                CourseEntry::Public(PublicCourse::new(&scored.record, description_budget))
            }
        }
    }
}
