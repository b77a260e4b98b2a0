//! Per-course views.

use crate::types::{CourseRecord, ScoredRecord};
use serde::{Deserialize, Serialize};

/// Appended to descriptions cut by [`truncate_description`].
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CourseEntry {
    Full(FullCourse),
    Public(PublicCourse),
}

/// Stored record plus its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullCourse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub author: String,
    pub difficulty: String,
    pub url: String,
    pub image: String,
    #[serde(rename = "courseId")]
    pub course_id: String,
    pub relevance_score: u32,
}

impl From<&ScoredRecord> for FullCourse {
    fn from(scored: &ScoredRecord) -> Self {
        let record = &scored.record;
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            author: record.author.clone(),
            difficulty: record.difficulty().to_string(),
            url: record.url.clone(),
            image: record.image.clone(),
            course_id: record.course_id.clone(),
            relevance_score: scored.score,
        }
    }
}

/// Trimmed view for end users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCourse {
    pub title: String,
    pub description: String,
    pub url: String,
    pub author: String,
    pub difficulty: String,
}

impl PublicCourse {
    pub fn new(record: &CourseRecord, description_budget: usize) -> Self {
        Self {
            title: record.name.clone(),
            description: truncate_description(&record.description, description_budget),
            url: record.url.clone(),
            author: record.author.clone(),
            difficulty: record.difficulty().to_string(),
        }
    }
}

/// Keep at most `budget` characters, appending an ellipsis when anything was cut.
pub fn truncate_description(description: &str, budget: usize) -> String {
    match description.char_indices().nth(budget) {
        None => description.to_string(),
        Some((cut, _)) => format!("{}{}", &description[..cut], ELLIPSIS),
    }
}
