//! Course records as they are stored, and their scored form after ranking.

use serde::{Deserialize, Serialize};

/// Activity flag value marking a course as retired. Retired courses never appear in results.
pub const RETIRED_FLAG: i64 = 10;

/// Activity flag value marking a course as active.
pub const ACTIVE_FLAG: i64 = 0;

/// Difficulty reported for records that carry none.
pub const DEFAULT_DIFFICULTY: &str = "intermediate";

/// A course record, using the record store's attribute names on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CourseRecord {
    #[serde(default)]
    pub id: String,
    /// Course title.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub url: String,
    /// Thumbnail image reference.
    #[serde(default)]
    pub image: String,
    /// Parent course id.
    #[serde(default, rename = "courseId")]
    pub course_id: String,
    /// Activity flag. `None` means the attribute is absent on the stored item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_flag: Option<i64>,
}

impl CourseRecord {
    /// Whether the record may appear in search results.
    ///
    /// A record is eligible when its flag is not [`RETIRED_FLAG`] and is either
    /// [`ACTIVE_FLAG`] or absent. Any other flag value is treated as inactive.
    pub fn is_active(&self) -> bool {
        match self.class_flag {
            None => true,
            Some(flag) => flag != RETIRED_FLAG && flag == ACTIVE_FLAG,
        }
    }

    /// Difficulty, falling back to [`DEFAULT_DIFFICULTY`].
    pub fn difficulty(&self) -> &str {
        self.difficulty.as_deref().unwrap_or(DEFAULT_DIFFICULTY)
    }
}

/// A course paired with its relevance score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredRecord {
    pub record: CourseRecord,
    pub score: u32,
}
