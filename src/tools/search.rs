//! Course search action handler.

use crate::error::ActionError;
use crate::event::{NamedValue, find_value};
use crate::format::{CourseView, SearchBody};
use crate::search::{SearchEngine, SearchQuery};

/// Function-call parameter holding pre-delimited search terms.
pub const SEARCH_TERMS_PARAM: &str = "search_terms";

/// Request-body property holding free-text query.
pub const QUERY_PROPERTY: &str = "query";

/// Difficulty facet, accepted in either shape.
pub const DIFFICULTY_PARAM: &str = "difficulty_level";

/// Search arguments extracted from an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Raw query text, `None` when the event carried none.
    pub query: Option<String>,
    pub difficulty: Option<String>,
}

impl SearchRequest {
    /// From function-call `parameters`.
    pub fn from_parameters(parameters: &[NamedValue]) -> Self {
        Self {
            query: find_value(parameters, SEARCH_TERMS_PARAM),
            difficulty: find_value(parameters, DIFFICULTY_PARAM),
        }
    }

    /// From API path request body `properties`.
    pub fn from_properties(properties: &[NamedValue]) -> Self {
        Self {
            query: find_value(properties, QUERY_PROPERTY),
            difficulty: find_value(properties, DIFFICULTY_PARAM),
        }
    }
}

/// Run the search and render the JSON body string.
pub async fn handle_search(
    engine: &SearchEngine,
    request: SearchRequest,
    view: CourseView,
    include_traces: bool,
) -> Result<String, ActionError> {
    let query = SearchQuery::new(request.query.as_deref(), request.difficulty.as_deref());
    let outcome = engine.search(&query).await?;
    let body = SearchBody::new(outcome, view, include_traces);
    Ok(serde_json::to_string(&body)?)
}
