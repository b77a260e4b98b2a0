//! Search pipeline orchestration.

use crate::config::Config;
use crate::search::predicate::PredicateBuilder;
use crate::search::scoring::rank;
use crate::search::tokenize::{Terms, tokenize_query};
use crate::store::{RecordStore, StoreError};
use crate::types::ScoredRecord;
use std::sync::Arc;

/// A parsed search request: terms plus an optional difficulty facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub terms: Terms,
    pub difficulty: Option<String>,
}

impl SearchQuery {
    /// Tokenize `raw` and normalize the facet. A blank facet is dropped.
    pub fn new(raw: Option<&str>, difficulty: Option<&str>) -> Self {
        Self {
            terms: tokenize_query(raw),
            difficulty: difficulty
                .map(str::trim)
                .filter(|facet| !facet.is_empty())
                .map(str::to_string),
        }
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub terms: Terms,
    /// Ranked courses, at most the configured cap.
    pub courses: Vec<ScoredRecord>,
    /// Records the store returned, or `None` when the scan was skipped.
    pub candidates: Option<usize>,
    /// Pipeline stages executed, in order.
    pub trace: Vec<String>,
}

/// Runs tokenize → filter → scan → rank against an injected store.
///
/// Holds no per-request state; one engine may serve concurrent requests.
#[derive(Clone)]
pub struct SearchEngine {
    store: Arc<dyn RecordStore>,
    predicates: PredicateBuilder,
    scan_limit: usize,
    result_cap: usize,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("predicates", &self.predicates)
            .field("scan_limit", &self.scan_limit)
            .field("result_cap", &self.result_cap)
            .finish_non_exhaustive()
    }
}

impl SearchEngine {
    pub fn new(store: Arc<dyn RecordStore>, config: &Config) -> Self {
        Self {
            store,
            predicates: PredicateBuilder::new(config.search.case_matching),
            scan_limit: config.store.scan_limit,
            result_cap: config.search.result_cap,
        }
    }

    /// Execute one search. An empty term list returns an empty outcome without scanning.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, StoreError> {
        let terms = query.terms.clone();
        let mut trace = vec![format!("tokenized {} term(s)", terms.len())];
        tracing::debug!("Search terms: {:?}, difficulty: {:?}", terms.as_slice(), query.difficulty);

        if terms.is_empty() {
            trace.push("no search terms; record store not queried".to_string());
            return Ok(SearchOutcome {
                terms,
                courses: Vec::new(),
                candidates: None,
                trace,
            });
        }

        let filter = self.predicates.build(&terms, query.difficulty.as_deref());
        tracing::debug!(
            "Scanning with {} condition(s), limit {}: {}",
            filter.condition_count(),
            self.scan_limit,
            filter
        );

        let candidates = self.store.scan(&filter, self.scan_limit).await?;
        let candidate_count = candidates.len();
        tracing::info!("Record store returned {} candidate(s)", candidate_count);
        trace.push(format!("record store returned {} candidate(s)", candidate_count));

        let courses = rank(candidates, &terms, self.result_cap);
        tracing::info!("Selected {} course(s) for '{}'", courses.len(), terms.joined());
        trace.push(format!("selected {} course(s)", courses.len()));

        Ok(SearchOutcome {
            terms,
            courses,
            candidates: Some(candidate_count),
            trace,
        })
    }
}
