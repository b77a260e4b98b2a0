//! Query-and-rank pipeline for course search.
//!
//! Raw query text is split into terms, turned into a store filter, scanned once
//! against the injected record store, then scored and truncated.

// Module declarations
pub(crate) mod engine;
pub mod predicate;
pub mod scoring;
pub mod tokenize;

// Public re-exports (used via lib.rs)
pub use engine::{SearchEngine, SearchOutcome, SearchQuery};
pub use predicate::{CaseMatching, Filter, PredicateBuilder};
pub use scoring::{rank, score_record};
pub use tokenize::{Terms, tokenize_query};
