pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod search;
pub mod server;
pub mod store;
pub mod tools;
pub mod tracing;
pub mod types;

pub use config::Config;
pub use error::ActionError;
pub use event::{ActionEvent, ActionResponse};
pub use search::{SearchEngine, SearchOutcome, SearchQuery};
pub use server::ActionServer;
pub use store::{MemoryStore, RecordStore, StoreError};
pub use types::{CourseRecord, ScoredRecord};
