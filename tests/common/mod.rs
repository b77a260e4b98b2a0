//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `catalog`: a [`RecordingStore`] over [`scenario_records`], counting scans
//! - `config`: default configuration
//!
//! Stores that fail on purpose ([`FailingStore`], [`PanickingStore`]) are built directly.

use course_search::Config;
use course_search::search::Filter;
use course_search::store::{MemoryStore, RecordStore, StoreError};
use course_search::types::{ACTIVE_FLAG, CourseRecord, RETIRED_FLAG};
use futures::FutureExt;
use futures::future::BoxFuture;
use rstest::fixture;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Builds a course record with the fields searches look at.
pub fn course(id: &str, name: &str, description: &str, flag: Option<i64>) -> CourseRecord {
    CourseRecord {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        author: "Course Team".to_string(),
        url: format!("https://courses.example.com/{}", id),
        class_flag: flag,
        ..CourseRecord::default()
    }
}

/// Records from the docker/kubernetes scenario, retired record first.
pub fn scenario_records() -> Vec<CourseRecord> {
    vec![
        course(
            "docker-retired",
            "Docker Basics",
            "Legacy docker course",
            Some(RETIRED_FLAG),
        ),
        course(
            "docker-intro",
            "Intro to Docker",
            "Containers from the ground up",
            Some(ACTIVE_FLAG),
        ),
        course(
            "k8s-ops",
            "Cluster Operations",
            "Running workloads on kubernetes at scale",
            None,
        ),
        course(
            "lambda",
            "Serverless with Lambda",
            "Event-driven functions",
            Some(ACTIVE_FLAG),
        ),
    ]
}

/// Memory store that records how it was called.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct RecordingStore {
    inner: MemoryStore,
    scans: AtomicUsize,
    last_limit: AtomicUsize,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl RecordingStore {
    pub fn new(records: Vec<CourseRecord>) -> Self {
        Self {
            inner: MemoryStore::new(records),
            scans: AtomicUsize::new(0),
            last_limit: AtomicUsize::new(0),
        }
    }

    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    pub fn last_limit(&self) -> usize {
        self.last_limit.load(Ordering::SeqCst)
    }
}

impl RecordStore for RecordingStore {
    fn scan<'a>(
        &'a self,
        filter: &'a Filter,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<CourseRecord>, StoreError>> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);
        self.inner.scan(filter, limit)
    }
}

/// Store whose every scan fails with the given cause.
pub struct FailingStore(pub &'static str);

impl RecordStore for FailingStore {
    fn scan<'a>(
        &'a self,
        _filter: &'a Filter,
        _limit: usize,
    ) -> BoxFuture<'a, Result<Vec<CourseRecord>, StoreError>> {
        let cause = self.0;
        async move { Err::<Vec<CourseRecord>, _>(StoreError::new(cause)) }.boxed()
    }
}

/// Store that panics while scanning.
#[allow(dead_code)] // Used only by server tests
pub struct PanickingStore;

impl RecordStore for PanickingStore {
    fn scan<'a>(
        &'a self,
        _filter: &'a Filter,
        _limit: usize,
    ) -> BoxFuture<'a, Result<Vec<CourseRecord>, StoreError>> {
        futures::future::lazy(|_| -> Result<Vec<CourseRecord>, StoreError> {
            panic!("store client poisoned")
        })
        .boxed()
    }
}

#[fixture]
pub fn catalog() -> Arc<RecordingStore> {
    Arc::new(RecordingStore::new(scenario_records()))
}

#[fixture]
pub fn config() -> Config {
    Config::default()
}
