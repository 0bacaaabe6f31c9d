//! Cursus - a curriculum modeling and course-plan scheduling library.
//!
//! This library provides the core functionality for the `cur` CLI tool:
//! the term-ordering algebra, the course/curriculum data model, generic and
//! student plans, the dependency-violation detector, and the auto-repair
//! procedures that nudge course placements until constraints hold.

pub mod cli;
pub mod commands;
pub mod curriculum;
pub mod models;
pub mod plan;
pub mod report;
pub mod storage;


/// Library-level error type for cursus operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Not initialized: run `cur system init` first")]
    NotInitialized,

    #[error("Course not found: {0}")]
    NotFound(String),

    #[error("Invalid term format: {0}")]
    InvalidFormat(String),

    #[error("Invalid course category: {0}")]
    InvalidCategory(String),

    #[error("Course already registered: {0}")]
    DuplicateCourse(String),

    #[error("Course is not writing intensive: {0}")]
    NotWritingIntensive(String),

    #[error("No non-writing-intensive twin in catalog for: {0}")]
    TwinNotFound(String),

    #[error("Repair did not converge: {0}")]
    DidNotConverge(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for cursus operations.
pub type Result<T> = std::result::Result<T, Error>;
