#![forbid(unsafe_code)]

//! Core domain model and business logic for Lift.
//!
//! This crate provides:
//! - Domain types (muscle groups, equipment, plans, routine days, completions)
//! - Exercise catalog and its query contract
//! - Split planner (weekly plan generation)
//! - Progression scheduler (which routine day comes next)
//! - Persistence (routine store, completion WAL, CSV rollup, history)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod planner;
pub mod progression;
pub mod routine;
pub mod wal;
pub mod csv_rollup;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{
    build_default_catalog, get_default_catalog, Catalog, ExerciseCatalogQuery, ExerciseQuery,
    ExerciseSearch,
};
pub use config::Config;
pub use planner::generate_plan;
pub use progression::{next_day, next_for_active_routine};
pub use routine::{Routine, RoutinePersistence, RoutineStore};
pub use wal::{CompletionSink, JsonlSink};
pub use history::{CompletionHistory, FileHistory};
