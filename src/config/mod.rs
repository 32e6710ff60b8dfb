//! Configuration loading and management for the Attendance Engine.
//!
//! This module loads the engine configuration from YAML files: the
//! deduplication rule, slot capacity, collation policy, metric constants
//! and shift remapping keywords.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Dedup rule: {:?}", config.config().deduplication);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CollationConfig, CollationPolicy, CompanyConfig, DataSheetConfig, DedupStrategy,
    EndDateDefault, EngineConfig, GapThreshold, HolidaysConfig, MetricsConfig, ShiftRules,
    SlotConfig,
};
