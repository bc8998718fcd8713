//! Configuration loading and management for the payroll engine.
//!
//! This module provides the payroll policy (overtime threshold, overtime
//! multiplier, re-run policy) and loads deployment overrides from YAML.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Overtime multiplier: {}", config.policy().overtime_multiplier);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, POLICY_FILE};
pub use types::{OVERTIME_MULTIPLIER, PayrollPolicy, REGULAR_THRESHOLD_HOURS, RerunPolicy};
