//! Configuration module for scrape jobs
//!
//! This module provides the `ScrapeConfig` struct, its builder, and the
//! environment overlay used by the binary.

// Sub-modules
pub mod builder;
pub mod env;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::ScrapeConfigBuilder;
pub use types::ScrapeConfig;
