//! Shared types, error model, and configuration for DealBrief.
//!
//! This crate is the foundation depended on by all other DealBrief crates.
//! It provides:
//! - [`DealBriefError`] — the unified error type
//! - Domain types ([`CompanyRecord`], [`IntelligenceBrief`] and its nested parts)
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, SynthesisSettings, config_dir, config_file_path, init_config,
    load_config, load_config_from, resolve_api_key, validate_api_key,
};
pub use error::{DealBriefError, Result};
pub use types::{
    CompanyRecord, Competitor, Financials, FundingRound, IntelligenceBrief, MarketAnalysis,
    SwotAnalysis, TeamMember,
};
