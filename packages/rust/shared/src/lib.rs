//! Shared types, error model, and configuration for vtdex.
//!
//! This crate is the foundation depended on by all other vtdex crates.
//! It provides:
//! - [`VtdexError`], the unified error type
//! - Record types ([`BasicRecord`], [`DetailRecord`], [`ChannelMetadata`], [`EnrichedRecord`])
//! - Configuration ([`AppConfig`] and config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ListingConfig, MAX_CHANNEL_BATCH, OutputConfig, YoutubeConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, resolve_api_key,
};
pub use error::{Result, VtdexError};
pub use types::{BasicRecord, ChannelMetadata, DetailRecord, EnrichedRecord};
