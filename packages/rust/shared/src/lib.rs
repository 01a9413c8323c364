//! Shared types, error model, and configuration for tildegen.
//!
//! This crate is the foundation depended on by all other tildegen crates.
//! It provides:
//! - [`TildegenError`] — the unified error type
//! - Domain types ([`AccountEntry`], [`VisibilityPolicy`], [`UserRecord`], [`AggregateDocument`])
//! - Configuration ([`AppConfig`], config loading)
//! - The [`Reporter`] observer handed to the enumerator and assembler

pub mod config;
pub mod error;
pub mod flags;
pub mod reporter;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_LOCATIONS, PathsConfig, TemplateConfig, UsersConfig, init_config,
    load_config, load_config_from, resolve_config_path,
};
pub use error::{Result, TildegenError};
pub use flags::{coerce_flag, str2bool};
pub use reporter::{Reporter, SilentReporter, SkipReason, TracingReporter};
pub use types::{
    AccountEntry, AggregateDocument, Metadata, PLACEHOLDER_TITLE, UserRecord, VisibilityPolicy,
};
