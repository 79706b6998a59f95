//! Configuration for the sightline tools.
//!
//! Settings persist to disk as a RON file, every section falls back to its
//! defaults when missing, and a handful of values can be overridden from the
//! command line.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CatalogConfig, Config, DebugConfig, LodConfig, SceneConfig, VisibilityConfig,
};
pub use error::ConfigError;
