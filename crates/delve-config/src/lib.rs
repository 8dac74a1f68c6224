//! Configuration for the cave generator.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line. Unknown fields are ignored and missing ones take defaults, so
//! files written by older or newer versions still load.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, ScanMode};
pub use config::{Config, DebugConfig, GenerationConfig, WorldConfig, default_config_dir};
pub use error::ConfigError;
