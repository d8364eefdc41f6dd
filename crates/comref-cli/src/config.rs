//! Loading the pull configuration from a TOML file and the command line.

mod builder;
mod defaults;
mod file;

pub use builder::{AppConfig, build_config};
