//! Configuration for gitrig.
//!
//! This crate loads and saves `.gitrig.yaml` files, discovers them in the
//! filesystem, and turns them into [`gitrig::RunnerSettings`].

pub mod config;
pub mod discover;

pub use config::{load_config, save_config, ConfigError, Result, RigConfig};
pub use discover::find_config;
