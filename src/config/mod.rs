//! Configuration for hypr-monitor-layout
//!
//! Monitor parameters come from the command line (see [`crate::monitor`]).
//! This module only covers where things live on disk: the optional settings
//! file and the resolved paths of the files the tool reads and rewrites.

pub mod settings;

pub use settings::{Paths, Settings};
