//! Core module - configuration

pub mod config;

pub use config::{Config, DEFAULT_BORDERLINE_THRESHOLD_PCT};
