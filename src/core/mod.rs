//! Core types and utilities for Trialign.

pub mod config;
pub mod error;
pub mod types;

pub use config::RecordingConfig;
pub use error::{Result, TrialignError};
pub use types::*;
