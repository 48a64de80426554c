//! Trialign - trial-synchronized spike-train reconstruction.
//!
//! This crate rebuilds per-unit, per-trial spike trains from one session's
//! raw arrays:
//! - Cluster extraction (noise filtering, unit quality decoding)
//! - Sync-code alignment between ephys and behavior event streams
//! - Trializing (go-cue-relative spike partitioning)
//! - Unit assembly (final records for the persistence layer)
//!
//! File discovery, storage, and plotting are external collaborators; the
//! pipeline operates on fully materialized in-memory arrays and is
//! all-or-nothing per session.

pub mod align;
pub mod assemble;
pub mod core;
pub mod extract;
pub mod ingest;
pub mod trialize;

pub use crate::align::{align, Alignment};
pub use crate::assemble::assemble;
pub use crate::core::{Result, TrialignError};
pub use crate::extract::extract;
pub use crate::ingest::{ingest_session, SessionInputs};
pub use crate::trialize::{build_windows, trialize, TrializedSpikes};
