//! Sync-code alignment between ephys and behavior event streams.
//!
//! Per-trial sync codes are the only shared clock between the two
//! independently acquired streams. When both sides recorded the same code
//! sequence the trial numbering differs by at most a constant offset; when
//! they disagree (restarted session, dropped trials) the only recovery is an
//! explicit renumbering array supplied by the caller.

use tracing::{debug, info};

use crate::core::error::{Result, TrialignError};

/// Outcome of sync-code alignment: how raw ephys trial positions map to
/// behavioral trial indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alignment {
    /// Sequences match exactly; positions shift by a constant offset.
    Matched { offset: i64 },
    /// Sequences mismatch; an explicit per-position lookup was supplied.
    Renumbered { map: Vec<i64> },
}

impl Alignment {
    /// Map a raw ephys trial position to its behavioral trial index.
    ///
    /// Returns `None` when the position has no behavioral counterpart: a
    /// negative mapped index (ephys trials recorded before the behavioral
    /// log begins) or a position past the end of a renumbering map.
    pub fn behavioral_trial(&self, raw_pos: usize) -> Option<i64> {
        match self {
            Alignment::Matched { offset } => {
                let trial = raw_pos as i64 - offset;
                (trial >= 0).then_some(trial)
            }
            Alignment::Renumbered { map } => {
                map.get(raw_pos).copied().filter(|&trial| trial >= 0)
            }
        }
    }
}

/// Align an ephys sync-code sequence against the behavioral sequence.
///
/// Anchors the start of one sequence inside the other, then requires an
/// exact element-wise match over the full overlap window:
/// 1. Forward anchor: locate `sync_ephys[0]` in `sync_behav`. A full-length
///    window match yields a constant offset (zero for equal-length
///    recordings, negative when behavior recorded extra leading trials).
/// 2. Reverse anchor: when the forward anchor fails or mismatches, locate
///    `sync_behav[0]` in `sync_ephys`; a full-length match covers the
///    truncated-behavior recording and yields a positive offset.
/// 3. Otherwise the sequences genuinely disagree: apply the caller-supplied
///    renumbering (`map[i] = fallback[i] - fallback_base`) or fail with
///    `BitcodeMismatch`. No other recovery is attempted.
///
/// # Arguments
/// * `sync_ephys` - Per-trial codes recovered from the ephys stream
/// * `sync_behav` - Per-trial codes from the behavior log, ordered by trial
/// * `fallback` - Optional explicit trial-renumbering array
/// * `fallback_base` - Base subtracted from fallback entries (usually -1)
///
/// # Returns
/// The trial-index mapping for the session
pub fn align<C: PartialEq>(
    sync_ephys: &[C],
    sync_behav: &[C],
    fallback: Option<&[i64]>,
    fallback_base: i64,
) -> Result<Alignment> {
    if sync_ephys.is_empty() {
        return Err(TrialignError::empty_data("ephys sync sequence"));
    }
    if sync_behav.is_empty() {
        return Err(TrialignError::empty_data("behavior sync sequence"));
    }

    let forward = sync_behav.iter().position(|c| *c == sync_ephys[0]);
    if let Some(b0) = forward {
        let end = (b0 + sync_ephys.len()).min(sync_behav.len());
        let window = &sync_behav[b0..end];
        if window.len() == sync_ephys.len() && window == sync_ephys {
            let offset = -(b0 as i64);
            debug!(offset, "sync codes match");
            return Ok(Alignment::Matched { offset });
        }
    }

    if let Some(e0) = sync_ephys.iter().position(|c| *c == sync_behav[0]) {
        let end = (e0 + sync_behav.len()).min(sync_ephys.len());
        let window = &sync_ephys[e0..end];
        if window.len() == sync_behav.len() && window == sync_behav {
            // behavior recording is a suffix-truncated view of the ephys trials
            let offset = e0 as i64;
            debug!(offset, "sync codes match (truncated behavior)");
            return Ok(Alignment::Matched { offset });
        }
    }

    // With no shared starting code the sequences cannot be compared at all;
    // that is corruption, not a renumbering problem.
    if forward.is_none() {
        return Err(TrialignError::SyncAnchorNotFound);
    }

    match fallback {
        Some(numbers) => {
            info!("sync code mismatch - applying fallback trial renumbering");
            let map = numbers.iter().map(|&t| t - fallback_base).collect();
            Ok(Alignment::Renumbered { map })
        }
        None => Err(TrialignError::BitcodeMismatch),
    }
}
