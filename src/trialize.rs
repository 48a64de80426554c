//! Trializing: partitioning the spike stream into per-trial, per-unit
//! buckets, realigned to each trial's go-cue.
//!
//! Bucketing runs entirely in the tick domain; conversion to seconds
//! happens once, after partitioning, so window comparisons stay exact.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::error::{Result, TrialignError};
use crate::core::types::{Spike, Tick, TrialWindow, UnitId};

/// Per-unit output of trializing.
#[derive(Debug, Clone, PartialEq)]
pub struct TrializedSpikes {
    /// Whole-session spike train per unit, seconds, zero at the first trial
    /// start. Ascending within each unit.
    pub session_by_unit: BTreeMap<UnitId, Vec<f64>>,
    /// Go-cue-relative spike times per unit, indexed by raw trial position.
    /// One (possibly empty) bucket per window.
    pub buckets_by_unit: BTreeMap<UnitId, Vec<Vec<f64>>>,
    /// Number of trial windows the session was partitioned into.
    pub trial_count: usize,
}

impl TrializedSpikes {
    /// Total spike count across all units.
    pub fn spike_count(&self) -> usize {
        self.session_by_unit.values().map(Vec::len).sum()
    }

    /// Unit ids in ascending order.
    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.session_by_unit.keys().copied().collect()
    }
}

/// Build trial windows from index-aligned start and go-cue tick arrays.
///
/// `correction_ticks` is subtracted from every raw start trigger (hardware
/// trigger lead). Start ticks must be strictly increasing after correction.
pub fn build_windows(
    start_ticks: &[Tick],
    go_cue_ticks: &[Tick],
    correction_ticks: Tick,
) -> Result<Vec<TrialWindow>> {
    if start_ticks.is_empty() {
        return Err(TrialignError::empty_data("trial start array"));
    }
    if go_cue_ticks.len() != start_ticks.len() {
        return Err(TrialignError::length_mismatch(
            start_ticks.len(),
            go_cue_ticks.len(),
        ));
    }

    let mut windows: Vec<TrialWindow> = Vec::with_capacity(start_ticks.len());
    for t in 0..start_ticks.len() {
        let start_tick = start_ticks[t] - correction_ticks;
        if t > 0 && start_tick <= windows[t - 1].start_tick {
            return Err(TrialignError::invalid_data(
                "trial start ticks must be strictly increasing",
            ));
        }
        windows.push(TrialWindow {
            trial_pos: t,
            start_tick,
            go_cue_tick: go_cue_ticks[t],
        });
    }
    Ok(windows)
}

/// Partition spikes into per-unit, per-trial buckets and convert to seconds.
///
/// Window `t` owns `[start_tick_t, start_tick_{t+1})`; a spike exactly at
/// `start_tick_{t+1}` belongs to `t+1`. The terminal window is closed on
/// the right at infinity, and spikes earlier than the first start are
/// clamped into window 0 so that every spike lands in exactly one trial.
///
/// # Arguments
/// * `spikes` - Filtered spikes (all `cluster_id > 0`)
/// * `windows` - Trial windows, ascending by start tick
/// * `sampling_rate_hz` - Tick-to-seconds conversion factor
///
/// # Returns
/// Session-relative trains and go-cue-relative trial buckets per unit
pub fn trialize(
    spikes: &[Spike],
    windows: &[TrialWindow],
    sampling_rate_hz: f64,
) -> Result<TrializedSpikes> {
    if windows.is_empty() {
        return Err(TrialignError::empty_data("trial windows"));
    }
    if !(sampling_rate_hz > 0.0) {
        return Err(TrialignError::invalid_data(
            "sampling rate must be positive",
        ));
    }

    let first_start = windows[0].start_tick;

    // Bucket in the tick domain
    let mut session_ticks: BTreeMap<UnitId, Vec<Tick>> = BTreeMap::new();
    let mut bucket_ticks: BTreeMap<UnitId, Vec<Vec<Tick>>> = BTreeMap::new();

    for spike in spikes {
        // Count of starts <= spike.time; a spike exactly on a boundary
        // belongs to the later window. Pre-session spikes clamp to window 0.
        let owned = windows.partition_point(|w| w.start_tick <= spike.time);
        let t = owned.saturating_sub(1);

        session_ticks
            .entry(spike.cluster_id)
            .or_default()
            .push(spike.time);
        let buckets = bucket_ticks
            .entry(spike.cluster_id)
            .or_insert_with(|| vec![Vec::new(); windows.len()]);
        buckets[t].push(spike.time - windows[t].go_cue_tick);
    }

    // Single tick -> seconds conversion pass
    let mut session_by_unit = BTreeMap::new();
    for (unit, mut ticks) in session_ticks {
        ticks.sort_by(f64::total_cmp);
        let train: Vec<f64> = ticks
            .iter()
            .map(|&tick| (tick - first_start) / sampling_rate_hz)
            .collect();
        session_by_unit.insert(unit, train);
    }

    let mut buckets_by_unit = BTreeMap::new();
    for (unit, mut buckets) in bucket_ticks {
        for bucket in &mut buckets {
            bucket.sort_by(f64::total_cmp);
        }
        let converted: Vec<Vec<f64>> = buckets
            .into_iter()
            .map(|bucket| {
                bucket
                    .into_iter()
                    .map(|tick| tick / sampling_rate_hz)
                    .collect()
            })
            .collect();
        buckets_by_unit.insert(unit, converted);
    }

    let result = TrializedSpikes {
        session_by_unit,
        buckets_by_unit,
        trial_count: windows.len(),
    };
    debug!(
        spikes = result.spike_count(),
        units = result.unit_ids().len(),
        trials = result.trial_count,
        "trialized spike stream"
    );
    Ok(result)
}
