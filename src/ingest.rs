//! Session ingest orchestrator.
//!
//! Runs one session's full alignment pass: extraction, sync-code alignment,
//! trializing, and unit assembly. All-or-nothing: any stage error aborts the
//! session and no partial output is produced.

use tracing::info;

use crate::align::align;
use crate::assemble::assemble;
use crate::core::config::RecordingConfig;
use crate::core::error::Result;
use crate::core::types::{ClusterMetadata, UnitRecord};
use crate::extract::extract;
use crate::trialize::{build_windows, trialize};

/// One session's fully materialized input arrays, as supplied by the
/// file/array and trial-annotation collaborators.
#[derive(Debug, Clone, Default)]
pub struct SessionInputs {
    /// Spike times in sample ticks.
    pub spike_times: Vec<f64>,
    /// Electrode site per spike.
    pub spike_sites: Vec<u32>,
    /// Cluster assignment per spike.
    pub cluster_ids: Vec<i64>,
    /// Per-cluster metadata columns.
    pub cluster_metadata: ClusterMetadata,
    /// Raw trial-start triggers in sample ticks.
    pub trial_start_ticks: Vec<f64>,
    /// Go-cue events in sample ticks, index-aligned with trial starts.
    pub go_cue_ticks: Vec<f64>,
    /// Per-trial sync codes recovered from the ephys stream.
    pub sync_ephys: Vec<String>,
    /// Per-trial sync codes from the behavior log, ordered by trial.
    pub sync_behav: Vec<String>,
    /// Optional trial-renumbering array for sync mismatch recovery.
    pub fallback_trial_numbers: Option<Vec<i64>>,
}

/// Run the full alignment pass for one session.
///
/// # Arguments
/// * `inputs` - The session's materialized arrays
/// * `config` - Acquisition parameters for the recording rig
///
/// # Returns
/// Finalized unit records ready for bulk insertion
pub fn ingest_session(
    inputs: &SessionInputs,
    config: &RecordingConfig,
) -> Result<Vec<UnitRecord>> {
    info!(
        spikes = inputs.spike_times.len(),
        trials = inputs.trial_start_ticks.len(),
        "starting session ingest"
    );

    let (spikes, clusters) = extract(
        &inputs.spike_times,
        &inputs.spike_sites,
        &inputs.cluster_ids,
        &inputs.cluster_metadata,
    )?;
    info!(units = clusters.len(), spikes = spikes.len(), "extracted units");

    let alignment = align(
        &inputs.sync_ephys,
        &inputs.sync_behav,
        inputs.fallback_trial_numbers.as_deref(),
        config.fallback_base,
    )?;

    let windows = build_windows(
        &inputs.trial_start_ticks,
        &inputs.go_cue_ticks,
        config.trial_start_correction_ticks,
    )?;

    let trialized = trialize(&spikes, &windows, config.sampling_rate_hz)?;

    let records = assemble(&clusters, &trialized, &alignment)?;
    info!(units = records.len(), "session ingest complete");
    Ok(records)
}
