//! Cluster extraction: raw clustered-spike arrays to typed records.
//!
//! Filters noise clusters, fixes the unit enumeration, and decodes curation
//! notes into quality labels.

use std::collections::BTreeSet;

use tracing::debug;

use crate::core::error::{Result, TrialignError};
use crate::core::types::{ClusterMetadata, ClusterRecord, QualityLabel, Spike, UnitId};

/// Extract typed spikes and cluster records from raw sorter arrays.
///
/// Every spike with `cluster_id <= 0` is noise and is discarded; the
/// surviving distinct cluster ids, ascending, define the unit universe. The
/// i-th retained cluster takes metadata row i.
///
/// # Arguments
/// * `spike_times` - Spike times in sample ticks
/// * `spike_sites` - Electrode site per spike
/// * `cluster_ids` - Cluster assignment per spike
/// * `metadata` - Per-cluster metadata columns
///
/// # Returns
/// Filtered spikes and one `ClusterRecord` per retained cluster
pub fn extract(
    spike_times: &[f64],
    spike_sites: &[u32],
    cluster_ids: &[UnitId],
    metadata: &ClusterMetadata,
) -> Result<(Vec<Spike>, Vec<ClusterRecord>)> {
    let n = spike_times.len();
    if spike_sites.len() != n {
        return Err(TrialignError::length_mismatch(n, spike_sites.len()));
    }
    if cluster_ids.len() != n {
        return Err(TrialignError::length_mismatch(n, cluster_ids.len()));
    }
    metadata.validate()?;

    // Drop noise clusters
    let mut spikes = Vec::with_capacity(n);
    for i in 0..n {
        if cluster_ids[i] > 0 {
            spikes.push(Spike {
                time: spike_times[i],
                site: spike_sites[i],
                cluster_id: cluster_ids[i],
            });
        }
    }

    // Ascending distinct ids fix the unit enumeration
    let retained: BTreeSet<UnitId> = spikes.iter().map(|s| s.cluster_id).collect();
    debug!(
        total = n,
        filtered = spikes.len(),
        units = retained.len(),
        "extracted clustered spikes"
    );

    if metadata.len() < retained.len() {
        return Err(TrialignError::length_mismatch(retained.len(), metadata.len()));
    }

    let mut clusters = Vec::with_capacity(retained.len());
    for (row, &cluster_id) in retained.iter().enumerate() {
        clusters.push(ClusterRecord {
            cluster_id,
            position_x: metadata.positions_x[row],
            position_y: metadata.positions_y[row],
            amplitude: metadata.amplitudes[row],
            snr: metadata.snrs[row],
            quality: QualityLabel::decode(&metadata.quality_codes[row])?,
            max_amplitude_site: metadata.max_amplitude_sites[row],
            waveform: metadata.waveforms[row].clone(),
        });
    }

    Ok((spikes, clusters))
}
