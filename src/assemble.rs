//! Unit assembly: join cluster metadata with trialized spike trains into
//! final per-unit records.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::align::Alignment;
use crate::core::error::{Result, TrialignError};
use crate::core::types::{ClusterRecord, UnitId, UnitRecord};
use crate::trialize::TrializedSpikes;

/// Assemble final `UnitRecord`s from extraction and trialization output.
///
/// Joins by unit id in ascending order, renumbers raw trial positions
/// through the alignment, and omits empty per-trial buckets (the storage
/// layer's sparse-insert convention). A unit present in one source and
/// absent in the other is an internal consistency failure (`UnknownUnit`).
pub fn assemble(
    clusters: &[ClusterRecord],
    trialized: &TrializedSpikes,
    alignment: &Alignment,
) -> Result<Vec<UnitRecord>> {
    let mut clusters_by_id: BTreeMap<UnitId, &ClusterRecord> = BTreeMap::new();
    for cluster in clusters {
        if clusters_by_id.insert(cluster.cluster_id, cluster).is_some() {
            return Err(TrialignError::invalid_data(format!(
                "duplicate cluster record for unit {}",
                cluster.cluster_id
            )));
        }
    }

    let mut records = Vec::with_capacity(trialized.session_by_unit.len());
    let mut dropped_trials = 0usize;

    for (&unit_id, train) in &trialized.session_by_unit {
        let cluster = clusters_by_id
            .remove(&unit_id)
            .ok_or(TrialignError::unknown_unit(unit_id))?;
        let buckets = trialized
            .buckets_by_unit
            .get(&unit_id)
            .ok_or(TrialignError::unknown_unit(unit_id))?;

        let mut per_trial = BTreeMap::new();
        for (raw_pos, bucket) in buckets.iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            match alignment.behavioral_trial(raw_pos) {
                Some(trial) => {
                    per_trial.insert(trial, bucket.clone());
                }
                None => dropped_trials += 1,
            }
        }

        records.push(UnitRecord {
            unit_id,
            cluster: cluster.clone(),
            spike_times: train.clone(),
            per_trial,
        });
    }

    // Clusters with no surviving spike train are equally inconsistent
    if let Some((&unit_id, _)) = clusters_by_id.iter().next() {
        return Err(TrialignError::unknown_unit(unit_id));
    }

    if dropped_trials > 0 {
        warn!(
            dropped_trials,
            "trial buckets without a behavioral counterpart were dropped"
        );
    }
    debug!(units = records.len(), "assembled unit records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::QualityLabel;

    fn cluster(id: UnitId) -> ClusterRecord {
        ClusterRecord {
            cluster_id: id,
            position_x: 10.0,
            position_y: 120.0,
            amplitude: 85.0,
            snr: 7.0,
            quality: QualityLabel::Good,
            max_amplitude_site: 12,
            waveform: vec![0.0, -55.0, 30.0],
        }
    }

    fn sample_trialized() -> TrializedSpikes {
        let mut session_by_unit = BTreeMap::new();
        session_by_unit.insert(1, vec![0.1, 0.9, 2.2]);
        session_by_unit.insert(2, vec![1.4]);

        let mut buckets_by_unit = BTreeMap::new();
        buckets_by_unit.insert(1, vec![vec![-0.2, 0.6], vec![], vec![0.1]]);
        buckets_by_unit.insert(2, vec![vec![], vec![0.3], vec![]]);

        TrializedSpikes {
            session_by_unit,
            buckets_by_unit,
            trial_count: 3,
        }
    }

    #[test]
    fn test_empty_buckets_dropped() {
        let clusters = vec![cluster(1), cluster(2)];
        let alignment = Alignment::Matched { offset: 0 };

        let records = assemble(&clusters, &sample_trialized(), &alignment).unwrap();

        assert_eq!(records[0].per_trial.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(records[1].per_trial.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_offset_renumbering() {
        let clusters = vec![cluster(1), cluster(2)];
        let alignment = Alignment::Matched { offset: -4 };

        let records = assemble(&clusters, &sample_trialized(), &alignment).unwrap();

        assert_eq!(records[0].per_trial.keys().copied().collect::<Vec<_>>(), vec![4, 6]);
    }

    #[test]
    fn test_unmapped_trials_dropped() {
        let clusters = vec![cluster(1), cluster(2)];
        // Raw position 0 has no behavioral counterpart
        let alignment = Alignment::Matched { offset: 1 };

        let records = assemble(&clusters, &sample_trialized(), &alignment).unwrap();

        // Unit 1's bucket at raw position 0 is gone, position 2 maps to 1
        assert_eq!(records[0].per_trial.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_unknown_unit_in_trialized() {
        // Trialized output has unit 2 but clusters only describe unit 1
        let clusters = vec![cluster(1)];
        let alignment = Alignment::Matched { offset: 0 };

        let err = assemble(&clusters, &sample_trialized(), &alignment).unwrap_err();
        assert!(matches!(err, TrialignError::UnknownUnit { unit_id: 2 }));
    }

    #[test]
    fn test_unknown_unit_in_clusters() {
        let clusters = vec![cluster(1), cluster(2), cluster(9)];
        let alignment = Alignment::Matched { offset: 0 };

        let err = assemble(&clusters, &sample_trialized(), &alignment).unwrap_err();
        assert!(matches!(err, TrialignError::UnknownUnit { unit_id: 9 }));
    }

    #[test]
    fn test_assembly_idempotent() {
        let clusters = vec![cluster(1), cluster(2)];
        let trialized = sample_trialized();
        let alignment = Alignment::Matched { offset: 0 };

        let first = assemble(&clusters, &trialized, &alignment).unwrap();
        let second = assemble(&clusters, &trialized, &alignment).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_records_ascending_by_unit() {
        let clusters = vec![cluster(2), cluster(1)];
        let alignment = Alignment::Matched { offset: 0 };

        let records = assemble(&clusters, &sample_trialized(), &alignment).unwrap();

        let ids: Vec<_> = records.iter().map(|r| r.unit_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
