//! Core data types for Trialign.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{Result, TrialignError};

/// Type alias for spike/trigger times in sample ticks.
pub type Tick = f64;

/// Type alias for unit (cluster) identifiers.
pub type UnitId = i64;

/// A single clustered spike.
///
/// Immutable once extracted; every spike surviving extraction has
/// `cluster_id > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    /// Spike time in sample ticks.
    pub time: Tick,
    /// Electrode site the spike was detected on.
    pub site: u32,
    /// Cluster (unit) assignment; `<= 0` denotes noise.
    pub cluster_id: UnitId,
}

/// Curated unit quality, decoded from the sorter's note vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLabel {
    /// Well-isolated single unit ("single").
    Good,
    /// Acceptable isolation ("ok").
    Ok,
    /// Multi-unit activity ("multi").
    Multi,
    /// Default label for uncurated units (empty note).
    All,
}

impl QualityLabel {
    /// Decode a sorter note into a quality label.
    ///
    /// NUL padding is stripped before lookup; an empty note is the default
    /// "all" label. Any other code is a decode error.
    pub fn decode(code: &str) -> Result<Self> {
        match code.trim_matches('\0') {
            "single" => Ok(QualityLabel::Good),
            "ok" => Ok(QualityLabel::Ok),
            "multi" => Ok(QualityLabel::Multi),
            "" => Ok(QualityLabel::All),
            other => Err(TrialignError::decode(other)),
        }
    }

    /// Storage label for this quality.
    pub fn as_str(self) -> &'static str {
        match self {
            QualityLabel::Good => "good",
            QualityLabel::Ok => "ok",
            QualityLabel::Multi => "multi",
            QualityLabel::All => "all",
        }
    }
}

impl Default for QualityLabel {
    fn default() -> Self {
        QualityLabel::All
    }
}

/// Per-cluster metadata for one retained unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRecord {
    /// Cluster (unit) id.
    pub cluster_id: UnitId,
    /// Unit x position on the probe (um).
    pub position_x: f64,
    /// Unit y position on the probe (um).
    pub position_y: f64,
    /// Peak-to-peak amplitude (uV).
    pub amplitude: f64,
    /// Signal-to-noise ratio.
    pub snr: f64,
    /// Curated quality label.
    pub quality: QualityLabel,
    /// Electrode site with the largest amplitude.
    pub max_amplitude_site: u32,
    /// Raw mean waveform, passed through unmodified.
    pub waveform: Vec<f64>,
}

/// Raw per-cluster metadata columns from the extraction collaborator.
///
/// One row per cluster, index-aligned across columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterMetadata {
    /// Unit x positions (um).
    pub positions_x: Vec<f64>,
    /// Unit y positions (um).
    pub positions_y: Vec<f64>,
    /// Peak-to-peak amplitudes (uV).
    pub amplitudes: Vec<f64>,
    /// Signal-to-noise ratios.
    pub snrs: Vec<f64>,
    /// Raw curation note per cluster.
    pub quality_codes: Vec<String>,
    /// Max-amplitude electrode site per cluster.
    pub max_amplitude_sites: Vec<u32>,
    /// Raw mean waveform per cluster.
    pub waveforms: Vec<Vec<f64>>,
}

impl ClusterMetadata {
    /// Get the number of clusters described.
    #[inline]
    pub fn len(&self) -> usize {
        self.quality_codes.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quality_codes.is_empty()
    }

    /// Check that all columns describe the same number of clusters.
    pub fn validate(&self) -> Result<()> {
        let n = self.len();
        for actual in [
            self.positions_x.len(),
            self.positions_y.len(),
            self.amplitudes.len(),
            self.snrs.len(),
            self.max_amplitude_sites.len(),
            self.waveforms.len(),
        ] {
            if actual != n {
                return Err(TrialignError::length_mismatch(n, actual));
            }
        }
        Ok(())
    }
}

/// One behavioral trial's window in the tick domain.
///
/// Window `t` owns spike times in `[start_tick_t, start_tick_{t+1})`; the
/// last window extends to the end of the spike stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialWindow {
    /// Raw trial position as enumerated by the ephys side.
    pub trial_pos: usize,
    /// Trial start in sample ticks.
    pub start_tick: Tick,
    /// Go-cue event in sample ticks; per-trial spike times are
    /// zero-referenced to this.
    pub go_cue_tick: Tick,
}

/// Final per-unit output record, ready for bulk insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Unit id (stable ascending enumeration).
    pub unit_id: UnitId,
    /// Cluster metadata for the unit.
    pub cluster: ClusterRecord,
    /// Whole-session spike train in seconds, zero at the first trial start.
    pub spike_times: Vec<f64>,
    /// Go-cue-relative spike times (seconds) keyed by behavioral trial
    /// index. Trials with zero spikes for this unit are omitted.
    pub per_trial: BTreeMap<i64, Vec<f64>>,
}

/// Per-file audit record, constructed by the caller from its session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileProvenance {
    /// Subject identifier.
    pub subject_id: i64,
    /// Session number within subject.
    pub session: i64,
    /// Probe insertion number.
    pub insertion_number: u32,
    /// File path relative to the rig data root.
    pub file_path: String,
}

impl FileProvenance {
    /// Create a new provenance record.
    pub fn new(
        subject_id: i64,
        session: i64,
        insertion_number: u32,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            subject_id,
            session,
            insertion_number,
            file_path: file_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_decode() {
        assert_eq!(QualityLabel::decode("single").unwrap(), QualityLabel::Good);
        assert_eq!(QualityLabel::decode("ok").unwrap(), QualityLabel::Ok);
        assert_eq!(QualityLabel::decode("multi").unwrap(), QualityLabel::Multi);
        assert_eq!(QualityLabel::decode("").unwrap(), QualityLabel::All);
        // NUL-padded null note decodes as the default label
        assert_eq!(QualityLabel::decode("\0\0").unwrap(), QualityLabel::All);
    }

    #[test]
    fn test_quality_decode_unrecognized() {
        let err = QualityLabel::decode("great").unwrap_err();
        assert!(matches!(err, TrialignError::Decode { .. }));
    }

    #[test]
    fn test_quality_storage_labels() {
        assert_eq!(QualityLabel::Good.as_str(), "good");
        assert_eq!(QualityLabel::Ok.as_str(), "ok");
        assert_eq!(QualityLabel::Multi.as_str(), "multi");
        assert_eq!(QualityLabel::All.as_str(), "all");
    }

    #[test]
    fn test_metadata_validate_ragged() {
        let meta = ClusterMetadata {
            positions_x: vec![1.0, 2.0],
            positions_y: vec![1.0],
            amplitudes: vec![50.0, 60.0],
            snrs: vec![5.0, 6.0],
            quality_codes: vec!["single".into(), "ok".into()],
            max_amplitude_sites: vec![3, 4],
            waveforms: vec![vec![], vec![]],
        };
        let err = meta.validate().unwrap_err();
        assert!(matches!(
            err,
            TrialignError::LengthMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }
}
