//! Recording configuration for a session's alignment pass.

use serde::{Deserialize, Serialize};

/// Acquisition parameters for one recording setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Sampling rate of the ephys acquisition system (Hz).
    pub sampling_rate_hz: f64,
    /// Hardware trigger lead subtracted from every raw trial-start trigger
    /// to recover the true trial start.
    pub trial_start_correction_ticks: f64,
    /// Base subtracted from fallback trial numbers when a renumbering array
    /// is applied (`map[i] = fallback[i] - base`).
    pub fallback_base: i64,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        // Default: Neuropixels rig (30 kHz, 7500-tick trigger lead)
        Self {
            sampling_rate_hz: 30_000.0,
            trial_start_correction_ticks: 7_500.0,
            fallback_base: -1,
        }
    }
}

impl RecordingConfig {
    /// Create a Neuropixels acquisition config (30 kHz).
    pub fn neuropixels() -> Self {
        Self::default()
    }

    /// Create a config with no trigger-lead correction.
    pub fn uncorrected(sampling_rate_hz: f64) -> Self {
        Self {
            sampling_rate_hz,
            trial_start_correction_ticks: 0.0,
            fallback_base: -1,
        }
    }
}
