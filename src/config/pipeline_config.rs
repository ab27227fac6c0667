// src/config/pipeline_config.rs
//! Pipeline configuration structures
//!
//! Defaults reproduce the constants used across gait-analysis practice:
//! surface EMG at 1000 Hz with a 20-450 Hz band-pass and a 6 Hz envelope,
//! IMU joint angles at 100 Hz with a 6 Hz low-pass.

use serde::{Deserialize, Serialize};

use crate::error::SignalResult;
use crate::processing::design::FilterSpec;
use crate::processing::envelope::EnvelopeSpec;
use crate::processing::pipeline::StagePlan;

/// Complete pipeline configuration: one section per signal domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub emg: EmgConfig,
    pub imu: ImuConfig,
}

/// Surface-EMG conditioning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmgConfig {
    pub sample_rate_hz: f64,
    pub band_low_hz: f64,
    pub band_high_hz: f64,
    pub filter_order: usize,
    pub normalize: bool,
    pub envelope: EnvelopeSpec,
}

/// IMU joint-angle conditioning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImuConfig {
    pub sample_rate_hz: f64,
    pub lowpass_cutoff_hz: f64,
    pub filter_order: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            emg: EmgConfig::default(),
            imu: ImuConfig::default(),
        }
    }
}

impl Default for EmgConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 1000.0,
            band_low_hz: 20.0,
            band_high_hz: 450.0,
            filter_order: 4,
            normalize: true,
            envelope: EnvelopeSpec::Lowpass {
                cutoff_hz: 6.0,
                order: 4,
            },
        }
    }
}

impl Default for ImuConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 100.0,
            lowpass_cutoff_hz: 6.0,
            filter_order: 4,
        }
    }
}

impl EmgConfig {
    /// Build the stage plan this configuration describes.
    pub fn stage_plan(&self) -> StagePlan {
        StagePlan {
            remove_offset: true,
            filter: Some(FilterSpec::bandpass(
                self.band_low_hz,
                self.band_high_hz,
                self.filter_order,
                self.sample_rate_hz,
            )),
            rectify: true,
            envelope: Some(self.envelope.clone()),
            normalize: self.normalize,
        }
    }
}

impl ImuConfig {
    /// Build the stage plan this configuration describes.
    pub fn stage_plan(&self) -> StagePlan {
        StagePlan {
            remove_offset: false,
            filter: Some(FilterSpec::lowpass(
                self.lowpass_cutoff_hz,
                self.filter_order,
                self.sample_rate_hz,
            )),
            rectify: false,
            envelope: None,
            normalize: false,
        }
    }
}

impl PipelineConfig {
    /// Validate both sections by building and checking their stage plans.
    pub fn validate(&self) -> SignalResult<()> {
        self.emg.stage_plan().validate(self.emg.sample_rate_hz)?;
        self.imu.stage_plan().validate(self.imu.sample_rate_hz)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_band_rejected() {
        let mut config = PipelineConfig::default();
        config.emg.band_low_hz = 500.0; // above the high cutoff
        assert!(config.validate().is_err());

        config = PipelineConfig::default();
        config.emg.band_high_hz = 600.0; // above Nyquist at 1000 Hz
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_imu_cutoff_rejected() {
        let mut config = PipelineConfig::default();
        config.imu.lowpass_cutoff_hz = 50.0; // Nyquist at 100 Hz
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rms_envelope_selectable() {
        let mut config = PipelineConfig::default();
        config.emg.envelope = EnvelopeSpec::RmsWindow { window_len: 51 };
        assert!(config.validate().is_ok());

        config.emg.envelope = EnvelopeSpec::RmsWindow { window_len: 50 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = PipelineConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let back: PipelineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: PipelineConfig = toml::from_str(
            r#"
            [emg]
            band_high_hz = 400.0
            "#,
        )
        .unwrap();
        assert_eq!(config.emg.band_high_hz, 400.0);
        assert_eq!(config.emg.band_low_hz, 20.0);
        assert_eq!(config.imu.sample_rate_hz, 100.0);
    }
}
