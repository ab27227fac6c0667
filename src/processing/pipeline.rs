// src/processing/pipeline.rs
//! Multi-stage signal conditioning pipeline
//!
//! Chains the conditioning stages in their canonical order: offset removal,
//! band-pass, rectification, envelope extraction, normalization. Every stage
//! is optional and the enabled set is described by a [`StagePlan`]; the EMG
//! and IMU presets reproduce the two chains used in gait analysis practice.
//! Channels are independent, so a recording is processed in parallel across
//! channels with no cross-channel coupling.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{SignalError, SignalResult};
use crate::io::Recording;
use crate::processing::design::{FilterCoefficients, FilterSpec};
use crate::processing::envelope::{rectify, EnvelopeSpec};
use crate::processing::zero_phase::filtfilt;

/// Which stages run, and with what parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StagePlan {
    /// Subtract the sequence mean before filtering.
    pub remove_offset: bool,
    /// Zero-phase Butterworth filter applied to the raw signal.
    pub filter: Option<FilterSpec>,
    /// Absolute-value transform after filtering.
    pub rectify: bool,
    /// Amplitude envelope over the (rectified) signal.
    pub envelope: Option<EnvelopeSpec>,
    /// Divide by the sequence maximum as the terminal stage.
    pub normalize: bool,
}

impl StagePlan {
    /// Standard surface-EMG chain: offset removal, 20-450 Hz band-pass,
    /// rectification, 6 Hz zero-phase envelope, normalization to peak.
    pub fn emg(sample_rate_hz: f64) -> Self {
        Self {
            remove_offset: true,
            filter: Some(FilterSpec::bandpass(20.0, 450.0, 4, sample_rate_hz)),
            rectify: true,
            envelope: Some(EnvelopeSpec::Lowpass {
                cutoff_hz: 6.0,
                order: 4,
            }),
            normalize: true,
        }
    }

    /// Joint-angle chain: low-pass smoothing only. Orientation series keep
    /// their sign and physical units, so no rectification or normalization.
    pub fn imu(sample_rate_hz: f64) -> Self {
        Self {
            remove_offset: false,
            filter: Some(FilterSpec::lowpass(6.0, 4, sample_rate_hz)),
            rectify: false,
            envelope: None,
            normalize: false,
        }
    }

    /// Validate every configured stage against the sampling rate.
    pub fn validate(&self, sample_rate_hz: f64) -> SignalResult<()> {
        if let Some(spec) = &self.filter {
            spec.validate()?;
            if (spec.sample_rate_hz - sample_rate_hz).abs() > f64::EPSILON {
                return Err(SignalError::invalid_spec(format!(
                    "filter designed for {} Hz but plan runs at {} Hz",
                    spec.sample_rate_hz, sample_rate_hz
                )));
            }
        }
        if let Some(envelope) = &self.envelope {
            envelope.validate(sample_rate_hz)?;
        }
        Ok(())
    }
}

/// Signal conditioning pipeline over named channels.
///
/// Holds the pre-designed filter coefficients so a plan is validated and
/// designed once, then applied to any number of recordings.
pub struct SignalPipeline {
    plan: StagePlan,
    sample_rate_hz: f64,
    filter_coeffs: Option<FilterCoefficients>,
}

impl SignalPipeline {
    /// Validate the plan and design its filter up front.
    pub fn new(plan: StagePlan, sample_rate_hz: f64) -> SignalResult<Self> {
        plan.validate(sample_rate_hz)?;
        let filter_coeffs = match &plan.filter {
            Some(spec) => Some(spec.design()?),
            None => None,
        };
        Ok(Self {
            plan,
            sample_rate_hz,
            filter_coeffs,
        })
    }

    pub fn plan(&self) -> &StagePlan {
        &self.plan
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    /// Run the configured stages over one channel.
    pub fn process_channel(&self, samples: &[f64]) -> SignalResult<Vec<f64>> {
        let mut signal = samples.to_vec();

        if self.plan.remove_offset {
            remove_offset(&mut signal);
        }
        if let Some(coeffs) = &self.filter_coeffs {
            signal = filtfilt(coeffs, &signal)?;
        }
        if self.plan.rectify {
            signal = rectify(&signal);
        }
        if let Some(envelope) = &self.plan.envelope {
            signal = envelope.extract(&signal, self.sample_rate_hz)?;
        }
        if self.plan.normalize {
            signal = normalize(&signal)?;
        }

        Ok(signal)
    }

    /// Process every channel of a recording independently. Channels are
    /// mapped in parallel; output order matches input order. The first
    /// failing channel aborts the recording — whether to instead skip a
    /// short or silent channel is the caller's policy, applied per channel
    /// via [`Self::process_channel`].
    pub fn process(&self, recording: &Recording) -> SignalResult<Recording> {
        if (recording.sample_rate_hz() - self.sample_rate_hz).abs() > f64::EPSILON {
            return Err(SignalError::invalid_spec(format!(
                "pipeline configured for {} Hz, recording is {} Hz",
                self.sample_rate_hz,
                recording.sample_rate_hz()
            )));
        }

        let processed: Result<Vec<_>, SignalError> = recording
            .channels()
            .par_iter()
            .map(|channel| {
                self.process_channel(&channel.samples)
                    .map(|samples| (channel.name.clone(), samples))
                    .map_err(|err| {
                        warn!(channel = %channel.name, %err, "channel failed");
                        err
                    })
            })
            .collect();

        let mut output = Recording::new(self.sample_rate_hz);
        for (name, samples) in processed? {
            output.push_channel(name, samples);
        }

        debug!(
            channels = output.len(),
            sample_rate_hz = self.sample_rate_hz,
            "recording processed"
        );
        Ok(output)
    }

    /// Wire a data source through the pipeline into a sink.
    pub fn run(
        &self,
        source: &mut dyn crate::io::ChannelSource,
        sink: &mut dyn crate::io::ChannelSink,
    ) -> SignalResult<()> {
        let input = source.read()?;
        let output = self.process(&input)?;
        sink.write(&output)
    }
}

/// Subtract the mean in place.
pub fn remove_offset(signal: &mut [f64]) {
    if signal.is_empty() {
        return;
    }
    let mean = signal.iter().sum::<f64>() / signal.len() as f64;
    for v in signal.iter_mut() {
        *v -= mean;
    }
}

/// Divide every sample by the sequence maximum, so the peak maps to 1.
///
/// Fails with [`SignalError::DegenerateSignal`] when the maximum is zero,
/// negative, or non-finite (all-silent channel, NaN contamination, empty
/// input) — any of those would make the quotient meaningless.
pub fn normalize(signal: &[f64]) -> SignalResult<Vec<f64>> {
    let mut max = f64::NEG_INFINITY;
    for &v in signal {
        if v.is_nan() {
            max = f64::NAN;
            break;
        }
        if v > max {
            max = v;
        }
    }

    if !max.is_finite() || max <= 0.0 {
        return Err(SignalError::DegenerateSignal { max });
    }

    Ok(signal.iter().map(|v| v / max).collect())
}

/// Scale a normalized activation envelope by a maximum voluntary force,
/// yielding the muscle force estimate `F = a * F_max` used in joint torque
/// models.
pub fn scale_activation(activation: &[f64], max_force_n: f64) -> Vec<f64> {
    activation.iter().map(|a| a * max_force_n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    #[test]
    fn test_remove_offset() {
        let mut x = vec![1.0, 2.0, 3.0];
        remove_offset(&mut x);
        assert!((x.iter().sum::<f64>()).abs() < 1e-12);
        assert_eq!(x, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_normalize_peak_is_one() {
        let x = vec![0.2, 0.8, 0.4];
        let y = normalize(&x).unwrap();
        assert!((y.iter().cloned().fold(f64::MIN, f64::max) - 1.0).abs() < 1e-12);
        assert!((y[0] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_degenerate_cases() {
        assert!(matches!(
            normalize(&[0.0, 0.0]),
            Err(SignalError::DegenerateSignal { .. })
        ));
        assert!(matches!(
            normalize(&[0.5, f64::NAN]),
            Err(SignalError::DegenerateSignal { .. })
        ));
        assert!(matches!(
            normalize(&[]),
            Err(SignalError::DegenerateSignal { .. })
        ));
        assert!(matches!(
            normalize(&[-1.0, -0.5]),
            Err(SignalError::DegenerateSignal { .. })
        ));
    }

    #[test]
    fn test_emg_plan_end_to_end() {
        let fs = 1000.0;
        let pipeline = SignalPipeline::new(StagePlan::emg(fs), fs).unwrap();

        // 80 Hz carrier (inside the band) under a slow on/off gate, plus a
        // DC offset the pipeline must strip.
        let n = 4000;
        let raw: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64 / fs;
                let gate = if (t % 2.0) < 1.0 { 1.0 } else { 0.1 };
                2.5 + gate * (2.0 * PI * 80.0 * t).sin()
            })
            .collect();

        let out = pipeline.process_channel(&raw).unwrap();
        assert_eq!(out.len(), n);

        // Normalized envelope peaks at 1 and everything is finite.
        let max = out.iter().cloned().fold(f64::MIN, f64::max);
        assert!((max - 1.0).abs() < 1e-9);
        assert!(out.iter().all(|v| v.is_finite()));

        // Envelope should be high mid-burst and low mid-rest.
        assert!(out[500] > 0.6, "burst level {}", out[500]);
        assert!(out[1500] < 0.4, "rest level {}", out[1500]);
    }

    #[test]
    fn test_imu_plan_keeps_sign_and_scale() {
        let fs = 100.0;
        let pipeline = SignalPipeline::new(StagePlan::imu(fs), fs).unwrap();

        // Slow 1 Hz joint oscillation around -10 degrees with fast jitter.
        let n = 1000;
        let raw: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64 / fs;
                -10.0 + 15.0 * (2.0 * PI * 1.0 * t).sin() + 0.5 * (2.0 * PI * 30.0 * t).sin()
            })
            .collect();

        let out = pipeline.process_channel(&raw).unwrap();
        assert_eq!(out.len(), n);

        // Mean offset survives (no rectification, no normalization)...
        let mean = out.iter().sum::<f64>() / out.len() as f64;
        assert!((mean + 10.0).abs() < 0.5, "mean {}", mean);
        // ...and the 1 Hz excursion is mostly intact while the jitter is gone.
        let max = out.iter().cloned().fold(f64::MIN, f64::max);
        assert!(max > 3.0 && max < 5.5, "max {}", max);
    }

    #[test]
    fn test_recording_processed_per_channel() {
        let fs = 1000.0;
        let pipeline = SignalPipeline::new(StagePlan::emg(fs), fs).unwrap();

        let recording = Recording::new(fs)
            .with_channel("RF", sine(50.0, fs, 2000))
            .with_channel("TA", sine(120.0, fs, 2000));

        let out = pipeline.process(&recording).unwrap();
        assert_eq!(out.channel_names(), vec!["RF", "TA"]);
        assert_eq!(out.channel("RF").unwrap().len(), 2000);
    }

    #[test]
    fn test_sample_rate_mismatch_rejected() {
        let pipeline = SignalPipeline::new(StagePlan::emg(1000.0), 1000.0).unwrap();
        let recording = Recording::new(100.0).with_channel("RF", vec![0.0; 2000]);
        assert!(matches!(
            pipeline.process(&recording),
            Err(SignalError::InvalidFilterSpec { .. })
        ));
    }

    #[test]
    fn test_short_channel_fails_recording() {
        let fs = 1000.0;
        let pipeline = SignalPipeline::new(StagePlan::emg(fs), fs).unwrap();
        let recording = Recording::new(fs)
            .with_channel("RF", sine(50.0, fs, 2000))
            .with_channel("stub", vec![1.0; 5]);
        assert!(matches!(
            pipeline.process(&recording),
            Err(SignalError::InsufficientSamples { .. })
        ));
    }

    #[test]
    fn test_scale_activation() {
        let forces = scale_activation(&[0.0, 0.5, 1.0], 800.0);
        assert_eq!(forces, vec![0.0, 400.0, 800.0]);
    }

    #[test]
    fn test_plan_rate_mismatch_in_validate() {
        let plan = StagePlan::emg(1000.0);
        assert!(plan.validate(500.0).is_err());
        assert!(plan.validate(1000.0).is_ok());
    }
}
