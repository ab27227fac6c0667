// src/processing/envelope.rs
//! Rectification and amplitude envelope extraction
//!
//! After band-pass filtering, an EMG burst is still a zero-mean oscillation;
//! rectifying and smoothing it exposes the slow activation trend. Two
//! interchangeable smoothers are provided: a zero-phase Butterworth low-pass
//! (the 4-10 Hz convention) and a centered moving-RMS window (the 50 ms
//! convention). The source literature uses both without reconciling them, so
//! the choice stays with the caller.

use serde::{Deserialize, Serialize};

use crate::error::{SignalError, SignalResult};
use crate::processing::design::FilterSpec;
use crate::processing::zero_phase::filtfilt;

/// Envelope extraction strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum EnvelopeSpec {
    /// Zero-phase Butterworth low-pass over the rectified signal.
    Lowpass { cutoff_hz: f64, order: usize },
    /// Centered moving root-mean-square. `window_len` is in samples and must
    /// be odd so the window is symmetric about each output sample. At the
    /// boundaries the window is truncated to the samples actually in range
    /// (no zero padding), so a constant input maps to itself everywhere.
    RmsWindow { window_len: usize },
}

impl EnvelopeSpec {
    /// Validate strategy parameters against a sampling rate.
    pub fn validate(&self, sample_rate_hz: f64) -> SignalResult<()> {
        match *self {
            EnvelopeSpec::Lowpass { cutoff_hz, order } => {
                FilterSpec::lowpass(cutoff_hz, order, sample_rate_hz).validate()
            }
            EnvelopeSpec::RmsWindow { window_len } => {
                if window_len == 0 {
                    return Err(SignalError::invalid_spec("RMS window length must be >= 1"));
                }
                if window_len % 2 == 0 {
                    return Err(SignalError::invalid_spec(format!(
                        "RMS window length must be odd for a symmetric window, got {}",
                        window_len
                    )));
                }
                Ok(())
            }
        }
    }

    /// Extract the amplitude envelope of an (already rectified) sequence.
    /// Output length equals input length for both strategies.
    pub fn extract(&self, input: &[f64], sample_rate_hz: f64) -> SignalResult<Vec<f64>> {
        self.validate(sample_rate_hz)?;
        match *self {
            EnvelopeSpec::Lowpass { cutoff_hz, order } => {
                let coeffs = FilterSpec::lowpass(cutoff_hz, order, sample_rate_hz).design()?;
                filtfilt(&coeffs, input)
            }
            EnvelopeSpec::RmsWindow { window_len } => Ok(moving_rms(input, window_len)),
        }
    }

    /// Convenience constructor for a window given in milliseconds, rounded to
    /// the nearest odd sample count.
    pub fn rms_window_ms(window_ms: f64, sample_rate_hz: f64) -> Self {
        let samples = (window_ms * sample_rate_hz / 1000.0).round() as usize;
        let window_len = if samples % 2 == 0 {
            samples + 1
        } else {
            samples.max(1)
        };
        EnvelopeSpec::RmsWindow { window_len }
    }
}

/// Pointwise absolute value. Total; output length equals input length.
pub fn rectify(input: &[f64]) -> Vec<f64> {
    input.iter().map(|x| x.abs()).collect()
}

/// Centered moving RMS with the window truncated at the boundaries; the
/// divisor is the number of in-range samples, not the nominal window length.
fn moving_rms(input: &[f64], window_len: usize) -> Vec<f64> {
    let half = window_len / 2;
    let n = input.len();
    let mut output = Vec::with_capacity(n);

    for i in 0..n {
        let start = i.saturating_sub(half);
        let end = (i + half + 1).min(n);
        let sum_sq: f64 = input[start..end].iter().map(|x| x * x).sum();
        output.push((sum_sq / (end - start) as f64).sqrt());
    }

    output
}
