// src/processing/zero_phase.rs
//! Zero-phase (forward-backward) filter application
//!
//! A single IIR pass delays every frequency component by a different amount.
//! Running the filter forward, reversing, running forward again and reversing
//! back cancels that phase shift exactly, at the cost of needing the whole
//! sequence in memory. Edge transients are reduced by odd (point-reflected)
//! padding before the first pass.

use tracing::trace;

use crate::error::{SignalError, SignalResult};
use crate::processing::design::FilterCoefficients;

/// Apply `(b, a)` in a single forward pass using Direct Form II Transposed.
///
/// The recurrence is sequential by nature; output length equals input length.
pub fn lfilter(coeffs: &FilterCoefficients, input: &[f64]) -> Vec<f64> {
    let nfilt = coeffs.b.len().max(coeffs.a.len());

    // Pad both coefficient vectors to a common length; a[0] is 1 by design.
    let mut b = vec![0.0; nfilt];
    let mut a = vec![0.0; nfilt];
    b[..coeffs.b.len()].copy_from_slice(&coeffs.b);
    a[..coeffs.a.len()].copy_from_slice(&coeffs.a);

    let state_len = nfilt - 1;
    let mut z = vec![0.0; state_len];
    let mut output = Vec::with_capacity(input.len());

    for &x in input {
        let y = b[0] * x + if state_len > 0 { z[0] } else { 0.0 };
        for i in 0..state_len {
            let carry = if i + 1 < state_len { z[i + 1] } else { 0.0 };
            z[i] = b[i + 1] * x - a[i + 1] * y + carry;
        }
        output.push(y);
    }

    output
}

/// Zero-phase filtering: forward pass, reverse, forward pass, reverse.
///
/// The input is extended on both sides by `coeffs.pad_len()` samples of odd
/// reflection (each edge value mirrored through the end point, `2*x[0] - x[i]`),
/// which keeps the extension continuous in value and slope; the padding is
/// stripped before returning. Fails with [`SignalError::InsufficientSamples`]
/// when the input is not strictly longer than the padding length.
pub fn filtfilt(coeffs: &FilterCoefficients, input: &[f64]) -> SignalResult<Vec<f64>> {
    let pad_len = coeffs.pad_len();
    let n = input.len();

    if n <= pad_len {
        return Err(SignalError::InsufficientSamples {
            required: pad_len,
            got: n,
        });
    }

    trace!(samples = n, pad_len, "zero-phase filter pass");

    let padded = reflect_pad(input, pad_len);

    let mut forward = lfilter(coeffs, &padded);
    forward.reverse();
    let mut backward = lfilter(coeffs, &forward);
    backward.reverse();

    Ok(backward[pad_len..pad_len + n].to_vec())
}

/// Odd reflection padding: values beyond each edge are the edge value mirrored
/// through itself, so a linear trend continues through the boundary.
fn reflect_pad(input: &[f64], pad_len: usize) -> Vec<f64> {
    let n = input.len();
    let mut padded = Vec::with_capacity(n + 2 * pad_len);

    for i in (1..=pad_len).rev() {
        padded.push(2.0 * input[0] - input[i]);
    }
    padded.extend_from_slice(input);
    for i in 1..=pad_len {
        padded.push(2.0 * input[n - 1] - input[n - 1 - i]);
    }

    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::design::FilterSpec;

    #[test]
    fn test_lfilter_moving_average() {
        // FIR moving average of 4: steady-state output is the window mean.
        let coeffs = FilterCoefficients {
            b: vec![0.25, 0.25, 0.25, 0.25],
            a: vec![1.0],
        };
        let x: Vec<f64> = (1..=8).map(|i| i as f64).collect();
        let y = lfilter(&coeffs, &x);

        assert_eq!(y.len(), 8);
        assert!((y[3] - 2.5).abs() < 1e-12); // (1+2+3+4)/4
        assert!((y[7] - 6.5).abs() < 1e-12); // (5+6+7+8)/4
    }

    #[test]
    fn test_lfilter_first_order_impulse_response() {
        // y[n] = x[n] + 0.5*y[n-1] has impulse response 1, 0.5, 0.25, ...
        let coeffs = FilterCoefficients {
            b: vec![1.0],
            a: vec![1.0, -0.5],
        };
        let mut x = vec![0.0; 5];
        x[0] = 1.0;
        let y = lfilter(&coeffs, &x);

        for (i, &v) in y.iter().enumerate() {
            assert!((v - 0.5f64.powi(i as i32)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_filtfilt_preserves_length() {
        let coeffs = FilterSpec::lowpass(50.0, 4, 1000.0).design().unwrap();
        let x: Vec<f64> = (0..200).map(|i| (i as f64 * 0.1).sin()).collect();
        let y = filtfilt(&coeffs, &x).unwrap();
        assert_eq!(y.len(), x.len());
    }

    #[test]
    fn test_filtfilt_insufficient_samples() {
        let coeffs = FilterSpec::bandpass(20.0, 450.0, 4, 1000.0)
            .design()
            .unwrap();
        let x = vec![1.0; 5];
        match filtfilt(&coeffs, &x) {
            Err(SignalError::InsufficientSamples { required, got }) => {
                assert_eq!(required, 27);
                assert_eq!(got, 5);
            }
            other => panic!("expected InsufficientSamples, got {:?}", other),
        }
    }

    #[test]
    fn test_filtfilt_zero_phase_peak_alignment() {
        // A symmetric pulse filtered with zero phase keeps its peak position;
        // a single forward pass shifts it late.
        let fs = 1000.0;
        let coeffs = FilterSpec::lowpass(20.0, 4, fs).design().unwrap();

        let n = 400;
        let center = 200;
        let x: Vec<f64> = (0..n)
            .map(|i| {
                let d = (i as f64 - center as f64) / 15.0;
                (-d * d).exp()
            })
            .collect();

        let zero_phase = filtfilt(&coeffs, &x).unwrap();
        let single_pass = lfilter(&coeffs, &x);

        let argmax = |v: &[f64]| {
            v.iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .map(|(i, _)| i)
                .unwrap()
        };

        let zp_peak = argmax(&zero_phase) as i64;
        assert!((zp_peak - center as i64).abs() <= 1, "peak at {}", zp_peak);
        assert!(argmax(&single_pass) > center, "forward pass should lag");
    }

    #[test]
    fn test_filtfilt_impulse_response_symmetric() {
        let coeffs = FilterSpec::lowpass(50.0, 2, 1000.0).design().unwrap();
        let n = 201;
        let mut x = vec![0.0; n];
        x[100] = 1.0;
        let y = filtfilt(&coeffs, &x).unwrap();

        for off in 1..40 {
            let left = y[100 - off];
            let right = y[100 + off];
            assert!(
                (left - right).abs() < 1e-9,
                "asymmetry at offset {}: {} vs {}",
                off,
                left,
                right
            );
        }
    }

    #[test]
    fn test_reflect_pad_continues_trend() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let padded = reflect_pad(&data, 2);
        assert_eq!(padded, vec![-1.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }
}
