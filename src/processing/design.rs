// src/processing/design.rs
//! Butterworth filter design in transfer-function form
//!
//! Produces digital `(b, a)` coefficient pairs from a [`FilterSpec`] via the
//! standard analog-prototype route: prototype poles on the unit circle,
//! frequency pre-warping, lowpass-to-lowpass or lowpass-to-bandpass
//! transformation in zero-pole-gain form, bilinear transform, and polynomial
//! expansion of the complex roots.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{SignalError, SignalResult};

/// Highest supported filter order. Transfer-function polynomials above this
/// lose double precision (a band-pass doubles the polynomial degree).
pub const MAX_ORDER: usize = 8;

/// Filter kind with its cutoff frequencies in Hz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FilterKind {
    Lowpass { cutoff_hz: f64 },
    Bandpass { low_hz: f64, high_hz: f64 },
}

/// Complete specification of a Butterworth filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(flatten)]
    pub kind: FilterKind,
    pub order: usize,
    pub sample_rate_hz: f64,
}

/// Digital filter coefficients, normalized so `a[0] == 1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCoefficients {
    /// Feed-forward (numerator) coefficients
    pub b: Vec<f64>,
    /// Feedback (denominator) coefficients
    pub a: Vec<f64>,
}

impl FilterCoefficients {
    /// Edge padding length used by zero-phase application, `3 * max(len(a), len(b))`.
    /// Inputs must be strictly longer than this.
    pub fn pad_len(&self) -> usize {
        3 * self.a.len().max(self.b.len())
    }
}

impl FilterSpec {
    /// Low-pass specification
    pub fn lowpass(cutoff_hz: f64, order: usize, sample_rate_hz: f64) -> Self {
        Self {
            kind: FilterKind::Lowpass { cutoff_hz },
            order,
            sample_rate_hz,
        }
    }

    /// Band-pass specification
    pub fn bandpass(low_hz: f64, high_hz: f64, order: usize, sample_rate_hz: f64) -> Self {
        Self {
            kind: FilterKind::Bandpass { low_hz, high_hz },
            order,
            sample_rate_hz,
        }
    }

    /// Check all design constraints without designing.
    pub fn validate(&self) -> SignalResult<()> {
        if self.order < 1 || self.order > MAX_ORDER {
            return Err(SignalError::invalid_spec(format!(
                "order must be 1-{}, got {}",
                MAX_ORDER, self.order
            )));
        }
        if self.sample_rate_hz <= 0.0 || !self.sample_rate_hz.is_finite() {
            return Err(SignalError::invalid_spec(format!(
                "sample rate must be positive, got {}",
                self.sample_rate_hz
            )));
        }
        let nyquist = self.sample_rate_hz / 2.0;
        match self.kind {
            FilterKind::Lowpass { cutoff_hz } => {
                if cutoff_hz <= 0.0 || cutoff_hz >= nyquist {
                    return Err(SignalError::invalid_spec(format!(
                        "cutoff {} Hz outside (0, {} Hz)",
                        cutoff_hz, nyquist
                    )));
                }
            }
            FilterKind::Bandpass { low_hz, high_hz } => {
                if low_hz <= 0.0 || high_hz >= nyquist {
                    return Err(SignalError::invalid_spec(format!(
                        "band edges {}-{} Hz outside (0, {} Hz)",
                        low_hz, high_hz, nyquist
                    )));
                }
                if low_hz >= high_hz {
                    return Err(SignalError::invalid_spec(format!(
                        "band low cutoff {} Hz must be below high cutoff {} Hz",
                        low_hz, high_hz
                    )));
                }
            }
        }
        Ok(())
    }

    /// Design the digital Butterworth filter described by this specification.
    ///
    /// Low-pass of order `n` yields `n + 1` coefficients per side; band-pass
    /// yields `2n + 1` (the band transform doubles the polynomial degree).
    pub fn design(&self) -> SignalResult<FilterCoefficients> {
        self.validate()?;

        let nyquist = self.sample_rate_hz / 2.0;
        let proto = butterworth_poles(self.order);

        // Bilinear transform runs at the normalized rate fs = 2, so cutoffs
        // are pre-warped as 2*fs*tan(pi*wn/fs) with wn a fraction of Nyquist.
        let analog = match self.kind {
            FilterKind::Lowpass { cutoff_hz } => {
                let warped = prewarp(cutoff_hz / nyquist);
                lp_to_lp(&proto, warped)
            }
            FilterKind::Bandpass { low_hz, high_hz } => {
                let w1 = prewarp(low_hz / nyquist);
                let w2 = prewarp(high_hz / nyquist);
                let center = (w1 * w2).sqrt();
                let bandwidth = w2 - w1;
                lp_to_bp(&proto, center, bandwidth)
            }
        };

        let digital = bilinear(&analog);
        Ok(digital.into_coefficients())
    }
}

/// Analog filter in zero-pole-gain form
struct Zpk {
    zeros: Vec<Complex64>,
    poles: Vec<Complex64>,
    gain: f64,
}

impl Zpk {
    /// Expand roots into real polynomial coefficients, `b = gain * poly(zeros)`,
    /// `a = poly(poles)`. Roots arrive in conjugate pairs so imaginary parts
    /// cancel; `a[0]` is 1 by construction (monic denominator).
    fn into_coefficients(self) -> FilterCoefficients {
        let b = poly_from_roots(&self.zeros)
            .into_iter()
            .map(|c| c.re * self.gain)
            .collect();
        let a = poly_from_roots(&self.poles)
            .into_iter()
            .map(|c| c.re)
            .collect();
        FilterCoefficients { b, a }
    }
}

/// Butterworth analog prototype: poles evenly spaced on the left half of the
/// unit circle, `s_k = exp(j*pi*(2k + n + 1)/(2n))`, no zeros, unit gain.
fn butterworth_poles(order: usize) -> Zpk {
    let n = order as f64;
    let poles = (0..order)
        .map(|k| {
            let angle = std::f64::consts::PI * (2 * k + order + 1) as f64 / (2.0 * n);
            Complex64::new(angle.cos(), angle.sin())
        })
        .collect();
    Zpk {
        zeros: Vec::new(),
        poles,
        gain: 1.0,
    }
}

/// Pre-warp a normalized cutoff (fraction of Nyquist) for the bilinear
/// transform at fs = 2.
fn prewarp(wn: f64) -> f64 {
    4.0 * (std::f64::consts::PI * wn / 2.0).tan()
}

/// Scale the unit-cutoff prototype to cutoff `wo`: s -> s/wo.
fn lp_to_lp(proto: &Zpk, wo: f64) -> Zpk {
    let degree = proto.poles.len() - proto.zeros.len();
    Zpk {
        zeros: proto.zeros.iter().map(|&z| z * wo).collect(),
        poles: proto.poles.iter().map(|&p| p * wo).collect(),
        gain: proto.gain * wo.powi(degree as i32),
    }
}

/// Band transform s -> (s^2 + wo^2)/(bw*s): every root splits into a pair and
/// the degree doubles, with compensating zeros at the origin.
fn lp_to_bp(proto: &Zpk, wo: f64, bw: f64) -> Zpk {
    let degree = proto.poles.len() - proto.zeros.len();

    let split = |roots: &[Complex64]| -> Vec<Complex64> {
        let mut out = Vec::with_capacity(2 * roots.len());
        for &r in roots {
            let scaled = r * (bw / 2.0);
            let disc = (scaled * scaled - Complex64::new(wo * wo, 0.0)).sqrt();
            out.push(scaled + disc);
            out.push(scaled - disc);
        }
        out
    };

    let mut zeros = split(&proto.zeros);
    zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(degree));

    Zpk {
        zeros,
        poles: split(&proto.poles),
        gain: proto.gain * bw.powi(degree as i32),
    }
}

/// Bilinear transform at fs = 2: maps each analog root s to (4 + s)/(4 - s)
/// and fills the numerator out to full degree with zeros at z = -1.
fn bilinear(analog: &Zpk) -> Zpk {
    let fs2 = Complex64::new(4.0, 0.0);
    let transform = |&r: &Complex64| (fs2 + r) / (fs2 - r);

    let mut zeros: Vec<Complex64> = analog.zeros.iter().map(transform).collect();
    let poles: Vec<Complex64> = analog.poles.iter().map(transform).collect();

    let degree = analog.poles.len() - analog.zeros.len();
    zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(degree));

    // Gain follows the change of variable: k * prod(fs2 - z) / prod(fs2 - p).
    let num: Complex64 = analog.zeros.iter().map(|&z| fs2 - z).product();
    let den: Complex64 = analog.poles.iter().map(|&p| fs2 - p).product();
    let gain = analog.gain * (num / den).re;

    Zpk { zeros, poles, gain }
}

/// Multiply out (x - r_0)(x - r_1)... into descending-power coefficients.
fn poly_from_roots(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, slot) in next.iter_mut().enumerate() {
            if i < coeffs.len() {
                *slot += coeffs[i];
            }
            if i > 0 {
                *slot -= root * coeffs[i - 1];
            }
        }
        coeffs = next;
    }
    coeffs
}
