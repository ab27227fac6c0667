//! Gait-Signal: EMG and IMU signal conditioning for biomechanics analysis
//!
//! This library packages the standard conditioning chain applied to
//! electromyography and inertial-measurement recordings in gait analysis:
//!
//! - Butterworth filter design (band-pass and low-pass) in transfer-function form
//! - Zero-phase (forward-backward) filter application
//! - Rectification and amplitude envelope extraction (low-pass or moving RMS)
//! - Per-channel pipeline orchestration with normalization
//! - Source/sink contracts so data loading stays out of the processing core
//!
//! # Quick Start
//!
//! ```rust
//! use gait_signal::processing::{SignalPipeline, StagePlan};
//! use gait_signal::io::Recording;
//!
//! fn main() -> Result<(), gait_signal::SignalError> {
//!     let fs = 1000.0;
//!     let raw: Vec<f64> = (0..2000)
//!         .map(|i| (2.0 * std::f64::consts::PI * 80.0 * i as f64 / fs).sin())
//!         .collect();
//!
//!     let recording = Recording::new(fs).with_channel("RF", raw);
//!     let pipeline = SignalPipeline::new(StagePlan::emg(fs), fs)?;
//!     let activations = pipeline.process(&recording)?;
//!
//!     assert_eq!(activations.channel("RF")?.len(), 2000);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod processing;

// Re-export commonly used types for convenience
pub use error::{SignalError, SignalResult};
pub use io::{ChannelSink, ChannelSource, Recording};
pub use processing::{EnvelopeSpec, FilterKind, FilterSpec, SignalPipeline, StagePlan};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
