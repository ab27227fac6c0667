// src/processing/mod.rs
//! Signal conditioning stages and their orchestration

pub mod design;
pub mod envelope;
pub mod pipeline;
pub mod zero_phase;

pub use design::{FilterCoefficients, FilterKind, FilterSpec, MAX_ORDER};
pub use envelope::{rectify, EnvelopeSpec};
pub use pipeline::{normalize, remove_offset, scale_activation, SignalPipeline, StagePlan};
pub use zero_phase::{filtfilt, lfilter};
