// src/io/mod.rs
//! Data source and sink contracts
//!
//! The pipeline consumes named channels plus a sampling rate and produces the
//! same shape back; where the data lives is the adapter's business. Anything
//! that can yield a [`Recording`] is a source, anything that accepts one is a
//! sink. The pipeline itself never touches a file path.

pub mod csv;
pub mod recording;

pub use csv::{CsvSink, CsvSource};
pub use recording::{Channel, Recording};

use crate::error::SignalResult;

/// Supplier of named channels at a common sampling rate.
pub trait ChannelSource {
    fn read(&mut self) -> SignalResult<Recording>;
}

/// Consumer of processed channel sets.
pub trait ChannelSink {
    fn write(&mut self, recording: &Recording) -> SignalResult<()>;
}

/// Sink that keeps every written recording in memory; useful in tests and
/// when a caller wants the results back as plain data.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub recordings: Vec<Recording>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChannelSink for MemorySink {
    fn write(&mut self, recording: &Recording) -> SignalResult<()> {
        self.recordings.push(recording.clone());
        Ok(())
    }
}

/// A `Recording` is trivially its own source.
impl ChannelSource for Recording {
    fn read(&mut self) -> SignalResult<Recording> {
        Ok(self.clone())
    }
}
