// src/io/recording.rs
//! In-memory recording of named channels at a common sampling rate

use serde::{Deserialize, Serialize};

use crate::error::{SignalError, SignalResult};

/// One channel of a recording: a name and its sample sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub samples: Vec<f64>,
}

impl Channel {
    pub fn new(name: impl Into<String>, samples: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }
}

/// A set of named channels sharing one sampling rate, e.g. the six muscles of
/// an EMG trial or the three joint angles of an IMU trial. This is the
/// in-memory form of the data-source contract; how the data got here (CSV,
/// synthesis, another process) is not the pipeline's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    sample_rate_hz: f64,
    channels: Vec<Channel>,
}

impl Recording {
    /// Empty recording at the given sampling rate.
    pub fn new(sample_rate_hz: f64) -> Self {
        Self {
            sample_rate_hz,
            channels: Vec::new(),
        }
    }

    /// Builder-style channel insertion.
    pub fn with_channel(mut self, name: impl Into<String>, samples: Vec<f64>) -> Self {
        self.push_channel(name, samples);
        self
    }

    /// Append a channel. A duplicate name replaces the previous channel.
    pub fn push_channel(&mut self, name: impl Into<String>, samples: Vec<f64>) {
        let name = name.into();
        if let Some(existing) = self.channels.iter_mut().find(|c| c.name == name) {
            existing.samples = samples;
        } else {
            self.channels.push(Channel::new(name, samples));
        }
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Look up one channel's samples by name.
    pub fn channel(&self, name: &str) -> SignalResult<&[f64]> {
        self.channels
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.samples.as_slice())
            .ok_or_else(|| SignalError::MissingChannel {
                name: name.to_string(),
            })
    }
}
