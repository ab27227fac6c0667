// src/io/csv.rs
//! CSV adapters for the source/sink contracts
//!
//! Wide-table layout: one column per channel, one row per sample instant,
//! header row carries the channel names. A `Time` or `Time_s` column is
//! tolerated on read and skipped; the sampling rate is supplied by the
//! caller since CSV carries no rate metadata.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{SignalError, SignalResult};
use crate::io::recording::Recording;
use crate::io::{ChannelSink, ChannelSource};

const TIME_COLUMNS: [&str; 2] = ["Time", "Time_s"];

/// Reads one wide-table CSV file into a [`Recording`].
pub struct CsvSource {
    path: PathBuf,
    sample_rate_hz: f64,
}

impl CsvSource {
    pub fn new(path: impl AsRef<Path>, sample_rate_hz: f64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sample_rate_hz,
        }
    }
}

impl ChannelSource for CsvSource {
    fn read(&mut self) -> SignalResult<Recording> {
        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| SignalError::io("csv open", e))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| SignalError::io("csv header", e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let keep: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, name)| !TIME_COLUMNS.contains(&name.as_str()))
            .map(|(i, _)| i)
            .collect();

        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); keep.len()];
        for (row_idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| SignalError::io("csv read", e))?;
            for (slot, &col) in columns.iter_mut().zip(&keep) {
                let field = record.get(col).unwrap_or("");
                let value: f64 = field.trim().parse().map_err(|_| {
                    SignalError::io(
                        "csv parse",
                        format!(
                            "row {} column '{}': not a number: '{}'",
                            row_idx + 2,
                            headers[col],
                            field
                        ),
                    )
                })?;
                slot.push(value);
            }
        }

        let mut recording = Recording::new(self.sample_rate_hz);
        for (&col, samples) in keep.iter().zip(columns) {
            recording.push_channel(headers[col].clone(), samples);
        }

        debug!(
            path = %self.path.display(),
            channels = recording.len(),
            "loaded recording from csv"
        );
        Ok(recording)
    }
}

/// Writes a [`Recording`] to one wide-table CSV file.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ChannelSink for CsvSink {
    fn write(&mut self, recording: &Recording) -> SignalResult<()> {
        let mut writer = csv::Writer::from_path(&self.path)
            .map_err(|e| SignalError::io("csv create", e))?;

        writer
            .write_record(recording.channel_names())
            .map_err(|e| SignalError::io("csv header", e))?;

        let rows = recording
            .channels()
            .iter()
            .map(|c| c.samples.len())
            .max()
            .unwrap_or(0);

        for row in 0..rows {
            let record: Vec<String> = recording
                .channels()
                .iter()
                .map(|c| {
                    c.samples
                        .get(row)
                        .map(|v| v.to_string())
                        .unwrap_or_default()
                })
                .collect();
            writer
                .write_record(&record)
                .map_err(|e| SignalError::io("csv write", e))?;
        }

        writer.flush().map_err(|e| SignalError::io("csv flush", e))?;
        debug!(path = %self.path.display(), rows, "wrote recording to csv");
        Ok(())
    }
}
