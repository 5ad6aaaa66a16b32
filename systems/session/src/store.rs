//! Persistence of the best wave reached across sessions.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Errors raised while reading or writing the best-wave record.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record could not be read or written.
    #[error("failed to access best wave record at {path}")]
    Io {
        /// Location of the record.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The record exists but could not be decoded.
    #[error("malformed best wave record: {0}")]
    Malformed(String),
}

/// Storage holding a single integer: the best wave ever reached.
pub trait BestWaveStore: fmt::Debug {
    /// Reads the stored best wave; an absent record reads as zero.
    fn load(&self) -> Result<u32, StoreError>;

    /// Overwrites the stored best wave.
    fn save(&mut self, best_wave: u32) -> Result<(), StoreError>;
}

/// In-memory store, useful for tests and headless runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    best_wave: u32,
}

impl MemoryStore {
    /// Creates a store holding the provided record.
    #[must_use]
    pub const fn new(best_wave: u32) -> Self {
        Self { best_wave }
    }
}

impl BestWaveStore for MemoryStore {
    fn load(&self) -> Result<u32, StoreError> {
        Ok(self.best_wave)
    }

    fn save(&mut self, best_wave: u32) -> Result<(), StoreError> {
        self.best_wave = best_wave;
        Ok(())
    }
}
