//! Configuration of [`LruReplayBuffer`](super::LruReplayBuffer).
//!
//! The configuration can be built in code with builder-style setters or
//! loaded from a YAML file.
use crate::ReplayBufferError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`LruReplayBuffer`](super::LruReplayBuffer).
///
/// # Examples
///
/// ```rust
/// use rlbird_core::LruReplayBufferConfig;
///
/// let config = LruReplayBufferConfig::default()
///     .capacity(50_000)
///     .batch_size(32)
///     .seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct LruReplayBufferConfig {
    /// Number of records held by the buffer. The oldest record is evicted
    /// when a record is added to a full buffer.
    pub capacity: usize,

    /// Number of records in a batch returned by
    /// [`LruReplayBuffer::get_batch`](super::LruReplayBuffer::get_batch).
    pub batch_size: usize,

    /// Seed of the random number generator used for sampling.
    pub seed: u64,
}

impl Default for LruReplayBufferConfig {
    /// - `capacity = 10000`
    /// - `batch_size = 32`
    /// - `seed = 42`
    fn default() -> Self {
        Self {
            capacity: 10000,
            batch_size: 32,
            seed: 42,
        }
    }
}

impl LruReplayBufferConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the default batch size.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the random seed for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks that the capacity and the batch size are positive.
    pub fn validate(&self) -> Result<(), ReplayBufferError> {
        if self.capacity == 0 {
            return Err(ReplayBufferError::InvalidConfiguration(
                "capacity must be positive".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ReplayBufferError::InvalidConfiguration(
                "batch_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads the configuration from a YAML file.
    ///
    /// The loaded configuration is not validated; the buffer validates it
    /// when it is built.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves the configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
