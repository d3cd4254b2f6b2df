#![warn(missing_docs)]
//! Experience replay for reinforcement learning.
//!
//! This crate provides [`LruReplayBuffer`], a fixed-capacity ring of records
//! produced by an environment and sampled by a trainer. When the ring is full,
//! every new record evicts the oldest one. Evicted records are not released
//! in place: they wait in a pending list until the trainer calls
//! [`LruReplayBuffer::finalize_pending`], after it has finished with the
//! batches it sampled before the eviction.
//!
//! ```
//! use rlbird_core::{
//!     dummy::{DummyRecord, ReleaseLog},
//!     LruReplayBuffer, LruReplayBufferConfig,
//! };
//!
//! # fn main() -> Result<(), rlbird_core::ReplayBufferError> {
//! let log = ReleaseLog::default();
//! let config = LruReplayBufferConfig::default().capacity(3).batch_size(2);
//! let mut buffer = LruReplayBuffer::new(&config)?;
//!
//! for id in 0..4 {
//!     buffer.push(DummyRecord::new(id, &log));
//! }
//! assert_eq!(buffer.num_pending(), 1);
//!
//! let batch = buffer.get_batch()?;
//! assert!(batch.iter().all(|r| r.id() != 0));
//!
//! buffer.finalize_pending();
//! assert_eq!(log.released(), vec![0]);
//! # Ok(())
//! # }
//! ```
pub mod dummy;
pub mod error;
pub mod lru_replay_buffer;

mod base;
pub use base::{ExperienceBufferBase, Release, ReplayBufferBase};
pub use error::ReplayBufferError;
pub use lru_replay_buffer::{LruReplayBuffer, LruReplayBufferConfig, RecordBatch};
