//! Replay buffer that always evicts its oldest record.
//!
//! [`LruReplayBuffer`] stores records in a preallocated ring. Batches are drawn
//! uniformly at random, with replacement, from the records currently in the
//! ring. Once the ring is full, each new record displaces the oldest one into
//! a pending list, and the displaced records are released together by
//! [`LruReplayBuffer::finalize_pending`].
//!
//! # Key Components
//!
//! - [`LruReplayBuffer`]: the ring of records
//! - [`RecordBatch`]: a batch of records borrowed from the buffer
//! - [`LruReplayBufferConfig`]: capacity, default batch size and sampling seed
mod base;
mod batch;
mod config;
pub use base::LruReplayBuffer;
pub use batch::RecordBatch;
pub use config::LruReplayBufferConfig;
