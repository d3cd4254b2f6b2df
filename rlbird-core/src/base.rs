//! Core interfaces of the library.
mod record;
mod replay_buffer;
pub use record::Release;
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
