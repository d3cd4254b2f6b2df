//! Replay buffer interface for reinforcement learning.
//!
//! Replay buffers sit between the process that produces experiences
//! (interaction with an environment) and the process that consumes them
//! (optimization of an agent). The two sides are expressed as separate traits,
//! [`ExperienceBufferBase`] for producers and [`ReplayBufferBase`] for
//! consumers.

use anyhow::Result;

/// Interface for buffers that store experiences from environments.
///
/// # Examples
///
/// ```ignore
/// struct SimpleBuffer<T> {
///     items: Vec<T>,
/// }
///
/// impl<T> ExperienceBufferBase for SimpleBuffer<T> {
///     type Item = T;
///
///     fn push(&mut self, tr: T) -> Result<()> {
///         self.items.push(tr);
///         Ok(())
///     }
///
///     fn len(&self) -> usize {
///         self.items.len()
///     }
/// }
/// ```
pub trait ExperienceBufferBase {
    /// The type of items stored in the buffer.
    ///
    /// This can be any type that represents an experience or transition
    /// from the environment.
    type Item;

    /// Pushes a new experience into the buffer.
    ///
    /// # Arguments
    ///
    /// * `tr` - The experience to store
    ///
    /// # Returns
    ///
    /// `Ok(())` if the push was successful, or an error if it failed
    fn push(&mut self, tr: Self::Item) -> Result<()>;

    /// Returns the number of experiences currently stored in the buffer.
    ///
    /// # Returns
    ///
    /// The number of experiences currently stored
    fn len(&self) -> usize;

    /// Returns `true` if no experience has been stored yet.
    ///
    /// # Returns
    ///
    /// `true` if [`ExperienceBufferBase::len`] is zero
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interface for replay buffers that generate batches for training.
///
/// Batches may borrow from the buffer. Items displaced from the buffer while
/// a consumer might still rely on them are kept aside until the consumer calls
/// [`ReplayBufferBase::finalize`].
pub trait ReplayBufferBase {
    /// Configuration parameters for the replay buffer.
    ///
    /// This type must implement `Clone` to support building multiple instances
    /// with the same configuration.
    type Config: Clone;

    /// The type of batch generated for training.
    ///
    /// A batch may borrow the experiences it contains from the buffer, for
    /// the lifetime `'a` of that borrow.
    type Batch<'a>
    where
        Self: 'a;

    /// Builds a new replay buffer from the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration parameters
    ///
    /// # Returns
    ///
    /// A new instance of the replay buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Constructs a batch of experiences for training.
    ///
    /// # Arguments
    ///
    /// * `size` - The number of experiences to include in the batch
    ///
    /// # Returns
    ///
    /// A batch of experiences
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot produce a batch, e.g. when it is
    /// empty.
    fn batch(&mut self, size: usize) -> Result<Self::Batch<'_>>;

    /// Releases the items displaced from the buffer since the last call.
    ///
    /// Consumers call this once they no longer hold any batch obtained
    /// before those items were displaced. Calling it when nothing has been
    /// displaced does nothing.
    fn finalize(&mut self);
}
