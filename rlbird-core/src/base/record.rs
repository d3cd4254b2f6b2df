//! Records stored in replay buffers.

/// A record that owns resources to be freed when it leaves a replay buffer.
///
/// Replay buffers never look inside a record. They keep it, lend it out in
/// batches and eventually hand it back through [`Release::release`].
///
/// `release` takes `self` by value, so a buffer can release a record at most
/// once. What a second release would mean for records that share resources
/// (for example through reference-counted handles) is up to the implementor.
///
/// # Examples
///
/// ```
/// use rlbird_core::Release;
///
/// struct Step {
///     frames: Vec<u8>,
/// }
///
/// impl Release for Step {
///     fn release(self) {
///         drop(self.frames);
///     }
/// }
/// ```
pub trait Release {
    /// Frees the resources held by the record.
    fn release(self);
}
