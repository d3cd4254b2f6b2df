//! Ring of records with FIFO eviction and deferred release.
use super::{LruReplayBufferConfig, RecordBatch};
use crate::{ExperienceBufferBase, Release, ReplayBufferBase, ReplayBufferError};
use anyhow::Result;
use log::{debug, info, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// A replay buffer that samples uniformly and evicts its oldest record.
///
/// Records fill the slots from left to right until the buffer reaches its
/// capacity. From then on the slots form a ring whose logically-oldest record
/// sits at `oldest`, and each new record overwrites that slot. The displaced
/// record is moved to a pending list instead of being released, because a
/// consumer may still use a batch sampled before the eviction.
/// [`LruReplayBuffer::finalize_pending`] releases the pending records.
///
/// Each slot goes through the following states:
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> Empty
///     Empty --> Occupied: push
///     Occupied --> PendingRelease: overwritten by push
///     PendingRelease --> Released: finalize_pending
///     Released --> [*]
/// ```
///
/// A slot that has been overwritten holds the new record right away, so from
/// the point of view of the slot the cycle continues at `Occupied`.
///
/// # Examples
///
/// ```
/// use rlbird_core::{
///     dummy::{DummyRecord, ReleaseLog},
///     LruReplayBuffer, LruReplayBufferConfig,
/// };
///
/// # fn main() -> Result<(), rlbird_core::ReplayBufferError> {
/// let log = ReleaseLog::default();
/// let mut buffer = LruReplayBuffer::new(&LruReplayBufferConfig::default().capacity(2))?;
///
/// buffer.push(DummyRecord::new(0, &log));
/// buffer.push(DummyRecord::new(1, &log));
/// buffer.push(DummyRecord::new(2, &log));
///
/// let ids = buffer.iter().map(|r| r.id()).collect::<Vec<_>>();
/// assert_eq!(ids, vec![1, 2]);
/// assert!(log.released().is_empty());
///
/// buffer.finalize_pending();
/// assert_eq!(log.released(), vec![0]);
/// # Ok(())
/// # }
/// ```
pub struct LruReplayBuffer<R>
where
    R: Release,
{
    /// Number of slots.
    capacity: usize,

    /// Batch size used by [`LruReplayBuffer::get_batch`].
    batch_size: usize,

    /// Resident records. Space for `capacity` records is reserved up front;
    /// the vector grows until it reaches `capacity` and
    /// keeps that length afterwards.
    slots: Vec<R>,

    /// Slot of the logically-oldest record. Stays at 0 until the buffer is full.
    oldest: usize,

    /// Records evicted since the last call of `finalize_pending`, in eviction order.
    pending: Vec<R>,

    /// Random number generator for sampling.
    rng: StdRng,
}

impl<R> LruReplayBuffer<R>
where
    R: Release,
{
    /// Creates an empty buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayBufferError::InvalidConfiguration`] if the capacity or
    /// the batch size is zero, or if the slots for `capacity` records cannot
    /// be allocated.
    pub fn new(config: &LruReplayBufferConfig) -> Result<Self, ReplayBufferError> {
        config.validate()?;
        let mut slots = Vec::new();
        slots.try_reserve_exact(config.capacity).map_err(|e| {
            ReplayBufferError::InvalidConfiguration(format!(
                "cannot allocate {} slots: {}",
                config.capacity, e
            ))
        })?;
        info!(
            "Build LruReplayBuffer: capacity = {}, batch_size = {}",
            config.capacity, config.batch_size
        );

        Ok(Self {
            capacity: config.capacity,
            batch_size: config.batch_size,
            slots,
            oldest: 0,
            pending: Vec::new(),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Number of slots of the buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Batch size used by [`LruReplayBuffer::get_batch`].
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of resident records.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no record has been added yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns `true` if the next push evicts a record.
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// Number of evicted records waiting for [`LruReplayBuffer::finalize_pending`].
    pub fn num_pending(&self) -> usize {
        self.pending.len()
    }

    /// Evicted records waiting for release, in eviction order.
    pub fn pending(&self) -> &[R] {
        &self.pending
    }

    /// Adds a record.
    ///
    /// If the buffer is full, the oldest record is moved to the pending list.
    /// It is not released until [`LruReplayBuffer::finalize_pending`] is called.
    pub fn push(&mut self, record: R) {
        if self.slots.len() < self.capacity {
            self.slots.push(record);
            return;
        }

        let ix = self.oldest;
        let evicted = std::mem::replace(&mut self.slots[ix], record);
        self.pending.push(evicted);
        self.oldest = (self.oldest + 1) % self.capacity;
        trace!(
            "Evicted record in slot {}, {} record(s) pending release",
            ix,
            self.pending.len()
        );
    }

    /// Returns the record at logical position `ix`, where 0 is the oldest
    /// resident record.
    pub fn get(&self, ix: usize) -> Option<&R> {
        if ix < self.slots.len() {
            Some(&self.slots[(self.oldest + ix) % self.capacity])
        } else {
            None
        }
    }

    /// Returns an iterator over the resident records from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        let (newer, older) = self.slots.split_at(self.oldest);
        older.iter().chain(newer.iter())
    }

    /// Draws `size` slot indices uniformly, with replacement, from the
    /// resident records.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayBufferError::EmptyBuffer`] if no record has been added.
    pub fn sample_indices(&mut self, size: usize) -> Result<Vec<usize>, ReplayBufferError> {
        let len = self.slots.len();
        if len == 0 {
            return Err(ReplayBufferError::EmptyBuffer);
        }

        let oldest = self.oldest;
        let capacity = self.capacity;
        let rng = &mut self.rng;
        let ixs = (0..size)
            .map(|_| (oldest + rng.gen_range(0..len)) % capacity)
            .collect();
        Ok(ixs)
    }

    /// Samples a batch of `size` resident records with replacement.
    ///
    /// `size` may exceed the number of resident records, in which case the
    /// batch necessarily contains duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayBufferError::EmptyBuffer`] if no record has been added.
    pub fn sample(&mut self, size: usize) -> Result<RecordBatch<'_, R>, ReplayBufferError> {
        let ixs = self.sample_indices(size)?;
        let slots = &self.slots;
        let records = ixs.iter().map(|&ix| &slots[ix]).collect();
        Ok(RecordBatch::new(records, ixs))
    }

    /// Samples a batch of the configured batch size.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayBufferError::EmptyBuffer`] if no record has been added.
    pub fn get_batch(&mut self) -> Result<RecordBatch<'_, R>, ReplayBufferError> {
        self.sample(self.batch_size)
    }

    /// Releases all evicted records in eviction order.
    ///
    /// Call this only after the batches sampled before the evictions are no
    /// longer in use. Does nothing if no record is pending.
    pub fn finalize_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let n = self.pending.len();
        for record in self.pending.drain(..) {
            record.release();
        }
        debug!("Released {} evicted record(s)", n);
    }

    /// Releases the pending records and then the resident records from oldest
    /// to newest, consuming the buffer.
    pub fn release_all(mut self) {
        self.finalize_pending();

        let n = self.slots.len();
        let mut slots = self.slots;
        slots.rotate_left(self.oldest);
        for record in slots {
            record.release();
        }
        debug!("Released {} resident record(s)", n);
    }
}

impl<R> ExperienceBufferBase for LruReplayBuffer<R>
where
    R: Release,
{
    type Item = R;

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        LruReplayBuffer::push(self, tr);
        Ok(())
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}

impl<R> ReplayBufferBase for LruReplayBuffer<R>
where
    R: Release,
{
    type Config = LruReplayBufferConfig;
    type Batch<'a> = RecordBatch<'a, R> where Self: 'a;

    fn build(config: &Self::Config) -> Result<Self> {
        Ok(Self::new(config)?)
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch<'_>> {
        Ok(self.sample(size)?)
    }

    fn finalize(&mut self) {
        self.finalize_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{DummyRecord, ReleaseLog};
    use test_log::test;

    fn buffer(capacity: usize, batch_size: usize) -> LruReplayBuffer<DummyRecord> {
        let config = LruReplayBufferConfig::default()
            .capacity(capacity)
            .batch_size(batch_size);
        LruReplayBuffer::new(&config).unwrap()
    }

    fn resident_ids(buffer: &LruReplayBuffer<DummyRecord>) -> Vec<usize> {
        buffer.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_invalid_configuration() {
        let config = LruReplayBufferConfig::default().capacity(0);
        assert!(matches!(
            LruReplayBuffer::<DummyRecord>::new(&config),
            Err(ReplayBufferError::InvalidConfiguration(_))
        ));

        let config = LruReplayBufferConfig::default().capacity(1 << 60);
        assert!(matches!(
            LruReplayBuffer::<DummyRecord>::new(&config),
            Err(ReplayBufferError::InvalidConfiguration(_))
        ));

        let config = LruReplayBufferConfig::default().batch_size(0);
        let err = LruReplayBuffer::<DummyRecord>::build(&config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ReplayBufferError>(),
            Some(ReplayBufferError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_fill_without_eviction() {
        let log = ReleaseLog::default();
        let mut buffer = buffer(3, 2);

        for id in 0..3 {
            assert!(!buffer.is_full());
            buffer.push(DummyRecord::new(id, &log));
        }

        assert!(buffer.is_full());
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.num_pending(), 0);
        assert_eq!(resident_ids(&buffer), vec![0, 1, 2]);
    }

    #[test]
    fn test_evicts_oldest_first() {
        let log = ReleaseLog::default();
        let mut buffer = buffer(3, 2);

        for id in 0..4 {
            buffer.push(DummyRecord::new(id, &log));
        }

        assert_eq!(buffer.len(), 3);
        assert_eq!(resident_ids(&buffer), vec![1, 2, 3]);
        let pending = buffer.pending().iter().map(|r| r.id()).collect::<Vec<_>>();
        assert_eq!(pending, vec![0]);
        assert!(log.released().is_empty());
    }

    #[test]
    fn test_ring_wraps_around() {
        let log = ReleaseLog::default();
        let mut buffer = buffer(3, 2);

        for id in 0..10 {
            buffer.push(DummyRecord::new(id, &log));
            assert!(buffer.len() <= buffer.capacity());
        }

        assert_eq!(resident_ids(&buffer), vec![7, 8, 9]);
        assert_eq!(buffer.get(0).map(|r| r.id()), Some(7));
        assert_eq!(buffer.get(2).map(|r| r.id()), Some(9));
        assert!(buffer.get(3).is_none());

        let pending = buffer.pending().iter().map(|r| r.id()).collect::<Vec<_>>();
        assert_eq!(pending, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_capacity_one() {
        let log = ReleaseLog::default();
        let mut buffer = buffer(1, 1);

        for id in 0..3 {
            buffer.push(DummyRecord::new(id, &log));
            assert_eq!(resident_ids(&buffer), vec![id]);
        }
        assert_eq!(buffer.num_pending(), 2);

        buffer.finalize_pending();
        assert_eq!(log.released(), vec![0, 1]);
    }

    #[test]
    fn test_finalize_pending() {
        let log = ReleaseLog::default();
        let mut buffer = buffer(2, 2);

        // No-op on an empty pending list
        buffer.finalize_pending();
        assert!(log.released().is_empty());

        for id in 0..5 {
            buffer.push(DummyRecord::new(id, &log));
        }
        assert_eq!(buffer.num_pending(), 3);

        buffer.finalize_pending();
        assert_eq!(log.released(), vec![0, 1, 2]);
        assert_eq!(buffer.num_pending(), 0);

        buffer.finalize_pending();
        assert_eq!(log.released(), vec![0, 1, 2]);
        for id in resident_ids(&buffer) {
            assert!(!log.is_released(id));
        }
    }

    #[test]
    fn test_sample_empty_buffer() {
        let mut buffer = buffer(1, 1);
        assert_eq!(buffer.sample(1).err(), Some(ReplayBufferError::EmptyBuffer));
        assert_eq!(buffer.get_batch().err(), Some(ReplayBufferError::EmptyBuffer));

        let err = ReplayBufferBase::batch(&mut buffer, 1).err().unwrap();
        assert_eq!(
            err.downcast_ref::<ReplayBufferError>(),
            Some(&ReplayBufferError::EmptyBuffer)
        );
    }

    #[test]
    fn test_sample_resident_only() {
        let log = ReleaseLog::default();
        let mut buffer = buffer(4, 16);

        for id in 0..11 {
            buffer.push(DummyRecord::new(id, &log));
        }
        let resident = resident_ids(&buffer);
        assert_eq!(resident, vec![7, 8, 9, 10]);

        let batch = buffer.sample(1000).unwrap();
        assert_eq!(batch.len(), 1000);
        assert!(batch.iter().all(|r| resident.contains(&r.id())));
        for id in resident.iter() {
            assert!(batch.iter().any(|r| r.id() == *id));
        }
    }

    #[test]
    fn test_sample_partially_filled() {
        let log = ReleaseLog::default();
        let mut buffer = buffer(10, 4);

        buffer.push(DummyRecord::new(0, &log));
        buffer.push(DummyRecord::new(1, &log));

        let batch = buffer.get_batch().unwrap();
        assert_eq!(batch.len(), 4);
        assert!(batch.ix_sample().iter().all(|&ix| ix < 2));
        assert!(batch.iter().all(|r| r.id() < 2));
    }

    #[test]
    fn test_sample_uniform() {
        let log = ReleaseLog::default();
        let mut buffer = buffer(4, 1);

        for id in 0..6 {
            buffer.push(DummyRecord::new(id, &log));
        }

        let n_samples = 40_000;
        let mut counts = [0usize; 4];
        for ix in buffer.sample_indices(n_samples).unwrap() {
            counts[ix] += 1;
        }

        let expected = n_samples / 4;
        for &n in counts.iter() {
            assert!(n > expected * 9 / 10 && n < expected * 11 / 10, "{:?}", counts);
        }
    }

    #[test]
    fn test_ix_sample_matches_records() {
        let log = ReleaseLog::default();
        let mut buffer = buffer(3, 8);

        for id in 0..5 {
            buffer.push(DummyRecord::new(id, &log));
        }

        // Slots after wrapping: [3, 4, 2]
        let slot_ids = [3, 4, 2];
        let batch = buffer.get_batch().unwrap();
        for (r, &ix) in batch.iter().zip(batch.ix_sample().iter()) {
            assert_eq!(r.id(), slot_ids[ix]);
        }
    }

    #[test]
    fn test_same_seed_same_batches() {
        let log = ReleaseLog::default();
        let mut buffer1 = buffer(5, 3);
        let mut buffer2 = buffer(5, 3);

        for id in 0..7 {
            buffer1.push(DummyRecord::new(id, &log));
            buffer2.push(DummyRecord::new(id, &log));
        }

        for _ in 0..10 {
            let ixs1 = buffer1.sample_indices(3).unwrap();
            let ixs2 = buffer2.sample_indices(3).unwrap();
            assert_eq!(ixs1, ixs2);
        }
    }

    #[test]
    fn test_release_all() {
        let log = ReleaseLog::default();
        let mut buffer = buffer(3, 2);

        for id in 0..5 {
            buffer.push(DummyRecord::new(id, &log));
        }

        buffer.release_all();
        assert_eq!(log.released(), vec![0, 1, 2, 3, 4]);
    }
}
