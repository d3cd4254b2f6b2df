//! Batches of records sampled from [`LruReplayBuffer`](super::LruReplayBuffer).

/// A batch of records borrowed from a replay buffer.
///
/// The batch holds references, not copies. The same record may appear more
/// than once since records are sampled with replacement.
#[derive(Debug)]
pub struct RecordBatch<'a, R> {
    records: Vec<&'a R>,
    ix_sample: Vec<usize>,
}

impl<'a, R> RecordBatch<'a, R> {
    pub(super) fn new(records: Vec<&'a R>, ix_sample: Vec<usize>) -> Self {
        debug_assert_eq!(records.len(), ix_sample.len());
        Self { records, ix_sample }
    }

    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the batch has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns an iterator over the sampled records.
    pub fn iter(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.records.iter().copied()
    }

    /// Sampled records in the order they were drawn.
    pub fn records(&self) -> &[&'a R] {
        &self.records
    }

    /// Slot indices in the buffer from which the records were taken.
    pub fn ix_sample(&self) -> &[usize] {
        &self.ix_sample
    }

    /// Consumes the batch and returns the sampled records.
    pub fn into_records(self) -> Vec<&'a R> {
        self.records
    }
}

impl<'a, R> IntoIterator for RecordBatch<'a, R> {
    type Item = &'a R;
    type IntoIter = std::vec::IntoIter<&'a R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
