//! Records for tests and examples.
//!
//! [`DummyRecord`] carries nothing but an id. Releasing it appends the id to a
//! shared [`ReleaseLog`], which lets tests check when and in which order
//! records leave a replay buffer.
use crate::Release;
use std::{cell::RefCell, rc::Rc};

/// Ids of released records, in release order.
#[derive(Clone, Debug, Default)]
pub struct ReleaseLog(Rc<RefCell<Vec<usize>>>);

impl ReleaseLog {
    /// Returns the ids released so far.
    pub fn released(&self) -> Vec<usize> {
        self.0.borrow().clone()
    }

    /// Returns `true` if the record with the given id has been released.
    pub fn is_released(&self, id: usize) -> bool {
        self.0.borrow().contains(&id)
    }
}

/// Dummy record.
#[derive(Debug)]
pub struct DummyRecord {
    id: usize,
    log: ReleaseLog,
}

impl DummyRecord {
    /// Creates a record reporting its release to `log`.
    pub fn new(id: usize, log: &ReleaseLog) -> Self {
        Self {
            id,
            log: log.clone(),
        }
    }

    /// Id of the record.
    pub fn id(&self) -> usize {
        self.id
    }
}

impl Release for DummyRecord {
    fn release(self) {
        self.log.0.borrow_mut().push(self.id);
    }
}
