//! In-memory record store. Simulates a database table: nothing survives a
//! restart and there is no index beyond the primary key.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use entity::{Record, RecordId};

/// Shared employee table alias.
pub type EmployeeTable = MemoryTable<entity::Employee>;

/// A keyed collection plus its identifier counter, guarded by one lock.
///
/// Every operation, reads included, holds the lock for its whole duration,
/// so callers observe a single total order of operations.
#[derive(Debug)]
pub struct MemoryTable<T> {
    inner: Mutex<TableState<T>>,
}

#[derive(Debug)]
struct TableState<T> {
    rows: BTreeMap<RecordId, T>,
    next_id: RecordId,
}

impl<T: Record> Default for MemoryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> MemoryTable<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TableState {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    // No statement leaves the state half-written, so a poisoned guard is safe to reuse.
    fn state(&self) -> MutexGuard<'_, TableState<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts `record` under a freshly assigned identifier. Any identifier
    /// already on the record is overwritten.
    pub fn create(&self, mut record: T) -> T {
        let mut state = self.state();
        let id = state.next_id;
        state.next_id += 1;
        record.assign_id(id);
        state.rows.insert(id, record.clone());
        record
    }

    pub fn get_by_id(&self, id: RecordId) -> Option<T> {
        self.state().rows.get(&id).cloned()
    }

    /// Replaces the stored record wholesale. Returns `false` without touching
    /// the table when the identifier is unknown.
    pub fn update(&self, record: T) -> bool {
        let mut state = self.state();
        match state.rows.get_mut(&record.id()) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub fn delete(&self, id: RecordId) -> bool {
        self.state().rows.remove(&id).is_some()
    }

    /// Returns one page of records in ascending identifier order.
    ///
    /// Pages are 1-based. A page or page size below 1, or a window starting
    /// past the last record, yields an empty page; a window running past the
    /// end is clamped.
    pub fn list(&self, page: i64, page_size: i64) -> Vec<T> {
        let state = self.state();
        let Some(window) = PageWindow::new(page, page_size) else {
            return Vec::new();
        };
        state
            .rows
            .values()
            .skip(window.start)
            .take(window.len)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Offset and length of a page, or `None` when the request cannot select
/// anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PageWindow {
    start: usize,
    len: usize,
}

impl PageWindow {
    fn new(page: i64, page_size: i64) -> Option<Self> {
        if page < 1 || page_size < 1 {
            return None;
        }
        let start = (page - 1).checked_mul(page_size)?;
        Some(Self {
            start: usize::try_from(start).ok()?,
            len: usize::try_from(page_size).ok()?,
        })
    }
}
