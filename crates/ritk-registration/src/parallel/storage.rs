//! Per-worker slot storage.
//!
//! Each worker of a run owns exactly one [`WorkerSlot`] and writes only to
//! it, so accumulation needs no synchronization. Slots are keyed either by
//! worker index (fixed thread pool) or handed out as task-local accumulators
//! by the work-stealing scheduler; in both cases the reduction stage sees
//! the same [`WorkerStorage`].

/// One worker's lazily created value.
#[derive(Debug)]
pub struct WorkerSlot<T> {
    value: Option<T>,
}

impl<T> Default for WorkerSlot<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> WorkerSlot<T> {
    /// Return the slot's value, creating it on first use.
    pub fn get_or_create(&mut self, create: impl FnOnce() -> T) -> &mut T {
        self.value.get_or_insert_with(create)
    }

    pub fn is_allocated(&self) -> bool {
        self.value.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

/// All worker slots of one run.
#[derive(Debug)]
pub struct WorkerStorage<T> {
    slots: Vec<WorkerSlot<T>>,
}

impl<T> WorkerStorage<T> {
    /// Storage with one empty slot per worker index.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            slots: (0..workers).map(|_| WorkerSlot::default()).collect(),
        }
    }

    /// Slots addressed by worker index.
    pub fn slots_mut(&mut self) -> &mut [WorkerSlot<T>] {
        &mut self.slots
    }

    /// Number of slots, allocated or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots a worker actually used.
    pub fn allocated(&self) -> usize {
        self.slots.iter().filter(|s| s.is_allocated()).count()
    }

    /// Iterate over every value a worker created.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(WorkerSlot::get)
    }
}

impl<T> FromIterator<WorkerSlot<T>> for WorkerStorage<T> {
    fn from_iter<I: IntoIterator<Item = WorkerSlot<T>>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for WorkerStorage<T> {
    type Item = T;
    type IntoIter = std::iter::FilterMap<std::vec::IntoIter<WorkerSlot<T>>, fn(WorkerSlot<T>) -> Option<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots
            .into_iter()
            .filter_map(WorkerSlot::into_inner as fn(WorkerSlot<T>) -> Option<T>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_created_lazily() {
        let mut storage = WorkerStorage::<Vec<u64>>::with_workers(3);
        assert_eq!(storage.len(), 3);
        assert_eq!(storage.allocated(), 0);

        storage.slots_mut()[1].get_or_create(|| vec![0; 4])[2] += 1;
        storage.slots_mut()[1].get_or_create(|| vec![9; 4])[2] += 1;

        assert_eq!(storage.allocated(), 1);
        let values: Vec<&Vec<u64>> = storage.iter().collect();
        assert_eq!(values, vec![&vec![0, 0, 2, 0]]);
    }

    #[test]
    fn test_collect_task_local_slots() {
        let slots = (0..4).map(|i| {
            let mut slot = WorkerSlot::default();
            if i % 2 == 0 {
                *slot.get_or_create(|| 0) += i;
            }
            slot
        });
        let storage: WorkerStorage<i32> = slots.collect();
        assert_eq!(storage.len(), 4);
        assert_eq!(storage.into_iter().collect::<Vec<_>>(), vec![0, 2]);
    }
}
