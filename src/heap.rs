use ordered_float::OrderedFloat;

/// Binary min-heap over `f32` keys with stable handles.
///
/// Every inserted key gets a handle, numbered from zero in insertion order,
/// which stays valid until the key is popped. Handles are never reused, so a
/// caller can keep its own per-handle data in a plain `Vec`.
///
/// A position map from handle to heap slot makes `decrease_key` O(log n).
#[derive(Debug, Clone, Default)]
pub struct IndirectHeap {
    /// Key at each heap slot
    keys: Vec<OrderedFloat<f32>>,
    /// Handle stored at each heap slot
    handles: Vec<usize>,
    /// Heap slot of each handle, `None` once popped
    slots: Vec<Option<usize>>,
}

impl IndirectHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            handles: Vec::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Makes room for at least `capacity` handles without reallocating
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.slots.capacity() {
            let additional = capacity - self.slots.len();
            self.slots.reserve_exact(additional);
            self.keys.reserve_exact(capacity.saturating_sub(self.keys.len()));
            self.handles
                .reserve_exact(capacity.saturating_sub(self.handles.len()));
        }
    }

    /// Inserts a key and returns its handle.
    ///
    /// Storage doubles whenever it runs full.
    pub fn insert(&mut self, key: f32) -> usize {
        assert!(!key.is_nan(), "Heap key must not be NaN");

        if self.slots.len() == self.slots.capacity() {
            let additional = self.slots.capacity().max(1);
            self.slots.reserve_exact(additional);
            self.keys.reserve_exact(additional);
            self.handles.reserve_exact(additional);
        }

        let handle = self.slots.len();
        let slot = self.keys.len();

        self.keys.push(OrderedFloat(key));
        self.handles.push(handle);
        self.slots.push(Some(slot));

        self.bubble_up(slot);
        handle
    }

    /// Lowers the key of a handle still in the heap.
    ///
    /// # Panics
    /// If the handle has been popped or `key` exceeds the current key.
    pub fn decrease_key(&mut self, handle: usize, key: f32) {
        let slot = match self.slots.get(handle) {
            Some(Some(slot)) => *slot,
            _ => panic!("Handle {handle} is not in the heap"),
        };

        let key = OrderedFloat(key);
        assert!(
            key <= self.keys[slot],
            "New key {} is larger than the current key {}",
            key.0,
            self.keys[slot].0
        );

        self.keys[slot] = key;
        self.bubble_up(slot);
    }

    /// Removes the smallest key and returns its handle.
    ///
    /// # Panics
    /// If the heap is empty.
    pub fn pop_min_index(&mut self) -> usize {
        assert!(!self.is_empty(), "Indirect heap is empty");

        let handle = self.handles[0];
        let last = self.keys.len() - 1;
        self.swap(0, last);

        self.keys.truncate(last);
        self.handles.truncate(last);
        self.slots[handle] = None;

        if !self.is_empty() {
            self.bubble_down(0);
        }

        handle
    }

    /// Handle of the smallest key, if any
    pub fn peek_min_handle(&self) -> Option<usize> {
        self.handles.first().copied()
    }

    /// Smallest key, if any
    pub fn min_key(&self) -> Option<f32> {
        self.keys.first().map(|key| key.0)
    }

    /// Returns the key of a handle still in the heap
    pub fn key(&self, handle: usize) -> Option<f32> {
        let slot = (*self.slots.get(handle)?)?;
        Some(self.keys[slot].0)
    }

    pub fn contains(&self, handle: usize) -> bool {
        matches!(self.slots.get(handle), Some(Some(_)))
    }

    /// Number of keys currently in the heap
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of handles handed out so far
    pub fn handle_count(&self) -> usize {
        self.slots.len()
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.keys.swap(a, b);
        self.handles.swap(a, b);
        self.slots[self.handles[a]] = Some(a);
        self.slots[self.handles[b]] = Some(b);
    }

    fn bubble_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.keys[slot] >= self.keys[parent] {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn bubble_down(&mut self, mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;

            let smaller = match (self.keys.get(left), self.keys.get(right)) {
                (Some(l), Some(r)) if r < l => right,
                (Some(_), _) => left,
                (None, _) => break,
            };

            if self.keys[slot] <= self.keys[smaller] {
                break;
            }
            self.swap(slot, smaller);
            slot = smaller;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn insert_pop_decrease() {
        let mut pq = IndirectHeap::with_capacity(7);

        let mut handles = [0; 239];
        for (i, handle) in handles.iter_mut().enumerate().take(61) {
            *handle = pq.insert((i * 73 % 239) as f32);
        }

        pq.reserve(200);

        for (i, handle) in handles.iter_mut().enumerate().skip(61) {
            *handle = pq.insert((i * 73 % 239) as f32);
        }

        pq.reserve(400);
        assert_eq!(pq.len(), 239);
        pq.reserve(1000);
        assert_eq!(pq.len(), 239);
        assert!(handles.iter().enumerate().all(|(i, h)| *h == i));

        for i in 0..100 {
            assert_eq!(pq.min_key(), Some(i as f32));
            assert_eq!(pq.pop_min_index() * 73 % 239, i);
        }

        assert!(!pq.is_empty());
        assert_eq!(pq.len(), 139);

        let mut new_handles = Vec::new();
        for (i, handle) in handles.iter().enumerate() {
            if i * 73 % 239 >= 100 {
                pq.decrease_key(*handle, -1.0 - new_handles.len() as f32);
                new_handles.push(*handle);
            }
        }
        assert_eq!(new_handles.len(), 139);

        for i in 0..39 {
            assert_eq!(pq.min_key(), Some(i as f32 - 139.0));
            assert_eq!(pq.pop_min_index(), new_handles[139 - i - 1]);
        }

        // Left are new_handles[0..100] keyed -1 to -100. Interleave keys
        // -0.5 to -100.5.
        let newer_handles: Vec<_> = (0..=100).map(|i| pq.insert(-i as f32 - 0.5)).collect();
        assert_eq!(pq.len(), 201);

        for i in 0..100 {
            assert_relative_eq!(pq.min_key().unwrap(), -100.5 + i as f32);
            assert_eq!(pq.pop_min_index(), newer_handles[100 - i]);
            assert_eq!(pq.len(), 200 - 2 * i);

            assert_relative_eq!(pq.min_key().unwrap(), -100.0 + i as f32);
            assert_eq!(pq.pop_min_index(), new_handles[99 - i]);
            assert_eq!(pq.len(), 199 - 2 * i);
        }

        assert_eq!(pq.peek_min_handle(), Some(newer_handles[0]));
        pq.decrease_key(newer_handles[0], -1000.0);
        assert_eq!(pq.min_key(), Some(-1000.0));
        assert_eq!(pq.pop_min_index(), newer_handles[0]);

        assert!(pq.is_empty());
        assert_eq!(pq.peek_min_handle(), None);
        assert_eq!(pq.handle_count(), 340);
    }

    #[test]
    fn equal_keys_and_lookup() {
        let mut pq = IndirectHeap::new();
        let a = pq.insert(2.0);
        let b = pq.insert(2.0);
        let c = pq.insert(1.0);

        assert_eq!(pq.key(a), Some(2.0));
        assert_eq!(pq.pop_min_index(), c);
        assert!(!pq.contains(c));
        assert_eq!(pq.key(c), None);

        pq.decrease_key(b, 2.0);
        let rest = [pq.pop_min_index(), pq.pop_min_index()];
        assert!(rest.contains(&a) && rest.contains(&b));
    }

    #[test]
    #[should_panic(expected = "larger than the current key")]
    fn decrease_key_rejects_increase() {
        let mut pq = IndirectHeap::new();
        let handle = pq.insert(1.0);
        pq.decrease_key(handle, 3.0);
    }

    #[test]
    #[should_panic(expected = "is not in the heap")]
    fn decrease_key_after_pop() {
        let mut pq = IndirectHeap::new();
        let handle = pq.insert(1.0);
        pq.pop_min_index();
        pq.decrease_key(handle, 0.0);
    }

    #[test]
    #[should_panic(expected = "empty")]
    fn pop_empty() {
        IndirectHeap::new().pop_min_index();
    }
}
