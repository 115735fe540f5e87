//! Recency list: arena-backed doubly-linked list with sentinel slots
//!
//! Slot 0 sits before the most recently used entry and slot 1 after the
//! least recently used one. Both are permanent, so linking never has to
//! special-case the ends of the list. Data slots are addressed by index and
//! recycled through a free list.

/// Head sentinel slot (before the most recently used entry)
pub(crate) const HEAD: usize = 0;

/// Tail sentinel slot (after the least recently used entry)
pub(crate) const TAIL: usize = 1;

struct Slot<K, V> {
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

impl<K, V> Slot<K, V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            prev: HEAD,
            next: TAIL,
        }
    }
}

/// Entries ordered from most to least recently used
pub(crate) struct RecencyList<K, V> {
    slots: Vec<Slot<K, V>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.saturating_add(2));
        slots.push(Slot::sentinel());
        slots.push(Slot::sentinel());

        Self {
            slots,
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Insert a new entry as the most recently used and return its slot
    pub fn push_front(&mut self, key: K, value: V) -> usize {
        let idx = self.alloc(key, value);
        self.link_front(idx);
        self.len += 1;
        idx
    }

    /// Move an entry to the most recently used position
    pub fn promote(&mut self, idx: usize) {
        if self.slots[HEAD].next == idx {
            return;
        }

        self.unlink(idx);
        self.link_front(idx);
    }

    /// Unlink an entry and release its slot
    pub fn remove(&mut self, idx: usize) -> Option<(K, V)> {
        if idx <= TAIL {
            return None;
        }

        let entry = self.slots.get_mut(idx)?.entry.take()?;
        self.unlink(idx);
        self.free_list.push(idx);
        self.len -= 1;
        Some(entry)
    }

    /// Slot of the least recently used entry (the eviction candidate)
    pub fn back(&self) -> Option<usize> {
        let idx = self.slots[TAIL].prev;
        (idx != HEAD).then_some(idx)
    }

    /// Remove the least recently used entry
    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let idx = self.back()?;
        self.remove(idx)
    }

    pub fn value(&self, idx: usize) -> Option<&V> {
        self.slots
            .get(idx)?
            .entry
            .as_ref()
            .map(|(_, value)| value)
    }

    pub fn value_mut(&mut self, idx: usize) -> Option<&mut V> {
        self.slots
            .get_mut(idx)?
            .entry
            .as_mut()
            .map(|(_, value)| value)
    }

    /// Drop every entry and relink the sentinels to each other
    pub fn clear(&mut self) {
        self.slots.truncate(2);
        self.slots[HEAD] = Slot::sentinel();
        self.slots[TAIL] = Slot::sentinel();
        self.free_list.clear();
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.slots[HEAD].next,
            remaining: self.len,
        }
    }

    fn alloc(&mut self, key: K, value: V) -> usize {
        let slot = Slot {
            entry: Some((key, value)),
            prev: HEAD,
            next: TAIL,
        };

        if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = slot;
            idx
        } else {
            self.slots.push(slot);
            self.slots.len() - 1
        }
    }

    fn link_front(&mut self, idx: usize) {
        let first = self.slots[HEAD].next;

        self.slots[idx].prev = HEAD;
        self.slots[idx].next = first;
        self.slots[first].prev = idx;
        self.slots[HEAD].next = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);

        self.slots[prev].next = next;
        self.slots[next].prev = prev;
    }
}

/// Iterator over cache entries from most to least recently used
///
/// Iterating does not change recency order.
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == TAIL {
            return None;
        }

        let list = self.list;
        let slot = &list.slots[self.cursor];
        self.cursor = slot.next;
        self.remaining = self.remaining.saturating_sub(1);
        slot.entry.as_ref().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList<u32, &'static str>) -> Vec<u32> {
        list.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_empty_sentinels_linked() {
        let list: RecencyList<u32, &str> = RecencyList::with_capacity(4);

        assert_eq!(list.slots[HEAD].next, TAIL);
        assert_eq!(list.slots[TAIL].prev, HEAD);
        assert_eq!(list.back(), None);
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_push_front_order() {
        let mut list = RecencyList::with_capacity(4);

        list.push_front(1, "a");
        list.push_front(2, "b");
        list.push_front(3, "c");

        assert_eq!(keys(&list), vec![3, 2, 1]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_promote() {
        let mut list = RecencyList::with_capacity(4);

        let first = list.push_front(1, "a");
        list.push_front(2, "b");
        list.push_front(3, "c");

        list.promote(first);
        assert_eq!(keys(&list), vec![1, 3, 2]);

        // Promoting the head is a no-op
        list.promote(first);
        assert_eq!(keys(&list), vec![1, 3, 2]);
    }

    #[test]
    fn test_remove_middle_keeps_neighbours() {
        let mut list = RecencyList::with_capacity(4);

        list.push_front(1, "a");
        let middle = list.push_front(2, "b");
        list.push_front(3, "c");

        assert_eq!(list.remove(middle), Some((2, "b")));
        assert_eq!(keys(&list), vec![3, 1]);
        assert_eq!(list.remove(middle), None);
    }

    #[test]
    fn test_sentinels_cannot_be_removed() {
        let mut list: RecencyList<u32, &str> = RecencyList::with_capacity(1);

        assert_eq!(list.remove(HEAD), None);
        assert_eq!(list.remove(TAIL), None);
    }

    #[test]
    fn test_pop_back_lru_first() {
        let mut list = RecencyList::with_capacity(4);

        list.push_front(1, "a");
        list.push_front(2, "b");

        assert_eq!(list.pop_back(), Some((1, "a")));
        assert_eq!(list.pop_back(), Some((2, "b")));
        assert_eq!(list.pop_back(), None);
        assert_eq!(list.slots[HEAD].next, TAIL);
    }

    #[test]
    fn test_slot_reuse() {
        let mut list = RecencyList::with_capacity(2);

        let a = list.push_front(1, "a");
        list.remove(a);
        let b = list.push_front(2, "b");

        assert_eq!(a, b);
        assert_eq!(list.slots.len(), 3);
    }

    #[test]
    fn test_clear_relinks_sentinels() {
        let mut list = RecencyList::with_capacity(4);

        list.push_front(1, "a");
        list.push_front(2, "b");
        list.clear();

        assert_eq!(list.len(), 0);
        assert_eq!(list.slots.len(), 2);
        assert_eq!(list.slots[HEAD].next, TAIL);
        assert_eq!(list.slots[TAIL].prev, HEAD);
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn test_value_mut() {
        let mut list = RecencyList::with_capacity(1);

        let idx = list.push_front(1, "a");
        if let Some(value) = list.value_mut(idx) {
            *value = "z";
        }

        assert_eq!(list.value(idx), Some(&"z"));
        assert_eq!(list.value(HEAD), None);
    }
}
