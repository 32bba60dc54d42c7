//! LRU List Module
//!
//! Arena-backed doubly-linked list keeping items in recency order.
//!
//! Items are addressed by stable [`Handle`]s, so a key index can point into
//! the list and every reorder is O(1):
//! - Front = Most recently used
//! - Back = Least recently used

// == Handle ==
/// Stable position of an item in an [`LruList`]. Valid until the item is
/// removed or the list is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

#[derive(Debug)]
struct Slot<T> {
    item: T,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU List ==
/// Recency-ordered list with O(1) push, touch, remove and eviction.
#[derive(Debug)]
pub struct LruList<T> {
    /// Slot arena; `None` marks a free slot
    slots: Vec<Option<Slot<T>>>,
    /// Free slots available for reuse
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LruList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an item as the most recently used.
    pub fn push_front(&mut self, item: T) -> Handle {
        let slot = Slot {
            item,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(slot);
                idx
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };
        self.link_front(idx);
        self.len += 1;
        Handle(idx)
    }

    // == Touch ==
    /// Marks an item as recently used (moves to front).
    ///
    /// Returns false if the handle is stale.
    pub fn touch(&mut self, handle: Handle) -> bool {
        if self.slot(handle.0).is_none() {
            return false;
        }
        if self.head != Some(handle.0) {
            self.unlink(handle.0);
            self.link_front(handle.0);
        }
        true
    }

    // == Remove ==
    /// Removes an item from the list.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        self.slot(handle.0)?;
        self.unlink(handle.0);
        let slot = self.slots[handle.0].take()?;
        self.free.push(handle.0);
        self.len -= 1;
        Some(slot.item)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used item.
    ///
    /// Returns None if the list is empty.
    pub fn evict_oldest(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(Handle(tail))
    }

    // == Peek Oldest ==
    /// Returns the least recently used item without removing it.
    pub fn peek_oldest(&self) -> Option<&T> {
        self.tail.and_then(|idx| self.slot(idx)).map(|s| &s.item)
    }

    // == Access ==
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slot(handle.0).map(|s| &s.item)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.0)
            .and_then(Option::as_mut)
            .map(|s| &mut s.item)
    }

    /// Iterates from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Clear ==
    /// Drops every item and invalidates all handles.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Length ==
    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Internals ==
    fn slot(&self, idx: usize) -> Option<&Slot<T>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, idx: usize) -> Option<&mut Slot<T>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(slot) = self.slot_mut(idx) {
            slot.prev = None;
            slot.next = old_head;
        }
        match old_head.and_then(|h| self.slot_mut(h)) {
            Some(head) => head.prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let Some((prev, next)) = self.slot(idx).map(|s| (s.prev, s.next)) else {
            return;
        };

        match prev.and_then(|p| self.slot_mut(p)) {
            Some(p) => p.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.slot_mut(n)) {
            Some(n) => n.prev = prev,
            None => self.tail = prev,
        }

        if let Some(slot) = self.slot_mut(idx) {
            slot.prev = None;
            slot.next = None;
        }
    }
}

// == Iterator ==
/// Most-to-least recently used iterator over an [`LruList`].
pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.list.slot(self.cursor?)?;
        self.cursor = slot.next;
        Some(&slot.item)
    }
}
