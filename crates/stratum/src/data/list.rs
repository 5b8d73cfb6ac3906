//! Arena-backed doubly linked lists.
//!
//! [`Lists`] owns any number of circular lists, each anchored by a sentinel slot. Entries live
//! in the same arena and are addressed by [`EntryId`]; enqueueing an entry that is already
//! linked moves it, so an entry belongs to at most one list at a time.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

#[derive(Debug, Clone, Copy)]
struct Link {
    prev: usize,
    next: usize,
    /// List the slot is linked into. Sentinels point at their own list.
    list: Option<usize>,
}

#[derive(Clone)]
pub struct Lists<T> {
    links: Vec<Link>,
    values: Vec<Option<T>>,
    sentinels: Vec<usize>,
}

impl<T> Default for Lists<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T> Lists<T> {
    /// Creates `count` empty lists, addressed as `0..count`.
    pub fn new(count: usize) -> Self {
        let mut lists = Self {
            links: Vec::with_capacity(count),
            values: Vec::with_capacity(count),
            sentinels: Vec::with_capacity(count),
        };
        for _ in 0..count {
            lists.add_list();
        }
        lists
    }

    /// Appends a new empty list and returns its index.
    pub fn add_list(&mut self) -> usize {
        let slot = self.links.len();
        let list = self.sentinels.len();
        self.links.push(Link {
            prev: slot,
            next: slot,
            list: Some(list),
        });
        self.values.push(None);
        self.sentinels.push(slot);
        list
    }

    pub fn list_count(&self) -> usize {
        self.sentinels.len()
    }

    /// Stores `value` as a detached entry.
    pub fn insert(&mut self, value: T) -> EntryId {
        let slot = self.links.len();
        self.links.push(Link {
            prev: slot,
            next: slot,
            list: None,
        });
        self.values.push(Some(value));
        EntryId(slot)
    }

    pub fn value(&self, entry: EntryId) -> Option<&T> {
        self.values.get(entry.0).and_then(Option::as_ref)
    }

    pub fn value_mut(&mut self, entry: EntryId) -> Option<&mut T> {
        self.values.get_mut(entry.0).and_then(Option::as_mut)
    }

    /// The list `entry` is currently linked into.
    pub fn list_of(&self, entry: EntryId) -> Option<usize> {
        self.links.get(entry.0).and_then(|l| l.list)
    }

    /// Links `entry` at the front of `list`, unlinking it from wherever it was first.
    pub fn enqueue(&mut self, list: usize, entry: EntryId) {
        if self.value(entry).is_none() {
            return;
        }
        self.unlink(entry);
        let sentinel = self.sentinels[list];
        let next = self.links[sentinel].next;
        self.links[entry.0] = Link {
            prev: sentinel,
            next,
            list: Some(list),
        };
        self.links[next].prev = entry.0;
        self.links[sentinel].next = entry.0;
    }

    /// Unlinks and returns the entry at the back of `list` (the oldest one).
    pub fn dequeue(&mut self, list: usize) -> Option<EntryId> {
        let sentinel = self.sentinels[list];
        let back = self.links[sentinel].prev;
        self.take(sentinel, back)
    }

    /// Unlinks and returns the entry at the front of `list` (the newest one).
    pub fn dequeue_front(&mut self, list: usize) -> Option<EntryId> {
        let sentinel = self.sentinels[list];
        let front = self.links[sentinel].next;
        self.take(sentinel, front)
    }

    fn take(&mut self, sentinel: usize, slot: usize) -> Option<EntryId> {
        if slot == sentinel {
            return None;
        }
        let entry = EntryId(slot);
        self.unlink(entry);
        Some(entry)
    }

    /// Removes `entry` from its list, if any. Sentinels are never unlinked.
    pub fn unlink(&mut self, entry: EntryId) {
        let slot = entry.0;
        if self.values.get(slot).is_none_or(Option::is_none) {
            return;
        }
        let Link { prev, next, list } = self.links[slot];
        if list.is_none() {
            return;
        }
        self.links[prev].next = next;
        self.links[next].prev = prev;
        self.links[slot] = Link {
            prev: slot,
            next: slot,
            list: None,
        };
    }

    pub fn is_empty(&self, list: usize) -> bool {
        let sentinel = self.sentinels[list];
        self.links[sentinel].next == sentinel
    }

    /// Entries of `list` in dequeue order, oldest first.
    pub fn iter(&self, list: usize) -> impl Iterator<Item = EntryId> + '_ {
        let sentinel = self.sentinels[list];
        let mut cursor = self.links[sentinel].prev;
        std::iter::from_fn(move || {
            if cursor == sentinel {
                return None;
            }
            let entry = EntryId(cursor);
            cursor = self.links[cursor].prev;
            Some(entry)
        })
    }

    /// Number of entries in `list`. Walks the list, so this is O(n).
    pub fn len(&self, list: usize) -> usize {
        self.iter(list).count()
    }
}

impl<T: fmt::Debug> fmt::Debug for Lists<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_list();
        for list in 0..self.list_count() {
            out.entry(&DebugList { lists: self, list });
        }
        out.finish()
    }
}

struct DebugList<'a, T> {
    lists: &'a Lists<T>,
    list: usize,
}

impl<T: fmt::Debug> fmt::Debug for DebugList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.lists
                    .iter(self.list)
                    .filter_map(|e| self.lists.value(e)),
            )
            .finish()
    }
}
