//! Priority buckets keyed by `out-weight - in-weight`.
//!
//! Bucket `0` holds items without outgoing weight (sinks), the last bucket items without
//! incoming weight (sources). Everything else lands at `out - in + zero_idx`, clamped to the
//! inner buckets. Re-bucketing after a weight change is an O(1) unlink and relink.

use super::list::{EntryId, Lists};

#[derive(Debug, Clone, Copy)]
struct Scores {
    in_weight: i64,
    out_weight: i64,
    entry: EntryId,
}

#[derive(Debug, Clone)]
pub struct BucketQueue {
    lists: Lists<usize>,
    items: Vec<Scores>,
    zero_idx: i64,
}

impl BucketQueue {
    /// Creates `size` empty buckets. `zero_idx` is the bucket of a balanced item.
    pub fn new(size: usize, zero_idx: i64) -> Self {
        Self {
            lists: Lists::new(size.max(1)),
            items: Vec::new(),
            zero_idx,
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.lists.list_count()
    }

    /// Registers an item with its initial weights. The item is not bucketed until
    /// [`assign`](Self::assign) is called.
    pub fn push(&mut self, in_weight: i64, out_weight: i64) -> usize {
        let item = self.items.len();
        let entry = self.lists.insert(item);
        self.items.push(Scores {
            in_weight,
            out_weight,
            entry,
        });
        item
    }

    pub fn in_weight(&self, item: usize) -> i64 {
        self.items[item].in_weight
    }

    pub fn out_weight(&self, item: usize) -> i64 {
        self.items[item].out_weight
    }

    pub fn add_in_weight(&mut self, item: usize, delta: i64) {
        self.items[item].in_weight += delta;
    }

    pub fn add_out_weight(&mut self, item: usize, delta: i64) {
        self.items[item].out_weight += delta;
    }

    /// Bucket the item belongs in given its current weights.
    pub fn bucket_index(&self, item: usize) -> usize {
        let last = self.bucket_count() - 1;
        let Scores {
            in_weight,
            out_weight,
            ..
        } = self.items[item];
        if out_weight == 0 {
            0
        } else if in_weight == 0 {
            last
        } else {
            let inner_max = last.saturating_sub(1).max(1) as i64;
            let ix = (out_weight - in_weight + self.zero_idx).clamp(1, inner_max);
            (ix as usize).min(last)
        }
    }

    /// Moves the item to the front of the bucket its weights select.
    pub fn assign(&mut self, item: usize) {
        let bucket = self.bucket_index(item);
        self.lists.enqueue(bucket, self.items[item].entry);
    }

    /// Bucket the item is currently linked into.
    pub fn bucket_of(&self, item: usize) -> Option<usize> {
        self.lists.list_of(self.items[item].entry)
    }

    pub fn remove(&mut self, item: usize) {
        self.lists.unlink(self.items[item].entry);
    }

    pub fn dequeue_back(&mut self, bucket: usize) -> Option<usize> {
        let entry = self.lists.dequeue(bucket)?;
        self.lists.value(entry).copied()
    }

    pub fn dequeue_front(&mut self, bucket: usize) -> Option<usize> {
        let entry = self.lists.dequeue_front(bucket)?;
        self.lists.value(entry).copied()
    }

    pub fn is_empty(&self, bucket: usize) -> bool {
        self.lists.is_empty(bucket)
    }
}
