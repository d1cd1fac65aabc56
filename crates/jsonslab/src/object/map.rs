//! Hash map engine behind [`Object`](super::Object).
//!
//! Storage is a fixed bucket array plus a growable overflow slab. A key
//! hashes to its home bucket; entries that find their home bucket occupied
//! are appended to the slab and linked to the chain by logical index, never
//! by address, so the slab can be reallocated or cloned without touching a
//! single link.
//!
//! Invariants
//! - A slot is live exactly when its value is not the vacant sentinel; there
//!   is no occupancy flag beside the value.
//! - Chains link only live slab entries. Deleting from the middle of a chain
//!   splices around the slot and leaves it as a gap; gaps are reclaimed only
//!   when the map grows, so surviving slab indices never shift in between.
//! - `live / buckets.len()` is kept at or below [`MAX_LOAD_FACTOR`] by a
//!   best-effort grow after each insert.

use alloc::{boxed::Box, vec::Vec};
use core::mem;

use crate::{
    error::AllocError,
    hash::djb2,
    value::{JsonString, Value},
};

pub(crate) const INITIAL_BUCKETS: usize = 16;
pub(crate) const GROWTH_FACTOR: usize = 2;
pub(crate) const MAX_LOAD_FACTOR: f64 = 0.7;

/// One slot of bucket or slab storage.
#[derive(Debug)]
pub(super) struct Entry {
    pub(super) key: JsonString,
    pub(super) value: Value,
    /// Logical index of the chain successor in the overflow slab.
    pub(super) next: Option<u32>,
}

impl Entry {
    fn vacant() -> Self {
        Self {
            key: JsonString::new(),
            value: Value::Invalid,
            next: None,
        }
    }

    pub(super) fn is_live(&self) -> bool {
        !self.value.is_invalid()
    }

    fn try_clone(&self) -> Result<Self, AllocError> {
        // The link is a logical index, valid verbatim in the clone's slab.
        Ok(Self {
            key: self.key.try_clone()?,
            value: self.value.try_clone()?,
            next: self.next,
        })
    }
}

/// Where an entry lives: in the bucket array or in the overflow slab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Bucket(usize),
    Overflow(usize),
}

#[derive(Debug)]
pub(super) struct RawMap {
    pub(super) buckets: Box<[Entry]>,
    pub(super) overflow: Vec<Entry>,
    pub(super) live: usize,
}

impl RawMap {
    /// Creates an empty map with `bucket_count` home buckets and a slab
    /// reserved to the same size.
    pub(super) fn with_buckets(bucket_count: usize) -> Result<Self, AllocError> {
        debug_assert!(bucket_count > 0, "bucket storage cannot be zero-sized");
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(bucket_count)?;
        for _ in 0..bucket_count {
            buckets.push(Entry::vacant());
        }
        let mut overflow = Vec::new();
        overflow.try_reserve_exact(bucket_count)?;
        Ok(Self {
            buckets: buckets.into_boxed_slice(),
            overflow,
            live: 0,
        })
    }

    pub(super) fn len(&self) -> usize {
        self.live
    }

    pub(super) fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn home_index(&self, key: &[u8]) -> usize {
        (djb2(key) % self.buckets.len() as u64) as usize
    }

    fn entry(&self, slot: Slot) -> &Entry {
        match slot {
            Slot::Bucket(i) => &self.buckets[i],
            Slot::Overflow(i) => &self.overflow[i],
        }
    }

    fn entry_mut(&mut self, slot: Slot) -> &mut Entry {
        match slot {
            Slot::Bucket(i) => &mut self.buckets[i],
            Slot::Overflow(i) => &mut self.overflow[i],
        }
    }

    /// Follows the home-bucket chain until the key matches.
    fn find(&self, key: &[u8]) -> Option<Slot> {
        let mut slot = Slot::Bucket(self.home_index(key));
        if !self.entry(slot).is_live() {
            return None;
        }
        loop {
            let entry = self.entry(slot);
            if entry.key == key {
                return Some(slot);
            }
            slot = Slot::Overflow(entry.next? as usize);
        }
    }

    pub(super) fn get(&self, key: &[u8]) -> Option<&Value> {
        self.find(key).map(|slot| &self.entry(slot).value)
    }

    /// Replaces the value of an existing key in place, or hands the value
    /// back if the key is absent.
    pub(super) fn update(&mut self, key: &[u8], value: Value) -> Result<(), Value> {
        debug_assert!(!value.is_invalid(), "the vacant sentinel cannot be stored");
        match self.find(key) {
            Some(slot) => {
                self.entry_mut(slot).value = value;
                Ok(())
            }
            None => Err(value),
        }
    }

    /// Inserts a key that is not yet present. The key bytes are copied; the
    /// caller keeps ownership of the lookup slice.
    ///
    /// On failure the map is unchanged, except that the slab's capacity may
    /// already have grown.
    pub(super) fn insert(&mut self, key: &[u8], value: Value) -> Result<(), AllocError> {
        debug_assert!(!value.is_invalid(), "the vacant sentinel cannot be stored");
        debug_assert!(self.find(key).is_none(), "insert requires an absent key");

        let key = JsonString::from_bytes(key)?;
        if self.buckets[self.home_index(key.as_bytes())].is_live() {
            self.ensure_overflow_slot()?;
        }
        self.place(key, value);
        self.live += 1;

        if self.load_factor() > MAX_LOAD_FACTOR {
            // A failed grow leaves the completed insert in place and the map
            // over the threshold until a later insert retries.
            let _ = self.grow();
        }
        Ok(())
    }

    /// Removes a key, reporting whether it was present.
    ///
    /// A match at the head of the chain pulls its slab successor (with that
    /// successor's own link) up into the bucket slot. A match further down
    /// is spliced out of the chain. Either way the vacated slab slot stays
    /// as a gap until the next grow.
    pub(super) fn remove(&mut self, key: &[u8]) -> bool {
        let home = self.home_index(key);
        if !self.buckets[home].is_live() {
            return false;
        }

        if self.buckets[home].key == key {
            let replacement = match self.buckets[home].next {
                Some(i) => mem::replace(&mut self.overflow[i as usize], Entry::vacant()),
                None => Entry::vacant(),
            };
            self.buckets[home] = replacement;
            self.live -= 1;
            return true;
        }

        let mut prev = Slot::Bucket(home);
        while let Some(i) = self.entry(prev).next {
            let current = i as usize;
            if self.overflow[current].key == key {
                let removed = mem::replace(&mut self.overflow[current], Entry::vacant());
                self.entry_mut(prev).next = removed.next;
                self.live -= 1;
                return true;
            }
            prev = Slot::Overflow(current);
        }
        false
    }

    /// Rebuilds the map with twice the bucket count.
    ///
    /// All storage for the replacement is allocated before the first entry
    /// moves, so a failed grow leaves the map untouched. Re-hashing every
    /// live entry against the new bucket count rebuilds the chains and
    /// compacts slab gaps away; keys and values move without copying.
    pub(super) fn grow(&mut self) -> Result<(), AllocError> {
        let new_count = self.buckets.len() * GROWTH_FACTOR;

        let mut buckets = Vec::new();
        buckets.try_reserve_exact(new_count)?;
        for _ in 0..new_count {
            buckets.push(Entry::vacant());
        }
        // The slab must hold however many live entries end up colliding,
        // which a long run of failed grows can push past the bucket count.
        let mut overflow = Vec::new();
        overflow.try_reserve_exact(new_count.max(self.live))?;

        let old_buckets = mem::replace(&mut self.buckets, buckets.into_boxed_slice());
        let old_overflow = mem::replace(&mut self.overflow, overflow);
        for entry in old_buckets.into_vec().into_iter().chain(old_overflow) {
            if entry.is_live() {
                self.place(entry.key, entry.value);
            }
        }
        Ok(())
    }

    /// Deep-copies every slot, gaps included, into co-sized storage.
    ///
    /// Chain links are logical indices and slab slots keep their positions,
    /// so the links are copied verbatim and the clone reproduces the exact
    /// chain structure of the source.
    pub(super) fn try_clone(&self) -> Result<Self, AllocError> {
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(self.buckets.len())?;
        for entry in &self.buckets {
            buckets.push(entry.try_clone()?);
        }
        let mut overflow = Vec::new();
        overflow.try_reserve_exact(self.overflow.len())?;
        for entry in &self.overflow {
            overflow.push(entry.try_clone()?);
        }
        Ok(Self {
            buckets: buckets.into_boxed_slice(),
            overflow,
            live: self.live,
        })
    }

    pub(super) fn iter(&self) -> Iter<'_> {
        Iter {
            buckets: self.buckets.iter(),
            overflow: self.overflow.iter(),
        }
    }

    /// Places an owned entry, appending to the slab when the home bucket is
    /// occupied. The caller has already reserved the slab slot.
    fn place(&mut self, key: JsonString, value: Value) {
        let home = self.home_index(key.as_bytes());
        if !self.buckets[home].is_live() {
            self.buckets[home] = Entry { key, value, next: None };
            return;
        }

        let mut tail = Slot::Bucket(home);
        while let Some(i) = self.entry(tail).next {
            tail = Slot::Overflow(i as usize);
        }
        debug_assert!(
            self.overflow.len() < self.overflow.capacity(),
            "slab slot was not reserved before placing",
        );
        let index = self.overflow.len() as u32;
        self.overflow.push(Entry { key, value, next: None });
        self.entry_mut(tail).next = Some(index);
    }

    /// Makes sure one more slab slot fits, doubling the slab's capacity if
    /// it is full.
    fn ensure_overflow_slot(&mut self) -> Result<(), AllocError> {
        if self.overflow.len() < self.overflow.capacity() {
            return Ok(());
        }
        let target = self.overflow.capacity().max(1) * GROWTH_FACTOR;
        self.overflow.try_reserve_exact(target - self.overflow.len())?;
        Ok(())
    }

    fn load_factor(&self) -> f64 {
        self.live as f64 / self.buckets.len() as f64
    }
}

/// Iterates live entries in storage order: buckets first, then the slab.
pub(crate) struct Iter<'a> {
    buckets: core::slice::Iter<'a, Entry>,
    overflow: core::slice::Iter<'a, Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a JsonString, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.buckets.by_ref() {
            if entry.is_live() {
                return Some((&entry.key, &entry.value));
            }
        }
        for entry in self.overflow.by_ref() {
            if entry.is_live() {
                return Some((&entry.key, &entry.value));
            }
        }
        None
    }
}
