//! Open-addressing `u32 -> f64` table with a hard size bound.
//!
//! Linear scan over a power-of-two slot array, Fibonacci hashing, and
//! backward-shift deletion (no tombstones). Key `0` marks an empty slot,
//! so a real key `0` lives in one extra slot past the end.
//!
//! When the load reaches the high-water mark the table doubles, until
//! doubling would exceed `max_size`. From then on it purges instead:
//! each entry is kept or dropped on one bit of its key mixed with a
//! seeded LCG stream that carries on across purges, so roughly half of
//! the entries go each time regardless of how the keys are distributed.
//! Callers must therefore treat every lookup as a hint that can miss.

use std::fmt;

use tracing::{debug, trace};

use crate::HashSeed;

/// `φ · 2³²`, rounded to odd.
const PHI32: u32 = 0x9E37_79B9;
const LCG_MUL: u32 = 1_664_525;
const LCG_INC: u32 = 1_013_904_223;

/// Default initial slot count.
pub const DEFAULT_SIZE: usize = 128;
/// Default bound on live entries.
pub const DEFAULT_MAX_SIZE: usize = 1 << 31;
/// Smallest accepted bound.
pub const MIN_MAX_SIZE: usize = 32;
/// Bytes held per slot (key + value).
pub const BYTES_PER_SLOT: usize = std::mem::size_of::<u32>() + std::mem::size_of::<f64>();

// Above 16k slots the load factor tightens linearly down to 83%.
const LOAD_RAMP_SLOTS: f64 = 16_384.0;
const LOAD_SLACK: f64 = 0.17;

/// Bounded `u32 -> f64` table with open addressing and purge-on-full.
#[derive(Clone)]
pub struct Float64Table {
    /// `capacity() + 1` keys; the last one flags a stored key 0.
    slots: Vec<u32>,
    /// Values parallel to `slots`.
    vals: Vec<f64>,
    ushift: u32,
    mask: usize,
    highmark: usize,
    /// Live keys in `slots[..capacity()]`.
    occupied: usize,
    initial_size: usize,
    max_size: usize,
    seed: HashSeed,
    /// LCG state for purge decisions, advanced once per purged key.
    purge_accu: u32,
}

impl Float64Table {
    /// Creates a table with room for `size` slots that never holds more
    /// than `max_size` entries. Uses the process-wide [`HashSeed`].
    pub fn new(size: usize, max_size: usize) -> Self {
        Self::with_seed(size, max_size, HashSeed::runtime())
    }

    /// Like [`Float64Table::new`] with an explicit seed.
    pub fn with_seed(size: usize, max_size: usize, seed: HashSeed) -> Self {
        let max_size = max_size.clamp(MIN_MAX_SIZE, DEFAULT_MAX_SIZE);
        // Largest power of two not above the bound
        let limit = 1usize << (usize::BITS - 1 - max_size.leading_zeros());
        let initial_size = size.clamp(2, limit);
        let mut table = Self {
            slots: Vec::new(),
            vals: Vec::new(),
            ushift: 0,
            mask: 0,
            highmark: 0,
            occupied: 0,
            initial_size,
            max_size,
            seed,
            purge_accu: seed.get(),
        };
        table.allocate(initial_size);
        table
    }

    /// Creates a table whose slot arrays stay within `bytes`.
    pub fn for_memory_budget(bytes: usize) -> Self {
        Self::new(DEFAULT_SIZE, bytes / BYTES_PER_SLOT)
    }

    /// Number of stored entries, key 0 included.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied + usize::from(self.has_zero())
    }

    /// Returns true if nothing is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current slot count (a power of two).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Upper bound on [`Float64Table::len`].
    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Looks up `key`.
    pub fn get(&self, key: u32) -> Option<f64> {
        if key == 0 {
            return self.has_zero().then(|| self.vals[self.capacity()]);
        }
        let i = self.find_slot(key);
        (self.slots[i] != 0).then(|| self.vals[i])
    }

    /// Returns true if `key` is stored.
    #[inline]
    pub fn contains_key(&self, key: u32) -> bool {
        self.get(key).is_some()
    }

    /// Stores `value` under `key`, returning the previous value.
    ///
    /// Inserting a new key may grow or purge the table first; the new
    /// entry itself always survives.
    pub fn set(&mut self, key: u32, value: f64) -> Option<f64> {
        if key == 0 {
            let z = self.capacity();
            let old = self.get(0);
            self.slots[z] = 1;
            self.vals[z] = value;
            return old;
        }

        let mut i = self.find_slot(key);
        if self.slots[i] == key {
            return Some(std::mem::replace(&mut self.vals[i], value));
        }
        if self.occupied >= self.highmark {
            self.make_room();
            i = self.find_slot(key);
        }
        self.slots[i] = key;
        self.vals[i] = value;
        self.occupied += 1;
        None
    }

    /// Removes `key`, returning its value.
    pub fn delete(&mut self, key: u32) -> Option<f64> {
        if key == 0 {
            let old = self.get(0);
            let z = self.capacity();
            self.slots[z] = 0;
            return old;
        }

        let mut gap = self.find_slot(key);
        if self.slots[gap] == 0 {
            return None;
        }
        let removed = self.vals[gap];
        self.slots[gap] = 0;
        self.occupied -= 1;

        // Backward shift: pull successors whose home bucket lies outside
        // the cyclic run (gap, next] into the gap.
        let mut next = (gap + 1) & self.mask;
        while self.slots[next] != 0 {
            let home = self.bucket(self.slots[next]);
            let moves = (home <= gap) ^ (home <= next) ^ (gap < next);
            if moves {
                self.slots[gap] = self.slots[next];
                self.vals[gap] = self.vals[next];
                self.slots[next] = 0;
                gap = next;
            }
            next = (next + 1) & self.mask;
        }
        Some(removed)
    }

    /// Removes everything and shrinks back to the initial size.
    pub fn clear(&mut self) {
        self.allocate(self.initial_size);
    }

    /// Iterates over `(key, value)` pairs in no particular order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { table: self, pos: 0, zero_pending: self.has_zero() }
    }

    #[inline]
    fn has_zero(&self) -> bool {
        self.slots[self.capacity()] != 0
    }

    #[inline]
    fn bucket(&self, key: u32) -> usize {
        (key.wrapping_mul(PHI32).wrapping_add(self.seed.get()) >> self.ushift) as usize
    }

    /// Slot holding `key`, or the empty slot ending its collision run.
    fn find_slot(&self, key: u32) -> usize {
        let mut i = self.bucket(key);
        while self.slots[i] != 0 && self.slots[i] != key {
            i = (i + 1) & self.mask;
        }
        i
    }

    fn allocate(&mut self, size: usize) {
        self.ushift = ((size.max(2) - 1) as u32).leading_zeros();
        let slots = 1usize << (32 - self.ushift);
        let load = 1.0 - LOAD_SLACK * (slots as f64 / LOAD_RAMP_SLOTS).min(1.0);
        self.highmark = (slots - 1).min((slots as f64 * load) as usize);
        self.mask = slots - 1;
        self.occupied = 0;
        self.slots = vec![0; slots + 1];
        self.vals = vec![0.0; slots + 1];
    }

    /// Re-inserts every entry into a table of `size` slots. With `purge`,
    /// drops the entries for which [`Self::purge_drops`] says so.
    fn rebuild(&mut self, size: usize, purge: bool) {
        let old_slots = std::mem::take(&mut self.slots);
        let old_vals = std::mem::take(&mut self.vals);
        self.allocate(size);

        let end = old_slots.len() - 1;
        for (&key, &value) in old_slots[..end].iter().zip(&old_vals[..end]) {
            if key == 0 || (purge && self.purge_drops(key)) {
                continue;
            }
            let i = self.find_slot(key);
            self.slots[i] = key;
            self.vals[i] = value;
            self.occupied += 1;
        }
        if old_slots[end] != 0 {
            let z = self.capacity();
            self.slots[z] = 1;
            self.vals[z] = old_vals[end];
        }
    }

    /// Steps the purge LCG and tests the top bit of `key` mixed into it.
    ///
    /// The top bit of an LCG product depends on every input bit, so keys
    /// that share low bits are still split evenly.
    fn purge_drops(&mut self, key: u32) -> bool {
        self.purge_accu = self.purge_accu.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
        let mixed = (key.wrapping_mul(PHI32) ^ self.purge_accu).wrapping_mul(LCG_MUL);
        mixed >> 31 == 0
    }

    fn make_room(&mut self) {
        let slots = self.capacity();
        if 2 * slots <= self.max_size {
            trace!(from = slots, to = 2 * slots, "growing float table");
            self.rebuild(2 * slots, false);
            return;
        }

        let before = self.occupied;
        let mut round = 0;
        while self.occupied >= self.highmark {
            self.rebuild(slots, true);
            round += 1;
        }
        debug!(
            capacity = slots,
            before,
            after = self.occupied,
            rounds = round,
            "purged float table"
        );
    }
}

impl Default for Float64Table {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE, DEFAULT_MAX_SIZE)
    }
}

impl fmt::Debug for Float64Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Float64Table")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("max_size", &self.max_size)
            .finish()
    }
}

impl Extend<(u32, f64)> for Float64Table {
    fn extend<I: IntoIterator<Item = (u32, f64)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<'a> IntoIterator for &'a Float64Table {
    type Item = (u32, f64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator over the entries of a [`Float64Table`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    table: &'a Float64Table,
    pos: usize,
    zero_pending: bool,
}

impl Iterator for Iter<'_> {
    type Item = (u32, f64);

    fn next(&mut self) -> Option<(u32, f64)> {
        if self.zero_pending {
            self.zero_pending = false;
            return Some((0, self.table.vals[self.table.capacity()]));
        }
        let end = self.table.capacity();
        while self.pos < end {
            let i = self.pos;
            self.pos += 1;
            if self.table.slots[i] != 0 {
                return Some((self.table.slots[i], self.table.vals[i]));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn mix(i: u32) -> u32 {
        i.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)
    }

    fn sorted(pairs: impl IntoIterator<Item = (u32, f64)>) -> Vec<(u32, f64)> {
        let mut v: Vec<_> = pairs.into_iter().collect();
        v.sort_by_key(|p| p.0);
        v
    }

    fn seeded() -> Float64Table {
        Float64Table::with_seed(DEFAULT_SIZE, DEFAULT_MAX_SIZE, HashSeed::fixed(0x61c9_7bfd))
    }

    #[test]
    fn test_matches_hashmap_through_resizes() {
        let mut table = seeded();
        let mut map = HashMap::new();
        for i in 0..20_000u32 {
            let k = mix(i);
            table.set(k, i as f64 * 0.5);
            map.insert(k, i as f64 * 0.5);
        }
        table.set(0, -1.0);
        map.insert(0, -1.0);

        assert_eq!(table.len(), map.len());
        assert!(table.capacity() >= 16_384);
        assert_eq!(sorted(&table), sorted(map.iter().map(|(&k, &v)| (k, v))));
        for (k, v) in &map {
            assert_eq!(table.get(*k), Some(*v));
        }
    }

    #[test]
    fn test_delete_keeps_clusters_reachable() {
        let n = 50_000u32;
        let cond = |i: u32| i % 7 < 3 || i % 47 >= 42 || (100..330).contains(&i);
        let mut table = seeded();
        for i in 0..n {
            table.set(i, 3.0 + i as f64 * 2.0);
        }
        for i in 0..n {
            if cond(i) {
                assert_eq!(table.delete(i), Some(3.0 + i as f64 * 2.0));
            }
        }
        for i in 0..2 * n {
            let expected = (i < n && !cond(i)).then(|| 3.0 + i as f64 * 2.0);
            assert_eq!(table.get(i), expected, "key {i}");
        }
        let live = (0..n).filter(|&i| !cond(i)).count();
        assert_eq!(table.len(), live);
    }

    #[test]
    fn test_random_deletes_match_hashmap() {
        let mut table = seeded();
        let mut map = HashMap::new();
        for i in 0..20_000u32 {
            let v = (mix(i ^ 0x5555) % 10_000) as f64 / 100.0;
            table.set(mix(i), v);
            map.insert(mix(i), v);
        }
        for i in 0..20_000u32 {
            let k = mix(i);
            if (i ^ k) & 0x10 != 0 {
                continue;
            }
            assert_eq!(table.delete(k), map.remove(&k));
        }
        assert_eq!(table.len(), map.len());
        assert_eq!(sorted(&table), sorted(map.iter().map(|(&k, &v)| (k, v))));
    }

    #[test]
    fn test_key_zero() {
        let mut table = seeded();
        assert_eq!(table.get(0), None);
        assert_eq!(table.set(0, 1.5), None);
        assert_eq!(table.set(0, 2.5), Some(1.5));
        assert_eq!(table.len(), 1);
        assert!(table.contains_key(0));

        // Survives a resize
        table.extend((1..1000).map(|k| (k, k as f64)));
        assert_eq!(table.get(0), Some(2.5));
        assert_eq!(table.iter().filter(|(k, _)| *k == 0).count(), 1);

        assert_eq!(table.delete(0), Some(2.5));
        assert_eq!(table.delete(0), None);
        assert_eq!(table.len(), 999);
    }

    #[test]
    fn test_set_returns_previous() {
        let mut table = seeded();
        assert_eq!(table.set(42, 1.0), None);
        assert_eq!(table.set(42, 2.0), Some(1.0));
        assert_eq!(table.get(42), Some(2.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_growth_doubles() {
        let mut table = Float64Table::with_seed(2, 1 << 20, HashSeed::fixed(7));
        assert_eq!(table.capacity(), 2);
        table.extend((1..=100).map(|k| (k, 0.0)));
        assert_eq!(table.capacity(), 128);
        assert_eq!(table.len(), 100);
    }

    #[test]
    fn test_bounded_never_stale() {
        let mut table = Float64Table::with_seed(DEFAULT_SIZE, 64, HashSeed::fixed(3));
        for i in 0..10_000u32 {
            table.set(mix(i), i as f64);
            assert!(table.len() <= table.max_size());
        }
        table.set(0, 0.25);
        assert!(table.len() <= 64);
        assert!(table.capacity() <= 64);

        let mut hits = 0;
        for i in 0..10_000u32 {
            if let Some(v) = table.get(mix(i)) {
                assert_eq!(v, i as f64);
                hits += 1;
            }
        }
        assert!(hits > 0);
        // The most recent insert always survives its own purge
        assert_eq!(table.get(mix(9_999)), Some(9_999.0));
    }

    #[test]
    fn test_purge_splits_even_keys() {
        // Every key shares bit 0; each purge must still keep about half
        let mut table = Float64Table::with_seed(DEFAULT_SIZE, 64, HashSeed::fixed(2));
        let mut purged_to = Vec::new();
        for i in 1..=200u32 {
            let before = table.len();
            table.set(2 * i, i as f64);
            if table.len() < before {
                purged_to.push(table.len());
            }
        }
        assert!(!purged_to.is_empty());
        for len in purged_to {
            assert!((16..=48).contains(&len), "purge left {len} of 64");
        }
        assert_eq!(table.get(400), Some(200.0));
    }

    #[test]
    fn test_interleaved_ops_match_hashmap() {
        let mut table = Float64Table::with_seed(DEFAULT_SIZE, 64, HashSeed::fixed(5));
        let mut map = HashMap::new();
        let mut hits = 0;
        for i in 0..20_000u32 {
            let key = mix(i) >> 23;
            if i % 3 == 0 {
                let removed = table.delete(key);
                let expected = map.remove(&key);
                if removed.is_some() {
                    assert_eq!(removed, expected, "delete {key} at step {i}");
                }
                assert_eq!(table.get(key), None, "deleted key {key} still present");
            } else {
                table.set(key, i as f64);
                map.insert(key, i as f64);
                assert_eq!(table.get(key), Some(i as f64));
            }

            // Purged keys may miss; a hit must carry the latest value
            let lookup = mix(i ^ 0x5bd1) >> 23;
            if let Some(v) = table.get(lookup) {
                assert_eq!(map.get(&lookup), Some(&v), "stale value for {lookup} at step {i}");
                hits += 1;
            }
            assert!(table.len() <= 64);
        }
        assert!(hits > 1000);
    }

    #[test]
    fn test_max_size_not_power_of_two() {
        let mut table = Float64Table::with_seed(1024, 100, HashSeed::fixed(11));
        assert_eq!(table.capacity(), 64);
        table.extend((1..5_000).map(|k| (mix(k), 1.0)));
        assert!(table.len() <= 100);
        assert_eq!(table.max_size(), 100);
    }

    #[test]
    fn test_memory_budget() {
        let table = Float64Table::for_memory_budget(BYTES_PER_SLOT * 1000);
        assert_eq!(table.max_size(), 1000);
        let tiny = Float64Table::for_memory_budget(0);
        assert_eq!(tiny.max_size(), MIN_MAX_SIZE);
    }

    #[test]
    fn test_clear() {
        let mut table = seeded();
        table.extend((0..1000).map(|k| (k, 1.0)));
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), DEFAULT_SIZE);
        assert_eq!(table.get(5), None);
        assert_eq!(table.get(0), None);
    }
}
