//! Open-addressing map with perturbed probing and tombstone deletion.
//!
//! Slots live in a power-of-two array. A key's home slot is its 31-bit hash
//! masked to the capacity; collisions follow
//! `index = (index * 5 + 1 + perturb) & mask` with `perturb >>= 5` per step,
//! so every slot is eventually reachable without a second hash function.

use crate::config::Tuning;
use crate::error::{MiningError, Result};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::trace;

const HASH_MASK: u64 = 0x7FFF_FFFF;
const PERTURB_SHIFT: u32 = 5;

/// Probe steps after which a 31-bit perturb no longer contributes. From then
/// on the probe is `i -> 5i + 1 mod 2^k`, which has full period, so a lookup
/// inspects at most `capacity + PERTURB_DRAIN_STEPS` slots.
const PERTURB_DRAIN_STEPS: usize = 8;

/// A key/value pair stored in one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

#[derive(Debug, Clone)]
enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied(Entry<K, V>),
}

enum Probe {
    Found(usize),
    Vacant(usize),
}

#[derive(Debug, Clone)]
pub struct AssociativeMap<K, V> {
    slots: Vec<Slot<K, V>>,
    len: usize,
    load_factor: f64,
}

fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

fn hash_of<K: Hash + ?Sized>(key: &K) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() & HASH_MASK) as usize
}

impl<K: Hash + Eq, V> Default for AssociativeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> AssociativeMap<K, V> {
    pub fn new() -> Self {
        let tuning = Tuning::default();
        Self {
            slots: empty_slots(tuning.initial_capacity.next_power_of_two()),
            len: 0,
            load_factor: tuning.load_factor,
        }
    }

    /// Creates a map sized by `tuning`; the capacity is rounded up to a power of two.
    pub fn with_tuning(tuning: &Tuning) -> Result<Self> {
        tuning.validate()?;
        Ok(Self {
            slots: empty_slots(tuning.initial_capacity.next_power_of_two()),
            len: 0,
            load_factor: tuning.load_factor,
        })
    }

    fn find_slot(&self, key: &K) -> Probe {
        let mask = self.slots.len() - 1;
        let mut perturb = hash_of(key);
        let mut index = perturb & mask;
        let mut first_tombstone = None;

        for _ in 0..self.slots.len() + PERTURB_DRAIN_STEPS {
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant(first_tombstone.unwrap_or(index)),
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Slot::Occupied(entry) if entry.key == *key => return Probe::Found(index),
                Slot::Occupied(_) => {}
            }
            index = index
                .wrapping_mul(5)
                .wrapping_add(1)
                .wrapping_add(perturb)
                & mask;
            perturb >>= PERTURB_SHIFT;
        }

        // Every slot was visited without meeting an Empty one. The load factor
        // keeps at least one slot non-occupied, so a tombstone was seen.
        Probe::Vacant(first_tombstone.unwrap_or(index))
    }

    /// Grows until one more live entry fits under the load factor.
    fn reserve_one(&mut self) {
        while (self.len + 1) as f64 > self.slots.len() as f64 * self.load_factor {
            self.rehash(self.slots.len() * 2);
        }
    }

    fn rehash(&mut self, new_capacity: usize) {
        trace!(
            old_capacity = self.slots.len(),
            new_capacity,
            len = self.len,
            "rehashing map"
        );
        let old_slots = std::mem::replace(&mut self.slots, empty_slots(new_capacity));
        self.len = 0;

        for slot in old_slots {
            if let Slot::Occupied(entry) = slot {
                let index = match self.find_slot(&entry.key) {
                    Probe::Found(i) | Probe::Vacant(i) => i,
                };
                self.slots[index] = Slot::Occupied(entry);
                self.len += 1;
            }
        }
    }

    /// Inserts `value` under `key`, replacing any previous value.
    pub fn put(&mut self, key: K, value: V) {
        self.reserve_one();

        match self.find_slot(&key) {
            Probe::Found(index) => {
                self.slots[index] = Slot::Occupied(Entry { key, value });
            }
            Probe::Vacant(index) => {
                self.slots[index] = Slot::Occupied(Entry { key, value });
                self.len += 1;
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        match self.find_slot(key) {
            Probe::Found(index) => match &self.slots[index] {
                Slot::Occupied(entry) => Some(&entry.value),
                Slot::Empty | Slot::Tombstone => None,
            },
            Probe::Vacant(_) => None,
        }
    }

    /// Returns a copy of the value under `key`, or `default` when absent.
    pub fn get_or(&self, key: &K, default: V) -> V
    where
        V: Clone,
    {
        self.get(key).cloned().unwrap_or(default)
    }

    pub fn get_or_fail(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(MiningError::KeyNotFound)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.find_slot(key) {
            Probe::Found(index) => self.value_at_mut(index),
            Probe::Vacant(_) => None,
        }
    }

    /// Returns the value under `key`, inserting `default()` first when absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> Result<&mut V>
    where
        F: FnOnce() -> V,
    {
        let index = match self.find_slot(&key) {
            Probe::Found(index) => index,
            Probe::Vacant(_) => {
                self.reserve_one();
                // A rehash moves every entry, so probe again.
                let index = match self.find_slot(&key) {
                    Probe::Found(i) | Probe::Vacant(i) => i,
                };
                self.slots[index] = Slot::Occupied(Entry {
                    key,
                    value: default(),
                });
                self.len += 1;
                index
            }
        };

        self.value_at_mut(index).ok_or(MiningError::KeyNotFound)
    }

    fn value_at_mut(&mut self, index: usize) -> Option<&mut V> {
        match &mut self.slots[index] {
            Slot::Occupied(entry) => Some(&mut entry.value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        matches!(self.find_slot(key), Probe::Found(_))
    }

    /// Removes `key`, leaving a tombstone so later probes continue past it.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        match self.find_slot(key) {
            Probe::Found(index) => {
                let slot = std::mem::replace(&mut self.slots[index], Slot::Tombstone);
                self.len -= 1;
                match slot {
                    Slot::Occupied(entry) => Some(entry.value),
                    Slot::Empty | Slot::Tombstone => None,
                }
            }
            Probe::Vacant(_) => None,
        }
    }
}

impl<K, V> AssociativeMap<K, V> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Iterates occupied entries in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }
}

pub struct Iter<'a, K, V> {
    slots: std::slice::Iter<'a, Slot<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(entry) = slot {
                return Some((&entry.key, &entry.value));
            }
        }
        None
    }
}

pub struct IntoIter<K, V> {
    slots: std::vec::IntoIter<Slot<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(entry) = slot {
                return Some((entry.key, entry.value));
            }
        }
        None
    }
}

impl<'a, K, V> IntoIterator for &'a AssociativeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for AssociativeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slots: self.slots.into_iter(),
        }
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for AssociativeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for AssociativeMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for AssociativeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_overwrite() {
        let mut map = AssociativeMap::new();
        map.put(1, 2);
        map.put(3, 4);
        map.put(2, 5);
        map.put(1, 7);

        assert_eq!(map.get(&1), Some(&7));
        assert_eq!(map.get(&3), Some(&4));
        assert_eq!(map.get(&2), Some(&5));
        assert_eq!(map.get(&9), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_get_or_and_get_or_fail() {
        let mut map: AssociativeMap<&str, usize> = AssociativeMap::new();
        map.put("milk", 4);

        assert_eq!(map.get_or(&"milk", 0), 4);
        assert_eq!(map.get_or(&"beer", 0), 0);
        assert_eq!(map.get_or_fail(&"milk"), Ok(&4));
        assert_eq!(map.get_or_fail(&"beer"), Err(MiningError::KeyNotFound));
    }

    #[test]
    fn test_rehash_keeps_all_keys() {
        let mut map = AssociativeMap::new();
        assert_eq!(map.capacity(), 8);

        for i in 0..1000usize {
            map.put(i, i * 10);
            assert!(map.len() as f64 <= map.capacity() as f64 * map.load_factor());
            assert!(map.capacity().is_power_of_two());
        }

        assert_eq!(map.len(), 1000);
        assert!(map.capacity() >= 1024);
        for i in 0..1000usize {
            assert_eq!(map.get(&i), Some(&(i * 10)));
        }
    }

    #[test]
    fn test_with_tuning_rounds_capacity() {
        let tuning = Tuning { initial_capacity: 10, load_factor: 0.5 };
        let map: AssociativeMap<u32, u32> = AssociativeMap::with_tuning(&tuning).unwrap();
        assert_eq!(map.capacity(), 16);

        let bad = Tuning { initial_capacity: 8, load_factor: 1.0 };
        assert!(AssociativeMap::<u32, u32>::with_tuning(&bad).is_err());
    }

    #[test]
    fn test_rehash_before_insert_exceeding_load_factor() {
        let mut map = AssociativeMap::new();
        // 8 * 0.66 = 5.28, so the sixth key forces a doubling.
        for i in 0..5u32 {
            map.put(i, ());
        }
        assert_eq!(map.capacity(), 8);
        map.put(5, ());
        assert_eq!(map.capacity(), 16);
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn test_get_or_insert_with_counts() {
        let mut counts: AssociativeMap<char, usize> = AssociativeMap::new();
        for c in "abracadabra".chars() {
            *counts.get_or_insert_with(c, || 0).unwrap() += 1;
        }

        assert_eq!(counts.get(&'a'), Some(&5));
        assert_eq!(counts.get(&'b'), Some(&2));
        assert_eq!(counts.get(&'r'), Some(&2));
        assert_eq!(counts.get(&'c'), Some(&1));
        assert_eq!(counts.get(&'d'), Some(&1));
        assert_eq!(counts.len(), 5);
    }

    fn slot_of(map: &AssociativeMap<u32, u32>, key: u32) -> usize {
        match map.find_slot(&key) {
            Probe::Found(index) | Probe::Vacant(index) => index,
        }
    }

    #[test]
    fn test_remove_leaves_tombstone_and_reuses_it() {
        let mut map = AssociativeMap::new();
        for i in 0..5u32 {
            map.put(i, i);
        }
        let home = slot_of(&map, 2);

        assert_eq!(map.remove(&2), Some(2));
        assert_eq!(map.remove(&2), None);
        assert_eq!(map.len(), 4);
        assert!(!map.contains_key(&2));
        assert!(matches!(map.slots[home], Slot::Tombstone));

        // Keys probed past the tombstone stay reachable.
        for i in [0u32, 1, 3, 4] {
            assert_eq!(map.get(&i), Some(&i));
        }

        map.put(2, 20);
        assert_eq!(slot_of(&map, 2), home);
        assert!(matches!(&map.slots[home], Slot::Occupied(entry) if entry.key == 2));
        assert_eq!(map.get(&2), Some(&20));
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_get_or_insert_with_after_rehash() {
        let mut map: AssociativeMap<u32, u32> = AssociativeMap::new();
        for i in 0..5u32 {
            map.put(i, i);
        }
        assert_eq!(map.capacity(), 8);

        // The sixth key triggers a doubling before it is written.
        *map.get_or_insert_with(5, || 40).unwrap() += 2;
        assert_eq!(map.capacity(), 16);
        assert_eq!(map.get(&5), Some(&42));
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn test_lookup_terminates_when_tombstones_fill_table() {
        let mut map = AssociativeMap::new();
        for i in 0..500u32 {
            map.put(i, i);
            map.remove(&i);
        }

        assert!(map.is_empty());
        assert_eq!(map.capacity(), 8);
        assert_eq!(map.get(&10_000), None);

        map.put(10_000, 1);
        assert_eq!(map.get(&10_000), Some(&1));
    }

    #[test]
    fn test_iteration_is_deterministic() {
        let build = || {
            let mut map = AssociativeMap::new();
            for word in ["bread", "milk", "diaper", "beer", "egg", "cola"] {
                map.put(word.to_string(), word.len());
            }
            map
        };

        let first: Vec<_> = build().into_iter().collect();
        let second: Vec<_> = build().into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 6);
    }

    #[test]
    fn test_equality_ignores_slot_layout() {
        let a: AssociativeMap<u32, u32> = (0..20).map(|i| (i, i)).collect();
        let b: AssociativeMap<u32, u32> = (0..20).rev().map(|i| (i, i)).collect();
        assert_eq!(a, b);

        let mut c = b.clone();
        c.put(3, 99);
        assert_ne!(a, c);
    }
}
