//! Growable indexable sequence over a fixed slot array.
//!
//! Growth is decided by occupancy: before every write (push or set, including
//! overwrites) the array doubles if `len / capacity` exceeds the load factor.
//! Slots at or beyond `len` are always vacant.

use crate::config::Tuning;
use crate::error::{MiningError, Result};
use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub struct DynamicSequence<T> {
    slots: Vec<Option<T>>,
    len: usize,
    load_factor: f64,
}

impl<T> Default for DynamicSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DynamicSequence<T> {
    pub fn new() -> Self {
        let tuning = Tuning::default();
        Self::from_parts(tuning.initial_capacity, tuning.load_factor)
    }

    pub fn with_tuning(tuning: &Tuning) -> Result<Self> {
        tuning.validate()?;
        Ok(Self::from_parts(tuning.initial_capacity, tuning.load_factor))
    }

    fn from_parts(capacity: usize, load_factor: f64) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            len: 0,
            load_factor,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn grow(&mut self) {
        let new_capacity = self.slots.len() * 2;
        self.slots.resize_with(new_capacity, || None);
    }

    fn grow_if_loaded(&mut self) {
        if self.len as f64 / self.slots.len() as f64 > self.load_factor {
            self.grow();
        }
    }

    pub fn push(&mut self, value: T) {
        self.grow_if_loaded();
        if self.len == self.slots.len() {
            self.grow();
        }
        self.slots[self.len] = Some(value);
        self.len += 1;
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        if index >= self.len {
            return Err(MiningError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        self.slots[index]
            .as_ref()
            .ok_or(MiningError::IndexOutOfRange {
                index,
                len: self.len,
            })
    }

    /// Writes `value` at `index`, which may be anywhere below the capacity.
    /// Writing at or past `len` extends `len` to `index + 1`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.grow_if_loaded();
        if index >= self.slots.len() {
            return Err(MiningError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            });
        }
        if index >= self.len {
            self.len = index + 1;
        }
        self.slots[index] = Some(value);
        Ok(())
    }

    pub fn iter(&self) -> std::iter::Flatten<std::slice::Iter<'_, Option<T>>> {
        self.slots[..self.len].iter().flatten()
    }

    /// Stable sort of the stored elements. Holes are squeezed out.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut values: Vec<T> = self.slots[..self.len]
            .iter_mut()
            .filter_map(Option::take)
            .collect();
        values.sort_by(&mut compare);

        self.len = values.len();
        for (slot, value) in self.slots.iter_mut().zip(values) {
            *slot = Some(value);
        }
    }

    pub fn sort_by_key<K, F>(&mut self, mut key: F, descending: bool)
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.sort_by(|a, b| {
            let ordering = key(a).cmp(&key(b));
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    pub fn reverse(&mut self) {
        self.slots[..self.len].reverse();
    }

    /// Drops every element; the capacity is kept.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.len = 0;
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<'a, T> IntoIterator for &'a DynamicSequence<T> {
    type Item = &'a T;
    type IntoIter = std::iter::Flatten<std::slice::Iter<'a, Option<T>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> FromIterator<T> for DynamicSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sequence = Self::new();
        sequence.extend(iter);
        sequence
    }
}

impl<T> Extend<T> for DynamicSequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T: PartialEq> PartialEq for DynamicSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for DynamicSequence<T> {}
