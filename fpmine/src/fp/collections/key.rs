//! Read-only item sequence usable as a map key.

use super::sequence::DynamicSequence;
use crate::error::Result;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

const KEY_HASH_MASK: u64 = 0x7FFF_FFFF;

/// An ordered sequence of items, frozen at construction.
///
/// Equality and hashing are structural and order-sensitive: `[a, b]` and
/// `[b, a]` are different keys. The hash is the fold
/// `acc = (acc * 31 + hash(item)) & 0x7FFF_FFFF` over the items in order,
/// computed once when the key is built.
#[derive(Clone)]
pub struct ImmutableKey<I> {
    items: DynamicSequence<I>,
    hash: u32,
}

fn item_hash<I: Hash>(item: &I) -> u64 {
    let mut hasher = DefaultHasher::new();
    item.hash(&mut hasher);
    hasher.finish()
}

impl<I: Hash> ImmutableKey<I> {
    pub fn new<T: IntoIterator<Item = I>>(items: T) -> Self {
        Self::from_sequence(items.into_iter().collect())
    }

    pub fn from_sequence(items: DynamicSequence<I>) -> Self {
        let hash = items.iter().fold(0u64, |acc, item| {
            acc.wrapping_mul(31).wrapping_add(item_hash(item)) & KEY_HASH_MASK
        });
        Self {
            items,
            hash: hash as u32,
        }
    }

    /// Returns a new key holding these items followed by `item`.
    pub fn with_suffix(&self, item: I) -> Self
    where
        I: Clone,
    {
        Self::new(self.items.iter().cloned().chain(std::iter::once(item)))
    }
}

impl<I> ImmutableKey<I> {
    pub fn structural_hash(&self) -> u32 {
        self.hash
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&I> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &I> + '_ {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<I>
    where
        I: Clone,
    {
        self.items.to_vec()
    }
}

impl<I: PartialEq> PartialEq for ImmutableKey<I> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.items.len() == other.items.len()
            && self.items.iter().zip(other.items.iter()).all(|(a, b)| a == b)
    }
}

impl<I: Eq> Eq for ImmutableKey<I> {}

impl<I> Hash for ImmutableKey<I> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash);
    }
}

impl<I: Hash> From<DynamicSequence<I>> for ImmutableKey<I> {
    fn from(items: DynamicSequence<I>) -> Self {
        Self::from_sequence(items)
    }
}

impl<I: Hash> From<Vec<I>> for ImmutableKey<I> {
    fn from(items: Vec<I>) -> Self {
        Self::new(items)
    }
}

impl<I: Hash + Clone> From<&[I]> for ImmutableKey<I> {
    fn from(items: &[I]) -> Self {
        Self::new(items.iter().cloned())
    }
}

impl<I: Hash> FromIterator<I> for ImmutableKey<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<I: fmt::Debug> fmt::Debug for ImmutableKey<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}
