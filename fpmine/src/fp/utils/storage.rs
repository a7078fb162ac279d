use crate::fp::growth::PatternResult;
use crate::fp::Item;

/// Flat storage for item sets of one size: items back to back, with an
/// `(start, len)` offset and a support per item set.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsetStorage<I> {
    pub items: Vec<I>,
    pub offsets: Vec<(usize, usize)>,
    pub supports: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrequentLevel<I> {
    pub storage: ItemsetStorage<I>,
    pub itemset_size: usize,
}

impl<I> ItemsetStorage<I> {
    pub(crate) fn new() -> Self {
        Self { items: Vec::new(), offsets: Vec::new(), supports: Vec::new() }
    }

    pub(crate) fn get_itemset(&self, idx: usize) -> &[I] {
        let (start, len) = self.offsets[idx];
        &self.items[start..start + len]
    }

    pub(crate) fn len(&self) -> usize {
        self.offsets.len()
    }
}

impl<I: Ord> ItemsetStorage<I> {
    pub(crate) fn add_itemset_with_support(&mut self, mut items: Vec<I>, support: usize) {
        items.sort_unstable();
        items.dedup();
        let start = self.items.len();
        let len = items.len();
        self.items.extend(items);
        self.offsets.push((start, len));
        self.supports.push(support);
    }
}

impl<I> FrequentLevel<I> {
    pub fn new(itemset_size: usize) -> Self {
        Self { storage: ItemsetStorage::new(), itemset_size }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.len() == 0
    }

    pub fn get_itemset(&self, idx: usize) -> &[I] {
        self.storage.get_itemset(idx)
    }

    pub fn support(&self, idx: usize) -> usize {
        self.storage.supports[idx]
    }

    pub fn iter_itemsets(&self) -> impl Iterator<Item = &[I]> {
        (0..self.storage.len()).map(move |idx| self.get_itemset(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[I], usize)> {
        (0..self.storage.len()).map(move |idx| (self.get_itemset(idx), self.support(idx)))
    }
}

impl<I: Ord + Clone> FrequentLevel<I> {
    /// Stores `items` in sorted form and returns its index.
    pub fn add_itemset_with_support(&mut self, items: Vec<I>, support: usize) -> usize {
        self.storage.add_itemset_with_support(items, support);
        self.storage.len() - 1
    }

    /// Support of the item set holding exactly `items`, in any order.
    pub fn support_of(&self, items: &[I]) -> Option<usize> {
        let mut wanted = items.to_vec();
        wanted.sort_unstable();
        self.iter()
            .find(|(itemset, _)| *itemset == wanted.as_slice())
            .map(|(_, support)| support)
    }
}

/// Groups mined patterns by size.
///
/// Level `k - 1` holds the item sets of size `k`. Each item set is stored
/// sorted, and item sets within a level are sorted too, so the output does
/// not depend on discovery order.
pub fn levels<I: Item>(patterns: &PatternResult<I>) -> Vec<FrequentLevel<I>> {
    let mut canonical: Vec<(Vec<I>, usize)> = patterns
        .iter()
        .map(|(pattern, &support)| {
            let mut items = pattern.to_vec();
            items.sort_unstable();
            (items, support)
        })
        .collect();
    canonical.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    let mut result: Vec<FrequentLevel<I>> = Vec::new();
    for (items, support) in canonical {
        let size = items.len();
        if size == 0 {
            continue;
        }
        while result.len() < size {
            result.push(FrequentLevel::new(result.len() + 1));
        }
        result[size - 1].add_itemset_with_support(items, support);
    }
    result
}
