use crate::config::{validate_min_support, Tuning};
use crate::error::{MiningError, Result};
use crate::fp::collections::{AssociativeMap, DynamicSequence, ImmutableKey, SinglyLinkedChain};
use crate::fp::Item;
use tracing::debug;

/// Ordered item sequences mapped to how many transactions share them.
pub type GroupedTransactions<I> = AssociativeMap<ImmutableKey<I>, usize>;

/// Handle to a node in a `PrefixTree` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// The synthetic root every tree starts with.
pub const ROOT: NodeId = NodeId(0);

#[derive(Debug, Clone)]
pub struct PrefixNode<I> {
    pub item: Option<I>,
    pub count: usize,
    pub parent: Option<NodeId>,
    pub children: AssociativeMap<I, NodeId>,
}

/// FP-tree over grouped transactions, with its header and frequency tables.
///
/// Nodes live in an arena owned by the tree. Children maps, parent links and
/// header chains all hold `NodeId` handles, so dropping the tree frees the
/// whole structure at once.
#[derive(Debug, Clone)]
pub struct PrefixTree<I> {
    nodes: Vec<PrefixNode<I>>,
    header_table: AssociativeMap<I, SinglyLinkedChain<NodeId>>,
    frequency_table: AssociativeMap<I, usize>,
    min_support: usize,
    tuning: Tuning,
}

impl<I: Item> PrefixNode<I> {
    fn new_root(tuning: &Tuning) -> Result<Self> {
        Ok(Self {
            item: None,
            count: 0,
            parent: None,
            children: AssociativeMap::with_tuning(tuning)?,
        })
    }

    fn new_item(item: I, count: usize, parent: NodeId, tuning: &Tuning) -> Result<Self> {
        Ok(Self {
            item: Some(item),
            count,
            parent: Some(parent),
            children: AssociativeMap::with_tuning(tuning)?,
        })
    }
}

impl<I: Item> PrefixTree<I> {
    /// Builds the tree from `grouped`, keeping only items whose total
    /// multiplicity reaches `min_support`.
    pub fn build(
        grouped: &GroupedTransactions<I>,
        min_support: usize,
        tuning: &Tuning,
    ) -> Result<Self> {
        validate_min_support(min_support)?;
        tuning.validate()?;

        let mut tree = Self {
            nodes: vec![PrefixNode::new_root(tuning)?],
            header_table: AssociativeMap::with_tuning(tuning)?,
            frequency_table: AssociativeMap::with_tuning(tuning)?,
            min_support,
            tuning: *tuning,
        };

        let item_counts = tree.count_item_frequency(grouped)?;
        tree.filter_by_support(item_counts);
        tree.init_header_table();
        for (transaction, &count) in grouped {
            tree.insert_transaction(transaction, count)?;
        }

        debug!(
            items = tree.frequency_table.len(),
            nodes = tree.nodes.len(),
            min_support,
            "built prefix tree"
        );
        Ok(tree)
    }

    fn count_item_frequency(
        &self,
        grouped: &GroupedTransactions<I>,
    ) -> Result<AssociativeMap<I, usize>> {
        let mut counts = AssociativeMap::with_tuning(&self.tuning)?;
        for (transaction, &count) in grouped {
            for item in transaction.iter() {
                *counts.get_or_insert_with(item.clone(), || 0)? += count;
            }
        }
        Ok(counts)
    }

    fn filter_by_support(&mut self, item_counts: AssociativeMap<I, usize>) {
        for (item, count) in item_counts {
            if count >= self.min_support {
                self.frequency_table.put(item, count);
            }
        }
    }

    fn init_header_table(&mut self) {
        for item in self.frequency_table.keys() {
            self.header_table.put(item.clone(), SinglyLinkedChain::new());
        }
    }

    fn insert_transaction(&mut self, transaction: &ImmutableKey<I>, count: usize) -> Result<()> {
        let mut cursor = ROOT;

        for item in transaction.iter() {
            if self.frequency_table.get_or(item, 0) < self.min_support {
                continue;
            }

            let existing = self.nodes[cursor.0].children.get(item).copied();
            cursor = match existing {
                Some(child) => {
                    self.nodes[child.0].count += count;
                    child
                }
                None => {
                    let child = NodeId(self.nodes.len());
                    self.nodes
                        .push(PrefixNode::new_item(item.clone(), count, cursor, &self.tuning)?);
                    self.nodes[cursor.0].children.put(item.clone(), child);
                    self.header_table
                        .get_mut(item)
                        .ok_or(MiningError::KeyNotFound)?
                        .append(child);
                    child
                }
            };
        }
        Ok(())
    }
}

impl<I> PrefixTree<I> {
    pub fn root(&self) -> &PrefixNode<I> {
        &self.nodes[ROOT.0]
    }

    /// Panics if `id` was not handed out by this tree.
    pub fn node(&self, id: NodeId) -> &PrefixNode<I> {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn min_support(&self) -> usize {
        self.min_support
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn frequency_table(&self) -> &AssociativeMap<I, usize> {
        &self.frequency_table
    }

    pub fn header_table(&self) -> &AssociativeMap<I, SinglyLinkedChain<NodeId>> {
        &self.header_table
    }

    /// True when at least one item survived the support filter.
    pub fn has_items(&self) -> bool {
        !self.frequency_table.is_empty()
    }

    /// Items on the path from `id` up to the root, nearest first, root excluded.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, I> {
        Ancestors {
            tree: self,
            cursor: self.nodes.get(id.0).and_then(|node| node.parent),
        }
    }
}

impl<I: Item> PrefixTree<I> {
    pub fn frequency(&self, item: &I) -> Option<usize> {
        self.frequency_table.get(item).copied()
    }

    /// Every node carrying `item`, in creation order.
    pub fn nodes_for(&self, item: &I) -> Result<&SinglyLinkedChain<NodeId>> {
        self.header_table.get_or_fail(item)
    }

    /// Surviving items with their support, by ascending frequency, ties by
    /// ascending item order. This is the order conditional trees are mined in.
    pub fn items_by_frequency(&self) -> Result<DynamicSequence<(I, usize)>> {
        let mut items = DynamicSequence::with_tuning(&self.tuning)?;
        for (item, &count) in &self.frequency_table {
            items.push((item.clone(), count));
        }
        items.sort_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| a.cmp(b)));
        Ok(items)
    }
}

pub struct Ancestors<'a, I> {
    tree: &'a PrefixTree<I>,
    cursor: Option<NodeId>,
}

impl<'a, I> Iterator for Ancestors<'a, I> {
    type Item = &'a I;

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.tree.nodes[self.cursor?.0];
        self.cursor = node.parent;
        // The root carries no item, which ends the walk.
        node.item.as_ref()
    }
}
