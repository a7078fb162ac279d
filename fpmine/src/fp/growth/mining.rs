use super::builder::preprocess_with;
use super::tree::{GroupedTransactions, PrefixTree};
use crate::config::MinerConfig;
use crate::error::Result;
use crate::fp::collections::{AssociativeMap, DynamicSequence, ImmutableKey};
use crate::fp::Item;
use tracing::{info, trace};

/// Frequent item sets, in discovery order, mapped to their support.
pub type PatternResult<I> = AssociativeMap<ImmutableKey<I>, usize>;

/// Receives every pattern `mine` discovers.
pub trait PatternSink<I> {
    fn record(&mut self, pattern: ImmutableKey<I>, support: usize);
}

impl<I: Item> PatternSink<I> for AssociativeMap<ImmutableKey<I>, usize> {
    fn record(&mut self, pattern: ImmutableKey<I>, support: usize) {
        self.put(pattern, support);
    }
}

/// Keeps every recorded pattern in arrival order.
impl<I> PatternSink<I> for Vec<(ImmutableKey<I>, usize)> {
    fn record(&mut self, pattern: ImmutableKey<I>, support: usize) {
        self.push((pattern, support));
    }
}

/// Conditional pattern base of `item`: the root-first path above every node
/// carrying `item`, weighted by that node's count. Nodes hanging directly
/// off the root contribute nothing.
pub fn prefix_paths<I: Item>(item: &I, tree: &PrefixTree<I>) -> Result<GroupedTransactions<I>> {
    let mut paths = GroupedTransactions::with_tuning(tree.tuning())?;

    for &node_id in tree.nodes_for(item)? {
        let count = tree.node(node_id).count;
        let mut path = DynamicSequence::with_tuning(tree.tuning())?;
        for ancestor in tree.ancestors(node_id) {
            path.push(ancestor.clone());
        }

        if path.is_empty() {
            continue;
        }
        path.reverse();
        *paths.get_or_insert_with(ImmutableKey::from_sequence(path), || 0)? += count;
    }

    Ok(paths)
}

/// Depth-first FP-Growth over `tree`.
///
/// Every surviving item yields the pattern `suffix ++ [item]` with the
/// item's support in this tree; the conditional tree built from the item's
/// prefix paths is then mined with the extended suffix.
pub fn mine<I, S>(tree: &PrefixTree<I>, suffix: &DynamicSequence<I>, sink: &mut S) -> Result<()>
where
    I: Item,
    S: PatternSink<I>,
{
    let items = tree.items_by_frequency()?;
    trace!(
        suffix_len = suffix.len(),
        items = items.len(),
        nodes = tree.node_count(),
        "mining prefix tree"
    );

    for (item, support) in &items {
        let mut new_suffix = suffix.clone();
        new_suffix.push(item.clone());
        sink.record(ImmutableKey::new(new_suffix.iter().cloned()), *support);

        let paths = prefix_paths(item, tree)?;
        if paths.is_empty() {
            continue;
        }

        let conditional = PrefixTree::build(&paths, tree.min_support(), tree.tuning())?;
        if conditional.has_items() {
            mine(&conditional, &new_suffix, sink)?;
        }
    }

    Ok(())
}

/// Mines `grouped` with `min_support` and the default tuning.
pub fn fpgrowth<I: Item>(
    grouped: &GroupedTransactions<I>,
    min_support: usize,
) -> Result<PatternResult<I>> {
    Miner::new(MinerConfig::with_min_support(min_support))?.fpgrowth(grouped)
}

/// Runs the mining pipeline under one validated `MinerConfig`.
#[derive(Debug, Clone)]
pub struct Miner {
    config: MinerConfig,
}

impl Miner {
    pub fn new(config: MinerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    pub fn preprocess<I, T>(&self, transactions: &[T]) -> Result<GroupedTransactions<I>>
    where
        I: Item,
        T: AsRef<[I]>,
    {
        preprocess_with(transactions, self.config.min_support, &self.config.tuning)
    }

    pub fn build_tree<I: Item>(&self, grouped: &GroupedTransactions<I>) -> Result<PrefixTree<I>> {
        PrefixTree::build(grouped, self.config.min_support, &self.config.tuning)
    }

    /// Mines `tree` into `sink`, starting from an empty suffix.
    pub fn mine_into<I, S>(&self, tree: &PrefixTree<I>, sink: &mut S) -> Result<()>
    where
        I: Item,
        S: PatternSink<I>,
    {
        let suffix = DynamicSequence::with_tuning(&self.config.tuning)?;
        mine(tree, &suffix, sink)
    }

    pub fn fpgrowth<I: Item>(&self, grouped: &GroupedTransactions<I>) -> Result<PatternResult<I>> {
        let tree = self.build_tree(grouped)?;
        let mut patterns = PatternResult::with_tuning(&self.config.tuning)?;
        self.mine_into(&tree, &mut patterns)?;

        info!(
            patterns = patterns.len(),
            min_support = self.config.min_support,
            "fp-growth finished"
        );
        Ok(patterns)
    }

    /// Preprocesses raw transactions and mines them.
    pub fn run<I, T>(&self, transactions: &[T]) -> Result<PatternResult<I>>
    where
        I: Item,
        T: AsRef<[I]>,
    {
        let grouped = self.preprocess(transactions)?;
        self.fpgrowth(&grouped)
    }
}
