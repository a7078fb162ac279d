pub mod collections;
pub mod encoding;
pub mod growth;
pub mod utils;

use std::fmt;
use std::hash::Hash;

pub use collections::{AssociativeMap, DynamicSequence, ImmutableKey, SinglyLinkedChain};
pub use encoding::{transactions_from_matrix, OneHotDecoder};
pub use growth::{
    fpgrowth, mine, prefix_paths, preprocess, preprocess_with, GroupedTransactions, Miner,
    NodeId, PatternResult, PatternSink, PrefixNode, PrefixTree,
};
pub use utils::{levels, FrequentLevel, ItemsetStorage};

/// Anything usable as a transaction item.
///
/// `Ord` fixes the order among items of equal frequency.
pub trait Item: Hash + Eq + Ord + Clone + fmt::Debug {}

impl<T: Hash + Eq + Ord + Clone + fmt::Debug> Item for T {}
