pub mod builder;
pub mod mining;
pub mod tree;

pub use builder::{preprocess, preprocess_with};
pub use mining::{fpgrowth, mine, prefix_paths, Miner, PatternResult, PatternSink};
pub use tree::{GroupedTransactions, NodeId, PrefixNode, PrefixTree, ROOT};
