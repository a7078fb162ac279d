//! Frequent item set mining with FP-Growth.
//!
//! Raw transactions are grouped by [`preprocess`], compressed into a
//! [`PrefixTree`] and mined recursively through conditional pattern bases.
//! Every map in the pipeline is an [`AssociativeMap`], an open-addressing
//! table with perturbed probing.
//!
//! ```
//! use fpmine::{fpgrowth, preprocess, ImmutableKey};
//!
//! let transactions = vec![
//!     vec!["bread", "milk"],
//!     vec!["bread", "diaper", "beer", "egg"],
//!     vec!["milk", "diaper", "beer", "cola"],
//!     vec!["bread", "milk", "diaper", "beer"],
//!     vec!["bread", "milk", "diaper", "cola"],
//! ];
//!
//! let grouped = preprocess(&transactions, 3).unwrap();
//! let patterns = fpgrowth(&grouped, 3).unwrap();
//! assert_eq!(patterns.get(&ImmutableKey::new(vec!["beer", "diaper"])), Some(&3));
//! ```

pub mod config;
pub mod error;
pub mod fp;

pub use config::{MinerConfig, OneHotConfig, Tuning};
pub use error::{MiningError, Result};
pub use fp::{
    fpgrowth, levels, mine, prefix_paths, preprocess, preprocess_with, transactions_from_matrix,
    AssociativeMap, DynamicSequence, FrequentLevel, GroupedTransactions, ImmutableKey, Item,
    ItemsetStorage, Miner, NodeId, OneHotDecoder, PatternResult, PatternSink, PrefixNode,
    PrefixTree, SinglyLinkedChain,
};
