pub mod chain;
pub mod key;
pub mod map;
pub mod sequence;

pub use chain::SinglyLinkedChain;
pub use key::ImmutableKey;
pub use map::{AssociativeMap, Entry};
pub use sequence::DynamicSequence;
