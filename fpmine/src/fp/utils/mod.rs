pub mod storage;

pub use storage::{levels, FrequentLevel, ItemsetStorage};
