//! Data structures backing the eviction policies

mod linked_set;

pub use linked_set::{Iter, LinkedKeySet};
