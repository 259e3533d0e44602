//! Sorted in-memory index over unique values, as a self-balancing
//! [`Avl`] tree or a plain unbalanced [`Bst`].
//!
//! Both share the read-only surface in [`BinaryTree`]: lookups, shape
//! metrics, eager traversals, lazy stack-based iterators and detached
//! [`Cursor`]s that fail once the tree is mutated under them.

mod avl;
mod bst;
mod compare;
mod depth;
mod error;
mod iter;
mod node;
mod tree;

pub use crate::avl::Avl;
pub use crate::bst::Bst;
pub use crate::compare::{Comparator, Natural};
pub use crate::depth::Depth;
pub use crate::error::Error;
pub use crate::iter::{Cursor, Iter, Reverse};
pub use crate::node::Node;
pub use crate::tree::{BinaryTree, Stats};

#[cfg(test)]
mod avl_test;
