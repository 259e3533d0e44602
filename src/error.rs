use thiserror::Error;

/// Error enumerates over all possible errors that this package
/// shall return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Returned by insert() API when an equal value is already present.
    /// Tree is left untouched.
    #[error("duplicate key")]
    DuplicateKey,
    /// Argument is out of range, like offset and capacity for copy_to().
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Returned by [`Cursor`](crate::Cursor) when the tree was mutated
    /// after the cursor was created.
    #[error("concurrent modification, expected version {expected} found {found}")]
    ConcurrentModification { expected: u64, found: u64 },
    /// Fatal case, index entries are not in sort-order. The String
    /// component carries the offending pair for debugging.
    #[error("sort error: {0}")]
    SortError(String),
    /// Fatal case, cached height of a node does not match its subtree.
    #[error("height mismatch: {0}")]
    HeightMismatch(String),
    /// Fatal case, balance factor of a node is outside -1..=1.
    #[error("unbalanced node: {0}")]
    Unbalanced(String),
    /// Fatal case, number of reachable nodes differs from the count.
    #[error("count mismatch, expected {expected} found {found}")]
    CountMismatch { expected: usize, found: usize },
}
