use std::{cmp::Ordering, iter::FusedIterator};

use log::{trace, warn};

use crate::{error::Error, node::Node, tree::BinaryTree};

/// Iterate over values in ascending order, created by
/// [`BinaryTree::iter`].
///
/// Pending nodes are held on an explicit stack, hence iteration does not
/// recurse and can be suspended between items. The iterator borrows the
/// tree, so the tree can't be mutated while it is alive.
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Iter<'a, T> {
        let mut iter = Iter { stack: vec![] };
        iter.push_spine(root);
        iter
    }

    fn push_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(nref) = node {
            self.stack.push(nref);
            node = nref.left();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_spine(node.right());
        Some(&node.value)
    }
}

impl<'a, T> FusedIterator for Iter<'a, T> {}

/// Iterate over values in descending order, created by
/// [`BinaryTree::iter_rev`].
pub struct Reverse<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Reverse<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Reverse<'a, T> {
        let mut iter = Reverse { stack: vec![] };
        iter.push_spine(root);
        iter
    }

    fn push_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(nref) = node {
            self.stack.push(nref);
            node = nref.right();
        }
    }
}

impl<'a, T> Iterator for Reverse<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_spine(node.left());
        Some(&node.value)
    }
}

impl<'a, T> FusedIterator for Reverse<'a, T> {}

/// Cursor is a detached, version-stamped iterator over a tree, created by
/// [`BinaryTree::cursor`] and [`BinaryTree::cursor_rev`].
///
/// Unlike [`Iter`], a cursor does not borrow the tree between steps, so
/// the tree can be mutated while a traversal is suspended. Every call to
/// [`Cursor::advance`] compares the tree's live version with the version
/// captured at creation and fails with [`Error::ConcurrentModification`]
/// on mismatch, instead of returning stale values. A cursor is bound to
/// the tree instance it was created from, advancing it over any other
/// tree fails with [`Error::InvalidArgument`].
///
/// Holding no borrow, the cursor keeps pending values, not nodes, and
/// each advance locates the popped value again by descending from the
/// root. A step costs O(depth): O(log n) on [`Avl`](crate::Avl), up to
/// O(n) on a degenerate [`Bst`](crate::Bst). Prefer [`Iter`] when the
/// tree needn't change mid-traversal.
///
/// ```
/// use avl_index::{Avl, BinaryTree, Error};
///
/// let mut index: Avl<i64> = Avl::load_from("cursor", vec![2, 1, 3]).unwrap();
/// let mut cur = index.cursor();
/// assert_eq!(cur.advance(&index), Ok(Some(1)));
///
/// index.insert(4).unwrap();
/// match cur.advance(&index) {
///     Err(Error::ConcurrentModification { .. }) => (),
///     res => panic!("unexpected {:?}", res),
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Cursor<T> {
    stack: Vec<T>, // pending values, top of stack is the next value.
    version: u64,
    instance: u64,
    reverse: bool,
    current: Option<T>,
}

impl<T> Cursor<T>
where
    T: Clone,
{
    pub(crate) fn new<R>(tree: &R, reverse: bool) -> Cursor<T>
    where
        R: BinaryTree<T> + ?Sized,
    {
        let mut cursor = Cursor {
            stack: vec![],
            version: tree.version(),
            instance: tree.instance(),
            reverse,
            current: None,
        };
        cursor.push_spine(tree.root());
        cursor
    }

    /// Return the tree version captured when this cursor was created.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Return the value yielded by the last successful advance.
    #[inline]
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Move to the next value, in ascending order for [`BinaryTree::cursor`]
    /// and descending order for [`BinaryTree::cursor_rev`]. Return
    /// `Ok(None)` once the traversal is complete.
    pub fn advance<R>(&mut self, tree: &R) -> Result<Option<T>, Error>
    where
        R: BinaryTree<T> + ?Sized,
    {
        if tree.instance() != self.instance {
            let msg = "cursor advanced on a tree it was not created from";
            return Err(Error::InvalidArgument(msg.to_string()));
        }
        if tree.version() != self.version {
            warn!(
                target: "avl_index",
                "cursor version {} is stale, tree at {}",
                self.version,
                tree.version()
            );
            return Err(Error::ConcurrentModification {
                expected: self.version,
                found: tree.version(),
            });
        }

        let value = match self.stack.pop() {
            Some(value) => value,
            None => {
                self.current = None;
                return Ok(None);
            }
        };

        // re-locate the popped node, the tree is unchanged since creation.
        let node = match locate(tree, &value) {
            Some(node) => node,
            None => {
                let msg = "pending value not found, comparator is not a total order";
                return Err(Error::InvalidArgument(msg.to_string()));
            }
        };
        let next = if self.reverse {
            node.left()
        } else {
            node.right()
        };
        self.push_spine(next);

        self.current = Some(value.clone());
        Ok(Some(value))
    }

    /// Rewind this cursor to its initial position. The captured version
    /// is retained, hence a tree mutated since creation still fails the
    /// next advance.
    pub fn reset<R>(&mut self, tree: &R)
    where
        R: BinaryTree<T> + ?Sized,
    {
        trace!(target: "avl_index", "cursor reset at version {}", self.version);
        self.stack.clear();
        self.current = None;
        self.push_spine(tree.root());
    }

    fn push_spine(&mut self, mut node: Option<&Node<T>>) {
        while let Some(nref) = node {
            self.stack.push(nref.value.clone());
            node = if self.reverse {
                nref.right()
            } else {
                nref.left()
            };
        }
    }
}

fn locate<'a, T, R>(tree: &'a R, value: &T) -> Option<&'a Node<T>>
where
    R: BinaryTree<T> + ?Sized,
{
    let mut node = tree.root();
    while let Some(nref) = node {
        node = match tree.compare(&nref.value, value) {
            Ordering::Less => nref.right(),
            Ordering::Greater => nref.left(),
            Ordering::Equal => return Some(nref),
        };
    }
    None
}
