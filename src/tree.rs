use std::{
    cmp::Ordering,
    fmt::Debug,
    mem,
    sync::atomic::{self, AtomicU64},
};

use crate::{
    depth::Depth,
    error::Error,
    iter::{Cursor, Iter, Reverse},
    node::{self, Node},
};

static INSTANCES: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_instance() -> u64 {
    INSTANCES.fetch_add(1, atomic::Ordering::Relaxed)
}

/// Read-only surface shared by [`Avl`](crate::Avl) and [`Bst`](crate::Bst).
///
/// Implementors supply the root, the mutation version, the ordering
/// and the entry count. Everything else is derived from the node links.
pub trait BinaryTree<T> {
    /// Return the root node, None for an empty tree.
    fn root(&self) -> Option<&Node<T>>;

    /// Return the mutation version. It is bumped by every insert, remove
    /// and clear, never by a read operation.
    fn version(&self) -> u64;

    /// Return an identity unique to this instance within the process.
    /// Clones get an identity of their own.
    fn instance(&self) -> u64;

    /// Compare two values using this tree's comparator.
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// Return number of entries in this instance.
    fn len(&self) -> usize;

    /// Check whether this index is empty.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the stored value comparing equal to `value`.
    fn get(&self, value: &T) -> Option<&T> {
        let mut node = self.root();
        while let Some(nref) = node {
            node = match self.compare(&nref.value, value) {
                Ordering::Less => nref.right(),
                Ordering::Greater => nref.left(),
                Ordering::Equal => return Some(&nref.value),
            };
        }
        None
    }

    /// Check whether a value comparing equal to `value` is present.
    fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Return the smallest value.
    fn first(&self) -> Option<&T> {
        let mut nref = self.root()?;
        while let Some(left) = nref.left() {
            nref = left;
        }
        Some(&nref.value)
    }

    /// Return the largest value.
    fn last(&self) -> Option<&T> {
        let mut nref = self.root()?;
        while let Some(right) = nref.right() {
            nref = right;
        }
        Some(&nref.value)
    }

    /// Return the number of edges from root to the deepest leaf,
    /// -1 for an empty tree.
    fn height(&self) -> isize {
        node::levels(self.root()) as isize - 1
    }

    /// Return the number of nodes without children.
    fn leaf_count(&self) -> usize {
        node::leaves(self.root())
    }

    /// Return the maximum number of nodes found at any depth.
    fn width(&self) -> usize {
        node::width(self.root())
    }

    /// Visit every value, node before its left and right subtrees.
    fn traverse_pre_order<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        node::pre_order(self.root(), &mut visit)
    }

    /// Visit every value in ascending order.
    fn traverse_in_order<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(|value| visit(value))
    }

    /// Visit every value, node after its left and right subtrees.
    fn traverse_post_order<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        node::post_order(self.root(), &mut visit)
    }

    /// Visit every value in descending order.
    fn traverse_in_reverse_order<F>(&self, mut visit: F)
    where
        F: FnMut(&T),
    {
        self.iter_rev().for_each(|value| visit(value))
    }

    /// Return a lazy iterator over all values in ascending order.
    fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root())
    }

    /// Return a lazy iterator over all values in descending order.
    fn iter_rev(&self) -> Reverse<'_, T> {
        Reverse::new(self.root())
    }

    /// Return a detached cursor over all values in ascending order,
    /// refer to [`Cursor`] for details.
    fn cursor(&self) -> Cursor<T>
    where
        T: Clone,
    {
        Cursor::new(self, false /*reverse*/)
    }

    /// Return a detached cursor over all values in descending order.
    fn cursor_rev(&self) -> Cursor<T>
    where
        T: Clone,
    {
        Cursor::new(self, true /*reverse*/)
    }

    /// Copy all values, in ascending order, into `dest` starting at
    /// `offset`. Nothing is copied if `dest` can't hold all the values.
    fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<(), Error>
    where
        T: Clone,
    {
        if offset > dest.len() {
            let msg = format!("offset {} beyond length {}", offset, dest.len());
            return Err(Error::InvalidArgument(msg));
        }
        if dest.len() - offset < self.len() {
            let msg = format!(
                "need {} slots at offset {}, have {}",
                self.len(),
                offset,
                dest.len() - offset
            );
            return Err(Error::InvalidArgument(msg));
        }
        for (slot, value) in dest[offset..].iter_mut().zip(self.iter()) {
            *slot = value.clone();
        }
        Ok(())
    }

    /// Collect all values, in ascending order.
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Return quickly with basic statistics, only entries() and
    /// node_size() are valid with this statistics.
    fn stats(&self) -> Stats {
        Stats::new(self.len(), mem::size_of::<Node<T>>())
    }
}

// Walk the full tree with an explicit stack, verifying sort order and
// sampling leaf depths into `depths`. Return the number of reachable
// nodes.
pub(crate) fn validate_tree<T, R>(tree: &R, depths: &mut Depth) -> Result<usize, Error>
where
    T: Debug,
    R: BinaryTree<T> + ?Sized,
{
    type Frame<'a, T> = (&'a Node<T>, Option<&'a T>, Option<&'a T>, usize);

    let mut stack: Vec<Frame<'_, T>> = vec![];
    if let Some(root) = tree.root() {
        stack.push((root, None, None, 0));
    }

    let mut count = 0;
    while let Some((node, low, high, depth)) = stack.pop() {
        if let Some(low) = low {
            if tree.compare(low, &node.value) != Ordering::Less {
                let err = format!("{:?} not after {:?}", node.value, low);
                return Err(Error::SortError(err));
            }
        }
        if let Some(high) = high {
            if tree.compare(&node.value, high) != Ordering::Less {
                let err = format!("{:?} not before {:?}", node.value, high);
                return Err(Error::SortError(err));
            }
        }
        if node.is_leaf() {
            depths.sample(depth);
        }
        count += 1;

        if let Some(right) = node.right() {
            stack.push((right, Some(&node.value), high, depth + 1));
        }
        if let Some(left) = node.left() {
            stack.push((left, low, Some(&node.value), depth + 1));
        }
    }

    Ok(count)
}

// Verify cached heights and balance factors, return the subtree height
// counted in nodes. Recurses, meant for height-balanced trees only.
pub(crate) fn validate_heights<T>(node: Option<&Node<T>>) -> Result<usize, Error>
where
    T: Debug,
{
    let node = match node {
        None => return Ok(0),
        Some(node) => node,
    };

    let lh = validate_heights(node.left())?;
    let rh = validate_heights(node.right())?;
    let height = 1 + lh.max(rh);

    if node.height != height {
        let (v, h) = (&node.value, node.height);
        let err = format!("{:?} cached {} actual {}", v, h, height);
        return Err(Error::HeightMismatch(err));
    }
    let bf = lh as isize - rh as isize;
    if bf.abs() > 1 {
        let err = format!("{:?} balance factor {}", node.value, bf);
        return Err(Error::Unbalanced(err));
    }

    Ok(height)
}

/// Statistics on [`Avl`](crate::Avl) and [`Bst`](crate::Bst) trees.
/// Serves two purpose:
///
/// * To get partial but quick statistics via [`BinaryTree::stats`] method.
/// * To get full statistics via the `validate` method of each tree.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize, // number of entries in the tree.
    node_size: usize,
    height: Option<isize>,
    leaves: Option<usize>,
    width: Option<usize>,
    depths: Option<Depth>,
}

impl Stats {
    pub(crate) fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            height: Default::default(),
            leaves: Default::default(),
            width: Default::default(),
            depths: Default::default(),
        }
    }

    pub(crate) fn set_shape<T, R>(&mut self, tree: &R, depths: Depth)
    where
        R: BinaryTree<T> + ?Sized,
    {
        self.height = Some(tree.height());
        self.leaves = Some(tree.leaf_count());
        self.width = Some(tree.width());
        self.depths = Some(depths);
    }

    /// Return number entries in the tree.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `Node<T>`. Although
    /// the node overhead is constant, the node size varies based on
    /// value type. EG:
    ///
    /// ```
    /// use avl_index::{Avl, BinaryTree};
    /// let index: Avl<u64> = Avl::new("myinstance");
    ///
    /// // size of value: 8 bytes
    /// // overhead is 24 bytes
    /// assert_eq!(index.stats().node_size(), 32);
    /// ```
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return tree height in edges, -1 for empty tree.
    #[inline]
    pub fn height(&self) -> Option<isize> {
        self.height
    }

    /// Return number of leaf nodes.
    #[inline]
    pub fn leaves(&self) -> Option<usize> {
        self.leaves
    }

    /// Return maximum number of nodes at any depth.
    #[inline]
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    /// Return [`Depth`] statistics, None when no leaf was sampled.
    pub fn depths(&self) -> Option<Depth> {
        match self.depths.as_ref() {
            Some(depths) if depths.samples() > 0 => Some(depths.clone()),
            _ => None,
        }
    }
}
