use std::{cmp::Ordering, fmt::Debug, mem};

use log::debug;

use crate::{
    compare::{Comparator, Natural},
    depth::Depth,
    error::Error,
    iter::Iter,
    node::{self, Node},
    tree::{self, BinaryTree, Stats},
};

/// Bst manage a single instance of in-memory sorted index using an
/// unbalanced binary search tree.
///
/// Shape depends on the insertion order, sorted input degenerates into
/// a linked list. Use [`Avl`](crate::Avl) for a height bound.
///
/// ```
/// use avl_index::{BinaryTree, Bst};
///
/// let index: Bst<i64> = Bst::load_from("sorted", 1..=7).unwrap();
/// assert_eq!(index.height(), 6);
/// assert_eq!(index.width(), 1);
/// ```
pub struct Bst<T, C = Natural> {
    name: String,
    root: Option<Box<Node<T>>>,
    n_count: usize,
    version: u64,
    instance: u64,
    comparator: C,
}

impl<T> Bst<T, Natural>
where
    T: Ord,
{
    /// Create an empty instance of Bst, identified by `name`.
    pub fn new<S>(name: S) -> Bst<T, Natural>
    where
        S: AsRef<str>,
    {
        Bst::with_comparator(name, Natural)
    }

    /// Create a new instance of Bst and load it with values from `iter`,
    /// in iteration order. Fails on the first duplicate.
    pub fn load_from<S, I>(name: S, iter: I) -> Result<Bst<T, Natural>, Error>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = T>,
    {
        Bst::load_with(name, Natural, iter)
    }
}

impl<T, C> Bst<T, C>
where
    C: Comparator<T>,
{
    /// Create an empty instance of Bst, ordered by `comparator`.
    pub fn with_comparator<S>(name: S, comparator: C) -> Bst<T, C>
    where
        S: AsRef<str>,
    {
        Bst {
            name: name.as_ref().to_string(),
            root: Default::default(),
            n_count: Default::default(),
            version: Default::default(),
            instance: tree::next_instance(),
            comparator,
        }
    }

    /// Same as [`Bst::load_from`], ordered by `comparator`.
    pub fn load_with<S, I>(name: S, comparator: C, iter: I) -> Result<Bst<T, C>, Error>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = T>,
    {
        let mut index = Bst::with_comparator(name, comparator);
        for value in iter {
            index.insert(value)?;
        }
        debug!(target: "avl_index", "{}: loaded {} entries", index.name, index.n_count);
        Ok(index)
    }

    /// Identify this instance.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Validate sort-order and entry count, and return full statistics.
    /// Cached heights are not maintained by Bst and are not checked.
    pub fn validate(&self) -> Result<Stats, Error>
    where
        T: Debug,
    {
        let mut depths = Depth::new();
        let n = tree::validate_tree::<T, _>(self, &mut depths)?;
        if n != self.n_count {
            let (expected, found) = (self.n_count, n);
            return Err(Error::CountMismatch { expected, found });
        }
        let mut stats = self.stats();
        stats.set_shape::<T, _>(self, depths);
        Ok(stats)
    }
}

#[cfg(test)]
impl<T> Bst<T, Natural>
where
    T: Ord,
{
    // Right-leaning chain over ascending `values`, the shape repeated
    // insertion would build, without its quadratic descent.
    pub(crate) fn chain_from<S>(name: S, values: Vec<T>) -> Bst<T, Natural>
    where
        S: AsRef<str>,
    {
        let mut index = Bst::new(name);
        for value in values.into_iter().rev() {
            let mut node = Node::new(value);
            node.right = index.root.take();
            index.root = Some(node);
            index.n_count += 1;
            index.version += 1;
        }
        index
    }
}

// Write operations walk down with a mutable slot instead of recursing,
// degenerate trees can be as deep as they are long.
impl<T, C> Bst<T, C>
where
    C: Comparator<T>,
{
    /// Insert a new value. If an equal value is already present return
    /// [`Error::DuplicateKey`] and leave the index as is.
    pub fn insert(&mut self, value: T) -> Result<(), Error> {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = match self.comparator.compare(&node.value, &value) {
                Ordering::Greater => &mut node.left,
                Ordering::Less => &mut node.right,
                Ordering::Equal => return Err(Error::DuplicateKey),
            };
        }
        *slot = Some(Node::new(value));
        self.n_count += 1;
        self.version += 1;
        Ok(())
    }

    /// Remove the value comparing equal to `value`. Return false if it
    /// was not present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Remove the value comparing equal to `value` and return the stored
    /// value.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let mut slot = &mut self.root;
        loop {
            let ord = self.comparator.compare(&slot.as_ref()?.value, value);
            if ord == Ordering::Equal {
                break;
            }
            let node = slot.as_mut()?;
            slot = match ord {
                Ordering::Greater => &mut node.left,
                _ => &mut node.right,
            };
        }

        let two_children = match slot.as_ref() {
            Some(node) => node.left.is_some() && node.right.is_some(),
            None => return None,
        };
        let old_value = if two_children {
            // in-order successor takes the place of value.
            let node = slot.as_mut()?;
            let successor = take_min(&mut node.right)?;
            mem::replace(&mut node.value, successor)
        } else {
            let mut node = slot.take()?;
            *slot = node.left.take().or_else(|| node.right.take());
            node.value
        };
        self.n_count -= 1;
        self.version += 1;
        Some(old_value)
    }

    /// Remove all entries, identity and comparator are retained.
    pub fn clear(&mut self) {
        debug!(target: "avl_index", "{}: clear {} entries", self.name, self.n_count);
        node::drain(self.root.take());
        self.n_count = 0;
        self.version += 1;
    }
}

fn take_min<T>(mut slot: &mut Option<Box<Node<T>>>) -> Option<T> {
    while slot.as_ref()?.left.is_some() {
        slot = &mut slot.as_mut()?.left;
    }
    let mut node = slot.take()?;
    *slot = node.right.take();
    Some(node.value)
}

impl<T, C> BinaryTree<T> for Bst<T, C>
where
    C: Comparator<T>,
{
    #[inline]
    fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    #[inline]
    fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    fn instance(&self) -> u64 {
        self.instance
    }

    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.comparator.compare(a, b)
    }

    #[inline]
    fn len(&self) -> usize {
        self.n_count
    }
}

impl<T, C> Drop for Bst<T, C> {
    fn drop(&mut self) {
        node::drain(self.root.take())
    }
}

impl<'a, T, C> IntoIterator for &'a Bst<T, C>
where
    C: Comparator<T>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
