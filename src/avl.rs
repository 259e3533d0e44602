use std::{cmp::Ordering, fmt::Debug, mem};

use log::{debug, trace};

use crate::{
    compare::{Comparator, Natural},
    depth::Depth,
    error::Error,
    iter::Iter,
    node::Node,
    tree::{self, BinaryTree, Stats},
};

/// Avl manage a single instance of in-memory sorted index using
/// [AVL][avl] tree.
///
/// Values are unique with respect to the comparator `C`, which defaults
/// to [`Natural`] ordering.
///
/// ```
/// use avl_index::{Avl, BinaryTree};
///
/// let mut index: Avl<i64> = Avl::new("sorted");
/// for v in 1..=7 {
///     index.insert(v).unwrap();
/// }
/// assert_eq!(index.height(), 2);
/// assert!(index.remove(&4));
/// assert_eq!(index.to_vec(), vec![1, 2, 3, 5, 6, 7]);
/// ```
///
/// [avl]: https://en.wikipedia.org/wiki/AVL_tree
pub struct Avl<T, C = Natural> {
    name: String,
    root: Option<Box<Node<T>>>,
    n_count: usize, // number of entries in the tree.
    version: u64,   // bumped on every mutation.
    instance: u64,  // process-wide identity, see BinaryTree::instance.
    comparator: C,
}

/// Different ways to construct a new Avl instance with natural ordering.
impl<T> Avl<T, Natural>
where
    T: Ord,
{
    /// Create an empty instance of Avl, identified by `name`.
    /// Applications can choose unique names.
    pub fn new<S>(name: S) -> Avl<T, Natural>
    where
        S: AsRef<str>,
    {
        Avl::with_comparator(name, Natural)
    }

    /// Create a new instance of Avl tree and load it with values from
    /// `iter`. Values must be unique, construction fails on the first
    /// duplicate.
    pub fn load_from<S, I>(name: S, iter: I) -> Result<Avl<T, Natural>, Error>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = T>,
    {
        Avl::load_with(name, Natural, iter)
    }
}

/// Different ways to construct a new Avl instance with custom ordering.
impl<T, C> Avl<T, C>
where
    C: Comparator<T>,
{
    /// Create an empty instance of Avl, ordered by `comparator`.
    pub fn with_comparator<S>(name: S, comparator: C) -> Avl<T, C>
    where
        S: AsRef<str>,
    {
        Avl {
            name: name.as_ref().to_string(),
            root: Default::default(),
            n_count: Default::default(),
            version: Default::default(),
            instance: tree::next_instance(),
            comparator,
        }
    }

    /// Same as [`Avl::load_from`], ordered by `comparator`.
    pub fn load_with<S, I>(name: S, comparator: C, iter: I) -> Result<Avl<T, C>, Error>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = T>,
    {
        let mut index = Avl::with_comparator(name, comparator);
        for value in iter {
            index.insert(value)?;
        }
        debug!(target: "avl_index", "{}: loaded {} entries", index.name, index.n_count);
        Ok(index)
    }
}

/// Maintenance API.
impl<T, C> Avl<T, C>
where
    C: Comparator<T>,
{
    /// Identify this instance. Applications can choose unique names while
    /// creating Avl instances.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Validate AVL tree with following rules:
    ///
    /// * Values are in sort-order as per the comparator.
    /// * Cached height of every node matches its subtree.
    /// * Balance factor of every node is within -1..=1.
    /// * Number of reachable nodes matches the entry count.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, Error>
    where
        T: Debug,
    {
        let mut depths = Depth::new();
        let n = tree::validate_tree::<T, _>(self, &mut depths)?;
        tree::validate_heights(self.root())?;
        if n != self.n_count {
            let (expected, found) = (self.n_count, n);
            return Err(Error::CountMismatch { expected, found });
        }
        let mut stats = self.stats();
        stats.set_shape::<T, _>(self, depths);
        Ok(stats)
    }
}

// Which way an insert descended from a subtree root.
#[derive(Clone, Copy)]
enum Path {
    Leaf, // subtree root is the new node.
    Left,
    Right,
}

type Insert<T> = (Box<Node<T>>, Result<Path, Error>);

type Delete<T> = (Option<Box<Node<T>>>, Option<T>);

/// Write operations on Avl instance.
impl<T, C> Avl<T, C>
where
    C: Comparator<T>,
{
    /// Insert a new value into the index. If an equal value is already
    /// present return [`Error::DuplicateKey`] and leave the index as is.
    pub fn insert(&mut self, value: T) -> Result<(), Error> {
        let root = self.root.take();
        let (root, res) = Avl::do_insert(&self.comparator, root, value);
        self.root = Some(root);
        res?;
        self.n_count += 1;
        self.version += 1;
        Ok(())
    }

    /// Remove the value comparing equal to `value`. Return false if it
    /// was not present, in which case the index is left as is.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Remove the value comparing equal to `value` and return the stored
    /// value.
    pub fn take(&mut self, value: &T) -> Option<T> {
        if !self.contains(value) {
            return None;
        }
        let root = self.root.take();
        let (root, old_value) = Avl::do_remove(&self.comparator, root, value);
        self.root = root;
        if old_value.is_some() {
            self.n_count -= 1;
            self.version += 1;
        }
        old_value
    }

    /// Remove all entries, identity and comparator are retained.
    pub fn clear(&mut self) {
        debug!(target: "avl_index", "{}: clear {} entries", self.name, self.n_count);
        self.root = None;
        self.n_count = 0;
        self.version += 1;
    }
}

impl<T, C> Avl<T, C>
where
    C: Comparator<T>,
{
    fn do_insert(cmp: &C, node: Option<Box<Node<T>>>, value: T) -> Insert<T> {
        let mut node = match node {
            None => return (Node::new(value), Ok(Path::Leaf)),
            Some(node) => node,
        };

        match cmp.compare(&node.value, &value) {
            Ordering::Greater => {
                let (left, res) = Avl::do_insert(cmp, node.left.take(), value);
                node.left = Some(left);
                match res {
                    Ok(path) => (Avl::<T, C>::insert_fixup(node, path), Ok(Path::Left)),
                    Err(err) => (node, Err(err)),
                }
            }
            Ordering::Less => {
                let (right, res) = Avl::do_insert(cmp, node.right.take(), value);
                node.right = Some(right);
                match res {
                    Ok(path) => (Avl::<T, C>::insert_fixup(node, path), Ok(Path::Right)),
                    Err(err) => (node, Err(err)),
                }
            }
            Ordering::Equal => (node, Err(Error::DuplicateKey)),
        }
    }

    // `child` is the way insert descended from the child on the heavy
    // side, equivalent to comparing the new value with that child.
    fn insert_fixup(mut node: Box<Node<T>>, child: Path) -> Box<Node<T>> {
        node.update_height();
        let bf = node.balance();
        if bf > 1 {
            if let Path::Right = child {
                // left-right
                let left = node.left.take().map(Avl::<T, C>::rotate_left);
                node.left = left;
            }
            Avl::<T, C>::rotate_right(node)
        } else if bf < -1 {
            if let Path::Left = child {
                // right-left
                let right = node.right.take().map(Avl::<T, C>::rotate_right);
                node.right = right;
            }
            Avl::<T, C>::rotate_left(node)
        } else {
            node
        }
    }

    fn do_remove(cmp: &C, node: Option<Box<Node<T>>>, value: &T) -> Delete<T> {
        let mut node = match node {
            None => return (None, None),
            Some(node) => node,
        };

        match cmp.compare(&node.value, value) {
            Ordering::Greater => {
                let (left, old_value) = Avl::do_remove(cmp, node.left.take(), value);
                node.left = left;
                (Some(Avl::<T, C>::remove_fixup(node)), old_value)
            }
            Ordering::Less => {
                let (right, old_value) = Avl::do_remove(cmp, node.right.take(), value);
                node.right = right;
                (Some(Avl::<T, C>::remove_fixup(node)), old_value)
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, None) => (None, Some(node.value)),
                (Some(child), None) | (None, Some(child)) => (Some(child), Some(node.value)),
                (Some(left), Some(right)) => {
                    // in-order successor takes the place of value.
                    let (right, successor) = Avl::<T, C>::delete_min(right);
                    let old_value = mem::replace(&mut node.value, successor);
                    node.left = Some(left);
                    node.right = right;
                    (Some(Avl::<T, C>::remove_fixup(node)), Some(old_value))
                }
            },
        }
    }

    fn delete_min(mut node: Box<Node<T>>) -> (Option<Box<Node<T>>>, T) {
        match node.left.take() {
            None => (node.right.take(), node.value),
            Some(left) => {
                let (left, min) = Avl::<T, C>::delete_min(left);
                node.left = left;
                (Some(Avl::<T, C>::remove_fixup(node)), min)
            }
        }
    }

    // Delete has no inserted value to steer by, the heavy child's own
    // balance factor picks single or double rotation. Ties go single.
    fn remove_fixup(mut node: Box<Node<T>>) -> Box<Node<T>> {
        node.update_height();
        let bf = node.balance();
        if bf > 1 {
            if node.left().map_or(0, Node::balance) < 0 {
                // left-right
                let left = node.left.take().map(Avl::<T, C>::rotate_left);
                node.left = left;
            }
            Avl::<T, C>::rotate_right(node)
        } else if bf < -1 {
            if node.right().map_or(0, Node::balance) > 0 {
                // right-left
                let right = node.right.take().map(Avl::<T, C>::rotate_right);
                node.right = right;
            }
            Avl::<T, C>::rotate_left(node)
        } else {
            node
        }
    }

    //--------- rotation routines ----------------

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //          left      x              node      xr
    //                   / \             /  \
    //                 xl   xr        left   xl
    //
    fn rotate_left(mut node: Box<Node<T>>) -> Box<Node<T>> {
        trace!(target: "avl_index", "rotate left, height {}", node.height);
        let mut x = match node.right.take() {
            Some(x) => x,
            None => panic!("rotate_left(): no right child ? Call the programmer"),
        };
        node.right = x.left.take();
        node.update_height();
        x.left = Some(node);
        x.update_height();
        x
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //           x      right             xl      node
    //          / \                               / \
    //        xl   xr                            xr  right
    //
    fn rotate_right(mut node: Box<Node<T>>) -> Box<Node<T>> {
        trace!(target: "avl_index", "rotate right, height {}", node.height);
        let mut x = match node.left.take() {
            Some(x) => x,
            None => panic!("rotate_right(): no left child ? Call the programmer"),
        };
        node.left = x.right.take();
        node.update_height();
        x.right = Some(node);
        x.update_height();
        x
    }
}

impl<T, C> BinaryTree<T> for Avl<T, C>
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

    /// Read from the cached height of the root, constant time.
    #[inline]
    fn height(&self) -> isize {
        Node::cached_height(self.root()) as isize - 1
    }
}

impl<T, C> Clone for Avl<T, C>
where
    T: Clone,
    C: Clone,
{
    fn clone(&self) -> Avl<T, C> {
        Avl {
            name: self.name.clone(),
            root: self.root.clone(),
            n_count: self.n_count,
            version: self.version,
            instance: tree::next_instance(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a Avl<T, C>
where
    C: Comparator<T>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
