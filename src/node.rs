use std::ops::Deref;

/// Node corresponds to a single entry in [`Avl`](crate::Avl) or
/// [`Bst`](crate::Bst) instance.
#[derive(Clone, Debug)]
pub struct Node<T> {
    pub(crate) value: T,
    pub(crate) height: usize,              // store: AVL subtree height
    pub(crate) left: Option<Box<Node<T>>>,  // store: left child
    pub(crate) right: Option<Box<Node<T>>>, // store: right child
}

// Primary operations on a single node.
impl<T> Node<T> {
    // CREATE operation
    pub(crate) fn new(value: T) -> Box<Node<T>> {
        Box::new(Node {
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    /// Return the value held by this node.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Return the left child, holding values lesser than this node.
    #[inline]
    pub fn left(&self) -> Option<&Node<T>> {
        self.left.as_ref().map(Deref::deref)
    }

    /// Return the right child, holding values greater than this node.
    #[inline]
    pub fn right(&self) -> Option<&Node<T>> {
        self.right.as_ref().map(Deref::deref)
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    // cached height, maintained only by the balancing tree.
    #[inline]
    pub(crate) fn cached_height(node: Option<&Node<T>>) -> usize {
        node.map_or(0, |node| node.height)
    }

    #[inline]
    pub(crate) fn update_height(&mut self) {
        let (l, r) = (
            Node::cached_height(self.left()),
            Node::cached_height(self.right()),
        );
        self.height = 1 + l.max(r);
    }

    // balance factor, left height minus right height.
    #[inline]
    pub(crate) fn balance(&self) -> isize {
        let l = Node::cached_height(self.left()) as isize;
        let r = Node::cached_height(self.right()) as isize;
        l - r
    }
}

// Structural walks, computed from the links and never from the cached
// height so that they hold for the plain BST as well. None of them
// recurse, a degenerate BST is as deep as it is long.

// walk level by level, handing each level's nodes to `visit`.
fn levelwise<'a, T, F>(root: Option<&'a Node<T>>, mut visit: F)
where
    F: FnMut(&[&'a Node<T>]),
{
    let mut level: Vec<&'a Node<T>> = root.into_iter().collect();
    while !level.is_empty() {
        visit(&level);
        level = level
            .into_iter()
            .flat_map(|node| node.left().into_iter().chain(node.right()))
            .collect();
    }
}

// number of nodes on the longest root-to-leaf path.
pub(crate) fn levels<T>(root: Option<&Node<T>>) -> usize {
    let mut levels = 0;
    levelwise(root, |_| levels += 1);
    levels
}

pub(crate) fn leaves<T>(root: Option<&Node<T>>) -> usize {
    let mut leaves = 0;
    levelwise(root, |level| {
        leaves += level.iter().filter(|node| node.is_leaf()).count()
    });
    leaves
}

// maximum number of nodes found at any single depth.
pub(crate) fn width<T>(root: Option<&Node<T>>) -> usize {
    let mut max = 0;
    levelwise(root, |level| max = max.max(level.len()));
    max
}

pub(crate) fn pre_order<T, F>(root: Option<&Node<T>>, visit: &mut F)
where
    F: FnMut(&T),
{
    let mut stack: Vec<&Node<T>> = root.into_iter().collect();
    while let Some(node) = stack.pop() {
        visit(&node.value);
        stack.extend(node.right());
        stack.extend(node.left());
    }
}

pub(crate) fn post_order<T, F>(root: Option<&Node<T>>, visit: &mut F)
where
    F: FnMut(&T),
{
    // node-right-left order, replayed backwards.
    let mut stack: Vec<&Node<T>> = root.into_iter().collect();
    let mut order: Vec<&Node<T>> = Vec::with_capacity(stack.len());
    while let Some(node) = stack.pop() {
        order.push(node);
        stack.extend(node.left());
        stack.extend(node.right());
    }
    order.into_iter().rev().for_each(|node| visit(&node.value));
}

// Tear down a subtree without recursing into the children's drop.
pub(crate) fn drain<T>(root: Option<Box<Node<T>>>) {
    let mut stack: Vec<Box<Node<T>>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}
