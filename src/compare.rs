use std::cmp::Ordering;

/// Total order over values stored in a tree.
///
/// Implemented for [`Natural`] and for any closure of the shape
/// `Fn(&T, &T) -> Ordering`, so ad-hoc orders can be passed directly:
///
/// ```
/// use avl_index::{Avl, BinaryTree};
///
/// let mut index = Avl::with_comparator("rev", |a: &i32, b: &i32| b.cmp(a));
/// for v in [3, 1, 2].iter() {
///     index.insert(*v).unwrap();
/// }
/// assert_eq!(index.to_vec(), vec![3, 2, 1]);
/// ```
pub trait Comparator<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Natural ordering of `T`, via [`Ord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<T> Comparator<T> for Natural
where
    T: Ord,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
