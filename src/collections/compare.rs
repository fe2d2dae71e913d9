//! Key comparators for [`RbMap`](crate::collections::RbMap).

use std::fmt;

/// A strict weak ordering on `T`.
///
/// Two values `a` and `b` are equivalent when neither `less(a, b)` nor `less(b, a)` holds.
/// A map never holds two equivalent keys.
///
/// Any `Fn(&T, &T) -> bool` closure is a comparator.
///
/// # Example
///
/// ```
/// use rbtree_map::collections::RbMap;
/// let mut map = RbMap::with_comparator(|a: &i32, b: &i32| a > b);
/// map.insert(1, "one");
/// map.insert(3, "three");
/// map.insert(2, "two");
/// assert!(map.keys().copied().collect::<Vec<_>>() == [3, 2, 1]);
/// ```
pub trait Compare<T: ?Sized> {
    /// Is `a` ordered before `b`?
    fn less(&self, a: &T, b: &T) -> bool;

    /// Is `a` equivalent to `b`?
    fn equivalent(&self, a: &T, b: &T) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Comparator using the [`Ord`] implementation of the key. This is the default.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

impl fmt::Debug for Natural {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Natural")
    }
}

/// Comparator that reverses another comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: Compare<T>> Compare<T> for Reversed<C> {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self.0.less(b, a)
    }
}
