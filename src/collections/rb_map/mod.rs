//! [`RbMap`] similar to [`std::collections::BTreeMap`], implemented as a red-black tree.
//!
//! # Differences compared to [`std::collections::BTreeMap`]
//!
//! The ordering is given by a comparator value implementing [`Compare`], rather than
//! always by [`Ord`]. The default comparator [`Natural`] uses [`Ord`].
//!
//! Inserting a key that is already present replaces the value but keeps the stored key.
//!
//! Cursors ( [`Cursor`], [`CursorMut`] ) are positioned on an element or on the end of the map,
//! and are obtained from [`RbMap::find`], [`RbMap::lower_bound`], [`RbMap::upper_bound`] and
//! [`RbMap::equal_range`] which take a key ( not a [`Bound`] ).
//!
//! # Example
//!
//! ```
//!     use rbtree_map::collections::rb_map::RbMap;
//!     let mut mymap = RbMap::new();
//!     mymap.insert("England", "London");
//!     mymap.insert("France", "Paris");
//!     println!("The capital of France is {}", mymap["France"]);
//! ```
//!
//!# Features
//!
//! This crate supports the following cargo features:
//! - `serde` : enables serialisation of [`RbMap`] via serde crate.
//! - `unsafe-optim` : uses unsafe code for extra optimisation.

use std::{
    borrow::Borrow,
    cmp::Ordering,
    error::Error,
    fmt,
    fmt::Debug,
    mem,
    ops::{Bound, RangeBounds},
};

use log::trace;

pub use crate::collections::compare::{Compare, Natural, Reversed};

mod node;
use node::{SearchResult, Tree};

mod insert;
mod remove;

mod cursor;
pub use cursor::{Cursor, CursorMut};

mod iter;
pub use iter::{IntoIter, IntoKeys, IntoValues, Iter, IterMut, Keys, Range, Values, ValuesMut};

mod check;
pub use check::InvariantError;

/// Ordered map of unique keys to values, stored in a red-black tree.
///
/// General guide to implementation:
///
/// [`RbMap`] has a length, a comparator and a `Tree`. The `Tree` owns all the nodes in
/// an arena and has a head ( the sentinel ) holding the root and the cached minimum and maximum.
///
/// Nodes refer to their parent and children by arena index. A node's parent index is only used
/// for navigation, so a [`Cursor`] can step to the next or previous element without a stack.
///
/// Insertion rebalances up the ancestor chain. Removal first moves the pair to be removed down
/// to a leaf, then resolves any black deficiency before unlinking the leaf.
pub struct RbMap<K, V, C = Natural> {
    len: usize,
    tree: Tree<K, V>,
    comp: C,
}
impl<K, V, C: Default> Default for RbMap<K, V, C> {
    /// Creates an empty RbMap.
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}
impl<K: Clone, V: Clone, C: Clone> Clone for RbMap<K, V, C> {
    fn clone(&self) -> Self {
        trace!("deep copy of map with {} elements", self.len);
        Self {
            len: self.len,
            tree: self.tree.clone(),
            comp: self.comp.clone(),
        }
    }

    /// Releases the current nodes before copying source.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.tree = source.tree.clone();
        self.comp = source.comp.clone();
        self.len = source.len;
    }
}

impl<K, V> RbMap<K, V> {
    /// Returns a new, empty map ordered by [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, V, C> RbMap<K, V, C> {
    /// Returns a new, empty map ordered by the specified comparator.
    ///
    /// # Example
    ///
    /// ```
    ///     use rbtree_map::collections::rb_map::{RbMap, Reversed, Natural};
    ///     let mut mymap = RbMap::with_comparator(Reversed(Natural));
    ///     mymap.insert(1, "one");
    ///     mymap.insert(2, "two");
    ///     assert_eq!(mymap.first_key_value(), Some((&2, &"two")));
    /// ```
    #[must_use]
    pub fn with_comparator(comp: C) -> Self {
        Self {
            len: 0,
            tree: Tree::new(),
            comp,
        }
    }

    /// Get a reference to the comparator.
    pub fn key_comp(&self) -> &C {
        &self.comp
    }

    /// Clear the map.
    pub fn clear(&mut self) {
        trace!("clearing map with {} elements", self.len);
        self.len = 0;
        self.tree.clear();
    }

    /// Get number of key-value pairs in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is the map empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Exchange the contents ( including the comparator ) of two maps. No element is moved.
    pub fn swap(&mut self, other: &mut Self) {
        trace!("swapping maps with {} and {} elements", self.len, other.len);
        mem::swap(self, other);
    }

    /// Move the contents out, leaving self empty ( with a copy of the comparator ).
    ///
    /// # Example
    ///
    /// ```
    ///     use rbtree_map::collections::RbMap;
    ///     let mut a = RbMap::from([(1, "a"), (2, "b")]);
    ///     let b = a.take();
    ///     assert!(a.is_empty() && b.len() == 2);
    ///     a.insert(3, "c");
    /// ```
    #[must_use]
    pub fn take(&mut self) -> Self
    where
        C: Clone,
    {
        Self {
            len: mem::replace(&mut self.len, 0),
            tree: self.tree.take(),
            comp: self.comp.clone(),
        }
    }

    /// Moves all elements from `other` into `self`, leaving `other` empty.
    ///
    /// If a key from `other` is already present in `self`, the respective
    /// value from `self` will be overwritten with the respective value from `other`.
    pub fn append(&mut self, other: &mut RbMap<K, V, C>)
    where
        C: Compare<K>,
    {
        let tree = mem::take(&mut other.tree);
        let len = mem::replace(&mut other.len, 0);
        for (k, v) in IntoIter::new(tree, len) {
            self.insert(k, v);
        }
    }

    /// Insert key-value pair into map, or if key is already in map, replaces value and returns old value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        C: Compare<K>,
    {
        self.upsert(key, value).1
    }

    /// Insert key-value pair into map, or if key is already in map, replace the value.
    ///
    /// Returns a cursor at the element, and whether a new element was created.
    ///
    /// # Example
    ///
    /// ```
    ///     use rbtree_map::collections::RbMap;
    ///     let mut map = RbMap::new();
    ///     let (_, created) = map.insert_entry(3, "Three");
    ///     assert!(created);
    ///     let (c, created) = map.insert_entry(3, "three");
    ///     assert!(!created && c.value() == Some(&"three"));
    /// ```
    pub fn insert_entry(&mut self, key: K, value: V) -> (CursorMut<'_, K, V, C>, bool)
    where
        C: Compare<K>,
    {
        let (x, old) = self.upsert(key, value);
        (CursorMut::new(self, Some(x)), old.is_none())
    }

    fn upsert(&mut self, key: K, value: V) -> (usize, Option<V>)
    where
        C: Compare<K>,
    {
        match self.tree.search(&key, &self.comp) {
            SearchResult::Found(x) => {
                let old = mem::replace(self.tree.nodes.kv_mut(x).1, value);
                (x, Some(old))
            }
            SearchResult::GoDown(parent, side) => {
                let x = self.tree.insert_at(parent, side, key, value);
                self.len += 1;
                (x, None)
            }
        }
    }

    /// Get a mutable reference to the value for key, inserting a default value first if key is absent.
    ///
    /// # Example
    ///
    /// ```
    ///     use rbtree_map::collections::RbMap;
    ///     let mut counts: RbMap<&str, usize> = RbMap::new();
    ///     for w in ["a", "b", "a"] {
    ///         *counts.get_or_default(w) += 1;
    ///     }
    ///     assert_eq!(counts["a"], 2);
    /// ```
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
        C: Compare<K>,
    {
        let x = match self.tree.search(&key, &self.comp) {
            SearchResult::Found(x) => x,
            SearchResult::GoDown(parent, side) => {
                self.len += 1;
                self.tree.insert_at(parent, side, key, V::default())
            }
        };
        self.tree.nodes.kv_mut(x).1
    }

    /// Get reference to the value corresponding to the key, or an error if the key is absent.
    pub fn at<Q>(&self, key: &Q) -> Result<&V, KeyNotFoundError>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.get(key).ok_or(KeyNotFoundError {})
    }

    /// Get mutable reference to the value corresponding to the key, or an error if the key is absent.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, KeyNotFoundError>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.get_mut(key).ok_or(KeyNotFoundError {})
    }

    /// Does the map have an entry for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.tree.find(key, &self.comp).is_some()
    }

    /// Number of entries with the specified key ( 0 or 1 ).
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        usize::from(self.contains_key(key))
    }

    /// Remove key-value pair from map, returning just the value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.remove_entry(key).map(|(_k, v)| v)
    }

    /// Remove key-value pair from map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let x = self.tree.find(key, &self.comp)?;
        let (kv, _) = self.tree.remove_node(x);
        self.len -= 1;
        Some(kv)
    }

    /// Remove the entry for key, returning the number of entries removed ( 0 or 1 ).
    pub fn erase<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        usize::from(self.remove_entry(key).is_some())
    }

    /// Remove all entries with keys in range, returning the number removed.
    ///
    /// # Example
    ///
    /// ```
    ///     use rbtree_map::collections::RbMap;
    ///     let mut map: RbMap<_, _> = (1..=7).map(|i| (i, i)).collect();
    ///     assert_eq!(map.remove_range(3..6), 3);
    ///     assert!(map.keys().copied().collect::<Vec<_>>() == [1, 2, 6, 7]);
    /// ```
    pub fn remove_range<Q, R>(&mut self, range: R) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
        R: RangeBounds<Q>,
    {
        let start = self.start_node(range.start_bound());
        let mut c = CursorMut::new(self, start);
        let mut removed = 0;
        while let Some(k) = c.key() {
            let k: &Q = k.borrow();
            let past_end = match range.end_bound() {
                Bound::Included(e) => c.map.comp.less(e, k),
                Bound::Excluded(e) => !c.map.comp.less(k, e),
                Bound::Unbounded => false,
            };
            if past_end {
                break;
            }
            c.remove_current();
            removed += 1;
        }
        removed
    }

    /// Remove first key-value pair from map.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let x = self.tree.head.min?;
        let (kv, _) = self.tree.remove_node(x);
        self.len -= 1;
        Some(kv)
    }

    /// Remove last key-value pair from map.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let x = self.tree.head.max?;
        let (kv, _) = self.tree.remove_node(x);
        self.len -= 1;
        Some(kv)
    }

    /// Remove all key-value pairs, visited in ascending order, for which f returns false.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut c = self.cursor_front_mut();
        while let Some((k, v)) = c.key_value_mut() {
            if f(k, v) {
                c.move_next();
            } else {
                c.remove_current();
            }
        }
    }

    /// Get reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Get a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let x = self.tree.find(key, &self.comp)?;
        Some(self.tree.nodes.kv_mut(x).1)
    }

    /// Get references to the corresponding key and value.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let x = self.tree.find(key, &self.comp)?;
        Some(self.tree.nodes.kv(x))
    }

    /// Get references to first key and value.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.cursor_front().key_value()
    }

    /// Gets references to last key and value.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.cursor_back().key_value()
    }

    /// Get iterator of references to key-value pairs.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.tree, self.len)
    }

    /// Get iterator of mutable references to key-value pairs.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.tree, self.len)
    }

    /// Get iterator for range of references to key-value pairs.
    ///
    /// # Panics
    ///
    /// Panics if range start is after range end, or if start and end are equal and both excluded.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
        R: RangeBounds<Q>,
    {
        check_range(&range, &self.comp);
        let front = self.start_node(range.start_bound());
        let back = match range.end_bound() {
            Bound::Included(k) => self.tree.upper_bound(k, &self.comp),
            Bound::Excluded(k) => self.tree.lower_bound(k, &self.comp),
            Bound::Unbounded => None,
        };
        let back = match back {
            Some(x) => self.tree.nodes.prev(x),
            None => self.tree.head.max,
        };
        if let (Some(f), Some(b)) = (front, back) {
            let nodes = &self.tree.nodes;
            let (fk, bk): (&Q, &Q) = (nodes.key(f).borrow(), nodes.key(b).borrow());
            if self.comp.less(bk, fk) {
                return Range::empty(nodes);
            }
        }
        Range::new(&self.tree.nodes, front, back)
    }

    fn start_node<Q>(&self, bound: Bound<&Q>) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        match bound {
            Bound::Included(k) => self.tree.lower_bound(k, &self.comp),
            Bound::Excluded(k) => self.tree.upper_bound(k, &self.comp),
            Bound::Unbounded => self.tree.head.min,
        }
    }

    /// Get iterator of references to keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Get iterator of references to values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Get iterator of mutable references to values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }

    /// Get consuming iterator that returns all the keys, in sorted order.
    #[must_use]
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys(self.into_iter())
    }

    /// Get consuming iterator that returns all the values, in sorted order.
    #[must_use]
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues(self.into_iter())
    }

    /// Get cursor at the element with the specified key, or at the end if there is none.
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        Cursor::new(self, self.tree.find(key, &self.comp))
    }

    /// Get a cursor that permits map mutation at the element with the specified key, or at the end.
    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let x = self.tree.find(key, &self.comp);
        CursorMut::new(self, x)
    }

    /// Get cursor at the first element with key not less than key ( or the end ).
    ///
    /// # Example
    ///
    /// ```
    ///     use rbtree_map::collections::RbMap;
    ///     let map = RbMap::from([(1, "a"), (3, "c"), (5, "e")]);
    ///     assert_eq!(map.lower_bound(&3).key(), Some(&3));
    ///     assert_eq!(map.lower_bound(&4).key(), Some(&5));
    ///     assert!(map.lower_bound(&6).is_end());
    /// ```
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        Cursor::new(self, self.tree.lower_bound(key, &self.comp))
    }

    /// Get cursor at the first element with key greater than key ( or the end ).
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        Cursor::new(self, self.tree.upper_bound(key, &self.comp))
    }

    /// Get cursors at [`RbMap::lower_bound`] and [`RbMap::upper_bound`] of key, using a single descent.
    pub fn equal_range<Q>(&self, key: &Q) -> (Cursor<'_, K, V, C>, Cursor<'_, K, V, C>)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let (lo, hi) = self.tree.equal_range(key, &self.comp);
        (Cursor::new(self, lo), Cursor::new(self, hi))
    }

    /// Get a cursor that permits map mutation at the first element with key not less than key.
    pub fn lower_bound_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let x = self.tree.lower_bound(key, &self.comp);
        CursorMut::new(self, x)
    }

    /// Get a cursor that permits map mutation at the first element with key greater than key.
    pub fn upper_bound_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let x = self.tree.upper_bound(key, &self.comp);
        CursorMut::new(self, x)
    }

    /// Get cursor at the first element ( the end if the map is empty ).
    #[must_use]
    pub fn cursor_front(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(self, self.tree.head.min)
    }

    /// Get cursor at the last element ( the end if the map is empty ).
    #[must_use]
    pub fn cursor_back(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(self, self.tree.head.max)
    }

    /// Get cursor at the end.
    #[must_use]
    pub fn cursor_end(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(self, None)
    }

    /// Get a cursor that permits map mutation at the first element.
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V, C> {
        let x = self.tree.head.min;
        CursorMut::new(self, x)
    }

    /// Get a cursor that permits map mutation at the last element.
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, K, V, C> {
        let x = self.tree.head.max;
        CursorMut::new(self, x)
    }
} // End impl RbMap

fn check_range<Q, R, C>(range: &R, comp: &C)
where
    Q: ?Sized,
    C: Compare<Q>,
    R: RangeBounds<Q>,
{
    use Bound::{Excluded, Included};
    match (range.start_bound(), range.end_bound()) {
        (Included(s) | Excluded(s), Included(e)) | (Included(s), Excluded(e)) => {
            assert!(!comp.less(e, s), "range start is greater than range end in RbMap");
        }
        (Excluded(s), Excluded(e)) => {
            assert!(
                !comp.equivalent(e, s),
                "range start and end are equal and excluded in RbMap"
            );
            assert!(!comp.less(e, s), "range start is greater than range end in RbMap");
        }
        _ => {}
    }
}

use std::hash::{Hash, Hasher};
impl<K: Hash, V: Hash, C> Hash for RbMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for elt in self {
            elt.hash(state);
        }
    }
}
impl<K: PartialEq, V: PartialEq, C> PartialEq for RbMap<K, V, C> {
    fn eq(&self, other: &RbMap<K, V, C>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}
impl<K: Eq, V: Eq, C> Eq for RbMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for RbMap<K, V, C> {
    fn partial_cmp(&self, other: &RbMap<K, V, C>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}
impl<K: Ord, V: Ord, C> Ord for RbMap<K, V, C> {
    fn cmp(&self, other: &RbMap<K, V, C>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}
impl<K, V, C> IntoIterator for RbMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Convert `RbMap` to [`IntoIter`].
    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::new(self.tree, self.len)
    }
}
impl<'a, K, V, C> IntoIterator for &'a RbMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
impl<'a, K, V, C> IntoIterator for &'a mut RbMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}
impl<K: Ord, V> FromIterator<(K, V)> for RbMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> RbMap<K, V> {
        let mut map = RbMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RbMap<K, V> {
    fn from(arr: [(K, V); N]) -> RbMap<K, V> {
        let mut map = RbMap::new();
        for (k, v) in arr {
            map.insert(k, v);
        }
        map
    }
}
impl<K, V, C: Compare<K>> Extend<(K, V)> for RbMap<K, V, C> {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
impl<'a, K: Copy, V: Copy, C: Compare<K>> Extend<(&'a K, &'a V)> for RbMap<K, V, C> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (&'a K, &'a V)>,
    {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}
impl<K, Q, V, C> std::ops::Index<&Q> for RbMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Compare<Q>,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// Panics if the key is not present in the `RbMap`.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("no entry found for key"),
        }
    }
}
impl<K: Debug, V: Debug, C> Debug for RbMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Error returned by [`RbMap::at`] and [`RbMap::at_mut`] when the key is not in the map.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct KeyNotFoundError {}
impl fmt::Display for KeyNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "given key is not in map")
    }
}
impl Error for KeyNotFoundError {}

#[cfg(feature = "serde")]
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

#[cfg(feature = "serde")]
impl<K: Serialize, V: Serialize, C> Serialize for RbMap<K, V, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct RbMapVisitor<K, V, C> {
    marker: std::marker::PhantomData<fn() -> RbMap<K, V, C>>,
}

#[cfg(feature = "serde")]
impl<K, V, C> RbMapVisitor<K, V, C> {
    fn new() -> Self {
        RbMapVisitor {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> Visitor<'de> for RbMapVisitor<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Compare<K> + Default,
{
    type Value = RbMap<K, V, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("RbMap")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut map = RbMap::default();
        while let Some((k, v)) = access.next_entry()? {
            map.insert(k, v);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> Deserialize<'de> for RbMap<K, V, C>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
    C: Compare<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RbMapVisitor::new())
    }
}

// Tests.

#[cfg(all(test, not(miri), feature = "cap"))]
#[global_allocator]
static ALLOCATOR: cap::Cap<std::alloc::System> = cap::Cap::new(std::alloc::System, usize::MAX);

#[cfg(test)]
fn print_memory() {
    #[cfg(all(test, not(miri), feature = "cap"))]
    println!("Memory allocated: {} bytes", ALLOCATOR.allocated());
}

/* mimalloc cannot be used with miri */
#[cfg(all(test, not(miri), not(feature = "cap")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(test)]
mod mytests;
