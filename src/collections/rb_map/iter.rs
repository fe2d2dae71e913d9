use std::{fmt, fmt::Debug, iter::FusedIterator, marker::PhantomData};

use super::node::{self, Links, NodeVec, Side, Tree};

// Immutable reference iteration.

/// Iterator returned by [`RbMap::range`](super::RbMap::range).
///
/// `front` and `back` are the next elements to be returned from each end, both None once exhausted.
pub struct Range<'a, K, V> {
    nodes: &'a NodeVec<K, V>,
    front: Option<usize>,
    back: Option<usize>,
}

impl<'a, K, V> Range<'a, K, V> {
    pub(super) fn new(nodes: &'a NodeVec<K, V>, front: Option<usize>, back: Option<usize>) -> Self {
        if front.is_none() || back.is_none() {
            return Self::empty(nodes);
        }
        Self { nodes, front, back }
    }

    pub(super) fn empty(nodes: &'a NodeVec<K, V>) -> Self {
        Self {
            nodes,
            front: None,
            back: None,
        }
    }
}

impl<'a, K, V> Clone for Range<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, K: Debug, V: Debug> Debug for Range<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.front?;
        if self.back == Some(x) {
            self.front = None;
            self.back = None;
        } else {
            self.front = self.nodes.next(x);
        }
        let nodes = self.nodes;
        Some(nodes.kv(x))
    }
}
impl<'a, K, V> DoubleEndedIterator for Range<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let x = self.back?;
        if self.front == Some(x) {
            self.front = None;
            self.back = None;
        } else {
            self.back = self.nodes.prev(x);
        }
        let nodes = self.nodes;
        Some(nodes.kv(x))
    }
}
impl<'a, K, V> FusedIterator for Range<'a, K, V> {}

/// Iterator returned by [`RbMap::iter`](super::RbMap::iter).
pub struct Iter<'a, K, V> {
    len: usize,
    inner: Range<'a, K, V>,
}
impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(tree: &'a Tree<K, V>, len: usize) -> Self {
        Self {
            len,
            inner: Range::new(&tree.nodes, tree.head.min, tree.head.max),
        }
    }
}
impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            len: self.len,
            inner: self.inner.clone(),
        }
    }
}
impl<'a, K: Debug, V: Debug> Debug for Iter<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            self.inner.next()
        }
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}
impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}
impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            self.inner.next_back()
        }
    }
}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

// Mutable reference iteration.

/// Iterator returned by [`RbMap::iter_mut`](super::RbMap::iter_mut).
///
/// Walks the links while handing out references into the separate pair storage,
/// each pair at most once.
pub struct IterMut<'a, K, V> {
    links: &'a [Links],
    pairs: *mut Option<(K, V)>,
    front: Option<usize>,
    back: Option<usize>,
    len: usize,
    _pd: PhantomData<&'a mut (K, V)>,
}

unsafe impl<'a, K: Sync, V: Send> Send for IterMut<'a, K, V> {}
unsafe impl<'a, K: Sync, V: Sync> Sync for IterMut<'a, K, V> {}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(super) fn new(tree: &'a mut Tree<K, V>, len: usize) -> Self {
        let (front, back) = (tree.head.min, tree.head.max);
        let (links, pairs) = tree.nodes.split_mut();
        Self {
            links,
            pairs,
            front,
            back,
            len,
            _pd: PhantomData,
        }
    }

    fn pair(&mut self, x: usize) -> Option<(&'a K, &'a mut V)> {
        // Safety: x is an occupied node, and front/back never pass each other, so each pair is visited once.
        unsafe {
            match &mut *self.pairs.add(x) {
                Some((k, v)) => Some((&*k, v)),
                None => None,
            }
        }
    }

    /// Read-only walk over the pairs not yet returned.
    fn remaining(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        let links: &[Links] = self.links;
        let pairs = self.pairs;
        let mut x = self.front;
        (0..self.len).map_while(move |_| {
            let i = x?;
            x = node::step(links, i, Side::Right);
            // Safety: pairs not yet returned are not borrowed elsewhere.
            unsafe { (*pairs.add(i)).as_ref().map(|(k, v)| (k, v)) }
        })
    }
}
impl<'a, K: Debug, V: Debug> Debug for IterMut<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.remaining()).finish()
    }
}
impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let x = self.front?;
        self.front = node::step(self.links, x, Side::Right);
        self.pair(x)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}
impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}
impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let x = self.back?;
        self.back = node::step(self.links, x, Side::Left);
        self.pair(x)
    }
}
impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

// Consuming iteration.

/// Consuming iterator returned by [`RbMap::into_iter`](super::RbMap::into_iter).
pub struct IntoIter<K, V> {
    inner: std::vec::IntoIter<(K, V)>,
}
impl<K, V> IntoIter<K, V> {
    /// Takes the pairs out of the tree in key order.
    pub(super) fn new(mut tree: Tree<K, V>, len: usize) -> Self {
        let mut pairs = Vec::with_capacity(len);
        let mut x = tree.head.min;
        while let Some(i) = x {
            x = tree.nodes.next(i);
            if let Some(kv) = tree.nodes.take_pair(i) {
                pairs.push(kv);
            }
        }
        Self {
            inner: pairs.into_iter(),
        }
    }
}
impl<K: Debug, V: Debug> Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}
impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}
impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}
impl<K, V> FusedIterator for IntoIter<K, V> {}

/// Consuming iterator returned by [`RbMap::into_keys`](super::RbMap::into_keys).
#[derive(Debug)]
pub struct IntoKeys<K, V>(pub(super) IntoIter<K, V>);
impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next()?.0)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        Some(self.0.next_back()?.0)
    }
}
impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<K, V> FusedIterator for IntoKeys<K, V> {}

/// Consuming iterator returned by [`RbMap::into_values`](super::RbMap::into_values).
#[derive(Debug)]
pub struct IntoValues<K, V>(pub(super) IntoIter<K, V>);
impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.next()?.1)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<K, V> DoubleEndedIterator for IntoValues<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        Some(self.0.next_back()?.1)
    }
}
impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<K, V> FusedIterator for IntoValues<K, V> {}

/// Iterator returned by [`RbMap::values_mut`](super::RbMap::values_mut).
pub struct ValuesMut<'a, K, V>(pub(super) IterMut<'a, K, V>);
impl<'a, K, V: Debug> Debug for ValuesMut<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.remaining().map(|(_, v)| v)).finish()
    }
}
impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<'a, K, V> DoubleEndedIterator for ValuesMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}
impl<'a, K, V> ExactSizeIterator for ValuesMut<'a, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<'a, K, V> FusedIterator for ValuesMut<'a, K, V> {}

/// Iterator returned by [`RbMap::values`](super::RbMap::values).
#[derive(Clone, Debug)]
pub struct Values<'a, K, V>(pub(super) Iter<'a, K, V>);
impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, v)| v)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}
impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<'a, K, V> FusedIterator for Values<'a, K, V> {}

/// Iterator returned by [`RbMap::keys`](super::RbMap::keys).
#[derive(Clone, Debug)]
pub struct Keys<'a, K, V>(pub(super) Iter<'a, K, V>);
impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, _)| k)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, _)| k)
    }
}
impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}
