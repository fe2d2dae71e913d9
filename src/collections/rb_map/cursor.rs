use std::{fmt, fmt::Debug, ptr};

use super::RbMap;
use crate::collections::compare::Natural;

/// Cursor returned by [`RbMap::find`], [`RbMap::lower_bound`], [`RbMap::upper_bound`] and friends.
///
/// A cursor is positioned either on an element or on the end of the map ( the head ).
/// From the end, [`Cursor::move_next`] moves to the first element and [`Cursor::move_prev`]
/// moves to the last element, so the end behaves as a single position joining both ends.
pub struct Cursor<'a, K, V, C = Natural> {
    pub(super) map: &'a RbMap<K, V, C>,
    pub(super) node: Option<usize>,
}

impl<'a, K, V, C> Clone for Cursor<'a, K, V, C> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<'a, K, V, C> Copy for Cursor<'a, K, V, C> {}

impl<'a, K, V, C> PartialEq for Cursor<'a, K, V, C> {
    /// Cursors are equal when they are over the same map at the same position.
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.map, other.map) && self.node == other.node
    }
}
impl<'a, K, V, C> Eq for Cursor<'a, K, V, C> {}

impl<'a, K: Debug, V: Debug, C> Debug for Cursor<'a, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.key_value()).finish()
    }
}

impl<'a, K, V, C> Cursor<'a, K, V, C> {
    pub(super) fn new(map: &'a RbMap<K, V, C>, node: Option<usize>) -> Self {
        Self { map, node }
    }

    /// Is the cursor at the end of the map ( not on an element )?
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Move to the next element in key order, or to the end.
    pub fn move_next(&mut self) {
        self.node = match self.node {
            Some(x) => self.map.tree.nodes.next(x),
            None => self.map.tree.head.min,
        };
    }

    /// Move to the previous element in key order, or to the end.
    pub fn move_prev(&mut self) {
        self.node = match self.node {
            Some(x) => self.map.tree.nodes.prev(x),
            None => self.map.tree.head.max,
        };
    }

    /// Key of the current element, None at the end.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|(k, _)| k)
    }

    /// Value of the current element, None at the end.
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|(_, v)| v)
    }

    /// Key and value of the current element, None at the end.
    #[must_use]
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        let map = self.map;
        self.node.map(|x| map.tree.nodes.kv(x))
    }

    /// Returns references to the next key/value pair without moving.
    #[must_use]
    pub fn peek_next(&self) -> Option<(&'a K, &'a V)> {
        let mut c = *self;
        c.move_next();
        c.key_value()
    }

    /// Returns references to the previous key/value pair without moving.
    #[must_use]
    pub fn peek_prev(&self) -> Option<(&'a K, &'a V)> {
        let mut c = *self;
        c.move_prev();
        c.key_value()
    }
}

/// Cursor that permits mutation of the map, returned by [`RbMap::find_mut`], [`RbMap::lower_bound_mut`],
/// [`RbMap::insert_entry`] and friends.
pub struct CursorMut<'a, K, V, C = Natural> {
    pub(super) map: &'a mut RbMap<K, V, C>,
    pub(super) node: Option<usize>,
}

impl<'a, K: Debug, V: Debug, C> Debug for CursorMut<'a, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.key_value()).finish()
    }
}

impl<'a, K, V, C> CursorMut<'a, K, V, C> {
    pub(super) fn new(map: &'a mut RbMap<K, V, C>, node: Option<usize>) -> Self {
        Self { map, node }
    }

    /// Is the cursor at the end of the map ( not on an element )?
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Move to the next element in key order, or to the end.
    pub fn move_next(&mut self) {
        self.node = match self.node {
            Some(x) => self.map.tree.nodes.next(x),
            None => self.map.tree.head.min,
        };
    }

    /// Move to the previous element in key order, or to the end.
    pub fn move_prev(&mut self) {
        self.node = match self.node {
            Some(x) => self.map.tree.nodes.prev(x),
            None => self.map.tree.head.max,
        };
    }

    /// Key of the current element.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.key_value().map(|(k, _)| k)
    }

    /// Value of the current element.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.key_value().map(|(_, v)| v)
    }

    /// Key and value of the current element.
    #[must_use]
    pub fn key_value(&self) -> Option<(&K, &V)> {
        self.node.map(|x| self.map.tree.nodes.kv(x))
    }

    /// Mutable reference to the value of the current element.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.key_value_mut().map(|(_, v)| v)
    }

    /// Key and mutable value of the current element. Keys cannot be modified.
    pub fn key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        let x = self.node?;
        Some(self.map.tree.nodes.kv_mut(x))
    }

    /// Convert into a mutable reference to the current value, with the lifetime of the map borrow.
    pub fn into_value_mut(self) -> Option<&'a mut V> {
        let x = self.node?;
        Some(self.map.tree.nodes.kv_mut(x).1)
    }

    /// Remove the current element, returning its key and value.
    ///
    /// The cursor moves to the element that followed the removed one ( or the end ).
    /// Does nothing and returns None at the end.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let x = self.node?;
        let (kv, next) = self.map.tree.remove_node(x);
        self.map.len -= 1;
        self.node = next;
        Some(kv)
    }

    /// Returns a read-only cursor at the same position.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(self.map, self.node)
    }
}
