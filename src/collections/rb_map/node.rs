use std::{borrow::Borrow, cmp::Ordering, mem};

use crate::collections::compare::Compare;

/// In debug mode or feature unsafe-optim not enabled, same as assert! otherwise does nothing.
#[cfg(any(debug_assertions, not(feature = "unsafe-optim")))]
macro_rules! safe_assert {
    ( $cond: expr ) => {
        assert!($cond)
    };
}

/// In debug mode or feature unsafe-optim not enabled, same as assert! otherwise does nothing.
#[cfg(all(not(debug_assertions), feature = "unsafe-optim"))]
macro_rules! safe_assert {
    ( $cond: expr ) => {
        if !$cond {
            unsafe { std::hint::unreachable_unchecked() }
        }
    };
}

/// Node colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Structural part of a node. Parent is a back-reference only, a node is owned by the arena.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Links {
    pub parent: Option<usize>,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub color: Color,
}

impl Links {
    #[inline]
    pub fn child(&self, side: Side) -> Option<usize> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    fn child_mut(&mut self, side: Side) -> &mut Option<usize> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Node storage. Links and key-value pairs are held in parallel vecs indexed by node number,
/// so links can be read while mutable references to values are held elsewhere.
#[derive(Clone)]
pub(crate) struct NodeVec<K, V> {
    links: Vec<Links>,
    pairs: Vec<Option<(K, V)>>,
    free: Vec<usize>,
}

impl<K, V> Default for NodeVec<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> NodeVec<K, V> {
    pub fn new() -> Self {
        Self {
            links: Vec::new(),
            pairs: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store a new node, reusing a free slot if there is one.
    pub fn alloc(&mut self, links: Links, key: K, value: V) -> usize {
        if let Some(x) = self.free.pop() {
            self.links[x] = links;
            self.pairs[x] = Some((key, value));
            x
        } else {
            self.links.push(links);
            self.pairs.push(Some((key, value)));
            self.links.len() - 1
        }
    }

    /// Release node x, returning its key and value.
    pub fn dealloc(&mut self, x: usize) -> (K, V) {
        let kv = self.pairs[x].take();
        safe_assert!(kv.is_some());
        self.free.push(x);
        match kv {
            Some(kv) => kv,
            None => unreachable!(),
        }
    }

    pub fn clear(&mut self) {
        self.links.clear();
        self.pairs.clear();
        self.free.clear();
    }

    /// Number of slots, occupied or free.
    pub fn slots(&self) -> usize {
        self.links.len()
    }

    pub fn is_occupied(&self, x: usize) -> bool {
        x < self.pairs.len() && self.pairs[x].is_some()
    }

    #[cfg(any(debug_assertions, not(feature = "unsafe-optim")))]
    #[inline]
    pub fn ln(&self, x: usize) -> &Links {
        &self.links[x]
    }

    #[cfg(all(not(debug_assertions), feature = "unsafe-optim"))]
    #[inline]
    pub fn ln(&self, x: usize) -> &Links {
        safe_assert!(x < self.links.len());
        unsafe { self.links.get_unchecked(x) }
    }

    #[cfg(any(debug_assertions, not(feature = "unsafe-optim")))]
    #[inline]
    pub fn lnm(&mut self, x: usize) -> &mut Links {
        &mut self.links[x]
    }

    #[cfg(all(not(debug_assertions), feature = "unsafe-optim"))]
    #[inline]
    pub fn lnm(&mut self, x: usize) -> &mut Links {
        safe_assert!(x < self.links.len());
        unsafe { self.links.get_unchecked_mut(x) }
    }

    /// Get references to key and value of node x.
    #[inline]
    pub fn kv(&self, x: usize) -> (&K, &V) {
        match &self.pairs[x] {
            Some((k, v)) => (k, v),
            None => unreachable!("vacant node slot"),
        }
    }

    #[inline]
    pub fn key(&self, x: usize) -> &K {
        self.kv(x).0
    }

    #[inline]
    pub fn kv_mut(&mut self, x: usize) -> (&K, &mut V) {
        match &mut self.pairs[x] {
            Some((k, v)) => (&*k, v),
            None => unreachable!("vacant node slot"),
        }
    }

    /// Exchange the key-value pairs of two nodes, leaving the links alone.
    pub fn swap_pairs(&mut self, a: usize, b: usize) {
        self.pairs.swap(a, b);
    }

    /// Take the pair out of node x without releasing the slot ( used when consuming the whole vec ).
    pub fn take_pair(&mut self, x: usize) -> Option<(K, V)> {
        self.pairs[x].take()
    }

    /// Split borrow: shared links, raw pointer to pairs.
    pub fn split_mut(&mut self) -> (&[Links], *mut Option<(K, V)>) {
        (&self.links, self.pairs.as_mut_ptr())
    }

    #[inline]
    pub fn parent(&self, x: usize) -> Option<usize> {
        self.ln(x).parent
    }

    #[inline]
    pub fn child(&self, x: usize, side: Side) -> Option<usize> {
        self.ln(x).child(side)
    }

    #[inline]
    pub fn set_child(&mut self, x: usize, side: Side, c: Option<usize>) {
        *self.lnm(x).child_mut(side) = c;
    }

    #[inline]
    pub fn color(&self, x: usize) -> Color {
        self.ln(x).color
    }

    #[inline]
    pub fn set_color(&mut self, x: usize, color: Color) {
        self.lnm(x).color = color;
    }

    /// Absent children count as black.
    #[inline]
    pub fn is_red(&self, x: Option<usize>) -> bool {
        match x {
            Some(x) => self.color(x) == Color::Red,
            None => false,
        }
    }

    /// Which side of its parent x hangs from. x must have a parent.
    #[inline]
    pub fn side_of(&self, x: usize, parent: usize) -> Side {
        if self.ln(parent).left == Some(x) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Follow side links from x to the end.
    pub fn extreme(&self, x: usize, side: Side) -> usize {
        extreme(&self.links, x, side)
    }

    #[inline]
    pub fn step(&self, x: usize, dir: Side) -> Option<usize> {
        step(&self.links, x, dir)
    }

    #[inline]
    pub fn next(&self, x: usize) -> Option<usize> {
        self.step(x, Side::Right)
    }

    #[inline]
    pub fn prev(&self, x: usize) -> Option<usize> {
        self.step(x, Side::Left)
    }
}

pub(crate) fn extreme(links: &[Links], mut x: usize, side: Side) -> usize {
    while let Some(c) = links[x].child(side) {
        x = c;
    }
    x
}

/// In-order neighbour of x in direction dir ( Right = successor, Left = predecessor ).
/// None means the step went past the root to the head.
pub(crate) fn step(links: &[Links], x: usize, dir: Side) -> Option<usize> {
    if let Some(c) = links[x].child(dir) {
        return Some(extreme(links, c, dir.opposite()));
    }
    let mut x = x;
    while let Some(p) = links[x].parent {
        if links[p].child(dir) != Some(x) {
            return Some(p);
        }
        x = p;
    }
    None
}

/// The sentinel. Holds the root and caches the minimum and maximum nodes.
/// All three are None when the tree is empty, which is also the end position of a cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Head {
    pub root: Option<usize>,
    pub min: Option<usize>,
    pub max: Option<usize>,
}

/// Outcome of descending the tree for a key.
pub(crate) enum SearchResult {
    /// Node holding an equivalent key.
    Found(usize),
    /// Key is absent, it belongs in the given child slot of the parent ( no parent for an empty tree ).
    GoDown(Option<usize>, Side),
}

/// Red-black tree: node storage plus head.
#[derive(Clone)]
pub(crate) struct Tree<K, V> {
    pub nodes: NodeVec<K, V>,
    pub head: Head,
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Tree<K, V> {
    pub fn new() -> Self {
        Self {
            nodes: NodeVec::new(),
            head: Head::default(),
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = Head::default();
    }

    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Make `new` take the place of `old` under `parent`, or as root if there is no parent.
    pub fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>) {
        match parent {
            None => self.head.root = new,
            Some(p) => {
                let side = self.nodes.side_of(old, p);
                self.nodes.set_child(p, side, new);
            }
        }
    }

    /// Rotate x down towards dir, its child on the opposite side takes its place.
    ///
    /// ```text
    ///     x               y          ( dir = Left )
    ///    / \             / \
    ///   a   y    =>     x   c
    ///      / \         / \
    ///     b   c       a   b
    /// ```
    pub fn rotate(&mut self, x: usize, dir: Side) {
        let up = dir.opposite();
        let y = match self.nodes.child(x, up) {
            Some(y) => y,
            None => unreachable!("rotation without child"),
        };
        let b = self.nodes.child(y, dir);
        self.nodes.set_child(x, up, b);
        if let Some(b) = b {
            self.nodes.lnm(b).parent = Some(x);
        }
        let xp = self.nodes.parent(x);
        self.nodes.lnm(y).parent = xp;
        self.replace_child(xp, x, Some(y));
        self.nodes.set_child(y, dir, Some(x));
        self.nodes.lnm(x).parent = Some(y);
    }

    /// Descend from the root looking for key.
    pub fn search<Q, C>(&self, key: &Q, comp: &C) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut cur = self.head.root;
        while let Some(x) = cur {
            let nk: &Q = self.nodes.key(x).borrow();
            side = if comp.less(key, nk) {
                Side::Left
            } else if comp.less(nk, key) {
                Side::Right
            } else {
                return SearchResult::Found(x);
            };
            parent = Some(x);
            cur = self.nodes.child(x, side);
        }
        SearchResult::GoDown(parent, side)
    }

    pub fn find<Q, C>(&self, key: &Q, comp: &C) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        match self.search(key, comp) {
            SearchResult::Found(x) => Some(x),
            SearchResult::GoDown(..) => None,
        }
    }

    /// Last node visited by a descent for key, and how key orders against it.
    pub fn descend<Q, C>(&self, key: &Q, comp: &C) -> Option<(usize, Ordering)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        match self.search(key, comp) {
            SearchResult::Found(x) => Some((x, Ordering::Equal)),
            SearchResult::GoDown(None, _) => None,
            SearchResult::GoDown(Some(p), Side::Left) => Some((p, Ordering::Less)),
            SearchResult::GoDown(Some(p), Side::Right) => Some((p, Ordering::Greater)),
        }
    }

    /// First node with key not less than key.
    pub fn lower_bound<Q, C>(&self, key: &Q, comp: &C) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let (x, ord) = self.descend(key, comp)?;
        Self::lower_from(&self.nodes, x, ord)
    }

    /// First node with key greater than key.
    pub fn upper_bound<Q, C>(&self, key: &Q, comp: &C) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        let (x, ord) = self.descend(key, comp)?;
        Self::upper_from(&self.nodes, x, ord)
    }

    /// Both bounds from a single descent.
    pub fn equal_range<Q, C>(&self, key: &Q, comp: &C) -> (Option<usize>, Option<usize>)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Compare<Q>,
    {
        match self.descend(key, comp) {
            None => (None, None),
            Some((x, ord)) => (
                Self::lower_from(&self.nodes, x, ord),
                Self::upper_from(&self.nodes, x, ord),
            ),
        }
    }

    fn lower_from(nodes: &NodeVec<K, V>, x: usize, ord: Ordering) -> Option<usize> {
        match ord {
            Ordering::Greater => nodes.next(x),
            _ => Some(x),
        }
    }

    fn upper_from(nodes: &NodeVec<K, V>, x: usize, ord: Ordering) -> Option<usize> {
        match ord {
            Ordering::Less => Some(x),
            _ => nodes.next(x),
        }
    }
}
