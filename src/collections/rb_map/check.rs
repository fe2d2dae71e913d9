use std::{error::Error, fmt};

use log::debug;

use super::{
    node::{Color, Side},
    RbMap,
};
use crate::collections::compare::Compare;

/// Error returned by [`RbMap::validate`], naming the first red-black tree property found broken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantError {
    /// The root is red.
    RedRoot,
    /// A red node has a red child.
    RedRed,
    /// Two paths from the same node reach an absent child through different numbers of black nodes.
    BlackHeight,
    /// Keys are not strictly increasing in order ( under the map's comparator ).
    Order,
    /// A child does not point back at its parent, or a link references a released node.
    Link,
    /// The stored length does not match the number of reachable nodes.
    Length {
        /// Stored length.
        expected: usize,
        /// Nodes reachable from the root.
        found: usize,
    },
    /// The cached minimum or maximum is not the actual extreme node.
    Extrema,
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => f.write_str("root node is red"),
            Self::RedRed => f.write_str("red node has a red child"),
            Self::BlackHeight => f.write_str("black height differs between paths"),
            Self::Order => f.write_str("keys out of order"),
            Self::Link => f.write_str("inconsistent parent/child link"),
            Self::Length { expected, found } => {
                write!(f, "length is {expected} but {found} nodes are reachable")
            }
            Self::Extrema => f.write_str("cached minimum or maximum is stale"),
        }
    }
}

impl Error for InvariantError {}

impl<K, V, C> RbMap<K, V, C> {
    /// Check every red-black tree property, the length and the cached extrema.
    ///
    /// Takes time linear in the size of the map. Intended for tests and debugging.
    ///
    /// # Example
    ///
    /// ```
    /// use rbtree_map::collections::RbMap;
    /// let map: RbMap<_, _> = (0..100).map(|i| (i, i * i)).collect();
    /// assert!(map.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), InvariantError>
    where
        C: Compare<K>,
    {
        let result = self.check_tree();
        if let Err(e) = &result {
            debug!("map with {} elements failed validation: {e}", self.len);
        }
        result
    }

    fn check_tree(&self) -> Result<(), InvariantError>
    where
        C: Compare<K>,
    {
        let nodes = &self.tree.nodes;
        let head = self.tree.head;
        let root = match head.root {
            None => {
                if self.len != 0 {
                    return Err(InvariantError::Length {
                        expected: self.len,
                        found: 0,
                    });
                }
                if head.min.is_some() || head.max.is_some() {
                    return Err(InvariantError::Extrema);
                }
                return Ok(());
            }
            Some(r) => r,
        };
        if !nodes.is_occupied(root) || nodes.parent(root).is_some() {
            return Err(InvariantError::Link);
        }
        if nodes.color(root) == Color::Red {
            return Err(InvariantError::RedRoot);
        }
        let mut found = 0;
        self.black_height(root, &mut found)?;
        if found != self.len {
            return Err(InvariantError::Length {
                expected: self.len,
                found,
            });
        }
        if head.min != Some(nodes.extreme(root, Side::Left))
            || head.max != Some(nodes.extreme(root, Side::Right))
        {
            return Err(InvariantError::Extrema);
        }
        let mut prev: Option<&K> = None;
        let mut x = head.min;
        while let Some(i) = x {
            let k = nodes.key(i);
            if let Some(p) = prev {
                if !self.comp.less(p, k) {
                    return Err(InvariantError::Order);
                }
            }
            prev = Some(k);
            x = nodes.next(i);
        }
        Ok(())
    }

    /// Black height of the subtree at x, counting absent children as one.
    fn black_height(&self, x: usize, found: &mut usize) -> Result<usize, InvariantError> {
        let nodes = &self.tree.nodes;
        *found += 1;
        if *found > nodes.slots() {
            // More nodes than slots means a cycle.
            return Err(InvariantError::Link);
        }
        let mut heights = [1; 2];
        for (h, side) in heights.iter_mut().zip([Side::Left, Side::Right]) {
            if let Some(c) = nodes.child(x, side) {
                if !nodes.is_occupied(c) || nodes.parent(c) != Some(x) {
                    return Err(InvariantError::Link);
                }
                if nodes.color(x) == Color::Red && nodes.color(c) == Color::Red {
                    return Err(InvariantError::RedRed);
                }
                *h = self.black_height(c, found)?;
            }
        }
        if heights[0] != heights[1] {
            return Err(InvariantError::BlackHeight);
        }
        Ok(heights[0] + usize::from(nodes.color(x) == Color::Black))
    }
}
