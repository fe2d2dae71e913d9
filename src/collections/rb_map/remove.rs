use log::trace;

use super::node::{Color, Side, Tree};

impl<K, V> Tree<K, V> {
    /// Remove node z from the tree.
    ///
    /// Returns the removed key-value pair and the node that now holds the element
    /// which followed it in order ( None if it was the last ).
    pub fn remove_node(&mut self, z: usize) -> ((K, V), Option<usize>) {
        let mut next = self.nodes.next(z);
        let mut x = z;
        // Move the doomed pair down to a leaf by exchanging it with an in-order neighbour.
        loop {
            let s = if let Some(r) = self.nodes.child(x, Side::Right) {
                self.nodes.extreme(r, Side::Left)
            } else if let Some(l) = self.nodes.child(x, Side::Left) {
                self.nodes.extreme(l, Side::Right)
            } else {
                break;
            };
            trace!("relocating pair from node {x} to node {s}");
            self.nodes.swap_pairs(x, s);
            if next == Some(s) {
                next = Some(x);
            }
            x = s;
        }
        self.unlink_leaf(x);
        (self.nodes.dealloc(x), next)
    }

    fn unlink_leaf(&mut self, x: usize) {
        if self.head.min == Some(x) {
            self.head.min = self.nodes.next(x);
        }
        if self.head.max == Some(x) {
            self.head.max = self.nodes.prev(x);
        }
        if self.nodes.parent(x).is_none() {
            self.head.root = None;
            return;
        }
        if self.nodes.color(x) == Color::Black {
            // x stays linked while the deficiency is resolved, rotations keep it under its parent.
            self.fix_double_black(x);
        }
        let p = self.nodes.parent(x);
        self.replace_child(p, x, None);
    }

    /// The subtree at x is one black node short.
    fn fix_double_black(&mut self, mut x: usize) {
        trace!("resolving double black at node {x}");
        while let Some(p) = self.nodes.parent(x) {
            let side = self.nodes.side_of(x, p);
            let far_side = side.opposite();
            // A black-height deficit implies the sibling exists.
            let s = match self.nodes.child(p, far_side) {
                Some(s) => s,
                None => break,
            };
            if self.nodes.color(s) == Color::Red {
                self.rotate(p, side);
                self.nodes.set_color(s, Color::Black);
                self.nodes.set_color(p, Color::Red);
                continue;
            }
            let far = self.nodes.child(s, far_side);
            if let Some(f) = far.filter(|&f| self.nodes.color(f) == Color::Red) {
                self.rotate(p, side);
                let pc = self.nodes.color(p);
                self.nodes.set_color(s, pc);
                self.nodes.set_color(p, Color::Black);
                self.nodes.set_color(f, Color::Black);
                return;
            }
            let near = self.nodes.child(s, side);
            if let Some(n) = near.filter(|&n| self.nodes.color(n) == Color::Red) {
                self.rotate(s, far_side);
                self.nodes.set_color(n, Color::Black);
                self.nodes.set_color(s, Color::Red);
                continue;
            }
            self.nodes.set_color(s, Color::Red);
            if self.nodes.color(p) == Color::Red {
                self.nodes.set_color(p, Color::Black);
                return;
            }
            x = p;
        }
    }
}
