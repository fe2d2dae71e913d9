use super::node::{Color, Head, Links, Side, Tree};

impl<K, V> Tree<K, V> {
    /// Attach a new node in the child slot found by [`Tree::search`], then rebalance.
    /// Returns the new node.
    pub fn insert_at(&mut self, parent: Option<usize>, side: Side, key: K, value: V) -> usize {
        let links = Links {
            parent,
            left: None,
            right: None,
            color: Color::Red,
        };
        let x = self.nodes.alloc(links, key, value);
        match parent {
            None => {
                self.nodes.set_color(x, Color::Black);
                self.head = Head {
                    root: Some(x),
                    min: Some(x),
                    max: Some(x),
                };
                return x;
            }
            Some(p) => {
                self.nodes.set_child(p, side, Some(x));
                // The cached minimum has no left child, so a node hung there is the new minimum.
                match side {
                    Side::Left if self.head.min == Some(p) => self.head.min = Some(x),
                    Side::Right if self.head.max == Some(p) => self.head.max = Some(x),
                    _ => {}
                }
            }
        }
        self.insert_fixup(x);
        x
    }

    /// Resolve red node x having a red parent, working up towards the root.
    fn insert_fixup(&mut self, mut x: usize) {
        loop {
            let p = match self.nodes.parent(x) {
                Some(p) if self.nodes.color(p) == Color::Red => p,
                _ => break,
            };
            // A red node is never the root, so p has a parent.
            let g = match self.nodes.parent(p) {
                Some(g) => g,
                None => break,
            };
            let pside = self.nodes.side_of(p, g);
            let uncle = self.nodes.child(g, pside.opposite());
            if self.nodes.is_red(uncle) {
                if let Some(u) = uncle {
                    self.nodes.set_color(u, Color::Black);
                }
                self.nodes.set_color(p, Color::Black);
                self.nodes.set_color(g, Color::Red);
                x = g;
                continue;
            }
            let mut top = p;
            if self.nodes.side_of(x, p) != pside {
                // Zig-zag: straighten so x and p lean the same way.
                self.rotate(p, pside);
                top = x;
            }
            self.rotate(g, pside.opposite());
            self.nodes.set_color(top, Color::Black);
            self.nodes.set_color(g, Color::Red);
            break;
        }
        if let Some(r) = self.head.root {
            self.nodes.set_color(r, Color::Black);
        }
    }
}
