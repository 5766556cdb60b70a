//! Disjoint-set forest over board indices.
//!
//! Every set's root is the minimum index among its members, so `find`
//! yields the canonical group id directly. Unions compress paths; read-only
//! lookups walk the (already short) parent chain without mutating.

/// Union-find over the `size * size` points of a board.
#[derive(Clone, Debug)]
pub struct GroupSet {
    parent: Vec<usize>,
}

impl GroupSet {
    /// Every point starts as its own singleton set.
    pub fn new(points: usize) -> Self {
        Self {
            parent: (0..points).collect(),
        }
    }

    /// Root of the set containing `i`.
    pub fn find(&self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        root
    }

    fn find_compress(&mut self, i: usize) -> usize {
        let root = self.find(i);
        let mut cur = i;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`; returns the surviving root.
    pub fn union(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find_compress(a);
        let rb = self.find_compress(b);
        if ra == rb {
            return ra;
        }
        let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[child] = root;
        root
    }

    /// Detach `i` into a singleton.
    ///
    /// Only valid when no other point still links through `i`, i.e. when the
    /// whole set containing it is being reset.
    pub fn reset(&mut self, i: usize) {
        self.parent[i] = i;
    }
}
