//! Disjoint-set forest over hashable keys
//!
//! Keys are interned into a dense index on first sight; `parent` and `rank`
//! live in flat vectors indexed by that position.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct DisjointSet<K> {
    index: HashMap<K, usize>,
    keys: Vec<K>,
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl<K> Default for DisjointSet<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            keys: Vec::new(),
            parent: Vec::new(),
            rank: Vec::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> DisjointSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
            parent: Vec::with_capacity(capacity),
            rank: Vec::with_capacity(capacity),
        }
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, x: &K) -> bool {
        self.index.contains_key(x)
    }

    /// Registers `x` as a singleton. No-op when already tracked.
    pub fn make_set(&mut self, x: K) {
        self.slot(x);
    }

    fn slot(&mut self, x: K) -> usize {
        if let Some(&i) = self.index.get(&x) {
            return i;
        }
        let i = self.keys.len();
        self.index.insert(x.clone(), i);
        self.keys.push(x);
        self.parent.push(i);
        self.rank.push(0);
        i
    }

    fn find_index(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Second pass points every node on the path at the root
        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Root of `x`'s set. Unseen keys are registered first.
    pub fn find(&mut self, x: K) -> K {
        let i = self.slot(x);
        let root = self.find_index(i);
        self.keys[root].clone()
    }

    /// Merges the sets of `x` and `y` by rank. On equal rank `x`'s root wins.
    pub fn union(&mut self, x: K, y: K) {
        let (ix, iy) = (self.slot(x), self.slot(y));
        let (rx, ry) = (self.find_index(ix), self.find_index(iy));
        if rx == ry {
            return;
        }
        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => self.parent[rx] = ry,
            std::cmp::Ordering::Greater => self.parent[ry] = rx,
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
            }
        }
    }

    pub fn same_set(&mut self, x: K, y: K) -> bool {
        self.find(x) == self.find(y)
    }

    /// Every set as `(root, members)`.
    ///
    /// Sets are ordered by their earliest registered member and members keep
    /// registration order.
    pub fn groups(&mut self) -> Vec<(K, Vec<K>)> {
        let mut position: HashMap<usize, usize> = HashMap::new();
        let mut out: Vec<(K, Vec<K>)> = Vec::new();

        for i in 0..self.keys.len() {
            let root = self.find_index(i);
            let slot = *position.entry(root).or_insert_with(|| {
                out.push((self.keys[root].clone(), Vec::new()));
                out.len() - 1
            });
            out[slot].1.push(self.keys[i].clone());
        }
        out
    }
}
