//! # Mixed graph model
//!
//! A mixed graph holds three disjoint relations over a node set:
//!
//! - **undirected edges** (unordered pairs, orientation still unknown),
//! - **directed arcs** (ordered pairs `tail -> head`),
//! - absence of both.
//!
//! ## Invariant
//!
//! For any unordered pair `{a, b}` at most one of `edge(a, b)`, `arc(a, b)`,
//! `arc(b, a)` holds, except transiently during orientation where a pair may
//! briefly hold both arcs ("bidirected") until latent-couple resolution picks
//! a direction.
//!
//! ## Determinism
//!
//! Internal indexes are `FxHashMap`/`FxHashSet` for O(1) lookups; every
//! public accessor that iterates collects and sorts, so callers observe a
//! stable order regardless of hash seed.

use rustc_hash::{FxHashMap, FxHashSet};

/// A unique identifier for a node (one random variable).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

/// Canonical unordered form of a pair, used as a table key.
#[inline]
pub(crate) fn unordered(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A graph mixing undirected edges and directed arcs over one node set.
#[derive(Debug, Clone, Default)]
pub struct MixedGraph {
    nodes: FxHashSet<NodeId>,
    /// Symmetric adjacency for undirected edges.
    edge_adj: FxHashMap<NodeId, FxHashSet<NodeId>>,
    /// `parents[h]` = tails of arcs into `h`.
    parents: FxHashMap<NodeId, FxHashSet<NodeId>>,
    /// `children[t]` = heads of arcs out of `t`.
    children: FxHashMap<NodeId, FxHashSet<NodeId>>,
    edge_count: usize,
    arc_count: usize,
}

impl MixedGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fully connected undirected graph over `nodes`.
    ///
    /// This is the usual starting point of skeleton learning: every pair of
    /// variables begins as a candidate dependency.
    pub fn complete(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let mut graph = Self::new();
        let mut all: Vec<NodeId> = nodes.into_iter().collect();
        all.sort_unstable();
        all.dedup();
        for &n in &all {
            graph.add_node(n);
        }
        for (i, &x) in all.iter().enumerate() {
            for &y in &all[i + 1..] {
                graph.add_edge(x, y);
            }
        }
        graph
    }

    /// Adds a node. Returns `false` if it was already present.
    pub fn add_node(&mut self, n: NodeId) -> bool {
        self.nodes.insert(n)
    }

    /// Adds every node from the iterator.
    pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = NodeId>) {
        self.nodes.extend(nodes);
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of directed arcs (a bidirected pair counts twice).
    pub fn arc_count(&self) -> usize {
        self.arc_count
    }

    /// All nodes, ascending.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self.nodes.iter().copied().collect();
        out.sort_unstable();
        out
    }

    /// Whether the undirected edge `{x, y}` is present.
    pub fn has_edge(&self, x: NodeId, y: NodeId) -> bool {
        self.edge_adj.get(&x).is_some_and(|s| s.contains(&y))
    }

    /// Whether the arc `tail -> head` is present.
    pub fn has_arc(&self, tail: NodeId, head: NodeId) -> bool {
        self.children.get(&tail).is_some_and(|s| s.contains(&head))
    }

    /// Whether both `a -> b` and `b -> a` are present (unresolved latent pair).
    pub fn has_bidirected(&self, a: NodeId, b: NodeId) -> bool {
        self.has_arc(a, b) && self.has_arc(b, a)
    }

    /// Whether `x` and `y` are related by an edge or an arc in either direction.
    pub fn adjacent(&self, x: NodeId, y: NodeId) -> bool {
        self.has_edge(x, y) || self.has_arc(x, y) || self.has_arc(y, x)
    }

    /// Adds the undirected edge `{x, y}`.
    ///
    /// Self-loops are rejected, as is adding an edge over an existing arc in
    /// either direction (the pair invariant admits at most one relation).
    /// Returns `true` if the graph changed. Endpoints are inserted as nodes
    /// if missing.
    pub fn add_edge(&mut self, x: NodeId, y: NodeId) -> bool {
        if x == y || self.has_edge(x, y) || self.has_arc(x, y) || self.has_arc(y, x) {
            return false;
        }
        self.nodes.insert(x);
        self.nodes.insert(y);
        self.edge_adj.entry(x).or_default().insert(y);
        self.edge_adj.entry(y).or_default().insert(x);
        self.edge_count += 1;
        true
    }

    /// Removes the undirected edge `{x, y}`. Returns `true` if it existed.
    pub fn erase_edge(&mut self, x: NodeId, y: NodeId) -> bool {
        if !self.has_edge(x, y) {
            return false;
        }
        if let Some(s) = self.edge_adj.get_mut(&x) {
            s.remove(&y);
        }
        if let Some(s) = self.edge_adj.get_mut(&y) {
            s.remove(&x);
        }
        self.edge_count -= 1;
        true
    }

    /// Adds the arc `tail -> head`, replacing the undirected edge `{tail,
    /// head}` if present.
    ///
    /// If the reverse arc already exists the pair becomes bidirected; the
    /// caller is expected to resolve it through the latent-couple list.
    /// Self-loops are rejected. Returns `true` if the graph changed.
    pub fn add_arc(&mut self, tail: NodeId, head: NodeId) -> bool {
        if tail == head || self.has_arc(tail, head) {
            return false;
        }
        self.erase_edge(tail, head);
        self.nodes.insert(tail);
        self.nodes.insert(head);
        self.children.entry(tail).or_default().insert(head);
        self.parents.entry(head).or_default().insert(tail);
        self.arc_count += 1;
        true
    }

    /// Removes the arc `tail -> head`. Returns `true` if it existed.
    pub fn erase_arc(&mut self, tail: NodeId, head: NodeId) -> bool {
        if !self.has_arc(tail, head) {
            return false;
        }
        if let Some(s) = self.children.get_mut(&tail) {
            s.remove(&head);
        }
        if let Some(s) = self.parents.get_mut(&head) {
            s.remove(&tail);
        }
        self.arc_count -= 1;
        true
    }

    /// Undirected-edge partners of `n`, ascending.
    pub fn neighbours(&self, n: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .edge_adj
            .get(&n)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    /// Tails of arcs into `head`, ascending.
    pub fn parents(&self, head: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .parents
            .get(&head)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    /// Heads of arcs out of `tail`, ascending.
    pub fn children(&self, tail: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .children
            .get(&tail)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    /// Number of arcs pointing into `head`.
    pub fn in_degree(&self, head: NodeId) -> usize {
        self.parents.get(&head).map_or(0, |s| s.len())
    }

    /// All nodes adjacent to `n` through any relation, ascending.
    pub fn adjacents(&self, n: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        if let Some(s) = self.edge_adj.get(&n) {
            out.extend(s.iter().copied());
        }
        if let Some(s) = self.parents.get(&n) {
            out.extend(s.iter().copied());
        }
        if let Some(s) = self.children.get(&n) {
            out.extend(s.iter().copied());
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// All undirected edges as canonical `(min, max)` pairs, ascending.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut out: Vec<(NodeId, NodeId)> = Vec::with_capacity(self.edge_count);
        for (&x, partners) in &self.edge_adj {
            for &y in partners {
                if x < y {
                    out.push((x, y));
                }
            }
        }
        out.sort_unstable();
        out
    }

    /// All arcs as `(tail, head)` pairs, ascending.
    pub fn arcs(&self) -> Vec<(NodeId, NodeId)> {
        let mut out: Vec<(NodeId, NodeId)> = Vec::with_capacity(self.arc_count);
        for (&tail, heads) in &self.children {
            for &head in heads {
                out.push((tail, head));
            }
        }
        out.sort_unstable();
        out
    }
}
