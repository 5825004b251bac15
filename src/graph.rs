use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use itertools::Itertools;
use petgraph::graphmap::DiGraphMap;

use crate::solver::{ExtractionFailure, TieBreak};
use crate::symbol::Symbol;

/// Symbols whose predecessors have all been emitted, waiting for their turn in the order.
///
/// The implementation decides which eligible symbol goes next.
trait Frontier: Default {
    fn enqueue(&mut self, symbol: Symbol);
    fn dequeue(&mut self) -> Option<Symbol>;
}

// first come, first served
impl Frontier for VecDeque<Symbol> {
    fn enqueue(&mut self, symbol: Symbol) {
        self.push_back(symbol)
    }

    fn dequeue(&mut self) -> Option<Symbol> {
        self.pop_front()
    }
}

// smallest code point first
impl Frontier for BinaryHeap<Reverse<Symbol>> {
    fn enqueue(&mut self, symbol: Symbol) {
        self.push(Reverse(symbol))
    }

    fn dequeue(&mut self) -> Option<Symbol> {
        self.pop().map(|Reverse(symbol)| symbol)
    }
}

/// Precedence facts between symbols: an edge `a -> b` means `a` must come before `b`.
///
/// Adjacency lives in a [`DiGraphMap`], which keeps vertices and successors in insertion order.
/// Indegrees are tracked beside it and always equal the number of distinct predecessors.
#[derive(Clone, Debug, Default)]
pub struct ConstraintGraph {
    edges: DiGraphMap<Symbol, ()>,
    indegree: HashMap<Symbol, usize>,
}

impl ConstraintGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `symbol` as a vertex. Does nothing if it is already present.
    pub fn add_symbol(&mut self, symbol: Symbol) {
        self.edges.add_node(symbol);
        self.indegree.entry(symbol).or_insert(0);
    }

    /// Record that `before` precedes `after`, registering both as vertices.
    ///
    /// Returns `false` if the constraint was already known, in which case nothing changes.
    pub fn add_constraint(&mut self, before: Symbol, after: Symbol) -> bool {
        self.add_symbol(before);
        self.add_symbol(after);
        if self.edges.contains_edge(before, after) {
            return false;
        }

        self.edges.add_edge(before, after, ());
        *self.indegree.entry(after).or_insert(0) += 1;
        true
    }

    /// Number of distinct symbols.
    pub fn vertex_count(&self) -> usize {
        self.edges.node_count()
    }

    /// Number of distinct constraints.
    pub fn edge_count(&self) -> usize {
        self.edges.edge_count()
    }

    /// Number of distinct symbols that must precede `symbol`, or `None` if it is not a vertex.
    pub fn indegree(&self, symbol: Symbol) -> Option<usize> {
        self.indegree.get(&symbol).copied()
    }

    /// Whether `before -> after` is a recorded constraint.
    pub fn contains_constraint(&self, before: Symbol, after: Symbol) -> bool {
        self.edges.contains_edge(before, after)
    }

    /// All vertices in first-seen order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.edges.nodes()
    }

    /// All constraints as `(before, after)` pairs.
    pub fn constraints(&self) -> impl Iterator<Item = (Symbol, Symbol)> + '_ {
        self.edges.all_edges().map(|(before, after, _)| (before, after))
    }

    /// The underlying adjacency, e.g. for use with [`petgraph::algo`].
    pub fn as_graph_map(&self) -> &DiGraphMap<Symbol, ()> {
        &self.edges
    }

    /// Consume the graph, producing a topological order of every vertex.
    ///
    /// Fails with [`ExtractionFailure::Cycle`] if the constraints are contradictory.
    pub fn into_order(self, tie_break: TieBreak) -> Result<Vec<Symbol>, ExtractionFailure> {
        match tie_break {
            TieBreak::Ascending => self.kahn::<BinaryHeap<Reverse<Symbol>>>(),
            TieBreak::Insertion => self.kahn::<VecDeque<Symbol>>(),
        }
    }

    fn kahn<F: Frontier>(mut self) -> Result<Vec<Symbol>, ExtractionFailure> {
        let mut frontier = F::default();
        for symbol in self.edges.nodes() {
            if self.indegree.get(&symbol) == Some(&0) {
                frontier.enqueue(symbol);
            }
        }

        let mut order = Vec::with_capacity(self.edges.node_count());
        while let Some(symbol) = frontier.dequeue() {
            order.push(symbol);
            for next in self.edges.neighbors(symbol) {
                if let Some(degree) = self.indegree.get_mut(&next) {
                    *degree -= 1;
                    if *degree == 0 {
                        frontier.enqueue(next);
                    }
                }
            }
        }

        if order.len() < self.edges.node_count() {
            // anything never emitted still waits on a predecessor inside a cycle
            let unresolved = self.indegree
                .into_iter()
                .filter(|(_, degree)| *degree > 0)
                .map(|(symbol, _)| symbol)
                .sorted()
                .collect_vec();
            return Err(ExtractionFailure::Cycle { unresolved });
        }

        Ok(order)
    }
}
