//! Arena-backed search tree shared by the RRT variants
//!
//! Nodes live in a single `Vec`; a parent is the index of an earlier node, so
//! the structure can never contain a cycle and is released in one go.

use std::cell::OnceCell;

use ordered_float::OrderedFloat;

use crate::common::{Path2D, Point2D};

/// A tree node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub position: Point2D,
    /// Index of the parent node in the same tree (None for the root)
    pub parent: Option<usize>,
    /// Accumulated path cost from the root; only maintained by RRT*
    pub cost: f64,
}

impl Node {
    pub fn new(position: Point2D) -> Self {
        Node {
            position,
            parent: None,
            cost: 0.0,
        }
    }

    pub fn with_parent(position: Point2D, parent: usize, cost: f64) -> Self {
        Node {
            position,
            parent: Some(parent),
            cost,
        }
    }
}

/// Append-only collection of nodes; index 0 is the root
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(root: Point2D) -> Self {
        Tree {
            nodes: vec![Node::new(root)],
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop everything except the root
    pub fn reset(&mut self) {
        self.nodes.truncate(1);
    }

    /// Append a node with zero cost and return its index
    pub fn add_node(&mut self, position: Point2D, parent: usize) -> usize {
        self.add_node_with_cost(position, parent, 0.0)
    }

    pub fn add_node_with_cost(&mut self, position: Point2D, parent: usize, cost: f64) -> usize {
        assert!(parent < self.nodes.len(), "parent {} is not in the tree", parent);
        self.nodes.push(Node::with_parent(position, parent, cost));
        self.nodes.len() - 1
    }

    /// Attach `index` to an earlier node
    pub fn reparent(&mut self, index: usize, parent: usize, cost: f64) {
        assert!(parent < index, "parent {} must precede node {}", parent, index);
        let node = &mut self.nodes[index];
        node.parent = Some(parent);
        node.cost = cost;
    }

    /// Index of the node closest to `point` (linear scan on squared distance)
    pub fn nearest(&self, point: Point2D) -> usize {
        self.nodes
            .iter()
            .enumerate()
            .min_by_key(|(_, node)| OrderedFloat(node.position.distance_squared(&point)))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Indices of all nodes within `radius` of `point`
    pub fn near(&self, point: Point2D, radius: f64) -> Vec<usize> {
        let r2 = radius * radius;
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.position.distance_squared(&point) <= r2)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices from `index` up to the root, inclusive
    pub fn branch(&self, index: usize) -> Branch<'_> {
        Branch {
            tree: self,
            next: Some(index),
            remaining: self.nodes.len(),
        }
    }

    /// Positions from `index` up to the root, in walk order
    pub fn path_to_root(&self, index: usize) -> Vec<Point2D> {
        self.branch(index).map(|i| self.nodes[i].position).collect()
    }

    /// Positions from the root down to `index`
    pub fn path_from_root(&self, index: usize) -> Vec<Point2D> {
        let mut points = self.path_to_root(index);
        points.reverse();
        points
    }

    /// (parent, child) position pairs
    pub fn edges(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        self.nodes.iter().filter_map(move |node| {
            node.parent.map(|p| (self.nodes[p].position, node.position))
        })
    }
}

/// Iterator over a chain of parent links.
///
/// Bounded by the tree size, so it terminates even on a corrupted tree.
pub struct Branch<'a> {
    tree: &'a Tree,
    next: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Branch<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = self.tree.nodes[current].parent;
        Some(current)
    }
}

/// A computed path together with its length
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPath {
    pub path: Path2D,
    pub distance: f64,
}

/// Lazily computed path, built on first access and kept until invalidated
#[derive(Debug, Default)]
pub struct PathCache {
    cell: OnceCell<CachedPath>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(&self, compute: F) -> &CachedPath
    where
        F: FnOnce() -> Path2D,
    {
        self.cell.get_or_init(|| {
            let path = compute();
            let distance = path.total_length();
            CachedPath { path, distance }
        })
    }

    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn invalidate(&mut self) {
        self.cell.take();
    }
}
