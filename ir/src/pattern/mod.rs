//! Pattern definitions and their construction.
//!
//! A [`Pattern`] is an immutable arena of [`Node`]s in declaration order plus
//! the ordered matcher body. It is produced by a [`PatternBuilder`], validated
//! once as a whole by [`Pattern::verify`], and then handed by reference to the
//! external matching/rewriting engine through the read accessors here.

pub mod builder;

pub use builder::PatternBuilder;

use smallvec::SmallVec;

use obereg_registry::OperationRegistry;

use crate::error::Diagnostics;
use crate::node::{Node, NodeId, ValueRef};
use crate::types::{BindingKind, Span};
use crate::verify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeData {
    pub node: Node,
    pub span: Span,
}

/// A fully constructed pattern definition.
///
/// Immutable once built; the construction-layer invariants (definitions
/// precede uses, at most one rewrite directive, in final position) are
/// enforced by the builder, while everything a pattern author can get wrong is
/// left representable and reported by [`verify`](Self::verify).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub(crate) name: Option<String>,
    pub(crate) benefit: u16,
    pub(crate) span: Span,
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) body: Vec<NodeId>,
}

impl Pattern {
    pub fn builder() -> PatternBuilder {
        PatternBuilder::new()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Expected benefit of applying this pattern, used by the engine to order
    /// candidate matches.
    pub fn benefit(&self) -> u16 {
        self.benefit
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Total number of nodes, across the matcher body and the rewrite body.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()].node
    }

    pub fn node_span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    /// Matcher-position nodes in declaration order, terminator included.
    pub fn body(&self) -> &[NodeId] {
        &self.body
    }

    /// All nodes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(index, data)| (NodeId(index as u32), &data.node))
    }

    /// The terminating rewrite directive, when the body ends with one.
    pub fn rewrite_directive(&self) -> Option<NodeId> {
        self.body.last().copied().filter(|&id| matches!(self.node(id), Node::Rewrite { .. }))
    }

    /// Kind of the value an edge refers to.
    ///
    /// # Panics
    ///
    /// Panics when the edge does not refer to a produced value; the builder
    /// never issues such an edge, so this is a programming error.
    pub fn value_kind(&self, value: ValueRef) -> BindingKind {
        self.node(value.node).produced(value.result).expect("edge to a value-less result position")
    }

    /// Consumer map: for every node, the nodes referencing one of its values,
    /// one entry per referencing edge.
    pub fn consumer_map(&self) -> Vec<SmallVec<[NodeId; 4]>> {
        let mut consumers = vec![SmallVec::new(); self.nodes.len()];
        for (id, node) in self.iter() {
            node.for_each_input(|edge| consumers[edge.node.index()].push(id));
        }
        consumers
    }

    /// Run the whole-pattern semantic verification, aggregating every
    /// diagnostic from all analyses.
    pub fn verify<R>(&self, registry: &R) -> Result<(), Diagnostics>
    where
        R: OperationRegistry + ?Sized,
    {
        verify::run(self, registry)
    }
}
