//! Append-only construction of pattern definitions.
//!
//! The builder appends nodes in declaration order and hands out [`ValueRef`]s
//! for the values they produce, so an edge can only point at an
//! already-declared node. [`begin_rewrite`](PatternBuilder::begin_rewrite) (or
//! its external form) switches subsequent appends into the rewrite directive's
//! inline body; [`finish`](PatternBuilder::finish) seals the pattern.
//!
//! Construction-layer invariants — edges into the same pattern, edges to real
//! result positions, a single rewrite directive — are programming errors when
//! violated and abort. Everything a pattern *author* can get wrong (missing
//! terminator, foreign kinds in matcher position, count mismatches, unbound or
//! disconnected values, unresolvable result types) stays representable and is
//! reported by verification instead.

use smallvec::SmallVec;

use crate::node::{Node, NodeId, ValueRef, ValueRefs};
use crate::pattern::{NodeData, Pattern};
use crate::types::{AttrExpr, BindingKind, ElementKind, Span, TypeExpr};

#[derive(Debug)]
struct RewriteFrame {
    directive: NodeId,
    actions: Vec<NodeId>,
}

/// Builder for [`Pattern`]s. See the module docs for the construction model.
#[derive(Debug, Default)]
pub struct PatternBuilder {
    name: Option<String>,
    benefit: u16,
    span: Span,
    nodes: Vec<NodeData>,
    body: Vec<NodeId>,
    rewrite: Option<RewriteFrame>,
}

impl PatternBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn benefit(mut self, benefit: u16) -> Self {
        self.benefit = benefit;
        self
    }

    #[must_use]
    pub fn spanned(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    fn check_edge(&self, edge: ValueRef) {
        let data = self
            .nodes
            .get(edge.node.index())
            .unwrap_or_else(|| panic!("edge references undeclared node {}", edge.node.index()));
        assert!(
            (edge.result as usize) < data.node.result_count(),
            "edge references result #{} of a node producing {} value(s)",
            edge.result,
            data.node.result_count(),
        );
    }

    fn push(&mut self, node: Node, span: Span) -> NodeId {
        node.for_each_input(|edge| self.check_edge(edge));
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData { node, span });
        match &mut self.rewrite {
            Some(frame) => frame.actions.push(id),
            None => self.body.push(id),
        }
        id
    }

    fn push_value(&mut self, node: Node, span: Span) -> ValueRef {
        ValueRef { node: self.push(node, span), result: 0 }
    }

    /// Match a single operand value, optionally constrained by a type edge.
    pub fn operand(&mut self, ty: Option<ValueRef>, span: Span) -> ValueRef {
        self.push_value(Node::Operand { ty }, span)
    }

    /// Match a range of operand values, optionally constrained by a type-range edge.
    pub fn operands(&mut self, tys: Option<ValueRef>, span: Span) -> ValueRef {
        self.push_value(Node::Operands { tys }, span)
    }

    /// Project the result at `index` of an operation value.
    pub fn result(&mut self, parent: ValueRef, index: u32, span: Span) -> ValueRef {
        self.push_value(Node::Result { parent, index }, span)
    }

    /// Project result groups of an operation value. Without an index this
    /// yields all results and `kind` must be `range<value>` to verify.
    pub fn results(&mut self, parent: ValueRef, index: Option<u32>, kind: BindingKind, span: Span) -> ValueRef {
        self.push_value(Node::Results { parent, index, kind }, span)
    }

    /// Match or create an operation, with `{name = edge}` attribute sugar.
    pub fn operation<'n>(
        &mut self,
        name: Option<&str>,
        operands: impl IntoIterator<Item = ValueRef>,
        attrs: impl IntoIterator<Item = (&'n str, ValueRef)>,
        result_types: impl IntoIterator<Item = ValueRef>,
        span: Span,
    ) -> ValueRef {
        let (attr_names, attr_values) = attrs.into_iter().map(|(attr, edge)| (attr.to_owned(), edge)).unzip();
        let result_types = result_types.into_iter().collect();
        self.operation_parts(name, operands.into_iter().collect(), attr_names, attr_values, result_types, span)
    }

    /// Generic operation form with independent name and value lists; the lists
    /// may disagree in length, which verification reports.
    pub fn operation_parts(
        &mut self,
        name: Option<&str>,
        operands: ValueRefs,
        attr_names: Vec<String>,
        attr_values: ValueRefs,
        result_types: ValueRefs,
        span: Span,
    ) -> ValueRef {
        let node = Node::Operation { name: name.map(str::to_owned), operands, attr_names, attr_values, result_types };
        self.push_value(node, span)
    }

    /// Attach result-type edges to an operation already declared by this
    /// builder (the indexed-result surface sugar resolves to these).
    pub fn constrain_results(&mut self, op: ValueRef, result_types: impl IntoIterator<Item = ValueRef>) {
        let edges: ValueRefs = result_types.into_iter().collect();
        for &edge in &edges {
            self.check_edge(edge);
            assert!(edge.node < op.node, "result-type edge must be declared before the operation it constrains");
        }
        match &mut self.nodes[op.node.index()].node {
            Node::Operation { result_types, .. } => result_types.extend(edges),
            _ => panic!("constrain_results target is not an operation"),
        }
    }

    /// Match an attribute (unconstrained or typed) or hold a constant literal.
    pub fn attribute(&mut self, value: Option<AttrExpr>, ty: Option<ValueRef>, span: Span) -> ValueRef {
        self.push_value(Node::Attribute { value, ty }, span)
    }

    /// Type constraint, optionally pinned to a constant literal.
    pub fn type_(&mut self, constant: Option<TypeExpr>, span: Span) -> ValueRef {
        self.push_value(Node::Type { constant }, span)
    }

    /// Type-range constraint, optionally pinned to constant literals.
    pub fn types(&mut self, constants: Option<Vec<TypeExpr>>, span: Span) -> ValueRef {
        self.push_value(Node::Types { constants }, span)
    }

    /// Call a host-registered matcher-side constraint; returns one edge per
    /// declared result.
    pub fn native_constraint(
        &mut self,
        name: &str,
        args: impl IntoIterator<Item = ValueRef>,
        results: Vec<BindingKind>,
        span: Span,
    ) -> SmallVec<[ValueRef; 2]> {
        let count = results.len() as u32;
        let node = Node::NativeConstraint { name: name.to_owned(), args: args.into_iter().collect(), results };
        let id = self.push(node, span);
        (0..count).map(|result| ValueRef { node: id, result }).collect()
    }

    /// Call a host-registered rewrite-side helper; returns one edge per
    /// declared result.
    pub fn native_rewrite(
        &mut self,
        name: &str,
        args: impl IntoIterator<Item = ValueRef>,
        results: Vec<BindingKind>,
        span: Span,
    ) -> SmallVec<[ValueRef; 2]> {
        let count = results.len() as u32;
        let node = Node::NativeRewrite { name: name.to_owned(), args: args.into_iter().collect(), results };
        let id = self.push(node, span);
        (0..count).map(|result| ValueRef { node: id, result }).collect()
    }

    /// Replace `target` with a replacement operation and/or replacement
    /// values; verification rejects setting both.
    pub fn replace(
        &mut self,
        target: ValueRef,
        with_op: Option<ValueRef>,
        with_values: impl IntoIterator<Item = ValueRef>,
        span: Span,
    ) -> NodeId {
        self.push(Node::Replace { target, with_op, with_values: with_values.into_iter().collect() }, span)
    }

    /// Construct a range of `element` kind from elements and sub-ranges.
    pub fn range(&mut self, element: ElementKind, args: impl IntoIterator<Item = ValueRef>, span: Span) -> ValueRef {
        self.push_value(Node::Range { element, args: args.into_iter().collect() }, span)
    }

    /// Begin the inline rewrite directive; subsequent appends land in its body.
    ///
    /// # Panics
    ///
    /// Panics when the pattern already has a rewrite directive.
    pub fn begin_rewrite(&mut self, root: Option<ValueRef>, span: Span) -> NodeId {
        self.begin_rewrite_parts(root, None, ValueRefs::new(), span)
    }

    /// Begin an external rewrite directive delegating to `name`.
    pub fn begin_external_rewrite(
        &mut self,
        root: Option<ValueRef>,
        name: &str,
        args: impl IntoIterator<Item = ValueRef>,
        span: Span,
    ) -> NodeId {
        self.begin_rewrite_parts(root, Some(name), args, span)
    }

    /// Generic directive form with independent name and argument lists, as
    /// produced by the generic surface syntax; shapes the sugar forms cannot
    /// express (external arguments on an inline rewrite) stay representable
    /// and are diagnosed by verification.
    pub fn begin_rewrite_parts(
        &mut self,
        root: Option<ValueRef>,
        external: Option<&str>,
        args: impl IntoIterator<Item = ValueRef>,
        span: Span,
    ) -> NodeId {
        assert!(self.rewrite.is_none(), "pattern already has a rewrite directive");
        let node = Node::Rewrite {
            root,
            external: external.map(str::to_owned),
            external_args: args.into_iter().collect(),
            actions: Vec::new(),
        };
        let directive = self.push(node, span);
        self.rewrite = Some(RewriteFrame { directive, actions: Vec::new() });
        directive
    }

    /// True once a rewrite directive has been begun.
    pub fn has_rewrite(&self) -> bool {
        self.rewrite.is_some()
    }

    /// Seal the pattern. The result is immutable and ready for verification.
    pub fn finish(mut self) -> Pattern {
        if let Some(frame) = self.rewrite.take() {
            match &mut self.nodes[frame.directive.index()].node {
                Node::Rewrite { actions, .. } => *actions = frame.actions,
                _ => unreachable!("rewrite frame points at a non-rewrite node"),
            }
        }
        Pattern { name: self.name, benefit: self.benefit, span: self.span, nodes: self.nodes, body: self.body }
    }
}
