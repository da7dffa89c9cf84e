//! Pattern node kinds and edges.
//!
//! The [`Node`] enum defines the closed set of constructs a pattern definition
//! is built from. Each variant encodes its input edges directly, so traversal
//! helpers ([`Node::for_each_input`]) and the verifier can walk the graph
//! without a side table.
//!
//! Design choices:
//! - The kind set is closed and exhaustively matched everywhere; the grammar
//!   that produces these nodes is itself closed, so no extension point exists.
//! - Edge lists use `SmallVec` to avoid heap allocation for the common case of
//!   a few operands per node.
//! - Attribute names and attribute value edges are stored as separate parallel
//!   lists, so a count mismatch coming from the generic surface form stays
//!   representable and diagnosable.

use smallvec::SmallVec;

use crate::types::{AttrExpr, BindingKind, ElementKind, TypeExpr};

/// Index of a node within its pattern, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Edge to one value produced by an earlier node.
///
/// Most nodes produce a single value; native calls may produce several, so an
/// edge names both the producing node and the result position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueRef {
    pub(crate) node: NodeId,
    pub(crate) result: u32,
}

impl ValueRef {
    pub const fn node(self) -> NodeId {
        self.node
    }

    pub const fn result(self) -> u32 {
        self.result
    }
}

/// Ordered edge list of a node.
pub type ValueRefs = SmallVec<[ValueRef; 4]>;

/// One pattern construct.
///
/// The first nine variants are legal in matcher position; `NativeRewrite`,
/// `Replace` and `Range` only inside a rewrite directive's inline body;
/// `Rewrite` terminates the pattern body. `Operation`, `Result`, `Results`,
/// `Attribute` and the type constraints are reused in rewrite position with
/// construction semantics.
#[derive(Debug, Clone, PartialEq, Eq, strum::AsRefStr, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Node {
    /// Match a single operand value, optionally constrained by a type edge.
    Operand { ty: Option<ValueRef> },
    /// Match a range of operand values, optionally constrained by a type-range edge.
    Operands { tys: Option<ValueRef> },
    /// Project one result of a matched or created operation.
    Result { parent: ValueRef, index: u32 },
    /// Project the results of an operation: all of them (`index: None`, a
    /// `range<value>`), or the result group at a fixed position.
    Results { parent: ValueRef, index: Option<u32>, kind: BindingKind },
    /// Match an operation (matcher position, name optional) or create one
    /// (rewrite position, name required).
    Operation {
        name: Option<String>,
        operands: ValueRefs,
        attr_names: Vec<String>,
        attr_values: ValueRefs,
        result_types: ValueRefs,
    },
    /// Match an attribute, or hold a constant attribute literal.
    Attribute { value: Option<AttrExpr>, ty: Option<ValueRef> },
    /// Type constraint, optionally pinned to a constant literal.
    Type { constant: Option<TypeExpr> },
    /// Type-range constraint, optionally pinned to constant literals.
    Types { constants: Option<Vec<TypeExpr>> },
    /// Call into a host-registered matcher-side constraint.
    NativeConstraint { name: String, args: ValueRefs, results: Vec<BindingKind> },
    /// Call into a host-registered rewrite-side helper.
    NativeRewrite { name: String, args: ValueRefs, results: Vec<BindingKind> },
    /// Replace a matched operation with another operation or with values.
    Replace { target: ValueRef, with_op: Option<ValueRef>, with_values: ValueRefs },
    /// Construct a range from elements and sub-ranges of one element kind.
    Range { element: ElementKind, args: ValueRefs },
    /// The rewrite directive terminating the pattern body: either external
    /// (name plus arguments, empty body) or inline (action sequence).
    Rewrite { root: Option<ValueRef>, external: Option<String>, external_args: ValueRefs, actions: Vec<NodeId> },
}

impl Node {
    /// Visit every input edge of this node, in declaration order.
    ///
    /// The inline body of a `Rewrite` is nesting, not data flow, and is not
    /// visited here.
    pub fn for_each_input(&self, mut f: impl FnMut(ValueRef)) {
        match self {
            Node::Operand { ty: edge } | Node::Operands { tys: edge } | Node::Attribute { ty: edge, .. } => {
                if let Some(edge) = edge {
                    f(*edge);
                }
            }
            Node::Result { parent, .. } | Node::Results { parent, .. } => f(*parent),
            Node::Operation { operands, attr_values, result_types, .. } => {
                for edge in operands.iter().chain(attr_values).chain(result_types) {
                    f(*edge);
                }
            }
            Node::Type { .. } | Node::Types { .. } => {}
            Node::NativeConstraint { args, .. } | Node::NativeRewrite { args, .. } | Node::Range { args, .. } => {
                for edge in args {
                    f(*edge);
                }
            }
            Node::Replace { target, with_op, with_values } => {
                f(*target);
                if let Some(with_op) = with_op {
                    f(*with_op);
                }
                for edge in with_values {
                    f(*edge);
                }
            }
            Node::Rewrite { root, external_args, .. } => {
                if let Some(root) = root {
                    f(*root);
                }
                for edge in external_args {
                    f(*edge);
                }
            }
        }
    }

    /// Ordered input edges, collected.
    pub fn inputs(&self) -> ValueRefs {
        let mut edges = ValueRefs::new();
        self.for_each_input(|edge| edges.push(edge));
        edges
    }

    /// Number of values this node produces.
    pub fn result_count(&self) -> usize {
        match self {
            Node::NativeConstraint { results, .. } | Node::NativeRewrite { results, .. } => results.len(),
            Node::Replace { .. } | Node::Rewrite { .. } => 0,
            _ => 1,
        }
    }

    /// Kind of the value produced at `result`, when it exists.
    pub fn produced(&self, result: u32) -> Option<BindingKind> {
        let single = |kind| (result == 0).then_some(kind);
        match self {
            Node::Operand { .. } | Node::Result { .. } => single(BindingKind::Single(ElementKind::Value)),
            Node::Operands { .. } => single(BindingKind::Range(ElementKind::Value)),
            Node::Results { kind, .. } => single(*kind),
            Node::Operation { .. } => single(BindingKind::Single(ElementKind::Operation)),
            Node::Attribute { .. } => single(BindingKind::Single(ElementKind::Attribute)),
            Node::Type { .. } => single(BindingKind::Single(ElementKind::Type)),
            Node::Types { .. } => single(BindingKind::Range(ElementKind::Type)),
            Node::NativeConstraint { results, .. } | Node::NativeRewrite { results, .. } => {
                results.get(result as usize).copied()
            }
            Node::Range { element, .. } => single(BindingKind::Range(*element)),
            Node::Replace { .. } | Node::Rewrite { .. } => None,
        }
    }

    /// Pure result projections: consuming through one does not bind by itself.
    pub const fn is_projection(&self) -> bool {
        matches!(self, Node::Result { .. } | Node::Results { .. })
    }

    /// Kinds only allowed inside a rewrite directive's inline body.
    pub const fn is_rewrite_only(&self) -> bool {
        matches!(self, Node::NativeRewrite { .. } | Node::Replace { .. } | Node::Range { .. })
    }
}
