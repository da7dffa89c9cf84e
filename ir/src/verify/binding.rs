//! Binding-use analysis.
//!
//! A value declared in the matcher body must be consumed by something that
//! actually binds it: any consumer other than a pure result projection, or a
//! projection that is itself transitively bound. Values constructed inside the
//! rewrite directive's body are exempt (construction there is inherently
//! consuming), as are constraints already pinned to a constant.
//!
//! Edges only reference earlier-declared nodes, so the consumer graph is
//! acyclic and plain recursion terminates; results are memoized by node id to
//! avoid re-walking diamond-shaped consumer graphs.

use crate::error::{BindingError, Diagnostics};
use crate::node::{Node, NodeId};
use crate::verify::VerifyCtx;

pub(crate) fn check(ctx: &VerifyCtx<'_>, diags: &mut Diagnostics) {
    let mut memo = vec![None; ctx.pattern.len()];
    for (id, node) in ctx.pattern.iter() {
        if ctx.in_rewrite(id) {
            continue;
        }
        let bindable = match node {
            Node::Operand { .. } | Node::Operands { .. } | Node::Operation { .. } => true,
            Node::Attribute { value, .. } => value.is_none(),
            Node::Type { constant } => constant.is_none(),
            Node::Types { constants } => constants.is_none(),
            _ => false,
        };
        if bindable && !has_binding_use(ctx, id, &mut memo) {
            diags.push(BindingError { span: ctx.span(id), kind: node.into() });
        }
    }
}

/// True when some consumer of `id` binds it, directly or through projections.
fn has_binding_use(ctx: &VerifyCtx<'_>, id: NodeId, memo: &mut [Option<bool>]) -> bool {
    if let Some(known) = memo[id.index()] {
        return known;
    }
    let bound = ctx
        .consumers(id)
        .iter()
        .any(|&consumer| !ctx.node(consumer).is_projection() || has_binding_use(ctx, consumer, memo));
    memo[id.index()] = Some(bound);
    bound
}
