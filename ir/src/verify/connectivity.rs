//! Connected-component analysis over the matcher subgraph.
//!
//! A pattern whose matcher graph splits into fragments that are only related
//! by both being consumed in the rewrite would match each fragment
//! independently, a combinatorial match the author almost never intends.
//! Attention is limited to operand/result/operation nodes with a direct
//! consumer in the rewrite directive; nodes without one are already covered by
//! the binding-use analysis.
//!
//! The traversal is deliberately bidirectional: "derived from" and "used by"
//! edges both carry semantic relatedness here.

use crate::error::{ConnectivityError, Diagnostics};
use crate::node::{Node, NodeId};
use crate::verify::VerifyCtx;

pub(crate) fn check(ctx: &VerifyCtx<'_>, diags: &mut Diagnostics) {
    let mut visited = vec![false; ctx.pattern.len()];
    let mut first = true;
    for &id in ctx.pattern.body() {
        let qualifying = matches!(
            ctx.node(id),
            Node::Operand { .. } | Node::Operands { .. } | Node::Result { .. } | Node::Results { .. }
                | Node::Operation { .. }
        );
        if !qualifying || !ctx.consumers(id).iter().any(|&consumer| ctx.is_rewrite_consumer(consumer)) {
            continue;
        }
        if first {
            visit(ctx, id, &mut visited);
            first = false;
        } else if !visited[id.index()] {
            diags.push(ConnectivityError { span: ctx.span(id) });
        }
    }
}

/// Mark everything reachable from `start` over the matcher subgraph: operand
/// edges of operations, the source edge of projections, and every consumer
/// edge; never entering the rewrite directive or its body.
fn visit(ctx: &VerifyCtx<'_>, start: NodeId, visited: &mut [bool]) {
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if ctx.is_rewrite_consumer(id) || visited[id.index()] {
            continue;
        }
        visited[id.index()] = true;

        match ctx.node(id) {
            Node::Operation { operands, .. } => stack.extend(operands.iter().map(|edge| edge.node())),
            Node::Result { parent, .. } | Node::Results { parent, .. } => stack.push(parent.node()),
            _ => {}
        }
        stack.extend(ctx.consumers(id).iter().copied());
    }
}
