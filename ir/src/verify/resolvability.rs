//! Result-type resolvability for rewrite-created operations.
//!
//! An operation created inside an inline rewrite must have result types the
//! engine can produce at rewrite time. The registry capability is a tri-state:
//! a kind that has (or might have) result-type inference is trusted, and an
//! unregistered kind is trusted optimistically since nothing disproves it.
//! For the rest, resolution succeeds at the first match:
//!
//! 1. the operation is used as the *replacement* in a replace action whose
//!    replaced target was declared earlier — types come from the target;
//! 2. no explicit result types: acceptable unless the registered arity
//!    guarantees results the engine would have to invent;
//! 3. explicit result types: each edge must come from a native rewrite call,
//!    a constant type constraint, or a constraint also borrowed by the
//!    matcher side.

use obereg_registry::OperationRegistry;

use crate::error::{Diagnostics, TypeResolvabilityError};
use crate::node::{Node, NodeId, ValueRef};
use crate::verify::VerifyCtx;

pub(crate) fn check<R>(ctx: &VerifyCtx<'_>, registry: &R, diags: &mut Diagnostics)
where
    R: OperationRegistry + ?Sized,
{
    for (id, node) in ctx.pattern.iter() {
        if !ctx.in_rewrite(id) {
            continue;
        }
        let Node::Operation { name, result_types, .. } = node else { continue };
        if name.as_deref().is_some_and(|name| registry.might_have_type_inference(name)) {
            continue;
        }
        check_operation(ctx, registry, id, name.as_deref(), result_types, diags);
    }
}

fn check_operation<R>(
    ctx: &VerifyCtx<'_>,
    registry: &R,
    id: NodeId,
    name: Option<&str>,
    result_types: &[ValueRef],
    diags: &mut Diagnostics,
) where
    R: OperationRegistry + ?Sized,
{
    let span = ctx.span(id);

    // Types can be taken from an operation this one replaces.
    if ctx.consumers(id).iter().any(|&consumer| is_replacement_use(ctx, consumer, id)) {
        return;
    }

    if result_types.is_empty() {
        // Without a concrete registered kind nothing can be proven; stay
        // permissive rather than reject what the host may well accept.
        let Some(name) = name else { return };
        let Some(caps) = registry.capabilities(name) else { return };
        if caps.result_arity.expects_results() {
            tracing::trace!(op = name, "rewrite-created operation cannot resolve its result types");
            diags.push(TypeResolvabilityError::NotInferrable { span, name: name.to_owned() });
        }
        return;
    }

    for (index, &edge) in result_types.iter().enumerate() {
        if !resolves(ctx, edge) {
            diags.push(TypeResolvabilityError::UnconstrainedResultType {
                span,
                index,
                type_span: ctx.span(edge.node()),
            });
        }
    }
}

/// A consumer use that lets `id`'s result types be taken from the operation it
/// replaces: `id` is the replacement (not the replaced target), and the target
/// was declared earlier in program order.
fn is_replacement_use(ctx: &VerifyCtx<'_>, consumer: NodeId, id: NodeId) -> bool {
    let Node::Replace { target, with_op: Some(with_op), .. } = ctx.node(consumer) else {
        return false;
    };
    with_op.node() == id && target.node() < id
}

/// A single result-type edge resolves when produced by a native rewrite call
/// (trusted), by a constant type constraint, or by a constraint that also
/// constrains a matcher-side operand or operation (borrowed type).
fn resolves(ctx: &VerifyCtx<'_>, edge: ValueRef) -> bool {
    match ctx.node(edge.node()) {
        Node::NativeRewrite { .. } => true,
        Node::Type { constant: Some(_) } | Node::Types { constants: Some(_) } => true,
        Node::Type { constant: None } | Node::Types { constants: None } => constrains_matcher_input(ctx, edge.node()),
        _ => false,
    }
}

fn constrains_matcher_input(ctx: &VerifyCtx<'_>, id: NodeId) -> bool {
    ctx.consumers(id).iter().any(|&consumer| {
        !ctx.in_rewrite(consumer)
            && matches!(ctx.node(consumer), Node::Operand { .. } | Node::Operands { .. } | Node::Operation { .. })
    })
}
