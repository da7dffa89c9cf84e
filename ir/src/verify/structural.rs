//! Local, per-node shape checks.
//!
//! Two layers: whole-body checks (terminator, at least one operation match,
//! closed matcher-kind set) and per-node checks that apply wherever the node
//! sits. All findings are collected independently.

use crate::error::{Diagnostics, StructuralError};
use crate::node::Node;
use crate::types::{BindingKind, ElementKind};
use crate::verify::VerifyCtx;

pub(crate) fn check(ctx: &VerifyCtx<'_>, diags: &mut Diagnostics) {
    let pattern = ctx.pattern;

    // Body-level shape.
    if ctx.directive.is_none() {
        let last = pattern.body().last().map(|&id| ctx.span(id));
        diags.push(StructuralError::MissingTerminator { span: pattern.span(), last });
    }
    if !pattern.body().iter().any(|&id| matches!(ctx.node(id), Node::Operation { .. })) {
        diags.push(StructuralError::EmptyPattern { span: pattern.span() });
    }
    for &id in pattern.body() {
        let node = ctx.node(id);
        if node.is_rewrite_only() {
            diags.push(StructuralError::ForeignNode { span: pattern.span(), node: ctx.span(id), kind: node.into() });
        }
    }

    // Per-node shape, in declaration order.
    for (id, node) in pattern.iter() {
        let span = ctx.span(id);
        match node {
            Node::Operation { name, attr_names, attr_values, .. } => {
                if attr_names.len() != attr_values.len() {
                    diags.push(StructuralError::AttributeCountMismatch {
                        span,
                        names: attr_names.len(),
                        values: attr_values.len(),
                    });
                }
                if name.is_none() && ctx.in_rewrite(id) {
                    diags.push(StructuralError::MissingOperationName { span });
                }
            }
            Node::Attribute { value, ty } => {
                if value.is_some() && ty.is_some() {
                    diags.push(StructuralError::AttributeTypeWithValue { span });
                }
                if value.is_none() && ctx.in_rewrite(id) {
                    diags.push(StructuralError::NonConstantAttributeInRewrite { span });
                }
            }
            Node::Results { index, kind, .. } => {
                if index.is_none() && *kind != BindingKind::Range(ElementKind::Value) {
                    diags.push(StructuralError::UnindexedResultsNotRange { span, actual: *kind });
                }
            }
            Node::NativeConstraint { args, results, .. } => {
                if args.is_empty() {
                    diags.push(StructuralError::ConstraintWithoutArgs { span });
                }
                if results.iter().any(|&kind| kind == BindingKind::Single(ElementKind::Operation)) {
                    diags.push(StructuralError::ConstraintReturnsOperation { span });
                }
            }
            Node::NativeRewrite { args, results, .. } => {
                if args.is_empty() && results.is_empty() {
                    diags.push(StructuralError::NativeRewriteWithoutEffect { span });
                }
            }
            Node::Replace { with_op, with_values, .. } => {
                if with_op.is_some() && !with_values.is_empty() {
                    diags.push(StructuralError::AmbiguousReplacement { span });
                }
            }
            Node::Range { element, args } => {
                for (index, &arg) in args.iter().enumerate() {
                    let actual = pattern.value_kind(arg).element();
                    if actual != *element {
                        diags.push(StructuralError::RangeElementMismatch { span, index, expected: *element, actual });
                    }
                }
            }
            Node::Rewrite { external, external_args, actions, .. } => match external {
                Some(_) => {
                    if !actions.is_empty() {
                        diags.push(StructuralError::NonEmptyExternalRewrite { span });
                    }
                }
                None => {
                    if actions.is_empty() {
                        diags.push(StructuralError::EmptyInlineRewrite { span });
                    }
                    if !external_args.is_empty() {
                        diags.push(StructuralError::ExternalArgsWithInlineRewrite { span });
                    }
                }
            },
            Node::Operand { .. } | Node::Operands { .. } | Node::Result { .. } | Node::Type { .. }
            | Node::Types { .. } => {}
        }
    }
}
