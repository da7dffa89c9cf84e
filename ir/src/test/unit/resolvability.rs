//! Result-type resolvability tests for rewrite-created operations.

use test_case::test_case;

use crate::error::{Diagnostic, TypeResolvabilityError};
use crate::prelude::*;
use crate::test::{registry, sp};

fn resolvability(p: &Pattern) -> Vec<TypeResolvabilityError> {
    match p.verify(&registry()) {
        Ok(()) => Vec::new(),
        Err(diags) => diags
            .into_iter()
            .filter_map(|d| match d {
                Diagnostic::TypeResolvability { source } => Some(source),
                _ => None,
            })
            .collect(),
    }
}

/// Matcher scaffold (an operand feeding one matched operation) plus an inline
/// rewrite creating `name` with no explicit result types and no replace use.
fn created_without_types(name: &str) -> Pattern {
    let mut b = Pattern::builder();
    let o = b.operand(None, sp(0));
    let m = b.operation(Some("foo.matched"), [o], [], [], sp(1));
    b.begin_rewrite(Some(m), sp(2));
    let created = b.operation(Some(name), [o], [], [], sp(3));
    b.replace(m, None, [o], sp(4));
    // Keep the created operation consumed without making it a replacement.
    b.native_rewrite("rw.consume", [created], vec![], sp(5));
    b.finish()
}

#[test_case("test.infer"; "registered with inference")]
#[test_case("test.cond"; "registered with conditional inference")]
#[test_case("foo.unregistered"; "unregistered is accepted optimistically")]
#[test_case("test.zero"; "zero results need no types")]
#[test_case("test.variadic"; "variadic results need no types")]
fn test_created_without_types_accepted(name: &str) {
    assert!(resolvability(&created_without_types(name)).is_empty());
}

#[test]
fn test_created_without_types_rejected_for_plain_registered_kind() {
    let errors = resolvability(&created_without_types("test.one"));
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        TypeResolvabilityError::NotInferrable { span, name } => {
            assert_eq!(*span, sp(3));
            assert_eq!(name, "test.one");
        }
        other => panic!("expected NotInferrable, got {other:?}"),
    }
    // The note names the kind that lacks the inference capability.
    let p = created_without_types("test.one");
    let diags: Vec<_> = p.verify(&registry()).unwrap_err().into_iter().collect();
    let notes = diags[0].notes();
    assert!(notes[0].message.contains("test.one"));
}

#[test]
fn test_replacement_use_resolves_types() {
    let mut b = Pattern::builder();
    let o = b.operand(None, sp(0));
    let m = b.operation(Some("foo.matched"), [o], [], [], sp(1));
    b.begin_rewrite(Some(m), sp(2));
    let created = b.operation(Some("test.one"), [o], [], [], sp(3));
    b.replace(m, Some(created), [], sp(4));
    let p = b.finish();

    // Types come from the operation being replaced.
    assert!(resolvability(&p).is_empty());
}

#[test]
fn test_replacement_of_later_operation_does_not_resolve() {
    let mut b = Pattern::builder();
    let o = b.operand(None, sp(0));
    let m = b.operation(Some("foo.matched"), [o], [], [], sp(1));
    b.begin_rewrite(Some(m), sp(2));
    let first = b.operation(Some("test.one"), [o], [], [], sp(3));
    let second = b.operation(Some("test.infer"), [o], [], [], sp(4));
    // `first` replaces an operation declared after it: its types cannot be
    // taken from there.
    b.replace(second, Some(first), [], sp(5));
    b.replace(m, None, [o], sp(6));
    let p = b.finish();

    let errors = resolvability(&p);
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], TypeResolvabilityError::NotInferrable { span, .. } if *span == sp(3)));
}

#[test]
fn test_constant_type_edge_resolves() {
    let mut b = Pattern::builder();
    let t = b.type_(Some(TypeExpr::new("i32")), sp(0));
    let o = b.operand(None, sp(1));
    let m = b.operation(Some("foo.matched"), [o], [], [], sp(2));
    b.begin_rewrite(Some(m), sp(3));
    let created = b.operation(Some("test.one"), [o], [], [], sp(4));
    b.constrain_results(created, [t]);
    b.replace(m, Some(created), [], sp(5));
    let p = b.finish();

    assert!(resolvability(&p).is_empty());
}

#[test]
fn test_unconstrained_unused_type_edge_fails_with_index() {
    let mut b = Pattern::builder();
    let t = b.type_(None, sp(0));
    let o = b.operand(None, sp(1));
    let m = b.operation(Some("foo.matched"), [o], [], [], sp(2));
    b.begin_rewrite(Some(m), sp(3));
    let created = b.operation(Some("test.one"), [o], [], [], sp(4));
    b.constrain_results(created, [t]);
    b.native_rewrite("rw.consume", [created], vec![], sp(5));
    b.replace(m, None, [o], sp(6));
    let p = b.finish();

    let errors = resolvability(&p);
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        TypeResolvabilityError::UnconstrainedResultType { span, index, type_span } => {
            assert_eq!(*span, sp(4));
            assert_eq!(*index, 0);
            assert_eq!(*type_span, sp(0));
        }
        other => panic!("expected UnconstrainedResultType, got {other:?}"),
    }
}

#[test]
fn test_borrowed_type_edge_resolves() {
    let mut b = Pattern::builder();
    let t = b.type_(None, sp(0));
    // The same unconstrained type also constrains a matcher-side operand, so
    // the matcher must have bound it before the rewrite runs.
    let o = b.operand(Some(t), sp(1));
    let m = b.operation(Some("foo.matched"), [o], [], [], sp(2));
    b.begin_rewrite(Some(m), sp(3));
    let created = b.operation(Some("test.one"), [o], [], [], sp(4));
    b.constrain_results(created, [t]);
    b.replace(m, Some(created), [], sp(5));
    let p = b.finish();

    assert!(resolvability(&p).is_empty());
}

#[test]
fn test_type_borrowed_only_inside_rewrite_does_not_resolve() {
    let mut b = Pattern::builder();
    let t = b.type_(None, sp(0));
    let o = b.operand(None, sp(1));
    let m = b.operation(Some("foo.matched"), [o], [], [], sp(2));
    b.begin_rewrite(Some(m), sp(3));
    // Another created operation also consumes `t`, but inside the rewrite
    // body: that is not a matcher-side borrow.
    let other = b.operation(Some("foo.other"), [o], [], [], sp(4));
    b.constrain_results(other, [t]);
    let created = b.operation(Some("test.one"), [o], [], [], sp(5));
    b.constrain_results(created, [t]);
    b.replace(m, Some(other), [], sp(6));
    b.native_rewrite("rw.consume", [created], vec![], sp(7));
    let p = b.finish();

    let errors = resolvability(&p);
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], TypeResolvabilityError::UnconstrainedResultType { index: 0, .. }));
}

#[test]
fn test_native_rewrite_produced_type_resolves() {
    let mut b = Pattern::builder();
    let o = b.operand(None, sp(0));
    let m = b.operation(Some("foo.matched"), [o], [], [], sp(1));
    b.begin_rewrite(Some(m), sp(2));
    let produced = b.native_rewrite("rw.type_of", [o], vec![BindingKind::Single(ElementKind::Type)], sp(3));
    let created = b.operation(Some("test.one"), [o], [], [], sp(4));
    b.constrain_results(created, [produced[0]]);
    b.replace(m, Some(created), [], sp(5));
    let p = b.finish();

    assert!(resolvability(&p).is_empty());
}

#[test]
fn test_constraint_produced_type_does_not_resolve() {
    let mut b = Pattern::builder();
    let o = b.operand(None, sp(0));
    let produced = b.native_constraint("cst.type_of", [o], vec![BindingKind::Single(ElementKind::Type)], sp(1));
    let m = b.operation(Some("foo.matched"), [o], [], [], sp(2));
    b.begin_rewrite(Some(m), sp(3));
    let created = b.operation(Some("test.one"), [o], [], [], sp(4));
    b.constrain_results(created, [produced[0]]);
    b.replace(m, Some(created), [], sp(5));
    let p = b.finish();

    let errors = resolvability(&p);
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], TypeResolvabilityError::UnconstrainedResultType { index: 0, .. }));
}

#[test]
fn test_each_failing_index_is_reported() {
    // No replacement use here: that would resolve the created operation
    // wholesale before the per-edge path runs.
    let mut b = Pattern::builder();
    let good = b.type_(Some(TypeExpr::new("i32")), sp(0));
    let bad_a = b.type_(None, sp(1));
    let bad_b = b.types(None, sp(2));
    let o = b.operand(None, sp(3));
    let m = b.operation(Some("foo.matched"), [o], [], [], sp(4));
    b.begin_rewrite(Some(m), sp(5));
    let created = b.operation(Some("test.one"), [o], [], [], sp(6));
    b.constrain_results(created, [good, bad_a, bad_b]);
    b.native_rewrite("rw.consume", [created], vec![], sp(7));
    b.replace(m, None, [o], sp(8));
    let p = b.finish();

    let errors = resolvability(&p);
    assert_eq!(errors.len(), 2);
    assert!(matches!(&errors[0], TypeResolvabilityError::UnconstrainedResultType { index: 1, type_span, .. } if *type_span == sp(1)));
    assert!(matches!(&errors[1], TypeResolvabilityError::UnconstrainedResultType { index: 2, type_span, .. } if *type_span == sp(2)));
}

#[test]
fn test_wildcard_created_operation_without_types_is_not_a_resolvability_error() {
    let mut b = Pattern::builder();
    let o = b.operand(None, sp(0));
    let m = b.operation(Some("foo.matched"), [o], [], [], sp(1));
    b.begin_rewrite(Some(m), sp(2));
    b.operation(None, [o], [], [], sp(3));
    b.replace(m, None, [o], sp(4));
    let p = b.finish();

    // The missing name is a structural finding; with nothing registered to
    // check against, resolvability stays permissive.
    assert!(resolvability(&p).is_empty());
    let diags: Vec<_> = p.verify(&registry()).unwrap_err().into_iter().collect();
    assert!(diags.iter().any(|d| matches!(d, Diagnostic::Structural { .. })));
}
