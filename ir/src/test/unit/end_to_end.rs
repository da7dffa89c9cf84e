//! Whole-pipeline scenarios and aggregation behavior.

use crate::error::Diagnostic;
use crate::prelude::*;
use crate::test::{registry, sp};

/// An operand feeds a matched `foo.add`; the rewrite replaces that match with
/// a freshly created `foo.sub` over the same operand, declaring no result
/// types. Both names are unregistered, so every analysis accepts.
#[test]
fn test_replace_add_with_sub_verifies_cleanly() {
    let mut b = Pattern::builder().named("add-to-sub").benefit(1);
    let o1 = b.operand(None, sp(0));
    let m1 = b.operation(Some("foo.add"), [o1], [], [], sp(1));
    b.begin_rewrite(Some(m1), sp(2));
    let created = b.operation(Some("foo.sub"), [o1], [], [], sp(3));
    b.replace(m1, Some(created), [], sp(4));
    let p = b.finish();

    assert_eq!(p.verify(&registry()), Ok(()));
}

#[test]
fn test_full_matcher_surface_verifies_cleanly() {
    let mut b = Pattern::builder().named("fold-mul").benefit(2);
    let t = b.type_(Some(TypeExpr::new("i32")), sp(0));
    let o = b.operand(Some(t), sp(1));
    let os = b.operands(None, sp(2));
    let a = b.attribute(None, None, sp(3));
    let m = b.operation(Some("foo.mul"), [o, os], [("predicate", a)], [t], sp(4));
    let r = b.result(m, 0, sp(5));
    let checked = b.native_constraint("cst.single_use", [r], vec![], sp(6));
    assert!(checked.is_empty());
    b.begin_external_rewrite(Some(m), "rw.fold_mul", [r], sp(7));
    let p = b.finish();

    assert_eq!(p.verify(&registry()), Ok(()));
}

#[test]
fn test_verification_is_idempotent() {
    let mut b = Pattern::builder().spanned(sp(20));
    let o1 = b.operand(None, sp(0));
    b.operand(None, sp(1)); // unbound
    let m1 = b.operation(Some("foo.a"), [o1], [], [], sp(2));
    let m2 = b.operation(Some("foo.b"), [], [], [], sp(3));
    b.begin_rewrite(Some(m1), sp(4));
    let created = b.operation(Some("test.one"), [], [], [], sp(5));
    b.replace(m1, Some(created), [], sp(6));
    b.replace(m2, None, [o1], sp(7));
    let p = b.finish();

    let first = p.verify(&registry());
    let second = p.verify(&registry());
    assert!(first.is_err());
    assert_eq!(first, second);
}

#[test]
fn test_analyses_aggregate_across_kinds() {
    let mut b = Pattern::builder().spanned(sp(30));
    // Unbound operand (binding), disconnected second match (connectivity),
    // non-inferable created operation (resolvability), and a wildcard created
    // operation (structural) in a single run.
    let o1 = b.operand(None, sp(0));
    b.operand(None, sp(1));
    let m1 = b.operation(Some("foo.a"), [o1], [], [], sp(2));
    let m2 = b.operation(Some("foo.b"), [], [], [], sp(3));
    b.begin_rewrite(Some(m1), sp(4));
    let created = b.operation(Some("test.one"), [o1], [], [], sp(5));
    b.operation(None, [], [], [], sp(6));
    b.native_rewrite("rw.consume", [created], vec![], sp(7));
    b.replace(m1, None, [o1], sp(8));
    b.replace(m2, None, [o1], sp(9));
    let p = b.finish();

    let diags: Vec<Diagnostic> = p.verify(&registry()).unwrap_err().into_iter().collect();
    assert!(diags.iter().any(|d| matches!(d, Diagnostic::Structural { .. })));
    assert!(diags.iter().any(|d| matches!(d, Diagnostic::Binding { .. })));
    assert!(diags.iter().any(|d| matches!(d, Diagnostic::Connectivity { .. })));
    assert!(diags.iter().any(|d| matches!(d, Diagnostic::TypeResolvability { .. })));
}

#[test]
fn test_diagnostics_render_and_locate() {
    let mut b = Pattern::builder().spanned(sp(10));
    b.operand(None, sp(0));
    let p = b.finish();

    let diags = p.verify(&registry()).unwrap_err();
    let rendered = diags.to_string();
    assert!(rendered.contains("rewrite directive"));
    assert!(rendered.contains("at least one operation match"));
    assert!(rendered.contains("binding use"));

    for diag in &diags {
        // Every diagnostic points either at a node or at the pattern itself.
        assert!(diag.span() == sp(10) || diag.span() == sp(0));
    }
}
