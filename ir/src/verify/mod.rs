//! Whole-pattern semantic verification.
//!
//! A constructed [`Pattern`] is validated once, atomically, by four analyses
//! run in order: structural shape checks, binding-use analysis, connectivity
//! analysis, and result-type resolvability. Every analysis runs to completion
//! and all diagnostics are aggregated; nothing stops at the first failure.
//!
//! Verification is a pure, read-only pass: all working state lives in a
//! call-local [`VerifyCtx`], so independent patterns may be verified
//! concurrently against a shared registry.

mod binding;
mod connectivity;
mod resolvability;
mod structural;

use smallvec::SmallVec;

use obereg_registry::OperationRegistry;

use crate::error::Diagnostics;
use crate::node::{Node, NodeId};
use crate::pattern::Pattern;
use crate::types::Span;

/// Precomputed relational views shared by the analyses.
pub(crate) struct VerifyCtx<'a> {
    pub pattern: &'a Pattern,
    /// Consumers of each node, one entry per referencing edge.
    pub consumers: Vec<SmallVec<[NodeId; 4]>>,
    /// True for nodes inside the rewrite directive's inline body.
    pub in_rewrite: Vec<bool>,
    /// The terminating rewrite directive, when present.
    pub directive: Option<NodeId>,
}

impl<'a> VerifyCtx<'a> {
    fn new(pattern: &'a Pattern) -> Self {
        let consumers = pattern.consumer_map();
        let directive = pattern.rewrite_directive();
        let mut in_rewrite = vec![false; pattern.len()];
        if let Some(directive) = directive
            && let Node::Rewrite { actions, .. } = pattern.node(directive)
        {
            for &action in actions {
                in_rewrite[action.index()] = true;
            }
        }
        Self { pattern, consumers, in_rewrite, directive }
    }

    pub fn node(&self, id: NodeId) -> &'a Node {
        self.pattern.node(id)
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.pattern.node_span(id)
    }

    pub fn in_rewrite(&self, id: NodeId) -> bool {
        self.in_rewrite[id.index()]
    }

    pub fn consumers(&self, id: NodeId) -> &[NodeId] {
        &self.consumers[id.index()]
    }

    /// True when `id` is the rewrite directive itself or nested in its body.
    pub fn is_rewrite_consumer(&self, id: NodeId) -> bool {
        Some(id) == self.directive || self.in_rewrite(id)
    }
}

/// Run all analyses over `pattern`, aggregating every diagnostic.
#[tracing::instrument(skip_all, fields(pattern.name = pattern.name().unwrap_or(""), pattern.nodes = pattern.len()))]
pub fn run<R>(pattern: &Pattern, registry: &R) -> Result<(), Diagnostics>
where
    R: OperationRegistry + ?Sized,
{
    let ctx = VerifyCtx::new(pattern);
    let mut diags = Diagnostics::default();

    structural::check(&ctx, &mut diags);
    binding::check(&ctx, &mut diags);
    connectivity::check(&ctx, &mut diags);
    resolvability::check(&ctx, registry, &mut diags);

    tracing::debug!(diagnostics = diags.len(), "pattern verification complete");
    diags.into_result()
}
