//! Operation-kind registry for pattern verification.
//!
//! The verifier needs a small amount of information about the operation kinds a
//! pattern names: whether the kind is registered at all, how many results it
//! declares, and whether its result types can be inferred instead of stated.
//! This crate models that collaborator as the [`OperationRegistry`] trait so the
//! verifier stays decoupled from any concrete host IR.
//!
//! The inference capability is deliberately a tri-state: unregistered, registered
//! without inference, registered with inference. An unregistered kind is treated
//! optimistically ([`OperationRegistry::might_have_type_inference`] returns `true`
//! for it) because nothing can be proven about a kind the host has not described.

use std::collections::HashMap;

/// Declared result arity of a registered operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ResultArity {
    /// The kind never produces results.
    Zero,
    /// The kind produces exactly one result.
    One,
    /// The kind produces a variable number of results, possibly none.
    Variadic,
}

impl ResultArity {
    /// True when the declared arity guarantees at least one result.
    pub const fn expects_results(self) -> bool {
        matches!(self, ResultArity::One)
    }
}

/// Capabilities the host declares for one registered operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpCapabilities {
    pub result_arity: ResultArity,
    /// The kind unconditionally implements result-type inference.
    pub infers_result_types: bool,
    /// The kind conditionally implements result-type inference (e.g. through a
    /// host extension that is only attached for some instances).
    pub might_infer_result_types: bool,
}

impl OpCapabilities {
    pub const fn new(result_arity: ResultArity) -> Self {
        Self { result_arity, infers_result_types: false, might_infer_result_types: false }
    }

    pub const fn with_inference(mut self) -> Self {
        self.infers_result_types = true;
        self
    }

    pub const fn with_conditional_inference(mut self) -> Self {
        self.might_infer_result_types = true;
        self
    }
}

/// Read-only lookup of operation-kind capabilities.
///
/// All queries go through [`capabilities`](Self::capabilities); the remaining
/// methods are pass-throughs, also usable by the matching engine that consumes
/// verified patterns. Lookups take `&self` only, so a registry shared behind a
/// reference supports concurrent verification of independent patterns.
pub trait OperationRegistry {
    /// Capabilities for `name`, or `None` when the kind is unregistered.
    fn capabilities(&self, name: &str) -> Option<OpCapabilities>;

    fn is_registered(&self, name: &str) -> bool {
        self.capabilities(name).is_some()
    }

    /// Declared result arity, when the kind is registered.
    fn result_arity(&self, name: &str) -> Option<ResultArity> {
        self.capabilities(name).map(|caps| caps.result_arity)
    }

    /// The kind unconditionally implements result-type inference.
    fn has_type_inference(&self, name: &str) -> bool {
        self.capabilities(name).is_some_and(|caps| caps.infers_result_types)
    }

    /// The kind implements, or might implement, result-type inference.
    ///
    /// Unregistered kinds answer `true`: absence of a registration proves
    /// nothing, and the verifier must not reject what it cannot check.
    fn might_have_type_inference(&self, name: &str) -> bool {
        self.capabilities(name).is_none_or(|caps| caps.infers_result_types || caps.might_infer_result_types)
    }
}

/// Map-backed registry for tests and embedders without a dynamic host.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    ops: HashMap<String, OpCapabilities>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the capabilities of an operation kind.
    pub fn register(&mut self, name: impl Into<String>, caps: OpCapabilities) -> &mut Self {
        self.ops.insert(name.into(), caps);
        self
    }

    /// Chainable form of [`register`](Self::register) for literal setups.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, caps: OpCapabilities) -> Self {
        self.register(name, caps);
        self
    }
}

impl OperationRegistry for StaticRegistry {
    fn capabilities(&self, name: &str) -> Option<OpCapabilities> {
        self.ops.get(name).copied()
    }
}

#[cfg(test)]
mod test;
