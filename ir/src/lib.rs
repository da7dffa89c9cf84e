//! Pattern-definition graph and semantic verifier.
//!
//! This crate models declarative match-plus-rewrite pattern definitions over a
//! host IR and decides, after construction, whether a definition is
//! well-formed enough to hand to a matching/rewriting engine.
//!
//! # Module Organization
//!
//! - [`types`] - Fundamental value types (spans, binding kinds, host literals)
//! - [`node`] - The closed set of pattern node kinds and their edges
//! - [`pattern`] - Pattern arena, builder, and read accessors
//! - [`error`] - Diagnostics emitted by verification
//! - [`verify`] - The four-analysis verification pipeline
//!
//! Parsing pattern source, the host IR itself, and the runtime engine that
//! executes validated patterns are external collaborators; the operation-kind
//! registry they share lives in `obereg-registry` and is re-exported here.

pub mod error;
pub mod node;
pub mod pattern;
pub mod prelude;
pub mod types;
pub mod verify;


pub use error::{BindingError, ConnectivityError, Diagnostic, Diagnostics, Note, StructuralError, TypeResolvabilityError};
pub use node::{Node, NodeId, ValueRef, ValueRefs};
pub use pattern::{Pattern, PatternBuilder};
pub use types::{AttrExpr, BindingKind, ElementKind, Span, TypeExpr};

// Re-export the registry collaborator for convenience.
pub use obereg_registry::{OpCapabilities, OperationRegistry, ResultArity, StaticRegistry};
