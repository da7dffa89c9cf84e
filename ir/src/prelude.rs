//! Common imports for building and verifying patterns.
//!
//! ```rust,ignore
//! use obereg_ir::prelude::*;
//! ```

pub use crate::error::{Diagnostic, Diagnostics, Note};
pub use crate::node::{Node, NodeId, ValueRef};
pub use crate::pattern::{Pattern, PatternBuilder};
pub use crate::types::{AttrExpr, BindingKind, ElementKind, Span, TypeExpr};

// Re-exports from the registry collaborator.
pub use obereg_registry::{OpCapabilities, OperationRegistry, ResultArity, StaticRegistry};

pub use strum::AsRefStr;
