//! Diagnostics emitted by pattern verification.
//!
//! Four recoverable kinds, matching the four analyses: [`StructuralError`],
//! [`BindingError`], [`ConnectivityError`] and [`TypeResolvabilityError`],
//! wrapped by [`Diagnostic`] and collected in order into [`Diagnostics`].
//! Every diagnostic exposes a primary [`Span`] and zero or more secondary
//! [`Note`]s for an external reporting surface.
//!
//! Violated construction-layer invariants (dangling edges, a second rewrite
//! directive) are programming errors and abort in the builder instead of
//! surfacing here.

use std::fmt;

use snafu::Snafu;

use crate::types::{BindingKind, ElementKind, Span};

/// Secondary message attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub message: String,
    pub span: Option<Span>,
}

impl Note {
    fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self { message: message.into(), span }
    }
}

/// Local, per-node shape violations. All instances in a body are collected.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum StructuralError {
    // =========================================================================
    // Whole-body shape
    // =========================================================================
    /// The pattern body does not end with a rewrite directive.
    #[snafu(display("expected pattern body to terminate with a rewrite directive"))]
    MissingTerminator { span: Span, last: Option<Span> },

    #[snafu(display("the pattern must contain at least one operation match"))]
    EmptyPattern { span: Span },

    /// A rewrite-only construct appeared in matcher position.
    #[snafu(display("expected only matcher constructs in the pattern body, found `{kind}`"))]
    ForeignNode { span: Span, node: Span, kind: &'static str },

    // =========================================================================
    // Per-node shape
    // =========================================================================
    #[snafu(display(
        "expected the same number of attribute values and attribute names, got {names} names and {values} values"
    ))]
    AttributeCountMismatch { span: Span, names: usize, values: usize },

    /// Operations created by the rewrite cannot be wildcards.
    #[snafu(display("must have an operation name when created within a rewrite directive"))]
    MissingOperationName { span: Span },

    #[snafu(display("expected rewrite body to be empty when the rewrite is external"))]
    NonEmptyExternalRewrite { span: Span },

    #[snafu(display("expected rewrite body to be non-empty when no external name is specified"))]
    EmptyInlineRewrite { span: Span },

    #[snafu(display("expected no external arguments when the rewrite is specified inline"))]
    ExternalArgsWithInlineRewrite { span: Span },

    #[snafu(display("expected no replacement values to be provided when the replacement operation is present"))]
    AmbiguousReplacement { span: Span },

    #[snafu(display("expected range argument #{index} to have element kind `{expected}`, but got `{actual}`"))]
    RangeElementMismatch { span: Span, index: usize, expected: ElementKind, actual: ElementKind },

    #[snafu(display("expected `range<value>` result kind when no index is specified, but got `{actual}`"))]
    UnindexedResultsNotRange { span: Span, actual: BindingKind },

    #[snafu(display("expected only one of [`type`, `value`] to be set"))]
    AttributeTypeWithValue { span: Span },

    #[snafu(display("expected a constant attribute value when specified within a rewrite directive"))]
    NonConstantAttributeInRewrite { span: Span },

    #[snafu(display("expected at least one argument to a native constraint"))]
    ConstraintWithoutArgs { span: Span },

    #[snafu(display("returning an operation from a native constraint is not supported"))]
    ConstraintReturnsOperation { span: Span },

    #[snafu(display("expected at least one argument or result on a native rewrite call"))]
    NativeRewriteWithoutEffect { span: Span },
}

impl StructuralError {
    pub fn span(&self) -> Span {
        match self {
            Self::MissingTerminator { span, .. }
            | Self::EmptyPattern { span }
            | Self::ForeignNode { span, .. }
            | Self::AttributeCountMismatch { span, .. }
            | Self::MissingOperationName { span }
            | Self::NonEmptyExternalRewrite { span }
            | Self::EmptyInlineRewrite { span }
            | Self::ExternalArgsWithInlineRewrite { span }
            | Self::AmbiguousReplacement { span }
            | Self::RangeElementMismatch { span, .. }
            | Self::UnindexedResultsNotRange { span, .. }
            | Self::AttributeTypeWithValue { span }
            | Self::NonConstantAttributeInRewrite { span }
            | Self::ConstraintWithoutArgs { span }
            | Self::ConstraintReturnsOperation { span }
            | Self::NativeRewriteWithoutEffect { span } => *span,
        }
    }

    pub fn notes(&self) -> Vec<Note> {
        match self {
            Self::MissingTerminator { last: Some(last), .. } => {
                vec![Note::new("see final construct defined here", Some(*last))]
            }
            Self::ForeignNode { node, .. } => {
                vec![Note::new("see foreign construct defined here", Some(*node))]
            }
            _ => Vec::new(),
        }
    }
}

/// A matcher-position value with no binding use. One report per offending node.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("expected a binding use for `{kind}` declared in the matcher body"))]
#[snafu(visibility(pub))]
pub struct BindingError {
    pub span: Span,
    pub kind: &'static str,
}

impl BindingError {
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn notes(&self) -> Vec<Note> {
        Vec::new()
    }
}

/// Rewrite-referenced matcher nodes spanning more than one component. One
/// report per disconnected node beyond the first component.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("matched values consumed by the rewrite must form a connected component"))]
#[snafu(visibility(pub))]
pub struct ConnectivityError {
    pub span: Span,
}

impl ConnectivityError {
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn notes(&self) -> Vec<Note> {
        Vec::new()
    }
}

/// A rewrite-created operation whose result types are not provably resolvable.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum TypeResolvabilityError {
    #[snafu(display("operation must have inferable or constrained result types when created within a rewrite"))]
    NotInferrable { span: Span, name: String },

    #[snafu(display("operation must have inferable or constrained result types when created within a rewrite"))]
    UnconstrainedResultType { span: Span, index: usize, type_span: Span },
}

impl TypeResolvabilityError {
    pub fn span(&self) -> Span {
        match self {
            Self::NotInferrable { span, .. } | Self::UnconstrainedResultType { span, .. } => *span,
        }
    }

    pub fn notes(&self) -> Vec<Note> {
        match self {
            Self::NotInferrable { name, .. } => vec![Note::new(
                format!("operation is created in a non-inferable context, but '{name}' does not provide result type inference"),
                None,
            )],
            Self::UnconstrainedResultType { index, type_span, .. } => {
                vec![Note::new(format!("result type #{index} was not constrained"), Some(*type_span))]
            }
        }
    }
}

/// One verification finding, tagged by analysis kind.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum Diagnostic {
    #[snafu(transparent)]
    Structural { source: StructuralError },
    #[snafu(transparent)]
    Binding { source: BindingError },
    #[snafu(transparent)]
    Connectivity { source: ConnectivityError },
    #[snafu(transparent)]
    TypeResolvability { source: TypeResolvabilityError },
}

impl Diagnostic {
    /// Primary location: the offending node (or the pattern itself for
    /// whole-body checks).
    pub fn span(&self) -> Span {
        match self {
            Self::Structural { source } => source.span(),
            Self::Binding { source } => source.span(),
            Self::Connectivity { source } => source.span(),
            Self::TypeResolvability { source } => source.span(),
        }
    }

    pub fn notes(&self) -> Vec<Note> {
        match self {
            Self::Structural { source } => source.notes(),
            Self::Binding { source } => source.notes(),
            Self::Connectivity { source } => source.notes(),
            Self::TypeResolvability { source } => source.notes(),
        }
    }
}

/// Ordered collection of every diagnostic from one verification run.
///
/// Ordering is deterministic: analysis order, then declaration order within an
/// analysis, so verifying an unchanged pattern twice yields identical output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub(crate) fn push(&mut self, diagnostic: impl Into<Diagnostic>) {
        self.0.push(diagnostic.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub(crate) fn into_result(self) -> Result<(), Diagnostics> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, diagnostic) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
