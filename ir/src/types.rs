//! Fundamental types for pattern definitions.
//!
//! This module contains the small value types shared by the node model and the
//! verifier: source spans, the kind lattice for bound values, and the opaque
//! host-IR literal wrappers.

use std::fmt;

/// Half-open byte range into the pattern source text.
///
/// Every node carries the span it was parsed from; diagnostics report spans so
/// an external reporting surface can render them against the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Kind of a single bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ElementKind {
    /// A host-IR attribute.
    Attribute,
    /// A matched or created host-IR operation.
    Operation,
    /// A host-IR type.
    Type,
    /// A host-IR SSA value.
    Value,
}

/// Kind of the value produced by a pattern node: a single element or a range.
///
/// Ranges never nest; one unwrap always reaches an [`ElementKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Single(ElementKind),
    Range(ElementKind),
}

impl BindingKind {
    /// Element kind after unwrapping at most one range layer.
    pub const fn element(self) -> ElementKind {
        match self {
            Self::Single(element) | Self::Range(element) => element,
        }
    }

    pub const fn is_range(self) -> bool {
        matches!(self, Self::Range(_))
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(element) => write!(f, "{element}"),
            Self::Range(element) => write!(f, "range<{element}>"),
        }
    }
}

/// Textual form of a host-IR type literal.
///
/// The verifier never interprets these beyond equality; the host IR that gives
/// them meaning is an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeExpr(String);

impl TypeExpr {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeExpr {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Textual form of a host-IR attribute literal. Opaque, like [`TypeExpr`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrExpr(String);

impl AttrExpr {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AttrExpr {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for AttrExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
