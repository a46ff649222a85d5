//! Error and diagnostic types for the layout engine
//!
//! Only structural problems are fatal: a malformed content tree (dangling
//! node handles) or box nesting deep enough to indicate a cycle. Everything
//! else — unmappable glyphs, conflicting size constraints, unbreakable
//! overflow tokens — degrades gracefully and is recorded as a non-fatal
//! [`LayoutWarning`] in the run's [`Diagnostics`].
//!
//! All errors use the `thiserror` crate for minimal boilerplate and proper
//! error trait implementations.

use crate::geometry::Fixed;
use crate::tree::NodeId;
use thiserror::Error;

/// Result type alias for layout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the layout engine
///
/// # Examples
///
/// ```
/// use reportflow::error::{Error, StructuralError};
///
/// fn layout() -> Result<(), Error> {
///   Err(Error::Structural(StructuralError::NestingTooDeep {
///     depth: 300,
///     limit: 256,
///   }))
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
  /// Malformed content tree handed in by the caller
  #[error("Structural error: {0}")]
  Structural(#[from] StructuralError),
}

/// Fatal structural errors in the caller-supplied content tree
///
/// The content tree is assumed acyclic by contract, but the engine still
/// guards against infinite nesting so a cyclic tree aborts instead of
/// hanging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
  /// Box nesting exceeded the engine's depth limit
  #[error("Box nesting depth {depth} exceeds limit {limit}; content tree is likely cyclic")]
  NestingTooDeep { depth: usize, limit: usize },

  /// A node handle does not exist in the content tree
  #[error("Dangling node handle {node}")]
  DanglingNode { node: NodeId },
}

/// A non-fatal problem encountered during a layout run
///
/// Warnings never change geometry silently: every degradation the engine
/// applies (clamping, force-breaking, glyph fallback) leaves one of these
/// in the run's diagnostic list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutWarning {
  /// A codepoint had no mapping in the font; a zero-width fallback glyph
  /// was substituted.
  UnmappableGlyph {
    /// The unmapped codepoint
    codepoint: u32,
  },

  /// Conflicting fixed constraints produced a negative dimension; it was
  /// clamped to zero and layout continued with a degenerate box.
  ConstraintClamped {
    /// The affected content node
    node: NodeId,
    /// The dimension before clamping
    requested: Fixed,
  },

  /// A single unbreakable token was wider than the available width and was
  /// force-broken mid-token.
  ForcedLineBreak {
    /// Width available to the line
    max_width: Fixed,
    /// Width the token would have needed
    token_width: Fixed,
  },

  /// A keep-together group was taller than an entire usable page and had
  /// to be split across pages anyway.
  KeepTogetherOverflow {
    /// Root node of the split group
    node: NodeId,
    /// Height of the group
    height: Fixed,
    /// Usable page height
    usable: Fixed,
  },

  /// The stack of active repeating headers was at least as tall as the
  /// usable page, leaving no room for content; this header stopped being
  /// repeated so the flow could advance.
  RepeatedHeaderDropped {
    /// The header element no longer repeated
    node: NodeId,
    /// Height of the header
    height: Fixed,
    /// Usable page height
    usable: Fixed,
  },
}

impl std::fmt::Display for LayoutWarning {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      LayoutWarning::UnmappableGlyph { codepoint } => {
        write!(f, "no glyph for U+{codepoint:04X}; substituted fallback")
      }
      LayoutWarning::ConstraintClamped { node, requested } => {
        write!(
          f,
          "node {node}: negative dimension {requested} clamped to zero"
        )
      }
      LayoutWarning::ForcedLineBreak {
        max_width,
        token_width,
      } => {
        write!(
          f,
          "unbreakable token ({token_width}) exceeds line width ({max_width}); force-broken"
        )
      }
      LayoutWarning::KeepTogetherOverflow {
        node,
        height,
        usable,
      } => {
        write!(
          f,
          "keep-together group at node {node} ({height}) exceeds usable page height ({usable}); split"
        )
      }
      LayoutWarning::RepeatedHeaderDropped {
        node,
        height,
        usable,
      } => {
        write!(
          f,
          "repeating header at node {node} ({height}) left no content room on a {usable} page; no longer repeated"
        )
      }
    }
  }
}

/// Per-run collector for non-fatal layout warnings
///
/// One `Diagnostics` lives for the duration of a layout run and is returned
/// alongside the page segments. Each recorded warning is also mirrored to
/// the `log` facade at `warn!` level.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
  warnings: Vec<LayoutWarning>,
}

impl Diagnostics {
  /// Creates an empty collector.
  pub fn new() -> Self {
    Self::default()
  }

  /// Records a warning.
  pub fn warn(&mut self, warning: LayoutWarning) {
    log::warn!("{warning}");
    self.warnings.push(warning);
  }

  /// Returns all warnings recorded so far, in emission order.
  pub fn warnings(&self) -> &[LayoutWarning] {
    &self.warnings
  }

  /// Returns true if no warnings were recorded.
  pub fn is_clean(&self) -> bool {
    self.warnings.is_empty()
  }

  /// Moves all warnings out of another collector into this one.
  pub fn absorb(&mut self, other: Diagnostics) {
    self.warnings.extend(other.warnings);
  }
}
