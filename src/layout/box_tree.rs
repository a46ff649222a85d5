//! Layout boxes — measured geometry derived from the content tree
//!
//! A [`LayoutBox`] records one content node's resolved geometry for a single
//! layout pass. Box trees are disposable: every re-layout discards and
//! rebuilds them from the content tree plus resolved styles, so no stale
//! geometry can survive a content change. A box holds only a [`NodeId`]
//! handle back to its originating element, never an owning reference — the
//! content tree never references boxes in return.

use crate::geometry::{Fixed, Rect};
use crate::style::SizePolicy;
use crate::text::LineInfo;
use crate::tree::NodeId;

/// Horizontal placement of one wrapped text line after alignment
///
/// Produced alongside each [`LineInfo`] when a text leaf is resolved. Center
/// and right alignment indent the whole line; justification leaves the line
/// at the content origin and records the extra advance assigned to each
/// glyph instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineAlignment {
  /// Offset of the line's first glyph from the content origin
  pub indent: Fixed,
  /// Extra advance per glyph on the line, from justification; empty when
  /// the line was not stretched
  pub stretch: Vec<Fixed>,
}

/// Measured geometry for one content node in one layout pass
///
/// Positions are absolute in flow coordinates (the root band's content
/// origin is (0, 0)); pagination later rebases them per page.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
  /// Originating content node (non-owning handle)
  pub node: NodeId,
  /// Requested width policy, kept for diagnostics and caching
  pub width_policy: SizePolicy,
  /// Requested height policy
  pub height_policy: SizePolicy,
  /// Resolved bounds in flow coordinates
  pub rect: Rect,
  /// Baseline offset from the box top
  pub baseline: Fixed,
  /// Child boxes in document order
  pub children: Vec<LayoutBox>,
  /// Measured line breaks for text leaves (empty otherwise); kept so
  /// pagination and renderers never re-break the run
  pub lines: Vec<LineInfo>,
  /// Alignment applied to each entry of `lines` (same length)
  pub line_alignment: Vec<LineAlignment>,
  /// The subtree must not be split across pages
  pub keep_together: bool,
  /// Re-emit at the top of every page this element's group continues on
  pub repeat_on_pages: bool,
}

impl LayoutBox {
  /// Width of the box.
  pub fn width(&self) -> Fixed {
    self.rect.width()
  }

  /// Height of the box.
  pub fn height(&self) -> Fixed {
    self.rect.height()
  }

  /// Returns true if the box has no children (text, shape and image leaves).
  pub fn is_leaf(&self) -> bool {
    self.children.is_empty()
  }

  /// Total number of boxes in this subtree, including self.
  pub fn subtree_len(&self) -> usize {
    1 + self.children.iter().map(LayoutBox::subtree_len).sum::<usize>()
  }
}
