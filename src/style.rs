//! Resolved style properties consumed by layout
//!
//! The engine never resolves styles itself: callers hand every content node
//! a [`ResolvedStyle`] with final numeric values. Only the properties layout
//! acts on are modeled here — visual styling (colors, borders, fonts beyond
//! metrics) belongs to the renderers.

use crate::geometry::{EdgeOffsets, Fixed};

/// Requested sizing behavior for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePolicy {
  /// Exact size in fixed-point units.
  Fixed(Fixed),
  /// Percentage of the parent's content extent, in hundredths of a percent
  /// (`5000` = 50%). Stored as an integer so the width pass stays free of
  /// floats.
  Percent(u32),
  /// Size to the content (text wraps to the available width; containers
  /// grow to hold their children).
  Content,
  /// Take a share of the remaining extent, split between siblings
  /// proportionally to `weight`.
  Fill {
    /// Relative share; zero behaves like weight 1.
    weight: u32,
  },
}

impl SizePolicy {
  /// Fill with the default weight.
  pub const FILL: Self = Self::Fill { weight: 1 };
}

/// Horizontal text alignment within a text leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
  /// Flush left (default)
  #[default]
  Left,
  /// Centered
  Center,
  /// Flush right
  Right,
  /// Both margins flush; line slack is distributed across stretchable
  /// spacing slots
  Justify,
}

/// Final numeric style properties for one content node
///
/// Produced by the caller's style/CSS resolution; read-only to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
  /// Width sizing policy
  pub width: SizePolicy,
  /// Height sizing policy
  pub height: SizePolicy,
  /// Inner padding
  pub padding: EdgeOffsets,
  /// Horizontal alignment for text content
  pub align: HAlign,
  /// Never split this subtree across pages
  pub keep_together: bool,
  /// Allow the element to grow beyond its fixed height when content needs it
  pub dynamic_height: bool,
  /// Once one dimension is known, derive the other from the element's
  /// natural aspect ratio
  pub keep_aspect_ratio: bool,
  /// Re-emit this element at the top of every page its group continues on
  /// (group headers/footers)
  pub repeat_on_pages: bool,
  /// Line advance for wrapped text
  pub line_height: Fixed,
  /// Hyphenation enabled for text content
  pub hyphenate: bool,
  /// BCP 47 language tag for script-specific justification, if known
  pub lang: Option<String>,
}

impl Default for ResolvedStyle {
  fn default() -> Self {
    Self {
      width: SizePolicy::Content,
      height: SizePolicy::Content,
      padding: EdgeOffsets::ZERO,
      align: HAlign::Left,
      keep_together: false,
      dynamic_height: false,
      keep_aspect_ratio: false,
      repeat_on_pages: false,
      line_height: Fixed::from_pts(12),
      hyphenate: false,
      lang: None,
    }
  }
}

impl ResolvedStyle {
  /// Shorthand for a style with a fixed width and height.
  pub fn sized(width: Fixed, height: Fixed) -> Self {
    Self {
      width: SizePolicy::Fixed(width),
      height: SizePolicy::Fixed(height),
      ..Self::default()
    }
  }
}
