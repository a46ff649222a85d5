//! The glyph value type and its break/justification metadata
//!
//! A [`Glyph`] is the smallest positioned rendering unit: one visual
//! character cluster with its metrics, its line-break classification, and
//! the stretch budget used for justification. Glyphs are immutable once
//! constructed; re-measuring text builds a fresh run instead of mutating
//! glyphs in place.

use crate::geometry::Fixed;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Ordinal priority of a potential line-break point at a glyph boundary
///
/// Higher weights are stronger break opportunities. The line breaker cuts at
/// the best candidate whose weight is at least [`BreakWeight::SoftHyphen`]
/// (when hyphenation is enabled) or [`BreakWeight::Word`] otherwise;
/// [`BreakWeight::Mandatory`] glyphs always terminate a line immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BreakWeight {
  /// No break permitted after this glyph.
  None,
  /// Break permitted only when hyphenating (soft hyphen, U+00AD).
  SoftHyphen,
  /// Ordinary soft-wrap opportunity (after spaces, between CJK ideographs).
  Word,
  /// The line must end here (newline, line/paragraph separator).
  Mandatory,
}

/// Script/category tag used for break and justification rules
///
/// This is a coarse classification, not a full Unicode category: it captures
/// exactly the distinctions the run builder and justifier act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
  /// Alphabetic base character
  Letter,
  /// Decimal digit
  Digit,
  /// Whitespace (the primary justification stretch slot)
  Space,
  /// Punctuation or symbol
  Punctuation,
  /// CJK ideograph or kana (stretchable in CJK justification)
  Ideographic,
  /// Combining mark folded into a preceding cluster
  Mark,
  /// Control character
  Control,
  /// Anything else, including fallback glyphs
  Other,
}

/// Min/optimal/max stretch budget attached to an inter-glyph gap
///
/// Justification distributes line slack across glyphs whose spacing has
/// headroom (`max > optimal`). A glyph with [`Spacing::NONE`] never
/// stretches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Spacing {
  /// Minimum extra advance (shrink floor)
  pub min: Fixed,
  /// Preferred extra advance
  pub optimal: Fixed,
  /// Maximum extra advance (stretch ceiling)
  pub max: Fixed,
}

impl Spacing {
  /// A spacing budget that never stretches or shrinks.
  pub const NONE: Self = Self {
    min: Fixed::ZERO,
    optimal: Fixed::ZERO,
    max: Fixed::ZERO,
  };

  /// Creates a spacing budget.
  pub const fn new(min: Fixed, optimal: Fixed, max: Fixed) -> Self {
    Self { min, optimal, max }
  }

  /// Headroom available for stretching (`max - optimal`, never negative).
  pub fn stretch_headroom(self) -> Fixed {
    (self.max - self.optimal).clamp_non_negative()
  }

  /// Returns true if this slot can absorb justification slack.
  pub fn is_stretchable(self) -> bool {
    self.max > self.optimal
  }
}

/// Shared sentinel for the empty extra-chars list.
///
/// Allocated once per process; every glyph without combining marks holds a
/// clone of this `Arc` instead of its own empty allocation.
fn empty_extra() -> Arc<[char]> {
  static EMPTY: OnceLock<Arc<[char]>> = OnceLock::new();
  EMPTY.get_or_init(|| Arc::from([] as [char; 0])).clone()
}

/// One renderable character slot: metrics plus break classification
///
/// A glyph normally corresponds to one Unicode scalar. When several
/// codepoints render as one visual unit (a base character with combining
/// marks), the base scalar is the glyph's codepoint and the remaining
/// scalars are carried as extra chars.
///
/// # Identity
///
/// Equality and hashing cover (codepoint, break weight, spacing, width,
/// height, kerning). Classification, baseline and extra chars are
/// rendering-only metadata and are intentionally excluded.
///
/// # Examples
///
/// ```
/// use reportflow::text::{BreakWeight, Classification, Glyph, Spacing};
/// use reportflow::Fixed;
///
/// let glyph = Glyph::new(
///   'a',
///   BreakWeight::None,
///   Classification::Letter,
///   Spacing::NONE,
///   Fixed::from_pts(6),
///   Fixed::from_pts(12),
///   Fixed::from_pts(9),
///   Fixed::ZERO,
/// );
/// assert_eq!(glyph.codepoint(), 'a');
/// assert!(glyph.extra_chars().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Glyph {
  codepoint: char,
  break_weight: BreakWeight,
  classification: Classification,
  spacing: Spacing,
  width: Fixed,
  height: Fixed,
  baseline: Fixed,
  kerning: Fixed,
  extra: Arc<[char]>,
}

impl Glyph {
  /// Creates a glyph without extra chars.
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    codepoint: char,
    break_weight: BreakWeight,
    classification: Classification,
    spacing: Spacing,
    width: Fixed,
    height: Fixed,
    baseline: Fixed,
    kerning: Fixed,
  ) -> Self {
    Self {
      codepoint,
      break_weight,
      classification,
      spacing,
      width,
      height,
      baseline,
      kerning,
      extra: empty_extra(),
    }
  }

  /// Returns a copy of this glyph carrying the given extra chars.
  ///
  /// An empty slice reuses the shared empty sentinel.
  pub fn with_extra_chars(mut self, extra: &[char]) -> Self {
    self.extra = if extra.is_empty() {
      empty_extra()
    } else {
      Arc::from(extra)
    };
    self
  }

  /// The base Unicode scalar of this cluster.
  pub fn codepoint(&self) -> char {
    self.codepoint
  }

  /// Break priority at the boundary after this glyph.
  pub fn break_weight(&self) -> BreakWeight {
    self.break_weight
  }

  /// Script/category tag.
  pub fn classification(&self) -> Classification {
    self.classification
  }

  /// Justification stretch budget.
  pub fn spacing(&self) -> Spacing {
    self.spacing
  }

  /// Advance width.
  pub fn width(&self) -> Fixed {
    self.width
  }

  /// Glyph height.
  pub fn height(&self) -> Fixed {
    self.height
  }

  /// Baseline offset from the glyph top.
  pub fn baseline(&self) -> Fixed {
    self.baseline
  }

  /// Kerning adjustment applied against the previous glyph (signed).
  pub fn kerning(&self) -> Fixed {
    self.kerning
  }

  /// Combining/extra codepoints rendered at this glyph position.
  pub fn extra_chars(&self) -> &[char] {
    &self.extra
  }
}

// Identity excludes classification, baseline and extra chars: they affect
// rendering but not line breaking or measurement.
impl PartialEq for Glyph {
  fn eq(&self, other: &Self) -> bool {
    self.codepoint == other.codepoint
      && self.break_weight == other.break_weight
      && self.spacing == other.spacing
      && self.width == other.width
      && self.height == other.height
      && self.kerning == other.kerning
  }
}

impl Eq for Glyph {}

impl Hash for Glyph {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.codepoint.hash(state);
    self.break_weight.hash(state);
    self.spacing.hash(state);
    self.width.hash(state);
    self.height.hash(state);
    self.kerning.hash(state);
  }
}
