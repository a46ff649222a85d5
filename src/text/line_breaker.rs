//! Greedy line breaking over glyph runs
//!
//! [`LineBreaker`] walks a [`GlyphRun`] and yields [`LineInfo`] records, one
//! per line, honoring break weights and an available width. It is a lazy,
//! restartable iterator: callers measuring "minimum lines needed" can stop
//! after the first N lines without paying for the rest.
//!
//! # Algorithm
//!
//! Greedy accumulation: track the running width and the best break candidate
//! seen so far (the last glyph whose weight permits a break). When the next
//! glyph would exceed the available width, cut at that candidate. A single
//! unbreakable token wider than the line is force-broken at the overflowing
//! glyph — the breaker never stalls — and the resulting line is flagged.
//! Mandatory-break glyphs (explicit line separators) always terminate a line
//! immediately, even under width.

use crate::geometry::Fixed;
use crate::text::glyph::{BreakWeight, Spacing};
use crate::text::run::GlyphRun;

/// One broken line within a glyph run
///
/// A view structure delimiting line contents by glyph index; it does not own
/// glyph data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo {
  /// First glyph of the line (inclusive)
  pub start: usize,
  /// One past the last glyph of the line (exclusive)
  pub end: usize,
  /// Consumed advance of the line's glyphs
  pub width: Fixed,
  /// Spacing budget of the trailing glyph (adjusted during justification)
  pub trailing_spacing: Spacing,
  /// True when the line was force-broken mid-token because no legal break
  /// candidate fit the available width
  pub forced: bool,
}

impl LineInfo {
  /// Number of glyphs on the line.
  pub fn len(&self) -> usize {
    self.end - self.start
  }

  /// Returns true if the line contains no glyphs.
  pub fn is_empty(&self) -> bool {
    self.start == self.end
  }
}

/// Lazy iterator producing the lines of a glyph run
///
/// # Examples
///
/// ```
/// use reportflow::error::Diagnostics;
/// use reportflow::text::{build_run, LineBreaker};
/// # use reportflow::text::FontMetrics;
/// # use reportflow::Fixed;
/// # #[derive(Debug)]
/// # struct Mono;
/// # impl FontMetrics for Mono {
/// #   fn advance(&self, _: char) -> Option<Fixed> { Some(Fixed::from_pts(10)) }
/// #   fn height(&self) -> Fixed { Fixed::from_pts(12) }
/// #   fn baseline(&self) -> Fixed { Fixed::from_pts(9) }
/// # }
///
/// let mut diags = Diagnostics::new();
/// let run = build_run("aa bb cc", &Mono, None, &mut diags);
/// let lines: Vec<_> = LineBreaker::new(&run, Fixed::from_pts(30), false).collect();
/// assert_eq!(lines.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct LineBreaker<'a> {
  run: &'a GlyphRun,
  max_width: Fixed,
  hyphenate: bool,
  pos: usize,
}

impl<'a> LineBreaker<'a> {
  /// Creates a breaker over `run` with the given available width.
  ///
  /// When `hyphenate` is true, soft-hyphen positions count as break
  /// candidates in addition to ordinary word breaks.
  pub fn new(run: &'a GlyphRun, max_width: Fixed, hyphenate: bool) -> Self {
    Self {
      run,
      max_width,
      hyphenate,
      pos: 0,
    }
  }

  fn threshold(&self) -> BreakWeight {
    if self.hyphenate {
      BreakWeight::SoftHyphen
    } else {
      BreakWeight::Word
    }
  }

  fn line(&self, start: usize, end: usize, width: Fixed, forced: bool) -> LineInfo {
    let trailing_spacing = if end > start {
      self.run.glyphs()[end - 1].spacing()
    } else {
      Spacing::NONE
    };
    LineInfo {
      start,
      end,
      width,
      trailing_spacing,
      forced,
    }
  }
}

impl Iterator for LineBreaker<'_> {
  type Item = LineInfo;

  fn next(&mut self) -> Option<LineInfo> {
    let glyphs = self.run.glyphs();
    if self.pos >= glyphs.len() {
      return None;
    }

    let start = self.pos;
    let threshold = self.threshold();
    let mut width = Fixed::ZERO;
    // Best break seen so far: (last glyph of the line, width through it).
    let mut candidate: Option<(usize, Fixed)> = None;

    let mut i = start;
    while i < glyphs.len() {
      let advance = self.run.advance_at(i, i == start);

      if width + advance > self.max_width {
        if let Some((cand, cand_width)) = candidate {
          self.pos = cand + 1;
          return Some(self.line(start, cand + 1, cand_width, false));
        }
        if i == start {
          // A single glyph wider than the line still gets placed.
          self.pos = start + 1;
          return Some(self.line(start, start + 1, advance, true));
        }
        // Unbreakable token overflow: cut before the current glyph.
        self.pos = i;
        return Some(self.line(start, i, width, true));
      }

      width += advance;

      if glyphs[i].break_weight() == BreakWeight::Mandatory {
        self.pos = i + 1;
        return Some(self.line(start, i + 1, width, false));
      }
      if glyphs[i].break_weight() >= threshold {
        candidate = Some((i, width));
      }
      i += 1;
    }

    self.pos = glyphs.len();
    Some(self.line(start, glyphs.len(), width, false))
  }
}

/// Convenience constructor mirroring the run builder's free-function style.
pub fn break_lines(run: &GlyphRun, max_width: Fixed, hyphenate: bool) -> LineBreaker<'_> {
  LineBreaker::new(run, max_width, hyphenate)
}

/// Distributes justification slack across a line's stretchable slots.
///
/// Returns the extra advance for each glyph in `line` (indexed from
/// `line.start`). Slack is apportioned proportionally to each slot's stretch
/// headroom and capped at the slot's max; rounding leftovers are assigned
/// one subunit at a time in glyph order so the result is deterministic.
/// When the line has no stretchable slots, or already fills the target, all
/// adjustments are zero.
pub fn justify_line(run: &GlyphRun, line: &LineInfo, target_width: Fixed) -> Vec<Fixed> {
  let count = line.len();
  let mut extra = vec![Fixed::ZERO; count];

  let slack = target_width - line.width;
  if slack <= Fixed::ZERO || count == 0 {
    return extra;
  }

  let glyphs = &run.glyphs()[line.start..line.end];
  let headroom: Vec<Fixed> = glyphs
    .iter()
    .map(|g| g.spacing().stretch_headroom())
    .collect();
  let total: Fixed = headroom.iter().copied().sum();
  if total == Fixed::ZERO {
    return extra;
  }

  let mut assigned = Fixed::ZERO;
  for (i, &h) in headroom.iter().enumerate() {
    if h == Fixed::ZERO {
      continue;
    }
    let share = slack
      .mul_ratio(h.subunits(), total.subunits())
      .min(h)
      .clamp_non_negative();
    extra[i] = share;
    assigned += share;
  }

  // Hand out rounding leftovers one subunit at a time, respecting caps.
  let mut remaining = (slack - assigned).min(total - assigned);
  let one = Fixed::from_subunits(1);
  while remaining > Fixed::ZERO {
    let mut progressed = false;
    for (i, &h) in headroom.iter().enumerate() {
      if remaining == Fixed::ZERO {
        break;
      }
      if extra[i] < h {
        extra[i] += one;
        remaining -= one;
        progressed = true;
      }
    }
    if !progressed {
      break;
    }
  }

  extra
}
