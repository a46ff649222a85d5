//! Glyph run construction from text and font metrics
//!
//! [`build_run`] converts one contiguous styled text span into an ordered
//! [`GlyphRun`]. Grapheme clusters are folded into single glyphs (base
//! scalar plus extra chars), break weights come from the Unicode line
//! breaking algorithm (UAX #14), and each glyph is given the stretch budget
//! its script uses for justification.
//!
//! Construction never fails: a codepoint the font cannot map degrades to a
//! zero-width fallback glyph and a warning, so text layout continues instead
//! of aborting the whole run.

use crate::error::{Diagnostics, LayoutWarning};
use crate::geometry::Fixed;
use crate::text::glyph::{BreakWeight, Classification, Glyph, Spacing};
use std::fmt;
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// Resolved font metrics for one styled text span
///
/// Supplied by the caller's style resolution; the layout engine never loads
/// fonts itself. Implementations must be cheap to query — the run builder
/// calls [`FontMetrics::advance`] once per codepoint.
pub trait FontMetrics: fmt::Debug + Send + Sync {
  /// Advance width of a character, or `None` if the font cannot map it.
  fn advance(&self, c: char) -> Option<Fixed>;

  /// Line height of the font (ascent + descent + leading).
  fn height(&self) -> Fixed;

  /// Baseline offset from the top of the line box.
  fn baseline(&self) -> Fixed;

  /// Kerning adjustment between two adjacent characters (signed).
  fn kerning(&self, _prev: char, _next: char) -> Fixed {
    Fixed::ZERO
  }
}

/// An ordered sequence of glyphs for one contiguous styled text span
///
/// Owned by the text leaf that created it; a style or content change
/// invalidates the run and a fresh one is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphRun {
  glyphs: Vec<Glyph>,
}

impl GlyphRun {
  /// Creates a run from already-built glyphs.
  pub fn new(glyphs: Vec<Glyph>) -> Self {
    Self { glyphs }
  }

  /// All glyphs in order.
  pub fn glyphs(&self) -> &[Glyph] {
    &self.glyphs
  }

  /// Number of glyphs in the run.
  pub fn len(&self) -> usize {
    self.glyphs.len()
  }

  /// Returns true if the run contains no glyphs.
  pub fn is_empty(&self) -> bool {
    self.glyphs.is_empty()
  }

  /// Advance contributed by glyph `index` when it follows its predecessor
  /// within a line: width plus kerning. The kerning adjustment is dropped
  /// when the glyph starts a line.
  pub fn advance_at(&self, index: usize, starts_line: bool) -> Fixed {
    let glyph = &self.glyphs[index];
    if starts_line {
      glyph.width()
    } else {
      glyph.width() + glyph.kerning()
    }
  }

  /// Total advance of the whole run laid out on a single line.
  pub fn total_width(&self) -> Fixed {
    self
      .glyphs
      .iter()
      .enumerate()
      .map(|(i, _)| self.advance_at(i, i == 0))
      .sum()
  }

  /// Tallest glyph height in the run.
  pub fn max_height(&self) -> Fixed {
    self
      .glyphs
      .iter()
      .map(Glyph::height)
      .fold(Fixed::ZERO, Fixed::max)
  }
}

/// Justification behavior derived from the span's language tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JustifyRules {
  /// Stretch only at spaces.
  SpaceOnly,
  /// Stretch at spaces and between ideographs.
  Cjk,
}

fn justify_rules(lang: Option<&str>) -> JustifyRules {
  match lang.map(|l| l.get(..2).unwrap_or(l)) {
    Some("zh") | Some("ja") | Some("ko") => JustifyRules::Cjk,
    _ => JustifyRules::SpaceOnly,
  }
}

fn is_ideographic(c: char) -> bool {
  matches!(c,
    '\u{3040}'..='\u{30FF}'   // hiragana, katakana
    | '\u{3400}'..='\u{4DBF}' // CJK extension A
    | '\u{4E00}'..='\u{9FFF}' // CJK unified
    | '\u{F900}'..='\u{FAFF}' // CJK compatibility
    | '\u{AC00}'..='\u{D7AF}' // hangul syllables
  )
}

fn is_combining_mark(c: char) -> bool {
  matches!(c,
    '\u{0300}'..='\u{036F}'   // combining diacritics
    | '\u{1AB0}'..='\u{1AFF}' // combining diacritics extended
    | '\u{1DC0}'..='\u{1DFF}' // combining diacritics supplement
    | '\u{20D0}'..='\u{20FF}' // combining marks for symbols
    | '\u{FE20}'..='\u{FE2F}' // combining half marks
  )
}

fn classify(c: char) -> Classification {
  if c.is_whitespace() {
    Classification::Space
  } else if c.is_control() {
    Classification::Control
  } else if is_combining_mark(c) {
    Classification::Mark
  } else if is_ideographic(c) {
    Classification::Ideographic
  } else if c.is_numeric() {
    Classification::Digit
  } else if c.is_alphabetic() {
    Classification::Letter
  } else {
    Classification::Punctuation
  }
}

/// Spacing budget for a glyph, per the script's justification rules.
///
/// Latin text stretches only at spaces; CJK text additionally stretches
/// between ideographs, with a smaller per-gap budget.
fn spacing_for(classification: Classification, advance: Fixed, rules: JustifyRules) -> Spacing {
  match classification {
    Classification::Space => {
      Spacing::new(-(advance.mul_ratio(1, 4)), Fixed::ZERO, advance)
    }
    Classification::Ideographic if rules == JustifyRules::Cjk => {
      Spacing::new(Fixed::ZERO, Fixed::ZERO, advance.mul_ratio(1, 4))
    }
    _ => Spacing::NONE,
  }
}

/// Break weight at the boundary after the cluster ending at `cluster_end`.
///
/// `breaks` is the UAX #14 opportunity list for the whole text, sorted by
/// byte offset.
fn weight_at(
  breaks: &[(usize, BreakOpportunity)],
  cluster_end: usize,
  base: char,
) -> BreakWeight {
  match breaks.binary_search_by_key(&cluster_end, |&(offset, _)| offset) {
    Ok(idx) => match breaks[idx].1 {
      BreakOpportunity::Mandatory => BreakWeight::Mandatory,
      BreakOpportunity::Allowed => {
        if base == '\u{00AD}' {
          BreakWeight::SoftHyphen
        } else {
          BreakWeight::Word
        }
      }
    },
    Err(_) => BreakWeight::None,
  }
}

/// Builds a glyph run for one text span.
///
/// Pure with respect to its inputs: the same text, metrics and language
/// always produce the same run. Unmappable codepoints yield zero-width
/// fallback glyphs (recorded in `diags`) rather than failing the run.
///
/// # Arguments
///
/// * `text` - The resolved string value of the text leaf
/// * `metrics` - Resolved font metrics for the span
/// * `lang` - BCP 47 language tag, if known (selects justification rules)
/// * `diags` - Warning collector for the current layout run
///
/// # Examples
///
/// ```
/// use reportflow::error::Diagnostics;
/// use reportflow::text::build_run;
/// # use reportflow::text::FontMetrics;
/// # use reportflow::Fixed;
/// # #[derive(Debug)]
/// # struct Mono;
/// # impl FontMetrics for Mono {
/// #   fn advance(&self, _: char) -> Option<Fixed> { Some(Fixed::from_pts(6)) }
/// #   fn height(&self) -> Fixed { Fixed::from_pts(12) }
/// #   fn baseline(&self) -> Fixed { Fixed::from_pts(9) }
/// # }
///
/// let mut diags = Diagnostics::new();
/// let run = build_run("Hello world", &Mono, None, &mut diags);
/// assert_eq!(run.len(), 11);
/// assert!(diags.is_clean());
/// ```
pub fn build_run(
  text: &str,
  metrics: &dyn FontMetrics,
  lang: Option<&str>,
  diags: &mut Diagnostics,
) -> GlyphRun {
  let rules = justify_rules(lang);
  // UAX #14 always reports one final mandatory opportunity at the end of
  // the text. A run-final glyph is not an explicit separator, so that
  // entry is ignored; only breaks inside the text carry weight.
  let breaks: Vec<(usize, BreakOpportunity)> = linebreaks(text)
    .filter(|&(offset, _)| offset < text.len())
    .collect();

  let mut glyphs = Vec::new();
  let mut prev_base: Option<char> = None;

  for (start, cluster) in text.grapheme_indices(true) {
    let mut chars = cluster.chars();
    let base = match chars.next() {
      Some(c) => c,
      None => continue,
    };
    let extra: Vec<char> = chars.collect();
    let cluster_end = start + cluster.len();

    let break_weight = weight_at(&breaks, cluster_end, base);

    let glyph = match metrics.advance(base) {
      Some(base_advance) => {
        // Extra chars in the cluster contribute their own advances when the
        // font maps them; combining marks typically report zero.
        let width = extra
          .iter()
          .filter_map(|&c| metrics.advance(c))
          .fold(base_advance, |acc, w| acc + w);
        let classification = classify(base);
        let kerning = prev_base
          .map(|prev| metrics.kerning(prev, base))
          .unwrap_or(Fixed::ZERO);

        Glyph::new(
          base,
          break_weight,
          classification,
          spacing_for(classification, width, rules),
          width,
          metrics.height(),
          metrics.baseline(),
          kerning,
        )
        .with_extra_chars(&extra)
      }
      None => {
        diags.warn(LayoutWarning::UnmappableGlyph {
          codepoint: base as u32,
        });
        // Zero-width fallback with the strongest optional break weight so
        // lines may always wrap around it.
        Glyph::new(
          base,
          break_weight.max(BreakWeight::Word),
          Classification::Other,
          Spacing::NONE,
          Fixed::ZERO,
          metrics.height(),
          metrics.baseline(),
          Fixed::ZERO,
        )
        .with_extra_chars(&extra)
      }
    };

    glyphs.push(glyph);
    prev_base = Some(base);
  }

  GlyphRun::new(glyphs)
}
