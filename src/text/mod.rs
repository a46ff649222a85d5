//! Text measurement: glyphs, runs, line breaking and justification
//!
//! The pipeline is build-then-break: [`build_run`] folds a styled text span
//! into a [`GlyphRun`] (one glyph per grapheme cluster, with break weights
//! and stretch budgets), and [`LineBreaker`] lazily cuts the run into
//! [`LineInfo`] lines against an available width. [`justify_line`] computes
//! the per-glyph spacing adjustments for justified alignment.

pub mod glyph;
pub mod line_breaker;
pub mod run;

pub use glyph::{BreakWeight, Classification, Glyph, Spacing};
pub use line_breaker::{break_lines, justify_line, LineBreaker, LineInfo};
pub use run::{build_run, FontMetrics, GlyphRun};
