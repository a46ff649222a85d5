//! Two-pass box geometry resolution
//!
//! [`resolve_layout`] turns a content tree into a positioned [`LayoutBox`]
//! tree in three steps over one recursion plus a placement walk:
//!
//! 1. Widths resolve top-down: each node receives the width available to it
//!    from its parent and resolves its policy against that.
//! 2. Heights resolve bottom-up: text leaves measure their wrapped lines,
//!    bands sum child heights, rows take the max.
//! 3. Placement assigns absolute flow coordinates top-down, stacking band
//!    children vertically and row children horizontally.
//!
//! Sizing never fails. Conflicting constraints clamp to zero with a warning
//! and layout continues with a degenerate box; the only fatal outcomes are
//! structural (dangling handles, nesting deep enough to indicate a cycle).

use crate::error::{Diagnostics, LayoutWarning, Result, StructuralError};
use crate::geometry::{Fixed, Point, Rect, Size};
use crate::layout::box_tree::{LayoutBox, LineAlignment};
use crate::style::{HAlign, ResolvedStyle, SizePolicy};
use crate::text::{break_lines, build_run, justify_line, BreakWeight, GlyphRun, LineInfo, Spacing};
use crate::tree::{ContentTree, ElementContent, NodeId};

/// Maximum box nesting depth before layout aborts.
///
/// The content tree is acyclic by contract; this guard turns an accidental
/// cycle into an error instead of a hang.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Resolves the whole content tree against an available width.
///
/// Returns a positioned box tree whose root sits at flow origin (0, 0).
/// Non-fatal sizing problems are recorded in `diags`.
pub fn resolve_layout(
  tree: &ContentTree,
  avail_width: Fixed,
  diags: &mut Diagnostics,
) -> Result<LayoutBox> {
  let mut root = resolve_node(tree, tree.root(), avail_width, 1, diags)?;
  place(tree, &mut root, Point::ZERO);
  Ok(root)
}

/// Resolves one axis-width policy against the available extent.
///
/// Negative fixed widths come from contradictory caller constraints; they
/// clamp to zero with a warning rather than failing the run.
fn resolve_width(
  node: NodeId,
  policy: SizePolicy,
  avail: Fixed,
  diags: &mut Diagnostics,
) -> Fixed {
  match policy {
    SizePolicy::Fixed(w) => {
      if w.is_negative() {
        diags.warn(LayoutWarning::ConstraintClamped { node, requested: w });
        Fixed::ZERO
      } else {
        w
      }
    }
    SizePolicy::Percent(p) => avail.mul_ratio(p as i64, 10_000),
    // Content and fill both take the full extent they were offered; rows
    // shrink that offer to the child's share before recursing.
    SizePolicy::Content | SizePolicy::Fill { .. } => avail.clamp_non_negative(),
  }
}

/// Applies a height policy to a measured content height.
///
/// Percent and fill heights resolve to the content height: the flow has no
/// fixed vertical extent to take a percentage of.
fn resolve_height(
  node: NodeId,
  style: &ResolvedStyle,
  content_height: Fixed,
  diags: &mut Diagnostics,
) -> Fixed {
  match style.height {
    SizePolicy::Fixed(h) => {
      let h = if h.is_negative() {
        diags.warn(LayoutWarning::ConstraintClamped { node, requested: h });
        Fixed::ZERO
      } else {
        h
      };
      if style.dynamic_height {
        h.max(content_height)
      } else {
        h
      }
    }
    SizePolicy::Percent(_) | SizePolicy::Content | SizePolicy::Fill { .. } => content_height,
  }
}

fn make_box(node: NodeId, style: &ResolvedStyle, width: Fixed, height: Fixed) -> LayoutBox {
  LayoutBox {
    node,
    width_policy: style.width,
    height_policy: style.height,
    rect: Rect::from_xywh(Fixed::ZERO, Fixed::ZERO, width, height),
    baseline: height,
    children: Vec::new(),
    lines: Vec::new(),
    line_alignment: Vec::new(),
    keep_together: style.keep_together,
    repeat_on_pages: style.repeat_on_pages,
  }
}

fn resolve_node(
  tree: &ContentTree,
  node: NodeId,
  avail_width: Fixed,
  depth: usize,
  diags: &mut Diagnostics,
) -> Result<LayoutBox> {
  if depth > MAX_NESTING_DEPTH {
    return Err(
      StructuralError::NestingTooDeep {
        depth,
        limit: MAX_NESTING_DEPTH,
      }
      .into(),
    );
  }
  let element = tree
    .get(node)
    .ok_or(StructuralError::DanglingNode { node })?;
  let style = &element.style;
  let width = resolve_width(node, style.width, avail_width, diags);
  let content_width = (width - style.padding.horizontal()).clamp_non_negative();

  match &element.content {
    ElementContent::Band => {
      let mut children = Vec::with_capacity(element.children.len());
      let mut content_height = Fixed::ZERO;
      for &child in &element.children {
        let child_box = resolve_node(tree, child, content_width, depth + 1, diags)?;
        content_height += child_box.height();
        children.push(child_box);
      }
      let height = resolve_height(node, style, content_height + style.padding.vertical(), diags);
      let mut bx = make_box(node, style, width, height);
      bx.baseline = children
        .first()
        .map(|c| style.padding.top + c.baseline)
        .unwrap_or(height);
      bx.children = children;
      Ok(bx)
    }

    ElementContent::Row => {
      let slots = row_slots(tree, node, element, content_width, diags)?;
      let mut children = Vec::with_capacity(element.children.len());
      let mut content_height = Fixed::ZERO;
      for (&child, slot) in element.children.iter().zip(slots) {
        let child_box = resolve_node(tree, child, slot, depth + 1, diags)?;
        content_height = content_height.max(child_box.height());
        children.push(child_box);
      }
      let height = resolve_height(node, style, content_height + style.padding.vertical(), diags);
      let mut bx = make_box(node, style, width, height);
      bx.baseline = children
        .first()
        .map(|c| style.padding.top + c.baseline)
        .unwrap_or(height);
      bx.children = children;
      Ok(bx)
    }

    ElementContent::Text { value, font } => {
      let run = build_run(value, font.as_ref(), style.lang.as_deref(), diags);
      let mut lines: Vec<LineInfo> = break_lines(&run, content_width, style.hyphenate).collect();
      // One warning per leaf is enough; the widest offender names the problem.
      if let Some(worst) = lines
        .iter()
        .filter(|l| l.forced)
        .max_by_key(|l| l.width.subunits())
      {
        diags.warn(LayoutWarning::ForcedLineBreak {
          max_width: content_width,
          token_width: worst.width,
        });
      }
      let alignment = align_lines(&run, &mut lines, style.align, content_width);
      let content_height =
        style.line_height * (lines.len() as i64) + style.padding.vertical();
      let height = resolve_height(node, style, content_height, diags);
      let mut bx = make_box(node, style, width, height);
      bx.baseline = style.padding.top + font.baseline();
      bx.lines = lines;
      bx.line_alignment = alignment;
      Ok(bx)
    }

    ElementContent::Shape { .. } => {
      let height = resolve_height(node, style, style.padding.vertical(), diags);
      Ok(make_box(node, style, width, height))
    }

    ElementContent::Image { natural } => {
      let (width, height) = resolve_image(node, style, *natural, width, avail_width, diags);
      Ok(make_box(node, style, width, height))
    }
  }
}

/// Image sizing, including the bounded aspect-ratio re-entry.
///
/// When one axis is fixed and the other is content-sized under
/// `keep_aspect_ratio`, the free axis is derived from the natural size. The
/// derivation runs at most once per axis, so the width and height passes
/// cannot ping-pong.
fn resolve_image(
  node: NodeId,
  style: &ResolvedStyle,
  natural: Size,
  resolved_width: Fixed,
  avail_width: Fixed,
  diags: &mut Diagnostics,
) -> (Fixed, Fixed) {
  let width_is_natural = matches!(style.width, SizePolicy::Content);
  let mut width = if width_is_natural {
    natural.width.min(avail_width.clamp_non_negative())
  } else {
    resolved_width
  };

  let natural_height = match style.height {
    SizePolicy::Fixed(_) => Fixed::ZERO, // unused below
    _ => {
      if style.keep_aspect_ratio && natural.width > Fixed::ZERO {
        width.mul_ratio(natural.height.subunits(), natural.width.subunits())
      } else {
        natural.height
      }
    }
  };
  let mut height = resolve_height(node, style, natural_height, diags);

  // Height fixed, width free: derive width from the ratio instead.
  if style.keep_aspect_ratio
    && width_is_natural
    && matches!(style.height, SizePolicy::Fixed(_))
    && natural.height > Fixed::ZERO
  {
    width = height
      .mul_ratio(natural.width.subunits(), natural.height.subunits())
      .min(avail_width.clamp_non_negative());
  }

  if height.is_negative() {
    height = Fixed::ZERO;
  }
  (width, height)
}

/// Applies horizontal alignment to a text leaf's broken lines.
///
/// Center and right alignment indent each line within the content width.
/// Justification stretches a line's spacing slots toward the full width,
/// recording the per-glyph extras and folding the trailing glyph's share
/// into its spacing budget. The final line, forced lines and lines ending
/// in an explicit break keep their natural width.
fn align_lines(
  run: &GlyphRun,
  lines: &mut [LineInfo],
  align: HAlign,
  content_width: Fixed,
) -> Vec<LineAlignment> {
  let count = lines.len();
  lines
    .iter_mut()
    .enumerate()
    .map(|(i, line)| match align {
      HAlign::Left => LineAlignment::default(),
      HAlign::Center | HAlign::Right => {
        let slack = (content_width - line.width).clamp_non_negative();
        let indent = if align == HAlign::Center {
          slack.mul_ratio(1, 2)
        } else {
          slack
        };
        LineAlignment {
          indent,
          stretch: Vec::new(),
        }
      }
      HAlign::Justify => {
        let ends_hard = line.end > line.start
          && run.glyphs()[line.end - 1].break_weight() == BreakWeight::Mandatory;
        if i + 1 == count || line.forced || ends_hard {
          return LineAlignment::default();
        }
        let stretch = justify_line(run, line, content_width);
        let added: Fixed = stretch.iter().copied().sum();
        line.width += added;
        if let Some(&tail) = stretch.last() {
          if tail > Fixed::ZERO {
            let s = line.trailing_spacing;
            line.trailing_spacing = Spacing::new(s.min, s.optimal + tail, s.max);
          }
        }
        LineAlignment {
          indent: Fixed::ZERO,
          stretch,
        }
      }
    })
    .collect()
}

/// Computes the width offered to each child of a row.
///
/// Fixed and percent children claim their widths first; fill and content
/// children split what remains proportionally to their fill weights (content
/// counts as weight one). The last flexible child absorbs rounding leftovers
/// so the shares always sum exactly to the remainder.
fn row_slots(
  tree: &ContentTree,
  node: NodeId,
  element: &crate::tree::Element,
  content_width: Fixed,
  diags: &mut Diagnostics,
) -> Result<Vec<Fixed>> {
  let mut slots = vec![Fixed::ZERO; element.children.len()];
  let mut claimed = Fixed::ZERO;
  let mut flexible: Vec<(usize, i64)> = Vec::new();

  for (i, &child) in element.children.iter().enumerate() {
    let child_el = tree
      .get(child)
      .ok_or(StructuralError::DanglingNode { node: child })?;
    match child_el.style.width {
      SizePolicy::Fixed(_) | SizePolicy::Percent(_) => {
        let w = resolve_width(child, child_el.style.width, content_width, diags);
        slots[i] = w;
        claimed += w;
      }
      SizePolicy::Fill { weight } => {
        flexible.push((i, (weight.max(1)) as i64));
      }
      SizePolicy::Content => {
        flexible.push((i, 1));
      }
    }
  }

  if claimed > content_width && !element.children.is_empty() {
    diags.warn(LayoutWarning::ConstraintClamped {
      node,
      requested: content_width - claimed,
    });
  }

  let remaining = (content_width - claimed).clamp_non_negative();
  let total_weight: i64 = flexible.iter().map(|&(_, w)| w).sum();
  let mut distributed = Fixed::ZERO;
  let last = flexible.len().saturating_sub(1);
  for (k, &(i, w)) in flexible.iter().enumerate() {
    let share = if k == last {
      remaining - distributed
    } else {
      remaining.mul_ratio(w, total_weight)
    };
    slots[i] = share.clamp_non_negative();
    distributed += slots[i];
  }

  Ok(slots)
}

/// Assigns absolute flow positions to a resolved box tree.
fn place(tree: &ContentTree, bx: &mut LayoutBox, origin: Point) {
  bx.rect.origin = origin;
  let Some(element) = tree.get(bx.node) else {
    return;
  };
  let inner = Point::new(
    origin.x + element.style.padding.left,
    origin.y + element.style.padding.top,
  );
  match element.content {
    ElementContent::Band => {
      let mut y = inner.y;
      for child in &mut bx.children {
        place(tree, child, Point::new(inner.x, y));
        y += child.height();
      }
    }
    ElementContent::Row => {
      let mut x = inner.x;
      for child in &mut bx.children {
        place(tree, child, Point::new(x, inner.y));
        x += child.width();
      }
    }
    _ => {}
  }
}
