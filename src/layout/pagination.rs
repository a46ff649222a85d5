//! Page breaking over a resolved box tree
//!
//! [`Paginator`] consumes a positioned [`LayoutBox`] tree and slices the
//! vertical flow into [`PageSegment`]s of a fixed usable height. Content is
//! never reflowed across pages: breaking only ever pushes material downward
//! (deferral) or clips it at a page edge, so the concatenated segments cover
//! the flow exactly once.
//!
//! # Flow units
//!
//! The box tree is flattened into atomic flow units before breaking starts.
//! A unit is either a single leaf box or the outermost subtree marked
//! keep-together (or repeat-on-pages); nested keep-together markers inside
//! such a subtree are subsumed by it. Units are what the breaker defers or
//! splits; the leaves inside them are what segments ultimately carry.
//!
//! # Breaking
//!
//! The paginator walks units in document order, accumulating onto the
//! current page. A unit that would cross the page edge becomes a break
//! candidate: if it can fit a fresh page whole it is deferred (shifted down
//! to the next page's content top, along with everything after it); a unit
//! that cannot fit any page is placed anyway and clipped across pages, with
//! a warning when a keep-together request had to be violated. A repeating
//! header left stranded as the last thing on a page travels with its
//! deferred group instead of dangling, and a header stack tall enough to
//! fill a page by itself sheds its innermost headers so content below can
//! still advance.
//!
//! Pages are produced lazily by [`Paginator::next_page`]; a cooperative
//! cancel flag checked between pages lets interactive hosts abandon long
//! documents.

use crate::error::{Diagnostics, LayoutWarning};
use crate::geometry::{Fixed, Point, Rect};
use crate::layout::box_tree::LayoutBox;
use crate::tree::{ContentTree, NodeId};
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One visible element on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedElement {
  /// Originating content node
  pub node: NodeId,
  /// Full element bounds in page coordinates; may extend past the page for
  /// elements split across pages
  pub rect: Rect,
  /// Visible portion of `rect` on this page
  pub clip: Rect,
  /// True for a header re-emitted by repeat-on-pages rather than placed by
  /// the flow itself
  pub repeated: bool,
}

/// One page worth of laid-out content
#[derive(Debug, Clone, PartialEq)]
pub struct PageSegment {
  /// Zero-based page number
  pub index: usize,
  /// Everything visible on the page, in document order (repeated headers
  /// first)
  pub elements: Vec<PlacedElement>,
  /// Flow offset consumed once this page is done; the next page's content
  /// resumes here
  pub carry: Fixed,
}

/// Observable phase of the paginator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
  /// Placing units onto the current page
  Accumulating,
  /// A unit crossed the page edge and a break decision is being made
  AtBreakCandidate,
  /// Building the segment for a finished page
  Emitting,
  /// All content emitted (or the run was cancelled)
  Done,
}

/// A leaf box flattened out of the layout tree, in original flow coordinates.
#[derive(Debug, Clone, Copy)]
struct FlowLeaf {
  node: NodeId,
  rect: Rect,
}

/// An atomic breaking unit: one leaf, or an outermost keep/repeat subtree.
#[derive(Debug, Clone)]
struct FlowUnit {
  leaves: Range<usize>,
  node: NodeId,
  top: Fixed,
  height: Fixed,
  keep: bool,
  repeat: bool,
  /// Set once the unit has been pushed to a following page; a second
  /// overflow splits instead of deferring again, so breaking always
  /// terminates.
  deferred: bool,
}

/// An active repeating header, remembered for re-emission.
#[derive(Debug, Clone)]
struct HeaderRecord {
  /// The header element itself
  node: NodeId,
  /// The header stays active while placement remains inside this subtree.
  scope: NodeId,
  /// Header leaves with y relative to the header's top
  leaves: Vec<FlowLeaf>,
  height: Fixed,
}

fn collect_leaves(bx: &LayoutBox, out: &mut Vec<FlowLeaf>) {
  if bx.is_leaf() {
    out.push(FlowLeaf {
      node: bx.node,
      rect: bx.rect,
    });
    return;
  }
  for child in &bx.children {
    collect_leaves(child, out);
  }
}

fn collect_units(bx: &LayoutBox, leaves: &mut Vec<FlowLeaf>, units: &mut Vec<FlowUnit>) {
  let atomic = bx.keep_together || bx.repeat_on_pages;
  if atomic || bx.is_leaf() {
    let start = leaves.len();
    collect_leaves(bx, leaves);
    if leaves.len() == start && bx.rect.height() == Fixed::ZERO {
      return;
    }
    units.push(FlowUnit {
      leaves: start..leaves.len(),
      node: bx.node,
      top: bx.rect.y(),
      height: bx.rect.height(),
      keep: bx.keep_together,
      repeat: bx.repeat_on_pages,
      deferred: false,
    });
    return;
  }
  for child in &bx.children {
    collect_units(child, leaves, units);
  }
}

fn is_descendant(tree: &ContentTree, mut node: NodeId, ancestor: NodeId) -> bool {
  loop {
    if node == ancestor {
      return true;
    }
    match tree.get(node).and_then(|e| e.parent) {
      Some(parent) => node = parent,
      None => return false,
    }
  }
}

/// Lazy page producer over a resolved layout
///
/// Also an [`Iterator`] over [`PageSegment`]s for callers that want the
/// whole document.
#[derive(Debug)]
pub struct Paginator<'a> {
  tree: &'a ContentTree,
  usable: Fixed,
  leaves: Vec<FlowLeaf>,
  units: Vec<FlowUnit>,
  next_unit: usize,
  /// Accumulated downward displacement applied to everything not yet placed
  shift: Fixed,
  /// Flow offset where the next page begins
  page_start: Fixed,
  /// Leaves placed so far, at their final (shifted) flow positions
  placed: Vec<PlacedLeaf>,
  /// Bottom of the lowest placed unit; content past the current page edge
  /// means a split unit is still being clipped out
  flow_bottom: Fixed,
  active_headers: Vec<HeaderRecord>,
  /// Single-level undo for the stranded-header rule
  prev_placed_len: usize,
  prev_flow_bottom: Fixed,
  page_index: usize,
  state: PaginatorState,
  cancel: Option<Arc<AtomicBool>>,
  diags: Diagnostics,
}

#[derive(Debug, Clone, Copy)]
struct PlacedLeaf {
  node: NodeId,
  rect: Rect,
}

impl<'a> Paginator<'a> {
  /// Creates a paginator over a resolved layout.
  ///
  /// `usable_height` is the content height of one page (physical height
  /// minus margins, headers and footers the caller reserves). Warnings
  /// recorded during pagination are appended to `diags`, which travels with
  /// the paginator and is recoverable via [`Paginator::into_diagnostics`].
  pub fn new(
    tree: &'a ContentTree,
    layout: &LayoutBox,
    usable_height: Fixed,
    diags: Diagnostics,
  ) -> Self {
    let mut leaves = Vec::new();
    let mut units = Vec::new();
    collect_units(layout, &mut leaves, &mut units);
    Self {
      tree,
      // A page must consume at least one subunit per step or breaking could
      // never terminate.
      usable: usable_height.max(Fixed::from_subunits(1)),
      leaves,
      units,
      next_unit: 0,
      shift: Fixed::ZERO,
      page_start: Fixed::ZERO,
      placed: Vec::new(),
      flow_bottom: Fixed::ZERO,
      active_headers: Vec::new(),
      prev_placed_len: 0,
      prev_flow_bottom: Fixed::ZERO,
      page_index: 0,
      state: PaginatorState::Accumulating,
      cancel: None,
      diags,
    }
  }

  /// Installs a cooperative cancel flag, checked between pages.
  pub fn set_cancel(&mut self, flag: Arc<AtomicBool>) {
    self.cancel = Some(flag);
  }

  /// Current phase of the paginator.
  pub fn state(&self) -> PaginatorState {
    self.state
  }

  /// Returns true once every page has been emitted (or the run was
  /// cancelled).
  pub fn is_done(&self) -> bool {
    self.state == PaginatorState::Done
  }

  /// Number of pages emitted so far.
  pub fn pages_emitted(&self) -> usize {
    self.page_index
  }

  /// Warnings recorded during layout and pagination so far.
  pub fn diagnostics(&self) -> &Diagnostics {
    &self.diags
  }

  /// Consumes the paginator and returns the accumulated diagnostics.
  pub fn into_diagnostics(self) -> Diagnostics {
    self.diags
  }

  fn place_unit(&mut self, idx: usize) {
    self.prev_placed_len = self.placed.len();
    self.prev_flow_bottom = self.flow_bottom;
    let unit = &self.units[idx];
    let offset = Point::new(Fixed::ZERO, self.shift);
    for leaf in &self.leaves[unit.leaves.clone()] {
      self.placed.push(PlacedLeaf {
        node: leaf.node,
        rect: leaf.rect.translate(offset),
      });
    }
    self.flow_bottom = self.flow_bottom.max(unit.top + self.shift + unit.height);
  }

  /// Undoes the most recent [`Paginator::place_unit`].
  fn unplace_unit(&mut self, idx: usize) {
    self.placed.truncate(self.prev_placed_len);
    self.flow_bottom = self.prev_flow_bottom;
    if self.units[idx].repeat {
      self.active_headers.pop();
    }
  }

  fn register_header(&mut self, idx: usize) {
    let unit = &self.units[idx];
    let Some(scope) = self.tree.get(unit.node).and_then(|e| e.parent) else {
      return;
    };
    let rel = Point::new(Fixed::ZERO, -unit.top);
    let leaves = self.leaves[unit.leaves.clone()]
      .iter()
      .map(|l| FlowLeaf {
        node: l.node,
        rect: l.rect.translate(rel),
      })
      .collect();
    self.active_headers.push(HeaderRecord {
      node: unit.node,
      scope,
      leaves,
      height: unit.height,
    });
  }

  /// Produces the next page, or `None` once the document is exhausted.
  pub fn next_page(&mut self) -> Option<PageSegment> {
    if self.state == PaginatorState::Done {
      return None;
    }
    if let Some(flag) = &self.cancel {
      if flag.load(Ordering::Relaxed) {
        self.state = PaginatorState::Done;
        return None;
      }
    }

    let v_start = self.page_start;
    let v_end = v_start + self.usable;

    // Drop headers whose group the flow has already left.
    match self.units.get(self.next_unit) {
      Some(unit) => {
        let node = unit.node;
        let tree = self.tree;
        self
          .active_headers
          .retain(|h| is_descendant(tree, node, h.scope));
      }
      None => self.active_headers.clear(),
    }

    // A split unit still hanging past the page top owns that space; headers
    // are suppressed until the flow is caught up.
    let continuing = self.flow_bottom > v_start;
    let mut elements: Vec<PlacedElement> = Vec::new();
    let mut header_h = Fixed::ZERO;
    if self.page_index > 0 && !continuing {
      // Headers must always leave room for flow content below them, or the
      // flow could never advance past this page. Innermost headers are
      // dropped first; a dropped header stops repeating for good.
      let mut total: Fixed = self.active_headers.iter().map(|h| h.height).sum();
      while total >= self.usable {
        let Some(dropped) = self.active_headers.pop() else {
          break;
        };
        total -= dropped.height;
        self.diags.warn(LayoutWarning::RepeatedHeaderDropped {
          node: dropped.node,
          height: dropped.height,
          usable: self.usable,
        });
      }
      for header in &self.active_headers {
        for leaf in &header.leaves {
          let rect = leaf.rect.translate(Point::new(Fixed::ZERO, header_h));
          elements.push(PlacedElement {
            node: leaf.node,
            rect,
            clip: rect,
            repeated: true,
          });
        }
        header_h += header.height;
      }
    }

    let content_start = (v_start + header_h).max(self.flow_bottom);
    self.state = PaginatorState::Accumulating;
    let mut first_on_page = true;
    let mut last_placed: Option<usize> = None;

    if content_start < v_end {
      while self.next_unit < self.units.len() {
        let idx = self.next_unit;
        let (u_top, u_height, u_keep, u_repeat, u_node) = {
          let u = &self.units[idx];
          (u.top, u.height, u.keep, u.repeat, u.node)
        };

        // The first unit of a page is pulled down to the content top;
        // everything after it keeps its relative position.
        let mut top = u_top + self.shift;
        if first_on_page && top < content_start {
          self.shift += content_start - top;
          top = content_start;
        }
        let bottom = top + u_height;

        if bottom <= v_end {
          self.place_unit(idx);
          if u_repeat {
            self.register_header(idx);
          }
          last_placed = Some(idx);
          self.next_unit += 1;
          first_on_page = false;
          continue;
        }

        self.state = PaginatorState::AtBreakCandidate;
        let at_clean_page_top = first_on_page && top == content_start && !continuing;
        if !self.units[idx].deferred && !at_clean_page_top {
          self.units[idx].deferred = true;
          // A repeating header must not be the last thing on a page; it
          // travels with the group it introduces.
          if let Some(h_idx) = last_placed.filter(|&i| self.units[i].repeat) {
            self.unplace_unit(h_idx);
            self.units[h_idx].deferred = true;
            self.next_unit = h_idx;
          }
          break;
        }

        // No page can hold the unit whole: place it here and clip it across
        // as many pages as it needs.
        if u_keep {
          self.diags.warn(LayoutWarning::KeepTogetherOverflow {
            node: u_node,
            height: u_height,
            usable: self.usable,
          });
        }
        self.place_unit(idx);
        if u_repeat {
          self.register_header(idx);
        }
        self.next_unit += 1;
        break;
      }
    }

    self.state = PaginatorState::Emitting;
    for leaf in &self.placed {
      let top = leaf.rect.y();
      let bottom = leaf.rect.max_y();
      let visible = if leaf.rect.height() == Fixed::ZERO {
        top >= v_start && top < v_end
      } else {
        top < v_end && bottom > v_start
      };
      if !visible {
        continue;
      }
      let clip_top = top.max(v_start);
      let clip_bottom = bottom.min(v_end);
      elements.push(PlacedElement {
        node: leaf.node,
        rect: leaf.rect.translate(Point::new(Fixed::ZERO, -v_start)),
        clip: Rect::from_xywh(
          leaf.rect.x(),
          clip_top - v_start,
          leaf.rect.width(),
          clip_bottom - clip_top,
        ),
        repeated: false,
      });
    }

    self.page_start = v_end;
    self.page_index += 1;
    let done = self.next_unit >= self.units.len() && self.flow_bottom <= v_end;
    self.state = if done {
      PaginatorState::Done
    } else {
      PaginatorState::Accumulating
    };

    Some(PageSegment {
      index: self.page_index - 1,
      elements,
      carry: v_end,
    })
  }
}

impl Iterator for Paginator<'_> {
  type Item = PageSegment;

  fn next(&mut self) -> Option<PageSegment> {
    self.next_page()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Diagnostics;
  use crate::layout::resolver::resolve_layout;
  use crate::style::{ResolvedStyle, SizePolicy};
  use crate::tree::{ContentTree, ElementContent, ShapeKind};

  fn shape_style(height: i64) -> ResolvedStyle {
    ResolvedStyle {
      height: SizePolicy::Fixed(Fixed::from_pts(height)),
      ..ResolvedStyle::default()
    }
  }

  fn add_shape(tree: &mut ContentTree, parent: NodeId, style: ResolvedStyle) -> NodeId {
    tree.add_child(
      parent,
      ElementContent::Shape {
        kind: ShapeKind::Rectangle,
      },
      style,
    )
  }

  fn band_of(heights: &[i64]) -> ContentTree {
    let mut tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
    for &h in heights {
      let root = tree.root();
      add_shape(&mut tree, root, shape_style(h));
    }
    tree
  }

  fn paginate(tree: &ContentTree, usable: i64) -> (Vec<PageSegment>, Diagnostics) {
    let mut diags = Diagnostics::new();
    let layout = resolve_layout(tree, Fixed::from_pts(500), &mut diags).unwrap();
    let mut paginator = Paginator::new(tree, &layout, Fixed::from_pts(usable), diags);
    let mut pages = Vec::new();
    while let Some(page) = paginator.next_page() {
      pages.push(page);
    }
    assert!(paginator.is_done());
    (pages, paginator.into_diagnostics())
  }

  fn flow_ys(page: &PageSegment) -> Vec<Fixed> {
    page
      .elements
      .iter()
      .filter(|e| !e.repeated)
      .map(|e| e.rect.y())
      .collect()
  }

  #[test]
  fn test_overflowing_band_moves_to_next_page() {
    // Three 300pt bands on an 800pt page: the third crosses the edge and is
    // deferred whole to page two.
    let tree = band_of(&[300, 300, 300]);
    let (pages, diags) = paginate(&tree, 800);

    assert_eq!(pages.len(), 2);
    assert_eq!(flow_ys(&pages[0]), vec![Fixed::ZERO, Fixed::from_pts(300)]);
    assert_eq!(flow_ys(&pages[1]), vec![Fixed::ZERO]);
    assert_eq!(pages[0].carry, Fixed::from_pts(800));
    assert_eq!(pages[1].carry, Fixed::from_pts(1600));
    assert!(diags.is_clean());
  }

  #[test]
  fn test_exact_fit_single_page() {
    let tree = band_of(&[300, 300, 200]);
    let (pages, _) = paginate(&tree, 800);

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].elements.len(), 3);
  }

  #[test]
  fn test_empty_document_yields_one_empty_page() {
    let tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
    let (pages, _) = paginate(&tree, 800);

    assert_eq!(pages.len(), 1);
    assert!(pages[0].elements.is_empty());
  }

  #[test]
  fn test_keep_together_defers_whole_group() {
    // 600pt of content, then a 500pt keep-together group: the group cannot
    // fit and moves to page two intact.
    let mut tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
    let root = tree.root();
    add_shape(&mut tree, root, shape_style(600));
    let group = tree.add_child(
      tree.root(),
      ElementContent::Band,
      ResolvedStyle {
        keep_together: true,
        ..ResolvedStyle::default()
      },
    );
    add_shape(&mut tree, group, shape_style(250));
    add_shape(&mut tree, group, shape_style(250));

    let (pages, diags) = paginate(&tree, 800);

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].elements.len(), 1);
    assert_eq!(flow_ys(&pages[1]), vec![Fixed::ZERO, Fixed::from_pts(250)]);
    assert!(diags.is_clean());
  }

  #[test]
  fn test_keep_together_taller_than_page_splits_with_warning() {
    let mut tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
    let group = tree.add_child(
      tree.root(),
      ElementContent::Band,
      ResolvedStyle {
        keep_together: true,
        ..ResolvedStyle::default()
      },
    );
    add_shape(&mut tree, group, shape_style(2000));

    let (pages, diags) = paginate(&tree, 800);

    assert_eq!(pages.len(), 3);
    assert!(diags.warnings().iter().any(|w| matches!(
      w,
      LayoutWarning::KeepTogetherOverflow { node, .. } if *node == group
    )));
  }

  #[test]
  fn test_split_element_covers_flow_exactly_once() {
    // A 2000pt leaf across 800pt pages: the clips tile the element with no
    // gap and no overlap.
    let tree = band_of(&[2000]);
    let (pages, _) = paginate(&tree, 800);

    assert_eq!(pages.len(), 3);
    let mut covered = Fixed::ZERO;
    for page in &pages {
      assert_eq!(page.elements.len(), 1);
      let el = &page.elements[0];
      // The element rect slides up by exactly what earlier pages consumed.
      assert_eq!(el.rect.y() + covered, Fixed::ZERO);
      covered += el.clip.height();
    }
    assert_eq!(covered, Fixed::from_pts(2000));
  }

  #[test]
  fn test_no_element_lost_or_duplicated() {
    let tree = band_of(&[300, 500, 100, 700, 200, 650]);
    let (pages, _) = paginate(&tree, 800);

    let mut seen: Vec<NodeId> = Vec::new();
    let mut total_clip = Fixed::ZERO;
    for page in &pages {
      for el in &page.elements {
        seen.push(el.node);
        total_clip += el.clip.height();
      }
    }
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 6);
    // Deferral never splits here, so visible heights sum to the content.
    assert_eq!(
      total_clip,
      Fixed::from_pts(300 + 500 + 100 + 700 + 200 + 650)
    );
  }

  #[test]
  fn test_repeating_header_on_continuation_pages() {
    let mut tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
    let group = tree.add_child(tree.root(), ElementContent::Band, ResolvedStyle::default());
    let header = add_shape(
      &mut tree,
      group,
      ResolvedStyle {
        repeat_on_pages: true,
        ..shape_style(50)
      },
    );
    add_shape(&mut tree, group, shape_style(400));
    let second = add_shape(&mut tree, group, shape_style(400));

    let (pages, _) = paginate(&tree, 800);
    assert_eq!(pages.len(), 2);

    // Page two opens with the re-emitted header, then the deferred item
    // starts below it.
    let repeated: Vec<_> = pages[1].elements.iter().filter(|e| e.repeated).collect();
    assert_eq!(repeated.len(), 1);
    assert_eq!(repeated[0].node, header);
    assert_eq!(repeated[0].rect.y(), Fixed::ZERO);

    let flow: Vec<_> = pages[1].elements.iter().filter(|e| !e.repeated).collect();
    assert_eq!(flow.len(), 1);
    assert_eq!(flow[0].node, second);
    assert_eq!(flow[0].rect.y(), Fixed::from_pts(50));
  }

  #[test]
  fn test_header_not_repeated_after_group_ends() {
    let mut tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
    let group = tree.add_child(tree.root(), ElementContent::Band, ResolvedStyle::default());
    add_shape(
      &mut tree,
      group,
      ResolvedStyle {
        repeat_on_pages: true,
        ..shape_style(50)
      },
    );
    add_shape(&mut tree, group, shape_style(700));
    // Outside the group; the header must not follow it onto page two.
    let root = tree.root();
    add_shape(&mut tree, root, shape_style(300));

    let (pages, _) = paginate(&tree, 800);
    assert_eq!(pages.len(), 2);
    assert!(pages[1].elements.iter().all(|e| !e.repeated));
  }

  #[test]
  fn test_header_stack_taller_than_page_still_terminates() {
    // Nested group headers of 400pt and 450pt together exceed the 800pt
    // page. The innermost header is dropped with a warning so the detail
    // content below can still advance; pagination must finish.
    let mut tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
    let outer = tree.add_child(tree.root(), ElementContent::Band, ResolvedStyle::default());
    add_shape(
      &mut tree,
      outer,
      ResolvedStyle {
        repeat_on_pages: true,
        ..shape_style(400)
      },
    );
    let inner = tree.add_child(outer, ElementContent::Band, ResolvedStyle::default());
    let inner_header = add_shape(
      &mut tree,
      inner,
      ResolvedStyle {
        repeat_on_pages: true,
        ..shape_style(450)
      },
    );
    let details: Vec<NodeId> = (0..4)
      .map(|_| add_shape(&mut tree, inner, shape_style(300)))
      .collect();

    let mut diags = Diagnostics::new();
    let layout = resolve_layout(&tree, Fixed::from_pts(500), &mut diags).unwrap();
    let mut paginator = Paginator::new(&tree, &layout, Fixed::from_pts(800), diags);
    let mut pages = Vec::new();
    while let Some(page) = paginator.next_page() {
      pages.push(page);
      assert!(pages.len() <= 50, "pagination did not terminate");
    }
    assert!(paginator.is_done());

    // Every detail row made it onto some page exactly once.
    let mut placed: Vec<NodeId> = pages
      .iter()
      .flat_map(|p| p.elements.iter())
      .filter(|e| !e.repeated && details.contains(&e.node))
      .map(|e| e.node)
      .collect();
    placed.sort_unstable();
    assert_eq!(placed, details);

    let diags = paginator.into_diagnostics();
    assert!(diags.warnings().iter().any(|w| matches!(
      w,
      LayoutWarning::RepeatedHeaderDropped { node, .. } if *node == inner_header
    )));
  }

  #[test]
  fn test_stranded_header_travels_with_group() {
    let mut tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
    let root = tree.root();
    add_shape(&mut tree, root, shape_style(400));
    let group = tree.add_child(tree.root(), ElementContent::Band, ResolvedStyle::default());
    let header = add_shape(
      &mut tree,
      group,
      ResolvedStyle {
        repeat_on_pages: true,
        ..shape_style(50)
      },
    );
    let item = add_shape(&mut tree, group, shape_style(500));

    let (pages, _) = paginate(&tree, 800);
    assert_eq!(pages.len(), 2);

    // The header would fit at y=400, but its group does not; both move.
    assert_eq!(pages[0].elements.len(), 1);
    let ys: Vec<(NodeId, Fixed)> = pages[1]
      .elements
      .iter()
      .map(|e| (e.node, e.rect.y()))
      .collect();
    assert_eq!(ys, vec![(header, Fixed::ZERO), (item, Fixed::from_pts(50))]);
  }

  #[test]
  fn test_cancellation_stops_between_pages() {
    let tree = band_of(&[700, 700, 700, 700]);
    let mut diags = Diagnostics::new();
    let layout = resolve_layout(&tree, Fixed::from_pts(500), &mut diags).unwrap();
    let mut paginator = Paginator::new(&tree, &layout, Fixed::from_pts(800), diags);

    let flag = Arc::new(AtomicBool::new(false));
    paginator.set_cancel(Arc::clone(&flag));

    assert!(paginator.next_page().is_some());
    flag.store(true, Ordering::Relaxed);
    assert!(paginator.next_page().is_none());
    assert!(paginator.is_done());
    assert_eq!(paginator.pages_emitted(), 1);
  }

  #[test]
  fn test_pagination_is_deterministic() {
    let tree = band_of(&[300, 500, 100, 700, 200]);
    let (a, _) = paginate(&tree, 800);
    let (b, _) = paginate(&tree, 800);
    assert_eq!(a, b);
  }

  #[test]
  fn test_state_transitions() {
    let tree = band_of(&[700, 700]);
    let mut diags = Diagnostics::new();
    let layout = resolve_layout(&tree, Fixed::from_pts(500), &mut diags).unwrap();
    let mut paginator = Paginator::new(&tree, &layout, Fixed::from_pts(800), diags);

    assert_eq!(paginator.state(), PaginatorState::Accumulating);
    paginator.next_page();
    assert_eq!(paginator.state(), PaginatorState::Accumulating);
    paginator.next_page();
    assert_eq!(paginator.state(), PaginatorState::Done);
    assert!(paginator.next_page().is_none());
  }
}
