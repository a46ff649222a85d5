//! End-to-end layout runs over a realistic banded report.

use reportflow::engine::{LayoutConfig, LayoutEngine};
use reportflow::style::{ResolvedStyle, SizePolicy};
use reportflow::text::FontMetrics;
use reportflow::tree::{ContentTree, ElementContent, NodeId, ShapeKind};
use reportflow::{EdgeOffsets, Fixed, PageSegment, Size};
use std::sync::Arc;

/// Monospace test font, 8pt per character.
#[derive(Debug)]
struct Mono;

impl FontMetrics for Mono {
  fn advance(&self, _: char) -> Option<Fixed> {
    Some(Fixed::from_pts(8))
  }
  fn height(&self) -> Fixed {
    Fixed::from_pts(12)
  }
  fn baseline(&self) -> Fixed {
    Fixed::from_pts(9)
  }
}

fn text_style() -> ResolvedStyle {
  ResolvedStyle {
    line_height: Fixed::from_pts(14),
    ..ResolvedStyle::default()
  }
}

fn add_text(tree: &mut ContentTree, parent: NodeId, value: &str, style: ResolvedStyle) -> NodeId {
  tree.add_child(
    parent,
    ElementContent::Text {
      value: value.into(),
      font: Arc::new(Mono),
    },
    style,
  )
}

fn add_rule(tree: &mut ContentTree, parent: NodeId) -> NodeId {
  tree.add_child(
    parent,
    ElementContent::Shape {
      kind: ShapeKind::HorizontalLine,
    },
    ResolvedStyle {
      height: SizePolicy::Fixed(Fixed::from_pts(2)),
      ..ResolvedStyle::default()
    },
  )
}

/// A title band, a detail group with a repeating header and many rows, and a
/// keep-together totals band.
fn sales_report(detail_rows: usize) -> (ContentTree, NodeId) {
  let mut tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
  let root = tree.root();

  add_text(&mut tree, root, "Quarterly Sales", text_style());
  add_rule(&mut tree, root);

  let group = tree.add_child(root, ElementContent::Band, ResolvedStyle::default());
  let header = add_text(
    &mut tree,
    group,
    "Region Amount",
    ResolvedStyle {
      repeat_on_pages: true,
      ..text_style()
    },
  );
  for i in 0..detail_rows {
    let row = tree.add_child(group, ElementContent::Row, ResolvedStyle::default());
    add_text(
      &mut tree,
      row,
      &format!("Region {i}"),
      ResolvedStyle {
        width: SizePolicy::Fill { weight: 2 },
        ..text_style()
      },
    );
    add_text(
      &mut tree,
      row,
      &format!("{}", 1000 + i),
      ResolvedStyle {
        width: SizePolicy::Fill { weight: 1 },
        ..text_style()
      },
    );
  }

  let totals = tree.add_child(
    root,
    ElementContent::Band,
    ResolvedStyle {
      keep_together: true,
      ..ResolvedStyle::default()
    },
  );
  add_rule(&mut tree, totals);
  add_text(&mut tree, totals, "Grand total 128450", text_style());

  (tree, header)
}

fn run(tree: &ContentTree, usable_height: i64) -> Vec<PageSegment> {
  let engine = LayoutEngine::new(LayoutConfig::new(
    Size::new(Fixed::from_pts(400), Fixed::from_pts(usable_height)),
    EdgeOffsets::ZERO,
  ));
  engine.run(tree).unwrap().collect()
}

#[test]
fn multi_page_report_repeats_group_header() {
  // 40 detail rows at 14pt do not fit a 300pt page; every continuation page
  // inside the group reopens with the header.
  let (tree, header) = sales_report(40);
  let pages = run(&tree, 300);

  assert!(pages.len() > 2);
  for page in &pages[1..] {
    let in_group = page
      .elements
      .iter()
      .any(|e| !e.repeated && e.node != header);
    let repeated: Vec<_> = page.elements.iter().filter(|e| e.repeated).collect();
    if in_group && page.index < pages.len() - 1 {
      assert_eq!(repeated.len(), 1, "page {} missing header", page.index);
      assert_eq!(repeated[0].node, header);
      assert_eq!(repeated[0].rect.y(), Fixed::ZERO);
    }
  }
}

#[test]
fn every_detail_row_appears_exactly_once() {
  let (tree, _) = sales_report(25);
  let pages = run(&tree, 300);

  let mut flow_nodes: Vec<NodeId> = pages
    .iter()
    .flat_map(|p| p.elements.iter())
    .filter(|e| !e.repeated)
    .map(|e| e.node)
    .collect();
  let total = flow_nodes.len();
  flow_nodes.sort_unstable();
  flow_nodes.dedup();

  // No flow element is emitted twice, and none is dropped: title, rule,
  // header, 25 rows of two cells, totals rule and totals text.
  assert_eq!(flow_nodes.len(), total);
  assert_eq!(total, 3 + 25 * 2 + 2);
}

#[test]
fn totals_band_is_never_split() {
  let (tree, _) = sales_report(18);
  let pages = run(&tree, 300);

  // Both totals elements (the rule and the text, the last two nodes built)
  // land together on a single page, unclipped.
  let totals_pages: Vec<&PageSegment> = pages
    .iter()
    .filter(|p| p.elements.iter().any(|e| e.node >= tree.len() - 2))
    .collect();
  assert_eq!(totals_pages.len(), 1, "totals band split across pages");
  let totals: Vec<_> = totals_pages[0]
    .elements
    .iter()
    .filter(|e| e.node >= tree.len() - 2)
    .collect();
  assert_eq!(totals.len(), 2);
  assert!(totals.iter().all(|e| e.rect == e.clip));
}

#[test]
fn carry_offsets_form_a_contiguous_flow() {
  let (tree, _) = sales_report(30);
  let pages = run(&tree, 300);

  let usable = Fixed::from_pts(300);
  let mut expected = Fixed::ZERO;
  for page in &pages {
    expected += usable;
    assert_eq!(page.carry, expected);
  }
}

#[test]
fn pagination_round_trip_is_deterministic() {
  let (tree, _) = sales_report(33);
  let a = run(&tree, 300);
  let b = run(&tree, 300);
  assert_eq!(a, b);
}

#[test]
fn narrow_page_wraps_text_instead_of_failing() {
  let mut tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
  let root = tree.root();
  add_text(
    &mut tree,
    root,
    "an uncommonly long unbroken identifier_that_cannot_wrap_cleanly",
    text_style(),
  );

  let engine = LayoutEngine::new(LayoutConfig::new(
    Size::new(Fixed::from_pts(120), Fixed::from_pts(400)),
    EdgeOffsets::ZERO,
  ));
  let mut pages = engine.run(&tree).unwrap();
  let first = pages.next_page().unwrap();

  assert_eq!(first.elements.len(), 1);
  // The unbreakable token was force-broken and reported, not dropped.
  assert!(!pages.diagnostics().is_clean());
}
