//! The content tree: the caller-owned input to layout
//!
//! A report document is a tree of elements — bands stacking vertically, rows
//! laying children out horizontally, and leaves (text, shapes, images). The
//! engine only reads this tree; every layout artifact it derives (glyph
//! runs, box trees, page segments) is disposable and holds at most a
//! [`NodeId`] handle back into it, never an owning reference.
//!
//! Element kinds are a tagged variant ([`ElementContent`]) consumed by a
//! single dispatch in the box layout resolver, rather than a type hierarchy.
//!
//! Each node carries a monotonic change version. [`ContentTree::touch`]
//! bumps a node and its ancestor chain, which is what design-time box-tree
//! caching keys on.

use crate::geometry::Size;
use crate::style::ResolvedStyle;
use crate::text::FontMetrics;
use std::sync::Arc;

/// Handle to a node in a [`ContentTree`]
pub type NodeId = usize;

/// Shape kinds for graphic leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
  /// Filled or outlined rectangle
  Rectangle,
  /// Horizontal rule
  HorizontalLine,
  /// Vertical rule
  VerticalLine,
  /// Ellipse inscribed in the element's box
  Ellipse,
}

/// Kind-specific payload of a content element
#[derive(Debug, Clone)]
pub enum ElementContent {
  /// Vertical flow container; height is the sum of child heights.
  Band,

  /// Horizontal container; children share the width (fill weights split the
  /// remainder) and height is the max of child heights.
  Row,

  /// Text leaf. `value` is the final computed string — data bindings are
  /// already evaluated by the expression layer before layout begins.
  Text {
    /// Resolved text content
    value: String,
    /// Resolved font metrics for the span
    font: Arc<dyn FontMetrics>,
  },

  /// Graphic leaf sized purely by style.
  Shape {
    /// Which shape to draw
    kind: ShapeKind,
  },

  /// Replaced leaf with a natural size; participates in keep-aspect-ratio.
  Image {
    /// Natural (intrinsic) size of the image
    natural: Size,
  },
}

impl ElementContent {
  /// Returns true for kinds that can hold children.
  pub fn is_container(&self) -> bool {
    matches!(self, ElementContent::Band | ElementContent::Row)
  }
}

/// One node of the content tree
#[derive(Debug, Clone)]
pub struct Element {
  /// Kind-specific payload
  pub content: ElementContent,
  /// Final numeric style properties
  pub style: ResolvedStyle,
  /// Child node handles, in document order
  pub children: Vec<NodeId>,
  /// Parent handle (`None` for the root)
  pub parent: Option<NodeId>,
  /// Monotonic change version for cache keying
  pub version: u64,
}

/// Arena-allocated content tree
///
/// Nodes are stored in a flat vector and addressed by [`NodeId`]; the tree
/// shape lives in the `children`/`parent` links. The arena never removes
/// nodes, so handles stay valid for the life of the tree.
///
/// # Examples
///
/// ```
/// use reportflow::tree::{ContentTree, ElementContent};
/// use reportflow::style::ResolvedStyle;
///
/// let mut tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
/// let band = tree.add_child(
///   tree.root(),
///   ElementContent::Band,
///   ResolvedStyle::default(),
/// );
/// assert_eq!(tree.get(band).unwrap().parent, Some(tree.root()));
/// ```
#[derive(Debug, Clone)]
pub struct ContentTree {
  nodes: Vec<Element>,
  root: NodeId,
}

impl ContentTree {
  /// Creates a tree containing only a root element.
  pub fn new(content: ElementContent, style: ResolvedStyle) -> Self {
    Self {
      nodes: vec![Element {
        content,
        style,
        children: Vec::new(),
        parent: None,
        version: 0,
      }],
      root: 0,
    }
  }

  /// Handle of the root element.
  pub fn root(&self) -> NodeId {
    self.root
  }

  /// Number of nodes in the tree.
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// Returns true if the tree holds only the root.
  pub fn is_empty(&self) -> bool {
    self.nodes.len() <= 1
  }

  /// Looks up a node by handle.
  pub fn get(&self, id: NodeId) -> Option<&Element> {
    self.nodes.get(id)
  }

  /// Appends a child element under `parent` and returns its handle.
  ///
  /// # Panics
  ///
  /// Panics if `parent` is not a valid handle; tree construction is caller
  /// code, not layout-time input validation.
  pub fn add_child(
    &mut self,
    parent: NodeId,
    content: ElementContent,
    style: ResolvedStyle,
  ) -> NodeId {
    assert!(parent < self.nodes.len(), "invalid parent handle");
    let id = self.nodes.len();
    self.nodes.push(Element {
      content,
      style,
      children: Vec::new(),
      parent: Some(parent),
      version: 0,
    });
    self.nodes[parent].children.push(id);
    // A structural change invalidates cached layout above the new child.
    self.touch(parent);
    id
  }

  /// Replaces a node's content and bumps versions up the ancestor chain.
  pub fn set_content(&mut self, id: NodeId, content: ElementContent) {
    if let Some(node) = self.nodes.get_mut(id) {
      node.content = content;
      self.touch(id);
    }
  }

  /// Replaces a node's style and bumps versions up the ancestor chain.
  pub fn set_style(&mut self, id: NodeId, style: ResolvedStyle) {
    if let Some(node) = self.nodes.get_mut(id) {
      node.style = style;
      self.touch(id);
    }
  }

  /// Bumps the change version of `id` and every ancestor.
  ///
  /// Versions are monotonic per node; a cached box tree for any ancestor is
  /// stale after this call.
  pub fn touch(&mut self, id: NodeId) {
    let mut cursor = Some(id);
    while let Some(current) = cursor {
      let Some(node) = self.nodes.get_mut(current) else {
        break;
      };
      node.version += 1;
      cursor = node.parent;
    }
  }

  /// Current change version of a node.
  pub fn version(&self, id: NodeId) -> u64 {
    self.nodes.get(id).map(|n| n.version).unwrap_or(0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn band_tree() -> ContentTree {
    ContentTree::new(ElementContent::Band, ResolvedStyle::default())
  }

  #[test]
  fn test_new_tree_has_root() {
    let tree = band_tree();
    assert_eq!(tree.root(), 0);
    assert_eq!(tree.len(), 1);
    assert!(tree.get(0).is_some());
    assert!(tree.get(1).is_none());
  }

  #[test]
  fn test_add_child_links_both_ways() {
    let mut tree = band_tree();
    let child = tree.add_child(tree.root(), ElementContent::Band, ResolvedStyle::default());

    assert_eq!(tree.get(child).unwrap().parent, Some(tree.root()));
    assert_eq!(tree.get(tree.root()).unwrap().children, vec![child]);
  }

  #[test]
  fn test_touch_bumps_ancestor_chain() {
    let mut tree = band_tree();
    let band = tree.add_child(tree.root(), ElementContent::Band, ResolvedStyle::default());
    let leaf = tree.add_child(
      band,
      ElementContent::Shape {
        kind: ShapeKind::Rectangle,
      },
      ResolvedStyle::default(),
    );

    let root_before = tree.version(tree.root());
    let band_before = tree.version(band);
    let leaf_before = tree.version(leaf);

    tree.touch(leaf);

    assert_eq!(tree.version(leaf), leaf_before + 1);
    assert_eq!(tree.version(band), band_before + 1);
    assert_eq!(tree.version(tree.root()), root_before + 1);
  }

  #[test]
  fn test_touch_is_monotonic() {
    let mut tree = band_tree();
    let before = tree.version(tree.root());
    tree.touch(tree.root());
    tree.touch(tree.root());
    assert_eq!(tree.version(tree.root()), before + 2);
  }

  #[test]
  fn test_set_style_touches_node() {
    let mut tree = band_tree();
    let band = tree.add_child(tree.root(), ElementContent::Band, ResolvedStyle::default());

    let before = tree.version(band);
    tree.set_style(
      band,
      ResolvedStyle::sized(crate::Fixed::from_pts(10), crate::Fixed::from_pts(10)),
    );
    assert!(tree.version(band) > before);
  }

  #[test]
  fn test_container_predicate() {
    assert!(ElementContent::Band.is_container());
    assert!(ElementContent::Row.is_container());
    assert!(!ElementContent::Shape {
      kind: ShapeKind::Ellipse
    }
    .is_container());
  }
}
