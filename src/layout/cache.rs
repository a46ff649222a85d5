//! Box-tree caching for interactive (design-time) hosts
//!
//! Re-laying out a whole report on every keystroke is wasteful when only one
//! band changed. [`LayoutCache`] memoizes resolved subtrees keyed by content
//! node, validated against the node's change version and the width the
//! subtree was resolved for. [`ContentTree::touch`] bumps versions up the
//! ancestor chain, so any edit below a cached node makes its entry stale
//! without the cache observing the edit itself.
//!
//! Cached layouts are handed out as `Arc<LayoutBox>`: replacing an entry
//! swaps the pointer while earlier consumers keep reading the layout they
//! were given. Each entry also remembers the warnings its resolve produced;
//! a hit replays them into the caller's collector so a cached run reports
//! the same degradations a fresh one would.

use crate::error::Diagnostics;
use crate::geometry::Fixed;
use crate::layout::box_tree::LayoutBox;
use crate::tree::{ContentTree, NodeId};
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct CacheEntry {
  version: u64,
  avail_width: Fixed,
  layout: Arc<LayoutBox>,
  diags: Diagnostics,
}

/// Memoized box trees keyed by content node
///
/// # Examples
///
/// ```
/// use reportflow::error::Diagnostics;
/// use reportflow::layout::{resolve_layout, LayoutCache};
/// use reportflow::style::ResolvedStyle;
/// use reportflow::tree::{ContentTree, ElementContent};
/// use reportflow::Fixed;
///
/// let tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
/// let mut cache = LayoutCache::new();
/// let mut diags = Diagnostics::new();
///
/// let width = Fixed::from_pts(500);
/// let layout = resolve_layout(&tree, width, &mut diags).unwrap();
/// let stored = cache.insert(&tree, tree.root(), width, layout, &diags);
/// assert!(cache.get(&tree, tree.root(), width, &mut diags).is_some());
/// assert_eq!(stored.width(), width);
/// ```
#[derive(Debug, Default)]
pub struct LayoutCache {
  entries: FxHashMap<NodeId, CacheEntry>,
}

impl LayoutCache {
  /// Creates an empty cache.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the cached layout for `node` if it is still valid.
  ///
  /// An entry is valid only when the node's change version and the available
  /// width both match what the entry was resolved under. On a hit the
  /// warnings recorded by the original resolve are replayed into `diags`.
  pub fn get(
    &self,
    tree: &ContentTree,
    node: NodeId,
    avail_width: Fixed,
    diags: &mut Diagnostics,
  ) -> Option<Arc<LayoutBox>> {
    let entry = self.entries.get(&node)?;
    if entry.version == tree.version(node) && entry.avail_width == avail_width {
      diags.absorb(entry.diags.clone());
      Some(Arc::clone(&entry.layout))
    } else {
      None
    }
  }

  /// Stores a freshly resolved layout for `node`, replacing any stale entry.
  ///
  /// `diags` holds the warnings the resolve produced; they are kept with the
  /// entry and replayed on every hit. Returns the shared handle; clones
  /// handed out for the previous entry remain usable until their holders
  /// drop them.
  pub fn insert(
    &mut self,
    tree: &ContentTree,
    node: NodeId,
    avail_width: Fixed,
    layout: LayoutBox,
    diags: &Diagnostics,
  ) -> Arc<LayoutBox> {
    let layout = Arc::new(layout);
    self.entries.insert(
      node,
      CacheEntry {
        version: tree.version(node),
        avail_width,
        layout: Arc::clone(&layout),
        diags: diags.clone(),
      },
    );
    layout
  }

  /// Drops the entry for one node.
  pub fn invalidate(&mut self, node: NodeId) {
    self.entries.remove(&node);
  }

  /// Drops all entries.
  pub fn clear(&mut self) {
    self.entries.clear();
  }

  /// Number of cached entries, valid or stale.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns true if the cache holds no entries.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
