//! The layout engine facade
//!
//! [`LayoutEngine`] ties the pipeline together: resolve the content tree
//! against the page's usable width, then hand the positioned boxes to a
//! [`Paginator`] sized to the page's usable height. The paginator it returns
//! produces pages lazily, so a caller rendering a print preview pays only
//! for the pages it asks for.

use crate::error::{Diagnostics, Result};
use crate::geometry::{EdgeOffsets, Fixed, Size};
use crate::layout::cache::LayoutCache;
use crate::layout::pagination::Paginator;
use crate::layout::resolver::resolve_layout;
use crate::tree::ContentTree;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Page geometry for a layout run
///
/// # Examples
///
/// ```
/// use reportflow::engine::LayoutConfig;
/// use reportflow::{EdgeOffsets, Fixed, Size};
///
/// let config = LayoutConfig::new(
///   Size::new(Fixed::from_pts(595), Fixed::from_pts(842)),
///   EdgeOffsets::all(Fixed::from_pts(72)),
/// );
/// assert_eq!(config.usable_width(), Fixed::from_pts(451));
/// assert_eq!(config.usable_height(), Fixed::from_pts(698));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
  /// Physical page size
  pub page_size: Size,
  /// Page margins; content flows inside them
  pub margins: EdgeOffsets,
}

impl LayoutConfig {
  /// Creates a config from a page size and margins.
  pub fn new(page_size: Size, margins: EdgeOffsets) -> Self {
    Self { page_size, margins }
  }

  /// Width available to content on each page.
  pub fn usable_width(&self) -> Fixed {
    (self.page_size.width - self.margins.horizontal()).clamp_non_negative()
  }

  /// Height available to content on each page.
  pub fn usable_height(&self) -> Fixed {
    (self.page_size.height - self.margins.vertical()).clamp_non_negative()
  }
}

impl Default for LayoutConfig {
  /// A4 portrait with one-inch margins.
  fn default() -> Self {
    Self {
      page_size: Size::new(Fixed::from_pts(595), Fixed::from_pts(842)),
      margins: EdgeOffsets::all(Fixed::from_pts(72)),
    }
  }
}

/// Entry point for laying out and paginating a report document
///
/// The engine is cheap to construct and holds no per-document state; one
/// engine can serve many trees.
///
/// # Examples
///
/// ```
/// use reportflow::engine::{LayoutConfig, LayoutEngine};
/// use reportflow::style::ResolvedStyle;
/// use reportflow::tree::{ContentTree, ElementContent};
///
/// let tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
/// let engine = LayoutEngine::new(LayoutConfig::default());
///
/// let mut pages = engine.run(&tree).unwrap();
/// let first = pages.next_page().unwrap();
/// assert!(first.elements.is_empty());
/// assert!(pages.next_page().is_none());
/// ```
#[derive(Debug, Default)]
pub struct LayoutEngine {
  config: LayoutConfig,
  cancel: Option<Arc<AtomicBool>>,
}

impl LayoutEngine {
  /// Creates an engine for the given page geometry.
  pub fn new(config: LayoutConfig) -> Self {
    Self {
      config,
      cancel: None,
    }
  }

  /// Installs a cooperative cancel flag passed on to every paginator this
  /// engine creates.
  pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
    self.cancel = Some(flag);
    self
  }

  /// Page geometry the engine lays out against.
  pub fn config(&self) -> &LayoutConfig {
    &self.config
  }

  /// Lays out `tree` and returns a lazy paginator over its pages.
  ///
  /// Fails only on structural problems in the tree; sizing conflicts degrade
  /// to warnings carried by the returned paginator's diagnostics.
  pub fn run<'a>(&self, tree: &'a ContentTree) -> Result<Paginator<'a>> {
    let mut diags = Diagnostics::new();
    let layout = resolve_layout(tree, self.config.usable_width(), &mut diags)?;
    log::debug!(
      "resolved {} boxes, flow height {}",
      layout.subtree_len(),
      layout.height()
    );
    let mut paginator = Paginator::new(tree, &layout, self.config.usable_height(), diags);
    if let Some(flag) = &self.cancel {
      paginator.set_cancel(Arc::clone(flag));
    }
    Ok(paginator)
  }

  /// Like [`LayoutEngine::run`], but reuses a cached box tree when the tree
  /// has not changed since the cache entry was stored.
  ///
  /// Intended for interactive hosts re-paginating after small edits. A hit
  /// replays the warnings the original resolve recorded, so cached runs
  /// report the same degradations as fresh ones.
  pub fn run_cached<'a>(
    &self,
    tree: &'a ContentTree,
    cache: &mut LayoutCache,
  ) -> Result<Paginator<'a>> {
    let width = self.config.usable_width();
    let mut diags = Diagnostics::new();
    let layout = match cache.get(tree, tree.root(), width, &mut diags) {
      Some(hit) => {
        log::debug!("layout cache hit for root at width {width}");
        hit
      }
      None => {
        let fresh = resolve_layout(tree, width, &mut diags)?;
        cache.insert(tree, tree.root(), width, fresh, &diags)
      }
    };
    let mut paginator = Paginator::new(tree, &layout, self.config.usable_height(), diags);
    if let Some(flag) = &self.cancel {
      paginator.set_cancel(Arc::clone(flag));
    }
    Ok(paginator)
  }
}
