//! reportflow: layout and pagination for banded report documents
//!
//! The crate takes a caller-built content tree (bands, rows, text, shapes,
//! images with resolved styles), measures it with fixed-point arithmetic,
//! and slices the resulting flow into page segments a renderer can draw.
//! It deliberately ends at geometry: no data binding, no styling resolution,
//! no output formats.
//!
//! # Pipeline
//!
//! 1. Build a [`tree::ContentTree`] and give every text leaf its resolved
//!    [`text::FontMetrics`].
//! 2. [`engine::LayoutEngine::run`] resolves box geometry (widths top-down,
//!    heights bottom-up, wrapped text measured via the Unicode line breaking
//!    algorithm) and returns a lazy [`layout::Paginator`].
//! 3. Pull [`layout::PageSegment`]s one at a time; each carries every
//!    element visible on that page with its clip rectangle.
//!
//! # Examples
//!
//! ```
//! use reportflow::engine::{LayoutConfig, LayoutEngine};
//! use reportflow::style::{ResolvedStyle, SizePolicy};
//! use reportflow::tree::{ContentTree, ElementContent, ShapeKind};
//! use reportflow::Fixed;
//!
//! let mut tree = ContentTree::new(ElementContent::Band, ResolvedStyle::default());
//! tree.add_child(
//!   tree.root(),
//!   ElementContent::Shape { kind: ShapeKind::Rectangle },
//!   ResolvedStyle {
//!     height: SizePolicy::Fixed(Fixed::from_pts(120)),
//!     ..ResolvedStyle::default()
//!   },
//! );
//!
//! let engine = LayoutEngine::new(LayoutConfig::default());
//! let mut pages = engine.run(&tree).unwrap();
//! let first = pages.next_page().unwrap();
//! assert_eq!(first.elements.len(), 1);
//! ```

pub mod engine;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod style;
pub mod text;
pub mod tree;

pub use engine::{LayoutConfig, LayoutEngine};
pub use error::{Diagnostics, Error, LayoutWarning, Result, StructuralError};
pub use geometry::{EdgeOffsets, Fixed, Point, Rect, Size};
pub use layout::{PageSegment, Paginator, PlacedElement};
pub use tree::{ContentTree, NodeId};
