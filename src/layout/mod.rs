//! Box geometry resolution, caching and pagination
//!
//! The layout pipeline runs in two phases over the caller's content tree:
//!
//! 1. [`resolve_layout`] builds a disposable [`LayoutBox`] tree: widths
//!    top-down, heights bottom-up (wrapping text along the way), then
//!    absolute flow positions.
//! 2. [`Paginator`] breaks the positioned tree into [`PageSegment`]s of the
//!    configured usable height, honoring keep-together and repeat-on-pages.
//!
//! [`LayoutCache`] memoizes resolved subtrees for interactive hosts; batch
//! runs can skip it entirely.

pub mod box_tree;
pub mod cache;
pub mod pagination;
pub mod resolver;

pub use box_tree::{LayoutBox, LineAlignment};
pub use cache::LayoutCache;
pub use pagination::{PageSegment, Paginator, PaginatorState, PlacedElement};
pub use resolver::{resolve_layout, MAX_NESTING_DEPTH};
