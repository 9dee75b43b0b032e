//! Errors reported by the layout engine.
//!
//! Malformed style input is never an error: it is reported through
//! [`warn_once`](boxwood_common::warning::warn_once) and ignored. The
//! variants here are the fatal conditions. They abort the whole operation
//! and there is no partial-layout recovery.

use thiserror::Error;

use crate::box_tree::BoxId;
use crate::style::values::Length;

/// Fatal layout-engine errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A node was inserted while it still had a parent.
    #[error("box {0} already has a parent")]
    NodeHasParent(BoxId),

    /// An insertion point or removal target is not a child of the given parent.
    #[error("box {child} is not a child of box {parent}")]
    NotAChild {
        /// The parent that was named.
        parent: BoxId,
        /// The node that is not among its children.
        child: BoxId,
    },

    /// Inserting the node would make it its own ancestor.
    #[error("box {child} is an ancestor of box {parent}")]
    WouldCycle {
        /// The intended parent.
        parent: BoxId,
        /// The node being inserted.
        child: BoxId,
    },

    /// A [`BoxId`] refers to a slot that was freed or reused.
    #[error("box {0} no longer exists")]
    StaleBox(BoxId),

    /// A length reached `compute_length` with a unit that needs a layout
    /// context to resolve.
    #[error("cannot resolve {0:?} to an absolute length")]
    UnresolvableUnit(Length),

    /// The document nests deeper than [`LayoutConfig::max_depth`](crate::LayoutConfig::max_depth).
    #[error("document nesting exceeds the depth limit of {limit}")]
    DocumentTooDeep {
        /// The configured limit.
        limit: usize,
    },

    /// `render`, `hit_test` or a geometry query ran before `layout`.
    #[error("no layout has been performed")]
    NotLaidOut,
}

/// Result alias for layout-engine operations.
pub type Result<T, E = LayoutError> = std::result::Result<T, E>;
