//! Error types for layout operations.
//!
//! [`LayoutError`] is returned by every fallible entry point. All variants
//! except [`LayoutError::InvariantViolation`] describe expected races (a pane
//! closed mid-drag, a stale tab id) and leave state untouched; an invariant
//! violation is a defect and is logged at `error` level where it is detected.

use thiserror::Error;

use crate::ids::{PaneId, TabId};

/// Failure of a layout, drag or resize operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("pane {pane_id} not found")]
    PaneNotFound { pane_id: PaneId },

    #[error("tab {tab_id} not found")]
    TabNotFound { tab_id: TabId },

    #[error("tab {tab_id} is already open")]
    DuplicateTab { tab_id: TabId },

    #[error("tab {tab_id} is locked")]
    TabLocked { tab_id: TabId },

    #[error("{operation} is not valid while the drag session is {state}")]
    InvalidDragState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("{operation} is not valid while a divider resize is {state}")]
    InvalidResizeState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("divider {divider} out of range for split {split_id} with {children} children")]
    DividerOutOfRange {
        split_id: PaneId,
        divider: usize,
        children: usize,
    },

    #[error("unsupported layout schema version {version}")]
    UnsupportedSchemaVersion { version: u16 },

    #[error("layout snapshot could not be decoded: {message}")]
    Decode { message: String },

    #[error("{kind} id must be non-zero")]
    ZeroId { kind: &'static str },

    #[error("{kind} id space exhausted")]
    IdOverflow { kind: &'static str },

    #[error("layout invariant violated: {0}")]
    InvariantViolation(#[from] InvariantViolation),
}

impl LayoutError {
    /// Whether the caller can carry on after this failure.
    ///
    /// Only invariant violations are unrecoverable: they indicate a defect in
    /// the mutation code or a corrupted persisted layout.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_))
    }
}

/// A structural rule of the panel tree that failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("root node {root} is missing")]
    MissingRoot { root: PaneId },

    #[error("root node {root} has parent {parent}")]
    RootHasParent { root: PaneId, parent: PaneId },

    #[error("node id 0 is reserved")]
    ZeroNodeId,

    #[error("node {node_id} appears more than once")]
    DuplicateNodeId { node_id: PaneId },

    #[error("next id {next_id} is not greater than existing id {max_existing}")]
    NextIdNotGreaterThanExisting {
        next_id: PaneId,
        max_existing: PaneId,
    },

    #[error("split {parent} references missing child {child}")]
    MissingChild { parent: PaneId, child: PaneId },

    #[error("node {node_id} records parent {actual:?}, expected {expected:?}")]
    ParentMismatch {
        node_id: PaneId,
        expected: Option<PaneId>,
        actual: Option<PaneId>,
    },

    #[error("cycle detected at node {node_id}")]
    CycleDetected { node_id: PaneId },

    #[error("node {node_id} is unreachable from the root")]
    UnreachableNode { node_id: PaneId },

    #[error("split {split_id} has {children} children (at least 2 required)")]
    SplitTooFewChildren { split_id: PaneId, children: usize },

    #[error("split {split_id} child {index} has ratio {ratio} outside (0, 1]")]
    RatioOutOfRange {
        split_id: PaneId,
        index: usize,
        ratio: f64,
    },

    #[error("split {split_id} ratios sum to {sum}, expected 1.0")]
    RatioSumMismatch { split_id: PaneId, sum: f64 },

    #[error("split {split_id} expects {expected} ratios, got {actual}")]
    RatioCountMismatch {
        split_id: PaneId,
        expected: usize,
        actual: usize,
    },

    #[error("non-root pane {pane_id} has no tabs")]
    EmptyNonRootLeaf { pane_id: PaneId },

    #[error("pane {pane_id} has tabs but no active tab")]
    ActiveTabUnset { pane_id: PaneId },

    #[error("pane {pane_id} marks missing tab {tab_id} as active")]
    ActiveTabMissing { pane_id: PaneId, tab_id: TabId },

    #[error("pane {pane_id} tab {tab_id} active flag disagrees with the pane")]
    ActiveFlagMismatch { pane_id: PaneId, tab_id: TabId },

    #[error("tab {tab_id} appears in more than one place")]
    DuplicateTab { tab_id: TabId },
}
