#![forbid(unsafe_code)]

//! Panel/tab layout engine for the wbench workbench.
//!
//! # Role in wbench
//! This crate owns everything with state-machine or geometric substance:
//!
//! - [`tree`] / [`model`]: the panel split tree and its observable wrapper.
//!   All writers go through [`PanelModel`], which validates every mutation
//!   before publishing it.
//! - [`registry`]: flattened tab/pane lookups derived from the tree.
//! - [`drop_zone`]: the pure pointer-to-drop-zone classifier.
//! - [`drag`]: the drag-and-drop session state machine.
//! - [`resize`]: interactive divider dragging.
//! - [`snapshot`]: the versioned persisted layout form.
//!
//! Data flows one way: pointer events are classified by
//! [`DropZoneResolver`], accumulated by [`DragDropManager`], and committed as
//! a single [`PanelModel`] call on drop. Divider drags bypass the session and
//! go straight from [`ResizeController`] to [`PanelModel::set_split_ratios`].

pub mod drag;
pub mod drop_zone;
pub mod error;
pub mod ids;
pub mod model;
pub mod registry;
pub mod resize;
pub mod snapshot;
pub mod tab;
pub mod tree;
pub mod tuning;

pub use drag::{
    DragDropManager, DragEffect, DragHover, DragPayload, DragPhase, DragSession, DragTransfer,
    DropIntent, DropOutcome, TAB_DRAG_MIME,
};
pub use drop_zone::{
    DropIndicator, DropResolution, DropSurface, DropZone, DropZoneResolver, ghost_rect,
};
pub use error::{InvariantViolation, LayoutError};
pub use ids::{DocumentId, Id, IdAllocator, PaneId, TabId};
pub use model::PanelModel;
pub use registry::TabRegistry;
pub use resize::{ResizeController, ResizeSession, ResizeTarget, divider_at};
pub use snapshot::{LAYOUT_SCHEMA_VERSION, LayoutSnapshot};
pub use tab::TabRef;
pub use tree::{
    MoveOutcome, PaneLayout, PaneLeaf, PaneNode, PaneNodeKind, PaneSplit, PaneTree, RATIO_EPSILON,
    RemovedTab, SplitAxis, SplitChild, SplitOutcome, SplitSide,
};
pub use tuning::{DropTuning, LayoutTuning, ResizeTuning, TuningError};
pub use wbench_core::{Point, Rect, Subscription};
