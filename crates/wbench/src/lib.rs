#![forbid(unsafe_code)]

//! wbench: panel/tab workbench for a browser IDE.
//!
//! This crate is the public facade. It re-exports the layout engine from
//! [`wbench_layout`] and the geometry/observer primitives from
//! [`wbench_core`], and adds the host-facing pieces:
//!
//! - [`Workbench`]: one panel model plus drag, resize and document wiring.
//! - [`DocumentStore`] / [`MemoryDocumentStore`]: document content boundary.
//! - [`EditorBinding`]: what each pane's code editor should display.
//! - [`TabCommand`]: tab context-menu commands by stable name.
//! - `logging` (feature `logging`): a `tracing-subscriber` bootstrap.
//!
//! # Example
//!
//! ```
//! use wbench::{DocumentInit, SplitSide, TabCommand, Workbench};
//!
//! let mut bench = Workbench::new();
//! let root = bench.tree().root();
//! let main = bench
//!     .open_document(root, "main.rs", DocumentInit::new("fn main() {}", "rust"))
//!     .unwrap();
//! bench.execute(TabCommand::Split(SplitSide::Right), main).unwrap();
//! assert_eq!(bench.tree().leaves().len(), 2);
//! ```

pub mod commands;
pub mod document;
pub mod editor;
#[cfg(feature = "logging")]
pub mod logging;
pub mod workbench;

pub use commands::{CommandOutcome, TabCommand, UnknownCommand};
pub use document::{Document, DocumentError, DocumentInit, DocumentStore, MemoryDocumentStore};
pub use editor::EditorBinding;
#[cfg(feature = "logging")]
pub use logging::{LogFormat, LoggingError, init_logging};
pub use workbench::{Workbench, WorkbenchError, WorkbenchFrame};

pub use wbench_core::{Observers, Point, Rect, Subscription};
pub use wbench_layout::{
    DocumentId, DragDropManager, DragEffect, DragHover, DragPayload, DragPhase, DragSession,
    DragTransfer, DropIndicator, DropIntent, DropOutcome, DropResolution, DropSurface, DropTuning,
    DropZone, DropZoneResolver, IdAllocator, InvariantViolation, LAYOUT_SCHEMA_VERSION,
    LayoutError, LayoutSnapshot, LayoutTuning, MoveOutcome, PaneId, PaneLayout, PaneLeaf, PaneNode,
    PaneNodeKind, PaneSplit, PaneTree, PanelModel, RATIO_EPSILON, RemovedTab, ResizeController,
    ResizeSession, ResizeTarget, ResizeTuning, SplitAxis, SplitChild, SplitOutcome, SplitSide,
    TAB_DRAG_MIME, TabId, TabRef, TabRegistry, TuningError, divider_at, ghost_rect,
};
