//! Workbench host.
//!
//! [`Workbench`] owns one [`PanelModel`] together with the drag session
//! manager, the resize controller and a [`DocumentStore`], and exposes the
//! operations a browser adapter forwards from DOM events. Hosts observe it
//! through [`Workbench::subscribe`], which publishes a [`WorkbenchFrame`]
//! after every operation that changed the tree or the drag session.

use thiserror::Error;
use tracing::{debug, debug_span, warn};
use wbench_core::{Observers, Point, Rect, Subscription};
use wbench_layout::{
    DocumentId, DragDropManager, DragSession, DragTransfer, DropOutcome, DropResolution,
    DropSurface, DropZoneResolver, IdAllocator, LayoutError, LayoutSnapshot, LayoutTuning,
    PaneId, PaneTree, PanelModel, RemovedTab, ResizeController, ResizeSession,
    ResizeTarget, SplitOutcome, SplitSide, TabId, TabRef, TuningError, divider_at,
};

use crate::commands::{CommandOutcome, TabCommand, UnknownCommand};
use crate::document::{DocumentError, DocumentInit, DocumentStore, MemoryDocumentStore};
use crate::editor::EditorBinding;

/// Failure of a workbench operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkbenchError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Tuning(#[from] TuningError),

    #[error(transparent)]
    UnknownCommand(#[from] UnknownCommand),
}

impl WorkbenchError {
    /// See [`LayoutError::is_recoverable`].
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Layout(err) => err.is_recoverable(),
            Self::Document(_) | Self::Tuning(_) | Self::UnknownCommand(_) => true,
        }
    }
}

/// What subscribers see after a change.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbenchFrame {
    pub tree: PaneTree,
    pub drag: Option<DragSession>,
}

/// The panel/tab workbench.
#[derive(Debug)]
pub struct Workbench<S: DocumentStore = MemoryDocumentStore> {
    model: PanelModel,
    drag: DragDropManager,
    resize: ResizeController,
    resolver: DropZoneResolver,
    documents: S,
    tab_ids: IdAllocator<TabId>,
    frames: Observers<WorkbenchFrame>,
}

impl Workbench<MemoryDocumentStore> {
    /// An empty workbench with default tuning and an in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(
            MemoryDocumentStore::new(),
            ResizeController::default(),
            DropZoneResolver::default(),
        )
    }
}

impl Default for Workbench<MemoryDocumentStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DocumentStore> Workbench<S> {
    /// An empty workbench over `documents`, validating `tuning` first.
    pub fn with_tuning(documents: S, tuning: LayoutTuning) -> Result<Self, WorkbenchError> {
        tuning.drop.validate()?;
        let resize = ResizeController::new(tuning.resize)?;
        Ok(Self::from_parts(documents, resize, DropZoneResolver::new(tuning.drop)))
    }

    fn from_parts(documents: S, resize: ResizeController, resolver: DropZoneResolver) -> Self {
        Self {
            model: PanelModel::new(),
            drag: DragDropManager::new(),
            resize,
            resolver,
            documents,
            tab_ids: IdAllocator::default(),
            frames: Observers::new(),
        }
    }

    #[must_use]
    pub const fn model(&self) -> &PanelModel {
        &self.model
    }

    #[must_use]
    pub const fn tree(&self) -> &PaneTree {
        self.model.tree()
    }

    #[must_use]
    pub const fn documents(&self) -> &S {
        &self.documents
    }

    #[must_use]
    pub const fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    #[must_use]
    pub fn resize_session(&self) -> Option<&ResizeSession> {
        self.resize.session()
    }

    /// Register a callback receiving a frame after every visible change.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&mut self, callback: impl Fn(&WorkbenchFrame) + 'static) -> Subscription {
        self.frames.subscribe(callback)
    }

    // ---------------------------------------------------------------------
    // Documents and tabs
    // ---------------------------------------------------------------------

    /// Create a document and open it as the active tab at the end of `pane_id`.
    pub fn open_document(
        &mut self,
        pane_id: PaneId,
        name: &str,
        init: DocumentInit,
    ) -> Result<TabId, WorkbenchError> {
        if self.model.tree().leaf(pane_id).is_none() {
            return Err(LayoutError::PaneNotFound { pane_id }.into());
        }
        let document_id = self.documents.create_document(name, init)?;
        debug!(%document_id, name, "document created");
        self.open_tab(pane_id, document_id, usize::MAX)
    }

    /// Open a new tab for an existing document at `index` of `pane_id`.
    pub fn open_tab(
        &mut self,
        pane_id: PaneId,
        document_id: DocumentId,
        index: usize,
    ) -> Result<TabId, WorkbenchError> {
        if self.documents.get_document(document_id).is_none() {
            return Err(DocumentError::NotFound { id: document_id }.into());
        }
        let tab_id = self.tab_ids.peek();
        self.run("open_tab", |bench| {
            bench
                .model
                .insert_tab(pane_id, TabRef::new(tab_id, document_id), index)?;
            Ok(())
        })?;
        self.tab_ids.allocate()?;
        Ok(tab_id)
    }

    /// Close a tab. Locked tabs refuse to close.
    pub fn close_tab(&mut self, tab_id: TabId) -> Result<RemovedTab, WorkbenchError> {
        let tab = self.require_tab(tab_id)?;
        if tab.is_locked {
            warn!(%tab_id, "close rejected: tab is locked");
            return Err(LayoutError::TabLocked { tab_id }.into());
        }
        self.run("close_tab", |bench| Ok(bench.model.remove_tab(tab_id)?))
    }

    /// Make `tab_id` the active tab of its pane.
    pub fn activate(&mut self, tab_id: TabId) -> Result<bool, WorkbenchError> {
        let (pane_id, _) = self.locate(tab_id)?;
        self.run("activate", |bench| {
            Ok(bench.model.set_active_tab(pane_id, tab_id)?)
        })
    }

    /// What the editor surface of `pane_id` should show. `None` for an empty
    /// pane or a tab whose document is gone.
    pub fn editor_binding(&self, pane_id: PaneId) -> Result<Option<EditorBinding>, WorkbenchError> {
        let leaf = self
            .model
            .tree()
            .leaf(pane_id)
            .ok_or(LayoutError::PaneNotFound { pane_id })?;
        Ok(leaf
            .active_tab()
            .and_then(|tab| EditorBinding::for_tab(&self.documents, tab)))
    }

    /// Bindings for every pane that shows a document, in visual order.
    #[must_use]
    pub fn editor_bindings(&self) -> Vec<(PaneId, EditorBinding)> {
        let tree = self.model.tree();
        tree.leaves()
            .into_iter()
            .filter_map(|pane_id| {
                let tab = tree.leaf(pane_id)?.active_tab()?;
                EditorBinding::for_tab(&self.documents, tab).map(|binding| (pane_id, binding))
            })
            .collect()
    }

    /// Store content typed into the editor bound to `tab_id` and mark every
    /// tab of that document dirty.
    pub fn apply_editor_change(&mut self, tab_id: TabId, content: &str) -> Result<(), WorkbenchError> {
        let tab = self.require_tab(tab_id)?;
        if tab.is_locked {
            return Err(LayoutError::TabLocked { tab_id }.into());
        }
        let document_id = tab.document_id;
        self.documents.update_document_content(document_id, content)?;
        let dirty = self
            .documents
            .get_document(document_id)
            .is_some_and(|document| document.dirty);
        self.run("apply_editor_change", |bench| {
            bench.sync_dirty(document_id, dirty)
        })
    }

    /// The host persisted `document_id`; clear the dirty flags.
    pub fn mark_saved(&mut self, document_id: DocumentId) -> Result<(), WorkbenchError> {
        self.documents.mark_saved(document_id)?;
        self.run("mark_saved", |bench| bench.sync_dirty(document_id, false))
    }

    /// Parse and run a named tab command.
    pub fn execute_named(&mut self, name: &str, tab_id: TabId) -> Result<CommandOutcome, WorkbenchError> {
        let command: TabCommand = name.parse()?;
        self.execute(command, tab_id)
    }

    /// Run a tab context-menu command.
    pub fn execute(&mut self, command: TabCommand, tab_id: TabId) -> Result<CommandOutcome, WorkbenchError> {
        let _span = debug_span!("workbench.execute", command = command.name(), %tab_id).entered();
        match command {
            TabCommand::Close => {
                let removed = self.close_tab(tab_id)?;
                Ok(CommandOutcome::Closed {
                    tab: removed.tab,
                    pane_id: removed.pane_id,
                })
            }
            TabCommand::CloseOthers => {
                let closed = self.run("close_others", |bench| {
                    Ok(bench.model.close_other_tabs(tab_id)?)
                })?;
                if closed.is_empty() {
                    return Ok(CommandOutcome::Unchanged);
                }
                Ok(CommandOutcome::ClosedOthers { closed })
            }
            TabCommand::Duplicate => {
                let (pane_id, index) = self.locate(tab_id)?;
                let document_id = self.require_tab(tab_id)?.document_id;
                let duplicate = self.open_tab(pane_id, document_id, index + 1)?;
                Ok(CommandOutcome::Duplicated {
                    tab_id: duplicate,
                    pane_id,
                })
            }
            TabCommand::ToggleLock => {
                let locked = self.run("toggle_lock", |bench| {
                    Ok(bench.model.toggle_lock(tab_id)?)
                })?;
                Ok(CommandOutcome::LockToggled { tab_id, locked })
            }
            TabCommand::Split(side) => self.split_tab(tab_id, side),
        }
    }

    fn split_tab(&mut self, tab_id: TabId, side: SplitSide) -> Result<CommandOutcome, WorkbenchError> {
        let (pane_id, _) = self.locate(tab_id)?;
        let tab = self.require_tab(tab_id)?.clone();
        let alone = self.model.registry().is_last_tab_in_pane(tab_id)?;

        // A lone tab cannot leave its pane; open the document a second time.
        let (incoming, duplicated) = if alone {
            (TabRef::new(self.tab_ids.peek(), tab.document_id), true)
        } else {
            (tab, false)
        };
        let incoming_id = incoming.id;
        let outcome = self.run("split_tab", |bench| {
            Ok(bench.model.split_pane(pane_id, side, incoming)?)
        })?;
        if duplicated {
            self.tab_ids.allocate()?;
        }

        Ok(match outcome {
            SplitOutcome::Split { split_id, new_pane } => CommandOutcome::Split {
                tab_id: incoming_id,
                split_id,
                new_pane,
            },
            SplitOutcome::Filled { pane_id } => CommandOutcome::Duplicated {
                tab_id: incoming_id,
                pane_id,
            },
            SplitOutcome::Unchanged => CommandOutcome::Unchanged,
        })
    }

    // ---------------------------------------------------------------------
    // Drag and drop
    // ---------------------------------------------------------------------

    /// Begin dragging `tab_id` out of its pane.
    pub fn start_drag(&mut self, tab_id: TabId, transfer: &mut dyn DragTransfer) -> Result<(), WorkbenchError> {
        let (source, _) = self.locate(tab_id)?;
        self.run("start_drag", |bench| {
            Ok(bench.drag.start_drag(tab_id, source, transfer)?)
        })
    }

    /// Pointer moved over `pane_id`. The hover target is replaced when the
    /// pointer resolves to a zone and kept otherwise.
    pub fn drag_over(
        &mut self,
        pane_id: PaneId,
        pointer: Point,
        container: Rect,
        surface: DropSurface,
        tab_rects: &[Rect],
    ) -> Result<Option<DropResolution>, WorkbenchError> {
        let resolution = self.resolver.resolve(pointer, container, surface, tab_rects);
        if let Some(resolution) = resolution {
            self.run("drag_over", |bench| {
                Ok(bench.drag.update_from_resolution(pane_id, resolution)?)
            })?;
        }
        Ok(resolution)
    }

    /// Pointer left every drop surface.
    pub fn drag_leave(&mut self) -> Result<(), WorkbenchError> {
        self.run("drag_leave", |bench| Ok(bench.drag.clear_hover()?))
    }

    /// Release the dragged tab onto the current hover target.
    pub fn drop_tab(&mut self) -> Result<DropOutcome, WorkbenchError> {
        self.run("drop_tab", |bench| Ok(bench.drag.end_drag(&mut bench.model)?))
    }

    // ---------------------------------------------------------------------
    // Divider resize
    // ---------------------------------------------------------------------

    /// Grab divider `divider` of `split_id`.
    pub fn begin_resize(
        &mut self,
        split_id: PaneId,
        divider: usize,
        pointer: Point,
        extent_px: f64,
    ) -> Result<(), WorkbenchError> {
        self.resize
            .begin(&self.model, split_id, divider, pointer, extent_px)?;
        Ok(())
    }

    /// Grab whichever divider lies within `grab_px` of `pointer` when the
    /// tree is laid out in `area`.
    pub fn begin_resize_at(
        &mut self,
        area: Rect,
        pointer: Point,
        grab_px: f64,
    ) -> Result<Option<ResizeTarget>, WorkbenchError> {
        let tree = self.model.tree();
        let layout = tree.solve_layout(area);
        let Some(target) = divider_at(tree, &layout, pointer, grab_px) else {
            return Ok(None);
        };
        let extent_px = layout
            .rect(target.split_id)
            .map_or(0.0, |rect| target.axis.extent(rect));
        self.begin_resize(target.split_id, target.divider, pointer, extent_px)?;
        Ok(Some(target))
    }

    /// Follow the pointer with the grabbed divider.
    pub fn resize_to(&mut self, pointer: Point) -> Result<bool, WorkbenchError> {
        self.run("resize_to", |bench| {
            Ok(bench.resize.drag_to(&mut bench.model, pointer)?)
        })
    }

    pub fn container_resized(&mut self, extent_px: f64) -> Result<(), WorkbenchError> {
        Ok(self.resize.container_resized(extent_px)?)
    }

    /// Release the divider.
    pub fn end_resize(&mut self) -> Result<ResizeSession, WorkbenchError> {
        Ok(self.resize.finish()?)
    }

    /// Escape: abort the active drag and/or divider resize. Returns whether
    /// anything was cancelled.
    pub fn cancel_interaction(&mut self) -> Result<bool, WorkbenchError> {
        self.run("cancel_interaction", |bench| {
            let mut cancelled = false;
            if bench.drag.is_dragging() {
                let session = bench.drag.cancel_drag()?;
                debug!(tab_id = %session.dragged_tab_id, "drag cancelled by host");
                cancelled = true;
            }
            if bench.resize.is_active() {
                bench.resize.cancel(&mut bench.model)?;
                cancelled = true;
            }
            Ok(cancelled)
        })
    }

    // ---------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------

    /// Current layout as versioned JSON.
    pub fn layout_json(&self) -> Result<String, WorkbenchError> {
        Ok(self.model.snapshot().to_json()?)
    }

    /// Replace the layout with a persisted one. The layout is validated
    /// before active interactions are cancelled, so a rejected layout leaves
    /// everything as it was. Tab ids allocated afterwards never collide with
    /// restored ones.
    pub fn restore_layout(&mut self, json: &str) -> Result<(), WorkbenchError> {
        let restored = PaneTree::from_snapshot(LayoutSnapshot::from_json(json)?)?;
        let next_tab = restored
            .nodes()
            .filter_map(|node| node.as_leaf())
            .flat_map(|leaf| leaf.tabs.iter().map(|tab| tab.id))
            .max()
            .map(TabId::checked_next)
            .transpose()?;

        self.cancel_interaction()?;
        self.run("restore_layout", |bench| Ok(bench.model.replace(restored)?))?;
        if let Some(next_tab) = next_tab.filter(|next| *next > self.tab_ids.peek()) {
            self.tab_ids = IdAllocator::with_next(next_tab);
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn locate(&self, tab_id: TabId) -> Result<(PaneId, usize), LayoutError> {
        self.model
            .tree()
            .locate_tab(tab_id)
            .ok_or(LayoutError::TabNotFound { tab_id })
    }

    fn require_tab(&self, tab_id: TabId) -> Result<&TabRef, LayoutError> {
        self.model
            .tree()
            .tab(tab_id)
            .ok_or(LayoutError::TabNotFound { tab_id })
    }

    fn sync_dirty(&mut self, document_id: DocumentId, dirty: bool) -> Result<(), WorkbenchError> {
        let tabs: Vec<TabId> = self
            .model
            .registry()
            .tabs_for_document(document_id)
            .into_iter()
            .map(|tab| tab.id)
            .collect();
        for tab_id in tabs {
            let _ = self.model.set_dirty(tab_id, dirty)?;
        }
        Ok(())
    }

    /// Run `op` and publish a frame if it changed the tree or drag session,
    /// whether or not it succeeded.
    fn run<R>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut Self) -> Result<R, WorkbenchError>,
    ) -> Result<R, WorkbenchError> {
        let before_hash = self.model.tree().state_hash();
        let before_drag = self.drag.session().copied();

        let result = f(self);

        let after_drag = self.drag.session().copied();
        if self.model.tree().state_hash() != before_hash || after_drag != before_drag {
            debug!(op, "publishing workbench frame");
            let frame = WorkbenchFrame {
                tree: self.model.tree().clone(),
                drag: after_drag,
            };
            self.frames.notify(&frame);
        }
        result
    }
}
