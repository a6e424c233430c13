//! Observable panel model.
//!
//! [`PanelModel`] owns the live [`PaneTree`] and is the single writer for it:
//! drag-drop, resize and tab commands all funnel through the methods here.
//! Every mutation runs inside a `panel_model.mutate` span carrying the
//! operation name and the tree hash before and after. Observers are notified
//! synchronously, once, after each mutation that actually changed the tree.

use tracing::{debug, debug_span, field, warn};
use wbench_core::{Observers, Subscription};

use crate::error::LayoutError;
use crate::ids::{PaneId, TabId};
use crate::registry::TabRegistry;
use crate::snapshot::LayoutSnapshot;
use crate::tab::TabRef;
use crate::tree::{MoveOutcome, PaneTree, RemovedTab, SplitOutcome, SplitSide};

/// Live panel tree plus its observers.
#[derive(Debug, Default)]
pub struct PanelModel {
    tree: PaneTree,
    observers: Observers<PaneTree>,
}

impl PanelModel {
    /// A model holding a single empty root pane.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already validated tree (e.g. one restored from a snapshot).
    #[must_use]
    pub fn from_tree(tree: PaneTree) -> Self {
        Self {
            tree,
            observers: Observers::new(),
        }
    }

    #[must_use]
    pub const fn tree(&self) -> &PaneTree {
        &self.tree
    }

    /// Flattened lookups over the current tree.
    #[must_use]
    pub fn registry(&self) -> TabRegistry<'_> {
        TabRegistry::new(&self.tree)
    }

    /// Register a callback invoked with the tree after every change.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&mut self, callback: impl Fn(&PaneTree) + 'static) -> Subscription {
        self.observers.subscribe(callback)
    }

    pub fn insert_tab(
        &mut self,
        pane_id: PaneId,
        tab: TabRef,
        index: usize,
    ) -> Result<usize, LayoutError> {
        self.apply("insert_tab", |tree| tree.insert_tab(pane_id, tab, index))
    }

    pub fn remove_tab(&mut self, tab_id: TabId) -> Result<RemovedTab, LayoutError> {
        self.apply("remove_tab", |tree| tree.remove_tab(tab_id))
    }

    pub fn move_tab(
        &mut self,
        tab_id: TabId,
        target: PaneId,
        index: usize,
    ) -> Result<MoveOutcome, LayoutError> {
        self.apply("move_tab", |tree| tree.move_tab(tab_id, target, index))
    }

    pub fn split_pane(
        &mut self,
        pane_id: PaneId,
        side: SplitSide,
        tab: TabRef,
    ) -> Result<SplitOutcome, LayoutError> {
        self.apply("split_pane", |tree| tree.split_pane(pane_id, side, tab))
    }

    pub fn set_active_tab(&mut self, pane_id: PaneId, tab_id: TabId) -> Result<bool, LayoutError> {
        self.apply("set_active_tab", |tree| tree.set_active_tab(pane_id, tab_id))
    }

    pub fn toggle_lock(&mut self, tab_id: TabId) -> Result<bool, LayoutError> {
        self.apply("toggle_lock", |tree| tree.toggle_lock(tab_id))
    }

    pub fn set_dirty(&mut self, tab_id: TabId, dirty: bool) -> Result<bool, LayoutError> {
        self.apply("set_dirty", |tree| tree.set_dirty(tab_id, dirty))
    }

    pub fn set_split_ratios(&mut self, split_id: PaneId, ratios: &[f64]) -> Result<(), LayoutError> {
        self.apply("set_split_ratios", |tree| {
            tree.set_split_ratios(split_id, ratios)
        })
    }

    pub fn close_other_tabs(&mut self, tab_id: TabId) -> Result<Vec<TabRef>, LayoutError> {
        self.apply("close_other_tabs", |tree| tree.close_other_tabs(tab_id))
    }

    /// Swap in a tree built elsewhere, e.g. by [`PaneTree::from_snapshot`].
    pub fn replace(&mut self, replacement: PaneTree) -> Result<(), LayoutError> {
        self.apply("replace", move |tree| {
            *tree = replacement;
            Ok(())
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot {
        self.tree.to_snapshot()
    }

    fn apply<R>(
        &mut self,
        op: &'static str,
        mutate: impl FnOnce(&mut PaneTree) -> Result<R, LayoutError>,
    ) -> Result<R, LayoutError> {
        let before_hash = self.tree.state_hash();
        let span = debug_span!(
            "panel_model.mutate",
            op,
            before_hash,
            after_hash = field::Empty
        );
        let _guard = span.enter();

        match mutate(&mut self.tree) {
            Ok(result) => {
                let after_hash = self.tree.state_hash();
                span.record("after_hash", after_hash);
                if after_hash == before_hash {
                    debug!("no-op; observers not notified");
                } else {
                    debug!("applied");
                    self.observers.notify(&self.tree);
                }
                Ok(result)
            }
            Err(err) => {
                // Invariant violations are already reported where detected.
                if err.is_recoverable() {
                    warn!(%err, "rejected");
                }
                Err(err)
            }
        }
    }
}
