//! Flattened tab/pane lookups.
//!
//! [`TabRegistry`] borrows a [`PaneTree`] and builds a tab index on
//! construction. Because it borrows the tree it cannot outlive a mutation, so
//! a stale read is impossible by construction.

use rustc_hash::FxHashMap;

use crate::error::LayoutError;
use crate::ids::{DocumentId, PaneId, TabId};
use crate::tab::TabRef;
use crate::tree::PaneTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TabSlot {
    pane_id: PaneId,
    index: usize,
}

/// Read-only derived view over a [`PaneTree`].
#[derive(Debug, Clone)]
pub struct TabRegistry<'a> {
    tree: &'a PaneTree,
    panes: Vec<PaneId>,
    slots: FxHashMap<TabId, TabSlot>,
}

impl<'a> TabRegistry<'a> {
    #[must_use]
    pub fn new(tree: &'a PaneTree) -> Self {
        let panes = tree.leaves();
        let mut slots = FxHashMap::with_capacity_and_hasher(tree.tab_count(), Default::default());
        for pane_id in &panes {
            let Some(leaf) = tree.leaf(*pane_id) else {
                continue;
            };
            for (index, tab) in leaf.tabs.iter().enumerate() {
                let _ = slots.insert(
                    tab.id,
                    TabSlot {
                        pane_id: *pane_id,
                        index,
                    },
                );
            }
        }
        Self { tree, panes, slots }
    }

    /// Pane currently hosting `tab_id`.
    #[must_use]
    pub fn pane_of(&self, tab_id: TabId) -> Option<PaneId> {
        self.slots.get(&tab_id).map(|slot| slot.pane_id)
    }

    /// Position of `tab_id` within its pane.
    #[must_use]
    pub fn index_of(&self, tab_id: TabId) -> Option<usize> {
        self.slots.get(&tab_id).map(|slot| slot.index)
    }

    /// Every leaf pane, in visual order.
    #[must_use]
    pub fn all_panes(&self) -> &[PaneId] {
        &self.panes
    }

    pub fn tabs_in_pane(&self, pane_id: PaneId) -> Result<&'a [TabRef], LayoutError> {
        self.tree
            .leaf(pane_id)
            .map(|leaf| leaf.tabs.as_slice())
            .ok_or(LayoutError::PaneNotFound { pane_id })
    }

    /// Whether `tab_id` is the only tab left in its pane.
    pub fn is_last_tab_in_pane(&self, tab_id: TabId) -> Result<bool, LayoutError> {
        let pane_id = self
            .pane_of(tab_id)
            .ok_or(LayoutError::TabNotFound { tab_id })?;
        Ok(self.tabs_in_pane(pane_id)?.len() == 1)
    }

    #[must_use]
    pub fn tab(&self, tab_id: TabId) -> Option<&'a TabRef> {
        let slot = self.slots.get(&tab_id)?;
        self.tree.leaf(slot.pane_id)?.tabs.get(slot.index)
    }

    #[must_use]
    pub fn active_tab(&self, pane_id: PaneId) -> Option<&'a TabRef> {
        self.tree.leaf(pane_id)?.active_tab()
    }

    /// Tabs (across all panes) showing `document_id`.
    #[must_use]
    pub fn tabs_for_document(&self, document_id: DocumentId) -> Vec<&'a TabRef> {
        self.panes
            .iter()
            .filter_map(|pane_id| self.tree.leaf(*pane_id))
            .flat_map(|leaf| leaf.tabs.iter())
            .filter(|tab| tab.document_id == document_id)
            .collect()
    }

    /// Tabs with unsaved changes, in visual order.
    #[must_use]
    pub fn dirty_tabs(&self) -> Vec<&'a TabRef> {
        self.panes
            .iter()
            .filter_map(|pane_id| self.tree.leaf(*pane_id))
            .flat_map(|leaf| leaf.tabs.iter())
            .filter(|tab| tab.is_dirty)
            .collect()
    }

    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.slots.len()
    }
}
