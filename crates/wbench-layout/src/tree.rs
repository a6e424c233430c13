//! Panel split-tree model.
//!
//! The editing area is a tree of [`PaneNode`]s stored in an arena keyed by
//! [`PaneId`] with explicit parent links:
//!
//! - **Leaf** nodes are panes. Each holds an ordered tab list and the id of
//!   its active tab.
//! - **Split** nodes divide their extent along one [`SplitAxis`] between two
//!   or more children, each with a fractional `ratio`. Ratios of one split
//!   always sum to 1.0 (within [`RATIO_EPSILON`]).
//!
//! Every mutation runs against a cloned working tree, is validated with
//! [`PaneTree::validate`], and only then replaces the live tree. A failing
//! validation leaves the live tree untouched and surfaces as
//! [`LayoutError::InvariantViolation`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::error;
use wbench_core::{Point, Rect};

use crate::error::{InvariantViolation, LayoutError};
use crate::ids::{PaneId, TabId};
use crate::tab::TabRef;

/// Tolerance used when checking that split ratios sum to 1.0.
pub const RATIO_EPSILON: f64 = 1e-6;

/// Orientation of a split node.
///
/// `Horizontal` lays children out left to right (dividers are vertical
/// lines); `Vertical` stacks them top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAxis {
    Horizontal,
    Vertical,
}

impl SplitAxis {
    /// Extent of `rect` along this axis.
    #[must_use]
    pub fn extent(self, rect: Rect) -> f64 {
        match self {
            Self::Horizontal => rect.width,
            Self::Vertical => rect.height,
        }
    }

    /// Pointer delta along this axis.
    #[must_use]
    pub fn delta(self, from: Point, to: Point) -> f64 {
        let (dx, dy) = to.delta_from(from);
        match self {
            Self::Horizontal => dx,
            Self::Vertical => dy,
        }
    }
}

/// Where a new pane lands relative to the pane being split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl SplitSide {
    #[must_use]
    pub const fn axis(self) -> SplitAxis {
        match self {
            Self::Left | Self::Right => SplitAxis::Horizontal,
            Self::Top | Self::Bottom => SplitAxis::Vertical,
        }
    }

    /// Whether the new pane becomes the first child of the split.
    #[must_use]
    pub const fn incoming_first(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }
}

/// Pane payload: ordered tabs plus the active one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaneLeaf {
    #[serde(default)]
    pub tabs: Vec<TabRef>,
    #[serde(default)]
    pub active: Option<TabId>,
}

impl PaneLeaf {
    /// A pane holding one active tab.
    #[must_use]
    pub fn with_tab(tab: TabRef) -> Self {
        let mut leaf = Self {
            active: Some(tab.id),
            tabs: vec![tab],
        };
        leaf.sync_active_flags();
        leaf
    }

    /// Index of `tab_id` in this pane.
    #[must_use]
    pub fn position(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == tab_id)
    }

    /// The active tab, if any.
    #[must_use]
    pub fn active_tab(&self) -> Option<&TabRef> {
        let active = self.active?;
        self.tabs.iter().find(|tab| tab.id == active)
    }

    fn sync_active_flags(&mut self) {
        let active = self.active;
        for tab in &mut self.tabs {
            tab.is_active = Some(tab.id) == active;
        }
    }
}

/// One child slot of a split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitChild {
    pub node: PaneId,
    pub ratio: f64,
}

/// Split payload: axis plus ordered, weighted children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaneSplit {
    pub axis: SplitAxis,
    pub children: Vec<SplitChild>,
}

impl PaneSplit {
    /// Current ratio vector in child order.
    #[must_use]
    pub fn ratios(&self) -> Vec<f64> {
        self.children.iter().map(|child| child.ratio).collect()
    }

    #[must_use]
    pub fn position(&self, node: PaneId) -> Option<usize> {
        self.children.iter().position(|child| child.node == node)
    }
}

/// Node payload variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaneNodeKind {
    Leaf(PaneLeaf),
    Split(PaneSplit),
}

/// One arena record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaneNode {
    pub id: PaneId,
    #[serde(default)]
    pub parent: Option<PaneId>,
    #[serde(flatten)]
    pub kind: PaneNodeKind,
}

impl PaneNode {
    #[must_use]
    pub fn leaf(id: PaneId, parent: Option<PaneId>, leaf: PaneLeaf) -> Self {
        Self {
            id,
            parent,
            kind: PaneNodeKind::Leaf(leaf),
        }
    }

    #[must_use]
    pub fn split(id: PaneId, parent: Option<PaneId>, split: PaneSplit) -> Self {
        Self {
            id,
            parent,
            kind: PaneNodeKind::Split(split),
        }
    }

    #[must_use]
    pub fn as_leaf(&self) -> Option<&PaneLeaf> {
        match &self.kind {
            PaneNodeKind::Leaf(leaf) => Some(leaf),
            PaneNodeKind::Split(_) => None,
        }
    }

    #[must_use]
    pub fn as_split(&self) -> Option<&PaneSplit> {
        match &self.kind {
            PaneNodeKind::Split(split) => Some(split),
            PaneNodeKind::Leaf(_) => None,
        }
    }
}

/// Result of [`PaneTree::remove_tab`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedTab {
    pub tab: TabRef,
    pub pane_id: PaneId,
    /// The pane became empty and was pruned from the tree.
    pub pruned: bool,
}

/// Result of [`PaneTree::move_tab`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved {
        from: PaneId,
        to: PaneId,
        index: usize,
    },
    /// The tab already sits at the requested slot.
    Unchanged,
}

/// Result of [`PaneTree::split_pane`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitOutcome {
    Split { split_id: PaneId, new_pane: PaneId },
    /// The target pane was empty, so `tab` was opened in it instead.
    Filled { pane_id: PaneId },
    /// The pane's only tab cannot be split off from itself.
    Unchanged,
}

/// Validated panel tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneTree {
    pub(crate) root: PaneId,
    pub(crate) next_id: PaneId,
    pub(crate) nodes: BTreeMap<PaneId, PaneNode>,
}

impl Default for PaneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneTree {
    /// A tree with one empty root pane.
    #[must_use]
    pub fn new() -> Self {
        let root = PaneId::MIN;
        let mut nodes = BTreeMap::new();
        let _ = nodes.insert(root, PaneNode::leaf(root, None, PaneLeaf::default()));
        Self {
            root,
            next_id: root.checked_next().unwrap_or(root),
            nodes,
        }
    }

    #[must_use]
    pub const fn root(&self) -> PaneId {
        self.root
    }

    /// Next id the tree will allocate.
    #[must_use]
    pub const fn next_id(&self) -> PaneId {
        self.next_id
    }

    #[must_use]
    pub fn node(&self, id: PaneId) -> Option<&PaneNode> {
        self.nodes.get(&id)
    }

    /// Iterate nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &PaneNode> {
        self.nodes.values()
    }

    #[must_use]
    pub fn leaf(&self, id: PaneId) -> Option<&PaneLeaf> {
        self.nodes.get(&id).and_then(PaneNode::as_leaf)
    }

    #[must_use]
    pub fn split(&self, id: PaneId) -> Option<&PaneSplit> {
        self.nodes.get(&id).and_then(PaneNode::as_split)
    }

    /// Leaf panes in depth-first (visual reading) order.
    #[must_use]
    pub fn leaves(&self) -> Vec<PaneId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(node_id) = stack.pop() {
            match self.nodes.get(&node_id).map(|node| &node.kind) {
                Some(PaneNodeKind::Leaf(_)) => out.push(node_id),
                Some(PaneNodeKind::Split(split)) => {
                    stack.extend(split.children.iter().rev().map(|child| child.node));
                }
                None => {}
            }
        }
        out
    }

    /// Pane and index holding `tab_id`.
    #[must_use]
    pub fn locate_tab(&self, tab_id: TabId) -> Option<(PaneId, usize)> {
        self.nodes.values().find_map(|node| {
            let leaf = node.as_leaf()?;
            leaf.position(tab_id).map(|index| (node.id, index))
        })
    }

    #[must_use]
    pub fn tab(&self, tab_id: TabId) -> Option<&TabRef> {
        let (pane_id, index) = self.locate_tab(tab_id)?;
        self.leaf(pane_id)?.tabs.get(index)
    }

    /// Total number of open tabs.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.nodes
            .values()
            .filter_map(PaneNode::as_leaf)
            .map(|leaf| leaf.tabs.len())
            .sum()
    }

    /// Validate every structural invariant.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        validate_tree(self.root, self.next_id, &self.nodes)
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert `tab` into pane `pane_id` at `index` (clamped) and activate it.
    ///
    /// Returns the index the tab landed at.
    pub fn insert_tab(
        &mut self,
        pane_id: PaneId,
        tab: TabRef,
        index: usize,
    ) -> Result<usize, LayoutError> {
        if self.locate_tab(tab.id).is_some() {
            return Err(LayoutError::DuplicateTab { tab_id: tab.id });
        }
        self.transact(|tree| tree.insert_unchecked(pane_id, tab, index))
    }

    /// Remove a tab, reassigning the active tab and pruning the pane if it
    /// empties (the root pane is kept, empty).
    pub fn remove_tab(&mut self, tab_id: TabId) -> Result<RemovedTab, LayoutError> {
        self.transact(|tree| tree.detach_tab(tab_id))
    }

    /// Move a tab to `index` of `target` (index in pre-removal coordinates).
    pub fn move_tab(
        &mut self,
        tab_id: TabId,
        target: PaneId,
        index: usize,
    ) -> Result<MoveOutcome, LayoutError> {
        let (source, from) = self
            .locate_tab(tab_id)
            .ok_or(LayoutError::TabNotFound { tab_id })?;
        let target_len = self
            .leaf(target)
            .ok_or(LayoutError::PaneNotFound { pane_id: target })?
            .tabs
            .len();

        let requested = index.min(target_len);
        if source == target {
            if requested == from || requested == from + 1 {
                return Ok(MoveOutcome::Unchanged);
            }
            let landing = if requested > from {
                requested - 1
            } else {
                requested
            };
            return self.transact(|tree| {
                let leaf = tree.leaf_mut(target)?;
                let tab = leaf.tabs.remove(from);
                leaf.tabs.insert(landing, tab);
                leaf.active = Some(tab_id);
                leaf.sync_active_flags();
                Ok(MoveOutcome::Moved {
                    from: source,
                    to: target,
                    index: landing,
                })
            });
        }

        self.transact(|tree| {
            let removed = tree.detach_tab(tab_id)?;
            let landed = tree.insert_unchecked(target, removed.tab, requested)?;
            Ok(MoveOutcome::Moved {
                from: source,
                to: target,
                index: landed,
            })
        })
    }

    /// Replace leaf `pane_id` with a split holding the original pane and a
    /// new pane containing `tab`, at ratio 0.5 each.
    ///
    /// If `tab` is already open it is moved out of its current pane first,
    /// keeping its dirty/lock flags. An empty pane has nothing to split off,
    /// so `tab` is opened in it directly.
    pub fn split_pane(
        &mut self,
        pane_id: PaneId,
        side: SplitSide,
        tab: TabRef,
    ) -> Result<SplitOutcome, LayoutError> {
        let target_len = self
            .leaf(pane_id)
            .ok_or(LayoutError::PaneNotFound { pane_id })?
            .tabs
            .len();
        let existing = self.locate_tab(tab.id);
        if matches!(existing, Some((source, _)) if source == pane_id) && target_len == 1 {
            return Ok(SplitOutcome::Unchanged);
        }
        if target_len == 0 {
            return self.transact(|tree| {
                let tab = match existing {
                    Some(_) => tree.detach_tab(tab.id)?.tab,
                    None => tab,
                };
                let _ = tree.insert_unchecked(pane_id, tab, usize::MAX)?;
                Ok(SplitOutcome::Filled { pane_id })
            });
        }

        self.transact(|tree| {
            let tab = match existing {
                Some(_) => tree.detach_tab(tab.id)?.tab,
                None => tab,
            };
            let target_parent = tree
                .nodes
                .get(&pane_id)
                .ok_or(LayoutError::PaneNotFound { pane_id })?
                .parent;

            let split_id = tree.allocate_id()?;
            let new_pane = tree.allocate_id()?;
            let existing_child = SplitChild {
                node: pane_id,
                ratio: 0.5,
            };
            let incoming_child = SplitChild {
                node: new_pane,
                ratio: 0.5,
            };
            let children = if side.incoming_first() {
                vec![incoming_child, existing_child]
            } else {
                vec![existing_child, incoming_child]
            };

            let _ = tree.nodes.insert(
                new_pane,
                PaneNode::leaf(new_pane, Some(split_id), PaneLeaf::with_tab(tab)),
            );
            let _ = tree.nodes.insert(
                split_id,
                PaneNode::split(
                    split_id,
                    target_parent,
                    PaneSplit {
                        axis: side.axis(),
                        children,
                    },
                ),
            );
            if let Some(node) = tree.nodes.get_mut(&pane_id) {
                node.parent = Some(split_id);
            }
            match target_parent {
                Some(parent_id) => tree.replace_child(parent_id, pane_id, split_id)?,
                None => tree.root = split_id,
            }

            Ok(SplitOutcome::Split { split_id, new_pane })
        })
    }

    /// Make `tab_id` the active tab of `pane_id`. Returns whether it changed.
    pub fn set_active_tab(&mut self, pane_id: PaneId, tab_id: TabId) -> Result<bool, LayoutError> {
        let leaf = self
            .leaf(pane_id)
            .ok_or(LayoutError::PaneNotFound { pane_id })?;
        if leaf.position(tab_id).is_none() {
            return Err(LayoutError::TabNotFound { tab_id });
        }
        if leaf.active == Some(tab_id) {
            return Ok(false);
        }
        self.transact(|tree| {
            let leaf = tree.leaf_mut(pane_id)?;
            leaf.active = Some(tab_id);
            leaf.sync_active_flags();
            Ok(true)
        })
    }

    /// Flip a tab's lock flag. Returns the new state.
    pub fn toggle_lock(&mut self, tab_id: TabId) -> Result<bool, LayoutError> {
        self.transact(|tree| {
            let tab = tree.tab_mut(tab_id)?;
            tab.is_locked = !tab.is_locked;
            Ok(tab.is_locked)
        })
    }

    /// Set a tab's dirty flag. Returns whether it changed.
    pub fn set_dirty(&mut self, tab_id: TabId, dirty: bool) -> Result<bool, LayoutError> {
        let current = self
            .tab(tab_id)
            .ok_or(LayoutError::TabNotFound { tab_id })?
            .is_dirty;
        if current == dirty {
            return Ok(false);
        }
        self.transact(|tree| {
            tree.tab_mut(tab_id)?.is_dirty = dirty;
            Ok(true)
        })
    }

    /// Replace every ratio of split `split_id`.
    pub fn set_split_ratios(&mut self, split_id: PaneId, ratios: &[f64]) -> Result<(), LayoutError> {
        self.transact(|tree| {
            let split = tree.split_mut(split_id)?;
            if split.children.len() != ratios.len() {
                return Err(InvariantViolation::RatioCountMismatch {
                    split_id,
                    expected: split.children.len(),
                    actual: ratios.len(),
                }
                .into());
            }
            for (child, ratio) in split.children.iter_mut().zip(ratios) {
                child.ratio = *ratio;
            }
            Ok(())
        })
    }

    /// Close every unlocked tab sharing a pane with `tab_id`, except itself.
    ///
    /// `tab_id` becomes the active tab. Returns the closed tabs.
    pub fn close_other_tabs(&mut self, tab_id: TabId) -> Result<Vec<TabRef>, LayoutError> {
        let (pane_id, _) = self
            .locate_tab(tab_id)
            .ok_or(LayoutError::TabNotFound { tab_id })?;
        self.transact(|tree| {
            let leaf = tree.leaf_mut(pane_id)?;
            let (kept, closed): (Vec<TabRef>, Vec<TabRef>) = std::mem::take(&mut leaf.tabs)
                .into_iter()
                .partition(|tab| tab.id == tab_id || tab.is_locked);
            leaf.tabs = kept;
            leaf.active = Some(tab_id);
            leaf.sync_active_flags();
            Ok(closed)
        })
    }

    // ---------------------------------------------------------------------
    // Layout
    // ---------------------------------------------------------------------

    /// Solve pixel rectangles for every node inside `area`.
    #[must_use]
    pub fn solve_layout(&self, area: Rect) -> PaneLayout {
        let mut layout = PaneLayout {
            area,
            rects: BTreeMap::new(),
            leaves: Vec::new(),
        };
        self.solve_node(self.root, area, &mut layout);
        layout
    }

    fn solve_node(&self, node_id: PaneId, area: Rect, layout: &mut PaneLayout) {
        let Some(node) = self.nodes.get(&node_id) else {
            return;
        };
        let _ = layout.rects.insert(node_id, area);

        let split = match &node.kind {
            PaneNodeKind::Leaf(_) => {
                layout.leaves.push(node_id);
                return;
            }
            PaneNodeKind::Split(split) => split,
        };

        let available = split.axis.extent(area);
        let mut offset = 0.0;
        let last = split.children.len().saturating_sub(1);
        for (index, child) in split.children.iter().enumerate() {
            let size = if index == last {
                available - offset
            } else {
                available * child.ratio
            };
            let child_area = match split.axis {
                SplitAxis::Horizontal => Rect::new(area.x + offset, area.y, size, area.height),
                SplitAxis::Vertical => Rect::new(area.x, area.y + offset, area.width, size),
            };
            offset += size;
            self.solve_node(child.node, child_area, layout);
        }
    }

    // ---------------------------------------------------------------------
    // Diagnostics
    // ---------------------------------------------------------------------

    /// Deterministic structural hash of the current tree state.
    ///
    /// Intended for operation logs and replay diagnostics.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
            for byte in bytes {
                *hash ^= u64::from(*byte);
                *hash = hash.wrapping_mul(PRIME);
            }
        }

        fn mix_u64(hash: &mut u64, value: u64) {
            mix_bytes(hash, &value.to_le_bytes());
        }

        let mut hash = OFFSET_BASIS;
        mix_u64(&mut hash, self.root.get());
        mix_u64(&mut hash, self.next_id.get());
        mix_u64(&mut hash, self.nodes.len() as u64);

        for node in self.nodes.values() {
            mix_u64(&mut hash, node.id.get());
            mix_u64(&mut hash, node.parent.map_or(0, PaneId::get));
            match &node.kind {
                PaneNodeKind::Leaf(leaf) => {
                    mix_bytes(&mut hash, &[1]);
                    mix_u64(&mut hash, leaf.active.map_or(0, TabId::get));
                    mix_u64(&mut hash, leaf.tabs.len() as u64);
                    for tab in &leaf.tabs {
                        mix_u64(&mut hash, tab.id.get());
                        mix_u64(&mut hash, tab.document_id.get());
                        mix_bytes(
                            &mut hash,
                            &[
                                u8::from(tab.is_dirty),
                                u8::from(tab.is_locked),
                                u8::from(tab.is_active),
                            ],
                        );
                    }
                }
                PaneNodeKind::Split(split) => {
                    let axis_byte = match split.axis {
                        SplitAxis::Horizontal => 2,
                        SplitAxis::Vertical => 3,
                    };
                    mix_bytes(&mut hash, &[axis_byte]);
                    mix_u64(&mut hash, split.children.len() as u64);
                    for child in &split.children {
                        mix_u64(&mut hash, child.node.get());
                        mix_u64(&mut hash, child.ratio.to_bits());
                    }
                }
            }
        }

        hash
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    /// Run `op` on a working copy; publish it only if it validates.
    fn transact<R>(
        &mut self,
        op: impl FnOnce(&mut PaneTree) -> Result<R, LayoutError>,
    ) -> Result<R, LayoutError> {
        let mut working = self.clone();
        let result = op(&mut working)?;
        if let Err(violation) = working.validate() {
            error!(
                %violation,
                before_hash = self.state_hash(),
                "panel tree mutation aborted: invariant violated"
            );
            return Err(violation.into());
        }
        *self = working;
        Ok(result)
    }

    fn allocate_id(&mut self) -> Result<PaneId, LayoutError> {
        let current = self.next_id;
        self.next_id = current.checked_next()?;
        Ok(current)
    }

    fn leaf_mut(&mut self, pane_id: PaneId) -> Result<&mut PaneLeaf, LayoutError> {
        match self.nodes.get_mut(&pane_id).map(|node| &mut node.kind) {
            Some(PaneNodeKind::Leaf(leaf)) => Ok(leaf),
            _ => Err(LayoutError::PaneNotFound { pane_id }),
        }
    }

    fn split_mut(&mut self, split_id: PaneId) -> Result<&mut PaneSplit, LayoutError> {
        match self.nodes.get_mut(&split_id).map(|node| &mut node.kind) {
            Some(PaneNodeKind::Split(split)) => Ok(split),
            _ => Err(LayoutError::PaneNotFound { pane_id: split_id }),
        }
    }

    fn tab_mut(&mut self, tab_id: TabId) -> Result<&mut TabRef, LayoutError> {
        let (pane_id, index) = self
            .locate_tab(tab_id)
            .ok_or(LayoutError::TabNotFound { tab_id })?;
        self.leaf_mut(pane_id)?
            .tabs
            .get_mut(index)
            .ok_or(LayoutError::TabNotFound { tab_id })
    }

    fn insert_unchecked(
        &mut self,
        pane_id: PaneId,
        tab: TabRef,
        index: usize,
    ) -> Result<usize, LayoutError> {
        let leaf = self.leaf_mut(pane_id)?;
        let index = index.min(leaf.tabs.len());
        leaf.active = Some(tab.id);
        leaf.tabs.insert(index, tab);
        leaf.sync_active_flags();
        Ok(index)
    }

    fn detach_tab(&mut self, tab_id: TabId) -> Result<RemovedTab, LayoutError> {
        let (pane_id, index) = self
            .locate_tab(tab_id)
            .ok_or(LayoutError::TabNotFound { tab_id })?;
        let leaf = self.leaf_mut(pane_id)?;
        let mut tab = leaf.tabs.remove(index);
        tab.is_active = false;
        if leaf.active == Some(tab_id) {
            let next_active = index
                .checked_sub(1)
                .and_then(|left| leaf.tabs.get(left))
                .or_else(|| leaf.tabs.first())
                .map(|next| next.id);
            leaf.active = next_active;
        }
        leaf.sync_active_flags();

        let pruned = leaf.tabs.is_empty() && pane_id != self.root;
        if pruned {
            self.prune_leaf(pane_id)?;
        }
        Ok(RemovedTab {
            tab,
            pane_id,
            pruned,
        })
    }

    /// Remove an empty non-root leaf; collapse its parent if one child remains.
    fn prune_leaf(&mut self, pane_id: PaneId) -> Result<(), LayoutError> {
        let parent_id = self
            .nodes
            .remove(&pane_id)
            .and_then(|node| node.parent)
            .ok_or(LayoutError::PaneNotFound { pane_id })?;

        let split = self.split_mut(parent_id)?;
        split.children.retain(|child| child.node != pane_id);
        let total: f64 = split.children.iter().map(|child| child.ratio).sum();
        if total > 0.0 {
            for child in &mut split.children {
                child.ratio /= total;
            }
        }

        if let [survivor] = split.children.as_slice() {
            let survivor = survivor.node;
            self.collapse_split(parent_id, survivor)?;
        }
        Ok(())
    }

    /// Replace a single-child split with its remaining child.
    fn collapse_split(&mut self, split_id: PaneId, survivor: PaneId) -> Result<(), LayoutError> {
        let grandparent = self
            .nodes
            .remove(&split_id)
            .ok_or(LayoutError::PaneNotFound { pane_id: split_id })?
            .parent;
        if let Some(node) = self.nodes.get_mut(&survivor) {
            node.parent = grandparent;
        }
        match grandparent {
            Some(grandparent) => self.replace_child(grandparent, split_id, survivor),
            None => {
                self.root = survivor;
                Ok(())
            }
        }
    }

    fn replace_child(
        &mut self,
        parent_id: PaneId,
        old: PaneId,
        new: PaneId,
    ) -> Result<(), LayoutError> {
        let split = self.split_mut(parent_id)?;
        let child = split
            .children
            .iter_mut()
            .find(|child| child.node == old)
            .ok_or(InvariantViolation::MissingChild {
                parent: parent_id,
                child: old,
            })?;
        child.node = new;
        Ok(())
    }
}

/// Solved pixel rectangles for a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneLayout {
    pub area: Rect,
    rects: BTreeMap<PaneId, Rect>,
    leaves: Vec<PaneId>,
}

impl PaneLayout {
    /// Rectangle of any node (leaf or split).
    #[must_use]
    pub fn rect(&self, node_id: PaneId) -> Option<Rect> {
        self.rects.get(&node_id).copied()
    }

    /// Iterate all solved rectangles in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PaneId, Rect)> + '_ {
        self.rects.iter().map(|(node_id, rect)| (*node_id, *rect))
    }

    /// The leaf pane under `point`, if any.
    #[must_use]
    pub fn pane_at(&self, point: Point) -> Option<PaneId> {
        self.leaves
            .iter()
            .copied()
            .find(|pane_id| self.rect(*pane_id).is_some_and(|rect| rect.contains(point)))
    }
}

pub(crate) fn validate_tree(
    root: PaneId,
    next_id: PaneId,
    nodes: &BTreeMap<PaneId, PaneNode>,
) -> Result<(), InvariantViolation> {
    let Some(root_node) = nodes.get(&root) else {
        return Err(InvariantViolation::MissingRoot { root });
    };
    if let Some(parent) = root_node.parent {
        return Err(InvariantViolation::RootHasParent { root, parent });
    }

    if nodes.keys().any(|node_id| node_id.get() == 0) {
        return Err(InvariantViolation::ZeroNodeId);
    }
    let max_existing = nodes.keys().next_back().copied().unwrap_or(root);
    if next_id <= max_existing {
        return Err(InvariantViolation::NextIdNotGreaterThanExisting {
            next_id,
            max_existing,
        });
    }

    let mut expected_parents = BTreeMap::new();
    let mut seen_tabs = BTreeSet::new();

    for node in nodes.values() {
        match &node.kind {
            PaneNodeKind::Split(split) => validate_split(node.id, split, nodes, &mut expected_parents)?,
            PaneNodeKind::Leaf(leaf) => {
                validate_leaf(node.id, node.id == root, leaf, &mut seen_tabs)?;
            }
        }
    }

    for node in nodes.values() {
        let expected = expected_parents.get(&node.id).copied();
        if node.parent != expected {
            return Err(InvariantViolation::ParentMismatch {
                node_id: node.id,
                expected,
                actual: node.parent,
            });
        }
    }

    let mut visiting = BTreeSet::new();
    let mut visited = BTreeSet::new();
    dfs_validate(root, nodes, &mut visiting, &mut visited)?;

    if visited.len() != nodes.len()
        && let Some(node_id) = nodes.keys().find(|node_id| !visited.contains(node_id))
    {
        return Err(InvariantViolation::UnreachableNode { node_id: *node_id });
    }

    Ok(())
}

fn validate_split(
    split_id: PaneId,
    split: &PaneSplit,
    nodes: &BTreeMap<PaneId, PaneNode>,
    expected_parents: &mut BTreeMap<PaneId, PaneId>,
) -> Result<(), InvariantViolation> {
    if split.children.len() < 2 {
        return Err(InvariantViolation::SplitTooFewChildren {
            split_id,
            children: split.children.len(),
        });
    }

    let mut sum = 0.0;
    for (index, child) in split.children.iter().enumerate() {
        if !child.ratio.is_finite() || child.ratio <= 0.0 || child.ratio > 1.0 + RATIO_EPSILON {
            return Err(InvariantViolation::RatioOutOfRange {
                split_id,
                index,
                ratio: child.ratio,
            });
        }
        sum += child.ratio;

        if !nodes.contains_key(&child.node) {
            return Err(InvariantViolation::MissingChild {
                parent: split_id,
                child: child.node,
            });
        }
        if let Some(first_parent) = expected_parents.insert(child.node, split_id) {
            return Err(InvariantViolation::ParentMismatch {
                node_id: child.node,
                expected: Some(first_parent),
                actual: Some(split_id),
            });
        }
    }

    if (sum - 1.0).abs() > RATIO_EPSILON {
        return Err(InvariantViolation::RatioSumMismatch { split_id, sum });
    }
    Ok(())
}

fn validate_leaf(
    pane_id: PaneId,
    is_root: bool,
    leaf: &PaneLeaf,
    seen_tabs: &mut BTreeSet<TabId>,
) -> Result<(), InvariantViolation> {
    if leaf.tabs.is_empty() && !is_root {
        return Err(InvariantViolation::EmptyNonRootLeaf { pane_id });
    }
    match leaf.active {
        None if !leaf.tabs.is_empty() => {
            return Err(InvariantViolation::ActiveTabUnset { pane_id });
        }
        Some(tab_id) if leaf.position(tab_id).is_none() => {
            return Err(InvariantViolation::ActiveTabMissing { pane_id, tab_id });
        }
        _ => {}
    }
    for tab in &leaf.tabs {
        if !seen_tabs.insert(tab.id) {
            return Err(InvariantViolation::DuplicateTab { tab_id: tab.id });
        }
        if tab.is_active != (leaf.active == Some(tab.id)) {
            return Err(InvariantViolation::ActiveFlagMismatch {
                pane_id,
                tab_id: tab.id,
            });
        }
    }
    Ok(())
}

fn dfs_validate(
    node_id: PaneId,
    nodes: &BTreeMap<PaneId, PaneNode>,
    visiting: &mut BTreeSet<PaneId>,
    visited: &mut BTreeSet<PaneId>,
) -> Result<(), InvariantViolation> {
    if visiting.contains(&node_id) {
        return Err(InvariantViolation::CycleDetected { node_id });
    }
    if !visited.insert(node_id) {
        return Ok(());
    }
    let _ = visiting.insert(node_id);
    if let Some(PaneSplit { children, .. }) = nodes.get(&node_id).and_then(PaneNode::as_split) {
        for child in children {
            dfs_validate(child.node, nodes, visiting, visited)?;
        }
    }
    let _ = visiting.remove(&node_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::DocumentId;

    fn tab(raw: u64) -> TabRef {
        TabRef::new(
            TabId::new(raw).expect("test tab id must be non-zero"),
            DocumentId::new(raw).expect("test document id must be non-zero"),
        )
    }

    fn tid(raw: u64) -> TabId {
        TabId::new(raw).expect("test tab id must be non-zero")
    }

    fn tab_ids(tree: &PaneTree, pane_id: PaneId) -> Vec<u64> {
        tree.leaf(pane_id)
            .expect("pane should exist")
            .tabs
            .iter()
            .map(|tab| tab.id.get())
            .collect()
    }

    fn active(tree: &PaneTree, pane_id: PaneId) -> Option<u64> {
        tree.leaf(pane_id)
            .expect("pane should exist")
            .active
            .map(TabId::get)
    }

    fn assert_ratio_sums(tree: &PaneTree) {
        for node in tree.nodes() {
            if let Some(split) = node.as_split() {
                let sum: f64 = split.children.iter().map(|child| child.ratio).sum();
                assert!(
                    (sum - 1.0).abs() <= RATIO_EPSILON,
                    "split {} ratios sum to {sum}",
                    node.id
                );
            }
        }
    }

    /// Root pane with tabs 1..=count.
    fn root_with_tabs(count: u64) -> PaneTree {
        let mut tree = PaneTree::new();
        for raw in 1..=count {
            tree.insert_tab(tree.root(), tab(raw), usize::MAX)
                .expect("insert should succeed");
        }
        tree
    }

    #[test]
    fn new_tree_is_single_empty_root() {
        let tree = PaneTree::new();
        assert_eq!(tree.leaves(), vec![tree.root()]);
        assert_eq!(tree.tab_count(), 0);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn insert_clamps_index_and_activates() {
        let mut tree = root_with_tabs(2);
        let root = tree.root();
        let landed = tree.insert_tab(root, tab(3), 99).expect("insert");
        assert_eq!(landed, 2);
        let landed = tree.insert_tab(root, tab(4), 0).expect("insert");
        assert_eq!(landed, 0);
        assert_eq!(tab_ids(&tree, root), vec![4, 1, 2, 3]);
        assert_eq!(active(&tree, root), Some(4));
        let flags: Vec<bool> = tree.leaf(root).expect("root").tabs.iter().map(|t| t.is_active).collect();
        assert_eq!(flags, vec![true, false, false, false]);
    }

    #[test]
    fn insert_into_unknown_or_split_pane_fails() {
        let mut tree = root_with_tabs(2);
        let missing = PaneId::new(77).expect("non-zero");
        assert_eq!(
            tree.insert_tab(missing, tab(9), 0),
            Err(LayoutError::PaneNotFound { pane_id: missing })
        );

        let SplitOutcome::Split { split_id, .. } = tree
            .split_pane(tree.root(), SplitSide::Right, tab(5))
            .expect("split")
        else {
            panic!("expected a split");
        };
        assert_eq!(
            tree.insert_tab(split_id, tab(9), 0),
            Err(LayoutError::PaneNotFound { pane_id: split_id })
        );
    }

    #[test]
    fn duplicate_tab_is_rejected() {
        let mut tree = root_with_tabs(1);
        let before = tree.clone();
        assert_eq!(
            tree.insert_tab(tree.root(), tab(1), 0),
            Err(LayoutError::DuplicateTab { tab_id: tid(1) })
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn removing_active_tab_prefers_left_neighbour() {
        let mut tree = root_with_tabs(3);
        let root = tree.root();
        tree.set_active_tab(root, tid(2)).expect("activate");

        tree.remove_tab(tid(2)).expect("remove");
        assert_eq!(active(&tree, root), Some(1));

        tree.set_active_tab(root, tid(1)).expect("activate");
        tree.remove_tab(tid(1)).expect("remove");
        assert_eq!(active(&tree, root), Some(3), "falls back to first tab");

        let removed = tree.remove_tab(tid(3)).expect("remove");
        assert_eq!(active(&tree, root), None);
        assert!(!removed.pruned, "root pane is kept even when empty");
        assert_eq!(tree.leaves(), vec![root]);
    }

    #[test]
    fn removing_inactive_tab_keeps_active() {
        let mut tree = root_with_tabs(3);
        let root = tree.root();
        tree.remove_tab(tid(1)).expect("remove");
        assert_eq!(active(&tree, root), Some(3));
    }

    #[test]
    fn remove_unknown_tab_fails() {
        let mut tree = root_with_tabs(1);
        assert_eq!(
            tree.remove_tab(tid(8)),
            Err(LayoutError::TabNotFound { tab_id: tid(8) })
        );
    }

    #[test]
    fn pruning_promotes_sibling_subtree_unchanged() {
        // root split: [left leaf(1) | right split (top leaf(2) / bottom leaf(3))]
        let mut tree = root_with_tabs(1);
        let left = tree.root();
        let SplitOutcome::Split { new_pane: right, .. } = tree
            .split_pane(left, SplitSide::Right, tab(2))
            .expect("split right")
        else {
            panic!("expected a split");
        };
        let SplitOutcome::Split {
            split_id: right_split,
            new_pane: bottom,
        } = tree
            .split_pane(right, SplitSide::Bottom, tab(3))
            .expect("split bottom")
        else {
            panic!("expected a split");
        };
        let subtree_before: Vec<PaneNode> = [right_split, right, bottom]
            .iter()
            .map(|id| tree.node(*id).expect("node").clone())
            .collect();

        let removed = tree.remove_tab(tid(1)).expect("remove");
        assert!(removed.pruned);
        assert_eq!(tree.root(), right_split);
        assert!(tree.node(left).is_none());

        let root_node = tree.node(right_split).expect("promoted");
        assert_eq!(root_node.parent, None);
        assert_eq!(root_node.kind, subtree_before[0].kind);
        assert_eq!(tree.node(right), Some(&subtree_before[1]));
        assert_eq!(tree.node(bottom), Some(&subtree_before[2]));
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn pruning_from_three_children_renormalizes() {
        let mut tree = root_with_tabs(1);
        let first = tree.root();
        let SplitOutcome::Split { split_id, new_pane } = tree
            .split_pane(first, SplitSide::Right, tab(2))
            .expect("split")
        else {
            panic!("expected a split");
        };
        // Hand-build a third child through a snapshot round trip.
        let mut snapshot = tree.to_snapshot();
        let third = snapshot.next_id;
        snapshot.next_id = third.checked_next().expect("next");
        for node in &mut snapshot.nodes {
            if let PaneNodeKind::Split(split) = &mut node.kind {
                split.children = vec![
                    SplitChild { node: first, ratio: 0.5 },
                    SplitChild { node: new_pane, ratio: 0.25 },
                    SplitChild { node: third, ratio: 0.25 },
                ];
            }
        }
        snapshot
            .nodes
            .push(PaneNode::leaf(third, Some(split_id), PaneLeaf::with_tab(tab(3))));
        let mut tree = PaneTree::from_snapshot(snapshot).expect("valid three-way split");

        tree.remove_tab(tid(1)).expect("remove");
        let split = tree.split(split_id).expect("split survives with two children");
        assert_eq!(split.ratios(), vec![0.5, 0.5]);
        assert_ratio_sums(&tree);
    }

    #[test]
    fn reorder_within_pane_uses_pre_removal_index() {
        let mut tree = root_with_tabs(3);
        let root = tree.root();

        let outcome = tree.move_tab(tid(1), root, 2).expect("move");
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: root,
                to: root,
                index: 1
            }
        );
        assert_eq!(tab_ids(&tree, root), vec![2, 1, 3]);

        tree.move_tab(tid(3), root, 0).expect("move");
        assert_eq!(tab_ids(&tree, root), vec![3, 2, 1]);
        assert_eq!(active(&tree, root), Some(3));
    }

    #[test]
    fn drop_on_own_slot_is_noop() {
        let mut tree = root_with_tabs(3);
        let root = tree.root();
        let before = tree.clone();
        assert_eq!(tree.move_tab(tid(2), root, 1), Ok(MoveOutcome::Unchanged));
        assert_eq!(tree.move_tab(tid(2), root, 2), Ok(MoveOutcome::Unchanged));
        assert_eq!(tree, before);
    }

    #[test]
    fn move_to_unknown_pane_leaves_tree_unchanged() {
        let mut tree = root_with_tabs(2);
        let before = tree.clone();
        let missing = PaneId::new(50).expect("non-zero");
        assert_eq!(
            tree.move_tab(tid(1), missing, 0),
            Err(LayoutError::PaneNotFound { pane_id: missing })
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn move_and_move_back_restores_tree() {
        let mut tree = root_with_tabs(3);
        let left = tree.root();
        let SplitOutcome::Split { new_pane: right, .. } = tree
            .split_pane(left, SplitSide::Right, tab(10))
            .expect("split")
        else {
            panic!("expected a split");
        };
        tree.set_active_tab(left, tid(2)).expect("activate");
        let before = tree.clone();

        tree.move_tab(tid(2), right, 1).expect("move out");
        assert_eq!(tab_ids(&tree, left), vec![1, 3]);
        assert_eq!(tab_ids(&tree, right), vec![10, 2]);

        tree.move_tab(tid(2), left, 1).expect("move back");
        assert_eq!(tree, before);
    }

    #[test]
    fn moving_last_tab_prunes_source() {
        let mut tree = root_with_tabs(1);
        let left = tree.root();
        let SplitOutcome::Split { new_pane: right, .. } = tree
            .split_pane(left, SplitSide::Right, tab(2))
            .expect("split")
        else {
            panic!("expected a split");
        };
        tree.move_tab(tid(2), left, 0).expect("move");
        assert_eq!(tree.root(), left);
        assert!(tree.node(right).is_none());
        assert_eq!(tab_ids(&tree, left), vec![2, 1]);
    }

    #[test]
    fn split_left_places_new_pane_first() {
        let mut tree = root_with_tabs(2);
        let original = tree.root();
        let SplitOutcome::Split { split_id, new_pane } = tree
            .split_pane(original, SplitSide::Left, tab(3))
            .expect("split")
        else {
            panic!("expected a split");
        };
        let split = tree.split(split_id).expect("split node");
        assert_eq!(split.axis, SplitAxis::Horizontal);
        assert_eq!(
            split.children,
            vec![
                SplitChild { node: new_pane, ratio: 0.5 },
                SplitChild { node: original, ratio: 0.5 },
            ]
        );
        assert_eq!(tree.root(), split_id);
        assert_eq!(active(&tree, new_pane), Some(3));
    }

    #[test]
    fn split_bottom_places_new_pane_second() {
        let mut tree = root_with_tabs(1);
        let original = tree.root();
        let SplitOutcome::Split { split_id, new_pane } = tree
            .split_pane(original, SplitSide::Bottom, tab(2))
            .expect("split")
        else {
            panic!("expected a split");
        };
        let split = tree.split(split_id).expect("split node");
        assert_eq!(split.axis, SplitAxis::Vertical);
        assert_eq!(split.children[1].node, new_pane);
    }

    #[test]
    fn split_then_remove_collapses_to_original() {
        let mut tree = root_with_tabs(3);
        let original = tree.root();
        let leaf_before = tree.leaf(original).cloned();

        tree.split_pane(original, SplitSide::Right, tab(9))
            .expect("split");
        tree.remove_tab(tid(9)).expect("remove");

        assert_eq!(tree.root(), original);
        assert_eq!(tree.leaves(), vec![original]);
        assert_eq!(tree.leaf(original).cloned(), leaf_before);
        assert_eq!(tree.nodes().count(), 1);
    }

    #[test]
    fn splitting_a_pane_with_its_only_tab_is_noop() {
        let mut tree = root_with_tabs(1);
        let before = tree.clone();
        let outcome = tree
            .split_pane(tree.root(), SplitSide::Right, tab(1))
            .expect("split");
        assert_eq!(outcome, SplitOutcome::Unchanged);
        assert_eq!(tree, before);
    }

    #[test]
    fn splitting_the_empty_root_opens_the_tab_in_place() {
        let mut tree = PaneTree::new();
        let root = tree.root();
        let outcome = tree
            .split_pane(root, SplitSide::Right, tab(1))
            .expect("split on empty root");
        assert_eq!(outcome, SplitOutcome::Filled { pane_id: root });
        assert_eq!(tree.leaves(), vec![root]);
        assert_eq!(tab_ids(&tree, root), vec![1]);
        assert_eq!(active(&tree, root), Some(1));
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn splitting_with_existing_tab_moves_it_and_keeps_flags() {
        let mut tree = root_with_tabs(2);
        let root = tree.root();
        tree.set_dirty(tid(2), true).expect("dirty");

        let SplitOutcome::Split { new_pane, .. } = tree
            .split_pane(root, SplitSide::Top, tab(2))
            .expect("split")
        else {
            panic!("expected a split");
        };
        assert_eq!(tab_ids(&tree, root), vec![1]);
        let moved = tree.tab(tid(2)).expect("moved tab");
        assert!(moved.is_dirty);
        assert!(moved.is_active);
        assert_eq!(tree.locate_tab(tid(2)), Some((new_pane, 0)));
    }

    #[test]
    fn set_active_tab_checks_existence() {
        let mut tree = root_with_tabs(2);
        let root = tree.root();
        assert_eq!(tree.set_active_tab(root, tid(1)), Ok(true));
        assert_eq!(tree.set_active_tab(root, tid(1)), Ok(false));
        assert_eq!(
            tree.set_active_tab(root, tid(7)),
            Err(LayoutError::TabNotFound { tab_id: tid(7) })
        );
    }

    #[test]
    fn lock_and_dirty_flags() {
        let mut tree = root_with_tabs(1);
        assert_eq!(tree.toggle_lock(tid(1)), Ok(true));
        assert_eq!(tree.toggle_lock(tid(1)), Ok(false));
        assert_eq!(tree.set_dirty(tid(1), true), Ok(true));
        assert_eq!(tree.set_dirty(tid(1), true), Ok(false));
        assert_eq!(
            tree.toggle_lock(tid(4)),
            Err(LayoutError::TabNotFound { tab_id: tid(4) })
        );
    }

    #[test]
    fn bad_ratios_are_rejected_without_mutation() {
        let mut tree = root_with_tabs(1);
        let SplitOutcome::Split { split_id, .. } = tree
            .split_pane(tree.root(), SplitSide::Right, tab(2))
            .expect("split")
        else {
            panic!("expected a split");
        };
        let before = tree.clone();

        let err = tree
            .set_split_ratios(split_id, &[0.5, 0.4])
            .expect_err("sum below 1 must fail");
        assert!(matches!(
            err,
            LayoutError::InvariantViolation(InvariantViolation::RatioSumMismatch { .. })
        ));
        assert!(!err.is_recoverable());

        let err = tree
            .set_split_ratios(split_id, &[1.0])
            .expect_err("count mismatch must fail");
        assert!(matches!(
            err,
            LayoutError::InvariantViolation(InvariantViolation::RatioCountMismatch { .. })
        ));
        assert_eq!(tree, before);

        tree.set_split_ratios(split_id, &[0.3, 0.7])
            .expect("valid ratios");
        assert_eq!(tree.split(split_id).expect("split").ratios(), vec![0.3, 0.7]);
    }

    #[test]
    fn close_others_keeps_locked_tabs() {
        let mut tree = root_with_tabs(4);
        let root = tree.root();
        tree.toggle_lock(tid(1)).expect("lock");
        let closed = tree.close_other_tabs(tid(3)).expect("close others");
        let closed_ids: Vec<u64> = closed.iter().map(|tab| tab.id.get()).collect();
        assert_eq!(closed_ids, vec![2, 4]);
        assert_eq!(tab_ids(&tree, root), vec![1, 3]);
        assert_eq!(active(&tree, root), Some(3));
    }

    #[test]
    fn solve_layout_divides_by_ratio() {
        let mut tree = root_with_tabs(1);
        let left = tree.root();
        let SplitOutcome::Split { split_id, new_pane } = tree
            .split_pane(left, SplitSide::Right, tab(2))
            .expect("split")
        else {
            panic!("expected a split");
        };
        tree.set_split_ratios(split_id, &[0.25, 0.75])
            .expect("ratios");

        let layout = tree.solve_layout(Rect::from_size(400.0, 300.0));
        assert_eq!(layout.rect(left), Some(Rect::new(0.0, 0.0, 100.0, 300.0)));
        assert_eq!(
            layout.rect(new_pane),
            Some(Rect::new(100.0, 0.0, 300.0, 300.0))
        );
        assert_eq!(layout.pane_at(Point::new(250.0, 10.0)), Some(new_pane));
        assert_eq!(layout.pane_at(Point::new(500.0, 10.0)), None);
    }

    #[test]
    fn leaves_follow_visual_order() {
        let mut tree = root_with_tabs(1);
        let original = tree.root();
        let SplitOutcome::Split { new_pane: left, .. } = tree
            .split_pane(original, SplitSide::Left, tab(2))
            .expect("split")
        else {
            panic!("expected a split");
        };
        let SplitOutcome::Split { new_pane: below, .. } = tree
            .split_pane(original, SplitSide::Bottom, tab(3))
            .expect("split")
        else {
            panic!("expected a split");
        };
        assert_eq!(tree.leaves(), vec![left, original, below]);
        assert_ratio_sums(&tree);
    }

    #[test]
    fn state_hash_tracks_mutations() {
        let mut tree = root_with_tabs(2);
        let clone = tree.clone();
        assert_eq!(tree.state_hash(), clone.state_hash());
        tree.set_dirty(tid(1), true).expect("dirty");
        assert_ne!(tree.state_hash(), clone.state_hash());
    }
}
