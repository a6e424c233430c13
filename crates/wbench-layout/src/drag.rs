//! Drag-and-drop session state machine.
//!
//! ```text
//! Idle --start_drag--> Dragging --end_drag--> Committing --> Idle
//!                         |  ^                      (one tree call)
//!                         |  '--update_drag / clear_hover
//!                         '--cancel_drag / end_drag without hover--> Idle
//! ```
//!
//! At most one [`DragSession`] exists at a time. Starting a drag while one is
//! active is rejected and leaves the existing session untouched. On drop the
//! final hover target is translated into exactly one [`PanelModel`] call;
//! the session is cleared before any tree error is returned, so a failed drop
//! (for example onto a pane closed mid-drag) still ends the drag.
//!
//! The platform drag event is reached only through [`DragTransfer`], which
//! the host implements over its native data-transfer object.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wbench_core::{Observers, Subscription};

use crate::drop_zone::{DropResolution, DropZone};
use crate::error::LayoutError;
use crate::ids::{PaneId, TabId};
use crate::model::PanelModel;
use crate::tree::{MoveOutcome, SplitOutcome, SplitSide};

/// MIME type under which a dragged tab is published to the platform.
pub const TAB_DRAG_MIME: &str = "application/x-wbench-tab";

/// Allowed drop effect advertised to the platform. Tabs only ever move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragEffect {
    Move,
}

impl DragEffect {
    /// Platform spelling (`effectAllowed` value).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
        }
    }
}

/// Host adapter over the platform drag event.
pub trait DragTransfer {
    fn set_data(&mut self, mime: &str, payload: &str);
    fn set_effect_allowed(&mut self, effect: DragEffect);
}

/// Data attached to the platform drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    pub tab_id: TabId,
    pub source_pane_id: PaneId,
}

impl DragPayload {
    pub fn to_json(&self) -> Result<String, LayoutError> {
        serde_json::to_string(self).map_err(|err| LayoutError::Decode {
            message: err.to_string(),
        })
    }

    /// Decode a payload read back from a drop event.
    pub fn parse(json: &str) -> Result<Self, LayoutError> {
        serde_json::from_str(json).map_err(|err| LayoutError::Decode {
            message: err.to_string(),
        })
    }
}

/// Lifecycle phase of the drag manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    Committing,
}

impl DragPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging => "dragging",
            Self::Committing => "committing",
        }
    }
}

/// Current hover target of a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DragHover {
    pub pane_id: PaneId,
    pub zone: DropZone,
    pub target_index: usize,
}

/// The in-flight drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragSession {
    pub dragged_tab_id: TabId,
    pub source_pane_id: PaneId,
    /// `None` until the pointer first enters a drop surface.
    pub hover: Option<DragHover>,
}

/// The single tree operation a drop translates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIntent {
    Move { pane_id: PaneId, index: usize },
    Split { pane_id: PaneId, side: SplitSide },
}

impl From<DragHover> for DropIntent {
    fn from(hover: DragHover) -> Self {
        match hover.zone.split_side() {
            Some(side) => Self::Split {
                pane_id: hover.pane_id,
                side,
            },
            None => Self::Move {
                pane_id: hover.pane_id,
                index: hover.target_index,
            },
        }
    }
}

/// What a finished drag did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Moved {
        tab_id: TabId,
        from: PaneId,
        to: PaneId,
        index: usize,
    },
    Split {
        tab_id: TabId,
        split_id: PaneId,
        new_pane: PaneId,
    },
    /// Dropped onto its own position.
    Unchanged { tab_id: TabId },
    /// Released outside every drop surface.
    Discarded,
}

/// Owns the drag state machine and its observers.
#[derive(Debug, Default)]
pub struct DragDropManager {
    phase: DragPhase,
    session: Option<DragSession>,
    observers: Observers<Option<DragSession>>,
}

impl DragDropManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.phase
    }

    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// Register a callback receiving the session (or `None` once idle).
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&mut self, callback: impl Fn(&Option<DragSession>) + 'static) -> Subscription {
        self.observers.subscribe(callback)
    }

    /// Begin dragging `tab_id` out of `source_pane_id`.
    pub fn start_drag(
        &mut self,
        tab_id: TabId,
        source_pane_id: PaneId,
        transfer: &mut dyn DragTransfer,
    ) -> Result<(), LayoutError> {
        self.expect_phase(DragPhase::Idle, "start_drag")?;

        let payload = DragPayload {
            tab_id,
            source_pane_id,
        }
        .to_json()?;
        transfer.set_data(TAB_DRAG_MIME, &payload);
        let effect = DragEffect::Move;
        transfer.set_effect_allowed(effect);

        self.phase = DragPhase::Dragging;
        self.session = Some(DragSession {
            dragged_tab_id: tab_id,
            source_pane_id,
            hover: None,
        });
        debug!(%tab_id, %source_pane_id, effect = effect.as_str(), "drag started");
        self.observers.notify(&self.session);
        Ok(())
    }

    /// Replace the hover target.
    pub fn update_drag(
        &mut self,
        hover_pane_id: PaneId,
        zone: DropZone,
        target_index: usize,
    ) -> Result<(), LayoutError> {
        self.expect_phase(DragPhase::Dragging, "update_drag")?;
        let hover = DragHover {
            pane_id: hover_pane_id,
            zone,
            target_index,
        };
        self.set_hover(Some(hover), "update_drag")
    }

    /// [`update_drag`](Self::update_drag) from a resolver result.
    pub fn update_from_resolution(
        &mut self,
        hover_pane_id: PaneId,
        resolution: DropResolution,
    ) -> Result<(), LayoutError> {
        self.update_drag(hover_pane_id, resolution.zone, resolution.target_index)
    }

    /// Forget the hover target (pointer left every drop surface).
    pub fn clear_hover(&mut self) -> Result<(), LayoutError> {
        self.expect_phase(DragPhase::Dragging, "clear_hover")?;
        self.set_hover(None, "clear_hover")
    }

    /// Drop: apply the hover target to `model` and return to idle.
    pub fn end_drag(&mut self, model: &mut PanelModel) -> Result<DropOutcome, LayoutError> {
        self.expect_phase(DragPhase::Dragging, "end_drag")?;
        let Some(session) = self.session else {
            self.finish();
            return Ok(DropOutcome::Discarded);
        };
        let Some(hover) = session.hover else {
            debug!(tab_id = %session.dragged_tab_id, "drag discarded without a drop target");
            self.finish();
            return Ok(DropOutcome::Discarded);
        };

        self.phase = DragPhase::Committing;
        let intent = DropIntent::from(hover);
        debug!(tab_id = %session.dragged_tab_id, ?intent, zone = %hover.zone, "committing drop");
        let result = commit(model, session.dragged_tab_id, intent);
        self.finish();

        if let Err(err) = &result {
            warn!(%err, tab_id = %session.dragged_tab_id, "drop rejected; drag ended");
        }
        result
    }

    /// Abort the drag without touching the tree.
    pub fn cancel_drag(&mut self) -> Result<DragSession, LayoutError> {
        self.expect_phase(DragPhase::Dragging, "cancel_drag")?;
        let session = self.session.take().ok_or(LayoutError::InvalidDragState {
            operation: "cancel_drag",
            state: DragPhase::Idle.as_str(),
        })?;
        debug!(tab_id = %session.dragged_tab_id, "drag cancelled");
        self.finish();
        Ok(session)
    }

    fn set_hover(&mut self, hover: Option<DragHover>, operation: &'static str) -> Result<(), LayoutError> {
        let session = self.session.as_mut().ok_or(LayoutError::InvalidDragState {
            operation,
            state: DragPhase::Idle.as_str(),
        })?;
        if session.hover == hover {
            return Ok(());
        }
        session.hover = hover;
        self.observers.notify(&self.session);
        Ok(())
    }

    fn expect_phase(&self, expected: DragPhase, operation: &'static str) -> Result<(), LayoutError> {
        if self.phase == expected {
            return Ok(());
        }
        warn!(operation, state = self.phase.as_str(), "drag operation rejected");
        Err(LayoutError::InvalidDragState {
            operation,
            state: self.phase.as_str(),
        })
    }

    fn finish(&mut self) {
        self.phase = DragPhase::Idle;
        self.session = None;
        self.observers.notify(&self.session);
    }
}

fn commit(model: &mut PanelModel, tab_id: TabId, intent: DropIntent) -> Result<DropOutcome, LayoutError> {
    match intent {
        DropIntent::Move { pane_id, index } => {
            Ok(match model.move_tab(tab_id, pane_id, index)? {
                MoveOutcome::Moved { from, to, index } => DropOutcome::Moved {
                    tab_id,
                    from,
                    to,
                    index,
                },
                MoveOutcome::Unchanged => DropOutcome::Unchanged { tab_id },
            })
        }
        DropIntent::Split { pane_id, side } => {
            let from = model
                .registry()
                .pane_of(tab_id)
                .ok_or(LayoutError::TabNotFound { tab_id })?;
            let tab = model
                .tree()
                .tab(tab_id)
                .cloned()
                .ok_or(LayoutError::TabNotFound { tab_id })?;
            Ok(match model.split_pane(pane_id, side, tab)? {
                SplitOutcome::Filled { pane_id } => DropOutcome::Moved {
                    tab_id,
                    from,
                    to: pane_id,
                    index: 0,
                },
                SplitOutcome::Split { split_id, new_pane } => DropOutcome::Split {
                    tab_id,
                    split_id,
                    new_pane,
                },
                SplitOutcome::Unchanged => DropOutcome::Unchanged { tab_id },
            })
        }
    }
}
