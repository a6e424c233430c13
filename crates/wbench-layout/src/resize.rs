//! Interactive divider resizing.
//!
//! Divider `i` of a split sits between children `i` and `i + 1`. While a
//! divider is dragged, the pointer delta along the split axis is converted to
//! a ratio delta (`delta_px / extent_px`) and applied to that pair only; every
//! other child keeps its ratio. Each child of the pair is clamped to at least
//! `min_pane_px / extent_px`, and the sibling absorbs the remainder, so the
//! pair's combined share (and the split's ratio sum) never changes.
//!
//! Deltas are always measured from the pointer position captured by
//! [`ResizeController::begin`], so replaying the same pointer twice yields the
//! same ratios and a move that does not change the clamped result is a no-op.

use tracing::{debug, warn};
use wbench_core::{Point, Rect};

use crate::error::LayoutError;
use crate::ids::PaneId;
use crate::model::PanelModel;
use crate::tree::{PaneLayout, PaneTree, SplitAxis};
use crate::tuning::{ResizeTuning, TuningError};

/// A grabbed divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeTarget {
    pub split_id: PaneId,
    pub divider: usize,
    pub axis: SplitAxis,
}

/// State captured for an active divider drag.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub target: ResizeTarget,
    pub start_pointer: Point,
    pub start_ratios: Vec<f64>,
    pub extent_px: f64,
    pub min_ratio: f64,
}

impl ResizeSession {
    /// Ratios for the pointer at `pointer`.
    #[must_use]
    pub fn ratios_for(&self, pointer: Point) -> Vec<f64> {
        let first = self.target.divider;
        let second = first + 1;
        let pair = self.start_ratios[first] + self.start_ratios[second];
        let delta = self.target.axis.delta(self.start_pointer, pointer) / self.extent_px;
        if !delta.is_finite() {
            return self.start_ratios.clone();
        }

        let lead = (self.start_ratios[first] + delta).clamp(self.min_ratio, pair - self.min_ratio);
        let mut ratios = self.start_ratios.clone();
        ratios[first] = lead;
        ratios[second] = pair - lead;
        ratios
    }

    fn pair_share(&self) -> f64 {
        self.start_ratios[self.target.divider] + self.start_ratios[self.target.divider + 1]
    }
}

const MIN_RATIO_FLOOR: f64 = 1e-6;

/// Minimum per-child ratio for a pair sharing `pair_share` of `extent_px`.
///
/// When the pair cannot hold two minimum-size panes the floor drops to half
/// the pair's share. The floor never drops below [`MIN_RATIO_FLOOR`], so
/// neither child of the pair can round to zero.
fn min_ratio_for(min_pane_px: f64, extent_px: f64, pair_share: f64) -> f64 {
    let min_ratio = (min_pane_px / extent_px).max(MIN_RATIO_FLOOR);
    if pair_share < 2.0 * min_ratio {
        pair_share / 2.0
    } else {
        min_ratio
    }
}

/// Drives one divider drag at a time.
#[derive(Debug, Clone, Default)]
pub struct ResizeController {
    tuning: ResizeTuning,
    active: Option<ResizeSession>,
}

impl ResizeController {
    /// A controller enforcing `tuning`, which must validate.
    pub fn new(tuning: ResizeTuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            active: None,
        })
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&ResizeSession> {
        self.active.as_ref()
    }

    /// Grab divider `divider` of `split_id`, whose extent along its axis is
    /// `extent_px`.
    pub fn begin(
        &mut self,
        model: &PanelModel,
        split_id: PaneId,
        divider: usize,
        pointer: Point,
        extent_px: f64,
    ) -> Result<(), LayoutError> {
        if self.active.is_some() {
            warn!(%split_id, "resize rejected: a divider drag is already active");
            return Err(LayoutError::InvalidResizeState {
                operation: "begin",
                state: "active",
            });
        }
        if !extent_px.is_finite() || extent_px <= 0.0 {
            return Err(LayoutError::InvalidResizeState {
                operation: "begin",
                state: "collapsed",
            });
        }
        let split = model
            .tree()
            .split(split_id)
            .ok_or(LayoutError::PaneNotFound { pane_id: split_id })?;
        if divider + 1 >= split.children.len() {
            return Err(LayoutError::DividerOutOfRange {
                split_id,
                divider,
                children: split.children.len(),
            });
        }

        let start_ratios = split.ratios();
        let pair_share = start_ratios[divider] + start_ratios[divider + 1];
        let session = ResizeSession {
            target: ResizeTarget {
                split_id,
                divider,
                axis: split.axis,
            },
            start_pointer: pointer,
            min_ratio: min_ratio_for(self.tuning.min_pane_px, extent_px, pair_share),
            start_ratios,
            extent_px,
        };
        debug!(
            %split_id,
            divider,
            extent_px,
            min_ratio = session.min_ratio,
            "divider drag started"
        );
        self.active = Some(session);
        Ok(())
    }

    /// Move the grabbed divider to follow `pointer`. Returns whether the
    /// ratios changed.
    pub fn drag_to(&mut self, model: &mut PanelModel, pointer: Point) -> Result<bool, LayoutError> {
        let session = self.active.as_ref().ok_or(LayoutError::InvalidResizeState {
            operation: "drag_to",
            state: "idle",
        })?;
        let split_id = session.target.split_id;
        let current = model
            .tree()
            .split(split_id)
            .ok_or(LayoutError::PaneNotFound { pane_id: split_id })?
            .ratios();
        if current.len() != session.start_ratios.len() {
            return Err(LayoutError::DividerOutOfRange {
                split_id,
                divider: session.target.divider,
                children: current.len(),
            });
        }

        let ratios = session.ratios_for(pointer);
        if ratios == current {
            return Ok(false);
        }
        model.set_split_ratios(split_id, &ratios)?;
        Ok(true)
    }

    /// Re-derive the minimum ratio after the split's container changed size.
    pub fn container_resized(&mut self, extent_px: f64) -> Result<(), LayoutError> {
        let min_pane_px = self.tuning.min_pane_px;
        let session = self.active.as_mut().ok_or(LayoutError::InvalidResizeState {
            operation: "container_resized",
            state: "idle",
        })?;
        if !extent_px.is_finite() || extent_px <= 0.0 {
            return Err(LayoutError::InvalidResizeState {
                operation: "container_resized",
                state: "collapsed",
            });
        }
        session.extent_px = extent_px;
        session.min_ratio = min_ratio_for(min_pane_px, extent_px, session.pair_share());
        debug!(extent_px, min_ratio = session.min_ratio, "divider extent updated");
        Ok(())
    }

    /// Release the divider, keeping the current ratios.
    pub fn finish(&mut self) -> Result<ResizeSession, LayoutError> {
        let session = self.active.take().ok_or(LayoutError::InvalidResizeState {
            operation: "finish",
            state: "idle",
        })?;
        debug!(split_id = %session.target.split_id, "divider drag finished");
        Ok(session)
    }

    /// Abort the drag and restore the ratios captured at [`begin`](Self::begin).
    pub fn cancel(&mut self, model: &mut PanelModel) -> Result<(), LayoutError> {
        let session = self.active.take().ok_or(LayoutError::InvalidResizeState {
            operation: "cancel",
            state: "idle",
        })?;
        let split_id = session.target.split_id;
        debug!(%split_id, "divider drag cancelled");
        model.set_split_ratios(split_id, &session.start_ratios)
    }
}

/// Find the divider within `grab_px` of `pointer`.
#[must_use]
pub fn divider_at(
    tree: &PaneTree,
    layout: &PaneLayout,
    pointer: Point,
    grab_px: f64,
) -> Option<ResizeTarget> {
    tree.nodes().find_map(|node| {
        let split = node.as_split()?;
        let rect = layout.rect(node.id)?;
        if !rect.contains(pointer) {
            return None;
        }
        let (start, extent, along) = axis_span(split.axis, rect, pointer);
        let dividers = split.children.len().saturating_sub(1);
        let mut offset = 0.0;
        for (divider, child) in split.children.iter().enumerate().take(dividers) {
            offset += child.ratio * extent;
            if (along - (start + offset)).abs() <= grab_px {
                return Some(ResizeTarget {
                    split_id: node.id,
                    divider,
                    axis: split.axis,
                });
            }
        }
        None
    })
}

fn axis_span(axis: SplitAxis, rect: Rect, pointer: Point) -> (f64, f64, f64) {
    match axis {
        SplitAxis::Horizontal => (rect.left(), rect.width, pointer.x),
        SplitAxis::Vertical => (rect.top(), rect.height, pointer.y),
    }
}
