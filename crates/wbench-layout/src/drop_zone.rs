//! Drop-zone geometry.
//!
//! Classifies a drag pointer against a pane (or tab strip) rectangle and the
//! ordered tab rectangles it contains. The resolver is a pure function of its
//! inputs and tuning: the same pointer and rects always produce the same
//! [`DropResolution`].
//!
//! Precedence, highest first:
//!
//! 1. Edge bands (`split-left`/`split-right`, and on a full pane also
//!    `split-top`/`split-bottom`).
//! 2. Tab-strip slots (`before-tab`/`after-tab`) when the pane has tabs.
//! 3. `pane-center` at index 0 when it has none.

use std::fmt;

use serde::{Deserialize, Serialize};
use wbench_core::{Point, Rect};

use crate::tree::SplitSide;
use crate::tuning::DropTuning;

/// Classified region under the drag pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropZone {
    BeforeTab,
    AfterTab,
    PaneCenter,
    SplitLeft,
    SplitRight,
    SplitTop,
    SplitBottom,
}

impl DropZone {
    /// The split this zone requests, if it is an edge zone.
    #[must_use]
    pub const fn split_side(self) -> Option<SplitSide> {
        match self {
            Self::SplitLeft => Some(SplitSide::Left),
            Self::SplitRight => Some(SplitSide::Right),
            Self::SplitTop => Some(SplitSide::Top),
            Self::SplitBottom => Some(SplitSide::Bottom),
            Self::BeforeTab | Self::AfterTab | Self::PaneCenter => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BeforeTab => "before-tab",
            Self::AfterTab => "after-tab",
            Self::PaneCenter => "pane-center",
            Self::SplitLeft => "split-left",
            Self::SplitRight => "split-right",
            Self::SplitTop => "split-top",
            Self::SplitBottom => "split-bottom",
        }
    }
}

impl fmt::Display for DropZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the container rectangle passed to the resolver represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DropSurface {
    /// The whole pane: all four edge bands are live.
    #[default]
    Pane,
    /// Only the tab strip: vertical split bands are not evaluated.
    TabStrip,
}

/// Zone plus insertion index.
///
/// `target_index` is expressed in the target pane's tab positions before
/// the dragged tab is removed from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropResolution {
    pub zone: DropZone,
    pub target_index: usize,
}

impl DropResolution {
    #[must_use]
    pub const fn new(zone: DropZone, target_index: usize) -> Self {
        Self { zone, target_index }
    }
}

/// Hover feedback the rendering layer draws for a resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropIndicator {
    /// Vertical insertion line between tabs.
    Line { x: f64, top: f64, bottom: f64 },
    /// Highlighted region of the pane the tab would occupy.
    Region(Rect),
}

/// Stateless drop-zone classifier.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DropZoneResolver {
    tuning: DropTuning,
}

impl DropZoneResolver {
    #[must_use]
    pub const fn new(tuning: DropTuning) -> Self {
        Self { tuning }
    }

    /// Classify `pointer` against `container` and its tab rects.
    ///
    /// Returns `None` when the pointer is outside `container` (or the
    /// container is degenerate).
    #[must_use]
    pub fn resolve(
        &self,
        pointer: Point,
        container: Rect,
        surface: DropSurface,
        tab_rects: &[Rect],
    ) -> Option<DropResolution> {
        if container.is_empty() || !container.contains(pointer) {
            return None;
        }

        if let Some(zone) = self.edge_zone(pointer, container, surface) {
            return Some(DropResolution::new(zone, 0));
        }

        Some(resolve_tab_slot(pointer.x, tab_rects))
    }

    /// Feedback shape for `resolution`.
    #[must_use]
    pub fn indicator(
        &self,
        resolution: DropResolution,
        container: Rect,
        tab_rects: &[Rect],
    ) -> DropIndicator {
        let line_at = |x: f64, rect: &Rect| DropIndicator::Line {
            x,
            top: rect.top(),
            bottom: rect.bottom(),
        };
        match resolution.zone {
            DropZone::BeforeTab => tab_rects
                .get(resolution.target_index)
                .map_or(DropIndicator::Region(container), |rect| {
                    line_at(rect.left(), rect)
                }),
            DropZone::AfterTab => resolution
                .target_index
                .checked_sub(1)
                .and_then(|index| tab_rects.get(index))
                .map_or(DropIndicator::Region(container), |rect| {
                    line_at(rect.right(), rect)
                }),
            zone => DropIndicator::Region(ghost_rect(container, zone)),
        }
    }

    fn edge_zone(&self, pointer: Point, container: Rect, surface: DropSurface) -> Option<DropZone> {
        let band_x = container.width * self.tuning.edge_fraction_x;
        if band_x > 0.0 {
            if pointer.x < container.left() + band_x {
                return Some(DropZone::SplitLeft);
            }
            if pointer.x > container.right() - band_x {
                return Some(DropZone::SplitRight);
            }
        }

        if surface == DropSurface::TabStrip {
            return None;
        }
        let band_y = container.height * self.tuning.edge_fraction_y;
        if band_y > 0.0 {
            if pointer.y < container.top() + band_y {
                return Some(DropZone::SplitTop);
            }
            if pointer.y > container.bottom() - band_y {
                return Some(DropZone::SplitBottom);
            }
        }
        None
    }
}

/// Pick the insertion slot nearest to `x` among ordered tab rects.
///
/// A pointer exactly on a midpoint, or exactly halfway between two
/// midpoints, resolves to `before-tab` of the right-hand tab.
fn resolve_tab_slot(x: f64, tab_rects: &[Rect]) -> DropResolution {
    let Some(first) = tab_rects.first() else {
        return DropResolution::new(DropZone::PaneCenter, 0);
    };
    if x <= first.center_x() {
        return DropResolution::new(DropZone::BeforeTab, 0);
    }

    for (index, pair) in tab_rects.windows(2).enumerate() {
        let left_mid = pair[0].center_x();
        let right_mid = pair[1].center_x();
        if x > left_mid && x <= right_mid {
            let right_index = index + 1;
            let zone = if x - left_mid < right_mid - x {
                DropZone::AfterTab
            } else {
                DropZone::BeforeTab
            };
            return DropResolution::new(zone, right_index);
        }
    }

    DropResolution::new(DropZone::AfterTab, tab_rects.len())
}

/// Region of `container` a tab dropped into `zone` would occupy.
#[must_use]
pub fn ghost_rect(container: Rect, zone: DropZone) -> Rect {
    match zone {
        DropZone::SplitLeft => container.left_part(0.5),
        DropZone::SplitRight => container.right_part(0.5),
        DropZone::SplitTop => container.top_part(0.5),
        DropZone::SplitBottom => container.bottom_part(0.5),
        DropZone::BeforeTab | DropZone::AfterTab | DropZone::PaneCenter => container,
    }
}
