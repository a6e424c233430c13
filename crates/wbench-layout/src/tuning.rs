//! Tunable thresholds for drop-zone classification and divider resizing.
//!
//! Hosts usually load these from their settings file:
//!
//! ```
//! use wbench_layout::tuning::LayoutTuning;
//!
//! let tuning = LayoutTuning::from_json(r#"{ "drop": { "edge_fraction_x": 0.2 } }"#)
//!     .expect("valid tuning");
//! assert_eq!(tuning.drop.edge_fraction_x, 0.2);
//! assert_eq!(tuning.resize.min_pane_px, 80.0);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default width of the left/right split bands as a fraction of pane width.
pub const DEFAULT_EDGE_FRACTION_X: f64 = 0.10;

/// Default height of the top/bottom split bands as a fraction of pane height.
pub const DEFAULT_EDGE_FRACTION_Y: f64 = 0.10;

/// Default minimum pane extent kept while dragging a divider, in pixels.
pub const DEFAULT_MIN_PANE_PX: f64 = 80.0;

/// Edge-band sizes used by the drop zone resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropTuning {
    pub edge_fraction_x: f64,
    pub edge_fraction_y: f64,
}

impl Default for DropTuning {
    fn default() -> Self {
        Self {
            edge_fraction_x: DEFAULT_EDGE_FRACTION_X,
            edge_fraction_y: DEFAULT_EDGE_FRACTION_Y,
        }
    }
}

impl DropTuning {
    pub fn validate(self) -> Result<(), TuningError> {
        for (axis, value) in [("x", self.edge_fraction_x), ("y", self.edge_fraction_y)] {
            if !(0.0..0.5).contains(&value) {
                return Err(TuningError::EdgeFractionOutOfRange { axis, value });
            }
        }
        Ok(())
    }
}

/// Divider resize limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeTuning {
    pub min_pane_px: f64,
}

impl Default for ResizeTuning {
    fn default() -> Self {
        Self {
            min_pane_px: DEFAULT_MIN_PANE_PX,
        }
    }
}

impl ResizeTuning {
    pub fn validate(self) -> Result<(), TuningError> {
        if !self.min_pane_px.is_finite() || self.min_pane_px <= 0.0 {
            return Err(TuningError::InvalidMinPaneSize {
                value: self.min_pane_px,
            });
        }
        Ok(())
    }
}

/// All layout tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTuning {
    pub drop: DropTuning,
    pub resize: ResizeTuning,
}

impl LayoutTuning {
    pub fn validate(self) -> Result<(), TuningError> {
        self.drop.validate()?;
        self.resize.validate()
    }

    /// Decode tuning from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json).map_err(|err| TuningError::Decode {
            message: err.to_string(),
        })?;
        tuning.validate()?;
        Ok(tuning)
    }
}

/// Rejected tuning values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("edge fraction {axis}={value} must be within [0, 0.5)")]
    EdgeFractionOutOfRange { axis: &'static str, value: f64 },

    #[error("minimum pane size {value} must be a positive number of pixels")]
    InvalidMinPaneSize { value: f64 },

    #[error("tuning could not be decoded: {message}")]
    Decode { message: String },
}
