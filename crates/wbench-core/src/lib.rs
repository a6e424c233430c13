#![forbid(unsafe_code)]

//! Core: pixel geometry and observer plumbing shared by the workbench crates.
//!
//! # Role in wbench
//! `wbench-core` holds the primitives that carry no workbench semantics:
//! - **Geometry**: [`Point`] and [`Rect`] in CSS pixel space, used by the drop
//!   zone resolver, the resize controller and the layout solver.
//! - **Observers**: [`Observers`] / [`Subscription`], the synchronous
//!   notification channel that replaces implicit re-render in the panel model
//!   and the drag session manager.

pub mod geometry;
pub mod observer;

pub use geometry::{Point, Rect};
pub use observer::{Observers, Subscription};
