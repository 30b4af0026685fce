//! emblab: headless engine of an interactive embedding workbench.
//!
//! The crate keeps the view state of a contrastive dimensionality-reduction
//! front end (per-class weight charts, a 2-D embedding with confidence
//! ellipses, and projection component panels), turns raw pointer gestures
//! into edits, exchanges JSON messages with the optimizer backend and hands
//! renderer-agnostic scene patches to a drawing backend.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod protocol;
pub mod render;
pub mod store;
pub mod telemetry;

pub use api::{Workbench, WorkbenchConfig};
pub use error::{ViewError, ViewResult};
