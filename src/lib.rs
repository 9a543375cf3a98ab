//! Freehand stroke capture for a VR drawing tool, with closure detection and
//! containment of points inside closed strokes.
//!
//! A [`DrawingSession`](engine::DrawingSession) receives one probe contact per
//! sampling tick while the trigger is held, filters out jitter and sensor jumps,
//! and records the accepted points. When the trigger is released the stroke is
//! sealed; if its ends meet it can decide which targets it encloses.

pub(crate) mod util;
pub use util::{ListenerId, ResultExt};

pub mod config;
pub mod engine;
pub mod geom;
pub mod replay;
