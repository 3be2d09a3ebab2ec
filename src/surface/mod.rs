//! Headless control surface: the slider panel state machine, its transport
//! seam, and the background refresh loop that keeps it loosely synchronized
//! with the state service.

pub mod panel;
pub mod sync;
pub mod transport;
