//! Server-side consumers of the region engine
//!
//! This module contains the pieces of the window-management server that
//! talk to the region engine: request marshalling of region data and the
//! per-window clipping state used for hit-testing and repaint decisions.

pub mod marshal;
pub mod window;

pub use marshal::RequestMarshaller;
pub use window::WindowSurface;
