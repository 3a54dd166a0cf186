//! joyport: joystick / parallel port correlation tool.
//!
//! Reads a Linux joystick device and the three registers of a parallel port in
//! one loop and renders both side by side, so controller-to-port wiring can be
//! checked by eye.

pub mod backends;
pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod logger;
pub mod metadata;
pub mod poll_loop;
pub mod port;
pub mod render;
pub mod snapshot;
pub mod state;

pub use config::*;
pub use device::*;
pub use error::{Error, Result};
pub use event::*;
pub use metadata::*;
pub use poll_loop::*;
pub use port::*;
pub use snapshot::*;
pub use state::*;
