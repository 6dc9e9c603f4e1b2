//! Square engine crate.
//!
//! Everything needed to put one static, flat-shaded square on screen:
//! context acquisition, the window runtime, shader compilation and linking,
//! and the renderer itself.

pub mod core;
pub mod coords;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod window;

mod error;

pub use error::{Result, SquareError};
