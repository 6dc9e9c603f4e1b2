//! Canvas and viewport geometry.
//!
//! Canvas space is physical pixels with the origin at the top-left; the
//! square itself lives in clip space and never goes through these types.

mod canvas;
mod viewport;

pub use canvas::CanvasSize;
pub use viewport::ViewportRect;
