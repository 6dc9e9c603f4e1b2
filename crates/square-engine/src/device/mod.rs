//! GPU context acquisition.
//!
//! This module plays the part of "get a rendering context from the canvas":
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface bound to the window
//! - owning the depth target the square pass tests against
//! - acquiring frames and providing encoders/views for rendering

mod context;
mod depth;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use depth::{DepthTarget, DEPTH_FORMAT};
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
