//! Square rendering.
//!
//! The setup sequence is split by concern:
//! - `mesh`: vertex/index data and its upload
//! - `shader`: WGSL sources and compilation
//! - `program`: linking and attribute reflection
//! - `attribute`: attribute pointers and the vertex buffer layout
//! - `pass`: clear, depth, viewport and draw parameters
//! - `square`: the renderer tying them together
//!
//! Geometry is already in clip space; there is no viewport uniform.

mod attribute;
mod ctx;
mod mesh;
mod pass;
mod program;
#[cfg(test)]
mod reference;
mod shader;
mod square;

pub use attribute::{AttributeBinding, AttributePointer, ComponentType};
pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{read_back_indices, read_back_vertices, MeshBuffers, SquareMesh};
pub use pass::{IndexedDraw, SquarePass};
pub use program::{ActiveAttribute, LinkedProgram};
pub use shader::{CompiledShader, ShaderSource, ShaderStage, COORDINATES_ATTRIBUTE};
pub use square::SquareRenderer;
