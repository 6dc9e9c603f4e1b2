use crate::coords::{CanvasSize, ViewportRect};
use crate::device::DEPTH_FORMAT;
use crate::paint::Color;

use super::mesh::SquareMesh;

/// Parameters of the single indexed draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IndexedDraw {
    pub topology: wgpu::PrimitiveTopology,
    pub index_count: u32,
    pub index_format: wgpu::IndexFormat,
    /// Byte offset into the index buffer.
    pub byte_offset: u64,
}

impl IndexedDraw {
    /// Triangle list over every index of `mesh`, 16-bit, from the start.
    pub fn whole_mesh(mesh: &SquareMesh) -> Self {
        Self {
            topology: wgpu::PrimitiveTopology::TriangleList,
            index_count: mesh.index_count(),
            index_format: wgpu::IndexFormat::Uint16,
            byte_offset: 0,
        }
    }
}

/// Everything the square pass does to a frame, in recording order:
/// clear, depth-test setup, viewport, draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SquarePass {
    pub clear_color: Color,
    pub depth_test: bool,
    pub viewport: ViewportRect,
    pub draw: IndexedDraw,
}

impl SquarePass {
    pub fn for_canvas(canvas: CanvasSize, mesh: &SquareMesh) -> Self {
        Self {
            clear_color: Color::CLEAR_GRAY,
            depth_test: true,
            viewport: ViewportRect::covering(canvas),
            draw: IndexedDraw::whole_mesh(mesh),
        }
    }

    /// Depth state for the pipeline.
    ///
    /// With the test disabled every fragment passes and nothing is written.
    pub fn depth_stencil(&self) -> wgpu::DepthStencilState {
        let (depth_write_enabled, depth_compare) = if self.depth_test {
            (true, wgpu::CompareFunction::Less)
        } else {
            (false, wgpu::CompareFunction::Always)
        };

        wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}
