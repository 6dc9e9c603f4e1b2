use crate::error::Result;
use crate::paint::Color;

use super::attribute::{AttributeBinding, AttributePointer};
use super::mesh::{MeshBuffers, SquareMesh};
use super::pass::SquarePass;
use super::program::LinkedProgram;
use super::shader::{CompiledShader, ShaderSource, COORDINATES_ATTRIBUTE};
use super::{RenderCtx, RenderTarget};

/// Draws the flat-shaded square.
///
/// All GPU objects are created once in [`SquareRenderer::new`] and kept for
/// the renderer's lifetime: one vertex buffer, one index buffer, one program,
/// one pipeline. [`SquareRenderer::render`] only records commands.
pub struct SquareRenderer {
    mesh: SquareMesh,
    buffers: MeshBuffers,
    binding: AttributeBinding,
    pipeline: wgpu::RenderPipeline,
    fill: Option<Color>,
}

impl SquareRenderer {
    /// Runs the setup sequence with the built-in mesh and shaders.
    pub fn new(ctx: &RenderCtx<'_>) -> Result<Self> {
        Self::with_sources(
            ctx,
            SquareMesh::UNIT,
            ShaderSource::square_vertex(),
            ShaderSource::square_fragment(),
        )
    }

    /// Runs the setup sequence with caller-provided shader sources.
    ///
    /// Steps, in order: upload buffers, compile both stages, link, bind the
    /// `coordinates` attribute, build the pipeline. Any failing step aborts
    /// with its own error variant.
    pub fn with_sources(
        ctx: &RenderCtx<'_>,
        mesh: SquareMesh,
        vertex: ShaderSource,
        fragment: ShaderSource,
    ) -> Result<Self> {
        let buffers = mesh.upload(ctx.device);
        log::debug!(
            "uploaded square mesh: {} vertices, {} indices",
            mesh.vertex_count(),
            buffers.index_count
        );

        let vertex = CompiledShader::compile(vertex)?;
        let fragment = CompiledShader::compile(fragment)?;
        let program = LinkedProgram::link(vertex, fragment)?;

        let attribute = program.attribute(COORDINATES_ATTRIBUTE)?;
        let binding = AttributePointer::POSITION_2D.bind(attribute)?;

        // Depth state is fixed at pipeline creation; the canvas size does not matter here.
        let pass = SquarePass::for_canvas(ctx.canvas, &mesh);
        let pipeline = create_pipeline(ctx, &program, &binding, &pass);

        let fill = program.constant_output();
        log::info!("square renderer ready ({:?}, fill {fill:?})", ctx.surface_format);

        Ok(Self {
            mesh,
            buffers,
            binding,
            pipeline,
            fill,
        })
    }

    #[inline]
    pub fn binding(&self) -> &AttributeBinding {
        &self.binding
    }

    /// Fragment output for covered pixels, read from the linked program.
    ///
    /// `None` when the fragment stage does not write a constant color.
    #[inline]
    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    /// Pass this renderer records for `ctx`'s canvas.
    pub fn pass_for(&self, ctx: &RenderCtx<'_>) -> SquarePass {
        SquarePass::for_canvas(ctx.canvas, &self.mesh)
    }

    /// Clears the canvas and draws the square into `target`.
    ///
    /// Returns the pass that was recorded.
    pub fn render(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) -> SquarePass {
        let pass = self.pass_for(ctx);
        let vp = pass.viewport;
        let draw = pass.draw;

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("square pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(pass.clear_color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            // Only color is cleared by the pass itself; the depth buffer starts
            // every frame at its initial far value, which is what a fresh clear gives.
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(0, self.buffers.vertex.slice(..));
        rpass.set_index_buffer(self.buffers.index.slice(draw.byte_offset..), draw.index_format);
        rpass.set_viewport(vp.x, vp.y, vp.width, vp.height, 0.0, 1.0);
        rpass.draw_indexed(0..draw.index_count, 0, 0..1);

        log::trace!(
            "square drawn: {} indices into {}x{} viewport",
            draw.index_count,
            vp.width,
            vp.height
        );

        pass
    }
}

fn create_pipeline(
    ctx: &RenderCtx<'_>,
    program: &LinkedProgram,
    binding: &AttributeBinding,
    pass: &SquarePass,
) -> wgpu::RenderPipeline {
    let vs_module = program.vertex().create_module(ctx.device);
    let fs_module = program.fragment().create_module(ctx.device);

    let layout = ctx
        .device
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("square pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("square pipeline"),
        layout: Some(&layout),

        vertex: wgpu::VertexState {
            module: &vs_module,
            entry_point: Some(program.vertex().entry_point()),
            compilation_options: Default::default(),
            buffers: &[binding.layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &fs_module,
            entry_point: Some(program.fragment().entry_point()),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                // No blend stage: the fragment color lands as-is.
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: pass.draw.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(pass.depth_stencil()),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
