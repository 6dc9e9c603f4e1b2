use anyhow::Context;
use square_engine::core::{App, AppControl, FrameCtx};
use square_engine::render::{RenderCtx, SquarePass, SquareRenderer};

/// Draws the square once setup succeeded and redraws the same frame whenever
/// the window system asks for it.
#[derive(Default)]
pub struct SquareApp {
    renderer: Option<SquareRenderer>,
    last_pass: Option<SquarePass>,
}

impl App for SquareApp {
    fn on_start(&mut self, ctx: &RenderCtx<'_>) -> anyhow::Result<()> {
        let renderer = SquareRenderer::new(ctx).context("square setup failed")?;
        log::info!(
            "attribute `{}` at location {}, fill {:?}",
            renderer.binding().name(),
            renderer.binding().location(),
            renderer.fill().map(|c| c.to_array())
        );
        self.renderer = Some(renderer);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> anyhow::Result<AppControl> {
        let renderer = self
            .renderer
            .as_ref()
            .context("frame requested before the renderer was set up")?;

        let mut recorded = None;
        let control = ctx.render(|rctx, target| {
            recorded = Some(renderer.render(rctx, target));
        });

        if let Some(pass) = recorded {
            if self.last_pass != Some(pass) {
                log::info!(
                    "drew {} indices into viewport {:?}",
                    pass.draw.index_count,
                    pass.viewport
                );
            }
            self.last_pass = Some(pass);
        }

        Ok(control)
    }
}
