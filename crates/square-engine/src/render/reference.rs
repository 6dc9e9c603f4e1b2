//! CPU reference for what the square pass writes.
//!
//! Evaluates a single pixel the way the GPU pipeline does (viewport mapping,
//! triangle coverage, the program's fragment output, no blending) so coverage
//! and color can be checked without a device.

use crate::paint::Color;

use super::mesh::SquareMesh;
use super::pass::SquarePass;
use super::program::LinkedProgram;

/// Color the pass leaves at pixel `(px, py)` of the framebuffer, before any
/// blending stage: the program's output where the square covers the pixel,
/// the clear color everywhere else.
///
/// `None` for a covered pixel whose fragment output is not a constant.
pub fn shade_pixel(
    pass: &SquarePass,
    mesh: &SquareMesh,
    program: &LinkedProgram,
    px: u32,
    py: u32,
) -> Option<Color> {
    if covers_pixel(pass, mesh, px, py) {
        program.constant_output()
    } else {
        Some(pass.clear_color)
    }
}

/// Whether a triangle of `mesh` covers the center of pixel `(px, py)` inside
/// the pass viewport.
pub fn covers_pixel(pass: &SquarePass, mesh: &SquareMesh, px: u32, py: u32) -> bool {
    let vp = pass.viewport;
    let cx = px as f32 + 0.5;
    let cy = py as f32 + 0.5;

    if !vp.is_valid() || cx < vp.x || cy < vp.y || cx >= vp.x + vp.width || cy >= vp.y + vp.height {
        return false;
    }

    let p = [
        (cx - vp.x) / vp.width * 2.0 - 1.0,
        1.0 - (cy - vp.y) / vp.height * 2.0,
    ];

    mesh.triangles().any(|t| covers(t, p))
}

/// Number of pixels of a `width` x `height` framebuffer the square covers.
pub fn covered_pixels(pass: &SquarePass, mesh: &SquareMesh, width: u32, height: u32) -> usize {
    (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .filter(|&(x, y)| covers_pixel(pass, mesh, x, y))
        .count()
}

fn edge(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

// Winding-agnostic: no culling is configured on the pipeline.
fn covers(tri: [[f32; 2]; 3], p: [f32; 2]) -> bool {
    let [a, b, c] = tri;
    let e0 = edge(a, b, p);
    let e1 = edge(b, c, p);
    let e2 = edge(c, a, p);
    (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0) || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::CanvasSize;
    use crate::render::shader::{CompiledShader, ShaderSource, ShaderStage};

    fn pass(w: u32, h: u32) -> SquarePass {
        SquarePass::for_canvas(CanvasSize::new(w, h), &SquareMesh::UNIT)
    }

    fn link(fragment: ShaderSource) -> LinkedProgram {
        LinkedProgram::link(
            CompiledShader::compile(ShaderSource::square_vertex()).unwrap(),
            CompiledShader::compile(fragment).unwrap(),
        )
        .unwrap()
    }

    fn square_program() -> LinkedProgram {
        link(ShaderSource::square_fragment())
    }

    // ── color ─────────────────────────────────────────────────────────────

    #[test]
    fn covered_pixel_gets_fragment_output() {
        let c = shade_pixel(&pass(640, 480), &SquareMesh::UNIT, &square_program(), 320, 240);
        assert_eq!(c.map(Color::to_array), Some([0.0, 0.0, 0.0, 0.1]));
    }

    #[test]
    fn covered_pixel_follows_a_different_fragment_stage() {
        let red = link(ShaderSource::new(
            ShaderStage::Fragment,
            "fs_main",
            "@fragment\nfn fs_main() -> @location(0) vec4<f32> {\n    return vec4<f32>(1.0, 0.0, 0.0, 1.0);\n}\n",
        ));
        let c = shade_pixel(&pass(640, 480), &SquareMesh::UNIT, &red, 320, 240);
        assert_eq!(c, Some(Color::rgba(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn corner_pixel_keeps_clear_color() {
        let c = shade_pixel(&pass(640, 480), &SquareMesh::UNIT, &square_program(), 0, 0);
        assert_eq!(c, Some(Color::CLEAR_GRAY));
    }

    // ── coverage ──────────────────────────────────────────────────────────

    #[test]
    fn square_covers_the_middle_half_of_each_axis() {
        // Pixel centers 25.5..=74.5 fall inside [-0.5, 0.5] in clip space.
        assert_eq!(covered_pixels(&pass(100, 100), &SquareMesh::UNIT, 100, 100), 50 * 50);
    }

    #[test]
    fn coverage_follows_a_non_square_canvas() {
        assert_eq!(covered_pixels(&pass(200, 100), &SquareMesh::UNIT, 200, 100), 100 * 50);
    }

    #[test]
    fn pixels_outside_the_viewport_are_not_drawn() {
        // Framebuffer larger than the viewport the pass was built for.
        assert_eq!(covered_pixels(&pass(100, 100), &SquareMesh::UNIT, 300, 300), 50 * 50);
    }

    #[test]
    fn diagonal_pixels_are_covered_once() {
        let p = pass(100, 100);
        let program = square_program();
        for i in 25..75 {
            let c = shade_pixel(&p, &SquareMesh::UNIT, &program, i, i);
            assert_eq!(c, Some(Color::SQUARE_FILL), "pixel ({i}, {i})");
        }
    }

    #[test]
    fn dangling_index_drops_its_triangle() {
        let mesh = SquareMesh {
            indices: [0, 1, 2, 0, 2, 9],
            ..SquareMesh::UNIT
        };
        // Lower-left half of the square only, diagonal included.
        assert_eq!(covered_pixels(&pass(100, 100), &mesh, 100, 100), 50 * 51 / 2);
    }
}
