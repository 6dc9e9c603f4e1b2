//! Shader sources and CPU-side compilation.
//!
//! WGSL is parsed and validated with `naga` before any GPU object exists, so
//! a broken shader is reported with the compiler's diagnostics instead of a
//! device-lost panic later on.

use std::borrow::Cow;
use std::fmt;

use crate::error::{Result, SquareError};

/// Name of the per-vertex position input of the square vertex shader.
pub const COORDINATES_ATTRIBUTE: &str = "coordinates";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// One stage's WGSL source plus the entry point to use from it.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub entry_point: &'static str,
    pub code: Cow<'static, str>,
}

impl ShaderSource {
    pub fn new(stage: ShaderStage, entry_point: &'static str, code: impl Into<Cow<'static, str>>) -> Self {
        Self {
            stage,
            entry_point,
            code: code.into(),
        }
    }

    /// Passes `coordinates` through as `(x, y, 0, 1)`.
    pub fn square_vertex() -> Self {
        Self::new(ShaderStage::Vertex, "vs_main", include_str!("shaders/square.vert.wgsl"))
    }

    /// Emits `(0, 0, 0, 0.1)` for every fragment.
    pub fn square_fragment() -> Self {
        Self::new(ShaderStage::Fragment, "fs_main", include_str!("shaders/square.frag.wgsl"))
    }
}

/// A shader stage that parsed, validated and exposes its entry point.
#[derive(Debug)]
pub struct CompiledShader {
    source: ShaderSource,
    module: naga::Module,
    entry_index: usize,
}

impl CompiledShader {
    pub fn compile(source: ShaderSource) -> Result<Self> {
        let stage = source.stage;
        let compile_error = |log: String| SquareError::ShaderCompile { stage, log };

        let module = naga::front::wgsl::parse_str(&source.code)
            .map_err(|e| compile_error(e.emit_to_string(&source.code)))?;

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .map_err(|e| compile_error(e.emit_to_string(&source.code)))?;

        let entry_index = module
            .entry_points
            .iter()
            .position(|ep| ep.name == source.entry_point && ep.stage == stage.to_naga())
            .ok_or_else(|| {
                compile_error(format!("no {stage} entry point named `{}`", source.entry_point))
            })?;

        log::debug!("compiled {stage} shader `{}`", source.entry_point);

        Ok(Self {
            source,
            module,
            entry_index,
        })
    }

    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.source.stage
    }

    #[inline]
    pub fn entry_point(&self) -> &'static str {
        self.source.entry_point
    }

    #[inline]
    pub fn code(&self) -> &str {
        &self.source.code
    }

    #[inline]
    pub fn module(&self) -> &naga::Module {
        &self.module
    }

    #[inline]
    pub(crate) fn entry(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_index]
    }

    /// Uploads the source to the device as a shader module.
    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        let label = format!("square {} shader", self.stage());
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label.as_str()),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(self.code().to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_shaders_compile() {
        let vs = CompiledShader::compile(ShaderSource::square_vertex()).unwrap();
        let fs = CompiledShader::compile(ShaderSource::square_fragment()).unwrap();
        assert_eq!(vs.stage(), ShaderStage::Vertex);
        assert_eq!(fs.entry_point(), "fs_main");
    }

    #[test]
    fn square_sources_are_loaded_from_files() {
        let vs = CompiledShader::compile(ShaderSource::square_vertex()).unwrap();
        assert!(vs.code().contains("fn vs_main(@location(0) coordinates: vec2<f32>)"));
        assert!(ShaderSource::square_fragment().code.contains("fn fs_main()"));
    }

    #[test]
    fn syntax_error_is_reported_with_stage() {
        let src = ShaderSource::new(ShaderStage::Fragment, "fs_main", "fn fs_main( {");
        match CompiledShader::compile(src) {
            Err(SquareError::ShaderCompile { stage, log }) => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(!log.is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn type_error_fails_validation() {
        let src = ShaderSource::new(
            ShaderStage::Fragment,
            "fs_main",
            "@fragment\nfn fs_main() -> @location(0) vec4<f32> {\n    return 1.0;\n}\n",
        );
        assert!(matches!(
            CompiledShader::compile(src),
            Err(SquareError::ShaderCompile { .. })
        ));
    }

    #[test]
    fn missing_entry_point_is_a_compile_error() {
        let src = ShaderSource {
            entry_point: "main",
            ..ShaderSource::square_vertex()
        };
        let err = CompiledShader::compile(src).unwrap_err();
        assert!(err.to_string().contains("no vertex entry point named `main`"));
    }

    #[test]
    fn entry_point_of_wrong_stage_is_rejected() {
        let src = ShaderSource {
            stage: ShaderStage::Fragment,
            ..ShaderSource::square_vertex()
        };
        assert!(CompiledShader::compile(src).is_err());
    }
}
