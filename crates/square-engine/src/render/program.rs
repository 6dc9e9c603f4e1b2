use crate::error::{Result, SquareError};
use crate::paint::Color;

use super::shader::{CompiledShader, ShaderStage};

/// Vertex input reflected from the linked program.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveAttribute {
    pub name: String,
    pub location: u32,
    pub format: wgpu::VertexFormat,
}

/// A vertex/fragment pair whose interfaces agree.
///
/// Holding one of these means the program linked; there is no unlinked state.
#[derive(Debug)]
pub struct LinkedProgram {
    vertex: CompiledShader,
    fragment: CompiledShader,
    attributes: Vec<ActiveAttribute>,
}

impl LinkedProgram {
    /// Links two compiled stages.
    ///
    /// Checks performed:
    /// - each shader is attached to the right stage
    /// - every fragment input is written by the vertex stage with the same type
    /// - the fragment stage writes a color to location 0
    /// - every vertex input has a type a vertex buffer can feed
    pub fn link(vertex: CompiledShader, fragment: CompiledShader) -> Result<Self> {
        expect_stage(&vertex, ShaderStage::Vertex)?;
        expect_stage(&fragment, ShaderStage::Fragment)?;

        let vs_outputs = stage_outputs(&vertex);
        for input in stage_inputs(&fragment) {
            match vs_outputs.iter().find(|o| o.location == input.location) {
                None => {
                    return Err(SquareError::ProgramLink(format!(
                        "fragment input at location {} is not written by the vertex stage",
                        input.location
                    )));
                }
                Some(out) if out.inner != input.inner => {
                    return Err(SquareError::ProgramLink(format!(
                        "varying at location {} has mismatched types between stages",
                        input.location
                    )));
                }
                Some(_) => {}
            }
        }

        if !stage_outputs(&fragment).iter().any(|o| o.location == 0) {
            return Err(SquareError::ProgramLink(
                "fragment stage writes no color to location 0".into(),
            ));
        }

        let attributes = stage_inputs(&vertex)
            .into_iter()
            .map(|v| {
                let format = vertex_format(&v.inner).ok_or_else(|| {
                    SquareError::ProgramLink(format!(
                        "vertex input `{}` has a type no vertex buffer can feed",
                        v.name
                    ))
                })?;
                Ok(ActiveAttribute {
                    name: v.name,
                    location: v.location,
                    format,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "program linked ({} -> {}), {} active attribute(s)",
            vertex.entry_point(),
            fragment.entry_point(),
            attributes.len()
        );

        Ok(Self {
            vertex,
            fragment,
            attributes,
        })
    }

    #[inline]
    pub fn vertex(&self) -> &CompiledShader {
        &self.vertex
    }

    #[inline]
    pub fn fragment(&self) -> &CompiledShader {
        &self.fragment
    }

    #[inline]
    pub fn attributes(&self) -> &[ActiveAttribute] {
        &self.attributes
    }

    /// Color the fragment stage writes to location 0 when it is the same for
    /// every fragment.
    ///
    /// Only a body that immediately returns a constant expression is
    /// recognized; output depending on inputs or control flow yields `None`.
    pub fn constant_output(&self) -> Option<Color> {
        let shader = &self.fragment;
        let function = &shader.entry().function;

        match function.result.as_ref()?.binding {
            Some(naga::Binding::Location { location: 0, .. }) => {}
            _ => return None,
        }

        for statement in function.body.iter() {
            match *statement {
                naga::Statement::Emit(_) => {}
                naga::Statement::Return { value: Some(value) } => {
                    let components = const_floats(shader.module(), &function.expressions, value)?;
                    return match components[..] {
                        [r, g, b, a] => Some(Color::rgba(r, g, b, a)),
                        _ => None,
                    };
                }
                _ => return None,
            }
        }
        None
    }

    /// Resolves an attribute location by name.
    pub fn attribute(&self, name: &str) -> Result<&ActiveAttribute> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| SquareError::AttributeNotFound(name.to_string()))
    }
}

fn expect_stage(shader: &CompiledShader, expected: ShaderStage) -> Result<()> {
    if shader.stage() == expected {
        Ok(())
    } else {
        Err(SquareError::ProgramLink(format!(
            "expected a {expected} shader, got a {} shader",
            shader.stage()
        )))
    }
}

/// A user-defined (`@location`) input or output of an entry point.
struct Varying {
    name: String,
    location: u32,
    inner: naga::TypeInner,
}

fn stage_inputs(shader: &CompiledShader) -> Vec<Varying> {
    let module = shader.module();
    let mut out = Vec::new();
    for arg in &shader.entry().function.arguments {
        let name = arg.name.clone().unwrap_or_default();
        collect_varyings(module, name, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

fn stage_outputs(shader: &CompiledShader) -> Vec<Varying> {
    let module = shader.module();
    let mut out = Vec::new();
    if let Some(result) = &shader.entry().function.result {
        collect_varyings(module, String::new(), result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

// Struct-typed arguments and results carry their bindings on the members.
fn collect_varyings(
    module: &naga::Module,
    name: String,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<Varying>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(Varying {
            name,
            location: *location,
            inner: module.types[ty].inner.clone(),
        }),
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    let member_name = m.name.clone().unwrap_or_default();
                    collect_varyings(module, member_name, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

/// Flattened float components of a constant expression.
fn const_floats(
    module: &naga::Module,
    expressions: &naga::Arena<naga::Expression>,
    handle: naga::Handle<naga::Expression>,
) -> Option<Vec<f32>> {
    match expressions[handle] {
        naga::Expression::Literal(naga::Literal::F32(v)) => Some(vec![v]),
        naga::Expression::Literal(naga::Literal::F64(v) | naga::Literal::AbstractFloat(v)) => {
            Some(vec![v as f32])
        }
        naga::Expression::Compose { ref components, .. } => {
            let mut out = Vec::with_capacity(4);
            for &c in components {
                out.extend(const_floats(module, expressions, c)?);
            }
            Some(out)
        }
        naga::Expression::Splat { size, value } => {
            Some(const_floats(module, expressions, value)?.repeat(size as usize))
        }
        naga::Expression::ZeroValue(ty) => match module.types[ty].inner {
            naga::TypeInner::Scalar(_) => Some(vec![0.0]),
            naga::TypeInner::Vector { size, .. } => Some(vec![0.0; size as usize]),
            _ => None,
        },
        // Module-scope constants live in the global expression arena.
        naga::Expression::Constant(c) => {
            const_floats(module, &module.global_expressions, module.constants[c].init)
        }
        _ => None,
    }
}

/// Vertex buffer format able to feed a shader input of type `inner`.
fn vertex_format(inner: &naga::TypeInner) -> Option<wgpu::VertexFormat> {
    use naga::ScalarKind as K;
    use naga::VectorSize as N;
    use wgpu::VertexFormat as V;

    match *inner {
        naga::TypeInner::Scalar(naga::Scalar { kind, width: 4 }) => match kind {
            K::Float => Some(V::Float32),
            K::Uint => Some(V::Uint32),
            K::Sint => Some(V::Sint32),
            _ => None,
        },
        naga::TypeInner::Vector {
            size,
            scalar: naga::Scalar { kind, width: 4 },
        } => match (kind, size) {
            (K::Float, N::Bi) => Some(V::Float32x2),
            (K::Float, N::Tri) => Some(V::Float32x3),
            (K::Float, N::Quad) => Some(V::Float32x4),
            (K::Uint, N::Bi) => Some(V::Uint32x2),
            (K::Uint, N::Tri) => Some(V::Uint32x3),
            (K::Uint, N::Quad) => Some(V::Uint32x4),
            (K::Sint, N::Bi) => Some(V::Sint32x2),
            (K::Sint, N::Tri) => Some(V::Sint32x3),
            (K::Sint, N::Quad) => Some(V::Sint32x4),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::ShaderSource;
    use crate::render::COORDINATES_ATTRIBUTE;

    fn compile(stage: ShaderStage, entry: &'static str, code: &'static str) -> CompiledShader {
        CompiledShader::compile(ShaderSource::new(stage, entry, code)).unwrap()
    }

    fn square_pair() -> (CompiledShader, CompiledShader) {
        (
            CompiledShader::compile(ShaderSource::square_vertex()).unwrap(),
            CompiledShader::compile(ShaderSource::square_fragment()).unwrap(),
        )
    }

    // ── link ──────────────────────────────────────────────────────────────

    #[test]
    fn square_program_links() {
        let (vs, fs) = square_pair();
        let program = LinkedProgram::link(vs, fs).unwrap();
        assert_eq!(program.attributes().len(), 1);
    }

    #[test]
    fn swapped_stages_fail_to_link() {
        let (vs, fs) = square_pair();
        let err = LinkedProgram::link(fs, vs).unwrap_err();
        assert!(matches!(err, SquareError::ProgramLink(_)));
    }

    #[test]
    fn unmatched_fragment_input_fails_to_link() {
        let (vs, _) = square_pair();
        let fs = compile(
            ShaderStage::Fragment,
            "fs_main",
            "@fragment\nfn fs_main(@location(3) tint: vec4<f32>) -> @location(0) vec4<f32> {\n    return tint;\n}\n",
        );
        let err = LinkedProgram::link(vs, fs).unwrap_err();
        assert!(err.to_string().contains("location 3"));
    }

    #[test]
    fn mismatched_varying_type_fails_to_link() {
        let vs = compile(
            ShaderStage::Vertex,
            "vs_main",
            "struct Out {\n    @builtin(position) pos: vec4<f32>,\n    @location(0) uv: vec2<f32>,\n}\n\
             @vertex\nfn vs_main(@location(0) p: vec2<f32>) -> Out {\n    return Out(vec4<f32>(p, 0.0, 1.0), p);\n}\n",
        );
        let fs = compile(
            ShaderStage::Fragment,
            "fs_main",
            "@fragment\nfn fs_main(@location(0) uv: vec3<f32>) -> @location(0) vec4<f32> {\n    return vec4<f32>(uv, 1.0);\n}\n",
        );
        let err = LinkedProgram::link(vs, fs).unwrap_err();
        assert!(err.to_string().contains("mismatched types"));
    }

    #[test]
    fn struct_varyings_link_by_location() {
        let vs = compile(
            ShaderStage::Vertex,
            "vs_main",
            "struct Out {\n    @builtin(position) pos: vec4<f32>,\n    @location(0) uv: vec2<f32>,\n}\n\
             @vertex\nfn vs_main(@location(0) p: vec2<f32>) -> Out {\n    return Out(vec4<f32>(p, 0.0, 1.0), p);\n}\n",
        );
        let fs = compile(
            ShaderStage::Fragment,
            "fs_main",
            "@fragment\nfn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {\n    return vec4<f32>(uv, 0.0, 1.0);\n}\n",
        );
        assert!(LinkedProgram::link(vs, fs).is_ok());
    }

    // ── fragment output ───────────────────────────────────────────────────

    #[test]
    fn square_program_outputs_translucent_black() {
        let (vs, fs) = square_pair();
        let program = LinkedProgram::link(vs, fs).unwrap();
        let fill = program.constant_output().unwrap();
        assert_eq!(fill.to_array(), [0.0, 0.0, 0.0, 0.1]);
        assert_eq!(fill, Color::SQUARE_FILL);
    }

    #[test]
    fn constant_output_follows_the_fragment_source() {
        let (vs, _) = square_pair();
        let fs = compile(
            ShaderStage::Fragment,
            "fs_main",
            "@fragment\nfn fs_main() -> @location(0) vec4<f32> {\n    return vec4<f32>(1.0, 0.0, 0.0, 1.0);\n}\n",
        );
        let program = LinkedProgram::link(vs, fs).unwrap();
        assert_eq!(program.constant_output(), Some(Color::rgba(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn module_constant_and_splat_outputs_are_resolved() {
        let (vs, _) = square_pair();
        let fs = compile(
            ShaderStage::Fragment,
            "fs_main",
            "const HALF: vec4<f32> = vec4<f32>(0.5);\n\
             @fragment\nfn fs_main() -> @location(0) vec4<f32> {\n    return HALF;\n}\n",
        );
        let program = LinkedProgram::link(vs, fs).unwrap();
        assert_eq!(program.constant_output(), Some(Color::rgba(0.5, 0.5, 0.5, 0.5)));
    }

    #[test]
    fn input_dependent_output_is_not_constant() {
        let vs = compile(
            ShaderStage::Vertex,
            "vs_main",
            "struct Out {\n    @builtin(position) pos: vec4<f32>,\n    @location(0) uv: vec2<f32>,\n}\n\
             @vertex\nfn vs_main(@location(0) p: vec2<f32>) -> Out {\n    return Out(vec4<f32>(p, 0.0, 1.0), p);\n}\n",
        );
        let fs = compile(
            ShaderStage::Fragment,
            "fs_main",
            "@fragment\nfn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {\n    return vec4<f32>(uv, 0.0, 1.0);\n}\n",
        );
        let program = LinkedProgram::link(vs, fs).unwrap();
        assert_eq!(program.constant_output(), None);
    }

    // ── attributes ────────────────────────────────────────────────────────

    #[test]
    fn coordinates_resolve_by_name() {
        let (vs, fs) = square_pair();
        let program = LinkedProgram::link(vs, fs).unwrap();
        let attr = program.attribute(COORDINATES_ATTRIBUTE).unwrap();
        assert_eq!(attr.location, 0);
        assert_eq!(attr.format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn unknown_attribute_is_reported() {
        let (vs, fs) = square_pair();
        let program = LinkedProgram::link(vs, fs).unwrap();
        match program.attribute("normal") {
            Err(SquareError::AttributeNotFound(name)) => assert_eq!(name, "normal"),
            other => panic!("expected AttributeNotFound, got {other:?}"),
        }
    }

    #[test]
    fn struct_inputs_are_reflected_per_member() {
        let vs = compile(
            ShaderStage::Vertex,
            "vs_main",
            "struct In {\n    @location(2) pos: vec3<f32>,\n    @location(5) id: u32,\n}\n\
             @vertex\nfn vs_main(v: In) -> @builtin(position) vec4<f32> {\n    return vec4<f32>(v.pos, f32(v.id));\n}\n",
        );
        let (_, fs) = square_pair();
        let program = LinkedProgram::link(vs, fs).unwrap();
        assert_eq!(program.attribute("pos").unwrap().location, 2);
        assert_eq!(program.attribute("id").unwrap().format, wgpu::VertexFormat::Uint32);
    }
}
