use crate::error::{Result, SquareError};

use super::program::ActiveAttribute;

/// Component type of a vertex attribute as stored in the buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ComponentType {
    Float32,
    Uint8,
    Sint8,
    Uint16,
    Sint16,
}

/// Describes how an attribute reads from the bound vertex buffer.
///
/// Field meanings follow the classic attribute-pointer call: `size` components
/// of `component`, optionally normalized, `stride` bytes apart (`0` means
/// tightly packed) starting `offset` bytes into the buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttributePointer {
    pub size: u32,
    pub component: ComponentType,
    pub normalized: bool,
    pub stride: u64,
    pub offset: u64,
}

impl AttributePointer {
    /// Two floats per vertex, packed, from the start of the buffer.
    pub const POSITION_2D: Self = Self {
        size: 2,
        component: ComponentType::Float32,
        normalized: false,
        stride: 0,
        offset: 0,
    };

    /// Vertex format the shader sees, if the combination exists.
    ///
    /// `normalized` has no effect on float components.
    pub fn vertex_format(&self) -> Option<wgpu::VertexFormat> {
        use wgpu::VertexFormat as V;
        use ComponentType as C;

        let format = match (self.component, self.size, self.normalized) {
            (C::Float32, 1, _) => V::Float32,
            (C::Float32, 2, _) => V::Float32x2,
            (C::Float32, 3, _) => V::Float32x3,
            (C::Float32, 4, _) => V::Float32x4,

            (C::Uint8, 2, false) => V::Uint8x2,
            (C::Uint8, 4, false) => V::Uint8x4,
            (C::Uint8, 2, true) => V::Unorm8x2,
            (C::Uint8, 4, true) => V::Unorm8x4,
            (C::Sint8, 2, false) => V::Sint8x2,
            (C::Sint8, 4, false) => V::Sint8x4,
            (C::Sint8, 2, true) => V::Snorm8x2,
            (C::Sint8, 4, true) => V::Snorm8x4,

            (C::Uint16, 2, false) => V::Uint16x2,
            (C::Uint16, 4, false) => V::Uint16x4,
            (C::Uint16, 2, true) => V::Unorm16x2,
            (C::Uint16, 4, true) => V::Unorm16x4,
            (C::Sint16, 2, false) => V::Sint16x2,
            (C::Sint16, 4, false) => V::Sint16x4,
            (C::Sint16, 2, true) => V::Snorm16x2,
            (C::Sint16, 4, true) => V::Snorm16x4,

            _ => return None,
        };
        Some(format)
    }

    /// Points `attribute` at the vertex buffer with this layout.
    ///
    /// Fails if the pointer cannot produce the type the shader declared.
    pub fn bind(&self, attribute: &ActiveAttribute) -> Result<AttributeBinding> {
        let format = self.vertex_format().ok_or_else(|| SquareError::UnsupportedPointer {
            name: attribute.name.clone(),
            size: self.size,
            component: self.component,
        })?;

        if format != attribute.format {
            return Err(SquareError::AttributeMismatch {
                name: attribute.name.clone(),
                declared: attribute.format,
                bound: format,
            });
        }

        let array_stride = if self.stride == 0 { format.size() } else { self.stride };

        log::debug!(
            "attribute `{}` bound at location {} as {format:?} (stride {array_stride}, offset {})",
            attribute.name,
            attribute.location,
            self.offset
        );

        Ok(AttributeBinding {
            name: attribute.name.clone(),
            attributes: [wgpu::VertexAttribute {
                format,
                offset: self.offset,
                shader_location: attribute.location,
            }],
            array_stride,
        })
    }
}

/// An enabled attribute: the vertex buffer layout the pipeline is built with.
#[derive(Debug, Clone)]
pub struct AttributeBinding {
    name: String,
    attributes: [wgpu::VertexAttribute; 1],
    array_stride: u64,
}

impl AttributeBinding {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn location(&self) -> u32 {
        self.attributes[0].shader_location
    }

    #[inline]
    pub fn format(&self) -> wgpu::VertexFormat {
        self.attributes[0].format
    }

    #[inline]
    pub fn offset(&self) -> u64 {
        self.attributes[0].offset
    }

    #[inline]
    pub fn array_stride(&self) -> u64 {
        self.array_stride
    }

    pub fn layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}
