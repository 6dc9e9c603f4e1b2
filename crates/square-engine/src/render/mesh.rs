use wgpu::util::DeviceExt;

/// Static mesh of the square: 4 clip-space positions, 2 triangles.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SquareMesh {
    /// Interleaved `x, y` pairs.
    pub vertices: [f32; 8],
    /// Triangle list over `vertices`.
    pub indices: [u16; 6],
}

impl SquareMesh {
    /// Unit-ish square centered on the origin, half a clip unit on each side.
    pub const UNIT: Self = Self {
        vertices: [-0.5, 0.5, -0.5, -0.5, 0.5, -0.5, 0.5, 0.5],
        indices: [0, 1, 2, 0, 2, 3],
    };

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Bytes uploaded to the vertex buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Bytes uploaded to the index buffer.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Position of vertex `index`, or `None` past the last vertex.
    #[inline]
    pub fn position(&self, index: u16) -> Option<[f32; 2]> {
        let i = index as usize * 2;
        Some([*self.vertices.get(i)?, *self.vertices.get(i + 1)?])
    }

    /// Triangles in draw order, resolved through the index list.
    ///
    /// A triangle referencing a vertex that does not exist is skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 2]; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .filter_map(|t| Some([self.position(t[0])?, self.position(t[1])?, self.position(t[2])?]))
    }

    /// Creates the vertex and index buffers, filled with the mesh data.
    ///
    /// Buffers are created initialized; there is no bind/fill/unbind dance and
    /// no binding state is left behind on the device.
    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffers {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("square vbo"),
            contents: self.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("square ibo"),
            contents: self.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffers {
            vertex,
            index,
            index_count: self.index_count(),
        }
    }
}

/// Decodes vertex buffer contents back into positions.
pub fn read_back_vertices(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(std::mem::size_of::<f32>())
        .map(bytemuck::pod_read_unaligned::<f32>)
        .collect()
}

/// Decodes index buffer contents back into 16-bit indices.
pub fn read_back_indices(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(std::mem::size_of::<u16>())
        .map(bytemuck::pod_read_unaligned::<u16>)
        .collect()
}

/// GPU-resident copy of a [`SquareMesh`].
///
/// Lives as long as the renderer; never rewritten.
pub struct MeshBuffers {
    pub vertex: wgpu::Buffer,
    pub index: wgpu::Buffer,
    pub index_count: u32,
}
