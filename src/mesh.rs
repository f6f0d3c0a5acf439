//! Mesh data model and GPU buffer upload.
//!
//! Meshes arrive fully loaded from the host; this module only encodes
//! them into device buffers. `Mesh::cube` provides the built-in demo
//! geometry.

use bytemuck::{Pod, Zeroable};

use crate::gpu::GpuContext;

/// Tightly packed vertex record: position, normal, vertex color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }

    /// Vertex buffer layout matching `shaders/mesh.wgsl` locations 0-2.
    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Immutable triangle-list mesh with face-vertex indices.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Cube with per-face normals and colors, centered at the origin.
    pub fn cube() -> Self {
        #[rustfmt::skip]
        const FACES: [([f32; 3], [[f32; 3]; 4], [f32; 4]); 6] = [
            // +Z
            ([ 0.0,  0.0,  1.0], [[-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0]], [0.8, 0.2, 0.2, 1.0]),
            // -Z
            ([ 0.0,  0.0, -1.0], [[ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0]], [0.2, 0.8, 0.2, 1.0]),
            // +X
            ([ 1.0,  0.0,  0.0], [[ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0]], [0.2, 0.2, 0.8, 1.0]),
            // -X
            ([-1.0,  0.0,  0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0]], [0.8, 0.8, 0.2, 1.0]),
            // +Y
            ([ 0.0,  1.0,  0.0], [[-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0]], [0.8, 0.2, 0.8, 1.0]),
            // -Y
            ([ 0.0, -1.0,  0.0], [[-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0]], [0.2, 0.8, 0.8, 1.0]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, corners, color) in FACES {
            let base = vertices.len() as u32;
            for corner in corners {
                vertices.push(Vertex::new(corner, normal, color));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self { vertices, indices }
    }
}

/// Device-resident mesh data, uploaded once per prepared session.
pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffers {
    /// Encodes vertices and 32-bit indices into device buffers.
    pub fn upload(gpu: &GpuContext, mesh: &Mesh) -> Self {
        let vertex_buffer = gpu.create_buffer_init(
            "Mesh Vertex Buffer",
            bytemuck::cast_slice(&mesh.vertices),
            wgpu::BufferUsages::VERTEX,
        );
        let index_buffer = gpu.create_buffer_init(
            "Mesh Index Buffer",
            bytemuck::cast_slice(&mesh.indices),
            wgpu::BufferUsages::INDEX,
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_size() {
        assert_eq!(std::mem::size_of::<Vertex>(), 40);
    }

    #[test]
    fn test_cube_counts() {
        let mesh = Mesh::cube();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.index_count(), 36);
    }
}
