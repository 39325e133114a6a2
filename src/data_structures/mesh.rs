//! Meshes: vertex format, GPU buffers and the procedural cube.

use wgpu::util::DeviceExt;

/// Types that describe their own vertex buffer layout.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// The vertex format used by every mesh in the sample.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for MeshVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x2,
            2 => Float32x3,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// A mesh uploaded to the GPU: vertex and index buffer plus element count.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl Mesh {
    pub fn new(device: &wgpu::Device, name: &str, vertices: &[MeshVertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Vertex Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Index Buffer")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: indices.len() as u32,
        }
    }

    /// Axis-aligned cube centered at the origin.
    pub fn cube(device: &wgpu::Device, half_extent: f32) -> Self {
        let (vertices, indices) = cube_geometry(half_extent);
        Self::new(device, "cube", &vertices, &indices)
    }
}

/// Cube geometry with per-face normals and texture coordinates.
///
/// 24 vertices (4 per face, so normals and UVs stay flat) and 36 indices in
/// counter-clockwise winding.
pub fn cube_geometry(half_extent: f32) -> (Vec<MeshVertex>, Vec<u32>) {
    let p = half_extent;
    let face = |corners: [[f32; 3]; 4], normal: [f32; 3]| -> Vec<MeshVertex> {
        let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        corners
            .iter()
            .zip(uvs.iter())
            .map(|(&position, &tex_coords)| MeshVertex {
                position,
                tex_coords,
                normal,
            })
            .collect()
    };

    let mut vertices = Vec::with_capacity(24);
    // +Z
    vertices.extend(face(
        [[-p, -p, p], [p, -p, p], [p, p, p], [-p, p, p]],
        [0.0, 0.0, 1.0],
    ));
    // -Z
    vertices.extend(face(
        [[p, -p, -p], [-p, -p, -p], [-p, p, -p], [p, p, -p]],
        [0.0, 0.0, -1.0],
    ));
    // +X
    vertices.extend(face(
        [[p, -p, p], [p, -p, -p], [p, p, -p], [p, p, p]],
        [1.0, 0.0, 0.0],
    ));
    // -X
    vertices.extend(face(
        [[-p, -p, -p], [-p, -p, p], [-p, p, p], [-p, p, -p]],
        [-1.0, 0.0, 0.0],
    ));
    // +Y
    vertices.extend(face(
        [[-p, p, p], [p, p, p], [p, p, -p], [-p, p, -p]],
        [0.0, 1.0, 0.0],
    ));
    // -Y
    vertices.extend(face(
        [[-p, -p, -p], [p, -p, -p], [p, -p, p], [-p, -p, p]],
        [0.0, -1.0, 0.0],
    ));

    let indices = (0..6u32)
        .flat_map(|f| {
            let base = f * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect();

    (vertices, indices)
}

/// Render pass extension for drawing a [`Mesh`].
pub trait DrawMesh {
    fn draw_mesh(&mut self, mesh: &Mesh);
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_mesh(&mut self, mesh: &Mesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.num_elements, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_four_vertices_per_face() {
        let (vertices, indices) = cube_geometry(0.5);
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
    }

    #[test]
    fn cube_indices_stay_in_range() {
        let (vertices, indices) = cube_geometry(0.5);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn cube_extents_match_the_half_extent() {
        let (vertices, _) = cube_geometry(0.25);
        for v in &vertices {
            for c in v.position {
                assert_eq!(c.abs(), 0.25);
            }
        }
    }

    #[test]
    fn cube_normals_point_out_of_their_face() {
        let (vertices, _) = cube_geometry(1.0);
        for v in &vertices {
            // The position component along the normal axis has the normal's sign.
            let dot = v.position[0] * v.normal[0]
                + v.position[1] * v.normal[1]
                + v.position[2] * v.normal[2];
            assert_eq!(dot, 1.0);
        }
    }
}
