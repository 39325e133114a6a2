//! Loading of meshes and textures from asset files on disk.

use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::data_structures::mesh::{Mesh, MeshVertex};
use crate::data_structures::texture::Texture;

/// Resolve a file name below the crate's `assets/` directory.
pub fn asset_path(file_name: &str) -> PathBuf {
    Path::new("assets").join(file_name)
}

pub fn load_string(file_name: &str) -> anyhow::Result<String> {
    let path = asset_path(file_name);
    std::fs::read_to_string(&path).with_context(|| format!("reading asset {}", path.display()))
}

pub fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_path(file_name);
    std::fs::read(&path).with_context(|| format!("reading asset {}", path.display()))
}

/// Parse OBJ text into the sample's vertex format, uniformly scaled.
///
/// All models in the file are merged into one vertex/index list. Texture
/// coordinates are flipped vertically to match wgpu's texture origin; missing
/// attributes default to zero.
pub fn read_obj(obj_text: &str, scale: f32) -> anyhow::Result<(Vec<MeshVertex>, Vec<u32>)> {
    let mut reader = BufReader::new(Cursor::new(obj_text));
    let (models, _materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        // Materials are ignored; the sample binds its textures directly.
        |_| Ok(Default::default()),
    )?;

    let mut vertices = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    for m in &models {
        let base = vertices.len() as u32;
        vertices.extend((0..m.mesh.positions.len() / 3).map(|i| MeshVertex {
            position: [
                m.mesh.positions[i * 3] * scale,
                m.mesh.positions[i * 3 + 1] * scale,
                m.mesh.positions[i * 3 + 2] * scale,
            ],
            tex_coords: [
                m.mesh.texcoords.get(i * 2).copied().unwrap_or(0.0),
                1.0 - m.mesh.texcoords.get(i * 2 + 1).copied().unwrap_or(0.0),
            ],
            normal: [
                m.mesh.normals.get(i * 3).copied().unwrap_or(0.0),
                m.mesh.normals.get(i * 3 + 1).copied().unwrap_or(0.0),
                m.mesh.normals.get(i * 3 + 2).copied().unwrap_or(0.0),
            ],
        }));
        indices.extend(m.mesh.indices.iter().map(|&i| base + i));
    }

    Ok((vertices, indices))
}

/// Load an OBJ file from `assets/` and upload it as a [`Mesh`].
pub fn load_mesh_obj(device: &wgpu::Device, file_name: &str, scale: f32) -> anyhow::Result<Mesh> {
    let obj_text = load_string(file_name)?;
    let (vertices, indices) = read_obj(&obj_text, scale)?;
    if indices.is_empty() {
        anyhow::bail!("{file_name} contains no triangles");
    }
    Ok(Mesh::new(device, file_name, &vertices, &indices))
}

/// Load an image file from `assets/` and upload it as a [`Texture`].
pub fn load_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    file_name: &str,
) -> anyhow::Result<Texture> {
    let data = load_binary(file_name)?;
    Texture::from_bytes(device, queue, &data, file_name, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

    #[test]
    fn reads_a_single_triangle() {
        let (vertices, indices) = read_obj(TRIANGLE_OBJ, 1.0).unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
        // v is flipped for wgpu's top-left texture origin.
        assert_eq!(vertices[2].tex_coords, [0.0, 0.0]);
    }

    #[test]
    fn scale_applies_to_positions_only() {
        let (vertices, _) = read_obj(TRIANGLE_OBJ, 0.5).unwrap();
        assert_eq!(vertices[1].position, [0.5, 0.0, 0.0]);
        assert_eq!(vertices[1].tex_coords, [1.0, 1.0]);
    }
}
