//! Converts [`voxel_plugin::meshing::ChunkMeshData`] into a Bevy `Mesh`.
//!
//! This is the "concrete packing is the renderer's concern" half of §1's
//! Non-goals: the engine hands over positions/normals/UVs/material ids, and
//! this module is where that becomes an actual `Mesh` asset, grounded on the
//! teacher's `infra/meshing/surface_nets_adapter.rs` (which did the same
//! `SurfaceNetsBuffer -> Mesh` conversion for its single mesher).

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

use voxel_plugin::meshing::ChunkMeshData;

/// Secondary UV (material_id, face_type) and per-vertex color (reserved,
/// biome_id, AO<<6, 255) both ride along as extra vertex attributes rather
/// than being folded into `ATTRIBUTE_COLOR`, so the shader can decode them
/// without sRGB reinterpretation surprises.
pub const ATTRIBUTE_SECONDARY_UV: MeshVertexAttribute = MeshVertexAttribute::new("SecondaryUv", 988_540_917, VertexFormat::Float32x2);
pub const ATTRIBUTE_VOXEL_COLOR: MeshVertexAttribute = MeshVertexAttribute::new("VoxelColor", 988_540_918, VertexFormat::Float32x4);

use bevy::render::mesh::MeshVertexAttribute;
use bevy::render::render_resource::VertexFormat;

/// Build a renderable `Mesh` from a completed mesh payload. Returns `None`
/// for an empty/invalid payload (the caller should treat that the same as
/// "nothing to upload", not an error — see §4.8).
pub fn build_bevy_mesh(data: &ChunkMeshData) -> Option<Mesh> {
  if !data.is_valid() {
    return None;
  }

  let colors: Vec<[f32; 4]> = data.colors.iter().map(|c| [c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0, c[3] as f32 / 255.0]).collect();

  let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
  mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions.clone());
  mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals.clone());
  mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, data.uv0.clone());
  mesh.insert_attribute(ATTRIBUTE_SECONDARY_UV, data.secondary_uv.clone());
  mesh.insert_attribute(ATTRIBUTE_VOXEL_COLOR, colors);
  mesh.insert_indices(Indices::U32(data.indices.clone()));
  Some(mesh)
}

/// The same conversion, consuming the payload to skip the position/normal
/// clones — used on the hot path (mesh-complete handoff) where the `ChunkMeshData`
/// isn't needed afterward.
pub fn into_bevy_mesh(data: ChunkMeshData) -> Option<Mesh> {
  if !data.is_valid() {
    return None;
  }
  let colors: Vec<[f32; 4]> = data.colors.iter().map(|c| [c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0, c[3] as f32 / 255.0]).collect();
  let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
  mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions);
  mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals);
  mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, data.uv0);
  mesh.insert_attribute(ATTRIBUTE_SECONDARY_UV, data.secondary_uv);
  mesh.insert_attribute(ATTRIBUTE_VOXEL_COLOR, colors);
  mesh.insert_indices(Indices::U32(data.indices));
  Some(mesh)
}
