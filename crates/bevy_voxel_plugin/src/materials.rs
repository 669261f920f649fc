//! Triplanar voxel material, grounded on the teacher's
//! `infra/bevy_adapters/materials.rs`. Outside this spec's scope (§1 excludes
//! "the shader/material system") but still the ambient rendering surface a
//! mesh handoff needs somewhere to land — the secondary UV channel
//! (material_id, face_type) and per-vertex color (biome_id, AO) that
//! [`voxel_plugin::meshing::ChunkMeshData`] emits are read by
//! `shaders/triplanar_pbr.wgsl`, supplied by the host application.

use bevy::pbr::{ExtendedMaterial, MaterialExtension};
use bevy::prelude::*;
use bevy::render::render_resource::{AsBindGroup, ShaderRef};

pub type VoxelMaterial = ExtendedMaterial<StandardMaterial, TriplanarExtension>;

#[derive(Resource, Clone)]
pub struct VoxelMaterialResource {
  pub handle: Handle<VoxelMaterial>,
}

/// Samples a stacked 2D-array texture by `material_id` (the mesh's secondary
/// UV's first component), blended triplanar to avoid stretching on steep
/// cubic/Transvoxel faces.
#[derive(Asset, AsBindGroup, Reflect, Debug, Clone)]
pub struct TriplanarExtension {
  #[texture(100, dimension = "2d_array")]
  #[sampler(101)]
  pub albedo_array: Handle<Image>,
  #[uniform(102)]
  pub tiling_scale: f32,
  #[uniform(103)]
  pub layer_count: u32,
}

impl Default for TriplanarExtension {
  fn default() -> Self {
    Self { albedo_array: Default::default(), tiling_scale: 0.08, layer_count: 1 }
  }
}

impl MaterialExtension for TriplanarExtension {
  fn fragment_shader() -> ShaderRef {
    ShaderRef::Path("shaders/triplanar_pbr.wgsl".into())
  }
}

/// Startup system: load the albedo array once and publish it as a resource.
/// Idempotent so it can be ordered alongside the other startup systems
/// without re-inserting the handle on a second plugin build.
pub fn init_voxel_materials_system(
  mut commands: Commands,
  mut materials: ResMut<Assets<VoxelMaterial>>,
  asset_server: Res<AssetServer>,
  existing: Option<Res<VoxelMaterialResource>>,
) {
  if existing.is_some() {
    return;
  }

  let texture = asset_server.load("generated/albedo_array_stacked.png");
  let material = materials.add(ExtendedMaterial {
    base: StandardMaterial { base_color: Color::WHITE, perceptual_roughness: 0.9, metallic: 0.0, ..default() },
    extension: TriplanarExtension { albedo_array: texture, tiling_scale: 0.08, layer_count: 16 },
  });
  commands.insert_resource(VoxelMaterialResource { handle: material });
}
