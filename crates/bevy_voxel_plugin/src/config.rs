//! Bevy-facing world settings, mirroring §6's closed configuration set.
//!
//! Kept as a plain `Resource` rather than folding straight into
//! [`voxel_plugin::WorldConfig`] so the host can tweak it via the inspector /
//! `bevy-inspector-egui` without touching the engine-core type, the same
//! separation the teacher drew between `VoxelVolumeConfig` and the domain.

use bevy::prelude::*;
use glam::DVec3;

use voxel_plugin::config::{MeshingMode, NoiseConfig, WorldMode};
use voxel_plugin::lod::LodBand;
use voxel_plugin::WorldConfig;

/// Top-level knobs exposed to the host application. `into_world_config`
/// assembles the engine core's [`WorldConfig`] from this plus the default
/// LOD band ladder when `lod_bands` is left empty.
#[derive(Resource, Clone, Debug)]
pub struct VoxelWorldSettings {
  pub world_mode: WorldMode,
  pub world_origin: DVec3,
  pub world_radius: f64,

  pub meshing_mode: MeshingMode,

  pub voxel_size: f64,
  pub chunk_size: i32,
  pub world_seed: i32,

  pub lod_bands: Vec<LodBand>,
  pub enable_lod_morphing: bool,
  pub enable_frustum_culling: bool,
  pub view_distance: f64,

  pub max_chunks_to_load_per_frame: usize,
  pub max_chunks_to_unload_per_frame: usize,
  pub streaming_time_slice_ms: f64,
  pub max_loaded_chunks: usize,

  pub generate_collision: bool,
  pub collision_lod_level: i32,
  pub collision_radius: f64,

  pub noise: NoiseConfig,
  pub sea_level: f64,
  pub height_scale: f64,
  pub base_height: f64,
}

impl Default for VoxelWorldSettings {
  fn default() -> Self {
    let defaults = WorldConfig::default();
    Self {
      world_mode: defaults.world_mode,
      world_origin: DVec3::new(defaults.world_origin.x, defaults.world_origin.y, defaults.world_origin.z),
      world_radius: defaults.world_radius,
      meshing_mode: defaults.meshing_mode,
      voxel_size: defaults.voxel_size,
      chunk_size: defaults.chunk_size,
      world_seed: defaults.world_seed,
      lod_bands: default_lod_bands(),
      enable_lod_morphing: defaults.enable_lod_morphing,
      enable_frustum_culling: defaults.enable_frustum_culling,
      view_distance: defaults.view_distance,
      max_chunks_to_load_per_frame: defaults.max_chunks_to_load_per_frame,
      max_chunks_to_unload_per_frame: defaults.max_chunks_to_unload_per_frame,
      streaming_time_slice_ms: defaults.streaming_time_slice_ms,
      max_loaded_chunks: defaults.max_loaded_chunks,
      generate_collision: defaults.generate_collision,
      collision_lod_level: defaults.collision_lod_level,
      collision_radius: 3_000.0,
      noise: defaults.noise,
      sea_level: defaults.sea_level,
      height_scale: defaults.height_scale,
      base_height: defaults.base_height,
    }
  }
}

/// Three-band ladder (finest/mid/coarse) with morph ranges, used whenever the
/// host doesn't supply its own `LODBands` list.
fn default_lod_bands() -> Vec<LodBand> {
  vec![
    LodBand { min_distance: 0.0, max_distance: 1_500.0, lod_level: 0, voxel_stride: 1, chunk_size: 64, morph_range: 300.0 },
    LodBand { min_distance: 1_500.0, max_distance: 7_000.0, lod_level: 1, voxel_stride: 2, chunk_size: 32, morph_range: 600.0 },
    LodBand { min_distance: 7_000.0, max_distance: 20_000.0, lod_level: 2, voxel_stride: 4, chunk_size: 32, morph_range: 1_500.0 },
  ]
}

impl VoxelWorldSettings {
  pub fn into_world_config(self) -> WorldConfig {
    WorldConfig {
      world_mode: self.world_mode,
      world_origin: glam::DVec3::new(self.world_origin.x, self.world_origin.y, self.world_origin.z),
      world_radius: self.world_radius,
      meshing_mode: self.meshing_mode,
      voxel_size: self.voxel_size,
      chunk_size: self.chunk_size,
      world_seed: self.world_seed,
      lod_bands: if self.lod_bands.is_empty() { default_lod_bands() } else { self.lod_bands },
      enable_lod_morphing: self.enable_lod_morphing,
      enable_frustum_culling: self.enable_frustum_culling,
      view_distance: self.view_distance,
      max_chunks_to_load_per_frame: self.max_chunks_to_load_per_frame,
      max_chunks_to_unload_per_frame: self.max_chunks_to_unload_per_frame,
      streaming_time_slice_ms: self.streaming_time_slice_ms,
      max_loaded_chunks: self.max_loaded_chunks,
      use_gpu_renderer: true,
      generate_collision: self.generate_collision,
      collision_lod_level: self.collision_lod_level,
      noise: self.noise,
      sea_level: self.sea_level,
      height_scale: self.height_scale,
      base_height: self.base_height,
    }
    .validate()
  }
}
