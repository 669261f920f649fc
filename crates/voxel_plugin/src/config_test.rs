use super::*;

#[test]
fn default_matches_documented_defaults() {
  let cfg = WorldConfig::default();
  assert_eq!(cfg.world_mode, WorldMode::InfinitePlane);
  assert_eq!(cfg.voxel_size, 100.0);
  assert_eq!(cfg.chunk_size, 32);
  assert_eq!(cfg.meshing_mode, MeshingMode::Cubic);
  assert_eq!(cfg.view_distance, 10_000.0);
  assert_eq!(cfg.max_chunks_to_load_per_frame, 4);
  assert_eq!(cfg.max_chunks_to_unload_per_frame, 8);
  assert_eq!(cfg.streaming_time_slice_ms, 2.0);
  assert_eq!(cfg.max_loaded_chunks, 2000);
  assert_eq!(cfg.collision_lod_level, 1);
}

#[test]
fn builder_overrides_take_effect() {
  let cfg = WorldConfig::default()
    .with_chunk_size(64)
    .with_voxel_size(50.0)
    .with_world_mode(WorldMode::SphericalPlanet);
  assert_eq!(cfg.chunk_size, 64);
  assert_eq!(cfg.voxel_size, 50.0);
  assert_eq!(cfg.world_mode, WorldMode::SphericalPlanet);
}

#[test]
fn validate_clamps_out_of_range_chunk_size() {
  let cfg = WorldConfig::default().with_chunk_size(999).validate();
  assert_eq!(cfg.chunk_size, crate::constants::MAX_CHUNK_SIZE);

  let cfg = WorldConfig::default().with_chunk_size(1).validate();
  assert_eq!(cfg.chunk_size, crate::constants::MIN_CHUNK_SIZE);
}

#[test]
fn validate_clamps_voxel_size() {
  let cfg = WorldConfig::default().with_voxel_size(5000.0).validate();
  assert_eq!(cfg.voxel_size, 1000.0);
}

#[test]
fn vertical_chunk_range_matches_world_mode() {
  assert_eq!(
    WorldConfig::default().with_world_mode(WorldMode::InfinitePlane).vertical_chunk_range(),
    (-2, 8)
  );
  assert_eq!(
    WorldConfig::default().with_world_mode(WorldMode::SphericalPlanet).vertical_chunk_range(),
    (-32, 32)
  );
}

#[test]
fn chunk_world_size_multiplies_size_by_voxel_size() {
  let cfg = WorldConfig::default().with_chunk_size(32).with_voxel_size(2.0);
  assert_eq!(cfg.chunk_world_size(), 64.0);
}
