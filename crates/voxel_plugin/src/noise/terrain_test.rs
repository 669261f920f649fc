use glam::{DVec3, IVec3};

use super::*;
use crate::config::{NoiseConfig, WorldMode};

fn request(chunk_coord: IVec3) -> GenerationRequest {
  GenerationRequest {
    chunk_coord,
    lod_level: 0,
    chunk_size: 16,
    voxel_size: 1.0,
    world_origin: DVec3::ZERO,
    noise: NoiseConfig::default(),
    world_mode: WorldMode::InfinitePlane,
    sea_level: -1000.0,
    height_scale: 20.0,
    base_height: 0.0,
  }
}

#[test]
fn generates_full_chunk() {
  let sampler = TerrainNoiseSampler::new();
  let req = request(IVec3::ZERO);
  let voxels = sampler.generate_chunk(&req).expect("generation succeeds");
  assert_eq!(voxels.len(), 16 * 16 * 16);
}

#[test]
fn deep_chunk_is_mostly_solid() {
  let sampler = TerrainNoiseSampler::new();
  let req = request(IVec3::new(0, -4, 0));
  let voxels = sampler.generate_chunk(&req).expect("generation succeeds");
  let solid_count = voxels.iter().filter(|v| v.is_solid()).count();
  assert!(solid_count > voxels.len() / 2, "expected mostly solid terrain deep underground");
}

#[test]
fn high_chunk_is_mostly_air() {
  let sampler = TerrainNoiseSampler::new();
  let req = request(IVec3::new(0, 100, 0));
  let voxels = sampler.generate_chunk(&req).expect("generation succeeds");
  let solid_count = voxels.iter().filter(|v| v.is_solid()).count();
  assert!(solid_count < voxels.len() / 4, "expected mostly air far above the surface");
}

#[test]
fn deterministic_for_same_request() {
  let sampler = TerrainNoiseSampler::new();
  let req = request(IVec3::new(2, 0, -3));
  let a = sampler.generate_chunk(&req).expect("generation succeeds");
  let b = sampler.generate_chunk(&req).expect("generation succeeds");
  assert_eq!(a, b);
}

#[test]
fn water_fills_below_sea_level_in_open_air() {
  let sampler = TerrainNoiseSampler::new();
  let mut req = request(IVec3::new(0, 50, 0));
  req.sea_level = 1_000_000.0;
  let voxels = sampler.generate_chunk(&req).expect("generation succeeds");
  assert!(voxels.iter().any(|v| v.has_water()));
  assert!(voxels.iter().all(|v| !v.has_cave()));
}
