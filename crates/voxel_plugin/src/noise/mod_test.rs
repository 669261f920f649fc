use glam::{DVec3, IVec3};

use super::*;
use crate::config::NoiseConfig;

struct FixedSampler;

impl NoiseSampler for FixedSampler {
  fn generate_chunk(&self, request: &GenerationRequest) -> Result<Box<[Voxel]>, GenerationError> {
    let count = (request.chunk_size as usize).pow(3);
    Ok(vec![Voxel::solid(1, 0); count].into_boxed_slice())
  }
}

struct FailingSampler;

impl NoiseSampler for FailingSampler {
  fn generate_chunk(&self, _request: &GenerationRequest) -> Result<Box<[Voxel]>, GenerationError> {
    Err(GenerationError::BackendUnavailable)
  }
}

fn request() -> GenerationRequest {
  GenerationRequest {
    chunk_coord: IVec3::new(1, 0, -1),
    lod_level: 0,
    chunk_size: 8,
    voxel_size: 1.0,
    world_origin: DVec3::ZERO,
    noise: NoiseConfig::default(),
    world_mode: crate::config::WorldMode::InfinitePlane,
    sea_level: 0.0,
    height_scale: 10.0,
    base_height: 0.0,
  }
}

#[test]
fn sampler_trait_object_is_usable() {
  let sampler: Box<dyn NoiseSampler> = Box::new(FixedSampler);
  let voxels = sampler.generate_chunk(&request()).expect("generation succeeds");
  assert_eq!(voxels.len(), 512);
  assert!(voxels[0].is_solid());
}

#[test]
fn sampler_error_propagates() {
  let sampler: Box<dyn NoiseSampler> = Box::new(FailingSampler);
  let err = sampler.generate_chunk(&request()).unwrap_err();
  assert_eq!(err, GenerationError::BackendUnavailable);
}

#[test]
fn local_to_world_min_matches_chunk_min_at_origin() {
  let p = local_to_world_min(IVec3::ZERO, IVec3::ZERO, 8, 2.0);
  assert_eq!(p, DVec3::ZERO);
}

#[test]
fn local_to_world_min_offsets_within_chunk() {
  let p = local_to_world_min(IVec3::new(1, 0, 0), IVec3::new(3, 4, 5), 8, 2.0);
  assert_eq!(p, DVec3::new(16.0 + 6.0, 8.0, 10.0));
}
