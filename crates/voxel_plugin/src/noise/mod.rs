//! The noise generator interface consumed by the chunk manager's generation
//! phase, plus one illustrative terrain implementation.
//!
//! Per §1's scope boundary, the *algorithm* behind procedural noise is not
//! part of this specification — the engine only depends on the
//! [`NoiseSampler`] trait. [`TerrainNoiseSampler`] is provided as a working
//! default, grounded on the teacher's `FastNoise2Terrain`/`SimdNoiseTerrain`
//! samplers, but a host is free to substitute its own.

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
pub use native::NoiseNode;
#[cfg(target_arch = "wasm32")]
pub use wasm::NoiseNode;

/// Encoded FastNoise2 node-tree presets. Re-exported from `voxel_noise` on
/// native; `voxel_noise` isn't linked on wasm32 (its FFI is native-only), so
/// the same preset string is inlined there instead.
#[cfg(not(target_arch = "wasm32"))]
pub use voxel_noise::presets;
#[cfg(target_arch = "wasm32")]
pub mod presets {
  pub const SIMPLE_TERRAIN: &str =
    "E@BBZEE@BD8JFgIECArXIzwECiQIw/UoPwkuAAE@BJDQAE@BC@AIEAJBwQDZmYmPwsAAIA/HAMAAHBCBA==";
}

mod terrain;
pub use terrain::TerrainNoiseSampler;

use glam::{DVec3, IVec3};

use crate::chunk::ChunkId;
use crate::config::{NoiseConfig, WorldMode};
use crate::voxel::Voxel;

/// Everything the generation phase hands the noise generator for one chunk,
/// per §4.6's "synthesize a noise-generation request".
#[derive(Clone, Debug)]
pub struct GenerationRequest {
  pub chunk_coord: ChunkId,
  pub lod_level: i32,
  pub chunk_size: i32,
  pub voxel_size: f64,
  pub world_origin: DVec3,
  pub noise: NoiseConfig,
  pub world_mode: WorldMode,
  pub sea_level: f64,
  pub height_scale: f64,
  pub base_height: f64,
}

/// Why a generation request failed. Always collapses to a retry at the
/// chunk-manager level (§7 `TransientFailure`), never propagated further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
  #[error("noise backend unavailable")]
  BackendUnavailable,
}

/// The capability the chunk manager's generation phase depends on: fill one
/// chunk's worth of voxels from `request`.
pub trait NoiseSampler: Send + Sync {
  fn generate_chunk(&self, request: &GenerationRequest) -> Result<Box<[Voxel]>, GenerationError>;
}

/// Chunk-local voxel coordinate to world position, duplicated here (rather
/// than calling into [`crate::coords`]) because the noise grid is sampled
/// at voxel *corners* offset by the chunk's world-space minimum, not at
/// voxel centers.
#[inline]
fn local_to_world_min(chunk_coord: IVec3, local: IVec3, chunk_size: i32, voxel_size: f64) -> DVec3 {
  crate::coords::chunk_to_world_min(chunk_coord, chunk_size, voxel_size)
    + DVec3::new(local.x as f64, local.y as f64, local.z as f64) * voxel_size
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
