//! Height-field terrain sampler: the default [`NoiseSampler`] implementation.
//!
//! Grounded on the teacher's `FastNoise2Terrain`/`SimdNoiseTerrain` samplers
//! (`noise/terrain.rs`, `noise/simdnoise_terrain.rs`): a 2D height-noise
//! grid intersected with a Y gradient produces solid ground, a second,
//! higher-frequency 3D noise grid carves caves, and a sea-level pass fills
//! any remaining open-air voxel below `sea_level` with water — skipping
//! cave-carved air so underground caverns don't flood, per §3's `CAVE`
//! flag ("temporarily marked as carved by cave generation; cleared after
//! water fill").

use crate::constants::coord_to_index;
use crate::voxel::Voxel;

use super::{presets, GenerationError, GenerationRequest, NoiseNode, NoiseSampler};

/// Cave noise values above this threshold (noise output is roughly
/// `[-1, 1]`) are carved into air.
const CAVE_THRESHOLD: f32 = 0.62;

/// Biome bucket count the default biome noise quantizes into.
const BIOME_COUNT: u8 = 4;

/// Height-field terrain generator backed by [`NoiseNode`].
#[derive(Clone, Copy, Debug)]
pub struct TerrainNoiseSampler {
  encoded: &'static str,
  cave_frequency_multiplier: f64,
  biome_frequency_multiplier: f64,
}

impl Default for TerrainNoiseSampler {
  fn default() -> Self {
    Self {
      encoded: presets::SIMPLE_TERRAIN,
      cave_frequency_multiplier: 4.0,
      biome_frequency_multiplier: 0.1,
    }
  }
}

impl TerrainNoiseSampler {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_encoded(mut self, encoded: &'static str) -> Self {
    self.encoded = encoded;
    self
  }
}

impl NoiseSampler for TerrainNoiseSampler {
  fn generate_chunk(&self, request: &GenerationRequest) -> Result<Box<[Voxel]>, GenerationError> {
    let n = request.chunk_size;
    let n_usize = n as usize;
    let voxel_size = request.voxel_size as f32;
    let world_min = request.world_origin
      + crate::coords::chunk_to_world_min(request.chunk_coord, request.chunk_size, request.voxel_size);
    let freq = request.noise.frequency as f32;

    let height_node = NoiseNode::from_encoded(self.encoded).ok_or(GenerationError::BackendUnavailable)?;
    let cave_node = NoiseNode::from_encoded(self.encoded).ok_or(GenerationError::BackendUnavailable)?;
    let biome_node = NoiseNode::from_encoded(self.encoded).ok_or(GenerationError::BackendUnavailable)?;

    // 2D height grid over this chunk's (x,z) footprint.
    let mut height_noise = vec![0.0f32; n_usize * n_usize];
    height_node.gen_uniform_grid_2d(
      &mut height_noise,
      world_min.x as f32 * freq,
      world_min.z as f32 * freq,
      n,
      n,
      voxel_size * freq,
      voxel_size * freq,
      request.noise.seed,
    );

    // 2D biome grid, much lower frequency than terrain height.
    let biome_freq = freq * self.biome_frequency_multiplier as f32;
    let mut biome_noise = vec![0.0f32; n_usize * n_usize];
    biome_node.gen_uniform_grid_2d(
      &mut biome_noise,
      world_min.x as f32 * biome_freq,
      world_min.z as f32 * biome_freq,
      n,
      n,
      voxel_size * biome_freq,
      voxel_size * biome_freq,
      request.noise.seed.wrapping_add(7919),
    );

    // 3D cave grid over the whole chunk.
    let cave_freq = freq * self.cave_frequency_multiplier as f32;
    let mut cave_noise = vec![0.0f32; n_usize * n_usize * n_usize];
    cave_node.gen_uniform_grid_3d(
      &mut cave_noise,
      world_min.x as f32 * cave_freq,
      world_min.y as f32 * cave_freq,
      world_min.z as f32 * cave_freq,
      n,
      n,
      n,
      voxel_size * cave_freq,
      voxel_size * cave_freq,
      voxel_size * cave_freq,
      request.noise.seed.wrapping_add(104_729),
    );

    let mut voxels = vec![Voxel::AIR; n_usize.pow(3)].into_boxed_slice();

    for z in 0..n {
      for y in 0..n {
        for x in 0..n {
          let idx = coord_to_index(x, y, z, n);
          // FastNoise2 2D grids are X-fastest: `idx2 = row*N + col` with col==x.
          let idx2 = (z as usize) * n_usize + (x as usize);
          let height_sample = height_noise[idx2];
          let biome_sample = biome_noise[idx2];

          let world_y = world_min.y as f64 + y as f64 * request.voxel_size;
          let surface_height = request.base_height + height_sample as f64 * request.height_scale;

          let mut voxel = if world_y < surface_height {
            let biome_id = ((biome_sample * 0.5 + 0.5).clamp(0.0, 0.999_999) * BIOME_COUNT as f32) as u8;
            Voxel::solid(1, biome_id)
          } else {
            Voxel::AIR
          };

          if voxel.is_solid() {
            // FastNoise2 3D grids are X-fastest within each Y within each Z:
            // `idx3 = z*N*N + y*N + x`.
            let idx3 = (z as usize) * n_usize * n_usize + (y as usize) * n_usize + (x as usize);
            if cave_noise[idx3] > CAVE_THRESHOLD {
              voxel = Voxel::AIR;
              voxel.set_flag(crate::voxel::FLAG_CAVE, true);
            }
          }

          if voxel.is_air() && !voxel.has_cave() && world_y < request.sea_level {
            voxel = Voxel::water();
          }
          voxel.set_flag(crate::voxel::FLAG_CAVE, false);

          voxels[idx] = voxel;
        }
      }
    }

    Ok(voxels)
  }
}

#[cfg(test)]
#[path = "terrain_test.rs"]
mod terrain_test;
