//! World configuration: the closed set of tunables every other component
//! reads from. Mirrors the teacher's `MeshConfig`/`OctreeConfig` builder
//! pattern — a plain struct, `Default`, `with_*` setters, and a `validate()`
//! that clamps out-of-range values rather than erroring.

use crate::constants::DEFAULT_CHUNK_SIZE;
use crate::lod::LodBand;

/// Overall shape of the world, consumed by the LOD strategy's distance
/// metric and vertical chunk range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WorldMode {
  #[default]
  InfinitePlane,
  SphericalPlanet,
  IslandBowl,
}

/// Which mesher the chunk manager dispatches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MeshingMode {
  #[default]
  Cubic,
  Smooth,
}

/// Noise family for the default [`crate::noise::NoiseSampler`] implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NoiseType {
  Perlin,
  #[default]
  Simplex,
  Cellular,
  Voronoi,
}

/// Noise generator tunables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseConfig {
  pub noise_type: NoiseType,
  pub seed: i32,
  pub octaves: u32,
  pub frequency: f64,
  pub amplitude: f64,
  pub lacunarity: f64,
  pub persistence: f64,
}

impl Default for NoiseConfig {
  fn default() -> Self {
    Self {
      noise_type: NoiseType::Simplex,
      seed: 0,
      octaves: 6,
      frequency: 0.01,
      amplitude: 1.0,
      lacunarity: 2.0,
      persistence: 0.5,
    }
  }
}

/// The closed set of world-level tunables. Constructed via [`Default`] then
/// refined with `with_*` builder methods; call [`WorldConfig::validate`]
/// after assembling one from untrusted input (e.g. a save file or UI).
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
  pub world_mode: WorldMode,
  pub world_origin: glam::DVec3,
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

  pub use_gpu_renderer: bool,
  pub generate_collision: bool,
  pub collision_lod_level: i32,

  pub noise: NoiseConfig,

  /// World-space Y below which open air in a freshly generated chunk is
  /// filled with water, per §4.6's generation-request fields.
  pub sea_level: f64,
  /// Multiplies the default noise sampler's height-noise channel before
  /// it's added to `base_height`.
  pub height_scale: f64,
  /// World-space Y the default noise sampler's height field is centered on.
  pub base_height: f64,
}

impl Default for WorldConfig {
  fn default() -> Self {
    Self {
      world_mode: WorldMode::InfinitePlane,
      world_origin: glam::DVec3::ZERO,
      world_radius: 100_000.0,

      meshing_mode: MeshingMode::Cubic,

      voxel_size: 100.0,
      chunk_size: DEFAULT_CHUNK_SIZE,
      world_seed: 0,

      lod_bands: Vec::new(),
      enable_lod_morphing: true,
      enable_frustum_culling: true,
      view_distance: 10_000.0,

      max_chunks_to_load_per_frame: 4,
      max_chunks_to_unload_per_frame: 8,
      streaming_time_slice_ms: 2.0,
      max_loaded_chunks: 2000,

      use_gpu_renderer: true,
      generate_collision: true,
      collision_lod_level: 1,

      noise: NoiseConfig::default(),

      sea_level: 0.0,
      height_scale: 2000.0,
      base_height: 0.0,
    }
  }
}

impl WorldConfig {
  pub fn with_world_mode(mut self, mode: WorldMode) -> Self {
    self.world_mode = mode;
    self
  }

  pub fn with_world_origin(mut self, origin: glam::DVec3) -> Self {
    self.world_origin = origin;
    self
  }

  pub fn with_world_radius(mut self, radius: f64) -> Self {
    self.world_radius = radius;
    self
  }

  pub fn with_meshing_mode(mut self, mode: MeshingMode) -> Self {
    self.meshing_mode = mode;
    self
  }

  pub fn with_voxel_size(mut self, voxel_size: f64) -> Self {
    self.voxel_size = voxel_size;
    self
  }

  pub fn with_chunk_size(mut self, chunk_size: i32) -> Self {
    self.chunk_size = chunk_size;
    self
  }

  pub fn with_world_seed(mut self, seed: i32) -> Self {
    self.world_seed = seed;
    self
  }

  pub fn with_lod_bands(mut self, bands: Vec<LodBand>) -> Self {
    self.lod_bands = bands;
    self
  }

  pub fn with_view_distance(mut self, view_distance: f64) -> Self {
    self.view_distance = view_distance;
    self
  }

  pub fn with_max_chunks_to_load_per_frame(mut self, n: usize) -> Self {
    self.max_chunks_to_load_per_frame = n;
    self
  }

  pub fn with_max_chunks_to_unload_per_frame(mut self, n: usize) -> Self {
    self.max_chunks_to_unload_per_frame = n;
    self
  }

  pub fn with_streaming_time_slice_ms(mut self, ms: f64) -> Self {
    self.streaming_time_slice_ms = ms;
    self
  }

  pub fn with_noise(mut self, noise: NoiseConfig) -> Self {
    self.noise = noise;
    self
  }

  pub fn with_sea_level(mut self, sea_level: f64) -> Self {
    self.sea_level = sea_level;
    self
  }

  pub fn with_height_scale(mut self, height_scale: f64) -> Self {
    self.height_scale = height_scale;
    self
  }

  pub fn with_base_height(mut self, base_height: f64) -> Self {
    self.base_height = base_height;
    self
  }

  /// World extent of one chunk, in world units.
  #[inline]
  pub fn chunk_world_size(&self) -> f64 {
    self.chunk_size as f64 * self.voxel_size
  }

  /// Cached vertical chunk range for the configured world mode, per §4.4.
  pub fn vertical_chunk_range(&self) -> (i32, i32) {
    match self.world_mode {
      WorldMode::InfinitePlane => (-2, 8),
      WorldMode::SphericalPlanet => (-32, 32),
      WorldMode::IslandBowl => (-2, 8),
    }
  }

  /// Clamp out-of-range values to the documented closed set, logging a
  /// warning (when the `tracing` feature is enabled) for each field
  /// adjusted. Returns `self` for chaining.
  pub fn validate(mut self) -> Self {
    if !(1.0..=1000.0).contains(&self.voxel_size) {
      #[cfg(feature = "tracing")]
      tracing::warn!(value = self.voxel_size, "voxel_size out of [1,1000], clamping");
      self.voxel_size = self.voxel_size.clamp(1.0, 1000.0);
    }
    if !(crate::constants::MIN_CHUNK_SIZE..=crate::constants::MAX_CHUNK_SIZE).contains(&self.chunk_size) {
      #[cfg(feature = "tracing")]
      tracing::warn!(value = self.chunk_size, "chunk_size out of [8,128], clamping");
      self.chunk_size = self
        .chunk_size
        .clamp(crate::constants::MIN_CHUNK_SIZE, crate::constants::MAX_CHUNK_SIZE);
    }
    if !(1..=32).contains(&self.max_chunks_to_load_per_frame) {
      self.max_chunks_to_load_per_frame = self.max_chunks_to_load_per_frame.clamp(1, 32);
    }
    if !(1..=64).contains(&self.max_chunks_to_unload_per_frame) {
      self.max_chunks_to_unload_per_frame = self.max_chunks_to_unload_per_frame.clamp(1, 64);
    }
    if !(0.5..=10.0).contains(&self.streaming_time_slice_ms) {
      self.streaming_time_slice_ms = self.streaming_time_slice_ms.clamp(0.5, 10.0);
    }
    if !(100..=10_000).contains(&self.max_loaded_chunks) {
      self.max_loaded_chunks = self.max_loaded_chunks.clamp(100, 10_000);
    }
    if !(0..=4).contains(&self.collision_lod_level) {
      self.collision_lod_level = self.collision_lod_level.clamp(0, 4);
    }
    if !(1..=16).contains(&self.noise.octaves) {
      self.noise.octaves = self.noise.octaves.clamp(1, 16);
    }
    if !(1.0..=4.0).contains(&self.noise.lacunarity) {
      self.noise.lacunarity = self.noise.lacunarity.clamp(1.0, 4.0);
    }
    if !(0.0..=1.0).contains(&self.noise.persistence) {
      self.noise.persistence = self.noise.persistence.clamp(0.0, 1.0);
    }
    self
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
