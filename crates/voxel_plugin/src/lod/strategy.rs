//! Distance-banded LOD strategy: visibility, priority, and morph decisions.
//!
//! Chunk *addressing* stays on the uniform grid defined by
//! [`crate::config::WorldConfig::chunk_size`]/`voxel_size` regardless of
//! LOD — `chunk_coord` always means the same world-space cell. A band's own
//! `chunk_size`/`voxel_stride` describe how densely that cell is *sampled*
//! when generated/meshed at that LOD, not a different grid.

use std::cmp::Ordering;

use glam::{DVec3, IVec3};

use crate::chunk::ChunkId;
use crate::config::WorldMode;
use crate::coords;

use super::band::{aabb_in_frustum, LodBand, Plane};

/// Per-tick inputs the LOD strategy needs: viewer pose, budgets, and world
/// mode. Built fresh by the chunk manager every tick from the host's camera.
#[derive(Clone, Copy, Debug)]
pub struct LodQueryContext {
  pub viewer_position: DVec3,
  pub viewer_forward: DVec3,
  pub fov_radians: f64,
  pub view_distance: f64,
  pub world_mode: WorldMode,
  pub max_chunks_to_load_per_frame: usize,
  pub max_chunks_to_unload_per_frame: usize,
  pub time_slice_ms: f64,
  pub frame_number: u64,
  pub game_time: f64,
  pub delta_time: f64,
  pub frustum_planes: Option<[Plane; 6]>,
}

impl LodQueryContext {
  pub fn new(viewer_position: DVec3, view_distance: f64) -> Self {
    Self {
      viewer_position,
      viewer_forward: DVec3::new(0.0, 0.0, 1.0),
      fov_radians: std::f64::consts::FRAC_PI_2,
      view_distance,
      world_mode: WorldMode::InfinitePlane,
      max_chunks_to_load_per_frame: 4,
      max_chunks_to_unload_per_frame: 8,
      time_slice_ms: 2.0,
      frame_number: 0,
      game_time: 0.0,
      delta_time: 0.0,
      frustum_planes: None,
    }
  }
}

/// A request to load (or keep at a given LOD) one chunk. Ordered so that
/// `a < b ⇔ a.priority > b.priority` (descending priority sorts first).
#[derive(Clone, Copy, Debug)]
pub struct ChunkLodRequest {
  pub chunk_coord: ChunkId,
  pub lod_level: i32,
  pub priority: f64,
  pub morph_factor: f32,
}

impl PartialEq for ChunkLodRequest {
  fn eq(&self, other: &Self) -> bool {
    self.priority == other.priority
  }
}
impl Eq for ChunkLodRequest {}

impl PartialOrd for ChunkLodRequest {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for ChunkLodRequest {
  fn cmp(&self, other: &Self) -> Ordering {
    // Descending priority: higher priority compares "less" so a plain sort
    // (or a BinaryHeap treated as a max-heap) puts it first.
    other.priority.partial_cmp(&self.priority).unwrap_or(Ordering::Equal)
  }
}

fn horizontal_distance(viewer: DVec3, point: DVec3, world_mode: WorldMode) -> f64 {
  match world_mode {
    WorldMode::IslandBowl => {
      let dx = viewer.x - point.x;
      let dz = viewer.z - point.z;
      (dx * dx + dz * dz).sqrt()
    }
    WorldMode::InfinitePlane | WorldMode::SphericalPlanet => viewer.distance(point),
  }
}

/// Distance-banded LOD/priority/morph strategy, §4.4.
#[derive(Clone, Debug)]
pub struct DistanceBandLodStrategy {
  bands: Vec<LodBand>,
  base_chunk_size: i32,
  base_voxel_size: f64,
  world_mode: WorldMode,
  vertical_range: (i32, i32),
  pub master_enabled: bool,
  pub morph_enabled: bool,
  pub frustum_cull_enabled: bool,
  pub unload_multiplier: f64,
  cached_max_view_distance: f64,
  cached_viewer_position: DVec3,
  cached_viewer_chunk: ChunkId,
}

impl DistanceBandLodStrategy {
  pub fn new(bands: Vec<LodBand>, base_chunk_size: i32, base_voxel_size: f64, world_mode: WorldMode) -> Self {
    let mut bands = bands;
    bands.sort_by(|a, b| a.min_distance.partial_cmp(&b.min_distance).unwrap_or(Ordering::Equal));
    let cached_max_view_distance = bands.iter().map(|b| b.max_distance).fold(0.0, f64::max);
    let vertical_range = match world_mode {
      WorldMode::InfinitePlane => (-2, 8),
      WorldMode::SphericalPlanet => (-32, 32),
      WorldMode::IslandBowl => (-2, 8),
    };
    Self {
      bands,
      base_chunk_size,
      base_voxel_size,
      world_mode,
      vertical_range,
      master_enabled: true,
      morph_enabled: true,
      frustum_cull_enabled: true,
      unload_multiplier: 1.2,
      cached_max_view_distance,
      cached_viewer_position: DVec3::ZERO,
      cached_viewer_chunk: IVec3::ZERO,
    }
  }

  #[inline]
  fn chunk_world_size(&self) -> f64 {
    self.base_chunk_size as f64 * self.base_voxel_size
  }

  fn chunk_center(&self, coord: ChunkId) -> DVec3 {
    coords::chunk_to_world_center(coord, self.base_chunk_size, self.base_voxel_size)
  }

  fn distance_to_chunk(&self, coord: ChunkId, ctx: &LodQueryContext) -> f64 {
    horizontal_distance(ctx.viewer_position, self.chunk_center(coord), self.world_mode)
  }

  fn band_for_distance(&self, distance: f64) -> Option<&LodBand> {
    self.bands.iter().find(|b| b.contains(distance))
  }

  /// Coarsest band's level, returned for any distance beyond all bands.
  fn coarsest_level(&self) -> i32 {
    self.bands.iter().max_by(|a, b| a.max_distance.partial_cmp(&b.max_distance).unwrap()).map(|b| b.lod_level).unwrap_or(0)
  }

  pub fn lod_for_chunk(&self, coord: ChunkId, ctx: &LodQueryContext) -> i32 {
    let distance = self.distance_to_chunk(coord, ctx);
    self.band_for_distance(distance).map(|b| b.lod_level).unwrap_or_else(|| self.coarsest_level())
  }

  pub fn morph_factor(&self, coord: ChunkId, ctx: &LodQueryContext) -> f32 {
    if !self.morph_enabled {
      return 0.0;
    }
    let distance = self.distance_to_chunk(coord, ctx);
    let Some(band) = self.band_for_distance(distance) else {
      return 0.0;
    };
    if band.morph_range <= 0.0 {
      return 0.0;
    }
    let t = (distance - (band.max_distance - band.morph_range)) / band.morph_range;
    t.clamp(0.0, 1.0) as f32
  }

  /// Iterate the visible cube around the viewer and emit a prioritized,
  /// descending-sorted list of load requests.
  pub fn visible_chunks(&self, ctx: &LodQueryContext) -> Vec<ChunkLodRequest> {
    if !self.master_enabled {
      return Vec::new();
    }
    let max_view_distance = if self.cached_max_view_distance > 0.0 {
      self.cached_max_view_distance
    } else {
      ctx.view_distance
    };
    let chunk_world_size = self.chunk_world_size();
    let radius_chunks = (max_view_distance / chunk_world_size).ceil() as i32 + 1;
    let viewer_chunk = coords::world_to_chunk(ctx.viewer_position, self.base_chunk_size, self.base_voxel_size);

    let mut out = Vec::new();
    for dz in -radius_chunks..=radius_chunks {
      for dy in -radius_chunks..=radius_chunks {
        let y = viewer_chunk.y + dy;
        if y < self.vertical_range.0 || y > self.vertical_range.1 {
          continue;
        }
        for dx in -radius_chunks..=radius_chunks {
          let coord = IVec3::new(viewer_chunk.x + dx, y, viewer_chunk.z + dz);
          let distance = self.distance_to_chunk(coord, ctx);
          if distance > max_view_distance {
            continue;
          }
          if self.frustum_cull_enabled {
            let min = coords::chunk_to_world_min(coord, self.base_chunk_size, self.base_voxel_size);
            let max = min + DVec3::splat(chunk_world_size);
            if !aabb_in_frustum(min, max, ctx.frustum_planes.as_ref()) {
              continue;
            }
          }
          let center = self.chunk_center(coord);
          let to_chunk = (center - ctx.viewer_position).normalize_or_zero();
          let forward_bias = 1.0 + ctx.viewer_forward.normalize_or_zero().dot(to_chunk).max(0.0);
          let priority = (1.0 / distance.max(1.0)) * forward_bias;
          out.push(ChunkLodRequest {
            chunk_coord: coord,
            lod_level: self.lod_for_chunk(coord, ctx),
            priority,
            morph_factor: self.morph_factor(coord, ctx),
          });
        }
      }
    }
    out.sort();
    out
  }

  pub fn chunks_to_load(&self, loaded: &std::collections::HashSet<ChunkId>, ctx: &LodQueryContext) -> Vec<ChunkLodRequest> {
    self.visible_chunks(ctx).into_iter().filter(|r| !loaded.contains(&r.chunk_coord)).collect()
  }

  /// Every loaded chunk whose distance exceeds `unload_multiplier × max
  /// view distance`, farthest-first, bounded by
  /// `ctx.max_chunks_to_unload_per_frame`.
  pub fn chunks_to_unload(&self, loaded: &std::collections::HashSet<ChunkId>, ctx: &LodQueryContext) -> Vec<ChunkId> {
    let threshold = self.unload_multiplier * self.cached_max_view_distance.max(ctx.view_distance);
    let mut candidates: Vec<(ChunkId, f64)> = loaded
      .iter()
      .map(|&coord| (coord, self.distance_to_chunk(coord, ctx)))
      .filter(|(_, d)| *d > threshold)
      .collect();
    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    candidates.truncate(ctx.max_chunks_to_unload_per_frame);
    candidates.into_iter().map(|(c, _)| c).collect()
  }

  pub fn update(&mut self, ctx: &LodQueryContext, _dt: f64) {
    self.cached_viewer_position = ctx.viewer_position;
    self.cached_viewer_chunk = coords::world_to_chunk(ctx.viewer_position, self.base_chunk_size, self.base_voxel_size);
  }

  pub fn cached_viewer_chunk(&self) -> ChunkId {
    self.cached_viewer_chunk
  }

  pub fn bands(&self) -> &[LodBand] {
    &self.bands
  }

  /// The band configured for `lod_level`, if any. Chunk addressing stays on
  /// the base grid regardless of LOD (per this module's doc comment); the
  /// chunk manager uses a band's `chunk_size`/`voxel_stride` only to decide
  /// how densely a chunk's fixed world-space footprint is sampled.
  pub fn band_for_level(&self, lod_level: i32) -> Option<&LodBand> {
    self.bands.iter().find(|b| b.lod_level == lod_level)
  }
}

#[cfg(test)]
#[path = "strategy_test.rs"]
mod strategy_test;
