use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use glam::{DVec3, IVec3};

use super::*;
use crate::chunk_manager::ChunkManager;
use crate::config::WorldConfig;
use crate::lod::{DistanceBandLodStrategy, LodQueryContext};
use crate::meshing::{CubicMesher, MesherConfig, MesherKind};
use crate::noise::{NoiseSampler, TerrainNoiseSampler};

#[derive(Default)]
struct MockCooker {
  next_id: AtomicU32,
  released: Mutex<Vec<ChunkId>>,
  reject_all: bool,
}

impl CollisionCooker for MockCooker {
  type Body = u32;

  fn cook(&self, _chunk_coord: ChunkId, _world_origin: DVec3, vertices: &[[f32; 3]], indices: &[u32]) -> Result<u32, CookError> {
    if self.reject_all {
      return Err(CookError::Rejected);
    }
    if vertices.is_empty() || indices.is_empty() {
      return Err(CookError::Degenerate);
    }
    Ok(self.next_id.fetch_add(1, Ordering::Relaxed))
  }

  fn release(&self, chunk_coord: ChunkId, _body: u32) {
    self.released.lock().unwrap().push(chunk_coord);
  }
}

fn loaded_manager(chunk_size: i32, view_distance: f64) -> ChunkManager {
  let config = WorldConfig::default()
    .with_chunk_size(chunk_size)
    .with_voxel_size(4.0)
    .with_view_distance(view_distance)
    .with_max_chunks_to_load_per_frame(8)
    .with_streaming_time_slice_ms(10.0);
  let strategy = DistanceBandLodStrategy::new(Vec::new(), config.chunk_size, config.voxel_size, config.world_mode);
  let noise: Arc<dyn NoiseSampler> = Arc::new(TerrainNoiseSampler::new());
  let mesher = MesherKind::Cubic(CubicMesher::new(MesherConfig::default()));
  let mut manager = ChunkManager::new(config, strategy, noise, mesher);

  let mut ctx = LodQueryContext::new(DVec3::ZERO, view_distance);
  ctx.max_chunks_to_load_per_frame = 8;
  ctx.time_slice_ms = 10.0;
  for _ in 0..20 {
    manager.tick(&ctx, 1.0 / 60.0);
    if manager.is_loaded(IVec3::ZERO) {
      break;
    }
  }
  assert!(manager.is_loaded(IVec3::ZERO), "test setup expects the origin chunk to load");
  manager
}

#[test]
fn cooks_a_body_for_a_loaded_chunk_within_radius() {
  let chunk_manager = loaded_manager(8, 40.0);
  let mut collision = CollisionManager::new(MockCooker::default(), 1_000.0).with_decision_interval_frames(1);

  for _ in 0..5 {
    collision.update(&chunk_manager, DVec3::ZERO, 1.0 / 60.0);
    if collision.has_collision(IVec3::ZERO) {
      break;
    }
  }

  assert!(collision.has_collision(IVec3::ZERO));
  assert_eq!(collision.stats.cooked_count, 1);
}

#[test]
fn removes_body_once_chunk_leaves_radius() {
  let chunk_manager = loaded_manager(8, 40.0);
  let mut collision = CollisionManager::new(MockCooker::default(), 1_000.0).with_decision_interval_frames(1);

  for _ in 0..5 {
    collision.update(&chunk_manager, DVec3::ZERO, 1.0 / 60.0);
  }
  assert!(collision.has_collision(IVec3::ZERO));

  collision.update(&chunk_manager, DVec3::new(1_000_000.0, 0.0, 0.0), 1.0 / 60.0);
  assert!(!collision.has_collision(IVec3::ZERO));
}

#[test]
fn dirty_chunk_is_recooked_with_priority_boost() {
  let chunk_manager = loaded_manager(8, 40.0);
  let mut collision = CollisionManager::new(MockCooker::default(), 1_000.0).with_decision_interval_frames(1);

  for _ in 0..5 {
    collision.update(&chunk_manager, DVec3::ZERO, 1.0 / 60.0);
  }
  assert!(collision.has_collision(IVec3::ZERO));
  let cooked_before = collision.stats.cooked_count;

  collision.mark_dirty(IVec3::ZERO);
  for _ in 0..5 {
    collision.update(&chunk_manager, DVec3::ZERO, 1.0 / 60.0);
  }

  assert!(collision.stats.cooked_count > cooked_before);
}

#[test]
fn rejected_cook_leaves_no_active_body() {
  let chunk_manager = loaded_manager(8, 40.0);
  let cooker = MockCooker { reject_all: true, ..Default::default() };
  let mut collision = CollisionManager::new(cooker, 1_000.0).with_decision_interval_frames(1);

  for _ in 0..5 {
    collision.update(&chunk_manager, DVec3::ZERO, 1.0 / 60.0);
  }

  assert!(!collision.has_collision(IVec3::ZERO));
  assert!(collision.stats.rejected_count > 0);
}
