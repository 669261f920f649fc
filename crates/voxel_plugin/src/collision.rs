//! Collision manager: throttled trimesh cooking for loaded chunks, §4.7.
//!
//! The cooker itself is EXTERNAL — [`CollisionCooker`] is a trait the host
//! physics engine implements (the `bevy_voxel_plugin` adapter implements it
//! against `avian3d::prelude::Collider::trimesh`, the physics crate the
//! teacher already depends on). This module only decides *which* chunks
//! need a body and *when* to ask for one.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::DVec3;

use crate::chunk::ChunkId;
use crate::chunk_manager::ChunkManager;

/// Why a cook request failed. Always collapses to "drop the body setup,
/// publish nothing" at the manager level, per §4.7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CookError {
  #[error("trimesh cooking rejected by the physics backend")]
  Rejected,
  #[error("degenerate mesh: no vertices or no indices")]
  Degenerate,
}

/// The abstract trimesh cooker a host physics engine implements. One
/// `body_setup` per chunk, complex-as-simple collision trace, no simple
/// primitives, unique per-chunk stable name — those constraints are the
/// implementor's contract, not something this trait can enforce.
pub trait CollisionCooker: Send + Sync {
  /// Opaque handle to whatever the host's physics engine created —
  /// typically an entity id or component handle.
  type Body;

  fn cook(&self, chunk_coord: ChunkId, world_origin: DVec3, vertices: &[[f32; 3]], indices: &[u32]) -> Result<Self::Body, CookError>;

  /// Release a previously cooked body (on unload, dirty re-cook, or shutdown).
  fn release(&self, chunk_coord: ChunkId, body: Self::Body);
}

/// Reacts to a chunk's collision body becoming ready. Optional; wired the
/// same way [`crate::edit::EditEventSink`] is.
pub trait CollisionEventSink: Send + Sync {
  fn on_collision_ready(&self, chunk_coord: ChunkId);
}

/// Running counters for observability, mirroring [`crate::metrics::WorldMetrics`]'s
/// "cheap counters, no external reporting" stance.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollisionStats {
  pub cooked_count: u64,
  pub rejected_count: u64,
  pub active_bodies: usize,
}

#[derive(Clone, Copy, Debug)]
struct CookRequest {
  chunk_coord: ChunkId,
  priority: f64,
}

impl PartialEq for CookRequest {
  fn eq(&self, other: &Self) -> bool {
    self.priority == other.priority
  }
}
impl Eq for CookRequest {}
impl PartialOrd for CookRequest {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}
impl Ord for CookRequest {
  fn cmp(&self, other: &Self) -> Ordering {
    other.priority.partial_cmp(&self.priority).unwrap_or(Ordering::Equal)
  }
}

fn resort_by_ascending_priority(queue: &mut [CookRequest]) {
  queue.sort_by(|a, b| b.cmp(a));
}

/// The priority boost a dirty (freshly edited) chunk gets over its raw
/// distance-to-radius priority, per §4.7.
const DIRTY_PRIORITY_BOOST: f64 = 500.0;

/// Per-chunk collision state: a cooked body, plus whether it's stale.
struct ActiveBody<B> {
  body: B,
  dirty: bool,
}

/// Throttled trimesh cooking for chunks near the viewer, generic over the
/// host's [`CollisionCooker`] implementation.
pub struct CollisionManager<C: CollisionCooker> {
  cooker: C,
  event_sink: Option<Arc<dyn CollisionEventSink>>,

  collision_radius: f64,
  decision_interval_frames: u64,
  viewer_move_threshold: f64,
  max_cooks_per_frame: usize,
  max_in_flight: usize,

  active: HashMap<ChunkId, ActiveBody<C::Body>>,
  cook_queue: Vec<CookRequest>,
  in_flight: HashSet<ChunkId>,
  dirty: HashSet<ChunkId>,

  frame_counter: u64,
  initial_load_phase: bool,
  last_viewer_position: Option<DVec3>,

  pub stats: CollisionStats,
}

impl<C: CollisionCooker> CollisionManager<C> {
  pub fn new(cooker: C, collision_radius: f64) -> Self {
    Self {
      cooker,
      event_sink: None,
      collision_radius,
      decision_interval_frames: 5,
      viewer_move_threshold: 500.0,
      max_cooks_per_frame: 1,
      max_in_flight: 4,
      active: HashMap::new(),
      cook_queue: Vec::new(),
      in_flight: HashSet::new(),
      dirty: HashSet::new(),
      frame_counter: 0,
      initial_load_phase: true,
      last_viewer_position: None,
      stats: CollisionStats::default(),
    }
  }

  pub fn with_event_sink(mut self, sink: Arc<dyn CollisionEventSink>) -> Self {
    self.event_sink = Some(sink);
    self
  }

  pub fn with_decision_interval_frames(mut self, n: u64) -> Self {
    self.decision_interval_frames = n.max(1);
    self
  }

  pub fn with_max_cooks_per_frame(mut self, n: usize) -> Self {
    self.max_cooks_per_frame = n.max(1);
    self
  }

  pub fn with_max_in_flight(mut self, n: usize) -> Self {
    self.max_in_flight = n.max(1);
    self
  }

  pub fn active_chunk_count(&self) -> usize {
    self.active.len()
  }

  pub fn has_collision(&self, chunk_coord: ChunkId) -> bool {
    self.active.contains_key(&chunk_coord)
  }

  /// Mark a chunk's collision body (if any) stale, bumping it to the front
  /// of the cook queue. Hosts call this from their edit-event bridge — see
  /// [`crate::edit::EditEventSink::on_chunk_edited`].
  pub fn mark_dirty(&mut self, chunk_coord: ChunkId) {
    self.dirty.insert(chunk_coord);
    if let Some(active) = self.active.get_mut(&chunk_coord) {
      active.dirty = true;
    }
  }

  /// Advance the manager by one frame, per §4.7's tick contract.
  pub fn update(&mut self, chunk_manager: &ChunkManager, viewer_position: DVec3, dt: f64) {
    let _ = dt;
    self.frame_counter += 1;

    let moved_enough = match self.last_viewer_position {
      None => true,
      Some(prev) => prev.distance(viewer_position) > self.viewer_move_threshold,
    };
    if moved_enough || self.initial_load_phase {
      self.refresh_decisions(chunk_manager, viewer_position);
      self.last_viewer_position = Some(viewer_position);
    }

    let expensive_eligible = self.initial_load_phase || self.frame_counter % self.decision_interval_frames == 0;
    if expensive_eligible {
      self.process_cook_queue(chunk_manager);
    }

    self.stats.active_bodies = self.active.len();
  }

  /// Scan loaded chunks, enqueueing cooks for newly-in-range chunks and
  /// removing bodies for chunks that drifted out of range.
  fn refresh_decisions(&mut self, chunk_manager: &ChunkManager, viewer_position: DVec3) {
    let mut still_in_range = HashSet::new();

    for chunk_coord in chunk_manager.loaded_chunks() {
      let Some(desc) = chunk_manager.get_descriptor(chunk_coord) else {
        continue;
      };
      let center = (desc.world_min + desc.world_max) * 0.5;
      let distance = viewer_position.distance(center);
      if distance > self.collision_radius {
        continue;
      }
      still_in_range.insert(chunk_coord);

      let has_active = self.active.contains_key(&chunk_coord);
      let is_dirty = self.dirty.contains(&chunk_coord);
      if (has_active && !is_dirty) || self.in_flight.contains(&chunk_coord) {
        continue;
      }
      if self.cook_queue.iter().any(|r| r.chunk_coord == chunk_coord) {
        continue;
      }
      let boost = if is_dirty { DIRTY_PRIORITY_BOOST } else { 0.0 };
      let priority = (self.collision_radius - distance) + boost;
      self.cook_queue.push(CookRequest { chunk_coord, priority });
    }
    resort_by_ascending_priority(&mut self.cook_queue);

    let to_remove: Vec<ChunkId> = self.active.keys().filter(|c| !still_in_range.contains(c)).copied().collect();
    for chunk_coord in to_remove {
      if let Some(active) = self.active.remove(&chunk_coord) {
        self.cooker.release(chunk_coord, active.body);
      }
    }
  }

  fn process_cook_queue(&mut self, chunk_manager: &ChunkManager) {
    let mut processed = 0usize;
    while processed < self.max_cooks_per_frame && self.in_flight.len() < self.max_in_flight {
      let Some(req) = self.cook_queue.pop() else {
        break;
      };
      processed += 1;
      self.cook_one(chunk_manager, req.chunk_coord);
    }
  }

  fn cook_one(&mut self, chunk_manager: &ChunkManager, chunk_coord: ChunkId) {
    self.dirty.remove(&chunk_coord);

    // Dirty regeneration: drop the stale body before cooking its replacement.
    if let Some(active) = self.active.remove(&chunk_coord) {
      self.cooker.release(chunk_coord, active.body);
    }

    let lod = chunk_manager.config().collision_lod_level;
    let Some(mesh) = chunk_manager.get_chunk_collision_mesh(chunk_coord, lod) else {
      self.stats.rejected_count += 1;
      return;
    };
    let Some(desc) = chunk_manager.get_descriptor(chunk_coord) else {
      return;
    };
    let indices = &mesh.indices;
    match self.cooker.cook(chunk_coord, desc.world_min, &mesh.positions, indices) {
      Ok(body) => {
        self.active.insert(chunk_coord, ActiveBody { body, dirty: false });
        self.stats.cooked_count += 1;
        self.initial_load_phase = false;
        if let Some(sink) = &self.event_sink {
          sink.on_collision_ready(chunk_coord);
        }
      }
      Err(_) => {
        self.stats.rejected_count += 1;
      }
    }
  }

  /// Release every active body and drop all pending/in-flight work, per
  /// the `shutdown` cancellation semantics.
  pub fn clear_all(&mut self) {
    for (chunk_coord, active) in self.active.drain() {
      self.cooker.release(chunk_coord, active.body);
    }
    self.cook_queue.clear();
    self.in_flight.clear();
    self.dirty.clear();
    self.stats.active_bodies = 0;
  }
}

#[cfg(test)]
#[path = "collision_test.rs"]
mod collision_test;
