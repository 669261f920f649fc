//! Chunk manager: the streaming pipeline core, §4.6.
//!
//! Fields mirror the teacher's `MeshingStage` (pending/completed vectors, a
//! `tick()` that returns a processed count) scaled up to the spec's four
//! work queues: a priority-sorted generation queue, a priority-sorted
//! meshing queue, a pending-mesh backpressure queue, and a FIFO unload
//! queue. Time-slicing uses `web_time::Instant` so the same code compiles
//! on wasm32, matching the ambient stack's WASM-portability stance.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use glam::{DVec3, IVec3};
use web_time::Instant;

use crate::chunk::{ChunkDescriptor, ChunkId, ChunkState};
use crate::config::WorldConfig;
use crate::constants::{coord_to_index, DEFAULT_MAX_PENDING_MESHES};
use crate::coords::{self, FaceDir};
use crate::edit::{BrushParams, EditEventSink, EditManager, EditOp, EditSource};
use crate::lod::{ChunkLodRequest, DistanceBandLodStrategy, LodQueryContext};
use crate::meshing::{ChunkMeshData, MesherKind, MeshingRequest, CORNER_COUNT, EDGE_DIRS, FACE_COUNT};
use crate::metrics::WorldMetrics;
use crate::noise::{GenerationRequest, NoiseSampler};
use crate::renderer::RendererHandoff;
use crate::voxel::Voxel;

/// A completed mesh, owned by the manager until the renderer acknowledges
/// receipt in the meshing-completion step.
struct PendingMesh {
  chunk_coord: ChunkId,
  lod_level: i32,
  mesh: ChunkMeshData,
}

/// Pop the highest-priority entry. Queues are kept sorted so the highest
/// real priority sits at the *end* of the vector, making this `O(1)`.
fn pop_highest_priority(queue: &mut Vec<ChunkLodRequest>) -> Option<ChunkLodRequest> {
  queue.pop()
}

fn resort_by_ascending_priority(queue: &mut [ChunkLodRequest]) {
  // `ChunkLodRequest`'s `Ord` sorts descending-priority-first; reverse that
  // so the highest priority lands last, where `Vec::pop` is O(1).
  queue.sort_by(|a, b| b.cmp(a));
}

/// The streaming pipeline core: chunk lifecycle, four work queues, and the
/// time-sliced tick, per §4.6.
pub struct ChunkManager {
  config: WorldConfig,
  strategy: DistanceBandLodStrategy,
  noise: Arc<dyn NoiseSampler>,
  mesher: MesherKind,
  renderer: Option<Arc<dyn RendererHandoff>>,
  edits: EditManager,

  chunks: HashMap<ChunkId, ChunkDescriptor>,
  loaded_chunk_coords: HashSet<ChunkId>,
  /// `(lod_level, vertex_count, index_count)` for every currently loaded
  /// chunk's mesh, kept alongside `metrics` so the unload phase can
  /// decrement per-LOD counters accurately (the mesh itself has already
  /// moved to the renderer by then).
  loaded_mesh_stats: HashMap<ChunkId, (i32, u32, u32)>,

  generation_queue: Vec<ChunkLodRequest>,
  meshing_queue: Vec<ChunkLodRequest>,
  pending_mesh_queue: Vec<PendingMesh>,
  unload_queue: VecDeque<ChunkId>,

  max_pending_meshes: usize,
  pub streaming_enabled: bool,

  frame_counter: u64,
  generated_count: u64,
  meshed_count: u64,
  unloaded_count: u64,

  pub metrics: WorldMetrics,
}

impl ChunkManager {
  pub fn new(config: WorldConfig, strategy: DistanceBandLodStrategy, noise: Arc<dyn NoiseSampler>, mesher: MesherKind) -> Self {
    let default_chunk_size = config.chunk_size;
    Self {
      config,
      strategy,
      noise,
      mesher,
      renderer: None,
      edits: EditManager::new(default_chunk_size),
      chunks: HashMap::new(),
      loaded_chunk_coords: HashSet::new(),
      loaded_mesh_stats: HashMap::new(),
      generation_queue: Vec::new(),
      meshing_queue: Vec::new(),
      pending_mesh_queue: Vec::new(),
      unload_queue: VecDeque::new(),
      max_pending_meshes: DEFAULT_MAX_PENDING_MESHES,
      streaming_enabled: true,
      frame_counter: 0,
      generated_count: 0,
      meshed_count: 0,
      unloaded_count: 0,
      metrics: WorldMetrics::new(),
    }
  }

  pub fn with_max_pending_meshes(mut self, n: usize) -> Self {
    self.max_pending_meshes = n.max(1);
    self
  }

  pub fn with_event_sink(mut self, sink: Arc<dyn EditEventSink>) -> Self {
    self.edits = EditManager::new(self.config.chunk_size).with_event_sink(sink);
    self
  }

  pub fn set_renderer(&mut self, renderer: Arc<dyn RendererHandoff>) {
    self.renderer = Some(renderer);
  }

  /// The band-specific `(chunk_size, voxel_size)` a chunk at `lod_level`
  /// samples its world-space footprint at. Falls back to the base config
  /// values when no band covers `lod_level` (e.g. a single-LOD world).
  fn effective_params(&self, lod_level: i32) -> (i32, f64) {
    match self.strategy.band_for_level(lod_level) {
      Some(band) => (band.chunk_size, self.config.voxel_size * band.voxel_stride as f64),
      None => (self.config.chunk_size, self.config.voxel_size),
    }
  }

  // -- queries --------------------------------------------------------

  pub fn config(&self) -> &WorldConfig {
    &self.config
  }

  pub fn chunk_state(&self, coord: ChunkId) -> ChunkState {
    self.chunks.get(&coord).map(|c| c.state).unwrap_or_default()
  }

  pub fn is_loaded(&self, coord: ChunkId) -> bool {
    self.loaded_chunk_coords.contains(&coord)
  }

  pub fn loaded_chunk_count(&self) -> usize {
    self.loaded_chunk_coords.len()
  }

  pub fn loaded_chunks(&self) -> impl Iterator<Item = ChunkId> + '_ {
    self.loaded_chunk_coords.iter().copied()
  }

  pub fn get_descriptor(&self, coord: ChunkId) -> Option<&ChunkDescriptor> {
    self.chunks.get(&coord)
  }

  /// Synthesize a collision-ready mesh for a Loaded chunk, per §4.7. Runs
  /// the mesher directly against the chunk's already-resident voxel data
  /// (and whatever neighbor data happens to be loaded) rather than
  /// dispatching through the streaming queues — the caller is expected to
  /// have already checked the chunk is `Loaded`. Returns `None` if the
  /// chunk isn't loaded, has no voxel data, or the mesher produces nothing.
  pub fn get_chunk_collision_mesh(&self, chunk_coord: ChunkId, _lod: i32) -> Option<ChunkMeshData> {
    let desc = self.chunks.get(&chunk_coord)?;
    if desc.state != ChunkState::Loaded {
      return None;
    }
    let request = self.build_meshing_request(chunk_coord)?;
    let (mesh, _stats, ok) = self.mesher.generate_mesh(&request);
    if ok && mesh.is_valid() {
      Some(mesh)
    } else {
      None
    }
  }

  pub fn frame_number(&self) -> u64 {
    self.frame_counter
  }

  pub fn generated_count(&self) -> u64 {
    self.generated_count
  }

  pub fn meshed_count(&self) -> u64 {
    self.meshed_count
  }

  pub fn unloaded_count(&self) -> u64 {
    self.unloaded_count
  }

  pub fn edits(&self) -> &EditManager {
    &self.edits
  }

  // -- tick -------------------------------------------------------------

  /// Advance the pipeline by one frame, per §4.6's tick sequence. No-op if
  /// `streaming_enabled` is false.
  pub fn tick(&mut self, ctx: &LodQueryContext, dt: f64) {
    if !self.streaming_enabled {
      return;
    }
    self.frame_counter += 1;
    self.strategy.update(ctx, dt);
    self.update_streaming_decisions(ctx);

    let total_budget_ms = ctx.time_slice_ms.max(0.0);
    let generation_budget = Duration::from_secs_f64(total_budget_ms * 0.4 / 1000.0);
    let meshing_budget = Duration::from_secs_f64(total_budget_ms * 0.4 / 1000.0);

    self.run_generation_phase(generation_budget, ctx.max_chunks_to_load_per_frame);
    self.run_meshing_phase(meshing_budget, ctx.max_chunks_to_load_per_frame);
    self.run_unload_phase(ctx.max_chunks_to_unload_per_frame);

    self.update_lod_transitions(ctx);
  }

  /// Merge the strategy's visible/unload sets with existing chunk states.
  /// Never moves a non-`Unloaded` chunk back to `Unloaded` except via the
  /// unload phase itself.
  fn update_streaming_decisions(&mut self, ctx: &LodQueryContext) {
    let world_seed = self.config.world_seed;

    for req in self.strategy.chunks_to_load(&self.loaded_chunk_coords, ctx) {
      let state = self.chunks.get(&req.chunk_coord).map(|c| c.state).unwrap_or_default();
      if state != ChunkState::Unloaded {
        continue;
      }
      let (chunk_size, voxel_size) = self.effective_params(req.lod_level);
      let descriptor = self
        .chunks
        .entry(req.chunk_coord)
        .or_insert_with(|| ChunkDescriptor::new(req.chunk_coord, req.lod_level, chunk_size, voxel_size, world_seed));
      descriptor.state = ChunkState::PendingGeneration;
      descriptor.lod_level = req.lod_level;
      if !self.generation_queue.iter().any(|r| r.chunk_coord == req.chunk_coord) {
        self.generation_queue.push(req);
      }
    }
    resort_by_ascending_priority(&mut self.generation_queue);

    for coord in self.strategy.chunks_to_unload(&self.loaded_chunk_coords, ctx) {
      if let Some(desc) = self.chunks.get_mut(&coord) {
        if desc.state == ChunkState::Loaded {
          desc.state = ChunkState::PendingUnload;
          if !self.unload_queue.contains(&coord) {
            self.unload_queue.push_back(coord);
          }
        }
      }
    }
  }

  fn run_generation_phase(&mut self, budget: Duration, max_per_frame: usize) {
    let deadline = Instant::now() + budget;
    let mut dispatched = 0usize;
    while dispatched < max_per_frame {
      if !budget.is_zero() && Instant::now() >= deadline {
        break;
      }
      let Some(req) = pop_highest_priority(&mut self.generation_queue) else {
        break;
      };
      let drifted = self.chunks.get(&req.chunk_coord).map(|c| c.state) != Some(ChunkState::PendingGeneration);
      if drifted {
        continue; // Inconsistency: skipped silently, per §7.
      }
      dispatched += 1;
      self.generate_one(req.chunk_coord, req.lod_level, req.priority);
    }
  }

  fn generate_one(&mut self, chunk_coord: ChunkId, lod_level: i32, priority: f64) {
    let Some(desc) = self.chunks.get_mut(&chunk_coord) else {
      return;
    };
    desc.state = ChunkState::Generating;
    let chunk_size = desc.chunk_size;
    let voxel_size = self.effective_params(lod_level).1;

    let request = GenerationRequest {
      chunk_coord,
      lod_level,
      chunk_size,
      voxel_size,
      world_origin: self.config.world_origin,
      noise: self.config.noise,
      world_mode: self.config.world_mode,
      sea_level: self.config.sea_level,
      height_scale: self.config.height_scale,
      base_height: self.config.base_height,
    };

    let started = Instant::now();
    let result = self.noise.generate_chunk(&request);
    self.metrics.record_generation_timing(started.elapsed().as_micros() as u64);

    match result {
      Ok(mut voxel_data) => {
        self.apply_edit_layer(chunk_coord, chunk_size, &mut voxel_data);
        if let Some(desc) = self.chunks.get_mut(&chunk_coord) {
          desc.voxel_data = Some(voxel_data);
        }
        self.on_chunk_generation_complete(chunk_coord, priority);
      }
      Err(_) => {
        if let Some(desc) = self.chunks.get_mut(&chunk_coord) {
          desc.voxel_data = None;
          desc.state = ChunkState::Unloaded;
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(?chunk_coord, "generation failed, reverting to Unloaded");
      }
    }
  }

  /// Overlay any existing sparse edits onto freshly generated voxel data,
  /// so a chunk that's regenerated (e.g. after an unload/reload cycle)
  /// comes back with its prior edits already baked in.
  fn apply_edit_layer(&self, chunk_coord: ChunkId, chunk_size: i32, voxel_data: &mut [Voxel]) {
    if let Some(layer) = self.edits.get_layer(chunk_coord) {
      for edit in layer.iter() {
        let idx = coord_to_index(edit.local_position.x, edit.local_position.y, edit.local_position.z, chunk_size);
        voxel_data[idx] = edit.new_data;
      }
    }
  }

  fn on_chunk_generation_complete(&mut self, chunk_coord: ChunkId, priority: f64) {
    if let Some(desc) = self.chunks.get_mut(&chunk_coord) {
      desc.state = ChunkState::PendingMeshing;
    }
    self.generated_count += 1;
    let lod_level = self.chunks.get(&chunk_coord).map(|c| c.lod_level).unwrap_or(0);
    if !self.meshing_queue.iter().any(|r| r.chunk_coord == chunk_coord) {
      self.meshing_queue.push(ChunkLodRequest {
        chunk_coord,
        lod_level,
        priority,
        morph_factor: 0.0,
      });
    }
    resort_by_ascending_priority(&mut self.meshing_queue);
    self.queue_neighbor_remesh(chunk_coord, priority);
  }

  /// §4.6.2: every Loaded neighbor of a chunk whose voxel data just became
  /// available is re-queued for meshing at half priority, deduplicated.
  fn queue_neighbor_remesh(&mut self, chunk_coord: ChunkId, origin_priority: f64) {
    let half_priority = origin_priority * 0.5;
    for neighbor in coords::all_neighbor_chunks(chunk_coord) {
      let is_loaded = self.chunks.get(&neighbor).map(|c| c.state) == Some(ChunkState::Loaded);
      if !is_loaded {
        continue;
      }
      if let Some(existing) = self.meshing_queue.iter_mut().find(|r| r.chunk_coord == neighbor) {
        existing.priority = existing.priority.max(half_priority);
        continue;
      }
      if let Some(desc) = self.chunks.get_mut(&neighbor) {
        desc.state = ChunkState::PendingMeshing;
      }
      let neighbor_lod = self.chunks.get(&neighbor).map(|c| c.lod_level).unwrap_or(0);
      self.meshing_queue.push(ChunkLodRequest {
        chunk_coord: neighbor,
        lod_level: neighbor_lod,
        priority: half_priority,
        morph_factor: 0.0,
      });
    }
    resort_by_ascending_priority(&mut self.meshing_queue);
  }

  fn run_meshing_phase(&mut self, budget: Duration, max_per_frame: usize) {
    if self.pending_mesh_queue.len() >= self.max_pending_meshes {
      return; // throttled, per §4.6's renderer-upload backpressure.
    }
    let deadline = Instant::now() + budget;
    let mut dispatched = 0usize;
    while dispatched < max_per_frame && self.pending_mesh_queue.len() < self.max_pending_meshes {
      if !budget.is_zero() && Instant::now() >= deadline {
        break;
      }
      let Some(req) = pop_highest_priority(&mut self.meshing_queue) else {
        break;
      };
      let drifted = self.chunks.get(&req.chunk_coord).map(|c| c.state) != Some(ChunkState::PendingMeshing);
      if drifted {
        continue;
      }
      dispatched += 1;
      self.mesh_one(req.chunk_coord);
    }
  }

  fn mesh_one(&mut self, chunk_coord: ChunkId) {
    if let Some(desc) = self.chunks.get_mut(&chunk_coord) {
      desc.state = ChunkState::Meshing;
    }
    let Some(request) = self.build_meshing_request(chunk_coord) else {
      if let Some(desc) = self.chunks.get_mut(&chunk_coord) {
        desc.state = ChunkState::PendingMeshing; // voxel data vanished; retry later
      }
      return;
    };

    let started = Instant::now();
    let (mesh, _stats, ok) = self.mesher.generate_mesh(&request);
    self.metrics.record_mesh_timing(started.elapsed().as_micros() as u64);
    if ok {
      let lod_level = self.chunks.get(&chunk_coord).map(|c| c.lod_level).unwrap_or(0);
      self.pending_mesh_queue.push(PendingMesh { chunk_coord, lod_level, mesh });
      self.on_chunk_meshing_complete(chunk_coord);
    } else if let Some(desc) = self.chunks.get_mut(&chunk_coord) {
      desc.state = ChunkState::PendingMeshing;
    }
  }

  fn on_chunk_meshing_complete(&mut self, chunk_coord: ChunkId) {
    let Some(entry) = self.pending_mesh_queue.iter().position(|p| p.chunk_coord == chunk_coord) else {
      return;
    };
    let PendingMesh { chunk_coord, lod_level, mesh } = self.pending_mesh_queue.remove(entry);
    let vertex_count = mesh.positions.len() as u32;
    let index_count = mesh.indices.len() as u32;
    if let Some((old_lod, old_v, old_i)) = self.loaded_mesh_stats.remove(&chunk_coord) {
      self.metrics.on_chunk_unloaded(old_lod, old_v, old_i);
    }
    self.metrics.on_chunk_loaded(lod_level, vertex_count, index_count);
    self.loaded_mesh_stats.insert(chunk_coord, (lod_level, vertex_count, index_count));

    if let Some(renderer) = &self.renderer {
      renderer.update_chunk_mesh_from_cpu(chunk_coord, lod_level, mesh);
    }

    self.loaded_chunk_coords.insert(chunk_coord);
    if let Some(desc) = self.chunks.get_mut(&chunk_coord) {
      desc.dirty = false;
      desc.state = ChunkState::Loaded;
    }
    self.meshed_count += 1;
  }

  fn run_unload_phase(&mut self, max_per_frame: usize) {
    let mut count = 0usize;
    while count < max_per_frame {
      let Some(coord) = self.unload_queue.pop_front() else {
        break;
      };
      if let Some(renderer) = &self.renderer {
        renderer.remove_chunk(coord);
      }
      self.loaded_chunk_coords.remove(&coord);
      self.chunks.remove(&coord);
      if let Some((lod, v, i)) = self.loaded_mesh_stats.remove(&coord) {
        self.metrics.on_chunk_unloaded(lod, v, i);
      }
      self.unloaded_count += 1;
      count += 1;
    }
  }

  /// §4.6 step 6: recompute every Loaded chunk's morph factor, batching
  /// changes greater than 0.01 into a single renderer call.
  fn update_lod_transitions(&mut self, ctx: &LodQueryContext) {
    let mut batch = Vec::new();
    for coord in self.loaded_chunk_coords.iter().copied().collect::<Vec<_>>() {
      let new_morph = self.strategy.morph_factor(coord, ctx);
      if let Some(desc) = self.chunks.get_mut(&coord) {
        if (new_morph - desc.morph_factor).abs() > 0.01 {
          desc.morph_factor = new_morph;
          batch.push((coord, new_morph));
        }
      }
    }
    if !batch.is_empty() {
      if let Some(renderer) = &self.renderer {
        renderer.update_lod_transitions_batch(&batch);
      }
    }
  }

  // -- neighbor extraction (§4.6.3 / §4.6.4) -----------------------------

  fn build_meshing_request(&self, chunk_coord: ChunkId) -> Option<MeshingRequest> {
    let desc = self.chunks.get(&chunk_coord)?;
    let voxel_data = desc.voxel_data.as_ref()?;
    let lod_level = desc.lod_level;
    let chunk_size = desc.chunk_size;

    let (_, voxel_size) = self.effective_params(lod_level);
    let mut request = MeshingRequest::isolated(chunk_coord, lod_level, chunk_size, voxel_size, Arc::from(voxel_data.clone()));
    request.world_origin = self.config.world_origin;

    for (i, face) in FaceDir::ALL.iter().enumerate() {
      let neighbor_coord = chunk_coord + face.normal();
      let Some(neighbor) = self.chunks.get(&neighbor_coord) else {
        continue;
      };
      let Some(neighbor_data) = neighbor.voxel_data.as_ref() else {
        continue;
      };
      if neighbor.chunk_size != chunk_size {
        continue; // mismatched LOD sampling density: treat as absent.
      }
      request.face_slices[i] = extract_face_slice(neighbor_data, chunk_size, *face);
      request.face_present[i] = true;
      request.neighbor_lod[i] = neighbor.lod_level;
      if neighbor.lod_level > lod_level {
        request.transition_faces |= 1 << face.bit();
      }
    }

    for (edge_idx, &(a, b)) in EDGE_DIRS.iter().enumerate() {
      let neighbor_coord = chunk_coord + a.normal() + b.normal();
      let Some(neighbor) = self.chunks.get(&neighbor_coord) else {
        continue;
      };
      let Some(neighbor_data) = neighbor.voxel_data.as_ref() else {
        continue;
      };
      if neighbor.chunk_size != chunk_size {
        continue;
      }
      request.edge_strips[edge_idx] = extract_edge_strip(neighbor_data, chunk_size, a, b);
      request.edge_present[edge_idx] = true;
    }

    for (corner_idx, offset) in CORNER_NEIGHBOR_OFFSETS.iter().enumerate() {
      let neighbor_coord = chunk_coord + *offset;
      let Some(neighbor) = self.chunks.get(&neighbor_coord) else {
        continue;
      };
      let Some(neighbor_data) = neighbor.voxel_data.as_ref() else {
        continue;
      };
      if neighbor.chunk_size != chunk_size {
        continue;
      }
      let corner_local = IVec3::new(
        if offset.x > 0 { 0 } else { chunk_size - 1 },
        if offset.y > 0 { 0 } else { chunk_size - 1 },
        if offset.z > 0 { 0 } else { chunk_size - 1 },
      );
      request.corner_voxels[corner_idx] = neighbor_data[coord_to_index(corner_local.x, corner_local.y, corner_local.z, chunk_size)];
      request.corner_present[corner_idx] = true;
    }

    Some(request)
  }

  // -- edits (Open Question (b)) -----------------------------------------

  /// Read the live voxel at `(chunk_coord, local)` to seed an edit's
  /// `original_data` the first time that voxel is touched, per DESIGN.md's
  /// resolution of Open Question (b). Falls back to air when the chunk
  /// isn't loaded yet (a documented limitation, not silently masked).
  fn read_live_voxel(&self, chunk_coord: ChunkId, local: IVec3) -> Voxel {
    let Some(desc) = self
      .chunks
      .get(&chunk_coord)
      .filter(|d| d.state == ChunkState::Loaded || d.state == ChunkState::PendingMeshing)
    else {
      return Voxel::AIR;
    };
    desc.voxel_data.as_ref().map(|data| data[coord_to_index(local.x, local.y, local.z, desc.chunk_size)]).unwrap_or(Voxel::AIR)
  }

  /// Write `voxel` into a loaded chunk's descriptor, requeueing it for
  /// immediate remeshing (bypassing regeneration), per §4.6's "dirty edits
  /// re-enter the machine at PendingMeshing".
  fn write_live_voxel(&mut self, chunk_coord: ChunkId, local: IVec3, voxel: Voxel) {
    let Some(desc) = self.chunks.get_mut(&chunk_coord) else {
      return;
    };
    if desc.voxel_data.is_none() {
      return;
    }
    desc.set_voxel(local, voxel);
    desc.has_edits = true;
    if desc.state == ChunkState::Loaded {
      desc.state = ChunkState::PendingMeshing;
      let lod_level = desc.lod_level;
      if !self.meshing_queue.iter().any(|r| r.chunk_coord == chunk_coord) {
        self.meshing_queue.push(ChunkLodRequest {
          chunk_coord,
          lod_level,
          priority: f64::MAX / 2.0,
          morph_factor: 0.0,
        });
        resort_by_ascending_priority(&mut self.meshing_queue);
      }
    }
  }

  /// Apply one explicit voxel edit, per §4.3(b)/Open Question (b).
  #[allow(clippy::too_many_arguments)]
  pub fn apply_single_voxel_edit(
    &mut self,
    chunk_coord: ChunkId,
    local_position: IVec3,
    mode: EditOp,
    density_delta: i32,
    brush_material_id: u8,
    timestamp: f64,
    source: EditSource,
  ) -> bool {
    let chunk_size = self.chunks.get(&chunk_coord).map(|d| d.chunk_size).unwrap_or(self.config.chunk_size);
    let original = self.read_live_voxel(chunk_coord, local_position);
    let applied = self.edits.apply_single_voxel_edit(
      chunk_coord,
      local_position,
      chunk_size,
      mode,
      density_delta,
      brush_material_id,
      timestamp,
      source,
      original,
    );
    if applied {
      if let Some(edit) = self.edits.get_layer(chunk_coord).and_then(|l| l.get_edit(local_position)) {
        let new_data = edit.new_data;
        self.write_live_voxel(chunk_coord, local_position, new_data);
      }
    }
    applied
  }

  /// Apply a brush stroke, reading live chunk data the first time each
  /// touched voxel is edited.
  pub fn apply_brush_edit(&mut self, world_center: DVec3, brush: BrushParams, mode: EditOp, timestamp: f64, source: EditSource) -> usize {
    let chunk_size = self.config.chunk_size;
    let voxel_size = self.config.voxel_size;
    let chunks = &self.chunks;
    let touched = RefCell::new(Vec::new());
    let applied = self.edits.apply_brush_edit(world_center, brush, mode, chunk_size, voxel_size, timestamp, source, |coord, local| {
      let voxel = chunks
        .get(&coord)
        .filter(|d| d.state == ChunkState::Loaded || d.state == ChunkState::PendingMeshing)
        .and_then(|d| d.voxel_data.as_ref())
        .map(|data| data[coord_to_index(local.x, local.y, local.z, chunk_size)])
        .unwrap_or(Voxel::AIR);
      touched.borrow_mut().push((coord, local));
      voxel
    });
    for (coord, local) in touched.into_inner() {
      if let Some(edit) = self.edits.get_layer(coord).and_then(|l| l.get_edit(local)) {
        let new_data = edit.new_data;
        self.write_live_voxel(coord, local, new_data);
      }
    }
    applied
  }

  pub fn undo(&mut self) -> bool {
    self.edits.undo()
  }

  pub fn redo(&mut self) -> bool {
    self.edits.redo()
  }
}

/// The eight chunk-diagonal neighbor offsets a corner voxel is extracted
/// from, in the corner-index order of [`crate::constants::CORNER_OFFSETS`].
const CORNER_NEIGHBOR_OFFSETS: [IVec3; CORNER_COUNT] = [
  IVec3::new(-1, -1, -1),
  IVec3::new(1, -1, -1),
  IVec3::new(-1, 1, -1),
  IVec3::new(1, 1, -1),
  IVec3::new(-1, -1, 1),
  IVec3::new(1, -1, 1),
  IVec3::new(-1, 1, 1),
  IVec3::new(1, 1, 1),
];

/// Copy the `chunk_size²` plane of `neighbor_data` that borders the current
/// chunk across `face`: if `face`'s normal points toward the neighbor along
/// `+axis`, that plane is the neighbor's `axis == 0` layer (and vice versa).
fn extract_face_slice(neighbor_data: &[Voxel], chunk_size: i32, face: FaceDir) -> Vec<Voxel> {
  let n = chunk_size;
  let normal = face.normal();
  let mut out = Vec::with_capacity((n * n) as usize);
  if normal.x != 0 {
    let x = if normal.x > 0 { 0 } else { n - 1 };
    for z in 0..n {
      for y in 0..n {
        out.push(neighbor_data[coord_to_index(x, y, z, n)]);
      }
    }
  } else if normal.y != 0 {
    let y = if normal.y > 0 { 0 } else { n - 1 };
    for z in 0..n {
      for x in 0..n {
        out.push(neighbor_data[coord_to_index(x, y, z, n)]);
      }
    }
  } else {
    let z = if normal.z > 0 { 0 } else { n - 1 };
    for y in 0..n {
      for x in 0..n {
        out.push(neighbor_data[coord_to_index(x, y, z, n)]);
      }
    }
  }
  out
}

/// Extract an N-long strip from the diagonal neighbor at `a.normal() +
/// b.normal()`: each axis the pair constrains reads the neighbor's near
/// face (same rule as [`extract_face_slice`]); the one unconstrained axis
/// varies `0..chunk_size`.
fn extract_edge_strip(neighbor_data: &[Voxel], chunk_size: i32, a: FaceDir, b: FaceDir) -> Vec<Voxel> {
  let n = chunk_size;
  let offset = a.normal() + b.normal();
  let fixed = |o: i32| if o > 0 { 0 } else { n - 1 };
  let mut out = Vec::with_capacity(n as usize);
  for t in 0..n {
    let x = if offset.x != 0 { fixed(offset.x) } else { t };
    let y = if offset.y != 0 { fixed(offset.y) } else { t };
    let z = if offset.z != 0 { fixed(offset.z) } else { t };
    out.push(neighbor_data[coord_to_index(x, y, z, n)]);
  }
  out
}

#[cfg(test)]
#[path = "chunk_manager_test.rs"]
mod chunk_manager_test;
