//! The edit overlay manager: scoped edit sessions, brush application,
//! accumulation, undo/redo, and dirtiness broadcasting.
//!
//! Matches Design Note §9's "handles passed through configuration, not a
//! singleton" — the event sink is injected at construction rather than
//! reached through global state.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use glam::{DVec3, IVec3};

use crate::chunk::ChunkId;
use crate::constants::{DEFAULT_UNDO_CAPACITY, SURFACE_THRESHOLD};
use crate::coords;
use crate::voxel::Voxel;

use super::types::{BrushParams, EditLayer, EditOp, EditOperation, EditSource, VoxelEdit};

/// Collaborators that react to edit activity register one of these at
/// construction. The renderer, collision manager, scatter system, and
/// water-propagation system are all plausible subscribers.
pub trait EditEventSink: Send + Sync {
  fn on_chunk_edited(&self, chunk_coord: ChunkId, source: EditSource, edit_center: DVec3, edit_radius: f64);
  fn on_undo_redo_state_changed(&self, undo_len: usize, redo_len: usize);
}

/// Computes the voxel that results from applying `mode`/`delta`/`material`
/// on top of `original`.
fn compute_new_data(original: Voxel, mode: EditOp, delta: i32, material: u8) -> Voxel {
  let delta = delta.max(0);
  match mode {
    EditOp::Set => Voxel {
      material_id: material,
      density: delta.clamp(0, 255) as u8,
      biome_id: original.biome_id,
      metadata: original.metadata,
    },
    EditOp::Add => {
      let density = (original.density as i32 + delta).clamp(0, 255) as u8;
      Voxel {
        material_id: if density as u32 >= SURFACE_THRESHOLD as u32 {
          material
        } else {
          original.material_id
        },
        density,
        biome_id: original.biome_id,
        metadata: original.metadata,
      }
    }
    EditOp::Subtract => {
      let density = (original.density as i32 - delta).clamp(0, 255) as u8;
      Voxel {
        material_id: if density >= SURFACE_THRESHOLD { original.material_id } else { 0 },
        density,
        biome_id: original.biome_id,
        metadata: original.metadata,
      }
    }
    EditOp::Paint => Voxel {
      material_id: material,
      density: original.density,
      biome_id: original.biome_id,
      metadata: original.metadata,
    },
    EditOp::Smooth => {
      let target = (original.density as i32 + delta).clamp(0, 255);
      let density = ((original.density as i32 + target) / 2) as u8;
      Voxel {
        material_id: original.material_id,
        density,
        biome_id: original.biome_id,
        metadata: original.metadata,
      }
    }
  }
}

/// Resolve accumulation per the rules in §4.3(c). Returns `None` when the
/// accumulated record annihilates back to the procedural baseline.
///
/// `original` is the procedural (pre-edit) voxel at this position: the
/// annihilation case keys off whichever side of the accumulation was the
/// `Add` (not whichever side is the *incoming* edit — an `Add` followed by
/// a later `Subtract` that cancels it still preserves the Add's material).
fn accumulate(
  existing: Option<&VoxelEdit>,
  incoming_mode: EditOp,
  incoming_delta: i32,
  incoming_material: u8,
  original: Voxel,
) -> Option<(EditOp, i32, u8)> {
  match existing {
    Some(e) if is_signed_delta_mode(e.edit_mode) && is_signed_delta_mode(incoming_mode) => {
      let existing_signed = to_signed(e.edit_mode, e.density_delta);
      let incoming_signed = to_signed(incoming_mode, incoming_delta);
      let total = existing_signed + incoming_signed;
      if total == 0 {
        let adding_material = if incoming_mode == EditOp::Add {
          incoming_material
        } else if e.edit_mode == EditOp::Add {
          e.brush_material_id
        } else {
          0
        };
        if adding_material != 0 && original.is_air() {
          Some((EditOp::Paint, 0, adding_material))
        } else {
          None
        }
      } else {
        let mode = if total > 0 { EditOp::Add } else { EditOp::Subtract };
        let material = if incoming_mode == EditOp::Add {
          incoming_material
        } else if e.edit_mode == EditOp::Add {
          e.brush_material_id
        } else {
          incoming_material
        };
        Some((mode, total.abs(), material))
      }
    }
    _ => Some((incoming_mode, incoming_delta, incoming_material)),
  }
}

#[inline]
fn is_signed_delta_mode(mode: EditOp) -> bool {
  matches!(mode, EditOp::Add | EditOp::Subtract)
}

#[inline]
fn to_signed(mode: EditOp, delta: i32) -> i32 {
  match mode {
    EditOp::Add => delta,
    EditOp::Subtract => -delta,
    _ => 0,
  }
}

/// Owns every chunk's sparse edit layer plus the undo/redo history.
pub struct EditManager {
  layers: HashMap<ChunkId, EditLayer>,
  in_progress: Option<EditOperation>,
  auto_started: bool,
  undo_stack: VecDeque<EditOperation>,
  redo_stack: VecDeque<EditOperation>,
  next_operation_id: u64,
  undo_capacity: usize,
  event_sink: Option<Arc<dyn EditEventSink>>,
  default_chunk_size: i32,
}

impl EditManager {
  pub fn new(default_chunk_size: i32) -> Self {
    Self {
      layers: HashMap::new(),
      in_progress: None,
      auto_started: false,
      undo_stack: VecDeque::new(),
      redo_stack: VecDeque::new(),
      next_operation_id: 0,
      undo_capacity: DEFAULT_UNDO_CAPACITY,
      event_sink: None,
      default_chunk_size,
    }
  }

  pub fn with_undo_capacity(mut self, capacity: usize) -> Self {
    self.undo_capacity = capacity.max(1);
    self
  }

  pub fn with_event_sink(mut self, sink: Arc<dyn EditEventSink>) -> Self {
    self.event_sink = Some(sink);
    self
  }

  fn publish_chunk_edited(&self, chunk_coord: ChunkId, source: EditSource, edit_center: DVec3, edit_radius: f64) {
    if let Some(sink) = &self.event_sink {
      sink.on_chunk_edited(chunk_coord, source, edit_center, edit_radius);
    }
  }

  fn publish_undo_redo_state_changed(&self) {
    if let Some(sink) = &self.event_sink {
      sink.on_undo_redo_state_changed(self.undo_stack.len(), self.redo_stack.len());
    }
  }

  fn trim_undo_stack(&mut self) {
    while self.undo_stack.len() > self.undo_capacity {
      self.undo_stack.pop_front();
    }
  }

  // -- scoped operations -------------------------------------------------

  /// Begin a named edit operation. A nested `begin` ends the previous one
  /// (discarding it if empty, committing it otherwise) before starting the
  /// new one.
  pub fn begin_operation(&mut self, description: impl Into<String>, timestamp: f64) -> u64 {
    if self.in_progress.is_some() {
      self.end_operation();
    }
    self.next_operation_id += 1;
    let id = self.next_operation_id;
    self.in_progress = Some(EditOperation::new(id, description, timestamp));
    self.auto_started = false;
    id
  }

  /// Commit the in-progress operation onto the undo stack. An operation
  /// with no edits is discarded silently. Returns `true` iff an operation
  /// was committed.
  pub fn end_operation(&mut self) -> bool {
    let Some(op) = self.in_progress.take() else {
      return false;
    };
    self.auto_started = false;
    if op.is_empty() {
      return false;
    }
    self.undo_stack.push_back(op);
    self.trim_undo_stack();
    self.redo_stack.clear();
    self.publish_undo_redo_state_changed();
    true
  }

  /// Discard the in-progress operation, reverting every voxel it touched.
  pub fn cancel_operation(&mut self) -> bool {
    let Some(op) = self.in_progress.take() else {
      return false;
    };
    self.auto_started = false;
    for (chunk_coord, edit) in op.edits.iter().rev() {
      self.revert_into_layer(*chunk_coord, edit);
      self.publish_chunk_edited(*chunk_coord, EditSource::System, DVec3::ZERO, 0.0);
    }
    true
  }

  fn revert_into_layer(&mut self, chunk_coord: ChunkId, edit: &VoxelEdit) {
    let chunk_size = self
      .layers
      .get(&chunk_coord)
      .map(|l| l.chunk_size)
      .unwrap_or(self.default_chunk_size);
    let layer = self
      .layers
      .entry(chunk_coord)
      .or_insert_with(|| EditLayer::new(chunk_coord, chunk_size));
    if edit.original_data == Voxel::AIR {
      layer.remove_edit(edit.local_position);
    } else {
      layer.apply_edit(VoxelEdit {
        local_position: edit.local_position,
        new_data: edit.original_data,
        original_data: edit.new_data,
        edit_mode: edit.edit_mode,
        density_delta: edit.density_delta,
        brush_material_id: edit.brush_material_id,
        timestamp: edit.timestamp,
      });
    }
  }

  // -- application ---------------------------------------------------------

  #[allow(clippy::too_many_arguments)]
  fn record_edit(
    &mut self,
    chunk_coord: ChunkId,
    local_position: IVec3,
    chunk_size: i32,
    mode: EditOp,
    delta: i32,
    material: u8,
    timestamp: f64,
    original_data_if_new: Voxel,
    source: EditSource,
    edit_center: DVec3,
    edit_radius: f64,
  ) -> bool {
    if local_position.x < 0
      || local_position.x >= chunk_size
      || local_position.y < 0
      || local_position.y >= chunk_size
      || local_position.z < 0
      || local_position.z >= chunk_size
    {
      #[cfg(feature = "tracing")]
      tracing::warn!(?chunk_coord, ?local_position, "edit position outside chunk bounds");
      if self.auto_started {
        self.cancel_operation();
      }
      return false;
    }

    if self.in_progress.is_none() {
      self.begin_operation("auto", timestamp);
      self.auto_started = true;
    }

    let layer = self
      .layers
      .entry(chunk_coord)
      .or_insert_with(|| EditLayer::new(chunk_coord, chunk_size));
    let existing = layer.get_edit(local_position).copied();
    let original = existing.map(|e| e.original_data).unwrap_or(original_data_if_new);

    let rec = match accumulate(existing.as_ref(), mode, delta, material, original) {
      None => {
        layer.remove_edit(local_position);
        VoxelEdit {
          local_position,
          new_data: original,
          original_data: original,
          edit_mode: mode,
          density_delta: 0,
          brush_material_id: material,
          timestamp,
        }
      }
      Some((m, d, mat)) => {
        let new_data = compute_new_data(original, m, d, mat);
        let rec = VoxelEdit {
          local_position,
          new_data,
          original_data: original,
          edit_mode: m,
          density_delta: d,
          brush_material_id: mat,
          timestamp,
        };
        layer.apply_edit(rec);
        rec
      }
    };

    self.in_progress.as_mut().expect("just begun").edits.push((chunk_coord, rec));
    self.publish_chunk_edited(chunk_coord, source, edit_center, edit_radius);
    true
  }

  /// Apply one explicit edit at a known chunk-local voxel.
  #[allow(clippy::too_many_arguments)]
  pub fn apply_single_voxel_edit(
    &mut self,
    chunk_coord: ChunkId,
    local_position: IVec3,
    chunk_size: i32,
    mode: EditOp,
    density_delta: i32,
    brush_material_id: u8,
    timestamp: f64,
    source: EditSource,
    original_data_if_new: Voxel,
  ) -> bool {
    let center = coords::local_voxel_to_world(chunk_coord, local_position, chunk_size, 1.0);
    self.record_edit(
      chunk_coord,
      local_position,
      chunk_size,
      mode,
      density_delta,
      brush_material_id,
      timestamp,
      original_data_if_new,
      source,
      center,
      0.0,
    )
  }

  /// Apply a brush stroke centered at `world_center`, touching every voxel
  /// whose falloff-weighted strength is at least 0.01. `original_data_fn` is
  /// how the caller (the chunk manager, per Open Question (b)) supplies the
  /// procedural/live voxel the first time a voxel is touched.
  #[allow(clippy::too_many_arguments)]
  pub fn apply_brush_edit<F>(
    &mut self,
    world_center: DVec3,
    brush: BrushParams,
    mode: EditOp,
    chunk_size: i32,
    voxel_size: f64,
    timestamp: f64,
    source: EditSource,
    mut original_data_fn: F,
  ) -> usize
  where
    F: FnMut(ChunkId, IVec3) -> Voxel,
  {
    let radius = DVec3::splat(brush.radius);
    let chunk_min = coords::world_to_chunk(world_center - radius, chunk_size, voxel_size);
    let chunk_max = coords::world_to_chunk(world_center + radius, chunk_size, voxel_size);

    let mut applied = 0usize;
    for cz in chunk_min.z..=chunk_max.z {
      for cy in chunk_min.y..=chunk_max.y {
        for cx in chunk_min.x..=chunk_max.x {
          let chunk_coord = IVec3::new(cx, cy, cz);
          for lz in 0..chunk_size {
            for ly in 0..chunk_size {
              for lx in 0..chunk_size {
                let local = IVec3::new(lx, ly, lz);
                let world_pos = coords::local_voxel_to_world(chunk_coord, local, chunk_size, voxel_size);
                let offset = world_pos - world_center;
                let strength = brush.falloff_at(offset);
                if strength < 0.01 {
                  continue;
                }
                let delta = (brush.density_delta as f64 * strength).round() as i32;
                let original = original_data_fn(chunk_coord, local);
                if self.record_edit(
                  chunk_coord,
                  local,
                  chunk_size,
                  mode,
                  delta,
                  brush.material_id,
                  timestamp,
                  original,
                  source,
                  world_center,
                  brush.radius,
                ) {
                  applied += 1;
                }
              }
            }
          }
        }
      }
    }
    applied
  }

  // -- undo/redo -----------------------------------------------------------

  pub fn undo(&mut self) -> bool {
    let Some(op) = self.undo_stack.pop_back() else {
      return false;
    };
    for (chunk_coord, edit) in op.edits.iter().rev() {
      self.revert_into_layer(*chunk_coord, edit);
      self.publish_chunk_edited(*chunk_coord, EditSource::System, DVec3::ZERO, 0.0);
    }
    self.redo_stack.push_back(op);
    self.publish_undo_redo_state_changed();
    true
  }

  pub fn redo(&mut self) -> bool {
    let Some(op) = self.redo_stack.pop_back() else {
      return false;
    };
    for (chunk_coord, edit) in op.edits.iter() {
      let chunk_size = self
        .layers
        .get(chunk_coord)
        .map(|l| l.chunk_size)
        .unwrap_or(self.default_chunk_size);
      let layer = self
        .layers
        .entry(*chunk_coord)
        .or_insert_with(|| EditLayer::new(*chunk_coord, chunk_size));
      layer.apply_edit(*edit);
      self.publish_chunk_edited(*chunk_coord, EditSource::System, DVec3::ZERO, 0.0);
    }
    self.undo_stack.push_back(op);
    self.trim_undo_stack();
    self.publish_undo_redo_state_changed();
    true
  }

  /// Discard undo/redo history without touching live edit layers.
  pub fn clear_history(&mut self) {
    self.undo_stack.clear();
    self.redo_stack.clear();
    self.publish_undo_redo_state_changed();
  }

  /// Replace the entire layer set with loaded records and publish a
  /// System-sourced chunk-edited event for each affected chunk, per the
  /// binary-persistence contract in §6.
  pub(crate) fn load_from_records(&mut self, chunks: Vec<(ChunkId, i32, Vec<VoxelEdit>)>) {
    self.layers.clear();
    for (chunk_coord, chunk_size, edits) in chunks {
      let mut layer = EditLayer::new(chunk_coord, chunk_size);
      for edit in edits {
        layer.apply_edit(edit);
      }
      self.layers.insert(chunk_coord, layer);
      self.publish_chunk_edited(chunk_coord, EditSource::System, DVec3::ZERO, 0.0);
    }
  }

  /// Drop every layer and history entry, as on `shutdown`.
  pub fn clear_all(&mut self) {
    self.layers.clear();
    self.in_progress = None;
    self.clear_history();
  }

  // -- queries ---------------------------------------------------------

  pub fn undo_len(&self) -> usize {
    self.undo_stack.len()
  }

  pub fn redo_len(&self) -> usize {
    self.redo_stack.len()
  }

  pub fn get_layer(&self, chunk_coord: ChunkId) -> Option<&EditLayer> {
    self.layers.get(&chunk_coord)
  }

  pub fn layers(&self) -> impl Iterator<Item = &EditLayer> {
    self.layers.values()
  }

  pub fn has_edits(&self, chunk_coord: ChunkId) -> bool {
    self.layers.get(&chunk_coord).is_some_and(EditLayer::has_edits)
  }

  pub fn total_edit_count(&self) -> usize {
    self.layers.values().map(EditLayer::len).sum()
  }

  pub(crate) fn layers_mut(&mut self) -> &mut HashMap<ChunkId, EditLayer> {
    &mut self.layers
  }

  pub(crate) fn default_chunk_size(&self) -> i32 {
    self.default_chunk_size
  }
}

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;
