//! Data types for the edit overlay: edit records, edit layers, brush
//! parameters, and the operation grouping used by undo/redo.

use std::collections::HashMap;

use glam::{DVec3, IVec3};

use crate::chunk::ChunkId;
use crate::constants::coord_to_index;
use crate::voxel::Voxel;

/// How an edit record combines with the procedural field (or with a prior
/// edit record at the same voxel).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOp {
  Set,
  Add,
  Subtract,
  Paint,
  Smooth,
}

impl EditOp {
  /// Wire tag used by the binary persistence format.
  pub fn to_wire(self) -> u8 {
    match self {
      EditOp::Set => 0,
      EditOp::Add => 1,
      EditOp::Subtract => 2,
      EditOp::Paint => 3,
      EditOp::Smooth => 4,
    }
  }

  pub fn from_wire(tag: u8) -> Option<Self> {
    match tag {
      0 => Some(EditOp::Set),
      1 => Some(EditOp::Add),
      2 => Some(EditOp::Subtract),
      3 => Some(EditOp::Paint),
      4 => Some(EditOp::Smooth),
      _ => None,
    }
  }
}

/// Who originated a dirtiness/edit event: a direct user action, or internal
/// maintenance (undo, redo, clear, load).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditSource {
  Player,
  System,
}

/// Brush footprint shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushShape {
  Sphere,
  Cube,
  Cylinder,
}

/// Brush strength falloff curve from the brush center to its edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushFalloff {
  Linear,
  /// Hermite smoothstep: `3t² − 2t³`.
  Smooth,
  /// `(1 − t)²`.
  Sharp,
}

impl BrushFalloff {
  /// Evaluate the falloff curve at normalized distance `t ∈ [0,1]` (0 =
  /// brush center, 1 = brush edge). Values outside `[0,1]` are clamped.
  pub fn evaluate(&self, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    match self {
      BrushFalloff::Linear => 1.0 - t,
      BrushFalloff::Smooth => 1.0 - (3.0 * t * t - 2.0 * t * t * t),
      BrushFalloff::Sharp => (1.0 - t) * (1.0 - t),
    }
  }
}

/// Parameters of one brush stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushParams {
  pub shape: BrushShape,
  pub radius: f64,
  pub strength: f64,
  pub material_id: u8,
  pub density_delta: u8,
  pub falloff: BrushFalloff,
}

impl BrushParams {
  /// Effective falloff strength at world-space `offset` from the brush
  /// center, in `[0, strength]`. Returns 0.0 outside the brush footprint.
  pub fn falloff_at(&self, offset: DVec3) -> f64 {
    let t = match self.shape {
      BrushShape::Sphere => offset.length() / self.radius,
      BrushShape::Cube => {
        let a = offset.abs();
        a.x.max(a.y).max(a.z) / self.radius
      }
      BrushShape::Cylinder => {
        let horiz = (offset.x * offset.x + offset.z * offset.z).sqrt();
        horiz / self.radius
      }
    };
    if t > 1.0 {
      0.0
    } else {
      self.strength * self.falloff.evaluate(t)
    }
  }
}

/// A per-voxel diff against the procedural field.
///
/// Invariant: `local_position` components are in `[0, chunk_size)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelEdit {
  pub local_position: IVec3,
  pub new_data: Voxel,
  pub original_data: Voxel,
  pub edit_mode: EditOp,
  pub density_delta: i32,
  pub brush_material_id: u8,
  pub timestamp: f64,
}

impl VoxelEdit {
  /// `true` iff `local_position` lies within `[0, chunk_size)³`.
  pub fn is_valid_position(&self, chunk_size: i32) -> bool {
    let p = self.local_position;
    p.x >= 0 && p.x < chunk_size && p.y >= 0 && p.y < chunk_size && p.z >= 0 && p.z < chunk_size
  }
}

/// A sparse map of local voxel index → edit record for one chunk.
#[derive(Clone, Debug)]
pub struct EditLayer {
  pub chunk_coord: ChunkId,
  pub chunk_size: i32,
  edits: HashMap<usize, VoxelEdit>,
}

impl EditLayer {
  pub fn new(chunk_coord: ChunkId, chunk_size: i32) -> Self {
    Self {
      chunk_coord,
      chunk_size,
      edits: HashMap::new(),
    }
  }

  #[inline]
  fn index(&self, local: IVec3) -> usize {
    coord_to_index(local.x, local.y, local.z, self.chunk_size)
  }

  pub fn apply_edit(&mut self, edit: VoxelEdit) {
    debug_assert!(edit.is_valid_position(self.chunk_size));
    let idx = self.index(edit.local_position);
    self.edits.insert(idx, edit);
  }

  pub fn remove_edit(&mut self, local: IVec3) -> Option<VoxelEdit> {
    self.edits.remove(&self.index(local))
  }

  pub fn get_edit(&self, local: IVec3) -> Option<&VoxelEdit> {
    self.edits.get(&self.index(local))
  }

  pub fn iter(&self) -> impl Iterator<Item = &VoxelEdit> {
    self.edits.values()
  }

  pub fn len(&self) -> usize {
    self.edits.len()
  }

  /// An allocated-but-empty layer is never reported as having edits.
  pub fn has_edits(&self) -> bool {
    !self.edits.is_empty()
  }

  pub fn is_empty(&self) -> bool {
    self.edits.is_empty()
  }
}

/// A named group of edit records forming the unit of undo/redo. Sequences
/// are append-only while the operation is in progress and immutable once it
/// enters the history stacks.
#[derive(Clone, Debug)]
pub struct EditOperation {
  pub operation_id: u64,
  pub description: String,
  pub timestamp: f64,
  pub edits: Vec<(ChunkId, VoxelEdit)>,
}

impl EditOperation {
  pub fn new(operation_id: u64, description: impl Into<String>, timestamp: f64) -> Self {
    Self {
      operation_id,
      description: description.into(),
      timestamp,
      edits: Vec::new(),
    }
  }

  /// Distinct chunk coordinates touched by this operation.
  pub fn affected_chunks(&self) -> Vec<ChunkId> {
    let mut seen = Vec::new();
    for (coord, _) in &self.edits {
      if !seen.contains(coord) {
        seen.push(*coord);
      }
    }
    seen
  }

  pub fn is_empty(&self) -> bool {
    self.edits.is_empty()
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
