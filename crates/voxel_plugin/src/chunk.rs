//! Chunk descriptor and the lifecycle states a chunk moves through as the
//! streaming pipeline loads, generates, meshes, and unloads it.

use glam::{DVec3, IVec3};

use crate::constants::coord_to_index;
use crate::voxel::Voxel;

/// Coordinate identifying a chunk in chunk space (not world units).
pub type ChunkId = IVec3;

/// Where a chunk sits in the streaming pipeline. Transitions are driven
/// exclusively by [`crate::chunk_manager::ChunkManager`]; nothing else
/// mutates this field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ChunkState {
  #[default]
  Unloaded,
  PendingGeneration,
  Generating,
  PendingMeshing,
  Meshing,
  Loaded,
  PendingUnload,
}

/// A single cubic block of voxels plus its streaming/rendering metadata.
///
/// `voxel_data` is `None` until the generation phase allocates it; it is
/// reset to `None` (and state reverts to [`ChunkState::Unloaded`]) on
/// generation failure or on unload.
#[derive(Clone, Debug)]
pub struct ChunkDescriptor {
  pub chunk_coord: ChunkId,
  pub lod_level: i32,
  pub chunk_size: i32,
  pub voxel_data: Option<Box<[Voxel]>>,
  pub world_min: DVec3,
  pub world_max: DVec3,
  pub dirty: bool,
  pub has_edits: bool,
  pub morph_factor: f32,
  pub generation_seed: i32,
  pub state: ChunkState,
}

impl ChunkDescriptor {
  /// Create a freshly tracked, unallocated chunk descriptor.
  pub fn new(chunk_coord: ChunkId, lod_level: i32, chunk_size: i32, voxel_size: f64, generation_seed: i32) -> Self {
    let world_min = crate::coords::chunk_to_world_min(chunk_coord, chunk_size, voxel_size);
    let chunk_world_size = chunk_size as f64 * voxel_size;
    Self {
      chunk_coord,
      lod_level,
      chunk_size,
      voxel_data: None,
      world_min,
      world_max: world_min + DVec3::splat(chunk_world_size),
      dirty: false,
      has_edits: false,
      morph_factor: 0.0,
      generation_seed,
      state: ChunkState::Unloaded,
    }
  }

  /// Number of voxels in a fully allocated chunk of this size.
  #[inline]
  pub fn voxel_count(&self) -> usize {
    (self.chunk_size as usize).pow(3)
  }

  #[inline]
  fn index(&self, local: IVec3) -> usize {
    coord_to_index(local.x, local.y, local.z, self.chunk_size)
  }

  /// Bounds-checked read; panics (debug and release, via indexing) if
  /// `local` is outside `[0, chunk_size)³` or data is unallocated — callers
  /// are expected to have validated against the invariant already.
  pub fn get_voxel(&self, local: IVec3) -> Voxel {
    let data = self.voxel_data.as_ref().expect("voxel_data not allocated");
    data[self.index(local)]
  }

  /// Bounds-checked write; marks the chunk dirty.
  pub fn set_voxel(&mut self, local: IVec3, voxel: Voxel) {
    let idx = self.index(local);
    let data = self.voxel_data.as_mut().expect("voxel_data not allocated");
    data[idx] = voxel;
    self.dirty = true;
  }

  /// Rough resident memory estimate in bytes: voxel storage plus descriptor
  /// overhead.
  pub fn memory_usage_bytes(&self) -> usize {
    let voxel_bytes = self
      .voxel_data
      .as_ref()
      .map(|d| d.len() * std::mem::size_of::<Voxel>())
      .unwrap_or(0);
    voxel_bytes + std::mem::size_of::<Self>()
  }

  /// A stable 64-bit identifier packing the (truncated) chunk coordinate
  /// and LOD level: 16 bits per axis, 8 bits of LOD level.
  pub fn stable_id(&self) -> u64 {
    stable_chunk_id(self.chunk_coord, self.lod_level)
  }
}

/// Pack a chunk coordinate and LOD level into a stable 64-bit id:
/// `x:16 | y:16 | z:16 | lod:8`, coordinates truncated to 16 bits.
#[inline]
pub fn stable_chunk_id(chunk_coord: ChunkId, lod_level: i32) -> u64 {
  let x = (chunk_coord.x as u16) as u64;
  let y = (chunk_coord.y as u16) as u64;
  let z = (chunk_coord.z as u16) as u64;
  let lod = (lod_level as u8) as u64;
  x | (y << 16) | (z << 32) | (lod << 48)
}

#[cfg(test)]
#[path = "chunk_test.rs"]
mod chunk_test;
