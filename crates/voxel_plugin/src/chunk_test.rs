use super::*;
use crate::voxel::Voxel;

fn allocated(chunk_size: i32) -> ChunkDescriptor {
  let mut d = ChunkDescriptor::new(IVec3::new(1, 2, 3), 0, chunk_size, 1.0, 42);
  d.voxel_data = Some(vec![Voxel::AIR; d.voxel_count()].into_boxed_slice());
  d
}

#[test]
fn new_chunk_starts_unloaded_and_unallocated() {
  let d = ChunkDescriptor::new(IVec3::ZERO, 0, 32, 1.0, 0);
  assert_eq!(d.state, ChunkState::Unloaded);
  assert!(d.voxel_data.is_none());
  assert!(!d.dirty);
  assert!(!d.has_edits);
}

#[test]
fn world_bounds_span_one_chunk_extent() {
  let d = ChunkDescriptor::new(IVec3::new(1, 0, 0), 0, 32, 2.0, 0);
  assert_eq!(d.world_min, DVec3::new(64.0, 0.0, 0.0));
  assert_eq!(d.world_max, DVec3::new(128.0, 64.0, 64.0));
}

#[test]
fn get_set_voxel_roundtrips_and_marks_dirty() {
  let mut d = allocated(8);
  assert!(!d.dirty);
  let v = Voxel::solid(5, 1);
  d.set_voxel(IVec3::new(1, 2, 3), v);
  assert!(d.dirty);
  assert_eq!(d.get_voxel(IVec3::new(1, 2, 3)), v);
}

#[test]
fn voxel_count_is_chunk_size_cubed() {
  let d = ChunkDescriptor::new(IVec3::ZERO, 0, 16, 1.0, 0);
  assert_eq!(d.voxel_count(), 16 * 16 * 16);
}

#[test]
fn memory_usage_accounts_for_allocation() {
  let empty = ChunkDescriptor::new(IVec3::ZERO, 0, 32, 1.0, 0);
  let full = allocated(32);
  assert!(full.memory_usage_bytes() > empty.memory_usage_bytes());
}

#[test]
fn stable_id_distinguishes_coord_and_lod() {
  let a = stable_chunk_id(IVec3::new(1, 2, 3), 0);
  let b = stable_chunk_id(IVec3::new(1, 2, 3), 1);
  let c = stable_chunk_id(IVec3::new(1, 2, 4), 0);
  assert_ne!(a, b);
  assert_ne!(a, c);
}

#[test]
fn stable_id_truncates_to_16_bits_per_axis() {
  let id = stable_chunk_id(IVec3::new(-1, 0, 0), 0);
  assert_eq!(id & 0xFFFF, 0xFFFF);
}
