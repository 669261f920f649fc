use super::*;

const CHUNK_SIZE: i32 = 32;
const VOXEL_SIZE: f64 = 1.0;

#[test]
fn world_to_chunk_is_floor_division() {
  assert_eq!(world_to_chunk(DVec3::new(0.0, 0.0, 0.0), CHUNK_SIZE, VOXEL_SIZE), IVec3::ZERO);
  assert_eq!(world_to_chunk(DVec3::new(31.9, 0.0, 0.0), CHUNK_SIZE, VOXEL_SIZE), IVec3::new(0, 0, 0));
  assert_eq!(world_to_chunk(DVec3::new(32.0, 0.0, 0.0), CHUNK_SIZE, VOXEL_SIZE), IVec3::new(1, 0, 0));
  assert_eq!(world_to_chunk(DVec3::new(-1.0, 0.0, 0.0), CHUNK_SIZE, VOXEL_SIZE), IVec3::new(-1, 0, 0));
  assert_eq!(world_to_chunk(DVec3::new(-32.0, 0.0, 0.0), CHUNK_SIZE, VOXEL_SIZE), IVec3::new(-1, 0, 0));
  assert_eq!(world_to_chunk(DVec3::new(-32.1, 0.0, 0.0), CHUNK_SIZE, VOXEL_SIZE), IVec3::new(-2, 0, 0));
}

#[test]
fn world_to_local_voxel_wraps_within_chunk() {
  assert_eq!(world_to_local_voxel(DVec3::new(0.0, 0.0, 0.0), CHUNK_SIZE, VOXEL_SIZE), IVec3::ZERO);
  assert_eq!(
    world_to_local_voxel(DVec3::new(33.0, 0.0, 0.0), CHUNK_SIZE, VOXEL_SIZE),
    IVec3::new(1, 0, 0)
  );
  assert_eq!(
    world_to_local_voxel(DVec3::new(-1.0, 0.0, 0.0), CHUNK_SIZE, VOXEL_SIZE),
    IVec3::new(31, 0, 0)
  );
}

#[test]
fn chunk_to_world_min_and_center() {
  let c = IVec3::new(2, -1, 0);
  let min = chunk_to_world_min(c, CHUNK_SIZE, VOXEL_SIZE);
  assert_eq!(min, DVec3::new(64.0, -32.0, 0.0));
  let center = chunk_to_world_center(c, CHUNK_SIZE, VOXEL_SIZE);
  assert_eq!(center, min + DVec3::splat(16.0));
}

#[test]
fn local_voxel_to_world_is_voxel_center() {
  let world = local_voxel_to_world(IVec3::ZERO, IVec3::new(0, 0, 0), CHUNK_SIZE, VOXEL_SIZE);
  assert_eq!(world, DVec3::splat(0.5));
}

#[test]
fn voxel_chunk_local_roundtrip() {
  for gx in [-65, -33, -1, 0, 1, 33, 65] {
    let global = IVec3::new(gx, gx, gx);
    let chunk = voxel_to_chunk(global, CHUNK_SIZE);
    let local = voxel_to_local(global, CHUNK_SIZE);
    assert!((0..CHUNK_SIZE).contains(&local.x));
    assert_eq!(chunk * CHUNK_SIZE + local, global);
  }
}

#[test]
fn adjacent_chunks_returns_six_unique_face_neighbors() {
  let c = IVec3::new(5, 5, 5);
  let neighbors = adjacent_chunks(c);
  assert_eq!(neighbors.len(), 6);
  for n in neighbors {
    assert_eq!((n - c).abs().element_sum(), 1);
  }
}

#[test]
fn all_neighbor_chunks_returns_26_distinct_neighbors() {
  let c = IVec3::new(0, 0, 0);
  let neighbors = all_neighbor_chunks(c);
  assert_eq!(neighbors.len(), 26);
  let unique: std::collections::HashSet<_> = neighbors.iter().copied().collect();
  assert_eq!(unique.len(), 26);
  assert!(!neighbors.contains(&c));
}

#[test]
fn face_dir_opposite_is_an_involution() {
  for face in FaceDir::ALL {
    assert_eq!(face.opposite().opposite(), face);
    assert_ne!(face.opposite(), face);
  }
}

#[test]
fn face_dir_normals_are_unit_axis_vectors() {
  for face in FaceDir::ALL {
    let n = face.normal();
    assert_eq!(n.abs().element_sum(), 1);
    assert_eq!(face.opposite().normal(), -n);
  }
}

#[test]
fn face_dir_bits_are_distinct() {
  let bits: std::collections::HashSet<u8> = FaceDir::ALL.iter().map(|f| f.bit()).collect();
  assert_eq!(bits.len(), 6);
  assert!(bits.iter().all(|&b| b < 6));
}
