use super::*;
use crate::constants::coord_to_index;
use glam::IVec3;
use std::sync::Arc;

fn filled(chunk_size: i32, f: impl Fn(i32, i32, i32) -> Voxel) -> Arc<[Voxel]> {
  let n = chunk_size as usize;
  let mut data = vec![Voxel::AIR; n * n * n];
  for z in 0..chunk_size {
    for y in 0..chunk_size {
      for x in 0..chunk_size {
        data[coord_to_index(x, y, z, chunk_size)] = f(x, y, z);
      }
    }
  }
  data.into()
}

#[test]
fn all_air_chunk_yields_empty_mesh() {
  let data = filled(4, |_, _, _| Voxel::AIR);
  let request = MeshingRequest::isolated(IVec3::ZERO, 0, 4, 1.0, data);
  let mesher = SmoothMesher::default();
  let (mesh, stats, ok) = mesher.generate_mesh(&request);
  assert!(ok);
  assert_eq!(stats.vertex_count, 0);
  assert!(mesh.positions.is_empty());
}

#[test]
fn all_solid_chunk_yields_empty_mesh() {
  let data = filled(4, |_, _, _| Voxel::solid(1, 0));
  let request = MeshingRequest::isolated(IVec3::ZERO, 0, 4, 1.0, data);
  let mesher = SmoothMesher::default();
  let (mesh, stats, ok) = mesher.generate_mesh(&request);
  assert!(ok);
  assert_eq!(stats.vertex_count, 0);
  assert!(mesh.positions.is_empty());
}

#[test]
fn flat_half_solid_slab_produces_one_dual_vertex_per_crossing_cell() {
  // Below y=2 solid, at/above air: the sign-changing cells sit in a single
  // horizontal layer, one dual vertex each.
  let data = filled(4, |_, y, _| if y < 2 { Voxel::solid(3, 0) } else { Voxel::AIR });
  let request = MeshingRequest::isolated(IVec3::ZERO, 0, 4, 1.0, data);
  let mesher = SmoothMesher::default();
  let (mesh, stats, ok) = mesher.generate_mesh(&request);
  assert!(ok);
  assert!(stats.vertex_count > 0);
  assert!(!mesh.indices.is_empty());
}

#[test]
fn normals_point_away_from_solid() {
  let data = filled(4, |_, y, _| if y < 2 { Voxel::solid(3, 0) } else { Voxel::AIR });
  let request = MeshingRequest::isolated(IVec3::ZERO, 0, 4, 1.0, data);
  let mesher = SmoothMesher::default();
  let (mesh, _, _) = mesher.generate_mesh(&request);
  for normal in &mesh.normals {
    assert!(normal[1] > 0.0, "surface above a solid floor should face up, got {normal:?}");
  }
}

#[test]
fn secondary_uv_carries_the_solid_corner_material() {
  let data = filled(4, |_, y, _| if y < 2 { Voxel::solid(7, 2) } else { Voxel::AIR });
  let request = MeshingRequest::isolated(IVec3::ZERO, 0, 4, 1.0, data);
  let mesher = SmoothMesher::default();
  let (mesh, _, _) = mesher.generate_mesh(&request);
  assert!(!mesh.secondary_uv.is_empty());
  assert!(mesh.secondary_uv.iter().all(|uv| uv[0] == 7.0));
}

#[test]
fn malformed_request_yields_no_mesh() {
  let mut data = vec![Voxel::AIR; 8 * 8 * 8];
  data.truncate(4);
  let request = MeshingRequest::isolated(IVec3::ZERO, 0, 8, 1.0, data.into());
  let mesher = SmoothMesher::default();
  let (mesh, _, ok) = mesher.generate_mesh(&request);
  assert!(!ok);
  assert!(!mesh.is_valid());
}
