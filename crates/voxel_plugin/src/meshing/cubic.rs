//! Greedy-merged cubic (blocky) mesher: emits one quad per exposed face,
//! merging contiguous same-material runs along one scan axis when
//! `use_greedy_merging` is enabled.

use glam::{DVec3, IVec3};

use crate::constants::coord_to_index;
use crate::coords::FaceDir;
use crate::voxel::Voxel;

use super::{ChunkMeshData, FaceType, MesherConfig, MesherOps, MeshingRequest, MeshStats};

#[derive(Clone, Copy, Debug, Default)]
pub struct CubicMesher {
  config: MesherConfig,
}

impl CubicMesher {
  pub fn new(config: MesherConfig) -> Self {
    Self { config }
  }
}

#[inline]
fn local_voxel(request: &MeshingRequest, local: IVec3) -> Voxel {
  request.voxel_data[coord_to_index(local.x, local.y, local.z, request.chunk_size)]
}

#[inline]
fn in_bounds(local: IVec3, n: i32) -> bool {
  local.x >= 0 && local.x < n && local.y >= 0 && local.y < n && local.z >= 0 && local.z < n
}

/// The in-plane `(u, v)` coordinates a face's N×N neighbor slice uses.
fn face_plane_uv(face: FaceDir, local: IVec3) -> (i32, i32) {
  match face {
    FaceDir::Top | FaceDir::Bottom => (local.x, local.z),
    FaceDir::North | FaceDir::South => (local.x, local.y),
    FaceDir::East | FaceDir::West => (local.y, local.z),
  }
}

/// The voxel just outside `local` across `face`, consulting the request's
/// neighbor slice when `local`'s offset falls outside the chunk. Returns
/// `None` when that neighbor data isn't available (world boundary or
/// not-yet-loaded neighbor — the two are indistinguishable here by design;
/// see §4.6.3).
fn neighbor_across(request: &MeshingRequest, local: IVec3, face: FaceDir) -> Option<Voxel> {
  let n = request.chunk_size;
  let offset = local + face.normal();
  if in_bounds(offset, n) {
    return Some(local_voxel(request, offset));
  }
  let bit = face.bit() as usize;
  if !request.face_present[bit] {
    return None;
  }
  let (u, v) = face_plane_uv(face, local);
  Some(request.face_slices[bit][(u + v * n) as usize])
}

/// Count solid same-chunk neighbors adjacent (in-plane) to `local`, used as
/// a cheap per-face ambient-occlusion proxy. Cross-chunk cells are treated
/// as unoccluded, since full corner/edge AO needs the other chunk's data.
fn face_ao_level(request: &MeshingRequest, local: IVec3, face: FaceDir) -> u8 {
  let n = request.chunk_size;
  let (tangent, bitangent) = match face {
    FaceDir::Top | FaceDir::Bottom => (IVec3::new(1, 0, 0), IVec3::new(0, 0, 1)),
    FaceDir::North | FaceDir::South => (IVec3::new(1, 0, 0), IVec3::new(0, 1, 0)),
    FaceDir::East | FaceDir::West => (IVec3::new(0, 1, 0), IVec3::new(0, 0, 1)),
  };
  let mut occluders = 0u8;
  for offset in [tangent, -tangent, bitangent, -bitangent] {
    let p = local + offset;
    if in_bounds(p, n) && local_voxel(request, p).is_solid() {
      occluders += 1;
    }
  }
  3u8.saturating_sub(occluders.min(3))
}

struct Quad {
  corners: [[f32; 3]; 4],
  normal: [f32; 3],
  material_id: u8,
  biome_id: u8,
  ao: u8,
  face_type: FaceType,
}

fn make_quad(face: FaceDir, depth_plane: i32, u0: i32, u1_inclusive: i32, v: i32, voxel_size: f64) -> ([[f32; 3]; 4], [f32; 3]) {
  let d = depth_plane as f64 * voxel_size;
  let ua = u0 as f64 * voxel_size;
  let ub = (u1_inclusive + 1) as f64 * voxel_size;
  let va = v as f64 * voxel_size;
  let vb = (v + 1) as f64 * voxel_size;

  let mut corners = match face {
    FaceDir::Top | FaceDir::Bottom => [
      DVec3::new(ua, d, va),
      DVec3::new(ub, d, va),
      DVec3::new(ub, d, vb),
      DVec3::new(ua, d, vb),
    ],
    FaceDir::North | FaceDir::South => [
      DVec3::new(ua, va, d),
      DVec3::new(ub, va, d),
      DVec3::new(ub, vb, d),
      DVec3::new(ua, vb, d),
    ],
    FaceDir::East | FaceDir::West => [
      DVec3::new(d, ua, va),
      DVec3::new(d, ub, va),
      DVec3::new(d, ub, vb),
      DVec3::new(d, ua, vb),
    ],
  };

  let normal = face.normal().as_dvec3();
  let computed = (corners[1] - corners[0]).cross(corners[2] - corners[0]);
  if computed.dot(normal) < 0.0 {
    corners.reverse();
  }

  (corners.map(|c| [c.x as f32, c.y as f32, c.z as f32]), [normal.x as f32, normal.y as f32, normal.z as f32])
}

impl MesherOps for CubicMesher {
  fn generate_mesh(&self, request: &MeshingRequest) -> (ChunkMeshData, MeshStats, bool) {
    if !request.is_well_formed() {
      return (ChunkMeshData::default(), MeshStats::default(), false);
    }
    let n = request.chunk_size;
    let mut quads = Vec::new();

    for face in FaceDir::ALL {
      let face_type = match face {
        FaceDir::Top => FaceType::Top,
        FaceDir::Bottom => FaceType::Bottom,
        _ => FaceType::Side,
      };
      let positive_normal = matches!(face, FaceDir::Top | FaceDir::North | FaceDir::East);

      // depth iterates the axis the face's normal runs along; u/v are the
      // remaining two axes, ordered per `face_plane_uv`.
      for depth in 0..n {
        // Row-exposure scan: for each `v`, walk `u` left to right and
        // merge contiguous exposed runs sharing the same material/AO.
        for v in 0..n {
          let mut u = 0;
          while u < n {
            let local = local_for(face, depth, u, v);
            let voxel = local_voxel(request, local);
            let exposed = voxel.is_solid()
              && neighbor_across(request, local, face).map(|nv| nv.is_air()).unwrap_or(true);
            if !exposed {
              u += 1;
              continue;
            }
            let ao = if self.config.calculate_ao { face_ao_level(request, local, face) } else { 3 };
            let material_id = voxel.material_id;

            let mut u_end = u;
            if self.config.use_greedy_merging {
              while u_end + 1 < n {
                let next_local = local_for(face, depth, u_end + 1, v);
                let next_voxel = local_voxel(request, next_local);
                let next_exposed = next_voxel.is_solid()
                  && neighbor_across(request, next_local, face).map(|nv| nv.is_air()).unwrap_or(true);
                if !next_exposed || next_voxel.material_id != material_id {
                  break;
                }
                let next_ao = if self.config.calculate_ao { face_ao_level(request, next_local, face) } else { 3 };
                if next_ao != ao {
                  break;
                }
                u_end += 1;
              }
            }

            let depth_plane = if positive_normal { depth + 1 } else { depth };
            let (corners, normal) = make_quad(face, depth_plane, u, u_end, v, request.voxel_size);
            quads.push(Quad {
              corners,
              normal,
              material_id,
              biome_id: voxel.biome_id,
              ao,
              face_type,
            });

            u = u_end + 1;
          }
        }
      }
    }

    let mut mesh = ChunkMeshData::default();
    for quad in &quads {
      let base = mesh.positions.len() as u32;
      for corner in quad.corners {
        mesh.positions.push(corner);
        mesh.normals.push(quad.normal);
        if self.config.generate_uvs {
          let uv = [corner[0] * self.config.uv_scale, corner[2] * self.config.uv_scale];
          mesh.uv0.push(uv);
        } else {
          mesh.uv0.push([0.0, 0.0]);
        }
        mesh.secondary_uv.push([quad.material_id as f32, quad.face_type as u8 as f32]);
        mesh.colors.push([0, quad.biome_id, quad.ao << 6, 255]);
      }
      mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
      if mesh.indices.len() >= self.config.max_index_count || mesh.positions.len() >= self.config.max_vertex_count {
        break;
      }
    }

    let stats = MeshStats {
      vertex_count: mesh.positions.len(),
      triangle_count: mesh.triangle_count(),
    };
    (mesh, stats, true)
  }

  fn set_config(&mut self, config: MesherConfig) {
    self.config = config;
  }

  fn get_config(&self) -> MesherConfig {
    self.config
  }
}

fn local_for(face: FaceDir, depth: i32, u: i32, v: i32) -> IVec3 {
  match face {
    FaceDir::Top | FaceDir::Bottom => IVec3::new(u, depth, v),
    FaceDir::North | FaceDir::South => IVec3::new(u, v, depth),
    FaceDir::East | FaceDir::West => IVec3::new(depth, u, v),
  }
}

#[cfg(test)]
#[path = "cubic_test.rs"]
mod cubic_test;
