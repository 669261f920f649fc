//! Smooth (Surface Nets) mesher: one dual vertex per sign-changing cell,
//! positioned at the average of its crossing edges, connected into quads
//! along every interior grid edge that changes sign.
//!
//! Surface Nets rather than classic Marching Cubes because
//! [`crate::edge_table`]'s precomputed table is an edge-crossing mask, not
//! a triangulation table — the natural fit is one vertex per active cell.

use std::collections::HashMap;

use glam::{DVec3, IVec3, Vec3};

use crate::constants::{coord_to_index, CORNER_OFFSETS};
use crate::coords::FaceDir;
use crate::edge_table::{corner_position, EDGE_CORNERS, EDGE_TABLE};
use crate::voxel::Voxel;

use super::{edge_index_for, ChunkMeshData, FaceType, MesherConfig, MesherOps, MeshingRequest, MeshStats};

#[derive(Clone, Copy, Debug, Default)]
pub struct SmoothMesher {
  config: MesherConfig,
}

impl SmoothMesher {
  pub fn new(config: MesherConfig) -> Self {
    Self { config }
  }
}

#[inline]
fn in_bounds(p: IVec3, n: i32) -> bool {
  p.x >= 0 && p.x < n && p.y >= 0 && p.y < n && p.z >= 0 && p.z < n
}

/// Density sample at an arbitrary grid point `p` in `[0, n]³`, resolving
/// overflow past the chunk's own data through the face/edge/corner
/// neighbor context. An unresolved (neighbor not loaded) sample reads as
/// air, matching the rest of this crate's "unresolvable ⇒ boundary"
/// convention.
fn density_at(request: &MeshingRequest, p: IVec3) -> Voxel {
  let n = request.chunk_size;
  if in_bounds(p, n) {
    return request.voxel_data[coord_to_index(p.x, p.y, p.z, n)];
  }

  let over_x = if p.x == n { Some(FaceDir::East) } else { None };
  let over_y = if p.y == n { Some(FaceDir::Top) } else { None };
  let over_z = if p.z == n { Some(FaceDir::North) } else { None };
  let overflow: Vec<FaceDir> = [over_x, over_y, over_z].into_iter().flatten().collect();

  match overflow.len() {
    1 => {
      let face = overflow[0];
      let bit = face.bit() as usize;
      if !request.face_present[bit] {
        return Voxel::AIR;
      }
      let (u, v) = match face {
        FaceDir::Top | FaceDir::Bottom => (p.x, p.z),
        FaceDir::North | FaceDir::South => (p.x, p.y),
        FaceDir::East | FaceDir::West => (p.y, p.z),
      };
      request.face_slices[bit][(u + v * n) as usize]
    }
    2 => {
      let (a, b) = (overflow[0], overflow[1]);
      let Some(idx) = edge_index_for(a, b) else {
        return Voxel::AIR;
      };
      if !request.edge_present[idx] {
        return Voxel::AIR;
      }
      // The varying axis is whichever of x/y/z did not overflow.
      let varying = if over_x.is_none() {
        p.x
      } else if over_y.is_none() {
        p.y
      } else {
        p.z
      };
      request.edge_strips[idx][varying as usize]
    }
    3 => {
      if !request.corner_present[7] {
        return Voxel::AIR;
      }
      request.corner_voxels[7]
    }
    _ => Voxel::AIR,
  }
}

#[inline]
fn is_solid_at(density: u8, threshold: f32) -> bool {
  density as f32 >= threshold
}

struct CellVertex {
  position: Vec3,
  material_id: u8,
  biome_id: u8,
}

fn build_cell_vertex(request: &MeshingRequest, cell: IVec3, threshold: f32) -> Option<CellVertex> {
  let mut corners = [Voxel::AIR; 8];
  for (k, &(dx, dy, dz)) in CORNER_OFFSETS.iter().enumerate() {
    corners[k] = density_at(request, cell + IVec3::new(dx, dy, dz));
  }
  let mut mask: u8 = 0;
  for (k, c) in corners.iter().enumerate() {
    if is_solid_at(c.density, threshold) {
      mask |= 1 << k;
    }
  }
  if mask == 0 || mask == 0xFF {
    return None;
  }

  let edge_mask = EDGE_TABLE[mask as usize];
  let mut sum = Vec3::ZERO;
  let mut count = 0u32;
  let mut material_id = 0u8;
  let mut biome_id = 0u8;
  let mut picked_material = false;

  for edge in 0..12 {
    if edge_mask & (1 << edge) == 0 {
      continue;
    }
    let [c0, c1] = EDGE_CORNERS[edge];
    let d0 = corners[c0 as usize].density as f32;
    let d1 = corners[c1 as usize].density as f32;
    let t = if (d1 - d0).abs() > f32::EPSILON { ((threshold - d0) / (d1 - d0)).clamp(0.0, 1.0) } else { 0.5 };
    let p0 = Vec3::from(corner_position(c0));
    let p1 = Vec3::from(corner_position(c1));
    sum += p0 + (p1 - p0) * t;
    count += 1;

    if !picked_material {
      let solid_corner = if is_solid_at(d0, threshold) { c0 } else { c1 };
      material_id = corners[solid_corner as usize].material_id;
      biome_id = corners[solid_corner as usize].biome_id;
      picked_material = true;
    }
  }

  let local = sum / count.max(1) as f32;
  let position = (cell.as_vec3() + local) * request.voxel_size as f32;
  Some(CellVertex { position, material_id, biome_id })
}

/// Push a quad (as two triangles) across the four cell vertices surrounding
/// a sign-changing grid edge, in the caller's winding order; reversed if
/// it doesn't match `desired_normal`.
fn push_quad(
  positions: &mut Vec<[f32; 3]>,
  normal_accum: &mut Vec<Vec3>,
  indices: &mut Vec<u32>,
  loop4: [u32; 4],
  desired_normal: Vec3,
) {
  let p = loop4.map(|i| Vec3::from(positions[i as usize]));
  let computed = (p[1] - p[0]).cross(p[2] - p[0]);
  let order = if computed.dot(desired_normal) >= 0.0 { loop4 } else { [loop4[0], loop4[3], loop4[2], loop4[1]] };
  indices.extend_from_slice(&[order[0], order[1], order[2], order[0], order[2], order[3]]);
  let face_normal = if computed.dot(desired_normal) >= 0.0 { computed } else { -computed };
  let face_normal = if face_normal.length_squared() > f32::EPSILON { face_normal.normalize() } else { desired_normal };
  for i in order {
    normal_accum[i as usize] += face_normal;
  }
}

impl MesherOps for SmoothMesher {
  fn generate_mesh(&self, request: &MeshingRequest) -> (ChunkMeshData, MeshStats, bool) {
    if !request.is_well_formed() {
      return (ChunkMeshData::default(), MeshStats::default(), false);
    }
    let n = request.chunk_size;
    let threshold = (self.config.iso_level.clamp(0.0, 1.0)) * 255.0;

    let mut positions = Vec::new();
    let mut materials = Vec::new();
    let mut vertex_of = HashMap::new();

    for z in 0..n {
      for y in 0..n {
        for x in 0..n {
          let cell = IVec3::new(x, y, z);
          if let Some(v) = build_cell_vertex(request, cell, threshold) {
            let idx = positions.len() as u32;
            positions.push([v.position.x, v.position.y, v.position.z]);
            materials.push((v.material_id, v.biome_id));
            vertex_of.insert(cell, idx);
          }
        }
      }
    }

    let mut normal_accum = vec![Vec3::ZERO; positions.len()];
    let mut indices = Vec::new();

    // X-axis edges: perpendicular plane is (y, z).
    for k in 1..n {
      for j in 1..n {
        for i in 0..n {
          let d0 = density_at(request, IVec3::new(i, j, k));
          let d1 = density_at(request, IVec3::new(i + 1, j, k));
          let s0 = is_solid_at(d0.density, threshold);
          let s1 = is_solid_at(d1.density, threshold);
          if s0 == s1 {
            continue;
          }
          let cells = [IVec3::new(i, j - 1, k - 1), IVec3::new(i, j, k - 1), IVec3::new(i, j, k), IVec3::new(i, j - 1, k)];
          if let Some(loop4) = cells.iter().map(|c| vertex_of.get(c).copied()).collect::<Option<Vec<_>>>() {
            let desired = Vec3::X * if s0 { 1.0 } else { -1.0 };
            push_quad(&mut positions, &mut normal_accum, &mut indices, [loop4[0], loop4[1], loop4[2], loop4[3]], desired);
          }
        }
      }
    }

    // Y-axis edges: perpendicular plane is (x, z).
    for k in 1..n {
      for i in 1..n {
        for j in 0..n {
          let d0 = density_at(request, IVec3::new(i, j, k));
          let d1 = density_at(request, IVec3::new(i, j + 1, k));
          let s0 = is_solid_at(d0.density, threshold);
          let s1 = is_solid_at(d1.density, threshold);
          if s0 == s1 {
            continue;
          }
          let cells = [IVec3::new(i - 1, j, k - 1), IVec3::new(i, j, k - 1), IVec3::new(i, j, k), IVec3::new(i - 1, j, k)];
          if let Some(loop4) = cells.iter().map(|c| vertex_of.get(c).copied()).collect::<Option<Vec<_>>>() {
            let desired = Vec3::Y * if s0 { 1.0 } else { -1.0 };
            push_quad(&mut positions, &mut normal_accum, &mut indices, [loop4[0], loop4[1], loop4[2], loop4[3]], desired);
          }
        }
      }
    }

    // Z-axis edges: perpendicular plane is (x, y).
    for j in 1..n {
      for i in 1..n {
        for k in 0..n {
          let d0 = density_at(request, IVec3::new(i, j, k));
          let d1 = density_at(request, IVec3::new(i, j, k + 1));
          let s0 = is_solid_at(d0.density, threshold);
          let s1 = is_solid_at(d1.density, threshold);
          if s0 == s1 {
            continue;
          }
          let cells = [IVec3::new(i - 1, j - 1, k), IVec3::new(i, j - 1, k), IVec3::new(i, j, k), IVec3::new(i - 1, j, k)];
          if let Some(loop4) = cells.iter().map(|c| vertex_of.get(c).copied()).collect::<Option<Vec<_>>>() {
            let desired = Vec3::Z * if s0 { 1.0 } else { -1.0 };
            push_quad(&mut positions, &mut normal_accum, &mut indices, [loop4[0], loop4[1], loop4[2], loop4[3]], desired);
          }
        }
      }
    }

    if self.config.generate_skirts && !self.config.use_transvoxel_transition_cells {
      emit_skirts(request, &vertex_of, &mut positions, &mut normal_accum, &mut indices, self.config.skirt_depth);
    }

    let mut mesh = ChunkMeshData::default();
    mesh.normals = normal_accum
      .iter()
      .map(|n| if n.length_squared() > f32::EPSILON { n.normalize() } else { Vec3::Y })
      .map(|n| [n.x, n.y, n.z])
      .collect();
    mesh.positions = positions;
    mesh.indices = indices;
    for (i, &(material_id, biome_id)) in materials.iter().enumerate() {
      let normal = Vec3::from(mesh.normals[i]);
      let face_type = if normal.y > 0.5 {
        FaceType::Top
      } else if normal.y < -0.5 {
        FaceType::Bottom
      } else {
        FaceType::Side
      };
      let pos = mesh.positions[i];
      if self.config.generate_uvs {
        mesh.uv0.push([pos[0] * self.config.uv_scale, pos[2] * self.config.uv_scale]);
      } else {
        mesh.uv0.push([0.0, 0.0]);
      }
      mesh.secondary_uv.push([material_id as f32, face_type as u8 as f32]);
      mesh.colors.push([0, biome_id, 3 << 6, 255]);
    }
    // Skirt vertices appended after the main pass have no material entry;
    // pad with the mesh's own last surface material so arrays stay aligned.
    let fallback = materials.last().copied().unwrap_or((0, 0));
    while mesh.uv0.len() < mesh.positions.len() {
      let pos = mesh.positions[mesh.uv0.len()];
      if self.config.generate_uvs {
        mesh.uv0.push([pos[0] * self.config.uv_scale, pos[2] * self.config.uv_scale]);
      } else {
        mesh.uv0.push([0.0, 0.0]);
      }
      mesh.secondary_uv.push([fallback.0 as f32, FaceType::Side as u8 as f32]);
      mesh.colors.push([0, fallback.1, 3 << 6, 255]);
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

/// Drop a thin vertical wall from every boundary vertex on a flagged
/// transition face down by `skirt_depth` voxels, masking the seam left by
/// a coarser neighbor when full Transvoxel transition cells aren't built.
fn emit_skirts(
  request: &MeshingRequest,
  vertex_of: &HashMap<IVec3, u32>,
  positions: &mut Vec<[f32; 3]>,
  normal_accum: &mut Vec<Vec3>,
  indices: &mut Vec<u32>,
  skirt_depth: i32,
) {
  let n = request.chunk_size;
  let drop = DVec3::new(0.0, -(skirt_depth as f64) * request.voxel_size, 0.0);

  for face in FaceDir::ALL {
    if request.transition_faces & (1 << face.bit()) == 0 {
      continue;
    }
    let on_face = |cell: &IVec3| -> bool {
      match face {
        FaceDir::West => cell.x == 0,
        FaceDir::East => cell.x == n - 1,
        FaceDir::Bottom => cell.y == 0,
        FaceDir::Top => cell.y == n - 1,
        FaceDir::South => cell.z == 0,
        FaceDir::North => cell.z == n - 1,
      }
    };
    let mut boundary: Vec<(IVec3, u32)> = vertex_of.iter().filter(|(c, _)| on_face(c)).map(|(c, i)| (*c, *i)).collect();
    boundary.sort_by_key(|(c, _)| (c.x, c.y, c.z));

    for &(cell, idx) in &boundary {
      for neighbor_offset in [IVec3::new(1, 0, 0), IVec3::new(0, 0, 1)] {
        let Some(&other_idx) = vertex_of.get(&(cell + neighbor_offset)) else {
          continue;
        };
        if !on_face(&(cell + neighbor_offset)) {
          continue;
        }
        let a = Vec3::from(positions[idx as usize]);
        let b = Vec3::from(positions[other_idx as usize]);
        let a_drop = a + Vec3::new(drop.x as f32, drop.y as f32, drop.z as f32);
        let b_drop = b + Vec3::new(drop.x as f32, drop.y as f32, drop.z as f32);

        let base = positions.len() as u32;
        positions.push([a_drop.x, a_drop.y, a_drop.z]);
        positions.push([b_drop.x, b_drop.y, b_drop.z]);
        normal_accum.push(Vec3::ZERO);
        normal_accum.push(Vec3::ZERO);

        let loop4 = [idx, other_idx, base + 1, base];
        push_quad(positions, normal_accum, indices, loop4, (b - a).cross(Vec3::new(0.0, -1.0, 0.0)).normalize_or_zero());
      }
    }
  }
}

#[cfg(test)]
#[path = "smooth_test.rs"]
mod smooth_test;
