//! Meshing interface: the request envelope meshers consume and the mesh
//! payload they produce, plus the sum-type dispatch over mesher variants.
//!
//! The mesher is a closed set of implementations that live inside this
//! crate, so it is dispatched as a tagged `enum` (`MesherKind`) rather than
//! through a trait object — matching Design Note §9's recommendation for
//! capability sets whose implementations are all known up front.

pub mod cubic;
pub mod smooth;
pub mod water;

pub use cubic::CubicMesher;
pub use smooth::SmoothMesher;
pub use water::WaterMesher;

use crate::chunk::ChunkId;
use crate::coords::FaceDir;
use crate::voxel::Voxel;

/// Per-face transition bit order, matching [`crate::coords::FaceDir::ALL`]:
/// Top, Bottom, North, South, East, West.
pub const FACE_COUNT: usize = 6;
pub const EDGE_COUNT: usize = 12;
pub const CORNER_COUNT: usize = 8;

/// The twelve chunk-diagonal neighbor directions an edge strip is extracted
/// from (§4.6.3's "+X+Y edge uses the neighbor at (+1,+1,0)" family),
/// ordered to match the fill order [`crate::chunk_manager`] uses.
pub const EDGE_DIRS: [(FaceDir, FaceDir); EDGE_COUNT] = [
  (FaceDir::Top, FaceDir::North),
  (FaceDir::Top, FaceDir::South),
  (FaceDir::Top, FaceDir::East),
  (FaceDir::Top, FaceDir::West),
  (FaceDir::Bottom, FaceDir::North),
  (FaceDir::Bottom, FaceDir::South),
  (FaceDir::Bottom, FaceDir::East),
  (FaceDir::Bottom, FaceDir::West),
  (FaceDir::North, FaceDir::East),
  (FaceDir::North, FaceDir::West),
  (FaceDir::South, FaceDir::East),
  (FaceDir::South, FaceDir::West),
];

/// Index into [`EDGE_DIRS`]/`edge_strips` for the (order-independent) pair
/// of face directions, if such an edge exists (opposing faces don't form
/// an edge, e.g. Top+Bottom).
pub fn edge_index_for(a: FaceDir, b: FaceDir) -> Option<usize> {
  EDGE_DIRS.iter().position(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

/// The contract between the streaming core and a pluggable mesher: interior
/// voxel data plus every piece of neighbor context needed to keep chunk
/// boundaries watertight.
#[derive(Clone, Debug)]
pub struct MeshingRequest {
  pub chunk_coord: ChunkId,
  pub lod_level: i32,
  pub chunk_size: i32,
  pub voxel_size: f64,
  pub world_origin: glam::DVec3,
  pub voxel_data: std::sync::Arc<[Voxel]>,

  /// Six face-neighbor slices of length `chunk_size²`, in [`crate::coords::FaceDir::ALL`] order.
  pub face_slices: [Vec<Voxel>; FACE_COUNT],
  /// Which face slices are actually populated (neighbor loaded + allocated).
  pub face_present: [bool; FACE_COUNT],

  /// Twelve edge strips of length `chunk_size`.
  pub edge_strips: [Vec<Voxel>; EDGE_COUNT],
  pub edge_present: [bool; EDGE_COUNT],

  /// Eight corner voxels.
  pub corner_voxels: [Voxel; CORNER_COUNT],
  pub corner_present: [bool; CORNER_COUNT],

  /// Bit `i` set ⇔ the face in position `i` of [`crate::coords::FaceDir::ALL`]
  /// borders a strictly coarser neighbor.
  pub transition_faces: u8,
  /// Neighbor LOD per face, -1 meaning "no neighbor".
  pub neighbor_lod: [i32; FACE_COUNT],
}

impl MeshingRequest {
  /// Build a request for a chunk with no loaded neighbors (every boundary
  /// treated as world edge) — convenient for tests and single-chunk scenes.
  pub fn isolated(chunk_coord: ChunkId, lod_level: i32, chunk_size: i32, voxel_size: f64, voxel_data: std::sync::Arc<[Voxel]>) -> Self {
    Self {
      chunk_coord,
      lod_level,
      chunk_size,
      voxel_size,
      world_origin: glam::DVec3::ZERO,
      voxel_data,
      face_slices: Default::default(),
      face_present: [false; FACE_COUNT],
      edge_strips: Default::default(),
      edge_present: [false; EDGE_COUNT],
      corner_voxels: [Voxel::AIR; CORNER_COUNT],
      corner_present: [false; CORNER_COUNT],
      transition_faces: 0,
      neighbor_lod: [-1; FACE_COUNT],
    }
  }

  /// `true` iff every structural invariant from §4.5 holds.
  pub fn is_well_formed(&self) -> bool {
    if self.voxel_data.len() != (self.chunk_size as usize).pow(3) {
      return false;
    }
    for i in 0..FACE_COUNT {
      if self.face_present[i] && self.face_slices[i].len() != (self.chunk_size as usize).pow(2) {
        return false;
      }
    }
    for i in 0..EDGE_COUNT {
      if self.edge_present[i] && self.edge_strips[i].len() != self.chunk_size as usize {
        return false;
      }
    }
    for i in 0..FACE_COUNT {
      if self.transition_faces & (1 << i) != 0 && self.neighbor_lod[i] <= self.lod_level {
        return false;
      }
    }
    true
  }
}

/// A completed mesh: arrays of positions/normals/UVs/colors plus triangle
/// indices. `secondary_uv` carries `(material_id, face_type)` as floats;
/// `color` carries `(reserved, biome_id, AO<<6, 255)`.
#[derive(Clone, Debug, Default)]
pub struct ChunkMeshData {
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub uv0: Vec<[f32; 2]>,
  pub secondary_uv: Vec<[f32; 2]>,
  pub colors: Vec<[u8; 4]>,
  pub indices: Vec<u32>,
}

impl ChunkMeshData {
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  pub fn is_valid(&self) -> bool {
    !self.positions.is_empty() && !self.indices.is_empty()
  }
}

/// Mesh generation statistics returned alongside the mesh payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeshStats {
  pub vertex_count: usize,
  pub triangle_count: usize,
}

/// Mesher tunables, shared across variants though only some fields apply to
/// each one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MesherConfig {
  pub max_vertex_count: usize,
  pub max_index_count: usize,
  pub generate_uvs: bool,
  pub calculate_ao: bool,
  pub uv_scale: f32,
  /// Cubic only.
  pub use_greedy_merging: bool,
  /// Switches the active variant in the chunk manager's configuration, not
  /// consulted by the mesher itself.
  pub use_smooth_meshing: bool,
  /// Smooth only; default 0.5 corresponds to density 127.
  pub iso_level: f32,
  /// Smooth only.
  pub use_transvoxel_transition_cells: bool,
  /// Smooth only, fallback for LOD seams when Transvoxel cells are disabled.
  pub generate_skirts: bool,
  pub skirt_depth: i32,
}

impl Default for MesherConfig {
  fn default() -> Self {
    Self {
      max_vertex_count: 65536,
      max_index_count: 196608,
      generate_uvs: true,
      calculate_ao: true,
      uv_scale: 1.0,
      use_greedy_merging: true,
      use_smooth_meshing: false,
      iso_level: 0.5,
      use_transvoxel_transition_cells: false,
      generate_skirts: true,
      skirt_depth: 1,
    }
  }
}

/// Water sentinel material id (§4.5).
pub const WATER_MATERIAL_ID: f32 = 254.0;

/// Face-type codes carried in `secondary_uv.y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaceType {
  Top = 0,
  Bottom = 1,
  Side = 2,
}

/// The capability set every mesher variant implements.
pub trait MesherOps {
  fn initialize(&mut self) {}
  fn shutdown(&mut self) {}
  fn generate_mesh(&self, request: &MeshingRequest) -> (ChunkMeshData, MeshStats, bool);
  fn set_config(&mut self, config: MesherConfig);
  fn get_config(&self) -> MesherConfig;
}

/// Sum type over the mesher implementations that live inside this crate.
pub enum MesherKind {
  Cubic(CubicMesher),
  Smooth(SmoothMesher),
  Water(WaterMesher),
}

impl MesherKind {
  pub fn generate_mesh(&self, request: &MeshingRequest) -> (ChunkMeshData, MeshStats, bool) {
    match self {
      MesherKind::Cubic(m) => m.generate_mesh(request),
      MesherKind::Smooth(m) => m.generate_mesh(request),
      MesherKind::Water(m) => m.generate_mesh(request),
    }
  }

  pub fn set_config(&mut self, config: MesherConfig) {
    match self {
      MesherKind::Cubic(m) => m.set_config(config),
      MesherKind::Smooth(m) => m.set_config(config),
      MesherKind::Water(m) => m.set_config(config),
    }
  }

  pub fn get_config(&self) -> MesherConfig {
    match self {
      MesherKind::Cubic(m) => m.get_config(),
      MesherKind::Smooth(m) => m.get_config(),
      MesherKind::Water(m) => m.get_config(),
    }
  }
}
