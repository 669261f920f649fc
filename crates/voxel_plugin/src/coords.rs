//! Coordinate algebra: pure functions converting world ↔ chunk ↔
//! local-voxel ↔ global-voxel, neighbor offsets, and face directions.
//!
//! World-space positions use `f64`/`glam::DVec3` so planet-sized worlds keep
//! precision far from the origin; chunk and voxel coordinates stay `i32`.

use glam::{DVec3, IVec3};

/// Non-negative `a mod m`, for any sign of `a`.
#[inline]
fn rem_euclid_f64(a: f64, m: f64) -> f64 {
  let r = a % m;
  if r < 0.0 {
    r + m
  } else {
    r
  }
}

#[inline]
fn rem_euclid_i32(a: i32, m: i32) -> i32 {
  let r = a % m;
  if r < 0 { r + m } else { r }
}

/// `world_to_chunk(w) = floor(w / (N·S))`, elementwise.
#[inline]
pub fn world_to_chunk(world: DVec3, chunk_size: i32, voxel_size: f64) -> IVec3 {
  let chunk_world_size = chunk_size as f64 * voxel_size;
  IVec3::new(
    (world.x / chunk_world_size).floor() as i32,
    (world.y / chunk_world_size).floor() as i32,
    (world.z / chunk_world_size).floor() as i32,
  )
}

/// `world_to_local_voxel(w) = floor((w mod N·S) / S)`, clamped to
/// `[0, N-1]` to absorb floating-point roundoff at exact chunk boundaries.
#[inline]
pub fn world_to_local_voxel(world: DVec3, chunk_size: i32, voxel_size: f64) -> IVec3 {
  let chunk_world_size = chunk_size as f64 * voxel_size;
  let local = |w: f64| -> i32 {
    let m = rem_euclid_f64(w, chunk_world_size);
    ((m / voxel_size).floor() as i32).clamp(0, chunk_size - 1)
  };
  IVec3::new(local(world.x), local(world.y), local(world.z))
}

/// `chunk_to_world_min(c) = c · (N·S)`.
#[inline]
pub fn chunk_to_world_min(chunk_coord: IVec3, chunk_size: i32, voxel_size: f64) -> DVec3 {
  let chunk_world_size = chunk_size as f64 * voxel_size;
  DVec3::new(
    chunk_coord.x as f64 * chunk_world_size,
    chunk_coord.y as f64 * chunk_world_size,
    chunk_coord.z as f64 * chunk_world_size,
  )
}

/// `chunk_to_world_center(c) = c·(N·S) + (N·S/2)`.
#[inline]
pub fn chunk_to_world_center(chunk_coord: IVec3, chunk_size: i32, voxel_size: f64) -> DVec3 {
  let chunk_world_size = chunk_size as f64 * voxel_size;
  chunk_to_world_min(chunk_coord, chunk_size, voxel_size) + DVec3::splat(chunk_world_size * 0.5)
}

/// `local_voxel_to_world(c, l) = c·(N·S) + l·S + S/2` (voxel center).
#[inline]
pub fn local_voxel_to_world(
  chunk_coord: IVec3,
  local: IVec3,
  chunk_size: i32,
  voxel_size: f64,
) -> DVec3 {
  chunk_to_world_min(chunk_coord, chunk_size, voxel_size)
    + DVec3::new(local.x as f64, local.y as f64, local.z as f64) * voxel_size
    + DVec3::splat(voxel_size * 0.5)
}

/// `voxel_to_chunk(v) = floor(v / N)`.
#[inline]
pub fn voxel_to_chunk(global_voxel: IVec3, chunk_size: i32) -> IVec3 {
  IVec3::new(
    global_voxel.x.div_euclid(chunk_size),
    global_voxel.y.div_euclid(chunk_size),
    global_voxel.z.div_euclid(chunk_size),
  )
}

/// `voxel_to_local(v) = v mod N`, non-negative remainder.
#[inline]
pub fn voxel_to_local(global_voxel: IVec3, chunk_size: i32) -> IVec3 {
  IVec3::new(
    rem_euclid_i32(global_voxel.x, chunk_size),
    rem_euclid_i32(global_voxel.y, chunk_size),
    rem_euclid_i32(global_voxel.z, chunk_size),
  )
}

/// The six axis-aligned neighboring chunk coordinates.
pub fn adjacent_chunks(chunk_coord: IVec3) -> [IVec3; 6] {
  [
    chunk_coord + IVec3::new(1, 0, 0),
    chunk_coord + IVec3::new(-1, 0, 0),
    chunk_coord + IVec3::new(0, 1, 0),
    chunk_coord + IVec3::new(0, -1, 0),
    chunk_coord + IVec3::new(0, 0, 1),
    chunk_coord + IVec3::new(0, 0, -1),
  ]
}

/// All 26 neighboring chunk coordinates (face + edge + corner).
pub fn all_neighbor_chunks(chunk_coord: IVec3) -> Vec<IVec3> {
  let mut out = Vec::with_capacity(26);
  for dz in -1..=1 {
    for dy in -1..=1 {
      for dx in -1..=1 {
        if dx == 0 && dy == 0 && dz == 0 {
          continue;
        }
        out.push(chunk_coord + IVec3::new(dx, dy, dz));
      }
    }
  }
  out
}

/// Axis-aligned chunk face direction.
///
/// §4.1 writes the face/normal mapping for a Z-up world: `{Top,Bottom}` to
/// `(0,0,±1)`, `{North,South}` to `(0,±1,0)`. This crate targets Bevy
/// (Y-up, matching the teacher's coordinate frame throughout), so the
/// mapping is deliberately relabeled one axis over: `{Top,Bottom}` is
/// `(0,±1,0)` and `{North,South}` is `(0,0,±1)`. The face *names* and their
/// relationships (`opposite`, winding, `transition_faces` bit order) are
/// unchanged from §4.1 — only which world axis "up" binds to moves, and
/// every other component (vertical LOD range, the water mesher's slice
/// axis) is consistent with this same remap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceDir {
  Top,
  Bottom,
  North,
  South,
  East,
  West,
}

impl FaceDir {
  pub const ALL: [FaceDir; 6] = [
    FaceDir::Top,
    FaceDir::Bottom,
    FaceDir::North,
    FaceDir::South,
    FaceDir::East,
    FaceDir::West,
  ];

  /// Unit normal / chunk-offset for this face.
  /// Top/Bottom = ±Y, North/South = ±Z, East/West = ±X (Y-up; see the
  /// [`FaceDir`] doc comment for the deliberate remap from §4.1's Z-up
  /// normals).
  #[inline]
  pub const fn normal(&self) -> IVec3 {
    match self {
      FaceDir::Top => IVec3::new(0, 1, 0),
      FaceDir::Bottom => IVec3::new(0, -1, 0),
      FaceDir::North => IVec3::new(0, 0, 1),
      FaceDir::South => IVec3::new(0, 0, -1),
      FaceDir::East => IVec3::new(1, 0, 0),
      FaceDir::West => IVec3::new(-1, 0, 0),
    }
  }

  /// Involution: `opposite(opposite(f)) == f`.
  #[inline]
  pub const fn opposite(&self) -> FaceDir {
    match self {
      FaceDir::Top => FaceDir::Bottom,
      FaceDir::Bottom => FaceDir::Top,
      FaceDir::North => FaceDir::South,
      FaceDir::South => FaceDir::North,
      FaceDir::East => FaceDir::West,
      FaceDir::West => FaceDir::East,
    }
  }

  /// Bit position of this face within a 6-bit transition mask, matching
  /// the iteration order of [`FaceDir::ALL`].
  #[inline]
  pub const fn bit(&self) -> u8 {
    match self {
      FaceDir::Top => 0,
      FaceDir::Bottom => 1,
      FaceDir::North => 2,
      FaceDir::South => 3,
      FaceDir::East => 4,
      FaceDir::West => 5,
    }
  }
}

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;
