//! Layout constants and linear-index helpers for voxel chunks.
//!
//! Chunks are cubic and `chunk_size` is a runtime parameter (one of the
//! handful of values an LOD band configures), not a compile-time constant —
//! different LOD bands run different chunk sizes. Indexing is linear with X
//! as the fastest-varying axis: `idx = x + y*N + z*N*N`.

/// Minimum allowed chunk edge length, in voxels.
pub const MIN_CHUNK_SIZE: i32 = 8;

/// Maximum allowed chunk edge length, in voxels.
pub const MAX_CHUNK_SIZE: i32 = 128;

/// Default chunk edge length, in voxels.
pub const DEFAULT_CHUNK_SIZE: i32 = 32;

/// Surface threshold: density values strictly below this are air, at or
/// above are solid.
pub const SURFACE_THRESHOLD: u8 = 127;

/// Default undo-stack capacity before the oldest operation is dropped.
pub const DEFAULT_UNDO_CAPACITY: usize = 100;

/// Default pending-mesh backpressure cap (meshing phase throttle).
pub const DEFAULT_MAX_PENDING_MESHES: usize = 4;

/// Convert local 3D voxel coordinates to a linear index (X fastest).
#[inline(always)]
pub const fn coord_to_index(x: i32, y: i32, z: i32, chunk_size: i32) -> usize {
  (x + y * chunk_size + z * chunk_size * chunk_size) as usize
}

/// Convert a linear index back to local 3D voxel coordinates.
#[inline(always)]
pub const fn index_to_coord(idx: usize, chunk_size: i32) -> (i32, i32, i32) {
  let n = chunk_size as usize;
  let x = (idx % n) as i32;
  let y = ((idx / n) % n) as i32;
  let z = (idx / (n * n)) as i32;
  (x, y, z)
}

/// Relative offsets (in local-voxel units) of the eight corners of a unit
/// cell, in the same corner-index convention as [`crate::edge_table`]
/// (binary ZYX: bit0=X, bit1=Y, bit2=Z).
pub const CORNER_OFFSETS: [(i32, i32, i32); 8] = [
  (0, 0, 0),
  (1, 0, 0),
  (0, 1, 0),
  (1, 1, 0),
  (0, 0, 1),
  (1, 0, 1),
  (0, 1, 1),
  (1, 1, 1),
];

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
