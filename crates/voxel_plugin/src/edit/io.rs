//! Bit-exact binary persistence for the edit overlay.
//!
//! The wire format is hand-specified down to the field, not a serde-derived
//! shape, so we write it by hand with `to_ne_bytes`/`from_ne_bytes` rather
//! than reaching for `bincode`. Endianness is fixed host-order within a
//! platform, per the documented format.

use std::io::{Read, Write};
use std::path::Path;

use glam::IVec3;
use thiserror::Error;

use super::overlay::EditManager;
use super::types::{EditOp, VoxelEdit};
use crate::chunk::ChunkId;
use crate::voxel::Voxel;

pub const MAGIC: u32 = 0x5645_5449; // "VETI"
pub const CURRENT_VERSION: u32 = 2;

/// Internal I/O failure taxonomy. Never crosses the public API boundary as
/// a `Result` — callers see `bool`/counts; this is logged at the point of
/// failure and discarded, per the "no exception-style control flow" policy.
#[derive(Debug, Error)]
pub enum EditIoError {
  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),
  #[error("bad magic number")]
  BadMagic,
  #[error("unsupported version {0}")]
  UnsupportedVersion(u32),
  #[error("stream truncated")]
  Truncated,
}

fn read_exact<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<(), EditIoError> {
  r.read_exact(buf).map_err(|e| {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
      EditIoError::Truncated
    } else {
      EditIoError::Io(e)
    }
  })
}

fn read_u32<R: Read>(r: &mut R) -> Result<u32, EditIoError> {
  let mut buf = [0u8; 4];
  read_exact(r, &mut buf)?;
  Ok(u32::from_ne_bytes(buf))
}

fn read_i32<R: Read>(r: &mut R) -> Result<i32, EditIoError> {
  let mut buf = [0u8; 4];
  read_exact(r, &mut buf)?;
  Ok(i32::from_ne_bytes(buf))
}

fn read_u8<R: Read>(r: &mut R) -> Result<u8, EditIoError> {
  let mut buf = [0u8; 1];
  read_exact(r, &mut buf)?;
  Ok(buf[0])
}

fn read_ivec3<R: Read>(r: &mut R) -> Result<IVec3, EditIoError> {
  Ok(IVec3::new(read_i32(r)?, read_i32(r)?, read_i32(r)?))
}

fn read_voxel_bytes<R: Read>(r: &mut R) -> Result<Voxel, EditIoError> {
  let mut buf = [0u8; 4];
  read_exact(r, &mut buf)?;
  Ok(Voxel::from_bytes(buf))
}

/// Serialize every edit layer in `mgr` to the bit-exact wire format.
pub fn save_edits_to_bytes(mgr: &EditManager) -> Vec<u8> {
  let mut out = Vec::new();
  out.extend_from_slice(&MAGIC.to_ne_bytes());
  out.extend_from_slice(&CURRENT_VERSION.to_ne_bytes());

  let layers: Vec<_> = mgr.layers().filter(|l| l.has_edits()).collect();
  out.extend_from_slice(&(layers.len() as i32).to_ne_bytes());

  for layer in layers {
    out.extend_from_slice(&layer.chunk_coord.x.to_ne_bytes());
    out.extend_from_slice(&layer.chunk_coord.y.to_ne_bytes());
    out.extend_from_slice(&layer.chunk_coord.z.to_ne_bytes());
    out.extend_from_slice(&(layer.len() as i32).to_ne_bytes());
    for edit in layer.iter() {
      out.extend_from_slice(&edit.local_position.x.to_ne_bytes());
      out.extend_from_slice(&edit.local_position.y.to_ne_bytes());
      out.extend_from_slice(&edit.local_position.z.to_ne_bytes());
      out.push(edit.edit_mode.to_wire());
      out.extend_from_slice(&edit.density_delta.to_ne_bytes());
      out.push(edit.brush_material_id);
      out.extend_from_slice(&edit.new_data.to_bytes());
      out.extend_from_slice(&edit.original_data.to_bytes());
    }
  }
  out
}

/// Parse the wire format into `(chunk_coord, chunk_size, edits)` triples,
/// without touching any `EditManager` state. `chunk_size` is supplied by
/// the caller (the format itself carries no chunk-size field) and
/// `timestamp` stamps every loaded record with the load time, per spec.
fn parse_edits(
  bytes: &[u8],
  chunk_size: i32,
  timestamp: f64,
) -> Result<Vec<(ChunkId, i32, Vec<VoxelEdit>)>, EditIoError> {
  let mut cursor = bytes;

  let magic = read_u32(&mut cursor)?;
  if magic != MAGIC {
    return Err(EditIoError::BadMagic);
  }
  let version = read_u32(&mut cursor)?;
  if version != 1 && version != CURRENT_VERSION {
    return Err(EditIoError::UnsupportedVersion(version));
  }

  let chunk_count = read_i32(&mut cursor)?;
  if chunk_count < 0 {
    return Err(EditIoError::Truncated);
  }

  let mut chunks = Vec::with_capacity(chunk_count as usize);
  for _ in 0..chunk_count {
    let chunk_coord = read_ivec3(&mut cursor)?;
    let edit_count = read_i32(&mut cursor)?;
    if edit_count < 0 {
      return Err(EditIoError::Truncated);
    }
    let mut edits = Vec::with_capacity(edit_count as usize);
    for _ in 0..edit_count {
      let local_position = read_ivec3(&mut cursor)?;
      let (edit_mode, density_delta, brush_material_id) = if version == 1 {
        (EditOp::Set, 0, 0)
      } else {
        let mode = read_u8(&mut cursor)?;
        let mode = EditOp::from_wire(mode).ok_or(EditIoError::Truncated)?;
        let delta = read_i32(&mut cursor)?;
        let material = read_u8(&mut cursor)?;
        (mode, delta, material)
      };
      let new_data = read_voxel_bytes(&mut cursor)?;
      let original_data = read_voxel_bytes(&mut cursor)?;
      let brush_material_id = if version == 1 { new_data.material_id } else { brush_material_id };

      edits.push(VoxelEdit {
        local_position,
        new_data,
        original_data,
        edit_mode,
        density_delta,
        brush_material_id,
        timestamp,
      });
    }
    chunks.push((chunk_coord, chunk_size, edits));
  }

  Ok(chunks)
}

/// Load edit layers from `bytes` into `mgr`, replacing its current layer
/// set wholesale on success. On failure, `mgr` is left unchanged.
pub fn load_edits_from_bytes(mgr: &mut EditManager, chunk_size: i32, bytes: &[u8], timestamp: f64) -> Result<usize, EditIoError> {
  let chunks = parse_edits(bytes, chunk_size, timestamp)?;
  let count = chunks.len();
  mgr.load_from_records(chunks);
  Ok(count)
}

/// Public, fallible-free entry point: write `mgr`'s edits to `path`.
/// Returns `false` (after logging the cause) on any I/O failure.
pub fn save_edits_to_file(mgr: &EditManager, path: impl AsRef<Path>) -> bool {
  let bytes = save_edits_to_bytes(mgr);
  match std::fs::File::create(path.as_ref()).and_then(|mut f| f.write_all(&bytes)) {
    Ok(()) => true,
    Err(e) => {
      #[cfg(feature = "tracing")]
      tracing::warn!(error = %e, path = %path.as_ref().display(), "failed to save edit overlay");
      let _ = e;
      false
    }
  }
}

/// Public, fallible-free entry point: load edits from `path` into `mgr`.
/// Returns `false` (after logging the cause) on any I/O or format failure,
/// leaving `mgr` unchanged.
pub fn load_edits_from_file(mgr: &mut EditManager, chunk_size: i32, path: impl AsRef<Path>, timestamp: f64) -> bool {
  let read = std::fs::File::open(path.as_ref()).and_then(|mut f| {
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(buf)
  });
  let bytes = match read {
    Ok(bytes) => bytes,
    Err(e) => {
      #[cfg(feature = "tracing")]
      tracing::warn!(error = %e, path = %path.as_ref().display(), "failed to read edit overlay file");
      let _ = e;
      return false;
    }
  };
  match load_edits_from_bytes(mgr, chunk_size, &bytes, timestamp) {
    Ok(_) => true,
    Err(e) => {
      #[cfg(feature = "tracing")]
      tracing::warn!(error = %e, path = %path.as_ref().display(), "failed to load edit overlay");
      let _ = e;
      false
    }
  }
}

#[cfg(test)]
#[path = "io_test.rs"]
mod io_test;
