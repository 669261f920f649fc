use super::*;
use crate::edit::overlay::EditManager;
use crate::edit::types::{EditOp, EditSource};

const CHUNK_SIZE: i32 = 8;

fn sample_manager() -> EditManager {
  let mut mgr = EditManager::new(CHUNK_SIZE);
  mgr.begin_operation("sample", 0.0);
  mgr.apply_single_voxel_edit(
    IVec3::new(0, 0, 0),
    IVec3::new(1, 2, 3),
    CHUNK_SIZE,
    EditOp::Add,
    50,
    3,
    1.0,
    EditSource::Player,
    Voxel::AIR,
  );
  mgr.apply_single_voxel_edit(
    IVec3::new(2, 0, -1),
    IVec3::new(0, 0, 0),
    CHUNK_SIZE,
    EditOp::Set,
    200,
    7,
    1.0,
    EditSource::Player,
    Voxel::AIR,
  );
  mgr.end_operation();
  mgr
}

#[test]
fn save_then_load_roundtrips_edit_counts_and_fields() {
  let mgr = sample_manager();
  let bytes = save_edits_to_bytes(&mgr);

  let mut loaded = EditManager::new(CHUNK_SIZE);
  let chunk_count = load_edits_from_bytes(&mut loaded, CHUNK_SIZE, &bytes, 99.0).expect("load must succeed");
  assert_eq!(chunk_count, 2);
  assert_eq!(loaded.total_edit_count(), mgr.total_edit_count());

  for layer in mgr.layers() {
    let loaded_layer = loaded.get_layer(layer.chunk_coord).expect("chunk must round-trip");
    assert_eq!(loaded_layer.len(), layer.len());
    for edit in layer.iter() {
      let got = loaded_layer.get_edit(edit.local_position).expect("voxel must round-trip");
      assert_eq!(got.edit_mode, edit.edit_mode);
      assert_eq!(got.density_delta, edit.density_delta);
      assert_eq!(got.brush_material_id, edit.brush_material_id);
      assert_eq!(got.new_data, edit.new_data);
      assert_eq!(got.original_data, edit.original_data);
    }
  }
}

#[test]
fn bad_magic_is_rejected() {
  let mut bytes = save_edits_to_bytes(&sample_manager());
  bytes[0] = 0;
  let mut loaded = EditManager::new(CHUNK_SIZE);
  let err = load_edits_from_bytes(&mut loaded, CHUNK_SIZE, &bytes, 0.0).unwrap_err();
  assert!(matches!(err, EditIoError::BadMagic));
}

#[test]
fn unsupported_version_is_rejected() {
  let mut bytes = save_edits_to_bytes(&sample_manager());
  bytes[4..8].copy_from_slice(&99u32.to_ne_bytes());
  let mut loaded = EditManager::new(CHUNK_SIZE);
  let err = load_edits_from_bytes(&mut loaded, CHUNK_SIZE, &bytes, 0.0).unwrap_err();
  assert!(matches!(err, EditIoError::UnsupportedVersion(99)));
}

#[test]
fn truncated_stream_is_rejected() {
  let bytes = save_edits_to_bytes(&sample_manager());
  let truncated = &bytes[..bytes.len() - 3];
  let mut loaded = EditManager::new(CHUNK_SIZE);
  let err = load_edits_from_bytes(&mut loaded, CHUNK_SIZE, truncated, 0.0).unwrap_err();
  assert!(matches!(err, EditIoError::Truncated));
}

#[test]
fn version_1_synthesizes_v2_fields() {
  // Hand-build a v1 stream: magic, version=1, one chunk, one edit with no
  // mode/delta/material fields.
  let mut bytes = Vec::new();
  bytes.extend_from_slice(&MAGIC.to_ne_bytes());
  bytes.extend_from_slice(&1u32.to_ne_bytes());
  bytes.extend_from_slice(&1i32.to_ne_bytes()); // chunk_count
  bytes.extend_from_slice(&0i32.to_ne_bytes());
  bytes.extend_from_slice(&0i32.to_ne_bytes());
  bytes.extend_from_slice(&0i32.to_ne_bytes());
  bytes.extend_from_slice(&1i32.to_ne_bytes()); // edit_count
  bytes.extend_from_slice(&1i32.to_ne_bytes());
  bytes.extend_from_slice(&2i32.to_ne_bytes());
  bytes.extend_from_slice(&3i32.to_ne_bytes());
  let new_data = Voxel::solid(9, 1);
  bytes.extend_from_slice(&new_data.to_bytes());
  bytes.extend_from_slice(&Voxel::AIR.to_bytes());

  let mut loaded = EditManager::new(CHUNK_SIZE);
  load_edits_from_bytes(&mut loaded, CHUNK_SIZE, &bytes, 5.0).expect("v1 stream must load");
  let layer = loaded.get_layer(IVec3::ZERO).unwrap();
  let edit = layer.get_edit(IVec3::new(1, 2, 3)).unwrap();
  assert_eq!(edit.edit_mode, EditOp::Set);
  assert_eq!(edit.density_delta, 0);
  assert_eq!(edit.brush_material_id, new_data.material_id);
}

#[test]
fn failed_load_leaves_manager_unchanged() {
  let mut mgr = sample_manager();
  let before = mgr.total_edit_count();
  let bad = vec![0u8; 4];
  let _ = load_edits_from_bytes(&mut mgr, CHUNK_SIZE, &bad, 0.0);
  assert_eq!(mgr.total_edit_count(), before);
}
