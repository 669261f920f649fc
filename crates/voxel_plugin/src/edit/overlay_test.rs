use super::*;
use crate::edit::types::{BrushFalloff, BrushShape};

const CHUNK_SIZE: i32 = 8;
const VOXEL_SIZE: f64 = 100.0;

fn all_solid(_chunk: ChunkId, _local: IVec3) -> Voxel {
  Voxel::solid(1, 0)
}

#[test]
fn begin_end_operation_commits_to_undo_stack() {
  let mut mgr = EditManager::new(CHUNK_SIZE);
  mgr.begin_operation("dig", 0.0);
  mgr.apply_single_voxel_edit(
    IVec3::ZERO,
    IVec3::new(1, 1, 1),
    CHUNK_SIZE,
    EditOp::Set,
    200,
    1,
    0.0,
    EditSource::Player,
    Voxel::AIR,
  );
  assert!(mgr.end_operation());
  assert_eq!(mgr.undo_len(), 1);
  assert_eq!(mgr.redo_len(), 0);
}

#[test]
fn end_operation_with_no_edits_is_discarded_silently() {
  let mut mgr = EditManager::new(CHUNK_SIZE);
  mgr.begin_operation("noop", 0.0);
  assert!(!mgr.end_operation());
  assert_eq!(mgr.undo_len(), 0);
}

#[test]
fn nested_begin_ends_the_previous_operation() {
  let mut mgr = EditManager::new(CHUNK_SIZE);
  mgr.begin_operation("first", 0.0);
  mgr.apply_single_voxel_edit(
    IVec3::ZERO,
    IVec3::new(0, 0, 0),
    CHUNK_SIZE,
    EditOp::Set,
    200,
    1,
    0.0,
    EditSource::Player,
    Voxel::AIR,
  );
  mgr.begin_operation("second", 1.0);
  assert_eq!(mgr.undo_len(), 1, "first operation must be committed by the nested begin");
}

#[test]
fn cancel_operation_reverts_every_touched_voxel() {
  let mut mgr = EditManager::new(CHUNK_SIZE);
  mgr.begin_operation("dig", 0.0);
  mgr.apply_single_voxel_edit(
    IVec3::ZERO,
    IVec3::new(2, 2, 2),
    CHUNK_SIZE,
    EditOp::Set,
    255,
    1,
    0.0,
    EditSource::Player,
    Voxel::AIR,
  );
  assert!(mgr.has_edits(IVec3::ZERO));
  assert!(mgr.cancel_operation());
  assert!(!mgr.has_edits(IVec3::ZERO));
  assert_eq!(mgr.undo_len(), 0);
}

#[test]
fn out_of_chunk_local_position_fails_and_cancels_auto_started_operation() {
  let mut mgr = EditManager::new(CHUNK_SIZE);
  let ok = mgr.apply_single_voxel_edit(
    IVec3::ZERO,
    IVec3::new(99, 0, 0),
    CHUNK_SIZE,
    EditOp::Set,
    255,
    1,
    0.0,
    EditSource::Player,
    Voxel::AIR,
  );
  assert!(!ok);
  assert_eq!(mgr.undo_len(), 0);
}

// Scenario 2: brush dig at origin.
#[test]
fn brush_dig_at_origin_subtracts_density_and_undo_restores() {
  let mut mgr = EditManager::new(CHUNK_SIZE);
  mgr.begin_operation("Dig", 0.0);
  let brush = BrushParams {
    shape: BrushShape::Sphere,
    radius: 150.0,
    strength: 1.0,
    material_id: 0,
    density_delta: 100,
    falloff: BrushFalloff::Smooth,
  };
  let applied = mgr.apply_brush_edit(
    DVec3::ZERO,
    brush,
    EditOp::Subtract,
    CHUNK_SIZE,
    VOXEL_SIZE,
    0.0,
    EditSource::Player,
    all_solid,
  );
  assert!(applied > 0);
  mgr.end_operation();

  let origin_chunk = coords::world_to_chunk(DVec3::ZERO, CHUNK_SIZE, VOXEL_SIZE);
  let origin_local = coords::world_to_local_voxel(DVec3::ZERO, CHUNK_SIZE, VOXEL_SIZE);
  let layer = mgr.get_layer(origin_chunk).expect("origin chunk must have edits");
  let edit = layer.get_edit(origin_local).expect("origin voxel must be edited");
  assert_eq!(edit.edit_mode, EditOp::Subtract);
  assert!(edit.density_delta > 0);
  assert_eq!(mgr.total_edit_count(), applied);

  assert!(mgr.undo());
  let layer = mgr.get_layer(origin_chunk).unwrap();
  // All-solid original had density 255 >= threshold, so the reverted entry
  // (original_data) is itself solid and the record survives undo as the
  // swapped-back value; either way the stored new_data must equal the
  // pre-edit density.
  if let Some(reverted) = layer.get_edit(origin_local) {
    assert_eq!(reverted.new_data.density, 255);
  }

  assert!(mgr.redo());
  let layer = mgr.get_layer(origin_chunk).unwrap();
  let edit = layer.get_edit(origin_local).expect("redo must restore the dig");
  assert_eq!(edit.edit_mode, EditOp::Subtract);
}

// Scenario 3: accumulation to zero with material change.
#[test]
fn accumulation_annihilation_becomes_paint() {
  let mut mgr = EditManager::new(CHUNK_SIZE);
  mgr.begin_operation("paint-annihilate", 0.0);
  let chunk = IVec3::ZERO;
  let local = IVec3::new(1, 1, 1);

  mgr.apply_single_voxel_edit(chunk, local, CHUNK_SIZE, EditOp::Add, 50, 3, 0.0, EditSource::Player, Voxel::AIR);
  mgr.apply_single_voxel_edit(chunk, local, CHUNK_SIZE, EditOp::Subtract, 50, 0, 0.0, EditSource::Player, Voxel::AIR);

  let layer = mgr.get_layer(chunk).unwrap();
  let edit = layer.get_edit(local).expect("annihilated edit must remain as a Paint record");
  assert_eq!(edit.edit_mode, EditOp::Paint);
  assert_eq!(edit.brush_material_id, 3);
  assert_eq!(edit.density_delta, 0);
}

#[test]
fn accumulation_without_material_removes_the_record() {
  let mut mgr = EditManager::new(CHUNK_SIZE);
  mgr.begin_operation("cancel-out", 0.0);
  let chunk = IVec3::ZERO;
  let local = IVec3::new(1, 1, 1);

  mgr.apply_single_voxel_edit(chunk, local, CHUNK_SIZE, EditOp::Add, 50, 0, 0.0, EditSource::Player, Voxel::AIR);
  mgr.apply_single_voxel_edit(chunk, local, CHUNK_SIZE, EditOp::Subtract, 50, 0, 0.0, EditSource::Player, Voxel::AIR);

  let layer = mgr.get_layer(chunk).unwrap();
  assert!(layer.get_edit(local).is_none());
}

#[test]
fn accumulation_residual_delta_equals_sum_of_signed_deltas() {
  let mut mgr = EditManager::new(CHUNK_SIZE);
  mgr.begin_operation("residual", 0.0);
  let chunk = IVec3::ZERO;
  let local = IVec3::new(1, 1, 1);

  mgr.apply_single_voxel_edit(chunk, local, CHUNK_SIZE, EditOp::Add, 80, 2, 0.0, EditSource::Player, Voxel::AIR);
  mgr.apply_single_voxel_edit(chunk, local, CHUNK_SIZE, EditOp::Subtract, 30, 0, 0.0, EditSource::Player, Voxel::AIR);

  let layer = mgr.get_layer(chunk).unwrap();
  let edit = layer.get_edit(local).unwrap();
  assert_eq!(edit.edit_mode, EditOp::Add);
  assert_eq!(edit.density_delta, 50);
}

#[test]
fn undo_clears_are_rejected_when_stack_empty() {
  let mut mgr = EditManager::new(CHUNK_SIZE);
  assert!(!mgr.undo());
  assert!(!mgr.redo());
}

#[test]
fn new_edit_clears_redo_stack() {
  let mut mgr = EditManager::new(CHUNK_SIZE);
  mgr.begin_operation("a", 0.0);
  mgr.apply_single_voxel_edit(
    IVec3::ZERO,
    IVec3::new(0, 0, 0),
    CHUNK_SIZE,
    EditOp::Set,
    200,
    1,
    0.0,
    EditSource::Player,
    Voxel::AIR,
  );
  mgr.end_operation();
  mgr.undo();
  assert_eq!(mgr.redo_len(), 1);

  mgr.begin_operation("b", 1.0);
  mgr.apply_single_voxel_edit(
    IVec3::ZERO,
    IVec3::new(1, 0, 0),
    CHUNK_SIZE,
    EditOp::Set,
    200,
    1,
    1.0,
    EditSource::Player,
    Voxel::AIR,
  );
  mgr.end_operation();
  assert_eq!(mgr.redo_len(), 0);
}

#[test]
fn undo_capacity_drops_oldest_operation() {
  let mut mgr = EditManager::new(CHUNK_SIZE).with_undo_capacity(2);
  for i in 0..5 {
    mgr.begin_operation(format!("op{i}"), i as f64);
    mgr.apply_single_voxel_edit(
      IVec3::ZERO,
      IVec3::new(i, 0, 0),
      CHUNK_SIZE,
      EditOp::Set,
      200,
      1,
      i as f64,
      EditSource::Player,
      Voxel::AIR,
    );
    mgr.end_operation();
  }
  assert_eq!(mgr.undo_len(), 2);
}

#[test]
fn clear_history_does_not_touch_live_edits() {
  let mut mgr = EditManager::new(CHUNK_SIZE);
  mgr.begin_operation("a", 0.0);
  mgr.apply_single_voxel_edit(
    IVec3::ZERO,
    IVec3::new(0, 0, 0),
    CHUNK_SIZE,
    EditOp::Set,
    200,
    1,
    0.0,
    EditSource::Player,
    Voxel::AIR,
  );
  mgr.end_operation();
  mgr.clear_history();
  assert_eq!(mgr.undo_len(), 0);
  assert!(mgr.has_edits(IVec3::ZERO));
}
