use super::*;

#[test]
fn falloff_curves_agree_at_endpoints() {
  for f in [BrushFalloff::Linear, BrushFalloff::Smooth, BrushFalloff::Sharp] {
    assert_eq!(f.evaluate(0.0), 1.0);
    assert_eq!(f.evaluate(1.0), 0.0);
  }
}

#[test]
fn smooth_falloff_matches_hermite_formula() {
  let t = 0.25;
  let expected = 1.0 - (3.0 * t * t - 2.0 * t * t * t);
  assert_eq!(BrushFalloff::Smooth.evaluate(t), expected);
}

#[test]
fn sharp_falloff_matches_squared_formula() {
  let t = 0.3;
  let expected = (1.0 - t) * (1.0 - t);
  assert!((BrushFalloff::Sharp.evaluate(t) - expected).abs() < 1e-12);
}

#[test]
fn falloff_clamps_outside_unit_range() {
  assert_eq!(BrushFalloff::Linear.evaluate(-1.0), 1.0);
  assert_eq!(BrushFalloff::Linear.evaluate(2.0), 0.0);
}

#[test]
fn brush_falloff_at_is_zero_outside_radius() {
  let brush = BrushParams {
    shape: BrushShape::Sphere,
    radius: 10.0,
    strength: 1.0,
    material_id: 1,
    density_delta: 100,
    falloff: BrushFalloff::Linear,
  };
  assert_eq!(brush.falloff_at(DVec3::new(11.0, 0.0, 0.0)), 0.0);
  assert!(brush.falloff_at(DVec3::ZERO) > 0.0);
}

#[test]
fn cube_brush_uses_chebyshev_distance() {
  let brush = BrushParams {
    shape: BrushShape::Cube,
    radius: 5.0,
    strength: 1.0,
    material_id: 0,
    density_delta: 0,
    falloff: BrushFalloff::Linear,
  };
  // Far along one axis only should still be inside a cube brush.
  assert!(brush.falloff_at(DVec3::new(4.9, 4.9, 4.9)) > 0.0);
  assert_eq!(brush.falloff_at(DVec3::new(5.1, 0.0, 0.0)), 0.0);
}

#[test]
fn voxel_edit_validity_checks_chunk_bounds() {
  let mut edit = VoxelEdit {
    local_position: IVec3::new(0, 0, 0),
    new_data: Voxel::AIR,
    original_data: Voxel::AIR,
    edit_mode: EditOp::Set,
    density_delta: 0,
    brush_material_id: 0,
    timestamp: 0.0,
  };
  assert!(edit.is_valid_position(32));
  edit.local_position = IVec3::new(32, 0, 0);
  assert!(!edit.is_valid_position(32));
  edit.local_position = IVec3::new(-1, 0, 0);
  assert!(!edit.is_valid_position(32));
}

#[test]
fn edit_layer_apply_get_remove_roundtrip() {
  let mut layer = EditLayer::new(IVec3::ZERO, 32);
  assert!(!layer.has_edits());
  let edit = VoxelEdit {
    local_position: IVec3::new(1, 2, 3),
    new_data: Voxel::solid(1, 0),
    original_data: Voxel::AIR,
    edit_mode: EditOp::Set,
    density_delta: 255,
    brush_material_id: 1,
    timestamp: 0.0,
  };
  layer.apply_edit(edit);
  assert!(layer.has_edits());
  assert_eq!(layer.get_edit(IVec3::new(1, 2, 3)).unwrap().new_data, edit.new_data);
  let removed = layer.remove_edit(IVec3::new(1, 2, 3));
  assert!(removed.is_some());
  assert!(!layer.has_edits(), "empty layer must never report edits");
}

#[test]
fn edit_op_wire_roundtrip() {
  for op in [EditOp::Set, EditOp::Add, EditOp::Subtract, EditOp::Paint, EditOp::Smooth] {
    assert_eq!(EditOp::from_wire(op.to_wire()), Some(op));
  }
  assert_eq!(EditOp::from_wire(200), None);
}

#[test]
fn operation_affected_chunks_is_deduplicated() {
  let mut op = EditOperation::new(1, "test", 0.0);
  let e = VoxelEdit {
    local_position: IVec3::ZERO,
    new_data: Voxel::AIR,
    original_data: Voxel::AIR,
    edit_mode: EditOp::Set,
    density_delta: 0,
    brush_material_id: 0,
    timestamp: 0.0,
  };
  op.edits.push((IVec3::new(0, 0, 0), e));
  op.edits.push((IVec3::new(0, 0, 0), e));
  op.edits.push((IVec3::new(1, 0, 0), e));
  assert_eq!(op.affected_chunks().len(), 2);
}
