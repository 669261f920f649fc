//! Bridges Bevy input/UI-level edit requests into the engine core's edit
//! overlay, grounded on the teacher's `plugin/editing.rs` (`VoxelEditEvent` +
//! `apply_edit_events` system), generalized from single-voxel CSG ops to
//! full brush strokes (§4.3(b)).

use bevy::prelude::*;

use voxel_plugin::edit::{BrushFalloff, BrushParams, BrushShape, EditOp, EditSource};

use crate::resources::ChunkManagerRes;

/// A request to apply one brush stroke at a world-space position. Hosts
/// (input bindings, editor widgets — both out of this spec's scope) fire
/// this event; `apply_voxel_edit_events` is the only thing that reads it.
#[derive(Event, Clone, Copy, Debug)]
pub struct VoxelEditEvent {
  pub world_position: Vec3,
  pub shape: BrushShape,
  pub radius: f32,
  pub strength: f32,
  pub material_id: u8,
  pub density_delta: u8,
  pub falloff: BrushFalloff,
  pub mode: EditOp,
}

impl VoxelEditEvent {
  pub fn dig(world_position: Vec3, radius: f32) -> Self {
    Self {
      world_position,
      shape: BrushShape::Sphere,
      radius,
      strength: 1.0,
      material_id: 0,
      density_delta: 255,
      falloff: BrushFalloff::Smooth,
      mode: EditOp::Subtract,
    }
  }

  pub fn paint(world_position: Vec3, radius: f32, material_id: u8) -> Self {
    Self {
      world_position,
      shape: BrushShape::Sphere,
      radius,
      strength: 1.0,
      material_id,
      density_delta: 0,
      falloff: BrushFalloff::Smooth,
      mode: EditOp::Paint,
    }
  }
}

/// Drains `VoxelEditEvent`s each frame and applies them as brush strokes
/// through the chunk manager, one `begin_operation`/`end_operation` pair per
/// event so each becomes its own undo step.
pub fn apply_voxel_edit_events(mut events: EventReader<VoxelEditEvent>, mut manager: ResMut<ChunkManagerRes>, time: Res<Time>) {
  let timestamp = time.elapsed_secs_f64();
  for ev in events.read() {
    let brush = BrushParams {
      shape: ev.shape,
      radius: ev.radius as f64,
      strength: ev.strength as f64,
      material_id: ev.material_id,
      density_delta: ev.density_delta,
      falloff: ev.falloff,
    };
    let center = glam::DVec3::new(ev.world_position.x as f64, ev.world_position.y as f64, ev.world_position.z as f64);
    manager.0.apply_brush_edit(center, brush, ev.mode, timestamp, EditSource::Player);
  }
}

/// Undo/redo input handling, grounded on the teacher's editing system
/// wiring keyboard input straight to a domain command.
pub fn handle_undo_redo_input(keys: Res<ButtonInput<KeyCode>>, mut manager: ResMut<ChunkManagerRes>) {
  let ctrl = keys.pressed(KeyCode::ControlLeft) || keys.pressed(KeyCode::ControlRight);
  if !ctrl {
    return;
  }
  if keys.just_pressed(KeyCode::KeyZ) {
    manager.0.undo();
  } else if keys.just_pressed(KeyCode::KeyY) {
    manager.0.redo();
  }
}
