//! Drives the chunk manager's and collision manager's per-frame `tick`/
//! `update` from the primary camera, per §4.6's tick sequence and §4.7's
//! tick contract. Grounded on the teacher's `scheduler::drain_queue_and_spawn_jobs`
//! being called once per `Update` from a fixed system set.

use bevy::prelude::*;

use voxel_plugin::lod::LodQueryContext;

use crate::resources::{ChunkManagerRes, CollisionManagerRes};

/// Marks the entity whose `Transform` the LOD strategy and collision
/// manager treat as the viewer. The host places this on its player/camera
/// entity; if more than one exists, the first found wins.
#[derive(Component, Default)]
pub struct VoxelViewer;

pub fn tick_voxel_pipeline(
  mut manager: ResMut<ChunkManagerRes>,
  mut collision: ResMut<CollisionManagerRes>,
  time: Res<Time>,
  viewer: Query<&GlobalTransform, With<VoxelViewer>>,
) {
  let Ok(viewer_transform) = viewer.single() else {
    return; // no viewer registered yet; nothing to stream around.
  };
  let position = viewer_transform.translation();
  let forward = viewer_transform.compute_transform().forward();

  let config = manager.0.config();
  let dt = time.delta_secs_f64();

  let ctx = LodQueryContext {
    viewer_position: glam::DVec3::new(position.x as f64, position.y as f64, position.z as f64),
    viewer_forward: glam::DVec3::new(forward.x as f64, forward.y as f64, forward.z as f64),
    fov_radians: std::f64::consts::FRAC_PI_2,
    view_distance: config.view_distance,
    world_mode: config.world_mode,
    max_chunks_to_load_per_frame: config.max_chunks_to_load_per_frame,
    max_chunks_to_unload_per_frame: config.max_chunks_to_unload_per_frame,
    time_slice_ms: config.streaming_time_slice_ms,
    frame_number: manager.0.frame_number(),
    game_time: time.elapsed_secs_f64(),
    delta_time: dt,
    // Conservative: without extracted frustum planes every chunk is
    // treated as visible (§4.4's "fewer than six planes, assume visible").
    // A host wanting frustum culling extracts `Plane`s from the active
    // `Camera`/`Projection` and fills this in before calling `tick`.
    frustum_planes: None,
  };

  manager.0.tick(&ctx, dt);

  if manager.0.config().generate_collision {
    let viewer_pos = ctx.viewer_position;
    collision.0.update(&manager.0, viewer_pos, dt);
  }
}
