//! The Bevy `Plugin` entry point, grounded on the teacher's
//! `infra/bevy_adapters/plugin.rs`: register resources, events, and systems
//! in the same Startup/Update shape, now driving `voxel_plugin` instead of
//! the teacher's single-volume SDF pipeline.

use std::sync::Arc;

use bevy::prelude::*;

use voxel_plugin::config::MeshingMode;
use voxel_plugin::meshing::{CubicMesher, MesherKind, SmoothMesher};
use voxel_plugin::noise::TerrainNoiseSampler;
use voxel_plugin::{ChunkManager, CollisionManager, DistanceBandLodStrategy};

use crate::collision::{apply_collision_ops, AvianCollisionCooker, CollisionBodies, CollisionOpChannel};
use crate::config::VoxelWorldSettings;
use crate::editing::{apply_voxel_edit_events, handle_undo_redo_input, VoxelEditEvent};
use crate::materials::init_voxel_materials_system;
use crate::renderer::{BevyRendererHandoff, RendererOpChannel};
use crate::resources::{ChunkManagerRes, CollisionManagerRes};
use crate::systems::{apply_mesh_updates, tick_voxel_pipeline, ChunkEntities};

/// System sets giving the host control over ordering relative to its own
/// systems (e.g. running physics after `Physics`), mirroring the teacher's
/// `VoxelSet` enum.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum VoxelStreamingSet {
  Editing,
  Tick,
  ApplyMeshes,
  Physics,
}

pub struct VoxelTerrainPlugin;

impl Plugin for VoxelTerrainPlugin {
  fn build(&self, app: &mut App) {
    let settings = app.world().get_resource::<VoxelWorldSettings>().cloned().unwrap_or_default();
    let world_config = settings.into_world_config();

    let mut strategy = DistanceBandLodStrategy::new(world_config.lod_bands.clone(), world_config.chunk_size, world_config.voxel_size, world_config.world_mode);
    strategy.morph_enabled = world_config.enable_lod_morphing;
    strategy.frustum_cull_enabled = world_config.enable_frustum_culling;

    let mesher = match world_config.meshing_mode {
      MeshingMode::Cubic => MesherKind::Cubic(CubicMesher::default()),
      MeshingMode::Smooth => MesherKind::Smooth(SmoothMesher::default()),
    };

    let noise = Arc::new(TerrainNoiseSampler::new());

    let (renderer, renderer_rx) = BevyRendererHandoff::new();
    let (cooker, collision_rx) = AvianCollisionCooker::new();

    let collision_radius = settings.collision_radius;
    let mut chunk_manager = ChunkManager::new(world_config, strategy, noise, mesher);
    chunk_manager.set_renderer(Arc::new(renderer));
    let collision_manager = CollisionManager::new(cooker, collision_radius);

    app
      .insert_resource(ChunkManagerRes(chunk_manager))
      .insert_resource(CollisionManagerRes(collision_manager))
      .insert_resource(RendererOpChannel { rx: std::sync::Arc::new(std::sync::Mutex::new(renderer_rx)) })
      .insert_resource(CollisionOpChannel { rx: std::sync::Arc::new(std::sync::Mutex::new(collision_rx)) })
      .init_resource::<ChunkEntities>()
      .init_resource::<CollisionBodies>()
      .add_event::<VoxelEditEvent>()
      .configure_sets(Update, (VoxelStreamingSet::Editing, VoxelStreamingSet::Tick, VoxelStreamingSet::ApplyMeshes, VoxelStreamingSet::Physics).chain())
      .add_systems(Startup, init_voxel_materials_system)
      .add_systems(
        Update,
        (
          (apply_voxel_edit_events, handle_undo_redo_input).in_set(VoxelStreamingSet::Editing),
          tick_voxel_pipeline.in_set(VoxelStreamingSet::Tick),
          apply_mesh_updates.in_set(VoxelStreamingSet::ApplyMeshes),
          apply_collision_ops.in_set(VoxelStreamingSet::Physics),
        ),
      );
  }
}
