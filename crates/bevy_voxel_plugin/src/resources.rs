//! Thin `Resource` wrappers around the engine-core types so they can live in
//! the Bevy `World`. No logic lives here — see `voxel_plugin::chunk_manager`
//! and `voxel_plugin::collision` for the actual pipeline/cooking behavior.

use bevy::prelude::Resource;

use voxel_plugin::{ChunkManager, CollisionManager};

use crate::collision::AvianCollisionCooker;

#[derive(Resource)]
pub struct ChunkManagerRes(pub ChunkManager);

#[derive(Resource)]
pub struct CollisionManagerRes(pub CollisionManager<AvianCollisionCooker>);
