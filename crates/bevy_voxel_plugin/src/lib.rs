//! Bevy host integration for `voxel_plugin`: the only concrete implementation
//! in this repo of the renderer handoff (§4.8) and collision cooker (§4.7)
//! interfaces the engine core specifies but deliberately does not own.
//!
//! This crate owns nothing the spec calls engine-core logic — no chunk
//! state machine, no meshing, no edit accumulation. It wires `voxel_plugin`'s
//! [`voxel_plugin::ChunkManager`] and [`voxel_plugin::CollisionManager`] into
//! Bevy's ECS: a tick system drives the pipeline from the primary camera,
//! and two adapters (`BevyRendererHandoff`, `AvianCollisionCooker`) hand
//! completed work back to Bevy `Mesh` assets and `avian3d` colliders.

pub mod collision;
pub mod config;
pub mod editing;
pub mod materials;
pub mod mesh_bridge;
pub mod plugin;
pub mod renderer;
pub mod resources;
pub mod systems;

pub use collision::AvianCollisionCooker;
pub use config::VoxelWorldSettings;
pub use editing::VoxelEditEvent;
pub use plugin::VoxelTerrainPlugin;
pub use renderer::BevyRendererHandoff;
pub use resources::{ChunkManagerRes, CollisionManagerRes};
