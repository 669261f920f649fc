//! Bevy systems wiring the engine core's tick into the ECS schedule.

mod apply_meshes;
mod tick;

pub use apply_meshes::{apply_mesh_updates, ChunkEntities};
pub use tick::{tick_voxel_pipeline, VoxelViewer};
