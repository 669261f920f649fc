//! voxel_plugin - engine-agnostic streaming voxel terrain core.
//!
//! This crate owns the parts of a voxel terrain system that do not depend on
//! a particular renderer or physics engine: the packed voxel data model,
//! coordinate algebra, distance-banded level of detail, the sparse edit
//! overlay (with undo/redo and binary persistence), the chunk state machine
//! that drives generation/meshing/unload, and the meshing algorithms
//! themselves. Hosts (e.g. a Bevy integration) implement the
//! [`renderer::RendererHandoff`] and [`collision::CollisionCooker`] traits to
//! plug this core into an actual scene graph and physics world.

pub mod constants;
pub mod coords;
pub mod voxel;

pub mod edge_table;

pub mod config;
pub mod noise;

pub mod edit;
pub mod lod;
pub mod meshing;

pub mod chunk;
pub mod chunk_manager;
pub mod collision;
pub mod renderer;

pub mod metrics;
pub mod threading;

pub use config::{MeshingMode, WorldConfig, WorldMode};
pub use coords::FaceDir;
pub use voxel::Voxel;

pub use chunk::{ChunkDescriptor, ChunkId, ChunkState};
pub use chunk_manager::ChunkManager;
pub use collision::{CollisionCooker, CollisionManager};
pub use edit::{EditLayer, EditManager, EditOp};
pub use lod::{DistanceBandLodStrategy, LodBand};
pub use meshing::{ChunkMeshData, MesherKind, MeshingRequest};
pub use renderer::RendererHandoff;
pub use threading::{TaskExecutor, TaskId};
