//! Renderer handoff interface, §4.8 (interface only — no concrete
//! implementation lives in this crate). `bevy_voxel_plugin` provides the
//! only implementation in this repo, built on Bevy `Mesh`/`Commands`,
//! analogous to the teacher's `infra/bevy_adapters` module.

use crate::chunk::ChunkId;
use crate::meshing::ChunkMeshData;

/// Capabilities the streaming pipeline core needs from a renderer. No
/// guarantee is made about synchronous completion — the renderer may defer
/// GPU upload; the pipeline treats the handoff as acknowledgment of receipt.
pub trait RendererHandoff: Send + Sync {
  /// Transfer ownership of a freshly meshed chunk's CPU-side data to the
  /// renderer for upload.
  fn update_chunk_mesh_from_cpu(&self, chunk_coord: ChunkId, lod_level: i32, mesh: ChunkMeshData);

  /// Remove a chunk's renderable representation entirely (unload).
  fn remove_chunk(&self, chunk_coord: ChunkId);

  /// Remove every chunk's renderable representation (shutdown).
  fn clear_all_chunks(&self);

  /// Apply a batch of morph-factor updates in one call, per §4.6 step 6's
  /// "batch entries whose change exceeds 0.01".
  fn update_lod_transitions_batch(&self, updates: &[(ChunkId, f32)]);

  /// Toggle a chunk's visibility without removing its renderable data.
  fn set_chunk_visible(&self, chunk_coord: ChunkId, visible: bool);
}

#[cfg(test)]
#[path = "renderer_test.rs"]
mod renderer_test;
