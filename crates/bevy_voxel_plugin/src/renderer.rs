//! `voxel_plugin::RendererHandoff` implemented against Bevy, §4.8.
//!
//! The trait gives no synchronous-completion guarantee, so this adapter
//! does the obvious thing: push an op onto a channel from whatever thread
//! the chunk manager ticks on, and let a Bevy system drain it on the main
//! thread. Mirrors the teacher's `scheduler::RemeshResultChannel`
//! cross-thread handoff, generalized from one mesh per completion to the
//! five operations §4.8 specifies.

use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender};

use voxel_plugin::chunk::ChunkId;
use voxel_plugin::meshing::ChunkMeshData;
use voxel_plugin::renderer::RendererHandoff;

pub enum RendererOp {
  UpdateMesh { chunk_coord: ChunkId, lod_level: i32, mesh: ChunkMeshData },
  Remove { chunk_coord: ChunkId },
  ClearAll,
  MorphBatch { updates: Vec<(ChunkId, f32)> },
  SetVisible { chunk_coord: ChunkId, visible: bool },
}

/// Sends [`RendererOp`]s across to the Bevy-side drain system. Cheap to
/// clone (just the channel handles) and `Send + Sync`, as the trait requires.
pub struct BevyRendererHandoff {
  tx: Sender<RendererOp>,
}

impl BevyRendererHandoff {
  pub fn new() -> (Self, Receiver<RendererOp>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (Self { tx }, rx)
  }
}

impl RendererHandoff for BevyRendererHandoff {
  fn update_chunk_mesh_from_cpu(&self, chunk_coord: ChunkId, lod_level: i32, mesh: ChunkMeshData) {
    let _ = self.tx.send(RendererOp::UpdateMesh { chunk_coord, lod_level, mesh });
  }

  fn remove_chunk(&self, chunk_coord: ChunkId) {
    let _ = self.tx.send(RendererOp::Remove { chunk_coord });
  }

  fn clear_all_chunks(&self) {
    let _ = self.tx.send(RendererOp::ClearAll);
  }

  fn update_lod_transitions_batch(&self, updates: &[(ChunkId, f32)]) {
    let _ = self.tx.send(RendererOp::MorphBatch { updates: updates.to_vec() });
  }

  fn set_chunk_visible(&self, chunk_coord: ChunkId, visible: bool) {
    let _ = self.tx.send(RendererOp::SetVisible { chunk_coord, visible });
  }
}

/// Bevy resource holding the receiving end, wrapped in a `Mutex` purely so
/// the resource itself stays `Sync` — the drain system is the only reader.
use bevy::prelude::Resource;

#[derive(Resource)]
pub struct RendererOpChannel {
  pub rx: Arc<Mutex<Receiver<RendererOp>>>,
}
