//! `voxel_plugin::CollisionCooker` implemented against `avian3d`, §4.7.
//!
//! Cooking itself (`Collider::trimesh`) is cheap and side-effect-free, but
//! turning the result into a "one `body_setup` per chunk" physics object
//! means spawning a Bevy entity — and `cook`/`release` only get `&self`, not
//! `Commands`. So, same shape as [`crate::renderer::BevyRendererHandoff`]:
//! `cook` computes the collider and sends a spawn request across a channel;
//! a Bevy system does the actual `commands.spawn(...)` / despawn on the main
//! thread and owns the `ChunkId -> Entity` map. `Body = ChunkId` is the
//! opaque handle the generic [`voxel_plugin::CollisionManager`] round-trips
//! back into `release`.

use std::sync::{Arc, Mutex};

use avian3d::prelude::*;
use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use glam::DVec3;

use voxel_plugin::chunk::ChunkId;
use voxel_plugin::collision::{CollisionCooker, CookError};

pub enum CollisionOp {
  Spawn { chunk_coord: ChunkId, world_origin: DVec3, collider: Collider },
  Release { chunk_coord: ChunkId },
}

/// Sends [`CollisionOp`]s to the drain system. `Body` is just `ChunkId`
/// itself — the entity lives in a resource keyed by it, not in the handle
/// the engine core stores, since `cook`/`release` can't touch `Commands`.
pub struct AvianCollisionCooker {
  tx: Sender<CollisionOp>,
}

impl AvianCollisionCooker {
  pub fn new() -> (Self, Receiver<CollisionOp>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (Self { tx }, rx)
  }
}

impl CollisionCooker for AvianCollisionCooker {
  type Body = ChunkId;

  fn cook(&self, chunk_coord: ChunkId, world_origin: DVec3, vertices: &[[f32; 3]], indices: &[u32]) -> Result<Self::Body, CookError> {
    if vertices.is_empty() || indices.is_empty() {
      return Err(CookError::Degenerate);
    }
    let verts: Vec<Vec3> = vertices.iter().map(|p| Vec3::new(p[0], p[1], p[2])).collect();
    let tris: Vec<[u32; 3]> = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
    let collider = Collider::trimesh(verts, tris);
    self.tx.send(CollisionOp::Spawn { chunk_coord, world_origin, collider }).map_err(|_| CookError::Rejected)?;
    Ok(chunk_coord)
  }

  fn release(&self, chunk_coord: ChunkId, _body: Self::Body) {
    let _ = self.tx.send(CollisionOp::Release { chunk_coord });
  }
}

/// Bevy resource holding the receiving end.
#[derive(Resource)]
pub struct CollisionOpChannel {
  pub rx: Arc<Mutex<Receiver<CollisionOp>>>,
}

/// Per-chunk collision body entities, keyed so `Release` can find what to
/// despawn. The manual-resource-management note in §9 applies here: removal
/// from this map must precede (or trigger) despawning the entity.
#[derive(Resource, Default)]
pub struct CollisionBodies {
  pub entities: std::collections::HashMap<ChunkId, Entity>,
}

/// Drain pending cook results: spawn a static trimesh body per chunk at its
/// world-space origin, or despawn one on release.
pub fn apply_collision_ops(mut commands: Commands, channel: Res<CollisionOpChannel>, mut bodies: ResMut<CollisionBodies>) {
  let rx = channel.rx.lock().expect("collision op channel poisoned");
  while let Ok(op) = rx.try_recv() {
    match op {
      CollisionOp::Spawn { chunk_coord, world_origin, collider } => {
        if let Some(old) = bodies.entities.remove(&chunk_coord) {
          commands.entity(old).despawn();
        }
        let origin = Vec3::new(world_origin.x as f32, world_origin.y as f32, world_origin.z as f32);
        let entity = commands
          .spawn((RigidBody::Static, collider, Transform::from_translation(origin), Name::new(format!("chunk_collision_{chunk_coord:?}"))))
          .id();
        bodies.entities.insert(chunk_coord, entity);
      }
      CollisionOp::Release { chunk_coord } => {
        if let Some(entity) = bodies.entities.remove(&chunk_coord) {
          commands.entity(entity).despawn();
        }
      }
    }
  }
}
