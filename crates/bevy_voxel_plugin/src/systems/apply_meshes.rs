//! Drains [`crate::renderer::RendererOp`]s and materializes them as Bevy
//! entities, grounded on the teacher's `plugin/apply_mesh.rs`
//! (`apply_remeshes`) — same "one entity per chunk, swap its `Mesh3d`
//! handle" shape, generalized to the full renderer-handoff surface (remove,
//! clear-all, morph batch, visibility) §4.8 specifies.

use bevy::prelude::*;
use std::collections::HashMap;

use voxel_plugin::chunk::ChunkId;

use crate::materials::VoxelMaterialResource;
use crate::mesh_bridge::into_bevy_mesh;
use crate::renderer::{RendererOp, RendererOpChannel};
use crate::resources::ChunkManagerRes;

/// `ChunkId -> Entity` for every chunk this host has ever received a mesh
/// for. Entries are removed on `Remove`/`ClearAll`.
#[derive(Resource, Default)]
pub struct ChunkEntities {
  pub entities: HashMap<ChunkId, Entity>,
}

/// Tag component on a chunk's mesh entity, carrying the morph factor a
/// shader or transition system might sample.
#[derive(Component, Default)]
pub struct ChunkMeshTag {
  pub chunk_coord: ChunkId,
  pub lod_level: i32,
  pub morph_factor: f32,
}

pub fn apply_mesh_updates(
  mut commands: Commands,
  channel: Res<RendererOpChannel>,
  chunk_manager: Res<ChunkManagerRes>,
  mut chunk_entities: ResMut<ChunkEntities>,
  mut meshes: ResMut<Assets<Mesh>>,
  material: Option<Res<VoxelMaterialResource>>,
  mut tags: Query<&mut ChunkMeshTag>,
) {
  let rx = channel.rx.lock().expect("renderer op channel poisoned");
  while let Ok(op) = rx.try_recv() {
    match op {
      RendererOp::UpdateMesh { chunk_coord, lod_level, mesh } => {
        let Some(bevy_mesh) = into_bevy_mesh(mesh) else {
          continue; // empty/invalid payload: nothing to upload.
        };
        let handle = meshes.add(bevy_mesh);
        if let Some(&entity) = chunk_entities.entities.get(&chunk_coord) {
          commands.entity(entity).insert(Mesh3d(handle));
          if let Ok(mut tag) = tags.get_mut(entity) {
            tag.lod_level = lod_level;
          }
        } else {
          // Mesh positions are chunk-local (§4.5); the entity's own
          // transform places the chunk in the world, same split as the
          // collision cooker's `desc.world_min`.
          let origin = chunk_manager.0.get_descriptor(chunk_coord).map(|d| d.world_min).unwrap_or_default();
          let transform = Transform::from_translation(Vec3::new(origin.x as f32, origin.y as f32, origin.z as f32));
          let mut entity_commands = commands.spawn((Mesh3d(handle), transform, Visibility::default(), ChunkMeshTag { chunk_coord, lod_level, morph_factor: 0.0 }));
          if let Some(material) = &material {
            entity_commands.insert(MeshMaterial3d(material.handle.clone()));
          }
          let entity = entity_commands.id();
          chunk_entities.entities.insert(chunk_coord, entity);
        }
      }
      RendererOp::Remove { chunk_coord } => {
        if let Some(entity) = chunk_entities.entities.remove(&chunk_coord) {
          commands.entity(entity).despawn();
        }
      }
      RendererOp::ClearAll => {
        for (_, entity) in chunk_entities.entities.drain() {
          commands.entity(entity).despawn();
        }
      }
      RendererOp::MorphBatch { updates } => {
        for (chunk_coord, morph) in updates {
          if let Some(&entity) = chunk_entities.entities.get(&chunk_coord) {
            if let Ok(mut tag) = tags.get_mut(entity) {
              tag.morph_factor = morph;
            }
          }
        }
      }
      RendererOp::SetVisible { chunk_coord, visible } => {
        if let Some(&entity) = chunk_entities.entities.get(&chunk_coord) {
          commands.entity(entity).insert(if visible { Visibility::Visible } else { Visibility::Hidden });
        }
      }
    }
  }
}
