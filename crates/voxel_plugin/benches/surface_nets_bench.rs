//! Benchmark comparing the smooth mesher's Surface-Nets-family dual
//! contouring against the `fast-surface-nets` crate on the same sphere SDF,
//! kept for performance parity tracking now that meshing dispatches over a
//! chunk's [`MeshingRequest`] instead of a single fixed volume.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fast_surface_nets::ndshape::{ConstShape, ConstShape3u32};
use fast_surface_nets::{surface_nets, SurfaceNetsBuffer};
use glam::IVec3;
use voxel_plugin::meshing::{MesherOps, MeshingRequest, SmoothMesher};
use voxel_plugin::voxel::Voxel;

const CHUNK_SIZE: i32 = 32;

/// Grid shape for `fast_surface_nets` (33³, one more than the voxel grid so
/// every cell in the 32³ chunk has all eight corners sampled).
type GridShape = ConstShape3u32<33, 33, 33>;

fn sphere_density(x: f32, y: f32, z: f32, center: f32, radius: f32) -> u8 {
  let d = ((x - center).powi(2) + (y - center).powi(2) + (z - center).powi(2)).sqrt() - radius;
  // Map "inside the sphere" (d < 0) to high density, matching this crate's
  // convention that density >= SURFACE_THRESHOLD is solid.
  (((-d).clamp(-16.0, 16.0) + 16.0) / 32.0 * 255.0) as u8
}

fn build_chunk_request(center: f32, radius: f32) -> MeshingRequest {
  let mut data = vec![Voxel::AIR; (CHUNK_SIZE as usize).pow(3)];
  for z in 0..CHUNK_SIZE {
    for y in 0..CHUNK_SIZE {
      for x in 0..CHUNK_SIZE {
        let idx = (x + y * CHUNK_SIZE + z * CHUNK_SIZE * CHUNK_SIZE) as usize;
        let density = sphere_density(x as f32, y as f32, z as f32, center, radius);
        data[idx] = Voxel { material_id: 1, density, biome_id: 0, metadata: 0 };
      }
    }
  }
  MeshingRequest::isolated(IVec3::ZERO, 0, CHUNK_SIZE, 1.0, Arc::from(data))
}

fn build_fast_surface_nets_sdf(center: f32, radius: f32) -> [f32; GridShape::USIZE] {
  let mut sdf = [1.0f32; GridShape::USIZE];
  for i in 0u32..GridShape::SIZE {
    let [x, y, z] = GridShape::delinearize(i);
    let d = ((x as f32 - center).powi(2) + (y as f32 - center).powi(2) + (z as f32 - center).powi(2)).sqrt() - radius;
    sdf[i as usize] = d;
  }
  sdf
}

fn bench_smooth_mesher(c: &mut Criterion) {
  let request = build_chunk_request(16.0, 12.0);
  let mesher = SmoothMesher::default();

  c.bench_function("voxel_plugin::SmoothMesher (32^3 sphere)", |b| {
    b.iter(|| {
      let (mesh, stats, ok) = mesher.generate_mesh(black_box(&request));
      black_box((mesh, stats, ok))
    })
  });
}

fn bench_fast_surface_nets(c: &mut Criterion) {
  let sdf = build_fast_surface_nets_sdf(16.0, 12.0);

  c.bench_function("fast_surface_nets (33^3 sphere)", |b| {
    b.iter(|| {
      let mut buffer = SurfaceNetsBuffer::default();
      surface_nets(black_box(&sdf), &GridShape {}, [0; 3], [32; 3], &mut buffer);
      black_box(buffer)
    })
  });
}

criterion_group!(benches, bench_smooth_mesher, bench_fast_surface_nets);
criterion_main!(benches);
