//! Native `NoiseNode`: a thin re-export of `voxel_noise`'s FastNoise2 FFI
//! wrapper, so [`super::terrain::TerrainNoiseSampler`] can stay
//! platform-agnostic.

pub use voxel_noise::NoiseNode;
