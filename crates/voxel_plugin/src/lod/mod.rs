//! Distance-banded level-of-detail strategy.

pub mod band;
pub mod strategy;

pub use band::{aabb_in_frustum, LodBand, Plane};
pub use strategy::{ChunkLodRequest, DistanceBandLodStrategy, LodQueryContext};
