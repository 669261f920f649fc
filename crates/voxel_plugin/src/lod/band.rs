//! LOD band and the conservative frustum plane type used to cull chunks.

use glam::DVec3;

/// A half-open distance interval associating a range of distances with a
/// discrete LOD level and the sampling resolution used at that level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodBand {
  pub min_distance: f64,
  pub max_distance: f64,
  pub lod_level: i32,
  pub voxel_stride: u32,
  pub chunk_size: i32,
  /// Distance inside the band, measured from `max_distance`, over which the
  /// morph factor ramps `0 → 1`. Zero disables morphing for this band.
  pub morph_range: f64,
}

impl LodBand {
  pub fn contains(&self, distance: f64) -> bool {
    distance >= self.min_distance && distance < self.max_distance
  }
}

/// A plane as `normal · p + d == 0`; a point is "inside" when
/// `normal · p + d >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
  pub normal: DVec3,
  pub d: f64,
}

impl Plane {
  /// Signed distance of `p` from the plane, along `normal`.
  #[inline]
  pub fn signed_distance(&self, p: DVec3) -> f64 {
    self.normal.dot(p) + self.d
  }
}

/// Conservative AABB-vs-frustum test: an AABB is rejected only if it lies
/// entirely on the outside of at least one plane. Without exactly six
/// planes, every box is treated as visible.
pub fn aabb_in_frustum(min: DVec3, max: DVec3, planes: Option<&[Plane; 6]>) -> bool {
  let Some(planes) = planes else {
    return true;
  };
  for plane in planes {
    let positive = DVec3::new(
      if plane.normal.x >= 0.0 { max.x } else { min.x },
      if plane.normal.y >= 0.0 { max.y } else { min.y },
      if plane.normal.z >= 0.0 { max.z } else { min.z },
    );
    if plane.signed_distance(positive) < 0.0 {
      return false;
    }
  }
  true
}

#[cfg(test)]
#[path = "band_test.rs"]
mod band_test;
