use super::*;

fn band(min: f64, max: f64, lod: i32, morph: f64) -> LodBand {
  LodBand {
    min_distance: min,
    max_distance: max,
    lod_level: lod,
    voxel_stride: 1,
    chunk_size: 32,
    morph_range: morph,
  }
}

#[test]
fn band_contains_is_half_open() {
  let b = band(0.0, 1000.0, 0, 0.0);
  assert!(b.contains(0.0));
  assert!(b.contains(999.9));
  assert!(!b.contains(1000.0));
}

#[test]
fn no_planes_means_always_visible() {
  assert!(aabb_in_frustum(DVec3::ZERO, DVec3::ONE, None));
}

#[test]
fn plane_rejects_box_entirely_outside() {
  let planes = [
    Plane { normal: DVec3::new(1.0, 0.0, 0.0), d: -10.0 },
    Plane { normal: DVec3::new(-1.0, 0.0, 0.0), d: 1000.0 },
    Plane { normal: DVec3::new(0.0, 1.0, 0.0), d: 1000.0 },
    Plane { normal: DVec3::new(0.0, -1.0, 0.0), d: 1000.0 },
    Plane { normal: DVec3::new(0.0, 0.0, 1.0), d: 1000.0 },
    Plane { normal: DVec3::new(0.0, 0.0, -1.0), d: 1000.0 },
  ];
  // Box fully below x=10 is outside the first plane's half-space.
  assert!(!aabb_in_frustum(DVec3::new(0.0, 0.0, 0.0), DVec3::new(5.0, 1.0, 1.0), Some(&planes)));
  assert!(aabb_in_frustum(DVec3::new(20.0, 0.0, 0.0), DVec3::new(25.0, 1.0, 1.0), Some(&planes)));
}
