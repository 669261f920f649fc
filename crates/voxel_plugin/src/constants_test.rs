use super::*;

#[test]
fn coord_to_index_roundtrip() {
  for chunk_size in [8, 16, 32, 64] {
    for x in 0..chunk_size {
      for y in 0..chunk_size {
        for z in 0..chunk_size {
          let idx = coord_to_index(x, y, z, chunk_size);
          let (rx, ry, rz) = index_to_coord(idx, chunk_size);
          assert_eq!((x, y, z), (rx, ry, rz));
        }
      }
    }
  }
}

#[test]
fn x_is_fastest_axis() {
  assert_eq!(coord_to_index(0, 0, 0, 32), 0);
  assert_eq!(coord_to_index(1, 0, 0, 32), 1);
  assert_eq!(coord_to_index(0, 1, 0, 32), 32);
  assert_eq!(coord_to_index(0, 0, 1, 32), 32 * 32);
}

#[test]
fn corner_offsets_cover_unit_cube() {
  assert_eq!(CORNER_OFFSETS[0], (0, 0, 0));
  assert_eq!(CORNER_OFFSETS[7], (1, 1, 1));
  assert_eq!(CORNER_OFFSETS.len(), 8);
}
