use super::*;

#[test]
fn test_axis_cycle() {
  assert_eq!(Axis::X.next(), Axis::Y);
  assert_eq!(Axis::Y.next(), Axis::Z);
  assert_eq!(Axis::Z.next(), Axis::X);
}

#[test]
fn test_axis_of_unit() {
  assert_eq!(Axis::of_unit(IVec3::new(0, -1, 0)), Some(Axis::Y));
  assert_eq!(Axis::of_unit(IVec3::new(1, 1, 0)), None);
  assert_eq!(Axis::of_unit(IVec3::ZERO), None);
}

#[test]
fn test_direction_roundtrip_through_offset() {
  for dir in Direction::ALL {
    assert_eq!(Direction::from_offset(dir.offset()), Some(dir));
    assert_eq!(dir.opposite().offset(), -dir.offset());
  }
}

#[test]
fn test_direction_bits_are_distinct() {
  let mask = Direction::ALL.iter().fold(0u8, |acc, d| {
    assert_eq!(acc & d.bit(), 0, "{:?} bit collides", d);
    acc | d.bit()
  });
  assert_eq!(mask, 0b11_1111);
}

#[test]
fn test_classification_config_builder() {
  let config = ClassificationConfig::new()
    .with_merge_close_edges(true)
    .with_map_edge(MapEdgePolicy::Continue)
    .with_draw_between_different_types(false);

  assert!(config.merge_close_edges);
  assert_eq!(config.map_edge, MapEdgePolicy::Continue);
  assert!(!config.draw_between_different_types);
  assert!(!config.use_side_closed_mask);
}

#[test]
fn test_aabb_encapsulate() {
  let mut aabb = MinMaxAABB::empty();
  assert!(!aabb.is_valid());

  aabb.encapsulate(Vec3::new(1.0, 2.0, 3.0));
  aabb.encapsulate(Vec3::new(-1.0, -2.0, -3.0));

  assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -3.0));
  assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));
  assert!(aabb.is_valid());
}
