use super::*;

#[test]
fn test_empty_is_default() {
  assert_eq!(VoxelCell::default(), VoxelCell::EMPTY);
  assert!(VoxelCell::EMPTY.is_empty());
}

#[test]
fn test_equality_covers_every_field() {
  let base = VoxelCell::filled(3, 1);
  assert_eq!(base, VoxelCell::filled(3, 1));
  assert_ne!(base, VoxelCell::filled(4, 1));
  assert_ne!(base, VoxelCell::filled(3, 2));
  assert_ne!(base, base.with_extra_data(1));
  assert_ne!(base, base.with_side_closed_mask(0));
}

#[test]
fn test_bits_roundtrip() {
  let cell = VoxelCell::filled(0xBEEF, 0x1234)
    .with_side_closed_mask(0b10_1010)
    .with_extra_data(0xFFFF);
  assert_eq!(VoxelCell::from_bits(cell.to_bits()), cell);
  assert_eq!(VoxelCell::from_bits(0), VoxelCell::EMPTY);
}

#[test]
fn test_transform_bits_preserve_payload() {
  let payload = 0b10_1101_0011u16 << 6;
  let rotation = CellTransform::rotation(Axis::Y, false);
  let cell = VoxelCell::filled(1, 1)
    .with_extra_data(payload)
    .with_transform(rotation);

  assert_eq!(cell.transform(), rotation);
  assert_eq!(cell.shape_payload(), payload >> 6);
}

#[test]
fn test_right_handed_rotation_about_z() {
  let rotation = CellTransform::rotation(Axis::Z, false);
  assert_eq!(rotation.apply(IVec3::X), IVec3::Y);
  assert_eq!(rotation.apply(IVec3::Y), -IVec3::X);
  assert_eq!(rotation.apply(IVec3::Z), IVec3::Z);
  assert!(!rotation.is_mirrored());
}

#[test]
fn test_left_handed_rotation_inverts_right_handed() {
  for axis in Axis::ALL {
    let there = CellTransform::rotation(axis, false);
    let back = CellTransform::rotation(axis, true);
    assert_eq!(there.then(&back), CellTransform::IDENTITY, "axis {:?}", axis);
  }
}

#[test]
fn test_four_quarter_turns_are_identity() {
  for axis in Axis::ALL {
    let turn = CellTransform::rotation(axis, false);
    let full = turn.then(&turn).then(&turn).then(&turn);
    assert_eq!(full, CellTransform::IDENTITY);
  }
}

#[test]
fn test_mirror_reverses_handedness() {
  for axis in Axis::ALL {
    let mirror = CellTransform::mirror(axis);
    assert!(mirror.is_mirrored());
    assert!(!mirror.then(&mirror).is_mirrored());
    assert_eq!(mirror.apply(axis.unit()), -axis.unit());
  }
}

#[test]
fn test_composition_matches_sequential_application() {
  let a = CellTransform::rotation(Axis::X, false);
  let b = CellTransform::mirror(Axis::Y);
  let c = CellTransform::rotation(Axis::Z, true);
  let composed = a.then(&b).then(&c);
  let v = IVec3::new(1, 2, 3);
  assert_eq!(composed.apply(v), c.apply(b.apply(a.apply(v))));
  assert_eq!(CellTransform::from_bits(composed.to_bits()), composed);
}

#[test]
fn test_transformed_rotates_side_mask() {
  let cell = VoxelCell::filled(0, 0).with_side_closed_mask(Direction::Right.bit());
  let turned = cell.transformed(&CellTransform::rotation(Axis::Z, false));

  assert!(turned.is_side_closed(Direction::Up));
  assert!(!turned.is_side_closed(Direction::Right));
  assert_eq!(turned.transform(), CellTransform::rotation(Axis::Z, false));
}

#[test]
fn test_transformed_leaves_empty_cells_alone() {
  let turned = VoxelCell::EMPTY.transformed(&CellTransform::mirror(Axis::X));
  assert_eq!(turned, VoxelCell::EMPTY);
}

#[test]
fn test_cycle_relabels_axes_in_order() {
  let to_y = CellTransform::cycle(Axis::Y);
  assert_eq!(to_y.apply(IVec3::new(1, 2, 3)), IVec3::new(3, 1, 2));
  assert!(!to_y.is_mirrored());

  let to_z = CellTransform::cycle(Axis::Z);
  assert_eq!(to_z.apply(IVec3::new(1, 2, 3)), IVec3::new(2, 3, 1));
  assert_eq!(to_y.then(&to_y), to_z);
  assert_eq!(CellTransform::cycle(Axis::X), CellTransform::IDENTITY);
}

#[test]
fn test_apply_vec3_matches_integer_apply() {
  let transform = CellTransform::rotation(Axis::Y, false).then(&CellTransform::mirror(Axis::X));
  let v = IVec3::new(1, -2, 3);
  assert_eq!(transform.apply_vec3(v.as_vec3()), transform.apply(v).as_vec3());
  assert_eq!(
    CellTransform::mirror(Axis::Z).apply_vec3(Vec3::new(0.5, 0.25, 0.125)),
    Vec3::new(0.5, 0.25, -0.125)
  );
}
