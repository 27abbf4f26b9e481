use super::*;
use crate::map::IBox3;
use crate::octree::SparseVoxelOctree;

const A: VoxelCell = VoxelCell::filled(1, 0);
const B: VoxelCell = VoxelCell::filled(2, 0);

fn storages(size: IVec3) -> Vec<Box<dyn VoxelMap>> {
  vec![
    Box::new(VoxelGrid::empty(size).unwrap()),
    Box::new(SparseVoxelOctree::new(size, VoxelCell::EMPTY).unwrap()),
  ]
}

/// Row of cells along X, `None` for empty.
fn row(map: &dyn VoxelMap) -> Vec<Option<u16>> {
  (0..map.size().x)
    .map(|x| {
      let cell = map.get(IVec3::new(x, 0, 0));
      cell.filled.then_some(cell.material_index)
    })
    .collect()
}

fn ab_row() -> Vec<Box<dyn VoxelMap>> {
  let mut maps = storages(IVec3::new(2, 1, 1));
  for map in maps.iter_mut() {
    map.set(IVec3::new(0, 0, 0), A);
    map.set(IVec3::new(1, 0, 0), B);
  }
  maps
}

// =========================================================================
// Range edits
// =========================================================================

#[test]
fn test_repaint_material_only_keeps_shape_and_extra() {
  let original = VoxelCell::filled(1, 7).with_extra_data(0xABCD);
  for mut map in storages(IVec3::splat(2)) {
    map.set(IVec3::ZERO, original);
    let paint = VoxelCell::filled(5, 3).with_extra_data(0x1111);

    assert!(map.set_range(IVec3::ZERO, IVec3::ZERO, EditAction::RepaintMaterialOnly, paint));
    let cell = map.get(IVec3::ZERO);
    assert_eq!(cell.material_index, 5);
    assert_eq!(cell.shape_id, 7);
    assert_eq!(cell.extra_data, 0xABCD);
    assert_eq!(cell.side_closed_mask, original.side_closed_mask);

    // Attach never touches a filled cell.
    assert!(!map.set_range(IVec3::ZERO, IVec3::ZERO, EditAction::Attach, B));
    assert_eq!(map.get(IVec3::ZERO), cell);
  }
}

#[test]
fn test_repaint_replaces_whole_payload() {
  let old = VoxelCell::filled(1, 7)
    .with_side_closed_mask(0b11_0000)
    .with_extra_data(0x0AC5);
  let paint = VoxelCell::filled(9, 2)
    .with_side_closed_mask(0b00_0011)
    .with_extra_data(0x1240);
  for mut map in storages(IVec3::new(2, 1, 1)) {
    map.set(IVec3::ZERO, old);
    assert!(map.set_range(IVec3::ZERO, IVec3::new(1, 0, 0), EditAction::Repaint, paint));

    let cell = map.get(IVec3::ZERO);
    assert!(cell.filled);
    assert_eq!(cell.material_index, 9);
    assert_eq!(cell.shape_id, 2);
    assert_eq!(cell.side_closed_mask, 0b00_0011);
    assert_eq!(cell.extra_data, 0x1240);
    assert_eq!(cell, paint);
    // The empty neighbour is left alone.
    assert_eq!(map.get(IVec3::new(1, 0, 0)), VoxelCell::EMPTY);
  }

  let unfilled_paint = VoxelCell {
    filled: false,
    ..paint
  };
  assert_eq!(apply_action(old, EditAction::Repaint, unfilled_paint), Some(paint));
}

#[test]
fn test_repaint_shape_only_keeps_material_and_extra() {
  let old = VoxelCell::filled(1, 7).with_extra_data(0x00FF);
  let paint = VoxelCell::filled(9, 2).with_side_closed_mask(0b1);
  let new = apply_action(old, EditAction::RepaintShapeOnly, paint).unwrap();
  assert_eq!(new.material_index, 1);
  assert_eq!(new.shape_id, 2);
  assert_eq!(new.side_closed_mask, 0b1);
  assert_eq!(new.extra_data, 0x00FF);
}

#[test]
fn test_repaint_actions_skip_empty_cells() {
  for action in [
    EditAction::Repaint,
    EditAction::RepaintMaterialOnly,
    EditAction::RepaintShapeOnly,
    EditAction::Erase,
  ] {
    assert_eq!(apply_action(VoxelCell::EMPTY, action, A), None, "{:?}", action);
  }
  assert_eq!(apply_action(VoxelCell::EMPTY, EditAction::Attach, A), Some(A));
}

#[test]
fn test_attach_fills_only_empty_cells() {
  for mut map in storages(IVec3::new(3, 1, 1)) {
    map.set(IVec3::new(1, 0, 0), B);
    assert!(map.set_range(IVec3::ZERO, IVec3::new(2, 0, 0), EditAction::Attach, A));
    assert_eq!(row(map.as_ref()), vec![Some(1), Some(2), Some(1)]);
  }
}

#[test]
fn test_erase_clears_filled_cells() {
  for mut map in storages(IVec3::splat(3)) {
    map.set_range(IVec3::ZERO, IVec3::splat(2), EditAction::Overwrite, A);
    assert!(map.set_range(IVec3::ONE, IVec3::splat(5), EditAction::Erase, B));
    assert_eq!(map.filled_count(), 27 - 8);
    assert!(!map.set_range(IVec3::ONE, IVec3::splat(5), EditAction::Erase, B));
  }
}

#[test]
fn test_overwrite_is_idempotent() {
  for mut map in storages(IVec3::new(5, 4, 3)) {
    let (lo, hi) = (IVec3::new(1, -3, 0), IVec3::new(9, 2, 1));
    assert!(map.set_range(lo, hi, EditAction::Overwrite, A));
    let once: Vec<VoxelCell> = map.bounds().iter().map(|p| map.get(p)).collect();

    assert!(!map.set_range(lo, hi, EditAction::Overwrite, A));
    let twice: Vec<VoxelCell> = map.bounds().iter().map(|p| map.get(p)).collect();
    assert_eq!(once, twice);
  }
}

#[test]
fn test_range_is_clamped_silently() {
  for mut map in storages(IVec3::splat(2)) {
    assert!(map.set_range(IVec3::splat(-10), IVec3::splat(10), EditAction::Overwrite, A));
    assert_eq!(map.filled_count(), 8);
    assert!(!map.set_range(IVec3::splat(5), IVec3::splat(8), EditAction::Overwrite, B));
  }
}

// =========================================================================
// Turn / mirror
// =========================================================================

#[test]
fn test_turn_about_z_right_handed() {
  let marker = VoxelCell::filled(7, 0);
  for mut map in storages(IVec3::new(2, 3, 1)) {
    map.set(IVec3::new(1, 2, 0), marker);
    map.turn(Axis::Z, false);

    assert_eq!(map.size(), IVec3::new(3, 2, 1));
    let moved = map.get(IVec3::new(0, 1, 0));
    assert_eq!(moved.material_index, 7);
    assert_eq!(moved.transform(), CellTransform::rotation(Axis::Z, false));
    assert_eq!(map.filled_count(), 1);
  }
}

#[test]
fn test_turn_about_z_left_handed() {
  for mut map in storages(IVec3::new(2, 3, 1)) {
    map.set(IVec3::new(1, 2, 0), A);
    map.turn(Axis::Z, true);

    assert_eq!(map.size(), IVec3::new(3, 2, 1));
    assert!(map.get(IVec3::new(2, 0, 0)).filled);
  }
}

#[test]
fn test_turn_keeps_adjacency() {
  // Two cells stacked along Y end up side by side along -X after a
  // right-handed turn about Z.
  for mut map in storages(IVec3::new(1, 2, 1)) {
    map.set(IVec3::new(0, 0, 0), A);
    map.set(IVec3::new(0, 1, 0), B);
    map.turn(Axis::Z, false);

    assert_eq!(map.size(), IVec3::new(2, 1, 1));
    assert_eq!(row(map.as_ref()), vec![Some(2), Some(1)]);
  }
}

#[test]
fn test_four_turns_restore_map() {
  for axis in Axis::ALL {
    let mut grid = VoxelGrid::empty(IVec3::new(2, 3, 4)).unwrap();
    grid.set(IVec3::new(1, 0, 3), A);
    grid.set(IVec3::new(0, 2, 1), B.with_side_closed_mask(Direction::Up.bit()));
    let original = grid.clone();

    for _ in 0..4 {
      grid.turn(axis, false);
    }
    assert_eq!(grid, original, "axis {:?}", axis);
  }
}

#[test]
fn test_mirror_reflects_positions_and_orientation() {
  for mut map in storages(IVec3::new(4, 1, 1)) {
    map.set(IVec3::new(0, 0, 0), A.with_side_closed_mask(Direction::Right.bit()));
    map.mirror(Axis::X);

    let cell = map.get(IVec3::new(3, 0, 0));
    assert!(cell.filled);
    assert!(cell.is_side_closed(Direction::Left));
    assert!(cell.transform().is_mirrored());

    map.mirror(Axis::X);
    assert_eq!(
      map.get(IVec3::ZERO),
      A.with_side_closed_mask(Direction::Right.bit())
    );
  }
}

// =========================================================================
// Resize
// =========================================================================

#[test]
fn test_resize_stretches_content() {
  for direction in [Direction::Right, Direction::Left] {
    for mut map in ab_row() {
      map.resize(direction, 2).unwrap();
      assert_eq!(map.size(), IVec3::new(4, 1, 1));
      assert_eq!(row(map.as_ref()), vec![Some(1), Some(1), Some(2), Some(2)]);
    }
  }
}

#[test]
fn test_resize_shrinks_content() {
  for mut map in storages(IVec3::new(4, 1, 1)) {
    for (x, cell) in [A, A, B, B].into_iter().enumerate() {
      map.set(IVec3::new(x as i32, 0, 0), cell);
    }
    map.resize(Direction::Right, -2).unwrap();
    assert_eq!(row(map.as_ref()), vec![Some(1), Some(2)]);
  }
}

#[test]
fn test_resize_to_zero_fails_without_change() {
  for mut map in ab_row() {
    let result = map.resize(Direction::Left, -2);
    assert!(matches!(result, Err(VoxelError::InvalidArgument(_))));
    assert_eq!(row(map.as_ref()), vec![Some(1), Some(2)]);
  }
}

#[test]
fn test_resize_canvas_pads_empty() {
  for mut map in ab_row() {
    map.resize_canvas(Direction::Right, 2, false).unwrap();
    assert_eq!(row(map.as_ref()), vec![Some(1), Some(2), None, None]);
  }
  for mut map in ab_row() {
    map.resize_canvas(Direction::Left, 2, false).unwrap();
    assert_eq!(row(map.as_ref()), vec![None, None, Some(1), Some(2)]);
  }
}

#[test]
fn test_resize_canvas_repeats_content() {
  for mut map in ab_row() {
    map.resize_canvas(Direction::Right, 3, true).unwrap();
    assert_eq!(row(map.as_ref()), vec![Some(1), Some(2), Some(1), Some(2), Some(1)]);
  }
  for mut map in ab_row() {
    map.resize_canvas(Direction::Left, 1, true).unwrap();
    assert_eq!(row(map.as_ref()), vec![Some(2), Some(1), Some(2)]);
  }
}

#[test]
fn test_resize_canvas_crops() {
  for mut map in ab_row() {
    map.resize_canvas(Direction::Left, -1, false).unwrap();
    assert_eq!(row(map.as_ref()), vec![Some(2)]);
  }
  for mut map in ab_row() {
    map.resize_canvas(Direction::Right, -1, false).unwrap();
    assert_eq!(row(map.as_ref()), vec![Some(1)]);
  }
}

#[test]
fn test_resize_other_axes_untouched() {
  let mut grid = VoxelGrid::empty(IVec3::new(1, 2, 3)).unwrap();
  grid.set(IVec3::new(0, 1, 2), A);
  grid.resize_canvas(Direction::Up, 1, false).unwrap();

  assert_eq!(grid.size(), IVec3::new(1, 3, 3));
  assert_eq!(grid.get(IVec3::new(0, 1, 2)), A);
  assert_eq!(IBox3::from_size(grid.size()).volume(), 9);
}
