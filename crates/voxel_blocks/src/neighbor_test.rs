use super::*;
use crate::cell::VoxelCell;
use crate::map::VoxelGrid;

const STONE: VoxelCell = VoxelCell::filled(1, 0);
const DIRT: VoxelCell = VoxelCell::filled(2, 0);

fn stone_kind() -> VoxelKind {
  STONE.kind()
}

fn row_map() -> VoxelGrid {
  // [stone, stone, dirt, empty] along X
  let mut grid = VoxelGrid::empty(IVec3::new(4, 1, 1)).unwrap();
  grid.set(IVec3::new(0, 0, 0), STONE);
  grid.set(IVec3::new(1, 0, 0), STONE);
  grid.set(IVec3::new(2, 0, 0), DIRT);
  grid
}

#[test]
fn test_predicates() {
  use NeighborType::*;
  assert!(SameFilled.is_filled() && SameFilled.is_same() && SameFilled.same_or_out());
  assert!(DifferentFilled.is_filled() && !DifferentFilled.is_same());
  assert!(!EmptyInMap.is_filled() && !EmptyInMap.same_or_out());
  assert!(EmptyOutOfMap.is_outside_map() && EmptyOutOfMap.same_or_out());
}

#[test]
fn test_classify_inside_map() {
  let grid = row_map();
  let config = ClassificationConfig::default();
  let at = |x: i32| classify(&grid, IVec3::new(1, 0, 0), stone_kind(), IVec3::new(x, 0, 0), &config);

  assert_eq!(at(-1), NeighborType::SameFilled);
  assert_eq!(at(0), NeighborType::SameFilled);
  assert_eq!(at(1), NeighborType::DifferentFilled);
  assert_eq!(
    classify(&grid, IVec3::new(2, 0, 0), stone_kind(), IVec3::X, &config),
    NeighborType::EmptyInMap
  );
}

#[test]
fn test_shape_counts_towards_kind() {
  let mut grid = VoxelGrid::empty(IVec3::new(2, 1, 1)).unwrap();
  grid.set(IVec3::ZERO, STONE);
  grid.set(IVec3::X, VoxelCell::filled(1, 4));
  let config = ClassificationConfig::default();
  assert_eq!(
    classify(&grid, IVec3::ZERO, stone_kind(), IVec3::X, &config),
    NeighborType::DifferentFilled
  );
}

#[test]
fn test_outside_map_policies() {
  let grid = row_map();
  let pos = IVec3::ZERO;
  let offset = IVec3::new(-1, 0, 0);

  for policy in [MapEdgePolicy::Close, MapEdgePolicy::Open] {
    let config = ClassificationConfig::default().with_map_edge(policy);
    assert_eq!(classify(&grid, pos, stone_kind(), offset, &config), NeighborType::EmptyOutOfMap);
  }

  // Clamped back onto (0,0,0), which is stone.
  let config = ClassificationConfig::default().with_map_edge(MapEdgePolicy::Continue);
  assert_eq!(classify(&grid, pos, stone_kind(), offset, &config), NeighborType::SameFilled);
  assert_eq!(
    classify(&grid, pos, stone_kind(), IVec3::new(0, 1, 1), &config),
    NeighborType::SameFilled
  );
}

#[test]
fn test_open_side_of_different_kind_does_not_occlude() {
  let mut grid = VoxelGrid::empty(IVec3::new(3, 1, 1)).unwrap();
  grid.set(IVec3::new(1, 0, 0), STONE);
  // Right neighbour has its left face open; left neighbour is fully closed.
  grid.set(IVec3::new(2, 0, 0), DIRT.with_side_closed_mask(!Direction::Left.bit()));
  grid.set(IVec3::new(0, 0, 0), DIRT);

  let pos = IVec3::new(1, 0, 0);
  let masked = ClassificationConfig::default().with_side_closed_mask(true);
  assert_eq!(classify(&grid, pos, stone_kind(), IVec3::X, &masked), NeighborType::EmptyInMap);
  assert_eq!(classify(&grid, pos, stone_kind(), -IVec3::X, &masked), NeighborType::DifferentFilled);

  let unmasked = ClassificationConfig::default();
  assert_eq!(classify(&grid, pos, stone_kind(), IVec3::X, &unmasked), NeighborType::DifferentFilled);
}

#[test]
fn test_buffer_matches_direct_classification() {
  let mut grid = VoxelGrid::empty(IVec3::splat(3)).unwrap();
  grid.set(IVec3::ONE, STONE);
  grid.set(IVec3::new(0, 1, 1), STONE);
  grid.set(IVec3::new(2, 2, 2), DIRT);
  let config = ClassificationConfig::default();

  let mut buffer = NeighborBuffer::new();
  buffer.fill(&grid, IVec3::ZERO, stone_kind(), &config);
  buffer.fill(&grid, IVec3::ONE, stone_kind(), &config);

  for i in 0..NEIGHBORHOOD_CB {
    let offset = neighbor_offset(i);
    assert_eq!(
      buffer.at(offset),
      classify(&grid, IVec3::ONE, stone_kind(), offset, &config),
      "offset {offset}"
    );
  }
  assert!(buffer.is_same(IVec3::new(-1, 0, 0)));
  assert_eq!(buffer.at(IVec3::ONE), NeighborType::DifferentFilled);
}
