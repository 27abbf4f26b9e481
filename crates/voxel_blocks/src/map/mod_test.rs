use super::*;
use crate::octree::SparseVoxelOctree;

#[test]
fn test_contains_and_try_get() {
  let mut grid = VoxelGrid::empty(IVec3::new(2, 3, 4)).unwrap();
  let cell = VoxelCell::filled(3, 0);
  grid.set(IVec3::new(1, 2, 3), cell);

  assert!(grid.contains(IVec3::new(1, 2, 3)));
  assert!(!grid.contains(IVec3::new(2, 0, 0)));
  assert!(!grid.contains(IVec3::new(0, -1, 0)));
  assert_eq!(grid.try_get(IVec3::new(1, 2, 3)), Some(cell));
  assert_eq!(grid.try_get(IVec3::new(0, 0, 4)), None);
}

#[test]
fn test_bounds_cover_size() {
  let octree = SparseVoxelOctree::new(IVec3::new(3, 5, 2), VoxelCell::EMPTY).unwrap();
  let bounds = octree.bounds();
  assert_eq!(bounds.min, IVec3::ZERO);
  assert_eq!(bounds.max, IVec3::new(2, 4, 1));
  assert_eq!(bounds.volume(), 30);
}

#[test]
fn test_check_size() {
  assert!(check_size(IVec3::ONE).is_ok());
  assert!(check_size(IVec3::new(1, 0, 1)).is_err());
  assert!(check_size(IVec3::new(-4, 2, 2)).is_err());
}

#[test]
fn test_reset_reallocates_both_storages() {
  let fill = VoxelCell::filled(1, 1);
  let mut maps: Vec<Box<dyn VoxelMap>> = vec![
    Box::new(VoxelGrid::empty(IVec3::ONE).unwrap()),
    Box::new(SparseVoxelOctree::new(IVec3::ONE, VoxelCell::EMPTY).unwrap()),
  ];
  for map in maps.iter_mut() {
    map.reset(IVec3::new(4, 2, 3), fill).unwrap();
    assert_eq!(map.size(), IVec3::new(4, 2, 3));
    assert_eq!(map.filled_count(), 24);

    assert!(map.reset(IVec3::new(4, 0, 3), fill).is_err());
    assert_eq!(map.size(), IVec3::new(4, 2, 3));
  }
}
