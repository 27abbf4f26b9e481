use glam::IVec3;

use super::*;
use crate::blocks::BlockType;
use crate::cell::VoxelCell;
use crate::library::{BlockMeshLibrary, MeshFragment};
use crate::map::VoxelGrid;

fn quad_fragment() -> MeshFragment {
  MeshFragment::new(
    vec![
      Vec3::new(0.25, -0.25, -0.25),
      Vec3::new(0.25, 0.25, -0.25),
      Vec3::new(0.25, 0.25, 0.25),
      Vec3::new(0.25, -0.25, 0.25),
    ],
    vec![Vec3::X; 4],
    vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y],
    vec![0, 1, 2, 0, 2, 3],
  )
  .unwrap()
}

fn libraries() -> ShapeLibraries {
  let mut library = BlockMeshLibrary::new();
  for block_type in BlockType::ALL.into_iter().filter(|t| t.is_meshed()) {
    library.insert_symmetric(block_type, quad_fragment()).unwrap();
  }
  ShapeLibraries::new(library)
}

#[test]
fn test_isolated_voxel_mesh() {
  let mut grid = VoxelGrid::empty(IVec3::splat(3)).unwrap();
  grid.set(IVec3::ONE, VoxelCell::filled(5, 0));

  let build = build_mesh(
    &grid,
    &ClassificationConfig::default(),
    &libraries(),
    &AssemblyConfig::default(),
  );

  assert_eq!(build.kind_count, 1);
  assert_eq!(build.stats.drawn, 8);
  assert!(build.stats.missing.is_empty());
  assert_eq!(build.buffers.triangle_count(), 16);
  assert_eq!(
    build.buffers.sub_meshes,
    vec![SubMesh {
      material: 5,
      index_start: 0,
      index_count: 48,
    }]
  );
  // Everything stays within the voxel's unit cube.
  assert!(build.buffers.bounds.min.cmpge(Vec3::ONE).all());
  assert!(build.buffers.bounds.max.cmple(Vec3::splat(2.0)).all());
}

#[test]
fn test_one_sub_mesh_per_material() {
  let mut grid = VoxelGrid::empty(IVec3::new(4, 3, 3)).unwrap();
  grid.set(IVec3::new(1, 1, 1), VoxelCell::filled(2, 0));
  grid.set(IVec3::new(2, 1, 1), VoxelCell::filled(1, 0));

  let build = build_mesh(
    &grid,
    &ClassificationConfig::default(),
    &libraries(),
    &AssemblyConfig::default(),
  );

  let materials: Vec<u16> = build.buffers.sub_meshes.iter().map(|s| s.material).collect();
  assert_eq!(materials, vec![1, 2]);
  let total: usize = build.buffers.sub_meshes.iter().map(|s| s.index_count).sum();
  assert_eq!(total, build.buffers.indices.len());
}

#[test]
fn test_missing_library_entries_do_not_fail() {
  let mut grid = VoxelGrid::empty(IVec3::splat(3)).unwrap();
  grid.set(IVec3::ONE, VoxelCell::filled(0, 7));

  let build = build_mesh(
    &grid,
    &ClassificationConfig::default(),
    &ShapeLibraries::default(),
    &AssemblyConfig::default(),
  );

  assert!(build.buffers.is_empty());
  assert_eq!(build.stats.skipped, 8);
  assert_eq!(build.stats.missing.len(), 8);
}

#[test]
fn test_empty_map_builds_empty_mesh() {
  let grid = VoxelGrid::empty(IVec3::splat(4)).unwrap();
  let build = build_mesh(
    &grid,
    &ClassificationConfig::default(),
    &libraries(),
    &AssemblyConfig::default(),
  );
  assert_eq!(build.kind_count, 0);
  assert!(build.buffers.is_empty());
}
