//! voxel_blocks - Engine independent voxel maps and block-based meshing
//!
//! Voxels are stored in a dense [`VoxelGrid`] or a [`SparseVoxelOctree`];
//! both implement [`VoxelMap`]. Every filled voxel is split into 2×2×2
//! sub-voxel corners, each corner is classified from its 3×3×3
//! neighborhood into one of ten [`BlockType`]s, and the resulting blocks are
//! resolved against a [`BlockMeshLibrary`] and stitched into one mesh with a
//! sub-mesh per material.
//!
//! # Features
//!
//! - **Two storages**: flat array and canonical sparse octree with identical
//!   edit semantics (range edits, turn, mirror, resize)
//! - **Block planning**: deterministic corner classification with optional
//!   edge merging and side masks
//! - **Symmetric libraries**: author one fragment per block type, derive the
//!   other octants and axes
//! - **Picking**: DDA raycast returning the hit voxel and the cell before it
//! - **Background rebuilds**: epoch-tagged rebuilds on rayon's pool
//!
//! # Example
//!
//! ```ignore
//! use voxel_blocks::{build_mesh, ClassificationConfig, AssemblyConfig, ShapeLibraries, VoxelCell, VoxelGrid, VoxelMap};
//!
//! let mut grid = VoxelGrid::empty(IVec3::splat(16))?;
//! grid.set(IVec3::splat(8), VoxelCell::filled(0, 0));
//!
//! let build = build_mesh(&grid, &ClassificationConfig::default(), &libraries, &AssemblyConfig::default());
//! println!("{} triangles", build.buffers.triangle_count());
//! ```

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Result, VoxelError};
pub use types::{
  AssemblyConfig, Axis, ClassificationConfig, Direction, EditAction, MapEdgePolicy, MinMaxAABB, VoxelKind,
};

// Cell value and orientation payload
pub mod cell;
pub use cell::{CellTransform, VoxelCell, ALL_SIDES_CLOSED};

// Storages
pub mod map;
pub mod octree;
pub use map::{IBox3, VoxelGrid, VoxelMap};
pub use octree::SparseVoxelOctree;

// Classification and planning
pub mod blocks;
pub mod neighbor;
pub use blocks::{compute_blocks, compute_material_blocks, Block, BlockMap, BlockPlanner, BlockType};
pub use neighbor::{NeighborBuffer, NeighborType};

// Mesh library and assembly
pub mod library;
pub mod mesh;
pub use library::{BlockMeshLibrary, LibraryKey, MeshFragment, ShapeLibraries};
pub use mesh::{build_mesh, AssemblyStats, MeshAssembler, MeshBuffers, MeshBuild, SubMesh};

#[cfg(feature = "serde")]
pub use library::{LibraryEntry, LibraryFile};

pub mod raycast;
pub use raycast::{raycast, RayHit};

pub mod rebuild;
pub use rebuild::{RebuildResult, RebuildWorker};
