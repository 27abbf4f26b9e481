//! Mesh assembly: block maps plus a library become renderable buffers.
//!
//! # Module Structure
//!
//! - [`assembler`]: `MeshAssembler` - fragment placement and sub-mesh ranges

pub mod assembler;

pub use assembler::{AssemblyStats, MeshAssembler};

use glam::{Vec2, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::blocks::compute_material_blocks;
#[cfg(feature = "tracing")]
use crate::library::describe_key;
use crate::library::ShapeLibraries;
use crate::map::VoxelMap;
use crate::types::{AssemblyConfig, ClassificationConfig, MinMaxAABB};

/// Contiguous index range drawn with one material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubMesh {
  pub material: u16,
  pub index_start: usize,
  pub index_count: usize,
}

/// Assembled mesh.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshBuffers {
  pub positions: Vec<Vec3>,
  pub normals: Vec<Vec3>,
  pub uvs: Vec<Vec2>,
  pub indices: Vec<u32>,
  pub sub_meshes: Vec<SubMesh>,
  /// Bounds of `positions`; inverted while the mesh is empty.
  pub bounds: MinMaxAABB,
}

impl MeshBuffers {
  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }

  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }
}

/// Result of [`build_mesh`].
#[derive(Clone, Debug, Default)]
pub struct MeshBuild {
  pub buffers: MeshBuffers,
  pub stats: AssemblyStats,
  /// Voxel kinds that were planned.
  pub kind_count: usize,
}

/// Plan every voxel kind of `map` and assemble all of them into one mesh,
/// one sub-mesh per material.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "mesh::build_mesh"))]
pub fn build_mesh<M: VoxelMap + ?Sized>(
  map: &M,
  config: &ClassificationConfig,
  libraries: &ShapeLibraries,
  assembly: &AssemblyConfig,
) -> MeshBuild {
  let per_kind = compute_material_blocks(map, config);
  let mut assembler = MeshAssembler::new(*assembly);
  for (kind, blocks) in &per_kind {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("append_kind", material = kind.material_index, shape = kind.shape_id).entered();
    assembler.append(blocks, libraries.get(kind.shape_id), kind.material_index);
  }

  let (buffers, stats) = assembler.finish_with_stats();
  #[cfg(feature = "tracing")]
  if !stats.missing.is_empty() {
    let entries: Vec<String> = stats.missing.iter().map(describe_key).collect();
    tracing::warn!(
      skipped = stats.skipped,
      "{} block mesh entries missing: {}",
      stats.missing.len(),
      entries.join(", ")
    );
  }
  #[cfg(feature = "tracing")]
  tracing::debug!(
    vertices = buffers.vertex_count(),
    triangles = buffers.triangle_count(),
    "assembled mesh"
  );

  MeshBuild {
    buffers,
    stats,
    kind_count: per_kind.len(),
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
