//! Stitching library fragments into one mesh.
//!
//! ```text
//! BlockMap ──► sorted by slot ──► library.find(type, axis, corner)
//!                                      │
//!                    ┌─────────────────┴─────────────────┐
//!                    ▼                                   ▼
//!               fragment found                       missing
//!   positions * voxel_size + Block::center(slot)   counted, skipped
//!   normals, uvs copied
//!   indices + running vertex count
//! ```

use std::collections::BTreeSet;

use crate::blocks::{Block, BlockMap};
use crate::library::{BlockMeshLibrary, LibraryKey};
use crate::types::AssemblyConfig;

use super::{MeshBuffers, SubMesh};

/// Counters collected while assembling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssemblyStats {
  /// Blocks handed to the assembler.
  pub blocks: usize,
  /// Blocks that produced geometry.
  pub drawn: usize,
  /// Blocks skipped because the library has no fragment for them.
  pub skipped: usize,
  /// Distinct library keys that were looked up and not found.
  pub missing: BTreeSet<LibraryKey>,
}

/// Accumulates fragments for one or more block maps.
#[derive(Clone, Debug, Default)]
pub struct MeshAssembler {
  config: AssemblyConfig,
  buffers: MeshBuffers,
  stats: AssemblyStats,
}

impl MeshAssembler {
  pub fn new(config: AssemblyConfig) -> Self {
    Self {
      config,
      buffers: MeshBuffers::default(),
      stats: AssemblyStats::default(),
    }
  }

  pub fn config(&self) -> &AssemblyConfig {
    &self.config
  }

  pub fn stats(&self) -> &AssemblyStats {
    &self.stats
  }

  /// Append every block of `blocks` as one index range for `material`.
  pub fn append(&mut self, blocks: &BlockMap, library: &BlockMeshLibrary, material: u16) {
    let index_start = self.buffers.indices.len();
    let voxel_size = self.config.voxel_size;

    for (slot, block) in blocks.sorted() {
      self.stats.blocks += 1;
      if !block.block_type.is_meshed() {
        continue;
      }
      let Some(fragment) = library.find(block.block_type, block.axis, block.corner) else {
        self.stats.skipped += 1;
        self
          .stats
          .missing
          .insert(LibraryKey::new(block.block_type, block.axis, block.corner));
        continue;
      };
      self.stats.drawn += 1;

      let base = self.buffers.positions.len() as u32;
      let center = Block::center(slot, voxel_size);
      for position in &fragment.positions {
        let p = center + *position * voxel_size;
        self.buffers.bounds.encapsulate(p);
        self.buffers.positions.push(p);
      }
      self.buffers.normals.extend_from_slice(&fragment.normals);
      self.buffers.uvs.extend_from_slice(&fragment.uvs);
      self
        .buffers
        .indices
        .extend(fragment.indices.iter().map(|i| base + i));
    }

    let index_count = self.buffers.indices.len() - index_start;
    if index_count == 0 {
      return;
    }
    match self.buffers.sub_meshes.last_mut() {
      Some(last) if last.material == material && last.index_start + last.index_count == index_start => {
        last.index_count += index_count;
      }
      _ => self.buffers.sub_meshes.push(SubMesh {
        material,
        index_start,
        index_count,
      }),
    }
  }

  pub fn finish(self) -> MeshBuffers {
    self.buffers
  }

  pub fn finish_with_stats(self) -> (MeshBuffers, AssemblyStats) {
    (self.buffers, self.stats)
  }
}

#[cfg(test)]
#[path = "assembler_test.rs"]
mod assembler_test;
