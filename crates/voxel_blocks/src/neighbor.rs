//! Neighbour classification for block planning.
//!
//! Every offset in `{-1, 0, 1}³` around a voxel is reduced to a
//! [`NeighborType`] relative to that voxel's [`VoxelKind`]. The planner
//! reads the 27 results for one voxel from a [`NeighborBuffer`] while it
//! walks that voxel's 8 corners.

use glam::IVec3;

use crate::constants::{neighbor_index, neighbor_offset, NEIGHBORHOOD_CB};
use crate::map::VoxelMap;
use crate::types::{ClassificationConfig, Direction, MapEdgePolicy, VoxelKind};

/// Relation of a neighbour cell to the voxel being classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NeighborType {
  SameFilled,
  DifferentFilled,
  EmptyInMap,
  EmptyOutOfMap,
}

impl NeighborType {
  #[inline]
  pub fn is_filled(self) -> bool {
    matches!(self, NeighborType::SameFilled | NeighborType::DifferentFilled)
  }

  #[inline]
  pub fn is_same(self) -> bool {
    self == NeighborType::SameFilled
  }

  #[inline]
  pub fn is_outside_map(self) -> bool {
    self == NeighborType::EmptyOutOfMap
  }

  #[inline]
  pub fn same_or_out(self) -> bool {
    self.is_same() || self.is_outside_map()
  }
}

/// Classify the cell at `pos + offset` against `kind`.
pub fn classify<M: VoxelMap + ?Sized>(
  map: &M,
  pos: IVec3,
  kind: VoxelKind,
  offset: IVec3,
  config: &ClassificationConfig,
) -> NeighborType {
  let mut p = pos + offset;
  if !map.contains(p) {
    if config.map_edge != MapEdgePolicy::Continue {
      return NeighborType::EmptyOutOfMap;
    }
    p = map.bounds().clamp(p);
  }

  let cell = map.get(p);
  if !cell.filled {
    return NeighborType::EmptyInMap;
  }
  if cell.kind() == kind {
    return NeighborType::SameFilled;
  }

  // A face neighbour whose touching side is open does not hide our surface.
  if config.use_side_closed_mask {
    if let Some(facing) = Direction::from_offset(-offset) {
      if !cell.is_side_closed(facing) {
        return NeighborType::EmptyInMap;
      }
    }
  }
  NeighborType::DifferentFilled
}

/// The 3×3×3 classification of one voxel's neighbourhood.
#[derive(Clone, Debug)]
pub struct NeighborBuffer {
  types: [NeighborType; NEIGHBORHOOD_CB],
}

impl Default for NeighborBuffer {
  fn default() -> Self {
    Self {
      types: [NeighborType::EmptyOutOfMap; NEIGHBORHOOD_CB],
    }
  }
}

impl NeighborBuffer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reclassify all 27 offsets around `pos`.
  pub fn fill<M: VoxelMap + ?Sized>(
    &mut self,
    map: &M,
    pos: IVec3,
    kind: VoxelKind,
    config: &ClassificationConfig,
  ) {
    for (i, slot) in self.types.iter_mut().enumerate() {
      *slot = classify(map, pos, kind, neighbor_offset(i), config);
    }
  }

  #[inline(always)]
  pub fn at(&self, offset: IVec3) -> NeighborType {
    self.types[neighbor_index(offset)]
  }

  #[inline(always)]
  pub fn is_same(&self, offset: IVec3) -> bool {
    self.at(offset).is_same()
  }
}

#[cfg(test)]
#[path = "neighbor_test.rs"]
mod neighbor_test;
