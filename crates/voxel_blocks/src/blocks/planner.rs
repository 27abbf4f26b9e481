//! Corner classification: filled voxels to [`Block`]s.
//!
//! For every filled voxel the planner classifies its 3×3×3 neighbourhood
//! once, then walks the voxel's 8 corners. Each corner `s ∈ {-1, 1}³` reads
//! seven relations from the neighbourhood:
//!
//! ```text
//!   faces  nX = s.x00   nY = 0s.y0   nZ = 00s.z
//!   edges  nXY = s.x s.y 0   nYZ = 0 s.y s.z   nZX = s.x 0 s.z
//!   corner nXYZ = s
//! ```
//!
//! and dispatches on how many faces hold the same kind:
//!
//! ```text
//! same faces   shape                      emitted
//! ──────────   ────────────────────────   ──────────────────────────────────
//!     0        convex corner              CornerPositive
//!     1        edge along the same axis   EdgePositive / EdgeNegative /
//!                                         EdgeToEdge / SideToPositiveEdge
//!     2        flat side, open on normal  SideToNegativeEdge / SidePositive /
//!                                         CornerNegative / EdgeNegative
//!     3        inside corner              CrossCorner
//! ```
//!
//! Negative blocks describe the concave spot on the far side of the open
//! face, so they are written into the neighbouring voxel's slot (shifted
//! by the normal, corner flipped). Slot writes are first-writer-wins except
//! `CornerNegative` (last writer wins) and colliding `EdgePositive` (warned,
//! last writer wins). Voxels are visited in Z, Y, X order so the result does
//! not depend on how a storage enumerates its cells.

use std::collections::BTreeMap;

use glam::IVec3;
use smallvec::SmallVec;

use super::{Block, BlockMap, BlockType};
use crate::cell::VoxelCell;
use crate::constants::{sub_voxel_index, CORNER_OFFSETS};
use crate::map::VoxelMap;
use crate::neighbor::{NeighborBuffer, NeighborType};
use crate::types::{Axis, ClassificationConfig, MapEdgePolicy, VoxelKind};

/// Reusable block planner. Owns its scratch buffers; one planner per thread.
#[derive(Clone, Debug, Default)]
pub struct BlockPlanner {
  config: ClassificationConfig,
  neighbors: NeighborBuffer,
  voxels: Vec<(IVec3, VoxelCell)>,
}

impl BlockPlanner {
  pub fn new(config: ClassificationConfig) -> Self {
    Self {
      config,
      neighbors: NeighborBuffer::new(),
      voxels: Vec::new(),
    }
  }

  pub fn config(&self) -> &ClassificationConfig {
    &self.config
  }

  /// Classify every filled voxel of `map`.
  pub fn plan<M: VoxelMap + ?Sized>(&mut self, map: &M) -> BlockMap {
    self.plan_filtered(map, None)
  }

  /// Classify only the voxels of one kind.
  pub fn plan_kind<M: VoxelMap + ?Sized>(&mut self, map: &M, kind: VoxelKind) -> BlockMap {
    self.plan_filtered(map, Some(kind))
  }

  /// Classify one voxel into `blocks`. Empty cells emit nothing.
  pub fn plan_voxel<M: VoxelMap + ?Sized>(&mut self, map: &M, pos: IVec3, blocks: &mut BlockMap) {
    let cell = map.get(pos);
    if !cell.filled {
      return;
    }
    self.neighbors.fill(map, pos, cell.kind(), &self.config);
    for offset in CORNER_OFFSETS {
      classify_corner(&self.neighbors, &self.config, pos, offset, blocks);
    }
  }

  fn plan_filtered<M: VoxelMap + ?Sized>(&mut self, map: &M, kind: Option<VoxelKind>) -> BlockMap {
    let mut voxels = std::mem::take(&mut self.voxels);
    voxels.clear();
    map.for_each_filled(&mut |p, cell| {
      if kind.map_or(true, |k| k == cell.kind()) {
        voxels.push((p, cell));
      }
    });
    voxels.sort_unstable_by_key(|(p, _)| (p.z, p.y, p.x));

    let mut blocks = BlockMap::new();
    for &(pos, cell) in &voxels {
      self.neighbors.fill(map, pos, cell.kind(), &self.config);
      for offset in CORNER_OFFSETS {
        classify_corner(&self.neighbors, &self.config, pos, offset, &mut blocks);
      }
    }

    self.voxels = voxels;
    blocks
  }
}

/// Classify every filled voxel of `map` into one block map.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "blocks::compute_blocks"))]
pub fn compute_blocks<M: VoxelMap + ?Sized>(map: &M, config: &ClassificationConfig) -> BlockMap {
  let blocks = BlockPlanner::new(*config).plan(map);
  #[cfg(feature = "tracing")]
  tracing::debug!(blocks = blocks.len(), "planned blocks");
  blocks
}

/// Classify each `(material, shape)` kind separately.
///
/// Kinds never contend for a slot, so every kind gets a closed surface of
/// its own that the assembler can route to one sub-mesh.
#[cfg_attr(
  feature = "tracing",
  tracing::instrument(skip_all, name = "blocks::compute_material_blocks")
)]
pub fn compute_material_blocks<M: VoxelMap + ?Sized>(
  map: &M,
  config: &ClassificationConfig,
) -> BTreeMap<VoxelKind, BlockMap> {
  let mut kinds = Vec::new();
  map.for_each_filled(&mut |_, cell| kinds.push(cell.kind()));
  kinds.sort_unstable();
  kinds.dedup();

  let mut planner = BlockPlanner::new(*config);
  let result: BTreeMap<VoxelKind, BlockMap> = kinds
    .into_iter()
    .map(|kind| (kind, planner.plan_kind(map, kind)))
    .collect();
  #[cfg(feature = "tracing")]
  tracing::debug!(kinds = result.len(), "planned blocks per kind");
  result
}

/// One corner of one voxel with its relation counts.
struct Corner<'a> {
  neighbors: &'a NeighborBuffer,
  voxel: IVec3,
  /// Corner offset, each component ±1.
  offset: IVec3,
  same_edge: usize,
  /// `same_edge` plus the corner diagonal.
  same_edge2: usize,
  diagonal_same: bool,
}

impl Corner<'_> {
  #[inline]
  fn is_same(&self, offset: IVec3) -> bool {
    self.neighbors.is_same(offset)
  }

  #[inline]
  fn slot(&self) -> IVec3 {
    sub_voxel_index(self.voxel, self.offset)
  }

  /// Slot and corner of this spot as seen from the voxel across `normal`.
  #[inline]
  fn shifted(&self, normal: IVec3) -> (IVec3, IVec3) {
    let corner = self.offset - normal * 2;
    (sub_voxel_index(self.voxel + normal, corner), corner)
  }
}

/// Signed unit components of `v`, in axis order.
fn unit_components(v: IVec3) -> SmallVec<[(Axis, IVec3); 3]> {
  Axis::ALL
    .into_iter()
    .filter(|axis| v[axis.index()] != 0)
    .map(|axis| (axis, axis.unit() * v[axis.index()].signum()))
    .collect()
}

fn classify_corner(
  neighbors: &NeighborBuffer,
  config: &ClassificationConfig,
  voxel: IVec3,
  offset: IVec3,
  blocks: &mut BlockMap,
) {
  let faces = [
    neighbors.at(IVec3::new(offset.x, 0, 0)),
    neighbors.at(IVec3::new(0, offset.y, 0)),
    neighbors.at(IVec3::new(0, 0, offset.z)),
  ];
  let edges = [
    neighbors.at(IVec3::new(offset.x, offset.y, 0)),
    neighbors.at(IVec3::new(0, offset.y, offset.z)),
    neighbors.at(IVec3::new(offset.x, 0, offset.z)),
  ];
  let diagonal = neighbors.at(offset);

  let relations = || faces.iter().chain(edges.iter()).chain(std::iter::once(&diagonal));
  if !config.draw_between_different_types && relations().all(|n| n.is_filled()) {
    return;
  }
  if config.map_edge == MapEdgePolicy::Open && relations().all(|n| n.same_or_out()) {
    return;
  }

  let same_edge = edges.iter().filter(|n| n.is_same()).count();
  let diagonal_same = diagonal.is_same();
  let corner = Corner {
    neighbors,
    voxel,
    offset,
    same_edge,
    same_edge2: same_edge + diagonal_same as usize,
    diagonal_same,
  };

  let same_faces: SmallVec<[Axis; 3]> = Axis::ALL
    .into_iter()
    .filter(|axis| faces[axis.index()] == NeighborType::SameFilled)
    .collect();

  match same_faces.as_slice() {
    [] => plan_convex_corner(&corner, config, blocks),
    [axis] => plan_edge(&corner, *axis, config, blocks),
    [a, b] => {
      let open = Axis::ALL
        .into_iter()
        .find(|axis| axis != a && axis != b)
        .unwrap_or(Axis::X);
      plan_side(&corner, open, blocks);
    }
    _ => {
      if corner.same_edge == 0 {
        blocks.insert_if_absent(corner.slot(), Block::new(BlockType::CrossCorner, offset));
      }
    }
  }
}

/// No same faces. With edge merging, a corner that still touches a same
/// edge is also flagged as a break point at its own slot. Break points live
/// in their own set, so the slot keeps its `CornerPositive`.
fn plan_convex_corner(c: &Corner, config: &ClassificationConfig, blocks: &mut BlockMap) {
  blocks.insert_if_absent(c.slot(), Block::new(BlockType::CornerPositive, c.offset));
  if config.merge_close_edges && c.same_edge > 0 {
    blocks.mark_break_point(c.slot());
  }
}

/// Two same faces; `open` is the axis whose face neighbour differs.
fn plan_side(c: &Corner, open: Axis, blocks: &mut BlockMap) {
  let normal = open.unit() * c.offset[open.index()];

  if c.same_edge == 0 {
    blocks.insert_if_absent(
      c.slot(),
      Block::with_axis(BlockType::SideToNegativeEdge, open, c.offset),
    );
    return;
  }

  let in_plane = c.is_same(c.offset - normal);
  if c.same_edge2 == 1 && in_plane {
    blocks.insert_if_absent(c.slot(), Block::with_axis(BlockType::SidePositive, open, c.offset));
    return;
  }

  if c.same_edge == 3 || (c.same_edge == 2 && !in_plane) {
    let (slot, corner) = c.shifted(normal);
    blocks.insert_or_replace(slot, Block::new(BlockType::CornerNegative, corner));
    return;
  }

  if c.diagonal_same && (c.same_edge == 2 || (c.same_edge == 1 && !in_plane)) {
    let parts = unit_components(c.offset - normal);
    let &[(first_axis, first), (second_axis, _)] = parts.as_slice() else {
      return;
    };
    // The edge runs along the component whose cross-edge neighbour is open.
    let axis = if c.is_same(first + normal) {
      second_axis
    } else {
      first_axis
    };
    let (slot, corner) = c.shifted(normal);
    blocks.insert_if_absent(slot, Block::with_axis(BlockType::EdgeNegative, axis, corner));
  }
}

/// One same face along `axis`.
fn plan_edge(c: &Corner, axis: Axis, config: &ClassificationConfig, blocks: &mut BlockMap) {
  let mut normal = c.offset;
  normal[axis.index()] = 0;

  if c.same_edge == 0 {
    insert_edge_positive(c, axis, blocks);
    return;
  }

  let cross_edge = c.is_same(normal);
  if cross_edge && c.diagonal_same && (config.merge_close_edges || c.same_edge == 2) {
    let parts = unit_components(normal);
    let Some(&(_, shift)) = parts.first() else {
      return;
    };
    let (slot, corner) = c.shifted(shift);
    blocks.insert_if_absent(slot, Block::with_axis(BlockType::EdgeNegative, axis, corner));
    return;
  }

  if c.same_edge == 1 {
    if cross_edge {
      insert_edge_positive(c, axis, blocks);
    } else if c.diagonal_same {
      let along = axis.unit() * c.offset[axis.index()];
      let connecting = unit_components(normal)
        .into_iter()
        .find(|(_, part)| c.is_same(along + *part))
        .map(|(connecting, _)| connecting);
      if connecting == Some(axis.next()) {
        blocks.insert_if_absent(c.slot(), Block::with_axis(BlockType::EdgeToEdge, axis, c.offset));
      }
    }
    return;
  }

  if c.same_edge == 2 && c.diagonal_same && !cross_edge {
    blocks.insert_if_absent(
      c.slot(),
      Block::with_axis(BlockType::SideToPositiveEdge, axis, c.offset),
    );
  }
}

fn insert_edge_positive(c: &Corner, axis: Axis, blocks: &mut BlockMap) {
  let slot = c.slot();
  let block = Block::with_axis(BlockType::EdgePositive, axis, c.offset);
  #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
  let previous = blocks.insert_or_replace(slot, block);
  #[cfg(feature = "tracing")]
  if let Some(previous) = previous.filter(|p| *p != block) {
    tracing::warn!(
      ?slot,
      ?previous,
      voxel = ?c.voxel,
      "positive edge overwrote an occupied block slot"
    );
  }
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod planner_test;
