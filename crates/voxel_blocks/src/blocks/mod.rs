//! Sub-voxel block classification output.
//!
//! A [`Block`] describes the surface piece that fills one octant of a voxel.
//! Blocks are stored in a [`BlockMap`] keyed by the doubled-resolution slot
//! of that octant (see [`crate::constants::sub_voxel_index`]), so adjacent
//! voxels proposing geometry for the same spot land on the same key.
//!
//! # Module Structure
//!
//! - [`planner`]: `BlockPlanner`, `compute_blocks`, `compute_material_blocks`

pub mod planner;

pub use planner::{compute_blocks, compute_material_blocks, BlockPlanner};

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use glam::{IVec3, Vec3};

use crate::types::Axis;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Surface piece classes produced by the planner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BlockType {
  /// Flat face.
  SidePositive,
  /// Convex edge.
  EdgePositive,
  /// Convex corner.
  CornerPositive,
  /// Concave edge.
  EdgeNegative,
  /// Concave corner.
  CornerNegative,
  /// Flat face running into a convex edge.
  SideToPositiveEdge,
  /// Flat face running into a concave edge.
  SideToNegativeEdge,
  /// Corner where three faces meet inward.
  CrossCorner,
  /// Two convex edges touching diagonally.
  EdgeToEdge,
  /// Diagnostic marker, never meshed.
  BreakPoint,
}

impl BlockType {
  pub const ALL: [BlockType; 10] = [
    BlockType::SidePositive,
    BlockType::EdgePositive,
    BlockType::CornerPositive,
    BlockType::EdgeNegative,
    BlockType::CornerNegative,
    BlockType::SideToPositiveEdge,
    BlockType::SideToNegativeEdge,
    BlockType::CrossCorner,
    BlockType::EdgeToEdge,
    BlockType::BreakPoint,
  ];

  /// Whether blocks of this type are oriented along an axis.
  pub fn has_axis(self) -> bool {
    matches!(
      self,
      BlockType::SidePositive
        | BlockType::EdgePositive
        | BlockType::EdgeNegative
        | BlockType::SideToPositiveEdge
        | BlockType::SideToNegativeEdge
        | BlockType::EdgeToEdge
    )
  }

  /// Whether the assembler draws this type.
  pub fn is_meshed(self) -> bool {
    self != BlockType::BreakPoint
  }
}

/// One classified octant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Block {
  pub block_type: BlockType,
  /// Set exactly when `block_type.has_axis()`.
  pub axis: Option<Axis>,
  /// Octant of the owning voxel, each component ±1.
  pub corner: IVec3,
}

impl Block {
  pub fn new(block_type: BlockType, corner: IVec3) -> Self {
    debug_assert!(!block_type.has_axis(), "{block_type:?} needs an axis");
    Self {
      block_type,
      axis: None,
      corner,
    }
  }

  pub fn with_axis(block_type: BlockType, axis: Axis, corner: IVec3) -> Self {
    debug_assert!(block_type.has_axis(), "{block_type:?} takes no axis");
    Self {
      block_type,
      axis: Some(axis),
      corner,
    }
  }

  /// World-space centre of the octant at `slot` for a voxel of `voxel_size`.
  ///
  /// ```text
  /// center = slot * voxel_size / 2 + voxel_size / 4
  /// ```
  #[inline]
  pub fn center(slot: IVec3, voxel_size: Vec3) -> Vec3 {
    slot.as_vec3() * voxel_size * 0.5 + voxel_size * 0.25
  }
}

/// Classified blocks keyed by slot, plus diagnostic break points.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockMap {
  blocks: HashMap<IVec3, Block>,
  break_points: HashSet<IVec3>,
}

impl BlockMap {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.blocks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }

  pub fn get(&self, slot: IVec3) -> Option<&Block> {
    self.blocks.get(&slot)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&IVec3, &Block)> {
    self.blocks.iter()
  }

  /// Blocks ordered by slot (Z, then Y, then X).
  pub fn sorted(&self) -> Vec<(IVec3, Block)> {
    let mut entries: Vec<(IVec3, Block)> = self.blocks.iter().map(|(k, v)| (*k, *v)).collect();
    entries.sort_unstable_by_key(|(slot, _)| (slot.z, slot.y, slot.x));
    entries
  }

  /// First writer wins. Returns true if the block was stored.
  pub fn insert_if_absent(&mut self, slot: IVec3, block: Block) -> bool {
    match self.blocks.entry(slot) {
      Entry::Occupied(_) => false,
      Entry::Vacant(entry) => {
        entry.insert(block);
        true
      }
    }
  }

  /// Last writer wins. Returns the replaced block, if any.
  pub fn insert_or_replace(&mut self, slot: IVec3, block: Block) -> Option<Block> {
    self.blocks.insert(slot, block)
  }

  /// Flag `slot` as a break point. The slot is the corner's own sub-voxel
  /// slot, not a shifted one; any block stored there is left alone.
  pub fn mark_break_point(&mut self, slot: IVec3) {
    self.break_points.insert(slot);
  }

  /// Slots flagged as break points; these never hold geometry.
  pub fn break_points(&self) -> &HashSet<IVec3> {
    &self.break_points
  }

  /// Block count per type.
  pub fn count_by_type(&self) -> BTreeMap<BlockType, usize> {
    let mut counts = BTreeMap::new();
    for block in self.blocks.values() {
      *counts.entry(block.block_type).or_insert(0) += 1;
    }
    counts
  }

  pub fn count_of(&self, block_type: BlockType) -> usize {
    self.blocks.values().filter(|b| b.block_type == block_type).count()
  }
}
