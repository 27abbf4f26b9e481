//! Voxel cell value and its orientation payload.
//!
//! # Extra Data Layout
//!
//! ```text
//!  15                    6 5     3 2     0
//! ┌───────────────────────┬───────┬───────┐
//! │ shape payload (10 b)  │ flips │ perm  │
//! └───────────────────────┴───────┴───────┘
//! ```
//!
//! `perm` selects one of the six axis permutations and `flips` negates the
//! mapped local axes; together they name one of the 48 axis-aligned
//! orthogonal transforms. The shape payload is opaque to this crate and is
//! carried through every operation unchanged.

use glam::{IVec3, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{Axis, Direction, VoxelKind};

/// Side mask with every face closed.
pub const ALL_SIDES_CLOSED: u8 = 0b11_1111;

const TRANSFORM_MASK: u16 = 0b11_1111;

const PERMUTATIONS: [[Axis; 3]; 6] = [
  [Axis::X, Axis::Y, Axis::Z],
  [Axis::X, Axis::Z, Axis::Y],
  [Axis::Y, Axis::X, Axis::Z],
  [Axis::Y, Axis::Z, Axis::X],
  [Axis::Z, Axis::X, Axis::Y],
  [Axis::Z, Axis::Y, Axis::X],
];

/// Axis-aligned orthogonal transform from a cell's local frame to the map.
///
/// Local axis `i` maps onto map axis `axes[i]`, negated when bit `i` of
/// `flips` is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellTransform {
  axes: [Axis; 3],
  flips: u8,
}

impl Default for CellTransform {
  fn default() -> Self {
    Self::IDENTITY
  }
}

impl CellTransform {
  pub const IDENTITY: Self = Self {
    axes: [Axis::X, Axis::Y, Axis::Z],
    flips: 0,
  };

  /// Quarter turn about `axis`.
  ///
  /// With `b = axis.next()` and `c = b.next()`, the right-handed rotation
  /// (`left_hand_positive == false`) maps `b → c` and `c → -b`.
  pub fn rotation(axis: Axis, left_hand_positive: bool) -> Self {
    let b = axis.next();
    let c = b.next();
    let mut axes = [Axis::X; 3];
    axes[axis.index()] = axis;
    axes[b.index()] = c;
    axes[c.index()] = b;
    let negated = if left_hand_positive { b } else { c };
    Self {
      axes,
      flips: 1 << negated.index(),
    }
  }

  /// Cyclic axis relabeling sending X to `x_to` (Y and Z follow in order).
  pub fn cycle(x_to: Axis) -> Self {
    Self {
      axes: [x_to, x_to.next(), x_to.next().next()],
      flips: 0,
    }
  }

  /// Reflection across the plane orthogonal to `axis`.
  pub fn mirror(axis: Axis) -> Self {
    Self {
      flips: 1 << axis.index(),
      ..Self::IDENTITY
    }
  }

  #[inline]
  fn sign(&self, local: usize) -> i32 {
    if self.flips & (1 << local) != 0 {
      -1
    } else {
      1
    }
  }

  /// Map axis and sign that local axis `local` lands on.
  pub fn map_axis(&self, local: Axis) -> (Axis, i32) {
    (self.axes[local.index()], self.sign(local.index()))
  }

  /// Transform a local vector into the map frame.
  pub fn apply(&self, v: IVec3) -> IVec3 {
    let mut out = IVec3::ZERO;
    for i in 0..3 {
      out[self.axes[i].index()] += self.sign(i) * v[i];
    }
    out
  }

  pub fn apply_vec3(&self, v: Vec3) -> Vec3 {
    let mut out = Vec3::ZERO;
    for i in 0..3 {
      out[self.axes[i].index()] = self.sign(i) as f32 * v[i];
    }
    out
  }

  pub fn apply_direction(&self, dir: Direction) -> Direction {
    let (axis, sign) = self.map_axis(dir.axis());
    Direction::new(axis, sign * dir.sign() > 0)
  }

  /// `self` followed by `outer`.
  pub fn then(&self, outer: &CellTransform) -> CellTransform {
    let mut axes = [Axis::X; 3];
    let mut flips = 0u8;
    for i in 0..3 {
      let (axis, sign) = outer.map_axis(self.axes[i]);
      axes[i] = axis;
      if sign * self.sign(i) < 0 {
        flips |= 1 << i;
      }
    }
    CellTransform { axes, flips }
  }

  /// True when the transform reverses handedness.
  pub fn is_mirrored(&self) -> bool {
    let perm = self.permutation_index();
    // Indices 1, 2 and 5 are single swaps.
    let odd_permutation = matches!(perm, 1 | 2 | 5);
    let odd_flips = self.flips.count_ones() % 2 == 1;
    odd_permutation != odd_flips
  }

  fn permutation_index(&self) -> usize {
    PERMUTATIONS
      .iter()
      .position(|p| *p == self.axes)
      .unwrap_or(0)
  }

  /// Pack into the low six bits of `extra_data`.
  pub fn to_bits(&self) -> u16 {
    self.permutation_index() as u16 | ((self.flips as u16 & 0b111) << 3)
  }

  /// Decode from the low six bits of `extra_data`. Unused permutation codes
  /// decode as the identity permutation.
  pub fn from_bits(bits: u16) -> Self {
    let perm = (bits & 0b111) as usize;
    let axes = PERMUTATIONS.get(perm).copied().unwrap_or(PERMUTATIONS[0]);
    Self {
      axes,
      flips: ((bits >> 3) & 0b111) as u8,
    }
  }
}

/// State of one voxel.
///
/// Only filled cells carry meaning in `material_index`, `shape_id`,
/// `side_closed_mask` and `extra_data`; readers ignore them on empty cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoxelCell {
  pub filled: bool,
  pub material_index: u16,
  pub shape_id: u16,
  /// One bit per [`Direction`]; a set bit marks that face as solid for
  /// adjacency tests.
  pub side_closed_mask: u8,
  /// Orientation and shape payload, see the module docs.
  pub extra_data: u16,
}

impl VoxelCell {
  pub const EMPTY: Self = Self {
    filled: false,
    material_index: 0,
    shape_id: 0,
    side_closed_mask: 0,
    extra_data: 0,
  };

  /// A filled cell with every side closed and identity orientation.
  pub const fn filled(material_index: u16, shape_id: u16) -> Self {
    Self {
      filled: true,
      material_index,
      shape_id,
      side_closed_mask: ALL_SIDES_CLOSED,
      extra_data: 0,
    }
  }

  pub fn with_side_closed_mask(mut self, mask: u8) -> Self {
    self.side_closed_mask = mask & ALL_SIDES_CLOSED;
    self
  }

  pub fn with_extra_data(mut self, extra_data: u16) -> Self {
    self.extra_data = extra_data;
    self
  }

  pub fn with_transform(mut self, transform: CellTransform) -> Self {
    self.extra_data = (self.extra_data & !TRANSFORM_MASK) | transform.to_bits();
    self
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    !self.filled
  }

  pub fn kind(&self) -> VoxelKind {
    VoxelKind {
      material_index: self.material_index,
      shape_id: self.shape_id,
    }
  }

  pub fn transform(&self) -> CellTransform {
    CellTransform::from_bits(self.extra_data & TRANSFORM_MASK)
  }

  /// The shape-specific part of `extra_data`.
  pub fn shape_payload(&self) -> u16 {
    self.extra_data >> 6
  }

  #[inline]
  pub fn is_side_closed(&self, side: Direction) -> bool {
    self.side_closed_mask & side.bit() != 0
  }

  /// Re-orient a filled cell after its position went through `transform`.
  ///
  /// The orientation is composed with `transform` and the side mask follows
  /// the faces to their new directions. Empty cells are returned unchanged.
  pub fn transformed(&self, transform: &CellTransform) -> Self {
    if !self.filled {
      return *self;
    }
    let mut mask = 0u8;
    for side in Direction::ALL {
      if self.is_side_closed(side) {
        mask |= transform.apply_direction(side).bit();
      }
    }
    let orientation = self.transform().then(transform);
    Self {
      side_closed_mask: mask,
      ..self.with_transform(orientation)
    }
  }

  /// Lossless packing for hosts that persist cells.
  ///
  /// ```text
  /// bit 0       filled
  /// bits 1-16   material_index
  /// bits 17-32  shape_id
  /// bits 33-38  side_closed_mask
  /// bits 39-54  extra_data
  /// ```
  pub fn to_bits(&self) -> u64 {
    self.filled as u64
      | (self.material_index as u64) << 1
      | (self.shape_id as u64) << 17
      | ((self.side_closed_mask & ALL_SIDES_CLOSED) as u64) << 33
      | (self.extra_data as u64) << 39
  }

  pub fn from_bits(bits: u64) -> Self {
    Self {
      filled: bits & 1 != 0,
      material_index: (bits >> 1) as u16,
      shape_id: (bits >> 17) as u16,
      side_closed_mask: ((bits >> 33) as u8) & ALL_SIDES_CLOSED,
      extra_data: (bits >> 39) as u16,
    }
  }
}

#[cfg(test)]
#[path = "cell_test.rs"]
mod cell_test;
