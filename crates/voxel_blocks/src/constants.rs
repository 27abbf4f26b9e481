//! Neighbourhood and sub-voxel layout constants.
//!
//! # Neighbourhood Layout
//!
//! Classification looks at the 3×3×3 block of voxels centred on the voxel
//! being visited. Offsets are in `{-1, 0, 1}³` and are stored X-minor:
//!
//! ```text
//! index = (dx + 1) + (dy + 1) * 3 + (dz + 1) * 9
//!
//! centre (0,0,0) = 13
//! ```
//!
//! # Sub-voxel Corners
//!
//! Each voxel is split into 2×2×2 octants. A corner is named by its offset
//! from the voxel centre, one of `{-1, 1}³`. The octant index uses the same
//! bit layout as octree children:
//!
//! ```text
//! Octant bits (binary: ZYX):
//!   0 = (-,-,-)    4 = (-,-,+)
//!   1 = (+,-,-)    5 = (+,-,+)
//!   2 = (-,+,-)    6 = (-,+,+)
//!   3 = (+,+,-)    7 = (+,+,+)
//! ```
//!
//! # Doubled Coordinates
//!
//! Octants are addressed at twice the grid resolution so that two adjacent
//! voxels name their touching octants with neighbouring keys:
//!
//! ```text
//! slot = voxel * 2 + (corner + 1) / 2
//!
//!  voxel 0        voxel 1
//! ┌─────┬─────┬─────┬─────┐
//! │  0  │  1  │  2  │  3  │   slots along one axis
//! └─────┴─────┴─────┴─────┘
//!   -1    +1    -1    +1      corner component
//! ```

use glam::IVec3;

/// Edge length of the classification neighbourhood.
pub const NEIGHBORHOOD: usize = 3;

/// Number of cells in the classification neighbourhood (3³).
pub const NEIGHBORHOOD_CB: usize = NEIGHBORHOOD * NEIGHBORHOOD * NEIGHBORHOOD;

/// Index of the centre cell in the neighbourhood.
pub const NEIGHBORHOOD_CENTER: usize = 13;

/// Corner offsets indexed by octant.
pub const CORNER_OFFSETS: [IVec3; 8] = [
  IVec3::new(-1, -1, -1),
  IVec3::new(1, -1, -1),
  IVec3::new(-1, 1, -1),
  IVec3::new(1, 1, -1),
  IVec3::new(-1, -1, 1),
  IVec3::new(1, -1, 1),
  IVec3::new(-1, 1, 1),
  IVec3::new(1, 1, 1),
];

/// Linear neighbourhood index of an offset in `{-1, 0, 1}³`.
#[inline(always)]
pub fn neighbor_index(offset: IVec3) -> usize {
  debug_assert!(
    offset.abs().max_element() <= 1,
    "neighbour offset out of range: {offset}"
  );
  ((offset.x + 1) + (offset.y + 1) * 3 + (offset.z + 1) * 9) as usize
}

/// Offset of a linear neighbourhood index.
#[inline(always)]
pub fn neighbor_offset(index: usize) -> IVec3 {
  let i = index as i32;
  IVec3::new(i % 3 - 1, (i / 3) % 3 - 1, i / 9 - 1)
}

/// Octant index of a corner offset.
#[inline(always)]
pub fn octant_of(corner: IVec3) -> u8 {
  (corner.x > 0) as u8 | (((corner.y > 0) as u8) << 1) | (((corner.z > 0) as u8) << 2)
}

/// Doubled-resolution key of a voxel's octant.
#[inline(always)]
pub fn sub_voxel_index(voxel: IVec3, corner: IVec3) -> IVec3 {
  voxel * 2 + (corner + IVec3::ONE) / 2
}

/// Voxel and corner owning a doubled-resolution key.
#[inline(always)]
pub fn slot_owner(slot: IVec3) -> (IVec3, IVec3) {
  let voxel = slot.div_euclid(IVec3::splat(2));
  let corner = slot.rem_euclid(IVec3::splat(2)) * 2 - IVec3::ONE;
  (voxel, corner)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
