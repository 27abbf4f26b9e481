//! Range edits and whole-map transforms written against [`VoxelMap`].
//!
//! Geometric transforms snapshot the current content, reallocate the map
//! through [`VoxelMap::reset`] and write the remapped cells back, so every
//! storage gets the same semantics from its primitive accessors.

use glam::IVec3;

use super::{check_size, VoxelGrid, VoxelMap};
use crate::cell::{CellTransform, VoxelCell};
use crate::error::{Result, VoxelError};
use crate::types::{Axis, Direction, EditAction};

/// New value of a cell under `action`, or `None` when the action does not
/// touch it.
pub fn apply_action(old: VoxelCell, action: EditAction, value: VoxelCell) -> Option<VoxelCell> {
  match action {
    EditAction::Overwrite => Some(value),
    EditAction::Attach => (!old.filled).then_some(value),
    EditAction::Erase => old.filled.then_some(VoxelCell::EMPTY),
    EditAction::Repaint => old.filled.then_some(VoxelCell {
      filled: true,
      ..value
    }),
    EditAction::RepaintMaterialOnly => old.filled.then_some(VoxelCell {
      material_index: value.material_index,
      ..old
    }),
    EditAction::RepaintShapeOnly => old.filled.then_some(VoxelCell {
      shape_id: value.shape_id,
      side_closed_mask: value.side_closed_mask,
      ..old
    }),
  }
}

/// Cell-by-cell range edit used by storages without a faster path.
pub fn set_range_cellwise<M: VoxelMap + ?Sized>(
  map: &mut M,
  min: IVec3,
  max: IVec3,
  action: EditAction,
  value: VoxelCell,
) -> bool {
  let Some(range) = super::IBox3::from_corners(min, max).intersection(&map.bounds()) else {
    return false;
  };

  let mut changed = false;
  for p in range.iter() {
    if let Some(new) = apply_action(map.get(p), action, value) {
      changed |= map.set(p, new);
    }
  }
  changed
}

fn collect_filled<M: VoxelMap + ?Sized>(map: &M) -> Vec<(IVec3, VoxelCell)> {
  let mut cells = Vec::new();
  map.for_each_filled(&mut |p, cell| cells.push((p, cell)));
  cells
}

/// Quarter turn about `axis`.
///
/// With `b = axis.next()` and `c = b.next()` the sizes along `b` and `c`
/// swap. The right-handed turn (`left_hand_positive == false`) maps
/// `b → c` and `c → -b`:
///
/// ```text
/// new[b] = size[c] - 1 - old[c]
/// new[c] = old[b]
/// ```
///
/// Each filled cell's orientation is composed with the same rotation.
pub fn turn<M: VoxelMap + ?Sized>(map: &mut M, axis: Axis, left_hand_positive: bool) {
  let size = map.size();
  let b = axis.next().index();
  let c = axis.next().next().index();

  let mut new_size = size;
  new_size[b] = size[c];
  new_size[c] = size[b];

  let rotation = CellTransform::rotation(axis, left_hand_positive);
  let cells = collect_filled(map);
  rebuild(map, new_size, cells.into_iter().map(|(p, cell)| {
    let mut q = p;
    if left_hand_positive {
      q[b] = p[c];
      q[c] = size[b] - 1 - p[b];
    } else {
      q[b] = size[c] - 1 - p[c];
      q[c] = p[b];
    }
    (q, cell.transformed(&rotation))
  }));
}

/// Reflection along `axis`: `new[a] = size[a] - 1 - old[a]`.
pub fn mirror<M: VoxelMap + ?Sized>(map: &mut M, axis: Axis) {
  let size = map.size();
  let a = axis.index();
  let reflection = CellTransform::mirror(axis);
  let cells = collect_filled(map);
  rebuild(map, size, cells.into_iter().map(|(p, cell)| {
    let mut q = p;
    q[a] = size[a] - 1 - p[a];
    (q, cell.transformed(&reflection))
  }));
}

fn rebuild<M, I>(map: &mut M, size: IVec3, cells: I)
where
  M: VoxelMap + ?Sized,
  I: Iterator<Item = (IVec3, VoxelCell)>,
{
  // The size came from a valid map with two components swapped, so the
  // reset cannot fail.
  if map.reset(size, VoxelCell::EMPTY).is_err() {
    return;
  }
  for (p, cell) in cells {
    map.set(p, cell);
  }
}

fn resized_length(size: IVec3, direction: Direction, steps: i32) -> Result<IVec3> {
  let a = direction.axis().index();
  let mut new_size = size;
  new_size[a] = size[a].checked_add(steps).unwrap_or(0);
  check_size(new_size).map_err(|_| {
    VoxelError::InvalidArgument(format!(
      "resizing {direction:?} by {steps} would leave {} cells on {:?}",
      new_size[a],
      direction.axis()
    ))
  })?;
  Ok(new_size)
}

/// Refill the map at `new_size`, reading each new cell's source from a
/// snapshot of the old content.
fn remap<M, F>(map: &mut M, new_size: IVec3, source: F) -> Result<()>
where
  M: VoxelMap + ?Sized,
  F: Fn(IVec3) -> Option<IVec3>,
{
  let snapshot = VoxelGrid::snapshot(&*map)?;
  map.reset(new_size, VoxelCell::EMPTY)?;
  for p in super::IBox3::from_size(new_size).iter() {
    if let Some(src) = source(p) {
      let cell = snapshot.get(src);
      if cell.filled {
        map.set(p, cell);
      }
    }
  }
  Ok(())
}

/// Stretch content along `direction`'s axis by `steps` cells (negative
/// shrinks), sampling the old extent nearest-neighbour.
///
/// ```text
/// positive direction: old = floor(n * old_len / new_len)
/// negative direction: old = old_len - 1 - floor((new_len - 1 - n) * old_len / new_len)
/// ```
pub fn resize<M: VoxelMap + ?Sized>(map: &mut M, direction: Direction, steps: i32) -> Result<()> {
  let size = map.size();
  let new_size = resized_length(size, direction, steps)?;
  let a = direction.axis().index();
  let old_len = size[a] as i64;
  let new_len = new_size[a] as i64;
  let positive = direction.is_positive();

  remap(map, new_size, |p| {
    let n = p[a] as i64;
    let mut src = p;
    src[a] = if positive {
      (n * old_len / new_len) as i32
    } else {
      (old_len - 1 - (new_len - 1 - n) * old_len / new_len) as i32
    };
    Some(src)
  })
}

/// Add (or crop, for negative `steps`) cells on the side `direction`
/// points to. Content stays put for positive directions and shifts by
/// `steps` for negative ones. New cells tile the old content when `repeat`
/// is set and are empty otherwise.
pub fn resize_canvas<M: VoxelMap + ?Sized>(
  map: &mut M,
  direction: Direction,
  steps: i32,
  repeat: bool,
) -> Result<()> {
  let size = map.size();
  let new_size = resized_length(size, direction, steps)?;
  let a = direction.axis().index();
  let old_len = size[a];
  let shift = if direction.is_positive() { 0 } else { steps };

  remap(map, new_size, |p| {
    let mut src = p;
    let s = p[a] - shift;
    src[a] = if (0..old_len).contains(&s) {
      s
    } else if repeat {
      s.rem_euclid(old_len)
    } else {
      return None;
    };
    Some(src)
  })
}

#[cfg(test)]
#[path = "edit_test.rs"]
mod edit_test;
