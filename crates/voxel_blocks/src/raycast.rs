//! Voxel picking with a 3D DDA (Amanatides & Woo).
//!
//! Positions are in map units: voxel `p` occupies `[p, p + 1)` on every
//! axis. The ray is first clipped to the map box with a slab test, then
//! stepped one voxel boundary at a time:
//!
//! ```text
//!  t_max[a]   = ray distance to the next boundary on axis a
//!  t_delta[a] = ray distance between boundaries on axis a = 1 / |dir[a]|
//!
//!  loop:
//!    cell filled  → hit
//!    a = argmin t_max ; voxel[a] += step[a] ; t_max[a] += t_delta[a]
//! ```

use glam::{IVec3, Vec3};

use crate::map::VoxelMap;

/// First filled voxel along a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
  pub voxel: IVec3,
  /// Last empty in-map voxel crossed before the hit; where an attach edit
  /// would place a new cell. `None` when the ray enters the map already
  /// inside the hit voxel.
  pub previous: Option<IVec3>,
  /// Unit normal of the face the ray entered through, zero when the origin
  /// lies inside the hit voxel.
  pub normal: IVec3,
  /// Distance from the origin along the normalized direction.
  pub distance: f32,
  pub point: Vec3,
}

/// Clip a ray to the box `[min, max]`.
///
/// Returns the entry distance (clamped to zero), the exit distance and the
/// axis the ray entered through.
fn clip_to_box(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<(f32, f32, Option<usize>)> {
  let mut t_near = 0.0f32;
  let mut t_far = f32::INFINITY;
  let mut entry_axis = None;

  for i in 0..3 {
    if dir[i] == 0.0 {
      if origin[i] < min[i] || origin[i] > max[i] {
        return None;
      }
      continue;
    }
    let inv = 1.0 / dir[i];
    let (t0, t1) = {
      let a = (min[i] - origin[i]) * inv;
      let b = (max[i] - origin[i]) * inv;
      (a.min(b), a.max(b))
    };
    if t0 > t_near {
      t_near = t0;
      entry_axis = Some(i);
    }
    t_far = t_far.min(t1);
    if t_near > t_far {
      return None;
    }
  }
  Some((t_near, t_far, entry_axis))
}

/// Cast a ray through `map` and return the first filled voxel within
/// `max_distance`. A zero direction never hits.
pub fn raycast<M: VoxelMap + ?Sized>(
  map: &M,
  origin: Vec3,
  direction: Vec3,
  max_distance: f32,
) -> Option<RayHit> {
  let dir = direction.try_normalize()?;
  let size = map.size();
  let (t_enter, t_exit, entry_axis) = clip_to_box(origin, dir, Vec3::ZERO, size.as_vec3())?;
  if t_enter > max_distance {
    return None;
  }
  let t_end = t_exit.min(max_distance);

  let step = IVec3::new(
    (dir.x > 0.0) as i32 - (dir.x < 0.0) as i32,
    (dir.y > 0.0) as i32 - (dir.y < 0.0) as i32,
    (dir.z > 0.0) as i32 - (dir.z < 0.0) as i32,
  );
  let start = origin + dir * t_enter;
  let mut voxel = start.floor().as_ivec3().clamp(IVec3::ZERO, size - IVec3::ONE);

  let mut t_max = Vec3::INFINITY;
  let mut t_delta = Vec3::INFINITY;
  for i in 0..3 {
    if step[i] != 0 {
      let boundary = (voxel[i] + (step[i] > 0) as i32) as f32;
      t_max[i] = (boundary - origin[i]) / dir[i];
      t_delta[i] = 1.0 / dir[i].abs();
    }
  }

  let mut normal = IVec3::ZERO;
  if let Some(axis) = entry_axis {
    normal[axis] = -step[axis];
  }
  let mut t = t_enter;
  let mut previous = None;

  while map.contains(voxel) {
    if map.get(voxel).filled {
      return Some(RayHit {
        voxel,
        previous,
        normal,
        distance: t,
        point: origin + dir * t,
      });
    }
    previous = Some(voxel);

    let axis = if t_max.x <= t_max.y && t_max.x <= t_max.z {
      0
    } else if t_max.y <= t_max.z {
      1
    } else {
      2
    };
    t = t_max[axis];
    if t > t_end {
      break;
    }
    voxel[axis] += step[axis];
    t_max[axis] += t_delta[axis];
    normal = IVec3::ZERO;
    normal[axis] = -step[axis];
  }
  None
}

#[cfg(test)]
#[path = "raycast_test.rs"]
mod raycast_test;
