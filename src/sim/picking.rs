//! Pointer picking: screen point -> world ray -> nearest voxel
//!
//! The scene spins about +Y, so rays are moved into scene-local space before
//! testing cubes. Rotation is rigid, which keeps hit distances unchanged.

use glam::{Mat4, Quat, Vec2, Vec3};

use super::voxel::{VoxelId, VoxelWorld};
use crate::consts::{CAMERA_EYE, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR};

/// Half extent of a voxel cube
const VOXEL_HALF_EXTENT: f32 = 0.5;

/// Primary mouse button
pub const PRIMARY_BUTTON: i16 = 0;

/// A ray with normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    /// Same ray expressed in a frame rotated by `yaw` about +Y
    pub fn into_scene_local(self, yaw: f32) -> Self {
        let inv = Quat::from_rotation_y(-yaw);
        Self {
            origin: inv * self.origin,
            dir: inv * self.dir,
        }
    }

    /// Entry distance into an axis-aligned box, if the ray hits it in front
    /// of the origin.
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.dir[axis];
            if d.abs() < f32::EPSILON {
                // Parallel to the slab: must already be inside it
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }
            let inv_d = 1.0 / d;
            let mut t0 = (min[axis] - o) * inv_d;
            let mut t1 = (max[axis] - o) * inv_d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }

        Some(t_min)
    }
}

/// Perspective camera looking at a fixed target
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::from_array(CAMERA_EYE),
            target: Vec3::ZERO,
            fov_y: CAMERA_FOV_DEG.to_radians(),
            aspect,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World-space ray from the eye through a normalized device coordinate
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_proj().inverse();
        let through = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray::new(self.eye, through - self.eye)
    }
}

/// A pointer-down event in client pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDown {
    pub button: i16,
    pub client_x: f32,
    pub client_y: f32,
}

impl PointerDown {
    /// Map client pixels to NDC (x right, y up, both in [-1, 1])
    pub fn to_ndc(&self, viewport_width: f32, viewport_height: f32) -> Vec2 {
        Vec2::new(
            (self.client_x / viewport_width) * 2.0 - 1.0,
            -(self.client_y / viewport_height) * 2.0 + 1.0,
        )
    }
}

/// Nearest voxel hit along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub id: VoxelId,
    pub distance: f32,
}

/// Find the nearest live voxel along a world-space ray.
///
/// `yaw` is the current scene rotation. Equal distances resolve to the cell
/// that comes first in generation order.
pub fn pick(ray: &Ray, world: &VoxelWorld, yaw: f32) -> Option<PickHit> {
    let local = ray.into_scene_local(yaw);
    let half = Vec3::splat(VOXEL_HALF_EXTENT);

    let mut best: Option<PickHit> = None;
    for cell in world.iter() {
        let Some(t) = local.intersect_aabb(cell.position - half, cell.position + half) else {
            continue;
        };
        if best.is_none_or(|b| t < b.distance) {
            best = Some(PickHit {
                id: cell.id,
                distance: t,
            });
        }
    }
    best
}
