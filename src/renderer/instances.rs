//! Per-frame cube instances from game state
//!
//! There is no depth buffer: instances come out far-to-near and the cube
//! pipeline culls back faces, which is enough for a grid of disjoint cubes.

use glam::{Quat, Vec3};

use super::vertex::CubeInstance;
use crate::consts::PARTICLE_SIZE;
use crate::sim::GameState;

/// Voxel and particle cubes in world space, sorted far-to-near from `eye`
pub fn build_instances(state: &GameState, eye: Vec3) -> Vec<CubeInstance> {
    let spin = Quat::from_rotation_y(state.scene_yaw);
    let mut instances = Vec::with_capacity(state.world.len() + state.particles.len());

    if state.voxels_visible() {
        instances.extend(state.world.iter().map(|cell| CubeInstance {
            center: (spin * cell.position).to_array(),
            size: 1.0,
            color: cell.color.to_linear_rgb(),
            lit: 1.0,
        }));
    }

    instances.extend(state.particles.particles.iter().map(|p| CubeInstance {
        center: (spin * p.pos).to_array(),
        size: PARTICLE_SIZE,
        color: p.color.to_linear_rgb(),
        lit: 0.0,
    }));

    instances.sort_by(|a, b| {
        let da = Vec3::from_array(a.center).distance_squared(eye);
        let db = Vec3::from_array(b.center).distance_squared(eye);
        db.total_cmp(&da)
    });
    instances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hsl;
    use crate::consts::CAMERA_EYE;
    use crate::settings::Settings;
    use crate::sim::VoxelWorld;

    fn eye() -> Vec3 {
        Vec3::from_array(CAMERA_EYE)
    }

    fn small_state() -> GameState {
        let mut world = VoxelWorld::new();
        for z in [-3, 0, 3] {
            world.insert(
                (0, 0, z),
                Vec3::new(0.0, 0.0, z as f32),
                Hsl::new(120.0, 0.8, 0.5),
            );
        }
        GameState::with_world(1, world, &Settings::default())
    }

    #[test]
    fn test_sorted_far_to_near() {
        let state = small_state();
        let instances = build_instances(&state, eye());
        assert_eq!(instances.len(), 3);
        let dists: Vec<f32> = instances
            .iter()
            .map(|i| Vec3::from_array(i.center).distance(eye()))
            .collect();
        assert!(dists.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_spin_applied() {
        let mut state = small_state();
        state.scene_yaw = std::f32::consts::FRAC_PI_2;
        let instances = build_instances(&state, eye());
        // Local +Z rotates onto world +X
        assert!(
            instances
                .iter()
                .any(|i| (Vec3::from_array(i.center) - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5)
        );
    }

    #[test]
    fn test_voxels_hidden_while_suspended() {
        let mut state = small_state();
        state.trigger_rickroll();
        assert!(build_instances(&state, eye()).is_empty());
    }

    #[test]
    fn test_particles_are_small_and_unlit() {
        let mut state = small_state();
        let id = state.world.iter().next().map(|c| c.id).expect("has voxels");
        state.break_voxel(id, 0.0);

        let instances = build_instances(&state, eye());
        let debris: Vec<_> = instances.iter().filter(|i| i.lit == 0.0).collect();
        assert_eq!(debris.len(), 6);
        assert!(debris.iter().all(|i| i.size == PARTICLE_SIZE));
        assert_eq!(instances.len(), 2 + 6);
    }
}
