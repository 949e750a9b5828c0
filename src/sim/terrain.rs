//! Procedural terrain from a 2D noise field
//!
//! Each grid column samples the noise once; the sample maps to a stack of
//! 0..=3 cubes (noise -1 -> 0, noise 1 -> 4 only at the exact maximum).

use glam::Vec3;

use super::noise::NoiseSample;
use super::voxel::VoxelWorld;
use crate::Hsl;
use crate::consts::{GRID_SIZE, GRID_SPACING, NOISE_FREQUENCY};

/// Hue step per height layer (degrees)
const LAYER_HUE_STEP: f32 = 40.0;
const LAYER_SATURATION: f32 = 0.8;
const LAYER_LIGHTNESS: f32 = 0.5;

/// Terrain build parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainParams {
    /// Columns per side
    pub grid_size: u32,
    /// Distance between column centers
    pub spacing: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            spacing: GRID_SPACING,
        }
    }
}

/// Map a noise sample to a column height: `max(0, floor((n + 1) * 2))`
#[inline]
pub fn height_from_noise(n: f64) -> u32 {
    ((n + 1.0) * 2.0).floor().max(0.0) as u32
}

/// Color for a height layer
#[inline]
pub fn layer_color(y: u32) -> Hsl {
    Hsl::new(y as f32 * LAYER_HUE_STEP, LAYER_SATURATION, LAYER_LIGHTNESS)
}

/// Height of column (x, z) for a grid of the given size
pub fn column_height(x: u32, z: u32, grid_size: u32, noise: &impl NoiseSample) -> u32 {
    let size = grid_size as f64;
    let nx = x as f64 / size - 0.5;
    let nz = z as f64 / size - 0.5;
    height_from_noise(noise.sample(nx * NOISE_FREQUENCY, nz * NOISE_FREQUENCY))
}

/// Build the voxel world. Columns are visited x-major, then z, then bottom-up.
pub fn build_terrain(params: &TerrainParams, noise: &impl NoiseSample) -> VoxelWorld {
    let mut world = VoxelWorld::new();
    let half = params.grid_size as f32 / 2.0;

    for x in 0..params.grid_size {
        for z in 0..params.grid_size {
            let height = column_height(x, z, params.grid_size, noise);
            for y in 0..height {
                let position = Vec3::new(
                    (x as f32 - half) * params.spacing,
                    y as f32,
                    (z as f32 - half) * params.spacing,
                );
                world.insert((x as i32, y as i32, z as i32), position, layer_color(y));
            }
        }
    }

    log::debug!(
        "Built {}x{} terrain with {} voxels",
        params.grid_size,
        params.grid_size,
        world.len()
    );
    world
}

/// Column heights as rows of z for each x (used by the native preview)
pub fn height_map(params: &TerrainParams, noise: &impl NoiseSample) -> Vec<Vec<u32>> {
    (0..params.grid_size)
        .map(|x| {
            (0..params.grid_size)
                .map(|z| column_height(x, z, params.grid_size, noise))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::noise::SimplexField;
    use proptest::prelude::*;

    #[test]
    fn test_height_mapping() {
        assert_eq!(height_from_noise(-1.0), 0);
        assert_eq!(height_from_noise(-0.51), 0);
        assert_eq!(height_from_noise(-0.5), 1);
        assert_eq!(height_from_noise(0.0), 2);
        assert_eq!(height_from_noise(0.49), 2);
        assert_eq!(height_from_noise(0.5), 3);
        assert_eq!(height_from_noise(0.99), 3);
    }

    #[test]
    fn test_flat_noise_fills_every_column() {
        let params = TerrainParams {
            grid_size: 4,
            spacing: 1.0,
        };
        let world = build_terrain(&params, &|_x: f64, _z: f64| 0.0);
        assert_eq!(world.len(), 4 * 4 * 2);
    }

    #[test]
    fn test_holes_produce_no_cells() {
        let params = TerrainParams {
            grid_size: 5,
            spacing: 1.0,
        };
        let world = build_terrain(&params, &|_x: f64, _z: f64| -1.0);
        assert!(world.is_empty());
    }

    #[test]
    fn test_positions_and_colors() {
        let params = TerrainParams {
            grid_size: 2,
            spacing: 1.2,
        };
        let world = build_terrain(&params, &|_x: f64, _z: f64| 0.6);
        // Height 3 everywhere
        assert_eq!(world.len(), 2 * 2 * 3);

        let first = world.iter().next().expect("non-empty world");
        assert_eq!((first.grid_x, first.grid_y, first.grid_z), (0, 0, 0));
        assert!((first.position.x - (-1.2)).abs() < 1e-6);
        assert!((first.position.z - (-1.2)).abs() < 1e-6);
        assert_eq!(first.position.y, 0.0);

        for cell in world.iter() {
            assert_eq!(cell.color, layer_color(cell.grid_y as u32));
            assert_eq!(cell.color.h, cell.grid_y as f32 * 40.0);
            assert_eq!(cell.position.y, cell.grid_y as f32);
        }
    }

    #[test]
    fn test_generation_order_is_x_then_z_then_y() {
        let params = TerrainParams {
            grid_size: 2,
            spacing: 1.0,
        };
        let world = build_terrain(&params, &|_x: f64, _z: f64| 0.0);
        let order: Vec<(i32, i32, i32)> = world
            .iter()
            .map(|c| (c.grid_x, c.grid_y, c.grid_z))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, 0, 0),
                (0, 1, 0),
                (0, 0, 1),
                (0, 1, 1),
                (1, 0, 0),
                (1, 1, 0),
                (1, 0, 1),
                (1, 1, 1),
            ]
        );
    }

    #[test]
    fn test_noise_sampled_at_normalized_coords() {
        // Noise that records the column it was asked about via its output
        let params = TerrainParams {
            grid_size: 10,
            spacing: 1.0,
        };
        // x < 0 in noise space is column x < 5
        let world = build_terrain(&params, &|x: f64, _z: f64| if x < 0.0 { -1.0 } else { 0.0 });
        assert!(world.iter().all(|c| c.grid_x >= 5));
        assert_eq!(world.len(), 5 * 10 * 2);
    }

    #[test]
    fn test_simplex_terrain_is_deterministic() {
        let params = TerrainParams::default();
        let a = build_terrain(&params, &SimplexField::new(1234));
        let b = build_terrain(&params, &SimplexField::new(1234));
        assert_eq!(a.len(), b.len());
        for (ca, cb) in a.iter().zip(b.iter()) {
            assert_eq!(ca.position, cb.position);
            assert_eq!(ca.grid_y, cb.grid_y);
        }
    }

    #[test]
    fn test_no_two_cells_share_a_position() {
        let world = build_terrain(&TerrainParams::default(), &SimplexField::new(77));
        let mut seen = std::collections::HashSet::new();
        for cell in world.iter() {
            assert!(seen.insert((cell.grid_x, cell.grid_y, cell.grid_z)));
        }
    }

    proptest! {
        #[test]
        fn prop_column_counts_match_height(
            grid_size in 1u32..12,
            seed in any::<u32>(),
        ) {
            let params = TerrainParams { grid_size, spacing: 1.0 };
            let field = SimplexField::new(seed);
            let world = build_terrain(&params, &field);

            let mut counts = vec![0u32; (grid_size * grid_size) as usize];
            for cell in world.iter() {
                let height = column_height(cell.grid_x as u32, cell.grid_z as u32, grid_size, &field);
                prop_assert!(cell.grid_y >= 0);
                prop_assert!((cell.grid_y as u32) < height);
                counts[(cell.grid_x as u32 * grid_size + cell.grid_z as u32) as usize] += 1;
            }
            for x in 0..grid_size {
                for z in 0..grid_size {
                    let expected = column_height(x, z, grid_size, &field);
                    prop_assert_eq!(counts[(x * grid_size + z) as usize], expected);
                }
            }
        }

        #[test]
        fn prop_height_never_exceeds_four(n in -1.0f64..=1.0) {
            prop_assert!(height_from_noise(n) <= 4);
        }
    }
}
