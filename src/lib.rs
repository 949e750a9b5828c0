//! Voxel Dare - a destructible voxel terrain with a mischievous NPC
//!
//! Core modules:
//! - `sim`: Deterministic core (terrain, picking, particles, dialogue, playback)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser glue (asset fetch, canvas raster surface, clock)
//! - `audio`: Break sounds and the music element (WASM only)
//! - `settings`: Persisted preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{ParticleMotion, Settings};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Terrain grid is GRID_SIZE x GRID_SIZE columns
    pub const GRID_SIZE: u32 = 15;
    /// Horizontal distance between column centers
    pub const GRID_SPACING: f32 = 1.2;
    /// Noise coordinates are scaled by this before sampling
    pub const NOISE_FREQUENCY: f64 = 2.0;

    /// Debris cubes spawned per removed voxel
    pub const PARTICLE_COUNT: usize = 6;
    /// Edge length of a debris cube
    pub const PARTICLE_SIZE: f32 = 0.15;
    /// Displacement factor applied per animation tick (not scaled by dt)
    pub const PARTICLE_STEP: f32 = 0.03;
    /// Wall-clock lifetime of a debris cube (seconds)
    pub const PARTICLE_LIFETIME: f64 = 0.8;

    /// Delay between revealed characters (ms)
    pub const TYPE_DELAY_MS: f64 = 40.0;
    /// Pause after a fully typed message (ms)
    pub const MESSAGE_PAUSE_MS: f64 = 1000.0;
    /// Consecutive removals needed before the NPC loses patience
    pub const STREAK_THRESHOLD: u32 = 3;

    /// Text lines per ASCII frame
    pub const FRAME_LINES: usize = 36;
    /// ASCII frame interval (ms)
    pub const FRAME_INTERVAL_MS: f64 = 120.0;
    /// Asset fetched relative to the page path
    pub const ASCII_ASSET: &str = "rick.txt";

    /// Raster surface dimensions (pixels)
    pub const RASTER_WIDTH: u32 = 1024;
    pub const RASTER_HEIGHT: u32 = 512;
    /// Monospace font size (px) and baseline step between lines
    pub const RASTER_FONT_PX: f32 = 12.0;
    pub const RASTER_LINE_STEP: f32 = 14.0;
    /// Baseline of the first line
    pub const RASTER_ORIGIN: (f32, f32) = (10.0, 20.0);

    /// Scene rotation per animation frame (radians)
    pub const SCENE_SPIN: f32 = 0.0025;

    /// Perspective camera
    pub const CAMERA_FOV_DEG: f32 = 75.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;
    pub const CAMERA_EYE: [f32; 3] = [0.0, 10.0, 20.0];

    /// Directional light position (scene-local, aimed at the origin)
    pub const LIGHT_POSITION: [f32; 3] = [10.0, 20.0, 10.0];

    /// ASCII billboard size and center
    pub const BILLBOARD_SIZE: (f32, f32) = (30.0, 15.0);
    pub const BILLBOARD_CENTER: [f32; 3] = [0.0, 5.0, 0.0];

    /// ↑ ↑ ↓ ↓ ← → ← → B A
    pub const SECRET_SEQUENCE: [u32; 10] = [38, 38, 40, 40, 37, 39, 37, 39, 66, 65];
}

/// Color in HSL space (hue in degrees, saturation/lightness in 0..=1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Convert to sRGB components in 0..=1
    pub fn to_rgb(&self) -> [f32; 3] {
        let h = self.h.rem_euclid(360.0) / 360.0;
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);
        if s == 0.0 {
            return [l, l, l];
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        [
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        ]
    }

    /// Convert to linear RGB (what an sRGB render target expects)
    pub fn to_linear_rgb(&self) -> [f32; 3] {
        self.to_rgb().map(srgb_to_linear)
    }
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// sRGB transfer function inverse
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(approx(Hsl::new(0.0, 1.0, 0.5).to_rgb(), [1.0, 0.0, 0.0]));
        assert!(approx(Hsl::new(120.0, 1.0, 0.5).to_rgb(), [0.0, 1.0, 0.0]));
        assert!(approx(Hsl::new(240.0, 1.0, 0.5).to_rgb(), [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_hsl_terrain_layer_colors() {
        // hsl(40, 80%, 50%) is an orange-yellow
        let rgb = Hsl::new(40.0, 0.8, 0.5).to_rgb();
        assert!(approx(rgb, [0.9, 0.6333, 0.1]));
        // Hue wraps
        assert!(approx(
            Hsl::new(400.0, 0.8, 0.5).to_rgb(),
            Hsl::new(40.0, 0.8, 0.5).to_rgb()
        ));
    }

    #[test]
    fn test_hsl_gray() {
        assert!(approx(Hsl::new(200.0, 0.0, 0.3).to_rgb(), [0.3, 0.3, 0.3]));
    }
}
