//! 2D coherent noise field
//!
//! Terrain only ever asks for `sample(x, z)`, so anything deterministic with
//! output in [-1, 1] can stand in for the real simplex field (tests use
//! closures and constants).

use noise::{NoiseFn, Simplex};

/// A deterministic 2D noise function with output in [-1, 1]
pub trait NoiseSample {
    fn sample(&self, x: f64, z: f64) -> f64;
}

impl<F> NoiseSample for F
where
    F: Fn(f64, f64) -> f64,
{
    #[inline]
    fn sample(&self, x: f64, z: f64) -> f64 {
        self(x, z)
    }
}

/// Seeded simplex noise
pub struct SimplexField {
    simplex: Simplex,
}

impl SimplexField {
    pub fn new(seed: u32) -> Self {
        Self {
            simplex: Simplex::new(seed),
        }
    }
}

impl NoiseSample for SimplexField {
    #[inline]
    fn sample(&self, x: f64, z: f64) -> f64 {
        // Simplex overshoots by a hair near lattice extremes
        self.simplex.get([x, z]).clamp(-1.0, 1.0)
    }
}
