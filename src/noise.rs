//! Gradient noise used by the small-wave layer.
//!
//! The wave function only needs "3 reals in, 1 real in roughly [-1, 1] out", so
//! noise is a trait and any `noise::NoiseFn<f64, 3>` plugs in. The GPU side uses
//! a classic Perlin port in `water.wgsl`; the two need not agree bit for bit.

use noise::{NoiseFn, Perlin};

/// Smooth deterministic 3D noise with output in approximately [-1, 1]
pub trait GradientNoise {
    fn sample(&self, x: f32, y: f32, z: f32) -> f32;
}

impl<T: NoiseFn<f64, 3>> GradientNoise for T {
    fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        self.get([x as f64, y as f64, z as f64]) as f32
    }
}

/// Noise generator for the water surface
pub struct WaveNoise {
    perlin: Perlin,
}

impl WaveNoise {
    /// Create new noise generator with seed
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }
}

impl Default for WaveNoise {
    fn default() -> Self {
        Self::new(0)
    }
}

impl GradientNoise for WaveNoise {
    fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        self.perlin.sample(x, y, z)
    }
}
