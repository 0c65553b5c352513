//! Wave displacement: closed-form swell plus layered noise chop.
//!
//! CPU reference of the vertex stage in `water.wgsl`. Surface coordinates are
//! the two horizontal axes of the undeformed plane; the result is a vertical
//! offset, which is also the elevation signal consumed by the color stage.

use crate::noise::GradientNoise;
use crate::params::WaterParams;

/// Upper bound on evaluated noise octaves, whatever `small_iterations` holds
pub const MAX_SMALL_ITERATIONS: u32 = 32;

/// Number of noise octaves actually evaluated
pub fn octave_count(p: &WaterParams) -> u32 {
    p.small_iterations.min(MAX_SMALL_ITERATIONS)
}

/// Large-scale sinusoidal swell at surface point `(x, y)`
pub fn big_wave_elevation(x: f32, y: f32, p: &WaterParams) -> f32 {
    let phase = p.elapsed_time_s() * p.big_waves_speed;
    (x * p.big_waves_frequency.x + phase).sin()
        * (y * p.big_waves_frequency.y + phase).sin()
        * p.big_waves_elevation
}

/// Fine chop contribution (always <= 0)
///
/// Octave `i` runs from 1 to `small_iterations` inclusive (capped at
/// [`MAX_SMALL_ITERATIONS`]): it samples noise at `i` times the base frequency
/// and subtracts the magnitude scaled by `1 / i`.
pub fn small_wave_elevation<N: GradientNoise + ?Sized>(
    x: f32,
    y: f32,
    p: &WaterParams,
    noise: &N,
) -> f32 {
    let t = p.elapsed_time_s() * p.small_waves_speed;
    let mut elevation = 0.0;

    for i in 1..=octave_count(p) {
        let octave = i as f32;
        let n = noise.sample(
            x * p.small_waves_frequency * octave,
            y * p.small_waves_frequency * octave,
            t,
        );
        elevation -= (n * p.small_waves_elevation / octave).abs();
    }

    elevation
}

/// Total elevation at surface point `(x, y)`
pub fn elevation<N: GradientNoise + ?Sized>(x: f32, y: f32, p: &WaterParams, noise: &N) -> f32 {
    big_wave_elevation(x, y, p) + small_wave_elevation(x, y, p, noise)
}

/// Displace a point of the horizontal plane; returns the moved position and its elevation
///
/// `position` is `[x, height, y]`: the plane lies in XZ with +Y up.
pub fn displace<N: GradientNoise + ?Sized>(
    position: [f32; 3],
    p: &WaterParams,
    noise: &N,
) -> ([f32; 3], f32) {
    let e = elevation(position[0], position[2], p, noise);
    ([position[0], position[1] + e, position[2]], e)
}
