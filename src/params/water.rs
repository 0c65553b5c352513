//! Water shading parameters (the uniform set shared by the wave and color stages).

use glam::{Vec2, Vec3};

use crate::color;

/// Default depth tint, as a hex string so the panel can show it verbatim
pub const DEFAULT_DEPTH_COLOR: &str = "#337296";

/// Default surface tint
pub const DEFAULT_SURFACE_COLOR: &str = "#b99393";

/// Live water parameters read by the displacement and color functions.
///
/// Elapsed time is written only by [`crate::clock::FrameDriver::tick`] and is
/// read through [`WaterParams::elapsed_time_s`]; every other field is set once
/// from [`Default`] and afterwards changed only through explicit edits (see
/// [`crate::controls`]).
#[derive(Debug, Clone, PartialEq)]
pub struct WaterParams {
    /// Seconds since the scene started (monotonic, never decreases)
    pub(crate) elapsed_time_s: f32,

    // === Big waves (smooth sinusoidal swell) ===
    /// Swell height multiplier, range [0, 1]
    pub big_waves_elevation: f32,

    /// Spatial frequency along x and along the plane's second axis, each [0, 10]
    pub big_waves_frequency: Vec2,

    /// Phase speed of the swell, range [0, 4]
    pub big_waves_speed: f32,

    // === Small waves (layered noise chop) ===
    /// Chop height multiplier, range [0, 1]
    pub small_waves_elevation: f32,

    /// Base noise frequency, range [0, 30]
    pub small_waves_frequency: f32,

    /// Noise time scale, range [0, 4]
    pub small_waves_speed: f32,

    /// Number of noise octaves, range [0, 10]. 0 disables the chop layer.
    pub small_iterations: u32,

    // === Color gradient ===
    /// Added to the scaled elevation before clamping, range [0, 1]
    pub color_offset: f32,

    /// Elevation scale for the color mix, range [0, 10]
    pub color_multiplier: f32,

    /// Color at mix factor 0 (sRGB components in [0, 1])
    pub depth_color: Vec3,

    /// Color at mix factor 1 (sRGB components in [0, 1])
    pub surface_color: Vec3,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            elapsed_time_s: 0.0,

            big_waves_elevation: 0.2,
            big_waves_frequency: Vec2::new(10.0, 10.0),
            big_waves_speed: 0.5,

            small_waves_elevation: 0.984,
            small_waves_frequency: 30.0,
            small_waves_speed: 0.45,
            small_iterations: 4,

            color_offset: 0.08,
            color_multiplier: 1.336,
            depth_color: color::hex_to_rgb(DEFAULT_DEPTH_COLOR).unwrap_or(Vec3::ZERO),
            surface_color: color::hex_to_rgb(DEFAULT_SURFACE_COLOR).unwrap_or(Vec3::ONE),
        }
    }
}

impl WaterParams {
    /// Seconds since the scene started, as last published by the frame driver
    pub fn elapsed_time_s(&self) -> f32 {
        self.elapsed_time_s
    }

    /// Parameters with the fine noise layer switched off (pure swell)
    pub fn swell_only() -> Self {
        Self {
            small_iterations: 0,
            ..Self::default()
        }
    }

    /// Time period of the big-wave term, or `None` when the swell is frozen
    pub fn swell_period_s(&self) -> Option<f32> {
        if self.big_waves_speed == 0.0 {
            None
        } else {
            Some(std::f32::consts::TAU / self.big_waves_speed.abs())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scene_table() {
        let p = WaterParams::default();
        assert_eq!(p.elapsed_time_s(), 0.0);
        assert_eq!(p.big_waves_elevation, 0.2);
        assert_eq!(p.big_waves_frequency, Vec2::new(10.0, 10.0));
        assert_eq!(p.small_iterations, 4);
        assert_eq!(p.color_multiplier, 1.336);

        // #337296
        assert!((p.depth_color.x - 0x33 as f32 / 255.0).abs() < 1e-6);
        assert!((p.depth_color.y - 0x72 as f32 / 255.0).abs() < 1e-6);
        assert!((p.depth_color.z - 0x96 as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_swell_period() {
        let p = WaterParams::default();
        let period = p.swell_period_s().unwrap();
        assert!((period - 4.0 * std::f32::consts::PI).abs() < 1e-5);

        let frozen = WaterParams {
            big_waves_speed: 0.0,
            ..WaterParams::default()
        };
        assert_eq!(frozen.swell_period_s(), None);
    }
}
