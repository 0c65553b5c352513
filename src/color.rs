//! Elevation-to-color gradient and color conversions.

use glam::Vec3;
use thiserror::Error;

use crate::params::WaterParams;

/// Errors from parsing an external color representation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color '{0}' must be #rrggbb or #rgb")]
    BadLength(String),

    #[error("color '{0}' contains non-hex digits")]
    BadDigit(String),
}

/// Mix factor between depth color (0) and surface color (1)
pub fn color_mix(elevation: f32, p: &WaterParams) -> f32 {
    (elevation * p.color_multiplier + p.color_offset).clamp(0.0, 1.0)
}

/// Water color for a given elevation
pub fn surface_color(elevation: f32, p: &WaterParams) -> Vec3 {
    mix(p.depth_color, p.surface_color, color_mix(elevation, p))
}

/// GLSL-style `mix`; returns `a` exactly at 0 and `b` exactly at 1
pub fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Parse `#rrggbb` / `#rgb` (leading `#` optional) into components in [0, 1]
pub fn hex_to_rgb(hex: &str) -> Result<Vec3, ColorParseError> {
    let digits = hex.trim().trim_start_matches('#');

    let expanded: String = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => return Err(ColorParseError::BadLength(hex.to_string())),
    };

    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorParseError::BadDigit(hex.to_string()));
    }
    let value = u32::from_str_radix(&expanded, 16)
        .map_err(|_| ColorParseError::BadDigit(hex.to_string()))?;

    Ok(Vec3::new(
        ((value >> 16) & 0xff) as f32 / 255.0,
        ((value >> 8) & 0xff) as f32 / 255.0,
        (value & 0xff) as f32 / 255.0,
    ))
}

/// Format components in [0, 1] as `#rrggbb`
pub fn rgb_to_hex(rgb: Vec3) -> String {
    let c = (rgb.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    format!("#{:02x}{:02x}{:02x}", c.x as u8, c.y as u8, c.z as u8)
}

/// sRGB transfer function decode, applied before upload to an sRGB render target
pub fn srgb_to_linear(rgb: Vec3) -> Vec3 {
    fn channel(c: f32) -> f32 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    Vec3::new(channel(rgb.x), channel(rgb.y), channel(rgb.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_endpoints_are_exact() {
        let p = WaterParams::default();

        // Far below: mix clamps to 0
        assert_eq!(color_mix(-10.0, &p), 0.0);
        assert_eq!(surface_color(-10.0, &p), p.depth_color);

        // Far above: mix clamps to 1
        assert_eq!(color_mix(10.0, &p), 1.0);
        assert_eq!(surface_color(10.0, &p), p.surface_color);
    }

    #[test]
    fn test_mix_is_monotonic() {
        let p = WaterParams::default();
        let mut last = f32::NEG_INFINITY;
        for i in -100..=100 {
            let m = color_mix(i as f32 * 0.01, &p);
            assert!(m >= last);
            last = m;
        }
    }

    #[test]
    fn test_zero_multiplier_is_constant() {
        let p = WaterParams {
            color_multiplier: 0.0,
            color_offset: 0.25,
            ..WaterParams::default()
        };
        let expected = mix(p.depth_color, p.surface_color, 0.25);
        for e in [-3.0, -0.1, 0.0, 0.4, 7.0] {
            assert_eq!(surface_color(e, &p), expected);
        }
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(hex_to_rgb("#ffffff").unwrap(), Vec3::ONE);
        assert_eq!(hex_to_rgb("000000").unwrap(), Vec3::ZERO);
        assert_eq!(hex_to_rgb("#f00").unwrap(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(rgb_to_hex(hex_to_rgb("#9bd8ff").unwrap()), "#9bd8ff");

        assert!(matches!(
            hex_to_rgb("#12345"),
            Err(ColorParseError::BadLength(_))
        ));
        assert!(matches!(
            hex_to_rgb("#zzzzzz"),
            Err(ColorParseError::BadDigit(_))
        ));
    }

    #[test]
    fn test_srgb_decode() {
        assert_eq!(srgb_to_linear(Vec3::ZERO), Vec3::ZERO);
        let white = srgb_to_linear(Vec3::ONE);
        assert!((white - Vec3::ONE).abs().max_element() < 1e-6);
        // Mid grey is darker in linear space
        assert!(srgb_to_linear(Vec3::splat(0.5)).x < 0.25);
    }
}
