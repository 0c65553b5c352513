//! Environment cube map: six face images, or a generated sky when they are missing.

use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::Vec3;
use log::{info, warn};

use crate::color;

/// Face file stems in cube layer order (+X, -X, +Y, -Y, +Z, -Z)
pub const FACE_NAMES: [&str; 6] = ["px", "nx", "py", "ny", "pz", "nz"];

/// Edge length of the generated fallback faces (pixels)
pub const FALLBACK_FACE_SIZE: u32 = 64;

/// Square RGBA8 (sRGB) cube map held in memory before upload
#[derive(Debug, Clone)]
pub struct CubeMapImage {
    /// Edge length of every face (pixels)
    pub size: u32,
    /// One tightly packed RGBA8 buffer per face, in [`FACE_NAMES`] order
    pub faces: Vec<Vec<u8>>,
}

impl CubeMapImage {
    /// Load `px.png`, `nx.png`, ... from `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        let mut size = None;
        let mut faces = Vec::with_capacity(FACE_NAMES.len());

        for name in FACE_NAMES {
            let path = dir.join(format!("{}.png", name));
            let face = image::open(&path)
                .with_context(|| format!("loading cube face {}", path.display()))?
                .to_rgba8();

            if face.width() != face.height() {
                bail!(
                    "cube face {} is {}x{}, faces must be square",
                    path.display(),
                    face.width(),
                    face.height()
                );
            }
            match size {
                None => size = Some(face.width()),
                Some(s) if s != face.width() => {
                    bail!("cube face {} is {} px, expected {} px", path.display(), face.width(), s)
                }
                Some(_) => {}
            }

            faces.push(face.into_raw());
        }

        Ok(Self {
            size: size.unwrap_or(0),
            faces,
        })
    }

    /// Generated sky: zenith blue fading to a pale horizon, dark water tone below
    pub fn gradient(size: u32) -> Self {
        let size = size.max(1);
        let zenith = Vec3::new(0.33, 0.56, 0.80);
        let horizon = Vec3::new(0.82, 0.88, 0.92);
        let below = Vec3::new(0.16, 0.27, 0.33);

        let faces = (0..FACE_NAMES.len())
            .map(|face| {
                let mut pixels = Vec::with_capacity((size * size * 4) as usize);
                for row in 0..size {
                    for col in 0..size {
                        let u = 2.0 * (col as f32 + 0.5) / size as f32 - 1.0;
                        let v = 2.0 * (row as f32 + 0.5) / size as f32 - 1.0;
                        let up = face_direction(face, u, v).normalize().y;

                        let rgb = if up >= 0.0 {
                            color::mix(horizon, zenith, up.sqrt())
                        } else {
                            color::mix(horizon, below, (-up).sqrt())
                        };
                        let c = (rgb * 255.0).round();
                        pixels.extend_from_slice(&[c.x as u8, c.y as u8, c.z as u8, 255]);
                    }
                }
                pixels
            })
            .collect();

        Self { size, faces }
    }

    /// Load from `dir`, falling back to [`CubeMapImage::gradient`] with a warning
    pub fn load_or_gradient(dir: &Path) -> Self {
        match Self::load(dir) {
            Ok(cube) => {
                info!(
                    "Environment map: {} ({}x{} per face)",
                    dir.display(),
                    cube.size,
                    cube.size
                );
                cube
            }
            Err(e) => {
                warn!("{:#}; using generated sky", e);
                Self::gradient(FALLBACK_FACE_SIZE)
            }
        }
    }
}

/// Direction through texel `(u, v)` in [-1, 1]^2 of cube layer `face`
fn face_direction(face: usize, u: f32, v: f32) -> Vec3 {
    match face {
        0 => Vec3::new(1.0, -v, -u),
        1 => Vec3::new(-1.0, -v, u),
        2 => Vec3::new(u, 1.0, v),
        3 => Vec3::new(u, -1.0, -v),
        4 => Vec3::new(u, -v, 1.0),
        _ => Vec3::new(-u, -v, -1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_layout() {
        let cube = CubeMapImage::gradient(8);
        assert_eq!(cube.size, 8);
        assert_eq!(cube.faces.len(), 6);
        assert!(cube.faces.iter().all(|f| f.len() == 8 * 8 * 4));
    }

    #[test]
    fn test_gradient_sky_brighter_than_floor() {
        let cube = CubeMapImage::gradient(4);
        let brightness = |face: &Vec<u8>| face.iter().map(|&b| b as u32).sum::<u32>();
        // +Y (sky) against -Y (below the horizon)
        assert!(brightness(&cube.faces[2]) > brightness(&cube.faces[3]));
    }

    #[test]
    fn test_missing_directory_falls_back() {
        let dir = Path::new("definitely/not/a/real/environment");
        assert!(CubeMapImage::load(dir).is_err());

        let cube = CubeMapImage::load_or_gradient(dir);
        assert_eq!(cube.size, FALLBACK_FACE_SIZE);
    }

    #[test]
    fn test_load_faces_from_disk() {
        let dir = std::env::temp_dir().join(format!("ragingsea-cube-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in FACE_NAMES {
            let face = image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]));
            face.save(dir.join(format!("{}.png", name))).unwrap();
        }

        let cube = CubeMapImage::load(&dir).unwrap();
        assert_eq!(cube.size, 4);
        assert_eq!(&cube.faces[5][..4], &[10, 20, 30, 255]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
