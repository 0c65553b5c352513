//! Window, projection and water plane geometry configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (scene units)
    pub near_plane: f32,

    /// Far clipping plane (scene units)
    pub far_plane: f32,

    /// Side length of the square water plane (scene units)
    pub plane_size: f32,

    /// Subdivisions per side of the water plane
    pub plane_segments: usize,

    /// Directory holding the six cube-map faces (px, nx, py, ny, pz, nz)
    pub environment_dir: PathBuf,

    /// Evaluate wave displacement on the CPU every frame instead of in the vertex shader
    pub cpu_waves: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 75.0,
            near_plane: 0.1,
            far_plane: 100.0,
            plane_size: 100.0,
            plane_segments: 128,
            environment_dir: PathBuf::from("assets/environments/lake"),
            cpu_waves: false,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}
