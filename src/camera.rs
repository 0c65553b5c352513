//! Orbit camera with damped rotation around a target.

use glam::{Mat4, Vec3};

use crate::params::{OrbitConfig, RenderConfig};

/// Keeps the camera off the poles, where look-at degenerates
const POLE_EPSILON: f32 = 1e-3;

/// Matrices for one frame
#[derive(Debug, Clone, Copy)]
pub struct CameraMatrices {
    pub view_proj: Mat4,
    /// Inverse of projection * rotation-only view, for background rays
    pub sky_inv_view_proj: Mat4,
    pub eye: Vec3,
}

/// Orbit controls: drag rotates around the target, wheel zooms, motion eases out
pub struct OrbitCamera {
    config: OrbitConfig,
    target: Vec3,

    // Spherical coordinates of eye relative to target (phi measured from +Y)
    radius: f32,
    theta: f32,
    phi: f32,

    // Pending rotation, consumed gradually by `update`
    delta_theta: f32,
    delta_phi: f32,
    pending_scale: f32,

    dragging: bool,
    last_cursor: Option<(f64, f64)>,
}

impl OrbitCamera {
    pub fn new(config: OrbitConfig) -> Self {
        let target = Vec3::from_array(config.target);
        let offset = Vec3::from_array(config.position) - target;
        let radius = offset.length().max(config.min_distance);

        Self {
            target,
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            delta_theta: 0.0,
            delta_phi: 0.0,
            pending_scale: 1.0,
            dragging: false,
            last_cursor: None,
            config,
        }
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Feed a cursor position (physical pixels); rotates while dragging
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        if let (true, Some((last_x, last_y))) = (self.dragging, self.last_cursor) {
            self.rotate((x - last_x) as f32, (y - last_y) as f32);
        }
        self.last_cursor = Some((x, y));
    }

    /// Queue a rotation in pixels of drag
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.delta_theta -= dx * self.config.rotate_speed;
        self.delta_phi -= dy * self.config.rotate_speed;
    }

    /// Zoom by wheel lines (positive = closer)
    pub fn zoom(&mut self, lines: f32) {
        self.pending_scale *= self.config.zoom_speed.powf(lines);
    }

    /// Advance damping by one frame
    pub fn update(&mut self) {
        let damping = self.config.damping_factor;

        self.theta += self.delta_theta * damping;
        self.phi = (self.phi + self.delta_phi * damping)
            .clamp(POLE_EPSILON, std::f32::consts::PI - POLE_EPSILON);
        self.radius = (self.radius * self.pending_scale)
            .clamp(self.config.min_distance, self.config.max_distance);

        self.delta_theta *= 1.0 - damping;
        self.delta_phi *= 1.0 - damping;
        self.pending_scale = 1.0;
    }

    pub fn eye(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }

    /// Build view-projection matrices for rendering
    pub fn matrices(&self, render_config: &RenderConfig, aspect: f32) -> CameraMatrices {
        let eye = self.eye();

        // Always keep Y as up vector (camera never rolls)
        let view = Mat4::look_at_rh(eye, self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            aspect,
            render_config.near_plane,
            render_config.far_plane,
        );

        let rotation_only = Mat4::look_at_rh(Vec3::ZERO, self.target - eye, Vec3::Y);

        CameraMatrices {
            view_proj: proj * view,
            sky_inv_view_proj: (proj * rotation_only).inverse(),
            eye,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_configured_position() {
        let config = OrbitConfig::default();
        let camera = OrbitCamera::new(config.clone());
        let eye = camera.eye();
        let expected = Vec3::from_array(config.position);
        assert!((eye - expected).length() < 1e-4, "{:?}", eye);
    }

    #[test]
    fn test_rotation_eases_out() {
        let mut camera = OrbitCamera::new(OrbitConfig::default());
        let start = camera.eye();
        camera.rotate(200.0, 0.0);

        camera.update();
        let first_step = (camera.eye() - start).length();
        assert!(first_step > 0.0);

        let before = camera.eye();
        camera.update();
        let second_step = (camera.eye() - before).length();
        assert!(second_step < first_step);
    }

    #[test]
    fn test_distance_preserved_by_rotation() {
        let mut camera = OrbitCamera::new(OrbitConfig::default());
        let radius = camera.eye().length();
        camera.rotate(-50.0, 30.0);
        for _ in 0..20 {
            camera.update();
        }
        assert!((camera.eye().length() - radius).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let config = OrbitConfig::default();
        let mut camera = OrbitCamera::new(config.clone());
        camera.zoom(1000.0);
        camera.update();
        assert!((camera.eye().length() - config.min_distance).abs() < 1e-4);
    }

    #[test]
    fn test_drag_requires_button() {
        let mut camera = OrbitCamera::new(OrbitConfig::default());
        let start = camera.eye();
        camera.cursor_moved(0.0, 0.0);
        camera.cursor_moved(300.0, 0.0);
        camera.update();
        assert_eq!(camera.eye(), start);

        camera.set_dragging(true);
        camera.cursor_moved(600.0, 0.0);
        camera.update();
        assert_ne!(camera.eye(), start);
    }

    #[test]
    fn test_matrices_are_finite() {
        let camera = OrbitCamera::new(OrbitConfig::default());
        let render_config = RenderConfig::default();
        let m = camera.matrices(&render_config, render_config.aspect_ratio());

        assert_ne!(m.view_proj, Mat4::IDENTITY);
        assert!(m.view_proj.is_finite());
        assert!(m.sky_inv_view_proj.is_finite());
    }
}
