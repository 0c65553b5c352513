//! Orbit camera configuration.

/// Orbit controls parameters
#[derive(Debug, Clone)]
pub struct OrbitConfig {
    /// Initial eye position
    pub position: [f32; 3],

    /// Point the camera orbits around
    pub target: [f32; 3],

    /// Fraction of the remaining angular velocity applied each frame (0 = frozen, 1 = no damping)
    pub damping_factor: f32,

    /// Radians of rotation per pixel of mouse drag
    pub rotate_speed: f32,

    /// Distance scale per wheel line
    pub zoom_speed: f32,

    /// Closest allowed distance to the target
    pub min_distance: f32,

    /// Farthest allowed distance to the target
    pub max_distance: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            position: [1.2, 0.45, 12.02],
            target: [0.0, 0.0, 0.0],
            damping_factor: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.95,
            min_distance: 0.5,
            max_distance: 90.0,
        }
    }
}
