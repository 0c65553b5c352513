//! Parameter definitions with documented ranges and semantics.
//!
//! All scene constants are collected here:
//! - Water shading uniforms (tunable at runtime through the debug panel)
//! - Window, projection and plane geometry
//! - Orbit camera behavior

mod camera;
mod render;
mod water;

// Re-export all types
pub use camera::OrbitConfig;
pub use render::RenderConfig;
pub use water::{WaterParams, DEFAULT_DEPTH_COLOR, DEFAULT_SURFACE_COLOR};
