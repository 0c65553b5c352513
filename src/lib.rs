//! Raging sea - animated water surface with a live-tunable shading model

pub mod camera;
pub mod cli;
pub mod clock;
pub mod color;
pub mod controls;
pub mod environment;
pub mod mesh;
pub mod noise;
pub mod params;
pub mod rendering;
pub mod waves;
