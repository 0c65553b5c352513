//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::RenderConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ragingsea")]
#[command(about = "Animated water surface with live-tunable wave shading", long_about = None)]
pub struct Args {
    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 1280)]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 720)]
    pub height: u32,

    /// Water plane subdivisions per side
    #[arg(long, value_name = "COUNT", default_value_t = 128)]
    pub segments: usize,

    /// Directory with px/nx/py/ny/pz/nz.png cube faces
    #[arg(long, value_name = "DIR", default_value = "assets/environments/lake")]
    pub environment: PathBuf,

    /// Displace the water on the CPU instead of in the vertex shader
    #[arg(long)]
    pub cpu_waves: bool,

    /// Start with the debug panel open
    #[arg(long)]
    pub show_panel: bool,
}

impl Args {
    /// Build rendering configuration from defaults plus command-line overrides
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width.max(1),
            window_height: self.height.max(1),
            plane_segments: self.segments.max(1),
            environment_dir: self.environment.clone(),
            cpu_waves: self.cpu_waves,
            ..RenderConfig::default()
        }
    }
}
