//! Named, range-annotated controls over [`WaterParams`] and the keyboard debug panel.
//!
//! Every tunable field is reachable through `edit(name, value)`. Edits apply
//! immediately; the next frame's evaluation sees the new value. Values outside a
//! control's range are accepted (they only look odd), the panel itself keeps
//! nudges inside the slider range.

use std::fmt;

use glam::Vec3;
use log::{info, warn};
use thiserror::Error;

use crate::color::{self, ColorParseError};
use crate::params::WaterParams;
use crate::waves;

/// Which parameter a control writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlId {
    BigWavesElevation,
    BigWavesFrequencyX,
    BigWavesFrequencyY,
    BigWavesSpeed,
    ColorOffset,
    ColorMultiplier,
    SmallWavesElevation,
    SmallWavesFrequency,
    SmallWavesSpeed,
    SmallIterations,
    DepthColor,
    SurfaceColor,
}

/// Widget shape of a control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    /// Continuous slider
    Slider { min: f32, max: f32, step: f32 },
    /// Integer slider (step 1)
    Integer { min: u32, max: u32 },
    /// Color picker
    Color,
}

/// A control as shown on the panel
#[derive(Debug, Clone, Copy)]
pub struct ControlSpec {
    pub name: &'static str,
    pub id: ControlId,
    pub kind: ControlKind,
}

const fn slider(name: &'static str, id: ControlId, min: f32, max: f32) -> ControlSpec {
    ControlSpec {
        name,
        id,
        kind: ControlKind::Slider {
            min,
            max,
            step: 0.001,
        },
    }
}

/// Panel controls, in display order
pub const CONTROLS: [ControlSpec; 12] = [
    slider("uBigElevation", ControlId::BigWavesElevation, 0.0, 1.0),
    slider("uBigFrequencyX", ControlId::BigWavesFrequencyX, 0.0, 10.0),
    slider("uBigFrequencyY", ControlId::BigWavesFrequencyY, 0.0, 10.0),
    slider("uBigSpeed", ControlId::BigWavesSpeed, 0.0, 4.0),
    slider("uColorOffset", ControlId::ColorOffset, 0.0, 1.0),
    slider("uColorMultiplier", ControlId::ColorMultiplier, 0.0, 10.0),
    slider("uSmallWavesElevation", ControlId::SmallWavesElevation, 0.0, 1.0),
    slider("uSmallWavesFrequency", ControlId::SmallWavesFrequency, 0.0, 30.0),
    slider("uSmallWavesSpeed", ControlId::SmallWavesSpeed, 0.0, 4.0),
    ControlSpec {
        name: "uSmallIterations",
        id: ControlId::SmallIterations,
        kind: ControlKind::Integer { min: 0, max: 10 },
    },
    ControlSpec {
        name: "depthColor",
        id: ControlId::DepthColor,
        kind: ControlKind::Color,
    },
    ControlSpec {
        name: "surfaceColor",
        id: ControlId::SurfaceColor,
        kind: ControlKind::Color,
    },
];

/// (depth, surface) color pairs the panel cycles through
pub const COLOR_PRESETS: [(&str, &str); 3] = [
    ("#186691", "#9bd8ff"),
    ("#981616", "#393232"),
    ("#337296", "#b99393"),
];

/// Look up a control by its panel name
pub fn find_control(name: &str) -> Option<&'static ControlSpec> {
    CONTROLS.iter().find(|c| c.name == name)
}

/// Value carried by an edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    Number(f32),
    Integer(u32),
    Color(Vec3),
}

impl fmt::Display for ControlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlValue::Number(v) => write!(f, "{:.3}", v),
            ControlValue::Integer(n) => write!(f, "{}", n),
            ControlValue::Color(rgb) => f.write_str(&color::rgb_to_hex(*rgb)),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("unknown control '{0}'")]
    UnknownControl(String),

    #[error("control '{name}' expects a {expected} value")]
    TypeMismatch {
        name: &'static str,
        expected: &'static str,
    },

    #[error(transparent)]
    InvalidColor(#[from] ColorParseError),
}

impl WaterParams {
    /// Current value of a control
    pub fn control_value(&self, id: ControlId) -> ControlValue {
        use ControlValue::{Color, Integer, Number};
        match id {
            ControlId::BigWavesElevation => Number(self.big_waves_elevation),
            ControlId::BigWavesFrequencyX => Number(self.big_waves_frequency.x),
            ControlId::BigWavesFrequencyY => Number(self.big_waves_frequency.y),
            ControlId::BigWavesSpeed => Number(self.big_waves_speed),
            ControlId::ColorOffset => Number(self.color_offset),
            ControlId::ColorMultiplier => Number(self.color_multiplier),
            ControlId::SmallWavesElevation => Number(self.small_waves_elevation),
            ControlId::SmallWavesFrequency => Number(self.small_waves_frequency),
            ControlId::SmallWavesSpeed => Number(self.small_waves_speed),
            ControlId::SmallIterations => Integer(self.small_iterations),
            ControlId::DepthColor => Color(self.depth_color),
            ControlId::SurfaceColor => Color(self.surface_color),
        }
    }

    /// Current value of a control, by panel name
    pub fn get(&self, name: &str) -> Result<ControlValue, EditError> {
        let spec = find_control(name).ok_or_else(|| EditError::UnknownControl(name.to_string()))?;
        Ok(self.control_value(spec.id))
    }

    /// Apply one edit by panel name
    pub fn edit(&mut self, name: &str, value: ControlValue) -> Result<(), EditError> {
        let spec = find_control(name).ok_or_else(|| EditError::UnknownControl(name.to_string()))?;
        self.apply(spec, value)
    }

    /// Apply a color edit given as a hex string (`#rrggbb`)
    pub fn edit_color_hex(&mut self, name: &str, hex: &str) -> Result<(), EditError> {
        let rgb = color::hex_to_rgb(hex)?;
        self.edit(name, ControlValue::Color(rgb))
    }

    fn apply(&mut self, spec: &ControlSpec, value: ControlValue) -> Result<(), EditError> {
        let mismatch = |expected| EditError::TypeMismatch {
            name: spec.name,
            expected,
        };

        match (spec.kind, value) {
            (ControlKind::Slider { min, max, .. }, ControlValue::Number(v)) => {
                if !(min..=max).contains(&v) {
                    warn!("{} = {} is outside [{}, {}]", spec.name, v, min, max);
                }
                let slot = self.scalar_mut(spec.id).ok_or_else(|| mismatch("numeric"))?;
                *slot = v;
            }
            (ControlKind::Slider { .. }, ControlValue::Integer(n)) => {
                return self.apply(spec, ControlValue::Number(n as f32));
            }
            (ControlKind::Integer { .. }, ControlValue::Number(v)) => {
                let n = v.round().clamp(0.0, waves::MAX_SMALL_ITERATIONS as f32) as u32;
                return self.apply(spec, ControlValue::Integer(n));
            }
            (ControlKind::Integer { min, max }, ControlValue::Integer(n)) => {
                if !(min..=max).contains(&n) {
                    warn!("{} = {} is outside [{}, {}]", spec.name, n, min, max);
                }
                self.small_iterations = n.min(waves::MAX_SMALL_ITERATIONS);
            }
            (ControlKind::Color, ControlValue::Color(rgb)) => match spec.id {
                ControlId::DepthColor => self.depth_color = rgb,
                _ => self.surface_color = rgb,
            },
            (ControlKind::Color, _) => return Err(mismatch("color")),
            (_, ControlValue::Color(_)) => return Err(mismatch("numeric")),
        }

        info!("{} = {}", spec.name, self.control_value(spec.id));
        Ok(())
    }

    fn scalar_mut(&mut self, id: ControlId) -> Option<&mut f32> {
        let slot = match id {
            ControlId::BigWavesElevation => &mut self.big_waves_elevation,
            ControlId::BigWavesFrequencyX => &mut self.big_waves_frequency.x,
            ControlId::BigWavesFrequencyY => &mut self.big_waves_frequency.y,
            ControlId::BigWavesSpeed => &mut self.big_waves_speed,
            ControlId::ColorOffset => &mut self.color_offset,
            ControlId::ColorMultiplier => &mut self.color_multiplier,
            ControlId::SmallWavesElevation => &mut self.small_waves_elevation,
            ControlId::SmallWavesFrequency => &mut self.small_waves_frequency,
            ControlId::SmallWavesSpeed => &mut self.small_waves_speed,
            ControlId::SmallIterations | ControlId::DepthColor | ControlId::SurfaceColor => {
                return None
            }
        };
        Some(slot)
    }
}

/// Keyboard-driven stand-in for a slider panel
#[derive(Debug, Clone)]
pub struct DebugPanel {
    open: bool,
    selected: usize,
}

impl DebugPanel {
    pub fn new(open: bool) -> Self {
        Self { open, selected: 0 }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn selected(&self) -> &'static ControlSpec {
        &CONTROLS[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % CONTROLS.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + CONTROLS.len() - 1) % CONTROLS.len();
    }

    /// Move the selected control by `steps` slider steps (or presets, for colors)
    pub fn nudge(&self, params: &mut WaterParams, steps: i32) -> Result<(), EditError> {
        let spec = self.selected();
        let value = match (spec.kind, params.control_value(spec.id)) {
            (ControlKind::Slider { min, max, step }, ControlValue::Number(v)) => {
                let snapped = ((v + steps as f32 * step) / step).round() * step;
                ControlValue::Number(snapped.clamp(min, max))
            }
            (ControlKind::Integer { min, max }, ControlValue::Integer(n)) => {
                let n = (n as i64 + steps as i64).clamp(min as i64, max as i64);
                ControlValue::Integer(n as u32)
            }
            (ControlKind::Color, ControlValue::Color(current)) => {
                ControlValue::Color(next_preset(spec.id, current, steps))
            }
            (_, other) => other,
        };
        params.apply(spec, value)
    }

    /// Restore the selected control to its startup value
    pub fn reset_selected(&self, params: &mut WaterParams) -> Result<(), EditError> {
        let spec = self.selected();
        let default = WaterParams::default().control_value(spec.id);
        params.apply(spec, default)
    }

    /// One-line summary of the selected control, e.g. for a window title
    pub fn status_line(&self, params: &WaterParams) -> String {
        let spec = self.selected();
        let value = params.control_value(spec.id);
        match spec.kind {
            ControlKind::Slider { min, max, .. } => {
                format!("{} = {} [{}, {}]", spec.name, value, min, max)
            }
            ControlKind::Integer { min, max } => {
                format!("{} = {} [{}, {}]", spec.name, value, min, max)
            }
            ControlKind::Color => format!("{} = {}", spec.name, value),
        }
    }
}

/// Preset after (or before) `current`; unknown colors start from the first preset
fn next_preset(id: ControlId, current: Vec3, steps: i32) -> Vec3 {
    let pick = |pair: &(&str, &str)| {
        let hex = if id == ControlId::DepthColor { pair.0 } else { pair.1 };
        color::hex_to_rgb(hex).unwrap_or(current)
    };

    let len = COLOR_PRESETS.len() as i32;
    let index = match COLOR_PRESETS
        .iter()
        .position(|p| color::rgb_to_hex(pick(p)) == color::rgb_to_hex(current))
    {
        Some(i) => (i as i32 + steps).rem_euclid(len),
        None => 0,
    };
    pick(&COLOR_PRESETS[index as usize])
}
