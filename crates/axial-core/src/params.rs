use axial_device::{ButtonId, DeviceId, ScreenAxis};
use serde::{Deserialize, Serialize};

/// Flat parameter record of an axis, tagged by axis type.
///
/// Two axes with equal records are interchangeable; the registry relies on
/// this to drop embedded duplicates of local axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AxisParams {
    Controller(ControllerParams),
    Key(KeyParams),
    Mouse(MouseParams),
    Chain(ChainParams),
    Custom(CustomParams),
}

impl AxisParams {
    pub fn type_name(&self) -> &'static str {
        match self {
            AxisParams::Controller(_) => "controller",
            AxisParams::Key(_) => "key",
            AxisParams::Mouse(_) => "mouse",
            AxisParams::Chain(_) => "chain",
            AxisParams::Custom(_) => "custom",
        }
    }
}

fn one() -> f32 {
    1.0
}

fn three() -> f32 {
    3.0
}

fn is_false(value: &bool) -> bool {
    !value
}

/// Physical device axis shaped by a transfer curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerParams {
    pub device: DeviceId,
    pub axis: u16,
    #[serde(default = "one")]
    pub sensitivity: f32,
    #[serde(default = "one")]
    pub curvature: f32,
    #[serde(default)]
    pub deadzone: f32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub invert: bool,
    /// Raw range `[low, high]` stretched onto `[-1, 1]` before shaping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recenter: Option<[f32; 2]>,
    /// Read the low-passed device value instead of the raw one.
    #[serde(default, skip_serializing_if = "is_false")]
    pub smoothed: bool,
}

impl ControllerParams {
    pub fn new(device: impl Into<DeviceId>, axis: u16) -> Self {
        Self {
            device: device.into(),
            axis,
            sensitivity: 1.0,
            curvature: 1.0,
            deadzone: 0.0,
            invert: false,
            recenter: None,
            smoothed: false,
        }
    }
}

/// Digital buttons integrated into an analog value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive: Option<ButtonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<ButtonId>,
    #[serde(default = "three")]
    pub sensitivity: f32,
    #[serde(default = "three")]
    pub gravity: f32,
    #[serde(default)]
    pub momentum: f32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub snap: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub raw: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub invert: bool,
}

impl Default for KeyParams {
    fn default() -> Self {
        Self {
            positive: None,
            negative: None,
            sensitivity: 3.0,
            gravity: 3.0,
            momentum: 0.0,
            snap: false,
            raw: false,
            invert: false,
        }
    }
}

/// Pointer position relative to a screen window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseParams {
    pub axis: ScreenAxis,
    /// Window center, `-1` at the low screen edge and `1` at the high one.
    #[serde(default)]
    pub center: f32,
    /// Window half-width as a fraction of half the screen.
    #[serde(default = "one")]
    pub range: f32,
}

impl MouseParams {
    pub fn new(axis: ScreenAxis) -> Self {
        Self {
            axis,
            center: 0.0,
            range: 1.0,
        }
    }
}

/// How a chain axis combines its two sub-axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainMethod {
    #[default]
    Sum,
    Multiply,
    Maximum,
    Minimum,
}

impl ChainMethod {
    pub fn combine(self, a: f32, b: f32) -> f32 {
        match self {
            ChainMethod::Sum => a + b,
            ChainMethod::Multiply => a * b,
            ChainMethod::Maximum => a.max(b),
            ChainMethod::Minimum => a.min(b),
        }
    }
}

/// Two other axes, referenced by name, combined into one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
    #[serde(default)]
    pub method: ChainMethod,
}

/// Value computed by the scripting collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomParams {
    /// Code run once when the simulation starts.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub init: String,
    /// Expression evaluated every tick.
    pub expression: String,
}
