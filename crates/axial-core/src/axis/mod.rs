mod chain;
mod controller;
mod custom;
mod key;
mod mouse;

use axial_device::{DeviceRegistry, Inputs};

use crate::params::AxisParams;
use crate::script::ScriptEngine;
use crate::status::AxisStatus;

pub use chain::{ChainAxis, ChainSlot};
pub use controller::ControllerAxis;
pub use custom::CustomAxis;
pub use key::KeyAxis;
pub use mouse::MouseAxis;

/// Sign that maps zero to zero, unlike [`f32::signum`].
#[inline]
pub(crate) fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Result of evaluating one axis for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Sample {
    pub(crate) input: f32,
    /// `None` keeps the previous output.
    pub(crate) output: Option<f32>,
    pub(crate) status: AxisStatus,
}

impl Sample {
    pub(crate) fn ok(input: f32, output: f32) -> Self {
        Self {
            input,
            output: Some(output),
            status: AxisStatus::Ok,
        }
    }

    /// Fault that releases the axis to zero.
    pub(crate) fn fault(status: AxisStatus) -> Self {
        Self {
            input: 0.0,
            output: Some(0.0),
            status,
        }
    }

    /// Fault that keeps the last good output.
    pub(crate) fn frozen(status: AxisStatus) -> Self {
        Self {
            input: 0.0,
            output: None,
            status,
        }
    }
}

/// Per-type state and tuning of an axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisKind {
    Controller(ControllerAxis),
    Key(KeyAxis),
    Mouse(MouseAxis),
    Chain(ChainAxis),
    Custom(CustomAxis),
}

impl AxisKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            AxisKind::Controller(_) => "controller",
            AxisKind::Key(_) => "key",
            AxisKind::Mouse(_) => "mouse",
            AxisKind::Chain(_) => "chain",
            AxisKind::Custom(_) => "custom",
        }
    }
}

impl From<AxisParams> for AxisKind {
    fn from(params: AxisParams) -> Self {
        match params {
            AxisParams::Controller(p) => AxisKind::Controller(ControllerAxis::new(p)),
            AxisParams::Key(p) => AxisKind::Key(KeyAxis::new(p)),
            AxisParams::Mouse(p) => AxisKind::Mouse(MouseAxis::new(p)),
            AxisParams::Chain(p) => AxisKind::Chain(ChainAxis::new(p)),
            AxisParams::Custom(p) => AxisKind::Custom(CustomAxis::new(p)),
        }
    }
}

/// A named scalar signal in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    name: Box<str>,
    saveable: bool,
    kind: AxisKind,
    input: f32,
    output: f32,
    status: AxisStatus,
    disposed: bool,
}

impl Axis {
    /// New axis. It reports `NotRunning` until its first evaluation.
    pub fn new(name: impl Into<Box<str>>, kind: AxisKind) -> Self {
        Self {
            name: name.into(),
            saveable: true,
            kind,
            input: 0.0,
            output: 0.0,
            status: AxisStatus::NotRunning,
            disposed: false,
        }
    }

    pub fn from_params(name: impl Into<Box<str>>, params: AxisParams) -> Self {
        Self::new(name, params.into())
    }

    /// Axis that persistence skips.
    pub fn transient(name: impl Into<Box<str>>, kind: AxisKind) -> Self {
        Self {
            saveable: false,
            ..Self::new(name, kind)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_saveable(&self) -> bool {
        self.saveable
    }

    pub fn kind(&self) -> &AxisKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut AxisKind {
        &mut self.kind
    }

    pub fn params(&self) -> AxisParams {
        match &self.kind {
            AxisKind::Controller(a) => AxisParams::Controller(a.params().clone()),
            AxisKind::Key(a) => AxisParams::Key(a.params().clone()),
            AxisKind::Mouse(a) => AxisParams::Mouse(a.params().clone()),
            AxisKind::Chain(a) => AxisParams::Chain(a.params().clone()),
            AxisKind::Custom(a) => AxisParams::Custom(a.params().clone()),
        }
    }

    pub fn output_value(&self) -> f32 {
        self.output
    }

    pub fn input_value(&self) -> f32 {
        self.input
    }

    pub fn status(&self) -> AxisStatus {
        if self.disposed {
            AxisStatus::NotFound
        } else {
            self.status
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Stop the axis for good. Calling it again has no effect.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.output = 0.0;
        self.input = 0.0;
    }

    /// Zero integrator state ahead of a simulation run.
    pub(crate) fn reset(&mut self) {
        match &mut self.kind {
            AxisKind::Key(a) => a.reset(),
            AxisKind::Custom(a) => a.reset(),
            _ => {}
        }
        self.input = 0.0;
        self.output = 0.0;
        self.status = AxisStatus::NotRunning;
    }

    /// Leave the simulation. The last output is kept.
    pub(crate) fn halt(&mut self) {
        self.status = AxisStatus::NotRunning;
    }

    /// Recompute the binding status after a rebind without advancing any
    /// dynamics. Axes not yet evaluated stay `NotRunning`.
    pub(crate) fn refresh_bindings(&mut self, devices: &DeviceRegistry) {
        if self.disposed || self.status == AxisStatus::NotRunning {
            return;
        }
        let sample = match &self.kind {
            AxisKind::Controller(a) => a.sample(devices),
            AxisKind::Key(a) => Sample {
                input: self.input,
                output: None,
                status: if a.is_connected(devices) {
                    AxisStatus::Ok
                } else {
                    AxisStatus::Disconnected
                },
            },
            _ => return,
        };
        self.apply(sample);
    }

    /// Evaluate every kind but chains, which need the registry.
    pub(crate) fn update(
        &mut self,
        inputs: &Inputs,
        dt: f32,
        engine: Option<&mut Box<dyn ScriptEngine>>,
        running: bool,
    ) {
        if self.disposed {
            return;
        }
        let sample = match &mut self.kind {
            AxisKind::Controller(a) => a.sample(inputs.devices()),
            AxisKind::Key(a) => a.sample(inputs, dt),
            AxisKind::Mouse(a) => a.sample(inputs.pointer()),
            AxisKind::Custom(a) => a.sample(&self.name, engine, running),
            AxisKind::Chain(_) => return,
        };
        self.apply(sample);
    }

    pub(crate) fn apply(&mut self, sample: Sample) {
        if self.disposed {
            return;
        }
        self.input = sample.input;
        if let Some(output) = sample.output {
            self.output = output.clamp(-1.0, 1.0);
        }
        self.status = sample.status;
    }
}
