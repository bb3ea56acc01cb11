use axial_device::DeviceRegistry;

use super::{sign, Sample};
use crate::params::ControllerParams;
use crate::status::AxisStatus;

/// Reads one physical axis of a device and shapes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerAxis {
    params: ControllerParams,
}

impl ControllerAxis {
    pub fn new(params: ControllerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ControllerParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ControllerParams {
        &mut self.params
    }

    /// Transfer function: deadzone, sensitivity and inversion, then the
    /// power curve. Pure in `raw` and the parameters.
    pub fn process(&self, raw: f32) -> f32 {
        let p = &self.params;
        let mut v = if raw.abs() < p.deadzone {
            0.0
        } else {
            raw - sign(raw) * p.deadzone
        };
        v *= p.sensitivity * if p.invert { -1.0 } else { 1.0 };
        v = sign(v) * v.abs().powf(p.curvature);
        v.clamp(-1.0, 1.0)
    }

    /// `samples` points of the transfer curve, evenly spaced over `[-1, 1]`.
    pub fn curve(&self, samples: usize) -> Vec<(f32, f32)> {
        match samples {
            0 => Vec::new(),
            1 => vec![(0.0, self.process(0.0))],
            n => {
                let step = 2.0 / (n - 1) as f32;
                (0..n)
                    .map(|i| {
                        let x = (-1.0 + step * i as f32).min(1.0);
                        (x, self.process(x))
                    })
                    .collect()
            }
        }
    }

    fn recenter(&self, raw: f32) -> f32 {
        match self.params.recenter {
            Some([low, high]) if high > low => {
                ((raw - low) / (high - low) * 2.0 - 1.0).clamp(-1.0, 1.0)
            }
            _ => raw,
        }
    }

    pub(crate) fn sample(&self, devices: &DeviceRegistry) -> Sample {
        let raw = devices
            .get(&self.params.device)
            .filter(|d| d.is_connected())
            .and_then(|d| d.axis(usize::from(self.params.axis), self.params.smoothed));
        match raw {
            Some(raw) => {
                let input = self.recenter(raw);
                Sample::ok(input, self.process(input))
            }
            None => Sample::fault(AxisStatus::Disconnected),
        }
    }
}
