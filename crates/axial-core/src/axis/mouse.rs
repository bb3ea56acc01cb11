use axial_device::Pointer;

use super::Sample;
use crate::params::MouseParams;
use crate::status::AxisStatus;

/// Maps the pointer position on one screen axis into `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseAxis {
    params: MouseParams,
}

impl MouseAxis {
    pub fn new(params: MouseParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MouseParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut MouseParams {
        &mut self.params
    }

    /// Output for a pointer coordinate on a screen of `screen` pixels.
    pub fn map(&self, position: f32, screen: f32) -> f32 {
        let half = screen / 2.0;
        let range_px = if self.params.range == 0.0 {
            1.0
        } else {
            half * self.params.range
        };
        let center_px = half + half * self.params.center;
        ((position - center_px) / range_px).clamp(-1.0, 1.0)
    }

    pub(crate) fn sample(&self, pointer: &Pointer) -> Sample {
        if !pointer.has_screen() {
            return Sample::fault(AxisStatus::Unavailable);
        }
        let position = pointer.coordinate(self.params.axis);
        let screen = pointer.screen_size(self.params.axis);
        Sample::ok(position, self.map(position, screen))
    }
}
