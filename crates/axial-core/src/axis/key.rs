use axial_device::{ButtonId, DeviceRegistry, Inputs, LogicalButton};

use super::{sign, Sample};
use crate::params::KeyParams;
use crate::status::AxisStatus;

/// Integrates up to two digital buttons into a value with inertia.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyAxis {
    params: KeyParams,
    speed: f32,
    output: f32,
    last_output: f32,
}

impl KeyAxis {
    pub fn new(params: KeyParams) -> Self {
        Self {
            params,
            speed: 0.0,
            output: 0.0,
            last_output: 0.0,
        }
    }

    pub fn params(&self) -> &KeyParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut KeyParams {
        &mut self.params
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Whether every bound button resolves to a live input.
    pub fn is_connected(&self, devices: &DeviceRegistry) -> bool {
        [&self.params.positive, &self.params.negative]
            .into_iter()
            .flatten()
            .all(|id| devices.is_button_connected(id))
    }

    pub(crate) fn reset(&mut self) {
        self.speed = 0.0;
        self.output = 0.0;
        self.last_output = 0.0;
    }

    /// One integrator step for a button input in `[-1, 1]`.
    pub fn step(&mut self, input: f32, dt: f32) -> f32 {
        let p = &self.params;
        let input = if p.invert { -input } else { input };

        if p.raw {
            self.output = input;
            return self.output;
        }

        let gravity_force = if self.output > 0.0 {
            -p.gravity
        } else {
            p.gravity
        };
        let force = input * p.sensitivity + (1.0 - input.abs()) * gravity_force;

        if p.momentum == 0.0 {
            self.speed = force;
        } else {
            self.speed += force * dt / p.momentum;
        }

        self.output = (self.output + self.speed * dt).clamp(-1.0, 1.0);

        if p.snap && (self.output - input).abs() > 1.0 {
            self.speed = 0.0;
            self.output = 0.0;
        }

        if input == 0.0 && p.gravity != 0.0 && sign(self.last_output) != sign(self.output) {
            self.speed = 0.0;
            self.output = 0.0;
        }

        self.last_output = self.output;
        if self.output.abs() == 1.0 {
            self.speed = 0.0;
        }

        self.output
    }

    pub(crate) fn sample(&mut self, inputs: &Inputs, dt: f32) -> Sample {
        let mut connected = true;
        let mut read = |binding: Option<&ButtonId>| match binding {
            Some(id) => {
                let button = inputs.button(id);
                connected &= button.connected();
                button.value()
            }
            None => 0.0,
        };
        let input = read(self.params.positive.as_ref()) - read(self.params.negative.as_ref());

        let output = self.step(input, dt);
        Sample {
            input,
            output: Some(output),
            status: if connected {
                AxisStatus::Ok
            } else {
                AxisStatus::Disconnected
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axial_device::{KeyCode, RawEvent};

    fn linear() -> KeyAxis {
        KeyAxis::new(KeyParams {
            sensitivity: 1.0,
            gravity: 0.0,
            momentum: 0.0,
            ..KeyParams::default()
        })
    }

    #[test]
    fn single_step_moves_by_dt() {
        for dt in [0.016, 0.5, 2.0] {
            let mut axis = linear();
            assert_eq!(axis.step(1.0, dt), dt.clamp(-1.0, 1.0));
        }
    }

    #[test]
    fn reaching_full_scale_stops_the_integrator() {
        let mut axis = linear();
        axis.step(1.0, 2.0);
        assert_eq!(axis.speed(), 0.0);
    }

    #[test]
    fn momentum_accelerates_gradually() {
        let mut axis = KeyAxis::new(KeyParams {
            sensitivity: 1.0,
            gravity: 0.0,
            momentum: 1.0,
            ..KeyParams::default()
        });
        // speed = 0.1, output = 0.01
        assert!((axis.step(1.0, 0.1) - 0.01).abs() < 1e-6);
        // speed = 0.2, output = 0.03
        assert!((axis.step(1.0, 0.1) - 0.03).abs() < 1e-6);
    }

    #[test]
    fn raw_follows_input_directly() {
        let mut axis = KeyAxis::new(KeyParams {
            raw: true,
            invert: true,
            ..KeyParams::default()
        });
        assert_eq!(axis.step(1.0, 0.01), -1.0);
        assert_eq!(axis.step(0.0, 0.01), 0.0);
    }

    #[test]
    fn snap_zeroes_on_direction_reversal() {
        let mut axis = KeyAxis::new(KeyParams {
            sensitivity: 1.0,
            gravity: 0.0,
            snap: true,
            ..KeyParams::default()
        });
        axis.step(1.0, 0.5);
        // 0.5 - 0.5 = 0.0 is not farther than 1 from -1.
        assert_eq!(axis.step(-1.0, 0.5), 0.0);

        let mut axis = KeyAxis::new(KeyParams {
            sensitivity: 1.0,
            gravity: 0.0,
            snap: true,
            ..KeyParams::default()
        });
        axis.step(1.0, 0.5);
        // 0.5 - 0.1 = 0.4 is 1.4 away from -1: snapped.
        assert_eq!(axis.step(-1.0, 0.1), 0.0);
        assert_eq!(axis.speed(), 0.0);
    }

    // Characterization: with no input, gravity pulls the value back and the
    // step that crosses zero lands exactly on zero.
    #[test]
    fn gravity_return_stops_at_zero_crossing() {
        let mut axis = KeyAxis::new(KeyParams {
            sensitivity: 1.0,
            gravity: 1.0,
            ..KeyParams::default()
        });
        axis.step(1.0, 0.5);
        assert!((axis.step(0.0, 0.2) - 0.3).abs() < 1e-6);
        assert!((axis.step(0.0, 0.2) - 0.1).abs() < 1e-6);
        assert_eq!(axis.step(0.0, 0.2), 0.0);
        assert_eq!(axis.speed(), 0.0);

        // At rest, gravity pushes up from zero and the crossing rule pins it.
        assert_eq!(axis.step(0.0, 0.2), 0.0);
        assert_eq!(axis.step(0.0, 0.2), 0.0);
    }

    #[test]
    fn negative_key_drives_the_axis_down() {
        let mut axis = KeyAxis::new(KeyParams {
            positive: Some("key:d".parse().unwrap()),
            negative: Some("key:a".parse().unwrap()),
            ..KeyParams::default()
        });
        let mut inputs = Inputs::new();
        inputs.apply([RawEvent::KeyDown(KeyCode::Char('a'))]);
        let sample = axis.sample(&inputs, 0.1);
        assert_eq!(sample.input, -1.0);
        assert_eq!(sample.status, AxisStatus::Ok);
        assert!(sample.output.unwrap() < 0.0);
    }

    #[test]
    fn missing_device_button_is_disconnected() {
        let mut axis = KeyAxis::new(KeyParams {
            positive: Some("button:g1:0".parse().unwrap()),
            ..KeyParams::default()
        });
        let sample = axis.sample(&Inputs::new(), 0.1);
        assert_eq!(sample.status, AxisStatus::Disconnected);
        assert_eq!(sample.input, 0.0);
    }
}
