use log::warn;

use super::Sample;
use crate::params::CustomParams;
use crate::script::ScriptEngine;
use crate::status::AxisStatus;

/// Value produced by the scripting collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAxis {
    params: CustomParams,
    initialised: bool,
}

impl CustomAxis {
    pub fn new(params: CustomParams) -> Self {
        Self {
            params,
            initialised: false,
        }
    }

    pub fn params(&self) -> &CustomParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut CustomParams {
        self.initialised = false;
        &mut self.params
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    pub(crate) fn reset(&mut self) {
        self.initialised = false;
    }

    pub(crate) fn sample(
        &mut self,
        name: &str,
        engine: Option<&mut Box<dyn ScriptEngine>>,
        running: bool,
    ) -> Sample {
        let Some(engine) = engine.filter(|e| e.is_ready()) else {
            return Sample::frozen(AxisStatus::Unavailable);
        };
        if !running {
            return Sample::frozen(AxisStatus::NotRunning);
        }

        if !self.initialised {
            if let Err(e) = engine.initialise(&self.params.init) {
                warn!("axis {name}: {e}");
                return Sample::frozen(AxisStatus::Error);
            }
            self.initialised = true;
        }

        match engine.evaluate(&self.params.expression) {
            Ok(value) if value.is_finite() => {
                let value = value as f32;
                Sample::ok(value, value.clamp(-1.0, 1.0))
            }
            Ok(value) => {
                warn!("axis {name}: expression produced {value}");
                Sample::frozen(AxisStatus::Error)
            }
            Err(e) => {
                warn!("axis {name}: {e}");
                Sample::frozen(AxisStatus::Error)
            }
        }
    }
}
