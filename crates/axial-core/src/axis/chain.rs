use crate::params::{ChainMethod, ChainParams};

/// Which sub-axis reference of a chain axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainSlot {
    First,
    Second,
}

/// Combines two other axes, referenced by name.
///
/// References are resolved through the registry on every tick, so a chain
/// never keeps another axis alive.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainAxis {
    params: ChainParams,
}

impl ChainAxis {
    pub fn new(params: ChainParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    pub fn method(&self) -> ChainMethod {
        self.params.method
    }

    pub fn set_method(&mut self, method: ChainMethod) {
        self.params.method = method;
    }

    pub fn link(&self, slot: ChainSlot) -> Option<&str> {
        match slot {
            ChainSlot::First => self.params.first.as_deref(),
            ChainSlot::Second => self.params.second.as_deref(),
        }
    }

    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.params
            .first
            .as_deref()
            .into_iter()
            .chain(self.params.second.as_deref())
    }

    pub(crate) fn set_link(&mut self, slot: ChainSlot, target: Option<String>) {
        match slot {
            ChainSlot::First => self.params.first = target,
            ChainSlot::Second => self.params.second = target,
        }
    }

    /// Combined, clamped value of two sub-axis outputs.
    pub fn combine(&self, a: f32, b: f32) -> f32 {
        self.params.method.combine(a, b).clamp(-1.0, 1.0)
    }
}
