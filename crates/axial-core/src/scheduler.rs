use axial_device::{DeviceChanges, Inputs, RawEvent};
use log::debug;

use crate::registry::AxisRegistry;

/// Drives inputs and axes one tick at a time.
///
/// Raw events are applied on every tick so device bookkeeping stays current;
/// axes are only evaluated between [`Scheduler::start`] and
/// [`Scheduler::stop`].
#[derive(Debug, Default)]
pub struct Scheduler {
    inputs: Inputs,
    registry: AxisRegistry,
    running: bool,
    ticks: u64,
}

impl Scheduler {
    pub fn new(registry: AxisRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn registry(&self) -> &AxisRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut AxisRegistry {
        &mut self.registry
    }

    /// Swap in a new registry. A running simulation resets it first.
    pub fn replace_registry(&mut self, registry: AxisRegistry) -> AxisRegistry {
        let old = std::mem::replace(&mut self.registry, registry);
        if self.running {
            self.registry.reset();
        }
        old
    }

    /// Re-resolve embedded axes against the devices currently known.
    pub fn rebind_embedded(&mut self) -> usize {
        self.registry
            .resolve_embedded_device_bindings(self.inputs.devices())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of ticks evaluated since the last start.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Fire the reset event and begin evaluating axes.
    pub fn start(&mut self) {
        debug!("scheduler start, {} axes", self.registry.len());
        self.registry.reset();
        self.running = true;
        self.ticks = 0;
    }

    pub fn stop(&mut self) {
        debug!("scheduler stop after {} ticks", self.ticks);
        self.registry.halt();
        self.running = false;
    }

    /// One frame: apply events, advance devices, then evaluate axes.
    pub fn tick<I>(&mut self, dt: f32, events: I) -> DeviceChanges
    where
        I: IntoIterator<Item = RawEvent>,
    {
        let changes = self.inputs.apply(events);
        self.inputs.update(dt);
        if self.running {
            self.registry.update(&self.inputs, dt);
            self.ticks += 1;
        }
        changes
    }
}
