use ahash::AHashMap;
use axial_core::{AxisRegistry, AxisStatus};

const EPSILON: f32 = 1e-3;

/// One axis whose value or status moved since the last poll.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AxisChange {
    pub name: String,
    pub value: f32,
    pub status: AxisStatus,
}

/// Remembers the last reported state of every axis.
#[derive(Debug, Default)]
pub(crate) struct Observer {
    last: AHashMap<Box<str>, (f32, AxisStatus)>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Axes that changed, sorted by name. Axes gone from the registry are
    /// forgotten silently.
    pub fn poll(&mut self, registry: &AxisRegistry) -> Vec<AxisChange> {
        let mut names: Vec<&str> = registry
            .local_axes()
            .chain(registry.embedded_axes())
            .map(|axis| axis.name())
            .collect();
        names.sort_unstable();
        names.dedup();

        self.last.retain(|name, _| registry.contains(name));

        let mut changes = Vec::new();
        for name in names {
            let value = registry.output_value(name);
            let status = registry.status(name);
            let changed = match self.last.get(name) {
                Some(&(last_value, last_status)) => {
                    last_status != status || (last_value - value).abs() >= EPSILON
                }
                None => true,
            };
            if changed {
                self.last.insert(name.into(), (value, status));
                changes.push(AxisChange {
                    name: name.to_string(),
                    value,
                    status,
                });
            }
        }
        changes
    }

    pub fn clear(&mut self) {
        self.last.clear();
    }
}
