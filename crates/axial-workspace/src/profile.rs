use axial_core::{Axis, AxisError, AxisParams, AxisRegistry, AxisScope};
use axial_device::DeviceRegistry;
use log::debug;

/// Parsed axis profile: named parameter records for both scopes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub local: Vec<(String, AxisParams)>,
    pub embedded: Vec<(String, AxisParams)>,
}

/// Outcome of loading a profile into a registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    /// Embedded axes dropped because an equal local axis exists.
    pub skipped: Vec<String>,
    /// Chain links severed because they closed a cycle.
    pub chain_errors: Vec<AxisError>,
    /// Embedded axes moved to the first connected device.
    pub rebound: usize,
}

impl Profile {
    /// Snapshot of every saveable axis in a registry.
    pub fn from_registry(registry: &AxisRegistry) -> Self {
        let section = |scope: AxisScope| -> Vec<(String, AxisParams)> {
            registry
                .saveable(scope)
                .into_iter()
                .map(|axis| (axis.name().to_string(), axis.params()))
                .collect()
        };
        Self {
            local: section(AxisScope::Local),
            embedded: section(AxisScope::Embedded),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.embedded.is_empty()
    }

    /// Load local axes, then embedded axes, then repair chain links and
    /// device bindings.
    pub fn apply(&self, registry: &mut AxisRegistry, devices: &DeviceRegistry) -> ApplyReport {
        let mut report = ApplyReport::default();
        for (name, params) in &self.local {
            registry.add_local(Axis::from_params(name.as_str(), params.clone()));
        }
        for (name, params) in &self.embedded {
            if !registry.add_embedded(Axis::from_params(name.as_str(), params.clone())) {
                report.skipped.push(name.clone());
            }
        }
        report.chain_errors = registry.refresh_chain_links();
        report.rebound = registry.resolve_embedded_device_bindings(devices);
        debug!(
            "profile applied: {} local, {} embedded, {} skipped",
            self.local.len(),
            self.embedded.len(),
            report.skipped.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axial_core::{ChainParams, ControllerParams, KeyParams};

    fn chain(first: &str) -> AxisParams {
        AxisParams::Chain(ChainParams {
            first: Some(first.to_string()),
            ..ChainParams::default()
        })
    }

    #[test]
    fn apply_reports_skips_and_cycles() {
        let profile = Profile {
            local: vec![
                (
                    "Speed".to_string(),
                    AxisParams::Controller(ControllerParams::new("g1", 0)),
                ),
                ("A".to_string(), chain("B")),
                ("B".to_string(), chain("A")),
            ],
            embedded: vec![(
                "Speed".to_string(),
                AxisParams::Controller(ControllerParams::new("g1", 0)),
            )],
        };
        let mut registry = AxisRegistry::new();
        let report = profile.apply(&mut registry, &DeviceRegistry::new());

        assert_eq!(report.skipped, vec!["Speed".to_string()]);
        assert_eq!(report.chain_errors.len(), 1);
        assert_eq!(report.rebound, 0);
        assert_eq!(registry.scope_of("Speed"), Some(AxisScope::Local));
    }

    #[test]
    fn snapshot_skips_transient_axes() {
        let mut registry = AxisRegistry::new();
        registry.add_local(Axis::from_params(
            "Throttle",
            AxisParams::Key(KeyParams::default()),
        ));
        registry.add_local(Axis::transient(
            "Preview",
            AxisParams::Key(KeyParams::default()).into(),
        ));
        registry.add_embedded(Axis::from_params(
            "Steer",
            AxisParams::Controller(ControllerParams::new("g1", 0)),
        ));

        let profile = Profile::from_registry(&registry);
        assert_eq!(profile.local.len(), 1);
        assert_eq!(profile.local[0].0, "Throttle");
        assert_eq!(profile.embedded[0].0, "Steer");
    }
}
