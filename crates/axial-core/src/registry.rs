use std::fmt;

use ahash::AHashMap;
use axial_device::{DeviceId, DeviceRegistry, Inputs};
use log::{debug, warn};
use smallvec::SmallVec;

use crate::axis::{Axis, AxisKind, ChainAxis, ChainSlot, Sample};
use crate::script::ScriptEngine;
use crate::status::AxisStatus;
use crate::{AxisError, Result};

/// Which of the two axis sets an axis lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisScope {
    /// User-owned axes.
    Local,
    /// Axes shipped inside a loaded artifact.
    Embedded,
}

/// Owner of every live axis.
///
/// Axes live in two name maps. Lookups prefer the embedded set, except that
/// an embedded axis whose parameters equal the local one of the same name is
/// never inserted. Removing an axis from the registry disposes it.
#[derive(Default)]
pub struct AxisRegistry {
    local: AHashMap<Box<str>, Axis>,
    embedded: AHashMap<Box<str>, Axis>,
    engine: Option<Box<dyn ScriptEngine>>,
    running: bool,
}

impl fmt::Debug for AxisRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisRegistry")
            .field("local", &self.local)
            .field("embedded", &self.embedded)
            .field("engine", &self.engine.is_some())
            .field("running", &self.running)
            .finish()
    }
}

impl AxisRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: Box<dyn ScriptEngine>) -> Self {
        Self {
            engine: Some(engine),
            ..Self::default()
        }
    }

    pub fn set_engine(&mut self, engine: Option<Box<dyn ScriptEngine>>) {
        self.engine = engine;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Axis visible under `name`: embedded first, then local.
    pub fn get(&self, name: &str) -> Option<&Axis> {
        self.embedded.get(name).or_else(|| self.local.get(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Axis> {
        if self.embedded.contains_key(name) {
            self.embedded.get_mut(name)
        } else {
            self.local.get_mut(name)
        }
    }

    pub fn get_in(&self, scope: AxisScope, name: &str) -> Option<&Axis> {
        self.scope(scope).get(name)
    }

    /// Scope that answers lookups of `name`.
    pub fn scope_of(&self, name: &str) -> Option<AxisScope> {
        if self.embedded.contains_key(name) {
            Some(AxisScope::Embedded)
        } else if self.local.contains_key(name) {
            Some(AxisScope::Local)
        } else {
            None
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scope_of(name).is_some()
    }

    /// Current output of `name`, zero when absent.
    pub fn output_value(&self, name: &str) -> f32 {
        self.get(name).map_or(0.0, Axis::output_value)
    }

    /// Current status of `name`, [`AxisStatus::NotFound`] when absent.
    pub fn status(&self, name: &str) -> AxisStatus {
        self.get(name).map_or(AxisStatus::NotFound, Axis::status)
    }

    /// Insert a local axis, disposing any local or embedded one of that name.
    pub fn add_local(&mut self, axis: Axis) {
        let name: Box<str> = axis.name().into();
        if let Some(mut old) = self.local.insert(name.clone(), axis) {
            debug!("replace local axis {name}");
            old.dispose();
        }
        if let Some(mut shadow) = self.embedded.remove(&name) {
            debug!("drop embedded axis {name}, local takes over");
            shadow.dispose();
        }
    }

    /// Insert an embedded axis.
    ///
    /// Returns `false` when a local axis of the same name has equal
    /// parameters; the embedded axis, and any older embedded one of that
    /// name, is then disposed and the local one stays authoritative.
    pub fn add_embedded(&mut self, mut axis: Axis) -> bool {
        let name: Box<str> = axis.name().into();
        if self
            .local
            .get(&name)
            .is_some_and(|local| local.params() == axis.params())
        {
            debug!("embedded axis {name} matches local, skipping");
            axis.dispose();
            if let Some(mut old) = self.embedded.remove(&name) {
                old.dispose();
            }
            return false;
        }
        if let Some(mut old) = self.embedded.insert(name.clone(), axis) {
            debug!("replace embedded axis {name}");
            old.dispose();
        }
        true
    }

    /// Dispose and erase a local axis.
    pub fn remove_local(&mut self, name: &str) -> Option<Axis> {
        let mut axis = self.local.remove(name)?;
        axis.dispose();
        Some(axis)
    }

    /// Dispose and erase an embedded axis.
    pub fn remove_embedded(&mut self, name: &str) -> Option<Axis> {
        let mut axis = self.embedded.remove(name)?;
        axis.dispose();
        Some(axis)
    }

    pub fn local_axes(&self) -> impl Iterator<Item = &Axis> {
        self.local.values()
    }

    pub fn embedded_axes(&self) -> impl Iterator<Item = &Axis> {
        self.embedded.values()
    }

    /// Axes of one scope that persistence should write, sorted by name.
    pub fn saveable(&self, scope: AxisScope) -> Vec<&Axis> {
        let mut axes: Vec<&Axis> = self
            .scope(scope)
            .values()
            .filter(|axis| axis.is_saveable())
            .collect();
        axes.sort_unstable_by(|a, b| a.name().cmp(b.name()));
        axes
    }

    pub fn len(&self) -> usize {
        self.local.len() + self.embedded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.embedded.is_empty()
    }

    /// Rebind embedded axes whose device is gone to the first connected one.
    ///
    /// Covers controller axes and device buttons of key axes. Statuses of
    /// rebound axes are refreshed right away. Returns the number of axes
    /// changed.
    pub fn resolve_embedded_device_bindings(&mut self, devices: &DeviceRegistry) -> usize {
        let Some(first) = devices.by_index(0) else {
            return 0;
        };
        let target = first.id();
        let mut rebound = 0;
        for axis in self.embedded.values_mut() {
            if rebind(axis.kind_mut(), devices, target) {
                axis.refresh_bindings(devices);
                debug!("rebind axis {} to device {target}", axis.name());
                rebound += 1;
            }
        }
        rebound
    }

    /// Sever chain links that close a cycle.
    ///
    /// Chains are checked in name order, local before embedded; the first
    /// link found on a cycle is unset. One error is returned per severed link.
    pub fn refresh_chain_links(&mut self) -> Vec<AxisError> {
        let mut chains: Vec<(AxisScope, String)> = Vec::new();
        for scope in [AxisScope::Local, AxisScope::Embedded] {
            let mut names: Vec<String> = self
                .scope(scope)
                .values()
                .filter(|axis| matches!(axis.kind(), AxisKind::Chain(_)))
                .map(|axis| axis.name().to_string())
                .collect();
            names.sort_unstable();
            chains.extend(names.into_iter().map(|name| (scope, name)));
        }

        let mut errors = Vec::new();
        for (scope, name) in chains {
            for slot in [ChainSlot::First, ChainSlot::Second] {
                let Some(link) = self.link_of(scope, &name, slot) else {
                    continue;
                };
                if !self.closes_cycle(&name, &link) {
                    continue;
                }
                warn!("axis {name}: link to {link} forms a cycle, unlinking");
                if let Some(AxisKind::Chain(chain)) =
                    self.scope_mut(scope).get_mut(name.as_str()).map(Axis::kind_mut)
                {
                    chain.set_link(slot, None);
                }
                errors.push(AxisError::Cycle {
                    axis: name.clone(),
                    link,
                });
            }
        }
        errors
    }

    /// Point one sub-axis reference of the chain axis `name` at `target`.
    ///
    /// Fails without changing anything when the new link would close a
    /// cycle. `None` unsets the reference.
    pub fn bind_chain(&mut self, name: &str, slot: ChainSlot, target: Option<&str>) -> Result<()> {
        let axis = self
            .get(name)
            .ok_or_else(|| AxisError::NotFound(name.to_string()))?;
        if !matches!(axis.kind(), AxisKind::Chain(_)) {
            return Err(AxisError::NotChain(name.to_string()));
        }
        if let Some(target) = target {
            if self.closes_cycle(name, target) {
                return Err(AxisError::Cycle {
                    axis: name.to_string(),
                    link: target.to_string(),
                });
            }
        }
        if let Some(AxisKind::Chain(chain)) = self.get_mut(name).map(Axis::kind_mut) {
            chain.set_link(slot, target.map(str::to_string));
        }
        Ok(())
    }

    /// Names to persist for the given roots, depth first.
    ///
    /// Each name appears once and chain dependencies come after the chain
    /// that uses them. Unknown names and transient axes are left out.
    pub fn save_order<'a>(&'a self, roots: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut stack: Vec<&str> = roots.into_iter().collect();
        stack.reverse();

        let mut visited: Vec<&str> = Vec::new();
        let mut order = Vec::new();
        while let Some(name) = stack.pop() {
            if visited.contains(&name) {
                continue;
            }
            visited.push(name);
            let Some(axis) = self.get(name) else {
                continue;
            };
            if axis.is_saveable() {
                order.push(name.to_string());
            }
            if let AxisKind::Chain(chain) = axis.kind() {
                let links: SmallVec<[&str; 2]> = chain.links().collect();
                stack.extend(links.into_iter().rev());
            }
        }
        order
    }

    /// Zero every integrator and mark the simulation as running.
    pub fn reset(&mut self) {
        for axis in self.local.values_mut().chain(self.embedded.values_mut()) {
            axis.reset();
        }
        self.running = true;
    }

    /// Leave the simulation. Every axis reports `NotRunning` until the next
    /// reset and evaluation.
    pub fn halt(&mut self) {
        for axis in self.local.values_mut().chain(self.embedded.values_mut()) {
            axis.halt();
        }
        self.running = false;
    }

    /// Evaluate every axis for one tick.
    ///
    /// Chains are computed after every other axis, from this tick's values.
    pub fn update(&mut self, inputs: &Inputs, dt: f32) {
        let running = self.running;
        let Self {
            local,
            embedded,
            engine,
            ..
        } = self;
        for axis in local.values_mut().chain(embedded.values_mut()) {
            axis.update(inputs, dt, engine.as_mut(), running);
        }

        let chained = {
            let mut eval = ChainEval::new(self);
            let mut chained: SmallVec<[(AxisScope, Box<str>, Sample); 8]> = SmallVec::new();
            for scope in [AxisScope::Local, AxisScope::Embedded] {
                for axis in self.scope(scope).values() {
                    if let AxisKind::Chain(chain) = axis.kind() {
                        chained.push((scope, axis.name().into(), eval.sample(axis.name(), chain)));
                    }
                }
            }
            chained
        };
        for (scope, name, sample) in chained {
            let axis = self.scope_mut(scope).get_mut(&name);
            debug_assert!(axis.is_some(), "chain axis {name} vanished mid-update");
            if let Some(axis) = axis {
                axis.apply(sample);
            }
        }
    }

    /// Whether linking `name` to `target` would make `name` reach itself.
    fn closes_cycle(&self, name: &str, target: &str) -> bool {
        let mut stack: SmallVec<[&str; 8]> = SmallVec::new();
        stack.push(target);
        let mut seen: SmallVec<[&str; 16]> = SmallVec::new();
        while let Some(current) = stack.pop() {
            if current == name {
                return true;
            }
            if seen.contains(&current) {
                continue;
            }
            seen.push(current);
            if let Some(AxisKind::Chain(chain)) = self.get(current).map(Axis::kind) {
                stack.extend(chain.links());
            }
        }
        false
    }

    fn link_of(&self, scope: AxisScope, name: &str, slot: ChainSlot) -> Option<String> {
        match self.scope(scope).get(name).map(Axis::kind) {
            Some(AxisKind::Chain(chain)) => chain.link(slot).map(str::to_string),
            _ => None,
        }
    }

    fn scope(&self, scope: AxisScope) -> &AHashMap<Box<str>, Axis> {
        match scope {
            AxisScope::Local => &self.local,
            AxisScope::Embedded => &self.embedded,
        }
    }

    fn scope_mut(&mut self, scope: AxisScope) -> &mut AHashMap<Box<str>, Axis> {
        match scope {
            AxisScope::Local => &mut self.local,
            AxisScope::Embedded => &mut self.embedded,
        }
    }
}

/// One tick of chain evaluation.
///
/// A chain reached through a link is computed once per tick. A link back into
/// a chain that is still being computed reads that chain's stored output, so
/// cycles left by an unrefreshed graph cost no more than acyclic ones.
struct ChainEval<'a> {
    registry: &'a AxisRegistry,
    memo: AHashMap<&'a str, f32>,
    visiting: SmallVec<[&'a str; 8]>,
}

impl<'a> ChainEval<'a> {
    fn new(registry: &'a AxisRegistry) -> Self {
        Self {
            registry,
            memo: AHashMap::new(),
            visiting: SmallVec::new(),
        }
    }

    fn sample(&mut self, name: &'a str, chain: &'a ChainAxis) -> Sample {
        self.visiting.push(name);
        let mut linked = true;
        let a = self.link_value(chain.link(ChainSlot::First), &mut linked);
        let b = self.link_value(chain.link(ChainSlot::Second), &mut linked);
        self.visiting.pop();
        Sample {
            input: chain.method().combine(a, b),
            output: Some(chain.combine(a, b)),
            status: if linked {
                AxisStatus::Ok
            } else {
                AxisStatus::NoLink
            },
        }
    }

    fn link_value(&mut self, link: Option<&'a str>, linked: &mut bool) -> f32 {
        let registry = self.registry;
        let Some((name, axis)) = link.and_then(|name| registry.get(name).map(|axis| (name, axis)))
        else {
            *linked = false;
            return 0.0;
        };
        let AxisKind::Chain(inner) = axis.kind() else {
            return axis.output_value();
        };
        if let Some(&value) = self.memo.get(name) {
            return value;
        }
        if self.visiting.contains(&name) {
            return axis.output_value();
        }
        let value = self.sample(name, inner).output.unwrap_or_default();
        self.memo.insert(name, value);
        value
    }
}

fn rebind(kind: &mut AxisKind, devices: &DeviceRegistry, target: &DeviceId) -> bool {
    match kind {
        AxisKind::Controller(axis) => {
            let params = axis.params_mut();
            if devices.is_connected(&params.device) {
                return false;
            }
            params.device = target.clone();
            true
        }
        AxisKind::Key(axis) => {
            let params = axis.params_mut();
            let mut changed = false;
            for button in [&mut params.positive, &mut params.negative]
                .into_iter()
                .flatten()
            {
                let stale = button.device().is_some_and(|d| !devices.is_connected(d));
                if stale {
                    *button = button.with_device(target.clone());
                    changed = true;
                }
            }
            changed
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{
        AxisParams, ChainMethod, ChainParams, ControllerParams, CustomParams, KeyParams,
    };
    use crate::script::LiteralEngine;
    use axial_device::{DeviceInfo, RawEvent};

    fn pad(id: &str, instance: u32) -> RawEvent {
        RawEvent::DeviceAdded(DeviceInfo {
            id: id.into(),
            instance,
            name: format!("pad {id}"),
            is_game_controller: false,
            axes: 2,
            balls: 0,
            hats: 0,
            buttons: 2,
            mapping: None,
        })
    }

    fn controller(name: &str, device: &str, index: u16) -> Axis {
        Axis::from_params(
            name,
            AxisParams::Controller(ControllerParams::new(device, index)),
        )
    }

    fn chain(name: &str, first: Option<&str>, second: Option<&str>) -> Axis {
        Axis::from_params(
            name,
            AxisParams::Chain(ChainParams {
                first: first.map(str::to_string),
                second: second.map(str::to_string),
                method: ChainMethod::Sum,
            }),
        )
    }

    fn chain_links(registry: &AxisRegistry, name: &str) -> (Option<String>, Option<String>) {
        match registry.get(name).map(Axis::kind) {
            Some(AxisKind::Chain(c)) => (
                c.link(ChainSlot::First).map(str::to_string),
                c.link(ChainSlot::Second).map(str::to_string),
            ),
            _ => panic!("{name} is not a chain"),
        }
    }

    fn inputs_with_values(a: f32, b: f32) -> Inputs {
        let mut inputs = Inputs::new();
        inputs.apply([
            pad("g1", 1),
            RawEvent::AxisMotion {
                instance: 1,
                axis: 0,
                value: a,
            },
            RawEvent::AxisMotion {
                instance: 1,
                axis: 1,
                value: b,
            },
        ]);
        inputs
    }

    #[test]
    fn chain_sum_is_clamped() {
        let mut registry = AxisRegistry::new();
        registry.add_local(controller("Left", "g1", 0));
        registry.add_local(controller("Right", "g1", 1));
        registry.add_local(chain("Both", Some("Left"), Some("Right")));

        registry.update(&inputs_with_values(0.6, 0.6), 0.016);
        assert_eq!(registry.output_value("Both"), 1.0);
        assert_eq!(registry.status("Both"), AxisStatus::Ok);
    }

    #[test]
    fn nested_chains_see_this_tick_values() {
        let mut registry = AxisRegistry::new();
        registry.add_local(controller("Left", "g1", 0));
        registry.add_local(controller("Right", "g1", 1));
        registry.add_local(chain("Inner", Some("Left"), Some("Right")));
        registry.add_local(chain("Outer", Some("Inner"), Some("Left")));

        registry.update(&inputs_with_values(0.25, 0.25), 0.016);
        assert_eq!(registry.output_value("Outer"), 0.75);
    }

    #[test]
    fn unrefreshed_self_loop_still_ticks() {
        let mut registry = AxisRegistry::new();
        registry.add_local(chain("Loop", Some("Loop"), Some("Loop")));

        registry.update(&Inputs::new(), 0.016);
        assert_eq!(registry.output_value("Loop"), 0.0);
        assert_eq!(registry.status("Loop"), AxisStatus::Ok);
    }

    #[test]
    fn deep_chain_ladders_evaluate_each_rung_once() {
        let mut registry = AxisRegistry::new();
        registry.add_local(controller("Left", "g1", 0));
        registry.add_local(chain("Rung 0", Some("Left"), Some("Left")));
        for i in 1..48 {
            let below = format!("Rung {}", i - 1);
            registry.add_local(chain(&format!("Rung {i}"), Some(&below), Some(&below)));
        }
        // Close a cycle at the top without a refresh.
        registry.add_local(chain("Top", Some("Rung 47"), Some("Top")));

        registry.update(&inputs_with_values(0.001, 0.0), 0.016);
        assert_eq!(registry.output_value("Rung 47"), 1.0);
        assert_eq!(registry.output_value("Top"), 1.0);
        assert_eq!(registry.status("Top"), AxisStatus::Ok);
    }

    #[test]
    fn halt_reports_not_running_and_keeps_outputs() {
        let mut registry = AxisRegistry::new();
        registry.add_local(controller("Left", "g1", 0));
        assert_eq!(registry.status("Left"), AxisStatus::NotRunning);

        registry.reset();
        assert_eq!(registry.status("Left"), AxisStatus::NotRunning);
        registry.update(&inputs_with_values(0.5, 0.0), 0.016);
        assert_eq!(registry.status("Left"), AxisStatus::Ok);

        registry.halt();
        assert_eq!(registry.status("Left"), AxisStatus::NotRunning);
        assert_eq!(registry.output_value("Left"), 0.5);
    }

    #[test]
    fn unresolved_chain_link_reports_no_link() {
        let mut registry = AxisRegistry::new();
        registry.add_local(controller("Left", "g1", 0));
        registry.add_local(chain("Half", Some("Left"), Some("Missing")));
        registry.add_local(chain("Unset", Some("Left"), None));

        registry.update(&inputs_with_values(0.5, 0.0), 0.016);
        assert_eq!(registry.status("Half"), AxisStatus::NoLink);
        assert_eq!(registry.output_value("Half"), 0.5);
        assert_eq!(registry.status("Unset"), AxisStatus::NoLink);
    }

    #[test]
    fn embedded_with_other_params_shadows_local() {
        let mut registry = AxisRegistry::new();
        registry.add_local(controller("Speed", "g1", 0));
        assert!(registry.add_embedded(controller("Speed", "g1", 1)));

        assert_eq!(registry.scope_of("Speed"), Some(AxisScope::Embedded));
        assert_eq!(registry.len(), 2);

        registry.update(&inputs_with_values(0.1, 0.9), 0.016);
        assert_eq!(registry.output_value("Speed"), 0.9);
    }

    #[test]
    fn embedded_equal_to_local_is_dropped() {
        let mut registry = AxisRegistry::new();
        registry.add_local(controller("Speed", "g1", 0));
        assert!(!registry.add_embedded(controller("Speed", "g1", 0)));
        assert!(!registry.add_embedded(controller("Speed", "g1", 0)));

        assert_eq!(registry.scope_of("Speed"), Some(AxisScope::Local));
        assert_eq!(registry.len(), 1);
        assert!(registry.get_in(AxisScope::Embedded, "Speed").is_none());
    }

    #[test]
    fn matching_embedded_replaces_an_older_shadow() {
        let mut registry = AxisRegistry::new();
        registry.add_local(controller("Speed", "g1", 0));
        assert!(registry.add_embedded(controller("Speed", "g1", 1)));
        assert!(!registry.add_embedded(controller("Speed", "g1", 0)));

        assert_eq!(registry.scope_of("Speed"), Some(AxisScope::Local));
        assert!(registry.get_in(AxisScope::Embedded, "Speed").is_none());
        assert_eq!(registry.len(), 1);
        match registry.get("Speed").map(Axis::params) {
            Some(AxisParams::Controller(p)) => assert_eq!(p.axis, 0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn adding_local_removes_embedded_of_same_name() {
        let mut registry = AxisRegistry::new();
        registry.add_embedded(controller("Speed", "g1", 1));
        registry.add_local(controller("Speed", "g1", 0));
        assert_eq!(registry.scope_of("Speed"), Some(AxisScope::Local));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn cycle_rejection_keeps_prior_bindings() {
        let mut registry = AxisRegistry::new();
        registry.add_local(chain("A", Some("B"), None));
        registry.add_local(chain("B", Some("C"), None));

        let err = registry.bind_chain("B", ChainSlot::Second, Some("A"));
        assert_eq!(
            err,
            Err(AxisError::Cycle {
                axis: "B".to_string(),
                link: "A".to_string(),
            })
        );
        assert_eq!(chain_links(&registry, "A"), (Some("B".to_string()), None));
        assert_eq!(chain_links(&registry, "B"), (Some("C".to_string()), None));

        assert!(registry.bind_chain("B", ChainSlot::First, Some("B")).is_err());
        assert!(registry.bind_chain("B", ChainSlot::Second, Some("C")).is_ok());
        assert_eq!(
            chain_links(&registry, "B"),
            (Some("C".to_string()), Some("C".to_string()))
        );
    }

    #[test]
    fn bind_chain_checks_the_target_axis() {
        let mut registry = AxisRegistry::new();
        registry.add_local(controller("Stick", "g1", 0));
        assert_eq!(
            registry.bind_chain("Nope", ChainSlot::First, None),
            Err(AxisError::NotFound("Nope".to_string()))
        );
        assert_eq!(
            registry.bind_chain("Stick", ChainSlot::First, None),
            Err(AxisError::NotChain("Stick".to_string()))
        );
    }

    #[test]
    fn refresh_severs_one_link_per_cycle() {
        let mut registry = AxisRegistry::new();
        registry.add_local(chain("A", Some("B"), None));
        registry.add_local(chain("B", Some("A"), None));
        registry.add_local(chain("C", Some("A"), Some("B")));

        let errors = registry.refresh_chain_links();
        assert_eq!(
            errors,
            vec![AxisError::Cycle {
                axis: "A".to_string(),
                link: "B".to_string(),
            }]
        );
        assert_eq!(chain_links(&registry, "A"), (None, None));
        assert_eq!(chain_links(&registry, "B"), (Some("A".to_string()), None));
        assert!(registry.refresh_chain_links().is_empty());
    }

    #[test]
    fn refresh_catches_self_links_in_embedded_axes() {
        let mut registry = AxisRegistry::new();
        registry.add_embedded(chain("Loop", Some("Loop"), Some("Other")));
        let errors = registry.refresh_chain_links();
        assert_eq!(errors.len(), 1);
        assert_eq!(chain_links(&registry, "Loop"), (None, Some("Other".to_string())));
    }

    #[test]
    fn reconnect_rebinds_embedded_axis_to_first_device() {
        let mut registry = AxisRegistry::new();
        registry.add_embedded(controller("Steer", "G1", 0));
        registry.add_embedded(Axis::from_params(
            "Boost",
            AxisParams::Key(KeyParams {
                positive: Some("button:G1:1".parse().unwrap()),
                negative: Some("key:s".parse().unwrap()),
                ..KeyParams::default()
            }),
        ));
        registry.add_local(controller("Mine", "G1", 0));

        let mut inputs = Inputs::new();
        inputs.apply([
            pad("G2", 5),
            RawEvent::AxisMotion {
                instance: 5,
                axis: 0,
                value: 0.5,
            },
        ]);
        registry.update(&inputs, 0.016);
        assert_eq!(registry.status("Steer"), AxisStatus::Disconnected);
        assert_eq!(registry.status("Boost"), AxisStatus::Disconnected);

        assert_eq!(registry.resolve_embedded_device_bindings(inputs.devices()), 2);
        assert_eq!(registry.status("Steer"), AxisStatus::Ok);
        assert_eq!(registry.output_value("Steer"), 0.5);
        assert_eq!(registry.status("Boost"), AxisStatus::Ok);

        registry.update(&inputs, 0.016);
        assert_eq!(registry.status("Steer"), AxisStatus::Ok);
        assert_eq!(registry.output_value("Steer"), 0.5);
        assert_eq!(registry.status("Boost"), AxisStatus::Ok);
        match registry.get("Boost").map(Axis::params) {
            Some(AxisParams::Key(p)) => {
                assert_eq!(p.positive, Some("button:G2:1".parse().unwrap()));
                assert_eq!(p.negative, Some("key:s".parse().unwrap()));
            }
            other => panic!("unexpected {other:?}"),
        }

        // Local axes keep their binding.
        assert_eq!(registry.status("Mine"), AxisStatus::Disconnected);
    }

    #[test]
    fn resolve_without_devices_changes_nothing() {
        let mut registry = AxisRegistry::new();
        registry.add_embedded(controller("Steer", "G1", 0));
        assert_eq!(
            registry.resolve_embedded_device_bindings(&DeviceRegistry::new()),
            0
        );
    }

    #[test]
    fn removal_disposes_once() {
        let mut registry = AxisRegistry::new();
        registry.add_local(controller("Speed", "g1", 0));
        let removed = registry.remove_local("Speed").unwrap();
        assert!(removed.is_disposed());
        assert_ne!(removed.status(), AxisStatus::Ok);
        assert!(registry.remove_local("Speed").is_none());
        assert!(registry.remove_embedded("Speed").is_none());
        assert_eq!(registry.status("Speed"), AxisStatus::NotFound);
    }

    #[test]
    fn save_order_lists_dependencies_after_dependents() {
        let mut registry = AxisRegistry::new();
        registry.add_local(controller("Left", "g1", 0));
        registry.add_local(controller("Right", "g1", 1));
        registry.add_local(chain("Inner", Some("Left"), Some("Right")));
        registry.add_local(chain("Outer", Some("Inner"), Some("Left")));
        registry.add_local(Axis::transient(
            "Preview",
            AxisParams::Chain(ChainParams {
                first: Some("Right".to_string()),
                ..ChainParams::default()
            })
            .into(),
        ));

        assert_eq!(
            registry.save_order(["Outer", "Missing", "Left"]),
            vec!["Outer", "Inner", "Left", "Right"]
        );
        assert_eq!(registry.save_order(["Preview"]), vec!["Right"]);
        assert_eq!(registry.saveable(AxisScope::Local).len(), 4);
    }

    #[test]
    fn custom_axes_need_a_ready_engine_and_a_running_simulation() {
        let custom = || {
            Axis::from_params(
                "Script",
                AxisParams::Custom(CustomParams {
                    init: String::new(),
                    expression: "0.25".to_string(),
                }),
            )
        };
        let inputs = Inputs::new();

        let mut registry = AxisRegistry::new();
        registry.add_local(custom());
        assert_eq!(registry.status("Script"), AxisStatus::NotRunning);
        registry.reset();
        registry.update(&inputs, 0.016);
        assert_eq!(registry.status("Script"), AxisStatus::Unavailable);

        let mut registry = AxisRegistry::with_engine(Box::new(LiteralEngine { ready: true }));
        registry.add_local(custom());
        registry.update(&inputs, 0.016);
        assert_eq!(registry.status("Script"), AxisStatus::NotRunning);

        registry.reset();
        registry.update(&inputs, 0.016);
        assert_eq!(registry.status("Script"), AxisStatus::Ok);
        assert_eq!(registry.output_value("Script"), 0.25);
    }

    #[test]
    fn script_fault_freezes_the_last_output() {
        let mut registry = AxisRegistry::with_engine(Box::new(LiteralEngine { ready: true }));
        registry.add_local(Axis::from_params(
            "Script",
            AxisParams::Custom(CustomParams {
                init: String::new(),
                expression: "7".to_string(),
            }),
        ));
        registry.add_local(controller("Stick", "g1", 0));
        registry.reset();

        let inputs = inputs_with_values(0.5, 0.0);
        registry.update(&inputs, 0.016);
        assert_eq!(registry.output_value("Script"), 1.0);

        if let Some(AxisKind::Custom(custom)) = registry.get_mut("Script").map(Axis::kind_mut) {
            custom.params_mut().expression = "oops".to_string();
        }
        registry.update(&inputs, 0.016);
        assert_eq!(registry.status("Script"), AxisStatus::Error);
        assert_eq!(registry.output_value("Script"), 1.0);

        // Other axes keep evaluating.
        assert_eq!(registry.status("Stick"), AxisStatus::Ok);
        assert_eq!(registry.output_value("Stick"), 0.5);
    }

    #[test]
    fn failing_setup_is_an_error() {
        let mut registry = AxisRegistry::with_engine(Box::new(LiteralEngine { ready: true }));
        registry.add_local(Axis::from_params(
            "Script",
            AxisParams::Custom(CustomParams {
                init: "fail".to_string(),
                expression: "0.5".to_string(),
            }),
        ));
        registry.reset();
        registry.update(&Inputs::new(), 0.016);
        assert_eq!(registry.status("Script"), AxisStatus::Error);
        assert_eq!(registry.output_value("Script"), 0.0);
    }

    #[test]
    fn reset_zeroes_integrators() {
        let mut registry = AxisRegistry::new();
        registry.add_local(Axis::from_params(
            "Throttle",
            AxisParams::Key(KeyParams {
                positive: Some("key:w".parse().unwrap()),
                ..KeyParams::default()
            }),
        ));
        let mut inputs = Inputs::new();
        inputs.apply([RawEvent::KeyDown(axial_device::KeyCode::Char('w'))]);
        registry.update(&inputs, 0.1);
        assert!(registry.output_value("Throttle") > 0.0);

        registry.reset();
        assert_eq!(registry.output_value("Throttle"), 0.0);
        match registry.get("Throttle").map(Axis::kind) {
            Some(AxisKind::Key(key)) => assert_eq!(key.speed(), 0.0),
            other => panic!("unexpected {other:?}"),
        }
    }
}
