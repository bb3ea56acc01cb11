use ahash::AHashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::button::{ButtonId, ButtonState, ButtonView};
use crate::events::RawEvent;
use crate::key::KeyCode;
use crate::registry::DeviceRegistry;
use crate::types::DeviceId;

/// Devices that appeared or went away while applying one batch of events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceChanges {
    pub added: Vec<DeviceId>,
    pub removed: Vec<DeviceId>,
}

impl DeviceChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Keyboard key states for the current tick.
#[derive(Debug, Default)]
pub struct Keyboard {
    keys: AHashMap<KeyCode, ButtonState>,
}

impl Keyboard {
    pub fn state(&self, key: KeyCode) -> ButtonState {
        self.keys.get(&key).copied().unwrap_or_default()
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.state(key).down
    }

    fn set(&mut self, key: KeyCode, down: bool) {
        self.keys.entry(key).or_default().set(down);
    }

    fn clear_edges(&mut self) {
        self.keys.retain(|_, state| {
            state.clear_edges();
            state.down
        });
    }
}

/// Screen axis selector for pointer-driven signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenAxis {
    X,
    Y,
}

/// Pointer position and screen size, both in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Pointer {
    pub fn coordinate(&self, axis: ScreenAxis) -> f32 {
        match axis {
            ScreenAxis::X => self.x,
            ScreenAxis::Y => self.y,
        }
    }

    pub fn screen_size(&self, axis: ScreenAxis) -> f32 {
        match axis {
            ScreenAxis::X => self.width,
            ScreenAxis::Y => self.height,
        }
    }

    /// Whether a screen size is known.
    pub fn has_screen(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Everything axes may read during a tick: devices, keyboard and pointer.
#[derive(Debug, Default)]
pub struct Inputs {
    devices: DeviceRegistry,
    keyboard: Keyboard,
    pointer: Pointer,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut DeviceRegistry {
        &mut self.devices
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// Apply one tick worth of raw events.
    ///
    /// Edges from the previous tick are cleared first. Devices reported as
    /// removed are pruned at the end.
    pub fn apply<I>(&mut self, events: I) -> DeviceChanges
    where
        I: IntoIterator<Item = RawEvent>,
    {
        self.devices.clear_edges();
        self.keyboard.clear_edges();
        let mut changes = DeviceChanges::default();

        for event in events {
            match event {
                RawEvent::DeviceAdded(info) => {
                    let id = self.devices.add_device(info).id().clone();
                    changes.added.push(id);
                }
                RawEvent::DeviceRemoved(instance) => {
                    self.devices.disconnect(instance);
                }
                RawEvent::DeviceRemapped { instance, mapping } => {
                    if let Some(device) = self.devices.by_instance_mut(instance) {
                        debug!("remap device - {}", device.id());
                        device.remap(mapping.as_deref());
                    }
                }
                RawEvent::ButtonDown { instance, button } => {
                    if let Some(device) = self.devices.by_instance_mut(instance) {
                        device.set_button(button, true);
                    }
                }
                RawEvent::ButtonUp { instance, button } => {
                    if let Some(device) = self.devices.by_instance_mut(instance) {
                        device.set_button(button, false);
                    }
                }
                RawEvent::HatMotion {
                    instance,
                    hat,
                    directions,
                } => {
                    if let Some(device) = self.devices.by_instance_mut(instance) {
                        device.set_hat(hat, directions);
                    }
                }
                RawEvent::AxisMotion {
                    instance,
                    axis,
                    value,
                } => {
                    if let Some(device) = self.devices.by_instance_mut(instance) {
                        device.set_axis(axis, value);
                    }
                }
                RawEvent::KeyDown(key) => self.keyboard.set(key, true),
                RawEvent::KeyUp(key) => self.keyboard.set(key, false),
                RawEvent::PointerMotion { x, y } => {
                    self.pointer.x = x;
                    self.pointer.y = y;
                }
                RawEvent::ScreenResized { width, height } => {
                    self.pointer.width = width;
                    self.pointer.height = height;
                }
            }
        }

        changes.removed = self.devices.remove_disconnected();
        changes
            .added
            .retain(|id| !changes.removed.contains(id));
        changes
    }

    /// Advance per-device smoothing by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.devices.update(dt);
    }

    /// Resolve a button id against the current inputs.
    ///
    /// Device buttons are connected only while their device is live and has
    /// enough physical buttons or hats for the id.
    pub fn button(&self, id: &ButtonId) -> ButtonView {
        match id {
            ButtonId::Key(key) => ButtonView {
                id: id.clone(),
                state: self.keyboard.state(*key),
                connected: true,
            },
            ButtonId::Joystick { device, index } => self
                .devices
                .get(device)
                .and_then(|d| d.button(*index))
                .map(|b| ButtonView {
                    id: id.clone(),
                    state: b.state(),
                    connected: crate::LogicalButton::connected(b),
                })
                .unwrap_or_else(|| ButtonView::disconnected(id.clone())),
            ButtonId::Hat {
                device,
                hat,
                direction,
            } => self
                .devices
                .get(device)
                .and_then(|d| d.hat_button(*hat, *direction))
                .map(|b| ButtonView {
                    id: id.clone(),
                    state: b.state(),
                    connected: crate::LogicalButton::connected(b),
                })
                .unwrap_or_else(|| ButtonView::disconnected(id.clone())),
        }
    }
}
