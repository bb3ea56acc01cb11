use log::debug;

use crate::button::{ButtonId, LogicalButton};
use crate::device::Device;
use crate::types::{DeviceId, DeviceInfo, InstanceId};

/// Live set of devices in connection order.
///
/// Devices are keyed by their stable [`DeviceId`]. The ordinal index of a
/// device is its position among the live devices, so it shifts when an
/// earlier device is removed.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly connected device and return it.
    ///
    /// When another live device already uses the same hardware id (two
    /// identical pads), the newcomer gets a `#N` suffix so identities stay
    /// unique.
    pub fn add_device(&mut self, info: DeviceInfo) -> &Device {
        if let Some(pos) = self.position_by_instance(info.instance) {
            debug!("device instance {} re-added, replacing", info.instance);
            self.devices.remove(pos);
        }

        // A stale entry for the same hardware is replaced, not suffixed.
        self.devices
            .retain(|d| d.is_connected() || d.id() != &info.id);

        let mut device = Device::new(info);
        let base = device.id().clone();
        let mut suffix = 2;
        while self.get(device.id()).is_some() {
            device.set_id(DeviceId::new(format!("{base}#{suffix}")));
            suffix += 1;
        }

        debug!(
            "add device - {} id={} instance={}",
            device.name(),
            device.id(),
            device.instance()
        );
        self.devices.push(device);
        let last = self.devices.len() - 1;
        &self.devices[last]
    }

    /// Mark the device with this backend instance as disconnected.
    ///
    /// The device stays visible as disconnected until
    /// [`DeviceRegistry::remove_disconnected`] runs.
    pub fn disconnect(&mut self, instance: InstanceId) -> bool {
        match self.by_instance_mut(instance) {
            Some(device) => {
                debug!("remove device - {} id={}", device.name(), device.id());
                device.disconnect();
                true
            }
            None => false,
        }
    }

    /// Drop every disconnected device and return their identities.
    pub fn remove_disconnected(&mut self) -> Vec<DeviceId> {
        let mut removed = Vec::new();
        self.devices.retain(|device| {
            if device.is_connected() {
                true
            } else {
                removed.push(device.id().clone());
                false
            }
        });
        removed
    }

    pub fn get(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.id() == id)
    }

    pub fn is_connected(&self, id: &DeviceId) -> bool {
        self.get(id).is_some_and(Device::is_connected)
    }

    /// Whether a button id resolves to a live input. Keyboard keys always do.
    pub fn is_button_connected(&self, id: &ButtonId) -> bool {
        match id {
            ButtonId::Key(_) => true,
            ButtonId::Joystick { device, index } => self
                .get(device)
                .and_then(|d| d.button(*index))
                .is_some_and(LogicalButton::connected),
            ButtonId::Hat {
                device,
                hat,
                direction,
            } => self
                .get(device)
                .and_then(|d| d.hat_button(*hat, *direction))
                .is_some_and(LogicalButton::connected),
        }
    }

    /// Connected device at an ordinal position.
    pub fn by_index(&self, index: usize) -> Option<&Device> {
        self.connected().nth(index)
    }

    /// Ordinal position of a connected device.
    pub fn index_of(&self, id: &DeviceId) -> Option<usize> {
        self.connected().position(|d| d.id() == id)
    }

    pub fn by_instance(&self, instance: InstanceId) -> Option<&Device> {
        self.devices.iter().find(|d| d.instance() == instance)
    }

    pub(crate) fn by_instance_mut(&mut self, instance: InstanceId) -> Option<&mut Device> {
        self.devices.iter_mut().find(|d| d.instance() == instance)
    }

    fn position_by_instance(&self, instance: InstanceId) -> Option<usize> {
        self.devices.iter().position(|d| d.instance() == instance)
    }

    /// Connected devices in ordinal order.
    pub fn connected(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| d.is_connected())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Advance smoothing of every device.
    pub fn update(&mut self, dt: f32) {
        for device in &mut self.devices {
            device.update(dt);
        }
    }

    pub(crate) fn clear_edges(&mut self) {
        for device in &mut self.devices {
            device.clear_edges();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, instance: InstanceId) -> DeviceInfo {
        DeviceInfo {
            id: id.into(),
            instance,
            name: format!("pad {id}"),
            is_game_controller: false,
            axes: 2,
            balls: 0,
            hats: 0,
            buttons: 4,
            mapping: None,
        }
    }

    #[test]
    fn ordinal_indices_shift_after_removal() {
        let mut registry = DeviceRegistry::new();
        registry.add_device(info("g1", 10));
        registry.add_device(info("g2", 11));
        assert_eq!(registry.index_of(&"g2".into()), Some(1));

        assert!(registry.disconnect(10));
        assert_eq!(registry.by_index(0).map(|d| d.id().as_str()), Some("g2"));
        assert!(!registry.is_connected(&"g1".into()));

        let removed = registry.remove_disconnected();
        assert_eq!(removed, vec![DeviceId::from("g1")]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.index_of(&"g2".into()), Some(0));
    }

    #[test]
    fn identical_devices_get_distinct_identities() {
        let mut registry = DeviceRegistry::new();
        registry.add_device(info("pad", 1));
        let second = registry.add_device(info("pad", 2));
        assert_eq!(second.id().as_str(), "pad#2");
        assert_eq!(
            second.button(0).map(|b| crate::LogicalButton::id(b).to_string()),
            Some("button:pad#2:0".to_string())
        );
        let third = registry.add_device(info("pad", 3));
        assert_eq!(third.id().as_str(), "pad#3");
    }

    #[test]
    fn reconnect_keeps_the_hardware_identity() {
        let mut registry = DeviceRegistry::new();
        registry.add_device(info("g1", 1));
        registry.disconnect(1);
        registry.remove_disconnected();

        let device = registry.add_device(info("g1", 7));
        assert_eq!(device.id().as_str(), "g1");
        assert_eq!(device.instance(), 7);
    }

    #[test]
    fn button_connectivity_follows_the_device() {
        let mut registry = DeviceRegistry::new();
        registry.add_device(info("g1", 1));
        let button: ButtonId = "button:g1:3".parse().unwrap();
        assert!(registry.is_button_connected(&button));
        assert!(!registry.is_button_connected(&"button:g1:4".parse().unwrap()));
        assert!(!registry.is_button_connected(&"hat:g1:0:up".parse().unwrap()));
        assert!(registry.is_button_connected(&"key:space".parse().unwrap()));

        registry.disconnect(1);
        assert!(!registry.is_button_connected(&button));
    }

    #[test]
    fn unknown_instance_is_ignored() {
        let mut registry = DeviceRegistry::new();
        assert!(!registry.disconnect(42));
        assert!(registry.remove_disconnected().is_empty());
    }
}
