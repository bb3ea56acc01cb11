use crate::button::{ButtonId, ButtonState, LogicalButton};
use crate::mapping::NameTable;
use crate::types::{DeviceId, DeviceInfo, HatDirection, HatMask, InstanceId};

/// Rate of the one-pole low-pass applied to axis values, per second.
const SMOOTHING_RATE: f32 = 12.0;

/// Physical source of a device button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceButtonKind {
    Hat { hat: u16, direction: HatDirection },
    Button { index: u16 },
}

/// Logical button derived from a device at connect time.
#[derive(Debug, Clone)]
pub struct DeviceButton {
    id: ButtonId,
    kind: DeviceButtonKind,
    state: ButtonState,
    connected: bool,
}

impl DeviceButton {
    pub fn kind(&self) -> DeviceButtonKind {
        self.kind
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }
}

impl LogicalButton for DeviceButton {
    fn id(&self) -> &ButtonId {
        &self.id
    }

    fn is_down(&self) -> bool {
        self.state.down
    }

    fn pressed(&self) -> bool {
        self.state.pressed
    }

    fn released(&self) -> bool {
        self.state.released
    }

    fn connected(&self) -> bool {
        self.connected
    }
}

/// One physical input device and the logical buttons derived from it.
///
/// The button list is fixed when the device connects: four direction
/// buttons per hat (up, down, left, right), then one button per physical
/// button index.
#[derive(Debug, Clone)]
pub struct Device {
    id: DeviceId,
    instance: InstanceId,
    name: String,
    is_game_controller: bool,
    connected: bool,
    ball_count: u16,
    hats: Vec<HatMask>,
    buttons: Vec<DeviceButton>,
    raw: Vec<f32>,
    smoothed: Vec<f32>,
    names: NameTable,
}

impl Device {
    pub fn new(info: DeviceInfo) -> Self {
        let hat_count = usize::from(info.hats);
        let mut buttons =
            Vec::with_capacity(hat_count * HatDirection::ALL.len() + usize::from(info.buttons));
        for hat in 0..info.hats {
            for direction in HatDirection::ALL {
                buttons.push(DeviceButton {
                    id: ButtonId::Hat {
                        device: info.id.clone(),
                        hat,
                        direction,
                    },
                    kind: DeviceButtonKind::Hat { hat, direction },
                    state: ButtonState::default(),
                    connected: true,
                });
            }
        }
        for index in 0..info.buttons {
            buttons.push(DeviceButton {
                id: ButtonId::Joystick {
                    device: info.id.clone(),
                    index,
                },
                kind: DeviceButtonKind::Button { index },
                state: ButtonState::default(),
                connected: true,
            });
        }

        let axes = usize::from(info.axes);
        let mut device = Self {
            id: info.id,
            instance: info.instance,
            name: info.name,
            is_game_controller: info.is_game_controller,
            connected: true,
            ball_count: info.balls,
            hats: vec![HatMask::CENTERED; hat_count],
            buttons,
            raw: vec![0.0; axes],
            smoothed: vec![0.0; axes],
            names: NameTable::default(),
        };
        device.remap(info.mapping.as_deref());
        device
    }

    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_game_controller(&self) -> bool {
        self.is_game_controller
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn axis_count(&self) -> usize {
        self.raw.len()
    }

    pub fn ball_count(&self) -> usize {
        usize::from(self.ball_count)
    }

    pub fn hat_count(&self) -> usize {
        self.hats.len()
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len() - self.hats.len() * HatDirection::ALL.len()
    }

    /// All logical buttons in derivation order.
    pub fn buttons(&self) -> &[DeviceButton] {
        &self.buttons
    }

    /// Logical button for a physical button index.
    pub fn button(&self, index: u16) -> Option<&DeviceButton> {
        if usize::from(index) >= self.button_count() {
            return None;
        }
        self.buttons
            .get(self.hats.len() * HatDirection::ALL.len() + usize::from(index))
    }

    /// Logical button for one direction of a hat.
    pub fn hat_button(&self, hat: u16, direction: HatDirection) -> Option<&DeviceButton> {
        if usize::from(hat) >= self.hats.len() {
            return None;
        }
        self.buttons
            .get(usize::from(hat) * HatDirection::ALL.len() + direction.slot())
    }

    /// Current axis value, raw or smoothed. `None` past the device's axes.
    pub fn axis(&self, index: usize, smoothed: bool) -> Option<f32> {
        if smoothed {
            self.smoothed.get(index).copied()
        } else {
            self.raw.get(index).copied()
        }
    }

    pub fn axis_name(&self, index: usize) -> Option<&str> {
        self.names.axis(index)
    }

    pub fn button_name(&self, index: usize) -> Option<&str> {
        self.names.button(index)
    }

    pub fn axis_index_by_name(&self, name: &str) -> Option<usize> {
        self.names.axis_index(name)
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Rebuild the index -> name tables. Called on connect and on remap.
    pub fn remap(&mut self, mapping: Option<&str>) {
        let axes = self.raw.len() as u16;
        let buttons = self.button_count() as u16;
        self.names = match mapping {
            Some(mapping) if self.is_game_controller => {
                NameTable::from_mapping(mapping, axes, buttons)
            }
            _ => NameTable::generic(axes, buttons),
        };
    }

    /// Advance the axis low-pass by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let k = (dt * SMOOTHING_RATE).clamp(0.0, 1.0);
        for (smoothed, raw) in self.smoothed.iter_mut().zip(self.raw.iter()) {
            *smoothed = *smoothed * (1.0 - k) + raw * k;
        }
    }

    pub(crate) fn set_axis(&mut self, index: u16, value: f32) {
        if let Some(raw) = self.raw.get_mut(usize::from(index)) {
            *raw = value.clamp(-1.0, 1.0);
        }
    }

    pub(crate) fn set_button(&mut self, index: u16, down: bool) {
        if usize::from(index) >= self.button_count() {
            return;
        }
        let slot = self.hats.len() * HatDirection::ALL.len() + usize::from(index);
        if let Some(button) = self.buttons.get_mut(slot) {
            button.state.set(down);
        }
    }

    pub(crate) fn set_hat(&mut self, hat: u16, mask: HatMask) {
        let Some(current) = self.hats.get_mut(usize::from(hat)) else {
            return;
        };
        *current = mask;
        let base = usize::from(hat) * HatDirection::ALL.len();
        for direction in HatDirection::ALL {
            if let Some(button) = self.buttons.get_mut(base + direction.slot()) {
                button.state.set(mask.contains(direction));
            }
        }
    }

    pub(crate) fn clear_edges(&mut self) {
        for button in &mut self.buttons {
            button.state.clear_edges();
        }
    }

    pub(crate) fn set_id(&mut self, id: DeviceId) {
        for button in &mut self.buttons {
            button.id = button.id.with_device(id.clone());
        }
        self.id = id;
    }

    pub(crate) fn disconnect(&mut self) {
        self.connected = false;
        for button in &mut self.buttons {
            button.connected = false;
            button.state = ButtonState::default();
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
            axes: 4,
            balls: 0,
            hats: 1,
            buttons: 6,
            mapping: None,
        }
    }

    #[test]
    fn buttons_are_hats_first_then_physical() {
        let device = Device::new(info("g1", 1));
        assert_eq!(device.buttons().len(), 4 + 6);
        assert_eq!(device.button_count(), 6);
        assert_eq!(device.buttons()[0].id().to_string(), "hat:g1:0:up");
        assert_eq!(device.buttons()[3].id().to_string(), "hat:g1:0:right");
        assert_eq!(device.buttons()[4].id().to_string(), "button:g1:0");
        assert_eq!(
            device.button(5).map(|b| b.kind()),
            Some(DeviceButtonKind::Button { index: 5 })
        );
        assert!(device.button(6).is_none());
    }

    #[test]
    fn hat_motion_drives_direction_buttons() {
        let mut device = Device::new(info("g1", 1));
        device.set_hat(
            0,
            HatMask::from_bits(HatDirection::Up.bit() | HatDirection::Left.bit()),
        );
        let up = device.hat_button(0, HatDirection::Up).unwrap();
        let left = device.hat_button(0, HatDirection::Left).unwrap();
        let down = device.hat_button(0, HatDirection::Down).unwrap();
        assert!(up.is_down() && up.pressed());
        assert!(left.is_down());
        assert!(!down.is_down());

        device.clear_edges();
        device.set_hat(0, HatMask::CENTERED);
        let up = device.hat_button(0, HatDirection::Up).unwrap();
        assert!(!up.is_down() && up.released());
    }

    #[test]
    fn smoothing_follows_tick_length() {
        let mut device = Device::new(info("g1", 1));
        device.set_axis(0, 1.0);

        // k = 0.05 * 12 = 0.6
        device.update(0.05);
        assert!((device.axis(0, true).unwrap() - 0.6).abs() < 1e-6);
        assert_eq!(device.axis(0, false), Some(1.0));

        // Long ticks saturate at k = 1.
        device.update(1.0);
        assert_eq!(device.axis(0, true), Some(1.0));
    }

    #[test]
    fn axis_values_are_clamped_and_bounds_checked() {
        let mut device = Device::new(info("g1", 1));
        device.set_axis(1, 3.0);
        device.set_axis(9, 1.0);
        assert_eq!(device.axis(1, false), Some(1.0));
        assert_eq!(device.axis(9, false), None);
    }

    #[test]
    fn remap_only_applies_to_game_controllers() {
        let mut device = Device::new(info("g1", 1));
        device.remap(Some("guid,pad,leftx:a0"));
        assert_eq!(device.axis_name(0), Some("Axis 1"));

        let mut pad = info("g2", 2);
        pad.is_game_controller = true;
        pad.mapping = Some("guid,pad,leftx:a0,a:b0".to_string());
        let mut device = Device::new(pad);
        assert_eq!(device.axis_name(0), Some("Left Stick X"));
        assert_eq!(device.button_name(0), Some("A"));

        device.remap(Some("guid,pad,rightx:a0"));
        assert_eq!(device.axis_name(0), Some("Right Stick X"));
        assert_eq!(device.button_name(0), Some("Button 1"));
    }

    #[test]
    fn disconnect_releases_every_button() {
        let mut device = Device::new(info("g1", 1));
        device.set_button(2, true);
        device.disconnect();
        let button = device.button(2).unwrap();
        assert!(!button.connected());
        assert!(!button.is_down());
        assert!(!device.is_connected());
    }
}
