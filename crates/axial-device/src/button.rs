use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::key::KeyCode;
use crate::types::{DeviceId, HatDirection};
use crate::DeviceError;

/// Stable identity of a logical button.
///
/// The textual form encodes the source kind and, for device buttons, the
/// originating device identity:
/// - `key:<name>`
/// - `button:<device>:<index>`
/// - `hat:<device>:<hat>:<direction>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Key(KeyCode),
    Joystick { device: DeviceId, index: u16 },
    Hat { device: DeviceId, hat: u16, direction: HatDirection },
}

impl ButtonId {
    /// Device the button belongs to, if it is device-bound.
    pub fn device(&self) -> Option<&DeviceId> {
        match self {
            ButtonId::Key(_) => None,
            ButtonId::Joystick { device, .. } | ButtonId::Hat { device, .. } => {
                Some(device)
            }
        }
    }

    /// Same button on another device. Keyboard keys are returned unchanged.
    pub fn with_device(&self, device: DeviceId) -> ButtonId {
        match self {
            ButtonId::Key(key) => ButtonId::Key(*key),
            ButtonId::Joystick { index, .. } => ButtonId::Joystick {
                device,
                index: *index,
            },
            ButtonId::Hat { hat, direction, .. } => ButtonId::Hat {
                device,
                hat: *hat,
                direction: *direction,
            },
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonId::Key(key) => write!(f, "key:{key}"),
            ButtonId::Joystick { device, index } => {
                write!(f, "button:{device}:{index}")
            }
            ButtonId::Hat {
                device,
                hat,
                direction,
            } => write!(f, "hat:{device}:{hat}:{}", direction.name()),
        }
    }
}

impl FromStr for ButtonId {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DeviceError::InvalidButtonId(s.to_string());
        let (kind, rest) = s.split_once(':').ok_or_else(invalid)?;
        match kind {
            "key" => Ok(ButtonId::Key(rest.parse()?)),
            "button" => {
                // Device ids may contain ':', so split from the right.
                let (device, index) = rest.rsplit_once(':').ok_or_else(invalid)?;
                if device.is_empty() {
                    return Err(invalid());
                }
                Ok(ButtonId::Joystick {
                    device: device.into(),
                    index: index.parse().map_err(|_| invalid())?,
                })
            }
            "hat" => {
                let (rest, direction) = rest.rsplit_once(':').ok_or_else(invalid)?;
                let (device, hat) = rest.rsplit_once(':').ok_or_else(invalid)?;
                if device.is_empty() {
                    return Err(invalid());
                }
                Ok(ButtonId::Hat {
                    device: device.into(),
                    hat: hat.parse().map_err(|_| invalid())?,
                    direction: HatDirection::parse(direction).ok_or_else(invalid)?,
                })
            }
            _ => Err(invalid()),
        }
    }
}

impl Serialize for ButtonId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ButtonId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Digital state of a button for the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub down: bool,
    /// Went down during this tick.
    pub pressed: bool,
    /// Went up during this tick.
    pub released: bool,
}

impl ButtonState {
    pub(crate) fn set(&mut self, down: bool) {
        if down && !self.down {
            self.pressed = true;
        } else if !down && self.down {
            self.released = true;
        }
        self.down = down;
    }

    pub(crate) fn clear_edges(&mut self) {
        self.pressed = false;
        self.released = false;
    }
}

/// Digital input source: keyboard key, joystick button or hat direction.
pub trait LogicalButton {
    fn id(&self) -> &ButtonId;
    fn is_down(&self) -> bool;
    fn pressed(&self) -> bool;
    fn released(&self) -> bool;
    fn connected(&self) -> bool;

    /// Analog view of the button: `1.0` while held, `0.0` otherwise.
    fn value(&self) -> f32 {
        if self.is_down() {
            1.0
        } else {
            0.0
        }
    }
}

/// Point-in-time view of any logical button, as resolved by [`crate::Inputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub id: ButtonId,
    pub state: ButtonState,
    pub connected: bool,
}

impl ButtonView {
    pub(crate) fn disconnected(id: ButtonId) -> Self {
        Self {
            id,
            state: ButtonState::default(),
            connected: false,
        }
    }
}

impl LogicalButton for ButtonView {
    fn id(&self) -> &ButtonId {
        &self.id
    }

    fn is_down(&self) -> bool {
        self.connected && self.state.down
    }

    fn pressed(&self) -> bool {
        self.connected && self.state.pressed
    }

    fn released(&self) -> bool {
        self.connected && self.state.released
    }

    fn connected(&self) -> bool {
        self.connected
    }
}
