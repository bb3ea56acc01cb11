use crate::key::KeyCode;
use crate::types::{DeviceInfo, HatMask, InstanceId};

/// Discrete report from the raw device backend.
///
/// Events are drained once per tick and applied in order, so a press and a
/// release of the same button inside one tick still produce both edges.
#[derive(Debug, Clone)]
pub enum RawEvent {
    /// A device has been connected and enumerated.
    DeviceAdded(DeviceInfo),
    /// A previously connected device has been disconnected.
    DeviceRemoved(InstanceId),
    /// The backend changed the button/axis layout of a device.
    DeviceRemapped {
        instance: InstanceId,
        mapping: Option<String>,
    },
    ButtonDown { instance: InstanceId, button: u16 },
    ButtonUp { instance: InstanceId, button: u16 },
    HatMotion {
        instance: InstanceId,
        hat: u16,
        directions: HatMask,
    },
    /// An analog axis moved; value is normalized to [-1.0, 1.0].
    AxisMotion {
        instance: InstanceId,
        axis: u16,
        value: f32,
    },
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Pointer position in pixels, origin at the bottom-left of the screen.
    PointerMotion { x: f32, y: f32 },
    ScreenResized { width: f32, height: f32 },
}
