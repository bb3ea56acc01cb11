mod button;
mod device;
mod events;
mod inputs;
mod key;
mod mapping;
mod registry;
mod types;

#[cfg(feature = "sdl2-backend")]
mod sdl;

use thiserror::Error;

pub use crate::button::{ButtonId, ButtonState, ButtonView, LogicalButton};
pub use crate::device::{Device, DeviceButton, DeviceButtonKind};
pub use crate::events::RawEvent;
pub use crate::inputs::{DeviceChanges, Inputs, Keyboard, Pointer, ScreenAxis};
pub use crate::key::KeyCode;
pub use crate::mapping::NameTable;
pub use crate::registry::DeviceRegistry;
pub use crate::types::{DeviceId, DeviceInfo, HatDirection, HatMask, InstanceId};

#[cfg(feature = "sdl2-backend")]
pub use crate::sdl::SdlEventSource;

/// Error type for the device layer.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Failed to initialize the backend (SDL2 or subsystems).
    #[error("Backend init failed: {0}")]
    BackendInit(String),
    /// A textual button id could not be parsed.
    #[error("invalid button id: {0}")]
    InvalidButtonId(String),
    /// A key name is not known.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Convenient result alias for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;
