use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend-assigned id of an open device. Changes on every reconnect.
pub type InstanceId = u32;

/// Stable identity of a physical device, kept across reconnects.
///
/// Usually the hardware GUID reported by the backend. Ordinal indices are not
/// identities: they shift whenever a device before them goes away.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(Box<str>);

impl DeviceId {
    pub fn new(id: impl Into<Box<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One of the four directions a hat (POV/D-pad) can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HatDirection {
    Up,
    Down,
    Left,
    Right,
}

impl HatDirection {
    /// Order in which a device derives logical buttons for each hat.
    pub const ALL: [HatDirection; 4] = [
        HatDirection::Up,
        HatDirection::Down,
        HatDirection::Left,
        HatDirection::Right,
    ];

    /// Bit of this direction in a [`HatMask`]. Same layout as SDL hat values.
    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            HatDirection::Up => 0x01,
            HatDirection::Right => 0x02,
            HatDirection::Down => 0x04,
            HatDirection::Left => 0x08,
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        match self {
            HatDirection::Up => 0,
            HatDirection::Down => 1,
            HatDirection::Left => 2,
            HatDirection::Right => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HatDirection::Up => "up",
            HatDirection::Down => "down",
            HatDirection::Left => "left",
            HatDirection::Right => "right",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        Some(match input {
            "up" => HatDirection::Up,
            "down" => HatDirection::Down,
            "left" => HatDirection::Left,
            "right" => HatDirection::Right,
            _ => return None,
        })
    }
}

/// Set of hat directions currently held. Diagonals set two bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HatMask(u8);

impl HatMask {
    pub const CENTERED: HatMask = HatMask(0);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0f)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, direction: HatDirection) -> bool {
        self.0 & direction.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, direction: HatDirection) {
        self.0 |= direction.bit();
    }
}

/// Snapshot of a device as enumerated by the raw device backend.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub instance: InstanceId,
    pub name: String,
    pub is_game_controller: bool,
    pub axes: u16,
    pub balls: u16,
    pub hats: u16,
    pub buttons: u16,
    /// Backend mapping string for game controllers (`a:b0,leftx:a0,...`).
    pub mapping: Option<String>,
}
