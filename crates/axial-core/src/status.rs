use std::fmt;

/// Health of an axis, recomputed on every evaluation.
///
/// Only [`AxisStatus::Ok`] makes the output value meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisStatus {
    #[default]
    Ok,
    /// The requested name is absent.
    NotFound,
    /// A collaborator the axis depends on is not ready.
    Unavailable,
    /// The bound device or button is absent.
    Disconnected,
    /// Evaluated while the simulation is not running.
    NotRunning,
    /// Type-specific fault; the last good output is kept.
    Error,
    /// A chain sub-axis reference does not resolve.
    NoLink,
}

impl AxisStatus {
    pub fn is_ok(self) -> bool {
        self == AxisStatus::Ok
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AxisStatus::Ok => "ok",
            AxisStatus::NotFound => "not found",
            AxisStatus::Unavailable => "unavailable",
            AxisStatus::Disconnected => "disconnected",
            AxisStatus::NotRunning => "not running",
            AxisStatus::Error => "error",
            AxisStatus::NoLink => "no link",
        }
    }
}

impl fmt::Display for AxisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
