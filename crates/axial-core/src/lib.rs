mod axis;
mod params;
mod registry;
mod scheduler;
mod script;
mod status;

use thiserror::Error;

pub use crate::axis::{
    Axis, AxisKind, ChainAxis, ChainSlot, ControllerAxis, CustomAxis, KeyAxis, MouseAxis,
};
pub use crate::params::{
    AxisParams, ChainMethod, ChainParams, ControllerParams, CustomParams, KeyParams,
    MouseParams,
};
pub use crate::registry::{AxisRegistry, AxisScope};
pub use crate::scheduler::Scheduler;
pub use crate::script::{ScriptEngine, ScriptError};
pub use crate::status::AxisStatus;

/// Error type for axis graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AxisError {
    /// Linking `axis` to `link` would close a cycle of chain axes.
    #[error("axis '{axis}' cannot link to '{link}': it would form a cycle")]
    Cycle { axis: String, link: String },
    #[error("axis not found: {0}")]
    NotFound(String),
    #[error("axis '{0}' is not a chain axis")]
    NotChain(String),
}

/// Convenient result alias for axis operations.
pub type Result<T> = std::result::Result<T, AxisError>;
