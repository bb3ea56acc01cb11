use thiserror::Error;

/// Fault raised by a script engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("script error: {0}")]
pub struct ScriptError(pub String);

/// Scripting collaborator used by custom axes.
///
/// The engine is shared by every custom axis of a registry. `initialise` runs
/// the axis setup code once per simulation start, `evaluate` runs its
/// expression once per tick.
pub trait ScriptEngine {
    /// Whether the engine can run code right now.
    fn is_ready(&self) -> bool;

    fn initialise(&mut self, code: &str) -> Result<(), ScriptError>;

    fn evaluate(&mut self, code: &str) -> Result<f64, ScriptError>;
}

/// Engine whose code is a number literal. `fail` as setup code fails.
#[cfg(test)]
pub(crate) struct LiteralEngine {
    pub(crate) ready: bool,
}

#[cfg(test)]
impl ScriptEngine for LiteralEngine {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn initialise(&mut self, code: &str) -> Result<(), ScriptError> {
        if code == "fail" {
            return Err(ScriptError("setup failed".to_string()));
        }
        Ok(())
    }

    fn evaluate(&mut self, code: &str) -> Result<f64, ScriptError> {
        code.trim()
            .parse()
            .map_err(|_| ScriptError(format!("not a number: {code}")))
    }
}
