use super::{FlagClient, FlagError, FlagKey};

/// What a gate does when the flag cannot be evaluated. Every call site
/// picks one; there is no implicit default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOnError {
    /// Treat the flag as off.
    Deny,
    /// Treat the flag as on.
    Allow,
    /// Hand the evaluation error back to the caller.
    Propagate,
}

impl FlagClient {
    /// Resolve `key` to a boolean, applying `on_error` if evaluation or
    /// parsing fails. Swallowed errors are logged.
    pub async fn check(&self, key: FlagKey, on_error: GateOnError) -> Result<bool, FlagError> {
        match self.is_enabled(key).await {
            Ok(enabled) => Ok(enabled),
            Err(e) => match on_error {
                GateOnError::Propagate => Err(e),
                GateOnError::Deny => {
                    tracing::warn!(
                        flag = %key,
                        error = %e,
                        "flag evaluation failed, treating as disabled"
                    );
                    Ok(false)
                }
                GateOnError::Allow => {
                    tracing::warn!(
                        flag = %key,
                        error = %e,
                        "flag evaluation failed, treating as enabled"
                    );
                    Ok(true)
                }
            },
        }
    }
}
