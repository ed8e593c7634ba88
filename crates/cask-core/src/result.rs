//! Result alias and recovery helpers

use crate::error::CaskError;

pub type Result<T> = std::result::Result<T, CaskError>;

/// Recovery helpers for callers that can keep going past one bad file
///
/// Only I/O and grammar failures are recoverable; configuration and internal
/// errors always stop the caller.
pub trait ResultExt<T> {
    /// `Ok(None)` for a recoverable error, logged at `warn`
    fn recoverable(self) -> Result<Option<T>>;

    /// `None` for any error; recoverable ones log at `warn`, others at `error`
    fn log_and_continue(self) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!(kind = ?err.kind(), "skipping: {err}");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn log_and_continue(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) if err.is_recoverable() => {
                tracing::warn!(kind = ?err.kind(), "skipping: {err}");
                None
            }
            Err(err) => {
                tracing::error!(kind = ?err.kind(), "{err}");
                None
            }
        }
    }
}
