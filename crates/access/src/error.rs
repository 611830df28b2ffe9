use pathglob::PatternError;
use thiserror::Error;

/// Failure surfaced by the access adapter.
///
/// A missing resource is deliberately absent here: the adapter translates
/// "not found" into a deny verdict, so only genuine faults become errors.
#[derive(Debug, Error)]
pub enum AccessError {
    /// An ACL path pattern failed to compile.
    #[error("invalid acl path pattern: {0}")]
    Pattern(#[from] PatternError),
    /// The forge backend could not be reached.
    #[error("forge backend unavailable: {message}")]
    Backend {
        /// Transport diagnostic reported by the backend.
        message: String,
    },
}
