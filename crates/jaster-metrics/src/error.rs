//! Error types for registry lookups.

use thiserror::Error;

/// Result type alias for registry operations.
pub type Result<T> = core::result::Result<T, RegistryError>;

/// Errors raised when resolving a task name against one of the registries.
///
/// Lookups never fall back to a default metric or validator: an unrecognised
/// task name must surface to the caller so a misconfigured evaluation run
/// fails loudly instead of producing scores under the wrong convention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The task name is not a key of the registry that was queried.
    ///
    /// This covers both names that belong to no known task and names of
    /// tasks that exist in the suite but are absent from the queried
    /// registry (e.g. `jsts` has a metric but no controllability entry).
    #[error("unknown task: '{0}'")]
    UnknownTask(String),

    /// The metric name is not one of the five scoring kinds.
    #[error("unknown metric: '{0}'")]
    UnknownMetric(String),
}
