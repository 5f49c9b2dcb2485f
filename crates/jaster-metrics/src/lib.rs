//! Scoring and controllability core for the jaster benchmark suite.
//!
//! Two independent lookup surfaces, both pure functions over strings:
//!
//! - [`get_metric`] resolves a task name to the [`Metric`] that grades one
//!   `(prediction, reference)` pair to a score in `[0, 1]`.
//! - [`get_validator`] resolves a task name to the [`FormatCheck`] that
//!   decides whether a single prediction conforms to the task's expected
//!   output grammar.
//!
//! Both registries are immutable dispatch tables over the closed [`Task`]
//! enum; every call is stateless and safe from any number of threads. The
//! evaluation driver that loads datasets, invokes models and averages
//! per-example scores lives outside this crate.
//!
//! ```
//! use jaster_metrics::{get_metric, get_validator};
//!
//! let metric = get_metric("jsquad")?;
//! assert_eq!(metric.score("徳川家康", "徳川家康"), 1.0);
//!
//! let check = get_validator("jmmlu")?;
//! assert_eq!(check.check("A"), Some(true));
//! assert_eq!(check.check("E"), Some(false));
//! # Ok::<(), jaster_metrics::RegistryError>(())
//! ```

pub mod error;
pub mod format;
pub mod score;
pub mod task;

pub use error::{RegistryError, Result};
pub use format::{FormatCheck, NerTag, Polarity};
pub use score::{Metric, Parsed, UNPARSEABLE_SENTINEL};
pub use task::Task;

/// Looks up the scoring registry by canonical task name.
///
/// Unknown names error; no task is ever silently scored under a default
/// metric.
pub fn get_metric(task_name: &str) -> Result<Metric> {
    let task: Task = task_name.parse()?;
    Ok(task.metric())
}

/// Looks up the controllability registry by canonical task name.
///
/// Tasks without a format constraint resolve to
/// [`FormatCheck::Unconstrained`], which yields no verdict. A name that is
/// not a key of this registry errors, even when the task exists in the
/// scoring registry (`jsts`).
pub fn get_validator(task_name: &str) -> Result<FormatCheck> {
    let task: Task = task_name.parse()?;
    task.format_check()
        .ok_or_else(|| RegistryError::UnknownTask(task_name.to_string()))
}
