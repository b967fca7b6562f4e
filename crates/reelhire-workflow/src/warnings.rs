//! Recorded warnings.
//!
//! Warnings mark degradations in an operation that still succeeded;
//! they are logged when they occur and carried in the outcome so the
//! UI can surface them.

use reelhire_media::TransformWarning;
use reelhire_models::EntryId;

/// A non-fatal degradation recorded during a workflow operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowWarning {
    /// Deleting the temporary catalog entry failed after a successful
    /// replace. The visible catalog state is correct; the stray entry
    /// is a recoverable inconsistency.
    PartialCleanup { entry_id: EntryId, reason: String },

    /// Refreshing the local catalog view failed after the replace was
    /// confirmed.
    ViewRefreshFailed { reason: String },

    /// A degradation applied by the local transform pipeline.
    Transform(TransformWarning),
}

impl std::fmt::Display for WorkflowWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowWarning::PartialCleanup { entry_id, reason } => write!(
                f,
                "temporary entry {} was not cleaned up: {}",
                entry_id, reason
            ),
            WorkflowWarning::ViewRefreshFailed { reason } => {
                write!(f, "catalog view refresh failed: {}", reason)
            }
            WorkflowWarning::Transform(warning) => write!(f, "{}", warning),
        }
    }
}

impl From<TransformWarning> for WorkflowWarning {
    fn from(warning: TransformWarning) -> Self {
        WorkflowWarning::Transform(warning)
    }
}
