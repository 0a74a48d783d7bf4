//! Pipeline and accessor error types.

use cadence_store::Entity;

/// A get-style accessor operation was invoked for an entity that lacks the
/// component.
///
/// There is no recovery path: the error propagates out of the tick closure
/// and aborts the remainder of that tick, surfacing the authoring bug
/// immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The entity has no value of the requested component type.
    #[error("{entity} has no `{component}` component")]
    MissingComponent {
        /// The entity that was accessed.
        entity: Entity,
        /// The component type that was absent.
        component: &'static str,
    },
}

/// A tick closure failed, aborting the remainder of the tick.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("system `{system}` failed mid-tick: {source}")]
pub struct TickError {
    /// The system whose closure returned the error.
    pub system: String,
    /// The underlying accessor failure.
    #[source]
    pub source: AccessError,
}

/// Finalization failed: the declared intents contradict each other, so no
/// linear order satisfies them.
///
/// Carries the unresolved "must run before" constraints and the root set
/// (systems with no prerequisites) for diagnosis. The pipeline that produced
/// this error is gone; fixing the declarations and rebuilding it from
/// scratch is the only way forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    /// The pipeline that failed to finalize.
    pub pipeline: String,
    /// Constraints that could not be satisfied, as (before, after) system
    /// names.
    pub unresolved: Vec<(String, String)>,
    /// Names of the systems that had no prerequisites at the start of the
    /// sort.
    pub roots: Vec<String>,
}

impl std::fmt::Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pipeline `{}` has contradictory access declarations; unresolved:",
            self.pipeline
        )?;
        for (before, after) in &self.unresolved {
            write!(f, " [{before} -> {after}]")?;
        }
        write!(f, "; roots:")?;
        for root in &self.roots {
            write!(f, " [{root}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for CycleError {}
