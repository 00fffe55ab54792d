//! Idempotent task registration.
//!
//! Host schedulers can refuse an in-place update when the existing task's
//! execution context differs from the new one (a different logon type, a
//! task created by another account). [`upsert`] therefore tries the in-place
//! overwrite first and falls back to delete-then-create, which converges from
//! any prior state, including a corrupted registration under the same name.

use super::{RegisterMode, SchedulerError, TaskDefinition, TaskScheduler};
use crate::error::{Result, SetupError};

/// How an [`upsert`] succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertReport {
    /// The overwrite registration was accepted.
    Replaced,
    /// The overwrite failed and the task was deleted and created afresh.
    Recreated {
        /// Why the overwrite failed.
        fallback_reason: String,
    },
}

/// Create or replace `def` on `scheduler`.
///
/// 1. Register with [`RegisterMode::Overwrite`].
/// 2. On any failure, delete the existing task (not found is fine) and
///    register with [`RegisterMode::CreateOnly`].
/// 3. If that fails too, return [`SetupError::RegistrationFailed`].
///
/// A failed delete does not skip the create; it is folded into the error
/// reported if the create also fails.
pub fn upsert(scheduler: &mut dyn TaskScheduler, def: &TaskDefinition) -> Result<UpsertReport> {
    let overwrite_err = match scheduler.register(def, RegisterMode::Overwrite) {
        Ok(()) => {
            tracing::debug!("Registered task '{}' in place", def.name);
            return Ok(UpsertReport::Replaced);
        }
        Err(e) => e,
    };

    tracing::warn!(
        "In-place registration of '{}' failed ({}); deleting and recreating",
        def.name,
        overwrite_err
    );

    let delete_err = match scheduler.delete(&def.name) {
        Ok(()) | Err(SchedulerError::NotFound { .. }) => None,
        Err(e) => {
            tracing::warn!("Could not delete existing task '{}': {}", def.name, e);
            Some(e)
        }
    };

    match scheduler.register(def, RegisterMode::CreateOnly) {
        Ok(()) => {
            tracing::debug!("Recreated task '{}'", def.name);
            Ok(UpsertReport::Recreated {
                fallback_reason: overwrite_err.to_string(),
            })
        }
        Err(create_err) => {
            let reason = match delete_err {
                Some(delete_err) => {
                    format!("delete failed: {}; create failed: {}", delete_err, create_err)
                }
                None => create_err.to_string(),
            };
            Err(SetupError::RegistrationFailed {
                task: def.name.clone(),
                reason,
            })
        }
    }
}
