//! # Incremental Sync
//!
//! Replays the file-level diff between two repository revisions onto the
//! resource store.
//!
//! ## Workflow
//!
//! 1. Shortcut when both refs are equal or the diff is empty
//! 2. Sort the diff so deletions and renames land before creations
//! 3. Apply each change, strictly one at a time, recording every outcome
//! 4. Remove folders whose directory disappeared from the source
//!
//! Only three things abort a pass: a failed diff, cancellation and an
//! exhausted error budget. Everything else becomes a recorded result and the
//! pass carries on. Nothing is rolled back.

use bridge_traits::{
    BridgeError, FileAction, RepositoryResources, VersionedFileChange, VersionedRepository,
};
use core_quota::{QuotaExceededError, QuotaTracker};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::change::sort_changes_by_action_priority;
use crate::error::{ResourceError, ResultWarning, SyncError};
use crate::paths::{containing_dir, is_path_supported, parent_dir};
use crate::progress::JobProgressRecorder;
use crate::result::JobResourceResult;
use crate::Result;

pub const MSG_SAME_COMMIT: &str = "same commit as last time";
pub const MSG_NO_CHANGES: &str = "no changes detected between commits";
pub const MSG_REPLICATING: &str = "replicating versioned changes";
pub const MSG_REPLICATED: &str = "versioned changes replicated";

/// Apply the changes between `previous_ref` and `current_ref`.
///
/// Returns `Ok(())` for a completed pass even if individual files failed;
/// their outcomes are in `progress`.
///
/// # Errors
///
/// - [`SyncError::CompareFiles`] if the diff cannot be computed
/// - [`SyncError::TooManyErrors`] with the recorder's error, unchanged
/// - [`SyncError::Cancelled`] if `cancel` fires
#[instrument(
    skip(cancel, repo, resources, progress, quota),
    fields(previous_ref = %previous_ref, current_ref = %current_ref)
)]
pub async fn incremental_sync(
    cancel: &CancellationToken,
    repo: &dyn VersionedRepository,
    previous_ref: &str,
    current_ref: &str,
    resources: &dyn RepositoryResources,
    progress: &dyn JobProgressRecorder,
    quota: &dyn QuotaTracker,
) -> Result<()> {
    if previous_ref == current_ref {
        info!("Same commit as last time, nothing to replicate");
        progress.set_final_message(MSG_SAME_COMMIT).await;
        return Ok(());
    }

    let mut changes = repo
        .compare_files(previous_ref, current_ref)
        .await
        .map_err(SyncError::CompareFiles)?;

    if changes.is_empty() {
        info!("No changes detected between commits");
        progress.set_final_message(MSG_NO_CHANGES).await;
        return Ok(());
    }

    progress.set_total(changes.len()).await;
    progress.set_message(MSG_REPLICATING).await;
    info!("Replicating {} versioned changes", changes.len());

    sort_changes_by_action_priority(&mut changes);

    let mut orphans = OrphanedFolders::default();
    for change in &changes {
        progress.too_many_errors()?;

        if cancel.is_cancelled() {
            info!("Sync cancelled before {}", change.path);
            return Err(SyncError::Cancelled);
        }

        debug!(action = %change.action, path = %change.path, "Applying change");
        let result = apply_change(change, resources, progress, quota, &mut orphans).await;
        progress.record(result).await;
    }

    orphans.remove(cancel, repo, resources, progress).await?;

    progress.set_message(MSG_REPLICATED).await;
    info!("Versioned changes replicated");
    Ok(())
}

async fn apply_change(
    change: &VersionedFileChange,
    resources: &dyn RepositoryResources,
    progress: &dyn JobProgressRecorder,
    quota: &dyn QuotaTracker,
    orphans: &mut OrphanedFolders,
) -> JobResourceResult {
    match change.action {
        FileAction::Created => apply_created(change, resources, progress, quota).await,
        FileAction::Updated => apply_updated(change, resources).await,
        FileAction::Deleted => apply_deleted(change, resources, quota, orphans).await,
        FileAction::Renamed => apply_renamed(change, resources, progress, orphans).await,
        FileAction::Ignored => JobResourceResult::new(&change.path, FileAction::Ignored),
    }
}

/// Result for a change whose folder already failed creation this pass.
fn skipped_for_failed_folder(path: &str) -> JobResourceResult {
    debug!(path = %path, "Skipping change, folder already failed creation");
    JobResourceResult::new(path, FileAction::Ignored).with_warning(
        ResultWarning::ParentFolderFailed {
            path: path.to_string(),
        },
    )
}

/// Failed result, named after the resource when the store reports one.
fn failed(
    path: &str,
    action: FileAction,
    cause: &BridgeError,
    error: ResourceError,
) -> JobResourceResult {
    let result = match cause.resource() {
        Some((name, gvk)) => JobResourceResult::new(path, action).with_resource(name, gvk),
        None => JobResourceResult::new(path, action),
    };
    result.with_error(error)
}

async fn apply_created(
    change: &VersionedFileChange,
    resources: &dyn RepositoryResources,
    progress: &dyn JobProgressRecorder,
    quota: &dyn QuotaTracker,
) -> JobResourceResult {
    let path = change.path.as_str();

    if progress.has_dir_path_failed_creation(path) {
        return skipped_for_failed_folder(path);
    }

    if !is_path_supported(path) {
        return ensure_folder_for(path, resources).await;
    }

    if !quota.try_acquire() {
        let warning = QuotaExceededError::new(path);
        warn!("{}", warning);
        return JobResourceResult::new(path, FileAction::Ignored).with_warning(warning);
    }

    // The slot stays taken if the write fails.
    match resources
        .write_resource_from_file(path, &change.reference)
        .await
    {
        Ok(written) => JobResourceResult::new(path, FileAction::Created)
            .with_resource(written.name, &written.gvk),
        Err(err) => {
            warn!(path = %path, error = %err, "Failed to create resource");
            failed(path, FileAction::Created, &err, ResourceError::write(path, &err))
        }
    }
}

/// Materialise the folder for a path that does not map to a resource.
async fn ensure_folder_for(path: &str, resources: &dyn RepositoryResources) -> JobResourceResult {
    let dir = containing_dir(path);
    if dir.is_empty() || !is_path_supported(dir) {
        debug!(path = %path, "Ignoring unsupported path");
        return JobResourceResult::new(path, FileAction::Ignored);
    }

    match resources.ensure_folder_path_exist(dir).await {
        Ok(folder) => {
            debug!(dir = %dir, folder = %folder, "Folder path ensured");
            JobResourceResult::folder(dir, FileAction::Created)
        }
        Err(err) => {
            warn!(dir = %dir, error = %err, "Failed to create folder path");
            JobResourceResult::new(path, FileAction::Ignored)
                .with_error(ResourceError::folder(dir, &err))
        }
    }
}

async fn apply_updated(
    change: &VersionedFileChange,
    resources: &dyn RepositoryResources,
) -> JobResourceResult {
    let path = change.path.as_str();
    match resources
        .write_resource_from_file(path, &change.reference)
        .await
    {
        Ok(written) => JobResourceResult::new(path, FileAction::Updated)
            .with_resource(written.name, &written.gvk),
        Err(err) => {
            warn!(path = %path, error = %err, "Failed to update resource");
            failed(path, FileAction::Updated, &err, ResourceError::write(path, &err))
        }
    }
}

async fn apply_deleted(
    change: &VersionedFileChange,
    resources: &dyn RepositoryResources,
    quota: &dyn QuotaTracker,
    orphans: &mut OrphanedFolders,
) -> JobResourceResult {
    let path = change.path.as_str();
    match resources
        .remove_resource_from_file(path, &change.previous_reference)
        .await
    {
        Ok(removed) => {
            quota.release();
            if let Some(folder) = removed.folder.filter(|f| !f.is_empty()) {
                orphans.push(parent_dir(path), folder);
            }
            JobResourceResult::new(path, FileAction::Deleted)
                .with_resource(removed.name, &removed.gvk)
        }
        Err(err) => {
            // Resource state is unknown, so its slot is kept.
            warn!(path = %path, error = %err, "Failed to delete resource");
            failed(path, FileAction::Deleted, &err, ResourceError::remove(path, &err))
        }
    }
}

async fn apply_renamed(
    change: &VersionedFileChange,
    resources: &dyn RepositoryResources,
    progress: &dyn JobProgressRecorder,
    orphans: &mut OrphanedFolders,
) -> JobResourceResult {
    let path = change.path.as_str();

    if progress.has_dir_path_failed_creation(path) {
        return skipped_for_failed_folder(path);
    }

    match resources
        .rename_resource_file(
            &change.previous_path,
            &change.previous_reference,
            path,
            &change.reference,
        )
        .await
    {
        Ok(renamed) => {
            if let Some(folder) = renamed.previous_folder.filter(|f| !f.is_empty()) {
                orphans.push(parent_dir(&change.previous_path), folder);
            }
            JobResourceResult::new(path, FileAction::Renamed)
                .with_resource(renamed.name, &renamed.gvk)
        }
        Err(err) => {
            warn!(
                previous_path = %change.previous_path,
                path = %path,
                error = %err,
                "Failed to rename resource"
            );
            let error = ResourceError::rename(&change.previous_path, path, &err);
            failed(path, FileAction::Renamed, &err, error)
        }
    }
}

// ============================================================================
// Orphaned-folder cleanup
// ============================================================================

/// Folders that may have lost their backing directory during the pass,
/// keyed by directory in first-seen order.
#[derive(Debug, Default)]
struct OrphanedFolders {
    candidates: Vec<(String, String)>,
}

impl OrphanedFolders {
    fn push(&mut self, dir: &str, folder: String) {
        if dir.is_empty() || self.candidates.iter().any(|(known, _)| known == dir) {
            return;
        }
        self.candidates.push((dir.to_string(), folder));
    }

    /// Remove every candidate folder whose directory is gone from the
    /// current state of the source.
    async fn remove(
        self,
        cancel: &CancellationToken,
        repo: &dyn VersionedRepository,
        resources: &dyn RepositoryResources,
        progress: &dyn JobProgressRecorder,
    ) -> Result<()> {
        for (dir, folder) in self.candidates {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }

            if progress.has_dir_path_failed_deletion(&dir) {
                debug!(dir = %dir, "Keeping folder, a deletion inside it failed");
                continue;
            }

            // Empty ref reads the current state, not the stale previous ref.
            match repo.read(&dir, "").await {
                Ok(_) => {
                    debug!(dir = %dir, "Directory still exists in source, keeping folder");
                    continue;
                }
                Err(err) if err.is_not_found() => {}
                Err(err) => {
                    warn!(dir = %dir, error = %err, "Could not check directory, keeping folder");
                    continue;
                }
            }

            let result = match resources.remove_folder(&folder).await {
                Ok(()) => {
                    info!(dir = %dir, folder = %folder, "Removed orphaned folder");
                    JobResourceResult::folder(&dir, FileAction::Deleted).with_name(&folder)
                }
                Err(err) => {
                    error!(dir = %dir, folder = %folder, error = %err, "Failed to remove orphaned folder");
                    JobResourceResult::folder(&dir, FileAction::Deleted)
                        .with_name(&folder)
                        .with_error(ResourceError::folder_removal(&dir, &folder, &err))
                }
            };
            progress.record(result).await;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orphan_candidates_deduplicated_in_order() {
        let mut orphans = OrphanedFolders::default();
        orphans.push("dashboards/", "uid-1".into());
        orphans.push("alerts/", "uid-2".into());
        orphans.push("dashboards/", "uid-3".into());
        orphans.push("", "root".into());

        assert_eq!(
            orphans.candidates,
            vec![
                ("dashboards/".to_string(), "uid-1".to_string()),
                ("alerts/".to_string(), "uid-2".to_string()),
            ]
        );
    }
}
