//! Ordering of diff entries before they are applied.

use bridge_traits::{FileAction, VersionedFileChange};

/// Weight used to order changes. Lower runs first.
///
/// Deletions and renames go ahead of creations so freed quota slots and
/// vacated paths are available by the time new files are written.
pub fn action_priority(action: FileAction) -> u8 {
    match action {
        FileAction::Deleted => 0,
        FileAction::Renamed => 1,
        FileAction::Updated => 2,
        FileAction::Created => 3,
        FileAction::Ignored => 4,
    }
}

/// Stable sort by [`action_priority`]. Changes with the same action keep the
/// order the repository returned them in.
pub fn sort_changes_by_action_priority(changes: &mut [VersionedFileChange]) {
    changes.sort_by_key(|change| action_priority(change.action));
}
