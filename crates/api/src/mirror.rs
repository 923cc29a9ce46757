//! Write-through of story changes to the static mirror file.
//!
//! Runs after the mutating transaction has committed. Nothing here can fail
//! the request: every error is logged and dropped.

use folio_core::mirror::MirrorOutcome;
use folio_core::types::DbId;
use folio_db::repositories::StoryRepo;

use crate::state::AppState;

/// Re-assemble `story_id` and overwrite the mirror with it.
pub async fn sync_story(state: &AppState, story_id: DbId) {
    let document = match StoryRepo::document(&state.pool, story_id).await {
        Ok(Some(document)) => document,
        Ok(None) => {
            tracing::debug!(story_id, "Story vanished before mirror sync");
            return;
        }
        Err(e) => {
            tracing::warn!(story_id, error = %e, "Failed to load story for mirror sync");
            return;
        }
    };

    match state.mirror.write(&document).await {
        Ok(MirrorOutcome::Written) => {
            tracing::debug!(story_id, path = ?state.mirror.path(), "Mirror updated");
        }
        Ok(MirrorOutcome::SkippedMissing) => {
            tracing::warn!(
                story_id,
                path = ?state.mirror.path(),
                "Mirror file not found, skipping sync to avoid creating it"
            );
        }
        Ok(MirrorOutcome::Disabled) => {}
        Err(e) => {
            tracing::warn!(story_id, error = %e, "Failed to sync story mirror");
        }
    }
}
