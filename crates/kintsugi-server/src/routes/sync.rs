use axum::extract::{Path, State};
use axum::Json;
use kintsugi_core::error::KintsugiError;
use kintsugi_core::profile::Profile;

use crate::error::AppError;
use crate::state::AppState;

/// POST /api/profiles/:id/sync — merge a client snapshot into the stored
/// profile. Monotone counters take the element-wise max; the snapshot with
/// the later last_visit contributes the event history. Returns the merged
/// profile, which is also what was persisted.
pub async fn sync_profile(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(snapshot): Json<Profile>,
) -> Result<Json<serde_json::Value>, AppError> {
    super::check_rate(&app, &id, "sync")?;

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        if snapshot.id != id {
            return Err(KintsugiError::InvalidProfile(format!(
                "snapshot id '{}' does not match path id '{}'",
                snapshot.id, id
            )));
        }
        snapshot.validate()?;

        let merged = match Profile::load(&root, &id) {
            Ok(stored) => kintsugi_core::merge::merge(&stored, &snapshot),
            Err(KintsugiError::ProfileNotFound(_)) => snapshot,
            Err(e) => return Err(e),
        };
        merged.save(&root)?;

        Ok(serde_json::to_value(&merged)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
