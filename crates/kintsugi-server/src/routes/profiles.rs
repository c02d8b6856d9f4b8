use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct CreateProfileBody {
    pub id: String,
}

/// POST /api/profiles — create a new profile. Creation counts as the first
/// visit.
pub async fn create_profile(
    State(app): State<AppState>,
    Json(body): Json<CreateProfileBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let profile = kintsugi_core::profile::Profile::create(&root, &body.id)?;
        Ok::<_, kintsugi_core::KintsugiError>(serde_json::json!({
            "id": profile.id,
            "created_at": profile.created_at,
            "stats": profile.stats,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/profiles/:id — full profile snapshot.
pub async fn get_profile(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let profile = kintsugi_core::profile::Profile::load(&root, &id)?;
        Ok::<_, kintsugi_core::KintsugiError>(serde_json::to_value(&profile)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
