use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use kintsugi_core::vessel::VesselVisual;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize, Default)]
pub struct VesselQuery {
    /// Evaluation timestamp; defaults to server wall-clock. Lets clients and
    /// tests render a vessel for a fixed instant.
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

/// GET /api/profiles/:id/vessel — derived vessel visual for display.
pub async fn get_vessel(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<VesselQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let now = query.at.unwrap_or_else(Utc::now);

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let profile = kintsugi_core::profile::Profile::load(&root, &id)?;
        let visual = VesselVisual::compute(&profile, now);
        Ok::<_, kintsugi_core::KintsugiError>(serde_json::to_value(&visual)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
