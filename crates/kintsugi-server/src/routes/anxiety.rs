use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use kintsugi_core::messages::{self, Event};
use kintsugi_core::types::Lang;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct AnxietyBody {
    pub text: String,
    #[serde(default)]
    pub lang: Option<Lang>,
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

/// POST /api/profiles/:id/anxiety — record a distress report as a new crack.
pub async fn record_anxiety(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AnxietyBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    super::check_rate(&app, &id, "anxiety")?;

    if body.text.trim().is_empty() {
        return Err(AppError::bad_request("anxiety text must not be empty"));
    }

    let lang = body.lang.unwrap_or_default();
    let now = body.at.unwrap_or_else(Utc::now);

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut profile = kintsugi_core::profile::Profile::load(&root, &id)?;
        let crack_id = profile.record_anxiety(body.text, now).id.clone();
        profile.save(&root)?;

        Ok::<_, kintsugi_core::KintsugiError>(serde_json::json!({
            "crack_id": crack_id,
            "cracks": profile.cracks.len(),
            "message": messages::confirmation(lang, Event::AnxietyRecorded),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
