use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use kintsugi_core::messages::{self, Event};
use kintsugi_core::profile::ActivityDetails;
use kintsugi_core::types::{ActivityKind, Lang};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct ActivityBody {
    pub kind: ActivityKind,
    #[serde(default)]
    pub details: Option<ActivityDetails>,
    /// Optional idempotency key; resubmitting the same id is a no-op.
    #[serde(default)]
    pub activity_id: Option<String>,
    #[serde(default)]
    pub lang: Option<Lang>,
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

/// POST /api/profiles/:id/activities — record a completed therapy session,
/// repairing the oldest outstanding crack if one exists.
pub async fn record_activity(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ActivityBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    super::check_rate(&app, &id, "activity")?;

    let lang = body.lang.unwrap_or_default();
    let now = body.at.unwrap_or_else(Utc::now);

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut profile = kintsugi_core::profile::Profile::load(&root, &id)?;
        let outcome = profile.record_activity(body.kind, body.details, body.activity_id, now);
        if !outcome.duplicate {
            profile.save(&root)?;
        }

        let message = messages::confirmation(
            lang,
            Event::ActivityRecorded {
                kind: body.kind,
                repaired: outcome.repaired_crack.is_some(),
            },
        );

        Ok::<_, kintsugi_core::KintsugiError>(serde_json::json!({
            "repaired_crack": outcome.repaired_crack,
            "duplicate": outcome.duplicate,
            "total_repairs": profile.total_repairs,
            "stats": profile.stats,
            "message": message,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
