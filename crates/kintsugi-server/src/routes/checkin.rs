use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use kintsugi_core::messages::{self, Event};
use kintsugi_core::types::Lang;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize, Default)]
pub struct CheckinBody {
    #[serde(default)]
    pub lang: Option<Lang>,
    /// Override for the visit timestamp; defaults to server wall-clock.
    /// Tolerated up to [`max_clock_skew_ahead`] ahead of server time.
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

/// How far ahead of server time a client-supplied `at` may be. Covers time
/// zone and clock drift; anything beyond is rejected so one request cannot
/// fabricate a years-long absence gap.
pub fn max_clock_skew_ahead() -> Duration {
    Duration::days(1)
}

/// POST /api/profiles/:id/checkin — record the daily visit.
pub async fn checkin(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CheckinBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    super::check_rate(&app, &id, "checkin")?;

    let lang = body.lang.unwrap_or_default();
    let now = body.at.unwrap_or_else(Utc::now);
    if now > Utc::now() + max_clock_skew_ahead() {
        return Err(AppError::bad_request(
            "'at' is too far in the future",
        ));
    }

    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut profile = kintsugi_core::profile::Profile::load(&root, &id)?;
        let outcome = profile.record_visit(now);
        if outcome.first_today {
            profile.save(&root)?;
        }

        let event = if !outcome.first_today {
            Event::CheckinRepeat
        } else if outcome.missed_days > 0 {
            Event::CheckinMissed {
                missed: outcome.missed_days,
            }
        } else {
            Event::CheckinFirst {
                streak: outcome.streak,
            }
        };

        Ok::<_, kintsugi_core::KintsugiError>(serde_json::json!({
            "first_today": outcome.first_today,
            "missed_days": outcome.missed_days,
            "streak": outcome.streak,
            "stats": profile.stats,
            "message": messages::confirmation(lang, event),
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
