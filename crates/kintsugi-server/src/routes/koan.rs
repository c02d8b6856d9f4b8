use axum::extract::Query;
use axum::Json;
use chrono::{NaiveDate, Utc};
use kintsugi_core::messages;
use kintsugi_core::types::Lang;

use crate::error::AppError;

#[derive(serde::Deserialize, Default)]
pub struct KoanQuery {
    #[serde(default)]
    pub lang: Option<Lang>,
    /// Calendar date for the rotation; defaults to today (UTC).
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// GET /api/koan — the daily koan. Static fallback content, served when no
/// AI guidance is configured and as the deterministic daily rotation.
pub async fn get_koan(Query(query): Query<KoanQuery>) -> Result<Json<serde_json::Value>, AppError> {
    let lang = query.lang.unwrap_or_default();
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    Ok(Json(serde_json::json!({
        "lang": lang,
        "date": date,
        "koan": messages::daily_koan(lang, date),
    })))
}
