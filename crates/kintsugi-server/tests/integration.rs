use axum::http::StatusCode;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn router(dir: &TempDir) -> axum::Router {
    kintsugi_server::build_router(dir.path().to_path_buf())
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a POST request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_fetch_profile() {
    let dir = TempDir::new().unwrap();

    let (status, body) = post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "local");
    assert_eq!(body["stats"]["total_visits"], 1);

    let (status, body) = get(router(&dir), "/api/profiles/local").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "local");
    assert_eq!(body["total_repairs"], 0);
}

#[tokio::test]
async fn duplicate_profile_conflicts() {
    let dir = TempDir::new().unwrap();
    post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;
    let (status, _) = post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn missing_profile_is_404() {
    let dir = TempDir::new().unwrap();
    let (status, _) = get(router(&dir), "/api/profiles/nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_profile_id_is_400() {
    let dir = TempDir::new().unwrap();
    let (status, _) = post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "BAD ID" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Check-in
// ---------------------------------------------------------------------------

#[tokio::test]
async fn checkin_gap_generates_cracks() {
    let dir = TempDir::new().unwrap();
    post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;

    // Rewind the stored profile three days so today's check-in sees a gap.
    let mut profile = kintsugi_core::profile::Profile::load(dir.path(), "local").unwrap();
    profile.last_visit -= chrono::Duration::days(3);
    profile.created_at = profile.last_visit;
    profile.save(dir.path()).unwrap();

    let (status, body) = post_json(
        router(&dir),
        "/api/profiles/local/checkin",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_today"], true);
    assert_eq!(body["missed_days"], 2);
    assert_eq!(body["streak"], 1);

    // Same-day repeat is a no-op with its own message.
    let (status, body) = post_json(
        router(&dir),
        "/api/profiles/local/checkin",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_today"], false);
}

#[tokio::test]
async fn checkin_rejects_far_future_timestamp() {
    let dir = TempDir::new().unwrap();
    post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;

    // One request with a distant `at` must not fabricate years of absence.
    let far = chrono::Utc::now() + chrono::Duration::days(400);
    let (status, body) = post_json(
        router(&dir),
        "/api/profiles/local/checkin",
        serde_json::json!({ "at": far.to_rfc3339() }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("future"));

    // The profile is untouched.
    let profile = kintsugi_core::profile::Profile::load(dir.path(), "local").unwrap();
    assert!(profile.cracks.is_empty());
}

#[tokio::test]
async fn checkin_message_is_localized() {
    let dir = TempDir::new().unwrap();
    post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;
    let (_, body) = post_json(
        router(&dir),
        "/api/profiles/local/checkin",
        serde_json::json!({ "lang": "ja" }),
    )
    .await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("チェックイン") || message.contains("おかえり"));
}

// ---------------------------------------------------------------------------
// Anxiety and activities
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anxiety_then_activity_repairs_fifo() {
    let dir = TempDir::new().unwrap();
    post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;

    let (status, body) = post_json(
        router(&dir),
        "/api/profiles/local/anxiety",
        serde_json::json!({ "text": "deadline dread" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let crack_id = body["crack_id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        router(&dir),
        "/api/profiles/local/activities",
        serde_json::json!({ "kind": "tatami" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["repaired_crack"], crack_id.as_str());
    assert_eq!(body["total_repairs"], 1);
    assert_eq!(body["stats"]["tatami_sessions"], 1);
}

#[tokio::test]
async fn empty_anxiety_text_is_400() {
    let dir = TempDir::new().unwrap();
    post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;
    let (status, _) = post_json(
        router(&dir),
        "/api/profiles/local/anxiety",
        serde_json::json!({ "text": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_activity_kind_rejected() {
    let dir = TempDir::new().unwrap();
    post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;
    let (status, _) = post_json(
        router(&dir),
        "/api/profiles/local/activities",
        serde_json::json!({ "kind": "dojo" }),
    )
    .await;
    // serde rejects the unknown enum variant before the handler runs.
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn duplicate_activity_submission_is_noop() {
    let dir = TempDir::new().unwrap();
    post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;

    let submit = serde_json::json!({ "kind": "study", "activity_id": "sub-1" });
    let (_, first) = post_json(router(&dir), "/api/profiles/local/activities", submit.clone()).await;
    assert_eq!(first["duplicate"], false);

    let (status, second) =
        post_json(router(&dir), "/api/profiles/local/activities", submit).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["duplicate"], true);
    assert_eq!(second["stats"]["study_sessions"], 1);
}

// ---------------------------------------------------------------------------
// Vessel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn vessel_is_deterministic() {
    let dir = TempDir::new().unwrap();
    post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;
    post_json(
        router(&dir),
        "/api/profiles/local/anxiety",
        serde_json::json!({ "text": "worry" }),
    )
    .await;

    // Far-past instant: days_between is absolute, so patina is pinned at the
    // clamp no matter when this test runs.
    let uri = "/api/profiles/local/vessel?at=2000-01-01T00:00:00Z";
    let (status, a) = get(router(&dir), uri).await;
    assert_eq!(status, StatusCode::OK);
    let (_, b) = get(router(&dir), uri).await;
    assert_eq!(a, b);
    assert_eq!(a["cracks"].as_array().unwrap().len(), 1);
    let path = a["cracks"][0]["path"].as_str().unwrap();
    assert!(path.starts_with("M "));
    assert_eq!(a["patina"], 100.0);
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sync_merges_counter_maxima() {
    let dir = TempDir::new().unwrap();
    post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;

    // Client snapshot with higher counters but older last_visit.
    let stored = kintsugi_core::profile::Profile::load(dir.path(), "local").unwrap();
    let mut client = stored.clone();
    client.stats.garden_actions = 42;
    client.stats.longest_streak = 9;
    client.last_visit = stored.last_visit - chrono::Duration::days(1);

    let (status, body) = post_json(
        router(&dir),
        "/api/profiles/local/sync",
        serde_json::to_value(&client).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["garden_actions"], 42);
    assert_eq!(body["stats"]["longest_streak"], 9);

    let merged = kintsugi_core::profile::Profile::load(dir.path(), "local").unwrap();
    assert_eq!(merged.stats.garden_actions, 42);
}

#[tokio::test]
async fn sync_rejects_mismatched_id() {
    let dir = TempDir::new().unwrap();
    post_json(
        router(&dir),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;
    let stored = kintsugi_core::profile::Profile::load(dir.path(), "local").unwrap();
    let mut snapshot = serde_json::to_value(&stored).unwrap();
    snapshot["id"] = serde_json::json!("other");

    let (status, _) = post_json(router(&dir), "/api/profiles/local/sync", snapshot).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Koan
// ---------------------------------------------------------------------------

#[tokio::test]
async fn koan_stable_per_date_and_lang() {
    let dir = TempDir::new().unwrap();
    let uri = "/api/koan?lang=ja&date=2024-06-15";
    let (status, a) = get(router(&dir), uri).await;
    assert_eq!(status, StatusCode::OK);
    let (_, b) = get(router(&dir), uri).await;
    assert_eq!(a["koan"], b["koan"]);

    let (_, en) = get(router(&dir), "/api/koan?lang=en&date=2024-06-15").await;
    assert_ne!(a["koan"], en["koan"]);
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mutation_endpoints_rate_limited() {
    let dir = TempDir::new().unwrap();
    let app_state = kintsugi_server::state::AppState::new(dir.path().to_path_buf());
    post_json(
        kintsugi_server::build_router_with_state(app_state.clone()),
        "/api/profiles",
        serde_json::json!({ "id": "local" }),
    )
    .await;

    // Shared limiter across requests: drive it past the window limit.
    let mut last = StatusCode::OK;
    for i in 0..=kintsugi_server::limit::MUTATION_LIMIT {
        let app = kintsugi_server::build_router_with_state(app_state.clone());
        let (status, _) = post_json(
            app,
            "/api/profiles/local/anxiety",
            serde_json::json!({ "text": format!("worry {i}") }),
        )
        .await;
        last = status;
    }
    assert_eq!(last, StatusCode::TOO_MANY_REQUESTS);
}
