//! REST API endpoints for the TVT league service
//!
//! Three public endpoints plus a health check:
//!
//! - `GET /api/live-score?gw=&matchupId=` — scored matchups for a gameweek
//! - `GET /api/rankings?gw=` — replayed standings for both groups
//! - `POST /api/captain-selection` — record a captain selection (insert-only)

use crate::live::compute_live_score;
use crate::rankings::compute_rankings;
use crate::state::AppState;
use serde::{Deserialize, Serialize};
use tvt_scoring::SelectionRequest;
use warp::http::StatusCode;
use warp::Filter;

/// Query parameters for the live-score endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveScoreParams {
    pub gw: Option<u32>,
    pub matchup_id: Option<String>,
}

/// Query parameters for the rankings endpoint
#[derive(Debug, Deserialize)]
pub struct RankingsParams {
    pub gw: Option<u32>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

/// Error detail
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

fn error_body(code: &str, message: impl Into<String>) -> ErrorResponse {
    ErrorResponse {
        error: ErrorDetail { code: code.to_string(), message: message.into() },
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

/// Get the live-score payload for a gameweek
pub async fn get_live_score(
    params: LiveScoreParams,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let payload = compute_live_score(&state, params.gw, params.matchup_id.as_deref()).await;
    Ok(warp::reply::json(&payload))
}

/// Get the standings payload for a gameweek
pub async fn get_rankings(
    params: RankingsParams,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let payload = compute_rankings(&state, params.gw).await;
    Ok(warp::reply::json(&payload))
}

/// Record a captain selection
pub async fn post_captain_selection(
    request: SelectionRequest,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let selection = match request.validate() {
        Ok(selection) => selection,
        Err(e) => {
            return Ok(warp::reply::with_status(
                warp::reply::json(&error_body("INVALID_REQUEST", e.to_string())),
                StatusCode::BAD_REQUEST,
            ));
        }
    };

    match state.store.insert_selection(&selection).await {
        Ok(()) => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({ "ok": true, "selection": selection })),
            StatusCode::CREATED,
        )),
        Err(e) if e.is_conflict() => Ok(warp::reply::with_status(
            warp::reply::json(&error_body("ALREADY_SELECTED", "Captain already selected.")),
            StatusCode::CONFLICT,
        )),
        Err(e) => {
            tracing::error!("Failed to record captain selection: {}", e);
            Ok(warp::reply::with_status(
                warp::reply::json(&error_body(
                    "STORAGE_ERROR",
                    "Failed to record captain selection.",
                )),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

/// Create REST API routes
pub fn create_routes(
    state: AppState,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    // Live score endpoint
    let live_score = warp::path("api")
        .and(warp::path("live-score"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<LiveScoreParams>())
        .and(state_filter.clone())
        .and_then(|params: LiveScoreParams, state: AppState| async move {
            get_live_score(params, state).await
        });

    // Rankings endpoint
    let rankings = warp::path("api")
        .and(warp::path("rankings"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<RankingsParams>())
        .and(state_filter.clone())
        .and_then(|params: RankingsParams, state: AppState| async move {
            get_rankings(params, state).await
        });

    // Captain selection endpoint
    let captain_selection = warp::path("api")
        .and(warp::path("captain-selection"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter)
        .and_then(|request: SelectionRequest, state: AppState| async move {
            post_captain_selection(request, state).await
        });

    // Health check endpoint
    let health = warp::path("health").and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    });

    live_score.or(rankings).or(captain_selection).or(health).with(
        warp::cors()
            .allow_any_origin()
            .allow_headers(vec!["content-type"])
            .allow_methods(vec!["GET", "POST", "OPTIONS"]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::offline_state;
    use result_store::InMemoryStore;
    use std::sync::Arc;

    fn selection_body(status: &str) -> serde_json::Value {
        serde_json::json!({
            "gw": 30,
            "matchupId": "m1",
            "side": "home",
            "captainEntryId": 101,
            "status": status
        })
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let routes = create_routes(offline_state(Arc::new(InMemoryStore::new())));
        let response = warp::test::request().method("GET").path("/health").reply(&routes).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn captain_selection_is_created_once_then_conflicts() {
        let routes = create_routes(offline_state(Arc::new(InMemoryStore::new())));

        let response = warp::test::request()
            .method("POST")
            .path("/api/captain-selection")
            .json(&selection_body("selected"))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(body["selection"]["captain_entry_id"], 101);

        let response = warp::test::request()
            .method("POST")
            .path("/api/captain-selection")
            .json(&selection_body("selected"))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"]["code"], "ALREADY_SELECTED");
        assert_eq!(body["error"]["message"], "Captain already selected.");
    }

    #[tokio::test]
    async fn invalid_selection_is_rejected() {
        let routes = create_routes(offline_state(Arc::new(InMemoryStore::new())));

        // Pending is never a valid submission.
        let response = warp::test::request()
            .method("POST")
            .path("/api/captain-selection")
            .json(&selection_body("pending"))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
        assert_eq!(body["error"]["message"], "Invalid captain status.");

        // Selected without an entry id.
        let mut missing_id = selection_body("selected");
        missing_id["captainEntryId"] = serde_json::Value::Null;
        let response = warp::test::request()
            .method("POST")
            .path("/api/captain-selection")
            .json(&missing_id)
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"]["message"], "Captain entryId is required.");
    }

    #[tokio::test]
    async fn rankings_endpoint_serves_baseline() {
        let routes = create_routes(offline_state(Arc::new(InMemoryStore::new())));
        let response =
            warp::test::request().method("GET").path("/api/rankings?gw=27").reply(&routes).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["gw"], 27);
        assert_eq!(body["baselineGw"], 27);
        assert_eq!(body["groupA"][0]["team_name"], "Alpha");
    }

    #[tokio::test]
    async fn live_score_endpoint_serves_payload() {
        let routes = create_routes(offline_state(Arc::new(InMemoryStore::new())));
        let response = warp::test::request()
            .method("GET")
            .path("/api/live-score?gw=30&matchupId=m2")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["gw"], 30);
        assert_eq!(body["matchups"].as_array().unwrap().len(), 1);
        assert_eq!(body["matchups"][0]["id"], "m2");
    }
}
