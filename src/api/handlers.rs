//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::sim::allocator;
use crate::sim::types::Season;

use super::AppState;
use super::types::{
    AllocationPoint, AllocationQuery, ErrorResponse, PlanSummary, ResultsResponse, SiteSummary,
};

/// Returns site summary, per-plan results, and the best-plan index.
///
/// `GET /results` → 200 + `ResultsResponse` JSON
pub async fn get_results(State(state): State<Arc<AppState>>) -> Json<ResultsResponse> {
    Json(ResultsResponse {
        site: SiteSummary::from(&state.inputs),
        best_plan: state.best,
        plans: state.results.iter().map(PlanSummary::from).collect(),
    })
}

/// Returns the 24-hour allocation profile.
///
/// `GET /allocation` → 200 + `Vec<AllocationPoint>` for the snapshot season
/// `GET /allocation?season=winter` → same, for the named season
/// `GET /allocation?season=monsoon` → 400 + `ErrorResponse`
pub async fn get_allocation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AllocationQuery>,
) -> impl IntoResponse {
    let season = match query.season.as_deref() {
        None => state.inputs.season,
        Some(name) => match Season::parse(name) {
            Some(season) => season,
            None => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!(
                            "unknown season \"{name}\" (expected spring_fall, summer, or winter)"
                        ),
                    }),
                ));
            }
        },
    };

    let points: Vec<AllocationPoint> = allocator::hourly_profile(&state.inputs, season)
        .iter()
        .map(AllocationPoint::from)
        .collect();
    Ok(Json(points))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::catalog::PlanCatalog;
    use crate::config::SiteConfig;
    use crate::sim::comparator;

    fn make_test_state() -> Arc<AppState> {
        let inputs = SiteConfig::baseline().to_inputs();
        let results = comparator::compare(&inputs, &PlanCatalog::builtin().plans);
        let best = comparator::best_by_profit(&results);
        Arc::new(AppState {
            inputs,
            results,
            best,
        })
    }

    #[tokio::test]
    async fn results_returns_200_with_all_sections() {
        let state = make_test_state();
        let app = router(state);

        let req = Request::builder()
            .uri("/results")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("site").is_some());
        assert!(json.get("best_plan").is_some());
        let plans = json["plans"].as_array().unwrap();
        assert_eq!(plans.len(), 4);
        assert_eq!(plans[0]["id"], 0);
    }

    #[tokio::test]
    async fn allocation_defaults_to_snapshot_season() {
        let state = make_test_state();
        let app = router(state);

        let req = Request::builder()
            .uri("/allocation")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.len(), 24);
        assert_eq!(json[0]["hour"], 0);
    }

    #[tokio::test]
    async fn allocation_honors_season_query() {
        let state = make_test_state();
        let app = router(state);

        let req = Request::builder()
            .uri("/allocation?season=winter")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        // Winter reassigns hour 17 from mid to heavy.
        assert_eq!(json[17]["tier"], "heavy");
    }

    #[tokio::test]
    async fn allocation_unknown_season_returns_400() {
        let state = make_test_state();
        let app = router(state);

        let req = Request::builder()
            .uri("/allocation?season=monsoon")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("error").is_some());
    }
}
