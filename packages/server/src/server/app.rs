//! Axum application: routes and handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::kernel::jobs::SubmitOutcome;
use crate::kernel::ServerDeps;

pub fn build_app(deps: Arc<ServerDeps>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/campaigns/:id/run", post(trigger_run))
        .layer(TraceLayer::new_for_http())
        .with_state(deps)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Queues an on-demand run for a campaign.
///
/// Responds 202 when queued, 404 when the campaign does not exist, and
/// 409 when a run is already in flight.
async fn trigger_run(
    State(deps): State<Arc<ServerDeps>>,
    Path(id): Path<Uuid>,
) -> Response {
    if deps.orchestrator.is_running(id) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "a run for this campaign is already in flight" })),
        )
            .into_response();
    }

    let campaign = match deps.store.find_by_id(id).await {
        Ok(Some(campaign)) => campaign,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "campaign not found" })),
            )
                .into_response();
        }
        Err(err) => {
            tracing::error!(campaign_id = %id, error = %err, "campaign lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "campaign lookup failed" })),
            )
                .into_response();
        }
    };

    match deps.queue.submit(id).await {
        Ok(SubmitOutcome::Accepted(job_id)) => {
            info!(campaign_id = %id, %job_id, name = %campaign.name, "manual run queued");
            (
                StatusCode::ACCEPTED,
                Json(json!({ "job_id": job_id, "campaign_id": id })),
            )
                .into_response()
        }
        Err(err) => {
            tracing::error!(campaign_id = %id, error = %err, "failed to queue manual run");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "job queue unavailable" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use tower::ServiceExt;

    use leadgen::{AggregationPipeline, MockAdapter, Source, SourceAdapter};

    use super::*;
    use crate::domains::campaigns::models::Campaign;
    use crate::domains::campaigns::store::MemoryCampaignStore;
    use crate::domains::campaigns::CampaignOrchestrator;
    use crate::kernel::jobs::{InProcessJobQueue, JobQueueConfig};
    use crate::kernel::notify::MockNotifier;

    fn test_deps() -> (Arc<ServerDeps>, Arc<MemoryCampaignStore>) {
        let store = Arc::new(MemoryCampaignStore::new());
        let adapter: Arc<dyn SourceAdapter> = Arc::new(MockAdapter::new(Source::DuckDuckGo));
        let orchestrator = Arc::new(CampaignOrchestrator::new(
            Arc::clone(&store) as Arc<dyn crate::domains::campaigns::CampaignStore>,
            Arc::new(AggregationPipeline::new(vec![adapter])),
            Arc::new(MockNotifier::new()),
            vec![],
            20,
        ));
        let queue = Arc::new(InProcessJobQueue::start(
            Arc::clone(&orchestrator),
            JobQueueConfig::default(),
        ));
        let deps = Arc::new(ServerDeps {
            store: Arc::clone(&store) as Arc<dyn crate::domains::campaigns::CampaignStore>,
            orchestrator,
            queue,
        });
        (deps, store)
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (deps, _) = test_deps();
        let app = build_app(deps);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn run_for_unknown_campaign_is_404() {
        let (deps, _) = test_deps();
        let app = build_app(deps);

        let response = app
            .oneshot(
                Request::post(format!("/campaigns/{}/run", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn run_for_known_campaign_is_accepted() {
        let (deps, store) = test_deps();
        let campaign = Campaign::new_scheduled(
            "Outreach",
            vec!["software".to_string()],
            "Minnesota",
            Some(Utc::now()),
        );
        let id = campaign.id;
        store.insert_campaign(campaign);

        let app = build_app(deps);
        let response = app
            .oneshot(
                Request::post(format!("/campaigns/{id}/run"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn malformed_campaign_id_is_rejected() {
        let (deps, _) = test_deps();
        let app = build_app(deps);

        let response = app
            .oneshot(
                Request::post("/campaigns/not-a-uuid/run")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
