//! Server entrypoint: config, database, dependency wiring, scheduler,
//! and the HTTP listener.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use leadgen::{
    AggregationPipeline, DuckDuckGoAdapter, GooglePlacesAdapter, OpenCorporatesAdapter,
    SourceAdapter,
};

use server_core::config::Config;
use server_core::domains::campaigns::{CampaignOrchestrator, CampaignStore, PostgresCampaignStore};
use server_core::kernel::embedding::OpenAiEmbeddingService;
use server_core::kernel::jobs::{InProcessJobQueue, JobQueue, JobQueueConfig};
use server_core::kernel::notify::{NoopNotifier, WebhookNotifier};
use server_core::kernel::scheduler::{CampaignScheduler, SchedulerConfig};
use server_core::kernel::traits::BaseNotifier;
use server_core::kernel::ServerDeps;
use server_core::server::build_app;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let store: Arc<dyn CampaignStore> = Arc::new(PostgresCampaignStore::new(pool));

    let mut adapters: Vec<Arc<dyn SourceAdapter>> = vec![Arc::new(DuckDuckGoAdapter::new())];
    if let Some(key) = &config.opencorporates_api_key {
        adapters.push(Arc::new(OpenCorporatesAdapter::new(key.clone())));
    }
    if let Some(key) = &config.google_maps_api_key {
        adapters.push(Arc::new(GooglePlacesAdapter::new(key.clone())));
    }
    info!(sources = adapters.len(), "configured source adapters");

    let mut pipeline = AggregationPipeline::new(adapters)
        .with_per_adapter_timeout(Duration::from_secs(config.adapter_timeout_secs));
    if let Some(key) = &config.openai_api_key {
        pipeline = pipeline.with_embedder(Arc::new(OpenAiEmbeddingService::new(key.clone())));
    } else {
        info!("no embedding key configured; scoring is lexical-only");
    }

    let notifier: Arc<dyn BaseNotifier> = match &config.notify_webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => Arc::new(NoopNotifier),
    };

    let orchestrator = Arc::new(CampaignOrchestrator::new(
        Arc::clone(&store),
        Arc::new(pipeline),
        notifier,
        config.notify_recipients.clone(),
        config.lead_limit,
    ));

    let queue = Arc::new(InProcessJobQueue::start(
        Arc::clone(&orchestrator),
        JobQueueConfig {
            workers: config.job_workers,
            ..JobQueueConfig::default()
        },
    ));

    let scheduler = Arc::new(CampaignScheduler::new(
        Arc::clone(&store),
        Arc::clone(&queue) as Arc<dyn JobQueue>,
        SchedulerConfig {
            poll_interval: Duration::from_secs(config.scheduler_poll_secs),
        },
    ));
    let scheduler_handle = {
        let scheduler = Arc::clone(&scheduler);
        tokio::spawn(async move { scheduler.run().await })
    };

    let deps = Arc::new(ServerDeps {
        store,
        orchestrator,
        queue: Arc::clone(&queue) as Arc<dyn JobQueue>,
    });
    let app = build_app(deps);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    scheduler.request_shutdown();
    scheduler_handle.abort();
    queue.shutdown().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
