use std::error::Error;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use saas_entitlements::adapters::{
    webhook_router, InMemoryFeatureCache, InMemoryPlanFeatureRepository, InMemoryPlanRepository,
    InMemorySubscriptionRepository, InMemoryWebhookEventLog, LemonSqueezyClient,
    LemonSqueezyConfig, RedisFeatureCache, WebhookAppState,
};
use saas_entitlements::application::{
    PlanCatalogSync, PlanFeatureManager, SubscriptionEventSubscriber, SubscriptionManager,
    WebhookPipeline,
};
use saas_entitlements::config::{
    AppConfig, CacheBackend, CacheConfig, LemonSqueezySettings, LogFormat, ServerConfig,
};
use saas_entitlements::domain::webhook::WebhookVerifier;
use saas_entitlements::ports::{FeatureCache, PlanRepository, SubscriptionRepository};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);

    let registry = Arc::new(config.feature_registry()?);
    info!(features = registry.len(), "Feature catalogue loaded");

    let plans: Arc<dyn PlanRepository> = Arc::new(InMemoryPlanRepository::new());
    let subscriptions: Arc<dyn SubscriptionRepository> = Arc::new(InMemorySubscriptionRepository::new());
    let cache = build_cache(&config.cache).await?;

    let mut app = Router::new();

    let settings = &config.payment.lemon_squeezy;
    if settings.enabled {
        let client = Arc::new(build_client(settings, config.payment.return_url.as_deref())?);

        if settings.sync_catalog_on_start {
            let report = PlanCatalogSync::new(client.clone(), plans.clone()).sync().await?;
            info!(created = report.created, updated = report.updated, "Plans synced from LemonSqueezy");
        }

        let manager = Arc::new(SubscriptionManager::new(subscriptions.clone(), plans.clone(), client));
        let features = PlanFeatureManager::new(
            registry,
            Arc::new(InMemoryPlanFeatureRepository::new()),
            plans,
            manager.clone(),
            cache,
        );
        info!(
            available = features.get_available_features().len(),
            "Plan feature manager ready"
        );

        let secret = settings
            .webhook_secret
            .clone()
            .ok_or("LemonSqueezy webhook secret missing")?;
        let pipeline = WebhookPipeline::new(
            WebhookVerifier::new(secret),
            SubscriptionEventSubscriber::new(subscriptions, manager),
            Arc::new(InMemoryWebhookEventLog::new()),
        );
        app = app.merge(webhook_router().with_state(WebhookAppState::new(Arc::new(pipeline))));
    } else {
        warn!("LemonSqueezy integration disabled, webhook route not mounted");
    }

    let app = app
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, environment = %config.server.environment, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_new(&server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match server.log_format() {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

async fn build_cache(config: &CacheConfig) -> Result<Arc<dyn FeatureCache>, BoxError> {
    match config.backend {
        CacheBackend::Memory => Ok(Arc::new(InMemoryFeatureCache::new())),
        CacheBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or("cache.redis_url is required for the redis backend")?;
            let client = redis::Client::open(url)?;
            let conn = client.get_multiplexed_tokio_connection().await?;

            let mut cache = RedisFeatureCache::new(conn).with_namespace(config.namespace.clone());
            if let Some(ttl) = config.ttl_secs {
                cache = cache.with_ttl(ttl);
            }
            info!("Using Redis feature cache");
            Ok(Arc::new(cache))
        }
    }
}

fn build_client(settings: &LemonSqueezySettings, return_url: Option<&str>) -> Result<LemonSqueezyClient, BoxError> {
    let api_key = settings
        .api_key
        .clone()
        .ok_or("LemonSqueezy API key missing")?;
    let store_id = settings
        .store_id
        .clone()
        .ok_or("LemonSqueezy store id missing")?;
    let return_url = return_url.ok_or("payment.return_url missing")?;

    let client_config = LemonSqueezyConfig::new(api_key, store_id, return_url)
        .with_base_url(settings.api_base_url.clone())
        .with_timeout(settings.timeout());
    Ok(LemonSqueezyClient::new(client_config)?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received ctrl+C signal");
}
