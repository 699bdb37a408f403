//! Kit Return Webhook - Shippo delivery listener.
//!
//! Serves `POST /shippo/webhook` on `HOST:PORT` (default `0.0.0.0:3000`).
//!
//! # Security
//!
//! - Contains HIGH PRIVILEGE Shopify Admin API token
//! - Webhook signatures are not verified
//!
//! # Architecture
//!
//! - Axum web framework
//! - Shopify Admin GraphQL API for order tags and fulfillment updates
//! - Sentry for error tracking (when `SENTRY_DSN` is set)

#![cfg_attr(not(test), forbid(unsafe_code))]

use kit_return_webhook::{
    AppState, build_router,
    config::{FallbackIdentifiers, LogFormat, WebhookConfig},
};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &WebhookConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            send_default_pii: false,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Fallbacks are used as given; flag ones that name another resource type.
fn warn_on_foreign_fallbacks(fallback: &FallbackIdentifiers) {
    if let Some(gid) = fallback.order_gid.as_ref().filter(|g| !g.names_resource()) {
        tracing::warn!(order_gid = %gid, "FALLBACK_ORDER_GID names another resource type");
    }
    if let Some(id) = fallback.fulfillment_id.as_ref().filter(|f| !f.names_resource()) {
        tracing::warn!(fulfillment_id = %id, "FALLBACK_FULFILLMENT_ID names another resource type");
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load configuration from environment (needed for Sentry init)
    let config = WebhookConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kit_return_webhook=info,tower_http=debug".into());

    let is_json = config.log_format == LogFormat::Json;
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let state = AppState::new(config);
    let config = state.config();

    tracing::info!(
        store = %config.shopify.store,
        api_version = %config.shopify.api_version,
        endpoint = %config.shopify.graphql_endpoint(),
        "Configuration loaded"
    );
    warn_on_foreign_fallbacks(&config.fallback);

    let addr = config.socket_addr();

    let app = build_router(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    tracing::info!("kit return webhook listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
