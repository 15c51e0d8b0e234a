//! Piko & Pearl Storefront - Shopper-facing JSON API.
//!
//! Serves carts, wishlists, accounts and checkout on `STOREFRONT_PORT` (3000
//! by default). Shopper documents are kept on disk and the catalog is read
//! from the admin service's REST API. This binary never writes the catalog.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use piko_pearl_storefront::config::{SentryConfig, StorefrontConfig};
use piko_pearl_storefront::state::AppState;
use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "piko_pearl_storefront=info,tower_http=info";

/// How often abandoned shopper directories are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let _sentry = init_telemetry(&config.sentry, config.json_logs);

    tracing::info!(
        storage_dir = %config.storage_dir.display(),
        catalog_api = %config.catalog_api.base_url,
        cache_ttl_secs = config.catalog_api.cache_ttl.as_secs(),
        "Configuration loaded"
    );

    let state = AppState::new(config.clone());
    let _sweeper = state.shoppers().spawn_sweeper(SWEEP_INTERVAL);

    let app = piko_pearl_storefront::app(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    tracing::info!(addr = %config.socket_addr(), "Storefront listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Storefront stopped");
    Ok(())
}

/// Start Sentry, then install the tracing subscriber.
///
/// Warnings and errors become Sentry events; info and debug lines ride along
/// as breadcrumbs on whatever event follows.
fn init_telemetry(sentry: &SentryConfig, json_logs: bool) -> Option<sentry::ClientInitGuard> {
    let guard = sentry.dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: sentry.environment.clone().map(Into::into),
                sample_rate: sentry.sample_rate,
                traces_sample_rate: sentry.traces_sample_rate,
                attach_stacktrace: true,
                send_default_pii: false,
                ..Default::default()
            },
        ))
    });

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = json_logs.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text = (!json_logs).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .with(sentry_tracing::layer().event_filter(|meta| match *meta.level() {
            Level::ERROR | Level::WARN => EventFilter::Event,
            Level::INFO | Level::DEBUG => EventFilter::Breadcrumb,
            _ => EventFilter::Ignore,
        }))
        .init();

    if guard.is_some() {
        tracing::info!("Sentry initialized");
    }
    guard
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutting down, draining in-flight requests");
}
