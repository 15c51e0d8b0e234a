//! Piko & Pearl Admin - Catalog API and category management.
//!
//! Serves the admin API on `ADMIN_PORT` (3001 by default). Categories and
//! products live as JSON documents under `ADMIN_DATA_DIR`, and category writes
//! are guarded by a bearer token.

#![cfg_attr(not(test), forbid(unsafe_code))]

use piko_pearl_admin::config::{AdminConfig, SentryConfig};
use piko_pearl_admin::state::AppState;
use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "piko_pearl_admin=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    let _sentry = init_telemetry(&config.sentry, config.json_logs);

    let state = AppState::open(config.clone()).await?;
    let app = piko_pearl_admin::app(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    tracing::info!(
        addr = %config.socket_addr(),
        data_dir = %config.data_dir.display(),
        "Admin API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Admin API stopped");
    Ok(())
}

/// Start Sentry, then install the tracing subscriber.
///
/// Sentry has to be up before the subscriber so its layer has a client to
/// forward to. The returned guard flushes pending events when dropped.
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
