//! Integration tests for Piko & Pearl.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p piko-pearl-integration-tests
//! ```
//!
//! Each test starts its own admin and storefront servers on ephemeral ports.
//! The admin keeps its catalog in a temporary directory; the storefront
//! keeps shoppers and accounts in memory and reads the catalog from the
//! admin over HTTP.
//!
//! # Test Categories
//!
//! - `storefront_*` - Storefront API tests (cart, wishlist, auth, catalog, checkout)
//! - `admin_*` - Admin API tests

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use reqwest::Client;
use secrecy::SecretString;
use tempfile::TempDir;
use tokio::net::TcpListener;
use url::Url;

use piko_pearl_admin::config::AdminConfig;
use piko_pearl_storefront::config::{CatalogApiConfig, StorefrontConfig};

/// Bearer token the test admin server accepts.
pub const ADMIN_TOKEN: &str = "k9Xq2LmT7vBz4RwP8nYc3HjD6sFg1QaE";

/// Running admin and storefront servers.
pub struct TestContext {
    pub storefront_url: String,
    pub admin_url: String,
    _data_dir: TempDir,
}

impl TestContext {
    /// Start both servers.
    pub async fn start() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create admin data dir");

        let admin_listener = bind().await;
        let admin_addr = local_addr(&admin_listener);
        let admin_config = AdminConfig {
            host: admin_addr.ip(),
            port: admin_addr.port(),
            data_dir: data_dir.path().to_path_buf(),
            api_token: SecretString::from(ADMIN_TOKEN),
            json_logs: false,
            sentry: piko_pearl_admin::config::SentryConfig::default(),
        };
        let admin_state = piko_pearl_admin::state::AppState::open(admin_config)
            .await
            .expect("Failed to open admin catalog");
        serve(admin_listener, piko_pearl_admin::app(admin_state));
        let admin_url = format!("http://{admin_addr}");

        let storefront_listener = bind().await;
        let storefront_addr = local_addr(&storefront_listener);
        let storefront_url = format!("http://{storefront_addr}");
        let storefront_config = StorefrontConfig {
            host: storefront_addr.ip(),
            port: storefront_addr.port(),
            base_url: storefront_url.clone(),
            storage_dir: PathBuf::from("unused"),
            catalog_api: CatalogApiConfig {
                base_url: Url::parse(&admin_url).expect("Invalid admin URL"),
                cache_ttl: Duration::from_secs(60),
            },
            json_logs: false,
            sentry: piko_pearl_storefront::config::SentryConfig::default(),
        };
        let storefront_state = piko_pearl_storefront::state::AppState::in_memory(storefront_config);
        serve(
            storefront_listener,
            piko_pearl_storefront::app(storefront_state),
        );

        Self {
            storefront_url,
            admin_url,
            _data_dir: data_dir,
        }
    }

    /// A client with its own cookie jar, so each one is a separate shopper.
    #[must_use]
    pub fn client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Full storefront URL for `path`.
    #[must_use]
    pub fn storefront(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// Full admin URL for `path`.
    #[must_use]
    pub fn admin(&self, path: &str) -> String {
        format!("{}{path}", self.admin_url)
    }
}

async fn bind() -> TcpListener {
    TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener")
}

fn local_addr(listener: &TcpListener) -> SocketAddr {
    listener.local_addr().expect("Listener has no address")
}

fn serve(listener: TcpListener, app: Router) {
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Test server failed");
    });
}
