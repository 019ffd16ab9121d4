//! # devcat: device catalog and client account API
//!
//! `devcat` serves a read-only device catalog and lets API clients manage the users they own.
//! Clients authenticate with email and password, receive a JWT, and present it as a bearer
//! token on every other `/api` route.
//!
//! ## Request Flow
//!
//! Every handler follows the same pipeline: the [`CurrentClient`](auth::current_user::CurrentClient)
//! extractor authenticates the caller, path and query input is validated, referenced records
//! are resolved, ownership is checked ([`auth::permissions`]), and then the handler either
//! reads through the tag cache ([`cache`]) or writes through the [`Store`](db::store::Store)
//! and invalidates the affected tags before responding.
//!
//! ## Core Components
//!
//! - [`api`]: route handlers and wire models
//! - [`auth`]: sessions, password hashing, ownership checks
//! - [`cache`]: cache-aside listings with tag-based invalidation
//! - [`db`]: the `Store` trait with PostgreSQL and in-memory implementations
//! - [`config`]: YAML + environment configuration
//! - [`telemetry`]: tracing setup with optional OTLP export
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use devcat::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = devcat::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     devcat::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! With no `database` section the in-memory store is used and seeded with demo data; log in
//! as `demo@example.com` / `password`.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod seed;
pub mod telemetry;
pub mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::{self, Method},
    routing::get,
};
use bon::Builder;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;

use crate::{
    auth::password::Argon2Params,
    cache::Caches,
    config::{CorsOrigin, DatabaseConfig},
    db::store::{Store, create_store},
    openapi::ApiDoc,
};

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder()
///     .store(store)
///     .caches(Caches::new(&config.cache))
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub caches: Caches,
    pub config: Config,
}

/// Get the devcat database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.security.cors;

    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                origins.push(url.origin().ascii_serialization().parse::<http::HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
        .allow_credentials(cors_config.allow_credentials)
        .expose_headers([http::header::LOCATION]);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router: API routes, health check, docs, optional metrics, CORS
/// and request tracing.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers::{auth, client_users, products};

    let cors_layer = create_cors_layer(&state.config)?;
    let enable_metrics = state.config.enable_metrics;

    let api_routes = Router::new()
        .route("/login_check", axum::routing::post(auth::login_check))
        .route("/products", get(products::list_products))
        .route("/products/{productId}", get(products::get_product))
        .route(
            "/clients/{clientId}/users",
            get(client_users::list_users).post(client_users::create_user),
        )
        .route(
            "/clients/{clientId}/users/{userId}",
            get(client_users::get_user).delete(client_users::delete_user),
        )
        .with_state(state);

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api/doc.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api", api_routes)
        .merge(Scalar::with_url("/api/doc", ApiDoc::openapi()))
        .layer(cors_layer);

    let router = if enable_metrics { with_metrics(router) } else { router };

    Ok(router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    ))
}

#[cfg(feature = "metrics")]
fn with_metrics(router: Router) -> Router {
    use axum_prometheus::PrometheusMetricLayer;

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    router
        .route("/internal/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer)
}

#[cfg(not(feature = "metrics"))]
fn with_metrics(router: Router) -> Router {
    tracing::warn!("enable_metrics is set but devcat was built without the `metrics` feature");
    router
}

/// A configured application, ready to serve.
///
/// 1. **Create**: [`Application::new`] opens the store, runs migrations and seeds demo data
/// 2. **Serve**: [`Application::serve`] binds the TCP listener and handles requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests drain and the pool
///    and telemetry are closed
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting devcat with configuration: {:#?}", config);

        let (store, pool) = create_store(&config.database).await?;

        if matches!(config.database, DatabaseConfig::Memory) || config.seed_demo_data {
            seed::seed_demo_data(store.as_ref(), Argon2Params::from(&config.auth.password)).await?;
        }

        let state = AppState::builder()
            .store(store)
            .caches(Caches::new(&config.cache))
            .config(config.clone())
            .build();
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("devcat listening on http://{}, docs at http://localhost:{}/api/doc", bind_addr, self.config.port);

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
