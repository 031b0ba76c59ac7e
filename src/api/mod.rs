use crate::api::handlers::{auth, health};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, patch, post},
    Extension, Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub(crate) mod handlers;
pub(crate) mod notify;
mod openapi;

pub use openapi::ApiDoc;

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, dsn: String, notify_poll_interval: u64) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    let generator: Arc<dyn auth::codes::CodeGenerator> = Arc::new(auth::codes::ThreadRngGenerator);

    // Background worker polls notification_outbox (DB-backed queue) for
    // pending rows, delivers/logs them, and retries failures with backoff.
    let notify_config =
        notify::NotifyWorkerConfig::new().with_poll_interval_seconds(notify_poll_interval);
    notify::spawn_notify_worker(
        pool.clone(),
        Arc::new(notify::LogNotificationSender),
        notify_config,
    );

    let app = Router::new()
        .route("/auth/register", post(auth::register::register))
        .route(
            "/auth/agree-to-terms/:ic_number",
            patch(auth::profile::agree_to_terms),
        )
        .route("/auth/set-pin", post(auth::pin::set_pin))
        .route(
            "/auth/enable-biometric/:ic_number",
            patch(auth::profile::enable_biometric),
        )
        .route(
            "/auth/send-verification-code",
            post(auth::verification::send_code),
        )
        .route(
            "/auth/confirm-verification-code",
            post(auth::verification::confirm_code),
        )
        .route("/auth/login", post(auth::login::login))
        .route("/health", get(health::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &Request<Body>| {
                        HeaderValue::from_str(Ulid::new().to_string().as_str()).ok()
                    },
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(generator))
                .layer(Extension(pool)),
        );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
