use axum::routing::{delete, get, post, put};
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod models;
mod routes;
mod schema;
mod services;

use config::AppConfig;
use wayfinder_shared::clients::db::{create_pool, DbPool};
use wayfinder_shared::clients::email::EmailClient;
use wayfinder_shared::clients::geocode::GeocodeClient;
use wayfinder_shared::clients::redis::RedisClient;
use wayfinder_shared::clients::session::SessionStore;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub redis: RedisClient,
    pub sessions: SessionStore,
    pub email: EmailClient,
    pub geocoder: GeocodeClient,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wayfinder_shared::middleware::init_tracing("wayfinder-api");
    let metrics_handle = wayfinder_shared::middleware::init_metrics();

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url);
    let redis = RedisClient::connect(&config.redis_url).await?;
    let sessions = SessionStore::new(redis.clone());
    let email = EmailClient::new(&config.email_api_key, &config.email_from, &config.email_from_name);
    let geocoder = GeocodeClient::new(&config.geocode_base_url);

    let state = Arc::new(AppState { db, config, redis, sessions, email, geocoder });

    let admin_routes = Router::new()
        .route("/places", get(routes::moderation::list_places))
        .route("/places/:id/approve", put(routes::moderation::approve_place))
        .route("/places/:id/reject", put(routes::moderation::reject_place))
        .route("/places/:id/archive", put(routes::moderation::archive_place))
        .route("/places/:id/restore", put(routes::moderation::restore_place))
        .route("/places/:id", delete(routes::moderation::delete_place))
        .route("/reviews", get(routes::moderation::list_reviews))
        .route("/reviews/:id/uphold", put(routes::moderation::uphold_review))
        .route("/reviews/:id/dismiss", put(routes::moderation::dismiss_review))
        .route("/reviews/:id/archive", put(routes::moderation::archive_review))
        .route("/reviews/:id/restore", put(routes::moderation::restore_review))
        .route("/reviews/:id", delete(routes::moderation::delete_review))
        .route("/reports", get(routes::moderation::list_reports))
        .route("/audit-log", get(routes::moderation::audit_log))
        .route("/stats", get(routes::moderation::stats));

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(move || async move { metrics_handle.render() }))
        .route("/auth/signup", post(routes::accounts::signup))
        .route("/auth/activate", post(routes::accounts::activate))
        .route("/auth/login", post(routes::accounts::login))
        .route("/account/profile", get(routes::accounts::profile))
        .route("/account/contributions", get(routes::accounts::contributions))
        .route("/categories", get(routes::places::list_categories))
        .route("/places", get(routes::places::search_places).post(routes::places::create_place))
        .route("/places/:id", get(routes::places::place_detail))
        .route("/places/:id/opening-hours", put(routes::places::update_opening_hours))
        .route("/places/:id/like", post(routes::places::toggle_like))
        .route(
            "/places/:id/reviews",
            get(routes::reviews::list_place_reviews).post(routes::reviews::create_review),
        )
        .route("/reviews/:id/report", post(routes::reviews::report_review))
        .nest("/admin", admin_routes)
        .layer(middleware::from_fn(wayfinder_shared::middleware::session_middleware))
        .layer(middleware::from_fn(wayfinder_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "wayfinder-api starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
