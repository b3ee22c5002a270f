use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::env;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api::error::ApiResult;
use crate::api::handlers::{
    calculate_reputation_handler, get_reputation_handler, recompute_all_handler, top_rated_handler,
    trusted_sellers_handler,
};
use crate::db::connection::{get_pool, health_check as pool_health_check, init_pool};

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_target(false)
                .with_span_events(fmt::format::FmtSpan::CLOSE),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn,tower=warn")),
        )
        .init();
}

pub async fn create_app() -> Result<Router, Box<dyn std::error::Error>> {
    init_pool().await?;
    let pool = get_pool()?.clone();

    Ok(Router::new()
        .route("/reputation/{user_id}", get(get_reputation_handler))
        .route(
            "/reputation/{user_id}/calculate",
            post(calculate_reputation_handler),
        )
        .route("/reputation/recompute", post(recompute_all_handler))
        .route("/reputation/leaderboard/top-rated", get(top_rated_handler))
        .route(
            "/reputation/leaderboard/trusted-sellers",
            get(trusted_sellers_handler),
        )
        .route("/health", get(health_check))
        .with_state(pool)
        .layer(TraceLayer::new_for_http()))
}

async fn health_check(State(pool): State<PgPool>) -> ApiResult<&'static str> {
    pool_health_check(&pool).await?;
    Ok("OK")
}

pub async fn run_server() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting reputation scorer server");

    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C signal handler");
        info!("Shutting down gracefully...");
    };

    let app = create_app().await?;

    let port = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
