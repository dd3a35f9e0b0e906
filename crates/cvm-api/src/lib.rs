use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::Method,
    http::Request,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
    middleware,
    middleware::Next,
    response::Response,
    routing::{get, post},
};
use clap::Parser;
use dotenvy::dotenv;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use cvm_common::db::{DEFAULT_POOL_SIZE, create_pool_from_url, run_migrations};
use cvm_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use cvm_common::matching::{MatchingConfig, MatchingEngine};
use cvm_common::scoring_service::{
    ScoringService, ScoringServiceConfig, ScriptedScoringService, build_scoring_service,
};
use cvm_common::store::{InMemoryProfileStore, PgProfileStore, ProfileStore};

pub mod error;
pub mod handlers;

use error::ApiError;
use handlers::{health, matching};

const SHUTDOWN_DRAIN_GRACE: std::time::Duration = std::time::Duration::from_millis(200);
const MAX_BODY_BYTES: usize = 512 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "cvm-api", about = "HTTP API for CV and job matching")]
struct Cli {
    /// PostgreSQL connection string; in-memory store when unset
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Server port
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "CVM_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,

    /// Maximum pooled database connections
    #[arg(long, env = "CVM_DB_POOL_SIZE", default_value_t = DEFAULT_POOL_SIZE)]
    db_pool_size: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub db_pool_size: usize,
}

impl AppConfig {
    fn from_cli(cli: Cli) -> Result<Self, ApiError> {
        let cors_origins = parse_origins(&cli.cors_origins);

        if cors_origins.iter().any(|origin| origin == "*") {
            return Err(ApiError::Config(
                "CVM_CORS_ORIGINS must list explicit origins".into(),
            ));
        }
        if cli.db_pool_size == 0 {
            return Err(ApiError::Config("CVM_DB_POOL_SIZE must be positive".into()));
        }

        Ok(Self {
            database_url: cli.database_url.filter(|url| !url.trim().is_empty()),
            port: cli.port,
            cors_origins,
            db_pool_size: cli.db_pool_size,
        })
    }

    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            port: 3001,
            cors_origins: vec!["http://localhost:3000".into()],
            db_pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

pub struct AppState {
    pub engine: Arc<MatchingEngine>,
    pub config: AppConfig,
    pub readiness: Arc<AtomicBool>,
}

pub type SharedState = Arc<AppState>;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

async fn attach_request_id_context(req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    error::with_request_id(request_id, next.run(req)).await
}

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_header = request_id_header.clone();

    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(&trace_header)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    let api_routes = Router::new()
        .route("/job-matching", post(matching::job_matching))
        .route("/cv-matching", post(matching::cv_matching));

    Router::new()
        .route("/health", get(health::readyz))
        .route("/livez", get(health::livez))
        .route("/readyz", get(health::readyz))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(attach_request_id_context))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid::default(),
        ))
        .layer(cors)
        .with_state(state)
}

/// State wired to the given store and scoring service with default matching
/// settings.
pub fn state_with(store: Arc<dyn ProfileStore>, service: Arc<dyn ScoringService>) -> SharedState {
    let engine = MatchingEngine::new(store, service, MatchingConfig::default());
    Arc::new(AppState {
        engine: Arc::new(engine),
        config: AppConfig::for_tests(),
        readiness: Arc::new(AtomicBool::new(true)),
    })
}

/// Empty in-memory store and a scripted scoring service that always answers 70.
pub fn test_state() -> SharedState {
    state_with(
        Arc::new(InMemoryProfileStore::new()),
        Arc::new(ScriptedScoringService::new(70)),
    )
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn ProfileStore>, ApiError> {
    let Some(url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL is not set; profiles are kept in memory only");
        return Ok(Arc::new(InMemoryProfileStore::new()));
    };

    let pool = create_pool_from_url(url, config.db_pool_size)
        .map_err(|err| ApiError::Config(format!("failed to create pool: {err}")))?;
    run_migrations(&pool)
        .await
        .map_err(|err| ApiError::Persistence(format!("failed to run migrations: {err}")))?;

    Ok(Arc::new(PgProfileStore::new(pool)))
}

pub async fn run() -> Result<(), ApiError> {
    dotenv().ok();
    init_tracing_subscriber(env!("CARGO_PKG_NAME"));
    install_tracing_panic_hook(env!("CARGO_PKG_NAME"));

    let cli = Cli::parse();
    let config = AppConfig::from_cli(cli)?;

    let store = build_store(&config).await?;
    let scoring_service = build_scoring_service(&ScoringServiceConfig::from_env())
        .map_err(|err| ApiError::Config(format!("failed to build scoring service: {err}")))?;
    let backend = store.backend();
    let service_name = scoring_service.name().to_string();
    let engine = MatchingEngine::new(store, scoring_service, MatchingConfig::from_env());
    info!(
        store = backend,
        scoring_service = %service_name,
        shortlist_size = engine.config().shortlist_size,
        candidate_results = engine.config().candidate_results,
        failure_policy = ?engine.config().failure_policy,
        "matching engine configured"
    );

    let state = Arc::new(AppState {
        engine: Arc::new(engine),
        config: config.clone(),
        readiness: Arc::new(AtomicBool::new(true)),
    });

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let app = create_router(state.clone());

    info!(%addr, "cvm-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.readiness.clone()))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal(readiness: Arc<AtomicBool>) {
    wait_for_termination().await;
    readiness.store(false, Ordering::SeqCst);
    info!("shutdown requested; draining connections");

    // /readyz reports not ready during this window.
    tokio::time::sleep(SHUTDOWN_DRAIN_GRACE).await;
}

#[cfg(unix)]
async fn wait_for_termination() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {},
                _ = sigterm.recv() => {},
            }
        }
        Err(err) => {
            warn!(error = %err, "SIGTERM handler unavailable; waiting for ctrl-c only");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn cli(cors_origins: &str, db_pool_size: usize) -> Cli {
        Cli {
            database_url: Some("  ".into()),
            port: 3001,
            cors_origins: cors_origins.into(),
            db_pool_size,
        }
    }

    #[tokio::test]
    async fn echoes_caller_request_id_and_generates_missing_ones() {
        let app = create_router(test_state());

        let echoed = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/livez")
                    .header("x-request-id", "caller-7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let generated = app
            .oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(echoed.status(), StatusCode::OK);
        assert_eq!(echoed.headers()["x-request-id"], "caller-7");
        assert!(!generated.headers()["x-request-id"].is_empty());
    }

    #[test]
    fn config_splits_origins_and_ignores_blank_database_url() {
        let config =
            AppConfig::from_cli(cli("http://a.example, ,http://b.example", 4)).unwrap();

        assert_eq!(
            config.cors_origins,
            vec!["http://a.example".to_string(), "http://b.example".to_string()]
        );
        assert!(config.database_url.is_none());
        assert_eq!(config.db_pool_size, 4);
    }

    #[test]
    fn config_rejects_wildcard_origin_and_empty_pool() {
        assert!(matches!(
            AppConfig::from_cli(cli("*", 4)),
            Err(ApiError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_cli(cli("http://a.example", 0)),
            Err(ApiError::Config(_))
        ));
    }
}
