use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    http::{
        HeaderValue, Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use dotenv::dotenv;
use mimalloc::MiMalloc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::{Env, ServerConfig},
    error::AppError,
    store::{Store, postgres::PgStore},
};

mod config;
mod error;
mod extract;
mod identity;
mod meetup;
mod schema;
mod store;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Clone)]
pub struct App {
    pub store: Arc<dyn Store>,
}

pub fn router(app: App) -> Router {
    Router::new()
        .nest("/meetups", meetup::routes::route())
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .with_state(app)
}

async fn not_found() -> AppError {
    ("Not found.".to_string(), StatusCode::NOT_FOUND).into()
}

async fn method_not_allowed(method: Method) -> AppError {
    (
        format!("Method \"{method}\" not allowed."),
        StatusCode::METHOD_NOT_ALLOWED,
    )
        .into()
}

fn init_tracing(env: Env) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env.default_log_filter()));

    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Env::Dev => registry.with(tracing_subscriber::fmt::layer()).init(),
        Env::Staging | Env::Production => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = match (&config.cors_allowed_origins, config.env) {
        (Some(origins), _) => origins,
        (None, Env::Dev) => return CorsLayer::permissive(),
        (None, _) => return CorsLayer::new(),
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin: {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();

    let (env, env_warning) = match Env::from_env() {
        Ok(env) => (env, None),
        Err((fallback, warning)) => (fallback, Some(warning)),
    };
    init_tracing(env);
    if let Some(warning) = env_warning {
        tracing::warn!("{warning}");
    }

    let config = ServerConfig::new_from_env(env);

    let store = PgStore::connect(
        &config.database_url,
        config.database_max_connections,
        config.database_acquire_timeout,
    )?;

    let app = router(App {
        store: Arc::new(store),
    })
    .layer(TraceLayer::new_for_http())
    .layer(cors_layer(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(?env, "Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
