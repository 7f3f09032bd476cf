//! HTTP surface
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/` | service metadata |
//! | POST | `/` | form lookup |
//! | GET | `/cache/stats` | cache statistics |
//! | DELETE | `/cache/clear` | empty the cache |
//! | GET | `/{vrm}` | vehicle lookup |

pub mod context;
pub mod error;
pub mod routes;

pub use context::{AppState, ServiceInfo};
pub use error::ApiError;

use crate::config::ServerConfig;
use axum::routing::{delete, get};
use axum::Router;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the service router
pub fn router(state: Arc<AppState>, cors_enabled: bool) -> Router {
    let router = Router::new()
        .route("/", get(routes::metadata).post(routes::lookup_form))
        .route("/cache/stats", get(routes::cache_stats))
        .route("/cache/clear", delete(routes::clear_cache))
        .route("/:vrm", get(routes::lookup_path))
        .layer(TraceLayer::new_for_http());

    let router = if cors_enabled {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}

/// Serve until `shutdown` flips to `true`
///
/// In-flight requests get `shutdown_grace_seconds` to finish; the cache is
/// drained once the listener stops either way.
pub async fn serve(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(address = %address, cors = config.cors_enabled, "HTTP server listening");

    let app = router(state.clone(), config.cors_enabled);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown.clone()))
        .into_future();
    let grace = Duration::from_secs(config.shutdown_grace_seconds);

    tokio::select! {
        result = server => result?,
        _ = async {
            wait_for_shutdown(shutdown).await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(
                grace_seconds = config.shutdown_grace_seconds,
                "Grace period elapsed with requests still in flight"
            );
        }
    }

    state.drain();
    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    loop {
        let stop = *shutdown.borrow_and_update();
        if stop {
            return;
        }
        if shutdown.changed().await.is_err() {
            // sender gone: no signal can arrive any more
            std::future::pending::<()>().await;
        }
    }
}
