//! HTTP surface binding the catalog operations 1:1 to routes.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};

use crate::assets::{AssetStore, MAX_UPLOAD_BYTES};
use crate::catalog::CatalogStore;

pub mod error;
mod items;
mod uploads;

pub const CATALOG_FILENAME: &str = "search_data.json";
pub const UPLOADS_DIRNAME: &str = "uploads";

// Oversized payloads must reach the handler so they are rejected with the
// size-validation reason rather than a multipart framing error.
const BODY_LIMIT_BYTES: usize = 2 * MAX_UPLOAD_BYTES;

pub(crate) struct ServerState {
    pub(crate) catalog: CatalogStore,
    pub(crate) assets: AssetStore,
}

pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Server {
    /// Binds `bind` and serves in a background task. The catalog document
    /// and the uploads directory live under `data_dir`.
    pub async fn start(bind: &str, data_dir: &Path) -> Result<Self, String> {
        let state = Arc::new(ServerState {
            catalog: CatalogStore::new(data_dir.join(CATALOG_FILENAME)),
            assets: AssetStore::new(data_dir.join(UPLOADS_DIRNAME)),
        });
        let app = router(state);
        let listener = TcpListener::bind(bind)
            .await
            .map_err(|error| error.to_string())?;
        let addr = listener
            .local_addr()
            .map_err(|error| error.to_string())?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        tracing::info!("catalog server listening on {addr}");
        Ok(Server {
            addr,
            shutdown: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown(&mut self) -> Result<(), String> {
        if let Some(sender) = self.shutdown.take() {
            sender
                .send(())
                .map_err(|_| "failed to send server shutdown signal".to_string())
        } else {
            Ok(())
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/", get(items::root))
        .route("/health", get(items::health))
        .route("/search", get(items::search))
        .route("/items", get(items::list).post(items::create))
        .route("/items/:id", get(items::get_one))
        .route("/categories", get(items::categories))
        .route("/upload", post(uploads::upload))
        .route("/uploads/:filename", get(uploads::serve))
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
}
