#![allow(dead_code)]
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};

enum Route {
    Full(StatusCode, Vec<u8>),
    /// Sends the prefix, then drops the connection mid-body.
    Truncated(Vec<u8>),
}

#[derive(Default)]
struct Routes {
    bodies: RwLock<HashMap<String, Route>>,
    hits: AtomicUsize,
}

/// HTTP server on a random local port serving whatever bodies the test
/// registered. Unknown paths answer 404.
pub struct MockListServer {
    addr: SocketAddr,
    routes: Arc<Routes>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockListServer {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(Routes::default());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new().fallback(serve).with_state(routes.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Self {
            addr,
            routes,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn set(&self, path: &str, body: impl Into<Vec<u8>>) {
        self.set_status(path, StatusCode::OK, body).await;
    }

    pub async fn set_status(&self, path: &str, status: StatusCode, body: impl Into<Vec<u8>>) {
        self.routes
            .bodies
            .write()
            .await
            .insert(path.to_string(), Route::Full(status, body.into()));
    }

    pub async fn set_truncated(&self, path: &str, prefix: impl Into<Vec<u8>>) {
        self.routes
            .bodies
            .write()
            .await
            .insert(path.to_string(), Route::Truncated(prefix.into()));
    }

    pub fn hits(&self) -> usize {
        self.routes.hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockListServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn serve(State(routes): State<Arc<Routes>>, uri: Uri) -> Response {
    routes.hits.fetch_add(1, Ordering::SeqCst);
    match routes.bodies.read().await.get(uri.path()) {
        Some(Route::Full(status, body)) => (*status, body.clone()).into_response(),
        Some(Route::Truncated(prefix)) => {
            let chunks: Vec<Result<Vec<u8>, std::io::Error>> = vec![
                Ok(prefix.clone()),
                Err(std::io::Error::other("connection reset")),
            ];
            Response::new(Body::from_stream(futures::stream::iter(chunks)))
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
