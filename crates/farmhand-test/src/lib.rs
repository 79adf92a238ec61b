//! Helpers for testing the farmhand service layer.
//!
//! When writing tests, keep the following points in mind:
//!
//!  - In every test, call [`setup`]. This will set up the logger so that all
//!    console output is captured by the test runner.
//!
//!  - When using [`CatalogServer`], make sure that the server is held until
//!    all requests to it have been made. If the server is dropped, the ports
//!    remain open and all connections to it will time out. To avoid this,
//!    assign it to a variable: `let server = test::CatalogServer::new();`.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::fmt;
use url::Url;

/// Setup the test environment.
///
///  - Initializes logs: The logger only captures logs from farmhand crates
///    and mutes all other logs (such as hyper).
pub fn setup() {
    fmt()
        .with_env_filter(EnvFilter::new("farmhand_service=trace,farmhand_forms=trace"))
        .with_target(false)
        .pretty()
        .with_test_writer()
        .try_init()
        .ok();
}

/// A test server that binds to a random port and serves a web app.
///
/// This server requires a `tokio` runtime and is supposed to be run in a
/// `tokio::test`. It automatically stops serving when dropped.
#[derive(Debug)]
pub struct Server {
    pub handle: tokio::task::JoinHandle<()>,
    pub socket: SocketAddr,
}

impl Server {
    /// Creates a new test server from the given router.
    pub fn with_router(router: Router) -> Self {
        let listener = std::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).unwrap();
        listener.set_nonblocking(true).unwrap();
        let socket = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, router).await.unwrap();
        });

        Self { handle, socket }
    }

    /// Returns the socket address that this server listens on.
    pub fn addr(&self) -> SocketAddr {
        self.socket
    }

    /// Returns the port that this server listens on.
    pub fn port(&self) -> u16 {
        self.addr().port()
    }

    /// Returns a full URL pointing to the given path.
    ///
    /// This URL uses `localhost` as hostname.
    pub fn url(&self, path: &str) -> Url {
        let path = path.trim_start_matches('/');
        format!("http://localhost:{}/{}", self.port(), path)
            .parse()
            .unwrap()
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

type Crops = Arc<Mutex<BTreeMap<String, serde_json::Value>>>;

/// A crop catalog stub with per-route hit counting.
///
/// Serves registered crops under `/api/v1/crops/:slug` in the catalog's
/// envelope format, plus a few routes for provoking failures:
///
/// - `/respond_statuscode/:num/*tail` responds with the given status code.
/// - `/garbage_data/*tail` responds with a body that is not valid JSON.
/// - `/delay/:time/*path` sleeps, then redirects to `/{path}`.
pub struct CatalogServer {
    server: Server,
    hits: Arc<Mutex<BTreeMap<String, usize>>>,
    crops: Crops,
}

impl CatalogServer {
    pub fn new() -> Self {
        let hits: Arc<Mutex<BTreeMap<String, usize>>> = Arc::default();
        let crops: Crops = Arc::default();

        let hitcounter = {
            let hits = Arc::clone(&hits);
            move |req: Request, next: Next| {
                let hits = Arc::clone(&hits);
                async move {
                    {
                        let mut hits = hits.lock().unwrap();
                        let hits = hits.entry(req.uri().path().to_owned()).or_default();
                        *hits += 1;
                    }

                    next.run(req).await
                }
            }
        };

        let router = Router::new()
            .route("/api/v1/crops/:slug", get(get_crop))
            .route(
                "/delay/:time/*path",
                get(
                    |Path((time, path)): Path<(String, String)>| async move {
                        let duration = humantime::parse_duration(&time).unwrap();
                        tokio::time::sleep(duration).await;

                        (StatusCode::FOUND, [("Location", format!("/{path}"))])
                    },
                ),
            )
            .route(
                "/respond_statuscode/:num/*tail",
                get(|Path((num, _)): Path<(u16, String)>| async move {
                    StatusCode::from_u16(num).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                }),
            )
            .route(
                "/garbage_data/*tail",
                get(|Path(tail): Path<String>| async move { tail }),
            )
            .layer(middleware::from_fn(hitcounter))
            .with_state(Arc::clone(&crops));

        let server = Server::with_router(router);

        Self {
            server,
            hits,
            crops,
        }
    }

    /// Registers a crop payload in the catalog's envelope format.
    pub fn insert_crop(&self, slug: &str, svg_icon: Option<&str>) {
        let payload = json!({
            "data": {
                "attributes": {
                    "slug": slug,
                    "svg_icon": svg_icon,
                    "spread": 30,
                }
            }
        });
        self.crops.lock().unwrap().insert(slug.to_owned(), payload);
    }

    /// Returns the total number of requests served so far, and resets the
    /// counters.
    pub fn accesses(&self) -> usize {
        let map = std::mem::take(&mut *self.hits.lock().unwrap());
        map.into_values().sum()
    }

    /// Returns all hits grouped by request path, and resets the counters.
    pub fn all_hits(&self) -> Vec<(String, usize)> {
        let map = std::mem::take(&mut *self.hits.lock().unwrap());
        map.into_iter().collect()
    }

    /// The base URL crop slugs are joined onto.
    pub fn crops_url(&self) -> Url {
        self.server.url("/api/v1/crops/")
    }

    /// Returns a full URL pointing to the given path.
    pub fn url(&self, path: &str) -> Url {
        self.server.url(path)
    }
}

impl Default for CatalogServer {
    fn default() -> Self {
        Self::new()
    }
}

async fn get_crop(State(crops): State<Crops>, Path(slug): Path<String>) -> axum::response::Response {
    let crops = crops.lock().unwrap();
    match crops.get(&slug) {
        Some(payload) => Json(payload.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "crop not found" })),
        )
            .into_response(),
    }
}
