//! In-process Petstore for exercising the harness over real HTTP.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use bytes::Bytes;
use dashmap::DashMap;
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::debug;

use crate::model::Pet;
use crate::transport::{HttpPetApi, TrafficLogger};

/// Path prefix the mock serves under, matching the public deployment.
const BASE_PATH: &str = "/v2";

/// How long in-flight requests get to finish once the store is dropped.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

#[derive(Default)]
struct StoreState {
    pets: DashMap<i64, Pet>,
    next_id: AtomicI64,
}

/// Body of Petstore error and acknowledgement responses.
#[derive(Debug, Serialize)]
struct ApiMessage {
    code: i32,
    #[serde(rename = "type")]
    kind: &'static str,
    message: String,
}

/// A Petstore lookalike bound to a random loopback port.
///
/// Serves `POST /v2/pet`, `GET /v2/pet/{id}` and `DELETE /v2/pet/{id}` with
/// the status codes and body shapes of the public deployment. Dropping this
/// value stops the accept loop and closes every open connection, keep-alive
/// ones included.
///
/// # Examples
///
/// ```ignore
/// let store = MockPetStore::start().await?;
/// let service = PetStoreService::new(Arc::new(store.api(TrafficLogger::default())));
/// service.add_pet(&generate_default_pet()).await;
/// ```
pub struct MockPetStore {
    addr: SocketAddr,
    state: Arc<StoreState>,
    _shutdown: oneshot::Sender<()>,
}

impl MockPetStore {
    /// Binds to `127.0.0.1:0` and spawns the accept loop on the current runtime.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(StoreState {
            pets: DashMap::new(),
            next_id: AtomicI64::new(1),
        });

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let server_state = state.clone();

        tokio::spawn(async move {
            let graceful = GracefulShutdown::new();
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let state = server_state.clone();
                                let service = service_fn(move |req: Request<Incoming>| {
                                    let state = state.clone();
                                    async move {
                                        Ok::<_, Infallible>(route(req, &state).await)
                                    }
                                });

                                let conn = http1::Builder::new().serve_connection(io, service);
                                let conn = graceful.watch(conn);
                                tokio::spawn(async move {
                                    let _ = conn.await;
                                });
                            }
                            Err(_) => break,
                        }
                    }
                    _ = &mut shutdown_rx => {
                        break;
                    }
                }
            }

            if tokio::time::timeout(SHUTDOWN_GRACE, graceful.shutdown())
                .await
                .is_err()
            {
                debug!("mock pet store connections outlived the shutdown grace period");
            }
        });

        debug!(%addr, "mock pet store listening");

        Ok(Self {
            addr,
            state,
            _shutdown: shutdown_tx,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL to hand to [`HttpPetApi`], e.g. `http://127.0.0.1:41234/v2`.
    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, BASE_PATH)
    }

    /// An HTTP client pointed at this store.
    pub fn api(&self, traffic: TrafficLogger) -> HttpPetApi {
        HttpPetApi::new(self.base_url(), traffic)
    }

    /// Seeds a pet directly, bypassing HTTP.
    pub fn insert(&self, pet: Pet) -> i64 {
        let id = pet.id.unwrap_or_else(|| self.state.next_id.fetch_add(1, Ordering::SeqCst));
        self.state.pets.insert(id, Pet { id: Some(id), ..pet });
        id
    }

    pub fn get(&self, id: i64) -> Option<Pet> {
        self.state.pets.get(&id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: i64) -> bool {
        self.state.pets.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.state.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.pets.is_empty()
    }
}

async fn route(req: Request<Incoming>, state: &StoreState) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let path = path.strip_prefix(BASE_PATH).unwrap_or(&path);
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (&method, segments.as_slice()) {
        (&Method::POST, ["pet"]) => {
            let body = match req.into_body().collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(_) => return message(StatusCode::BAD_REQUEST, 400, "unknown", "bad input"),
            };
            create(state, &body)
        }
        (&Method::GET, ["pet", raw_id]) => match raw_id.parse::<i64>() {
            Ok(id) => match state.pets.get(&id) {
                Some(entry) => json(StatusCode::OK, entry.value()),
                None => message(StatusCode::NOT_FOUND, 1, "error", "Pet not found"),
            },
            Err(_) => message(
                StatusCode::NOT_FOUND,
                404,
                "unknown",
                format!("invalid pet id '{}'", raw_id),
            ),
        },
        (&Method::DELETE, ["pet", raw_id]) => match raw_id.parse::<i64>() {
            Ok(id) if state.pets.remove(&id).is_some() => {
                message(StatusCode::OK, 200, "unknown", id.to_string())
            }
            _ => empty(StatusCode::NOT_FOUND),
        },
        _ => message(StatusCode::NOT_FOUND, 404, "unknown", "not found"),
    }
}

fn create(state: &StoreState, body: &[u8]) -> Response<Full<Bytes>> {
    let mut pet: Pet = match serde_json::from_slice(body) {
        Ok(pet) => pet,
        Err(_) => return message(StatusCode::BAD_REQUEST, 400, "unknown", "bad input"),
    };
    let id = pet
        .id
        .unwrap_or_else(|| state.next_id.fetch_add(1, Ordering::SeqCst));
    pet.id = Some(id);
    state.pets.insert(id, pet.clone());
    json(StatusCode::OK, &pet)
}

fn json<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(value).unwrap_or_default();
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}

fn message(
    status: StatusCode,
    code: i32,
    kind: &'static str,
    text: impl Into<String>,
) -> Response<Full<Bytes>> {
    json(
        status,
        &ApiMessage {
            code,
            kind,
            message: text.into(),
        },
    )
}

fn empty(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}
