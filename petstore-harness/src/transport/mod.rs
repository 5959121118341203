//! The HTTP collaborator the service wrapper talks to.
//!
//! [`PetApi`] is the narrow interface over the `/pet` endpoints. Production
//! code uses [`HttpPetApi`]; tests swap in [`crate::testing::ScriptedPetApi`]
//! or point an [`HttpPetApi`] at [`crate::testing::MockPetStore`].

mod client;
mod traffic;

pub use self::client::{DEFAULT_BASE_URL, HttpPetApi};
pub use self::traffic::{Exchange, ExchangeResponse, TrafficLevel, TrafficLogger};

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http::HeaderMap;

use crate::model::Pet;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Envelope of a successful (2xx) exchange.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub headers: HeaderMap,
    pub data: T,
    /// Body exactly as received.
    pub raw: Bytes,
}

impl<T> ApiResponse<T> {
    pub fn new(status: u16, data: T) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            data,
            raw: Bytes::new(),
        }
    }

    pub fn with_raw(mut self, raw: impl Into<Bytes>) -> Self {
        self.raw = raw.into();
        self
    }

    /// The received body as text, or `None` when it was empty.
    pub fn raw_text(&self) -> Option<String> {
        if self.raw.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.raw).into_owned())
        }
    }
}

/// Failure side of an exchange. A failed exchange never carries a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    Status { code: u16, body: String },
    /// No response was received.
    Transport(String),
    /// A 2xx body could not be decoded into the expected shape.
    Decode {
        status: u16,
        message: String,
        body: String,
    },
}

impl ApiError {
    /// HTTP status of the failure, or 0 when no response was received.
    pub fn code(&self) -> u16 {
        match self {
            ApiError::Status { code, .. } => *code,
            ApiError::Transport(_) => 0,
            ApiError::Decode { status, .. } => *status,
        }
    }

    /// Raw response body, when a response was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } | ApiError::Decode { body, .. } => Some(body),
            ApiError::Transport(_) => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status { code, body } => write!(f, "HTTP {}: {}", code, body),
            ApiError::Transport(message) => write!(f, "request failed: {}", message),
            ApiError::Decode {
                status, message, ..
            } => write!(f, "failed to decode {} response: {}", status, message),
        }
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Typed access to the pet endpoints.
pub trait PetApi: Send + Sync + 'static {
    /// `POST /pet`
    fn add_pet<'a>(&'a self, pet: &'a Pet) -> BoxFuture<'a, ApiResult<()>>;

    /// `GET /pet/{id}`
    fn get_pet_by_id(&self, id: i64) -> BoxFuture<'_, ApiResult<Pet>>;

    /// `DELETE /pet/{id}`
    fn delete_pet(&self, id: i64) -> BoxFuture<'_, ApiResult<()>>;
}
