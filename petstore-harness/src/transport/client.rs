use std::time::Instant;

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};
use serde::de::DeserializeOwned;

use crate::model::Pet;

use super::traffic::{Exchange, ExchangeResponse, TrafficLogger};
use super::{ApiError, ApiResponse, ApiResult, BoxFuture, PetApi};

/// Public Swagger Petstore deployment.
pub const DEFAULT_BASE_URL: &str = "https://petstore.swagger.io/v2";

/// [`PetApi`] over real HTTP.
///
/// Each call is one request with no retries and no timeout beyond the
/// client's defaults. Every exchange, including failed ones, goes through the
/// [`TrafficLogger`] exactly once.
#[derive(Debug, Clone)]
pub struct HttpPetApi {
    client: reqwest::Client,
    base_url: String,
    traffic: TrafficLogger,
}

impl HttpPetApi {
    pub fn new(base_url: impl Into<String>, traffic: TrafficLogger) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, traffic)
    }

    /// Uses a preconfigured client (proxies, custom TLS roots, ...).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        traffic: TrafficLogger,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            traffic,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn exchange(
        &self,
        method: Method,
        path: &str,
        body: Bytes,
    ) -> Result<ExchangeResponse, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if !body.is_empty() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let started = Instant::now();
        let outcome = self
            .send(method.clone(), &url, headers.clone(), body.clone())
            .await;
        let exchange = Exchange {
            method,
            url,
            request_headers: headers,
            request_body: body,
            outcome,
            elapsed: started.elapsed(),
        };
        self.traffic.log(&exchange);

        let response = exchange.outcome.map_err(ApiError::Transport)?;
        if !(200..300).contains(&response.status) {
            return Err(ApiError::Status {
                code: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }
        Ok(response)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<ExchangeResponse, String> {
        let mut builder = self.client.request(method, url).headers(headers);
        if !body.is_empty() {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read response: {e}"))?;

        Ok(ExchangeResponse {
            status,
            headers,
            body,
        })
    }
}

fn decode<T: DeserializeOwned>(response: ExchangeResponse) -> ApiResult<T> {
    match serde_json::from_slice(&response.body) {
        Ok(data) => Ok(ApiResponse {
            status: response.status,
            headers: response.headers,
            data,
            raw: response.body,
        }),
        Err(e) => Err(ApiError::Decode {
            status: response.status,
            message: e.to_string(),
            body: String::from_utf8_lossy(&response.body).into_owned(),
        }),
    }
}

fn discard(response: ExchangeResponse) -> ApiResponse<()> {
    ApiResponse {
        status: response.status,
        headers: response.headers,
        data: (),
        raw: response.body,
    }
}

impl PetApi for HttpPetApi {
    fn add_pet<'a>(&'a self, pet: &'a Pet) -> BoxFuture<'a, ApiResult<()>> {
        Box::pin(async move {
            let body = serde_json::to_vec(pet)
                .map_err(|e| ApiError::Transport(format!("failed to encode pet: {e}")))?;
            let response = self.exchange(Method::POST, "/pet", Bytes::from(body)).await?;
            Ok(discard(response))
        })
    }

    fn get_pet_by_id(&self, id: i64) -> BoxFuture<'_, ApiResult<Pet>> {
        Box::pin(async move {
            let path = format!("/pet/{}", id);
            let response = self.exchange(Method::GET, &path, Bytes::new()).await?;
            decode(response)
        })
    }

    fn delete_pet(&self, id: i64) -> BoxFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            let path = format!("/pet/{}", id);
            let response = self.exchange(Method::DELETE, &path, Bytes::new()).await?;
            Ok(discard(response))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TrafficLevel;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HttpPetApi::new("http://localhost:8080/v2/", TrafficLogger::default());
        assert_eq!(api.base_url(), "http://localhost:8080/v2");
    }

    #[test]
    fn test_decode_maps_bad_body_to_decode_error() {
        let response = ExchangeResponse {
            status: 200,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"not json"),
        };
        let err = decode::<Pet>(response).unwrap_err();
        assert_eq!(err.code(), 200);
        assert_eq!(err.body(), Some("not json"));
    }

    #[test]
    fn test_discard_keeps_raw_body() {
        let response = ExchangeResponse {
            status: 201,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"{\"code\":201}"),
        };
        let response = discard(response);
        assert_eq!(response.status, 201);
        assert_eq!(response.raw_text().as_deref(), Some("{\"code\":201}"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Nothing listens on the loopback discard port.
        let api = HttpPetApi::new("http://127.0.0.1:9", TrafficLogger::new(TrafficLevel::None));
        let err = api.get_pet_by_id(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.code(), 0);
    }
}
