use std::fmt::Write as _;
use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use tracing::info;

/// How much of each exchange the traffic log shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TrafficLevel {
    /// Log nothing.
    None,
    /// Request line and response status.
    Basic,
    /// `Basic` plus request and response headers.
    Headers,
    /// `Headers` plus request and response bodies.
    #[default]
    Body,
}

impl FromStr for TrafficLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(TrafficLevel::None),
            "basic" => Ok(TrafficLevel::Basic),
            "headers" => Ok(TrafficLevel::Headers),
            "body" => Ok(TrafficLevel::Body),
            other => Err(format!("unknown traffic level '{}'", other)),
        }
    }
}

/// One request/response pair as seen on the wire.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub method: Method,
    pub url: String,
    pub request_headers: HeaderMap,
    pub request_body: Bytes,
    pub outcome: Result<ExchangeResponse, String>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct ExchangeResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Writes each exchange as a single event on the `http_traffic` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrafficLogger {
    level: TrafficLevel,
}

impl TrafficLogger {
    pub fn new(level: TrafficLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> TrafficLevel {
        self.level
    }

    pub fn log(&self, exchange: &Exchange) {
        if let Some(rendered) = self.render(exchange) {
            info!(target: "http_traffic", "{}", rendered);
        }
    }

    /// Renders the exchange at the configured level, or `None` when disabled.
    pub fn render(&self, exchange: &Exchange) -> Option<String> {
        if self.level == TrafficLevel::None {
            return None;
        }
        let headers = self.level >= TrafficLevel::Headers;
        let bodies = self.level == TrafficLevel::Body;
        let mut out = String::new();

        if bodies {
            let _ = writeln!(out, "--> {} {}", exchange.method, exchange.url);
        } else {
            let _ = writeln!(
                out,
                "--> {} {} ({}-byte body)",
                exchange.method,
                exchange.url,
                exchange.request_body.len()
            );
        }
        if headers {
            write_headers(&mut out, &exchange.request_headers);
        }
        if bodies {
            if !exchange.request_body.is_empty() {
                let _ = writeln!(out, "{}", String::from_utf8_lossy(&exchange.request_body));
            }
            let _ = writeln!(
                out,
                "--> END {} ({}-byte body)",
                exchange.method,
                exchange.request_body.len()
            );
        }

        let elapsed_ms = exchange.elapsed.as_millis();
        match &exchange.outcome {
            Ok(response) => {
                let reason = StatusCode::from_u16(response.status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown");
                let _ = write!(
                    out,
                    "<-- {} {} {} ({}ms",
                    response.status, reason, exchange.url, elapsed_ms
                );
                if bodies {
                    let _ = writeln!(out, ")");
                } else {
                    let _ = writeln!(out, ", {}-byte body)", response.body.len());
                }
                if headers {
                    write_headers(&mut out, &response.headers);
                }
                if bodies {
                    if !response.body.is_empty() {
                        let _ = writeln!(out, "{}", String::from_utf8_lossy(&response.body));
                    }
                    let _ = write!(out, "<-- END HTTP ({}-byte body)", response.body.len());
                }
            }
            Err(message) => {
                let _ = write!(out, "<-- HTTP FAILED: {} ({}ms)", message, elapsed_ms);
            }
        }

        Some(out.trim_end().to_string())
    }
}

fn write_headers(out: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        let value = value.to_str().unwrap_or("<binary>");
        let _ = writeln!(out, "{}: {}", name, value);
    }
}
