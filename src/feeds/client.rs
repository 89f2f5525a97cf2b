//! Arbitrage Feed Client
//!
//! Reads the pair and track feeds from the signal API over HTTP.

use crate::consts::cli_consts::http;
use crate::environment::Environment;
use crate::feeds::ArbitrageFeed;
use crate::feeds::error::FeedError;
use crate::records::{ArbitragePairRecord, ArbitrageTrackRecord, PairsPayload, normalize_track};
use reqwest::{Client, ClientBuilder, Response};
use serde_json::Value;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("arbi-dash/", env!("CARGO_PKG_VERSION"));

const PAIRS_ENDPOINT: &str = "api/arbitrage";
const TRACK_ENDPOINT: &str = "api/arbitrage/arbitrack";

#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    environment: Environment,
}

impl FeedClient {
    pub fn new(environment: Environment) -> Result<Self, FeedError> {
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .build()?;
        Ok(Self {
            client,
            environment,
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.environment.api_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, FeedError> {
        if !response.status().is_success() {
            return Err(FeedError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_request(&self, endpoint: &str) -> Result<Vec<u8>, FeedError> {
        let url = self.build_url(endpoint);
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Ok(response_bytes.to_vec())
    }
}

/// Decodes the pair feed body, accepting both the wrapped and the bare array shape.
pub fn decode_pairs(bytes: &[u8]) -> Result<Vec<ArbitragePairRecord>, FeedError> {
    let payload: PairsPayload = serde_json::from_slice(bytes)?;
    Ok(payload.into_records())
}

/// Decodes the track feed body. Anything but a non-empty object is rejected.
pub fn decode_track(bytes: &[u8]) -> Result<Vec<ArbitrageTrackRecord>, FeedError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(mapping) if !mapping.is_empty() => Ok(normalize_track(&mapping)),
        Value::Object(_) => Err(FeedError::InvalidFormat(
            "expected a non-empty coin mapping".to_string(),
        )),
        other => Err(FeedError::InvalidFormat(format!(
            "expected a coin mapping, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait::async_trait]
impl ArbitrageFeed for FeedClient {
    async fn fetch_pairs(&self) -> Result<Vec<ArbitragePairRecord>, FeedError> {
        let body = self.get_request(PAIRS_ENDPOINT).await?;
        decode_pairs(&body)
    }

    async fn fetch_track(&self) -> Result<Vec<ArbitrageTrackRecord>, FeedError> {
        let body = self.get_request(TRACK_ENDPOINT).await?;
        decode_track(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::error::FailureKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serves a single canned HTTP response and returns the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        serve_and_capture(status_line, body).await.0
    }

    /// Like `serve_once`, also handing back the raw request head.
    async fn serve_and_capture(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (request_tx, request_rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let read = socket.read(&mut buf).await.unwrap_or(0);
            let _ = request_tx.send(String::from_utf8_lossy(&buf[..read]).to_lowercase());
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        (format!("http://{}", addr), request_rx)
    }

    fn client_for(base: String) -> FeedClient {
        FeedClient::new(Environment::Custom { api_url: base }).unwrap()
    }

    #[test]
    fn test_build_url_joins_paths() {
        let client = client_for("http://localhost:5000/".to_string());
        assert_eq!(
            client.build_url(TRACK_ENDPOINT),
            "http://localhost:5000/api/arbitrage/arbitrack"
        );
    }

    #[test]
    fn test_decode_pairs_empty_results() {
        let records = decode_pairs(br#"{"results": []}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    // An empty or non-object track payload is a format failure.
    fn test_decode_track_rejects_bad_shapes() {
        let bodies: [&[u8]; 4] = [b"{}", b"[]", b"null", b"\"BTC\""];
        for body in bodies {
            let err = decode_track(body).unwrap_err();
            assert!(matches!(err, FeedError::InvalidFormat(_)), "body {:?}", body);
            assert_eq!(err.kind(), FailureKind::Format);
        }
        assert!(matches!(decode_track(b"not json"), Err(FeedError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_pairs_over_http() {
        let base = serve_once(
            "200 OK",
            r#"[{"pair":"ETH/BTC","coin1":"ETH","coin2":"BTC","profitPercentage":3.5}]"#,
        )
        .await;

        let records = client_for(base).fetch_pairs().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pair, "ETH/BTC");
        assert_eq!(records[0].profit_percentage, 3.5);
    }

    #[tokio::test]
    // Requests ask for JSON, name the client, and carry nothing else of ours.
    async fn test_request_headers() {
        let (base, request) = serve_and_capture("200 OK", r#"{"results": []}"#).await;

        client_for(base).fetch_pairs().await.unwrap();
        let request = request.await.unwrap();
        assert!(request.starts_with("get /api/arbitrage http/1.1"));
        assert!(request.contains("accept: application/json"));
        assert!(request.contains(&format!("user-agent: {}", USER_AGENT.to_lowercase())));
        assert!(!request.contains("x-build-timestamp"));
    }

    #[tokio::test]
    // A non-2xx answer is reported as an HTTP failure, without retrying.
    async fn test_fetch_track_non_success_status() {
        let base = serve_once("502 Bad Gateway", r#"{"error":"upstream"}"#).await;

        let err = client_for(base).fetch_track().await.unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.kind(), FailureKind::Network);
    }
}
