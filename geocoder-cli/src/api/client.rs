//! HTTP client for the geocoding provider
//!
//! One call = one GET request. There is no retry, no rate limiting and no
//! timeout override; transport and decoding failures are returned to the
//! caller as [`GeocodeError`].

use async_trait::async_trait;

use super::models::{Coordinates, GeocodeResponse, GeocodeResult, STATUS_OK};

/// Google Maps Geocoding API endpoint
pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Result of a lookup that reached the provider and got an answer
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// First result's location
    Found(Coordinates),
    /// Provider answered but gave no usable location
    NoMatch { reason: String },
}

impl LookupOutcome {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            LookupOutcome::Found(c) => Some(*c),
            LookupOutcome::NoMatch { .. } => None,
        }
    }
}

/// Failure while talking to the provider
#[derive(Debug)]
pub enum GeocodeError {
    /// Request could not be sent or the body could not be read
    Request(reqwest::Error),
    /// Body was not a geocoding response
    InvalidBody(serde_json::Error),
    /// Status was OK but the first result had no usable location
    MalformedResult(serde_json::Error),
}

impl std::fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeocodeError::Request(e) => write!(f, "Geocoding request failed: {}", e),
            GeocodeError::InvalidBody(e) => write!(f, "Invalid geocoding response: {}", e),
            GeocodeError::MalformedResult(e) => {
                write!(f, "Geocoding result has no location: {}", e)
            }
        }
    }
}

impl std::error::Error for GeocodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeocodeError::Request(e) => Some(e),
            GeocodeError::InvalidBody(e) | GeocodeError::MalformedResult(e) => Some(e),
        }
    }
}

/// Resolves one free-text address to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<LookupOutcome, GeocodeError>;
}

/// Geocoder backed by the Google Maps Geocoding API (or anything that speaks
/// the same JSON)
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeocodingClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    async fn lookup(&self, address: &str) -> Result<LookupOutcome, GeocodeError> {
        log::debug!("Geocoding '{}'", address);

        // without_url(): the request URL carries the API key
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::Request(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("Geocoding '{}' returned HTTP {}", address, status.as_u16());
            return Ok(LookupOutcome::NoMatch {
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeocodeError::Request(e.without_url()))?;

        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(GeocodeError::InvalidBody)?;

        interpret_response(parsed)
    }
}

/// Map a decoded response to an outcome
fn interpret_response(response: GeocodeResponse) -> Result<LookupOutcome, GeocodeError> {
    if response.status != STATUS_OK {
        let reason = match response.error_message {
            Some(message) => format!("{}: {}", response.status, message),
            None => response.status,
        };
        return Ok(LookupOutcome::NoMatch { reason });
    }

    let Some(first) = response.results.into_iter().next() else {
        return Ok(LookupOutcome::NoMatch {
            reason: "no results".to_string(),
        });
    };

    let result: GeocodeResult =
        serde_json::from_value(first).map_err(GeocodeError::MalformedResult)?;

    if let Some(ref formatted) = result.formatted_address {
        log::debug!("Matched '{}'", formatted);
    }

    Ok(LookupOutcome::Found(result.geometry.location.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ADDRESS: &str = "1600 Amphitheatre Parkway, Mountain View, CA, 94043";

    fn client_for(server: &MockServer) -> GeocodingClient {
        GeocodingClient::new(format!("{}/geocode/json", server.uri()), "test-key")
    }

    async fn respond_with(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_found_sends_address_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .and(query_param("address", ADDRESS))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "results": [
                    {
                        "formatted_address": "Google Building 40",
                        "geometry": { "location": { "lat": 37.422, "lng": -122.084 } }
                    },
                    {
                        "geometry": { "location": { "lat": 1.0, "lng": 2.0 } }
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server).lookup(ADDRESS).await.unwrap();

        assert_eq!(
            outcome,
            LookupOutcome::Found(Coordinates {
                latitude: 37.422,
                longitude: -122.084
            })
        );
    }

    #[tokio::test]
    async fn test_non_ok_status_is_no_match() {
        let server = respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .await;

        let outcome = client_for(&server).lookup(ADDRESS).await.unwrap();

        assert_eq!(
            outcome,
            LookupOutcome::NoMatch {
                reason: "ZERO_RESULTS".to_string()
            }
        );
        assert!(outcome.coordinates().is_none());
    }

    #[tokio::test]
    async fn test_denied_request_keeps_provider_message() {
        let server = respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .await;

        let outcome = client_for(&server).lookup(ADDRESS).await.unwrap();

        assert_eq!(
            outcome,
            LookupOutcome::NoMatch {
                reason: "REQUEST_DENIED: The provided API key is invalid.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_ok_without_results_is_no_match() {
        let server =
            respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" }))).await;

        let outcome = client_for(&server).lookup(ADDRESS).await.unwrap();
        assert!(outcome.coordinates().is_none());
    }

    #[tokio::test]
    async fn test_http_error_is_no_match() {
        let server = respond_with(ResponseTemplate::new(500)).await;

        let outcome = client_for(&server).lookup(ADDRESS).await.unwrap();

        assert_eq!(
            outcome,
            LookupOutcome::NoMatch {
                reason: "HTTP 500".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_error() {
        let server = respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

        let result = client_for(&server).lookup(ADDRESS).await;
        assert!(matches!(result, Err(GeocodeError::InvalidBody(_))));
    }

    #[tokio::test]
    async fn test_ok_with_malformed_result_is_error() {
        let server = respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [ { "geometry": {} } ]
        })))
        .await;

        let result = client_for(&server).lookup(ADDRESS).await;
        assert!(matches!(result, Err(GeocodeError::MalformedResult(_))));
    }

    /// An endpoint nothing listens on
    fn closed_endpoint() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}/geocode/json", port)
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_error_without_key() {
        let client = GeocodingClient::new(closed_endpoint(), "secret-key-123");

        let err = client.lookup(ADDRESS).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Request(_)));
        assert!(!err.to_string().contains("secret-key-123"));
    }

    #[tokio::test]
    async fn test_connection_refused_fails_row_and_batch_continues() {
        use crate::geocode::{AddressSheet, RowOutcome, process};
        use crate::workbook::{CellValue, Table};

        let headers = ["address1", "city", "sta", "zip"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let row = |street: &str| {
            vec![
                CellValue::String(street.to_string()),
                CellValue::String("Mountain View".to_string()),
                CellValue::String("CA".to_string()),
                CellValue::Int(94043),
            ]
        };
        let sheet =
            AddressSheet::try_from_table(Table::new(headers, vec![row("1 A St"), row("2 B St")]))
                .unwrap();

        let client = GeocodingClient::new(closed_endpoint(), "secret-key-123");
        let result = process(&client, &sheet, |_, _| {}).await;

        assert_eq!(result.total(), 2);
        assert_eq!(result.error_count, 2);
        assert_eq!(result.processed_count, 0);
        for row in &result.rows {
            match &row.outcome {
                RowOutcome::Failed { reason } => assert!(!reason.contains("secret-key-123")),
                other => panic!("expected a failed row, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_malformed_results_ignored_when_status_not_ok() {
        let response: GeocodeResponse = serde_json::from_value(json!({
            "status": "OVER_QUERY_LIMIT",
            "results": [ { "nonsense": true } ]
        }))
        .unwrap();

        let outcome = interpret_response(response).unwrap();
        assert!(matches!(outcome, LookupOutcome::NoMatch { .. }));
    }
}
