use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::time::Duration;

use crate::entities::Coordinates;
use crate::error::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// LocationIQ returns coordinates as strings; other deployments of the same
// API shape return numbers, so both are accepted.
#[derive(Clone, Debug, Deserialize)]
struct Match {
    #[serde(default)]
    lat: Option<Value>,
    #[serde(default)]
    lon: Option<Value>,
}

fn coordinate(value: &Option<Value>) -> Option<f64> {
    match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.parse().ok(),
        _ => None,
    }
}

/// Resolves a free-text address to coordinates. One outbound call per
/// invocation, no retries; the caller owns any retry policy.
#[tracing::instrument]
pub async fn resolve(address: &str) -> Result<Coordinates, Error> {
    if address.trim().is_empty() {
        return Err(Error::invalid_input_error());
    }

    let api_base = env::var("LOCATIONIQ_API_BASE")?;
    let key = env::var("LOCATIONIQ_API_KEY")?;
    let url = format!("{}/v1/search.php", api_base);

    let res = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?
        .get(url)
        .query(&[("key", key)])
        .query(&[("q", address.to_string())])
        .query(&[("format", "json".to_string())])
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(Error::upstream_error());
    }

    let matches: Vec<Match> = res.json().await?;

    let first = matches
        .into_iter()
        .next()
        .ok_or_else(|| Error::no_match_error(address))?;

    match (coordinate(&first.lat), coordinate(&first.lon)) {
        (Some(lat), Some(lng)) => Ok(Coordinates { lat, lng }),
        _ => Err(Error::malformed_result_error(address)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use serial_test::serial;

    async fn serve_fixture(app: Router) -> String {
        let server =
            axum::Server::bind(&"127.0.0.1:0".parse().unwrap()).serve(app.into_make_service());
        let addr = server.local_addr();

        tokio::spawn(server);

        format!("http://{}", addr)
    }

    fn point_fixture_at(base: String) {
        env::set_var("LOCATIONIQ_API_BASE", base);
        env::set_var("LOCATIONIQ_API_KEY", "test-key");
    }

    #[tokio::test]
    async fn empty_address_short_circuits_before_any_call() {
        // no fixture and no env vars needed; the adapter must not get that far
        let err = resolve("   ").await.unwrap_err();

        assert!(err.is_invalid_input_error());
    }

    #[tokio::test]
    #[serial]
    async fn stringified_coordinates_of_the_first_match_are_used() {
        let app = Router::new().route(
            "/v1/search.php",
            get(|| async {
                Json(json!([
                    {"lat": "40.7484405", "lon": "-73.9878584", "display_name": "Empire State Building"},
                    {"lat": "0", "lon": "0"},
                ]))
            }),
        );
        point_fixture_at(serve_fixture(app).await);

        let location = resolve("20 W 34th St, New York, NY 10001").await.unwrap();

        assert_eq!(location.lat, 40.7484405);
        assert_eq!(location.lng, -73.9878584);
    }

    #[tokio::test]
    #[serial]
    async fn numeric_coordinates_are_accepted() {
        let app = Router::new().route(
            "/v1/search.php",
            get(|| async { Json(json!([{"lat": 40.7484405, "lon": -73.9878584}])) }),
        );
        point_fixture_at(serve_fixture(app).await);

        let location = resolve("20 W 34th St, New York, NY 10001").await.unwrap();

        assert_eq!(location.lat, 40.7484405);
        assert_eq!(location.lng, -73.9878584);
    }

    #[tokio::test]
    #[serial]
    async fn zero_results_map_to_no_match() {
        let app = Router::new().route("/v1/search.php", get(|| async { Json(json!([])) }));
        point_fixture_at(serve_fixture(app).await);

        let err = resolve("nowhere in particular").await.unwrap_err();

        assert!(err.is_no_match_error());
    }

    #[tokio::test]
    #[serial]
    async fn upstream_failure_maps_to_unavailable() {
        let app = Router::new().route(
            "/v1/search.php",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR.into_response() }),
        );
        point_fixture_at(serve_fixture(app).await);

        let err = resolve("20 W 34th St, New York, NY 10001").await.unwrap_err();

        assert!(err.is_upstream_error());
    }

    #[tokio::test]
    #[serial]
    async fn first_match_without_usable_coordinates_is_malformed() {
        let app = Router::new().route(
            "/v1/search.php",
            get(|| async { Json(json!([{"lat": "40.7484405", "display_name": "no lon"}])) }),
        );
        point_fixture_at(serve_fixture(app).await);

        let err = resolve("20 W 34th St, New York, NY 10001").await.unwrap_err();

        assert!(err.is_malformed_result_error());
    }
}
