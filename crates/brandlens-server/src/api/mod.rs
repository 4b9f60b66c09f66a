mod analyze;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use brandlens_analyzer::Analyzer;
use brandlens_core::AppConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    env: String,
    version: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
        .expose_headers([HeaderName::from_static("x-request-id")])
}

fn analyze_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze::analyze))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(analyze_router(rate_limit))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            env: state.config.env.to_string(),
            version: env!("CARGO_PKG_VERSION"),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

async fn not_found(Extension(req_id): Extension<RequestId>) -> ApiError {
    ApiError::new(req_id.0, "not_found", "no such route")
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use brandlens_analyzer::Lexicon;
    use brandlens_core::Environment;
    use brandlens_scraper::{ExtractorRegistry, FallbackPolicy, FetchPolicy};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const HOMEPAGE: &str = r#"<html><head>
        <title>Acme Coffee | Home</title>
        <meta name="description" content="Acme roasts single-origin coffee in small batches for cafes and homes.">
        </head><body><main>
        <p>Acme roasts single-origin coffee in small batches every morning for our customers.</p>
        <p>We work directly with farmers to keep quality high and prices fair.</p>
        </main></body></html>"#;

    fn test_config() -> AppConfig {
        AppConfig {
            env: Environment::Test,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            log_level: "info".to_string(),
            platforms_path: None,
            fetch_timeout_secs: 5,
            fetch_max_retries: 0,
            fetch_backoff_base_ms: 0,
            fetch_jitter_max_ms: 0,
            synthesize_followers: true,
            rate_limit_per_minute: 30,
        }
    }

    fn test_app(rate_limit: RateLimitState) -> Router {
        let config = test_config();
        let analyzer = Analyzer::new(
            FetchPolicy::from_config(&config),
            Arc::new(ExtractorRegistry::builtin().expect("builtin catalog compiles")),
            FallbackPolicy::default(),
            Lexicon::default(),
        );
        build_app(
            AppState {
                analyzer,
                config: Arc::new(config),
            },
            rate_limit,
        )
    }

    fn default_app() -> Router {
        test_app(RateLimitState::new(30, Duration::from_secs(60)))
    }

    fn analyze_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_unknown_code_maps_to_internal_error() {
        let response = ApiError::new("req-1", "internal_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_reports_ok_and_echoes_request_id() {
        let response = default_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "req-health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
            Some("req-health")
        );
        let json = json_body(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["env"], "test");
        assert_eq!(json["meta"]["request_id"], "req-health");
    }

    #[tokio::test]
    async fn request_id_is_generated_when_absent() {
        let response = default_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        let id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .expect("generated request id");
        assert_eq!(id.len(), 36);
    }

    #[tokio::test]
    async fn unknown_route_returns_not_found_envelope() {
        let response = default_app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn analyze_rejects_blank_url() {
        let response = default_app()
            .oneshot(analyze_request(r#"{"url":"   "}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn analyze_rejects_malformed_body() {
        let response = default_app()
            .oneshot(analyze_request(r#"{"website":"acme.com"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn analyze_returns_report_for_mock_site() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(HOMEPAGE))
            .mount(&server)
            .await;

        let body = serde_json::json!({ "url": server.uri() }).to_string();
        let response = default_app()
            .oneshot(analyze_request(&body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["brand_name"], "Acme Coffee");
        assert!(json["data"]["social_links"].as_array().is_some_and(Vec::is_empty));
        assert!(json["data"]["brand_story"]
            .as_str()
            .is_some_and(|s| s.starts_with("# Acme Coffee: Brand Story")));
        assert!(json["data"]["consistency_score"].is_u64());
        assert!(json["data"].get("error").is_none());
    }

    #[tokio::test]
    async fn analyze_is_rate_limited() {
        let app = test_app(RateLimitState::new(1, Duration::from_secs(60)));

        let first = app
            .clone()
            .oneshot(analyze_request(r#"{"url":""}"#))
            .await
            .expect("response");
        assert_eq!(first.status(), StatusCode::BAD_REQUEST);

        let second = app
            .oneshot(analyze_request(r#"{"url":""}"#))
            .await
            .expect("response");
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().contains_key("x-request-id"));
        let json = json_body(second).await;
        assert_eq!(json["error"]["code"], "rate_limited");
        assert_eq!(json["error"]["message"], "at most 1 analyses per 60s");
        assert!(json["meta"]["request_id"]
            .as_str()
            .is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn health_is_not_rate_limited() {
        let app = test_app(RateLimitState::new(0, Duration::from_secs(60)));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
