//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method and path routing, body
//! limits, access logging and the read/write review paths.

use crate::config::AppState;
use crate::error::RequestError;
use crate::handler::params::{ReviewForm, ReviewQuery};
use crate::handler::reviews;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_LENGTH, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let access_log = state.config.logging.access_log;
    let mut entry = access_log.then(|| {
        AccessLogEntry::start(
            peer_addr,
            req.method(),
            req.uri(),
            req.version(),
            req.headers().get(USER_AGENT).and_then(|v| v.to_str().ok()),
        )
    });

    let response = route_request(req, &state).await;

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on method and path
pub async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let routes = &state.config.routes;
    let method = req.method().clone();
    let path = req.uri().path();

    // The review endpoint owns `/` even if the health path is set to it
    let mut response = if path == "/" {
        match method {
            Method::GET => read_reviews(&req, state).await,
            Method::POST => create_review(req, state).await,
            Method::OPTIONS => http::build_options_response(state.config.http.enable_cors),
            other => {
                logger::log_warning(&format!("Method not allowed: {other}"));
                http::build_405_response()
            }
        }
    } else if routes.health_enabled && path == routes.health_path {
        http::build_health_response()
    } else {
        http::build_404_response()
    };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }
    response
}

/// `GET /`: scored, ranked and filtered review listing
async fn read_reviews<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let query = match ReviewQuery::parse(req.uri().query()) {
        Ok(q) => q,
        Err(e) => return client_error(req.method(), req.uri().path(), &e),
    };

    let scored = reviews::list_reviews(&state.store, state.scorer.as_ref(), &query).await;
    http::build_json_response(StatusCode::OK, &scored)
}

/// `POST /`: validate a form submission and create a review
async fn create_review<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let max_body_size = state.config.http.max_body_size;
    if let Some(resp) = check_body_size(&req, max_body_size) {
        return resp;
    }

    let (parts, body) = req.into_parts();
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!("Request body exceeded {max_body_size} bytes"));
            return http::build_413_response();
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return client_error(&parts.method, parts.uri.path(), &RequestError::UnreadableBody);
        }
    };

    match reviews::create_review(&state.store, ReviewForm::parse(&bytes)).await {
        Ok(review) => {
            logger::log_review_created(&review.id, &review.location);
            http::build_json_response(StatusCode::CREATED, &review)
        }
        Err(e) => client_error(&parts.method, parts.uri.path(), &e),
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let size = req
        .headers()
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()?;

    (size > max_body_size).then(|| {
        logger::log_error(&format!(
            "Request body too large: {size} bytes (max: {max_body_size})"
        ));
        http::build_413_response()
    })
}

fn client_error(method: &Method, path: &str, err: &RequestError) -> Response<Full<Bytes>> {
    logger::log_rejected(method.as_str(), path, &err.to_string());
    http::build_text_response(err.status(), &err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::{Review, Timestamp};
    use crate::sentiment::VaderScorer;
    use crate::store::ReviewStore;

    fn test_state() -> AppState {
        let mut config = Config::load_from("no-such-config-file").unwrap();
        config.logging.access_log = false;
        config.http.max_body_size = 256;

        let store = ReviewStore::seed(vec![
            Review {
                id: "seed-1".to_string(),
                timestamp: Timestamp::parse_canonical("2024-01-01 10:00:00").unwrap(),
                body: "Great stay".to_string(),
                location: "Seattle".to_string(),
            },
            Review {
                id: "seed-2".to_string(),
                timestamp: Timestamp::parse_canonical("2024-03-01 09:00:00").unwrap(),
                body: "Terrible service, dirty room".to_string(),
                location: "Denver".to_string(),
            },
        ]);
        AppState::new(config, store, Box::new(VaderScorer::new()))
    }

    fn get(uri: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn post(body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::POST)
            .uri("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    async fn send(state: &AppState, req: Request<Full<Bytes>>) -> (StatusCode, Response<()>, Bytes) {
        let resp = route_request(req, state).await;
        let (parts, body) = resp.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        (parts.status, Response::from_parts(parts, ()), bytes)
    }

    fn header<'a>(resp: &'a Response<()>, name: &str) -> &'a str {
        resp.headers().get(name).unwrap().to_str().unwrap()
    }

    #[tokio::test]
    async fn test_get_lists_scored_reviews() {
        let state = test_state();
        let (status, resp, body) = send(&state, get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), "application/json");
        assert_eq!(header(&resp, "content-length"), body.len().to_string());
        assert_eq!(header(&resp, "server"), state.config.http.server_name);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 2);
        // Positive review ranks first
        assert_eq!(items[0]["id"], "seed-1");
        for item in items {
            for key in ["id", "timestamp", "body", "location"] {
                assert!(item.get(key).is_some(), "missing {key}");
            }
            for key in ["negative", "neutral", "positive", "compound"] {
                assert!(item["sentiment"][key].is_number(), "missing sentiment.{key}");
            }
        }
    }

    #[tokio::test]
    async fn test_get_location_example() {
        let state = test_state();
        let (status, _, body) = send(&state, get("/?location=Seattle")).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let items = json.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["body"], "Great stay");
        assert!(items[0]["sentiment"]["compound"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_get_identical_requests_identical_bytes() {
        let state = test_state();
        let (_, _, first) = send(&state, get("/?start_date=2024-01-01")).await;
        let (_, _, second) = send(&state, get("/?start_date=2024-01-01")).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_get_malformed_date_is_client_error() {
        let state = test_state();
        let (status, resp, body) = send(&state, get("/?end_date=31-12-2024")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(header(&resp, "content-type").starts_with("text/plain"));
        assert_eq!(&body[..], b"Invalid end_date: '31-12-2024'");
    }

    #[tokio::test]
    async fn test_post_creates_review() {
        let state = test_state();
        let (status, resp, body) = send(&state, post("Location=Denver&ReviewBody=Nice+views")).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(header(&resp, "content-type"), "application/json");
        assert_eq!(header(&resp, "content-length"), body.len().to_string());

        let created: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(created["location"], "Denver");
        assert_eq!(created["body"], "Nice views");
        assert!(created.get("sentiment").is_none());
        let id = created["id"].as_str().unwrap();
        assert!(!id.is_empty() && id != "seed-1" && id != "seed-2");
        assert!(Timestamp::parse_canonical(created["timestamp"].as_str().unwrap()).is_ok());

        let (_, _, listing) = send(&state, get("/")).await;
        let listing: serde_json::Value = serde_json::from_slice(&listing).unwrap();
        let items = listing.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().any(|item| item["id"] == id));
    }

    #[tokio::test]
    async fn test_post_validation_errors() {
        let state = test_state();
        let cases: [(&'static str, &[u8]); 4] = [
            ("Location=Chicago&ReviewBody=ok", b"Invalid Location"),
            ("ReviewBody=ok", b"Missing Location"),
            ("Location=Seattle", b"Missing Review Body"),
            ("", b"Missing Location"),
        ];

        for (form, expected) in cases {
            let (status, resp, body) = send(&state, post(form)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "form: {form}");
            assert!(header(&resp, "content-type").starts_with("text/plain"));
            assert_eq!(&body[..], expected, "form: {form}");
        }

        // Rejected submissions leave the store unchanged
        assert_eq!(state.store.count().await, 2);
    }

    #[tokio::test]
    async fn test_post_empty_review_body_accepted() {
        let state = test_state();
        let (status, _, _) = send(&state, post("Location=Seattle&ReviewBody=")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(state.store.count().await, 3);
    }

    #[tokio::test]
    async fn test_post_oversized_body() {
        let state = test_state();
        let long = "x".repeat(300);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(Full::new(Bytes::from(format!("Location=Seattle&ReviewBody={long}"))))
            .unwrap();
        let (status, _, _) = send(&state, req).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

        let declared = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header("content-length", "100000")
            .body(Full::new(Bytes::from_static(b"Location=Seattle&ReviewBody=ok")))
            .unwrap();
        let (status, _, _) = send(&state, declared).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

        assert_eq!(state.store.count().await, 2);
    }

    #[tokio::test]
    async fn test_other_methods_and_paths() {
        let state = test_state();

        let delete = Request::builder()
            .method(Method::DELETE)
            .uri("/")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let (status, resp, _) = send(&state, delete).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(header(&resp, "allow"), "GET, POST, OPTIONS");

        let options = Request::builder()
            .method(Method::OPTIONS)
            .uri("/")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let (status, _, _) = send(&state, options).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _, _) = send(&state, get("/reviews")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let state = test_state();
        let (status, _, body) = send(&state, get("/healthz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_health_path_cannot_shadow_reviews() {
        let mut state = test_state();
        state.config.routes.health_path = "/".to_string();

        let (status, resp, _) = send(&state, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(header(&resp, "content-type"), "application/json");

        let (status, _, _) = send(&state, post("Location=Seattle&ReviewBody=ok")).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}
