use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

use upstash_receiver::app::build_router;
use upstash_receiver::middleware::signature::{CallbackPolicy, SIGNATURE_HEADER};
use upstash_receiver::services::signature::body_hash;
use upstash_receiver::state::AppState;
use upstash_receiver::{ClaimSet, SigningKeys, Verifier};

const CURRENT: &str = "sig_current_key";
const NEXT: &str = "sig_next_key";
const DESTINATION: &str = "https://hooks.example.com/api/v1/callback";
const BODY: &str = r#"{"hello":"world"}"#;

fn app() -> Router {
    app_published_at("https://hooks.example.com")
}

fn app_published_at(base_url: &str) -> Router {
    let verifier = Arc::new(Verifier::new(&SigningKeys::new(CURRENT, NEXT)));
    let policy = CallbackPolicy {
        tolerance: Duration::from_secs(5),
        public_base_url: Some(Url::parse(base_url).unwrap()),
        max_body_bytes: 64 * 1024,
    };
    build_router(AppState::new(verifier, policy))
}

fn token(body: &str, sub: &str, key: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = ClaimSet {
        iss: "Upstash".to_string(),
        sub: sub.to_string(),
        exp: now + 300,
        nbf: Some(now),
        iat: Some(now),
        jti: Some("msg_123".to_string()),
        body: body_hash(body.as_bytes()),
    };
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".to_string());
    jsonwebtoken::encode(&header, &claims, &EncodingKey::from_secret(key.as_bytes())).unwrap()
}

fn callback(signature: Option<&str>, body: &str) -> Request<Body> {
    callback_to("/api/v1/callback", signature, body)
}

fn callback_to(uri: &str, signature: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_needs_no_signature() {
    for uri in ["/health", "/api/v1/health"] {
        let response = app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}

#[tokio::test]
async fn accepts_signed_callback() {
    let signature = token(BODY, DESTINATION, CURRENT);
    let response = app()
        .oneshot(callback(Some(&signature), BODY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "accepted");
    assert_eq!(json["message_id"], "msg_123");
    assert_eq!(json["destination"], DESTINATION);
}

#[tokio::test]
async fn destination_is_the_published_url_not_the_nested_path() {
    // signed for the route as the nested router sees it, without the /api/v1 prefix
    let stripped = token(BODY, "https://hooks.example.com/callback", CURRENT);
    let response = app()
        .oneshot(callback(Some(&stripped), BODY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let published = "https://hooks.example.com/api/v1/callback?topic=orders";
    let signature = token(BODY, published, CURRENT);
    let request = callback_to("/api/v1/callback?topic=orders", Some(&signature), BODY);
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["destination"], published);
}

#[tokio::test]
async fn destination_keeps_public_base_path() {
    let published = "https://gw.example.com/hooks/api/v1/callback";
    let signature = token(BODY, published, CURRENT);
    let response = app_published_at("https://gw.example.com/hooks")
        .oneshot(callback(Some(&signature), BODY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn accepts_callback_signed_with_next_key() {
    let signature = token(BODY, DESTINATION, NEXT);
    let response = app()
        .oneshot(callback(Some(&signature), BODY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn rejects_missing_signature() {
    let response = app().oneshot(callback(None, BODY)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn failures_are_indistinguishable() {
    let cases = [
        // forged key
        (token(BODY, DESTINATION, "sig_forged_key"), BODY),
        // tampered body
        (token(BODY, DESTINATION, CURRENT), r#"{"hello":"there"}"#),
        // signed for another destination
        (token(BODY, "https://hooks.example.com/other", CURRENT), BODY),
    ];

    let mut bodies = Vec::new();
    for (signature, body) in cases {
        let response = app()
            .oneshot(callback(Some(&signature), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(json_body(response).await);
    }

    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn rejects_oversized_body() {
    let body = "x".repeat(64 * 1024 + 1);
    let signature = token(&body, DESTINATION, CURRENT);
    let response = app()
        .oneshot(callback(Some(&signature), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
