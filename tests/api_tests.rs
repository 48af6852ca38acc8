use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;
use uuid::Uuid;

use magpie_api::api::{create_router, AppState};
use magpie_api::error::{AppError, AppResult};
use magpie_api::models::{Interaction, Product};
use magpie_api::services::explain::{
    Augmenter, ExplanationMode, GenerativeClient, FALLBACK_EXPLANATION,
};
use magpie_api::services::identity::IdentityResolver;
use magpie_api::store::{CatalogStore, InteractionLog};

struct FailingClient;

#[async_trait::async_trait]
impl GenerativeClient for FailingClient {
    async fn complete(&self, _prompt: &str) -> AppResult<String> {
        Err(AppError::ExternalApi(
            "generation service unavailable".to_string(),
        ))
    }
}

struct CannedClient(&'static str);

#[async_trait::async_trait]
impl GenerativeClient for CannedClient {
    async fn complete(&self, _prompt: &str) -> AppResult<String> {
        Ok(self.0.to_string())
    }
}

fn product(id: u32, name: &str, category: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        category: category.to_string(),
        image_url: format!("https://img.example/{id}.png"),
        platforms: vec!["Amazon".to_string()],
    }
}

fn test_state(client: Arc<dyn GenerativeClient>) -> AppState {
    let catalog = CatalogStore::from_products(vec![
        product(1, "Wireless Headphones", "Electronics"),
        product(2, "Smart Speaker", "Electronics"),
        product(3, "Gaming Mouse", "Electronics"),
        product(4, "Yoga Mat", "Sports & Outdoors"),
    ]);

    // Profile 101 (the nil token's profile) has neighbors 102 and 103, so
    // its tier 2 result is deterministic: Smart Speaker then Gaming Mouse.
    let interactions = InteractionLog::from_records(
        [
            (101, 1),
            (102, 1),
            (102, 2),
            (103, 1),
            (103, 2),
            (103, 3),
        ]
        .into_iter()
        .map(|(profile_id, product_id)| Interaction {
            profile_id,
            product_id,
        })
        .collect(),
    );

    AppState::new(
        catalog,
        interactions,
        IdentityResolver::new(50, 101),
        Augmenter::new(client, ExplanationMode::Batch),
        false,
    )
}

const CANNED_LINES: &str = "\
Smart Speaker: Because you liked audio gear, this one sings.
Gaming Mouse: Because you liked upgrades, now click faster.";

fn recommendations_request(cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/recommendations");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Pulls the identity token out of a Set-Cookie header value
fn token_from_set_cookie(set_cookie: &str) -> Uuid {
    let value = set_cookie
        .strip_prefix("user_id=")
        .and_then(|rest| rest.split(';').next())
        .expect("Set-Cookie should carry the identity cookie");
    Uuid::parse_str(value).expect("identity cookie should be a UUID")
}

#[tokio::test]
async fn test_health_check() {
    let app = create_router(test_state(Arc::new(CannedClient(CANNED_LINES))));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_new_visitor_gets_recommendations_and_a_cookie() {
    let app = create_router(test_state(Arc::new(CannedClient(CANNED_LINES))));

    let response = app.oneshot(recommendations_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("new visitors must be issued an identity cookie")
        .to_str()
        .unwrap()
        .to_string();
    token_from_set_cookie(&set_cookie);
    assert!(set_cookie.contains("Max-Age=31536000"));

    let json = body_json(response).await;
    let items = json.as_array().expect("response must be a JSON array");
    assert!(!items.is_empty() && items.len() <= 3);
    for item in items {
        assert!(item["product_name"].is_string());
        assert!(item["category"].is_string());
        assert!(item["image_url"].is_string());
        assert!(item["platforms"].is_array());
        assert!(!item["explanation"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_known_profile_gets_deterministic_collaborative_picks() {
    let app = create_router(test_state(Arc::new(CannedClient(CANNED_LINES))));

    // The nil token resolves to profile 101
    let cookie = format!("user_id={}", Uuid::nil());

    let first = app
        .clone()
        .oneshot(recommendations_request(Some(&cookie)))
        .await
        .unwrap();
    let second = app
        .oneshot(recommendations_request(Some(&cookie)))
        .await
        .unwrap();

    let first_json = body_json(first).await;
    let second_json = body_json(second).await;
    assert_eq!(first_json, second_json);

    let names: Vec<&str> = first_json
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["product_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Smart Speaker", "Gaming Mouse"]);

    assert_eq!(
        first_json[0]["explanation"],
        "Because you liked audio gear, this one sings."
    );
}

#[tokio::test]
async fn test_returning_cookie_is_refreshed_not_replaced() {
    let app = create_router(test_state(Arc::new(CannedClient(CANNED_LINES))));

    let first = app
        .clone()
        .oneshot(recommendations_request(None))
        .await
        .unwrap();
    let token = token_from_set_cookie(
        first
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap(),
    );

    let second = app
        .oneshot(recommendations_request(Some(&format!("user_id={token}"))))
        .await
        .unwrap();
    let refreshed = token_from_set_cookie(
        second
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap(),
    );

    assert_eq!(token, refreshed);
}

#[tokio::test]
async fn test_failing_generation_service_degrades_to_placeholder() {
    let app = create_router(test_state(Arc::new(FailingClient)));

    let cookie = format!("user_id={}", Uuid::nil());
    let response = app
        .oneshot(recommendations_request(Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let items = json.as_array().unwrap();
    assert!(!items.is_empty());
    for item in items {
        assert_eq!(item["explanation"], FALLBACK_EXPLANATION);
    }
}

#[tokio::test]
async fn test_malformed_cookie_is_treated_as_a_new_visitor() {
    let app = create_router(test_state(Arc::new(CannedClient(CANNED_LINES))));

    let response = app
        .oneshot(recommendations_request(Some("user_id=not-a-uuid")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    // A fresh, valid token replaces the unparseable one
    token_from_set_cookie(&set_cookie);
}

#[tokio::test]
async fn test_empty_catalog_yields_an_empty_array() {
    let state = AppState::new(
        CatalogStore::from_products(vec![]),
        InteractionLog::from_records(vec![]),
        IdentityResolver::new(50, 101),
        Augmenter::new(Arc::new(FailingClient), ExplanationMode::Batch),
        false,
    );
    let app = create_router(state);

    let response = app.oneshot(recommendations_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!([]));
}
