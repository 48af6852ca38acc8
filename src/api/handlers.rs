use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::RecommendedProduct;
use crate::services::engine::RecommendationEngine;

use super::AppState;

/// Name of the identity cookie
pub const IDENTITY_COOKIE: &str = "user_id";

/// Identity cookie lifetime, one year
const COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Handler for the recommendations endpoint
///
/// Always responds 200 with a JSON array; an absent or malformed identity
/// cookie means a new visitor, and explanation failures degrade per item
/// rather than failing the request. The cookie is set or refreshed on every
/// response.
pub async fn recommendations(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = identity_from_headers(&headers).unwrap_or_else(Uuid::new_v4);
    let profile_id = state.resolver.resolve(token);

    let engine = RecommendationEngine::new(&state.catalog, &state.interactions);
    let picks = {
        let mut rng = rand::thread_rng();
        engine.recommend(profile_id, &mut rng)
    };

    tracing::info!(profile_id, recommended = picks.len(), "Recommendations computed");

    let history_names: Vec<String> = state
        .interactions
        .history(profile_id)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| state.catalog.get(*id))
                .map(|product| product.name.clone())
                .collect()
        })
        .unwrap_or_default();
    let pick_names: Vec<String> = picks.iter().map(|product| product.name.clone()).collect();

    // The recommendation order is fixed before the generation call
    let explanations = state.augmenter.augment(&history_names, &pick_names).await;

    let payload: Vec<RecommendedProduct> = picks
        .iter()
        .zip(explanations)
        .map(|(product, explanation)| RecommendedProduct::new(product, explanation))
        .collect();

    let mut response = Json(payload).into_response();
    if let Ok(cookie) = HeaderValue::from_str(&identity_cookie(token, state.cookie_secure)) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }

    response
}

/// Extracts the identity token from the request's cookies
///
/// A missing header, missing cookie, or unparseable token all mean the
/// caller is treated as a new visitor.
fn identity_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name.trim() == IDENTITY_COOKIE {
            Uuid::parse_str(value.trim()).ok()
        } else {
            None
        }
    })
}

fn identity_cookie(token: Uuid, secure: bool) -> String {
    // SameSite=None requires Secure; only usable when the frontend is
    // served over HTTPS from another origin.
    let site_attrs = if secure {
        "SameSite=None; Secure"
    } else {
        "SameSite=Lax"
    };

    format!(
        "{IDENTITY_COOKIE}={token}; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}; HttpOnly; {site_attrs}"
    )
}
