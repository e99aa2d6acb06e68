// tests/api.rs
//
// Testes ponta a ponta do router, com um gerador de texto falso no lugar da OpenAI.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use smart_review::{
    config::{AppState, Settings},
    routes::build_router,
    services::ai_provider::{CompletionRequest, ProviderError, TextGenerator},
};

const REVIEW_REPLY: &str =
    "Title: Wonderful cut in Shibuya\nReview: The cut and color were professional and the staff was kind.";

struct FakeGenerator {
    fail: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Api { status: 500, body: "boom".into() });
        }
        // Pedido de sugestões usa o limite de 300 tokens
        if request.max_tokens == 300 {
            return Ok("- Reduce waiting time\n- Confirm bookings by message".into());
        }
        Ok(REVIEW_REPLY.into())
    }
}

struct TestApp {
    router: Router,
    generator: Arc<FakeGenerator>,
}

async fn spawn_app(fail: bool) -> TestApp {
    let settings = Settings::from_lookup(|key| match key {
        "OPENAI_API_KEY" => Some("test-key".into()),
        "SEED_SAMPLE_DATA" => Some("true".into()),
        "REVIEW_LANDING_URL" => Some("https://smartreview.test/review".into()),
        _ => None,
    })
    .unwrap();

    let generator = Arc::new(FakeGenerator { fail, calls: AtomicUsize::new(0) });
    let app_state = AppState::with_generator(settings, generator.clone()).await.unwrap();

    TestApp { router: build_router(app_state), generator }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, bytes) = self.send(request).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, bytes) = self.send(request).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn sample_store_id(&self) -> String {
        let (status, store) = self.get("/api/v1/stores/qr/qr_sample_001").await;
        assert_eq!(status, StatusCode::OK);
        store["id"].as_str().unwrap().to_string()
    }
}

// --- Geração e roteamento por nota ---

#[tokio::test]
async fn high_rating_generates_and_stores_review() {
    let app = spawn_app(false).await;
    let store_id = app.sample_store_id().await;

    let (status, body) = app
        .json(
            "POST",
            "/api/v1/reviews/generate",
            json!({ "storeId": store_id, "rating": 5, "language": "en" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["review"]["title"], "Wonderful cut in Shibuya");
    assert_eq!(body["review"]["status"], "generated");
    assert_eq!(body["review"]["reviewType"], "positive");
    assert_eq!(
        body["redirectPlatforms"],
        json!([
            "https://www.google.com/maps/place/sample-salon",
            "https://beauty.hotpepper.jp/slnH000000001/"
        ])
    );

    let (_, page) = app.get(&format!("/api/v1/reviews/store/{}", store_id)).await;
    assert_eq!(page["total"], 1);
}

#[tokio::test]
async fn low_rating_routes_to_feedback_without_calling_ai() {
    let app = spawn_app(false).await;
    let store_id = app.sample_store_id().await;

    let (status, body) = app
        .json("POST", "/api/v1/reviews/generate", json!({ "storeId": store_id, "rating": 2 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["review"].is_null());
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 2);
    assert_eq!(body["redirectPlatforms"], json!([]));
    assert_eq!(app.generator.calls.load(Ordering::SeqCst), 0);

    let (_, page) = app.get("/api/v1/reviews").await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn provider_failure_returns_unsuccessful_result_and_persists_nothing() {
    let app = spawn_app(true).await;
    let store_id = app.sample_store_id().await;

    let (status, body) = app
        .json("POST", "/api/v1/reviews/generate", json!({ "storeId": store_id, "rating": 5 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("AI service error"));

    let (_, page) = app.get("/api/v1/reviews").await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn generation_for_unknown_store_fails_softly_and_invalid_rating_is_400() {
    let app = spawn_app(false).await;

    let (status, body) = app
        .json(
            "POST",
            "/api/v1/reviews/generate",
            json!({ "storeId": "00000000-0000-0000-0000-000000000000", "rating": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);

    let store_id = app.sample_store_id().await;
    let (status, body) = app
        .json("POST", "/api/v1/reviews/generate", json!({ "storeId": store_id, "rating": 6 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["rating"].is_array());
}

#[tokio::test]
async fn batch_generate_reports_each_request_in_order() {
    let app = spawn_app(false).await;
    let store_id = app.sample_store_id().await;

    let (status, body) = app
        .json(
            "POST",
            "/api/v1/reviews/batch/generate",
            json!([
                { "storeId": store_id, "rating": 5 },
                { "storeId": store_id, "rating": 9 },
                { "storeId": store_id, "rating": 1 }
            ]),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Processed 3 review generation requests");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["success"], true);
    assert!(results[0]["reviewId"].is_string());
    assert_eq!(results[1]["success"], false);
    assert_eq!(results[2]["success"], true);
    assert!(results[2]["reviewId"].is_null());
}

#[tokio::test]
async fn malformed_batch_items_fail_alone() {
    let app = spawn_app(false).await;
    let store_id = app.sample_store_id().await;

    let (status, body) = app
        .json(
            "POST",
            "/api/v1/reviews/batch/generate",
            json!([
                { "storeId": store_id, "rating": 5 },
                { "storeId": "not-a-uuid", "rating": 5 },
                { "storeId": store_id, "rating": 300 }
            ]),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["success"], true);
    assert!(results[0]["reviewId"].is_string());
    for malformed in &results[1..] {
        assert_eq!(malformed["success"], false);
        assert!(malformed["storeId"].is_null());
        assert_eq!(malformed["error"], "One or more fields are invalid.");
    }

    let review_id = results[0]["reviewId"].as_str().unwrap().to_string();
    let (status, body) = app
        .json("POST", "/api/v1/reviews/batch/publish", json!(["not-a-uuid", review_id]))
        .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["success"], false);
    assert!(results[0]["reviewId"].is_null());
    assert_eq!(results[0]["error"], "One or more fields are invalid.");
    assert_eq!(results[1]["success"], true);
    assert_eq!(results[1]["reviewId"], review_id.as_str());
}

// --- Lojas e QR codes ---

#[tokio::test]
async fn unknown_qr_code_is_404_with_localized_message() {
    let app = spawn_app(false).await;

    let request = Request::builder()
        .uri("/api/v1/stores/qr/does-not-exist")
        .header(header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9")
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = app.send(request).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Nenhuma loja vinculada ao QR Code: does-not-exist");
}

#[tokio::test]
async fn duplicate_platform_is_409_and_store_is_unchanged() {
    let app = spawn_app(false).await;
    let store_id = app.sample_store_id().await;

    let (status, _) = app
        .json(
            "POST",
            &format!("/api/v1/stores/{}/platforms", store_id),
            json!({ "type": "google", "url": "https://maps.google.com/other" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, platforms) = app.get(&format!("/api/v1/stores/{}/platforms", store_id)).await;
    assert_eq!(platforms.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn store_crud_and_qr_mapping_flow() {
    let app = spawn_app(false).await;

    let (status, store) = app
        .json(
            "POST",
            "/api/v1/stores",
            json!({
                "name": "Cafe Aoyama",
                "seoKeywords": ["coffee", "coffee", "aoyama"],
                "platforms": [{ "type": "google", "url": "https://maps.google.com/cafe" }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(store["seoKeywords"], json!(["coffee", "aoyama"]));
    let id = store["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .json("POST", &format!("/api/v1/stores/{}/qr/cafe_qr", id), json!({}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, resolved) = app.get("/api/v1/stores/qr/cafe_qr").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["name"], "Cafe Aoyama");

    let (status, _) = app.json("DELETE", &format!("/api/v1/stores/{}", id), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/v1/stores/qr/cafe_qr").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn qr_image_is_a_png() {
    let app = spawn_app(false).await;

    let request = Request::builder()
        .uri("/api/v1/stores/qr/qr_sample_001/image")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn pagination_limit_out_of_range_is_400() {
    let app = spawn_app(false).await;

    let (status, _) = app.get("/api/v1/stores?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/v1/reviews?limit=101").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, page) = app.get("/api/v1/stores?page=1&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
}

// --- Ciclo de vida, feedback e analytics ---

#[tokio::test]
async fn manual_review_lifecycle_ends_in_archive() {
    let app = spawn_app(false).await;
    let store_id = app.sample_store_id().await;

    let (status, review) = app
        .json(
            "POST",
            "/api/v1/reviews",
            json!({ "storeId": store_id, "rating": 3, "title": "Okay", "content": "Average visit." }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(review["status"], "draft");
    assert_eq!(review["reviewType"], "neutral");
    let id = review["id"].as_str().unwrap().to_string();

    let (status, published) = app
        .json("POST", &format!("/api/v1/reviews/{}/publish", id), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(published["status"], "published");
    assert!(published["publishedAt"].is_string());

    let (status, _) = app
        .json("PUT", &format!("/api/v1/reviews/{}", id), json!({ "status": "draft" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, archived) = app
        .json("PUT", &format!("/api/v1/reviews/{}", id), json!({ "status": "archived" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archived["status"], "archived");

    let (status, _) = app
        .json("POST", &format!("/api/v1/reviews/{}/publish", id), json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn feedback_capture_returns_ai_suggestions() {
    let app = spawn_app(false).await;
    let store_id = app.sample_store_id().await;

    let (status, body) = app
        .json(
            "POST",
            "/api/v1/reviews/feedback",
            json!({
                "storeId": store_id,
                "rating": 2,
                "feedbackContent": "I waited forty minutes past my booking."
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Feedback captured successfully");
    assert_eq!(
        body["suggestions"],
        json!(["Reduce waiting time", "Confirm bookings by message"])
    );

    let feedback_id = body["feedbackId"].as_str().unwrap();
    let (status, feedback) = app.get(&format!("/api/v1/reviews/feedback/{}", feedback_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feedback["rating"], 2);

    let (_, list) = app.get(&format!("/api/v1/reviews/feedback?storeId={}", store_id)).await;
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn analytics_summary_counts_generated_reviews() {
    let app = spawn_app(false).await;
    let store_id = app.sample_store_id().await;

    for rating in [5, 4] {
        app.json(
            "POST",
            "/api/v1/reviews/generate",
            json!({ "storeId": store_id, "rating": rating }),
        )
        .await;
    }

    let (status, summary) = app
        .get(&format!("/api/v1/reviews/analytics/summary?storeId={}", store_id))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalReviews"], 2);
    assert_eq!(summary["averageRating"], 4.5);
    assert_eq!(summary["ratingDistribution"]["5"], 1);
    assert_eq!(summary["ratingDistribution"]["1"], 0);
    assert_eq!(summary["reviewsByStatus"]["generated"], 2);
    assert_eq!(summary["generatedToday"], 2);
}

// --- Health ---

#[tokio::test]
async fn health_endpoints_report_ai_configuration() {
    let app = spawn_app(false).await;

    let (status, health) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");

    let (status, ai) = app.get("/api/v1/reviews/health/ai").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ai["openaiConfigured"], true);
    assert_eq!(ai["model"], "gpt-4-turbo-preview");
}
