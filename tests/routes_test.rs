mod common;

use serde_json::{json, Value};
use uuid::Uuid;
use vocab::routes::configure_routes;
use vocab::store::WordStore;
use warp::http::StatusCode;

fn body_json(response: &warp::http::Response<bytes::Bytes>) -> Value {
    serde_json::from_slice(response.body()).expect("response body is not JSON")
}

fn bearer(token: Uuid) -> String {
    format!("Bearer {}", token)
}

#[tokio::test]
async fn test_health_and_home() {
    let (service, _store) = common::memory_service(common::ScriptedProvider::new());
    let routes = configure_routes(service);

    let response = warp::test::request().path("/health").reply(&routes).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(&response), json!({ "status": "ok" }));

    let response = warp::test::request().path("/").reply(&routes).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(String::from_utf8_lossy(response.body()).contains("<form"));
}

#[tokio::test]
async fn test_unknown_path_and_wrong_method() {
    let (service, _store) = common::memory_service(common::ScriptedProvider::new());
    let routes = configure_routes(service);

    let response = warp::test::request().path("/nope").reply(&routes).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(&response)["error"].is_string());

    let response = warp::test::request()
        .method("GET")
        .path("/lookup")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_lookup_anonymous_and_empty_word() {
    let (service, _store) = common::memory_service(common::ScriptedProvider::new());
    let routes = configure_routes(service);

    let response = warp::test::request()
        .method("POST")
        .path("/lookup")
        .json(&json!({ "word": "Ubiquitous" }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(&response);
    assert_eq!(body["word"], "ubiquitous");
    assert_eq!(body["is_saved"], false);
    assert_eq!(body["examples"].as_array().map(Vec::len), Some(2));
    assert!(body["id"].is_string());

    let response = warp::test::request()
        .method("POST")
        .path("/lookup")
        .json(&json!({ "word": "  " }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(&response), json!({ "error": "Word is required" }));
}

#[tokio::test]
async fn test_lookup_provider_failure_is_bad_gateway() {
    let provider = common::ScriptedProvider::new();
    provider.fail();
    let (service, _store) = common::memory_service(provider);
    let routes = configure_routes(service);

    let response = warp::test::request()
        .method("POST")
        .path("/lookup")
        .json(&json!({ "word": "moot" }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_lookup_empty_definition_is_bad_gateway() {
    let provider = common::ScriptedProvider::new();
    provider.set_definition_reply("   ");
    let (service, store) = common::memory_service(provider);
    let routes = configure_routes(service);

    let response = warp::test::request()
        .method("POST")
        .path("/lookup")
        .json(&json!({ "word": "moot" }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_json(&response)["error"].is_string());
    assert!(store.find_word("moot").await.unwrap().is_none());
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (service, _store) = common::memory_service(common::ScriptedProvider::new());
    let routes = configure_routes(service);

    let response = warp::test::request().path("/my-words").reply(&routes).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = warp::test::request()
        .path("/quiz")
        .header("authorization", bearer(Uuid::new_v4()))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = warp::test::request()
        .method("POST")
        .path("/lookup")
        .header("authorization", "Bearer garbage")
        .json(&json!({ "word": "moot" }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_save_quiz_submit_remove() {
    let (service, store) = common::memory_service(common::ScriptedProvider::new());
    let routes = configure_routes(service);

    // Register
    let response = warp::test::request()
        .method("POST")
        .path("/accounts/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "first_name": "Alice"
        }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let token: Uuid = body_json(&response)["token"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    let auth = bearer(token);

    // Registering again conflicts
    let response = warp::test::request()
        .method("POST")
        .path("/accounts/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "first_name": "Alice"
        }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Empty quiz
    let response = warp::test::request()
        .path("/quiz")
        .header("authorization", &auth)
        .reply(&routes)
        .await;
    assert_eq!(body_json(&response), json!({ "no_words": true }));

    // Lookup and save
    let response = warp::test::request()
        .method("POST")
        .path("/lookup")
        .header("authorization", &auth)
        .json(&json!({ "word": "ubiquitous" }))
        .reply(&routes)
        .await;
    let word_id = body_json(&response)["id"].as_str().unwrap().to_string();

    let response = warp::test::request()
        .method("POST")
        .path("/save")
        .header("authorization", &auth)
        .json(&json!({ "word_id": word_id }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(&response), json!({ "success": true, "created": true }));

    // Collection
    let response = warp::test::request()
        .path("/my-words")
        .header("authorization", &auth)
        .reply(&routes)
        .await;
    let body = body_json(&response);
    assert_eq!(body["user_words"][0]["word"], "ubiquitous");
    assert_eq!(body["user_words"][0]["familiarity_score"], 0);

    // Quiz, without the definition
    let response = warp::test::request()
        .path("/quiz")
        .header("authorization", &auth)
        .reply(&routes)
        .await;
    let quiz = body_json(&response);
    assert_eq!(quiz["word"]["word"], "ubiquitous");
    assert!(quiz["word"].get("definition").is_none());
    let user_word_id = quiz["user_word_id"].as_i64().unwrap();

    // Submit a wrong answer with the id as a string
    let response = warp::test::request()
        .method("POST")
        .path("/quiz/submit")
        .header("authorization", &auth)
        .header("host", "vocab.test")
        .json(&json!({
            "user_word_id": user_word_id.to_string(),
            "selected_answer": "Extremely rare",
            "correct_answer": quiz["quiz"]["correct_answer"]
        }))
        .reply(&routes)
        .await;
    assert_eq!(
        body_json(&response),
        json!({ "correct": false, "next_url": "http://vocab.test/quiz" })
    );

    let user = store.find_user_by_token(token).await.unwrap().unwrap();
    let listed = store.list_user_words(user.id).await.unwrap();
    assert_eq!(listed[0].user_word.familiarity_score, 1);
    assert!(listed[0].user_word.last_reviewed.is_some());

    // Remove, then remove again
    let response = warp::test::request()
        .method("POST")
        .path("/remove")
        .header("authorization", &auth)
        .json(&json!({ "word_id": word_id }))
        .reply(&routes)
        .await;
    assert_eq!(body_json(&response), json!({ "success": true }));

    let response = warp::test::request()
        .method("POST")
        .path("/remove")
        .header("authorization", &auth)
        .json(&json!({ "word_id": word_id }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(&response)["error"].is_string());
}

#[tokio::test]
async fn test_submit_behind_tls_proxy_links_over_https() {
    let (service, store) = common::memory_service(common::ScriptedProvider::new());
    let user = common::create_user(store.as_ref(), "alice").await;
    let word = service.lookup(None, "moot").await.unwrap();
    service.save_word(&user, word.id).await.unwrap();
    let user_word = store.find_user_word(user.id, word.id).await.unwrap().unwrap();
    let routes = configure_routes(service);

    let response = warp::test::request()
        .method("POST")
        .path("/quiz/submit")
        .header("authorization", bearer(user.api_token))
        .header("host", "vocab.example.com")
        .header("x-forwarded-proto", "https")
        .json(&json!({
            "user_word_id": user_word.id,
            "selected_answer": "Debatable",
            "correct_answer": "Debatable"
        }))
        .reply(&routes)
        .await;
    assert_eq!(
        body_json(&response),
        json!({ "correct": true, "next_url": "https://vocab.example.com/quiz" })
    );
}

#[tokio::test]
async fn test_save_unknown_word_and_bad_body() {
    let (service, store) = common::memory_service(common::ScriptedProvider::new());
    let user = common::create_user(store.as_ref(), "alice").await;
    let routes = configure_routes(service);

    let response = warp::test::request()
        .method("POST")
        .path("/save")
        .header("authorization", bearer(user.api_token))
        .json(&json!({ "word_id": Uuid::new_v4() }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = warp::test::request()
        .method("POST")
        .path("/save")
        .header("authorization", bearer(user.api_token))
        .json(&json!({ "word_id": "not-a-uuid" }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_validation_error() {
    let (service, _store) = common::memory_service(common::ScriptedProvider::new());
    let routes = configure_routes(service);

    let response = warp::test::request()
        .method("POST")
        .path("/accounts/register")
        .json(&json!({
            "username": "al",
            "email": "alice@example.com",
            "first_name": "Alice"
        }))
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
