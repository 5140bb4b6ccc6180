//! Router tests: requests go through the full axum stack, the recipe API is
//! a wiremock server

mod support;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use web::routes::create_router;
use wiremock::matchers::{header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{recipe_json, session_header, state_for};

fn app(server: &MockServer) -> Router {
    create_router(state_for(&server.uri()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_session(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, session_header("tok", "chef"))
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;

    let response = app(&server).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"status": "ok", "service": "gourmet-web"})
    );
}

#[tokio::test]
async fn test_session_status_reads_cookie() {
    let server = MockServer::start().await;

    let response = app(&server)
        .oneshot(get_with_session("/session"))
        .await
        .unwrap();
    assert_eq!(
        json_body(response).await,
        json!({"logged_in": true, "username": "chef"})
    );

    let response = app(&server).oneshot(get("/session")).await.unwrap();
    assert_eq!(
        json_body(response).await,
        json!({"logged_in": false, "username": null})
    );
}

#[tokio::test]
async fn test_recipes_are_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recipes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            recipe_json("r1", "Soup"),
            {"id": "r2", "name": "Toast"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&server);

    let response = app.clone().oneshot(get("/recipes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cards = json_body(response).await;
    assert_eq!(cards[0]["id"], "r1");
    assert_eq!(cards[0]["total_time"], 30);
    assert_eq!(cards[1]["category"], "General");

    let response = app.oneshot(get("/recipes")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_recipes_upstream_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recipes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = app(&server).oneshot(get("/recipes")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Failed to fetch data"})
    );
}

#[tokio::test]
async fn test_unknown_recipe_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recipes/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let response = app(&server).oneshot(get("/recipes/missing")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recipe_page_flags_favorite() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recipes/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recipe_json("r1", "Soup")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/chef/favorites"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"recipe": recipe_json("r1", "Soup")}])),
        )
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get_with_session("/recipes/r1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let detail = json_body(response).await;
    assert_eq!(detail["recipe"]["name"], "Soup");
    assert_eq!(detail["total_time"], 30);
    assert_eq!(detail["is_favorite"], true);
    assert_eq!(detail["logged_in"], true);
}

#[tokio::test]
async fn test_recipe_page_ignores_favorites_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recipes/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recipe_json("r1", "Soup")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/chef/favorites"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get_with_session("/recipes/r1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["is_favorite"], false);
}

#[tokio::test]
async fn test_favorites_requires_session() {
    let server = MockServer::start().await;

    let response = app(&server).oneshot(get("/favorites")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_favorites_lists_both_payload_shapes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/chef/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"recipe": recipe_json("r1", "Soup")},
            recipe_json("r2", "Stew"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&server);

    let response = app
        .clone()
        .oneshot(get_with_session("/favorites"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cards = json_body(response).await;
    assert_eq!(cards[0]["name"], "Soup");
    assert_eq!(cards[1]["name"], "Stew");

    // Second view is served from the cache
    let response = app.oneshot(get_with_session("/favorites")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cached_favorites_are_bound_to_the_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/chef/favorites"))
        .and(header_eq("authorization", "Bearer tok"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([recipe_json("r1", "Secret Soup")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/chef/favorites"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recipes/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recipe_json("r1", "Secret Soup")))
        .mount(&server)
        .await;

    let app = app(&server);

    let response = app
        .clone()
        .oneshot(get_with_session("/favorites"))
        .await
        .unwrap();
    assert_eq!(json_body(response).await[0]["name"], "Secret Soup");

    // Same username, token the API does not accept
    let forged = Request::builder()
        .uri("/favorites")
        .header(header::COOKIE, "session_token=forged; username=chef")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(forged).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));

    let forged = Request::builder()
        .uri("/recipes/r1")
        .header(header::COOKIE, "session_token=forged; username=chef")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(forged).await.unwrap();
    assert_eq!(json_body(response).await["is_favorite"], false);
}

#[tokio::test]
async fn test_expired_token_shows_no_favorites() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/chef/favorites"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(get_with_session("/favorites"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn test_login_form_sets_cookie_and_redirects() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=chef&password=secret1"))
        .unwrap();

    let response = app(&server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("session="));
    assert!(cookies[0].contains("HttpOnly"));
    assert!(cookies[0].contains("SameSite=Lax"));
}

#[tokio::test]
async fn test_login_form_reports_validation_message() {
    let server = MockServer::start().await;

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=ab&password=secret1"))
        .unwrap();

    let response = app(&server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"message": "Username must be at least 3 characters."})
    );
}

#[tokio::test]
async fn test_logout_clears_cookies_and_redirects() {
    let server = MockServer::start().await;

    let request = Request::builder()
        .method("POST")
        .uri("/logout")
        .header(
            header::COOKIE,
            format!(
                "{}; session_token=old-token; username=chef",
                session_header("tok", "chef")
            ),
        )
        .body(Body::empty())
        .unwrap();

    let response = app(&server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
    assert_eq!(set_cookies(&response).len(), 3);
}

#[tokio::test]
async fn test_toggle_favorite_without_session() {
    let server = MockServer::start().await;

    let request = Request::builder()
        .method("POST")
        .uri("/recipes/r1/favorite")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"is_currently_favorite":false}"#))
        .unwrap();

    let response = app(&server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await, json!({"error": "Unauthorized"}));
}

#[tokio::test]
async fn test_toggle_favorite_success() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/chef/favorites"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/recipes/r1/favorite")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, session_header("tok", "chef"))
        .body(Body::from(r#"{"is_currently_favorite":true}"#))
        .unwrap();

    let response = app(&server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"success": true}));
}
