//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인, 토큰 갱신, 로그아웃, 내 정보/설정
//! - `ideas`: 아이디어 CRUD, 공개 범위, 태그, 목록/피드, 공유 보기 (`AppState` 정의)
//! - `sessions`: 편집 세션 (자동 저장, 수동 저장)
//! - `ai`: 생성 API를 호출하는 기능들 (생성, 평가, 시장 조사, 브랜드 키트, 대화)
//! - `health`: 서버 상태 확인

pub mod ai;
pub mod auth;
pub mod health;
pub mod ideas;
pub mod sessions;

use axum::{
    routing::{get, post, put},
    Router,
};

use ideas::AppState;

/// `/api/v1` 아래에 붙는 모든 API 라우트
pub fn api_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me).patch(auth::update_me));

    let idea_routes = Router::new()
        .route("/ideas", get(ideas::list_ideas).post(ideas::create_idea))
        .route("/ideas/public", get(ideas::list_public_ideas))
        .route(
            "/ideas/{id}",
            get(ideas::get_idea)
                .patch(ideas::update_idea)
                .delete(ideas::delete_idea),
        )
        .route("/ideas/{id}/visibility", post(ideas::toggle_visibility))
        .route("/ideas/{id}/tags", put(ideas::set_tags))
        .route("/share/{id}", get(ideas::get_shared_idea));

    let session_routes = Router::new()
        .route("/ideas/{id}/sessions", post(sessions::open_session))
        .route(
            "/sessions/{sid}",
            get(sessions::get_session)
                .put(sessions::edit_session)
                .delete(sessions::close_session),
        )
        .route("/sessions/{sid}/save", post(sessions::save_session));

    let ai_routes = Router::new()
        .route("/ai/generate", post(ai::generate_idea))
        .route("/ai/evaluate", post(ai::evaluate_idea))
        .route("/ai/research", post(ai::research_market))
        .route("/ai/brandkit", post(ai::generate_brand_kit))
        .route("/ai/chat", post(ai::chat));

    Router::new()
        .merge(auth_routes)
        .merge(idea_routes)
        .merge(session_routes)
        .merge(ai_routes)
        .route("/health", get(health::health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::gemini::GenerationError;
    use crate::test_support::{bearer, test_state, FakeGenerator};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        generator: std::sync::Arc<FakeGenerator>,
    }

    impl TestApp {
        async fn new(responses: Vec<Result<String, GenerationError>>) -> Self {
            let generator = FakeGenerator::with_responses(responses);
            let state = test_state(generator.clone()).await;
            Self {
                router: api_router(state),
                generator,
            }
        }

        async fn call(&self, method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
            let mut request = Request::builder().method(method).uri(uri);
            if let Some(user) = user {
                request = request.header(header::AUTHORIZATION, bearer(user));
            }
            let request = match body {
                Some(body) => request
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string())),
                None => request.body(Body::empty()),
            }
            .unwrap();

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }
    }

    async fn create(app: &TestApp, user: &str, title: &str) -> Value {
        let (status, idea) = app
            .call(Method::POST, "/ideas", Some(user), Some(json!({ "title": title })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        idea
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = TestApp::new(vec![]).await;
        let (status, body) = app.call(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn idea_routes_require_a_token() {
        let app = TestApp::new(vec![]).await;
        let (status, body) = app.call(Method::GET, "/ideas", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "missing_token");
    }

    #[tokio::test]
    async fn owner_only_editing_and_public_sharing() {
        let app = TestApp::new(vec![]).await;
        let idea = create(&app, "alice", "Demo").await;
        assert_eq!(idea["visibility"], "private");
        assert_eq!(idea["body"], "");
        let id = idea["id"].as_str().unwrap();

        let (status, _) = app.call(Method::GET, &format!("/ideas/{id}"), Some("bob"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app.call(Method::GET, &format!("/share/{id}"), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, toggled) = app
            .call(Method::POST, &format!("/ideas/{id}/visibility"), Some("alice"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["visibility"], "public");

        let (status, shared) = app.call(Method::GET, &format!("/share/{id}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(shared["title"], "Demo");

        let (_, feed) = app.call(Method::GET, "/ideas/public", Some("bob"), None).await;
        assert_eq!(feed["ideas"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stale_patch_is_a_conflict() {
        let app = TestApp::new(vec![]).await;
        let idea = create(&app, "alice", "Demo").await;
        let uri = format!("/ideas/{}", idea["id"].as_str().unwrap());

        let (status, updated) = app
            .call(Method::PATCH, &uri, Some("alice"), Some(json!({ "body": "v2", "revision": 1 })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["revision"], 2);

        let (status, body) = app
            .call(Method::PATCH, &uri, Some("alice"), Some(json!({ "body": "v3", "revision": 1 })))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "conflict");
    }

    #[tokio::test]
    async fn delete_then_load_is_not_found() {
        let app = TestApp::new(vec![]).await;
        let idea = create(&app, "alice", "Demo").await;
        let uri = format!("/ideas/{}", idea["id"].as_str().unwrap());

        let (status, _) = app.call(Method::DELETE, &uri, Some("alice"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.call(Method::GET, &uri, Some("alice"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn editing_session_over_http() {
        let app = TestApp::new(vec![]).await;
        let idea = create(&app, "alice", "Demo").await;
        let id = idea["id"].as_str().unwrap();

        let (status, opened) = app
            .call(Method::POST, &format!("/ideas/{id}/sessions"), Some("alice"), None)
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(opened["session"]["state"], "synced");
        let sid = opened["session"]["id"].as_str().unwrap();

        let (_, view) = app
            .call(
                Method::PUT,
                &format!("/sessions/{sid}"),
                Some("alice"),
                Some(json!({ "body": "<p>Hello</p>", "title": "Demo" })),
            )
            .await;
        assert_eq!(view["state"], "dirty");

        let (status, saved) = app
            .call(Method::POST, &format!("/sessions/{sid}/save"), Some("alice"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["outcome"], "written");
        assert_eq!(saved["idea"]["body"], "<p>Hello</p>");

        let (_, again) = app
            .call(Method::POST, &format!("/sessions/{sid}/save"), Some("alice"), None)
            .await;
        assert_eq!(again["outcome"], "unchanged");

        let (_, closed) = app
            .call(Method::DELETE, &format!("/sessions/{sid}"), Some("alice"), None)
            .await;
        assert_eq!(closed["state"], "closed");
    }

    #[tokio::test]
    async fn register_login_and_merge_settings() {
        let app = TestApp::new(vec![]).await;
        let (status, registered) = app
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({ "email": "ada@example.com", "password": "correct horse" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(registered["user"]["name"], "Anonymous");
        assert_eq!(registered["user"]["plan"], "free");
        assert_eq!(registered["user"]["tokens"], 20);
        assert!(registered["user"].get("password_hash").is_none());

        let (status, _) = app
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({ "email": "ADA@example.com", "password": "another pass" })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = app
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": "ada@example.com", "password": "wrong password" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, login) = app
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": "ada@example.com", "password": "correct horse" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let user_id = login["user"]["id"].as_str().unwrap();

        app.call(Method::PATCH, "/auth/me", Some(user_id), Some(json!({ "settings": { "theme": "dark", "lang": "en" } })))
            .await;
        let (status, me) = app
            .call(Method::PATCH, "/auth/me", Some(user_id), Some(json!({ "name": "Ada", "settings": { "lang": "ko" } })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["name"], "Ada");
        assert_eq!(me["settings"], json!({ "theme": "dark", "lang": "ko" }));
    }

    #[tokio::test]
    async fn refresh_rotates_tokens() {
        let app = TestApp::new(vec![]).await;
        let (_, registered) = app
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({ "name": "Ada", "email": "ada@example.com", "password": "correct horse" })),
            )
            .await;
        let refresh_token = registered["refresh_token"].clone();

        let (status, rotated) = app
            .call(Method::POST, "/auth/refresh", None, Some(json!({ "refresh_token": refresh_token })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(rotated["refresh_token"], refresh_token);

        let (status, _) = app
            .call(Method::POST, "/auth/refresh", None, Some(json!({ "refresh_token": refresh_token })))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn generated_idea_is_titled_and_saved() {
        let html = "```html\n<h1>🚀 Solar Drone Fleet</h1><h2>🎯 Problem Statement</h2>\n```";
        let app = TestApp::new(vec![Ok(html.to_string())]).await;

        let (status, generated) = app
            .call(
                Method::POST,
                "/ai/generate",
                Some("alice"),
                Some(json!({ "area": "Energy", "subcategory": "Drones", "save": true })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(generated["title"], "Solar Drone Fleet");
        assert!(generated["content"].as_str().unwrap().starts_with("<h1>"));
        assert_eq!(generated["idea"]["visibility"], "public");
        assert_eq!(generated["idea"]["tags"], json!(["Drones", "Energy"]));

        let prompts = app.generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Area: Energy"));
    }

    #[tokio::test]
    async fn malformed_evaluation_is_a_bad_gateway() {
        let app = TestApp::new(vec![Ok("{\"scores\": \"great\"}".to_string())]).await;

        let (status, body) = app
            .call(Method::POST, "/ai/evaluate", Some("alice"), Some(json!({ "content": "A dog-walking app" })))
            .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "malformed_response");
        assert!(app.generator.prompts()[0].contains("A dog-walking app"));
    }

    fn brand_kit_json(primary: &str) -> Value {
        let list = json!(["a"]);
        json!({
            "name": "Walkies",
            "tagline": "Happy dogs",
            "description": "Dog walking on demand",
            "usp": list,
            "brandVoice": { "tone": "warm", "personality": list, "keywords": list },
            "colors": {
                "primary": primary, "secondary": "#222222", "accent": "#f0a",
                "background": "#FFFFFF", "text": "#000000", "gradients": list
            },
            "typography": {
                "heading": "Inter", "body": "Inter", "display": "Lobster",
                "weights": { "light": "300", "regular": "400", "medium": "500", "bold": "700" }
            },
            "logo": { "concept": "paw", "style": "flat", "elements": list, "variations": list, "usage": list },
            "ui": {
                "style": "soft", "components": list, "layout": "grid",
                "spacing": "8px", "shadows": list, "animations": list
            },
            "marketing": {
                "socialMedia": { "platforms": list, "tone": "playful", "contentTypes": list },
                "messaging": { "headlines": list, "callsToAction": list, "valueProps": list }
            }
        })
    }

    #[tokio::test]
    async fn brand_kit_is_parsed_and_colors_are_checked() {
        let fenced = format!("```json\n{}\n```", brand_kit_json("#1A2B3C"));
        let app = TestApp::new(vec![
            Ok(fenced),
            Ok(brand_kit_json("blue").to_string()),
        ])
        .await;

        let (status, kit) = app
            .call(Method::POST, "/ai/brandkit", Some("alice"), Some(json!({ "content": "A dog-walking app" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(kit["name"], "Walkies");
        assert_eq!(kit["colors"]["primary"], "#1A2B3C");
        assert_eq!(kit["marketing"]["messaging"]["callsToAction"], json!(["a"]));

        let prompts = app.generator.prompts();
        assert!(prompts[0].contains("A dog-walking app"));
        assert!(prompts[0].contains("\"primary\": \"#RRGGBB\""));

        let (status, body) = app
            .call(Method::POST, "/ai/brandkit", Some("alice"), Some(json!({ "content": "A dog-walking app" })))
            .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "malformed_response");
    }

    #[tokio::test]
    async fn missing_api_key_is_reported_not_retried() {
        let app = TestApp::new(vec![Err(GenerationError::MissingApiKey)]).await;

        let (status, body) = app
            .call(
                Method::POST,
                "/ai/chat",
                Some("alice"),
                Some(json!({ "content": "A dog-walking app", "message": "Pricing?" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "generation_unavailable");
        assert_eq!(app.generator.prompts().len(), 1);
    }

    #[tokio::test]
    async fn chat_uses_a_public_idea_of_another_user() {
        let app = TestApp::new(vec![Ok("  Charge per walk.  ".to_string())]).await;
        let idea = create(&app, "alice", "Walkies").await;
        let id = idea["id"].as_str().unwrap();
        app.call(
            Method::PATCH,
            &format!("/ideas/{id}"),
            Some("alice"),
            Some(json!({ "body": "<p>Dog walking</p>", "revision": 1 })),
        )
        .await;
        app.call(Method::POST, &format!("/ideas/{id}/visibility"), Some("alice"), None)
            .await;

        let (status, body) = app
            .call(
                Method::POST,
                "/ai/chat",
                Some("bob"),
                Some(json!({ "idea_id": id, "message": "Pricing?", "history": [
                    { "role": "user", "content": "Hi" },
                    { "role": "assistant", "content": "Hello" }
                ] })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "Charge per walk.");
        assert!(app.generator.prompts()[0].contains("<p>Dog walking</p>"));
    }
}
