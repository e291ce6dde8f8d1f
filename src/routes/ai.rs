//! # AI 기능 라우트 핸들러
//!
//! 프롬프트를 만들어 생성 API를 한 번 호출하고 결과를 돌려줍니다.
//! 재시도나 스트리밍은 없습니다.
//!
//! ## 엔드포인트
//! - `POST /api/v1/ai/generate` → 아이디어 HTML 생성 (`save: true`면 저장까지)
//! - `POST /api/v1/ai/evaluate` → 아이디어 평가 (`Evaluation`)
//! - `POST /api/v1/ai/research` → 시장 조사 (`MarketResearch`)
//! - `POST /api/v1/ai/brandkit` → 브랜드 키트 (`BrandKit`)
//! - `POST /api/v1/ai/chat`     → 아이디어에 대한 대화 응답 (텍스트)

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::ideas::AppState,
    services::{
        gemini::{parse_json_response, GenerationError},
        lifecycle,
        markup::{extract_generated_title, strip_code_fences},
        prompts,
    },
};

#[derive(Debug, Serialize)]
pub struct GeneratedIdea {
    pub title: String,
    /// 에디터에 바로 넣을 수 있는 HTML
    pub content: String,
    /// `save: true`일 때 저장된 아이디어
    pub idea: Option<Idea>,
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value)
}

/// `POST /ai/generate`
///
/// 제목은 첫 `<h1>`에서 가져옵니다. 저장할 때 공개 범위 기본값은 공개이고,
/// 분야와 세부 분야가 태그로 붙습니다.
pub async fn generate_idea(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<GenerateIdeaRequest>,
) -> Result<Json<GeneratedIdea>, AppError> {
    let area = required("area", &req.area)?;
    let subcategory = required("subcategory", &req.subcategory)?;

    let prompt = prompts::idea_generation(area, subcategory, req.context.as_deref());
    let raw = state.generator.generate(&prompt).await?;

    let content = strip_code_fences(&raw).to_string();
    if content.is_empty() {
        return Err(GenerationError::EmptyResponse.into());
    }
    let title = extract_generated_title(&content);

    let idea = if req.save {
        let visibility = req.visibility.unwrap_or(Visibility::Public);
        let tags = [area.to_string(), subcategory.to_string()];
        let idea = lifecycle::create_with_body(
            &state.pool,
            &auth.user_id,
            &title,
            &content,
            visibility,
            &tags,
        )
        .await?;
        Some(idea)
    } else {
        None
    };

    Ok(Json(GeneratedIdea { title, content, idea }))
}

pub async fn evaluate_idea(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<IdeaSourceRequest>,
) -> Result<Json<Evaluation>, AppError> {
    let idea = lifecycle::resolve_idea_content(&state.pool, &auth.user_id, &req).await?;
    let raw = state.generator.generate(&prompts::evaluation(&idea)).await?;
    Ok(Json(parse_json_response(&raw)?))
}

pub async fn research_market(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<IdeaSourceRequest>,
) -> Result<Json<MarketResearch>, AppError> {
    let idea = lifecycle::resolve_idea_content(&state.pool, &auth.user_id, &req).await?;
    let raw = state.generator.generate(&prompts::market_research(&idea)).await?;
    Ok(Json(parse_json_response(&raw)?))
}

pub async fn generate_brand_kit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<IdeaSourceRequest>,
) -> Result<Json<BrandKit>, AppError> {
    let idea = lifecycle::resolve_idea_content(&state.pool, &auth.user_id, &req).await?;
    let raw = state.generator.generate(&prompts::brand_kit(&idea)).await?;
    Ok(Json(parse_json_response(&raw)?))
}

pub async fn chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    let message = required("message", &req.message)?;
    let source = IdeaSourceRequest {
        idea_id: req.idea_id.clone(),
        content: req.content.clone(),
    };
    let idea = lifecycle::resolve_idea_content(&state.pool, &auth.user_id, &source).await?;

    let raw = state
        .generator
        .generate(&prompts::chat(&idea, &req.history, message))
        .await?;

    let reply = raw.trim();
    if reply.is_empty() {
        return Err(GenerationError::EmptyResponse.into());
    }
    Ok(Json(json!({ "reply": reply })))
}
