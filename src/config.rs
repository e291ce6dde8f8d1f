//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키 (필수)
//! - `HOST`, `PORT`: 서버 바인딩 주소
//! - `GEMINI_API_KEY`: 생성 API 키 (없으면 AI 기능만 비활성화)
//! - `GEMINI_MODEL`: 생성 모델 이름
//! - `AUTOSAVE_DEBOUNCE_MS`: 편집 세션 자동 저장 지연 시간(밀리초)
//! - `SESSION_IDLE_TIMEOUT_SECS`: 이 시간 동안 쓰이지 않은 편집 세션은 닫힙니다(초)

use std::env;
use std::time::Duration;

/// 기본 생성 모델
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// 기본 자동 저장 지연 (마지막 편집 후 1초 동안 입력이 없으면 저장)
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 1000;

/// 기본 편집 세션 유휴 만료 (30분)
pub const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 경로 (예: "sqlite:data/thinkfuel.db?mode=rwc")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 생성 API 키. None이면 AI 라우트가 `generation_unavailable`로 실패합니다.
    pub gemini_api_key: Option<String>,
    /// 생성 모델 식별자
    pub gemini_model: String,
    /// 자동 저장 debounce 지연
    pub autosave_delay: Duration,
    /// 닫히지 않은 채 버려진 편집 세션의 만료 시간
    pub session_idle_timeout: Duration,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있고, 숫자 파싱에 실패해도 기본값을 사용합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            // 빈 문자열도 "키 없음"으로 취급합니다.
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            autosave_delay: Duration::from_millis(
                env::var("AUTOSAVE_DEBOUNCE_MS")
                    .ok()
                    .and_then(|ms| ms.parse().ok())
                    .unwrap_or(DEFAULT_AUTOSAVE_DEBOUNCE_MS),
            ),
            session_idle_timeout: Duration::from_secs(
                env::var("SESSION_IDLE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|secs| secs.parse().ok())
                    .unwrap_or(DEFAULT_SESSION_IDLE_TIMEOUT_SECS),
            ),
        })
    }
}
