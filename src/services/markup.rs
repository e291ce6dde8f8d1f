//! # 마크업 유틸리티
//!
//! 생성 API 응답과 에디터 HTML을 다루는 작은 함수들입니다.
//!
//! - `strip_code_fences()`: 응답을 감싼 ```` ```json ```` / ```` ```html ```` 펜스 제거
//! - `extract_generated_title()`: 생성된 아이디어 HTML의 첫 `<h1>`에서 제목 추출
//! - `normalize_tags()`: 태그 목록을 정렬된 집합으로 정규화

/// 제목을 찾지 못했을 때 사용하는 기본 제목
pub const UNTITLED_IDEA: &str = "Untitled Idea";

/// 응답 앞뒤의 마크다운 코드 펜스를 제거합니다.
///
/// 여는 펜스는 언어 표시(`json`, `html` 등)가 붙은 줄 전체를 제거하고,
/// 닫는 펜스는 마지막 ```` ``` ````만 제거합니다. 펜스가 없으면 앞뒤 공백만 제거합니다.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();

    if let Some(rest) = s.strip_prefix("```") {
        // 여는 펜스 줄(예: "```json\n")을 통째로 건너뜁니다.
        s = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest,
        };
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }

    s.trim()
}

/// 생성된 아이디어 HTML에서 제목을 추출합니다.
///
/// 첫 번째 `<h1>...</h1>` 안의 텍스트에서 내부 태그와 앞쪽 "🚀" 이모지를 제거합니다.
/// 결과가 비어 있으면 `UNTITLED_IDEA`를 반환합니다.
pub fn extract_generated_title(html: &str) -> String {
    let title = html
        .find("<h1")
        .and_then(|start| {
            let after_open = start + html[start..].find('>')? + 1;
            let end = after_open + html[after_open..].find("</h1>")?;
            Some(strip_tags(&html[after_open..end]))
        })
        .map(|t| t.trim().trim_start_matches('🚀').trim().to_string())
        .unwrap_or_default();

    if title.is_empty() {
        UNTITLED_IDEA.to_string()
    } else {
        title
    }
}

/// `<...>` 태그를 제거한 텍스트
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// 태그를 집합으로 정규화합니다: 앞뒤 공백 제거, 빈 값 제거, 중복 제거, 정렬.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}
