//! # 생성 API 응답 스키마
//!
//! 평가(evaluate), 시장 조사(research), 브랜드 키트(brandkit) 요청에 대해
//! 모델이 돌려주는 JSON을 엄격한 타입으로 정의합니다.
//! 필드가 빠졌거나 타입이 다르면 역직렬화 단계에서 실패하고,
//! 값의 범위 검사는 `Validate`가 담당합니다. 두 경우 모두
//! `GenerationError::Malformed`로 보고됩니다.

use serde::{Deserialize, Serialize};

/// 역직렬화 이후의 값 검증
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn check_score(name: &str, value: f64) -> Result<(), String> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{name} must be between 0 and 100, got {value}"))
    }
}

fn check_hex_color(name: &str, value: &str) -> Result<(), String> {
    let digits = value
        .strip_prefix('#')
        .ok_or_else(|| format!("{name} is not a hex color: {value}"))?;
    let valid_len = matches!(digits.len(), 3 | 6 | 8);
    if valid_len && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(format!("{name} is not a hex color: {value}"))
    }
}

// ── 아이디어 평가 ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationScores {
    pub market_potential: f64,
    pub technical_feasibility: f64,
    pub innovation_level: f64,
    pub monetization_potential: f64,
    pub scalability: f64,
    pub risk_level: f64,
    pub implementation_complexity: f64,
    pub competitive_advantage: f64,
    pub market_timing: f64,
    pub resource_requirements: f64,
    pub regulatory_compliance: f64,
    pub user_adoption: f64,
    pub sustainability: f64,
    pub team_requirements: f64,
}

impl EvaluationScores {
    fn named(&self) -> [(&'static str, f64); 14] {
        [
            ("marketPotential", self.market_potential),
            ("technicalFeasibility", self.technical_feasibility),
            ("innovationLevel", self.innovation_level),
            ("monetizationPotential", self.monetization_potential),
            ("scalability", self.scalability),
            ("riskLevel", self.risk_level),
            ("implementationComplexity", self.implementation_complexity),
            ("competitiveAdvantage", self.competitive_advantage),
            ("marketTiming", self.market_timing),
            ("resourceRequirements", self.resource_requirements),
            ("regulatoryCompliance", self.regulatory_compliance),
            ("userAdoption", self.user_adoption),
            ("sustainability", self.sustainability),
            ("teamRequirements", self.team_requirements),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub target_market: String,
    pub market_size: String,
    pub competition: Vec<String>,
    pub market_trends: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalAnalysis {
    pub required_technologies: Vec<String>,
    pub development_phases: Vec<String>,
    pub technical_challenges: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAnalysis {
    pub initial_investment: String,
    pub revenue_streams: Vec<String>,
    pub break_even_analysis: String,
    pub funding_requirements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    pub high_risks: Vec<String>,
    pub mitigation_strategies: Vec<String>,
    pub contingency_plans: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub scores: EvaluationScores,
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub next_steps: Vec<String>,
    pub overall_score: f64,
    pub market_analysis: MarketAnalysis,
    pub technical_analysis: TechnicalAnalysis,
    pub financial_analysis: FinancialAnalysis,
    pub risk_analysis: RiskAnalysis,
}

impl Validate for Evaluation {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in self.scores.named() {
            check_score(name, value)?;
        }
        check_score("overallScore", self.overall_score)
    }
}

// ── 시장 조사 ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOverview {
    pub market_size: String,
    pub growth_rate: String,
    pub market_trends: Vec<String>,
    pub key_drivers: Vec<String>,
    pub market_challenges: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPersona {
    pub name: String,
    pub description: String,
    pub needs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAudience {
    pub demographics: Vec<String>,
    pub psychographics: Vec<String>,
    pub pain_points: Vec<String>,
    pub buying_behavior: Vec<String>,
    pub user_personas: Vec<UserPersona>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub name: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub market_share: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveAnalysis {
    pub direct_competitors: Vec<Competitor>,
    pub indirect_competitors: Vec<String>,
    pub competitive_advantages: Vec<String>,
    pub market_gaps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryInsights {
    pub regulations: Vec<String>,
    pub technological_trends: Vec<String>,
    pub social_trends: Vec<String>,
    pub economic_factors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityAnalysis {
    pub market_opportunities: Vec<String>,
    pub potential_threats: Vec<String>,
    pub entry_barriers: Vec<String>,
    pub growth_potential: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub market_entry: Vec<String>,
    pub positioning: Vec<String>,
    pub pricing: Vec<String>,
    pub marketing: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMetrics {
    pub total_addressable_market: String,
    pub serviceable_addressable_market: String,
    pub serviceable_obtainable_market: String,
    pub market_penetration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketResearch {
    pub market_overview: MarketOverview,
    pub target_audience: TargetAudience,
    pub competitive_analysis: CompetitiveAnalysis,
    pub industry_insights: IndustryInsights,
    pub opportunity_analysis: OpportunityAnalysis,
    pub recommendations: Recommendations,
    pub market_metrics: MarketMetrics,
}

impl Validate for MarketResearch {
    fn validate(&self) -> Result<(), String> {
        if self.target_audience.user_personas.iter().any(|p| p.name.trim().is_empty()) {
            return Err("userPersonas entries need a name".to_string());
        }
        if self
            .competitive_analysis
            .direct_competitors
            .iter()
            .any(|c| c.name.trim().is_empty())
        {
            return Err("directCompetitors entries need a name".to_string());
        }
        Ok(())
    }
}

// ── 브랜드 키트 ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandVoice {
    pub tone: String,
    pub personality: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
    pub gradients: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontWeights {
    pub light: String,
    pub regular: String,
    pub medium: String,
    pub bold: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Typography {
    pub heading: String,
    pub body: String,
    pub display: String,
    pub weights: FontWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoGuide {
    pub concept: String,
    pub style: String,
    pub elements: Vec<String>,
    pub variations: Vec<String>,
    pub usage: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiGuide {
    pub style: String,
    pub components: Vec<String>,
    pub layout: String,
    pub spacing: String,
    pub shadows: Vec<String>,
    pub animations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMedia {
    pub platforms: Vec<String>,
    pub tone: String,
    pub content_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Messaging {
    pub headlines: Vec<String>,
    pub calls_to_action: Vec<String>,
    pub value_props: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingGuide {
    pub social_media: SocialMedia,
    pub messaging: Messaging,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandKit {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub usp: Vec<String>,
    pub brand_voice: BrandVoice,
    pub colors: BrandColors,
    pub typography: Typography,
    pub logo: LogoGuide,
    pub ui: UiGuide,
    pub marketing: MarketingGuide,
}

impl Validate for BrandKit {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("brand name is empty".to_string());
        }
        let colors = &self.colors;
        check_hex_color("colors.primary", &colors.primary)?;
        check_hex_color("colors.secondary", &colors.secondary)?;
        check_hex_color("colors.accent", &colors.accent)?;
        check_hex_color("colors.background", &colors.background)?;
        check_hex_color("colors.text", &colors.text)
    }
}

// ── 요청 본문 ──

/// `POST /api/v1/ai/generate`
#[derive(Debug, Deserialize)]
pub struct GenerateIdeaRequest {
    pub area: String,
    pub subcategory: String,
    pub context: Option<String>,
    /// true면 생성된 아이디어를 바로 저장합니다.
    #[serde(default)]
    pub save: bool,
    pub visibility: Option<super::Visibility>,
}

/// 분석 대상: 저장된 아이디어(`idea_id`) 또는 직접 입력한 내용(`content`)
#[derive(Debug, Deserialize)]
pub struct IdeaSourceRequest {
    pub idea_id: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// `POST /api/v1/ai/chat`
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub idea_id: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub message: String,
}
