//! Prompt templates for the generation API.
//!
//! Each builder interpolates user content into a fixed template. JSON prompts
//! spell out the exact shape that `models::generation` parses.

use crate::models::{ChatMessage, ChatRole};

const IDEA_GENERATION_PROMPT: &str = r#"You are an expert idea generator, business consultant, and product strategist. Based on the provided area and subcategory, generate an original, innovative, and practical business idea that has strong real-world potential.

Present the idea as a comprehensive HTML document suitable for a rich-text editor. Use clean, valid HTML with semantic tags and emoji-enhanced headings. Do not use markdown or code fences.

Recommended (flexible) structure:

<h1>🚀 [Idea Name]</h1>
<h2>🎯 Problem Statement</h2>
<h2>💡 Solution Overview</h2>
<h2>👥 Target Market</h2>
<h2>⚙️ Tech Stack</h2>
<h2>✨ Key Features</h2>
<h2>💰 Revenue Model</h2>
<h2>🏆 Competitive Edge</h2>
<h2>⚠️ Implementation Considerations</h2>
<h2>📈 Success Metrics</h2>
<h2>📋 Suggested Roadmap</h2>

You may merge, split, or rename sections when the idea calls for it, but always start with a single <h1> holding the idea name. Keep the tone professional yet friendly."#;

const EVALUATION_SHAPE: &str = r#"{
  "scores": {
    "marketPotential": number (0-100),
    "technicalFeasibility": number (0-100),
    "innovationLevel": number (0-100),
    "monetizationPotential": number (0-100),
    "scalability": number (0-100),
    "riskLevel": number (0-100),
    "implementationComplexity": number (0-100),
    "competitiveAdvantage": number (0-100),
    "marketTiming": number (0-100),
    "resourceRequirements": number (0-100),
    "regulatoryCompliance": number (0-100),
    "userAdoption": number (0-100),
    "sustainability": number (0-100),
    "teamRequirements": number (0-100)
  },
  "suggestions": ["string"],
  "strengths": ["string"],
  "weaknesses": ["string"],
  "nextSteps": ["string"],
  "overallScore": number (0-100),
  "marketAnalysis": {
    "targetMarket": "string",
    "marketSize": "string",
    "competition": ["string"],
    "marketTrends": ["string"]
  },
  "technicalAnalysis": {
    "requiredTechnologies": ["string"],
    "developmentPhases": ["string"],
    "technicalChallenges": ["string"]
  },
  "financialAnalysis": {
    "initialInvestment": "string",
    "revenueStreams": ["string"],
    "breakEvenAnalysis": "string",
    "fundingRequirements": ["string"]
  },
  "riskAnalysis": {
    "highRisks": ["string"],
    "mitigationStrategies": ["string"],
    "contingencyPlans": ["string"]
  }
}"#;

const RESEARCH_SHAPE: &str = r#"{
  "marketOverview": {
    "marketSize": "string",
    "growthRate": "string",
    "marketTrends": ["string"],
    "keyDrivers": ["string"],
    "marketChallenges": ["string"]
  },
  "targetAudience": {
    "demographics": ["string"],
    "psychographics": ["string"],
    "painPoints": ["string"],
    "buyingBehavior": ["string"],
    "userPersonas": [{ "name": "string", "description": "string", "needs": ["string"] }]
  },
  "competitiveAnalysis": {
    "directCompetitors": [
      { "name": "string", "strengths": ["string"], "weaknesses": ["string"], "marketShare": "string" }
    ],
    "indirectCompetitors": ["string"],
    "competitiveAdvantages": ["string"],
    "marketGaps": ["string"]
  },
  "industryInsights": {
    "regulations": ["string"],
    "technologicalTrends": ["string"],
    "socialTrends": ["string"],
    "economicFactors": ["string"]
  },
  "opportunityAnalysis": {
    "marketOpportunities": ["string"],
    "potentialThreats": ["string"],
    "entryBarriers": ["string"],
    "growthPotential": "string"
  },
  "recommendations": {
    "marketEntry": ["string"],
    "positioning": ["string"],
    "pricing": ["string"],
    "marketing": ["string"]
  },
  "marketMetrics": {
    "totalAddressableMarket": "string",
    "serviceableAddressableMarket": "string",
    "serviceableObtainableMarket": "string",
    "marketPenetration": "string"
  }
}"#;

const BRAND_KIT_SHAPE: &str = r##"{
  "name": "string",
  "tagline": "string",
  "description": "string",
  "usp": ["string"],
  "brandVoice": { "tone": "string", "personality": ["string"], "keywords": ["string"] },
  "colors": {
    "primary": "#RRGGBB",
    "secondary": "#RRGGBB",
    "accent": "#RRGGBB",
    "background": "#RRGGBB",
    "text": "#RRGGBB",
    "gradients": ["string"]
  },
  "typography": {
    "heading": "string",
    "body": "string",
    "display": "string",
    "weights": { "light": "string", "regular": "string", "medium": "string", "bold": "string" }
  },
  "logo": {
    "concept": "string",
    "style": "string",
    "elements": ["string"],
    "variations": ["string"],
    "usage": ["string"]
  },
  "ui": {
    "style": "string",
    "components": ["string"],
    "layout": "string",
    "spacing": "string",
    "shadows": ["string"],
    "animations": ["string"]
  },
  "marketing": {
    "socialMedia": { "platforms": ["string"], "tone": "string", "contentTypes": ["string"] },
    "messaging": { "headlines": ["string"], "callsToAction": ["string"], "valueProps": ["string"] }
  }
}"##;

pub fn idea_generation(area: &str, subcategory: &str, context: Option<&str>) -> String {
    let context = context
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| format!("Additional Context: {c}\n"))
        .unwrap_or_default();

    format!(
        "{IDEA_GENERATION_PROMPT}\n\nArea: {area}\nSubcategory: {subcategory}\n{context}\n\
         Generate ONE detailed business idea that combines the area and subcategory. \
         Focus on depth and practicality."
    )
}

pub fn evaluation(idea: &str) -> String {
    format!(
        "You are an expert business analyst and startup consultant. Analyze the following \
         business idea and provide a detailed, practical evaluation based on real-world market \
         conditions.\n\nIdea to evaluate:\n{idea}\n\n\
         Return a JSON object with this exact structure and no additional text. Every array \
         must contain at least one item:\n\n{EVALUATION_SHAPE}"
    )
}

pub fn market_research(idea: &str) -> String {
    format!(
        "You are an expert market researcher and business analyst. Analyze the following \
         business idea and provide practical market research with specific data points.\n\n\
         Idea to research:\n{idea}\n\n\
         Return a JSON object with this exact structure and no additional text. Every array \
         must contain at least one item:\n\n{RESEARCH_SHAPE}"
    )
}

pub fn brand_kit(idea: &str) -> String {
    format!(
        "As a brand strategist and designer, create a comprehensive brand kit for the following \
         business idea:\n\n{idea}\n\n\
         Return JSON only, without markdown formatting or code blocks, with this structure. \
         All colors must be hex codes:\n\n{BRAND_KIT_SHAPE}"
    )
}

pub fn chat(idea: &str, history: &[ChatMessage], message: &str) -> String {
    let transcript = history
        .iter()
        .map(|m| {
            let role = match m.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            };
            format!("{role}: {}", m.content)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert business consultant and startup advisor. You are discussing the \
         following business idea with the user:\n\n{idea}\n\n\
         Previous conversation context:\n{transcript}\n\n\
         User's latest message: {message}\n\n\
         Provide a detailed, practical, and actionable response. Be conversational but professional."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_prompt_omits_blank_context() {
        let prompt = idea_generation("Health", "Fitness", Some("  "));
        assert!(prompt.contains("Area: Health\nSubcategory: Fitness"));
        assert!(!prompt.contains("Additional Context"));

        let prompt = idea_generation("Health", "Fitness", Some("for seniors"));
        assert!(prompt.contains("Additional Context: for seniors"));
    }

    #[test]
    fn brand_kit_prompt_carries_the_full_shape() {
        let prompt = brand_kit("<h1>Walkies</h1>");
        assert!(prompt.contains("<h1>Walkies</h1>"));
        assert!(prompt.contains("\"primary\": \"#RRGGBB\""));
        assert!(prompt.contains("\"text\": \"#RRGGBB\""));
        assert!(prompt.contains("\"callsToAction\""));
        assert!(prompt.trim_end().ends_with('}'));
    }

    #[test]
    fn chat_prompt_replays_history_in_order() {
        let history = vec![
            ChatMessage { role: ChatRole::User, content: "Is it viable?".into() },
            ChatMessage { role: ChatRole::Assistant, content: "Mostly.".into() },
        ];
        let prompt = chat("<h1>Idea</h1>", &history, "Pricing?");
        let user_at = prompt.find("user: Is it viable?").unwrap();
        let assistant_at = prompt.find("assistant: Mostly.").unwrap();
        assert!(user_at < assistant_at);
        assert!(prompt.contains("User's latest message: Pricing?"));
    }
}
