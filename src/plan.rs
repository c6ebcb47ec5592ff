//! The generation plan: the structured document decoded from the strategy
//! reply, consumed once during assembly and never persisted.
//!
//! Parsing policy is strict: the reply must carry a fenced ```json block.
//! A fence-less reply fails with [`NanoBrandError::StrategyParse`]; no
//! partial plan is ever produced.

use crate::content::VariantKind;
use crate::error::{NanoBrandError, Result};
use serde::Deserialize;

/// Strategy insights block.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInsights {
    /// Proposed page atmosphere.
    #[serde(default)]
    pub atmosphere: Option<PlanAtmosphere>,
}

/// Proposed atmosphere.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAtmosphere {
    /// Theme color as a CSS hex value.
    #[serde(default)]
    pub primary_color: Option<String>,
    /// Mood label.
    #[serde(default)]
    pub mood: Option<String>,
}

/// Hero copy. The call-to-action is the only field the model must provide.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanHero {
    /// Headline.
    #[serde(default)]
    pub headline: Option<String>,
    /// Subheadline.
    #[serde(default)]
    pub subheadline: Option<String>,
    /// Call-to-action text. Required.
    pub cta: String,
}

/// Problem copy.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlanProblem {
    /// Section title.
    #[serde(default)]
    pub title: Option<String>,
    /// Pain statements.
    #[serde(default)]
    pub pains: Vec<String>,
}

/// Solution copy.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlanSolution {
    /// Section title.
    #[serde(default)]
    pub title: Option<String>,
    /// Explanation text.
    #[serde(default)]
    pub explanation: Option<String>,
}

/// One variant entry in the plan.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlanVariantItem {
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Value (color hex, size label, ...).
    #[serde(default)]
    pub value: String,
    /// Variant kind; unknown values map to `other`.
    #[serde(default, rename = "type")]
    pub kind: VariantKind,
}

/// Variants copy.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlanVariants {
    /// Section title.
    #[serde(default)]
    pub title: Option<String>,
    /// Variant entries.
    #[serde(default)]
    pub items: Vec<PlanVariantItem>,
}

/// Notes copy.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlanNotes {
    /// Section title.
    #[serde(default)]
    pub title: Option<String>,
    /// Notes body.
    #[serde(default)]
    pub content: Option<String>,
}

/// One benefit entry in the plan.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlanBenefitItem {
    /// Benefit title.
    #[serde(default)]
    pub title: String,
    /// Benefit description.
    #[serde(default)]
    pub description: String,
}

/// Visual-benefits copy.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlanBenefits {
    /// Section title.
    #[serde(default)]
    pub title: Option<String>,
    /// Benefit entries.
    #[serde(default)]
    pub items: Vec<PlanBenefitItem>,
}

/// One review in the plan.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlanReview {
    /// Reviewer name.
    #[serde(default)]
    pub name: String,
    /// Review text.
    #[serde(default)]
    pub comment: String,
}

/// Social-proof copy.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlanSocialProof {
    /// Section title.
    #[serde(default)]
    pub title: Option<String>,
    /// Reviews.
    #[serde(default)]
    pub reviews: Vec<PlanReview>,
}

/// One FAQ entry in the plan.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlanFaqItem {
    /// Question.
    #[serde(default)]
    pub question: String,
    /// Answer.
    #[serde(default)]
    pub answer: String,
}

/// FAQ copy.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PlanFaqs {
    /// Section title.
    #[serde(default)]
    pub title: Option<String>,
    /// FAQ entries.
    #[serde(default)]
    pub items: Vec<PlanFaqItem>,
}

/// All copy blocks of the plan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCopy {
    /// Hero copy. Required.
    pub hero: PlanHero,
    /// Problem copy.
    #[serde(default)]
    pub problem: Option<PlanProblem>,
    /// Solution copy.
    #[serde(default)]
    pub solution: Option<PlanSolution>,
    /// Variants copy.
    #[serde(default)]
    pub variants: Option<PlanVariants>,
    /// Notes copy.
    #[serde(default)]
    pub notes: Option<PlanNotes>,
    /// Visual-benefits copy.
    #[serde(default)]
    pub visual_benefits: Option<PlanBenefits>,
    /// Social-proof copy.
    #[serde(default)]
    pub social_proof: Option<PlanSocialProof>,
    /// FAQ copy.
    #[serde(default)]
    pub faqs: Option<PlanFaqs>,
}

/// Per-section scene prompts proposed by the strategy model.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanImagePrompts {
    /// Hero scene prompt.
    #[serde(default)]
    pub hero: Option<String>,
    /// Problem scene prompt.
    #[serde(default)]
    pub problem: Option<String>,
    /// Solution scene prompt.
    #[serde(default)]
    pub solution: Option<String>,
    /// One prompt per benefit slot.
    #[serde(default)]
    pub benefit_prompts: Vec<String>,
}

/// The decoded generation plan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationPlan {
    /// Strategy insights.
    #[serde(default)]
    pub strategy_insights: Option<PlanInsights>,
    /// Copy blocks. Required.
    pub copy: PlanCopy,
    /// Scene prompts.
    #[serde(default)]
    pub image_prompts: PlanImagePrompts,
}

/// Extracts the fenced ```json block from a raw strategy reply.
pub fn extract_plan_block(text: &str) -> Result<&str> {
    let start = text
        .find("```json")
        .map(|i| i + "```json".len())
        .ok_or_else(|| NanoBrandError::StrategyParse("no fenced json block in reply".into()))?;
    let rest = &text[start..];
    let end = rest
        .find("```")
        .ok_or_else(|| NanoBrandError::StrategyParse("unterminated json block in reply".into()))?;
    Ok(rest[..end].trim())
}

/// Extracts and decodes the plan from a raw strategy reply.
pub fn parse_plan(text: &str) -> Result<GenerationPlan> {
    let block = extract_plan_block(text)?;
    serde_json::from_str(block)
        .map_err(|e| NanoBrandError::StrategyParse(format!("plan did not decode: {e}")))
}
