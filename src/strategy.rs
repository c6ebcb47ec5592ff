//! Strategy requester: one multimodal call that turns the upload set and
//! the user's notes into a full generation plan.

use crate::engine::{StrategyEngine, StrategyRequest};
use crate::error::{NanoBrandError, Result};
use crate::plan::{parse_plan, GenerationPlan};

/// Builds the fixed strategy instruction, with the user's free-text contexts
/// interpolated. The reply language is pinned to formal Arabic marketing
/// copy and the reply shape to the fenced JSON plan.
pub fn strategy_instruction(variants: &str, notes: &str) -> String {
    format!(
        r##"Role: Ultra-Luxury Brand Strategist.
TASK:
1. Analyze the product from the attached images.
2. Build a complete Landing Page in formal ARABIC marketing copy.
3. Contexts: Variants: {variants}, Notes: {notes}.
4. Social Proof: 3 Algerian reviews.

Return JSON ONLY, inside a ```json fenced block, with exactly this shape:
{{
  "strategyInsights": {{ "atmosphere": {{ "primaryColor": "#0f172a", "mood": "Cinematic Luxury" }} }},
  "copy": {{
    "hero": {{ "headline": "...", "subheadline": "...", "cta": "اطلب الآن" }},
    "problem": {{ "title": "...", "pains": ["...", "...", "..."] }},
    "solution": {{ "title": "...", "explanation": "..." }},
    "variants": {{ "title": "خيارات الفخامة", "items": [{{"label": "أحمر ملكي", "value": "#ff0000", "type": "color"}}] }},
    "notes": {{ "title": "ملاحظات هامة", "content": "..." }},
    "visualBenefits": {{ "title": "لماذا هذا الابتكار؟", "items": [{{ "title": "...", "description": "..." }}] }},
    "socialProof": {{ "title": "ثقة زبائننا", "reviews": [{{ "name": "...", "comment": "..." }}] }},
    "faqs": {{ "title": "الأسئلة الشائعة", "items": [{{ "question": "...", "answer": "..." }}] }}
  }},
  "imagePrompts": {{
    "hero": "Cinematic reveal, luxury, dramatic lighting.",
    "problem": "Moody gritty photo of struggle.",
    "solution": "Pristine studio shot showing full product.",
    "benefitPrompts": ["Professional dynamic shot.", "Clear luxury display."]
  }}
}}"##
    )
}

/// Requests a generation plan for the upload set.
///
/// Fails before issuing any call if the upload set is empty; fails with
/// [`NanoBrandError::StrategyParse`] if the reply carries no decodable plan.
/// No partial plan is ever returned.
pub async fn propose_plan(
    engine: &dyn StrategyEngine,
    request: &StrategyRequest,
) -> Result<GenerationPlan> {
    if request.images.is_empty() {
        return Err(NanoBrandError::InvalidRequest(
            "at least one product image is required".into(),
        ));
    }

    let reply = engine.propose(request).await?;
    parse_plan(&reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FixedReply {
        reply: &'static str,
        called: AtomicBool,
    }

    impl FixedReply {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                called: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl StrategyEngine for FixedReply {
        async fn propose(&self, _request: &StrategyRequest) -> crate::Result<String> {
            self.called.store(true, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    fn upload() -> String {
        crate::content::encode_data_url("image/jpeg", b"photo")
    }

    #[test]
    fn test_instruction_interpolates_contexts() {
        let instruction = strategy_instruction("أحمر، مقاس L", "توصيل مجاني");
        assert!(instruction.contains("Variants: أحمر، مقاس L"));
        assert!(instruction.contains("Notes: توصيل مجاني"));
        assert!(instruction.contains("```json"));
        assert!(instruction.contains("benefitPrompts"));
    }

    #[test]
    fn test_instruction_tolerates_empty_contexts() {
        let instruction = strategy_instruction("", "");
        assert!(instruction.contains("Variants: ,"));
    }

    #[tokio::test]
    async fn test_propose_plan_requires_images() {
        let engine = FixedReply::new("unused");
        let request = StrategyRequest::new(vec![]);
        let err = propose_plan(&engine, &request).await.unwrap_err();
        assert!(matches!(err, NanoBrandError::InvalidRequest(_)));
        assert!(!engine.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_propose_plan_parses_fenced_reply() {
        let engine = FixedReply::new(crate::plan::testfix::FIXTURE);
        let request = StrategyRequest::new(vec![upload()]);
        let plan = propose_plan(&engine, &request).await.unwrap();
        assert_eq!(plan.copy.hero.cta, "اطلب الآن");
    }

    #[tokio::test]
    async fn test_propose_plan_fails_on_prose_reply() {
        let engine = FixedReply::new("Sure! Here is a landing page idea without any JSON.");
        let request = StrategyRequest::new(vec![upload()]);
        let err = propose_plan(&engine, &request).await.unwrap_err();
        assert!(matches!(err, NanoBrandError::StrategyParse(_)));
    }
}
