//! Content assembler: merges a generation plan with synthesized scenes into
//! the display-ready content document.

use crate::avatar::monogram_avatar;
use crate::content::{
    Atmosphere, Benefit, BenefitsSection, FaqItem, FaqSection, HeroSection, LandingPage,
    NotesSection, ProblemSection, ProductVariant, Review, ScenePrompts, SocialProofSection,
    SolutionSection, VariantsSection,
};
use crate::plan::GenerationPlan;

/// Reviews shown on the page are capped at this many.
pub const MAX_REVIEWS: usize = 3;

const DEFAULT_PRIMARY_COLOR: &str = "#0f172a";
const DEFAULT_MOOD: &str = "Cinematic Luxury";
const DEFAULT_BENEFITS_TITLE: &str = "لماذا نحن؟";
const DEFAULT_FAQS_TITLE: &str = "الأسئلة الشائعة";
const DEFAULT_VARIANTS_TITLE: &str = "خيارات الفخامة";
const DEFAULT_SOCIAL_TITLE: &str = "ثقة زبائننا";
const VERIFICATION_BADGE: &str = "مراجعات موثقة";

/// The synthesized scene images for one generation run, after per-slot
/// fallback. Every field holds a data URL.
#[derive(Debug, Clone, Default)]
pub struct SceneSet {
    /// Hero scene.
    pub hero: String,
    /// Problem scene.
    pub problem: String,
    /// Solution scene.
    pub solution: String,
    /// One image per benefit prompt, in order.
    pub benefits: Vec<String>,
}

/// Builds the content document from a decoded plan, the synthesized scenes
/// and the original upload set.
///
/// Localized defaults fill whatever the model omitted; testimonials get a
/// locally generated monogram avatar; list items get their position index as
/// identifier. The plan is consumed here and never persisted.
pub fn assemble(plan: GenerationPlan, scenes: SceneSet, uploads: &[String]) -> LandingPage {
    let atmosphere = plan
        .strategy_insights
        .and_then(|s| s.atmosphere)
        .unwrap_or_default();

    let copy = plan.copy;
    let problem = copy.problem.unwrap_or_default();
    let solution = copy.solution.unwrap_or_default();
    let variants = copy.variants.unwrap_or_default();
    let benefits = copy.visual_benefits.unwrap_or_default();
    let social = copy.social_proof.unwrap_or_default();
    let faqs = copy.faqs.unwrap_or_default();

    let benefit_items = benefits
        .items
        .into_iter()
        .enumerate()
        .map(|(i, item)| Benefit {
            id: i.to_string(),
            title: item.title,
            description: item.description,
            image: scenes
                .benefits
                .get(i)
                .filter(|url| !url.is_empty())
                .cloned()
                .or_else(|| {
                    (!uploads.is_empty()).then(|| uploads[i % uploads.len()].clone())
                })
                .unwrap_or_default(),
        })
        .collect();

    let reviews = social
        .reviews
        .into_iter()
        .take(MAX_REVIEWS)
        .enumerate()
        .map(|(i, r)| Review {
            id: i.to_string(),
            avatar: monogram_avatar(&r.name),
            name: r.name,
            rating: 5,
            comment: r.comment,
        })
        .collect();

    let notes = copy.notes.map(|n| NotesSection {
        title: n.title.unwrap_or_else(|| "ملاحظات هامة".into()),
        content: n.content.unwrap_or_default(),
    });

    LandingPage {
        atmosphere: Atmosphere {
            primary_color: atmosphere
                .primary_color
                .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.into()),
            mood: atmosphere.mood.unwrap_or_else(|| DEFAULT_MOOD.into()),
        },
        hero: HeroSection {
            headline: copy.hero.headline.unwrap_or_default(),
            subheadline: copy.hero.subheadline.unwrap_or_default(),
            cta: copy.hero.cta,
            image: scenes.hero,
        },
        problem: ProblemSection {
            title: problem.title.unwrap_or_default(),
            pains: problem.pains,
            image: scenes.problem,
        },
        solution: SolutionSection {
            title: solution.title.unwrap_or_default(),
            explanation: solution.explanation.unwrap_or_default(),
            image: scenes.solution,
        },
        variants: VariantsSection {
            title: variants
                .title
                .unwrap_or_else(|| DEFAULT_VARIANTS_TITLE.into()),
            items: variants
                .items
                .into_iter()
                .enumerate()
                .map(|(i, v)| ProductVariant {
                    id: i.to_string(),
                    label: v.label,
                    value: v.value,
                    kind: v.kind,
                })
                .collect(),
        },
        notes,
        benefits: BenefitsSection {
            title: benefits
                .title
                .unwrap_or_else(|| DEFAULT_BENEFITS_TITLE.into()),
            items: benefit_items,
        },
        social_proof: SocialProofSection {
            title: social.title.unwrap_or_else(|| DEFAULT_SOCIAL_TITLE.into()),
            reviews,
            verification: VERIFICATION_BADGE.into(),
        },
        faqs: FaqSection {
            title: faqs.title.unwrap_or_else(|| DEFAULT_FAQS_TITLE.into()),
            items: faqs
                .items
                .into_iter()
                .enumerate()
                .map(|(i, f)| FaqItem {
                    id: i.to_string(),
                    question: f.question,
                    answer: f.answer,
                })
                .collect(),
        },
        scene_prompts: ScenePrompts {
            hero: plan.image_prompts.hero.unwrap_or_default(),
            problem: plan.image_prompts.problem.unwrap_or_default(),
            solution: plan.image_prompts.solution.unwrap_or_default(),
            benefits: plan.image_prompts.benefit_prompts,
        },
    }
}
