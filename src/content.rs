//! The content document: everything a rendered landing page holds.
//!
//! Every image-bearing field carries either an inline data URL (an upload or
//! a synthesized scene) or an empty string. Remote URLs are never stored, so
//! an exported page needs no further fetches.

use crate::error::{NanoBrandError, Result};
use serde::{Deserialize, Serialize};

/// Page atmosphere proposed by the strategy model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    /// Dominant theme color, as a CSS hex value.
    pub primary_color: String,
    /// Mood label, e.g. "Cinematic Luxury".
    pub mood: String,
}

/// Hero section: headline, subheadline, call to action and the key visual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSection {
    /// Main headline.
    pub headline: String,
    /// Supporting subheadline.
    pub subheadline: String,
    /// Call-to-action button text.
    pub cta: String,
    /// Hero image as a data URL.
    pub image: String,
}

/// Problem section: the pains the product addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSection {
    /// Section title.
    pub title: String,
    /// Pain statements.
    pub pains: Vec<String>,
    /// Section image as a data URL.
    pub image: String,
}

/// Solution section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionSection {
    /// Section title.
    pub title: String,
    /// Explanation of how the product solves the problem.
    pub explanation: String,
    /// Section image as a data URL.
    pub image: String,
}

/// Kind of a product variant entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    /// Color swatch; `value` holds a CSS color.
    Color,
    /// Size option.
    Size,
    /// Material option.
    Material,
    /// Anything else.
    #[default]
    #[serde(other)]
    Other,
}

/// One selectable product variant (e.g. a color swatch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Position-derived identifier.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Value; meaning depends on `kind`.
    pub value: String,
    /// Variant kind.
    pub kind: VariantKind,
}

/// Variant list section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantsSection {
    /// Section title.
    pub title: String,
    /// Variant entries.
    pub items: Vec<ProductVariant>,
}

/// Optional free-form notes block (delivery, warranty, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotesSection {
    /// Section title.
    pub title: String,
    /// Notes body.
    pub content: String,
}

/// One visual benefit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benefit {
    /// Position-derived identifier.
    pub id: String,
    /// Benefit title.
    pub title: String,
    /// Benefit description.
    pub description: String,
    /// Benefit image as a data URL.
    pub image: String,
}

/// Benefits section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitsSection {
    /// Section title.
    pub title: String,
    /// Benefit entries.
    pub items: Vec<Benefit>,
}

/// One customer review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Position-derived identifier.
    pub id: String,
    /// Reviewer name.
    pub name: String,
    /// Star rating, 1-5.
    pub rating: u8,
    /// Review text.
    pub comment: String,
    /// Locally generated monogram avatar as a data URL.
    pub avatar: String,
}

/// Social-proof section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialProofSection {
    /// Section title.
    pub title: String,
    /// Reviews, at most [`crate::assemble::MAX_REVIEWS`].
    pub reviews: Vec<Review>,
    /// Verification badge text.
    pub verification: String,
}

/// One FAQ entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    /// Position-derived identifier.
    pub id: String,
    /// Question.
    pub question: String,
    /// Answer.
    pub answer: String,
}

/// FAQ section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqSection {
    /// Section title.
    pub title: String,
    /// FAQ entries.
    pub items: Vec<FaqItem>,
}

/// Scene prompts retained from the generation plan so individual images can
/// be regenerated later without re-running the strategy call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenePrompts {
    /// Hero scene prompt.
    pub hero: String,
    /// Problem scene prompt.
    pub problem: String,
    /// Solution scene prompt.
    pub solution: String,
    /// One prompt per benefit slot.
    pub benefits: Vec<String>,
}

/// The root content document for one generated landing page.
///
/// The presentation layer owns the live value and mutates it in place via
/// [`LandingPage::apply_edit`] and [`LandingPage::set_image`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingPage {
    /// Atmosphere metadata.
    pub atmosphere: Atmosphere,
    /// Hero section.
    pub hero: HeroSection,
    /// Problem section.
    pub problem: ProblemSection,
    /// Solution section.
    pub solution: SolutionSection,
    /// Variant list.
    pub variants: VariantsSection,
    /// Optional notes block.
    pub notes: Option<NotesSection>,
    /// Visual benefits.
    pub benefits: BenefitsSection,
    /// Social proof.
    pub social_proof: SocialProofSection,
    /// FAQ list.
    pub faqs: FaqSection,
    /// Retained scene prompts for regeneration.
    pub scene_prompts: ScenePrompts,
}

/// Addresses one regenerable image slot on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Hero image.
    Hero,
    /// Problem image.
    Problem,
    /// Solution image.
    Solution,
    /// Benefit image at the given list index.
    Benefit(usize),
}

impl Slot {
    /// Global slot index used for round-robin fallback selection.
    ///
    /// Hero/problem/solution take 0..3; benefit `i` takes `3 + i`.
    pub fn index(&self) -> usize {
        match self {
            Self::Hero => 0,
            Self::Problem => 1,
            Self::Solution => 2,
            Self::Benefit(i) => 3 + i,
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hero => write!(f, "hero"),
            Self::Problem => write!(f, "problem"),
            Self::Solution => write!(f, "solution"),
            Self::Benefit(i) => write!(f, "benefit[{i}]"),
        }
    }
}

impl LandingPage {
    /// Returns the retained scene prompt for a slot, if one exists.
    pub fn scene_prompt(&self, slot: Slot) -> Option<&str> {
        let prompt = match slot {
            Slot::Hero => self.scene_prompts.hero.as_str(),
            Slot::Problem => self.scene_prompts.problem.as_str(),
            Slot::Solution => self.scene_prompts.solution.as_str(),
            Slot::Benefit(i) => self.scene_prompts.benefits.get(i)?.as_str(),
        };
        (!prompt.is_empty()).then_some(prompt)
    }

    /// Returns the current image for a slot.
    pub fn image(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Hero => Some(self.hero.image.as_str()),
            Slot::Problem => Some(self.problem.image.as_str()),
            Slot::Solution => Some(self.solution.image.as_str()),
            Slot::Benefit(i) => self.benefits.items.get(i).map(|b| b.image.as_str()),
        }
    }

    /// Replaces the image for a slot.
    pub fn set_image(&mut self, slot: Slot, url: String) -> Result<()> {
        match slot {
            Slot::Hero => self.hero.image = url,
            Slot::Problem => self.problem.image = url,
            Slot::Solution => self.solution.image = url,
            Slot::Benefit(i) => {
                let item = self.benefits.items.get_mut(i).ok_or_else(|| {
                    NanoBrandError::InvalidRequest(format!("no benefit at index {i}"))
                })?;
                item.image = url;
            }
        }
        Ok(())
    }

    /// Writes an inline edit back into the document.
    ///
    /// Paths mirror the section layout, e.g. `hero.headline`,
    /// `problem.pains.1`, `benefits.0.title`, `reviews.2.comment`,
    /// `faqs.0.answer`. Unknown paths and out-of-range indexes are rejected.
    pub fn apply_edit(&mut self, path: &str, value: &str) -> Result<()> {
        let bad_path = || NanoBrandError::InvalidRequest(format!("unknown edit path: {path}"));
        let parts: Vec<&str> = path.split('.').collect();

        let target: &mut String = match parts.as_slice() {
            ["hero", "headline"] => &mut self.hero.headline,
            ["hero", "subheadline"] => &mut self.hero.subheadline,
            ["hero", "cta"] => &mut self.hero.cta,
            ["problem", "title"] => &mut self.problem.title,
            ["problem", "pains", idx] => {
                let i: usize = idx.parse().map_err(|_| bad_path())?;
                self.problem.pains.get_mut(i).ok_or_else(bad_path)?
            }
            ["solution", "title"] => &mut self.solution.title,
            ["solution", "explanation"] => &mut self.solution.explanation,
            ["variants", "title"] => &mut self.variants.title,
            ["notes", "title"] => &mut self.notes.as_mut().ok_or_else(bad_path)?.title,
            ["notes", "content"] => &mut self.notes.as_mut().ok_or_else(bad_path)?.content,
            ["benefits", "title"] => &mut self.benefits.title,
            ["benefits", idx, field] => {
                let i: usize = idx.parse().map_err(|_| bad_path())?;
                let item = self.benefits.items.get_mut(i).ok_or_else(bad_path)?;
                match *field {
                    "title" => &mut item.title,
                    "description" => &mut item.description,
                    _ => return Err(bad_path()),
                }
            }
            ["social_proof", "title"] => &mut self.social_proof.title,
            ["reviews", idx, field] => {
                let i: usize = idx.parse().map_err(|_| bad_path())?;
                let review = self.social_proof.reviews.get_mut(i).ok_or_else(bad_path)?;
                match *field {
                    "name" => &mut review.name,
                    "comment" => &mut review.comment,
                    _ => return Err(bad_path()),
                }
            }
            ["faqs", "title"] => &mut self.faqs.title,
            ["faqs", idx, field] => {
                let i: usize = idx.parse().map_err(|_| bad_path())?;
                let item = self.faqs.items.get_mut(i).ok_or_else(bad_path)?;
                match *field {
                    "question" => &mut item.question,
                    "answer" => &mut item.answer,
                    _ => return Err(bad_path()),
                }
            }
            _ => return Err(bad_path()),
        };

        *target = value.to_string();
        Ok(())
    }
}

/// Encodes raw bytes as an inline data URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    use base64::Engine;
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Splits a data URL into `(mime, base64 payload)`.
pub fn data_url_payload(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    Some((mime, payload))
}

/// Guesses the MIME type for an image file extension. Defaults to JPEG,
/// which is what the remote endpoints are told to expect for references.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// A small populated document shared by tests across the crate.
    pub(crate) fn sample_page() -> LandingPage {
        LandingPage {
            atmosphere: Atmosphere {
                primary_color: "#0f172a".into(),
                mood: "Cinematic Luxury".into(),
            },
            hero: HeroSection {
                headline: "عنوان".into(),
                subheadline: "وصف".into(),
                cta: "اطلب الآن".into(),
                image: encode_data_url("image/jpeg", b"hero"),
            },
            problem: ProblemSection {
                title: "المشكلة".into(),
                pains: vec!["ألم أول".into(), "ألم ثانٍ".into()],
                image: encode_data_url("image/jpeg", b"problem"),
            },
            solution: SolutionSection {
                title: "الحل".into(),
                explanation: "شرح".into(),
                image: encode_data_url("image/jpeg", b"solution"),
            },
            variants: VariantsSection {
                title: "خيارات".into(),
                items: vec![ProductVariant {
                    id: "0".into(),
                    label: "أحمر".into(),
                    value: "#ff0000".into(),
                    kind: VariantKind::Color,
                }],
            },
            notes: Some(NotesSection {
                title: "ملاحظات".into(),
                content: "توصيل مجاني".into(),
            }),
            benefits: BenefitsSection {
                title: "لماذا نحن؟".into(),
                items: vec![Benefit {
                    id: "0".into(),
                    title: "ميزة".into(),
                    description: "تفصيل".into(),
                    image: encode_data_url("image/jpeg", b"benefit"),
                }],
            },
            social_proof: SocialProofSection {
                title: "ثقة زبائننا".into(),
                reviews: vec![Review {
                    id: "0".into(),
                    name: "أحمد".into(),
                    rating: 5,
                    comment: "ممتاز".into(),
                    avatar: encode_data_url("image/svg+xml", b"<svg/>"),
                }],
                verification: "مراجعات موثقة".into(),
            },
            faqs: FaqSection {
                title: "الأسئلة الشائعة".into(),
                items: vec![FaqItem {
                    id: "0".into(),
                    question: "سؤال؟".into(),
                    answer: "جواب.".into(),
                }],
            },
            scene_prompts: ScenePrompts {
                hero: "Cinematic reveal".into(),
                problem: "Moody struggle".into(),
                solution: "Pristine studio shot".into(),
                benefits: vec!["Dynamic shot".into()],
            },
        }
    }
}
