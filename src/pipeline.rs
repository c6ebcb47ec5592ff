//! Generation pipeline: strategy call, scene synthesis groups, assembly.
//!
//! The strategy call completes before any synthesis starts (the scene
//! prompts come from its reply). Hero/problem/solution scenes run as one
//! concurrent group; benefit scenes run as a second concurrent group after
//! the first completes. No cap is imposed on a group and no call is ever
//! cancelled once issued.

use crate::assemble::{assemble, SceneSet};
use crate::content::{LandingPage, Slot};
use crate::engine::{SceneEngine, StrategyEngine, StrategyRequest};
use crate::error::Result;
use crate::strategy::propose_plan;
use crate::synth::{fallback_reference, fidelity_prompt, synthesize_or_fallback};

/// The two user-visible checkpoints of a generation run, plus the one for
/// single-slot regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Strategy call in flight.
    Analyzing,
    /// Scene synthesis groups in flight.
    Synthesizing,
    /// Regenerating a single scene.
    Regenerating,
}

impl Progress {
    /// The Arabic progress label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Analyzing => "تحليل المنتج وبناء استراتيجية الفخامة المطلقة...",
            Self::Synthesizing => "توليد الصور السينمائية (تستغرق وقتاً)...",
            Self::Regenerating => "إعادة ابتكار المشهد الفني...",
        }
    }
}

async fn scene_for(
    engine: &dyn SceneEngine,
    prompt: &str,
    uploads: &[String],
    slot: Slot,
) -> String {
    if prompt.is_empty() {
        return fallback_reference(uploads, slot)
            .map(str::to_string)
            .unwrap_or_default();
    }
    synthesize_or_fallback(engine, prompt, uploads, slot).await
}

/// Runs one full generation: plan, scenes, assembled document.
///
/// `progress` fires at the analyzing and synthesizing checkpoints. A
/// strategy failure aborts the run; scene failures never do.
pub async fn generate_page(
    strategy: &dyn StrategyEngine,
    scenes: &dyn SceneEngine,
    request: &StrategyRequest,
    progress: impl Fn(Progress),
) -> Result<LandingPage> {
    progress(Progress::Analyzing);
    let plan = propose_plan(strategy, request).await?;

    progress(Progress::Synthesizing);
    let uploads = &request.images;
    let prompts = plan.image_prompts.clone();
    let hero_prompt = prompts.hero.unwrap_or_default();
    let problem_prompt = prompts.problem.unwrap_or_default();
    let solution_prompt = prompts.solution.unwrap_or_default();

    let (hero, problem, solution) = tokio::join!(
        scene_for(scenes, &hero_prompt, uploads, Slot::Hero),
        scene_for(scenes, &problem_prompt, uploads, Slot::Problem),
        scene_for(scenes, &solution_prompt, uploads, Slot::Solution),
    );

    let benefit_scenes = futures::future::join_all(
        prompts
            .benefit_prompts
            .iter()
            .enumerate()
            .map(|(i, p)| scene_for(scenes, p, uploads, Slot::Benefit(i))),
    )
    .await;

    Ok(assemble(
        plan,
        SceneSet {
            hero,
            problem,
            solution,
            benefits: benefit_scenes,
        },
        uploads,
    ))
}

/// Regenerates a single scene image for an existing document.
///
/// Returns `Ok(None)` when the reply carried no image; the caller keeps the
/// current image in that case. Errors propagate so the user sees a message,
/// but the document itself is never touched here.
pub async fn regenerate_slot(
    scenes: &dyn SceneEngine,
    page: &LandingPage,
    uploads: &[String],
    slot: Slot,
) -> Result<Option<String>> {
    let prompt = page.scene_prompt(slot).ok_or_else(|| {
        crate::error::NanoBrandError::InvalidRequest(format!("no retained prompt for slot {slot}"))
    })?;

    let references = if uploads.is_empty() {
        page.image(slot)
            .filter(|img| !img.is_empty())
            .map(|img| vec![img.to_string()])
            .unwrap_or_default()
    } else {
        uploads.to_vec()
    };

    scenes
        .render_scene(&crate::engine::SceneRequest {
            prompt: fidelity_prompt(prompt),
            references,
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::encode_data_url;
    use crate::engine::SceneRequest;
    use crate::error::NanoBrandError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct StubStrategy(&'static str);

    #[async_trait]
    impl StrategyEngine for StubStrategy {
        async fn propose(&self, _request: &StrategyRequest) -> crate::Result<String> {
            Ok(self.0.to_string())
        }
    }

    /// Scene stub: succeeds or fails every call, counting requests.
    struct StubScenes {
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubScenes {
        fn ok() -> Self {
            Self {
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SceneEngine for StubScenes {
        async fn render_scene(&self, request: &SceneRequest) -> crate::Result<Option<String>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(NanoBrandError::Api {
                    status: 503,
                    message: "down".into(),
                });
            }
            assert!(request.prompt.contains("STRICT PRODUCT FIDELITY"));
            Ok(Some(encode_data_url(
                "image/png",
                format!("scene-{n}").as_bytes(),
            )))
        }
    }

    fn uploads(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| encode_data_url("image/jpeg", format!("upload-{i}").as_bytes()))
            .collect()
    }

    fn request() -> StrategyRequest {
        StrategyRequest::new(uploads(3))
    }

    #[tokio::test]
    async fn test_generate_page_happy_path() {
        // 3 uploads, empty contexts, plan with 2 benefit prompts
        let strategy = StubStrategy(crate::plan::testfix::FIXTURE);
        let scenes = StubScenes::ok();
        let page = generate_page(&strategy, &scenes, &request(), |_| {})
            .await
            .unwrap();

        assert_eq!(page.benefits.items.len(), 2);
        assert!(page.benefits.items.iter().all(|b| !b.image.is_empty()));
        assert!(!page.hero.image.is_empty());
        // 3 section scenes + 2 benefit scenes
        assert_eq!(scenes.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_progress_checkpoints_in_order() {
        let strategy = StubStrategy(crate::plan::testfix::FIXTURE);
        let scenes = StubScenes::ok();
        let seen = Mutex::new(Vec::new());
        generate_page(&strategy, &scenes, &request(), |p| {
            seen.lock().unwrap().push(p);
        })
        .await
        .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Progress::Analyzing, Progress::Synthesizing]
        );
    }

    #[tokio::test]
    async fn test_strategy_failure_aborts_before_any_synthesis() {
        let strategy = StubStrategy("no json here, sorry");
        let scenes = StubScenes::ok();
        let err = generate_page(&strategy, &scenes, &request(), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, NanoBrandError::StrategyParse(_)));
        assert_eq!(scenes.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failing_scenes_substitute_uploads_round_robin() {
        let strategy = StubStrategy(crate::plan::testfix::FIXTURE);
        let scenes = StubScenes::failing();
        let req = request();
        let page = generate_page(&strategy, &scenes, &req, |_| {})
            .await
            .unwrap();

        let ups = &req.images;
        assert_eq!(page.hero.image, ups[0]);
        assert_eq!(page.problem.image, ups[1]);
        assert_eq!(page.solution.image, ups[2]);
        // benefit slots 0 and 1 have global indexes 3 and 4
        assert_eq!(page.benefits.items[0].image, ups[0]);
        assert_eq!(page.benefits.items[1].image, ups[1]);
    }

    #[tokio::test]
    async fn test_regenerate_slot_uses_retained_prompt() {
        let page = crate::content::testutil::sample_page();
        let scenes = StubScenes::ok();
        let url = regenerate_slot(&scenes, &page, &uploads(2), Slot::Hero)
            .await
            .unwrap();
        assert!(url.unwrap().starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_regenerate_slot_without_prompt_is_rejected() {
        let page = crate::content::testutil::sample_page();
        let scenes = StubScenes::ok();
        let err = regenerate_slot(&scenes, &page, &uploads(2), Slot::Benefit(3))
            .await
            .unwrap_err();
        assert!(matches!(err, NanoBrandError::InvalidRequest(_)));
        assert_eq!(scenes.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_regenerate_slot_error_propagates() {
        let page = crate::content::testutil::sample_page();
        let scenes = StubScenes::failing();
        let err = regenerate_slot(&scenes, &page, &uploads(1), Slot::Solution)
            .await
            .unwrap_err();
        assert!(matches!(err, NanoBrandError::Api { .. }));
    }

    #[test]
    fn test_progress_labels_are_arabic() {
        assert!(Progress::Analyzing.label().contains("تحليل"));
        assert!(Progress::Synthesizing.label().contains("توليد الصور"));
    }
}
