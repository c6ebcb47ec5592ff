//! Image synthesizer: one scene in, one image (or a well-defined fallback)
//! out. A failing slot never aborts the batch it belongs to.

use crate::content::Slot;
use crate::engine::{SceneEngine, SceneRequest};

/// Wraps a scene description in the fixed fidelity protocol every synthesis
/// call carries: identical product, square frame, cinematic studio look,
/// the complete object in view.
pub fn fidelity_prompt(scene: &str) -> String {
    format!(
        r#"STRICT PRODUCT FIDELITY & MASTERPIECE PROTOCOL.
1. PRODUCT: Must be 100% identical to the reference images.
2. SCENE: "{scene}".
3. CINEMATIC: Use dramatic lighting, exciting composition, 8k resolution.
4. ARTISTRY: Luxury studio photography, elegant and clean.
5. PERSPECTIVE: Show the FULL object clearly.
6. TECHNICAL: 1:1 SQUARE."#
    )
}

/// Picks the round-robin upload for a slot, used whenever synthesis yields
/// nothing. Returns `None` only for an empty upload set.
pub fn fallback_reference(uploads: &[String], slot: Slot) -> Option<&str> {
    if uploads.is_empty() {
        return None;
    }
    Some(uploads[slot.index() % uploads.len()].as_str())
}

/// Synthesizes one scene with the full upload set as identity references.
///
/// Any failure - transport, blocked content, a reply without an image part -
/// is logged and collapsed into `None`; the caller substitutes the
/// round-robin upload so the slot always ends up with an image.
pub async fn synthesize_scene(
    engine: &dyn SceneEngine,
    scene: &str,
    uploads: &[String],
) -> Option<String> {
    let request = SceneRequest {
        prompt: fidelity_prompt(scene),
        references: uploads.to_vec(),
    };

    match engine.render_scene(&request).await {
        Ok(Some(url)) => Some(url),
        Ok(None) => {
            tracing::warn!(scene, "scene reply carried no image part");
            None
        }
        Err(e) => {
            tracing::warn!(scene, error = %e, "scene synthesis failed");
            None
        }
    }
}

/// Synthesizes a scene, falling back to the slot's round-robin upload.
pub async fn synthesize_or_fallback(
    engine: &dyn SceneEngine,
    scene: &str,
    uploads: &[String],
    slot: Slot,
) -> String {
    match synthesize_scene(engine, scene, uploads).await {
        Some(url) => url,
        None => fallback_reference(uploads, slot)
            .map(str::to_string)
            .unwrap_or_default(),
    }
}
