//! Engine traits: the seams between the pipeline and the remote model.

use crate::error::Result;
use async_trait::async_trait;

/// A multimodal strategy request: the full upload set plus the free-text
/// context the user typed in.
#[derive(Debug, Clone)]
pub struct StrategyRequest {
    /// Uploaded product images as data URLs, in upload order.
    pub images: Vec<String>,
    /// Free-text variants context (colors, sizes, ...). May be empty.
    pub variants: String,
    /// Free-text notes context (delivery, warranty, ...). May be empty.
    pub notes: String,
}

impl StrategyRequest {
    /// Creates a request for the given upload set.
    pub fn new(images: Vec<String>) -> Self {
        Self {
            images,
            variants: String::new(),
            notes: String::new(),
        }
    }

    /// Sets the variants context.
    pub fn with_variants(mut self, variants: impl Into<String>) -> Self {
        self.variants = variants.into();
        self
    }

    /// Sets the notes context.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// A request to synthesize one scene image.
#[derive(Debug, Clone)]
pub struct SceneRequest {
    /// Scene description, already carrying the fidelity protocol suffix.
    pub prompt: String,
    /// Identity references: every uploaded product image, as data URLs.
    pub references: Vec<String>,
}

/// Produces the raw strategy reply text for a request.
#[async_trait]
pub trait StrategyEngine: Send + Sync {
    /// Sends one multimodal request and returns the model's reply text.
    async fn propose(&self, request: &StrategyRequest) -> Result<String>;
}

/// Renders scene images from prompts plus identity references.
///
/// `Ok(None)` is the well-defined "no image produced" outcome for replies
/// that carry no image part; transport and API failures surface as errors
/// and are collapsed to the same sentinel by the synthesizer.
#[async_trait]
pub trait SceneEngine: Send + Sync {
    /// Renders one scene, returning the image as a data URL.
    async fn render_scene(&self, request: &SceneRequest) -> Result<Option<String>>;
}
