//! The presentation-layer state machine that owns the live document.
//!
//! empty -> processing -> ready -> exporting -> ready, with reset back to
//! empty. Remote failures during processing fall back to empty only when no
//! earlier document exists; a failed single-slot regeneration always leaves
//! the previous document intact.

use crate::content::{mime_for_extension, LandingPage, Slot};
use crate::engine::{SceneEngine, StrategyEngine, StrategyRequest};
use crate::error::{NanoBrandError, Result};
use crate::pipeline::{generate_page, regenerate_slot, Progress};
use crate::render::render_html;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settle delay before an export is written, matching the pause the capture
/// flow gives images to finish painting.
pub const EXPORT_SETTLE: Duration = Duration::from_secs(1);

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No content document yet.
    #[default]
    Empty,
    /// Strategy and scene calls in flight; the document is read-only.
    Processing,
    /// Document present and editable.
    Ready,
    /// Export in progress.
    Exporting,
}

/// One editing session: the upload set, the free-text contexts and the live
/// content document. Serializable so the CLI can carry it across
/// invocations.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(skip)]
    phase: Phase,
    uploads: Vec<String>,
    variants: String,
    notes: String,
    page: Option<LandingPage>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Uploaded product images, in upload order.
    pub fn uploads(&self) -> &[String] {
        &self.uploads
    }

    /// The live document, if one exists.
    pub fn page(&self) -> Option<&LandingPage> {
        self.page.as_ref()
    }

    /// Mutable access for inline edits; the session stays the owner.
    pub fn page_mut(&mut self) -> Option<&mut LandingPage> {
        self.page.as_mut()
    }

    /// Adds an already-encoded upload.
    pub fn add_image(&mut self, data_url: String) {
        self.uploads.push(data_url);
    }

    /// Reads an image file and adds it as an upload.
    pub fn add_image_file(&mut self, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path)?;
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .map(mime_for_extension)
            .unwrap_or("image/jpeg");
        self.uploads.push(crate::content::encode_data_url(mime, &bytes));
        Ok(())
    }

    /// Sets the variants context.
    pub fn set_variants(&mut self, variants: impl Into<String>) {
        self.variants = variants.into();
    }

    /// Sets the notes context.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Runs a full generation, replacing the document on success.
    ///
    /// On failure the previous document (if any) is preserved and the phase
    /// returns to where it was; with no previous document the session is
    /// empty again.
    pub async fn generate(
        &mut self,
        strategy: &dyn StrategyEngine,
        scenes: &dyn SceneEngine,
        progress: impl Fn(Progress),
    ) -> Result<()> {
        if self.uploads.is_empty() {
            return Err(NanoBrandError::InvalidRequest(
                "at least one product image is required".into(),
            ));
        }

        self.phase = Phase::Processing;
        let request = StrategyRequest::new(self.uploads.clone())
            .with_variants(self.variants.clone())
            .with_notes(self.notes.clone());

        match generate_page(strategy, scenes, &request, progress).await {
            Ok(page) => {
                self.page = Some(page);
                self.phase = Phase::Ready;
                Ok(())
            }
            Err(e) => {
                self.phase = if self.page.is_some() {
                    Phase::Ready
                } else {
                    Phase::Empty
                };
                Err(e)
            }
        }
    }

    /// Regenerates a single scene image in place.
    ///
    /// A reply without an image keeps the current one silently; an error
    /// propagates without touching the document.
    pub async fn regenerate(
        &mut self,
        scenes: &dyn SceneEngine,
        slot: Slot,
        progress: impl Fn(Progress),
    ) -> Result<()> {
        let Some(page) = self.page.as_mut() else {
            return Err(NanoBrandError::InvalidRequest(
                "no document to regenerate".into(),
            ));
        };

        self.phase = Phase::Processing;
        progress(Progress::Regenerating);
        let outcome = regenerate_slot(scenes, page, &self.uploads, slot).await;
        self.phase = Phase::Ready;

        if let Some(url) = outcome? {
            page.set_image(slot, url)?;
        }
        Ok(())
    }

    /// Applies an inline edit to the document.
    pub fn edit(&mut self, path: &str, value: &str) -> Result<()> {
        self.page
            .as_mut()
            .ok_or_else(|| NanoBrandError::InvalidRequest("no document to edit".into()))?
            .apply_edit(path, value)
    }

    /// Clears everything and returns to the empty state. The caller asks
    /// the user for confirmation first.
    pub fn reset(&mut self) {
        self.uploads.clear();
        self.variants.clear();
        self.notes.clear();
        self.page = None;
        self.phase = Phase::Empty;
    }

    /// Writes the rendered page into `dir` as a timestamped artifact and
    /// returns its path.
    pub async fn export(&mut self, dir: &Path) -> Result<PathBuf> {
        let Some(ref page) = self.page else {
            return Err(NanoBrandError::InvalidRequest(
                "no document to export".into(),
            ));
        };

        self.phase = Phase::Exporting;
        let html = render_html(page);

        // Let in-flight image writes settle before the capture is taken
        tokio::time::sleep(EXPORT_SETTLE).await;

        let name = format!("brand-vision-{}.html", chrono::Utc::now().timestamp_millis());
        let path = dir.join(name);
        let outcome = std::fs::write(&path, html);
        self.phase = Phase::Ready;
        outcome?;

        tracing::info!(path = %path.display(), "exported page");
        Ok(path)
    }

    /// Persists the session as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a session saved by [`Session::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut session: Session = serde_json::from_str(&json)?;
        session.phase = if session.page.is_some() {
            Phase::Ready
        } else {
            Phase::Empty
        };
        Ok(session)
    }
}
