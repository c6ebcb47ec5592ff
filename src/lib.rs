#![warn(missing_docs)]
//! NanoBrand - AI landing-page generation for product photos.
//!
//! Feed it product photos plus free-text notes; one multimodal strategy
//! call produces Arabic marketing copy and per-section scene prompts, the
//! scenes are synthesized as square product-faithful images (with the
//! uploads themselves as fallback), and everything is assembled into a
//! single editable, exportable content document.
//!
//! # Quick Start
//!
//! ```no_run
//! use nanobrand::{GeminiClient, Session};
//!
//! #[tokio::main]
//! async fn main() -> nanobrand::Result<()> {
//!     let client = GeminiClient::builder().api_key("...").build()?;
//!
//!     let mut session = Session::new();
//!     session.add_image_file("product.jpg".as_ref())?;
//!     session.set_notes("توصيل مجاني، ضمان سنة");
//!
//!     session
//!         .generate(&client, &client, |p| eprintln!("{}", p.label()))
//!         .await?;
//!     let artifact = session.export(".".as_ref()).await?;
//!     println!("{}", artifact.display());
//!     Ok(())
//! }
//! ```

mod error;

pub mod assemble;
pub mod avatar;
pub mod content;
pub mod engine;
pub mod gemini;
pub mod keystore;
pub mod pipeline;
pub mod plan;
pub mod render;
pub mod session;
pub mod strategy;
pub mod synth;

// Re-export error types at crate root
pub use error::{NanoBrandError, Result};

// Re-export the types most callers need
pub use content::{LandingPage, Slot};
pub use engine::{SceneEngine, SceneRequest, StrategyEngine, StrategyRequest};
pub use gemini::{GeminiClient, GeminiClientBuilder};
pub use keystore::CredentialStore;
pub use pipeline::Progress;
pub use session::{Phase, Session};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::content::{LandingPage, Slot};
    pub use crate::engine::{SceneEngine, StrategyEngine};
    pub use crate::error::{NanoBrandError, Result};
    pub use crate::gemini::GeminiClient;
    pub use crate::session::{Phase, Session};
}
