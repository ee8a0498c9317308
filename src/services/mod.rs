pub mod clip; // CLIP zero-shot image classifier
pub mod gemini; // Gemini guidance backend
pub mod guidance;

pub use clip::ClipClassifier;
pub use gemini::GeminiService;
pub use guidance::{resolve_guidance, GuidanceService};
