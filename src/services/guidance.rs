use anyhow::Result;

use crate::models::Category;

/// Trait for disposal-guidance backends (Gemini in production, stubs in
/// tests).
#[async_trait::async_trait]
pub trait GuidanceService: Send + Sync {
    async fn generate_guidance(&self, category: Category) -> Result<String>;
}

/// Fetch guidance for a category, degrading to the fixed fallback template
/// on any backend failure. This never fails outward: callers always get a
/// non-empty guidance string.
pub async fn resolve_guidance(service: &dyn GuidanceService, category: Category) -> String {
    match service.generate_guidance(category).await {
        Ok(text) => text,
        Err(e) => {
            log::warn!(
                "⚠️ Guidance generation failed for {} waste, using fallback: {}",
                category.code(),
                e
            );
            fallback_guidance(category)
        }
    }
}

/// Structured prompt instructing the text model to answer in three fixed
/// sections: rationale, disposal steps, eco tip.
pub fn build_prompt(category: Category) -> String {
    let upper = category.code().to_uppercase();
    format!(
        "\
You are an expert waste management advisor. A waste item has been classified as **{upper} WASTE**.

Provide guidance in this EXACT format (keep it concise and clear):

**WHY this is {upper} waste:**
[2-3 sentences explaining why this item belongs to this category]

**HOW to dispose safely:**
[3-4 bullet points with practical disposal steps]

**ECO TIP:**
[1 creative eco-friendly tip or interesting fact]

Keep the tone friendly and educational. Use simple language (mix of English and Hindi is fine).
"
    )
}

/// Deterministic guidance text used whenever the generation call fails.
pub fn fallback_guidance(category: Category) -> String {
    let code = category.code();
    let upper = code.to_uppercase();
    format!(
        "\
**WHY this is {upper} waste:**
This item is classified as {code} waste based on its material composition and decomposition properties.

**HOW to dispose safely:**
• Separate this waste from other types
• Place it in the designated {code} waste bin
• Follow local waste management guidelines
• Contact your municipal corporation for collection schedule

**ECO TIP:**
Remember: Proper segregation at source makes recycling more effective and helps protect our environment! 🌱
"
    )
}
