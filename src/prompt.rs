//! Prompt text for the three model operations.

use crate::types::AspectRatio;

/// Instruction sent with each reference image during style analysis
pub const STYLE_ANALYSIS_PROMPT: &str = "Analyze the artistic style of this image. \
Concisely describe its key characteristics, including the color palette, line work, \
texture, composition and overall mood. Focus exclusively on the style.";

/// Instruction placed in front of the per-image descriptions during synthesis
pub const STYLE_SYNTHESIS_PROMPT: &str = "Based on the following style descriptions of \
different images, create a single coherent style description that captures their shared \
elements and artistic essence. This description will be used as the style prompt for an \
image generation model. Focus on producing a unified style guide. Here are the descriptions:";

/// Separator between per-image descriptions in the synthesis request
pub const DESCRIPTION_DELIMITER: &str = "\n---\n";

/// Build the synthesis request text. Descriptions keep the order given.
pub fn synthesis_prompt(descriptions: &[String]) -> String {
    format!(
        "{}\n\n---\n{}",
        STYLE_SYNTHESIS_PROMPT,
        descriptions.join(DESCRIPTION_DELIMITER)
    )
}

/// Compose the generation prompt: ratio, then style, then content.
pub fn assemble_prompt(aspect_ratio: AspectRatio, style: &str, content: &str) -> String {
    format!(
        "Aspect ratio: {}. Style: {}. Content: {}",
        aspect_ratio.label(),
        style.trim(),
        content.trim()
    )
}
