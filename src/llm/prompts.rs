//! Prompt templates. Placeholders are substituted with `str::replace`.

pub const DESCRIPTION_PROMPT: &str = r#"You are a technical writer. Generate a concise description for this AI tool.

Tool Name: {tool}
Official Website: {website}
Website Description: {context}

Requirements:
1. Length: EXACTLY 150-200 characters (strict requirement)
2. Tone: Professional, informative
3. Content: Focus on PRIMARY use case and key benefit
4. Accuracy: Use ONLY information from website description, no speculation
5. Format: Single sentence, no marketing fluff

Return ONLY the description text, nothing else."#;

pub const CATEGORY_PROMPT: &str = r#"Categorize this AI tool into exactly ONE category based on its primary function.

Tool: {tool}
Context: {context}

Categories:
- Image: Image generation, editing, enhancement
- Text: Writing, chat, language processing
- Video: Video creation, editing, generation
- Audio: Music, voice, audio processing
- Code: Programming, development tools
- Productivity: Task management, automation, workflows
- Research: Data analysis, information gathering
- Marketing: Advertising, SEO, content marketing
- AI Tools: General AI platforms or multi-purpose tools

Return ONLY the category name, nothing else."#;

pub const TOOL_TYPE_PROMPT: &str = r#"Determine if this AI tool is Free or Paid based on the available information.

Tool Name: {tool}
Official Website: {website}
Website Description: {context}

Decision Rules:
1. If the tool offers any free tier or free plan, answer "Free"
2. If the tool is completely paid or subscription only, answer "Paid"
3. If pricing is unclear or not mentioned, answer "Free"

Return ONLY one word: "Free" or "Paid""#;

pub const TRANSLATION_PROMPT: &str = r#"Translate the following English text to Arabic. Provide ONLY the Arabic translation without any explanations or additional text:

"{text}"

Arabic translation:"#;

/// Placeholder text when the caller has no context to offer.
pub const NO_CONTEXT: &str = "No description available";

pub fn description_prompt(tool: &str, website: &str, context: &str) -> String {
    DESCRIPTION_PROMPT
        .replace("{tool}", tool)
        .replace("{website}", website)
        .replace("{context}", or_placeholder(context))
}

pub fn category_prompt(tool: &str, context: &str) -> String {
    CATEGORY_PROMPT
        .replace("{tool}", tool)
        .replace("{context}", or_placeholder(context))
}

pub fn tool_type_prompt(tool: &str, website: &str, context: &str) -> String {
    TOOL_TYPE_PROMPT
        .replace("{tool}", tool)
        .replace("{website}", website)
        .replace("{context}", or_placeholder(context))
}

pub fn translation_prompt(text: &str) -> String {
    TRANSLATION_PROMPT.replace("{text}", text)
}

fn or_placeholder(context: &str) -> &str {
    if context.trim().is_empty() {
        NO_CONTEXT
    } else {
        context
    }
}
