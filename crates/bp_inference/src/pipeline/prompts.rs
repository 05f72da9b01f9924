use bp_core::{render_reference_block, Source};

/// Year range the model is told to draw on. It is a hint in the prompt only,
/// nothing checks the dates that come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub from: i32,
    pub to: i32,
}

impl Window {
    pub fn topics(reference_year: i32) -> Self {
        Self { from: reference_year - 1, to: reference_year }
    }

    pub fn sources(reference_year: i32) -> Self {
        Self { from: reference_year - 2, to: reference_year }
    }
}

pub fn suggest_topics(category: &str, window: Window) -> String {
    format!(
        "Suggest 5 highly technical, trending blog post topics for the category: \"{category}\".\n\
         The topics must be based on the latest {from}-{to} data.\n\
         Return ONLY a valid JSON array of objects, where each object has a 'title' (string) and 'description' (string) field.",
        category = category,
        from = window.from,
        to = window.to,
    )
}

pub fn suggest_themes(topic: &str) -> String {
    format!(
        "Based on the topic \"{}\", suggest 5 highly specific article themes/angles that are SEO/AEO optimized.\n\
         Return ONLY a valid JSON array of objects. Each object should have a 'theme' (string) and 'rationale' (string for why it's a good angle).",
        topic
    )
}

pub fn deep_research(theme: &str, window: Window) -> String {
    format!(
        "Conduct deep research on the theme \"{theme}\".\n\
         Gather EXACTLY 8 high-authority sources (academic papers, official whitepapers, tier-1 tech news).\n\
         CONSTRAINT: Only use sources published between {from} and {to}.\n\
         Return ONLY a valid JSON array of objects, where each object has:\n\
         - 'title' (string)\n\
         - 'url' (string)\n\
         - 'snippet' (string)\n\
         - 'date' (string, approx publication date)",
        theme = theme,
        from = window.from,
        to = window.to,
    )
}

pub fn generate_article(theme: &str, sources: &[Source]) -> String {
    format!(
        "As a top-tier technical writer, write a 2,000-word authoritative article based on the following theme and sources.\n\
         Simulate NotebookLM's deep contextual understanding.\n\
         Theme: \"{theme}\"\n\n\
         Sources:\n{references}\n\n\n\
         Formatting Requirements:\n\
         1. Use Markdown for structure (headings, bold, lists).\n\
         2. MUST use LaTeX for formulas (e.g. enclose inline math with single dollar signs $...$ and block math with double dollar signs $$...$$).\n\
         3. Ensure Fixstars-style extreme technical depth (include realistic code snippets, architecture details, or performance numbers where applicable).\n\
         4. Cite sources explicitly using [1], [2], etc., corresponding to the provided sources list.\n\
         5. Do NOT output a JSON wrapper, just the raw markdown article starting with a # Title.",
        theme = theme,
        references = render_reference_block(sources),
    )
}
