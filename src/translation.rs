use serde::{Deserialize, Serialize};

/// Result record produced by every engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// Name of the engine that produced this result
    pub engine: String,
    pub source_lang: String,
    pub target_lang: String,
    /// Original query, unmodified
    pub text: String,
    pub phonetic: Option<String>,
    /// Short gloss of the whole query
    pub definition: Option<String>,
    /// Part-of-speech tagged explanation lines
    pub explain: Vec<String>,

    // Engine-specific extensions
    pub detail: Option<Vec<String>>,
    pub alternative: Option<Vec<String>>,
    /// Pre-rendered source/destination pairs
    pub translation: Option<String>,
    /// Raw decoded response
    pub info: Option<serde_json::Value>,
}

impl Translation {
    pub fn new(engine: &str, source_lang: &str, target_lang: &str, text: &str) -> Self {
        Self {
            engine: engine.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }
}
