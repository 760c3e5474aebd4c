use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::{Engine, degrade};
use crate::config::ConfigBag;
use crate::error::{LingoError, Result};
use crate::http::{HttpExecutor, ReqwestExecutor, RequestOptions};
use crate::language;
use crate::translation::Translation;

pub const DEFAULT_HOST: &str = "translate.google.com";

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:59.0) Gecko/20100101 Firefox/59.0";

/// Facets requested in one call: alternatives, dictionary, examples, language
/// detection, definitions, spelling, related words, transliteration, synonyms
/// and the main translation
const DATA_TYPES: &[&str] = &["at", "bd", "ex", "ld", "md", "qca", "rw", "rm", "ss", "t"];

/// Unauthenticated Google Translate engine
pub struct GoogleEngine {
    executor: Box<dyn HttpExecutor>,
}

impl Default for GoogleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleEngine {
    pub fn new() -> Self {
        Self::with_executor(Box::new(ReqwestExecutor::new()))
    }

    pub fn with_executor(executor: Box<dyn HttpExecutor>) -> Self {
        Self { executor }
    }

    pub fn build_url(host: &str, source_lang: &str, target_lang: &str, text: &str) -> String {
        let query: String = url::form_urlencoded::byte_serialize(text.as_bytes()).collect();
        let facets: String = DATA_TYPES.iter().map(|dt| format!("dt={}&", dt)).collect();
        format!(
            "https://{}/translate_a/single?client=gtx&sl={}&tl={}&{}q={}",
            host, source_lang, target_lang, facets, query
        )
    }

    async fn request(
        &mut self,
        config: &ConfigBag,
        source_lang: &str,
        target_lang: &str,
        text: &str,
    ) -> Result<Translation> {
        let url = Self::build_url(
            config.host().unwrap_or(DEFAULT_HOST),
            source_lang,
            target_lang,
            text,
        );
        let options = RequestOptions::from_config(config).with_user_agent(USER_AGENT);

        let body = self.executor.get(&url, &options).await?;
        if body.trim().is_empty() {
            return Err(LingoError::Decode("empty response".to_string()));
        }

        let response: Value = serde_json::from_str(&body)
            .map_err(|e| LingoError::Decode(format!("Failed to parse response: {}", e)))?;

        parse_response(source_lang, target_lang, text, &response)
    }
}

#[async_trait]
impl Engine for GoogleEngine {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn translate(
        &mut self,
        config: &ConfigBag,
        source_lang: Option<&str>,
        target_lang: Option<&str>,
        text: &str,
    ) -> Result<Option<Translation>> {
        let (source_lang, target_lang) = language::resolve(
            source_lang,
            target_lang,
            text,
            config.main_language_threshold(),
        );
        info!("Translating with google: {} -> {}", source_lang, target_lang);

        let result = self.request(config, &source_lang, &target_lang, text).await;
        degrade(self.name(), result)
    }
}

/// Build a result from Google's positional response array
pub fn parse_response(
    source_lang: &str,
    target_lang: &str,
    text: &str,
    response: &Value,
) -> Result<Translation> {
    if !response.is_array() {
        return Err(LingoError::Decode(
            "expected a top-level array in response".to_string(),
        ));
    }
    debug!("Google response has {} top-level elements", items(response).len());

    let definition = get_definition(response);

    let mut translation = Translation::new("google", source_lang, target_lang, text);
    translation.phonetic = get_phonetic(response);
    translation.explain = get_explain(response);
    translation.detail = get_detail(response);
    translation.alternative = get_alternative(response);
    translation.definition = (!definition.is_empty()).then_some(definition);
    Ok(translation)
}

fn items(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Fourth element of the first four-element entry of `response[0]`
pub fn get_phonetic(response: &Value) -> Option<String> {
    items(&response[0])
        .iter()
        .find(|entry| items(entry).len() == 4)
        .and_then(|entry| text_of(&entry[3]))
}

/// Concatenation of the leading text of every `response[0]` entry
pub fn get_definition(response: &Value) -> String {
    items(&response[0])
        .iter()
        .map(|entry| &entry[0])
        .filter(|first| truthy(first))
        .filter_map(text_of)
        .collect()
}

/// One `"[<pos>] syn;syn;"` line per dictionary entry in `response[1]`.
/// The tag is the first character of the part of speech.
pub fn get_explain(response: &Value) -> Vec<String> {
    if !truthy(&response[1]) {
        return Vec::new();
    }

    items(&response[1])
        .iter()
        .map(|entry| {
            let tag = match &entry[0] {
                Value::String(pos) => pos.chars().next().map(String::from).unwrap_or_default(),
                other => text_of(&other[0]).unwrap_or_default(),
            };

            let mut line = format!("[{}] ", tag);
            for word in items(&entry[2]).iter().filter_map(|s| text_of(&s[0])) {
                line.push_str(&word);
                line.push(';');
            }
            line
        })
        .collect()
}

/// Grouped definitions with examples from `response[12]`
pub fn get_detail(response: &Value) -> Option<Vec<String>> {
    if items(response).len() < 13 {
        return None;
    }

    let mut lines = Vec::new();
    for group in items(&response[12]) {
        lines.push(format!("[{}]", text_of(&group[0]).unwrap_or_default()));
        for item in items(&group[1]) {
            lines.push(format!("- {}", text_of(&item[0]).unwrap_or_default()));
            if items(item).len() >= 3 {
                if let Some(example) = text_of(&item[2]) {
                    lines.push(format!("  * {}", example));
                }
            }
        }
    }
    Some(lines)
}

/// Alternative translations from `response[5]`, minus the main definition
pub fn get_alternative(response: &Value) -> Option<Vec<String>> {
    if items(response).len() < 6 {
        return None;
    }

    let definition = get_definition(response);
    let lines = items(&response[5])
        .iter()
        .flat_map(|group| items(&group[2]))
        .filter_map(|candidate| text_of(&candidate[0]))
        .filter(|candidate| *candidate != definition)
        .map(|candidate| format!(" * {}", candidate))
        .collect();
    Some(lines)
}
