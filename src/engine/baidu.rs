use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{Engine, degrade};
use crate::config::ConfigBag;
use crate::error::{LingoError, Result};
use crate::http::{HttpExecutor, ReqwestExecutor, RequestOptions};
use crate::language;
use crate::translation::Translation;

pub const ENDPOINT: &str = "https://fanyi-api.baidu.com/api/trans/vip/translate";

const SECTION: &str = "baidu";

/// Baidu's own codes for languages that differ from the common ones
static DIALECTS: &[(&str, &str)] = &[
    ("zh-cn", "zh"),
    ("zh-chs", "zh"),
    ("zh-cht", "cht"),
    ("en-us", "en"),
    ("en-gb", "en"),
    ("ja", "jp"),
];

/// `error_code` Baidu sends alongside successful results
const SUCCESS_CODE: &str = "52000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransPair {
    pub src: String,
    pub dst: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaiduResponse {
    pub from: Option<String>,
    pub to: Option<String>,
    pub trans_result: Option<Vec<TransPair>>,
    pub error_code: Option<Value>,
    pub error_msg: Option<String>,
}

/// Authenticated Baidu Fanyi engine; needs `appid` and `key`
pub struct BaiduEngine {
    executor: Box<dyn HttpExecutor>,
}

impl Default for BaiduEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BaiduEngine {
    pub fn new() -> Self {
        Self::with_executor(Box::new(ReqwestExecutor::new()))
    }

    pub fn with_executor(executor: Box<dyn HttpExecutor>) -> Self {
        Self { executor }
    }

    async fn request(
        &mut self,
        config: &ConfigBag,
        form: Vec<(String, String)>,
    ) -> Result<(Value, String)> {
        let options = RequestOptions::from_config(config);
        let body = self.executor.post_form(ENDPOINT, &form, &options).await?;

        let raw: Value = serde_json::from_str(&body)
            .map_err(|e| LingoError::Decode(format!("Failed to parse response: {}", e)))?;
        let response: BaiduResponse = serde_json::from_value(raw.clone())
            .map_err(|e| LingoError::Decode(format!("Unexpected response shape: {}", e)))?;

        if let Some(code) = response.error_code.as_ref().map(code_to_string) {
            if code != SUCCESS_CODE {
                return Err(LingoError::Decode(format!(
                    "Baidu API error {}: {}",
                    code,
                    response.error_msg.as_deref().unwrap_or("unknown error")
                )));
            }
        }

        let rendered = render(&response)?;
        Ok((raw, rendered))
    }
}

#[async_trait]
impl Engine for BaiduEngine {
    fn name(&self) -> &'static str {
        "baidu"
    }

    async fn translate(
        &mut self,
        config: &ConfigBag,
        source_lang: Option<&str>,
        target_lang: Option<&str>,
        text: &str,
    ) -> Result<Option<Translation>> {
        let appid = credential(config, "appid")?;
        let key = credential(config, "key")?;

        let (source_lang, target_lang) = language::resolve(
            source_lang,
            target_lang,
            text,
            config.main_language_threshold(),
        );
        info!("Translating with baidu: {} -> {}", source_lang, target_lang);

        let salt = make_salt();
        let form = vec![
            ("q".to_string(), text.to_string()),
            ("from".to_string(), convert_lang(&source_lang)),
            ("to".to_string(), convert_lang(&target_lang)),
            ("appid".to_string(), appid.to_string()),
            ("sign".to_string(), sign(appid, text, &salt, key)),
            ("salt".to_string(), salt),
        ];
        debug!("Baidu request form prepared for {} chars", text.chars().count());

        let result = self.request(config, form).await;
        let Some((raw, rendered)) = degrade(self.name(), result)? else {
            return Ok(None);
        };

        let mut translation = Translation::new(self.name(), &source_lang, &target_lang, text);
        translation.info = Some(raw);
        translation.translation = Some(rendered);
        Ok(Some(translation))
    }
}

fn credential<'a>(config: &'a ConfigBag, key: &str) -> Result<&'a str> {
    config
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| LingoError::MissingCredential {
            section: SECTION.to_string(),
            key: key.to_string(),
        })
}

fn code_to_string(code: &Value) -> String {
    match code {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Map a common language code to Baidu's dialect; unknown codes pass through
pub fn convert_lang(lang: &str) -> String {
    let lowered = lang.to_lowercase();
    DIALECTS
        .iter()
        .find(|(code, _)| *code == lowered)
        .map(|(_, dialect)| dialect.to_string())
        .unwrap_or_else(|| lang.to_string())
}

/// Lowercase hex MD5 of `appid + text + salt + key`
pub fn sign(appid: &str, text: &str, salt: &str, key: &str) -> String {
    let payload = format!("{}{}{}{}", appid, text, salt, key);
    format!("{:x}", md5::compute(payload.as_bytes()))
}

/// Current time in milliseconds plus a little jitter
pub fn make_salt() -> String {
    let jitter: i64 = rand::thread_rng().gen_range(0..=10);
    (chrono::Utc::now().timestamp_millis() + jitter).to_string()
}

/// Each source line followed by its `" * "`-prefixed translation
pub fn render(response: &BaiduResponse) -> Result<String> {
    let pairs = response
        .trans_result
        .as_ref()
        .ok_or_else(|| LingoError::Decode("response has no trans_result".to_string()))?;

    let mut output = String::new();
    for pair in pairs {
        output.push_str(&pair.src);
        output.push('\n');
        output.push_str(" * ");
        output.push_str(&pair.dst);
        output.push('\n');
    }
    Ok(output)
}
