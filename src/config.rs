use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{LingoError, Result};

/// Request timeout used when `connection_timeout` is absent
pub const DEFAULT_CONNECTION_TIMEOUT: f64 = 7.0;

/// Detection threshold used when `main_language_threshold` is absent
pub const DEFAULT_MAIN_LANGUAGE_THRESHOLD: f64 = 0.5;

pub const DEFAULT_SECTION: &str = "default";

/// Sectioned configuration file.
///
/// ```toml
/// [default]
/// proxy = "127.0.0.1:7890"
/// connection_timeout = 7
///
/// [baidu]
/// appid = "2015063000000001"
/// key = "12345678"
/// ```
///
/// Section and key names are lower-cased on load and scalar values are kept
/// as strings, so every engine sees the same flat key-value bag.
#[derive(Debug, Clone, Default)]
pub struct Config {
    sections: HashMap<String, HashMap<String, String>>,
}

impl Config {
    /// `<user config dir>/translator/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("translator").join("config.toml"))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| LingoError::Config(format!("Failed to read config file: {}", e)))?;

        debug!("Loaded config file: {}", path.display());
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        // Editors on Windows like to prepend a BOM
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let table: toml::Table = toml::from_str(content)
            .map_err(|e| LingoError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        for (name, value) in table {
            let toml::Value::Table(entries) = value else {
                warn!("Ignoring key '{}' outside of any section", name);
                continue;
            };

            let section = sections.entry(name.to_lowercase()).or_default();
            for (key, value) in entries {
                match scalar_to_string(&value) {
                    Some(v) => {
                        section.insert(key.to_lowercase(), v);
                    }
                    None => warn!("Ignoring non-scalar value for {}.{}", name, key),
                }
            }
        }
        sections.entry(DEFAULT_SECTION.to_string()).or_default();

        Ok(Self { sections })
    }

    pub fn section(&self, name: &str) -> Option<&HashMap<String, String>> {
        self.sections.get(&name.to_lowercase())
    }

    pub fn default_section(&self) -> ConfigBag {
        self.section(DEFAULT_SECTION)
            .map(|s| s.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    /// `[default]` overlaid with the engine's own section
    pub fn bag_for(&self, engine: &str) -> ConfigBag {
        let mut bag = self.default_section();
        if let Some(section) = self.section(engine) {
            bag.extend(section);
        }
        bag
    }
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// Read-only key-value settings handed to an engine for one call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigBag {
    values: HashMap<String, String>,
}

impl ConfigBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_lowercase(), value.into());
    }

    pub fn extend(&mut self, entries: &HashMap<String, String>) {
        for (key, value) in entries {
            self.set(key, value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(&key.to_lowercase())
    }

    /// `None` means the request is not bounded (`connection_timeout = 0`)
    pub fn connection_timeout(&self) -> Option<Duration> {
        let seconds = self.parse_f64("connection_timeout", DEFAULT_CONNECTION_TIMEOUT);
        if seconds == 0.0 {
            None
        } else if seconds < 0.0 {
            warn!(
                "Negative connection_timeout {}, using {}",
                seconds, DEFAULT_CONNECTION_TIMEOUT
            );
            Some(Duration::from_secs_f64(DEFAULT_CONNECTION_TIMEOUT))
        } else {
            Some(Duration::from_secs_f64(seconds))
        }
    }

    pub fn main_language_threshold(&self) -> f64 {
        self.parse_f64("main_language_threshold", DEFAULT_MAIN_LANGUAGE_THRESHOLD)
    }

    pub fn proxy(&self) -> Option<&str> {
        self.get("proxy").map(str::trim).filter(|p| !p.is_empty())
    }

    pub fn proxy_enabled(&self) -> bool {
        self.get("proxy-enabled").is_some_and(|v| {
            matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
        })
    }

    pub fn set_proxy_enabled(&mut self, enabled: bool) {
        self.set("proxy-enabled", enabled.to_string());
    }

    pub fn host(&self) -> Option<&str> {
        self.get("host").map(str::trim).filter(|h| !h.is_empty())
    }

    fn parse_f64(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            None => default,
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    warn!("Invalid value '{}' for {}, using {}", raw, key, default);
                    default
                }
            },
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfigBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (key, value) in iter {
            let key: String = key.into();
            bag.set(&key, value);
        }
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    const SAMPLE: &str = r#"
[Default]
Proxy = "127.0.0.1:7890"
connection_timeout = 3
main_language_threshold = 0.6

[google]
host = "translate.google.cn"

[baidu]
appid = "2015063000000001"
key = "12345678"
connection_timeout = 10
"#;

    #[test]
    fn test_parse_lowercases_sections_and_keys() {
        let config = Config::parse(SAMPLE).unwrap();
        let default = config.section("default").unwrap();
        assert_eq!(default.get("proxy").unwrap(), "127.0.0.1:7890");
        assert_eq!(default.get("connection_timeout").unwrap(), "3");
    }

    #[test]
    fn test_engine_section_overrides_default() {
        let config = Config::parse(SAMPLE).unwrap();

        let baidu = config.bag_for("baidu");
        assert_eq!(baidu.get("appid"), Some("2015063000000001"));
        assert_eq!(baidu.connection_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(baidu.proxy(), Some("127.0.0.1:7890"));

        let google = config.bag_for("google");
        assert_eq!(google.host(), Some("translate.google.cn"));
        assert_eq!(google.connection_timeout(), Some(Duration::from_secs(3)));
        assert!((google.main_language_threshold() - 0.6).abs() < f64::EPSILON);
        assert!(!google.contains("appid"));
    }

    #[test]
    fn test_missing_default_section_is_created() {
        let config = Config::parse("[baidu]\nappid = \"A\"\n").unwrap();
        assert!(config.section("default").unwrap().is_empty());
        assert_eq!(config.bag_for("google"), ConfigBag::new());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::parse("[default\nproxy = ").unwrap_err();
        assert!(matches!(err, LingoError::Config(_)));
    }

    #[test]
    fn test_bag_defaults() {
        let bag = ConfigBag::new();
        assert_eq!(bag.connection_timeout(), Some(Duration::from_secs(7)));
        assert_eq!(bag.main_language_threshold(), 0.5);
        assert!(!bag.proxy_enabled());
        assert_eq!(bag.proxy(), None);
        assert_eq!(bag.host(), None);
    }

    #[test]
    fn test_bag_bad_numbers_fall_back() {
        let bag = ConfigBag::new()
            .with("connection_timeout", "soon")
            .with("main_language_threshold", "NaN");
        assert_eq!(bag.connection_timeout(), Some(Duration::from_secs(7)));
        assert_eq!(bag.main_language_threshold(), 0.5);
    }

    #[test]
    fn test_zero_timeout_disables_bound() {
        let bag = ConfigBag::new().with("connection_timeout", "0");
        assert_eq!(bag.connection_timeout(), None);
    }

    #[test]
    fn test_negative_timeout_keeps_default_bound() {
        let bag = ConfigBag::new().with("connection_timeout", "-1");
        assert_eq!(bag.connection_timeout(), Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_proxy_enabled_flag() {
        let mut bag = ConfigBag::new();
        bag.set_proxy_enabled(true);
        assert!(bag.proxy_enabled());
        bag.set_proxy_enabled(false);
        assert!(!bag.proxy_enabled());
        assert!(ConfigBag::new().with("Proxy-Enabled", "yes").proxy_enabled());
    }

    #[test]
    fn test_from_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("config.toml");
        file.write_str(SAMPLE).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.bag_for("baidu").get("key"), Some("12345678"));
    }

    #[test]
    fn test_from_missing_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = Config::from_file(temp.child("absent.toml").path()).unwrap_err();
        assert!(matches!(err, LingoError::Config(_)));
    }
}
