use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};

use lingo::config::{Config, ConfigBag};
use lingo::engine::{BaiduEngine, Engine, EngineFactory, GoogleEngine};
use lingo::error::{LingoError, Result};
use lingo::http::{HttpExecutor, RequestOptions};
use lingo::render::render;

/// Replays one canned body and records what was asked for
struct CannedExecutor {
    body: Option<String>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedExecutor {
    fn new(body: Option<&str>) -> Self {
        Self {
            body: body.map(str::to_string),
            requests: Arc::default(),
        }
    }

    /// Handle on the request log that survives boxing the executor
    fn requests(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requests)
    }

    fn reply(&mut self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.body
            .clone()
            .ok_or_else(|| LingoError::Transport("connection refused".to_string()))
    }
}

#[async_trait]
impl HttpExecutor for CannedExecutor {
    async fn get(&mut self, url: &str, _options: &RequestOptions) -> Result<String> {
        self.reply(url)
    }

    async fn post_form(
        &mut self,
        url: &str,
        _form: &[(String, String)],
        _options: &RequestOptions,
    ) -> Result<String> {
        self.reply(url)
    }
}

const CONFIG: &str = r#"
[default]
connection_timeout = 5

[google]
host = "translate.example.test"

[baidu]
appid = "A"
key = "K"
"#;

#[tokio::test]
async fn google_result_renders_definition_and_explanations() {
    let body = json!([
        [["你好", "hello", null, null, 1]],
        [["interjection", ["你好!"], [["你好!", ["Hello!"]]], "hello", 9]],
        "en", null, null,
        [["hello", null, [["你好", 1000, true, false], ["哈啰", 0, true, false]], [[0, 5]], "hello", 0, 0]]
    ])
    .to_string();

    let config = Config::parse(CONFIG).unwrap();
    let mut engine = GoogleEngine::with_executor(Box::new(CannedExecutor::new(Some(&body))));
    let translation = engine
        .translate(&config.bag_for("google"), Some("english"), Some("chinese"), "hello")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(translation.source_lang, "en");
    assert_eq!(translation.target_lang, "zh-CN");
    assert_eq!(translation.detail, None);
    assert_eq!(
        render(&translation, false),
        vec![
            "hello".to_string(),
            "你好".to_string(),
            "[i] 你好!;".to_string(),
            "-".repeat(10),
            " * 哈啰".to_string(),
        ]
    );
}

#[tokio::test]
async fn baidu_result_renders_translation() {
    let body = r#"{"from":"zh","to":"en","trans_result":[{"src":"你好世界","dst":"Hello World"}]}"#;

    let config = Config::parse(CONFIG).unwrap();
    let mut engine = BaiduEngine::with_executor(Box::new(CannedExecutor::new(Some(body))));
    let translation = engine
        .translate(&config.bag_for("baidu"), None, None, "你好世界")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(translation.source_lang, "zh-CN");
    assert_eq!(translation.target_lang, "en-US");
    assert_eq!(render(&translation, true), vec!["你好世界", "Hello World"]);
}

#[tokio::test]
async fn baidu_without_credentials_is_fatal() {
    let config = Config::parse("[default]\nproxy = \"127.0.0.1:1\"\n").unwrap();
    let executor = CannedExecutor::new(Some("{}"));
    let requests = executor.requests();
    let mut engine = BaiduEngine::with_executor(Box::new(executor));

    let err = engine
        .translate(&config.bag_for("baidu"), None, None, "hello")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "missing appid in [baidu] section");
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_backend_yields_no_result() {
    let executor = CannedExecutor::new(None);
    let requests = executor.requests();
    let mut engine = GoogleEngine::with_executor(Box::new(executor));
    let result = engine
        .translate(&ConfigBag::new(), None, None, "hello")
        .await
        .unwrap();
    assert!(result.is_none());
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[test]
fn registry_rejects_unknown_names() {
    for name in EngineFactory::names() {
        assert_eq!(EngineFactory::create(name).unwrap().name(), name);
    }
    assert!(matches!(
        EngineFactory::create("yandex").err(),
        Some(LingoError::UnknownEngine(_))
    ));
}
