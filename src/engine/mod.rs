// Pluggable translation engines
//
// Every backend implements `Engine` and is registered by name in `ENGINES`:
// - google: unauthenticated GET, positional nested-array response
// - baidu: signed form POST, flat `trans_result` response
//
// To add a backend, implement `Engine` in its own module and add a
// constructor to the table below.

pub mod baidu;
pub mod google;

use async_trait::async_trait;
use tracing::warn;

pub use baidu::BaiduEngine;
pub use google::GoogleEngine;

use crate::config::ConfigBag;
use crate::error::{LingoError, Result};
use crate::translation::Translation;

/// A translation backend
#[async_trait]
pub trait Engine: Send + Sync {
    /// Registry name, also recorded in every result
    fn name(&self) -> &'static str;

    /// Translate `text`; `None` or `auto` languages are inferred.
    ///
    /// `Ok(None)` means the backend produced nothing usable (network
    /// failure, timeout or an unexpected response). `Err` is reserved for
    /// configuration problems the caller has to fix.
    async fn translate(
        &mut self,
        config: &ConfigBag,
        source_lang: Option<&str>,
        target_lang: Option<&str>,
        text: &str,
    ) -> Result<Option<Translation>>;
}

type EngineConstructor = fn() -> Box<dyn Engine>;

fn new_google() -> Box<dyn Engine> {
    Box::new(GoogleEngine::new())
}

fn new_baidu() -> Box<dyn Engine> {
    Box::new(BaiduEngine::new())
}

static ENGINES: &[(&str, EngineConstructor)] = &[
    ("google", new_google as EngineConstructor),
    ("baidu", new_baidu as EngineConstructor),
];

/// Factory for creating engines by name
pub struct EngineFactory;

impl EngineFactory {
    pub fn create(name: &str) -> Result<Box<dyn Engine>> {
        let wanted = name.trim().to_lowercase();
        ENGINES
            .iter()
            .find(|(n, _)| *n == wanted)
            .map(|(_, constructor)| constructor())
            .ok_or_else(|| LingoError::UnknownEngine(name.to_string()))
    }

    pub fn names() -> Vec<&'static str> {
        ENGINES.iter().map(|(n, _)| *n).collect()
    }
}

/// Turn transport and decoding failures into "no result"
fn degrade<T>(engine: &str, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_recoverable() => {
            warn!("{} translation unavailable: {}", engine, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
