//! Command-line driver: configuration, engine selection, translation and output.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::Args;
use crate::config::Config;
use crate::engine::EngineFactory;
use crate::error::Result;
use crate::logging;
use crate::proxy;
use crate::render;

/// How a run ended; each variant has its own exit code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Translated,
    MissingConfigFile(PathBuf),
    Usage,
    UnknownEngine(String),
    NoResult,
    /// Configuration problem such as a missing credential
    Failed(String),
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Translated => 0,
            Self::MissingConfigFile(_) | Self::Failed(_) => 1,
            Self::Usage => 2,
            Self::UnknownEngine(_) => 3,
            Self::NoResult => 4,
        }
    }
}

/// Logs live next to the configuration file
pub fn log_dir_for(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|dir| dir.join("log"))
        .unwrap_or_else(|| PathBuf::from("log"))
}

pub async fn run(args: &Args) -> Outcome {
    let Some(config_path) = args.config.clone().or_else(Config::default_path) else {
        let message = "unable to locate the user configuration directory, pass --config";
        eprintln!("error: {}", message);
        return Outcome::Failed(message.to_string());
    };

    let log_dir = log_dir_for(&config_path);
    run_with(args, &config_path, &log_dir).await
}

/// Run against an explicit config file and log directory. Nothing is
/// written to disk until the config file is known to exist.
pub async fn run_with(args: &Args, config_path: &Path, log_dir: &Path) -> Outcome {
    if !config_path.exists() {
        println!(
            "set an initialization file at `{}` first!",
            config_path.display()
        );
        return Outcome::MissingConfigFile(config_path.to_path_buf());
    }

    let _guard = logging::setup_logging(args.verbose, log_dir);

    match translate_query(args, config_path).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {}", e);
            Outcome::Failed(e.to_string())
        }
    }
}

async fn translate_query(args: &Args, config_path: &Path) -> Result<Outcome> {
    let config = Config::from_file(config_path)?;

    let Some(text) = args.query() else {
        println!("usage: lingo [--from=xx] [--to=xx] [--phonetic] [--engine=name] text");
        println!("engines: {:?}", EngineFactory::names());
        return Ok(Outcome::Usage);
    };

    let (selected, proxy_enabled) = proxy::select_engine(&config.default_section()).await;
    let engine_name = args.engine.clone().unwrap_or_else(|| selected.to_string());

    let mut engine = match EngineFactory::create(&engine_name) {
        Ok(engine) => engine,
        Err(e) => {
            println!("{}", e);
            return Ok(Outcome::UnknownEngine(engine_name));
        }
    };

    let mut bag = config.bag_for(engine.name());
    if !bag.contains("proxy-enabled") {
        bag.set_proxy_enabled(proxy_enabled);
    }
    debug!("Using {} (proxy enabled: {})", engine.name(), bag.proxy_enabled());

    let translation = engine
        .translate(&bag, Some(args.from.as_str()), Some(args.to.as_str()), &text)
        .await?;

    let Some(translation) = translation else {
        return Ok(Outcome::NoResult);
    };

    for block in render::render(&translation, args.phonetic) {
        println!("{}", block);
    }
    info!("Translation completed with {}", translation.engine);
    Ok(Outcome::Translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("lingo").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::Translated.exit_code(), 0);
        assert_eq!(Outcome::Failed(String::new()).exit_code(), 1);
        assert_eq!(Outcome::MissingConfigFile(PathBuf::new()).exit_code(), 1);
        assert_eq!(Outcome::Usage.exit_code(), 2);
        assert_eq!(Outcome::UnknownEngine("x".into()).exit_code(), 3);
        assert_eq!(Outcome::NoResult.exit_code(), 4);
    }

    #[test]
    fn test_log_dir_for() {
        assert_eq!(
            log_dir_for(Path::new("/etc/translator/config.toml")),
            PathBuf::from("/etc/translator/log")
        );
    }

    #[tokio::test]
    async fn test_missing_config_reported_before_logging() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = temp.child("config.toml");
        let log_dir = temp.child("log");

        let outcome = run_with(&args(&["hello"]), config.path(), log_dir.path()).await;

        assert_eq!(outcome, Outcome::MissingConfigFile(config.path().to_path_buf()));
        assert!(!log_dir.path().exists());
    }

    #[tokio::test]
    async fn test_unusable_log_dir_does_not_hide_config_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = temp.child("config.toml");
        config.write_str("[default]\n").unwrap();
        let log_dir = temp.child("log");
        log_dir.write_str("a file, not a directory").unwrap();

        let outcome = run_with(
            &args(&["--engine", "baidu", "hello"]),
            config.path(),
            log_dir.path(),
        )
        .await;

        assert_eq!(
            outcome,
            Outcome::Failed("missing appid in [baidu] section".to_string())
        );
    }

    #[tokio::test]
    async fn test_usage_and_unknown_engine() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = temp.child("config.toml");
        config.write_str("[default]\n").unwrap();
        let log_dir = temp.child("log");

        let outcome = run_with(&args(&[]), config.path(), log_dir.path()).await;
        assert_eq!(outcome, Outcome::Usage);

        let outcome = run_with(&args(&["-e", "bing", "hello"]), config.path(), log_dir.path()).await;
        assert_eq!(outcome, Outcome::UnknownEngine("bing".to_string()));
    }
}
