use thiserror::Error;

#[derive(Error, Debug)]
pub enum LingoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("missing {key} in [{section}] section")]
    MissingCredential { section: String, key: String },

    #[error("bad engine name: {0}")]
    UnknownEngine(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl LingoError {
    /// Errors that mean "nothing to show" rather than a broken setup
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Json(_) | Self::Transport(_) | Self::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LingoError>;
