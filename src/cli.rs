use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source language code or name
    #[arg(long, default_value = "auto")]
    pub from: String,

    /// Target language code or name
    #[arg(long, default_value = "auto")]
    pub to: String,

    /// Show the phonetic transcription when available
    #[arg(long)]
    pub phonetic: bool,

    /// Use this engine instead of choosing by proxy availability
    #[arg(short, long)]
    pub engine: Option<String>,

    /// Text to translate
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub text: Vec<String>,
}

impl Args {
    /// Query words joined by single spaces
    pub fn query(&self) -> Option<String> {
        if self.text.is_empty() {
            None
        } else {
            Some(self.text.join(" "))
        }
    }
}
