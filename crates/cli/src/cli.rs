use std::path::PathBuf;

use clap::Parser;

/// Chat with your documents from the terminal.
///
/// Point it at files or a URL, then ask questions in a REPL. Answers are
/// grounded in the indexed content.
#[derive(Parser, Debug)]
#[command(name = "docsage", about = "Conversational QA over your documents")]
pub struct CliArgs {
    /// Document to index (.pdf, .docx, .txt, .md); repeat for several
    #[arg(long = "file", short = 'f')]
    pub files: Vec<PathBuf>,

    /// Web page to fetch and index
    #[arg(long)]
    pub url: Option<String>,

    /// API key (overrides the GEMINI_API_KEY env var)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Backend override for embeddings and generation: gemini or ollama
    #[arg(long)]
    pub provider: Option<String>,

    /// Generation model to use instead of the configured one
    #[arg(long)]
    pub model: Option<String>,
}
