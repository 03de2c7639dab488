mod cli;
mod terminal;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use docsage_chat::{ChatEngine, RejectReason, SubmitOutcome};
use docsage_core::{config, Config, UploadedFile};

use crate::cli::CliArgs;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    config::load_dotenv();
    let args = CliArgs::parse();
    let terminal = Terminal::new();

    let mut config = Config::from_env();
    if let Some(ref provider) = args.provider {
        config.embedding.provider = provider.clone();
        config.llm.provider = provider.clone();
    }
    if let Some(ref model) = args.model {
        config.llm.model = model.clone();
    }
    if !config.llm.is_configured() {
        anyhow::bail!("unknown provider '{}'; expected gemini or ollama", config.llm.provider);
    }
    config.log_summary();

    // The key stays in this one binding; it is passed per call and never
    // written into the config or the session.
    let credential = args
        .api_key
        .clone()
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .unwrap_or_default();

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        files.push(read_upload(path)?);
    }

    terminal.print_banner(&config.llm.provider, &config.llm.model)?;
    let mut engine = ChatEngine::new(config);

    if !files.is_empty() || args.url.is_some() {
        terminal.print_info("Indexing sources...")?;
        match engine.process(files, args.url.clone(), &credential).await {
            Ok(report) => terminal.print_info(&format!(
                "Indexed {} document(s) into {} chunk(s).",
                report.documents, report.chunks
            ))?,
            Err(e) => {
                warn!(error = %e, "Initial ingestion failed");
                terminal.print_error(&e.to_string())?;
            }
        }
    } else {
        terminal.print_info("No sources given. Use '/load <path-or-url>' to index documents.")?;
    }

    // REPL loop
    loop {
        let input = match terminal.read_input()? {
            Some(text) => text,
            None => {
                terminal.print_info("Goodbye.")?;
                break;
            }
        };

        if input.is_empty() {
            continue;
        }

        if input == "/history" {
            terminal.print_history(engine.history())?;
            continue;
        }

        if let Some(rest) = input.strip_prefix("/load ") {
            let target = rest.trim();
            let outcome = if target.starts_with("http://") || target.starts_with("https://") {
                engine.process(Vec::new(), Some(target.to_string()), &credential).await
            } else {
                match read_upload(Path::new(target)) {
                    Ok(file) => engine.process(vec![file], None, &credential).await,
                    Err(e) => {
                        terminal.print_error(&format!("{:#}", e))?;
                        continue;
                    }
                }
            };
            match outcome {
                Ok(report) => terminal.print_info(&format!(
                    "Indexed {} document(s) into {} chunk(s).",
                    report.documents, report.chunks
                ))?,
                Err(e) => {
                    warn!(error = %e, "Ingestion failed");
                    terminal.print_error(&e.to_string())?;
                }
            }
            continue;
        }

        match engine.submit(&input, &credential).await {
            SubmitOutcome::Accepted => {
                if let Some(turn) = engine.history().last() {
                    terminal.print_answer(&turn.text)?;
                }
            }
            SubmitOutcome::Rejected(reason) => {
                let msg = match reason {
                    RejectReason::Busy => "an answer is already in flight",
                    RejectReason::EmptyInput => "type a question first",
                    RejectReason::MissingCredential => {
                        "an API key is required; pass --api-key or set GEMINI_API_KEY"
                    }
                    RejectReason::SourcesPending => "process the staged sources first",
                };
                terminal.print_error(msg)?;
            }
        }
    }

    Ok(())
}

fn read_upload(path: &Path) -> Result<UploadedFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedFile::new(name, bytes))
}
