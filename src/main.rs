use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kbq::{
    AnswerResponse, BackendClientBuilder, DispatchOutcome, QueryController, RenderTarget,
};

/// kbq - terminal client for the enterprise architecture knowledge base
#[derive(Parser)]
#[command(name = "kbq")]
#[command(about = "Ask questions against the enterprise architecture knowledge base")]
#[command(version)]
struct Cli {
    /// Base URL of the query service (overrides KBQ_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Ask a single question and print the answer
    Ask(AskCommand),
}

/// Ask a single question
#[derive(Parser)]
struct AskCommand {
    /// The question to ask
    #[arg(value_name = "QUERY")]
    query: String,
}

fn main() {
    // Pick up KBQ_API_URL from a local .env, if one exists
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Ask(cmd)) => handle_ask(cmd, cli.api_url.clone()),
        None => kbq::tui::run(cli.api_url.clone()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Renders dispatch output as plain stdout text for the one-shot command.
struct StdoutRenderer;

impl RenderTarget for StdoutRenderer {
    fn render_loading(&mut self) {
        println!("Searching the knowledge base...");
    }

    fn render_results(&mut self, query: &str, response: &AnswerResponse) {
        println!();
        println!("Question: {query}");
        println!();
        println!("{}", response.answer());
        println!();
        if response.sources().is_empty() {
            println!("Sources: (none)");
        } else {
            println!("Sources: {}", response.sources().join(", "));
        }
        println!("Confidence: {}%", response.confidence_percent());
    }

    fn render_error(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Handles the ask command: one dispatch, answer printed to stdout.
fn handle_ask(cmd: &AskCommand, api_url: Option<String>) -> Result<()> {
    if cmd.query.trim().is_empty() {
        anyhow::bail!("Query cannot be empty");
    }

    let mut builder = BackendClientBuilder::new();
    if let Some(url) = api_url {
        builder = builder.base_url(url);
    }
    let client = builder.build().context("Failed to create backend client")?;

    let mut controller = QueryController::new(Arc::new(client));
    let mut renderer = StdoutRenderer;

    match controller.dispatch(&cmd.query, &mut renderer) {
        DispatchOutcome::Answered => Ok(()),
        DispatchOutcome::Ignored => anyhow::bail!("Query cannot be empty"),
        DispatchOutcome::Failed => anyhow::bail!("Query failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbq::{BackendClientTrait, BackendError, FallbackResponder};
    use std::time::Duration;

    struct OfflineBackend;

    impl BackendClientTrait for OfflineBackend {
        fn query(&self, _query: &str) -> Result<AnswerResponse, BackendError> {
            Err(BackendError::Http { status: 503 })
        }
    }

    #[test]
    fn empty_query_is_rejected_before_dispatch() {
        let cmd = AskCommand {
            query: "   ".to_string(),
        };
        let result = handle_ask(&cmd, None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn stdout_renderer_drives_a_full_dispatch() {
        let mut controller = QueryController::with_fallback(
            Arc::new(OfflineBackend),
            FallbackResponder::with_delay(Duration::ZERO),
        );
        let mut renderer = StdoutRenderer;

        let outcome = controller.dispatch("what are the principles?", &mut renderer);
        assert_eq!(outcome, DispatchOutcome::Answered);
    }
}
