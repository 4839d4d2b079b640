//! Command-line stock query assistant
//!
//! ```bash
//! ask-finance "How has Tesla done over the past year?"
//! ask-finance --show-data "Apple 6 months"
//! ```

use agent_finance::config::FinanceConfigBuilder;
use agent_finance::presentation::ReportRenderer;
use agent_finance::{ConsoleRenderer, FinanceAssistant, FinanceConfig};
use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "ask-finance")]
#[command(about = "Ask a question about a stock in plain English", long_about = None)]
struct Args {
    /// Free-text query, e.g. "Show me Apple over the past 6 months"
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,

    /// Base URL of the dispatch endpoint [default: $FINANCE_SERVER_URL]
    #[arg(long)]
    server_url: Option<String>,

    /// Chat model used for extraction and analysis [default: $GROQ_MODEL]
    #[arg(long)]
    model: Option<String>,

    /// Also print the fetched quote and price history as tables
    #[arg(long)]
    show_data: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    agent_utils::load_dotenv();
    agent_utils::init_tracing("warn,agent_finance=info");

    let args = Args::parse();
    let renderer = ConsoleRenderer::new(args.show_data);

    let assistant = match build_assistant(&args) {
        Ok(assistant) => assistant,
        Err(e) => {
            eprintln!("❌ Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let query = args.query.join(" ");
    debug!("Query: {}", query);

    let interpretation = match assistant.interpret(&query).await {
        Ok(interpretation) => interpretation,
        Err(e) => {
            eprintln!("{}", renderer.render_error(&e));
            return ExitCode::FAILURE;
        }
    };
    print!("{}", renderer.render_interpretation(&interpretation));

    match assistant.complete(interpretation).await {
        Ok(report) => {
            print!("{}", renderer.render_body(&report));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", renderer.render_error(&e));
            ExitCode::FAILURE
        }
    }
}

fn build_assistant(args: &Args) -> anyhow::Result<FinanceAssistant> {
    let config = apply_overrides(args, FinanceConfigBuilder::from_env()?)?;
    FinanceAssistant::from_config(&config).context("failed to initialise the assistant")
}

/// Flags win over the environment; validation runs once on the merged values
fn apply_overrides(
    args: &Args,
    mut builder: FinanceConfigBuilder,
) -> agent_finance::Result<FinanceConfig> {
    if let Some(url) = &args.server_url {
        builder = builder.server_url(url.as_str());
    }
    if let Some(model) = &args.model {
        builder = builder.model(model.as_str());
    }
    builder.build()
}
