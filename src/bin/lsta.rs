//! lsta: lst-advisor CLI
//!
//! Ask questions about a statistics file and check the completion service.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lst_advisor::{AnalysisMode, ResponseOrchestrator, Settings, Statistics};
use tracing::info;

/// lst-advisor CLI
#[derive(Parser)]
#[command(name = "lsta")]
#[command(version = lst_advisor::PKG_VERSION)]
#[command(about = "Answers about land surface temperature statistics")]
struct Args {
    /// Settings file (default: ~/.lst-advisor/config.toml)
    #[arg(short, long, env = "LST_ADVISOR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a question about a statistics record
    Ask {
        /// Question (or omit to read from stdin)
        question: Option<String>,
        /// JSON file with the statistics record
        #[arg(short, long)]
        stats: PathBuf,
        /// Analysis mode: technical, comprehensive or simple
        #[arg(short, long, default_value = "comprehensive")]
        mode: String,
    },

    /// Show configuration status and check the completion service
    Status,

    /// List analysis modes
    Modes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    if let Command::Modes = args.command {
        for mode in AnalysisMode::ALL {
            println!("{mode}");
        }
        return Ok(());
    }

    let settings = Settings::load(args.config.as_deref())?;
    let advisor = ResponseOrchestrator::builder().settings(&settings).build()?;

    match args.command {
        Command::Ask {
            question,
            stats,
            mode,
        } => {
            let mode: AnalysisMode = mode.parse()?;
            let question = resolve_text(question)?;
            let json = std::fs::read_to_string(&stats)
                .map_err(|e| format!("failed to read {}: {e}", stats.display()))?;
            let statistics = Statistics::from_json(&json)?;

            let response = advisor.answer(&question, &statistics, mode).await?;
            info!(
                source = response.source.as_str(),
                latency_ms = response.latency_ms,
                tokens = ?response.token_usage,
                "answered"
            );
            println!("{}", response.content);
            if response.is_fallback() {
                eprintln!("(offline answer: completion service unavailable)");
            }
        }

        Command::Status => {
            let config = advisor.validate_configuration();
            if config.ok {
                println!("configuration: ok");
            } else {
                let missing: Vec<_> = config.missing_fields.into_iter().collect();
                println!("configuration: missing {}", missing.join(", "));
            }

            let connection = advisor.test_connection().await;
            let status = if connection.ok { "reachable" } else { "unreachable" };
            println!("service: {status} ({} ms)", connection.latency_ms);
        }

        Command::Modes => unreachable!("handled above"),
    }

    Ok(())
}

/// Read the question from the argument or, failing that, from piped stdin.
fn resolve_text(arg: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(question) = arg {
        return Ok(question);
    }
    if io::stdin().is_terminal() {
        return Err("ask: no question provided (pass it as an argument or via stdin)".into());
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim().to_string())
}
