use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use descale_k8s::KubeClient;

mod input;
mod scale;

use scale::RunSummary;

/// Exit code for a replica count that fails to parse
const EXIT_INVALID_INPUT: u8 = 2;
/// Exit code when the run finished but at least one patch failed
const EXIT_PARTIAL_FAILURE: u8 = 3;

/// Descale - scale every deployment in the cluster to one replica count
#[derive(Parser, Debug)]
#[command(name = "descale")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Target replica count (prompts interactively if not provided)
    #[arg(value_name = "REPLICAS")]
    replicas: Option<String>,

    /// Kubernetes context name (defaults to the current kubeconfig context)
    #[arg(long, value_name = "CONTEXT")]
    context: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing for debugging; stdout stays a clean report stream
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Resolve the target before touching the cluster
    let raw = match &args.replicas {
        Some(raw) => raw.clone(),
        None => match input::prompt_target() {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error: failed to read input: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    let target = match input::parse_target(&raw) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };

    match run_app(&args, target).await {
        Ok(summary) if summary.failed > 0 => ExitCode::from(EXIT_PARTIAL_FAILURE),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_app(args: &Args, target: i32) -> Result<RunSummary> {
    let client = KubeClient::new(args.context.as_deref()).await?;

    let summary = scale::scale_all(&client, target).await?;
    println!("Done: {summary}");

    Ok(summary)
}
