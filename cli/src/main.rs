use std::process::ExitCode;

use clap::Parser;
use fairscore_collector::{Collector, GithubClient};
use fairscore_report::{fontdb, system_fonts, OutputFormat, Reporter};
use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

mod args;
mod driver;

use args::Args;

#[derive(Deserialize)]
struct Env {
    github_token: Option<String>,
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    if let Err(e) = init_tracing() {
        eprintln!("error: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let env = envy::from_env::<Env>()?;
    let config = args.validate()?;

    std::fs::create_dir_all(&config.output_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create output directory {}: {e}",
            config.output_dir.display()
        )
    })?;

    let fontdb = if config.formats.contains(&OutputFormat::Chart)
        || config.formats.contains(&OutputFormat::Html)
    {
        system_fonts()
    } else {
        std::sync::Arc::new(fontdb::Database::new())
    };
    let reporter = Reporter::new(config.formats.clone(), config.policy, fontdb);

    let client = GithubClient::new(args.token.or(env.github_token))?;
    let collector = Collector::new(&client);

    info!(
        "Scoring {} repositories with the {} policy",
        config.repos.len(),
        config.policy
    );
    let summary = driver::run(&config, &collector, &reporter).await;

    if !summary.failed.is_empty() {
        error!("Failed repositories: {}", summary.failed.join(", "));
    }
    Ok(if summary.total_written {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
