//! txnview main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::runtime::Runtime;
use txnview_config::{Config, ConfigError, StaleResultPolicy};
use txnview_core::Reconciler;
use txnview_fixtures::FixtureApi;
use txnview_shell::{Renderer, Shell};

#[derive(Parser, Debug)]
#[command(name = "txnview")]
#[command(version = "0.1.0")]
#[command(about = "Browse transactions, filtered by employee or paged in full", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Fixture file, overriding `fixtures.path`
    #[arg(short, long)]
    fixtures: Option<PathBuf>,

    /// Read commands from a file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Stale fetch result handling, overriding `reconciler.stale_results`
    #[arg(long)]
    stale_results: Option<StaleResultPolicy>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

/// Config file (or defaults) with command-line overrides applied
fn load_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = Config::load_or_default(&args.config)?;
    if let Some(path) = &args.fixtures {
        config.fixtures.path = path.clone();
    }
    if let Some(policy) = args.stale_results {
        config.reconciler.stale_results = policy;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = load_config(&args).map_err(|e| {
        eprintln!("{}", e.to_details());
        anyhow::Error::new(e).context(format!("Failed to load configuration from {}", args.config.display()))
    })?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.clone())).init();
    log::info!(
        "Config loaded: fixtures={}, page_size={}, stale_results={}",
        config.fixtures.path.display(),
        config.fixtures.page_size,
        config.reconciler.stale_results
    );

    let rt = Runtime::new()?;
    rt.block_on(async {
        let api = FixtureApi::from_config(&config.fixtures)
            .await
            .with_context(|| format!("Failed to load fixtures from {}", config.fixtures.path.display()))?;

        let reconciler = Reconciler::new(Arc::new(api), config.reconciler.clone());
        let renderer = Renderer::new(config.display.clone());

        match args.script {
            Some(path) => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .with_context(|| format!("Failed to open script {}", path.display()))?;
                let mut shell = Shell::new(reconciler, renderer, std::io::stdout());
                shell.run(BufReader::new(file)).await?;
            }
            None => {
                println!("Type `help` for commands.");
                let mut shell = Shell::new(reconciler, renderer, std::io::stdout()).interactive(true);
                shell.run(BufReader::new(tokio::io::stdin())).await?;
            }
        }

        Ok::<(), anyhow::Error>(())
    })
}
