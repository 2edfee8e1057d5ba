use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use engine::{BillStore, ResiduePolicy};
use server::{ServerState, mapping};
use settings::{DEFAULT_CONFIG_PATH, Settings};

mod settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Parser)]
#[command(name = "tabsplit", version, about = "Split a bill between friends")]
struct Cli {
    /// Settings file, with or without the `.toml` extension.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Split the bill in a JSON file and print the result.
    Split { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let settings = Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tabsplit={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings).await,
        Command::Split { file } => split(&file, settings.app.residue_policy),
    }
}

async fn serve(settings: Settings) -> Result<(), BoxError> {
    let store = BillStore::open(&settings.storage.path)?;
    tracing::info!("Bills stored in {}", store.path().display());

    let state = ServerState::new(store, settings.app.residue_policy);
    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|err| {
        tracing::error!("failed to bind server listener on {addr}: {err}");
        err
    })?;

    server::run_with_listener(state, Path::new(&settings.server.static_dir), listener).await?;
    Ok(())
}

fn split(file: &Path, residue: ResiduePolicy) -> Result<(), BoxError> {
    let content = std::fs::read_to_string(file)?;
    let payload: api_types::split::BillInput = serde_json::from_str(&content)?;
    let input = mapping::bill_input(payload)?;
    let output = engine::split_bill_with(&input, residue)?;
    tracing::debug!(people = output.items.len(), "bill split");

    println!(
        "{}",
        serde_json::to_string_pretty(&mapping::bill_output(output))?
    );
    Ok(())
}
