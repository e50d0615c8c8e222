mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::backup::get_store_path;

#[derive(Parser)]
#[command(name = "mbk")]
#[command(author, version, about = "Supermarket bookkeeping backup CLI", long_about = None)]
pub struct Cli {
    /// Override the store file path (default: XDG data directory)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every collection to a timestamped backup file
    Export {
        /// Output directory (default: backups/ under the data directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Restore a backup file, replacing the collections it contains
    Import {
        /// Backup file to restore
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show per-collection record counts
    Status,
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketbook=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> miette::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let store_path = cli.store.unwrap_or_else(get_store_path);

    match cli.command {
        Some(Commands::Export { out }) => {
            let output = commands::backup::export(&store_path, out).await?;
            println!("{}", output);
        }
        Some(Commands::Import { file, yes }) => {
            let output = commands::backup::import(&store_path, &file, yes).await?;
            println!("{}", output);
        }
        Some(Commands::Status) => {
            let output = commands::backup::status(&store_path).await?;
            println!("{}", output);
        }
        None => {
            // Show help when no command provided
            let _ = Cli::parse_from(["mbk", "--help"]);
        }
    }

    Ok(())
}
