// CLI for submitting registry transactions against a local ledger

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use veriot_cli::{commands, logging, Config};

#[derive(Parser)]
#[command(name = "veriot")]
#[command(about = "VerIoT - IoT device registry and data verification ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (defaults to <config dir>/veriot/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new device
    Register {
        /// Device ID
        device_id: String,

        /// Registering party
        #[arg(short, long)]
        owner: String,

        /// Location descriptor
        #[arg(short, long)]
        location: String,
    },

    /// Check whether a device is registered
    Exists {
        /// Device ID
        device_id: String,
    },

    /// Show a registered device
    GetDevice {
        /// Device ID
        device_id: String,
    },

    /// Submit data for a registered device
    Submit {
        /// Device ID
        device_id: String,

        /// Submission timestamp
        #[arg(short, long)]
        timestamp: String,

        /// Opaque payload
        #[arg(short, long)]
        data: String,
    },

    /// Show a data record
    GetRecord {
        /// Device ID
        device_id: String,

        /// Record timestamp
        #[arg(short, long)]
        timestamp: String,
    },

    /// Verify a data record
    Verify {
        /// Device ID
        device_id: String,

        /// Record timestamp
        #[arg(short, long)]
        timestamp: String,

        /// Acting verifier
        #[arg(long)]
        verifier: String,

        /// Reject the record instead of verifying it
        #[arg(long)]
        reject: bool,
    },

    /// List every record of a device
    ListRecords {
        /// Device ID
        device_id: String,
    },

    /// Execute a transaction document (JSON, or `-` for stdin)
    Invoke {
        /// Invocation JSON, e.g. {"function":"GetDevice","deviceID":"dev-1"}
        json: String,
    },

    /// Show ledger statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path).await?;

    logging::init(&config.log_level, cli.verbose);
    tracing::debug!(config = ?config_path, backend = ?config.ledger.backend, "Configuration loaded");

    let ledger = commands::open_ledger(&config)?;

    match cli.command {
        Commands::Register {
            device_id,
            owner,
            location,
        } => commands::device::register(&ledger, &device_id, &owner, &location).await?,
        Commands::Exists { device_id } => commands::device::exists(&ledger, &device_id).await?,
        Commands::GetDevice { device_id } => commands::device::show(&ledger, &device_id).await?,
        Commands::Submit {
            device_id,
            timestamp,
            data,
        } => commands::data::submit(&ledger, &device_id, &timestamp, &data).await?,
        Commands::GetRecord {
            device_id,
            timestamp,
        } => commands::data::show(&ledger, &device_id, &timestamp).await?,
        Commands::Verify {
            device_id,
            timestamp,
            verifier,
            reject,
        } => commands::data::verify(&ledger, &device_id, &timestamp, &verifier, reject).await?,
        Commands::ListRecords { device_id } => commands::data::list(&ledger, &device_id).await?,
        Commands::Invoke { json } => commands::ledger::invoke(&ledger, &json).await?,
        Commands::Stats => commands::ledger::stats(&ledger).await?,
    }

    Ok(())
}
