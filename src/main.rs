//! ArcheBlow operations CLI.
//!
//! Inspects resolved API keys and sends test notifications through the same
//! services the desktop application builds at startup.
//!
//! ```text
//!   ARCHEBLOW_API_KEYS_FILE ─┐     ┌──────────────┐
//!   api_keys.env / .env     ─┼────▶│ SecretStore  │──▶ keys / get
//!   *_API_KEY env vars      ─┘     └──────────────┘
//!
//!   report ──▶ format ──▶ EventBuffer ──▶ WebhookDispatcher ──▶ ARCHEBLOW_MONITORING_WEBHOOK
//! ```

use std::path::PathBuf;
use clap::{Parser, Subcommand};

use archeblow_ops::config::load_startup_config;
use archeblow_ops::monitoring::event::details_from;
use archeblow_ops::monitoring::{Details, Level, Network};
use archeblow_ops::observability::logging::init_logging;
use archeblow_ops::secrets::registry::{self, SERVICE_KEYS};
use archeblow_ops::{SecretValue, Services};

#[derive(Parser)]
#[command(name = "archeblow-ops")]
#[command(about = "Inspect API key resolution and send monitoring notifications", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered services with masked keys and their origin
    Keys,
    /// Resolve a single secret by name
    Get {
        name: String,
        /// Print the raw value instead of a masked one
        #[arg(long)]
        reveal: bool,
    },
    /// Report an event through the notification pipeline
    Report {
        #[arg(short, long, default_value = "error")]
        level: Level,
        #[arg(short, long)]
        source: String,
        #[arg(short, long)]
        message: String,
        /// JSON object attached as event details
        #[arg(short, long)]
        details: Option<String>,
    },
    /// Place a wallet address under observation and announce it
    Watch {
        address: String,
        #[arg(short, long)]
        network: Network,
        #[arg(short, long, default_value_t = 7)]
        days: u32,
        #[arg(short, long)]
        comment: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_startup_config(cli.config.as_deref())?;
    init_logging(&config.observability)?;
    config.log_summary(cli.config.as_deref());

    let services = Services::bootstrap(&config)?;

    match cli.command {
        Commands::Keys => {
            let snapshot = services.secrets().snapshot();
            for svc in SERVICE_KEYS {
                let origin = snapshot
                    .origin(svc.env_var)
                    .map(|layer| layer.as_str())
                    .unwrap_or("undefined");
                println!(
                    "{:<16} {:<26} {:<24} {:<14} {}",
                    svc.service_id,
                    svc.display_name,
                    svc.env_var,
                    origin,
                    registry::mask(snapshot.get(svc.env_var)),
                );
            }
        }
        Commands::Get { name, reveal } => match services.resolve_secret(&name) {
            None => println!("undefined"),
            Some(SecretValue::NotApplicable) => println!("N/A (not applicable)"),
            Some(value) if reveal => println!("{}", value.as_str().unwrap_or_default()),
            Some(value) => println!("{}", registry::mask(Some(&value))),
        },
        Commands::Report {
            level,
            source,
            message,
            details,
        } => {
            let details = match details {
                Some(raw) => details_from(&serde_json::from_str::<serde_json::Value>(&raw)?)?,
                None => Details::new(),
            };
            let report = services.report_error(level, &source, &message, details).await;
            println!("{}", serde_json::to_string_pretty(report.event.as_ref())?);
            println!("dispatch: {}", report.outcome);
        }
        Commands::Watch {
            address,
            network,
            days,
            comment,
        } => {
            let (watch, report) = services
                .notifications()
                .schedule_watch(&address, network, days, comment.as_deref())
                .await;
            println!("watching {} on {} until {}", watch.address, watch.network, watch.expires_at.to_rfc3339());
            println!("dispatch: {}", report.outcome);
        }
    }

    Ok(())
}
