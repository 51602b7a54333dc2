//! gas-limits command line.
//!
//! Prints depth limits for one trimix mix, or serves them over HTTP.

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gas_limits::config::Config;
use gas_limits::gas::report::{build_report, render_text};
use gas_limits::gas::LimitsRequest;

/// Depth limits for a breathing gas (PO2, END, gas density on OC and CC)
#[derive(Parser, Debug)]
#[command(name = "gas-limits", version)]
#[command(args_conflicts_with_subcommands = true, arg_required_else_help = true)]
struct Cli {
    /// Trimix mix, e.g. "18/35" or "50"
    trimix: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// PO2 targets in bar, comma-separated
    #[arg(long, value_delimiter = ',')]
    po2: Option<Vec<f64>>,

    /// Gas density targets in g/l, comma-separated
    #[arg(long, value_delimiter = ',')]
    density: Option<Vec<f64>>,

    /// Rebreather set points in bar, comma-separated
    #[arg(long = "set-point", value_delimiter = ',')]
    set_points: Option<Vec<f64>>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the limits API over HTTP
    Serve {
        /// Address to listen on (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing on stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gas_limits=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;

    match cli.command {
        Some(Command::Serve { bind }) => serve(config, bind).await,
        None => {
            let Some(trimix) = cli.trimix else {
                Cli::command()
                    .error(ErrorKind::MissingRequiredArgument, "a trimix mix is required")
                    .exit();
            };
            let request = LimitsRequest {
                mix: trimix,
                po2_targets: cli.po2,
                density_targets: cli.density,
                set_points: cli.set_points,
            };

            let report = build_report(&request, &config.targets, config.limits)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render_text(&report));
            }
            Ok(())
        }
    }
}

async fn serve(config: Config, bind: Option<String>) -> anyhow::Result<()> {
    let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
    let app = gas_limits::app(config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
