use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    snipbot_gateway::AppState,
    snipbot_slack::TokenStore,
    tracing::info,
    tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "snipbot", about = "snipbot — GitHub file excerpts for Slack")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,

    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Explicit config file (overrides discovery).
    #[arg(long, global = true, env = "SNIPBOT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server (default when no subcommand is provided).
    Serve,
    /// Validate configuration and exit.
    Check,
    /// List workspaces that have installed the bot.
    Workspaces,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A local .env is a convenience, not a requirement.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_telemetry(&cli);

    let mut config = match &cli.config {
        Some(path) => snipbot_config::load_config(path)?,
        None => snipbot_config::discover_and_load(),
    };
    if let Some(ref bind) = cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            config.validate()?;
            info!(version = env!("CARGO_PKG_VERSION"), "starting snipbot");
            snipbot_gateway::serve(AppState::new(config)).await
        },
        Commands::Check => {
            config.validate()?;
            println!("configuration OK");
            Ok(())
        },
        Commands::Workspaces => {
            let mut teams = TokenStore::new().list();
            teams.sort();
            if teams.is_empty() {
                println!("no workspaces installed");
            } else {
                for team in teams {
                    println!("{team}");
                }
            }
            Ok(())
        },
    }
}
