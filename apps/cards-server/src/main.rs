use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use api_ingress::{shutdown::shutdown_signal, ApiIngress, ApiIngressConfig};
use cards::{CardsModule, StoreKind};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const INGRESS_MODULE: &str = "api_ingress";

/// Cards Server - REST API over a playing-card document collection
#[derive(Parser)]
#[command(name = "cards-server")]
#[command(about = "Cards Server - REST API over a playing-card collection")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory store instead of MongoDB
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration and store connectivity
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Cards Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, &args).await,
        Commands::Check => check_config(config, &args).await,
    }
}

fn store_kind(args: &CliArgs) -> StoreKind {
    if args.mock {
        StoreKind::Memory
    } else {
        StoreKind::Mongo
    }
}

fn bind_addr(config: &AppConfig) -> Result<SocketAddr> {
    let ip: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server.host '{}'", config.server.host))?;
    Ok(SocketAddr::new(ip, config.server.port))
}

async fn run_server(config: AppConfig, args: &CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let addr = bind_addr(&config)?;
    let ingress_cfg: ApiIngressConfig = config.module_config(INGRESS_MODULE)?;
    let cards = CardsModule::init(&config, store_kind(args)).await?;

    let ingress = ApiIngress::new(ingress_cfg);
    let router = ingress.build_router(cards.router());

    ingress
        .serve(router, addr, shutdown_signal())
        .await?;

    tracing::info!("Cards Server stopped");
    Ok(())
}

async fn check_config(config: AppConfig, args: &CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    bind_addr(&config)?;
    let _: ApiIngressConfig = config.module_config(INGRESS_MODULE)?;
    // Opening the store pings it
    CardsModule::init(&config, store_kind(args)).await?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
