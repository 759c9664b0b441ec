//! Stockbridge CLI - trade tokenized stocks in plain language.
//!
//! Hosts the pipeline for a terminal user: settings come from the
//! environment and the config file, the model is an OpenAI-compatible
//! endpoint, and the completion callback prints to stdout.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

mod config;
mod error;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use stockbridge::prelude::*;
use stockbridge::settings::PRIVATE_KEY;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, ConfigError, config_path, init_config, load_config_from};
use crate::error::{CliError, Result};

/// Stockbridge - natural-language stock trading on EVM networks
#[derive(Parser)]
#[command(name = "stockbridge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "STOCKBRIDGE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init(InitArgs),

    /// List configured networks
    Networks,

    /// Show the signing account address
    Address,

    /// Buy shares paying the native token, e.g. "buy 5 ACME for 2 AVAX"
    Mint(RequestArgs),

    /// Sell shares, e.g. "sell 3 ACME"
    Redeem(RequestArgs),

    /// Buy shares paying USDC on the stablecoin network
    MintUsdc(RequestArgs),

    /// Show the native and stablecoin balances
    Balance,

    /// Show the collateral-adjusted USD rate of the native token
    Rate,

    /// Quote the stock named in TEXT in USD, e.g. "price of ACME"
    Price(RequestArgs),

    /// Show share holdings, or the holding of the stock named in TEXT
    Holdings(HoldingsArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the init command
#[derive(Args)]
struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    force: bool,
}

/// A trading request in plain language
#[derive(Args)]
struct RequestArgs {
    /// Request text
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,
}

/// Arguments for the holdings command
#[derive(Args)]
struct HoldingsArgs {
    /// Text naming a stock
    #[arg(num_args = 0..)]
    text: Vec<String>,
}

/// Arguments for the config command
#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "stockbridge={level},stockbridge_cli={level},{}",
            if verbosity >= 3 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let path = cli.config.unwrap_or_else(config_path);
    match cli.command {
        Commands::Init(args) => cmd_init(args, &path).await,
        Commands::Config(args) => cmd_config(args, &path).await,
        Commands::Networks => cmd_networks(&load_config_from(&path).await?),
        Commands::Address => cmd_address(&load_config_from(&path).await?),
        Commands::Mint(args) => {
            cmd_request(&load_config_from(&path).await?, "SEND_MINT_REQUEST", &args).await
        }
        Commands::Redeem(args) => {
            cmd_request(&load_config_from(&path).await?, "SEND_REDEEM_REQUEST", &args).await
        }
        Commands::MintUsdc(args) => {
            let config = load_config_from(&path).await?;
            cmd_request(&config, "SEND_CROSS_CHAIN_MINT_REQUEST", &args).await
        }
        Commands::Balance => cmd_balance(&load_config_from(&path).await?).await,
        Commands::Rate => cmd_rate(&load_config_from(&path).await?).await,
        Commands::Price(args) => cmd_price(&load_config_from(&path).await?, &args).await,
        Commands::Holdings(args) => cmd_holdings(&load_config_from(&path).await?, &args).await,
    }
}

async fn cmd_init(args: InitArgs, path: &Path) -> Result<()> {
    if path.exists() && !args.force {
        println!("Configuration already exists at: {}", path.display());
        println!("Use --force to overwrite.");
        return Ok(());
    }

    init_config(path).await?;

    println!("Configuration created: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. export {PRIVATE_KEY}=<hex key>");
    println!("  2. export OPENAI_API_KEY=<key>");
    println!("  3. stockbridge mint \"buy 1 share of ACME for 0.5 AVAX\"");

    Ok(())
}

fn registry(config: &CliConfig) -> ChainRegistry {
    ChainRegistry::from_settings(&config.networks.evm, &config.settings())
}

fn wallet(config: &CliConfig) -> Result<EvmWallet> {
    Ok(EvmWallet::from_settings(
        &config.settings(),
        registry(config),
        Arc::new(HttpConnector),
    )?)
}

fn runtime(config: &CliConfig) -> Result<AgentRuntime> {
    let settings = config.settings();
    let provider = OpenAI::new(OpenAIConfig::from_settings(&settings)?)?;
    Ok(AgentRuntime::new(
        Arc::new(settings),
        config.pipeline(),
        Arc::new(provider),
    )?)
}

fn cmd_networks(config: &CliConfig) -> Result<()> {
    let roles = &config.networks.roles;
    for network in registry(config).iter() {
        let mut tags = Vec::new();
        if network.name() == roles.native_settlement {
            tags.push(NetworkRole::NativeSettlement.to_string());
        }
        if network.name() == roles.stablecoin_settlement {
            tags.push(NetworkRole::StablecoinSettlement.to_string());
        }
        println!(
            "{:<18} {:>10}  {}{}{}",
            network.name(),
            network.chain_id(),
            network.rpc_url(),
            if network.is_custom_rpc() { " (custom)" } else { "" },
            if tags.is_empty() {
                String::new()
            } else {
                format!("  [{}]", tags.join(", "))
            },
        );
    }
    Ok(())
}

fn cmd_address(config: &CliConfig) -> Result<()> {
    println!("{}", wallet(config)?.address());
    Ok(())
}

async fn cmd_request(config: &CliConfig, action: &str, args: &RequestArgs) -> Result<()> {
    let runtime = runtime(config)?;
    let text = args.text.join(" ");

    let callback: Callback = Box::new(|payload| println!("{}", payload.text));
    match runtime.dispatch(action, &text, Some(callback)).await? {
        ActionOutcome::Completed(result) => {
            tracing::info!(tx_hash = %result.tx_hash, network = %result.network, "done");
            Ok(())
        }
        ActionOutcome::NoIntent => {
            println!("No trade request recognized in: {text}");
            Ok(())
        }
        ActionOutcome::Failed(failure) => {
            if failure.stage == FailureStage::Initialization {
                println!("{}", failure.text());
            }
            if let Some(approval) = failure.approval_tx {
                println!("Approval {approval} was already sent; the allowance remains granted.");
            }
            Err(CliError::ActionFailed(failure.message))
        }
    }
}

fn query(config: &CliConfig) -> Result<QueryService> {
    query_on(config, NetworkRole::NativeSettlement)
}

fn query_on(config: &CliConfig, role: NetworkRole) -> Result<QueryService> {
    let wallet = wallet(config)?;
    let pipeline = config.pipeline();
    let network = pipeline.networks.roles.network(role);
    let deployments = pipeline.contracts.resolve().map_err(stockbridge::Error::from)?;
    let symbol = EvmNetwork::from_name(network).map_or("ETH", EvmNetwork::native_symbol);
    Ok(
        QueryService::new(wallet.read_client(network)?, wallet.address(), deployments)
            .with_native_symbol(symbol),
    )
}

async fn cmd_balance(config: &CliConfig) -> Result<()> {
    let balance = query(config)?.native_balance().await?;
    println!("{balance}");

    match query_on(config, NetworkRole::StablecoinSettlement)?
        .stablecoin_balance()
        .await
    {
        Ok(stablecoin) => println!("{stablecoin}"),
        Err(e) => tracing::warn!("stablecoin balance unavailable: {e}"),
    }
    Ok(())
}

async fn cmd_rate(config: &CliConfig) -> Result<()> {
    println!("{}", query(config)?.native_usd_rate().await?);
    Ok(())
}

async fn cmd_price(config: &CliConfig, args: &RequestArgs) -> Result<()> {
    let feed = TwelveData::new(TwelveDataConfig::from_settings(&config.settings())?)?;
    let text = args.text.join(" ");
    match runtime(config)?.stock_price(&feed, &text).await? {
        Some(price) => println!("{price}"),
        None => println!("No stock recognized in: {text}"),
    }
    Ok(())
}

async fn cmd_holdings(config: &CliConfig, args: &HoldingsArgs) -> Result<()> {
    if args.text.is_empty() {
        println!("{}", query(config)?.holdings().await?);
        return Ok(());
    }

    let text = args.text.join(" ");
    let runtime = runtime(config)?;
    match runtime.lookup_symbol(&text).await? {
        Some(symbol) => {
            let amount = runtime.query()?.holding(&symbol).await?;
            println!("{symbol}: {amount}");
        }
        None => println!("No stock recognized in: {text}"),
    }
    Ok(())
}

async fn cmd_config(args: ConfigArgs, path: &Path) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            let mut config = load_config_from(path).await?;
            for (key, value) in &mut config.settings {
                if key.contains("KEY") {
                    *value = "********".to_string();
                }
            }
            let content = toml::to_string_pretty(&config).map_err(ConfigError::from)?;
            println!("{content}");
        }
        ConfigCommands::Validate => {
            let config = load_config_from(path).await?;
            let issues = config.pipeline().validate();
            if issues.is_empty() {
                println!("Configuration is valid.");
                return Ok(());
            }
            for issue in &issues {
                println!("{issue}");
            }
            let errors = issues
                .iter()
                .filter(|i| i.level == IssueLevel::Error)
                .count();
            if errors > 0 {
                return Err(CliError::Invalid(errors));
            }
        }
    }
    Ok(())
}
