//! WalletZero CLI
//!
//! Command-line front end for the simulated trading terminal.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walletzero::decision::OpenAiModel;
use walletzero::session::CycleReport;
use walletzero::wallet::{KeyStore, WalletEngine, WalletStatus};
use walletzero::{Config, DecisionEngine, Error, Result, RpcChainClient, Session, TxError};

#[derive(Parser)]
#[command(name = "walletzero")]
#[command(about = "Simulated trading terminal on an EVM test network")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and show wallet metrics
    Status,

    /// Send a transfer of AMOUNT to the burn address
    Buy {
        /// Amount in native units
        amount: f64,
    },

    /// Credit AMOUNT through the faucet method
    Sell {
        /// Amount in native units
        amount: f64,
    },

    /// Ask the model for a decision without acting on it
    Analyze {
        /// Strategy directive (defaults to the configured strategy)
        #[arg(short, long)]
        strategy: Option<String>,
    },

    /// Run analysis cycles and act on each decision
    Auto {
        /// Number of cycles (runs until Ctrl-C when omitted)
        #[arg(short = 'n', long)]
        cycles: Option<u32>,

        /// Delay between cycles in milliseconds (defaults to check_interval_ms)
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Strategy directive (defaults to the configured strategy)
        #[arg(short, long)]
        strategy: Option<String>,
    },

    /// Interactive terminal reading commands from stdin
    Terminal,

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Status => run_status(&config).await?,
        Commands::Buy { amount } => run_buy(&config, amount).await?,
        Commands::Sell { amount } => run_sell(&config, amount).await?,
        Commands::Analyze { strategy } => run_analyze(&config, strategy).await?,
        Commands::Auto {
            cycles,
            interval_ms,
            strategy,
        } => run_auto(&config, cycles, interval_ms, strategy).await?,
        Commands::Terminal => run_terminal(&config).await?,
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug,hyper=info,hyper_util=info,reqwest=info,alloy_transport_http=info")
    } else {
        EnvFilter::new("info")
    };
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Config(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| Error::Config(e.to_string()))
}

fn build_wallet(config: &Config) -> Result<WalletEngine<RpcChainClient>> {
    let rpc_config = config.rpc_config();
    tracing::info!(url = %rpc_config.url(), key_file = %config.key_file.display(), "Using RPC endpoint");

    let client = RpcChainClient::new(&rpc_config)?
        .with_poll_interval(config.wallet.receipt_poll_interval());
    Ok(WalletEngine::new(
        client,
        KeyStore::new(config.key_file.clone()),
        config.wallet.clone(),
    ))
}

fn build_decisions(config: &Config) -> DecisionEngine {
    match OpenAiModel::from_env(&config.model) {
        Some(model) => DecisionEngine::new(Box::new(model)),
        None => DecisionEngine::offline(),
    }
}

async fn connected_wallet(config: &Config) -> Result<WalletEngine<RpcChainClient>> {
    let mut wallet = build_wallet(config)?;
    wallet.connect().await?;
    Ok(wallet)
}

async fn run_status(config: &Config) -> Result<()> {
    let wallet = connected_wallet(config).await?;
    let snapshot = wallet.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    println!(
        "PnL (session): {:.3}",
        snapshot.balance - config.session.pnl_baseline
    );
    Ok(())
}

async fn run_buy(config: &Config, amount: f64) -> Result<()> {
    let mut wallet = connected_wallet(config).await?;
    println!("Processing order...");
    let tx_hash = wallet.buy(amount).await?;
    println!("Buy Order Filled: {} ETH", amount);
    println!("  Tx hash: {}", tx_hash);
    println!("  Balance: {:.4} ETH", wallet.balance());
    Ok(())
}

async fn run_sell(config: &Config, amount: f64) -> Result<()> {
    let mut wallet = connected_wallet(config).await?;
    wallet.sell(amount).await?;
    println!("Sell Order Filled: Liquidity Added: +{} ETH", amount);
    println!("  Balance: {:.4} ETH", wallet.balance());
    Ok(())
}

async fn run_analyze(config: &Config, strategy: Option<String>) -> Result<()> {
    let mut wallet = connected_wallet(config).await?;
    let balance = wallet.refresh().await;
    let strategy = strategy.unwrap_or_else(|| config.session.default_strategy.clone());

    let decision = build_decisions(config).analyze(balance, &strategy).await;
    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

async fn run_auto(
    config: &Config,
    cycles: Option<u32>,
    interval_ms: Option<u64>,
    strategy: Option<String>,
) -> Result<()> {
    let strategy = strategy.unwrap_or_else(|| config.session.default_strategy.clone());
    let interval = Duration::from_millis(interval_ms.unwrap_or(config.check_interval_ms));

    let mut session = Session::start(build_wallet(config)?, build_decisions(config), &config.session).await;
    if session.wallet().status() == WalletStatus::Disconnected {
        print_log_tail(&session, 1);
        return Err(TxError::NotConnected.into());
    }

    tracing::info!(
        session_id = %session.id(),
        cycles = ?cycles,
        interval_ms = interval.as_millis() as u64,
        "Starting automated cycles"
    );

    let mut completed = 0u32;
    loop {
        let report = session.run_cycle(&strategy).await;
        completed += 1;
        print_cycle(&report);

        if cycles.is_some_and(|n| completed >= n) {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping automated cycles");
                break;
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&session.metrics())?);
    Ok(())
}

const TERMINAL_HELP: &str = "\
Commands:
  buy <amount>        send <amount> to the burn address
  sell <amount>       credit <amount> through the faucet
  cycle               run one analysis cycle
  strategy <text>     set the strategy directive
  status              show metrics
  log                 show the session log (newest first)
  chart               show balance snapshots (oldest first)
  connect             retry the wallet connection
  reset               clear log and chart
  help                show this help
  quit                exit";

async fn run_terminal(config: &Config) -> Result<()> {
    let mut strategy = config.session.default_strategy.clone();
    let mut session = Session::start(build_wallet(config)?, build_decisions(config), &config.session).await;

    println!("WalletZero // Financial Terminal");
    print_metrics(&session);
    print_log_tail(&session, 3);
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((c, rest)) => (c, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "buy" | "sell" => {
                let Ok(amount) = arg.parse::<f64>() else {
                    println!("usage: {} <amount>", command);
                    continue;
                };
                println!("Processing order...");
                // Failures are already in the session log
                let _ = if command == "buy" {
                    session.manual_buy(amount).await.map(|_| ())
                } else {
                    session.manual_sell(amount).await
                };
                print_log_tail(&session, 1);
                print_metrics(&session);
            }
            "cycle" => {
                println!("Running algorithm...");
                let report = session.run_cycle(&strategy).await;
                print_cycle(&report);
                print_metrics(&session);
            }
            "strategy" if !arg.is_empty() => {
                strategy = arg.to_string();
                println!("Strategy set: {}", strategy);
            }
            "strategy" => println!("Strategy: {}", strategy),
            "status" => print_metrics(&session),
            "log" => {
                for entry in session.log().entries() {
                    println!("{}", entry);
                }
            }
            "chart" => {
                if session.chart().is_empty() {
                    println!("Awaiting market data...");
                }
                for (i, balance) in session.chart().iter().enumerate() {
                    println!("{:>4}  {:.4}", i, balance);
                }
            }
            "connect" => {
                session.connect().await;
                print_log_tail(&session, 1);
            }
            "reset" => {
                session.reset();
                println!("Session reset.");
            }
            "help" => println!("{}", TERMINAL_HELP),
            "quit" | "exit" => break,
            other => println!("Unknown command '{}'. Type 'help' for commands.", other),
        }
    }

    Ok(())
}

fn print_metrics(session: &Session<RpcChainClient>) {
    let m = session.metrics();
    println!(
        "NAV: {:.4} ETH | Transactions: {} | PnL: {:.3} | Status: {:?}",
        m.net_asset_value, m.total_transactions, m.pnl, m.status
    );
}

fn print_log_tail(session: &Session<RpcChainClient>, n: usize) {
    let mut tail: Vec<_> = session.log().entries().take(n).collect();
    tail.reverse();
    for entry in tail {
        println!("{}", entry);
    }
}

fn print_cycle(report: &CycleReport) {
    println!(
        "[ALGO] {} -> {} {} | outcome: {:?} | balance: {:.4} ETH",
        report.decision.thought,
        report.decision.action,
        report.decision.amount,
        report.outcome,
        report.balance
    );
}
