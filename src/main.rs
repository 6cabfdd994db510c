//! Tradewire CLI
//!
//! Demo commands that exercise the contract end to end against an
//! in-process server: list wallets, place a limit order, cancel one.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use tradewire::{ClientError, InProcessTransport, RpcClient};
use tradewire_contract::ops::OrderSide;
use tradewire_contract::{CallResult, Decimal};
use tradewire_server::{Dispatcher, Ledger, ServerConfig};

#[derive(Parser)]
#[command(name = "tradewire")]
#[command(about = "Schema-first RPC contract demo", version)]
struct Cli {
    /// Path to a server config file (defaults apply when omitted)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// API key stamped onto every call
    #[arg(long, global = true, default_value = "demo-key")]
    api_key: String,

    /// Drop the API key to observe the authentication interceptor
    #[arg(long, global = true)]
    anonymous: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List wallet balances
    Wallets,

    /// Place a limit order
    Order {
        /// Base asset symbol
        #[arg(long)]
        asset: String,

        /// Order side
        #[arg(long, value_enum)]
        side: Side,

        /// Limit price, e.g. 50000.00
        #[arg(long)]
        price: String,

        /// Amount of the base asset, e.g. 0.25
        #[arg(long)]
        amount: String,
    },

    /// Cancel an order placed earlier in the same process
    Cancel {
        /// Order ID to cancel
        order_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Buy,
    Sell,
}

impl From<Side> for OrderSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => OrderSide::Buy,
            Side::Sell => OrderSide::Sell,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match ServerConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => ServerConfig::default(),
    };

    let ledger = Arc::new(Ledger::from_config(&config));
    let transport = Arc::new(InProcessTransport::new(Dispatcher::new(ledger, &config)));
    let client = if cli.anonymous {
        RpcClient::new(transport)
    } else {
        RpcClient::with_api_key(transport, cli.api_key.clone())
    };

    match run(&cli.command, &client) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Commands, client: &RpcClient) -> Result<(), ClientError> {
    match command {
        Commands::Wallets => match client.get_wallets()? {
            CallResult::Success(wallets) => {
                if wallets.is_empty() {
                    println!("no wallets");
                }
                for wallet in wallets {
                    println!(
                        "{:8} balance {:>16} reserved {:>16}",
                        wallet.asset,
                        wallet.balance.to_string(),
                        wallet.reserved.to_string()
                    );
                }
                Ok(())
            }
            CallResult::Failure(e) => {
                eprintln!("rejected: {}", e);
                Ok(())
            }
        },

        Commands::Order {
            asset,
            side,
            price,
            amount,
        } => {
            let price = parse_decimal(price)?;
            let amount = parse_decimal(amount)?;
            match client.create_limit_order(asset, (*side).into(), &price, &amount)? {
                CallResult::Success(confirmation) => {
                    println!(
                        "order {} accepted at {}",
                        confirmation.order_id,
                        confirmation.accepted_at.datetime().to_rfc3339()
                    );
                    Ok(())
                }
                CallResult::Failure(e) => {
                    eprintln!("rejected: {}", e);
                    Ok(())
                }
            }
        }

        Commands::Cancel { order_id } => match client.cancel_order(order_id)? {
            CallResult::Success(response) => {
                println!("order {} cancelled", response.order_id);
                Ok(())
            }
            CallResult::Failure(e) => {
                eprintln!("rejected: {}", e);
                Ok(())
            }
        },
    }
}

fn parse_decimal(text: &str) -> Result<Decimal, ClientError> {
    text.parse().map_err(|e| {
        ClientError::Transport(tradewire::TransportError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid decimal '{}': {}", text, e),
        )))
    })
}
