mod session;
mod wallet;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use coupon_sdk::config::{COUPON_MODULE_NAME, DEFAULT_NODE_URL};
use coupon_sdk::{ChainClient, ContractConfig, CouponFlows};
use session::LocalSession;
use wallet::Wallet;

#[derive(Parser)]
#[command(name = "coupon-wallet")]
#[command(about = "CLI wallet for time-locked coupons", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Node API URL
    #[arg(long, global = true, default_value = DEFAULT_NODE_URL)]
    node_url: String,

    /// Coupon contract package id (defaults to the devnet deployment)
    #[arg(long, global = true)]
    package_id: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new wallet
    Create {
        /// Wallet name
        #[arg(short, long, default_value = "My Wallet")]
        name: String,
    },

    /// Import wallet from mnemonic or private key
    Import {
        /// Import from mnemonic phrase
        #[arg(short, long, conflicts_with = "private_key")]
        mnemonic: Option<String>,

        /// Import from private key (hex)
        #[arg(short, long, conflicts_with = "mnemonic")]
        private_key: Option<String>,

        /// Wallet name
        #[arg(short, long, default_value = "My Wallet")]
        name: String,
    },

    /// Show wallet information
    Info,

    /// Mint a coupon that unlocks a number of minutes from now
    Mint {
        /// Minutes from now until the coupon becomes redeemable
        minutes: u64,
    },

    /// Redeem a coupon by its object id
    Redeem {
        /// Coupon object id
        coupon_id: String,
    },

    /// Show node status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let client = ChainClient::new(cli.node_url.clone());
    let config = match &cli.package_id {
        Some(package_id) => ContractConfig::new(package_id.clone(), COUPON_MODULE_NAME),
        None => ContractConfig::devnet(),
    };

    match cli.command {
        Commands::Create { name } => {
            if Wallet::exists() {
                println!("{}", "⚠️  Wallet already exists!".yellow());
                println!("Use 'coupon-wallet info' to view your wallet");
                return Ok(());
            }

            println!("{}", "🔐 Creating new wallet...".cyan());
            let (wallet, mnemonic) = Wallet::generate(name)?;
            wallet.save(&Wallet::keystore_path()?)?;

            println!("\n{}", "✅ Wallet created successfully!".green());
            println!(
                "\n{}",
                "📝 IMPORTANT: Save your mnemonic phrase securely!".yellow().bold()
            );
            println!("{}", "This is the ONLY way to recover your wallet.".yellow());
            println!("\n{}", mnemonic.bright_white().bold());
            println!("\n{}", format!("Address: {}", wallet.address).cyan());
        }

        Commands::Import {
            mnemonic,
            private_key,
            name,
        } => {
            if Wallet::exists() {
                println!("{}", "⚠️  Wallet already exists!".yellow());
                println!("Delete the existing wallet first to import a new one");
                return Ok(());
            }

            let wallet = if let Some(mnemonic_phrase) = mnemonic {
                println!("{}", "🔑 Importing wallet from mnemonic...".cyan());
                Wallet::from_mnemonic(&mnemonic_phrase, name)?
            } else if let Some(priv_key) = private_key {
                println!("{}", "🔑 Importing wallet from private key...".cyan());
                Wallet::from_private_key(&priv_key, name)?
            } else {
                println!(
                    "{}",
                    "❌ Please provide either --mnemonic or --private-key".red()
                );
                return Ok(());
            };

            wallet.save(&Wallet::keystore_path()?)?;
            println!("\n{}", "✅ Wallet imported successfully!".green());
            println!("{}", format!("Address: {}", wallet.address).cyan());
        }

        Commands::Info => {
            let wallet = Wallet::load(&Wallet::keystore_path()?)?;
            println!("\n{}", "👛 Wallet Information".cyan().bold());
            println!("{}", "═".repeat(50).cyan());
            println!("{}: {}", "Name".bright_white(), wallet.name);
            println!("{}: {}", "Address".bright_white(), wallet.address.green());
            println!("{}: {}", "Public Key".bright_white(), wallet.public_key);
            println!("{}: {}", "Created".bright_white(), wallet.created_at);
        }

        Commands::Mint { minutes } => {
            if minutes == 0 {
                println!("{}", "❌ Minutes must be a positive whole number".red());
                return Ok(());
            }

            let wallet = Wallet::load(&Wallet::keystore_path()?)?;
            let session = LocalSession::new(wallet, client.clone());
            let mut flows = CouponFlows::new(config, session, client);

            let now_ms = chrono::Utc::now().timestamp_millis() as u64;
            let unlock_time_ms = now_ms + minutes * 60_000;

            println!("{}", "🎟️  Minting time-locked coupon...".cyan());
            println!(
                "{}",
                format!("Unlocks in {} minute(s), at {} ms", minutes, unlock_time_ms)
                    .bright_black()
            );

            match flows.mint_coupon(unlock_time_ms).await {
                Ok(outcome) => {
                    println!("\n{}", "✅ Transaction confirmed!".green().bold());
                    println!("{}: {}", "Digest".bright_white(), outcome.digest.cyan());
                    match outcome.coupon_id {
                        Some(coupon_id) => {
                            println!("{}: {}", "Coupon ID".bright_white(), coupon_id.green())
                        }
                        None => println!(
                            "{}",
                            "Transaction confirmed but no coupon object was created".yellow()
                        ),
                    }
                }
                Err(e) => {
                    println!("{}", format!("❌ Mint failed: {}", e).red());
                }
            }
        }

        Commands::Redeem { coupon_id } => {
            let wallet = Wallet::load(&Wallet::keystore_path()?)?;
            let session = LocalSession::new(wallet, client.clone());
            let mut flows = CouponFlows::new(config, session, client);

            println!("{}", "🎫 Redeeming coupon...".cyan());
            println!("{}", format!("Coupon ID: {}", coupon_id).bright_black());

            match flows.redeem_coupon(&coupon_id).await {
                Ok(outcome) => {
                    println!("\n{}", "✅ Coupon redeemed!".green().bold());
                    println!("{}: {}", "Digest".bright_white(), outcome.digest.cyan());
                }
                Err(e) => {
                    println!("{}", format!("❌ Redeem failed: {}", e).red());
                    println!(
                        "{}",
                        "The coupon may still be locked or already used".yellow()
                    );
                }
            }
        }

        Commands::Status => {
            println!("{}", "🔍 Checking node status...".cyan());

            match client.health_check().await {
                Ok(true) => println!("{}", "✅ Node is online".green()),
                _ => {
                    println!("{}", "❌ Node is offline or unreachable".red());
                    println!(
                        "{}",
                        format!("Trying to connect to: {}", cli.node_url).yellow()
                    );
                }
            }
        }
    }

    Ok(())
}
