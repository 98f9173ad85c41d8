//! Interop Address CLI
//!
//! Convert and inspect ERC-7930 / ERC-7828 interop addresses:
//!
//! ```text
//! interop-address to-binary vitalik.eth@eip155:1#4CA88C9C
//! interop-address to-human 0x00010000010114d8da6bf26964af9d7eed9e03e53415d37aa96045
//! interop-address validate 0x...@base#17DE0709 --checksum
//! ```
//!
//! Configuration comes from the environment (see `Config`); results go to
//! stdout, logs to stderr.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use tracing::{debug, warn};

use interop_address::{Config, InteropAddressProvider};

#[derive(Parser)]
#[command(name = "interop-address")]
#[command(about = "Convert and validate ERC-7930 interop addresses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Human-readable name to 0x binary hex
    ToBinary {
        name: String,

        /// Fail on checksum mismatch instead of warning
        #[arg(long)]
        strict: bool,
    },

    /// 0x binary hex to human-readable name
    ToHuman { hex: String },

    /// Checksum of a binary address or name
    Checksum { input: String },

    /// Check a binary address or name; exits non-zero when invalid
    Validate {
        input: String,

        /// Also require a provided checksum to match
        #[arg(long)]
        checksum: bool,
    },

    /// Address field in its chain-native form
    Address { input: String },

    /// Chain reference in its chain-native form
    ChainId { input: String },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(cli.command))
}

async fn async_main(command: Commands) -> Result<()> {
    let config = Config::load()?;
    debug!(?config, "Configuration loaded");

    let provider = InteropAddressProvider::from_config(&config)?;

    match command {
        Commands::ToBinary { name, strict } => {
            let resolved = provider.human_readable_to_binary(&name).await?;
            let resolved = if strict {
                resolved.verify_checksum()?
            } else {
                if let Some(mismatch) = &resolved.checksum_mismatch {
                    warn!("{}", mismatch);
                }
                resolved
            };
            println!("{}", resolved.address.to_hex());
        }
        Commands::ToHuman { hex } => {
            println!("{}", provider.hex_to_human_readable(&hex)?);
        }
        Commands::Checksum { input } => {
            println!("{}", provider.compute_checksum(&input).await?);
        }
        Commands::Validate { input, checksum } => {
            let valid = if interop_address::binary::is_hex_encoded(&input) {
                provider.is_valid_binary_address(&input)
            } else {
                provider
                    .is_valid_human_readable_address(&input, checksum)
                    .await
            };
            if !valid {
                return Err(eyre!("Invalid interop address: {}", input));
            }
            println!("valid");
        }
        Commands::Address { input } => {
            println!("{}", provider.get_address(&input).await?);
        }
        Commands::ChainId { input } => {
            println!("{}", provider.get_chain_id(&input).await?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,interop_address=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
