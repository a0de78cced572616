use anyhow::Context;
use chain_btc::{BtcNetwork, KeyMaterial, KeyReport, Scalar};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "keygen")]
#[command(about = "Derive a Bitcoin key and print every address and encoding")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Network whose version bytes and bech32 prefix are used
    #[arg(long, env = "KEYGEN_NETWORK", default_value = "mainnet", global = true)]
    network: BtcNetwork,

    /// Witness version for the native segwit address (0..=16)
    #[arg(long, default_value_t = 0, global = true)]
    witness_version: u8,

    /// Print the report as JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fresh key from the OS entropy source
    Random,
    /// Reproducible key from an integer seed
    Seed { seed: u64 },
    /// Explicit private key given as a decimal integer
    Value {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

fn scalar_for(command: &Commands) -> anyhow::Result<Scalar> {
    let scalar = match command {
        Commands::Random => Scalar::from_secure_random()?,
        Commands::Seed { seed } => Scalar::from_seed(*seed)?,
        Commands::Value { value } => {
            Scalar::from_dec_str(value).context("invalid private key value")?
        }
    };
    Ok(scalar)
}

fn build_report(cli: &Cli) -> anyhow::Result<KeyReport> {
    let mut key = KeyMaterial::with_scalar(scalar_for(&cli.command)?);
    key.derive_public_key()?;
    let report = KeyReport::new(&key, cli.network, cli.witness_version)?;
    Ok(report)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    info!(network = %cli.network, "generating key");

    let report = build_report(&cli)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
