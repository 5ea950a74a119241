//! Reproducible Salts - CLI
//!
//! Derives seeds, salts and salted hashes from a hex secret seed.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use reproducible_salts::crypto::{salted_hash_with, unsalted_hash_with};
use reproducible_salts::{
    derive_seed, first_n_salts, nth_salt, HashingConfig, LogConfig, SaltError,
    SaltedHashGenerator, SeedSource,
};

#[derive(Parser)]
#[command(name = "repro-salts")]
#[command(version = reproducible_salts::VERSION)]
#[command(about = "Reproducible, unpredictable salted hashes keyed by a secret seed")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hex-encoded secret seed (overrides the configured source)
    #[arg(long)]
    secret_seed: Option<String>,

    /// Log filter, e.g. `debug` (overrides RUST_LOG and the config)
    #[arg(long)]
    log_level: Option<String>,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Associated seed for a value (omit the value for the absent marker)
    DeriveSeed {
        value: Option<String>,
    },

    /// Salt at a 0-based index
    NthSalt {
        value: String,

        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// First N salts
    Salts {
        value: String,

        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: Option<i64>,
    },

    /// Salted hash of a cleartext with an explicit hex salt
    SaltedHash {
        cleartext: String,
        salt: String,
    },

    /// Unsalted digest used as an index key
    UnsaltedHash {
        value: String,
    },

    /// Salted hash at a 0-based index
    NthHash {
        cleartext: String,

        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Set of the first N salted hashes
    Hashes {
        cleartext: String,

        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: Option<i64>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = HashingConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    init_logging(&config.log, cli.log_level.as_deref(), cli.log_json);

    match &cli.command {
        Commands::DeriveSeed { value } => {
            let secret = resolve_secret_seed(&cli, &config)?;
            let seed = derive_seed(value.as_deref().map(str::as_bytes), &secret);
            output(&cli, json!({ "associated_seed": seed.to_hex() }), seed.to_hex());
        }

        Commands::NthSalt { value, index } => {
            let index = non_negative(*index)?;
            let secret = resolve_secret_seed(&cli, &config)?;
            let salt = hex::encode(nth_salt(Some(value.as_bytes()), &secret, index));
            output(&cli, json!({ "index": index, "salt": salt }), salt.clone());
        }

        Commands::Salts { value, count } => {
            let count = positive(count.unwrap_or(config.default_count as i64))?;
            let secret = resolve_secret_seed(&cli, &config)?;
            let salts: Vec<String> = first_n_salts(Some(value.as_bytes()), &secret, count)?
                .iter()
                .map(hex::encode)
                .collect();
            let text = salts
                .iter()
                .enumerate()
                .map(|(i, s)| format!("{}\t{}", i, s))
                .collect::<Vec<_>>()
                .join("\n");
            output(&cli, json!({ "salts": salts }), text);
        }

        Commands::SaltedHash { cleartext, salt } => {
            let salt = hex::decode(salt).map_err(SaltError::from)?;
            let hash = salted_hash_with(config.algorithm, cleartext.as_bytes(), &salt);
            output(&cli, serde_json::to_value(&hash)?, hash.to_string());
        }

        Commands::UnsaltedHash { value } => {
            let digest = hex::encode(unsalted_hash_with(config.algorithm, value.as_bytes()));
            output(&cli, json!({ "unsalted_hash": digest }), digest.clone());
        }

        Commands::NthHash { cleartext, index } => {
            let index = non_negative(*index)?;
            let generator = build_generator(&cli, &config)?;
            let hash = generator.nth_hash(cleartext.as_bytes(), index)?;
            generator.destroy();
            output(&cli, serde_json::to_value(&hash)?, hash.to_string());
        }

        Commands::Hashes { cleartext, count } => {
            let count = positive(count.unwrap_or(config.default_count as i64))?;
            let generator = build_generator(&cli, &config)?;
            let hashes = generator.first_n_hashes(cleartext.as_bytes(), count)?;
            generator.destroy();

            let mut hashes: Vec<_> = hashes.into_iter().collect();
            hashes.sort_by_key(|h| h.record_key());
            let text = hashes
                .iter()
                .map(|h| h.record_key())
                .collect::<Vec<_>>()
                .join("\n");
            output(&cli, serde_json::to_value(&hashes)?, text);
        }
    }

    Ok(())
}

fn init_logging(config: &LogConfig, level: Option<&str>, json: bool) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json || config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn resolve_secret_seed(cli: &Cli, config: &HashingConfig) -> anyhow::Result<Zeroizing<Vec<u8>>> {
    let seed_hex = match (&cli.secret_seed, &config.seed) {
        (Some(seed), _) => Zeroizing::new(seed.clone()),
        (None, SeedSource::Prompt) => Zeroizing::new(
            rpassword::prompt_password("Secret seed (hex): ")
                .context("failed to read secret seed")?,
        ),
        (None, source) => source.read_hex().context("failed to read secret seed")?,
    };
    let bytes = hex::decode(seed_hex.trim())
        .map_err(SaltError::from)
        .context("secret seed is not valid hex")?;
    Ok(Zeroizing::new(bytes))
}

fn build_generator(cli: &Cli, config: &HashingConfig) -> anyhow::Result<SaltedHashGenerator> {
    let secret = resolve_secret_seed(cli, config)?;
    Ok(SaltedHashGenerator::with_algorithm(&secret, config.algorithm))
}

fn non_negative(index: i64) -> Result<u64, SaltError> {
    u64::try_from(index)
        .map_err(|_| SaltError::InvalidArgument(format!("index must be non-negative, got {}", index)))
}

fn positive(count: i64) -> Result<usize, SaltError> {
    match usize::try_from(count) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SaltError::InvalidArgument(format!(
            "count must be positive, got {}",
            count
        ))),
    }
}

fn output(cli: &Cli, value: serde_json::Value, text: String) {
    if cli.json {
        println!("{}", value);
    } else {
        println!("{}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_negative_index() {
        let cli = Cli::try_parse_from(["repro-salts", "nth-salt", "value", "-1"]).unwrap();
        match cli.command {
            Commands::NthSalt { index, .. } => {
                assert!(matches!(non_negative(index), Err(SaltError::InvalidArgument(_))))
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_count_must_be_positive() {
        assert_eq!(positive(3).unwrap(), 3);
        assert!(matches!(positive(0), Err(SaltError::InvalidArgument(_))));
        assert!(matches!(positive(-4), Err(SaltError::InvalidArgument(_))));
    }

    #[test]
    fn test_secret_seed_flag_wins() {
        let cli = Cli::try_parse_from([
            "repro-salts",
            "--secret-seed",
            "00ff",
            "derive-seed",
        ])
        .unwrap();
        let config = HashingConfig {
            seed: SeedSource::Prompt,
            ..Default::default()
        };
        let seed = resolve_secret_seed(&cli, &config).unwrap();
        assert_eq!(seed.as_slice(), &[0x00, 0xFF]);
    }

    #[test]
    fn test_malformed_secret_seed() {
        let cli =
            Cli::try_parse_from(["repro-salts", "--secret-seed", "xyz", "derive-seed"]).unwrap();
        let err = resolve_secret_seed(&cli, &HashingConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SaltError>(),
            Some(SaltError::InvalidEncoding(_))
        ));
    }
}
