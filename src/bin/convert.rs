//! Pipeline Resource Conversion CLI
//!
//! Converts resources between schema versions, answers conversion reviews
//! and computes resource versions.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pipelines_apis::{ConversionReview, ConversionScheme, ConversionWebhook, OperatorConfig};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pipelines-convert")]
#[command(about = "Convert pipeline resources between API versions")]
struct Cli {
    /// Configuration file, layered over the default locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a resource to another API version
    Convert {
        /// Target API version, e.g. pipelines.kubeflow.org/v1beta1
        #[arg(short, long)]
        to: String,
        /// Resource file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,
    },

    /// Answer a ConversionReview
    Review {
        /// Review file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,
    },

    /// Print the version identifier of a resource
    Version {
        /// Resource file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,
    },

    /// Inspect or create the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration to a file
    Init {
        #[arg(short, long, default_value = "operator.toml")]
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json(input: &str) -> anyhow::Result<Value> {
    let content = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {}", input))?
    };
    serde_json::from_str(&content).with_context(|| format!("parsing {}", input))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = OperatorConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.logging.filter);

    let scheme = ConversionScheme::new(config.conversion.context())?;

    match cli.command {
        Commands::Convert { to, input } => {
            let converted = scheme.convert(read_json(&input)?, &to)?;
            print_json(&converted)?;
        }

        Commands::Review { input } => {
            let review: ConversionReview =
                serde_json::from_value(read_json(&input)?).context("decoding conversion review")?;
            let answered = ConversionWebhook::new(scheme).review(review);
            print_json(&answered)?;
        }

        Commands::Version { input } => {
            println!("{}", scheme.compute_version(read_json(&input)?)?);
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigAction::Init { output, force } => {
                write_default_config(&output, force)?;
                println!("Wrote {}", output.display());
            }
        },
    }

    Ok(())
}

fn write_default_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    OperatorConfig::default()
        .save(path)
        .with_context(|| format!("writing {}", path.display()))
}
