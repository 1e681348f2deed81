//! sbom-config: resolve and check SBOM tool configuration
//!
//! Merges command-line flags, `SBOM_TOOL_*` environment variables and an
//! optional config file, then validates the result for one action.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sbom_config::{
    cli::{self, ConfigArgs, OutputFormat},
    ManifestToolAction, SbomConfigError, StdPathProbe,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sbom-config")]
#[command(author = "Binarly.io")]
#[command(version)]
#[command(about = "Resolve and validate SBOM tool configuration", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Configuration is valid
    1  One or more validation rules failed
    2  A source could not be read

PRECEDENCE (highest first):
    command line, SBOM_TOOL_* environment, config file, defaults

EXAMPLES:
    # Check a generate run against a drop
    sbom-config generate -b ./drop --namespace-uri-base https://sbom.contoso.com \\
        --package-supplier Contoso

    # Show where every value of a validate run came from, as JSON
    sbom-config --output json validate -b ./drop -o ./out.json -c sbom.yaml")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// How the resolved configuration is printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve configuration for generating a manifest
    Generate(ConfigArgs),
    /// Resolve configuration for validating a drop against its manifest
    Validate(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (action, args) = match cli.command {
        Commands::Generate(args) => (ManifestToolAction::Generate, args),
        Commands::Validate(args) => (ManifestToolAction::Validate, args),
    };

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else {
        args.verbosity.map_or("warn", |level| level.filter_directive())
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let resolved = cli::run_resolve(action, args, |name| std::env::var(name).ok(), &StdPathProbe)
        .and_then(|config| cli::render(&config, cli.output));

    match resolved {
        Ok(rendered) => {
            print!("{rendered}");
            Ok(())
        }
        Err(err) => {
            match &err {
                SbomConfigError::Validation(failures) => eprintln!(
                    "Configuration for '{action}' is invalid ({} failures):\n{failures}",
                    failures.len()
                ),
                other => eprintln!("Error: {other}"),
            }
            std::process::exit(cli::exit_code(&err));
        }
    }
}
