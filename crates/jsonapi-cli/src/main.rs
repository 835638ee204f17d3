use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use jsonapi_cli::{load_schema, run_validation, summarize, ValidateOptions};
use jsonapi_validation::RequestIntent;

#[derive(Parser)]
#[command(name = "jsonapi")]
#[command(about = "Validate JSON:API request documents against a resource schema", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a request document
    Validate {
        /// Schema file (TOML)
        #[arg(short, long)]
        schema: PathBuf,

        /// Request document (JSON)
        #[arg(short = 'f', long)]
        document: PathBuf,

        /// What the request does: create, update, replace, add or remove
        #[arg(short, long, default_value = "create")]
        intent: RequestIntent,

        /// Resource type (defaults to the document's primary data type)
        #[arg(short = 't', long = "type")]
        resource_type: Option<String>,

        /// Id of the resource being updated
        #[arg(long)]
        id: Option<String>,

        /// Relationship being modified
        #[arg(short, long)]
        relationship: Option<String>,

        /// Query string to check, without the leading '?'
        #[arg(short, long)]
        query: Option<String>,

        /// Seed records (JSON object keyed by resource type)
        #[arg(long, env = "JSONAPI_RECORDS")]
        records: Option<PathBuf>,
    },

    /// Summarize a schema file
    Schema {
        /// Schema file (TOML)
        #[arg(short, long)]
        schema: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Reports go to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate {
            schema,
            document,
            intent,
            resource_type,
            id,
            relationship,
            query,
            records,
        } => {
            let options = ValidateOptions {
                schema,
                document,
                intent,
                resource_type,
                id,
                relationship,
                query,
                records,
            };
            let report = run_validation(&options)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Schema { schema } => {
            let schema = load_schema(&schema)?;
            print!("{}", summarize(&schema));
            Ok(())
        }
    }
}
