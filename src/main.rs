use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;

use wordtable::config::{
    BackfillConfig, DEFAULT_REGION, DEFAULT_TABLE_NAME, DEFAULT_WORD_LIST, LoaderConfig,
    ReconcileConfig, TableConfig,
};
use wordtable::confirm::{AssumeYes, PromptConfirm};
use wordtable::jobs::{backfill, loader, reconcile};
use wordtable::{DynamoWordStore, Error};

const EXIT_ERROR: u8 = 1;
const EXIT_USAGE: u8 = 2;

#[derive(Parser)]
#[command(name = "wordtable", about = "Maintenance jobs for the word table", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    table: TableArgs,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the final report as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Args)]
struct TableArgs {
    /// DynamoDB table name
    #[arg(long, global = true, env = "WORDTABLE_TABLE", default_value = DEFAULT_TABLE_NAME)]
    table: String,

    /// AWS region
    #[arg(long, global = true, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// Named AWS profile
    #[arg(long, global = true, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Custom endpoint, e.g. DynamoDB Local
    #[arg(long, global = true, env = "WORDTABLE_ENDPOINT_URL")]
    endpoint_url: Option<String>,
}

impl From<TableArgs> for TableConfig {
    fn from(args: TableArgs) -> Self {
        TableConfig {
            table_name: args.table,
            region: Some(args.region),
            profile: args.profile,
            endpoint_url: args.endpoint_url,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Assign random_id and _PK to every word missing them
    Backfill {
        /// Rewrite both fields when only one is missing
        #[arg(long)]
        overwrite_partial: bool,

        /// Filter complete items out on the server side
        #[arg(long)]
        server_side_filter: bool,
    },

    /// Delete every word not listed in a reference file
    Reconcile {
        /// Reference word list, one word per line
        #[arg(long)]
        reference: PathBuf,

        /// Delete without asking for confirmation
        #[arg(long, conflicts_with = "dry_run")]
        yes: bool,

        /// Show what would be deleted and stop
        #[arg(long)]
        dry_run: bool,
    },

    /// Load five-letter words from a word list
    Load {
        /// Word list, one word per line
        #[arg(long, default_value = DEFAULT_WORD_LIST)]
        words: PathBuf,

        /// Leave words that already exist untouched
        #[arg(long)]
        skip_existing: bool,
    },
}

fn init_tracing(cli: &Cli) {
    // --quiet → warn, --verbose → RUST_LOG or debug, default → info for this crate.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "wordtable=debug,info".into())
    } else {
        tracing_subscriber::EnvFilter::new("wordtable=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli).await {
        Ok(code) => code,
        Err(e @ Error::Config(_)) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_USAGE)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn run(cli: Cli) -> wordtable::Result<ExitCode> {
    let json = cli.json;
    let table_config = TableConfig::from(cli.table);
    let store = DynamoWordStore::connect(&table_config).await?;
    tracing::info!(
        table = store.table_name(),
        region = table_config.region.as_deref().unwrap_or(DEFAULT_REGION),
        "connected"
    );

    match cli.command {
        Commands::Backfill {
            overwrite_partial,
            server_side_filter,
        } => {
            let config = BackfillConfig {
                overwrite_partial,
                server_side_filter,
            };
            let report = backfill::run(&store, &config).await?;
            print_report(&report, json)?;
        }

        Commands::Reconcile {
            reference,
            yes,
            dry_run,
        } => {
            let config = ReconcileConfig {
                reference_file: reference,
                dry_run,
            };
            let report = if yes {
                reconcile::run(&store, &config, &mut AssumeYes).await?
            } else {
                reconcile::run(&store, &config, &mut PromptConfirm::terminal()).await?
            };
            print_report(&report, json)?;
        }

        Commands::Load {
            words,
            skip_existing,
        } => {
            let config = LoaderConfig {
                word_list: words,
                skip_existing,
            };
            let report = loader::run(&store, &config).await?;
            if report.attempted == 0 {
                eprintln!("No 5-letter words found in the file to upload.");
                if !json {
                    return Ok(ExitCode::SUCCESS);
                }
            }
            print_report(&report, json)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_report<R: Display + Serialize>(report: &R, json: bool) -> wordtable::Result<()> {
    println!("{}", render_report(report, json)?);
    Ok(())
}

fn render_report<R: Display + Serialize>(report: &R, json: bool) -> wordtable::Result<String> {
    if json {
        serde_json::to_string_pretty(report).map_err(|e| Error::Serialization(e.to_string()))
    } else {
        Ok(format!("\n{report}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordtable::jobs::loader::LoadReport;

    #[test]
    fn empty_load_still_renders_json() {
        let text = render_report(&LoadReport::default(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["attempted"], 0);
        assert_eq!(value["failed_words"], serde_json::json!([]));
    }

    #[test]
    fn text_report_uses_display() {
        let text = render_report(&LoadReport::default(), false).unwrap();
        assert!(text.contains("--- Upload Summary ---"));
    }

    #[test]
    fn cli_parses_global_table_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "wordtable",
            "load",
            "--table",
            "Words",
            "--region",
            "eu-west-1",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.table.table, "Words");
        assert!(matches!(cli.command, Commands::Load { .. }));
    }
}
