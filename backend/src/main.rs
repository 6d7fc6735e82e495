//! hotel-ontology CLI - build the booking extracts
//!
//! # Commands
//!
//! ```bash
//! hotel-ontology run                          # Full pipeline, writes 3 CSVs
//! hotel-ontology run -i data.csv -o out/      # Override paths
//! hotel-ontology audit                        # Dry run: enrich + audit, no writes
//! hotel-ontology inspect                      # Show source headers and row count
//! ```
//!
//! Every path/seed flag also reads an environment variable (`HOTEL_INPUT`,
//! `HOTEL_OUTPUT_DIR`, `HOTEL_SEED`, `HOTEL_DELIMITER`), and a `.env`
//! file in the working directory is loaded first if present.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use hotel_ontology::logging::{init_logging, LogConfig};
use hotel_ontology::transform::pipeline::DEFAULT_INPUT;
use hotel_ontology::{
    dry_run, load_table, run, AuditSummary, PipelineOptions, REQUIRED_COLUMNS,
};
use tracing::error;

#[derive(Parser)]
#[command(name = "hotel-ontology")]
#[command(about = "Transform hotel bookings into null-free ontology extracts", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Input bookings CSV
    #[arg(short, long, env = "HOTEL_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Source field delimiter
    #[arg(short, long, env = "HOTEL_DELIMITER", default_value_t = ',')]
    delimiter: char,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: load, enrich, audit, write the three extracts
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Directory for the output CSVs
        #[arg(short, long, env = "HOTEL_OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Seed for the cost variance generator
        #[arg(short, long, env = "HOTEL_SEED", default_value_t = 42)]
        seed: u64,

        /// Also write the run summary as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Enrich and audit without writing any extract
    Audit {
        #[command(flatten)]
        source: SourceArgs,

        /// Seed for the cost variance generator
        #[arg(short, long, env = "HOTEL_SEED", default_value_t = 42)]
        seed: u64,
    },

    /// Show source headers, row count, and required-column coverage
    Inspect {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_logging(&LogConfig::from_verbosity(cli.verbose)) {
        eprintln!("Warning: logging not initialised: {e}");
    }

    let result = match cli.command {
        Commands::Run {
            source,
            output_dir,
            seed,
            report,
        } => cmd_run(
            PipelineOptions {
                input_path: source.input,
                output_dir,
                seed,
                delimiter: source.delimiter,
            },
            report.as_deref(),
        ),

        Commands::Audit { source, seed } => cmd_audit(PipelineOptions {
            input_path: source.input,
            seed,
            delimiter: source.delimiter,
            ..Default::default()
        }),

        Commands::Inspect { source } => cmd_inspect(&source),
    };

    if let Err(e) = result {
        error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_run(
    options: PipelineOptions,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Processing: {}", options.input_path.display());

    let report = run(&options)?;

    eprintln!("   Rows: {}", report.source.row_count);
    eprintln!("   Columns: {}", report.source.headers.len());
    eprintln!("   Seed: {}", report.seed);
    eprintln!("   Children filled: {}", report.children_filled);
    print_audit(&report.audit);

    eprintln!("\nExported:");
    for path in &report.outputs {
        eprintln!("   {}", path.display());
    }

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)?;
        eprintln!("   Report saved to: {}", path.display());
    }

    eprintln!("\nDone.");
    Ok(())
}

fn cmd_audit(options: PipelineOptions) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Auditing: {}", options.input_path.display());

    let report = dry_run(&options)?;

    eprintln!("   Rows: {}", report.source.row_count);
    eprintln!("   Children filled: {}", report.children_filled);
    print_audit(&report.audit);
    eprintln!("\nAudit passed, nothing written.");
    Ok(())
}

fn cmd_inspect(source: &SourceArgs) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Inspecting: {}", source.input.display());

    let delimiter = PipelineOptions {
        delimiter: source.delimiter,
        ..Default::default()
    }
    .delimiter_byte()?;
    let table = load_table(&source.input, delimiter)?;

    eprintln!("   Rows: {}", table.len());
    eprintln!("   Columns ({}):", table.headers().len());
    for (i, col) in table.headers().iter().enumerate() {
        eprintln!("   [{:2}] {}", i + 1, col);
    }

    let missing = table.missing_columns(&REQUIRED_COLUMNS);
    if missing.is_empty() {
        eprintln!("\nAll {} required columns present.", REQUIRED_COLUMNS.len());
    } else {
        eprintln!("\nMissing required columns: {}", missing.join(", "));
    }
    Ok(())
}

fn print_audit(summary: &AuditSummary) {
    eprintln!("\nAudit:");
    for view in &summary.views {
        eprintln!(
            "   {:22}: {} rows | nulls = {}",
            view.name, view.rows, view.nulls
        );
    }
    eprintln!("   Unique booking_ids: {}", summary.unique_ids);
}
