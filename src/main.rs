use clap::{Parser, Subcommand};
use sheet_filter::cli;
use sheet_filter::error::FilterResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheet-filter")]
#[command(about = "Filter and score spreadsheet rows from the command line.")]
#[command(long_about = "Sheet Filter - eligibility filtering and rule scoring for workbooks

COMMANDS:
  eligibility - Keep rows matching category and numeric predicates
  rules       - Score rows against category and numeric rubrics

Both commands read a JSON payload in the same shape the HTTP endpoints
accept and write <name>.xlsx into the storage directory.

EXAMPLES:
  sheet-filter eligibility ModelCreation.xlsx request.json
  sheet-filter rules \"storage/Car loan.xlsx\" rules.json --storage out

For the HTTP API run sheet-filter-server.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Filter a workbook by category and numeric predicates.

PAYLOAD:
  [{\"eligibilityName\": \"eligible\",
    \"eligibilityJson\": {
      \"categories\": [{\"variable\": \"city\", \"categoriesList\": [\"NY\", \"LA\"]}],
      \"numerical\":  [{\"variable\": \"age\", \"operator\": \">=\", \"value\": 18}]}}]

Range operators take lValue and rValue, e.g. \"<= X <\" or \"> X >=\".
A bare {categories, numerical} object is saved under the source file's name.")]
    /// Keep rows matching category and numeric predicates
    Eligibility {
        /// Source workbook
        source: PathBuf,

        /// JSON payload file
        payload: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "storage")]
        storage: PathBuf,
    },

    #[command(long_about = "Score rows against category and numeric rubrics.

PAYLOAD:
  {\"categories\": [{\"variable\": \"Gender\", \"description\": [\"M\", \"F\"], \"subscore\": [1, 2]}],
   \"numerical\":  [{\"variable\": \"age\", \"description\": [\"<30\", \"30-60\", \">60\"],
                   \"subscore\": [1, 2, 3]}],
   \"ruleName\": \"scored\"}

The output gains a rule_score column: the per-row sum of all subscores.")]
    /// Score rows against category and numeric rubrics
    Rules {
        /// Source workbook
        source: PathBuf,

        /// JSON payload file
        payload: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "storage")]
        storage: PathBuf,
    },
}

fn main() -> FilterResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Eligibility {
            source,
            payload,
            storage,
        } => cli::eligibility(source, payload, storage),

        Commands::Rules {
            source,
            payload,
            storage,
        } => cli::rules(source, payload, storage),
    }
}
