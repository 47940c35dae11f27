//! Sheet Filter API Server binary
//!
//! HTTP REST API for eligibility filtering and rule scoring of workbooks.

use clap::Parser;
use sheet_filter::api::{run_api_server, server::ApiConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sheet-filter-server")]
#[command(version)]
#[command(about = "Sheet Filter API Server - eligibility filtering and rule scoring over HTTP")]
#[command(long_about = r#"
Sheet Filter API Server

Endpoints:
  - POST /filter/eligibility/  - Filter the eligibility workbook
  - POST /filter/rules/        - Score the rules workbook
  - GET  /download/?filename=  - Download a stored result

Additional endpoints:
  - GET  /health               - Health check
  - GET  /                     - API documentation

Every request re-reads its source workbook. Results are written to the
storage directory as <name>.xlsx, overwriting files with the same name.

Example usage:
  sheet-filter-server                           # Start on localhost:8080
  sheet-filter-server --host 0.0.0.0 --port 3000 --storage /srv/storage

  curl -X POST http://localhost:8080/filter/eligibility/ \
    -H "Content-Type: application/json" \
    -d '[{"eligibilityName": "eligible", "eligibilityJson": {"categories": [], "numerical": []}}]'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "SHEET_FILTER_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "SHEET_FILTER_PORT")]
    port: u16,

    /// Directory results are written to and downloaded from
    #[arg(short, long, default_value = "storage", env = "SHEET_FILTER_STORAGE")]
    storage: PathBuf,

    /// Workbook filtered by /filter/eligibility/
    #[arg(
        long,
        default_value = "ModelCreation.xlsx",
        env = "SHEET_FILTER_ELIGIBILITY_SOURCE"
    )]
    eligibility_source: PathBuf,

    /// Workbook scored by /filter/rules/
    #[arg(
        long,
        default_value = "storage/Car loan.xlsx",
        env = "SHEET_FILTER_RULES_SOURCE"
    )]
    rules_source: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        storage_dir: args.storage,
        eligibility_source: args.eligibility_source,
        rules_source: args.rules_source,
    };

    run_api_server(config).await
}
