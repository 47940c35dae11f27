use crate::error::FilterResult;
use crate::filter::{run_eligibility, run_rules, EligibilityPayload, RuleRequest};
use crate::store::TableStore;
use colored::Colorize;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

fn read_payload<T: DeserializeOwned>(path: &Path) -> FilterResult<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_summary<T: Serialize>(summary: &T, store: &TableStore) -> FilterResult<()> {
    println!("{}", "✅ Filter Complete!".bold().green());
    println!("   Storage: {}\n", store.dir().display());
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Execute the eligibility command
pub fn eligibility(source: PathBuf, payload: PathBuf, storage: PathBuf) -> FilterResult<()> {
    println!("{}", "🔎 Sheet Filter - Eligibility".bold().green());
    println!("   Source:  {}", source.display());
    println!("   Payload: {}\n", payload.display());

    let payload: EligibilityPayload = read_payload(&payload)?;
    let store = TableStore::new(storage);
    store.ensure_dir()?;

    let summary = run_eligibility(&store, &source, payload)?;
    print_summary(&summary, &store)
}

/// Execute the rules command
pub fn rules(source: PathBuf, payload: PathBuf, storage: PathBuf) -> FilterResult<()> {
    println!("{}", "🔎 Sheet Filter - Rule Scoring".bold().green());
    println!("   Source:  {}", source.display());
    println!("   Payload: {}\n", payload.display());

    let request: RuleRequest = read_payload(&payload)?;
    let store = TableStore::new(storage);
    store.ensure_dir()?;

    let summary = run_rules(&store, &source, request)?;

    if !summary.missing_in_excel.is_empty() {
        println!(
            "{} {}",
            "⚠️  Not in workbook:".yellow(),
            summary.missing_in_excel.join(", ")
        );
    }
    print_summary(&summary, &store)
}
