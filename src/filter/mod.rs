//! Eligibility filtering and rule scoring
//!
//! Both filters share one pipeline: load the source fresh, apply category
//! filters, apply numeric filters, save the output table, summarize.

pub mod eligibility;
pub mod request;
pub mod rule;
pub mod summary;

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::FilterResult;
use crate::store::TableStore;
use crate::types::Table;

pub use eligibility::EligibilityFilter;
pub use request::{
    CategoryFilter, CategoryRule, EligibilityEnvelope, EligibilityPayload, FilterRequest,
    NumericFilter, NumericRule, RuleRequest,
};
pub use rule::RuleFilter;
pub use summary::{EligibilitySummary, RuleSummary};

/// A filter over one loaded table
pub trait Filter {
    type Category;
    type Numeric;
    type Summary: Serialize;

    fn filter_categories(&mut self, categories: &[Self::Category]) -> FilterResult<()>;

    fn filter_numerics(&mut self, numerics: &[Self::Numeric]) -> FilterResult<()>;

    /// The table to persist once all filters have been applied
    fn finish(&mut self) -> FilterResult<&Table>;

    fn summary(&self, file_name: String) -> Self::Summary;

    /// Categories, then numerics, then save. Nothing is written if a filter fails.
    fn run(
        &mut self,
        categories: &[Self::Category],
        numerics: &[Self::Numeric],
        store: &TableStore,
        name: &str,
    ) -> FilterResult<Self::Summary> {
        self.filter_categories(categories)?;
        self.filter_numerics(numerics)?;
        let file_name = store.save(self.finish()?, name)?;
        Ok(self.summary(file_name))
    }
}

/// Eligibility pipeline: load `source`, filter, save under the payload's name
/// (or the source stem for a bare request)
pub fn run_eligibility(
    store: &TableStore,
    source: &Path,
    payload: EligibilityPayload,
) -> FilterResult<EligibilitySummary> {
    let (request, name) = payload.into_parts()?;
    let name = name.unwrap_or_else(|| TableStore::source_stem(source));

    let mut filter = EligibilityFilter::new(store.load(source)?);
    let summary = filter.run(&request.categories, &request.numerical, store, &name)?;

    info!(
        source = %source.display(),
        rows = filter.table().row_count(),
        file_name = %summary.file_name,
        "Eligibility filter complete"
    );
    Ok(summary)
}

/// Rule pipeline: load `source`, score, save under `ruleName` or
/// `<source stem>_rules`
pub fn run_rules(
    store: &TableStore,
    source: &Path,
    request: RuleRequest,
) -> FilterResult<RuleSummary> {
    let name = request
        .rule_name
        .clone()
        .unwrap_or_else(|| format!("{}_rules", TableStore::source_stem(source)));

    let mut filter = RuleFilter::new(store.load(source)?);
    let summary = filter.run(&request.categories, &request.numerical, store, &name)?;

    info!(
        source = %source.display(),
        missing_in_excel = summary.missing_in_excel.len(),
        missing_in_payload = summary.missing_in_payload.len(),
        file_name = %summary.file_name,
        "Rule scoring complete"
    );
    Ok(summary)
}
