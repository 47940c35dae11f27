//! Eligibility filtering: narrow a table by category and numeric predicates

use tracing::debug;

use super::request::{CategoryFilter, NumericFilter};
use super::summary::EligibilitySummary;
use super::Filter;
use crate::error::FilterResult;
use crate::operators::NumericOperator;
use crate::types::Table;

/// Subsets a table; every predicate narrows the surviving rows further
pub struct EligibilityFilter {
    table: Table,
}

impl EligibilityFilter {
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }
}

impl Filter for EligibilityFilter {
    type Category = CategoryFilter;
    type Numeric = NumericFilter;
    type Summary = EligibilitySummary;

    /// AND across filters, OR within one filter's `categoriesList`
    fn filter_categories(&mut self, categories: &[CategoryFilter]) -> FilterResult<()> {
        for category in categories {
            let column = self.table.require_column(&category.variable)?;
            let mask: Vec<bool> = column
                .values
                .iter()
                .map(|value| {
                    category
                        .categories_list
                        .iter()
                        .any(|allowed| value.matches(allowed))
                })
                .collect();

            self.table.retain_rows(&mask);
            debug!(
                variable = %category.variable,
                rows = self.table.row_count(),
                "Applied category filter"
            );
        }
        Ok(())
    }

    fn filter_numerics(&mut self, numerics: &[NumericFilter]) -> FilterResult<()> {
        for numeric in numerics {
            let operator = NumericOperator::resolve(&numeric.operator)?;
            let mask = match operator {
                NumericOperator::Single(op) => {
                    let value = numeric.single_value()?;
                    let column = self.table.require_column(&numeric.variable)?;
                    op.mask_value(&column.values, value)?
                }
                NumericOperator::Range(op) => {
                    let (lvalue, rvalue) = numeric.range_values()?;
                    let column = self.table.require_column(&numeric.variable)?;
                    op.mask(&column.values, lvalue, rvalue)
                }
            };

            self.table.retain_rows(&mask);
            debug!(
                variable = %numeric.variable,
                operator = ?operator,
                rows = self.table.row_count(),
                "Applied numeric filter"
            );
        }
        Ok(())
    }

    fn finish(&mut self) -> FilterResult<&Table> {
        Ok(&self.table)
    }

    fn summary(&self, file_name: String) -> EligibilitySummary {
        EligibilitySummary { file_name }
    }
}
