//! Rule scoring: assign rubric subscores per variable and total them
//!
//! Scoring happens on a working copy of the loaded table, one
//! `<variable>_score` column per scored variable. Only `finalize` touches
//! the original table, adding the summed `rule_score` column.

use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use super::request::{CategoryRule, NumericRule};
use super::summary::RuleSummary;
use super::Filter;
use crate::error::{FilterError, FilterResult};
use crate::types::{CellValue, Column, Table};

/// Header pandas-style readers give the exported row-index column
pub const INDEX_COLUMN: &str = "Unnamed: 0";

/// Total score column written to the output table
pub const RULE_SCORE_COLUMN: &str = "rule_score";

pub fn score_column_name(variable: &str) -> String {
    format!("{}_score", variable.to_lowercase())
}

/// A parsed numeric rule description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// `<N`
    Below(i64),
    /// `>N`
    Above(i64),
    /// `A-B`, inclusive
    Between(i64, i64),
    /// Anything else: clears the variable's scores
    Reset,
}

impl Threshold {
    pub fn parse(description: &str) -> FilterResult<Self> {
        if let Some(rest) = description.strip_prefix('<') {
            Ok(Threshold::Below(parse_bound(rest, description)?))
        } else if let Some(rest) = description.strip_prefix('>') {
            Ok(Threshold::Above(parse_bound(rest, description)?))
        } else if description.contains('-') {
            let mut parts = description.split('-');
            let low = parse_bound(parts.next().unwrap_or_default(), description)?;
            let high = parse_bound(parts.next().unwrap_or_default(), description)?;
            Ok(Threshold::Between(low, high))
        } else {
            Ok(Threshold::Reset)
        }
    }

    /// Whether a numeric cell falls under this threshold. `Reset` matches nothing.
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Threshold::Below(bound) => value < bound as f64,
            Threshold::Above(bound) => value > bound as f64,
            Threshold::Between(low, high) => value >= low as f64 && value <= high as f64,
            Threshold::Reset => false,
        }
    }
}

fn parse_bound(text: &str, description: &str) -> FilterResult<i64> {
    text.trim().parse::<i64>().map_err(|_| {
        FilterError::InvalidDescription(format!(
            "'{}' is not an integer bound in '{}'",
            text, description
        ))
    })
}

/// Scores rows against category and numeric rubrics
pub struct RuleFilter {
    original: Table,
    working: Table,
    missing_in_excel: Vec<String>,
    missing_in_payload: Vec<String>,
}

impl RuleFilter {
    pub fn new(table: Table) -> Self {
        Self {
            working: table.clone(),
            original: table,
            missing_in_excel: Vec::new(),
            missing_in_payload: Vec::new(),
        }
    }

    pub fn original(&self) -> &Table {
        &self.original
    }

    pub fn working(&self) -> &Table {
        &self.working
    }

    /// Requested variables absent from the dataset, in request order
    pub fn missing_in_excel(&self) -> &[String] {
        &self.missing_in_excel
    }

    /// Dataset columns no category rule referenced
    pub fn missing_in_payload(&self) -> &[String] {
        &self.missing_in_payload
    }

    fn numeric_scores(&self, rule: &NumericRule, column: &Column) -> FilterResult<Vec<CellValue>> {
        let score_name = score_column_name(&rule.variable);
        let mut scores = self
            .working
            .column(&score_name)
            .map(|existing| existing.values.clone())
            .unwrap_or_else(|| vec![CellValue::Empty; self.working.row_count()]);

        // Later descriptions overwrite earlier ones; a reset wipes everything so far
        for (description, subscore) in rule.description.iter().zip(&rule.subscore) {
            let threshold = Threshold::parse(description)?;
            if threshold == Threshold::Reset {
                scores.fill(CellValue::Empty);
                continue;
            }
            for (score, value) in scores.iter_mut().zip(&column.values) {
                if value.as_number().is_some_and(|n| threshold.matches(n)) {
                    *score = CellValue::Number(*subscore);
                }
            }
        }
        Ok(scores)
    }
}

/// First-match category scoring: each label scores only the first row holding it
fn category_scores(rule: &CategoryRule, column: &Column) -> Vec<CellValue> {
    let mut scores = vec![CellValue::Empty; column.len()];
    for (description, subscore) in rule.description.iter().zip(&rule.subscore) {
        match column.values.iter().position(|value| value.matches(description)) {
            Some(row) => scores[row] = CellValue::Number(*subscore),
            None => debug!(
                variable = %rule.variable,
                description = %description,
                "No row matches category description"
            ),
        }
    }
    scores
}

/// Sum every `_score$` column of `working` per row (non-numbers count as 0),
/// truncate to an integer and store it as `rule_score` on `original`
pub fn finalize(original: &mut Table, working: &Table) -> FilterResult<()> {
    let pattern = Regex::new(r"_score$")?;
    let mut totals = vec![0.0_f64; working.row_count()];

    for column in working.columns.iter().filter(|c| pattern.is_match(&c.name)) {
        for (total, value) in totals.iter_mut().zip(&column.values) {
            *total += value.as_number().unwrap_or(0.0);
        }
    }

    let values = totals
        .into_iter()
        .map(|total| CellValue::Number(total.trunc()))
        .collect();
    original.set_column(Column::new(RULE_SCORE_COLUMN, values))
}

impl Filter for RuleFilter {
    type Category = CategoryRule;
    type Numeric = NumericRule;
    type Summary = RuleSummary;

    fn filter_categories(&mut self, categories: &[CategoryRule]) -> FilterResult<()> {
        let mut accounted: HashSet<&str> = HashSet::from([INDEX_COLUMN]);

        for rule in categories {
            accounted.insert(rule.variable.as_str());

            let Some(column) = self.working.column(&rule.variable) else {
                debug!(variable = %rule.variable, "Category variable missing from dataset");
                self.missing_in_excel.push(rule.variable.clone());
                continue;
            };
            let scores = category_scores(rule, column);
            self.working
                .set_column(Column::new(score_column_name(&rule.variable), scores))?;
        }

        self.missing_in_payload = self
            .original
            .column_names()
            .into_iter()
            .filter(|name| !accounted.contains(name))
            .map(String::from)
            .collect();
        Ok(())
    }

    fn filter_numerics(&mut self, numerics: &[NumericRule]) -> FilterResult<()> {
        for rule in numerics {
            let Some(column) = self.original.column(&rule.variable) else {
                debug!(variable = %rule.variable, "Numeric variable missing from dataset");
                self.missing_in_excel.push(rule.variable.clone());
                continue;
            };
            if rule.description.is_empty() || rule.subscore.is_empty() {
                continue;
            }

            let scores = self.numeric_scores(rule, column)?;
            self.working
                .set_column(Column::new(score_column_name(&rule.variable), scores))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> FilterResult<&Table> {
        finalize(&mut self.original, &self.working)?;
        Ok(&self.original)
    }

    fn summary(&self, file_name: String) -> RuleSummary {
        RuleSummary::new(&self.missing_in_excel, &self.missing_in_payload, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_rule(variable: &str, description: &[&str], subscore: &[f64]) -> NumericRule {
        NumericRule {
            variable: variable.to_string(),
            description: description.iter().map(|d| d.to_string()).collect(),
            subscore: subscore.to_vec(),
        }
    }

    fn ages() -> Table {
        Table::from_columns(vec![Column::new(
            "age",
            vec![20.0.into(), 40.0.into(), 70.0.into()],
        )])
        .unwrap()
    }

    fn scores_of(table: &Table, name: &str) -> Vec<CellValue> {
        table.column(name).unwrap().values.clone()
    }

    fn nums(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|n| CellValue::Number(*n)).collect()
    }

    // ==================== Threshold Tests ====================

    #[test]
    fn test_threshold_parse() {
        assert_eq!(Threshold::parse("<30").unwrap(), Threshold::Below(30));
        assert_eq!(Threshold::parse(">65").unwrap(), Threshold::Above(65));
        assert_eq!(Threshold::parse("18-25").unwrap(), Threshold::Between(18, 25));
        assert_eq!(Threshold::parse("< 30").unwrap(), Threshold::Below(30));
        assert_eq!(Threshold::parse("<-5").unwrap(), Threshold::Below(-5));
        assert_eq!(Threshold::parse("other").unwrap(), Threshold::Reset);
    }

    #[test]
    fn test_threshold_parse_rejects_non_integers() {
        assert!(matches!(
            Threshold::parse("<=30"),
            Err(FilterError::InvalidDescription(_))
        ));
        assert!(Threshold::parse(">6.5").is_err());
        assert!(Threshold::parse("-5").is_err());
        assert!(Threshold::parse("18-").is_err());
    }

    #[test]
    fn test_between_is_inclusive() {
        let threshold = Threshold::Between(30, 60);
        assert!(threshold.matches(30.0));
        assert!(threshold.matches(60.0));
        assert!(!threshold.matches(60.5));
    }

    // ==================== Numeric Scoring Tests ====================

    #[test]
    fn test_numeric_scores_sum_to_rule_score() {
        let mut filter = RuleFilter::new(ages());
        filter
            .filter_numerics(&[numeric_rule("age", &["<30", "30-60", ">60"], &[1.0, 2.0, 3.0])])
            .unwrap();
        let output = filter.finish().unwrap();

        assert_eq!(
            scores_of(output, RULE_SCORE_COLUMN),
            nums(&[1.0, 2.0, 3.0])
        );
    }

    #[test]
    fn test_reset_description_wipes_earlier_assignments() {
        let mut filter = RuleFilter::new(ages());
        filter
            .filter_numerics(&[numeric_rule("age", &["<30", "n/a", ">60"], &[1.0, 9.0, 3.0])])
            .unwrap();

        assert_eq!(
            scores_of(filter.working(), "age_score"),
            vec![CellValue::Empty, CellValue::Empty, 3.0.into()]
        );
    }

    #[test]
    fn test_overlapping_descriptions_last_write_wins() {
        let mut filter = RuleFilter::new(ages());
        filter
            .filter_numerics(&[numeric_rule("age", &["<50", "30-80"], &[1.0, 5.0])])
            .unwrap();

        assert_eq!(
            scores_of(filter.working(), "age_score"),
            nums(&[1.0, 5.0, 5.0])
        );
    }

    #[test]
    fn test_later_numeric_rule_overwrites_matched_rows_only() {
        let mut filter = RuleFilter::new(ages());
        filter
            .filter_numerics(&[
                numeric_rule("age", &["<50"], &[1.0]),
                numeric_rule("age", &["30-80"], &[7.0]),
            ])
            .unwrap();

        assert_eq!(
            scores_of(filter.working(), "age_score"),
            nums(&[1.0, 7.0, 7.0])
        );
    }

    #[test]
    fn test_numeric_rule_builds_on_category_score_column() {
        let mut filter = RuleFilter::new(ages());
        filter
            .filter_categories(&[CategoryRule {
                variable: "age".to_string(),
                description: vec![40.0.into()],
                subscore: vec![9.0],
            }])
            .unwrap();
        filter
            .filter_numerics(&[numeric_rule("age", &["<30"], &[1.0])])
            .unwrap();

        assert_eq!(
            scores_of(filter.working(), "age_score"),
            vec![1.0.into(), 9.0.into(), CellValue::Empty]
        );
        let output = filter.finish().unwrap();
        assert_eq!(
            scores_of(output, RULE_SCORE_COLUMN),
            nums(&[1.0, 9.0, 0.0])
        );
    }

    #[test]
    fn test_numeric_missing_variable_is_tracked() {
        let mut filter = RuleFilter::new(ages());
        filter
            .filter_numerics(&[numeric_rule("income", &["<10"], &[1.0])])
            .unwrap();

        assert_eq!(filter.missing_in_excel(), ["income".to_string()]);
        assert!(filter.working().column("income_score").is_none());
    }

    #[test]
    fn test_bad_description_fails() {
        let mut filter = RuleFilter::new(ages());
        let result = filter.filter_numerics(&[numeric_rule("age", &["<abc"], &[1.0])]);
        assert!(matches!(result, Err(FilterError::InvalidDescription(_))));
    }

    // ==================== Category Scoring Tests ====================

    #[test]
    fn test_category_first_match_only() {
        let table = Table::from_columns(vec![Column::new(
            "Gender",
            vec!["M".into(), "F".into(), "M".into()],
        )])
        .unwrap();
        let mut filter = RuleFilter::new(table);
        filter
            .filter_categories(&[CategoryRule {
                variable: "Gender".to_string(),
                description: vec!["M".into(), "F".into(), "X".into()],
                subscore: vec![2.0, 4.0, 8.0],
            }])
            .unwrap();

        assert_eq!(
            scores_of(filter.working(), "gender_score"),
            vec![2.0.into(), 4.0.into(), CellValue::Empty]
        );
        assert!(filter.original().column("gender_score").is_none());
    }

    #[test]
    fn test_second_category_rule_starts_from_empty_column() {
        let table = Table::from_columns(vec![Column::new(
            "Gender",
            vec!["M".into(), "F".into(), "M".into()],
        )])
        .unwrap();
        let mut filter = RuleFilter::new(table);
        filter
            .filter_categories(&[
                CategoryRule {
                    variable: "Gender".to_string(),
                    description: vec!["M".into()],
                    subscore: vec![2.0],
                },
                CategoryRule {
                    variable: "Gender".to_string(),
                    description: vec!["F".into()],
                    subscore: vec![4.0],
                },
            ])
            .unwrap();

        assert_eq!(
            scores_of(filter.working(), "gender_score"),
            vec![CellValue::Empty, 4.0.into(), CellValue::Empty]
        );
    }

    #[test]
    fn test_missing_variables_bookkeeping() {
        let table = Table::from_columns(vec![
            Column::new("A", vec![1.0.into()]),
            Column::new("B", vec![2.0.into()]),
            Column::new(INDEX_COLUMN, vec![0.0.into()]),
        ])
        .unwrap();
        let mut filter = RuleFilter::new(table);
        filter
            .filter_categories(&[CategoryRule {
                variable: "C".to_string(),
                description: vec!["x".into()],
                subscore: vec![1.0],
            }])
            .unwrap();

        let summary = filter.summary("out.xlsx".to_string());
        assert_eq!(summary.missing_in_excel, vec!["C"]);
        assert_eq!(summary.missing_in_payload, vec!["A", "B"]);
    }

    // ==================== Finalize Tests ====================

    #[test]
    fn test_finalize_treats_empty_as_zero_and_truncates() {
        let mut original = ages();
        let mut working = ages();
        working
            .set_column(Column::new(
                "age_score",
                vec![1.5.into(), CellValue::Empty, 2.0.into()],
            ))
            .unwrap();
        working
            .set_column(Column::new(
                "gender_score",
                vec![1.0.into(), 3.0.into(), CellValue::Empty],
            ))
            .unwrap();

        finalize(&mut original, &working).unwrap();

        assert_eq!(
            scores_of(&original, RULE_SCORE_COLUMN),
            nums(&[2.0, 3.0, 2.0])
        );
        assert!(original.column("age_score").is_none());
    }

    #[test]
    fn test_finalize_without_score_columns_is_zero() {
        let mut original = ages();
        let working = ages();
        finalize(&mut original, &working).unwrap();
        assert_eq!(
            scores_of(&original, RULE_SCORE_COLUMN),
            nums(&[0.0, 0.0, 0.0])
        );
    }
}
