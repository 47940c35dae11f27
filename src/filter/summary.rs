//! Result summaries returned to callers

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilitySummary {
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSummary {
    /// Requested variables absent from the dataset, deduplicated
    pub missing_in_excel: Vec<String>,
    /// Dataset columns no category rule referenced, in column order
    pub missing_in_payload: Vec<String>,
    pub file_name: String,
}

impl RuleSummary {
    pub fn new(
        missing_in_excel: &[String],
        missing_in_payload: &[String],
        file_name: String,
    ) -> Self {
        let mut deduped: Vec<String> = Vec::with_capacity(missing_in_excel.len());
        for name in missing_in_excel {
            if !deduped.contains(name) {
                deduped.push(name.clone());
            }
        }
        Self {
            missing_in_excel: deduped,
            missing_in_payload: missing_in_payload.to_vec(),
            file_name,
        }
    }
}
