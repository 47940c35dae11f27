//! Request payloads for eligibility filtering and rule scoring

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{FilterError, FilterResult};
use crate::types::CellValue;

//==============================================================================
// Eligibility
//==============================================================================

/// Keep rows whose `variable` value is one of `categoriesList`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilter {
    pub variable: String,
    pub categories_list: Vec<CellValue>,
}

/// Keep rows whose `variable` value satisfies `operator`
///
/// Single operators read `value`; range operators read `lValue` and `rValue`.
/// `value` may be text for `=`, every other operator needs a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericFilter {
    pub variable: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r_value: Option<f64>,
}

impl NumericFilter {
    pub fn single_value(&self) -> FilterResult<&CellValue> {
        match &self.value {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(self.missing("value")),
        }
    }

    pub fn range_values(&self) -> FilterResult<(f64, f64)> {
        let lvalue = self.l_value.ok_or_else(|| self.missing("lValue"))?;
        let rvalue = self.r_value.ok_or_else(|| self.missing("rValue"))?;
        Ok((lvalue, rvalue))
    }

    fn missing(&self, field: &str) -> FilterError {
        FilterError::InvalidPayload(format!(
            "numeric filter on '{}' with operator '{}' needs '{}'",
            self.variable, self.operator, field
        ))
    }
}

/// Category and numeric predicates, applied in that order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub categories: Vec<CategoryFilter>,
    #[serde(default)]
    pub numerical: Vec<NumericFilter>,
}

/// One element of the eligibility endpoint's list body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityEnvelope {
    pub eligibility_name: String,
    pub eligibility_json: FilterRequest,
}

/// Eligibility body: the list envelope, or a bare request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EligibilityPayload {
    Listed(Vec<EligibilityEnvelope>),
    Bare(FilterRequest),
}

impl<'de> Deserialize<'de> for EligibilityPayload {
    /// Picks the form from the JSON shape so field errors keep their message
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            list @ Value::Array(_) => serde_json::from_value(list)
                .map(EligibilityPayload::Listed)
                .map_err(D::Error::custom),
            object @ Value::Object(_) => serde_json::from_value(object)
                .map(EligibilityPayload::Bare)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "eligibility body must be a list or an object, got {}",
                other
            ))),
        }
    }
}

impl EligibilityPayload {
    /// Request plus the output name it carries. Only the first list element
    /// is used; a bare request carries no name.
    pub fn into_parts(self) -> FilterResult<(FilterRequest, Option<String>)> {
        match self {
            EligibilityPayload::Listed(envelopes) => {
                let first = envelopes.into_iter().next().ok_or_else(|| {
                    FilterError::InvalidPayload("eligibility list is empty".to_string())
                })?;
                Ok((first.eligibility_json, Some(first.eligibility_name)))
            }
            EligibilityPayload::Bare(request) => Ok((request, None)),
        }
    }
}

//==============================================================================
// Rules
//==============================================================================

/// Category labels and the subscore each one earns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub variable: String,
    pub description: Vec<CellValue>,
    pub subscore: Vec<f64>,
}

/// Threshold expressions (`<30`, `>65`, `18-25`) and their subscores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericRule {
    pub variable: String,
    pub description: Vec<String>,
    pub subscore: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRequest {
    #[serde(default)]
    pub categories: Vec<CategoryRule>,
    #[serde(default)]
    pub numerical: Vec<NumericRule>,
    /// Output base name; defaults to `<source stem>_rules`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
}
