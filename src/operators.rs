//! Numeric comparison operators for eligibility filtering
//!
//! Single operators match their token exactly. Range operators are looked up
//! with `RangeOperator::resolve`, which also accepts comparators typed with
//! their characters reversed (`=<` for `<=`).

use crate::error::{FilterError, FilterResult};
use crate::types::CellValue;

/// Single-value comparison: `column <op> value`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleOperator {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl SingleOperator {
    pub const ALL: [SingleOperator; 5] = [
        SingleOperator::Eq,
        SingleOperator::Gt,
        SingleOperator::Ge,
        SingleOperator::Lt,
        SingleOperator::Le,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            SingleOperator::Eq => "=",
            SingleOperator::Gt => ">",
            SingleOperator::Ge => ">=",
            SingleOperator::Lt => "<",
            SingleOperator::Le => "<=",
        }
    }

    /// Exact token lookup
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.token() == token)
    }

    pub fn compare(&self, cell: f64, value: f64) -> bool {
        match self {
            SingleOperator::Eq => cell == value,
            SingleOperator::Gt => cell > value,
            SingleOperator::Ge => cell >= value,
            SingleOperator::Lt => cell < value,
            SingleOperator::Le => cell <= value,
        }
    }

    /// Row mask over a column; non-numeric cells never match
    pub fn mask(&self, values: &[CellValue], value: f64) -> Vec<bool> {
        values
            .iter()
            .map(|cell| cell.as_number().is_some_and(|n| self.compare(n, value)))
            .collect()
    }

    /// Row mask against a payload value. `=` also compares text and booleans;
    /// the ordering operators need a number.
    pub fn mask_value(&self, values: &[CellValue], value: &CellValue) -> FilterResult<Vec<bool>> {
        match (self, value.as_number()) {
            (_, Some(n)) => Ok(self.mask(values, n)),
            (SingleOperator::Eq, None) => Ok(values.iter().map(|cell| cell.matches(value)).collect()),
            (_, None) => Err(FilterError::InvalidPayload(format!(
                "operator '{}' needs a numeric value, got '{}'",
                self.token(),
                value
            ))),
        }
    }
}

/// Two-bound comparison between `lValue` and `rValue`
///
/// The ascending family reads `lvalue < column < rvalue`, the descending
/// family reads `lvalue > column > rvalue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOperator {
    AscExclusive,
    AscLeftInclusive,
    AscRightInclusive,
    AscInclusive,
    DescExclusive,
    DescLeftInclusive,
    DescRightInclusive,
    DescInclusive,
}

impl RangeOperator {
    /// Registry order; `resolve` returns the first hit in this order
    pub const ALL: [RangeOperator; 8] = [
        RangeOperator::AscExclusive,
        RangeOperator::AscLeftInclusive,
        RangeOperator::AscRightInclusive,
        RangeOperator::AscInclusive,
        RangeOperator::DescExclusive,
        RangeOperator::DescLeftInclusive,
        RangeOperator::DescRightInclusive,
        RangeOperator::DescInclusive,
    ];

    /// Registry key. `"=> X >"` is matched as written, not normalized to `">= X >"`.
    pub fn key(&self) -> &'static str {
        match self {
            RangeOperator::AscExclusive => "< X <",
            RangeOperator::AscLeftInclusive => "<= X <",
            RangeOperator::AscRightInclusive => "< X <=",
            RangeOperator::AscInclusive => "<= X <=",
            RangeOperator::DescExclusive => "> X >",
            RangeOperator::DescLeftInclusive => "=> X >",
            RangeOperator::DescRightInclusive => "> X >=",
            RangeOperator::DescInclusive => ">= X >=",
        }
    }

    /// Find the operator whose outer comparators equal the token's, either
    /// as typed or with their characters reversed. Tokens with fewer than
    /// three space-separated parts never match.
    pub fn resolve(token: &str) -> Option<Self> {
        let parts: Vec<&str> = token.split(' ').collect();
        if parts.len() < 3 {
            return None;
        }
        let (left, right) = (parts[0], parts[2]);

        Self::ALL.into_iter().find(|op| {
            let key: Vec<&str> = op.key().split(' ').collect();
            comparator_matches(left, key[0]) && comparator_matches(right, key[2])
        })
    }

    pub fn compare(&self, cell: f64, lvalue: f64, rvalue: f64) -> bool {
        match self {
            RangeOperator::AscExclusive => cell > lvalue && cell < rvalue,
            RangeOperator::AscLeftInclusive => cell >= lvalue && cell < rvalue,
            RangeOperator::AscRightInclusive => cell > lvalue && cell <= rvalue,
            RangeOperator::AscInclusive => cell >= lvalue && cell <= rvalue,
            RangeOperator::DescExclusive => cell < lvalue && cell > rvalue,
            RangeOperator::DescLeftInclusive => cell <= lvalue && cell > rvalue,
            RangeOperator::DescRightInclusive => cell < lvalue && cell >= rvalue,
            RangeOperator::DescInclusive => cell <= lvalue && cell >= rvalue,
        }
    }

    pub fn mask(&self, values: &[CellValue], lvalue: f64, rvalue: f64) -> Vec<bool> {
        values
            .iter()
            .map(|cell| {
                cell.as_number()
                    .is_some_and(|n| self.compare(n, lvalue, rvalue))
            })
            .collect()
    }
}

fn comparator_matches(typed: &str, key: &str) -> bool {
    typed == key || typed.chars().rev().eq(key.chars())
}

/// A resolved numeric operator token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOperator {
    Single(SingleOperator),
    Range(RangeOperator),
}

impl NumericOperator {
    /// Exact single-operator match first, then range resolution
    pub fn resolve(token: &str) -> FilterResult<Self> {
        if let Some(op) = SingleOperator::parse(token) {
            return Ok(NumericOperator::Single(op));
        }
        RangeOperator::resolve(token)
            .map(NumericOperator::Range)
            .ok_or_else(|| FilterError::InvalidOperator(token.to_string()))
    }
}
