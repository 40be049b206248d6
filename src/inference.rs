//! Column data-type inference by majority vote over sampled cell values.
//!
//! Candidate types are tried in the order of the value-shape catalog and the
//! first type whose patterns match at least [`MAJORITY_THRESHOLD`] of the
//! sample wins. Ties are therefore settled by catalog order, not by the best
//! ratio. `String` closes the list and always matches.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{self, VALUE_SHAPES};

/// Upper bound on values examined per column.
pub const INFERENCE_SAMPLE_LIMIT: usize = 20;

/// Fraction of the sample a type must match to be selected.
pub const MAJORITY_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Date,
    Boolean,
    Email,
    Phone,
    Currency,
    Address,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Date => "date",
            DataType::Boolean => "boolean",
            DataType::Email => "email",
            DataType::Phone => "phone",
            DataType::Currency => "currency",
            DataType::Address => "address",
        }
    }

    /// True when `value` has the shape of this type.
    pub fn matches(self, value: &str) -> bool {
        let value = value.trim();
        catalog::value_patterns(self)
            .iter()
            .any(|pattern| pattern.is_match(value))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Infers the scalar type of a column from its raw values.
///
/// Blank values are discarded and at most [`INFERENCE_SAMPLE_LIMIT`] of the
/// rest are examined. An empty sample yields `String`.
pub fn infer_data_type<S: AsRef<str>>(values: &[S]) -> DataType {
    let sample = values
        .iter()
        .map(AsRef::as_ref)
        .filter(|value| !is_blank(value))
        .take(INFERENCE_SAMPLE_LIMIT)
        .collect::<Vec<_>>();
    if sample.is_empty() {
        return DataType::String;
    }

    for (data_type, _) in VALUE_SHAPES {
        if *data_type == DataType::String {
            continue;
        }
        let hits = sample
            .iter()
            .filter(|value| data_type.matches(value))
            .count();
        if hits as f64 / sample.len() as f64 >= MAJORITY_THRESHOLD {
            return *data_type;
        }
    }
    DataType::String
}

/// Share of non-blank values with the shape of `data_type`; 0 when all are blank.
pub fn consistency_ratio<S: AsRef<str>>(values: &[S], data_type: DataType) -> f64 {
    let mut non_blank = 0usize;
    let mut hits = 0usize;
    for value in values.iter().map(AsRef::as_ref) {
        if is_blank(value) {
            continue;
        }
        non_blank += 1;
        if data_type.matches(value) {
            hits += 1;
        }
    }
    if non_blank == 0 {
        0.0
    } else {
        hits as f64 / non_blank as f64
    }
}

/// Share of values that are not blank; 0 for an empty column.
pub fn completeness_ratio<S: AsRef<str>>(values: &[S]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let filled = values
        .iter()
        .filter(|value| !is_blank(value.as_ref()))
        .count();
    filled as f64 / values.len() as f64
}
