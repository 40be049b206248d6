//! Per-column field mapping: target resolution, confidence, suggestions,
//! alternatives, quality, and validation rules.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{self, Dialect, FieldMatch},
    confidence::Confidence,
    inference::{self, DataType},
};

const MAX_ALTERNATIVES: usize = 3;

const EMAIL_FORMAT: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PHONE_FORMAT: &str = r"^[\d\s\-\(\)\+\.]+$";

/// One source column: its header and the values observed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSample {
    pub header: String,
    pub values: Vec<String>,
}

impl ColumnSample {
    /// Collects column `index` from `rows`; cells past a row's end read as empty.
    pub fn from_rows(header: &str, index: usize, rows: &[Vec<String>]) -> Self {
        let values = rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or_default())
            .collect();
        Self {
            header: header.to_string(),
            values,
        }
    }

    pub fn empty_count(&self) -> usize {
        self.values
            .iter()
            .filter(|value| inference::is_blank(value))
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Required,
    Format,
    Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    pub message: String,
}

impl ValidationRule {
    pub fn required() -> Self {
        Self {
            rule_type: RuleType::Required,
            pattern: None,
            min: None,
            message: "This field is required".to_string(),
        }
    }

    fn format(pattern: &str, message: &str) -> Self {
        Self {
            rule_type: RuleType::Format,
            pattern: Some(pattern.to_string()),
            min: None,
            message: message.to_string(),
        }
    }

    fn non_negative(message: &str) -> Self {
        Self {
            rule_type: RuleType::Range,
            pattern: None,
            min: Some(0.0),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub source_field: String,
    pub target_field: String,
    pub data_type: DataType,
    pub is_required: bool,
    pub confidence: Confidence,
    pub suggestions: Vec<String>,
    pub alternative_fields: Vec<String>,
    /// Source of the catalog pattern that selected the target, or empty.
    pub detected_pattern: String,
    pub data_quality_score: f64,
    #[serde(default)]
    pub validation_rules: Vec<ValidationRule>,
}

/// Lowercases `header`, collapses non-alphanumeric runs to `_`, and trims
/// leading and trailing underscores.
pub fn sanitize_header(header: &str) -> String {
    let mut sanitized = String::with_capacity(header.len());
    let mut pending_separator = false;
    for ch in header.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !sanitized.is_empty() {
                sanitized.push('_');
            }
            pending_separator = false;
            sanitized.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    sanitized
}

/// Dialect catalog first, then the generic catalog.
pub fn resolve_target(header: &str, dialect: Option<Dialect>) -> Option<FieldMatch> {
    dialect
        .and_then(|dialect| catalog::match_field(catalog::dialect_fields(dialect), header))
        .or_else(|| catalog::match_field(catalog::generic_fields(), header))
}

/// Weighted confidence score in `0.0..=1.0`.
///
/// The name-containment term compares the lowercased header with the target
/// name verbatim, so `Tenant Name` does not earn it for `tenant_name`; such
/// matches top out at 0.6.
pub fn confidence_score(
    header: &str,
    matched: Option<&str>,
    consistency: f64,
    completeness: f64,
) -> f64 {
    let mut score = 0.0;
    if let Some(target) = matched
        && header.to_lowercase().contains(target)
    {
        score += 0.4;
    }
    score += consistency * 0.3;
    score += completeness * 0.2;
    if matched.is_some() {
        score += 0.1;
    }
    score
}

pub fn quality_score(consistency: f64, completeness: f64) -> f64 {
    0.7 * consistency + 0.3 * completeness
}

fn suggestions_for(data_type: DataType, empty_values: usize) -> Vec<String> {
    let mut suggestions = match data_type {
        DataType::Email => vec![
            "Validate email format".to_string(),
            "Check for duplicate email addresses".to_string(),
        ],
        DataType::Phone => vec![
            "Standardize phone number format".to_string(),
            "Remove non-numeric characters".to_string(),
        ],
        DataType::Currency => vec![
            "Ensure consistent currency format".to_string(),
            "Check for negative values".to_string(),
        ],
        DataType::Date => vec![
            "Standardize date format to YYYY-MM-DD".to_string(),
            "Validate date ranges".to_string(),
        ],
        _ => Vec::new(),
    };
    if empty_values > 0 {
        suggestions.push(format!("{empty_values} empty values found"));
    }
    suggestions
}

/// Generic targets containing the first token of the sanitized header.
fn alternatives_for(header: &str, primary: &str) -> Vec<String> {
    let sanitized = sanitize_header(header);
    let token = sanitized.split('_').next().unwrap_or_default();
    if token.is_empty() {
        return Vec::new();
    }
    catalog::generic_target_names()
        .filter(|name| *name != primary && name.contains(token))
        .take(MAX_ALTERNATIVES)
        .map(str::to_string)
        .collect()
}

/// Rules attached for a target and type.
pub fn validation_rules_for(is_required: bool, data_type: DataType) -> Vec<ValidationRule> {
    let mut rules = Vec::new();
    if is_required {
        rules.push(ValidationRule::required());
    }
    match data_type {
        DataType::Email => rules.push(ValidationRule::format(
            EMAIL_FORMAT,
            "Invalid email format",
        )),
        DataType::Phone => rules.push(ValidationRule::format(
            PHONE_FORMAT,
            "Invalid phone number format",
        )),
        DataType::Currency => rules.push(ValidationRule::non_negative(
            "Amount cannot be negative",
        )),
        _ => {}
    }
    rules
}

/// Builds the mapping for one column.
pub fn generate_field_mapping(column: &ColumnSample, dialect: Option<Dialect>) -> FieldMapping {
    let matched = resolve_target(&column.header, dialect);
    let target_field = match matched {
        Some(found) => found.target.to_string(),
        None => sanitize_header(&column.header),
    };
    let detected_pattern = matched
        .map(|found| found.pattern.to_string())
        .unwrap_or_default();

    let data_type = inference::infer_data_type(&column.values);
    let consistency = inference::consistency_ratio(&column.values, data_type);
    let completeness = inference::completeness_ratio(&column.values);

    let score = confidence_score(
        &column.header,
        matched.map(|found| found.target),
        consistency,
        completeness,
    );
    let confidence = Confidence::from_score(score);
    let is_required = catalog::is_required_target(&target_field);
    debug!(
        "Column '{}' -> {target_field} ({data_type}, score {score:.2}, {confidence})",
        column.header
    );

    FieldMapping {
        source_field: column.header.clone(),
        suggestions: suggestions_for(data_type, column.empty_count()),
        alternative_fields: alternatives_for(&column.header, &target_field),
        validation_rules: validation_rules_for(is_required, data_type),
        data_quality_score: quality_score(consistency, completeness),
        target_field,
        data_type,
        is_required,
        confidence,
        detected_pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(header: &str, values: &[&str]) -> ColumnSample {
        ColumnSample {
            header: header.to_string(),
            values: values.iter().map(|value| value.to_string()).collect(),
        }
    }

    #[test]
    fn sanitize_header_collapses_separators() {
        assert_eq!(sanitize_header("  Tenant -- Name!! "), "tenant_name");
        assert_eq!(sanitize_header("Unit #"), "unit");
        assert_eq!(sanitize_header("___"), "");
        assert_eq!(sanitize_header("Sq.Ft"), "sq_ft");
    }

    #[test]
    fn from_rows_treats_missing_cells_as_empty() {
        let rows = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string()],
        ];
        let sample = ColumnSample::from_rows("second", 1, &rows);
        assert_eq!(sample.values, vec!["b".to_string(), String::new()]);
        assert_eq!(sample.empty_count(), 1);
    }

    #[test]
    fn name_containment_ceiling_is_point_six() {
        let score = confidence_score("Tenant Name", Some("tenant_name"), 1.0, 1.0);
        assert!((score - 0.6).abs() < 1e-9);
        assert_eq!(Confidence::from_score(score), Confidence::Medium);
    }

    #[test]
    fn unmatched_header_falls_back_to_sanitized_name() {
        let mapping = generate_field_mapping(&column("Pet Policy?", &["yes", "no"]), None);
        assert_eq!(mapping.target_field, "pet_policy");
        assert!(mapping.detected_pattern.is_empty());
        assert_eq!(mapping.data_type, DataType::Boolean);
        assert!(!mapping.is_required);
    }

    #[test]
    fn currency_columns_get_range_rule_and_hints() {
        let mapping = generate_field_mapping(
            &column("Rent Amount", &["1200.00", "", "950.50"]),
            None,
        );
        assert_eq!(mapping.target_field, "rent_amount");
        assert_eq!(mapping.data_type, DataType::Currency);
        assert!(mapping.is_required);
        assert_eq!(
            mapping
                .validation_rules
                .iter()
                .map(|rule| rule.rule_type)
                .collect::<Vec<_>>(),
            vec![RuleType::Required, RuleType::Range]
        );
        assert_eq!(
            mapping.suggestions.last().map(String::as_str),
            Some("1 empty values found")
        );
    }

    #[test]
    fn alternatives_share_first_header_token() {
        let alternatives = alternatives_for("Tenant Name", "tenant_name");
        assert_eq!(alternatives, vec!["tenant_id".to_string()]);
        let property = alternatives_for("Property Name", "property_name");
        assert_eq!(
            property,
            vec![
                "property_address".to_string(),
                "property_id".to_string(),
                "property_type".to_string()
            ]
        );
    }
}
