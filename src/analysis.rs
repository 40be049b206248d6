//! Whole-sample analysis: orchestrates dialect detection and per-column
//! mapping, then derives the overall quality score, format label, template
//! category, and recommendations.
//!
//! [`analyze`] is a pure function of its inputs. It never fails: empty
//! headers, zero rows and ragged rows all produce a (low scoring) result.

use std::fmt;

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{self, Dialect, ESSENTIAL_FIELDS},
    confidence::Confidence,
    dialect::{self, DialectMatch},
    error::AnalysisError,
    inference::{self, DataType},
    mapping::{self, ColumnSample, FieldMapping},
};

/// Fields scoring below this are reported as data-quality problems.
const QUALITY_ISSUE_THRESHOLD: f64 = 0.7;

const BULK_EXPORT_MIN_COLUMNS: usize = 10;
const BULK_EXPORT_MIN_ROWS: usize = 100;

const TEMPLATE_KEYWORDS: &[(TemplateCategory, &[&str])] = &[
    (TemplateCategory::Properties, &["property", "unit", "building"]),
    (TemplateCategory::Tenants, &["tenant", "resident", "lease"]),
    (
        TemplateCategory::Financial,
        &["rent", "payment", "amount", "financial"],
    ),
    (
        TemplateCategory::Maintenance,
        &["maintenance", "work", "repair"],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectedFormat {
    #[serde(rename = "System Export")]
    SystemExport,
    #[serde(rename = "Bulk Data Export")]
    BulkDataExport,
    #[serde(rename = "Tenant Data")]
    TenantData,
    #[serde(rename = "Property Data")]
    PropertyData,
    #[serde(rename = "Standard CSV")]
    StandardCsv,
}

impl DetectedFormat {
    pub fn label(self) -> &'static str {
        match self {
            DetectedFormat::SystemExport => "System Export",
            DetectedFormat::BulkDataExport => "Bulk Data Export",
            DetectedFormat::TenantData => "Tenant Data",
            DetectedFormat::PropertyData => "Property Data",
            DetectedFormat::StandardCsv => "Standard CSV",
        }
    }
}

impl fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Import template families offered downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Properties,
    Tenants,
    Financial,
    Maintenance,
}

impl TemplateCategory {
    pub fn id(self) -> &'static str {
        match self {
            TemplateCategory::Properties => "properties",
            TemplateCategory::Tenants => "tenants",
            TemplateCategory::Financial => "financial",
            TemplateCategory::Maintenance => "maintenance",
        }
    }

    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::TenantData | Dialect::LeaseData => TemplateCategory::Tenants,
            Dialect::PropertyData | Dialect::UnitData => TemplateCategory::Properties,
            Dialect::FinancialData | Dialect::RentRoll => TemplateCategory::Financial,
            Dialect::MaintenanceData => TemplateCategory::Maintenance,
            Dialect::ReportingData => TemplateCategory::Properties,
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    FieldMapping,
    DataCleaning,
    Validation,
    FormatCorrection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub suggested_action: String,
    pub confidence: Confidence,
    /// Source columns or target fields the recommendation is about.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_fields: Vec<String>,
}

/// One row of the mapping plan handed to the import step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMapping {
    pub source_field: String,
    pub target_field: String,
    pub data_type: DataType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAnalysis {
    pub field_mappings: Vec<FieldMapping>,
    pub data_quality_score: f64,
    pub detected_format: DetectedFormat,
    pub suggested_template: TemplateCategory,
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect_match: Option<DialectMatch>,
}

impl DataAnalysis {
    pub fn mapping(&self, source_field: &str) -> Option<&FieldMapping> {
        self.field_mappings
            .iter()
            .find(|mapping| mapping.source_field == source_field)
    }

    pub fn recommendation(&self, kind: RecommendationType) -> impl Iterator<Item = &Recommendation> {
        self.recommendations
            .iter()
            .filter(move |recommendation| recommendation.kind == kind)
    }

    /// Re-targets one column. Required flag and rules follow the new target;
    /// scores and recommendations keep describing the original analysis.
    pub fn override_target(&mut self, source_field: &str, target_field: &str) -> Result<(), AnalysisError> {
        let target = target_field.trim();
        if target.is_empty() {
            return Err(AnalysisError::EmptyTarget {
                source_field: source_field.to_string(),
            });
        }
        let mapping = self
            .field_mappings
            .iter_mut()
            .find(|mapping| mapping.source_field == source_field)
            .ok_or_else(|| AnalysisError::UnknownSourceField {
                source_field: source_field.to_string(),
            })?;
        debug!(
            "Overriding '{}' target {} -> {target}",
            mapping.source_field, mapping.target_field
        );
        mapping.target_field = target.to_string();
        mapping.is_required = catalog::is_required_target(target);
        mapping.detected_pattern.clear();
        mapping.alternative_fields.retain(|alternative| alternative != target);
        mapping.validation_rules = mapping::validation_rules_for(mapping.is_required, mapping.data_type);
        Ok(())
    }

    /// Applies `source=target` overrides in order.
    pub fn apply_overrides<S: AsRef<str>>(&mut self, overrides: &[S]) -> Result<(), AnalysisError> {
        for raw in overrides {
            let (source, target) = parse_override(raw.as_ref())?;
            self.override_target(source, target)?;
        }
        Ok(())
    }

    pub fn mapping_plan(&self) -> Vec<PlannedMapping> {
        self.field_mappings
            .iter()
            .map(|mapping| PlannedMapping {
                source_field: mapping.source_field.clone(),
                target_field: mapping.target_field.clone(),
                data_type: mapping.data_type,
            })
            .collect()
    }
}

/// Splits `source=target` on the last `=`, so source headers may contain `=`.
pub fn parse_override(raw: &str) -> Result<(&str, &str), AnalysisError> {
    match raw.rsplit_once('=') {
        Some((source, target)) if !source.trim().is_empty() => Ok((source.trim(), target.trim())),
        _ => Err(AnalysisError::InvalidOverride {
            raw: raw.to_string(),
        }),
    }
}

/// Analyzes a header row and sample rows.
pub fn analyze(headers: &[String], rows: &[Vec<String>]) -> DataAnalysis {
    let dialect_match = dialect::detect_dialect(headers, rows);
    let dialect = dialect_match.as_ref().map(|found| found.dialect);
    debug!(
        "Analyzing {} column(s) over {} row(s); dialect {:?}",
        headers.len(),
        rows.len(),
        dialect
    );

    let field_mappings = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let column = ColumnSample::from_rows(header, idx, rows);
            mapping::generate_field_mapping(&column, dialect)
        })
        .collect::<Vec<_>>();

    let data_quality_score = overall_quality(headers, rows, &field_mappings);
    let detected_format = detect_format(headers, rows.len());
    let suggested_template = suggest_template(dialect, &field_mappings);
    let recommendations = recommend(dialect_match.as_ref(), &field_mappings);

    DataAnalysis {
        field_mappings,
        data_quality_score,
        detected_format,
        suggested_template,
        recommendations,
        dialect_match,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Blend of mapping confidence, cell completeness, per-field quality, and
/// header quality, rounded to two decimals.
pub fn overall_quality(headers: &[String], rows: &[Vec<String>], mappings: &[FieldMapping]) -> f64 {
    let confidence = mean(mappings.iter().map(|mapping| mapping.confidence.weight()));
    let field_quality = mean(mappings.iter().map(|mapping| mapping.data_quality_score));

    let total_cells = rows.iter().map(Vec::len).sum::<usize>();
    let filled_cells = rows
        .iter()
        .flatten()
        .filter(|cell| !inference::is_blank(cell))
        .count();
    let completeness = ratio(filled_cells, total_cells);

    let good_headers = headers
        .iter()
        .filter(|header| header.trim().chars().count() > 1)
        .count();
    let header_quality = ratio(good_headers, headers.len());

    let score =
        0.4 * confidence + 0.3 * completeness + 0.2 * field_quality + 0.1 * header_quality;
    round2(score).clamp(0.0, 1.0)
}

/// First matching rule wins.
pub fn detect_format(headers: &[String], row_count: usize) -> DetectedFormat {
    let lowered = headers
        .iter()
        .map(|header| header.to_lowercase())
        .collect::<Vec<_>>();
    let any = |needles: &[&str]| {
        lowered
            .iter()
            .any(|header| needles.iter().any(|needle| header.contains(needle)))
    };

    if any(&["report generated", "export date"]) {
        DetectedFormat::SystemExport
    } else if headers.len() > BULK_EXPORT_MIN_COLUMNS && row_count > BULK_EXPORT_MIN_ROWS {
        DetectedFormat::BulkDataExport
    } else if any(&["tenant", "resident"]) {
        DetectedFormat::TenantData
    } else if any(&["property", "unit"]) {
        DetectedFormat::PropertyData
    } else {
        DetectedFormat::StandardCsv
    }
}

/// Dialect table when a dialect was detected, else keyword votes over the
/// mapped target names (one vote per mapping per category; ties keep the
/// earlier category).
pub fn suggest_template(dialect: Option<Dialect>, mappings: &[FieldMapping]) -> TemplateCategory {
    if let Some(dialect) = dialect {
        return TemplateCategory::for_dialect(dialect);
    }
    let mut best = TemplateCategory::Properties;
    let mut best_votes = 0usize;
    for (category, keywords) in TEMPLATE_KEYWORDS {
        let votes = mappings
            .iter()
            .filter(|mapping| {
                keywords
                    .iter()
                    .any(|keyword| mapping.target_field.contains(keyword))
            })
            .count();
        if votes > best_votes {
            best = *category;
            best_votes = votes;
        }
    }
    best
}

fn recommend(dialect_match: Option<&DialectMatch>, mappings: &[FieldMapping]) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if let Some(found) = dialect_match
        && found.detected
        && found.confidence != Confidence::VeryLow
    {
        let title = found.dialect.title();
        recommendations.push(Recommendation {
            kind: RecommendationType::FormatCorrection,
            priority: Priority::High,
            title: format!("{title} export detected"),
            description: format!(
                "Headers match the {title} layout of a known property-management export ({} confidence)",
                found.confidence
            ),
            suggested_action: format!("Apply the {title} field mappings"),
            confidence: found.confidence,
            affected_fields: vec![found.dialect.id().to_string()],
        });
    }

    let uncertain = mappings
        .iter()
        .filter(|mapping| mapping.confidence.is_low())
        .map(|mapping| mapping.source_field.clone())
        .collect::<Vec<_>>();
    if !uncertain.is_empty() {
        recommendations.push(Recommendation {
            kind: RecommendationType::FieldMapping,
            priority: Priority::Medium,
            title: "Review low-confidence field mappings".to_string(),
            description: format!("{} field(s) have low confidence mappings", uncertain.len()),
            suggested_action: "Review and adjust the suggested mappings before importing".to_string(),
            confidence: Confidence::High,
            affected_fields: uncertain,
        });
    }

    let poor_quality = mappings
        .iter()
        .filter(|mapping| mapping.data_quality_score < QUALITY_ISSUE_THRESHOLD)
        .map(|mapping| mapping.source_field.clone())
        .collect::<Vec<_>>();
    if !poor_quality.is_empty() {
        recommendations.push(Recommendation {
            kind: RecommendationType::DataCleaning,
            priority: Priority::Medium,
            title: "Data quality issues detected".to_string(),
            description: format!("{} field(s) have data quality issues", poor_quality.len()),
            suggested_action: "Clean inconsistent or missing values before importing".to_string(),
            confidence: Confidence::High,
            affected_fields: poor_quality,
        });
    }

    let missing = ESSENTIAL_FIELDS
        .iter()
        .filter(|required| !mappings.iter().any(|mapping| mapping.target_field == **required))
        .map(|required| required.to_string())
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        recommendations.push(Recommendation {
            kind: RecommendationType::Validation,
            priority: Priority::High,
            title: "Missing required fields".to_string(),
            description: format!("Required fields not found: {}", missing.iter().join(", ")),
            suggested_action: "Add columns for the missing fields or map existing columns to them"
                .to_string(),
            confidence: Confidence::VeryHigh,
            affected_fields: missing,
        });
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn system_export_rule_beats_everything_else() {
        let headers = strings(&["Tenant", "Report Generated 2024-05-01"]);
        assert_eq!(detect_format(&headers, 0), DetectedFormat::SystemExport);
    }

    #[test]
    fn bulk_export_needs_wide_and_long_samples() {
        let headers = (0..11).map(|idx| format!("col{idx}")).collect::<Vec<_>>();
        assert_eq!(detect_format(&headers, 101), DetectedFormat::BulkDataExport);
        assert_eq!(detect_format(&headers, 100), DetectedFormat::StandardCsv);
    }

    #[test]
    fn tenant_mentions_win_over_property_mentions() {
        let headers = strings(&["Property", "Resident"]);
        assert_eq!(detect_format(&headers, 3), DetectedFormat::TenantData);
        let headers = strings(&["Unit", "Sq Ft"]);
        assert_eq!(detect_format(&headers, 3), DetectedFormat::PropertyData);
    }

    #[test]
    fn override_parsing_uses_last_equals() {
        assert_eq!(parse_override("a=b=c").unwrap(), ("a=b", "c"));
        assert_eq!(parse_override(" Unit = unit_number ").unwrap(), ("Unit", "unit_number"));
        assert!(parse_override("no-separator").is_err());
        assert!(parse_override("=target").is_err());
    }

    fn mapped(headers: &[&str]) -> Vec<FieldMapping> {
        headers
            .iter()
            .map(|header| {
                let column = ColumnSample {
                    header: header.to_string(),
                    values: Vec::new(),
                };
                mapping::generate_field_mapping(&column, None)
            })
            .collect()
    }

    #[test]
    fn keyword_votes_elect_a_template_without_dialect() {
        let work = mapped(&["Work Order", "Repair"]);
        assert_eq!(suggest_template(None, &work), TemplateCategory::Maintenance);

        let money = mapped(&["Amount", "Rent", "Notes"]);
        assert_eq!(suggest_template(None, &money), TemplateCategory::Financial);

        let result = analyze(&strings(&["Work Order", "Repair"]), &[]);
        assert!(result.dialect_match.is_none());
        assert_eq!(result.suggested_template, TemplateCategory::Maintenance);
    }

    #[test]
    fn tied_votes_keep_the_earlier_category() {
        let tenant_first = mapped(&["Tenant ID", "Amount"]);
        assert_eq!(suggest_template(None, &tenant_first), TemplateCategory::Tenants);
        let amount_first = mapped(&["Amount", "Tenant ID"]);
        assert_eq!(suggest_template(None, &amount_first), TemplateCategory::Tenants);
        assert_eq!(suggest_template(None, &[]), TemplateCategory::Properties);
    }

    #[test]
    fn dialect_overrides_keyword_votes() {
        let work = mapped(&["Work Order", "Repair"]);
        assert_eq!(
            suggest_template(Some(Dialect::RentRoll), &work),
            TemplateCategory::Financial
        );
    }

    #[test]
    fn priority_displays_wire_id() {
        assert_eq!(Priority::High.to_string(), "high");
        assert_eq!(Priority::Low.as_str(), "low");
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(overall_quality(&[], &[], &[]), 0.0);
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(0.5), 0.5);
    }
}
