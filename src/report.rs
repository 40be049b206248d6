//! Plain-text rendering of an analysis for terminal output.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::analysis::DataAnalysis;

const MAPPING_HEADERS: [&str; 6] = ["source", "target", "type", "confidence", "quality", "required"];

pub fn render_report(analysis: &DataAnalysis) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Detected format:    {}", analysis.detected_format);
    let _ = writeln!(output, "Suggested template: {}", analysis.suggested_template);
    let _ = writeln!(output, "Data quality score: {:.2}", analysis.data_quality_score);
    match &analysis.dialect_match {
        Some(found) => {
            let _ = writeln!(
                output,
                "Dialect:            {} ({}, score {})",
                found.dialect.title(),
                found.confidence,
                found.score
            );
        }
        None => {
            let _ = writeln!(output, "Dialect:            none");
        }
    }
    output.push('\n');

    let headers = MAPPING_HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>();
    let rows = analysis
        .field_mappings
        .iter()
        .map(|mapping| {
            vec![
                mapping.source_field.clone(),
                mapping.target_field.clone(),
                mapping.data_type.to_string(),
                mapping.confidence.to_string(),
                format!("{:.2}", mapping.data_quality_score),
                if mapping.is_required { "yes" } else { "" }.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    output.push_str(&render_table(&headers, &rows));

    if !analysis.recommendations.is_empty() {
        output.push('\n');
        let _ = writeln!(output, "Recommendations:");
        for (idx, recommendation) in analysis.recommendations.iter().enumerate() {
            let _ = writeln!(
                output,
                "{}. [{}] {}: {}",
                idx + 1,
                recommendation.priority,
                recommendation.title,
                recommendation.description
            );
            let _ = writeln!(output, "   -> {}", recommendation.suggested_action);
        }
    }
    output
}

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header. Cells beyond the header count are ignored.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(&sanitize_cell(cell)));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let rule = widths.iter().map(|w| "-".repeat((*w).max(1))).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let cell = sanitize_cell(value);
            let padding = width.saturating_sub(display_width(&cell));
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.truncate(line.trim_end().len());
    line
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_columns_and_trims_trailing_space() {
        let headers = vec!["a".to_string(), "bb".to_string()];
        let rows = vec![vec!["long".to_string(), "x".to_string()]];
        let rendered = render_table(&headers, &rows);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "a     bb");
        assert_eq!(lines[1], "----  --");
        assert_eq!(lines[2], "long  x");
    }

    #[test]
    fn report_lists_mappings_and_numbered_recommendations() {
        let headers = vec!["Description".to_string(), "Amount".to_string(), "Date".to_string()];
        let rows = vec![vec![
            "Rent payment".to_string(),
            "1200.50".to_string(),
            "2024-01-05".to_string(),
        ]];
        let rendered = render_report(&crate::analyze(&headers, &rows));
        assert!(rendered.contains("Detected format:    Standard CSV"));
        assert!(rendered.contains("Dialect:            Financial Data (low, score 3)"));
        assert!(rendered.contains("transaction_date"));
        assert!(rendered.contains("1. [high] Financial Data export detected"));
        assert!(rendered.contains("2. [high] Missing required fields"));
    }

    #[test]
    fn control_characters_are_flattened() {
        assert_eq!(sanitize_cell("a\tb\nc"), "a b c");
        assert!(matches!(sanitize_cell("plain"), Cow::Borrowed(_)));
    }
}
