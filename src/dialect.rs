//! Detection of known property-management export dialects.
//!
//! Each dialect catalog is scored by how many headers it recognises. Marker
//! tokens in headers and record-shaped values in the first sample row add to
//! a shared bonus pool. The pooled total, normalised by the header count plus
//! the marker pool size, becomes the detection confidence.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{self, Dialect},
    confidence::Confidence,
};

/// Bonus for each marker token found in a header.
const MARKER_BONUS: usize = 2;

/// Fixed share of the confidence denominator reserved for marker bonuses.
const MARKER_POOL_SIZE: usize = 4;

/// Minimum pooled score before any dialect is reported.
const MIN_DETECTION_SCORE: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialectMatch {
    pub detected: bool,
    pub dialect: Dialect,
    pub confidence: Confidence,
    /// Pooled raw score that produced `confidence`.
    pub score: usize,
}

/// Number of headers recognised by `dialect`; each header counts at most once.
pub fn dialect_score<S: AsRef<str>>(dialect: Dialect, headers: &[S]) -> usize {
    let fields = catalog::dialect_fields(dialect);
    headers
        .iter()
        .filter(|header| catalog::match_field(fields, header.as_ref()).is_some())
        .count()
}

fn marker_bonus<S: AsRef<str>>(headers: &[S]) -> usize {
    let markers = catalog::dialect_markers();
    headers
        .iter()
        .map(|header| {
            let header = header.as_ref();
            markers.iter().filter(|marker| marker.is_match(header)).count() * MARKER_BONUS
        })
        .sum()
}

/// Structural hints in the first sample row: record codes such as `T0001234`
/// and six to eight digit ids under a tenant column.
fn first_row_bonus(headers: &[String], rows: &[Vec<String>]) -> usize {
    let Some(first) = rows.first() else {
        return 0;
    };
    let mut bonus = 0usize;
    for (idx, value) in first.iter().enumerate() {
        let value = value.trim();
        if catalog::is_record_code(value) {
            bonus += 1;
        }
        let under_tenant = headers
            .get(idx)
            .is_some_and(|header| header.to_lowercase().contains("tenant"));
        if under_tenant && catalog::is_numeric_id(value) {
            bonus += 1;
        }
    }
    bonus
}

/// Scores `headers` (and the first of `rows`) against every known dialect.
///
/// Returns `None` when the pooled score is below three or the resulting
/// confidence is very low; callers then fall back to the generic catalog.
pub fn detect_dialect(headers: &[String], rows: &[Vec<String>]) -> Option<DialectMatch> {
    let mut best: Option<(Dialect, usize)> = None;
    for dialect in Dialect::ALL {
        let score = dialect_score(dialect, headers);
        debug!("Dialect {dialect} recognised {score} header(s)");
        if score > best.map_or(0, |(_, top)| top) {
            best = Some((dialect, score));
        }
    }

    let markers = marker_bonus(headers);
    let clues = first_row_bonus(headers, rows);
    let total = best.map_or(0, |(_, score)| score) + markers + clues;
    let ratio = total as f64 / (headers.len() + MARKER_POOL_SIZE) as f64;
    let confidence = Confidence::from_score(ratio);
    debug!(
        "Dialect scoring: best={best:?} markers={markers} clues={clues} total={total} confidence={confidence}"
    );

    let (dialect, _) = best?;
    if total < MIN_DETECTION_SCORE || confidence == Confidence::VeryLow {
        return None;
    }
    Some(DialectMatch {
        detected: true,
        dialect,
        confidence,
        score: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn score_counts_each_header_once() {
        let headers = ["Tenant Name", "Unit", "Move In", "Rent", "Favorite Color"];
        assert_eq!(dialect_score(Dialect::TenantData, &headers), 4);
    }

    #[test]
    fn markers_add_two_per_match() {
        assert_eq!(marker_bonus(&["Yardi Voyager Export", "Unit"]), 4);
        assert_eq!(marker_bonus(&["PMS Export Id"]), 2);
        assert_eq!(marker_bonus(&["Unit"]), 0);
    }

    #[test]
    fn first_row_clues_need_tenant_header_for_numeric_ids() {
        let headers = strings(&["Tenant", "Code", "Other"]);
        let rows = vec![strings(&["1234567", "T0001", "7654321"])];
        assert_eq!(first_row_bonus(&headers, &rows), 2);
    }

    #[test]
    fn confidence_divides_by_headers_plus_marker_pool() {
        let headers = strings(&["Yardi Ref", "Unit", "Rent"]);
        let found = detect_dialect(&headers, &[]).expect("dialect");
        assert_eq!(found.score, 4);
        assert_eq!(found.confidence, Confidence::Medium);
    }

    #[test]
    fn unrecognised_headers_detect_nothing() {
        let headers = strings(&["alpha", "beta", "gamma"]);
        assert_eq!(detect_dialect(&headers, &[]), None);
    }
}
