mod common;

use common::strings;
use import_analyzer::{
    catalog::Dialect,
    confidence::Confidence,
    dialect::{detect_dialect, dialect_score},
    inference::{DataType, completeness_ratio, consistency_ratio, infer_data_type},
};

#[test]
fn four_of_five_emails_is_email() {
    let values = [
        "a@b.com",
        "c@d.org",
        "e@f.net",
        "not-an-email",
        "g@h.io",
    ];
    assert_eq!(infer_data_type(&values), DataType::Email);
    assert!((consistency_ratio(&values, DataType::Email) - 0.8).abs() < 1e-9);
}

#[test]
fn three_of_five_emails_falls_back_to_string() {
    let values = ["a@b.com", "c@d.org", "not-an-email", "still-not", "g@h.io"];
    assert_eq!(infer_data_type(&values), DataType::String);
}

#[test]
fn scalar_shapes_are_recognised() {
    assert_eq!(
        infer_data_type(&["555-123-4567", "(555) 234-5678", "+1 555 345 6789"]),
        DataType::Phone
    );
    assert_eq!(
        infer_data_type(&["$1,200.00", "$950", "-$25.00"]),
        DataType::Currency
    );
    assert_eq!(
        infer_data_type(&["2024-01-05", "01/15/2024", "Jan 5, 2024"]),
        DataType::Date
    );
    assert_eq!(infer_data_type(&["12", "3.5", "1,234"]), DataType::Number);
    assert_eq!(infer_data_type(&["Yes", "No", "yes", "N"]), DataType::Boolean);
    assert_eq!(
        infer_data_type(&["123 Main St", "45 Oak Avenue", "9 Elm Rd, Apt 2"]),
        DataType::Address
    );
}

#[test]
fn blanks_are_ignored_for_type_but_count_against_completeness() {
    let values = ["", "2024-01-05", "  ", "2024-02-05"];
    assert_eq!(infer_data_type(&values), DataType::Date);
    assert!((completeness_ratio(&values) - 0.5).abs() < 1e-9);
    assert_eq!(completeness_ratio::<&str>(&[]), 0.0);
    assert_eq!(consistency_ratio(&["", ""], DataType::Date), 0.0);
}

#[test]
fn only_the_first_twenty_values_decide_the_type() {
    let mut values = vec!["42".to_string(); 20];
    values.extend(std::iter::repeat_n("forty-two".to_string(), 30));
    assert_eq!(infer_data_type(&values), DataType::Number);
    assert!(consistency_ratio(&values, DataType::Number) < 0.5);
}

#[test]
fn marker_tokens_lift_detection_confidence() {
    let headers = strings(&["Yardi Export Id", "Unit", "Rent"]);
    assert_eq!(dialect_score(Dialect::TenantData, &headers), 2);
    let found = detect_dialect(&headers, &[]).expect("marker lifts the pooled score");
    assert_eq!(found.dialect, Dialect::TenantData);
    assert_eq!(found.score, 4);
    assert_eq!(found.confidence, Confidence::Medium);
}

#[test]
fn first_row_record_codes_add_clues() {
    let headers = strings(&["TCode", "Tenant Name", "Unit", "Rent", "Move In", "Email", "Yardi Property"]);
    let rows = vec![strings(&[
        "T0001234",
        "Ada Lovelace",
        "101",
        "1200.00",
        "2024-01-01",
        "ada@example.com",
        "Maple Court",
    ])];
    let found = detect_dialect(&headers, &rows).expect("tenant dialect");
    assert_eq!(found.dialect, Dialect::TenantData);
    assert_eq!(found.score, 9);
    assert_eq!(found.confidence, Confidence::High);
}

#[test]
fn weak_evidence_reports_no_dialect() {
    let headers = strings(&["Tenant Name", "Notes"]);
    assert!(detect_dialect(&headers, &[]).is_none());
    assert!(detect_dialect(&[], &[]).is_none());
}
