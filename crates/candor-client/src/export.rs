//! CSV export of the administrative feed.
//!
//! The column set and order are fixed.  Every data field is wrapped in
//! double quotes with internal quotes escaped by doubling, so free-text
//! messages cannot break the row structure.

use candor_shared::AdminFeedbackRecord;

/// Fixed export columns, in order.
pub const CSV_COLUMNS: [&str; 8] = [
    "Full Name",
    "Email",
    "Heading",
    "Category",
    "Subcategory",
    "Feedback",
    "Image Url",
    "Submitted Date and Time",
];

/// Quote one field, doubling any internal quotes.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render `records` as CSV with the fixed header row.
pub fn export_csv(records: &[AdminFeedbackRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_COLUMNS.join(","));

    for record in records {
        let submitted = record.submitted_at.format("%Y-%m-%d %H:%M:%S").to_string();
        let fields = [
            record.full_name.as_str(),
            record.email.as_str(),
            record.heading.as_str(),
            record.category.as_str(),
            record.subcategory.as_str(),
            record.message.as_str(),
            record.image_url.as_deref().unwrap_or(""),
            submitted.as_str(),
        ];
        lines.push(
            fields
                .iter()
                .map(|f| csv_field(f))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use candor_shared::SentimentLabel;
    use chrono::{TimeZone, Utc};

    fn record(message: &str) -> AdminFeedbackRecord {
        AdminFeedbackRecord {
            id: 1,
            heading: "Shuttle".into(),
            category: "Services".into(),
            subcategory: "Transportation".into(),
            message: message.into(),
            submitted_at: Utc.with_ymd_and_hms(2026, 8, 5, 9, 30, 0).unwrap(),
            image_url: None,
            full_name: "Ana Ruiz".into(),
            email: "ana@example.com".into(),
            sentiment: SentimentLabel::Negative,
        }
    }

    #[test]
    fn header_row_is_fixed() {
        let csv = export_csv(&[]);
        assert_eq!(
            csv,
            "Full Name,Email,Heading,Category,Subcategory,Feedback,Image Url,Submitted Date and Time"
        );
    }

    #[test]
    fn every_field_is_quoted() {
        let csv = export_csv(&[record("plain message")]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "\"Ana Ruiz\",\"ana@example.com\",\"Shuttle\",\"Services\",\"Transportation\",\"plain message\",\"\",\"2026-08-05 09:30:00\""
        );
    }

    #[test]
    fn internal_quotes_are_doubled() {
        let csv = export_csv(&[record("they said \"no\" twice")]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("\"they said \"\"no\"\" twice\""));
    }

    #[test]
    fn missing_image_url_exports_as_empty_field() {
        let csv = export_csv(&[record("m")]);
        assert!(csv.lines().nth(1).unwrap().contains(",\"\","));
    }
}
