use crate::db::models::ExportRecord;
use chrono::NaiveDate;
use std::fmt::Write;

pub const CSV_HEADER: [&str; 7] = [
    "Date",
    "Student Name",
    "Student ID",
    "Status",
    "Time",
    "Method",
    "Confidence",
];

/// `attendance_<CODE>_<YYYYMMDD>.csv`
pub fn export_filename(course_code: &str, on: NaiveDate) -> String {
    format!("attendance_{}_{}.csv", course_code, on.format("%Y%m%d"))
}

/// `90.5%`, `100.0%`; `N/A` when there is no (or a zero) confidence.
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(c) if c != 0.0 => format!("{c:?}%"),
        _ => "N/A".to_string(),
    }
}

fn push_field(line: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        line.push('"');
        line.push_str(&field.replace('"', "\"\""));
        line.push('"');
    } else {
        line.push_str(field);
    }
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let mut line = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        push_field(&mut line, field);
    }
    // CRLF row terminator, as spreadsheet tools expect
    let _ = write!(out, "{line}\r\n");
}

/// Render the export document: header row then one row per record, in order.
pub fn render_csv(records: &[ExportRecord]) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_HEADER);
    for r in records {
        let confidence = format_confidence(r.confidence);
        push_row(
            &mut out,
            [
                r.date.as_str(),
                r.student_name.as_str(),
                r.student_id.as_deref().unwrap_or(""),
                r.status.as_str(),
                r.timestamp.as_str(),
                r.method.as_str(),
                confidence.as_str(),
            ],
        );
    }
    out
}
