//! CSV rendering of structured artifacts.

use crate::ai::Record;

/// Render records as CSV.
///
/// The header row holds the bare field names. Every value is quoted with
/// embedded quotes doubled. Rows are joined with `\n` and there is no
/// trailing newline.
pub fn to_csv<R: Record>(records: &[R]) -> String {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(R::FIELDS.join(","));

    for record in records {
        let row: Vec<String> = record.values().into_iter().map(quote).collect();
        rows.push(row.join(","));
    }

    rows.join("\n")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
