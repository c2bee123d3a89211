use crate::domain::lead::RowSet;

const HEADERS: [&str; 4] = ["Name", "Phone", "WhatsApp", "Source"];

/// Plain-text table of rows for the terminal.
pub fn render_rows(rows: &RowSet) -> String {
    if rows.is_empty() {
        return "No results.\n".to_string();
    }

    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.name.clone(),
                row.export_phone().to_string(),
                row.validation_status().to_string(),
                row.source.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |values: [&str; 4]| {
        values
            .iter()
            .zip(widths)
            .map(|(value, width)| format!("{:<width$}", value, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&format_line(HEADERS));
    out.push('\n');
    for line in &cells {
        out.push_str(&format_line([
            line[0].as_str(),
            line[1].as_str(),
            line[2].as_str(),
            line[3].as_str(),
        ]));
        out.push('\n');
    }
    out
}

/// One-line count of rows per status, e.g. `valid: 3, unvalidated: 1`.
pub fn status_summary(rows: &RowSet) -> String {
    rows.status_counts()
        .iter()
        .map(|(status, count)| format!("{}: {}", status, count))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead::{LeadRow, ValidationStatus};
    use crate::domain::phone::PhoneNormalizer;

    #[test]
    fn test_empty_table() {
        assert_eq!(render_rows(&RowSet::empty()), "No results.\n");
    }

    #[test]
    fn test_columns_are_aligned() {
        let n = PhoneNormalizer::default();
        let rows = RowSet::new(vec![
            LeadRow::new("Padaria X", "(41) 99999-0000", &n)
                .with_source("maps")
                .with_validation_status(ValidationStatus::Valid),
            LeadRow::new("Y", "", &n),
        ]);

        let table = render_rows(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Name       Phone           WhatsApp"));
        assert_eq!(lines[1], "Padaria X  +5541999990000  valid        maps");
        assert_eq!(lines[2], "Y                          unvalidated");
        assert_eq!(status_summary(&rows), "valid: 1, unvalidated: 1");
    }
}
