// src/utils/table.rs
use crate::extractors::attributes::{ExtractedRecord, SUMMARY_COLUMNS};

/// Renders records as a left-aligned text table: header row, separator row,
/// then one row per record in extraction order.
pub fn render_table(records: &[ExtractedRecord]) -> String {
    // Column widths are measured in characters, not bytes
    let mut widths: Vec<usize> = SUMMARY_COLUMNS.iter().map(|c| c.chars().count()).collect();
    for record in records {
        for (width, cell) in widths.iter_mut().zip(record.cells()) {
            *width = (*width).max(display_cell(cell).chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &widths, SUMMARY_COLUMNS.iter().copied());

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &widths, separator.iter().map(String::as_str));

    for record in records {
        push_row(&mut out, &widths, record.cells().into_iter());
    }
    out
}

/// Returns at most `max_chars` characters from the start of `text`,
/// cut on a character boundary.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

// Raw lines may carry a trailing '\r' from CRLF input; keep it out of the terminal.
fn display_cell(cell: &str) -> &str {
    cell.trim_end_matches('\r')
}

fn push_row<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let cell = display_cell(cell);
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(brand: &str, price: &str, raw: &str) -> ExtractedRecord {
        ExtractedRecord {
            brand: brand.to_string(),
            price: price.to_string(),
            raw_line: raw.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_table_has_header_separator_and_rows() {
        let records = vec![
            record("Dell", "$799", "Dell laptop $799"),
            record("Lenovo", "", "Lenovo ThinkPad"),
        ];
        let rendered = render_table(&records);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4, "header + separator + 2 rows, got:\n{}", rendered);
        assert!(lines[0].starts_with("Brand "));
        assert!(lines[0].ends_with("Raw Line"));
        assert!(lines[1].starts_with("------"));
        assert!(lines[2].starts_with("Dell   | "));
        assert!(lines[3].starts_with("Lenovo | "));
        assert!(lines[3].ends_with("Lenovo ThinkPad"));
    }

    #[test]
    fn test_render_table_empty_is_header_only() {
        let rendered = render_table(&[]);
        assert_eq!(rendered.lines().count(), 2);
        assert_eq!(
            rendered.lines().next().unwrap(),
            "Brand | Processor | RAM | Storage | Price | Raw Line"
        );
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("héllo wörld", 4), "héll");
        assert_eq!(preview("short", 1000), "short");
        assert_eq!(preview("", 10), "");
        assert_eq!(preview("abc", 0), "");
    }
}
