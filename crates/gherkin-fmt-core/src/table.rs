use crate::error::{FormatError, FormatResult};

/// Render table rows as aligned, pipe-delimited lines.
///
/// Column widths are seeded from the first row and widened by later rows.
/// A later row carrying more columns than the first is rejected rather than
/// silently truncated. Rows with fewer columns render only the columns they
/// have.
pub fn format_rows(rows: &[Vec<String>]) -> FormatResult<Vec<String>> {
    let widths = column_widths(rows)?;

    Ok(rows
        .iter()
        .map(|row| {
            let mut line = String::new();
            for (cell, width) in row.iter().zip(&widths) {
                line.push_str("| ");
                line.push_str(cell);
                for _ in cell.chars().count()..*width {
                    line.push(' ');
                }
                line.push(' ');
            }
            line.push('|');
            line
        })
        .collect())
}

fn column_widths(rows: &[Vec<String>]) -> FormatResult<Vec<usize>> {
    let mut widths: Vec<usize> = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        for (column, cell) in row.iter().enumerate() {
            let length = cell.chars().count();
            if index == 0 {
                widths.push(length);
            } else if column >= widths.len() {
                return Err(FormatError::RaggedTable { row: index + 1 });
            } else if widths[column] < length {
                widths[column] = length;
            }
        }
    }

    Ok(widths)
}
