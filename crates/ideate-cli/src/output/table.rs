//! Plain aligned tables for `--format table`.

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Narrowest a column is squeezed to when fitting the terminal.
const MIN_COLUMN: usize = 6;

/// Render an aligned table of string cells. Numeric cells are right-aligned.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
                .max(MIN_COLUMN)
        })
        .collect();

    fit_widths(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(widths.iter())
        .map(|(header, width)| pad(&truncate_text(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join("  ");
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(2 + rows.len());
    lines.push(header_line);
    lines.push(divider);
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let value = row.get(index).map_or("-", String::as_str);
                let text = truncate_text(value, *width);
                let padded = pad(&text, *width, looks_numeric(&text));
                if options.color {
                    colorize(&text, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line);
    }
    lines.join("\n")
}

/// Shrink the widest columns one char at a time until the row fits.
fn fit_widths(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let separators = widths.len().saturating_sub(1) * 2;

    while widths.iter().sum::<usize>() + separators > max_width {
        let candidate = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > headers[*idx].chars().count().max(MIN_COLUMN))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);
        let Some(idx) = candidate else {
            break;
        };
        widths[idx] -= 1;
    }
}

fn truncate_text(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E'))
        && trimmed.chars().any(|ch| ch.is_ascii_digit())
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

/// Color booleans and common status words. `padded` keeps its alignment
/// because escape codes wrap the whole padded cell.
fn colorize(text: &str, padded: String) -> String {
    let code = match text.to_ascii_lowercase().as_str() {
        "true" | "active" | "done" | "completed" => Some("32"),
        "pending" | "in_progress" | "archived" => Some("33"),
        "false" | "inactive" | "cancelled" => Some("31"),
        _ => None,
    };
    match code {
        Some(code) => format!("\u{1b}[{code}m{padded}\u{1b}[0m"),
        None => padded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn alignment_handles_mixed_widths() {
        let headers = ["id", "name", "price"];
        let rows = vec![
            vec!["products-1".to_string(), "Mouse".to_string(), "25".to_string()],
            vec![
                "products-200".to_string(),
                "A much longer name".to_string(),
                "1999.5".to_string(),
            ],
        ];

        let table = render_table(&headers, &rows, PLAIN);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].ends_with("    25"), "numbers right-align: {:?}", lines[2]);
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn narrow_terminal_truncates_widest_column() {
        let headers = ["id", "description"];
        let rows = vec![vec!["x".to_string(), "y".repeat(80)]];
        let table = render_table(
            &headers,
            &rows,
            TableOptions {
                max_width: Some(40),
                color: false,
            },
        );
        assert!(table.lines().all(|l| l.chars().count() <= 40));
        assert!(table.contains('…'));
    }

    #[test]
    fn color_wraps_known_words() {
        let rows = vec![vec!["true".to_string()]];
        let table = render_table(
            &["in_stock"],
            &rows,
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        assert!(table.contains("\u{1b}[32m"));
    }

    #[test]
    fn missing_cells_render_as_dash() {
        let table = render_table(&["a", "b"], &[vec!["1".to_string()]], PLAIN);
        assert!(table.lines().nth(2).is_some_and(|l| l.contains('-')));
    }
}
