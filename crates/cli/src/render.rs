//! Plain-text table rendering for terminal output.

use rimtrack_io::export::{Grid, GridCell};

use crate::util::{display_width, fit, Align};

const MAX_COL_WIDTH: usize = 40;

/// Render a grid as an aligned table with a header rule. Numbers are
/// right-aligned; everything else left-aligned.
pub fn render_grid(grid: &Grid) -> String {
    let cells: Vec<Vec<String>> = grid
        .rows
        .iter()
        .map(|row| row.iter().map(format_cell).collect())
        .collect();

    let mut widths: Vec<usize> = grid.headers.iter().map(|h| display_width(h)).collect();
    for row in &cells {
        for (i, s) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(display_width(s));
            }
        }
    }
    for w in &mut widths {
        *w = (*w).min(MAX_COL_WIDTH);
    }

    let mut out = String::new();
    let header: Vec<String> = grid.headers.iter().zip(&widths).map(|(h, w)| fit(h, *w, Align::Left)).collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for (row, formatted) in grid.rows.iter().zip(&cells) {
        let line: Vec<String> = row
            .iter()
            .zip(formatted)
            .zip(&widths)
            .map(|((cell, s), w)| match cell {
                GridCell::Number(_) => fit(s, *w, Align::Right),
                _ => fit(s, *w, Align::Left),
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }

    out
}

fn format_cell(cell: &GridCell) -> String {
    match cell {
        GridCell::Number(n) => format_mileage(*n),
        other => other.display(),
    }
}

/// Mileage with thousands separators; decimals kept only when present.
pub fn format_mileage(n: f64) -> String {
    let fixed = format!("{:.2}", n.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = frac.trim_end_matches('0');
    let sign = if n < 0.0 && fixed != "0.00" { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}
