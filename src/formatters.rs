use crate::models::InventoryRow;
use crate::query::{LocationResult, QueryReport};

pub const SEPARATOR: &str = "\n---------------\n";

/// Render rows as an aligned text table. Engine columns appear only when
/// at least one row was enriched.
pub fn format_table(rows: &[InventoryRow]) -> String {
    let with_engine = rows.iter().any(|r| r.engine.is_some());

    let mut header: Vec<String> = ["Row", "Vin", "Year", "Make", "Model"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    if with_engine {
        header.extend(["Displacement", "Cylinders", "Engine"].iter().map(|h| h.to_string()));
    }

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let record = &row.record;
            let mut cells = vec![
                record.row_number.to_string(),
                record.vin.clone(),
                record.year.to_string(),
                record.make.clone(),
                record.model.clone(),
            ];
            if with_engine {
                match &row.engine {
                    Some(engine) => {
                        cells.push(format!("{:.1}", engine.displacement_liters));
                        cells.push(engine.cylinder_count.clone().unwrap_or_default());
                        cells.push(engine.engine_model.clone().unwrap_or_default());
                    }
                    None => cells.extend([String::new(), String::new(), String::new()]),
                }
            }
            cells
        })
        .collect();

    // Calculate maximum lengths for alignment
    // Padding counts chars, so widths must too
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(body.len() + 1);
    lines.push(render_line(&header));
    for cells in &body {
        lines.push(render_line(cells));
    }
    lines.join("\n")
}

fn format_location_block(result: &LocationResult, description: &str) -> String {
    format!(
        "{} inventory\nFound {} instances of {}\n{}",
        result.location,
        result.count(),
        description,
        format_table(&result.rows)
    )
}

fn format_not_found(location: &str, description: &str) -> String {
    format!("No instances of {} found in {}", description, location)
}

fn format_full_listing(result: &LocationResult) -> String {
    format!(
        "{} inventory\n{} vehicles\n{}",
        result.location,
        result.count(),
        format_table(&result.rows)
    )
}

/// Merge both locations into one report.
///
/// Both empty gives a single combined message; otherwise each location
/// contributes either its "not found" line or its block, separated.
pub fn format_report(report: &QueryReport) -> String {
    let [first, second] = &report.locations;

    if report.params.is_empty() {
        return format!(
            "{}{SEPARATOR}{}{SEPARATOR}",
            format_full_listing(first),
            format_full_listing(second)
        );
    }

    let description = report.params.describe();

    if first.rows.is_empty() && second.rows.is_empty() {
        return format!(
            "No instances of {} found in {} or {}",
            description, first.location, second.location
        );
    }

    let section = |result: &LocationResult| {
        if result.rows.is_empty() {
            format_not_found(&result.location, &description)
        } else {
            format_location_block(result, &description)
        }
    };

    format!("{}{SEPARATOR}{}{SEPARATOR}", section(first), section(second))
}
