//! Parsing of the yard listing pages

use crate::error::{InventoryError, InventoryResult};
use crate::models::{VehicleRecord, CSV_HEADERS};
use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> InventoryResult<Selector> {
    Selector::parse(css).map_err(|e| InventoryError::Html(format!("bad selector {css}: {e}")))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Read the total page count from the pager input.
///
/// The page carries several `input.form-control` elements; the second one
/// holds `data-pagecount`.
pub fn parse_page_count(body: &str) -> InventoryResult<u32> {
    let document = Html::parse_document(body);
    let input_sel = selector("input.form-control")?;

    let pager = document
        .select(&input_sel)
        .nth(1)
        .ok_or_else(|| InventoryError::Html("pager input not found".to_string()))?;

    let raw = pager
        .value()
        .attr("data-pagecount")
        .ok_or_else(|| InventoryError::Html("pager input has no data-pagecount".to_string()))?;

    raw.trim()
        .parse::<u32>()
        .map_err(|_| InventoryError::Html(format!("invalid data-pagecount: {raw:?}")))
}

/// Parse the inventory table of one listing page into records.
///
/// Only `Row, Vin, Year, Make, Model` are kept, located by header text.
/// Rows with too few cells or whose numbers do not parse are skipped
/// with a warning.
pub fn parse_inventory_table(body: &str) -> InventoryResult<Vec<VehicleRecord>> {
    let document = Html::parse_document(body);
    let table_sel = selector("table.table")?;
    let tr_sel = selector("tr")?;
    let th_sel = selector("th")?;
    let td_sel = selector("td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| InventoryError::Html("inventory table not found".to_string()))?;

    let headers: Vec<String> = table
        .select(&tr_sel)
        .find(|tr| tr.select(&th_sel).next().is_some())
        .map(|tr| tr.select(&th_sel).map(cell_text).collect())
        .ok_or_else(|| InventoryError::Html("inventory table has no header row".to_string()))?;

    let mut columns = [0usize; 5];
    for (slot, name) in columns.iter_mut().zip(CSV_HEADERS) {
        *slot = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| InventoryError::Html(format!("column {name} missing from table")))?;
    }
    let [row_col, vin_col, year_col, make_col, model_col] = columns;
    let width = columns.iter().copied().max().unwrap_or(0) + 1;

    let mut records = Vec::new();
    for tr in table.select(&tr_sel) {
        let cells: Vec<String> = tr.select(&td_sel).map(cell_text).collect();
        if cells.is_empty() {
            continue;
        }
        if cells.len() < width {
            log::warn!("Skipping short inventory row: {:?}", cells);
            continue;
        }

        let row_number = cells[row_col].parse::<u32>();
        let year = cells[year_col].parse::<i32>();
        match (row_number, year) {
            (Ok(row_number), Ok(year)) => records.push(VehicleRecord {
                row_number,
                vin: cells[vin_col].clone(),
                year,
                make: cells[make_col].clone(),
                model: cells[model_col].clone(),
            }),
            _ => log::warn!("Skipping malformed inventory row: {:?}", cells),
        }
    }

    Ok(records)
}
