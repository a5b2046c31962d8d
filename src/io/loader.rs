// src/io/loader.rs

//! Reads inventory exports into [`InventoryRecord`]s.
//!
//! Headers are normalized (trimmed, lower-cased, accents folded, spaces to
//! underscores) so `Stock SF`, `stock_sf` and ` STOCK SF ` all land on the same
//! column. Malformed cells become 0 and are logged; only missing required
//! columns stop the load.

use crate::error::{PlanError, PlanResult};
use crate::model::{Branch, InventoryRecord};
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub const REQUIRED_COLUMNS: [&str; 10] = [
    "codigo",
    "subfamilia",
    "qpres_total",
    "qrem_total",
    "qty_piezas",
    "peso",
    "stock_sf",
    "stock_ba",
    "stock_mdz",
    "stock_slt",
];

/// Satellite warehouses whose stock counts as SF physical stock.
const SF_STOCK_COLUMNS: [&str; 5] = [
    "stock_sf",
    "stock_aux",
    "stock_sv_arg",
    "stock_sv_min",
    "stock_ns_noa",
];

/// Column holding stock travelling towards each branch.
pub fn transit_column(branch: Branch) -> &'static str {
    match branch {
        Branch::Sf => "qty_ee_transito_sf",
        Branch::Ba => "qty_transito_ba",
        Branch::Mdz => "qty_transito_mdz",
        Branch::Slt => "qty_ot_transito_slt",
    }
}

/// Column holding committed internal transfers towards each branch.
///
/// SLT's internal transfer column already serves as its transit column.
pub fn inbound_column(branch: Branch) -> Option<&'static str> {
    match branch {
        Branch::Sf => Some("qty_ot_transito_sf"),
        Branch::Ba => Some("qty_ot_transito_ba"),
        Branch::Mdz => Some("qty_ot_transito_mdz"),
        Branch::Slt => None,
    }
}

pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            ' ' => '_',
            other => other,
        })
        .collect()
}

/// Picks `;` when it is more frequent than `,` in the first KiB.
pub fn sniff_delimiter(content: &str) -> u8 {
    let sample: String = content.chars().take(1024).collect();
    let semicolons = sample.matches(';').count();
    let commas = sample.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// UTF-8 first, Latin-1 as fallback (every byte maps to one char).
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

pub fn missing_columns(headers: &HashMap<String, usize>) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.contains_key(**c))
        .map(|c| c.to_string())
        .collect()
}

struct Row<'a> {
    fields: &'a StringRecord,
    headers: &'a HashMap<String, usize>,
    line: usize,
}

impl Row<'_> {
    fn has(&self, column: &str) -> bool {
        self.headers.contains_key(column)
    }

    fn text(&self, column: &str) -> String {
        self.headers
            .get(column)
            .and_then(|&i| self.fields.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Absent or blank cells are 0; anything unparsable or negative is 0 with a warning.
    fn number(&self, column: &str) -> f64 {
        let raw = self.text(column);
        if raw.is_empty() {
            return 0.0;
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => value,
            _ => {
                warn!(line = self.line, column, value = %raw, "coercing malformed value to 0");
                0.0
            }
        }
    }

    fn sum(&self, columns: &[&str]) -> f64 {
        columns.iter().map(|c| self.number(c)).sum()
    }

    fn to_record(&self) -> InventoryRecord {
        let mut record = InventoryRecord::new(self.text("codigo"));
        record.description = self.text("descripcion");
        record.subfamily = self.text("subfamilia");
        record.subfamily2 = self.text("subfamilia2");
        record.stock_group = self.text("grupo_stock");
        record.disabled = self.text("inhabilitado").eq_ignore_ascii_case("si");

        let lot = self.number("qty_piezas").round();
        record.lot_size = if lot >= 1.0 { lot as u32 } else { 1 };
        record.weight = self.number("peso");
        record.volume = self.number("volumen");

        for branch in Branch::ALL {
            let figures = record.branch_mut(branch);
            figures.stock = match branch {
                Branch::Sf => self.sum(&SF_STOCK_COLUMNS),
                _ => self.number(&format!("stock_{}", branch.key())),
            };
            figures.in_transit = self.number(transit_column(branch));
            figures.inbound = inbound_column(branch).map_or(0.0, |c| self.number(c));
            figures.presented = self.number(&format!("qpres{}", branch.key()));
            figures.remitted = self.number(&format!("qrem{}", branch.key()));
        }

        record.presented_total = self.number("qpres_total");
        record.remitted_total = self.number("qrem_total");
        record.stock_total = if self.has("stock_total") {
            self.number("stock_total")
        } else {
            record.branches.iter().map(|b| b.stock).sum()
        };
        record
    }
}

/// Loads records from any reader.
///
/// Fails only on I/O errors or missing required columns; a row the CSV parser
/// rejects is skipped with a warning.
pub fn load_inventory<R: Read>(mut reader: R) -> PlanResult<Vec<InventoryRecord>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let content = decode(bytes);

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(&content))
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: HashMap<String, usize> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (normalize_header(h), i))
        .collect();

    let missing = missing_columns(&headers);
    if !missing.is_empty() {
        return Err(PlanError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let line = i + 2;
        let fields = match result {
            Ok(fields) => fields,
            Err(err) => {
                warn!(line, error = %err, "skipping unreadable row");
                continue;
            }
        };
        let row = Row {
            fields: &fields,
            headers: &headers,
            line,
        };
        records.push(row.to_record());
    }

    info!(rows = records.len(), "inventory loaded");
    Ok(records)
}

pub fn load_inventory_file(file_path: &str) -> PlanResult<Vec<InventoryRecord>> {
    let file = File::open(Path::new(file_path))?;
    load_inventory(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Código,Descripción,Subfamilia,Subfamilia2,Qty Piezas,Peso,Volumen,\
qpres total,qrem total,Stock SF,Stock Aux,Stock BA,Stock MDZ,Stock SLT,\
qpressf,qremsf,qpresba,qremba,qty_transito_ba,qty_ot_transito_sf,Inhabilitado,Grupo Stock";

    #[test]
    fn normalizes_headers() {
        assert_eq!(normalize_header(" Código "), "codigo");
        assert_eq!(normalize_header("Stock SV ARG"), "stock_sv_arg");
        assert_eq!(normalize_header("Descripción2"), "descripcion2");
    }

    #[test]
    fn sniffs_semicolons() {
        assert_eq!(sniff_delimiter("a;b;c\n1;2,5;3"), b';');
        assert_eq!(sniff_delimiter("a,b,c"), b',');
    }

    #[test]
    fn loads_branch_figures_and_sf_satellites() {
        let csv = format!(
            "{HEADER}\nA1,Filtro,DONALDSON,,12,1.5,0.2,20,15,10,4,3,0,1,8,6,12,9,2,5,no,\n"
        );
        let records = load_inventory(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.code, "A1");
        assert_eq!(r.lot_size, 12);
        assert_eq!(r.branch(Branch::Sf).stock, 14.0);
        assert_eq!(r.branch(Branch::Sf).inbound, 5.0);
        assert_eq!(r.branch(Branch::Ba).in_transit, 2.0);
        assert_eq!(r.branch(Branch::Ba).presented, 12.0);
        assert_eq!(r.branch(Branch::Mdz).presented, 0.0);
        // no stock_total column: physical stock summed over branches
        assert_eq!(r.stock_total, 18.0);
        assert!(!r.disabled);
    }

    #[test]
    fn malformed_numbers_become_zero_and_lot_defaults_to_one() {
        let csv = format!("{HEADER}\nB2,x,TURBO,,abc,-3,,n/a,4,1,0,0,0,0,,,,,,,SI,\n");
        let records = load_inventory(csv.as_bytes()).unwrap();
        let r = &records[0];
        assert_eq!(r.lot_size, 1);
        assert_eq!(r.weight, 0.0);
        assert_eq!(r.presented_total, 0.0);
        assert_eq!(r.remitted_total, 4.0);
        assert!(r.disabled);
    }

    #[test]
    fn reports_every_missing_column() {
        let err = load_inventory("codigo;subfamilia;peso\nA;B;1\n".as_bytes()).unwrap_err();
        match err {
            PlanError::MissingColumns(cols) => {
                assert_eq!(cols.len(), 7);
                assert!(cols.contains(&"qty_piezas".to_string()));
                assert!(cols.contains(&"stock_slt".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn latin1_input_is_decoded() {
        let mut bytes = b"C\xf3digo;subfamilia;qpres_total;qrem_total;qty_piezas;peso;".to_vec();
        bytes.extend_from_slice(b"stock_sf;stock_ba;stock_mdz;stock_slt\nZ9;OTRA;1;1;1;0;1;0;0;0\n");
        let records = load_inventory(bytes.as_slice()).unwrap();
        assert_eq!(records[0].code, "Z9");
    }
}
