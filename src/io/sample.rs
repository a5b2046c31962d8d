// src/io/sample.rs

use crate::error::{PlanError, PlanResult};
use crate::io::loader::{inbound_column, transit_column};
use crate::model::{Branch, BranchFigures, InventoryRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// (subfamily, subfamily2, lot size) combinations covering every family.
const CATALOGUE: [(&str, &str, u32); 7] = [
    ("REPUESTOS KTN", "GET KTN", 4),
    ("REPUESTOS KTN", "RODAJE KTN", 2),
    ("DONALDSON", "FILTROS", 12),
    ("TURBO", "TURBOS", 6),
    ("IMPORTADOS", "FILTROS KTN", 12),
    ("NORDIC LIGHTS", "", 1),
    ("VARIOS", "", 1),
];

/// Draws a non-negative whole quantity from a normal distribution.
fn draw(rng: &mut StdRng, normal: &Normal<f64>) -> f64 {
    normal.sample(rng).round().max(0.0)
}

/// Generates a synthetic inventory table.
///
/// Remitted is drawn around `mean_demand`, presented is remitted plus a random
/// unmet share, and stock is spread unevenly so both surplus and shortage show
/// up. The same seed always yields the same table.
pub fn generate_inventory(
    rows: usize,
    mean_demand: f64,
    seed: u64,
) -> PlanResult<Vec<InventoryRecord>> {
    if !mean_demand.is_finite() || mean_demand < 0.0 {
        return Err(PlanError::invalid(
            "mean_demand",
            format!("expected a non-negative finite mean, got {mean_demand}"),
        ));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let demand = Normal::new(mean_demand, mean_demand / 3.0)
        .map_err(|e| PlanError::invalid("mean_demand", e.to_string()))?;

    let records = (0..rows)
        .map(|i| {
            let (subfamily, subfamily2, lot) = CATALOGUE[i % CATALOGUE.len()];
            let mut record = InventoryRecord {
                description: format!("Sample item {}", i + 1),
                subfamily: subfamily.to_string(),
                subfamily2: subfamily2.to_string(),
                lot_size: lot,
                weight: rng.gen_range(0.1..25.0),
                volume: rng.gen_range(0.001..0.2),
                ..InventoryRecord::new(format!("SKU{:05}", i + 1))
            };

            for branch in Branch::ALL {
                let remitted = draw(&mut rng, &demand);
                let unmet: f64 = rng.gen_range(0.0..0.8);
                // the source-like branch tends to hold most of the stock
                let stock_factor = if branch == Branch::Sf { 1.5 } else { 0.4 };
                let stock = (remitted * rng.gen_range(0.0..stock_factor)).round();

                record = record.with_branch(
                    branch,
                    BranchFigures {
                        stock,
                        in_transit: if rng.gen_bool(0.1) { lot as f64 } else { 0.0 },
                        inbound: 0.0,
                        presented: (remitted * (1.0 + unmet)).round(),
                        remitted,
                    },
                );
            }
            record.with_totals_from_branches()
        })
        .collect();
    Ok(records)
}

/// Writes records back in the loader's input layout.
pub fn write_inventory<W: Write>(writer: W, records: &[InventoryRecord]) -> PlanResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut headers: Vec<String> = [
        "codigo",
        "descripcion",
        "subfamilia",
        "subfamilia2",
        "grupo_stock",
        "inhabilitado",
        "qty_piezas",
        "peso",
        "volumen",
        "qpres_total",
        "qrem_total",
        "stock_total",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    for branch in Branch::ALL {
        let key = branch.key();
        headers.extend([
            format!("stock_{key}"),
            format!("qpres{key}"),
            format!("qrem{key}"),
            transit_column(branch).to_string(),
        ]);
        if let Some(column) = inbound_column(branch) {
            headers.push(column.to_string());
        }
    }
    wtr.write_record(&headers)?;

    for record in records {
        let mut row = vec![
            record.code.clone(),
            record.description.clone(),
            record.subfamily.clone(),
            record.subfamily2.clone(),
            record.stock_group.clone(),
            if record.disabled { "si" } else { "no" }.to_string(),
            record.lot_size.to_string(),
            record.weight.to_string(),
            record.volume.to_string(),
            record.presented_total.to_string(),
            record.remitted_total.to_string(),
            record.stock_total.to_string(),
        ];
        for branch in Branch::ALL {
            let figures = record.branch(branch);
            row.extend([
                figures.stock.to_string(),
                figures.presented.to_string(),
                figures.remitted.to_string(),
                figures.in_transit.to_string(),
            ]);
            if inbound_column(branch).is_some() {
                row.push(figures.inbound.to_string());
            }
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_sample_file(file_path: &str, rows: usize, seed: u64) -> PlanResult<()> {
    let records = generate_inventory(rows, 24.0, seed)?;
    let file = std::fs::File::create(Path::new(file_path))?;
    write_inventory(file, &records)?;

    info!(rows, seed, path = file_path, "sample inventory written");
    Ok(())
}
