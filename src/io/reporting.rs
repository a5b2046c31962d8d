// src/io/reporting.rs

use crate::error::PlanResult;
use crate::model::Branch;
use crate::planning::coverage::coverage_ratio;
use crate::planning::engine::{PlanOutcome, PlannedItem, ReplenishmentLine, ReturnLine};
use crate::planning::summary::{BranchSummary, FamilySummary};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Quantity-like columns are shown as integers.
fn qty(value: f64) -> String {
    format!("{:.0}", value)
}

/// Coverage, difference and ratio columns keep two decimals.
fn ratio(value: f64) -> String {
    format!("{:.2}", value)
}

/// Identity and derived columns shared by both tables.
const BASE_HEADERS: [&str; 15] = [
    "codigo",
    "descripcion",
    "familia_logica",
    "subfamilia",
    "subfamilia2",
    "qty_piezas",
    "peso",
    "volumen",
    "qpres_total",
    "qrem_total",
    "wp",
    "wf",
    "stock_total",
    "demanda_estimada_total",
    "cobertura_ini_total",
];

fn base_headers() -> Vec<String> {
    BASE_HEADERS.iter().map(|h| h.to_string()).collect()
}

fn base_row(item: &PlannedItem, global_coverage: f64) -> Vec<String> {
    let record = &item.record;
    vec![
        record.code.clone(),
        record.description.clone(),
        item.family.to_string(),
        record.subfamily.clone(),
        record.subfamily2.clone(),
        record.lot().to_string(),
        record.weight.to_string(),
        record.volume.to_string(),
        qty(record.presented_total),
        qty(record.remitted_total),
        ratio(item.weights.item),
        ratio(item.weights.family),
        qty(record.stock_total),
        qty(item.demand.total),
        ratio(global_coverage),
    ]
}

fn replenishment_headers(source: Branch) -> Vec<String> {
    let mut headers = base_headers();

    for branch in Branch::ALL {
        let key = branch.key();
        headers.extend([
            format!("stock_{key}"),
            format!("transito_{key}"),
            format!("demanda_estimada_{key}"),
            format!("cobertura_ini_{key}"),
            format!("target_eff_{key}"),
            format!("diff_{key}"),
        ]);
    }
    headers.extend([
        format!("retencion_{}", source.key()),
        format!("disponible_{}", source.key()),
    ]);
    for branch in source.others() {
        let key = branch.key();
        headers.extend([
            format!("pedido_{key}"),
            format!("final_enviar_{key}"),
            format!("cobertura_fin_{key}"),
        ]);
    }
    headers
}

fn replenishment_row(line: &ReplenishmentLine) -> Vec<String> {
    let item = &line.item;
    let record = &item.record;
    let mut row = base_row(item, line.coverage.global);

    for branch in Branch::ALL {
        let figures = record.branch(branch);
        let coverage = line.coverage.branch(branch);
        row.extend([
            qty(figures.stock),
            qty(figures.in_transit),
            qty(item.demand.branch(branch)),
            ratio(coverage.coverage),
            ratio(coverage.effective_target),
            ratio(coverage.difference),
        ]);
    }

    let allocation = &line.allocation;
    row.extend([
        allocation.retained.to_string(),
        allocation.available.to_string(),
    ]);
    for request in &allocation.requests {
        row.extend([
            request.desired.to_string(),
            allocation.shipped_to(request.branch).to_string(),
            ratio(line.final_coverage[request.branch.index()]),
        ]);
    }
    row
}

fn return_headers(source: Branch) -> Vec<String> {
    let mut headers = base_headers();

    let src = source.key();
    headers.extend([
        format!("stock_{src}"),
        format!("demanda_estimada_{src}"),
        format!("deficit_{src}"),
        format!("{src}_necesita_stock"),
    ]);
    for branch in source.others() {
        let key = branch.key();
        headers.extend([
            format!("stock_{key}"),
            format!("transito_{key}"),
            format!("demanda_estimada_{key}"),
            format!("cobertura_{key}"),
            format!("excedente_qty_{key}"),
            format!("excedente_peso_{key}"),
            format!("excedente_vol_{key}"),
            format!("prioridad_retorno_{key}"),
        ]);
    }
    headers
}

fn return_row(line: &ReturnLine) -> Vec<String> {
    let item = &line.item;
    let record = &item.record;
    let surplus = &line.surplus;
    let source = record.branch(surplus.source);

    let mut row = base_row(item, coverage_ratio(record.stock_total, item.demand.total));
    row.extend([
        qty(source.stock),
        qty(item.demand.branch(surplus.source)),
        ratio(surplus.source_need.deficit),
        surplus.source_need.needs_stock.to_string(),
    ]);
    for excess in &surplus.branches {
        let figures = record.branch(excess.branch);
        row.extend([
            qty(figures.stock),
            qty(figures.in_transit),
            qty(item.demand.branch(excess.branch)),
            ratio(excess.coverage),
            excess.quantity.to_string(),
            ratio(excess.weight),
            ratio(excess.volume),
            excess.priority.to_string(),
        ]);
    }
    row
}

/// Writes the detailed plan table. Returns the number of data rows.
///
/// An empty outcome produces no file content at all.
pub fn write_plan<W: Write>(writer: W, outcome: &PlanOutcome) -> PlanResult<usize> {
    let mut wtr = csv::Writer::from_writer(writer);

    let rows = match outcome {
        PlanOutcome::Replenishment(lines) => {
            if let Some(first) = lines.first() {
                wtr.write_record(replenishment_headers(first.allocation.source))?;
            }
            for line in lines {
                wtr.write_record(replenishment_row(line))?;
            }
            lines.len()
        }
        PlanOutcome::Return(lines) => {
            if let Some(first) = lines.first() {
                wtr.write_record(return_headers(first.surplus.source))?;
            }
            for line in lines {
                wtr.write_record(return_row(line))?;
            }
            lines.len()
        }
        PlanOutcome::Empty(_) => 0,
    };

    wtr.flush()?;
    Ok(rows)
}

pub fn write_plan_file(file_path: &str, outcome: &PlanOutcome) -> PlanResult<usize> {
    let file = std::fs::File::create(Path::new(file_path))?;
    let rows = write_plan(file, outcome)?;
    info!(rows, path = file_path, "plan exported");
    Ok(rows)
}

/// Writes per-branch totals, one serialized row per branch.
pub fn write_summary_file(file_path: &str, data: &[BranchSummary]) -> PlanResult<()> {
    let mut wtr = csv::Writer::from_path(Path::new(file_path))?;
    for summary in data {
        wtr.serialize(summary)?;
    }
    wtr.flush()?;

    info!(rows = data.len(), path = file_path, "summary exported");
    Ok(())
}

/// Writes per (branch, family) totals.
pub fn write_family_summary<W: Write>(writer: W, data: &[FamilySummary]) -> PlanResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for summary in data {
        wtr.serialize(summary)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_family_summary_file(file_path: &str, data: &[FamilySummary]) -> PlanResult<()> {
    let file = std::fs::File::create(Path::new(file_path))?;
    write_family_summary(file, data)?;
    info!(rows = data.len(), path = file_path, "family summary exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_formats() {
        assert_eq!(qty(10.6), "11");
        assert_eq!(qty(0.0), "0");
        assert_eq!(ratio(1.0 / 3.0), "0.33");
        assert_eq!(ratio(-40.0), "-40.00");
    }

    #[test]
    fn header_width_matches_branch_layout() {
        let headers = replenishment_headers(Branch::Mdz);
        assert_eq!(headers.len(), 15 + 4 * 6 + 2 + 3 * 3);
        assert!(headers.contains(&"final_enviar_sf".to_string()));
        assert!(!headers.contains(&"final_enviar_mdz".to_string()));
        let returns = return_headers(Branch::Sf);
        assert_eq!(returns.len(), 15 + 4 + 3 * 8);
        assert_eq!(returns[..15], headers[..15]);
        assert!(returns.contains(&"wf".to_string()));
        assert!(returns.contains(&"cobertura_ini_total".to_string()));
    }

    #[test]
    fn return_row_carries_derived_prefix() {
        use crate::model::{BranchFigures, Family, InventoryRecord};
        use crate::planning::demand::DemandEstimate;
        use crate::planning::surplus::detect_surplus;
        use crate::strategy::FulfillmentWeights;

        let record = InventoryRecord {
            subfamily: "TURBO".to_string(),
            subfamily2: "TURBOS".to_string(),
            lot_size: 6,
            stock_total: 40.0,
            ..InventoryRecord::new("R9")
        }
        .with_branch(
            Branch::Ba,
            BranchFigures {
                stock: 40.0,
                ..BranchFigures::default()
            },
        );
        let demand = DemandEstimate {
            per_branch: [0.0, 20.0, 0.0, 0.0],
            total: 20.0,
        };
        let surplus = detect_surplus(&record, &demand, Branch::Sf, 0.5);
        let line = ReturnLine {
            item: PlannedItem {
                record,
                family: Family::Turbo,
                weights: FulfillmentWeights {
                    item: 0.75,
                    family: 0.5,
                },
                demand,
            },
            surplus,
        };

        let row = return_row(&line);
        assert_eq!(row.len(), return_headers(Branch::Sf).len());
        assert_eq!(&row[..6], ["R9", "", "TURBO", "TURBO", "TURBOS", "6"]);
        assert_eq!(row[10], "0.75");
        assert_eq!(row[11], "0.50");
        assert_eq!(row[12], "40");
        assert_eq!(row[13], "20");
        assert_eq!(row[14], "2.00");
        // BA block starts after the 4 source columns: excess 30 above half a year
        assert_eq!(row[15 + 4 + 4], "30");
    }

    #[test]
    fn family_summary_uses_family_labels() {
        let rows = [FamilySummary {
            branch: "BA".to_string(),
            family: crate::model::Family::Donaldson,
            items: 2,
            units: 30,
            weight: 12.5,
            volume: 0.25,
            priority_items: 1,
        }];
        let mut buffer = Vec::new();
        write_family_summary(&mut buffer, &rows).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "branch,family,items,units,weight,volume,priority_items\nBA,DONALDSON,2,30,12.5,0.25,1\n"
        );
    }

    #[test]
    fn empty_outcome_writes_nothing() {
        let mut buffer = Vec::new();
        let rows = write_plan(&mut buffer, &PlanOutcome::Empty("none".into())).unwrap();
        assert_eq!(rows, 0);
        assert!(buffer.is_empty());
    }
}
