// ==========================================
// Pipeline integration tests
// ==========================================
// Load CSV -> filter -> classify -> weights -> demand -> coverage ->
// allocation / surplus -> report, through the public API only.
// ==========================================

use stock_planner::io::{loader, reporting, sample};
use stock_planner::model::{Branch, BranchFigures, Family, InventoryRecord};
use stock_planner::planning::{
    summarize, summarize_by_family, AnalysisMode, PlanConfig, PlanOutcome, Planner,
};
use stock_planner::strategy::DemandMethod;
use stock_planner::{logging, PlanError};

// ==========================================
// Helpers
// ==========================================

fn figures(stock: f64, presented: f64, remitted: f64) -> BranchFigures {
    BranchFigures {
        stock,
        presented,
        remitted,
        ..BranchFigures::default()
    }
}

fn item(code: &str, subfamily: &str, lot: u32) -> InventoryRecord {
    InventoryRecord {
        subfamily: subfamily.to_string(),
        lot_size: lot,
        weight: 2.0,
        volume: 0.01,
        ..InventoryRecord::new(code)
    }
}

fn replenishment(outcome: PlanOutcome) -> Vec<stock_planner::planning::ReplenishmentLine> {
    match outcome {
        PlanOutcome::Replenishment(lines) => lines,
        other => panic!("expected replenishment, got {other:?}"),
    }
}

const CSV: &str = "\
codigo;descripcion;subfamilia;subfamilia2;qty_piezas;peso;volumen;qpres_total;qrem_total;\
stock_sf;stock_ba;stock_mdz;stock_slt;qpressf;qremsf;qpresba;qremba;qpresmdz;qremmdz;qpresslt;qremslt;inhabilitado;grupo_stock
F1;Filtro aire;DONALDSON FILTERS;;12;1,5;0.01;96;96;300;0;20;0;24;24;24;24;24;24;24;24;no;
K1;Kit juntas;MOTOR;GET KTN;4;0.3;0.001;48;48;60;1;0;0;12;12;12;12;12;12;12;12;no;
D1;Discontinuado;TURBO;;1;1;0.1;10;10;5;0;0;0;10;10;0;0;0;0;0;0;SI;
N1;A demanda;TURBO;;1;1;0.1;10;10;5;0;0;0;10;10;0;0;0;0;0;0;no;DNS - A DEMANDA
Z1;Sin demanda;VARIOS;;1;1;0.1;0;0;5;0;0;0;0;0;0;0;0;0;0;0;no;
";

// ==========================================
// Scenarios
// ==========================================

#[test]
fn csv_replenishment_end_to_end() {
    logging::init_test();

    let records = loader::load_inventory(CSV.as_bytes()).unwrap();
    assert_eq!(records.len(), 5);

    let planner = Planner::new(PlanConfig::default()).unwrap();
    let lines = replenishment(planner.run(records));

    // disabled, on-demand and no-demand rows are filtered out
    let codes: Vec<&str> = lines.iter().map(|l| l.item.record.code.as_str()).collect();
    assert_eq!(codes, vec!["F1", "K1"]);

    let filter = &lines[0];
    assert_eq!(filter.item.family, Family::Donaldson);
    // malformed "1,5" weight is coerced, not fatal
    assert_eq!(filter.item.record.weight, 0.0);
    for line in &lines {
        let allocation = &line.allocation;
        assert!(allocation.total_shipped() <= allocation.available);
        for request in &allocation.requests {
            assert!(allocation.shipped_to(request.branch) <= request.desired);
        }
    }

    // F1: demand 24 per branch, network covers 320/96 years, so targets are
    // uncapped. BA is short 8 units -> 8, not a box of 12 (4 extra > 3).
    assert_eq!(filter.allocation.shipped_to(Branch::Ba), 8);
    assert_eq!(filter.allocation.shipped_to(Branch::Slt), 8);
    assert_eq!(filter.allocation.shipped_to(Branch::Mdz), 0);

    // K1: kit of 4, BA holds 1 and misses 3 -> ships 3 to reach one kit
    let kit = &lines[1];
    assert_eq!(kit.item.family, Family::Get);
    assert_eq!(kit.allocation.shipped_to(Branch::Ba), 3);
}

#[test]
fn missing_columns_fail_fast_with_names() {
    let err = loader::load_inventory("codigo,descripcion\nA,B\n".as_bytes()).unwrap_err();
    let PlanError::MissingColumns(columns) = err else {
        panic!("expected missing columns");
    };
    assert!(columns.contains(&"subfamilia".to_string()));
    assert!(columns.contains(&"stock_sf".to_string()));
    assert!(!columns.contains(&"codigo".to_string()));
}

#[test]
fn scarcity_remainder_goes_to_neediest_branch() {
    // SF can ship 10 after its buffer; BA/MDZ/SLT want 7/5/3
    let mut record = item("S1", "VARIOS", 1)
        .with_branch(Branch::Sf, figures(11.0, 12.0, 12.0))
        .with_branch(Branch::Ba, figures(0.0, 7.0, 7.0))
        .with_branch(Branch::Mdz, figures(0.0, 5.0, 5.0))
        .with_branch(Branch::Slt, figures(0.0, 3.0, 3.0))
        .with_totals_from_branches();
    // keep targets uncapped by the network
    record.stock_total = 1_000.0;

    let config = PlanConfig {
        source_target_months: 0.0,
        destination_target_months: 12.0,
        ..PlanConfig::default()
    };

    let lines = replenishment(Planner::new(config).unwrap().run(vec![record]));
    let allocation = &lines[0].allocation;

    assert_eq!(allocation.retained, 1);
    assert_eq!(allocation.available, 10);
    assert_eq!(allocation.total_desired(), 15);
    assert_eq!(allocation.shipped_to(Branch::Ba), 5);
    assert_eq!(allocation.shipped_to(Branch::Mdz), 3);
    assert_eq!(allocation.shipped_to(Branch::Slt), 2);
    assert_eq!(allocation.total_shipped(), 10);
}

#[test]
fn dynamic_source_branch() {
    let record = item("B1", "VARIOS", 1)
        .with_branch(Branch::Ba, figures(100.0, 12.0, 12.0))
        .with_branch(Branch::Sf, figures(0.0, 12.0, 12.0))
        .with_totals_from_branches();
    let config = PlanConfig {
        source: Branch::Ba,
        ..PlanConfig::default()
    };

    let lines = replenishment(Planner::new(config).unwrap().run(vec![record]));
    let allocation = &lines[0].allocation;
    assert_eq!(allocation.source, Branch::Ba);
    assert_eq!(allocation.shipped_to(Branch::Ba), 0);
    // SF target: 4 months of 12/year = 4 units
    assert_eq!(allocation.shipped_to(Branch::Sf), 4);
}

#[test]
fn return_mode_flags_excess_and_priority() {
    let record = item("R1", "VARIOS", 1)
        .with_branch(Branch::Sf, figures(0.0, 10.0, 10.0))
        .with_branch(Branch::Ba, figures(100.0, 10.0, 10.0))
        .with_branch(Branch::Mdz, figures(3.0, 10.0, 10.0))
        .with_totals_from_branches();
    let config = PlanConfig {
        mode: AnalysisMode::Return,
        ..PlanConfig::default()
    };

    let outcome = Planner::new(config).unwrap().run(vec![record]);
    let PlanOutcome::Return(lines) = &outcome else {
        panic!("expected return analysis");
    };
    let surplus = &lines[0].surplus;

    let ba = surplus.excess_at(Branch::Ba).unwrap();
    assert_eq!(ba.quantity, 95);
    assert!(ba.priority);
    assert_eq!(ba.weight, 190.0);
    assert_eq!(surplus.excess_at(Branch::Mdz).unwrap().quantity, 0);

    let summary = summarize(&outcome);
    let ba_summary = summary.iter().find(|s| s.branch == "BA").unwrap();
    assert_eq!(ba_summary.units, 95);
    assert_eq!(ba_summary.priority_items, 1);
}

#[test]
fn both_methods_keep_total_equal_to_branch_sum() {
    let records = sample::generate_inventory(60, 15.0, 11).unwrap();
    for method in [DemandMethod::A, DemandMethod::B] {
        let config = PlanConfig {
            method,
            ..PlanConfig::default()
        };
        let lines = replenishment(Planner::new(config).unwrap().run(records.clone()));
        for line in lines {
            let demand = &line.item.demand;
            let sum: f64 = Branch::ALL.iter().map(|b| demand.branch(*b)).sum();
            assert_eq!(demand.total, sum);
        }
    }
}

#[test]
fn pipeline_is_idempotent() {
    let records = sample::generate_inventory(80, 20.0, 5).unwrap();
    let planner = Planner::new(PlanConfig::default()).unwrap();
    assert_eq!(planner.run(records.clone()), planner.run(records));
}

#[test]
fn plan_and_summary_files_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("inventory.csv");
    let output = dir.path().join("plan.csv");
    let summary = dir.path().join("summary.csv");
    let families = dir.path().join("families.csv");

    sample::write_sample_file(input.to_str().unwrap(), 40, 9).unwrap();
    let records = loader::load_inventory_file(input.to_str().unwrap()).unwrap();
    let outcome = Planner::new(PlanConfig::default()).unwrap().run(records);

    let rows = reporting::write_plan_file(output.to_str().unwrap(), &outcome).unwrap();
    assert_eq!(rows, outcome.len());
    reporting::write_summary_file(summary.to_str().unwrap(), &summarize(&outcome)).unwrap();
    let by_family = summarize_by_family(&outcome);
    reporting::write_family_summary_file(families.to_str().unwrap(), &by_family).unwrap();

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert!(headers.iter().any(|h| h == "final_enviar_ba"));
    assert!(headers.iter().any(|h| h == "demanda_estimada_total"));
    assert_eq!(reader.records().count(), rows);

    let summary_text = std::fs::read_to_string(&summary).unwrap();
    assert!(summary_text.starts_with("branch,items,units"));
    assert!(summary_text.lines().next().unwrap().contains("at_risk_items,rescued_items"));
    assert_eq!(summary_text.lines().count(), 4);

    // family totals add up to the branch totals
    let units: u64 = by_family.iter().map(|f| f.units).sum();
    let shipped: u64 = summarize(&outcome).iter().map(|s| s.units).sum();
    assert_eq!(units, shipped);
    let family_text = std::fs::read_to_string(&families).unwrap();
    assert_eq!(family_text.lines().count(), by_family.len() + usize::from(!by_family.is_empty()));
}

#[test]
fn invalid_parameters_are_rejected_before_running() {
    let config = PlanConfig {
        source_target_months: f64::NAN,
        ..PlanConfig::default()
    };
    assert!(Planner::new(config).is_err());
}
