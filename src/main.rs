use anyhow::{bail, Context, Result};
use std::env;
use stock_planner::io::{loader, reporting, sample};
use stock_planner::logging;
use stock_planner::model::Family;
use stock_planner::planning::{summarize, summarize_by_family, PlanConfig, PlanOutcome, Planner};

const USAGE: &str = "usage:
  stock-planner plan <input.csv> <output.csv> [options]
  stock-planner sample <output.csv> [rows] [seed]

options:
  --mode replenishment|return   analysis mode (default replenishment)
  --source SF|BA|MDZ|SLT        source branch (default SF)
  --method A|B                  demand estimation method (default B)
  --source-months <f>           source target coverage in months (default 6)
  --dest-months <f>             destination target coverage in months (default 4)
  --threshold <f>               return mode excess threshold in years (default 0.5)
  --families GET,TURBO,...      families to plan (default all)
  --keep-disabled | --keep-no-stock | --keep-no-demand | --keep-dns
  --summary <path>              also write per-branch totals
  --family-summary <path>       also write per-branch, per-family totals";

struct PlanArgs {
    input: String,
    output: String,
    summary: Option<String>,
    family_summary: Option<String>,
    config: PlanConfig,
}

fn parse_number(flag: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .with_context(|| format!("{flag} expects a number, got `{value}`"))
}

fn parse_plan_args(args: &[String]) -> Result<PlanArgs> {
    let (input, output) = match args {
        [input, output, ..] => (input.clone(), output.clone()),
        _ => bail!("plan needs an input and an output path\n\n{USAGE}"),
    };

    let mut config = PlanConfig::default();
    let mut summary = None;
    let mut family_summary = None;
    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        let mut value = || {
            rest.next()
                .cloned()
                .with_context(|| format!("{flag} expects a value"))
        };
        match flag.as_str() {
            "--mode" => config.mode = value()?.parse()?,
            "--source" => config.source = value()?.parse()?,
            "--method" => config.method = value()?.parse()?,
            "--source-months" => config.source_target_months = parse_number(flag, &value()?)?,
            "--dest-months" => config.destination_target_months = parse_number(flag, &value()?)?,
            "--threshold" => config.return_threshold = parse_number(flag, &value()?)?,
            "--families" => {
                config.families = value()?
                    .split(',')
                    .filter(|f| !f.trim().is_empty())
                    .map(str::parse::<Family>)
                    .collect::<Result<_, _>>()?;
            }
            "--summary" => summary = Some(value()?),
            "--family-summary" => family_summary = Some(value()?),
            "--keep-disabled" => config.filters.skip_disabled = false,
            "--keep-no-stock" => config.filters.skip_without_stock = false,
            "--keep-no-demand" => config.filters.skip_without_demand = false,
            "--keep-dns" => config.filters.skip_on_demand_groups = false,
            other => bail!("unknown option `{other}`\n\n{USAGE}"),
        }
    }

    Ok(PlanArgs {
        input,
        output,
        summary,
        family_summary,
        config,
    })
}

fn run_plan(args: PlanArgs) -> Result<()> {
    // 1. SETUP CONFIGURATION
    let planner = Planner::new(args.config).context("invalid planning parameters")?;
    let config = planner.config();
    println!(
        "Mode: {} | source: {} | method: {}",
        config.mode, config.source, config.method
    );

    // 2. LOAD INVENTORY
    let records = loader::load_inventory_file(&args.input)
        .with_context(|| format!("failed to load '{}'", args.input))?;
    println!("Loaded {} records from '{}'", records.len(), args.input);

    // 3. RUN PIPELINE
    let outcome = planner.run(records);
    if let PlanOutcome::Empty(reason) = &outcome {
        println!("Nothing to plan: {reason}");
        return Ok(());
    }

    // 4. EXPORT RESULTS
    let rows = reporting::write_plan_file(&args.output, &outcome)
        .with_context(|| format!("failed to write '{}'", args.output))?;
    println!("Success! {} rows written to '{}'", rows, args.output);

    // 5. PRINT SUMMARY
    let summaries = summarize(&outcome);
    println!("\n=== Branch Summary ===");
    for s in &summaries {
        println!(
            "{:>4}: {:>5} items | {:>8} units | {:>10.2} kg | {:>8.3} m3 | priority {}",
            s.branch, s.items, s.units, s.weight, s.volume, s.priority_items
        );
        if s.at_risk_items > 0 {
            println!(
                "      {} items under one month, {} recovered by this plan, {} still critical",
                s.at_risk_items, s.rescued_items, s.critical_items
            );
        }
    }

    let families = summarize_by_family(&outcome);
    println!("\n=== Detail by Family ===");
    for f in &families {
        println!(
            "{:>4} {:<10} {:>5} items | {:>8} units | {:>10.2} kg | {:>8.3} m3",
            f.branch, f.family, f.items, f.units, f.weight, f.volume
        );
    }
    if let Some(path) = &args.summary {
        reporting::write_summary_file(path, &summaries)
            .with_context(|| format!("failed to write '{path}'"))?;
    }
    if let Some(path) = &args.family_summary {
        reporting::write_family_summary_file(path, &families)
            .with_context(|| format!("failed to write '{path}'"))?;
    }

    Ok(())
}

fn run_sample(args: &[String]) -> Result<()> {
    let Some(output) = args.first() else {
        bail!("sample needs an output path\n\n{USAGE}");
    };
    let rows = match args.get(1) {
        Some(v) => v.parse().with_context(|| format!("invalid row count `{v}`"))?,
        None => 200,
    };
    let seed = match args.get(2) {
        Some(v) => v.parse().with_context(|| format!("invalid seed `{v}`"))?,
        None => 42,
    };

    sample::write_sample_file(output, rows, seed)?;
    println!("Sample inventory with {rows} rows written to '{output}'");
    Ok(())
}

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match args.split_first() {
        Some((command, rest)) if command == "plan" => run_plan(parse_plan_args(rest)?),
        Some((command, rest)) if command == "sample" => run_sample(rest),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}
