//! Produce stocking recommendations for a sales ledger.
//!
//! Usage: cargo run --example recommend -- <ledger.csv> [config.json] [output.csv]

use demand_forecast::{telemetry, InventoryPipeline, PipelineConfig, SalesLedger};
use std::env;
use std::process;

fn main() {
    telemetry::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(ledger_path) = args.first() else {
        eprintln!("Usage: recommend <ledger.csv> [config.json] [output.csv]");
        process::exit(2);
    };

    if let Err(e) = run(ledger_path, args.get(1), args.get(2)) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(
    ledger_path: &str,
    config_path: Option<&String>,
    output_path: Option<&String>,
) -> demand_forecast::Result<()> {
    let config = match config_path {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    let pipeline = InventoryPipeline::from_config(&config)?;
    let ledger = SalesLedger::from_csv(ledger_path)?;
    let table = pipeline.run(&ledger)?;

    println!(
        "{:>8} {:>8} {:>8} {:>10} {:>10} {:>10}",
        "store", "item", "sales", "predicted", "stock", "cost"
    );
    for row in table.preview(config.preview_rows) {
        let record = row.to_record();
        println!(
            "{:>8} {:>8} {:>8.1} {:>10.2} {:>10.0} {:>10.2}",
            record.store_id,
            record.item_id,
            record.sales,
            record.predicted_sales,
            record.recommended_inventory,
            record.estimated_cost
        );
    }
    println!();
    println!("Safety stock:                  {:.2}", table.safety_stock());
    println!("Estimated total inventory cost: {:.2}", table.total_estimated_cost());

    if let Some(path) = output_path {
        table.write_csv(path)?;
        println!("Recommendations written to {}", path);
    }

    Ok(())
}
