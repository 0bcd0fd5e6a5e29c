use sketchbook::hyperloglog::DEFAULT_PRECISION;
use sketchbook::ingest::{load_file, IngestConfig};
use sketchbook::report::Comparison;
use std::env;
use std::process;
use tabled::{settings::Style, Table, Tabled};

const DEFAULT_PATH: &str = "lms-stage-access.log";

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Exact (set)")]
    exact: String,
    #[tabled(rename = "HyperLogLog")]
    estimated: String,
}

fn run(path: &str) -> Result<(), sketchbook::Error> {
    let items = load_file(path, &IngestConfig::default())?;
    let comparison = Comparison::measure(&items, DEFAULT_PRECISION)?;

    let rows = vec![
        Row {
            metric: "Distinct items",
            exact: comparison.exact.value.to_string(),
            estimated: format!("{:.0}", comparison.estimated.value),
        },
        Row {
            metric: "Elapsed (s)",
            exact: format!("{:.4}", comparison.exact.elapsed.as_secs_f64()),
            estimated: format!("{:.4}", comparison.estimated.elapsed.as_secs_f64()),
        },
        Row {
            metric: "Absolute error",
            exact: "N/A".to_owned(),
            estimated: format!("{:.2}", comparison.absolute_error()),
        },
        Row {
            metric: "Relative error",
            exact: "N/A".to_owned(),
            estimated: format!("{:.2} %", comparison.relative_error()),
        },
    ];

    println!("Records read: {}", items.len());
    println!("{}", Table::new(rows).with(Style::modern()));
    Ok(())
}

fn main() {
    env_logger::init();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_PATH.to_owned());
    if let Err(err) = run(&path) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
