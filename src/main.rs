use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::info;

use ev_dashboard::data::loader::load_file;
use ev_dashboard::{Dashboard, DashboardState, FilterField};

#[derive(Parser)]
#[command(name = "ev-dashboard")]
#[command(about = "Summarise an electric vehicle registration dataset")]
struct Args {
    /// Path to the dataset (.csv, .json or .parquet)
    path: PathBuf,

    /// Only include vehicles registered in this county (repeatable)
    #[arg(long)]
    county: Vec<String>,

    /// Only include vehicles registered in this city (repeatable)
    #[arg(long)]
    city: Vec<String>,

    /// Only include this model year (repeatable)
    #[arg(long)]
    year: Vec<String>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the dropdown values for a column instead of the dashboard
    #[arg(long, value_enum)]
    list_values: Option<Column>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum Column {
    County,
    City,
    ModelYear,
}

impl From<Column> for FilterField {
    fn from(c: Column) -> Self {
        match c {
            Column::County => FilterField::County,
            Column::City => FilterField::City,
            Column::ModelYear => FilterField::ModelYear,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let dataset = load_file(&args.path)
        .with_context(|| format!("loading {}", args.path.display()))?;
    let mut state = DashboardState::new(dataset);

    if let Some(column) = args.list_values {
        for value in state.options(column.into()) {
            println!("{value}");
        }
        return Ok(());
    }

    for (field, values) in [
        (FilterField::County, args.county),
        (FilterField::City, args.city),
        (FilterField::ModelYear, args.year),
    ] {
        if !values.is_empty() {
            state.select(field, values);
        }
    }
    info!(
        "{} of {} records match the selection",
        state.visible().len(),
        state.dataset().len()
    );

    let dashboard = state.dashboard();
    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&dashboard)?),
        Format::Text => print_text(&dashboard),
    }
    Ok(())
}

fn print_text(d: &Dashboard) {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    println!("Total EVs           {}", d.total_vehicles);
    println!("Top brand           {}", or_dash(&d.top_brand));
    match d.average_range {
        Some(avg) => println!("Avg range           {avg:.2} mi"),
        None => println!("Avg range           -"),
    }
    println!("Most popular model  {}", or_dash(&d.most_popular_model));

    println!("\nBy manufacturer");
    for share in &d.by_manufacturer {
        println!("  {:<24} {:>8}  {}", share.manufacturer, share.count, share.color);
    }

    println!("\nAdoption by year      BEV     PHEV");
    for row in &d.adoption_by_year {
        println!("  {:<14} {:>8} {:>8}", row.year, row.bev, row.phev);
    }

    println!("\nGrowth over time      BEV     PHEV");
    for row in &d.growth_by_year {
        println!("  {:<14} {:>8} {:>8}", row.year, row.bev, row.phev);
    }

    println!("\nAvg range by year");
    for row in &d.range_by_year {
        println!("  {:<14} {:>8}", row.year, row.avg_range);
    }
}
