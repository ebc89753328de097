use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field as ArrowField, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use log::info;
use parquet::arrow::ArrowWriter;

use ev_dashboard::Field;
use ev_dashboard::data::model::{BEV_LABEL, PHEV_LABEL};

#[derive(Parser)]
#[command(name = "generate_sample")]
#[command(about = "Write a synthetic EV registration dataset")]
struct Args {
    /// Number of vehicles to generate
    #[arg(long, default_value_t = 500)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output file; `.parquet` writes Parquet, anything else CSV
    #[arg(long, default_value = "sample_data.csv")]
    output: PathBuf,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

/// (make, model, is_bev, rated range)
const MODELS: &[(&str, &str, bool, u32)] = &[
    ("TESLA", "MODEL 3", true, 308),
    ("TESLA", "MODEL Y", true, 291),
    ("NISSAN", "LEAF", true, 150),
    ("CHEVROLET", "BOLT EV", true, 259),
    ("TOYOTA", "PRIUS PRIME", false, 25),
    ("BMW", "X5", false, 30),
    ("FORD", "FUSION", false, 21),
    ("KIA", "NIRO", true, 239),
];

const PLACES: &[(&str, &str)] = &[
    ("King", "Seattle"),
    ("King", "Bellevue"),
    ("King", "Kent"),
    ("Snohomish", "Everett"),
    ("Kitsap", "Bremerton"),
    ("Thurston", "Olympia"),
];

const COLUMNS: [Field; 8] = [
    Field::Vin,
    Field::County,
    Field::City,
    Field::ModelYear,
    Field::Make,
    Field::Model,
    Field::ElectricVehicleType,
    Field::ElectricRange,
];

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<[String; 8]> {
    const VIN_CHARS: &[u8] = b"0123456789ABCDEFGHJKLMNPRSTUVWXYZ";

    (0..rows)
        .map(|_| {
            let vin: String = (0..10)
                .map(|_| *rng.pick(VIN_CHARS) as char)
                .collect();
            let (county, city) = *rng.pick(PLACES);
            let &(make, model, is_bev, range) = rng.pick(MODELS);
            let year = 2012 + rng.below(12);
            let kind = if is_bev { BEV_LABEL } else { PHEV_LABEL };
            // Newer registrations often have no range on file yet.
            let range = if year >= 2021 && rng.below(3) == 0 {
                String::new()
            } else {
                range.to_string()
            };

            [
                vin,
                county.to_string(),
                city.to_string(),
                year.to_string(),
                make.to_string(),
                model.to_string(),
                kind.to_string(),
                range,
            ]
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[[String; 8]]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(COLUMNS.iter().map(|f| f.column_name()))?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[[String; 8]]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        COLUMNS
            .iter()
            .map(|f| ArrowField::new(f.column_name(), DataType::Utf8, false))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = (0..COLUMNS.len())
        .map(|c| {
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r[c].as_str()))) as ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let rows = generate(args.rows, &mut rng);
    info!("generated {} vehicles with seed {}", rows.len(), args.seed);

    let is_parquet = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        write_parquet(&args.output, &rows)?;
    } else {
        write_csv(&args.output, &rows)?;
    }

    println!("Wrote {} vehicles to {}", rows.len(), args.output.display());
    Ok(())
}
