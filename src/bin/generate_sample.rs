use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct SampleListing {
    price: f64,
    model_year: Option<i32>,
    model: String,
    condition: String,
    cylinders: i32,
    fuel: String,
    odometer: Option<f64>,
    transmission: String,
    vehicle_type: String,
    paint_color: Option<String>,
    is_4wd: bool,
    date_posted: NaiveDate,
    days_listed: i64,
}

const CONDITIONS: [(&str, f64); 6] = [
    ("new", 1.30),
    ("like new", 1.15),
    ("excellent", 1.0),
    ("good", 0.85),
    ("fair", 0.60),
    ("salvage", 0.35),
];

const PAINT_COLORS: [&str; 7] = ["white", "black", "silver", "grey", "red", "blue", "green"];

/// (type, base price, cylinders, models)
const TYPES: [(&str, f64, i32, &[&str]); 6] = [
    ("sedan", 16_000.0, 4, &["honda civic", "toyota camry", "hyundai sonata"]),
    ("SUV", 24_000.0, 6, &["bmw x5", "jeep grand cherokee", "toyota rav4"]),
    ("pickup", 27_000.0, 6, &["ford f-150", "ram 1500"]),
    ("truck", 30_000.0, 8, &["chevrolet silverado 1500", "gmc sierra 1500"]),
    ("coupe", 19_000.0, 6, &["ford mustang", "chevrolet camaro"]),
    ("hatchback", 12_000.0, 4, &["volkswagen golf", "honda fit"]),
];

fn generate_listing(rng: &mut SimpleRng) -> SampleListing {
    let (vehicle_type, base_price, cylinders, models) = rng.pick(&TYPES);
    let model = *rng.pick(models);
    let (condition, condition_factor) = rng.pick(&CONDITIONS);

    let model_year = 2000 + (rng.next_u64() % 19) as i32;
    let age = (2019 - model_year).max(0) as f64;

    let odometer = (age * rng.gauss(12_000.0, 3_000.0)).max(0.0);
    let price = (base_price * condition_factor * 0.93f64.powf(age)
        + rng.gauss(0.0, base_price * 0.05))
    .max(500.0)
    .round();

    let date_posted = NaiveDate::from_ymd_opt(2018, 5, 1).unwrap()
        + Duration::days((rng.next_f64() * 365.0) as i64);
    let days_listed = 1 + (-rng.next_f64().max(1e-9).ln() * 30.0) as i64;

    let heavy = matches!(*vehicle_type, "SUV" | "pickup" | "truck");

    SampleListing {
        price,
        // Sprinkle the gaps real listings have.
        model_year: (rng.next_f64() > 0.05).then_some(model_year),
        model: model.to_string(),
        condition: condition.to_string(),
        cylinders: *cylinders,
        fuel: if heavy && rng.next_f64() < 0.2 { "diesel" } else { "gas" }.to_string(),
        odometer: (rng.next_f64() > 0.08).then_some(odometer.round()),
        transmission: if rng.next_f64() < 0.9 { "automatic" } else { "manual" }.to_string(),
        vehicle_type: vehicle_type.to_string(),
        paint_color: (rng.next_f64() > 0.1).then(|| rng.pick(&PAINT_COLORS).to_string()),
        is_4wd: heavy && rng.next_f64() < 0.6,
        date_posted,
        days_listed,
    }
}

fn write_csv(listings: &[SampleListing], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "price",
        "model_year",
        "model",
        "condition",
        "cylinders",
        "fuel",
        "odometer",
        "transmission",
        "type",
        "paint_color",
        "is_4wd",
        "date_posted",
        "days_listed",
    ])?;

    for l in listings {
        writer.write_record([
            format!("{:.0}", l.price),
            l.model_year.map(|y| y.to_string()).unwrap_or_default(),
            l.model.clone(),
            l.condition.clone(),
            l.cylinders.to_string(),
            l.fuel.clone(),
            l.odometer.map(|o| format!("{o:.0}")).unwrap_or_default(),
            l.transmission.clone(),
            l.vehicle_type.clone(),
            l.paint_color.clone().unwrap_or_default(),
            if l.is_4wd { "1.0".to_string() } else { String::new() },
            l.date_posted.to_string(),
            l.days_listed.to_string(),
        ])?;
    }
    writer.flush().with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn write_parquet(listings: &[SampleListing], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("price", DataType::Float64, false),
        Field::new("model_year", DataType::Float64, true),
        Field::new("model", DataType::Utf8, false),
        Field::new("condition", DataType::Utf8, false),
        Field::new("cylinders", DataType::Int64, false),
        Field::new("fuel", DataType::Utf8, false),
        Field::new("odometer", DataType::Float64, true),
        Field::new("transmission", DataType::Utf8, false),
        Field::new("type", DataType::Utf8, false),
        Field::new("paint_color", DataType::Utf8, true),
        Field::new("is_4wd", DataType::Float64, true),
        Field::new("date_posted", DataType::Utf8, false),
        Field::new("days_listed", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(
                listings.iter().map(|l| l.price).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                listings
                    .iter()
                    .map(|l| l.model_year.map(f64::from))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                listings.iter().map(|l| l.model.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                listings.iter().map(|l| l.condition.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                listings.iter().map(|l| i64::from(l.cylinders)).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                listings.iter().map(|l| l.fuel.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                listings.iter().map(|l| l.odometer).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                listings.iter().map(|l| l.transmission.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                listings.iter().map(|l| l.vehicle_type.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                listings.iter().map(|l| l.paint_color.as_deref()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                listings
                    .iter()
                    .map(|l| l.is_4wd.then_some(1.0))
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                listings
                    .iter()
                    .map(|l| l.date_posted.to_string())
                    .collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                listings.iter().map(|l| l.days_listed).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let listings: Vec<SampleListing> = (0..600).map(|_| generate_listing(&mut rng)).collect();

    write_csv(&listings, "vehicles_sample.csv")?;
    write_parquet(&listings, "vehicles_sample.parquet")?;

    println!(
        "Wrote {} listings to vehicles_sample.csv and vehicles_sample.parquet",
        listings.len()
    );
    Ok(())
}
