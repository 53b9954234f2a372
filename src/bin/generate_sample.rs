//! Writes a deterministic synthetic `delivery_data.csv` around Bangalore.
//!
//! Ratings follow a noisy linear trend in delivery time and distance, with
//! slower deliveries in bad weather, so the dashboard's charts and rating
//! model have something to show.

use anyhow::{Context, Result};
use serde::Serialize;

const CENTER: (f64, f64) = (12.9716, 77.5946);
const ROWS_PER_RESTAURANT: usize = 6;

#[derive(Serialize)]
struct Row<'a> {
    restaurant: &'a str,
    cuisine_type: &'a str,
    weather_condition: &'a str,
    rating: f64,
    delivery_time_mins: f64,
    distance_km: f64,
    latitude: f64,
    longitude: f64,
}

/// SplitMix64; small, seedable and good enough for sample data.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.unit().max(1e-15);
        let u2 = self.unit();
        mean + std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let mut rng = SampleRng(42);

    let restaurants = [
        ("Spice Route", "Indian"),
        ("Tandoor Hub", "Indian"),
        ("Napoli Express", "Italian"),
        ("Pasta Point", "Italian"),
        ("Dragon Wok", "Chinese"),
        ("Golden Dumpling", "Chinese"),
        ("Taco Loco", "Mexican"),
        ("Burger Barn", "American"),
    ];
    // Extra minutes per delivery in each condition.
    let weather = [("Sunny", 0.0), ("Cloudy", 3.0), ("Rainy", 12.0), ("Stormy", 22.0)];
    let weather_names: Vec<&str> = weather.iter().map(|(name, _)| *name).collect();

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "delivery_data.csv".to_string());
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut rows = 0;
    for (restaurant, cuisine) in restaurants {
        let home = (
            CENTER.0 + rng.gauss(0.0, 0.03),
            CENTER.1 + rng.gauss(0.0, 0.03),
        );
        for _ in 0..ROWS_PER_RESTAURANT {
            let condition = rng.pick(&weather_names);
            let slowdown = weather
                .iter()
                .find(|(name, _)| *name == condition)
                .map_or(0.0, |(_, extra)| *extra);

            let distance = (rng.range(1.0, 15.0) * 10.0).round() / 10.0;
            let time = (12.0 + 3.5 * distance + slowdown + rng.gauss(0.0, 5.0)).max(10.0).round();
            let rating = (5.6 - 0.035 * time - 0.05 * distance + rng.gauss(0.0, 0.35))
                .clamp(1.0, 5.0);

            writer.serialize(Row {
                restaurant,
                cuisine_type: cuisine,
                weather_condition: condition,
                rating: (rating * 10.0).round() / 10.0,
                delivery_time_mins: time,
                distance_km: distance,
                latitude: ((home.0 + rng.gauss(0.0, 0.002)) * 1e4).round() / 1e4,
                longitude: ((home.1 + rng.gauss(0.0, 0.002)) * 1e4).round() / 1e4,
            })?;
            rows += 1;
        }
    }
    writer.flush()?;

    println!("Wrote {rows} deliveries to {output_path}");
    Ok(())
}
