//! Writes `sample_products.csv` and `sample_products.json`: a synthetic
//! product catalogue with the `price`, `rating` and `reviews` columns the
//! viewer expects.

use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use serde_json::json;

const N_PRODUCTS: usize = 500;

const CATEGORIES: [&str; 4] = ["Kitchen", "Electronics", "Books", "Toys"];

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Product {
    title: String,
    category: &'static str,
    price: f64,
    rating: u8,
    reviews: u64,
}

fn generate_product(id: usize, rng: &mut SimpleRng) -> Product {
    let category = CATEGORIES[(rng.next_u64() % CATEGORIES.len() as u64) as usize];

    // Log-normal prices, rounded to the cent.
    let price = (rng.gauss(3.0, 0.8).exp() * 100.0).round() / 100.0;

    // Ratings skew high, like most storefronts.
    let rating = rng.gauss(4.0, 0.9).round().clamp(1.0, 5.0) as u8;

    // Better-rated products collect more reviews.
    let reviews = (rng.gauss(3.0 + rating as f64 * 0.6, 1.0).exp()).round() as u64;

    Product {
        title: format!("{category} item {id:04}"),
        category,
        price,
        rating,
        reviews,
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let products: Vec<Product> = (0..N_PRODUCTS)
        .map(|id| generate_product(id, &mut rng))
        .collect();

    // CSV
    let csv_path = "sample_products.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV output")?;
    writer.write_record(["title", "category", "price", "rating", "reviews"])?;
    for p in &products {
        writer.write_record([
            p.title.clone(),
            p.category.to_string(),
            format!("{:.2}", p.price),
            p.rating.to_string(),
            p.reviews.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV output")?;

    // JSON (records orient)
    let json_path = "sample_products.json";
    let records: Vec<_> = products
        .iter()
        .map(|p| {
            json!({
                "title": p.title,
                "category": p.category,
                "price": p.price,
                "rating": p.rating,
                "reviews": p.reviews,
            })
        })
        .collect();
    let file = File::create(json_path).context("creating JSON output")?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records).context("writing JSON output")?;

    println!("Wrote {} products to {csv_path} and {json_path}", products.len());
    Ok(())
}
