use anyhow::{Context, Result};
use survey_stats::data::schema::{
    Schema, AGE, ARRIVAL_DELAY, CLASS, CUSTOMER_TYPE, DEPARTURE_DELAY, FLIGHT_DISTANCE, GENDER,
    SATISFACTION, SERVICE_RATINGS, TYPE_OF_TRAVEL,
};

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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Most flights leave on time; the rest have an exponential tail.
fn delay(rng: &mut SimpleRng) -> u32 {
    if rng.chance(0.55) {
        0
    } else {
        (-25.0 * rng.next_f64().max(1e-12).ln()).round() as u32
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let schema = Schema::airline();
    let rows = 5_000;

    let output_path = "sample_survey.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record(schema.fields().iter().map(|f| f.name.as_str()))?;

    let mut previous: Option<Vec<String>> = None;
    let mut missing = 0;
    let mut duplicates = 0;

    for _ in 0..rows {
        // A small share of responses are submitted twice.
        if let Some(prev) = previous.as_ref().filter(|_| rng.chance(0.002)) {
            writer.write_record(prev)?;
            duplicates += 1;
            continue;
        }

        let business = rng.chance(0.45);
        let distance = if rng.chance(0.4) {
            rng.gauss(900.0, 300.0)
        } else {
            rng.gauss(2300.0, 600.0)
        }
        .clamp(50.0, 6950.0);
        let departure = delay(&mut rng);
        let arrival = departure as f64 + rng.gauss(0.0, 5.0);

        let mut row = Vec::with_capacity(schema.len());
        for field in schema.fields() {
            let name = field.name.as_str();
            let cell = match name {
                SATISFACTION => rng.pick(&["satisfied", "dissatisfied"]).to_string(),
                GENDER => rng.pick(&["Male", "Female"]).to_string(),
                CUSTOMER_TYPE => {
                    let kind = if rng.chance(0.8) { "Loyal Customer" } else { "disloyal Customer" };
                    kind.to_string()
                }
                AGE => rng.gauss(39.0, 15.0).clamp(7.0, 85.0).round().to_string(),
                TYPE_OF_TRAVEL => {
                    let kind = if business { "Business travel" } else { "Personal Travel" };
                    kind.to_string()
                }
                CLASS => {
                    let options = if business {
                        ["Business", "Business", "Eco"]
                    } else {
                        ["Eco", "Eco Plus", "Eco"]
                    };
                    rng.pick(&options).to_string()
                }
                FLIGHT_DISTANCE => distance.round().to_string(),
                DEPARTURE_DELAY => departure.to_string(),
                ARRIVAL_DELAY => {
                    if rng.chance(0.003) {
                        missing += 1;
                        String::new()
                    } else {
                        arrival.max(0.0).round().to_string()
                    }
                }
                rating if SERVICE_RATINGS.contains(&rating) => {
                    rng.gauss(3.3, 1.3).clamp(0.0, 5.0).round().to_string()
                }
                _ => String::new(),
            };
            row.push(cell);
        }

        writer.write_record(&row)?;
        previous = Some(row);
    }

    writer.flush()?;
    println!(
        "Wrote {rows} responses ({missing} missing arrival delays, {duplicates} duplicates) to {output_path}"
    );
    Ok(())
}
