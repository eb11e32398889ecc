//! Write a deterministic synthetic book catalog.
//!
//! `generate_sample [PATH]` writes Parquet when PATH ends in `.parquet`,
//! CSV otherwise. Default: `output/books_enriched.csv`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::csv::WriterBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
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

    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo) as u64) as i64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn isbn(rng: &mut SimpleRng) -> String {
    (0..10).map(|_| char::from(b'0' + (rng.next_u64() % 10) as u8)).collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("output/books_enriched.csv"));

    let mut rng = SimpleRng::new(42);

    let adjectives = ["Silent", "Broken", "Golden", "Last", "Hidden", "Endless"];
    let nouns = ["Empire", "Garden", "Star", "River", "Machine", "Kingdom"];
    let topics = ["Space Opera", "Mystery", "History", "Romance", "Philosophy"];
    let authors = ["Ann Leckie", "Isaac Asimov", "Ursula K. Le Guin", "Agatha Christie"];
    let publishers = ["Orbit", "Tor", "Penguin", "Vintage"];

    let n_books = 200;
    let mut ids = Vec::with_capacity(n_books);
    let mut titles = Vec::with_capacity(n_books);
    let mut book_authors = Vec::with_capacity(n_books);
    let mut ratings = Vec::with_capacity(n_books);
    let mut pages = Vec::with_capacity(n_books);
    let mut ratings_count = Vec::with_capacity(n_books);
    let mut reviews_count = Vec::with_capacity(n_books);
    let mut book_publishers = Vec::with_capacity(n_books);

    while ids.len() < n_books {
        let id = isbn(&mut rng);
        if ids.contains(&id) {
            continue;
        }
        ids.push(id);
        titles.push(format!(
            "The {} {}: A {} Novel",
            rng.pick(&adjectives),
            rng.pick(&nouns),
            rng.pick(&topics)
        ));
        book_authors.push(rng.pick(&authors));
        ratings.push((250.0 + rng.next_f64() * 250.0).round() / 100.0);
        pages.push(rng.range(80, 1200));
        let count = rng.range(0, 50_000);
        ratings_count.push(count);
        reviews_count.push(count / rng.range(10, 60));
        book_publishers.push(rng.pick(&publishers));
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("ISBN", DataType::Utf8, false),
        Field::new("Title", DataType::Utf8, false),
        Field::new("Authors", DataType::Utf8, false),
        Field::new("Average Rating", DataType::Float64, false),
        Field::new("Num Pages", DataType::Int64, false),
        Field::new("Ratings Count", DataType::Int64, false),
        Field::new("Text Reviews Count", DataType::Int64, false),
        Field::new("Publisher", DataType::Utf8, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(ids)),
        Arc::new(StringArray::from(titles)),
        Arc::new(StringArray::from(book_authors)),
        Arc::new(Float64Array::from(ratings)),
        Arc::new(Int64Array::from(pages)),
        Arc::new(Int64Array::from(ratings_count)),
        Arc::new(Int64Array::from(reviews_count)),
        Arc::new(StringArray::from(book_publishers)),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = std::fs::File::create(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;

    let is_parquet = output_path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        let mut writer =
            ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
        writer.write(&batch).context("writing parquet")?;
        writer.close().context("closing parquet writer")?;
    } else {
        let mut writer = WriterBuilder::new().with_header(true).build(file);
        writer.write(&batch).context("writing CSV")?;
    }

    log::info!("Wrote {n_books} books to {}", output_path.display());
    println!("Wrote {n_books} books to {}", output_path.display());
    Ok(())
}
