//! N-gram Feature Benchmarking Tool
//!
//! Measures how fast raw text becomes n-gram features on a large input such
//! as a Wikipedia dump or a concatenated training corpus.
//!
//! ## What It Benchmarks
//!
//! 1. **Normalize**: lowercasing, stripping digits and punctuation, collapsing whitespace
//! 2. **Extract**: cutting pre-normalized text into character n-grams
//! 3. **Pipeline**: both stages together, line by line, as training sees them
//!
//! ## Usage
//!
//! ```bash
//! # Default n-gram range 1..=3
//! ./target/release/lingo_bench /path/to/corpus.txt
//!
//! # Trigrams only
//! ./target/release/lingo_bench /path/to/corpus.txt 3 3
//! ```
//!
//! ## Example Output
//!
//! ```text
//! === Pipeline ===
//! --------------------------------
//! Mode        : Pipeline
//! Elapsed     : 0.812 s
//! Throughput  : 0.121 GiB/s
//! N-grams     : 310_224_871
//! N-grams/sec : 382_050_333
//! --------------------------------
//! ```
//!
//! Build with `--release` and use an input of 100MB+ for stable numbers.

use std::env;
use std::fs;
use std::time::{Duration, Instant};

use lingo_core::analyzer::ngram::extract_ngrams;
use lingo_core::analyzer::TextNormalizer;
use lingo_types::NgramRange;

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: lingo_bench <path> [min_n] [max_n]");
        std::process::exit(1);
    }

    let path = &args[1];
    let min = args.get(2).map_or(Ok(1), |s| s.parse())?;
    let max = args.get(3).map_or(Ok(3), |s| s.parse())?;
    let range = NgramRange::new(min, max)?;

    println!("Loading file...");
    let input = fs::read_to_string(path)?;

    println!("File size: {}", fmt_bytes(input.len() as u64));
    println!("N-grams:   {}..={}\n", range.min, range.max);

    bench_normalize(&input);
    bench_extract(&input, range);
    bench_pipeline(&input, range);

    Ok(())
}

fn bench_normalize(input: &str) {
    let normalizer = TextNormalizer::default();
    let mut out = String::with_capacity(input.len());

    println!("=== Normalize ===");

    warmup(|| {
        normalizer.normalize_into(input, &mut out);
    });

    let elapsed = measure(|| {
        normalizer.normalize_into(input, &mut out);
    });

    print_perf("Normalize", input.len(), elapsed, 0);
}

fn bench_extract(input: &str, range: NgramRange) {
    let normalized = normalize_lines(&TextNormalizer::default(), input);

    println!("=== Extract ===");

    warmup(|| {
        std::hint::black_box(count_line_ngrams(&normalized, range));
    });

    let mut grams = 0u64;
    let elapsed = measure(|| {
        grams = count_line_ngrams(&normalized, range);
        std::hint::black_box(grams);
    });

    print_perf("Extract", normalized.len(), elapsed, grams);
}

fn bench_pipeline(input: &str, range: NgramRange) {
    let normalizer = TextNormalizer::default();
    let mut line_buf = String::new();

    println!("=== Pipeline ===");

    let mut run = || {
        let mut total = 0u64;
        for line in input.lines() {
            normalizer.normalize_into(line, &mut line_buf);
            total += count_line_ngrams(&line_buf, range);
        }
        total
    };

    warmup(|| {
        std::hint::black_box(run());
    });

    let mut grams = 0u64;
    let elapsed = measure(|| {
        grams = run();
        std::hint::black_box(grams);
    });

    print_perf("Pipeline", input.len(), elapsed, grams);
}

/// Normalizes each line on its own so n-gram windows stop at line breaks,
/// as they do in the pipeline run.
fn normalize_lines(normalizer: &TextNormalizer, input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut line_buf = String::new();
    for line in input.lines() {
        normalizer.normalize_into(line, &mut line_buf);
        out.push_str(&line_buf);
        out.push('\n');
    }
    out
}

fn count_line_ngrams(text: &str, range: NgramRange) -> u64 {
    let mut n = 0u64;
    for line in text.lines() {
        extract_ngrams(line, range, |gram| {
            std::hint::black_box(gram);
            n += 1;
        });
    }
    n
}

fn warmup<F: FnMut()>(mut f: F) {
    for _ in 0..WARMUP_RUNS {
        f();
    }
}

fn measure<F: FnMut()>(mut f: F) -> Duration {
    let mut total = Duration::ZERO;

    for _ in 0..MEASURE_RUNS {
        let start = Instant::now();
        f();
        total += start.elapsed();
    }

    total / MEASURE_RUNS as u32
}

fn print_perf(label: &str, input_bytes: usize, elapsed: Duration, grams: u64) {
    let secs = elapsed.as_secs_f64();
    let gib = input_bytes as f64 / (1024.0 * 1024.0 * 1024.0);

    println!("--------------------------------");
    println!("Mode        : {}", label);
    println!("Elapsed     : {:.3} s", secs);
    println!("Throughput  : {:.3} GiB/s", gib / secs);

    if grams > 0 {
        println!("N-grams     : {}", fmt_count(grams));
        println!("N-grams/sec : {}", fmt_count((grams as f64 / secs) as u64));
    }

    println!("--------------------------------\n");
}

fn fmt_bytes(b: u64) -> String {
    if b >= 1024 * 1024 * 1024 {
        format!("{:.2} GiB", b as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if b >= 1024 * 1024 {
        format!("{:.2} MiB", b as f64 / (1024.0 * 1024.0))
    } else if b >= 1024 {
        format!("{:.2} KiB", b as f64 / 1024.0)
    } else {
        format!("{} B", b)
    }
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_counts_match_pipeline_counts() {
        let input = "Hello, World!\nBonjour 42\n\nHola";
        let range = NgramRange::default();
        let normalizer = TextNormalizer::default();

        let mut line_buf = String::new();
        let mut per_line = 0u64;
        for line in input.lines() {
            normalizer.normalize_into(line, &mut line_buf);
            per_line += count_line_ngrams(&line_buf, range);
        }

        let normalized = normalize_lines(&normalizer, input);
        assert_eq!(normalized, "hello world\nbonjour\n\nhola\n");
        assert_eq!(count_line_ngrams(&normalized, range), per_line);
    }
}
