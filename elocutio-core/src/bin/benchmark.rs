//! Scorer latency benchmark over synthetic emission matrices.
//!
//! Generates deterministic pseudo-utterances (seeded), times
//! `Scorer::score`, and prints a JSON summary with latency percentiles.

fn main() {
    if let Err(e) = run() {
        eprintln!("benchmark failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    use elocutio_core::{Scorer, Vocabulary};
    use ndarray::Array2;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use serde::Serialize;
    use std::collections::HashMap;
    use std::time::Instant;

    const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

    #[derive(Debug)]
    struct Args {
        utterances: usize,
        words: usize,
        iterations: usize,
        seed: u64,
    }

    #[derive(Debug, Clone, Serialize)]
    struct CaseResult {
        utterance: usize,
        iteration: usize,
        frames: usize,
        symbols: usize,
        latency_ms: f64,
        alignment_complete: bool,
        edit_ops: usize,
    }

    #[derive(Debug, Serialize)]
    struct Summary {
        utterances: usize,
        iterations: usize,
        total_runs: usize,
        p50_latency_ms: f64,
        p95_latency_ms: f64,
        avg_latency_ms: f64,
        incomplete_rate: f64,
        cases: Vec<CaseResult>,
    }

    fn parse_args() -> Result<Args, String> {
        let mut utterances = 20usize;
        let mut words = 4usize;
        let mut iterations = 5usize;
        let mut seed = 42u64;

        let mut it = std::env::args().skip(1);
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--utterances" => {
                    let Some(v) = it.next() else {
                        return Err("missing value for --utterances".into());
                    };
                    utterances = v
                        .parse()
                        .map_err(|_| "invalid value for --utterances".to_string())?;
                }
                "--words" => {
                    let Some(v) = it.next() else {
                        return Err("missing value for --words".into());
                    };
                    words = v
                        .parse()
                        .map_err(|_| "invalid value for --words".to_string())?;
                }
                "--iterations" => {
                    let Some(v) = it.next() else {
                        return Err("missing value for --iterations".into());
                    };
                    iterations = v
                        .parse::<usize>()
                        .map_err(|_| "invalid value for --iterations".to_string())?
                        .clamp(1, 100);
                }
                "--seed" => {
                    let Some(v) = it.next() else {
                        return Err("missing value for --seed".into());
                    };
                    seed = v.parse().map_err(|_| "invalid value for --seed".to_string())?;
                }
                "--help" | "-h" => {
                    println!(
                        "Usage: cargo run -p elocutio-core --bin benchmark -- \\
  [--utterances <n>] [--words <n>] [--iterations <n>] [--seed <n>]"
                    );
                    std::process::exit(0);
                }
                other => {
                    return Err(format!("unknown argument: {other}"));
                }
            }
        }

        Ok(Args {
            utterances,
            words,
            iterations,
            seed,
        })
    }

    fn build_vocabulary() -> Vocabulary {
        let mut index = HashMap::new();
        for (i, c) in ALPHABET.chars().enumerate() {
            index.insert(c, i + 1);
        }
        index.insert('|', ALPHABET.len() + 1);
        Vocabulary::new(index, 0)
    }

    fn random_transcript(rng: &mut StdRng, words: usize) -> String {
        let letters: Vec<char> = ALPHABET.chars().collect();
        (0..words)
            .map(|_| {
                let len = rng.gen_range(2..8);
                (0..len)
                    .map(|_| letters[rng.gen_range(0..letters.len())])
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Frame plan: a few leading blanks, then 2–4 frames per symbol with
    /// the occasional blank gap, as a CTC model would emit.
    fn synthetic_logits(rng: &mut StdRng, vocab: &Vocabulary, transcript: &str) -> Array2<f32> {
        let normalized = elocutio_core::normalize(transcript);
        let mut plan: Vec<usize> = Vec::new();
        for _ in 0..rng.gen_range(1..4) {
            plan.push(vocab.blank_id());
        }
        for c in normalized.chars() {
            let id = vocab.id_of(c).expect("synthetic symbol in vocabulary");
            for _ in 0..rng.gen_range(2..5) {
                plan.push(id);
            }
            for _ in 0..rng.gen_range(0..2) {
                plan.push(vocab.blank_id());
            }
        }

        Array2::from_shape_fn((plan.len(), vocab.len()), |(t, v)| {
            let base = if plan[t] == v { 4.0 } else { 0.0 };
            base + rng.gen_range(-0.5..0.5)
        })
    }

    fn percentile(values: &[f64], p: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let idx = ((sorted.len() - 1) as f64 * p.clamp(0.0, 1.0)).round() as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = parse_args()?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let vocab = build_vocabulary();
    let scorer = Scorer::default();

    println!(
        "Running scorer benchmark: {} utterances x {} iterations",
        args.utterances, args.iterations
    );

    let mut cases = Vec::with_capacity(args.utterances * args.iterations);
    for utterance in 0..args.utterances {
        let transcript = random_transcript(&mut rng, args.words);
        let logits = synthetic_logits(&mut rng, &vocab, &transcript);

        for iteration in 1..=args.iterations {
            let started = Instant::now();
            let report = scorer
                .score(&logits, &vocab, &transcript)
                .map_err(|e| e.to_string())?;
            let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

            cases.push(CaseResult {
                utterance,
                iteration,
                frames: logits.nrows(),
                symbols: report.scores.len(),
                latency_ms,
                alignment_complete: report.alignment_complete,
                edit_ops: report.edit_ops.len(),
            });
        }
    }

    let latencies: Vec<f64> = cases.iter().map(|c| c.latency_ms).collect();
    let incomplete = cases.iter().filter(|c| !c.alignment_complete).count();
    let summary = Summary {
        utterances: args.utterances,
        iterations: args.iterations,
        total_runs: cases.len(),
        p50_latency_ms: percentile(&latencies, 0.50),
        p95_latency_ms: percentile(&latencies, 0.95),
        avg_latency_ms: latencies.iter().sum::<f64>() / latencies.len().max(1) as f64,
        incomplete_rate: incomplete as f64 / cases.len().max(1) as f64,
        cases,
    };

    println!(
        "Done. runs={} p50={:.2}ms p95={:.2}ms incomplete_rate={:.1}%",
        summary.total_runs,
        summary.p50_latency_ms,
        summary.p95_latency_ms,
        summary.incomplete_rate * 100.0
    );
    let json = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
    println!("{json}");

    Ok(())
}
