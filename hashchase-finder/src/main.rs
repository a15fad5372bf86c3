use std::error::Error;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use hashchase_core::{Finder, Match, SearchSettings};
use log::{info, warn};
use rand::RngCore;

mod cli;

struct SweepState {
    checked: AtomicU64,
    matches: AtomicU64,
    is_done: AtomicBool,
}

impl SweepState {
    fn new() -> Self {
        Self {
            checked: AtomicU64::new(0),
            matches: AtomicU64::new(0),
            is_done: AtomicBool::new(false),
        }
    }
}

struct Search {
    finder: Finder,
    json: bool,
    report_interval: u64,
}

impl Search {
    fn report(&self, input: &[u8], hit: Option<&Match>) -> Result<(), Box<dyn Error>> {
        match (hit, self.json) {
            (Some(hit), true) => {
                let mut line = serde_json::to_value(hit)?;
                line["input"] = hex::encode(input).into();
                println!("{}", line);
            }
            (Some(hit), false) => println!("{}: {}", hex::encode(input), hit),
            (None, false) => println!("{}: no match", hex::encode(input)),
            (None, true) => {}
        }
        Ok(())
    }

    fn check_inputs(&self, inputs: &[Vec<u8>]) -> Result<u64, Box<dyn Error>> {
        let mut matches = 0;
        for input in inputs {
            let hit = self.finder.check(input);
            if hit.is_some() {
                matches += 1;
            }
            self.report(input, hit.as_ref())?;
        }
        Ok(matches)
    }

    fn sweep(&self, count: u64, len: usize) -> Result<u64, Box<dyn Error>> {
        info!("Checking {} random inputs of {} bytes...", count, len);
        let state = SweepState::new();
        let report_interval = self.report_interval.max(1);

        let result = thread::scope(|scope| {
            let reporter = scope.spawn(|| {
                let started = Instant::now();
                loop {
                    for _ in 0..report_interval {
                        if state.is_done.load(Ordering::Relaxed) {
                            return;
                        }
                        thread::sleep(Duration::from_secs(1));
                    }
                    info!(
                        "{}",
                        progress_line(
                            state.checked.load(Ordering::Relaxed),
                            state.matches.load(Ordering::Relaxed),
                            self.finder.candidates_examined(),
                            started.elapsed(),
                        )
                    );
                }
            });

            let result = self.check_random(&state, count, len);
            state.is_done.store(true, Ordering::Relaxed);
            if reporter.join().is_err() {
                warn!("Progress reporter panicked");
            }
            result
        });
        result?;

        info!(
            "Sweep finished: {} inputs, {} matches, {} candidates examined",
            state.checked.load(Ordering::Relaxed),
            state.matches.load(Ordering::Relaxed),
            self.finder.candidates_examined()
        );
        Ok(state.matches.load(Ordering::Relaxed))
    }

    fn check_random(&self, state: &SweepState, count: u64, len: usize) -> Result<(), Box<dyn Error>> {
        let mut rng = rand::thread_rng();
        let mut input = vec![0u8; len];
        for _ in 0..count {
            rng.fill_bytes(&mut input);
            let hit = self.finder.check(&input);
            if hit.is_some() {
                state.matches.fetch_add(1, Ordering::Relaxed);
                self.report(&input, hit.as_ref())?;
            }
            state.checked.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }
}

fn progress_line(checked: u64, matches: u64, candidates: u64, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64().max(f64::EPSILON);
    format!(
        "Rate: {:.2} inputs/s | Checked: {} | Matches: {} | Candidates: {} ({:.2}/s)",
        checked as f64 / secs,
        checked,
        matches,
        candidates,
        candidates as f64 / secs
    )
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let args = cli::CliArgs::parse();

    if args.list_algorithms {
        for alg in hashchase_algos::all() {
            println!("{}", alg);
        }
        return Ok(());
    }

    let mut settings = SearchSettings::load(&args.config)?;
    if let Some(tolerance) = args.tolerance {
        settings.tolerance = tolerance;
    }
    if let Some(iterations) = args.iterations {
        settings.iterations = iterations;
    }
    if !args.algorithms.is_empty() {
        settings.algorithms = args.algorithms.clone();
    }
    settings.targets.extend(args.targets.iter().cloned());

    info!("Starting hashchase finder v{}", env!("CARGO_PKG_VERSION"));
    let finder = settings.build_finder()?;
    if finder.targets().is_empty() {
        warn!("No targets given; nothing can match");
    }

    let inputs = args
        .inputs
        .iter()
        .map(|input| {
            if args.hex {
                hex::decode(input)
            } else {
                Ok(input.as_bytes().to_vec())
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let search = Search {
        finder,
        json: args.json,
        report_interval: settings.report_interval,
    };
    let mut matches = search.check_inputs(&inputs)?;
    if args.random > 0 {
        matches += search.sweep(args.random, args.random_len)?;
    }
    info!("{} matches found", matches);

    Ok(())
}
