//! Brute-force search for inputs whose iterated digests land near a target.
//!
//! Each [`Finder::check`] fans out one worker per (algorithm, strategy) pair
//! and waits for all of them. Workers own their digest state; the target
//! list is shared read-only.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;

use hashchase_algos::Algorithm;
use log::debug;
use serde::Serialize;

use crate::error::FinderError;
use crate::fuzzy::FuzzyDigest;

pub const DEFAULT_ITERATIONS: usize = 1000;

/// How a worker derives successive candidates from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Keep writing the input into one running accumulator and take the
    /// digest after every write.
    RepeatedData,
    /// Digest the input, then digest each digest in turn.
    RepeatedHash,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::RepeatedData, Strategy::RepeatedHash];
}

/// A candidate that came within tolerance of a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub algorithm: &'static str,
    pub strategy: Strategy,
    /// Zero-based iteration at which the candidate matched.
    pub iteration: usize,
    /// Hex of the input for [`Strategy::RepeatedData`], hex of the first
    /// digest in the chain for [`Strategy::RepeatedHash`].
    pub seed: String,
    pub target: String,
    pub distance: usize,
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strategy {
            Strategy::RepeatedData => write!(
                f,
                "{}: hash '{}' {} times",
                self.algorithm,
                self.seed,
                self.iteration + 1
            ),
            Strategy::RepeatedHash => write!(
                f,
                "{}: take the {}-th hash of '{}'",
                self.algorithm, self.iteration, self.seed
            ),
        }
    }
}

/// Holds the targets to look for and searches for all of them at once.
#[derive(Debug)]
pub struct Finder {
    tolerance: usize,
    iterations: usize,
    algorithms: Vec<Algorithm>,
    targets: Vec<FuzzyDigest>,
    examined: AtomicU64,
}

impl Finder {
    pub fn new(tolerance: usize, algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        Finder {
            tolerance,
            iterations: DEFAULT_ITERATIONS,
            algorithms: algorithms.into_iter().collect(),
            targets: Vec::new(),
            examined: AtomicU64::new(0),
        }
    }

    /// Overrides the per-worker iteration budget.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn add_target(&mut self, digest: &[u8]) {
        self.targets.push(FuzzyDigest::new(digest));
    }

    pub fn add_target_hex(&mut self, digest: &str) -> Result<(), FinderError> {
        let bytes = hex::decode(digest.trim())?;
        self.targets.push(FuzzyDigest::from(bytes));
        Ok(())
    }

    pub fn targets(&self) -> &[FuzzyDigest] {
        &self.targets
    }

    pub fn tolerance(&self) -> usize {
        self.tolerance
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    /// Total candidates compared against the targets across all checks.
    pub fn candidates_examined(&self) -> u64 {
        self.examined.load(Ordering::Relaxed)
    }

    /// Searches every algorithm with both strategies and returns one match,
    /// if any worker found one.
    ///
    /// Blocks until every worker has finished. Once a worker matches, the
    /// others stop at their next iteration.
    pub fn check(&self, input: &[u8]) -> Option<Match> {
        if self.targets.is_empty() {
            debug!("No targets registered, skipping search");
            return None;
        }

        let workers = self.algorithms.len() * Strategy::ALL.len();
        let (results_tx, results_rx) = mpsc::sync_channel(workers);
        let found = AtomicBool::new(false);

        thread::scope(|scope| {
            for &algorithm in &self.algorithms {
                for strategy in Strategy::ALL {
                    let worker = Worker {
                        algorithm,
                        targets: &self.targets,
                        tolerance: self.tolerance,
                        iterations: self.iterations,
                        found: &found,
                        examined: &self.examined,
                    };
                    let results_tx = results_tx.clone();
                    scope.spawn(move || {
                        if let Some(hit) = worker.run(strategy, input) {
                            worker.found.store(true, Ordering::Relaxed);
                            // Capacity equals the worker count, so this never blocks.
                            let _ = results_tx.send(hit);
                        }
                    });
                }
            }
        });
        drop(results_tx);

        let hit = results_rx.try_recv().ok();
        match &hit {
            Some(hit) => debug!("Match for '{}': {}", hex::encode(input), hit),
            None => debug!("No match for '{}' across {} workers", hex::encode(input), workers),
        }
        hit
    }
}

struct Worker<'a> {
    algorithm: Algorithm,
    targets: &'a [FuzzyDigest],
    tolerance: usize,
    iterations: usize,
    found: &'a AtomicBool,
    examined: &'a AtomicU64,
}

impl Worker<'_> {
    fn run(&self, strategy: Strategy, input: &[u8]) -> Option<Match> {
        match strategy {
            Strategy::RepeatedData => self.repeated_data(input),
            Strategy::RepeatedHash => self.repeated_hash(input),
        }
    }

    fn repeated_data(&self, input: &[u8]) -> Option<Match> {
        let mut hasher = self.algorithm.instantiate();
        let seed = hex::encode(input);
        for iteration in 0..self.iterations {
            if self.found.load(Ordering::Relaxed) {
                return None;
            }
            hasher.write(input);
            let candidate = FuzzyDigest::from(hasher.sum());
            if let Some(hit) = self.compare(&candidate, Strategy::RepeatedData, iteration, &seed) {
                return Some(hit);
            }
        }
        None
    }

    fn repeated_hash(&self, input: &[u8]) -> Option<Match> {
        let mut hasher = self.algorithm.instantiate();
        hasher.write(input);
        let mut current = hasher.sum();
        let seed = hex::encode(&current);
        for iteration in 0..self.iterations {
            if self.found.load(Ordering::Relaxed) {
                return None;
            }
            let candidate = FuzzyDigest::new(&current);
            if let Some(hit) = self.compare(&candidate, Strategy::RepeatedHash, iteration, &seed) {
                return Some(hit);
            }
            hasher.reset();
            hasher.write(&current);
            current = hasher.sum();
        }
        None
    }

    /// Reports the first target, in insertion order, within tolerance.
    fn compare(
        &self,
        candidate: &FuzzyDigest,
        strategy: Strategy,
        iteration: usize,
        seed: &str,
    ) -> Option<Match> {
        self.examined.fetch_add(1, Ordering::Relaxed);
        self.targets.iter().find_map(|target| {
            let distance = candidate.distance_to(target);
            (distance <= self.tolerance).then(|| Match {
                algorithm: self.algorithm.name(),
                strategy,
                iteration,
                seed: seed.to_string(),
                target: target.to_string(),
                distance,
            })
        })
    }
}
