use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;

use crate::acceptance::DEFAULT_DELIMITER;
use crate::error::MachineError;
use crate::head::Mode;
use crate::multiplier::{MachineConfig, Multiplier};
use crate::symbol::is_reserved;

/// Configuration for a batch of random multiplications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of factor pairs to multiply.
    pub rounds: usize,
    /// Upper bound on the bit width of each factor (1 to 64).
    pub max_bits: u32,
    /// Per-machine step limit.
    pub step_limit: Option<u64>,
    pub delimiter: char,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            rounds: 1000,
            max_bits: 12,
            step_limit: Some(1 << 32),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

/// A round whose tape did not end up holding the product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub first: u64,
    pub second: u64,
    pub expected: String,
    pub outcome: Result<String, MachineError>,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub rounds: usize,
    /// Head moves summed over every machine.
    pub total_steps: u64,
    pub mismatches: Vec<Mismatch>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

fn random_factor(rng: &mut SmallRng, max_bits: u32) -> u64 {
    let bits = rng.gen_range(1..=max_bits.clamp(1, 64));
    if bits == 64 {
        rng.r#gen()
    } else {
        rng.gen_range(0..1u64 << bits)
    }
}

/// Draw `config.rounds` factor pairs from a generator seeded with `seed`.
pub fn random_pairs(config: &BatchConfig, seed: u64) -> Vec<(u64, u64)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..config.rounds)
        .map(|_| {
            let a = random_factor(&mut rng, config.max_bits);
            let b = random_factor(&mut rng, config.max_bits);
            (a, b)
        })
        .collect()
}

/// Run one machine per factor pair and compare each tape against the
/// product computed natively.
///
/// Pairs are drawn sequentially so a seed always yields the same batch;
/// machines then run in parallel, one per pair. A delimiter the machine
/// cannot use refuses the whole batch before any machine is built.
pub fn run_batch(config: &BatchConfig, seed: u64) -> Result<BatchReport, MachineError> {
    if is_reserved(config.delimiter) {
        return Err(MachineError::ReservedDelimiter(config.delimiter));
    }
    let pairs = random_pairs(config, seed);
    let machine = MachineConfig {
        delimiter: config.delimiter,
        mode: Mode::Run,
        step_limit: config.step_limit,
    };

    let outcomes: Vec<(u64, Option<Mismatch>)> = pairs
        .par_iter()
        .map(|&(a, b)| run_round(a, b, machine))
        .collect();

    let mut report = BatchReport {
        rounds: pairs.len(),
        ..BatchReport::default()
    };
    for (steps, mismatch) in outcomes {
        report.total_steps += steps;
        if let Some(m) = mismatch {
            tracing::warn!(
                first = m.first,
                second = m.second,
                expected = %m.expected,
                outcome = ?m.outcome,
                "tape does not hold the product"
            );
            report.mismatches.push(m);
        }
    }
    tracing::debug!(
        rounds = report.rounds,
        total_steps = report.total_steps,
        mismatches = report.mismatches.len(),
        "batch finished"
    );
    Ok(report)
}

fn run_round(first: u64, second: u64, config: MachineConfig) -> (u64, Option<Mismatch>) {
    let expected = format!("{:b}", u128::from(first) * u128::from(second));
    let input = format!("{first:b}{}{second:b}", config.delimiter);

    let (steps, outcome) = match Multiplier::with_config(&input, config) {
        Ok(mut m) => {
            let outcome = m.calculate().map(|()| m.tape_content());
            (m.steps(), outcome)
        }
        Err(e) => (0, Err(e)),
    };

    let mismatch = match &outcome {
        Ok(tape) if *tape == expected => None,
        _ => Some(Mismatch {
            first,
            second,
            expected,
            outcome,
        }),
    };
    (steps, mismatch)
}
