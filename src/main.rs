use clap::Parser;
use tapemul::batch::{BatchConfig, BatchReport, run_batch};
use tapemul::head::Mode;
use tapemul::{MachineConfig, Multiplier, is_accepted_with};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "tapemul", about = "Binary multiplication on a single-tape Turing machine")]
struct Cli {
    /// Two binary numbers separated by the delimiter, e.g. 1101x10001.
    #[arg(required_unless_present = "random")]
    input: Option<String>,

    /// Character separating the two factors.
    #[arg(long, default_value_t = 'x')]
    delimiter: char,

    /// Max head moves per machine (0 to disable).
    #[arg(long, default_value_t = 1 << 32)]
    step_limit: u64,

    /// Log the tape and head position after every move.
    #[arg(long)]
    trace: bool,

    /// Multiply this many random factor pairs and check every product.
    #[arg(long, conflicts_with = "input")]
    random: Option<usize>,

    /// Random seed for reproducibility (with --random).
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Maximum bit width of random factors (1 to 64).
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u32).range(1..=64))]
    max_bits: u32,

    /// Run in benchmark mode: print throughput instead of a check summary.
    #[arg(long, requires = "random")]
    benchmark: bool,
}

fn init_tracing(trace: bool) {
    let default = if trace { "info" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.trace);

    let step_limit = (cli.step_limit > 0).then_some(cli.step_limit);

    if let Some(rounds) = cli.random {
        let config = BatchConfig {
            rounds,
            max_bits: cli.max_bits,
            step_limit,
            delimiter: cli.delimiter,
        };
        if cli.benchmark {
            run_benchmark(config, cli.seed);
        } else {
            run_check(config, cli.seed);
        }
        return;
    }

    let Some(input) = cli.input else {
        eprintln!("No input given.");
        std::process::exit(1);
    };
    let config = MachineConfig {
        delimiter: cli.delimiter,
        mode: if cli.trace { Mode::Step } else { Mode::Run },
        step_limit,
    };
    run_single(&input, config, cli.trace);
}

fn run_single(input: &str, config: MachineConfig, trace: bool) {
    if !is_accepted_with(input, config.delimiter) {
        eprintln!(
            "Rejected '{input}': expected <binary>{}<binary>",
            config.delimiter
        );
        std::process::exit(1);
    }

    let mut machine = match Multiplier::with_config(input, config) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if trace {
        eprintln!("{}", machine.render_with_head());
    }
    if let Err(e) = machine.calculate() {
        eprintln!("{e} (stopped in {:?})", machine.phase());
        std::process::exit(1);
    }
    if trace {
        eprintln!("{}", machine.render_with_head());
        eprintln!("{} moves", machine.steps());
    }
    println!("{}", machine.tape_content());
}

/// Exit code of a batch run: 1 if any round missed its product.
fn batch_exit_code(report: &BatchReport) -> i32 {
    if report.is_clean() { 0 } else { 1 }
}

fn start_batch(config: &BatchConfig, seed: u64) -> BatchReport {
    match run_batch(config, seed) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn run_check(config: BatchConfig, seed: u64) {
    let report = start_batch(&config, seed);

    println!("rounds,total_steps,mismatches");
    println!(
        "{},{},{}",
        report.rounds,
        report.total_steps,
        report.mismatches.len()
    );
    for m in &report.mismatches {
        match &m.outcome {
            Ok(tape) => eprintln!(
                "{:b} x {:b}: expected {}, got {tape}",
                m.first, m.second, m.expected
            ),
            Err(e) => eprintln!("{:b} x {:b}: {e}", m.first, m.second),
        }
    }
    std::process::exit(batch_exit_code(&report));
}

fn run_benchmark(config: BatchConfig, seed: u64) {
    let rounds = config.rounds;
    let max_bits = config.max_bits;

    let start = std::time::Instant::now();
    let report = start_batch(&config, seed);
    let elapsed = start.elapsed();

    let rounds_per_sec = rounds as f64 / elapsed.as_secs_f64();
    let moves_per_sec = report.total_steps as f64 / elapsed.as_secs_f64();

    eprintln!("Benchmark results:");
    eprintln!("  Rounds:            {rounds}");
    eprintln!("  Max factor bits:   {max_bits}");
    eprintln!("  Total moves:       {}", report.total_steps);
    eprintln!("  Mismatches:        {}", report.mismatches.len());
    eprintln!("  Elapsed:           {elapsed:.2?}");
    eprintln!("  Rounds/sec:        {rounds_per_sec:.1}");
    eprintln!("  Moves/sec:         {moves_per_sec:.0}");
    std::process::exit(batch_exit_code(&report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapemul::batch::Mismatch;

    #[test]
    fn test_clean_batch_exits_zero() {
        let report = BatchReport {
            rounds: 3,
            total_steps: 100,
            mismatches: vec![],
        };
        assert_eq!(batch_exit_code(&report), 0);
    }

    #[test]
    fn test_mismatched_batch_exits_one() {
        let report = BatchReport {
            rounds: 3,
            total_steps: 100,
            mismatches: vec![Mismatch {
                first: 2,
                second: 3,
                expected: "110".to_string(),
                outcome: Ok("111".to_string()),
            }],
        };
        assert_eq!(batch_exit_code(&report), 1);
    }
}
