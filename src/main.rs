//! Benchmark runner: serial vs blocked-concurrent multiplication.

use blockmul::{
    Accumulation, BlockMultiplier, BlockMultiplierConfig, BlockPartition, Matrix, multiply_serial,
};
use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "blockmul", version, about = "Serial vs blocked concurrent matrix multiplication")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Multiply the built-in 4×4 example with both strategies
    Demo,
    /// Time both strategies over a range of sizes and block sizes
    Sweep(SweepArgs),
}

#[derive(Args, Debug, Clone)]
struct SweepArgs {
    /// Smallest block size when sweeping n = s*s
    #[arg(long, default_value_t = 1)]
    min_block: usize,

    /// Largest block size when sweeping n = s*s
    #[arg(long, default_value_t = 20)]
    max_block: usize,

    /// Explicit matrix sizes (overrides the n = s*s sweep)
    #[arg(long, value_delimiter = ',', requires = "block_sizes")]
    sizes: Vec<usize>,

    /// Explicit block sizes, used with --sizes
    #[arg(long, value_delimiter = ',', requires = "sizes")]
    block_sizes: Vec<usize>,

    /// Timed runs per configuration
    #[arg(long, default_value_t = 3, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    iterations: usize,

    /// Worker threads (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// per-block | atomic
    #[arg(long, default_value_t = Accumulation::PerOutputBlock)]
    accumulation: Accumulation,

    /// Check blocked output against serial output
    #[arg(long)]
    verify: bool,
}

impl Default for SweepArgs {
    fn default() -> Self {
        SweepArgs {
            min_block: 1,
            max_block: 20,
            sizes: Vec::new(),
            block_sizes: Vec::new(),
            iterations: 3,
            threads: None,
            accumulation: Accumulation::PerOutputBlock,
            verify: false,
        }
    }
}

struct Row {
    n: usize,
    block_size: usize,
    serial_us: f64,
    blocked_us: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Sweep(SweepArgs::default())) {
        Command::Demo => run_demo(),
        Command::Sweep(args) => run_sweep(&args),
    }
}

fn run_demo() -> Result<(), Box<dyn Error>> {
    let a = Matrix::from_rows(vec![
        vec![5, 7, 9, 10],
        vec![2, 3, 3, 8],
        vec![8, 10, 2, 3],
        vec![3, 3, 4, 8],
    ])?;
    let b = Matrix::from_rows(vec![
        vec![3, 10, 12, 18],
        vec![12, 1, 4, 9],
        vec![9, 10, 12, 2],
        vec![3, 12, 4, 10],
    ])?;

    let serial = multiply_serial(&a, &b)?;
    let pa = BlockPartition::build(&a, 2)?;
    let pb = BlockPartition::build(&b, 2)?;

    println!("Serial:\n{}", serial);
    for accumulation in [Accumulation::PerOutputBlock, Accumulation::AtomicCells] {
        let mul = BlockMultiplier::new(BlockMultiplierConfig::default().with_accumulation(accumulation))?;
        let blocked = mul.multiply(&pa, &pb, &a, &b)?;
        println!("Blocked ({}):\n{}", accumulation, blocked);
        if blocked != serial {
            return Err(format!("{} result differs from serial", accumulation).into());
        }
    }
    Ok(())
}

fn run_sweep(args: &SweepArgs) -> Result<(), Box<dyn Error>> {
    let mut config = BlockMultiplierConfig::default().with_accumulation(args.accumulation);
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }
    let mul = BlockMultiplier::new(config)?;
    let iterations = args.iterations;

    info!(
        accumulation = %args.accumulation,
        threads = ?args.threads,
        iterations,
        "starting sweep"
    );

    let mut rows = Vec::new();
    for (n, block_size) in sweep_plan(args) {
        if block_size == 0 || n % block_size != 0 {
            warn!(n, block_size, "block size does not divide n, skipping");
            continue;
        }

        let a = Matrix::from_fn(n, |r, c| ((r * n + c) % 100) as i64);
        let b = Matrix::from_fn(n, |r, c| ((c * n + r) % 100) as i64);

        // Warmup
        let expected = multiply_serial(&a, &b)?;
        let blocked = blocked_once(&mul, &a, &b, block_size)?;
        if args.verify && blocked != expected {
            return Err(format!("n={} block={}: blocked result differs from serial", n, block_size).into());
        }

        let serial_us = time_us(iterations, || multiply_serial(&a, &b).map(drop))?;
        // Partitioning is part of the blocked cost.
        let blocked_us = time_us(iterations, || blocked_once(&mul, &a, &b, block_size).map(drop))?;

        println!(
            "n = {:5}  block = {:4}  serial {:12.1} µs  blocked {:12.1} µs  ({:.2}×)",
            n,
            block_size,
            serial_us,
            blocked_us,
            serial_us / blocked_us
        );
        rows.push(Row {
            n,
            block_size,
            serial_us,
            blocked_us,
        });
    }

    print_summary_table(&rows);
    Ok(())
}

fn sweep_plan(args: &SweepArgs) -> Vec<(usize, usize)> {
    if args.sizes.is_empty() {
        (args.min_block.max(1)..=args.max_block).map(|s| (s * s, s)).collect()
    } else {
        args.sizes
            .iter()
            .flat_map(|&n| args.block_sizes.iter().map(move |&s| (n, s)))
            .collect()
    }
}

fn blocked_once(mul: &BlockMultiplier, a: &Matrix, b: &Matrix, block_size: usize) -> blockmul::Result<Matrix> {
    let pa = BlockPartition::build(a, block_size)?;
    let pb = BlockPartition::build(b, block_size)?;
    mul.multiply(&pa, &pb, a, b)
}

/// Average wall time of `f` in microseconds.
fn time_us<F>(iterations: usize, mut f: F) -> blockmul::Result<f64>
where
    F: FnMut() -> blockmul::Result<()>,
{
    let mut total = 0.0;
    for _ in 0..iterations {
        let start = Instant::now();
        f()?;
        total += start.elapsed().as_secs_f64();
    }
    Ok(total / iterations as f64 * 1e6)
}

fn print_summary_table(rows: &[Row]) {
    if rows.is_empty() {
        return;
    }

    println!("\n{}", "=".repeat(70));
    println!("SUMMARY");
    println!("{}", "=".repeat(70));
    println!(
        "\n{:>8} {:>8} {:>16} {:>16} {:>12}",
        "n", "block", "Serial (µs)", "Blocked (µs)", "Speedup"
    );
    println!("{}", "-".repeat(70));

    for row in rows {
        println!(
            "{:>8} {:>8} {:>16.1} {:>16.1} {:>11.2}×",
            row.n,
            row.block_size,
            row.serial_us,
            row.blocked_us,
            row.serial_us / row.blocked_us
        );
    }

    let best = rows
        .iter()
        .max_by(|x, y| (x.serial_us / x.blocked_us).total_cmp(&(y.serial_us / y.blocked_us)));
    if let Some(best) = best {
        println!("{}", "=".repeat(70));
        println!(
            "\nBest speedup: {:.2}× at n = {}, block = {}\n",
            best.serial_us / best.blocked_us,
            best.n,
            best.block_size
        );
    }
}
