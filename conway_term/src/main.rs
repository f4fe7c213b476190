// main.rs - Terminal front end for the CSR Game of Life engine
//
// Configuration layers: defaults < --config JSON file < LIFE_* env vars < flags.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use conway_csr::{
    Frame, GenerationSink, PATTERNS, Pattern, RandomSoup, RunSummary, Simulation,
    SimulationConfig, SinkError, StateSupplier,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;

use render::TerminalRenderer;

/// Conway's Game of Life via parallel sparse matrix-vector products.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file with width/height/generations/workers.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Interior columns (Nx).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    width: Option<u64>,

    /// Interior rows (Ny).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    height: Option<u64>,

    /// Generations to compute.
    #[arg(short, long)]
    generations: Option<usize>,

    /// Parallel workers per sub-operation.
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    workers: Option<u64>,

    /// Start from a named pattern instead of random soup.
    #[arg(short, long, value_name = "NAME")]
    pattern: Option<String>,

    /// Live-cell probability for random soup.
    #[arg(long, default_value_t = RandomSoup::DEFAULT_DENSITY)]
    density: f64,

    /// RNG seed for random soup. Defaults to the current time.
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between rendered generations.
    #[arg(long, value_name = "MILLISECONDS", default_value_t = 50)]
    delay_ms: u64,

    /// Do not render; only report the summary.
    #[arg(short, long)]
    quiet: bool,

    /// Stop once the grid repeats one of its recent states.
    #[arg(long)]
    stop_on_cycle: bool,

    /// List the built-in patterns and exit.
    #[arg(long)]
    list_patterns: bool,
}

impl Args {
    fn simulation_config(&self) -> Result<SimulationConfig> {
        let base = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)
                .with_context(|| format!("reading {}", path.display()))?,
            None => SimulationConfig::default(),
        };
        let mut config = base.with_env();

        if let Some(width) = self.width {
            config.width = usize::try_from(width)?;
        }
        if let Some(height) = self.height {
            config.height = usize::try_from(height)?;
        }
        if let Some(generations) = self.generations {
            config.generations = generations;
        }
        if let Some(workers) = self.workers {
            config.workers = usize::try_from(workers)?;
        }
        config.validate()?;
        Ok(config)
    }

    fn supplier(&self) -> Result<Box<dyn StateSupplier>> {
        if let Some(name) = &self.pattern {
            let Some(pattern) = Pattern::find(name) else {
                bail!("unknown pattern {name:?} (try --list-patterns)");
            };
            return Ok(Box::new(*pattern));
        }
        if !(0.0..=1.0).contains(&self.density) {
            bail!("--density must be within 0..=1, got {}", self.density);
        }
        let seed = self.seed.unwrap_or_else(time_seed);
        info!(seed, density = self.density, "random initial state");
        Ok(Box::new(RandomSoup::new(self.density, seed)))
    }
}

fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the rendered grid
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.list_patterns {
        for pattern in PATTERNS {
            let (rows, cols) = pattern.size();
            println!("{:<20} {rows}x{cols}", pattern.name);
        }
        return Ok(());
    }

    let config = args.simulation_config()?;
    let supplier = args.supplier()?;
    let mut sim = Simulation::from_supplier(&config, supplier.as_ref())?;

    let started = Instant::now();
    let summary = if args.quiet {
        let mut discard = |_: Frame| -> Result<(), SinkError> { Ok(()) };
        run(&mut sim, &mut discard, args.stop_on_cycle)?
    } else {
        let mut renderer = TerminalRenderer::new(io::stdout().lock(), Duration::from_millis(args.delay_ms));
        run(&mut sim, &mut renderer, args.stop_on_cycle)?
    };
    let elapsed = started.elapsed();

    info!(?elapsed, generations = summary.generations, "run finished");
    println!(
        "{} generations on {}x{} with {} workers in {:.3?}; population {}{}",
        summary.generations,
        config.width,
        config.height,
        sim.workers(),
        elapsed,
        summary.population,
        summary.cycle_at.map(|g| format!("; repeating since generation {g}")).unwrap_or_default(),
    );
    Ok(())
}

fn run(
    sim: &mut Simulation,
    sink: &mut impl GenerationSink,
    stop_on_cycle: bool,
) -> Result<RunSummary> {
    let summary = if stop_on_cycle { sim.run_until_cycle(sink)? } else { sim.run(sink)? };
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from(["conway_term", "--width", "20", "--height", "10", "-w", "3", "-g", "7"]);
        let config = args.simulation_config().unwrap();
        assert_eq!((config.width, config.height, config.workers, config.generations), (20, 10, 3, 7));
    }

    #[test]
    fn zero_workers_is_rejected_by_the_parser() {
        assert!(Args::try_parse_from(["conway_term", "--workers", "0"]).is_err());
    }

    #[test]
    fn unknown_pattern_is_an_error() {
        let args = Args::parse_from(["conway_term", "--pattern", "spaceship"]);
        assert!(args.supplier().is_err());
    }

    #[test]
    fn density_out_of_range_is_an_error() {
        let args = Args::parse_from(["conway_term", "--density", "1.5"]);
        assert!(args.supplier().is_err());
    }
}
