use super::LogArgs;
use crate::reports;
use clap::Args;
use netforge::config::Config;
use netforge::error::{NetForgeError, NfResult};
use netforge::event_log::load_event_log_from_path;
use netforge::optimizer::{Miner, MiningOptions, ProgressCallback};
use std::time::{Duration, Instant};

#[derive(Args, Debug, Clone)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub config: Config,

    #[command(flatten)]
    pub input: LogArgs,

    /// JSON config file; explicit flags still win.
    #[arg(short, long = "config")]
    pub config_file: Option<String>,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Wall-clock limit in seconds.
    #[arg(short = 'T', long)]
    pub time: Option<u64>,

    /// Write the best net as JSON.
    #[arg(short, long)]
    pub export: Option<String>,

    /// Print the log's causal matrix and every generation instead of every tenth.
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

struct ConsoleProgress {
    every: usize,
}

impl ProgressCallback for ConsoleProgress {
    fn on_generation(&self, generation: usize, best_fitness: f64, mean_fitness: f64) -> bool {
        if generation == 1 || generation % self.every == 0 {
            println!(
                "   Gen {:4} | Best: {:.4} | Mean: {:.4}",
                generation, best_fitness, mean_fitness
            );
        }
        true
    }
}

pub fn run(args: DiscoverArgs, config: Config) -> NfResult<()> {
    println!("\n📂 Loading Log: {}", args.input.log);
    let log = load_event_log_from_path(&args.input.log, &args.input.format())?;
    if log.is_empty() {
        return Err(NetForgeError::Validation(format!(
            "log '{}' contains no traces",
            args.input.log
        )));
    }

    if args.verbose {
        reports::print_causal_matrix(&log.causal_matrix());
    }

    let mut options = MiningOptions::from(&config);
    options.max_time = args.time.map(Duration::from_secs);
    let miner = Miner::new(options)?;

    println!(
        "🧬 Evolving {} nets over {} activities",
        config.search.population_size,
        log.activities.len()
    );

    let started = Instant::now();
    let progress = ConsoleProgress {
        every: if args.verbose { 1 } else { 10 },
    };
    let result = miner.run(&log, args.seed, progress);

    reports::print_run_summary(&result, started.elapsed());
    reports::print_net(&result.best);
    println!("Fitness: {:.4}", result.fitness);

    if let Some(path) = &args.export {
        result.best.structure().save_to_file(path)?;
        println!("💾 Saved net to {}", path);
    }
    Ok(())
}
