use crate::config::{Config, GeneratorParams, RefillPolicy};
use crate::error::{NetForgeError, NfResult};
use crate::event_log::EventLog;
use crate::net::PetriNet;
use crate::optimizer::crossover::crossover;
use crate::optimizer::initialization::{
    initial_population, random_net, MAX_EXTRA_PLACE_RATIO,
};
use crate::optimizer::{elite_count, mean_fitness, mutation, rank, scaled_count};
use crate::replay;
use fastrand::Rng;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use strum_macros::Display;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct MiningOptions {
    pub population_size: usize,
    pub generations: usize,
    pub target_fitness: f64,
    pub elitism_rate: f64,
    pub crossover_rate: f64,
    pub mutate_rate: f64,
    pub refill: RefillPolicy,
    pub patience: usize,
    pub generator: GeneratorParams,
    pub max_time: Option<Duration>,
}

impl From<&Config> for MiningOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            population_size: cfg.search.population_size,
            generations: cfg.search.generations,
            target_fitness: cfg.search.target_fitness,
            elitism_rate: cfg.search.elitism_rate,
            crossover_rate: cfg.search.crossover_rate,
            mutate_rate: cfg.search.mutate_rate,
            refill: cfg.search.refill,
            patience: cfg.search.patience,
            generator: cfg.generator.clone(),
            max_time: None, // Set manually if needed
        }
    }
}

impl Default for MiningOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl MiningOptions {
    pub fn validate(&self) -> NfResult<()> {
        if self.population_size == 0 {
            return Err(NetForgeError::Config(
                "population_size must be at least 1".to_string(),
            ));
        }
        for (name, rate) in [
            ("elitism_rate", self.elitism_rate),
            ("crossover_rate", self.crossover_rate),
            ("mutate_rate", self.mutate_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(NetForgeError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }
        if !self.target_fitness.is_finite() {
            return Err(NetForgeError::Config(
                "target_fitness must be a finite number".to_string(),
            ));
        }
        let ratio = self.generator.extra_place_ratio;
        if !(0.0..=MAX_EXTRA_PLACE_RATIO).contains(&ratio) {
            return Err(NetForgeError::Config(format!(
                "extra_place_ratio must be within [0, {}], got {}",
                MAX_EXTRA_PLACE_RATIO, ratio
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    TargetReached,
    GenerationBudget,
    TimeLimit,
    Stagnation,
    Aborted,
}

#[derive(Debug, Clone)]
pub struct MiningResult {
    pub best: PetriNet,
    pub fitness: f64,
    pub accuracy: f64,
    pub times_run: u32,
    /// Marking left by the best net's last replay.
    pub holdings: Vec<i64>,
    pub generations: usize,
    /// Best fitness seen so far, one entry per generation.
    pub history: Vec<f64>,
    pub stop_reason: StopReason,
}

/// Receives updates once per generation.
/// Boolean return value indicates if the search should continue (true) or abort (false).
pub trait ProgressCallback: Send + Sync {
    fn on_generation(&self, generation: usize, best_fitness: f64, mean_fitness: f64) -> bool;
}

impl ProgressCallback for () {
    fn on_generation(&self, _generation: usize, _best: f64, _mean: f64) -> bool {
        true
    }
}

impl<T: ProgressCallback + ?Sized> ProgressCallback for &T {
    fn on_generation(&self, generation: usize, best_fitness: f64, mean_fitness: f64) -> bool {
        (**self).on_generation(generation, best_fitness, mean_fitness)
    }
}

/// Scores every net in parallel, then sorts best first.
fn evaluate_and_rank(population: &mut [PetriNet], traces: &[Vec<String>]) {
    population.par_iter_mut().for_each(|net| {
        replay::evaluate(net, traces);
    });
    rank(population);
}

pub struct Miner {
    options: MiningOptions,
}

impl Miner {
    pub fn new(options: MiningOptions) -> NfResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn run<CB: ProgressCallback>(
        &self,
        log: &EventLog,
        seed: Option<u64>,
        callback: CB,
    ) -> MiningResult {
        let opts = &self.options;
        let alphabet = &log.activities;
        let traces = &log.traces;

        let mut rng = match seed {
            Some(s) => Rng::with_seed(s),
            None => Rng::new(),
        };

        info!(
            "🧬 Mining {} traces over {} activities (population {}, up to {} generations)",
            traces.len(),
            alphabet.len(),
            opts.population_size,
            opts.generations
        );

        // 1. Initial Population, scored and ranked before the first check
        let mut population =
            initial_population(opts.population_size, alphabet, &opts.generator, &mut rng);
        evaluate_and_rank(&mut population, traces);

        // 2. Global State
        // Validation keeps the population non-empty and breeding always keeps
        // at least one elite, so index 0 exists in every generation.
        let mut best = population[0].clone();
        let mut history = Vec::new();
        let mut stagnant = 0;
        let mut generation = 0;
        let start_time = Instant::now();

        // 3. Main Loop
        let stop_reason = loop {
            generation += 1;

            // A. Track Best
            let leader = &population[0];
            if leader.fitness > best.fitness {
                best = leader.clone();
                stagnant = 0;
            } else if generation > 1 {
                stagnant += 1;
            }
            history.push(best.fitness);

            let mean = mean_fitness(&population);
            debug!(
                "Gen {:4} | Best: {:.4} | Mean: {:.4} | Pop: {}",
                generation,
                best.fitness,
                mean,
                population.len()
            );

            let keep_going = callback.on_generation(generation, best.fitness, mean);

            // B. Termination
            if best.fitness >= opts.target_fitness {
                break StopReason::TargetReached;
            }
            if generation >= opts.generations.max(1) {
                break StopReason::GenerationBudget;
            }
            if let Some(limit) = opts.max_time {
                if start_time.elapsed() >= limit {
                    break StopReason::TimeLimit;
                }
            }
            if opts.patience > 0 && stagnant >= opts.patience {
                break StopReason::Stagnation;
            }
            if !keep_going {
                break StopReason::Aborted;
            }

            // C. Next Generation replaces the old one
            population = self.breed(population, alphabet, &mut rng);
            evaluate_and_rank(&mut population, traces);
        };

        info!(
            "🏁 Stopped after {} generations ({}): fitness {:.4}",
            generation, stop_reason, best.fitness
        );

        MiningResult {
            fitness: best.fitness,
            accuracy: best.accuracy,
            times_run: best.times_run,
            holdings: best.holdings(),
            best,
            generations: generation,
            history,
            stop_reason,
        }
    }

    /// Elites survive unchanged, offspring are bred from them, and the rest is
    /// refilled according to the policy.
    fn breed(&self, ranked: Vec<PetriNet>, alphabet: &[String], rng: &mut Rng) -> Vec<PetriNet> {
        let opts = &self.options;

        let elite_n = elite_count(opts.elitism_rate, opts.population_size, ranked.len());
        let mut next: Vec<PetriNet> = ranked.into_iter().take(elite_n).collect();

        // One seed per child keeps parallel breeding reproducible.
        let offspring_n = if next.is_empty() {
            0
        } else {
            scaled_count(opts.crossover_rate, opts.population_size)
        };
        let seeds: Vec<u64> = (0..offspring_n).map(|_| rng.u64(..)).collect();

        let elites = &next;
        let offspring: Vec<PetriNet> = seeds
            .par_iter()
            .map(|&s| {
                let mut child_rng = Rng::with_seed(s);
                let p1 = &elites[child_rng.usize(0..elites.len())];
                let p2 = &elites[child_rng.usize(0..elites.len())];
                let mut child = crossover(
                    p1,
                    p2,
                    alphabet,
                    opts.generator.produce_guard,
                    &mut child_rng,
                );
                if child_rng.f64() < opts.mutate_rate {
                    mutation::mutate(&mut child, &mut child_rng);
                }
                child
            })
            .collect();

        next.extend(offspring);

        if opts.refill == RefillPolicy::Random {
            while next.len() < opts.population_size {
                next.push(random_net(alphabet, &opts.generator, rng));
            }
        }
        next.truncate(opts.population_size);
        next
    }
}
